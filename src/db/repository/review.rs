//! Review Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{Review, ReviewUpdate};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "reviews";

#[derive(Clone)]
pub struct ReviewRepository {
    base: BaseRepository,
}

impl ReviewRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Insert a new review
    pub async fn create(&self, review: Review) -> RepoResult<Review> {
        let created: Option<Review> = self.base.db().create(TABLE).content(review).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create review".to_string()))
    }

    /// Find review by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Review>> {
        let rid = parse_id(TABLE, id)?;
        let review: Option<Review> = self.base.db().select(rid).await?;
        Ok(review)
    }

    /// All reviews for a restaurant, newest first
    pub async fn find_by_restaurant(&self, restaurant_id: &str) -> RepoResult<Vec<Review>> {
        let restaurant = parse_id("restaurants", restaurant_id)?.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM reviews WHERE restaurant = $restaurant ORDER BY created_at DESC")
            .bind(("restaurant", restaurant))
            .await?;
        let reviews: Vec<Review> = result.take(0)?;
        Ok(reviews)
    }

    /// All reviews written by a customer, newest first
    pub async fn find_by_customer(&self, customer_id: &str) -> RepoResult<Vec<Review>> {
        let customer = customer_id.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM reviews WHERE customer = $customer ORDER BY created_at DESC")
            .bind(("customer", customer))
            .await?;
        let reviews: Vec<Review> = result.take(0)?;
        Ok(reviews)
    }

    /// The review a customer wrote for one order, if any
    pub async fn find_by_customer_and_order(
        &self,
        customer_id: &str,
        order_id: &str,
    ) -> RepoResult<Option<Review>> {
        let customer = customer_id.to_string();
        let order = order_id.to_string();
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM reviews WHERE customer = $customer AND `order` = $order LIMIT 1",
            )
            .bind(("customer", customer))
            .bind(("order", order))
            .await?;
        let reviews: Vec<Review> = result.take(0)?;
        Ok(reviews.into_iter().next())
    }

    /// Patch rating/comment fields
    pub async fn update(&self, id: &str, data: ReviewUpdate) -> RepoResult<Review> {
        let rid = parse_id(TABLE, id)?;

        let mut set_parts = vec!["updated_at = $now"];
        if data.restaurant_rating.is_some() {
            set_parts.push("restaurant_rating = $restaurant_rating");
        }
        if data.restaurant_comment.is_some() {
            set_parts.push("restaurant_comment = $restaurant_comment");
        }
        if data.delivery_rating.is_some() {
            set_parts.push("delivery_rating = $delivery_rating");
        }
        if data.delivery_comment.is_some() {
            set_parts.push("delivery_comment = $delivery_comment");
        }

        let query_str = format!("UPDATE $rid SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self
            .base
            .db()
            .query(query_str)
            .bind(("rid", rid))
            .bind(("now", Utc::now()));

        if let Some(v) = data.restaurant_rating {
            query = query.bind(("restaurant_rating", v));
        }
        if let Some(v) = data.restaurant_comment {
            query = query.bind(("restaurant_comment", v));
        }
        if let Some(v) = data.delivery_rating {
            query = query.bind(("delivery_rating", v));
        }
        if let Some(v) = data.delivery_comment {
            query = query.bind(("delivery_comment", v));
        }

        let mut result = query.await?;
        let reviews: Vec<Review> = result.take(0)?;
        reviews
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Review {} not found", id)))
    }

    /// Hard delete a review
    pub async fn delete(&self, id: &str) -> RepoResult<Review> {
        let rid = parse_id(TABLE, id)?;
        let deleted: Option<Review> = self.base.db().delete(rid).await?;
        deleted.ok_or_else(|| RepoError::NotFound(format!("Review {} not found", id)))
    }
}
