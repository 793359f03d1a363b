//! Review service
//!
//! Submission gates, ownership checks, and the synchronous rating
//! recomputation that keeps each restaurant's stored aggregate equal to
//! [`rating::aggregate`] over its full review set.

use crate::auth::CurrentUser;
use crate::db::models::{Order, OrderStatus, Restaurant, Review, ReviewCreate, ReviewUpdate, Role};
use crate::db::repository::{OrderRepository, RestaurantRepository, ReviewRepository};
use crate::reviews::rating;
use crate::utils::{AppError, AppResult};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use validator::Validate;

#[derive(Clone)]
pub struct ReviewService {
    reviews: ReviewRepository,
    orders: OrderRepository,
    restaurants: RestaurantRepository,
}

impl ReviewService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            reviews: ReviewRepository::new(db.clone()),
            orders: OrderRepository::new(db.clone()),
            restaurants: RestaurantRepository::new(db),
        }
    }

    /// Submit a review for a delivered order
    ///
    /// The caller must be the customer on the order, the order must be
    /// delivered, and no review may already exist for it.
    pub async fn submit(&self, user: &CurrentUser, data: ReviewCreate) -> AppResult<Review> {
        if user.role != Role::Customer {
            return Err(AppError::Forbidden(
                "Only customers can submit reviews".to_string(),
            ));
        }
        data.validate()?;

        let order = self.order_for_review(user, &data.order_id).await?;
        let order_ref = order
            .id
            .clone()
            .ok_or_else(|| AppError::Internal("Order record without id".to_string()))?;
        if self
            .reviews
            .find_by_customer_and_order(&user.id, &order_ref.to_string())
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "You have already reviewed this order".to_string(),
            ));
        }

        let now = Utc::now();
        let review = Review {
            id: None,
            customer: order.customer.clone(),
            order: order_ref,
            restaurant: order.restaurant.clone(),
            delivery_personnel: order.delivery_personnel.clone(),
            restaurant_rating: data.restaurant_rating,
            restaurant_comment: data.restaurant_comment,
            delivery_rating: data.delivery_rating,
            delivery_comment: data.delivery_comment,
            created_at: now,
            updated_at: now,
        };

        let created = self.reviews.create(review).await?;
        self.recompute_rating(&created.restaurant.to_string())
            .await?;
        tracing::info!(
            review = %created.id.as_ref().map(ToString::to_string).unwrap_or_default(),
            restaurant = %created.restaurant,
            rating = created.restaurant_rating,
            "review submitted"
        );
        Ok(created)
    }

    /// Patch a review's ratings or comments; owner only
    pub async fn update(
        &self,
        user: &CurrentUser,
        id: &str,
        data: ReviewUpdate,
    ) -> AppResult<Review> {
        data.validate()?;
        let existing = self
            .reviews
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Review {} not found", id)))?;
        if existing.customer.to_string() != user.id {
            return Err(AppError::Forbidden(
                "You can only edit your own reviews".to_string(),
            ));
        }

        let updated = self.reviews.update(id, data).await?;
        self.recompute_rating(&updated.restaurant.to_string())
            .await?;
        Ok(updated)
    }

    /// Delete a review; owner or admin
    pub async fn delete(&self, user: &CurrentUser, id: &str) -> AppResult<()> {
        let existing = self
            .reviews
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Review {} not found", id)))?;
        if existing.customer.to_string() != user.id && !user.is_admin() {
            return Err(AppError::Forbidden(
                "You can only delete your own reviews".to_string(),
            ));
        }

        let deleted = self.reviews.delete(id).await?;
        self.recompute_rating(&deleted.restaurant.to_string())
            .await?;
        tracing::info!(review = %id, actor = %user.id, "review deleted");
        Ok(())
    }

    /// Public: one review by id
    pub async fn get(&self, id: &str) -> AppResult<Review> {
        self.reviews
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Review {} not found", id)))
    }

    /// Public: all reviews for a restaurant, newest first
    pub async fn for_restaurant(&self, restaurant_id: &str) -> AppResult<Vec<Review>> {
        Ok(self.reviews.find_by_restaurant(restaurant_id).await?)
    }

    /// The caller's own reviews, newest first
    pub async fn my_reviews(&self, user: &CurrentUser) -> AppResult<Vec<Review>> {
        Ok(self.reviews.find_by_customer(&user.id).await?)
    }

    /// Fetch the order behind a review submission and check the gates
    async fn order_for_review(&self, user: &CurrentUser, order_id: &str) -> AppResult<Order> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", order_id)))?;
        if order.customer.to_string() != user.id {
            return Err(AppError::Forbidden(
                "You can only review your own orders".to_string(),
            ));
        }
        if order.status != OrderStatus::Delivered {
            return Err(AppError::Validation(
                "Only delivered orders can be reviewed".to_string(),
            ));
        }
        Ok(order)
    }

    /// Recompute and store the restaurant aggregate from the full review set
    async fn recompute_rating(&self, restaurant_id: &str) -> AppResult<Restaurant> {
        let reviews = self.reviews.find_by_restaurant(restaurant_id).await?;
        let ratings: Vec<u8> = reviews.iter().map(|r| r.restaurant_rating).collect();
        let (average, count) = rating::aggregate(&ratings);
        Ok(self
            .restaurants
            .update_rating(restaurant_id, average, count)
            .await?)
    }
}
