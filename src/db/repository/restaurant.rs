//! Restaurant Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{Restaurant, RestaurantCreate, RestaurantUpdate};
use chrono::Utc;
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "restaurants";

#[derive(Clone)]
pub struct RestaurantRepository {
    base: BaseRepository,
}

impl RestaurantRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Public listing: approved restaurants only
    pub async fn find_all_approved(&self) -> RepoResult<Vec<Restaurant>> {
        let restaurants: Vec<Restaurant> = self
            .base
            .db()
            .query("SELECT * FROM restaurants WHERE is_approved = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(restaurants)
    }

    /// Find restaurant by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Restaurant>> {
        let rid = parse_id(TABLE, id)?;
        let restaurant: Option<Restaurant> = self.base.db().select(rid).await?;
        Ok(restaurant)
    }

    /// All restaurants owned by a user
    pub async fn find_by_owner(&self, owner_id: &str) -> RepoResult<Vec<Restaurant>> {
        let owner = owner_id.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM restaurants WHERE owner = $owner ORDER BY name")
            .bind(("owner", owner))
            .await?;
        let restaurants: Vec<Restaurant> = result.take(0)?;
        Ok(restaurants)
    }

    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Restaurant>> {
        let name = name.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM restaurants WHERE name = $name LIMIT 1")
            .bind(("name", name))
            .await?;
        let restaurants: Vec<Restaurant> = result.take(0)?;
        Ok(restaurants.into_iter().next())
    }

    /// Create a new restaurant for the given owner
    pub async fn create(&self, owner_id: &str, data: RestaurantCreate) -> RepoResult<Restaurant> {
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "A restaurant named '{}' already exists",
                data.name
            )));
        }

        let owner = parse_id("users", owner_id)?;
        let now = Utc::now();
        let restaurant = Restaurant {
            id: None,
            owner,
            name: data.name,
            description: data.description,
            address: data.address,
            cuisine_types: data.cuisine_types,
            contact_phone: data.contact_phone,
            contact_email: data.contact_email,
            image_url: data
                .image_url
                .unwrap_or_else(|| "https://via.placeholder.com/150".to_string()),
            is_approved: true,
            average_rating: Decimal::ZERO,
            review_count: 0,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Restaurant> = self.base.db().create(TABLE).content(restaurant).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create restaurant".to_string()))
    }

    /// Update restaurant profile fields; rating fields are out of reach here
    pub async fn update(&self, id: &str, data: RestaurantUpdate) -> RepoResult<Restaurant> {
        let rid = parse_id(TABLE, id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Restaurant {} not found", id)))?;

        if let Some(ref new_name) = data.name {
            if new_name != &existing.name && self.find_by_name(new_name).await?.is_some() {
                return Err(RepoError::Duplicate(format!(
                    "A restaurant named '{}' already exists",
                    new_name
                )));
            }
        }

        let mut set_parts = vec!["updated_at = $now"];
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.description.is_some() {
            set_parts.push("description = $description");
        }
        if data.address.is_some() {
            set_parts.push("address = $address");
        }
        if data.cuisine_types.is_some() {
            set_parts.push("cuisine_types = $cuisine_types");
        }
        if data.contact_phone.is_some() {
            set_parts.push("contact_phone = $contact_phone");
        }
        if data.contact_email.is_some() {
            set_parts.push("contact_email = $contact_email");
        }
        if data.image_url.is_some() {
            set_parts.push("image_url = $image_url");
        }

        let query_str = format!("UPDATE $rid SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self
            .base
            .db()
            .query(query_str)
            .bind(("rid", rid))
            .bind(("now", Utc::now()));

        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.description {
            query = query.bind(("description", v));
        }
        if let Some(v) = data.address {
            query = query.bind(("address", v));
        }
        if let Some(v) = data.cuisine_types {
            query = query.bind(("cuisine_types", v));
        }
        if let Some(v) = data.contact_phone {
            query = query.bind(("contact_phone", v));
        }
        if let Some(v) = data.contact_email {
            query = query.bind(("contact_email", v));
        }
        if let Some(v) = data.image_url {
            query = query.bind(("image_url", v));
        }

        let mut result = query.await?;
        let restaurants: Vec<Restaurant> = result.take(0)?;
        restaurants
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Restaurant {} not found", id)))
    }

    /// Hard delete a restaurant
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let rid = parse_id(TABLE, id)?;
        let deleted: Option<Restaurant> = self.base.db().delete(rid).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Restaurant {} not found", id)));
        }
        Ok(())
    }

    /// Write the derived rating aggregate; the only path that touches these fields
    pub async fn update_rating(
        &self,
        id: &str,
        average_rating: Decimal,
        review_count: u64,
    ) -> RepoResult<Restaurant> {
        let rid = parse_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $rid SET average_rating = $avg, review_count = $count, updated_at = $now RETURN AFTER",
            )
            .bind(("rid", rid))
            .bind(("avg", average_rating))
            .bind(("count", review_count))
            .bind(("now", Utc::now()))
            .await?;
        let restaurants: Vec<Restaurant> = result.take(0)?;
        restaurants
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Restaurant {} not found", id)))
    }
}
