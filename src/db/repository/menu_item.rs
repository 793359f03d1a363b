//! Menu Item Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "menu_items";

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All menu items for one restaurant
    pub async fn find_by_restaurant(&self, restaurant_id: &str) -> RepoResult<Vec<MenuItem>> {
        let restaurant = parse_id("restaurants", restaurant_id)?.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM menu_items WHERE restaurant = $restaurant ORDER BY category, name")
            .bind(("restaurant", restaurant))
            .await?;
        let items: Vec<MenuItem> = result.take(0)?;
        Ok(items)
    }

    /// Find menu item by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MenuItem>> {
        let rid = parse_id(TABLE, id)?;
        let item: Option<MenuItem> = self.base.db().select(rid).await?;
        Ok(item)
    }

    /// Create a menu item under the given restaurant
    pub async fn create(&self, restaurant_id: &str, data: MenuItemCreate) -> RepoResult<MenuItem> {
        let restaurant = parse_id("restaurants", restaurant_id)?;
        let now = Utc::now();
        let item = MenuItem {
            id: None,
            restaurant,
            name: data.name,
            description: data.description,
            price: data.price,
            category: data.category,
            image_url: data
                .image_url
                .unwrap_or_else(|| "https://via.placeholder.com/100".to_string()),
            is_available: data.is_available.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };

        let created: Option<MenuItem> = self.base.db().create(TABLE).content(item).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }

    /// Update a menu item
    pub async fn update(&self, id: &str, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        let rid = parse_id(TABLE, id)?;

        let mut set_parts = vec!["updated_at = $now"];
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.description.is_some() {
            set_parts.push("description = $description");
        }
        if data.price.is_some() {
            set_parts.push("price = $price");
        }
        if data.category.is_some() {
            set_parts.push("category = $category");
        }
        if data.image_url.is_some() {
            set_parts.push("image_url = $image_url");
        }
        if data.is_available.is_some() {
            set_parts.push("is_available = $is_available");
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
        if let Some(v) = data.price {
            query = query.bind(("price", v));
        }
        if let Some(v) = data.category {
            query = query.bind(("category", v));
        }
        if let Some(v) = data.image_url {
            query = query.bind(("image_url", v));
        }
        if let Some(v) = data.is_available {
            query = query.bind(("is_available", v));
        }

        let mut result = query.await?;
        let items: Vec<MenuItem> = result.take(0)?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    /// Hard delete a menu item; existing order snapshots are unaffected
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let rid = parse_id(TABLE, id)?;
        let deleted: Option<MenuItem> = self.base.db().delete(rid).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Menu item {} not found", id)));
        }
        Ok(())
    }
}
