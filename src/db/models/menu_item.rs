//! Menu Item Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Menu item ID type
pub type MenuItemId = RecordId;

/// Menu item model matching the `menu_items` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<MenuItemId>,
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Decimal,
    /// e.g. "Appetizer", "Main Course", "Dessert", "Drink"
    pub category: String,
    #[serde(default = "default_image")]
    pub image_url: String,
    #[serde(default = "default_true")]
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_image() -> String {
    "https://via.placeholder.com/100".to_string()
}

fn default_true() -> bool {
    true
}

/// Create menu item payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MenuItemCreate {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: Option<String>,
    /// Must be non-negative, checked by the handler
    pub price: Decimal,
    #[validate(length(min = 1))]
    pub category: String,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
}

/// Update menu item payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MenuItemUpdate {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    #[validate(length(min = 1))]
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
}
