//! Restaurant Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Restaurant ID type
pub type RestaurantId = RecordId;

/// Structured postal address, shared by restaurants and order deliveries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Address {
    #[validate(length(min = 1))]
    pub street: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub state: String,
    #[validate(length(min = 1))]
    pub zip_code: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "Australia".to_string()
}

/// Restaurant model matching the `restaurants` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RestaurantId>,
    #[serde(with = "serde_helpers::record_id")]
    pub owner: RecordId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub address: Address,
    pub cuisine_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default = "default_image")]
    pub image_url: String,
    #[serde(default = "default_true")]
    pub is_approved: bool,
    /// Derived from the review set, never edited directly
    #[serde(default)]
    pub average_rating: Decimal,
    /// Derived from the review set, never edited directly
    #[serde(default)]
    pub review_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_image() -> String {
    "https://via.placeholder.com/150".to_string()
}

fn default_true() -> bool {
    true
}

/// Create restaurant payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RestaurantCreate {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: Option<String>,
    #[validate(nested)]
    pub address: Address,
    #[validate(length(min = 1))]
    pub cuisine_types: Vec<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub image_url: Option<String>,
}

/// Update restaurant payload; rating fields are deliberately absent
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RestaurantUpdate {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(nested)]
    pub address: Option<Address>,
    pub cuisine_types: Option<Vec<String>>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_country_defaults_on_deserialize() {
        let addr: Address = serde_json::from_str(
            r#"{"street":"1 Pitt St","city":"Sydney","state":"NSW","zip_code":"2000"}"#,
        )
        .unwrap();
        assert_eq!(addr.country, "Australia");
    }

    #[test]
    fn address_rejects_empty_required_field() {
        let addr = Address {
            street: String::new(),
            city: "Sydney".into(),
            state: "NSW".into(),
            zip_code: "2000".into(),
            country: "Australia".into(),
        };
        assert!(addr.validate().is_err());
    }
}
