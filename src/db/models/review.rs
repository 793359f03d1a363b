//! Review Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Review ID type
pub type ReviewId = RecordId;

/// Review model matching the `reviews` table
///
/// At most one review exists per (customer, order) pair, enforced by a unique
/// index. The delivery personnel reference is copied from the order at
/// submission time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<ReviewId>,
    #[serde(with = "serde_helpers::record_id")]
    pub customer: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub order: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub delivery_personnel: Option<RecordId>,
    /// 1-5, required
    pub restaurant_rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_comment: Option<String>,
    /// 1-5, optional
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Submit review payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewCreate {
    pub order_id: String,
    #[validate(range(min = 1, max = 5))]
    pub restaurant_rating: u8,
    pub restaurant_comment: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub delivery_rating: Option<u8>,
    pub delivery_comment: Option<String>,
}

/// Update review payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewUpdate {
    #[validate(range(min = 1, max = 5))]
    pub restaurant_rating: Option<u8>,
    pub restaurant_comment: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub delivery_rating: Option<u8>,
    pub delivery_comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_payload_validates_rating_range() {
        let ok = ReviewCreate {
            order_id: "orders:a".into(),
            restaurant_rating: 5,
            restaurant_comment: None,
            delivery_rating: Some(1),
            delivery_comment: None,
        };
        assert!(ok.validate().is_ok());

        let bad = ReviewCreate {
            order_id: "orders:a".into(),
            restaurant_rating: 6,
            restaurant_comment: None,
            delivery_rating: None,
            delivery_comment: None,
        };
        assert!(bad.validate().is_err());

        let zero = ReviewCreate {
            order_id: "orders:a".into(),
            restaurant_rating: 0,
            restaurant_comment: None,
            delivery_rating: None,
            delivery_comment: None,
        };
        assert!(zero.validate().is_err());
    }
}
