//! Order Model
//!
//! Line items are snapshots taken at creation time; they never change even if
//! the source menu item is edited later. `total_price` is computed once at
//! creation and never recomputed.

use super::serde_helpers;
use crate::db::models::Address;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use surrealdb::RecordId;
use validator::Validate;

/// Order ID type
pub type OrderId = RecordId;

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order placed, awaiting restaurant confirmation
    Pending,
    /// Restaurant confirmed
    Confirmed,
    /// Food being prepared
    Preparing,
    /// Food ready for delivery personnel
    ReadyForPickup,
    /// Delivery personnel picked up
    OutForDelivery,
    /// Order successfully delivered
    Delivered,
    /// Cancelled by customer or restaurant
    Cancelled,
    /// Restaurant rejected the order
    Rejected,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::ReadyForPickup => "ready_for_pickup",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Rejected => "rejected",
        }
    }

    /// Terminal states have no outgoing edges in the transition graph
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered | OrderStatus::Cancelled | OrderStatus::Rejected
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    CashOnDelivery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

/// Line item snapshot embedded in an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(with = "serde_helpers::record_id")]
    pub menu_item: RecordId,
    /// Name at time of order
    pub name: String,
    pub quantity: u32,
    /// Unit price at time of order
    pub price: Decimal,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Order model matching the `orders` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<OrderId>,
    #[serde(with = "serde_helpers::record_id")]
    pub customer: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub delivery_personnel: Option<RecordId>,
    pub items: Vec<OrderItem>,
    pub total_price: Decimal,
    pub delivery_address: Address,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_delivery_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Requested line item at order creation; price and name come from the menu
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemRequest {
    pub menu_item_id: String,
    #[validate(range(min = 1))]
    pub quantity: u32,
}

/// Create order payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OrderCreate {
    pub restaurant_id: String,
    #[validate(length(min = 1), nested)]
    pub items: Vec<OrderItemRequest>,
    #[validate(nested)]
    pub delivery_address: Address,
    pub payment_method: PaymentMethod,
    pub order_notes: Option<String>,
    pub delivery_instructions: Option<String>,
}

/// Status update payload; an unknown status name fails deserialization,
/// which surfaces as a validation error
#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
    pub delivery_personnel_id: Option<String>,
}

/// Explicit assignment payload
#[derive(Debug, Clone, Deserialize)]
pub struct AssignDelivery {
    pub delivery_personnel_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_serde_matches_wire_names() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::ReadyForPickup).unwrap(),
            r#""ready_for_pickup""#
        );
        let status: OrderStatus = serde_json::from_str(r#""out_for_delivery""#).unwrap();
        assert_eq!(status, OrderStatus::OutForDelivery);
    }

    #[test]
    fn unknown_status_fails_deserialization() {
        let result = serde_json::from_str::<OrderStatusUpdate>(r#"{"status":"archived"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn terminal_states() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Rejected.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::OutForDelivery.is_terminal());
    }

    #[test]
    fn order_create_rejects_empty_and_zero_quantity_items() {
        let mut payload = OrderCreate {
            restaurant_id: "restaurants:r1".into(),
            items: vec![],
            delivery_address: Address {
                street: "12 Flinders Ln".into(),
                city: "Melbourne".into(),
                state: "VIC".into(),
                zip_code: "3000".into(),
                country: "Australia".into(),
            },
            payment_method: PaymentMethod::Card,
            order_notes: None,
            delivery_instructions: None,
        };
        assert!(payload.validate().is_err());

        payload.items = vec![OrderItemRequest {
            menu_item_id: "menu_items:m1".into(),
            quantity: 0,
        }];
        assert!(payload.validate().is_err());

        payload.items[0].quantity = 1;
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn line_total_multiplies_snapshot_price() {
        let item = OrderItem {
            menu_item: RecordId::from_table_key("menu_items", "x"),
            name: "Pad Thai".into(),
            quantity: 3,
            price: Decimal::from_str("12.50").unwrap(),
        };
        assert_eq!(item.line_total(), Decimal::from_str("37.50").unwrap());
    }
}
