//! Order Repository
//!
//! Orders are inserted once and mutated only through the checked status
//! writes below. The `WHERE status = $expected` guard implements the
//! compare-and-swap used by the lifecycle manager: an empty result on a row
//! that exists means the stored status moved underneath the caller.

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{Order, OrderStatus, PaymentStatus};
use chrono::{DateTime, Utc};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "orders";

/// Field assignments applied together with a status transition
#[derive(Debug, Clone, Default)]
pub struct StatusWrite {
    pub payment_status: Option<PaymentStatus>,
    pub delivery_personnel: Option<String>,
    pub actual_delivery_time: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Insert a new order
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let rid = parse_id(TABLE, id)?;
        let order: Option<Order> = self.base.db().select(rid).await?;
        Ok(order)
    }

    /// Customer's orders, newest first
    pub async fn find_by_customer(&self, customer_id: &str) -> RepoResult<Vec<Order>> {
        let customer = customer_id.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM orders WHERE customer = $customer ORDER BY created_at DESC")
            .bind(("customer", customer))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders)
    }

    /// Orders across a set of restaurants, newest first
    pub async fn find_by_restaurants(&self, restaurant_ids: Vec<String>) -> RepoResult<Vec<Order>> {
        if restaurant_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM orders WHERE restaurant IN $restaurants ORDER BY created_at DESC")
            .bind(("restaurants", restaurant_ids))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders)
    }

    /// Orders assigned to a delivery user, newest first
    pub async fn find_by_delivery_personnel(&self, user_id: &str) -> RepoResult<Vec<Order>> {
        let user = user_id.to_string();
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM orders WHERE delivery_personnel = $user ORDER BY created_at DESC",
            )
            .bind(("user", user))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders)
    }

    /// Pickup queue for a delivery user: unassigned ready orders plus their
    /// own in-flight assignments, oldest first for fair pickup ordering
    pub async fn delivery_queue(&self, user_id: &str) -> RepoResult<Vec<Order>> {
        let user = user_id.to_string();
        let mut result = self
            .base
            .db()
            .query(
                r#"SELECT * FROM orders WHERE
                    (status = 'ready_for_pickup'
                        AND (delivery_personnel = NONE OR delivery_personnel = NULL))
                    OR (delivery_personnel = $user
                        AND status IN ['ready_for_pickup', 'out_for_delivery'])
                ORDER BY created_at ASC"#,
            )
            .bind(("user", user))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders)
    }

    /// Compare-and-swap status transition
    ///
    /// Returns `Ok(None)` when the stored status no longer matches
    /// `expected` (lost race); the caller decides how to surface that.
    pub async fn update_status_checked(
        &self,
        id: &str,
        expected: OrderStatus,
        status: OrderStatus,
        write: StatusWrite,
    ) -> RepoResult<Option<Order>> {
        let rid = parse_id(TABLE, id)?;

        let mut set_parts = vec!["status = $status", "updated_at = $now"];
        if write.payment_status.is_some() {
            set_parts.push("payment_status = $payment_status");
        }
        if write.delivery_personnel.is_some() {
            set_parts.push("delivery_personnel = $delivery_personnel");
        }
        if write.actual_delivery_time.is_some() {
            set_parts.push("actual_delivery_time = $actual_delivery_time");
        }

        let query_str = format!(
            "UPDATE $rid SET {} WHERE status = $expected RETURN AFTER",
            set_parts.join(", ")
        );
        let mut query = self
            .base
            .db()
            .query(query_str)
            .bind(("rid", rid))
            .bind(("status", status))
            .bind(("expected", expected))
            .bind(("now", Utc::now()));

        if let Some(v) = write.payment_status {
            query = query.bind(("payment_status", v));
        }
        if let Some(v) = write.delivery_personnel {
            query = query.bind(("delivery_personnel", v));
        }
        if let Some(v) = write.actual_delivery_time {
            query = query.bind(("actual_delivery_time", v));
        }

        let mut result = query.await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Set the assigned delivery user, guarded by the assignable statuses
    ///
    /// Returns `Ok(None)` when the order is no longer in an assignable
    /// status at write time.
    pub async fn assign_delivery_checked(
        &self,
        id: &str,
        delivery_personnel: String,
    ) -> RepoResult<Option<Order>> {
        let rid = parse_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $rid SET delivery_personnel = $user, updated_at = $now
                WHERE status IN ['confirmed', 'ready_for_pickup'] RETURN AFTER"#,
            )
            .bind(("rid", rid))
            .bind(("user", delivery_personnel))
            .bind(("now", Utc::now()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }
}
