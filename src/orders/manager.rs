//! Order lifecycle manager
//!
//! Coordinates the pure transition rules with the repositories: reads the
//! order, checks the caller's relation to it, authorizes the move, then
//! applies it with a compare-and-swap write so a concurrent transition
//! surfaces as a conflict instead of a lost update.

use crate::auth::CurrentUser;
use crate::db::models::{
    AssignDelivery, Order, OrderCreate, OrderItem, OrderStatus, OrderStatusUpdate, PaymentMethod,
    PaymentStatus, Role,
};
use crate::db::repository::{
    MenuItemRepository, OrderRepository, RestaurantRepository, StatusWrite, UserRepository,
    parse_id,
};
use crate::orders::transition::{TransitionEffects, authorize_cancel, authorize_transition};
use crate::utils::{AppError, AppResult};
use chrono::Utc;
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use validator::Validate;

#[derive(Clone)]
pub struct OrderManager {
    orders: OrderRepository,
    menu_items: MenuItemRepository,
    restaurants: RestaurantRepository,
    users: UserRepository,
}

impl OrderManager {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            menu_items: MenuItemRepository::new(db.clone()),
            restaurants: RestaurantRepository::new(db.clone()),
            users: UserRepository::new(db),
        }
    }

    /// Place a new order
    ///
    /// Customers only. Every requested menu item is resolved against the
    /// target restaurant's live menu; the order stores name and price
    /// snapshots so later menu edits never change a placed order.
    pub async fn create_order(&self, user: &CurrentUser, data: OrderCreate) -> AppResult<Order> {
        if user.role != Role::Customer {
            return Err(AppError::Forbidden(
                "Only customers can place orders".to_string(),
            ));
        }
        data.validate()?;

        let restaurant = self
            .restaurants
            .find_by_id(&data.restaurant_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Restaurant {} not found", data.restaurant_id))
            })?;
        let restaurant_id = restaurant
            .id
            .clone()
            .ok_or_else(|| AppError::Internal("Restaurant record without id".to_string()))?;

        let mut items = Vec::with_capacity(data.items.len());
        let mut total_price = Decimal::ZERO;
        for request in &data.items {
            let item = self
                .menu_items
                .find_by_id(&request.menu_item_id)
                .await?
                .ok_or_else(|| {
                    AppError::Validation(format!("Menu item {} not found", request.menu_item_id))
                })?;

            if item.restaurant != restaurant_id {
                return Err(AppError::Validation(format!(
                    "Menu item {} does not belong to restaurant {}",
                    request.menu_item_id, data.restaurant_id
                )));
            }
            if !item.is_available {
                return Err(AppError::Validation(format!(
                    "Menu item '{}' is currently unavailable",
                    item.name
                )));
            }

            let snapshot = OrderItem {
                menu_item: item
                    .id
                    .ok_or_else(|| AppError::Internal("Menu item record without id".to_string()))?,
                name: item.name,
                quantity: request.quantity,
                price: item.price,
            };
            total_price += snapshot.line_total();
            items.push(snapshot);
        }

        let payment_status = match data.payment_method {
            PaymentMethod::Card => PaymentStatus::Paid,
            PaymentMethod::CashOnDelivery => PaymentStatus::Pending,
        };

        let now = Utc::now();
        let order = Order {
            id: None,
            customer: parse_id("users", &user.id)?,
            restaurant: restaurant_id,
            delivery_personnel: None,
            items,
            total_price,
            delivery_address: data.delivery_address,
            status: OrderStatus::Pending,
            payment_method: data.payment_method,
            payment_status,
            order_notes: data.order_notes,
            delivery_instructions: data.delivery_instructions,
            estimated_delivery_time: None,
            actual_delivery_time: None,
            created_at: now,
            updated_at: now,
        };

        let created = self.orders.create(order).await?;
        tracing::info!(
            order = %created.id.as_ref().map(ToString::to_string).unwrap_or_default(),
            customer = %user.id,
            total = %created.total_price,
            "order placed"
        );
        Ok(created)
    }

    /// Fetch one order, visible only to its participants and admins
    pub async fn get_order(&self, user: &CurrentUser, id: &str) -> AppResult<Order> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))?;

        if self.is_participant(user, &order).await? {
            Ok(order)
        } else {
            Err(AppError::Forbidden(
                "You are not a participant in this order".to_string(),
            ))
        }
    }

    /// The caller's orders, scoped by role
    pub async fn my_orders(&self, user: &CurrentUser) -> AppResult<Vec<Order>> {
        match user.role {
            Role::Customer => Ok(self.orders.find_by_customer(&user.id).await?),
            Role::RestaurantOwner => {
                let restaurants = self.restaurants.find_by_owner(&user.id).await?;
                let ids = restaurants
                    .into_iter()
                    .filter_map(|r| r.id.map(|id| id.to_string()))
                    .collect();
                Ok(self.orders.find_by_restaurants(ids).await?)
            }
            Role::DeliveryPersonnel => Ok(self.orders.find_by_delivery_personnel(&user.id).await?),
            Role::Admin => Err(AppError::Forbidden(
                "Admins have no personal order listing".to_string(),
            )),
        }
    }

    /// Pickup queue for delivery personnel
    pub async fn delivery_queue(&self, user: &CurrentUser) -> AppResult<Vec<Order>> {
        if user.role != Role::DeliveryPersonnel {
            return Err(AppError::Forbidden(
                "Only delivery personnel can view the delivery queue".to_string(),
            ));
        }
        Ok(self.orders.delivery_queue(&user.id).await?)
    }

    /// Role-gated status transition with compare-and-swap semantics
    pub async fn update_status(
        &self,
        user: &CurrentUser,
        id: &str,
        update: OrderStatusUpdate,
    ) -> AppResult<Order> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))?;

        self.check_transition_relation(user, &order).await?;
        let effects = authorize_transition(user.role, order.status, update.status)?;

        let mut write = self.effects_to_write(effects);
        if let Some(ref personnel_id) = update.delivery_personnel_id {
            if !matches!(
                update.status,
                OrderStatus::Confirmed | OrderStatus::ReadyForPickup
            ) {
                return Err(AppError::Validation(format!(
                    "Delivery personnel cannot be assigned while moving to status {}",
                    update.status
                )));
            }
            write.delivery_personnel = Some(self.resolve_delivery_personnel(personnel_id).await?);
        }

        let updated = self
            .orders
            .update_status_checked(id, order.status, update.status, write)
            .await?
            .ok_or_else(|| {
                AppError::Conflict(format!(
                    "Order {} changed status concurrently, re-read and retry",
                    id
                ))
            })?;

        tracing::info!(
            order = %id,
            from = %order.status,
            to = %update.status,
            actor = %user.id,
            "order status updated"
        );
        Ok(updated)
    }

    /// Customer cancellation, allowed while pending or confirmed
    pub async fn cancel(&self, user: &CurrentUser, id: &str) -> AppResult<Order> {
        if user.role != Role::Customer {
            return Err(AppError::Forbidden(
                "Only customers can cancel their own orders".to_string(),
            ));
        }

        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))?;
        if order.customer.to_string() != user.id {
            return Err(AppError::Forbidden(
                "You can only cancel your own orders".to_string(),
            ));
        }

        let effects = authorize_cancel(order.status)?;
        let write = self.effects_to_write(effects);

        let updated = self
            .orders
            .update_status_checked(id, order.status, OrderStatus::Cancelled, write)
            .await?
            .ok_or_else(|| {
                AppError::Conflict(format!(
                    "Order {} changed status concurrently, re-read and retry",
                    id
                ))
            })?;

        tracing::info!(order = %id, customer = %user.id, "order cancelled by customer");
        Ok(updated)
    }

    /// Explicit delivery assignment by the owning restaurant's owner or an admin
    pub async fn assign_delivery(
        &self,
        user: &CurrentUser,
        id: &str,
        data: AssignDelivery,
    ) -> AppResult<Order> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))?;

        match user.role {
            Role::Admin => {}
            Role::RestaurantOwner => {
                if !self.owns_restaurant(user, &order).await? {
                    return Err(AppError::Forbidden(
                        "You do not own this order's restaurant".to_string(),
                    ));
                }
            }
            _ => {
                return Err(AppError::Forbidden(
                    "Only restaurant owners and admins can assign delivery personnel".to_string(),
                ));
            }
        }

        let personnel = self
            .resolve_delivery_personnel(&data.delivery_personnel_id)
            .await?;

        let updated = self
            .orders
            .assign_delivery_checked(id, personnel.clone())
            .await?
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Order in status {} cannot be assigned delivery personnel",
                    order.status
                ))
            })?;

        tracing::info!(order = %id, personnel = %personnel, actor = %user.id, "delivery assigned");
        Ok(updated)
    }

    /// Verify the relation a role needs before it may transition an order
    async fn check_transition_relation(&self, user: &CurrentUser, order: &Order) -> AppResult<()> {
        match user.role {
            Role::Admin => Ok(()),
            Role::RestaurantOwner => {
                if self.owns_restaurant(user, order).await? {
                    Ok(())
                } else {
                    Err(AppError::Forbidden(
                        "You do not own this order's restaurant".to_string(),
                    ))
                }
            }
            Role::DeliveryPersonnel => {
                let assigned = order
                    .delivery_personnel
                    .as_ref()
                    .is_some_and(|p| p.to_string() == user.id);
                if assigned {
                    Ok(())
                } else {
                    Err(AppError::Forbidden(
                        "You are not assigned to this order".to_string(),
                    ))
                }
            }
            Role::Customer => Err(AppError::Forbidden(
                "Customers cannot update order status".to_string(),
            )),
        }
    }

    async fn owns_restaurant(&self, user: &CurrentUser, order: &Order) -> AppResult<bool> {
        let restaurant = self
            .restaurants
            .find_by_id(&order.restaurant.to_string())
            .await?;
        Ok(restaurant.is_some_and(|r| r.owner.to_string() == user.id))
    }

    /// Check the caller may see the order at all
    async fn is_participant(&self, user: &CurrentUser, order: &Order) -> AppResult<bool> {
        if user.is_admin() || order.customer.to_string() == user.id {
            return Ok(true);
        }
        if order
            .delivery_personnel
            .as_ref()
            .is_some_and(|p| p.to_string() == user.id)
        {
            return Ok(true);
        }
        if user.role == Role::RestaurantOwner {
            return self.owns_restaurant(user, order).await;
        }
        Ok(false)
    }

    /// Turn pure transition effects into the repository write
    ///
    /// Rejection and cancellation always mark the payment refunded,
    /// regardless of payment method.
    fn effects_to_write(&self, effects: TransitionEffects) -> StatusWrite {
        StatusWrite {
            payment_status: effects.refund.then_some(PaymentStatus::Refunded),
            delivery_personnel: None,
            actual_delivery_time: effects.mark_delivered.then(Utc::now),
        }
    }

    /// Resolve an id to an existing delivery-personnel user, normalized to
    /// the stored "users:id" form
    async fn resolve_delivery_personnel(&self, id: &str) -> AppResult<String> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Validation(format!("User {} not found", id)))?;
        if user.role != Role::DeliveryPersonnel {
            return Err(AppError::Validation(format!(
                "User {} is not delivery personnel",
                id
            )));
        }
        Ok(parse_id("users", id)?.to_string())
    }
}
