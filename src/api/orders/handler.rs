//! Order API Handlers
//!
//! Thin wrappers over [`crate::orders::OrderManager`]; every authorization
//! and lifecycle rule lives there, not here.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{AssignDelivery, Order, OrderCreate, OrderStatusUpdate};
use crate::utils::{AppResponse, AppResult, ok, ok_with_message};

/// POST /api/orders - place an order, customer only
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.create_order(&user, payload).await?;
    Ok(ok_with_message(order, "Order placed"))
}

/// GET /api/orders/my-orders - the caller's orders, scoped by role
pub async fn my_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let orders = state.orders.my_orders(&user).await?;
    Ok(ok(orders))
}

/// GET /api/orders/delivery-queue - pickup queue, delivery personnel only
pub async fn delivery_queue(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let orders = state.orders.delivery_queue(&user).await?;
    Ok(ok(orders))
}

/// GET /api/orders/{id} - single order, participants and admins
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.get_order(&user, &id).await?;
    Ok(ok(order))
}

/// PUT /api/orders/{id}/status - role-gated status transition
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.update_status(&user, &id, payload).await?;
    Ok(ok(order))
}

/// PUT /api/orders/{id}/cancel - customer cancellation
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.cancel(&user, &id).await?;
    Ok(ok_with_message(order, "Order cancelled"))
}

/// PUT /api/orders/{id}/assign-delivery - explicit assignment
pub async fn assign_delivery(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<AssignDelivery>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.assign_delivery(&user, &id, payload).await?;
    Ok(ok(order))
}
