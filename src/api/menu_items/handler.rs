//! Menu Item API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{MenuItem, MenuItemUpdate};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// GET /api/menu-items/{id} - single menu item, public
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<MenuItem>>> {
    let item = state
        .menu_items
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Menu item {} not found", id)))?;
    Ok(ok(item))
}

/// PUT /api/menu-items/{id} - update, owning owner only
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<AppResponse<MenuItem>>> {
    payload.validate()?;
    if payload.price.is_some_and(|p| p < Decimal::ZERO) {
        return Err(AppError::Validation(
            "Price must not be negative".to_string(),
        ));
    }
    require_item_ownership(&state, &user, &id).await?;
    let item = state.menu_items.update(&id, payload).await?;
    Ok(ok(item))
}

/// DELETE /api/menu-items/{id} - delete, owning owner only
///
/// Orders keep their line item snapshots; deleting a menu item never
/// rewrites history.
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    require_item_ownership(&state, &user, &id).await?;
    state.menu_items.delete(&id).await?;
    tracing::info!(menu_item = %id, actor = %user.id, "menu item deleted");
    Ok(ok_with_message((), "Menu item deleted"))
}

/// Resolve the item's restaurant and check the caller owns it
async fn require_item_ownership(
    state: &ServerState,
    user: &CurrentUser,
    item_id: &str,
) -> AppResult<()> {
    let item = state
        .menu_items
        .find_by_id(item_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Menu item {} not found", item_id)))?;
    let restaurant = state
        .restaurants
        .find_by_id(&item.restaurant.to_string())
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Restaurant {} not found", item.restaurant))
        })?;
    if restaurant.owner.to_string() != user.id {
        return Err(AppError::Forbidden(
            "You do not own this menu item's restaurant".to_string(),
        ));
    }
    Ok(())
}
