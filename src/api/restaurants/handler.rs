//! Restaurant API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    MenuItem, MenuItemCreate, Restaurant, RestaurantCreate, RestaurantUpdate, Role,
};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// GET /api/restaurants - approved restaurants, public
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<Restaurant>>>> {
    let restaurants = state.restaurants.find_all_approved().await?;
    Ok(ok(restaurants))
}

/// GET /api/restaurants/my-restaurants - the owner's restaurants
pub async fn my_restaurants(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Vec<Restaurant>>>> {
    if user.role != Role::RestaurantOwner {
        return Err(AppError::Forbidden(
            "Only restaurant owners have a restaurant listing".to_string(),
        ));
    }
    let restaurants = state.restaurants.find_by_owner(&user.id).await?;
    Ok(ok(restaurants))
}

/// GET /api/restaurants/{id} - single restaurant, public
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Restaurant>>> {
    let restaurant = state
        .restaurants
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Restaurant {} not found", id)))?;
    Ok(ok(restaurant))
}

/// POST /api/restaurants - create a restaurant, owner only
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<RestaurantCreate>,
) -> AppResult<Json<AppResponse<Restaurant>>> {
    if user.role != Role::RestaurantOwner {
        return Err(AppError::Forbidden(
            "Only restaurant owners can create restaurants".to_string(),
        ));
    }
    payload.validate()?;

    let restaurant = state.restaurants.create(&user.id, payload).await?;
    tracing::info!(
        restaurant = %restaurant.id.as_ref().map(ToString::to_string).unwrap_or_default(),
        owner = %user.id,
        "restaurant created"
    );
    Ok(ok_with_message(restaurant, "Restaurant created"))
}

/// PUT /api/restaurants/{id} - update, owning owner only
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<RestaurantUpdate>,
) -> AppResult<Json<AppResponse<Restaurant>>> {
    payload.validate()?;
    require_ownership(&state, &user, &id, false).await?;
    let restaurant = state.restaurants.update(&id, payload).await?;
    Ok(ok(restaurant))
}

/// DELETE /api/restaurants/{id} - delete, owning owner or admin
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    require_ownership(&state, &user, &id, true).await?;
    state.restaurants.delete(&id).await?;
    tracing::info!(restaurant = %id, actor = %user.id, "restaurant deleted");
    Ok(ok_with_message((), "Restaurant deleted"))
}

/// GET /api/restaurants/{id}/menu - menu listing, public
pub async fn list_menu(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Vec<MenuItem>>>> {
    // 404 for unknown restaurants rather than an empty menu
    state
        .restaurants
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Restaurant {} not found", id)))?;
    let items = state.menu_items.find_by_restaurant(&id).await?;
    Ok(ok(items))
}

/// POST /api/restaurants/{id}/menu - add a menu item, owning owner only
pub async fn create_menu_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<AppResponse<MenuItem>>> {
    payload.validate()?;
    if payload.price < Decimal::ZERO {
        return Err(AppError::Validation(
            "Price must not be negative".to_string(),
        ));
    }
    require_ownership(&state, &user, &id, false).await?;
    let item = state.menu_items.create(&id, payload).await?;
    Ok(ok_with_message(item, "Menu item created"))
}

/// Check the caller owns the restaurant, optionally letting admins through
async fn require_ownership(
    state: &ServerState,
    user: &CurrentUser,
    restaurant_id: &str,
    allow_admin: bool,
) -> AppResult<()> {
    if allow_admin && user.is_admin() {
        return Ok(());
    }
    let restaurant = state
        .restaurants
        .find_by_id(restaurant_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Restaurant {} not found", restaurant_id)))?;
    if restaurant.owner.to_string() != user.id {
        return Err(AppError::Forbidden(
            "You do not own this restaurant".to_string(),
        ));
    }
    Ok(())
}
