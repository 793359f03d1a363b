//! Authentication Handlers
//!
//! Registration, login, profile access and the delivery personnel listing.

use std::time::Duration;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Role, User, UserContact, UserCreate, UserUpdate};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// POST /api/auth/register - create an account and log it in
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<AppResponse<AuthResponse>>> {
    payload.validate()?;

    let user = state.users.create(payload).await?;
    let user_id = user
        .id
        .as_ref()
        .map(ToString::to_string)
        .ok_or_else(|| AppError::Internal("User record without id".to_string()))?;

    let token = state
        .jwt_service
        .generate_token(&user_id, &user.name, user.role)
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(user = %user_id, role = %user.role, "user registered");
    Ok(ok_with_message(
        AuthResponse { token, user },
        "Registered successfully",
    ))
}

/// POST /api/auth/login - authenticate and issue a token
///
/// Unknown email and wrong password return the same error after the same
/// fixed delay, so responses leak nothing about which accounts exist.
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AppResponse<AuthResponse>>> {
    let user = state.users.find_by_email(&payload.email).await?;

    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(u) => {
            let password_valid = u.verify_password(&payload.password).map_err(|e| {
                AppError::Internal(format!("Password verification failed: {e}"))
            })?;
            if !password_valid {
                tracing::warn!(email = %payload.email, "login failed");
                return Err(AppError::invalid_credentials());
            }
            u
        }
        None => {
            tracing::warn!(email = %payload.email, "login failed");
            return Err(AppError::invalid_credentials());
        }
    };

    let user_id = user
        .id
        .as_ref()
        .map(ToString::to_string)
        .ok_or_else(|| AppError::Internal("User record without id".to_string()))?;
    let token = state
        .jwt_service
        .generate_token(&user_id, &user.name, user.role)
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(user = %user_id, role = %user.role, "user logged in");
    Ok(ok(AuthResponse { token, user }))
}

/// GET /api/auth/profile - the caller's profile
pub async fn get_profile(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<User>>> {
    let profile = state
        .users
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.id)))?;
    Ok(ok(profile))
}

/// PUT /api/auth/profile - update the caller's profile
///
/// The role is not part of the payload and can never change here.
pub async fn update_profile(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<AppResponse<User>>> {
    payload.validate()?;
    let updated = state.users.update(&user.id, payload).await?;
    Ok(ok(updated))
}

/// GET /api/auth/delivery-personnel - contact list for assignment pickers
pub async fn list_delivery_personnel(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Vec<UserContact>>>> {
    if !matches!(user.role, Role::RestaurantOwner | Role::Admin) {
        return Err(AppError::Forbidden(
            "Only restaurant owners and admins can list delivery personnel".to_string(),
        ));
    }
    let contacts = state
        .users
        .find_contacts_by_role(Role::DeliveryPersonnel)
        .await?;
    Ok(ok(contacts))
}
