//! Review API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Review, ReviewCreate, ReviewUpdate};
use crate::utils::{AppResponse, AppResult, ok, ok_with_message};

/// POST /api/reviews - submit a review for a delivered order
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<Json<AppResponse<Review>>> {
    let review = state.reviews.submit(&user, payload).await?;
    Ok(ok_with_message(review, "Review submitted"))
}

/// GET /api/reviews/my-reviews - the caller's reviews
pub async fn my_reviews(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Vec<Review>>>> {
    let reviews = state.reviews.my_reviews(&user).await?;
    Ok(ok(reviews))
}

/// GET /api/reviews/restaurant/{id} - reviews for a restaurant, public
pub async fn list_for_restaurant(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Vec<Review>>>> {
    let reviews = state.reviews.for_restaurant(&id).await?;
    Ok(ok(reviews))
}

/// GET /api/reviews/{id} - single review, public
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Review>>> {
    let review = state.reviews.get(&id).await?;
    Ok(ok(review))
}

/// PUT /api/reviews/{id} - edit, review owner only
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ReviewUpdate>,
) -> AppResult<Json<AppResponse<Review>>> {
    let review = state.reviews.update(&user, &id, payload).await?;
    Ok(ok(review))
}

/// DELETE /api/reviews/{id} - delete, review owner or admin
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    state.reviews.delete(&user, &id).await?;
    Ok(ok_with_message((), "Review deleted"))
}
