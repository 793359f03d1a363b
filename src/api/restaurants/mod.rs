//! Restaurant API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Restaurant router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/restaurants", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/my-restaurants", get(handler::my_restaurants))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route(
            "/{id}/menu",
            get(handler::list_menu).post(handler::create_menu_item),
        )
}
