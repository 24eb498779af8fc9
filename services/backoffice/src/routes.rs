//! Back office HTTP routes

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;

use crate::state::AppState;

pub mod accounts;
pub mod auth;
pub mod inventory;
pub mod material_room;
pub mod skills;

/// Create the router for the back office service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/auth", auth::router())
        .nest("/account-management", accounts::router(&state))
        .nest("/skill-management", skills::router(&state))
        .nest("/room-management", inventory::rooms(&state))
        .nest("/material-management", inventory::materials(&state))
        .nest("/useMaterialRoom", material_room::router(&state))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let Some(pool) = &state.db_pool else {
        return (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "backoffice",
                "database": "in-memory"
            })),
        );
    };

    if common::health_check(pool).await.unwrap_or(false) {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "backoffice",
                "database": "up"
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "service": "backoffice",
                "database": "down"
            })),
        )
    }
}
