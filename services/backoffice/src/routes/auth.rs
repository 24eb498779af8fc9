//! Public authentication routes

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use tracing::info;

use crate::{
    error::ApiError,
    extract::Json,
    state::AppState,
    usecases::{LoginRequest, RefreshTokenRequest, SignUpRequest},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(sign_up))
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
}

/// Register a new, inactive account
pub async fn sign_up(
    State(state): State<AppState>,
    Json(payload): Json<SignUpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state.auth().sign_up(payload).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Login attempt for user: {}", payload.username);

    let tokens = state
        .auth()
        .login(&payload.username, &payload.password)
        .await?;
    Ok(Json(tokens))
}

/// Refresh token endpoint
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = state.auth().refresh(&payload.refresh_token).await?;
    Ok(Json(token))
}
