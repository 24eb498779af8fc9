//! Room and material management routes

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use uuid::Uuid;

use crate::{
    error::ApiError,
    extract::{Json, Path},
    guards::{Requirement, guarded},
    models::{MaterialInput, Permission, RoomInput},
    state::AppState,
};

const READ_ALL: Requirement = Requirement::permissions(&[Permission::ReadAll]);
const ADD: Requirement = Requirement::permissions(&[Permission::Add]);
const DELETE: Requirement = Requirement::permissions(&[Permission::Delete]);

pub fn rooms(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/room/all", guarded(state, READ_ALL, get(get_all_rooms)))
        .route("/room/create", guarded(state, ADD, post(create_room)))
        .route(
            "/room/delete/:room_id",
            guarded(state, DELETE, delete(delete_room)),
        )
}

pub fn materials(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/material/all",
            guarded(state, READ_ALL, get(get_all_materials)),
        )
        .route("/material/create", guarded(state, ADD, post(create_material)))
        .route(
            "/material/delete/:material_id",
            guarded(state, DELETE, delete(delete_material)),
        )
}

/// Rooms ordered by name
pub async fn get_all_rooms(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rooms = state.inventory().get_all_rooms().await?;
    Ok(Json(rooms))
}

pub async fn create_room(
    State(state): State<AppState>,
    Json(payload): Json<RoomInput>,
) -> Result<impl IntoResponse, ApiError> {
    let room = state.inventory().create_room(payload).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

pub async fn delete_room(
    State(state): State<AppState>,
    Path(room_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.inventory().delete_room(room_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Materials ordered by name
pub async fn get_all_materials(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let materials = state.inventory().get_all_materials().await?;
    Ok(Json(materials))
}

pub async fn create_material(
    State(state): State<AppState>,
    Json(payload): Json<MaterialInput>,
) -> Result<impl IntoResponse, ApiError> {
    let material = state.inventory().create_material(payload).await?;
    Ok((StatusCode::CREATED, Json(material)))
}

pub async fn delete_material(
    State(state): State<AppState>,
    Path(material_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.inventory().delete_material(material_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
