//! Material-to-room assignment routes

use axum::{
    Router,
    extract::State,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::ApiError,
    extract::{Json, Path, Query},
    guards::{Requirement, guarded},
    models::{MaterialRoomKey, MaterialRoomUsageUpdate, MaterialUsageInput, Permission},
    state::AppState,
};

const ADD: Requirement = Requirement::permissions(&[Permission::Add]);
const READ: Requirement = Requirement::permissions(&[Permission::Read]);
const READ_ALL: Requirement = Requirement::permissions(&[Permission::ReadAll]);
const ADMIN_UPDATE: Requirement = Requirement::admin(&[Permission::Update]);
const ADMIN_DELETE: Requirement = Requirement::admin(&[Permission::Delete]);

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/insert/:id_room/:id_material",
            guarded(state, ADD, post(insert)),
        )
        .route("/delete", guarded(state, ADMIN_DELETE, delete(remove)))
        .route("/getOne", guarded(state, READ, get(get_one)))
        .route("/getAll", guarded(state, READ_ALL, get(get_all)))
        .route("/update", guarded(state, ADMIN_UPDATE, post(update)))
}

/// Assign a quantity of a material to a room
pub async fn insert(
    State(state): State<AppState>,
    Path((room_id, material_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<MaterialUsageInput>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .material_rooms()
        .insert(payload, room_id, material_id)
        .await?;
    Ok(Json(json!({ "message": "Material successfully added on room" })))
}

pub async fn remove(
    State(state): State<AppState>,
    Query(key): Query<MaterialRoomKey>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .material_rooms()
        .delete(key.room_id, key.material_id)
        .await?;
    Ok(Json(json!({ "message": "Material successfully removed on room" })))
}

pub async fn get_one(
    State(state): State<AppState>,
    Query(key): Query<MaterialRoomKey>,
) -> Result<impl IntoResponse, ApiError> {
    let usage = state
        .material_rooms()
        .get(key.room_id, key.material_id)
        .await?;
    Ok(Json(usage))
}

pub async fn get_all(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let usages = state.material_rooms().get_all().await?;
    Ok(Json(usages))
}

pub async fn update(
    State(state): State<AppState>,
    Json(payload): Json<MaterialRoomUsageUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    state.material_rooms().update(payload).await?;
    Ok(Json(json!({ "message": "Material successfully updated on room" })))
}
