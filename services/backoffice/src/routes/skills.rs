//! Skill management routes

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
    extract::{Json, Path, Query},
    guards::{Requirement, guarded},
    models::{Permission, PlanningSession, SkillInput, SkillQuery},
    state::AppState,
};

const READ_ALL: Requirement = Requirement::permissions(&[Permission::ReadAll]);
const ADD: Requirement = Requirement::permissions(&[Permission::Add]);
const UPDATE: Requirement = Requirement::permissions(&[Permission::Update]);
const DELETE: Requirement = Requirement::permissions(&[Permission::Delete]);

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/skill/all", guarded(state, READ_ALL, get(get_all_skills)))
        .route("/skill/create", guarded(state, ADD, post(create_skill)))
        .route("/skill/update", guarded(state, UPDATE, post(update_skill)))
        .route(
            "/skill/training/add",
            guarded(state, ADD, post(add_training_session)),
        )
        .route(
            "/skill/delete/:skill_id",
            guarded(state, DELETE, delete(delete_skill)),
        )
}

/// Paged list of skills, optionally filtered by name
pub async fn get_all_skills(
    State(state): State<AppState>,
    Query(query): Query<SkillQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state.skills().get_all_skills(&query).await?;
    Ok(Json(page))
}

pub async fn create_skill(
    State(state): State<AppState>,
    Json(payload): Json<SkillInput>,
) -> Result<impl IntoResponse, ApiError> {
    let skill = state.skills().create_skill(payload).await?;
    Ok((StatusCode::CREATED, Json(skill)))
}

pub async fn update_skill(
    State(state): State<AppState>,
    Json(payload): Json<SkillInput>,
) -> Result<impl IntoResponse, ApiError> {
    let skill = state.skills().update_skill(payload).await?;
    Ok(Json(skill))
}

/// Plan a training session for a teacher
pub async fn add_training_session(
    State(state): State<AppState>,
    Json(payload): Json<PlanningSession>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.skills().plan_training(payload).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn delete_skill(
    State(state): State<AppState>,
    Path(skill_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.skills().delete_skill(skill_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
