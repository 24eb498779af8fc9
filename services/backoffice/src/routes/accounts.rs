//! Account management routes. Administrators only.

use axum::{
    Extension, Router,
    extract::State,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::ApiError,
    extract::{Json, Path, Query},
    guards::{Principal, Requirement, guarded},
    models::{AccountQuery, Permission, RolePermissions},
    state::AppState,
};

const READ: Requirement = Requirement::admin(&[Permission::Read]);
const READ_ALL: Requirement = Requirement::admin(&[Permission::ReadAll]);
const UPDATE: Requirement = Requirement::admin(&[Permission::Update]);
const DELETE: Requirement = Requirement::admin(&[Permission::Delete]);

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/account-state/:username",
            guarded(state, READ, get(account_state)),
        )
        .route(
            "/account-state/:username",
            guarded(state, UPDATE, post(update_account_state)),
        )
        .route(
            "/role-permissions",
            guarded(state, READ_ALL, get(get_role_permissions)),
        )
        .route(
            "/role-permissions",
            guarded(state, UPDATE, put(update_role_permissions)),
        )
        .route(
            "/all-accounts",
            guarded(state, READ_ALL, get(get_all_accounts)),
        )
        .route("/accounts", guarded(state, READ_ALL, get(find_accounts)))
        .route("/account/:id", guarded(state, READ, get(account_details)))
        .route(
            "/account/:id",
            guarded(state, DELETE, delete(delete_account)),
        )
}

/// Whether the account is active
pub async fn account_state(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let active = state.account_management().account_is_valid(&username).await?;
    Ok(Json(json!({ "username": username, "active": active })))
}

/// Toggle the account between active and inactive
pub async fn update_account_state(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let active = state
        .account_management()
        .update_account_state(&username)
        .await?;

    info!(by = %principal.username, %username, active, "Account state changed");
    Ok(Json(json!({ "username": username, "active": active })))
}

pub async fn get_role_permissions(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let records = state.account_management().get_role_permissions().await?;
    Ok(Json(records))
}

/// Replace the permission set of one role
pub async fn update_role_permissions(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<RolePermissions>,
) -> Result<impl IntoResponse, ApiError> {
    let permissions: Vec<Permission> = payload.permissions.iter().copied().collect();
    state
        .account_management()
        .update_role_permissions(payload.role, &permissions)
        .await?;

    info!(by = %principal.username, role = %payload.role, "Role permissions replaced");
    Ok(Json(json!({ "message": "Role permissions updated" })))
}

pub async fn get_all_accounts(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let accounts = state.account_management().get_all_accounts().await?;
    Ok(Json(accounts))
}

/// Paged account search
pub async fn find_accounts(
    State(state): State<AppState>,
    Query(query): Query<AccountQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state.account_management().find_all(&query).await?;
    Ok(Json(page))
}

pub async fn account_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let details = state.account_management().find_account_details(id).await?;
    Ok(Json(details))
}

/// Delete an inactive account
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.account_management().delete_account(id).await?;

    info!(by = %principal.username, %id, "Account deleted");
    Ok(Json(json!({ "message": "Account deleted" })))
}
