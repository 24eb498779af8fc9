//! Route guards
//!
//! Every protected route is registered through [`guarded`] with a static
//! [`Requirement`]. The [`authorize`] middleware resolves the caller from the
//! bearer token, re-reads the account and the permission set of its role,
//! and only then lets the request through with a [`Principal`] attached to
//! the request extensions.

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use std::collections::BTreeSet;
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;
use crate::jwt::TokenType;
use crate::models::{Permission, Role, RolePermissions};
use crate::state::AppState;

/// Roles and permissions a route demands.
///
/// An empty `roles` slice accepts any role. Every listed permission must be
/// granted to the caller's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    pub roles: &'static [Role],
    pub permissions: &'static [Permission],
}

impl Requirement {
    pub const fn new(roles: &'static [Role], permissions: &'static [Permission]) -> Self {
        Self { roles, permissions }
    }

    /// Any role holding the given permissions
    pub const fn permissions(permissions: &'static [Permission]) -> Self {
        Self::new(&[], permissions)
    }

    /// Administrators holding the given permissions
    pub const fn admin(permissions: &'static [Permission]) -> Self {
        Self::new(&[Role::Admin], permissions)
    }

    /// Whether the holder of `record` may pass
    pub fn allows(&self, record: &RolePermissions) -> bool {
        (self.roles.is_empty() || self.roles.contains(&record.role))
            && record.grants_all(self.permissions)
    }
}

/// The authenticated caller of a guarded route
#[derive(Debug, Clone)]
pub struct Principal {
    pub account_id: Uuid,
    pub username: String,
    pub role: Role,
    pub permissions: BTreeSet<Permission>,
}

#[derive(Clone)]
pub struct GuardState {
    app: AppState,
    requirement: Requirement,
}

/// Protect a method router with `requirement`
pub fn guarded(
    state: &AppState,
    requirement: Requirement,
    method_router: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    let guard = GuardState {
        app: state.clone(),
        requirement,
    };
    method_router.route_layer(middleware::from_fn_with_state(guard, authorize))
}

/// Authorization middleware
pub async fn authorize(
    State(guard): State<GuardState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) =
        bearer.ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

    let claims = guard
        .app
        .jwt_service
        .validate_token(bearer.token())
        .map_err(|e| {
            warn!("Rejected token: {}", e);
            ApiError::Unauthorized("invalid token".to_string())
        })?;

    if claims.token_type != TokenType::Access {
        return Err(ApiError::Unauthorized("invalid token".to_string()));
    }

    let account = guard
        .app
        .accounts
        .find_account_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("account no longer exists".to_string()))?;

    if !account.active {
        return Err(ApiError::Forbidden("account is not active".to_string()));
    }

    let record = guard
        .app
        .role_permissions
        .find_role_permissions(account.role)
        .await?
        .unwrap_or_else(|| RolePermissions::new(account.role, []));

    if !guard.requirement.allows(&record) {
        warn!(
            username = %account.username,
            role = %account.role,
            path = %req.uri().path(),
            "Access denied"
        );
        return Err(ApiError::Forbidden("access denied".to_string()));
    }

    req.extensions_mut().insert(Principal {
        account_id: account.id,
        username: account.username,
        role: account.role,
        permissions: record.permissions,
    });

    Ok(next.run(req).await)
}
