//! Startup seeding
//!
//! Sign-up only ever creates inactive accounts and only an administrator can
//! activate one, so a fresh database needs an administrator seeded from
//! configuration along with a permission record for the `Admin` role.

use tracing::info;

use crate::config::BootstrapConfig;
use crate::models::{Permission, Role};
use crate::state::AppState;
use crate::usecases::{SignUpRequest, UseCaseResult};

pub async fn run(state: &AppState, config: &BootstrapConfig) -> UseCaseResult<()> {
    seed_admin_permissions(state).await?;

    if let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) {
        seed_admin_account(state, username, password).await?;
    }

    Ok(())
}

/// Grant every permission to `Admin` unless a record already exists
async fn seed_admin_permissions(state: &AppState) -> UseCaseResult<()> {
    if state
        .role_permissions
        .find_role_permissions(Role::Admin)
        .await?
        .is_some()
    {
        return Ok(());
    }

    state
        .account_management()
        .update_role_permissions(Role::Admin, &Permission::ALL)
        .await?;
    info!("Seeded permissions for the Admin role");
    Ok(())
}

/// Create and activate the configured administrator if it does not exist yet
async fn seed_admin_account(
    state: &AppState,
    username: &str,
    password: &str,
) -> UseCaseResult<()> {
    if state.accounts.get_account_by_username(username).await?.is_some() {
        return Ok(());
    }

    state
        .auth()
        .sign_up(SignUpRequest {
            username: username.to_string(),
            password: password.to_string(),
            firstname: "Admin".to_string(),
            lastname: "Admin".to_string(),
            birth_date: "1970-01-01".to_string(),
            birth_place: "Unknown".to_string(),
            role: Role::Admin,
            formation_mode: None,
        })
        .await?;
    state.accounts.update_account_state(username, true).await?;

    info!(username, "Seeded administrator account");
    Ok(())
}
