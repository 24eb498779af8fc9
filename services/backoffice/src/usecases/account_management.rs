//! Account lifecycle and role-permission management

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use super::error::{UseCaseError, UseCaseResult};
use crate::models::{
    AccountDetails, AccountQuery, AccountSummary, Page, Permission, Role, RolePermissions,
};
use crate::repositories::{AccountRepository, RolePermissionsRepository};

const ACCOUNT_NOT_FOUND: &str = "Account not found";
const ACCOUNT_ACTIVE: &str = "account is active and cannot be deleted";

/// Account management use cases.
///
/// Accounts move between two states, inactive (after sign-up) and active.
/// [`update_account_state`](Self::update_account_state) is the only
/// transition and deletion is only legal from the inactive state.
#[derive(Clone)]
pub struct AccountManagementUseCases {
    accounts: Arc<dyn AccountRepository>,
    role_permissions: Arc<dyn RolePermissionsRepository>,
}

impl AccountManagementUseCases {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        role_permissions: Arc<dyn RolePermissionsRepository>,
    ) -> Self {
        Self {
            accounts,
            role_permissions,
        }
    }

    /// Whether the account is active
    pub async fn account_is_valid(&self, username: &str) -> UseCaseResult<bool> {
        let account = self.accounts.get_account_by_username(username).await?;
        match account {
            Some(account) => Ok(account.active),
            None => {
                error!(operation = "account_is_valid", "{}", ACCOUNT_NOT_FOUND);
                Err(UseCaseError::NotFound(ACCOUNT_NOT_FOUND.to_string()))
            }
        }
    }

    /// Flip the account between active and inactive and return the new state
    pub async fn update_account_state(&self, username: &str) -> UseCaseResult<bool> {
        match self.accounts.toggle_account_state(username).await? {
            Some(active) => {
                info!(
                    operation = "update_account_state",
                    username, active, "Account state updated"
                );
                Ok(active)
            }
            None => {
                error!(operation = "update_account_state", "{}", ACCOUNT_NOT_FOUND);
                Err(UseCaseError::NotFound(ACCOUNT_NOT_FOUND.to_string()))
            }
        }
    }

    /// Replace the permission set of `role` with exactly `permissions`
    pub async fn update_role_permissions(
        &self,
        role: Role,
        permissions: &[Permission],
    ) -> UseCaseResult<()> {
        let permissions: BTreeSet<Permission> = permissions.iter().copied().collect();
        self.role_permissions
            .update_role_permissions(role, &permissions)
            .await?;

        info!(operation = "update_role_permissions", %role, "Role permissions updated");
        Ok(())
    }

    /// Every role record, in `Role` declaration order
    pub async fn get_role_permissions(&self) -> UseCaseResult<Vec<RolePermissions>> {
        let mut records = self.role_permissions.get_role_permissions().await?;
        records.sort_by_key(|record| record.role);
        Ok(records)
    }

    pub async fn get_all_accounts(&self) -> UseCaseResult<Vec<AccountSummary>> {
        Ok(self.accounts.get_all_accounts().await?)
    }

    /// Paged, filtered account listing
    pub async fn find_all(&self, query: &AccountQuery) -> UseCaseResult<Page<AccountSummary>> {
        Ok(self.accounts.find_account(query).await?)
    }

    pub async fn find_account_details(&self, account_id: Uuid) -> UseCaseResult<AccountDetails> {
        match self.accounts.find_user_account_details(account_id).await? {
            Some(details) => Ok(details),
            None => {
                error!(operation = "find_account_details", "{}", ACCOUNT_NOT_FOUND);
                Err(UseCaseError::NotFound(ACCOUNT_NOT_FOUND.to_string()))
            }
        }
    }

    /// Delete an inactive account.
    ///
    /// Existence is checked before activity: a missing account is `NotFound`,
    /// an active one is `InvalidState` and is left untouched.
    pub async fn delete_account(&self, id: Uuid) -> UseCaseResult<()> {
        let account = self
            .accounts
            .find_account_by_id(id)
            .await?
            .ok_or_else(|| UseCaseError::NotFound(ACCOUNT_NOT_FOUND.to_string()))?;

        if account.active {
            return Err(UseCaseError::InvalidState(ACCOUNT_ACTIVE.to_string()));
        }

        if self.accounts.delete_account(id).await? {
            info!(operation = "delete_account", %id, "Account deleted");
            return Ok(());
        }

        // The repository only deletes inactive rows, so a miss here means the
        // account was activated or removed since it was read.
        match self.accounts.find_account_by_id(id).await? {
            Some(_) => Err(UseCaseError::InvalidState(ACCOUNT_ACTIVE.to_string())),
            None => Err(UseCaseError::NotFound(ACCOUNT_NOT_FOUND.to_string())),
        }
    }
}
