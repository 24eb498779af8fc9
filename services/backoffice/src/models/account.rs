//! Account model and related functionality

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use super::page::{Pagination, SortOrder};
use super::role::{FormationMode, Permission, Role};

/// Account entity
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub firstname: String,
    pub lastname: String,
    pub birth_date: NaiveDate,
    pub birth_place: String,
    pub role: Role,
    pub formation_mode: Option<FormationMode>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New account creation payload. Accounts always start inactive.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password_hash: String,
    pub firstname: String,
    pub lastname: String,
    pub birth_date: NaiveDate,
    pub birth_place: String,
    pub role: Role,
    pub formation_mode: Option<FormationMode>,
}

/// Account together with the permission set its role currently grants
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetails {
    pub id: Uuid,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub birth_date: NaiveDate,
    pub birth_place: String,
    pub role: Role,
    pub permissions: BTreeSet<Permission>,
    pub formation_mode: Option<FormationMode>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountDetails {
    pub fn new(account: Account, permissions: BTreeSet<Permission>) -> Self {
        Self {
            id: account.id,
            username: account.username,
            firstname: account.firstname,
            lastname: account.lastname,
            birth_date: account.birth_date,
            birth_place: account.birth_place,
            role: account.role,
            permissions,
            formation_mode: account.formation_mode,
            active: account.active,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// List view of an account
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: Uuid,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            firstname: account.firstname.clone(),
            lastname: account.lastname.clone(),
            role: account.role,
            active: account.active,
            created_at: account.created_at,
        }
    }
}

/// Columns the account listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccountSortField {
    Username,
    Lastname,
    #[default]
    CreatedAt,
}

impl AccountSortField {
    pub fn column(&self) -> &'static str {
        match self {
            AccountSortField::Username => "username",
            AccountSortField::Lastname => "lastname",
            AccountSortField::CreatedAt => "created_at",
        }
    }
}

/// Query parameters for the paged account listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountQuery {
    /// Page number (1-based)
    pub page: Option<u32>,
    /// Number of items per page
    pub limit: Option<u32>,
    #[serde(default)]
    pub sort_by: AccountSortField,
    #[serde(default)]
    pub order: SortOrder,
    /// Case-insensitive match on username, first name or last name
    pub search: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

impl AccountQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.limit)
    }

    /// The trimmed search term, if one was given
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    /// In-process equivalent of the SQL filter
    pub fn matches(&self, account: &Account) -> bool {
        if self.role.is_some_and(|role| role != account.role) {
            return false;
        }
        if self.active.is_some_and(|active| active != account.active) {
            return false;
        }
        match self.search_term() {
            Some(term) => {
                let term = term.to_lowercase();
                [&account.username, &account.firstname, &account.lastname]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&term))
            }
            None => true,
        }
    }
}

#[cfg(test)]
impl Account {
    pub fn mock(username: &str, role: Role, active: bool) -> Self {
        let now = Utc::now();
        Account {
            id: Uuid::new_v4(),
            username: username.to_owned(),
            password_hash: "fakehashedpassword".to_owned(),
            firstname: "Test".to_owned(),
            lastname: "User".to_owned(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or_default(),
            birth_place: "Paris".to_owned(),
            role,
            formation_mode: None,
            active,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_is_never_serialized() {
        let account = Account::mock("a@b.com", Role::Student, false);
        let json = serde_json::to_value(&account).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["username"], "a@b.com");
        assert_eq!(json["active"], false);
    }

    #[test]
    fn test_query_filters() {
        let mut account = Account::mock("jane@school.org", Role::Teacher, true);
        account.lastname = "Doe".to_owned();

        let query = AccountQuery {
            search: Some("  DOE ".to_owned()),
            role: Some(Role::Teacher),
            ..AccountQuery::default()
        };
        assert!(query.matches(&account));

        let inactive_only = AccountQuery {
            active: Some(false),
            ..AccountQuery::default()
        };
        assert!(!inactive_only.matches(&account));
    }

    #[test]
    fn test_query_deserializes_camel_case() {
        let query: AccountQuery =
            serde_json::from_value(serde_json::json!({"sortBy": "lastname", "order": "asc"}))
                .unwrap();
        assert_eq!(query.sort_by, AccountSortField::Lastname);
        assert_eq!(query.order, SortOrder::Asc);
    }
}
