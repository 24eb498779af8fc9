//! Account repository backed by PostgreSQL

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::info;
use uuid::Uuid;

use super::AccountRepository;
use super::role_permissions::parse_permissions;
use crate::models::{
    Account, AccountDetails, AccountQuery, AccountSummary, FormationMode, NewAccount, Page, Role,
};

const ACCOUNT_COLUMNS: &str = "id, username, password_hash, firstname, lastname, birth_date, \
     birth_place, role, formation_mode, active, created_at, updated_at";

const SUMMARY_COLUMNS: &str = "id, username, firstname, lastname, role, active, created_at";

/// Account repository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    /// Create a new account repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn parse_role(raw: &str) -> DatabaseResult<Role> {
    raw.parse().map_err(|e: crate::models::UnknownVariant| DatabaseError::Corrupt {
        table: "accounts",
        reason: e.to_string(),
    })
}

fn account_from_row(row: &PgRow) -> DatabaseResult<Account> {
    let role: String = row.try_get("role")?;
    let formation_mode: Option<String> = row.try_get("formation_mode")?;
    let formation_mode = formation_mode
        .map(|raw| raw.parse::<FormationMode>())
        .transpose()
        .map_err(|e| DatabaseError::Corrupt {
            table: "accounts",
            reason: e.to_string(),
        })?;

    Ok(Account {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        firstname: row.try_get("firstname")?,
        lastname: row.try_get("lastname")?,
        birth_date: row.try_get("birth_date")?,
        birth_place: row.try_get("birth_place")?,
        role: parse_role(&role)?,
        formation_mode,
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn summary_from_row(row: &PgRow) -> DatabaseResult<AccountSummary> {
    let role: String = row.try_get("role")?;
    Ok(AccountSummary {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        firstname: row.try_get("firstname")?,
        lastname: row.try_get("lastname")?,
        role: parse_role(&role)?,
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
    })
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &AccountQuery) {
    builder.push(" WHERE TRUE");
    if let Some(role) = query.role {
        builder.push(" AND role = ").push_bind(role.as_str());
    }
    if let Some(active) = query.active {
        builder.push(" AND active = ").push_bind(active);
    }
    if let Some(term) = query.search_term() {
        let pattern = format!("%{}%", term);
        builder
            .push(" AND (username ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR firstname ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR lastname ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn create_account(&self, account: NewAccount) -> DatabaseResult<Account> {
        info!("Creating new account: {}", account.username);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO accounts (id, username, password_hash, firstname, lastname,
                                  birth_date, birth_place, role, formation_mode, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, FALSE)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(&account.firstname)
        .bind(&account.lastname)
        .bind(account.birth_date)
        .bind(&account.birth_place)
        .bind(account.role.as_str())
        .bind(account.formation_mode.map(|mode| mode.as_str()))
        .fetch_one(&self.pool)
        .await?;

        account_from_row(&row)
    }

    async fn get_account_by_username(&self, username: &str) -> DatabaseResult<Option<Account>> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn update_account_state(&self, username: &str, active: bool) -> DatabaseResult<()> {
        sqlx::query("UPDATE accounts SET active = $2, updated_at = NOW() WHERE username = $1")
            .bind(username)
            .bind(active)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn toggle_account_state(&self, username: &str) -> DatabaseResult<Option<bool>> {
        let active: Option<bool> = sqlx::query_scalar(
            r#"
            UPDATE accounts
            SET active = NOT active, updated_at = NOW()
            WHERE username = $1
            RETURNING active
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(active)
    }

    async fn find_account_by_id(&self, id: Uuid) -> DatabaseResult<Option<Account>> {
        let row = sqlx::query(&format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn delete_account(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1 AND active = FALSE")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_user_account_details(&self, id: Uuid) -> DatabaseResult<Option<AccountDetails>> {
        let row = sqlx::query(
            r#"
            SELECT a.id, a.username, a.password_hash, a.firstname, a.lastname, a.birth_date,
                   a.birth_place, a.role, a.formation_mode, a.active, a.created_at, a.updated_at,
                   COALESCE(rp.permissions, '{}') AS permissions
            FROM accounts a
            LEFT JOIN role_permissions rp ON rp.role = a.role
            WHERE a.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let account = account_from_row(&row)?;
                let permissions: Vec<String> = row.try_get("permissions")?;
                let permissions = parse_permissions(&permissions)?;
                Ok(Some(AccountDetails::new(account, permissions)))
            }
            None => Ok(None),
        }
    }

    async fn get_all_accounts(&self) -> DatabaseResult<Vec<AccountSummary>> {
        let rows = sqlx::query(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM accounts ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(summary_from_row).collect()
    }

    async fn find_account(&self, query: &AccountQuery) -> DatabaseResult<Page<AccountSummary>> {
        let pagination = query.pagination();

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM accounts");
        push_filters(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select =
            QueryBuilder::<Postgres>::new(format!("SELECT {SUMMARY_COLUMNS} FROM accounts"));
        push_filters(&mut select, query);
        select
            .push(" ORDER BY ")
            .push(query.sort_by.column())
            .push(" ")
            .push(query.order.keyword())
            .push(", id LIMIT ")
            .push_bind(pagination.limit as i64)
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let rows = select.build().fetch_all(&self.pool).await?;
        let items = rows
            .iter()
            .map(summary_from_row)
            .collect::<DatabaseResult<Vec<_>>>()?;

        Ok(Page::new(items, pagination, total))
    }
}
