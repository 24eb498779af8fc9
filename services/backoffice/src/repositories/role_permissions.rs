//! Role-permission repository backed by PostgreSQL

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::collections::BTreeSet;
use tracing::info;

use super::RolePermissionsRepository;
use crate::models::{Permission, Role, RolePermissions};

/// Role-permission repository
#[derive(Clone)]
pub struct PgRolePermissionsRepository {
    pool: PgPool,
}

impl PgRolePermissionsRepository {
    /// Create a new role-permission repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn parse_permissions(raw: &[String]) -> DatabaseResult<BTreeSet<Permission>> {
    raw.iter()
        .map(|value| {
            value.parse::<Permission>().map_err(|e| DatabaseError::Corrupt {
                table: "role_permissions",
                reason: e.to_string(),
            })
        })
        .collect()
}

fn role_permissions_from_row(row: &PgRow) -> DatabaseResult<RolePermissions> {
    let role: String = row.try_get("role")?;
    let role = role.parse::<Role>().map_err(|e| DatabaseError::Corrupt {
        table: "role_permissions",
        reason: e.to_string(),
    })?;
    let permissions: Vec<String> = row.try_get("permissions")?;

    Ok(RolePermissions {
        role,
        permissions: parse_permissions(&permissions)?,
    })
}

#[async_trait]
impl RolePermissionsRepository for PgRolePermissionsRepository {
    async fn update_role_permissions(
        &self,
        role: Role,
        permissions: &BTreeSet<Permission>,
    ) -> DatabaseResult<()> {
        info!("Replacing permissions of role {}", role);

        let permissions: Vec<String> = permissions
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();

        // One statement, so the replacement is all-or-nothing.
        sqlx::query(
            r#"
            INSERT INTO role_permissions (role, permissions, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (role)
            DO UPDATE SET permissions = EXCLUDED.permissions, updated_at = NOW()
            "#,
        )
        .bind(role.as_str())
        .bind(permissions)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_role_permissions(&self) -> DatabaseResult<Vec<RolePermissions>> {
        let rows = sqlx::query(
            r#"
            SELECT role, permissions FROM role_permissions
            ORDER BY array_position(ARRAY['Admin', 'Teacher', 'Student']::text[], role)
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(role_permissions_from_row).collect()
    }

    async fn find_role_permissions(&self, role: Role) -> DatabaseResult<Option<RolePermissions>> {
        let row = sqlx::query("SELECT role, permissions FROM role_permissions WHERE role = $1")
            .bind(role.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(role_permissions_from_row).transpose()
    }
}
