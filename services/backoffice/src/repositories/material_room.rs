//! Material-room usage repository backed by PostgreSQL

use async_trait::async_trait;
use common::error::DatabaseResult;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::MaterialRoomRepository;
use crate::models::MaterialRoomUsage;

fn usage_from_row(row: &PgRow) -> DatabaseResult<MaterialRoomUsage> {
    Ok(MaterialRoomUsage {
        room_id: row.try_get("room_id")?,
        material_id: row.try_get("material_id")?,
        quantity: row.try_get("quantity")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Material-room usage repository
#[derive(Clone)]
pub struct PgMaterialRoomRepository {
    pool: PgPool,
}

impl PgMaterialRoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MaterialRoomRepository for PgMaterialRoomRepository {
    async fn room_exists(&self, room_id: Uuid) -> DatabaseResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM rooms WHERE id = $1)")
            .bind(room_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn material_exists(&self, material_id: Uuid) -> DatabaseResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM materials WHERE id = $1)")
                .bind(material_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn insert_usage(
        &self,
        room_id: Uuid,
        material_id: Uuid,
        quantity: i32,
    ) -> DatabaseResult<Option<MaterialRoomUsage>> {
        let row = sqlx::query(
            r#"
            INSERT INTO material_room_usages (room_id, material_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (room_id, material_id) DO NOTHING
            RETURNING room_id, material_id, quantity, updated_at
            "#,
        )
        .bind(room_id)
        .bind(material_id)
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(usage_from_row).transpose()
    }

    async fn find_usage(
        &self,
        room_id: Uuid,
        material_id: Uuid,
    ) -> DatabaseResult<Option<MaterialRoomUsage>> {
        let row = sqlx::query(
            r#"
            SELECT room_id, material_id, quantity, updated_at
            FROM material_room_usages
            WHERE room_id = $1 AND material_id = $2
            "#,
        )
        .bind(room_id)
        .bind(material_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(usage_from_row).transpose()
    }

    async fn find_all_usages(&self) -> DatabaseResult<Vec<MaterialRoomUsage>> {
        let rows = sqlx::query(
            r#"
            SELECT room_id, material_id, quantity, updated_at
            FROM material_room_usages
            ORDER BY room_id, material_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(usage_from_row).collect()
    }

    async fn update_usage(
        &self,
        room_id: Uuid,
        material_id: Uuid,
        quantity: i32,
    ) -> DatabaseResult<Option<MaterialRoomUsage>> {
        let row = sqlx::query(
            r#"
            UPDATE material_room_usages
            SET quantity = $3, updated_at = NOW()
            WHERE room_id = $1 AND material_id = $2
            RETURNING room_id, material_id, quantity, updated_at
            "#,
        )
        .bind(room_id)
        .bind(material_id)
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(usage_from_row).transpose()
    }

    async fn delete_usage(&self, room_id: Uuid, material_id: Uuid) -> DatabaseResult<bool> {
        let result =
            sqlx::query("DELETE FROM material_room_usages WHERE room_id = $1 AND material_id = $2")
                .bind(room_id)
                .bind(material_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
