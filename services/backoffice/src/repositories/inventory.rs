//! Room and material repositories backed by PostgreSQL
//!
//! Usages of a deleted room or material go with it through the
//! `ON DELETE CASCADE` keys of `material_room_usages`.

use async_trait::async_trait;
use common::error::DatabaseResult;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use super::{MaterialRepository, RoomRepository};
use crate::models::{Material, Room};

fn room_from_row(row: &PgRow) -> DatabaseResult<Room> {
    Ok(Room {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        capacity: row.try_get("capacity")?,
    })
}

fn material_from_row(row: &PgRow) -> DatabaseResult<Material> {
    Ok(Material {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}

/// Room repository
#[derive(Clone)]
pub struct PgRoomRepository {
    pool: PgPool,
}

impl PgRoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    async fn create_room(&self, name: &str, capacity: Option<i32>) -> DatabaseResult<Room> {
        info!("Creating room: {}", name);

        let row = sqlx::query(
            r#"
            INSERT INTO rooms (id, name, capacity)
            VALUES ($1, $2, $3)
            RETURNING id, name, capacity
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(capacity)
        .fetch_one(&self.pool)
        .await?;

        room_from_row(&row)
    }

    async fn find_all_rooms(&self) -> DatabaseResult<Vec<Room>> {
        let rows = sqlx::query("SELECT id, name, capacity FROM rooms ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(room_from_row).collect()
    }

    async fn delete_room(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Material repository
#[derive(Clone)]
pub struct PgMaterialRepository {
    pool: PgPool,
}

impl PgMaterialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MaterialRepository for PgMaterialRepository {
    async fn create_material(&self, name: &str) -> DatabaseResult<Material> {
        info!("Creating material: {}", name);

        let row = sqlx::query(
            r#"
            INSERT INTO materials (id, name)
            VALUES ($1, $2)
            RETURNING id, name
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        material_from_row(&row)
    }

    async fn find_all_materials(&self) -> DatabaseResult<Vec<Material>> {
        let rows = sqlx::query("SELECT id, name FROM materials ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(material_from_row).collect()
    }

    async fn delete_material(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM materials WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
