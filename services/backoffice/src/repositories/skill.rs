//! Skill, teacher-skill and training session repositories backed by PostgreSQL

use async_trait::async_trait;
use common::error::DatabaseResult;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::info;
use uuid::Uuid;

use super::{SkillRepository, TeacherSkillsRepository, TrainingSessionRepository};
use crate::models::{Page, PlanningSession, Skill, SkillQuery, TeacherSkill, TrainingSession};

fn skill_from_row(row: &PgRow) -> DatabaseResult<Skill> {
    Ok(Skill {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn push_search(builder: &mut QueryBuilder<'_, Postgres>, query: &SkillQuery) {
    if let Some(term) = query.search_term() {
        builder
            .push(" WHERE name ILIKE ")
            .push_bind(format!("%{}%", term));
    }
}

/// Skill repository
#[derive(Clone)]
pub struct PgSkillRepository {
    pool: PgPool,
}

impl PgSkillRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SkillRepository for PgSkillRepository {
    async fn create_skill(&self, name: &str, description: Option<&str>) -> DatabaseResult<Skill> {
        info!("Creating skill: {}", name);

        let row = sqlx::query(
            r#"
            INSERT INTO skills (id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        skill_from_row(&row)
    }

    async fn update_skill(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> DatabaseResult<Option<Skill>> {
        let row = sqlx::query(
            r#"
            UPDATE skills
            SET name = $2, description = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(skill_from_row).transpose()
    }

    async fn find_skill_by_id(&self, id: Uuid) -> DatabaseResult<Option<Skill>> {
        let row = sqlx::query(
            "SELECT id, name, description, created_at, updated_at FROM skills WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(skill_from_row).transpose()
    }

    async fn find_skill_by_name(&self, name: &str) -> DatabaseResult<Option<Skill>> {
        let row = sqlx::query(
            "SELECT id, name, description, created_at, updated_at FROM skills WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(skill_from_row).transpose()
    }

    async fn find_skills(&self, query: &SkillQuery) -> DatabaseResult<Page<Skill>> {
        let pagination = query.pagination();

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM skills");
        push_search(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(
            "SELECT id, name, description, created_at, updated_at FROM skills",
        );
        push_search(&mut select, query);
        select
            .push(" ORDER BY name ASC LIMIT ")
            .push_bind(pagination.limit as i64)
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let rows = select.build().fetch_all(&self.pool).await?;
        let items = rows
            .iter()
            .map(skill_from_row)
            .collect::<DatabaseResult<Vec<_>>>()?;

        Ok(Page::new(items, pagination, total))
    }

    async fn delete_skill(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Teacher-skill link repository
#[derive(Clone)]
pub struct PgTeacherSkillsRepository {
    pool: PgPool,
}

impl PgTeacherSkillsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeacherSkillsRepository for PgTeacherSkillsRepository {
    async fn save_teacher_skills(&self, teacher_skills: &[TeacherSkill]) -> DatabaseResult<()> {
        if teacher_skills.is_empty() {
            return Ok(());
        }

        let mut builder =
            QueryBuilder::<Postgres>::new("INSERT INTO teacher_skills (teacher_id, skill_id) ");
        builder.push_values(teacher_skills, |mut row, link| {
            row.push_bind(link.teacher_id).push_bind(link.skill_id);
        });
        builder.push(" ON CONFLICT DO NOTHING");

        builder.build().execute(&self.pool).await?;
        Ok(())
    }
}

/// Training session repository
#[derive(Clone)]
pub struct PgTrainingSessionRepository {
    pool: PgPool,
}

impl PgTrainingSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrainingSessionRepository for PgTrainingSessionRepository {
    async fn create_session(&self, session: &PlanningSession) -> DatabaseResult<TrainingSession> {
        let row = sqlx::query(
            r#"
            INSERT INTO training_sessions (id, skill_id, teacher_id, room_id, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, skill_id, teacher_id, room_id, start_date, end_date, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(session.skill_id)
        .bind(session.teacher_id)
        .bind(session.room_id)
        .bind(session.start_date)
        .bind(session.end_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(TrainingSession {
            id: row.try_get("id")?,
            skill_id: row.try_get("skill_id")?,
            teacher_id: row.try_get("teacher_id")?,
            room_id: row.try_get("room_id")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
