//! Skill, teacher-skill and training session models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::page::Pagination;

/// Skill entity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Skill create/update payload. `id` is ignored on create and required on update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillInput {
    pub id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
}

/// Query parameters for skill listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Case-insensitive match on the skill name
    pub search: Option<String>,
}

impl SkillQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.limit)
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

/// Link between a teacher account and a skill they teach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherSkill {
    pub teacher_id: Uuid,
    pub skill_id: Uuid,
}

/// Request to plan a training session
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningSession {
    pub skill_id: Uuid,
    pub teacher_id: Uuid,
    pub room_id: Option<Uuid>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Training session entity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSession {
    pub id: Uuid,
    pub skill_id: Uuid,
    pub teacher_id: Uuid,
    pub room_id: Option<Uuid>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
