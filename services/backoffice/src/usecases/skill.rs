//! Skill catalogue and training planning

use common::error::DatabaseError;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use super::error::{UseCaseError, UseCaseResult};
use crate::models::{
    Page, PlanningSession, Role, Skill, SkillInput, SkillQuery, TeacherSkill, TrainingSession,
};
use crate::repositories::{
    AccountRepository, SkillRepository, TeacherSkillsRepository, TrainingSessionRepository,
};
use crate::validation::{MAX_SKILL_NAME_LENGTH, validate_required};

const SKILL_NOT_FOUND: &str = "skill not found";
const TEACHER_NOT_FOUND: &str = "teacher not found";

#[derive(Clone)]
pub struct SkillUseCases {
    skills: Arc<dyn SkillRepository>,
    teacher_skills: Arc<dyn TeacherSkillsRepository>,
    sessions: Arc<dyn TrainingSessionRepository>,
    accounts: Arc<dyn AccountRepository>,
}

impl SkillUseCases {
    pub fn new(
        skills: Arc<dyn SkillRepository>,
        teacher_skills: Arc<dyn TeacherSkillsRepository>,
        sessions: Arc<dyn TrainingSessionRepository>,
        accounts: Arc<dyn AccountRepository>,
    ) -> Self {
        Self {
            skills,
            teacher_skills,
            sessions,
            accounts,
        }
    }

    pub async fn create_skill(&self, input: SkillInput) -> UseCaseResult<Skill> {
        let name = validate_skill_name(&input.name)?;

        if self.skills.find_skill_by_name(name).await?.is_some() {
            return Err(skill_exists(name));
        }

        let skill = self
            .skills
            .create_skill(name, description(&input))
            .await
            .map_err(|e| name_conflict(e, name))?;
        info!(operation = "create_skill", id = %skill.id, "Skill created");
        Ok(skill)
    }

    pub async fn update_skill(&self, input: SkillInput) -> UseCaseResult<Skill> {
        let id = input
            .id
            .ok_or_else(|| UseCaseError::Validation("Skill id is required".to_string()))?;
        let name = validate_skill_name(&input.name)?;

        if let Some(existing) = self.skills.find_skill_by_name(name).await? {
            if existing.id != id {
                return Err(skill_exists(name));
            }
        }

        let updated = self
            .skills
            .update_skill(id, name, description(&input))
            .await
            .map_err(|e| name_conflict(e, name))?;
        match updated {
            Some(skill) => Ok(skill),
            None => {
                error!(operation = "update_skill", %id, "{}", SKILL_NOT_FOUND);
                Err(UseCaseError::NotFound(SKILL_NOT_FOUND.to_string()))
            }
        }
    }

    pub async fn get_all_skills(&self, query: &SkillQuery) -> UseCaseResult<Page<Skill>> {
        Ok(self.skills.find_skills(query).await?)
    }

    pub async fn delete_skill(&self, id: Uuid) -> UseCaseResult<()> {
        if !self.skills.delete_skill(id).await? {
            error!(operation = "delete_skill", %id, "{}", SKILL_NOT_FOUND);
            return Err(UseCaseError::NotFound(SKILL_NOT_FOUND.to_string()));
        }

        info!(operation = "delete_skill", %id, "Skill deleted");
        Ok(())
    }

    /// Schedule a training session and record that the teacher teaches the skill
    pub async fn plan_training(&self, session: PlanningSession) -> UseCaseResult<TrainingSession> {
        if session.end_date <= session.start_date {
            return Err(UseCaseError::Validation(
                "End date must be after start date".to_string(),
            ));
        }

        if self.skills.find_skill_by_id(session.skill_id).await?.is_none() {
            return Err(UseCaseError::NotFound(SKILL_NOT_FOUND.to_string()));
        }

        let teacher = self.accounts.find_account_by_id(session.teacher_id).await?;
        if !teacher.is_some_and(|account| account.role == Role::Teacher) {
            return Err(UseCaseError::NotFound(TEACHER_NOT_FOUND.to_string()));
        }

        let created = self.sessions.create_session(&session).await?;
        self.teacher_skills
            .save_teacher_skills(&[TeacherSkill {
                teacher_id: session.teacher_id,
                skill_id: session.skill_id,
            }])
            .await?;

        info!(
            operation = "plan_training",
            id = %created.id,
            skill_id = %created.skill_id,
            teacher_id = %created.teacher_id,
            "Training session planned"
        );
        Ok(created)
    }
}

fn validate_skill_name(name: &str) -> UseCaseResult<&str> {
    validate_required("Skill name", name, MAX_SKILL_NAME_LENGTH)
        .map_err(UseCaseError::Validation)?;
    Ok(name.trim())
}

fn skill_exists(name: &str) -> UseCaseError {
    UseCaseError::InvalidState(format!("skill {} already exists", name))
}

/// A concurrent write can take the name between the lookup and the write
fn name_conflict(err: DatabaseError, name: &str) -> UseCaseError {
    match err {
        DatabaseError::UniqueViolation(_) => skill_exists(name),
        err => {
            error!(operation = "save_skill", "Failed to save skill: {}", err);
            err.into()
        }
    }
}

fn description(input: &SkillInput) -> Option<&str> {
    input
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Account;
    use crate::repositories::{
        InMemoryAccountRepository, InMemorySkillRepository, InMemoryTeacherSkillsRepository,
        InMemoryTrainingSessionRepository,
    };
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use common::error::DatabaseResult;

    struct Fixture {
        accounts: InMemoryAccountRepository,
        links: InMemoryTeacherSkillsRepository,
        sessions: InMemoryTrainingSessionRepository,
        use_cases: SkillUseCases,
    }

    fn fixture() -> Fixture {
        let accounts = InMemoryAccountRepository::new();
        let links = InMemoryTeacherSkillsRepository::new();
        let sessions = InMemoryTrainingSessionRepository::new();
        let use_cases = SkillUseCases::new(
            Arc::new(InMemorySkillRepository::new()),
            Arc::new(links.clone()),
            Arc::new(sessions.clone()),
            Arc::new(accounts.clone()),
        );
        Fixture {
            accounts,
            links,
            sessions,
            use_cases,
        }
    }

    fn input(id: Option<Uuid>, name: &str) -> SkillInput {
        SkillInput {
            id,
            name: name.to_string(),
            description: Some("  ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_skill_rejects_duplicates() {
        let fx = fixture();

        let skill = fx.use_cases.create_skill(input(None, " Rust ")).await.unwrap();
        assert_eq!(skill.name, "Rust");
        assert_eq!(skill.description, None);

        let result = fx.use_cases.create_skill(input(None, "Rust")).await;
        assert!(matches!(result, Err(UseCaseError::InvalidState(_))));

        let result = fx.use_cases.create_skill(input(None, "")).await;
        assert!(matches!(result, Err(UseCaseError::Validation(_))));
    }

    /// Name lookups that never see other writers, as when a concurrent
    /// request commits between the lookup and the write
    struct BlindNameLookup(InMemorySkillRepository);

    #[async_trait]
    impl SkillRepository for BlindNameLookup {
        async fn create_skill(
            &self,
            name: &str,
            description: Option<&str>,
        ) -> DatabaseResult<Skill> {
            self.0.create_skill(name, description).await
        }

        async fn update_skill(
            &self,
            id: Uuid,
            name: &str,
            description: Option<&str>,
        ) -> DatabaseResult<Option<Skill>> {
            self.0.update_skill(id, name, description).await
        }

        async fn find_skill_by_id(&self, id: Uuid) -> DatabaseResult<Option<Skill>> {
            self.0.find_skill_by_id(id).await
        }

        async fn find_skill_by_name(&self, _name: &str) -> DatabaseResult<Option<Skill>> {
            Ok(None)
        }

        async fn find_skills(&self, query: &SkillQuery) -> DatabaseResult<Page<Skill>> {
            self.0.find_skills(query).await
        }

        async fn delete_skill(&self, id: Uuid) -> DatabaseResult<bool> {
            self.0.delete_skill(id).await
        }
    }

    #[tokio::test]
    async fn test_name_taken_by_concurrent_write_is_invalid_state() {
        let skills = InMemorySkillRepository::new();
        let use_cases = SkillUseCases::new(
            Arc::new(BlindNameLookup(skills.clone())),
            Arc::new(InMemoryTeacherSkillsRepository::new()),
            Arc::new(InMemoryTrainingSessionRepository::new()),
            Arc::new(InMemoryAccountRepository::new()),
        );

        use_cases.create_skill(input(None, "Rust")).await.unwrap();
        let go = use_cases.create_skill(input(None, "Go")).await.unwrap();

        match use_cases.create_skill(input(None, "Rust")).await {
            Err(UseCaseError::InvalidState(message)) => {
                assert_eq!(message, "skill Rust already exists")
            }
            other => panic!("expected InvalidState, got {:?}", other),
        }

        let result = use_cases.update_skill(input(Some(go.id), "Rust")).await;
        assert!(matches!(result, Err(UseCaseError::InvalidState(_))));

        let names: Vec<String> = skills
            .skills
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.name.clone())
            .collect();
        assert_eq!(names, vec!["Rust", "Go"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_skill() {
        let fx = fixture();
        let skill = fx.use_cases.create_skill(input(None, "Rust")).await.unwrap();

        let updated = fx
            .use_cases
            .update_skill(input(Some(skill.id), "Rust 2024"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Rust 2024");

        let result = fx.use_cases.update_skill(input(Some(Uuid::new_v4()), "Go")).await;
        assert!(matches!(result, Err(UseCaseError::NotFound(_))));

        let result = fx.use_cases.update_skill(input(None, "Go")).await;
        assert!(matches!(result, Err(UseCaseError::Validation(_))));

        fx.use_cases.delete_skill(skill.id).await.unwrap();
        let result = fx.use_cases.delete_skill(skill.id).await;
        assert!(matches!(result, Err(UseCaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_all_skills_searches_by_name() {
        let fx = fixture();
        for name in ["Rust", "Go", "Trust and safety"] {
            fx.use_cases.create_skill(input(None, name)).await.unwrap();
        }

        let query = SkillQuery {
            search: Some("rust".to_string()),
            ..SkillQuery::default()
        };
        let page = fx.use_cases.get_all_skills(&query).await.unwrap();
        let names: Vec<_> = page.items.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Rust", "Trust and safety"]);
        assert_eq!(page.meta.total_items, 2);
    }

    #[tokio::test]
    async fn test_plan_training_links_teacher_and_skill() {
        let fx = fixture();
        let skill = fx.use_cases.create_skill(input(None, "Rust")).await.unwrap();
        let teacher = Account::mock("t@b.com", Role::Teacher, true);
        let teacher_id = teacher.id;
        fx.accounts.insert(teacher);

        let start = Utc::now();
        let session = PlanningSession {
            skill_id: skill.id,
            teacher_id,
            room_id: None,
            start_date: start,
            end_date: start + Duration::hours(2),
        };

        fx.use_cases.plan_training(session.clone()).await.unwrap();
        // planning twice keeps a single link
        fx.use_cases.plan_training(session).await.unwrap();

        assert_eq!(fx.sessions.sessions.lock().unwrap().len(), 2);
        let links = fx.links.links.lock().unwrap();
        assert_eq!(links.len(), 1);
        assert!(links.contains(&TeacherSkill {
            teacher_id,
            skill_id: skill.id
        }));
    }

    #[tokio::test]
    async fn test_plan_training_preconditions() {
        let fx = fixture();
        let skill = fx.use_cases.create_skill(input(None, "Rust")).await.unwrap();
        let student = Account::mock("s@b.com", Role::Student, true);
        let student_id = student.id;
        fx.accounts.insert(student);

        let start = Utc::now();
        let mut session = PlanningSession {
            skill_id: skill.id,
            teacher_id: student_id,
            room_id: None,
            start_date: start,
            end_date: start,
        };
        let result = fx.use_cases.plan_training(session.clone()).await;
        assert!(matches!(result, Err(UseCaseError::Validation(_))));

        session.end_date = start + Duration::hours(1);
        match fx.use_cases.plan_training(session.clone()).await {
            Err(UseCaseError::NotFound(message)) => assert_eq!(message, "teacher not found"),
            other => panic!("expected NotFound, got {:?}", other),
        }

        session.skill_id = Uuid::new_v4();
        match fx.use_cases.plan_training(session).await {
            Err(UseCaseError::NotFound(message)) => assert_eq!(message, "skill not found"),
            other => panic!("expected NotFound, got {:?}", other),
        }
        assert!(fx.sessions.sessions.lock().unwrap().is_empty());
    }
}
