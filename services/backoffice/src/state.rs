//! Application state shared across handlers

use sqlx::PgPool;
use std::sync::Arc;

use crate::jwt::JwtService;
use crate::repositories::{
    AccountRepository, MaterialRepository, MaterialRoomRepository, PgAccountRepository,
    PgMaterialRepository, PgMaterialRoomRepository, PgRolePermissionsRepository,
    PgRoomRepository, PgSkillRepository, PgTeacherSkillsRepository, PgTrainingSessionRepository,
    RolePermissionsRepository, RoomRepository, SkillRepository, TeacherSkillsRepository,
    TrainingSessionRepository,
};
#[cfg(any(test, feature = "mocks"))]
use crate::repositories::{
    InMemoryAccountRepository, InMemoryMaterialRoomRepository, InMemoryRolePermissionsRepository,
    InMemorySkillRepository, InMemoryTeacherSkillsRepository, InMemoryTrainingSessionRepository,
};
use crate::usecases::{
    AccountManagementUseCases, AuthUseCases, InventoryUseCases, MaterialRoomUseCases,
    SkillUseCases,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Absent when the state is backed by in-memory repositories
    pub db_pool: Option<PgPool>,
    pub accounts: Arc<dyn AccountRepository>,
    pub role_permissions: Arc<dyn RolePermissionsRepository>,
    pub skills: Arc<dyn SkillRepository>,
    pub teacher_skills: Arc<dyn TeacherSkillsRepository>,
    pub training_sessions: Arc<dyn TrainingSessionRepository>,
    pub material_rooms: Arc<dyn MaterialRoomRepository>,
    pub rooms: Arc<dyn RoomRepository>,
    pub materials: Arc<dyn MaterialRepository>,
    pub jwt_service: JwtService,
}

impl AppState {
    /// State backed by PostgreSQL repositories sharing one pool
    pub fn from_pool(pool: PgPool, jwt_service: JwtService) -> Self {
        Self {
            accounts: Arc::new(PgAccountRepository::new(pool.clone())),
            role_permissions: Arc::new(PgRolePermissionsRepository::new(pool.clone())),
            skills: Arc::new(PgSkillRepository::new(pool.clone())),
            teacher_skills: Arc::new(PgTeacherSkillsRepository::new(pool.clone())),
            training_sessions: Arc::new(PgTrainingSessionRepository::new(pool.clone())),
            material_rooms: Arc::new(PgMaterialRoomRepository::new(pool.clone())),
            rooms: Arc::new(PgRoomRepository::new(pool.clone())),
            materials: Arc::new(PgMaterialRepository::new(pool.clone())),
            db_pool: Some(pool),
            jwt_service,
        }
    }

    pub fn account_management(&self) -> AccountManagementUseCases {
        AccountManagementUseCases::new(self.accounts.clone(), self.role_permissions.clone())
    }

    pub fn auth(&self) -> AuthUseCases {
        AuthUseCases::new(self.accounts.clone(), self.jwt_service.clone())
    }

    pub fn skills(&self) -> SkillUseCases {
        SkillUseCases::new(
            self.skills.clone(),
            self.teacher_skills.clone(),
            self.training_sessions.clone(),
            self.accounts.clone(),
        )
    }

    pub fn material_rooms(&self) -> MaterialRoomUseCases {
        MaterialRoomUseCases::new(self.material_rooms.clone())
    }

    pub fn inventory(&self) -> InventoryUseCases {
        InventoryUseCases::new(self.rooms.clone(), self.materials.clone())
    }
}

#[cfg(any(test, feature = "mocks"))]
impl AppState {
    /// State backed by the given in-memory repositories
    pub fn in_memory(repositories: &InMemoryRepositories, jwt_service: JwtService) -> Self {
        Self {
            db_pool: None,
            accounts: Arc::new(repositories.accounts.clone()),
            role_permissions: Arc::new(repositories.role_permissions.clone()),
            skills: Arc::new(repositories.skills.clone()),
            teacher_skills: Arc::new(repositories.teacher_skills.clone()),
            training_sessions: Arc::new(repositories.training_sessions.clone()),
            material_rooms: Arc::new(repositories.material_rooms.clone()),
            rooms: Arc::new(repositories.material_rooms.clone()),
            materials: Arc::new(repositories.material_rooms.clone()),
            jwt_service,
        }
    }
}

/// One in-memory instance of every repository. Clones share data, so a test
/// can keep this around to seed and inspect the state a router works on.
#[cfg(any(test, feature = "mocks"))]
#[derive(Clone)]
pub struct InMemoryRepositories {
    pub accounts: InMemoryAccountRepository,
    pub role_permissions: InMemoryRolePermissionsRepository,
    pub skills: InMemorySkillRepository,
    pub teacher_skills: InMemoryTeacherSkillsRepository,
    pub training_sessions: InMemoryTrainingSessionRepository,
    pub material_rooms: InMemoryMaterialRoomRepository,
}

#[cfg(any(test, feature = "mocks"))]
impl InMemoryRepositories {
    pub fn new() -> Self {
        let role_permissions = InMemoryRolePermissionsRepository::new();
        Self {
            accounts: InMemoryAccountRepository::new().with_role_permissions(&role_permissions),
            role_permissions,
            skills: InMemorySkillRepository::new(),
            teacher_skills: InMemoryTeacherSkillsRepository::new(),
            training_sessions: InMemoryTrainingSessionRepository::new(),
            material_rooms: InMemoryMaterialRoomRepository::new(),
        }
    }
}

#[cfg(any(test, feature = "mocks"))]
impl Default for InMemoryRepositories {
    fn default() -> Self {
        Self::new()
    }
}
