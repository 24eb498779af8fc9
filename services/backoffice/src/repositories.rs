//! Repositories for database operations
//!
//! Each repository is a trait so the use cases can run against PostgreSQL in
//! production and against the in-memory implementations in tests. Failures
//! surface as [`DatabaseError`] and are never retried here.

use async_trait::async_trait;
use common::error::DatabaseResult;
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::models::{
    Account, AccountDetails, AccountQuery, AccountSummary, Material, MaterialRoomUsage,
    NewAccount, Page, Permission, PlanningSession, Role, RolePermissions, Room, Skill, SkillQuery,
    TeacherSkill, TrainingSession,
};

pub mod account;
pub mod inventory;
pub mod material_room;
#[cfg(any(test, feature = "mocks"))]
pub mod memory;
pub mod role_permissions;
pub mod skill;

pub use account::PgAccountRepository;
pub use inventory::{PgMaterialRepository, PgRoomRepository};
pub use material_room::PgMaterialRoomRepository;
#[cfg(any(test, feature = "mocks"))]
pub use memory::{
    InMemoryAccountRepository, InMemoryMaterialRoomRepository, InMemoryRolePermissionsRepository,
    InMemorySkillRepository, InMemoryTeacherSkillsRepository, InMemoryTrainingSessionRepository,
};
pub use role_permissions::PgRolePermissionsRepository;
pub use skill::{PgSkillRepository, PgTeacherSkillsRepository, PgTrainingSessionRepository};

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Store a new, inactive account
    async fn create_account(&self, account: NewAccount) -> DatabaseResult<Account>;
    async fn get_account_by_username(&self, username: &str) -> DatabaseResult<Option<Account>>;
    /// Overwrite the `active` flag
    async fn update_account_state(&self, username: &str, active: bool) -> DatabaseResult<()>;
    /// Negate the `active` flag in a single atomic step and return the new
    /// value, or `None` when no account has that username
    async fn toggle_account_state(&self, username: &str) -> DatabaseResult<Option<bool>>;
    async fn find_account_by_id(&self, id: Uuid) -> DatabaseResult<Option<Account>>;
    /// Delete the account only if it is inactive. Returns whether a row was removed.
    async fn delete_account(&self, id: Uuid) -> DatabaseResult<bool>;
    async fn find_user_account_details(&self, id: Uuid) -> DatabaseResult<Option<AccountDetails>>;
    async fn get_all_accounts(&self) -> DatabaseResult<Vec<AccountSummary>>;
    async fn find_account(&self, query: &AccountQuery) -> DatabaseResult<Page<AccountSummary>>;
}

#[async_trait]
pub trait RolePermissionsRepository: Send + Sync {
    /// Replace the whole permission set of `role`, creating the record if needed
    async fn update_role_permissions(
        &self,
        role: Role,
        permissions: &BTreeSet<Permission>,
    ) -> DatabaseResult<()>;
    async fn get_role_permissions(&self) -> DatabaseResult<Vec<RolePermissions>>;
    async fn find_role_permissions(&self, role: Role) -> DatabaseResult<Option<RolePermissions>>;
}

#[async_trait]
pub trait SkillRepository: Send + Sync {
    async fn create_skill(&self, name: &str, description: Option<&str>) -> DatabaseResult<Skill>;
    /// Returns `None` when no skill has that id
    async fn update_skill(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> DatabaseResult<Option<Skill>>;
    async fn find_skill_by_id(&self, id: Uuid) -> DatabaseResult<Option<Skill>>;
    async fn find_skill_by_name(&self, name: &str) -> DatabaseResult<Option<Skill>>;
    async fn find_skills(&self, query: &SkillQuery) -> DatabaseResult<Page<Skill>>;
    async fn delete_skill(&self, id: Uuid) -> DatabaseResult<bool>;
}

#[async_trait]
pub trait TeacherSkillsRepository: Send + Sync {
    /// Save teacher/skill links; links that already exist are left as they are
    async fn save_teacher_skills(&self, teacher_skills: &[TeacherSkill]) -> DatabaseResult<()>;
}

#[async_trait]
pub trait TrainingSessionRepository: Send + Sync {
    async fn create_session(&self, session: &PlanningSession) -> DatabaseResult<TrainingSession>;
}

#[async_trait]
pub trait MaterialRoomRepository: Send + Sync {
    async fn room_exists(&self, room_id: Uuid) -> DatabaseResult<bool>;
    async fn material_exists(&self, material_id: Uuid) -> DatabaseResult<bool>;
    /// Returns `None` when the pair is already assigned
    async fn insert_usage(
        &self,
        room_id: Uuid,
        material_id: Uuid,
        quantity: i32,
    ) -> DatabaseResult<Option<MaterialRoomUsage>>;
    async fn find_usage(
        &self,
        room_id: Uuid,
        material_id: Uuid,
    ) -> DatabaseResult<Option<MaterialRoomUsage>>;
    async fn find_all_usages(&self) -> DatabaseResult<Vec<MaterialRoomUsage>>;
    async fn update_usage(
        &self,
        room_id: Uuid,
        material_id: Uuid,
        quantity: i32,
    ) -> DatabaseResult<Option<MaterialRoomUsage>>;
    async fn delete_usage(&self, room_id: Uuid, material_id: Uuid) -> DatabaseResult<bool>;
}

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create_room(&self, name: &str, capacity: Option<i32>) -> DatabaseResult<Room>;
    /// Every room, ordered by name
    async fn find_all_rooms(&self) -> DatabaseResult<Vec<Room>>;
    /// Also drops the room's material usages
    async fn delete_room(&self, id: Uuid) -> DatabaseResult<bool>;
}

#[async_trait]
pub trait MaterialRepository: Send + Sync {
    async fn create_material(&self, name: &str) -> DatabaseResult<Material>;
    /// Every material, ordered by name
    async fn find_all_materials(&self) -> DatabaseResult<Vec<Material>>;
    /// Also drops every usage of the material
    async fn delete_material(&self, id: Uuid) -> DatabaseResult<bool>;
}
