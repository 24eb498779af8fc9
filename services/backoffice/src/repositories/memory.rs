//! In-memory repositories
//!
//! Every repository trait has an implementation here that keeps its state
//! behind an `Arc<Mutex<_>>`, so clones share the same data. The test suites
//! use them to run use cases and the HTTP router without a database; the
//! public fields let tests seed and inspect that state directly.

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use super::{
    AccountRepository, MaterialRepository, MaterialRoomRepository, RolePermissionsRepository,
    RoomRepository, SkillRepository, TeacherSkillsRepository, TrainingSessionRepository,
};
use crate::models::{
    Account, AccountDetails, AccountQuery, AccountSortField, AccountSummary, Material,
    MaterialRoomUsage, NewAccount, Page, Permission, PlanningSession, Role, RolePermissions, Room,
    Skill, SkillQuery, SortOrder, TeacherSkill, TrainingSession,
};

type Shared<T> = Arc<Mutex<T>>;

fn lock<T>(shared: &Mutex<T>) -> MutexGuard<'_, T> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone, Default)]
pub struct InMemoryRolePermissionsRepository {
    pub records: Shared<BTreeMap<Role, BTreeSet<Permission>>>,
}

impl InMemoryRolePermissionsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a role record, replacing any previous one
    pub fn with_role(self, role: Role, permissions: impl IntoIterator<Item = Permission>) -> Self {
        lock(&self.records).insert(role, permissions.into_iter().collect());
        self
    }
}

#[async_trait]
impl RolePermissionsRepository for InMemoryRolePermissionsRepository {
    async fn update_role_permissions(
        &self,
        role: Role,
        permissions: &BTreeSet<Permission>,
    ) -> DatabaseResult<()> {
        lock(&self.records).insert(role, permissions.clone());
        Ok(())
    }

    async fn get_role_permissions(&self) -> DatabaseResult<Vec<RolePermissions>> {
        Ok(lock(&self.records)
            .iter()
            .map(|(role, permissions)| RolePermissions {
                role: *role,
                permissions: permissions.clone(),
            })
            .collect())
    }

    async fn find_role_permissions(&self, role: Role) -> DatabaseResult<Option<RolePermissions>> {
        Ok(lock(&self.records)
            .get(&role)
            .map(|permissions| RolePermissions {
                role,
                permissions: permissions.clone(),
            }))
    }
}

#[derive(Clone, Default)]
pub struct InMemoryAccountRepository {
    pub accounts: Shared<Vec<Account>>,
    /// Every id passed to `delete_account`, removed or not
    pub delete_calls: Shared<Vec<Uuid>>,
    /// Ids passed to a delete that actually removed an account
    pub deleted: Shared<Vec<Uuid>>,
    role_permissions: InMemoryRolePermissionsRepository,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve account details against the given role-permission records
    pub fn with_role_permissions(
        mut self,
        role_permissions: &InMemoryRolePermissionsRepository,
    ) -> Self {
        self.role_permissions = role_permissions.clone();
        self
    }

    pub fn insert(&self, account: Account) {
        lock(&self.accounts).push(account);
    }
}

fn compare_accounts(a: &Account, b: &Account, field: AccountSortField) -> std::cmp::Ordering {
    match field {
        AccountSortField::Username => a.username.cmp(&b.username),
        AccountSortField::Lastname => a.lastname.cmp(&b.lastname),
        AccountSortField::CreatedAt => a.created_at.cmp(&b.created_at),
    }
    .then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create_account(&self, account: NewAccount) -> DatabaseResult<Account> {
        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            username: account.username,
            password_hash: account.password_hash,
            firstname: account.firstname,
            lastname: account.lastname,
            birth_date: account.birth_date,
            birth_place: account.birth_place,
            role: account.role,
            formation_mode: account.formation_mode,
            active: false,
            created_at: now,
            updated_at: now,
        };
        let mut accounts = lock(&self.accounts);
        if accounts.iter().any(|a| a.username == account.username) {
            return Err(DatabaseError::UniqueViolation("accounts_username_key".to_string()));
        }
        accounts.push(account.clone());
        Ok(account)
    }

    async fn get_account_by_username(&self, username: &str) -> DatabaseResult<Option<Account>> {
        Ok(lock(&self.accounts)
            .iter()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn update_account_state(&self, username: &str, active: bool) -> DatabaseResult<()> {
        if let Some(account) = lock(&self.accounts)
            .iter_mut()
            .find(|a| a.username == username)
        {
            account.active = active;
            account.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn toggle_account_state(&self, username: &str) -> DatabaseResult<Option<bool>> {
        let mut accounts = lock(&self.accounts);
        Ok(accounts
            .iter_mut()
            .find(|a| a.username == username)
            .map(|account| {
                account.active = !account.active;
                account.updated_at = Utc::now();
                account.active
            }))
    }

    async fn find_account_by_id(&self, id: Uuid) -> DatabaseResult<Option<Account>> {
        Ok(lock(&self.accounts).iter().find(|a| a.id == id).cloned())
    }

    async fn delete_account(&self, id: Uuid) -> DatabaseResult<bool> {
        lock(&self.delete_calls).push(id);
        let mut accounts = lock(&self.accounts);
        let len_before = accounts.len();
        accounts.retain(|a| a.id != id || a.active);
        let deleted = accounts.len() < len_before;
        drop(accounts);

        if deleted {
            lock(&self.deleted).push(id);
        }
        Ok(deleted)
    }

    async fn find_user_account_details(&self, id: Uuid) -> DatabaseResult<Option<AccountDetails>> {
        let Some(account) = self.find_account_by_id(id).await? else {
            return Ok(None);
        };
        let permissions = lock(&self.role_permissions.records)
            .get(&account.role)
            .cloned()
            .unwrap_or_default();
        Ok(Some(AccountDetails::new(account, permissions)))
    }

    async fn get_all_accounts(&self) -> DatabaseResult<Vec<AccountSummary>> {
        let mut accounts = lock(&self.accounts).clone();
        accounts.sort_by(|a, b| compare_accounts(b, a, AccountSortField::CreatedAt));
        Ok(accounts.iter().map(AccountSummary::from).collect())
    }

    async fn find_account(&self, query: &AccountQuery) -> DatabaseResult<Page<AccountSummary>> {
        let mut matching: Vec<Account> = lock(&self.accounts)
            .iter()
            .filter(|a| query.matches(a))
            .cloned()
            .collect();
        matching.sort_by(|a, b| match query.order {
            SortOrder::Asc => compare_accounts(a, b, query.sort_by),
            SortOrder::Desc => compare_accounts(b, a, query.sort_by),
        });

        let pagination = query.pagination();
        let total = matching.len() as i64;
        let items = pagination
            .apply(matching)
            .iter()
            .map(AccountSummary::from)
            .collect();
        Ok(Page::new(items, pagination, total))
    }
}

#[derive(Clone, Default)]
pub struct InMemorySkillRepository {
    pub skills: Shared<Vec<Skill>>,
}

impl InMemorySkillRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn skill_name_taken() -> DatabaseError {
    DatabaseError::UniqueViolation("skills_name_key".to_string())
}

#[async_trait]
impl SkillRepository for InMemorySkillRepository {
    async fn create_skill(&self, name: &str, description: Option<&str>) -> DatabaseResult<Skill> {
        let now = Utc::now();
        let skill = Skill {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            description: description.map(str::to_owned),
            created_at: now,
            updated_at: now,
        };
        let mut skills = lock(&self.skills);
        if skills.iter().any(|s| s.name == name) {
            return Err(skill_name_taken());
        }
        skills.push(skill.clone());
        Ok(skill)
    }

    async fn update_skill(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> DatabaseResult<Option<Skill>> {
        let mut skills = lock(&self.skills);
        if skills.iter().any(|s| s.name == name && s.id != id) {
            return Err(skill_name_taken());
        }
        Ok(skills
            .iter_mut()
            .find(|s| s.id == id)
            .map(|skill| {
                name.clone_into(&mut skill.name);
                skill.description = description.map(str::to_owned);
                skill.updated_at = Utc::now();
                skill.clone()
            }))
    }

    async fn find_skill_by_id(&self, id: Uuid) -> DatabaseResult<Option<Skill>> {
        Ok(lock(&self.skills).iter().find(|s| s.id == id).cloned())
    }

    async fn find_skill_by_name(&self, name: &str) -> DatabaseResult<Option<Skill>> {
        Ok(lock(&self.skills).iter().find(|s| s.name == name).cloned())
    }

    async fn find_skills(&self, query: &SkillQuery) -> DatabaseResult<Page<Skill>> {
        let term = query.search_term().map(str::to_lowercase);
        let mut matching: Vec<Skill> = lock(&self.skills)
            .iter()
            .filter(|s| {
                term.as_deref()
                    .is_none_or(|term| s.name.to_lowercase().contains(term))
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));

        let pagination = query.pagination();
        let total = matching.len() as i64;
        Ok(Page::new(pagination.apply(matching), pagination, total))
    }

    async fn delete_skill(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut skills = lock(&self.skills);
        let len_before = skills.len();
        skills.retain(|s| s.id != id);
        Ok(skills.len() < len_before)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryTeacherSkillsRepository {
    pub links: Shared<HashSet<TeacherSkill>>,
}

impl InMemoryTeacherSkillsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TeacherSkillsRepository for InMemoryTeacherSkillsRepository {
    async fn save_teacher_skills(&self, teacher_skills: &[TeacherSkill]) -> DatabaseResult<()> {
        lock(&self.links).extend(teacher_skills.iter().copied());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryTrainingSessionRepository {
    pub sessions: Shared<Vec<TrainingSession>>,
}

impl InMemoryTrainingSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TrainingSessionRepository for InMemoryTrainingSessionRepository {
    async fn create_session(&self, session: &PlanningSession) -> DatabaseResult<TrainingSession> {
        let session = TrainingSession {
            id: Uuid::new_v4(),
            skill_id: session.skill_id,
            teacher_id: session.teacher_id,
            room_id: session.room_id,
            start_date: session.start_date,
            end_date: session.end_date,
            created_at: Utc::now(),
        };
        lock(&self.sessions).push(session.clone());
        Ok(session)
    }
}

/// Rooms, materials and the usages between them. One value implements the
/// room, material and usage repositories so deletes can drop usages.
#[derive(Clone, Default)]
pub struct InMemoryMaterialRoomRepository {
    pub rooms: Shared<BTreeMap<Uuid, Room>>,
    pub materials: Shared<BTreeMap<Uuid, Material>>,
    pub usages: Shared<BTreeMap<(Uuid, Uuid), MaterialRoomUsage>>,
}

impl InMemoryMaterialRoomRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_room(&self) -> Uuid {
        let id = Uuid::new_v4();
        let room = Room {
            id,
            name: format!("Room {}", id),
            capacity: None,
        };
        lock(&self.rooms).insert(id, room);
        id
    }

    pub fn add_material(&self) -> Uuid {
        let id = Uuid::new_v4();
        let material = Material {
            id,
            name: format!("Material {}", id),
        };
        lock(&self.materials).insert(id, material);
        id
    }
}

#[async_trait]
impl RoomRepository for InMemoryMaterialRoomRepository {
    async fn create_room(&self, name: &str, capacity: Option<i32>) -> DatabaseResult<Room> {
        let mut rooms = lock(&self.rooms);
        if rooms.values().any(|r| r.name == name) {
            return Err(DatabaseError::UniqueViolation("rooms_name_key".to_string()));
        }
        let room = Room {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            capacity,
        };
        rooms.insert(room.id, room.clone());
        Ok(room)
    }

    async fn find_all_rooms(&self) -> DatabaseResult<Vec<Room>> {
        let mut rooms: Vec<Room> = lock(&self.rooms).values().cloned().collect();
        rooms.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rooms)
    }

    async fn delete_room(&self, id: Uuid) -> DatabaseResult<bool> {
        if lock(&self.rooms).remove(&id).is_none() {
            return Ok(false);
        }
        lock(&self.usages).retain(|(room_id, _), _| *room_id != id);
        Ok(true)
    }
}

#[async_trait]
impl MaterialRepository for InMemoryMaterialRoomRepository {
    async fn create_material(&self, name: &str) -> DatabaseResult<Material> {
        let mut materials = lock(&self.materials);
        if materials.values().any(|m| m.name == name) {
            return Err(DatabaseError::UniqueViolation(
                "materials_name_key".to_string(),
            ));
        }
        let material = Material {
            id: Uuid::new_v4(),
            name: name.to_owned(),
        };
        materials.insert(material.id, material.clone());
        Ok(material)
    }

    async fn find_all_materials(&self) -> DatabaseResult<Vec<Material>> {
        let mut materials: Vec<Material> = lock(&self.materials).values().cloned().collect();
        materials.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(materials)
    }

    async fn delete_material(&self, id: Uuid) -> DatabaseResult<bool> {
        if lock(&self.materials).remove(&id).is_none() {
            return Ok(false);
        }
        lock(&self.usages).retain(|(_, material_id), _| *material_id != id);
        Ok(true)
    }
}

#[async_trait]
impl MaterialRoomRepository for InMemoryMaterialRoomRepository {
    async fn room_exists(&self, room_id: Uuid) -> DatabaseResult<bool> {
        Ok(lock(&self.rooms).contains_key(&room_id))
    }

    async fn material_exists(&self, material_id: Uuid) -> DatabaseResult<bool> {
        Ok(lock(&self.materials).contains_key(&material_id))
    }

    async fn insert_usage(
        &self,
        room_id: Uuid,
        material_id: Uuid,
        quantity: i32,
    ) -> DatabaseResult<Option<MaterialRoomUsage>> {
        let mut usages = lock(&self.usages);
        if usages.contains_key(&(room_id, material_id)) {
            return Ok(None);
        }
        let usage = MaterialRoomUsage {
            room_id,
            material_id,
            quantity,
            updated_at: Utc::now(),
        };
        usages.insert((room_id, material_id), usage.clone());
        Ok(Some(usage))
    }

    async fn find_usage(
        &self,
        room_id: Uuid,
        material_id: Uuid,
    ) -> DatabaseResult<Option<MaterialRoomUsage>> {
        Ok(lock(&self.usages).get(&(room_id, material_id)).cloned())
    }

    async fn find_all_usages(&self) -> DatabaseResult<Vec<MaterialRoomUsage>> {
        Ok(lock(&self.usages).values().cloned().collect())
    }

    async fn update_usage(
        &self,
        room_id: Uuid,
        material_id: Uuid,
        quantity: i32,
    ) -> DatabaseResult<Option<MaterialRoomUsage>> {
        Ok(lock(&self.usages)
            .get_mut(&(room_id, material_id))
            .map(|usage| {
                usage.quantity = quantity;
                usage.updated_at = Utc::now();
                usage.clone()
            }))
    }

    async fn delete_usage(&self, room_id: Uuid, material_id: Uuid) -> DatabaseResult<bool> {
        Ok(lock(&self.usages).remove(&(room_id, material_id)).is_some())
    }
}
