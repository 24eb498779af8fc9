//! Domain models and request/response payloads

pub mod account;
pub mod material_room;
pub mod page;
pub mod role;
pub mod skill;

// Re-export for convenience
pub use account::{
    Account, AccountDetails, AccountQuery, AccountSortField, AccountSummary, NewAccount,
};
pub use material_room::{
    Material, MaterialInput, MaterialRoomKey, MaterialRoomUsage, MaterialRoomUsageUpdate,
    MaterialUsageInput, Room, RoomInput,
};
pub use page::{Page, PageMeta, Pagination, SortOrder};
pub use role::{FormationMode, Permission, Role, RolePermissions, UnknownVariant, UsersPermissions};
pub use skill::{PlanningSession, Skill, SkillInput, SkillQuery, TeacherSkill, TrainingSession};
