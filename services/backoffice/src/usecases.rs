//! Application use cases
//!
//! Use cases hold their repositories as `Arc<dyn Trait>` and carry no other
//! state, so they are cheap to build per request from [`crate::AppState`].

pub mod account_management;
pub mod auth;
pub mod error;
pub mod inventory;
pub mod material_room;
pub mod skill;

pub use account_management::AccountManagementUseCases;
pub use auth::{
    AccessToken, AuthUseCases, LoginRequest, RefreshTokenRequest, SignUpRequest, TokenPair,
};
pub use error::{UseCaseError, UseCaseResult};
pub use inventory::InventoryUseCases;
pub use material_room::MaterialRoomUseCases;
pub use skill::SkillUseCases;
