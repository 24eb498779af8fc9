//! Training back office service
//!
//! Account lifecycle, role permissions, skills and training planning, and
//! material-to-room assignment behind a guarded HTTP API.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod extract;
pub mod guards;
pub mod jwt;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod usecases;
pub mod validation;

pub use state::AppState;
#[cfg(any(test, feature = "mocks"))]
pub use state::InMemoryRepositories;

/// Migrations embedded at build time
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
