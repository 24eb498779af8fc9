//! Errors raised by the use cases

use common::error::DatabaseError;
use thiserror::Error;

/// Use-case failure. Callers branch on the variant, so `NotFound` and
/// `InvalidState` must never be merged.
#[derive(Error, Debug)]
pub enum UseCaseError {
    /// The addressed entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// The operation violates a precondition on the entity's current state
    #[error("{0}")]
    InvalidState(String),

    /// Malformed input
    #[error("{0}")]
    Validation(String),

    /// Missing or rejected credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed
    #[error("{0}")]
    Forbidden(String),

    /// Failure reported by a repository, propagated untouched
    #[error(transparent)]
    Repository(#[from] DatabaseError),

    /// Unexpected failure outside the repositories (hashing, signing)
    #[error("{0}")]
    Internal(String),
}

pub type UseCaseResult<T> = Result<T, UseCaseError>;
