//! Shared error types for the services crate.

use thiserror::Error;

use planner_core::model::SubjectError;
use storage::repository::StorageError;

/// Errors emitted by `PlannerService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlannerError {
    #[error(transparent)]
    Subject(#[from] SubjectError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the burnout study session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("a study session is already running")]
    AlreadyRunning,
    #[error("no study session is running")]
    NotRunning,
}
