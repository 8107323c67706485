//! Error type for the `AccessCore` facade.
//!
//! Component errors pass through unchanged; the facade adds the cases that only
//! exist once components are combined (authorization of administrative writes,
//! referential guards across stores, code lookups).

use docgate_allocation_engine::AllocationError;
use docgate_approval_matrix::ApprovalError;
use docgate_core_types::ErrorKind;
use docgate_field_catalog::FieldError;
use docgate_hierarchy_store::HierarchyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error(transparent)]
    Approval(#[from] ApprovalError),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("unknown user {0}")]
    UnknownUser(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Hierarchy(err) => err.kind(),
            CoreError::Field(err) => err.kind(),
            CoreError::Allocation(err) => err.kind(),
            CoreError::Approval(err) => err.kind(),
            CoreError::Forbidden(_) => ErrorKind::Forbidden,
            CoreError::Conflict(_) => ErrorKind::Conflict,
            CoreError::NotFound(_) => ErrorKind::NotFound,
            CoreError::UnknownUser(_) => ErrorKind::UnknownUser,
            CoreError::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }
}
