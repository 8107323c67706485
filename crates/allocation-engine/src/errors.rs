use docgate_core_types::{Capabilities, ErrorKind, FieldKey, Scope, UserId};
use docgate_hierarchy_store::HierarchyError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("unknown user '{0}'")]
    UnknownUser(UserId),
    #[error("{0}")]
    UnknownScope(HierarchyError),
    #[error("field {field} is not available in {scope}")]
    UnknownField { field: FieldKey, scope: Scope },
    #[error("capabilities {0:?} grant more than view without view")]
    InvalidCapabilitySet(Capabilities),
    #[error("'{0}' is the administrator and cannot be allocated")]
    AdministratorExempt(UserId),
    #[error("no allocation for '{user}' in {scope}")]
    NotFound { user: UserId, scope: Scope },
}

impl AllocationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AllocationError::UnknownUser(_) => ErrorKind::UnknownUser,
            AllocationError::UnknownScope(_) => ErrorKind::UnknownScope,
            AllocationError::UnknownField { .. } => ErrorKind::UnknownField,
            AllocationError::InvalidCapabilitySet(_) => ErrorKind::InvalidCapabilitySet,
            AllocationError::AdministratorExempt(_) => ErrorKind::Forbidden,
            AllocationError::NotFound { .. } => ErrorKind::NotFound,
        }
    }
}
