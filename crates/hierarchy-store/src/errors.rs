use std::fmt;

use docgate_core_types::{DepartmentId, ErrorKind, Scope, SubDepartmentId};
use thiserror::Error;

/// Which level of the hierarchy an error refers to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tier {
    Department,
    SubDepartment,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Department => f.write_str("department"),
            Tier::SubDepartment => f.write_str("sub-department"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("department {0} not found")]
    DepartmentNotFound(DepartmentId),
    #[error("sub-department {0} not found")]
    SubDepartmentNotFound(SubDepartmentId),
    #[error("{tier} code '{code}' already in use")]
    DuplicateCode { tier: Tier, code: String },
    #[error("{tier} name '{name}' already in use")]
    DuplicateName { tier: Tier, name: String },
    #[error("unknown or inactive department {0}")]
    UnknownDepartment(DepartmentId),
    #[error("unknown scope ({scope}): {reason}")]
    UnknownScope { scope: Scope, reason: &'static str },
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl HierarchyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HierarchyError::DepartmentNotFound(_) | HierarchyError::SubDepartmentNotFound(_) => {
                ErrorKind::NotFound
            }
            HierarchyError::DuplicateCode { .. } => ErrorKind::DuplicateCode,
            HierarchyError::DuplicateName { .. } => ErrorKind::DuplicateName,
            HierarchyError::UnknownDepartment(_) => ErrorKind::UnknownDepartment,
            HierarchyError::UnknownScope { .. } => ErrorKind::UnknownScope,
            HierarchyError::Conflict(_) => ErrorKind::Conflict,
            HierarchyError::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }
}
