use docgate_core_types::{ErrorKind, Scope};
use docgate_hierarchy_store::HierarchyError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApprovalError {
    #[error("{0}")]
    UnknownScope(HierarchyError),
    #[error("majority rule requires an approver count")]
    MissingApproverCount,
    #[error("approver count must be a positive integer, got {0}")]
    InvalidApproverCount(i64),
    #[error("no approval rule for {0}")]
    NotFound(Scope),
}

impl ApprovalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApprovalError::UnknownScope(_) => ErrorKind::UnknownScope,
            ApprovalError::MissingApproverCount => ErrorKind::MissingApproverCount,
            ApprovalError::InvalidApproverCount(_) => ErrorKind::InvalidApproverCount,
            ApprovalError::NotFound(_) => ErrorKind::NotFound,
        }
    }
}
