use docgate_core_types::Scope;

use crate::errors::HierarchyError;

/// Scope validation consumed by the allocation engine and the approval matrix.
pub trait ScopeDirectory: Send + Sync {
    /// Ok when the department is active and the sub-department is active and belongs to it.
    fn check_scope(&self, scope: Scope) -> Result<(), HierarchyError>;
}
