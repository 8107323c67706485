pub mod api;
pub mod errors;
pub mod model;
pub mod state;
mod uniqueness;

pub use api::ScopeDirectory;
pub use errors::{HierarchyError, Tier};
pub use model::{Audit, Department, DepartmentTree, SubDepartment};
pub use state::HierarchyStore;

#[cfg(test)]
mod tests;
