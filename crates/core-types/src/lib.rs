//! Shared primitives for the docgate crates.
//!
//! Everything here is plain data: identifiers, scopes, the capability set, field
//! keys and the error-kind taxonomy every component maps its failures onto.

mod capability;
mod error;
mod field;
mod ids;

pub use capability::{Action, Capabilities, Capability};
pub use error::ErrorKind;
pub use field::{FieldKey, FieldKind, FieldSlot, SystemField, SLOT_COUNT};
pub use ids::{
    AdministratorPolicy, DepartmentId, DocumentId, DocumentScope, Scope, SubDepartmentId, UserId,
};

use thiserror::Error;

/// Failure to parse one of the textual forms accepted by this crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown action '{0}'")]
    Action(String),
    #[error("unknown capability '{0}'")]
    Capability(String),
    #[error("invalid field key '{0}'")]
    FieldKey(String),
}
