use docgate_core_types::{ErrorKind, FieldSlot};
use thiserror::Error;

use crate::model::FieldScope;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("slot index {} outside 1..=10", .0.index)]
    InvalidSlot(FieldSlot),
    #[error("field label must not be empty")]
    EmptyLabel,
    #[error("no definition for {slot:?} at {scope}")]
    NotFound { scope: FieldScope, slot: FieldSlot },
}

impl FieldError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FieldError::InvalidSlot(_) | FieldError::EmptyLabel => ErrorKind::InvalidInput,
            FieldError::NotFound { .. } => ErrorKind::NotFound,
        }
    }
}
