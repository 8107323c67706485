use std::fmt;
use std::time::SystemTime;

use docgate_core_types::{Action, Capability, DocumentScope, FieldKey, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A question put to the evaluator by the document store.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessRequest {
    pub user: UserId,
    pub action: Action,
    pub document: DocumentScope,
    /// Set for field-scoped actions; the field must be in the user's allocation.
    #[serde(default)]
    pub field: Option<FieldKey>,
}

impl AccessRequest {
    pub fn new(user: UserId, action: Action, document: DocumentScope) -> Self {
        Self {
            user,
            action,
            document,
            field: None,
        }
    }

    pub fn on_field(mut self, field: FieldKey) -> Self {
        self.field = Some(field);
        self
    }
}

/// Why a decision came out the way it did.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    Administrator,
    Granted,
    NoAllocation,
    MissingConfidential,
    MissingCapability(Capability),
    FieldNotAllocated(FieldKey),
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionReason::Administrator => f.write_str("administrator"),
            DecisionReason::Granted => f.write_str("granted"),
            DecisionReason::NoAllocation => f.write_str("no allocation for scope"),
            DecisionReason::MissingConfidential => f.write_str("confidential capability missing"),
            DecisionReason::MissingCapability(cap) => write!(f, "{cap} capability missing"),
            DecisionReason::FieldNotAllocated(field) => write!(f, "field {field} not allocated"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub reason: DecisionReason,
}

impl Decision {
    pub(crate) fn allow(reason: DecisionReason) -> Self {
        Self {
            allowed: true,
            reason,
        }
    }

    pub(crate) fn deny(reason: DecisionReason) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }
}

/// Event emitted whenever the evaluator issues a decision.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: Uuid,
    pub user: UserId,
    pub action: Action,
    pub document: DocumentScope,
    pub field: Option<FieldKey>,
    pub allowed: bool,
    pub reason: DecisionReason,
    pub timestamp: SystemTime,
}
