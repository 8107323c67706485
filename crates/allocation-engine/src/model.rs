use chrono::{DateTime, Utc};
use docgate_core_types::{Capabilities, FieldKey, Scope, UserId};
use serde::{Deserialize, Serialize};

/// What to do with a capability set that grants more than View without View.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityPolicy {
    /// Force View on and store the result.
    #[default]
    Normalize,
    /// Fail with `InvalidCapabilitySet`.
    Reject,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct AllocationKey {
    pub user: UserId,
    pub scope: Scope,
}

impl AllocationKey {
    pub fn new(user: UserId, scope: Scope) -> Self {
        Self { user, scope }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AllocationRequest {
    pub user: UserId,
    #[serde(flatten)]
    pub scope: Scope,
    #[serde(default)]
    pub capabilities: Capabilities,
    #[serde(default)]
    pub fields: Vec<FieldKey>,
}

/// A user's capability set and field list over one scope.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Allocation {
    pub user: UserId,
    #[serde(flatten)]
    pub scope: Scope,
    pub capabilities: Capabilities,
    pub fields: Vec<FieldKey>,
    pub allocated_by: UserId,
    pub allocated_at: DateTime<Utc>,
}

impl Allocation {
    pub fn key(&self) -> AllocationKey {
        AllocationKey::new(self.user.clone(), self.scope)
    }

    pub fn has_field(&self, field: &FieldKey) -> bool {
        self.fields.contains(field)
    }
}
