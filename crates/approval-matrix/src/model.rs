use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use docgate_core_types::{Scope, UserId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalRule {
    /// Every eligible approver must approve.
    All,
    /// At least `required_approvers` distinct approvers must approve.
    Majority,
}

impl fmt::Display for ApprovalRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalRule::All => f.write_str("ALL"),
            ApprovalRule::Majority => f.write_str("MAJORITY"),
        }
    }
}

impl FromStr for ApprovalRule {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ALL" => Ok(ApprovalRule::All),
            "MAJORITY" => Ok(ApprovalRule::Majority),
            other => Err(format!("unknown approval rule '{other}'")),
        }
    }
}

/// The rule governing one (department, sub-department) scope.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApprovalMatrixEntry {
    #[serde(flatten)]
    pub scope: Scope,
    pub rule: ApprovalRule,
    /// Present exactly when `rule` is `Majority`.
    pub required_approvers: Option<u32>,
    pub defined_by: UserId,
    pub defined_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Satisfied,
    Pending,
}

impl ApprovalStatus {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, ApprovalStatus::Satisfied)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Satisfied => "satisfied",
            ApprovalStatus::Pending => "pending",
        }
    }
}

/// Outcome of a resolution with the numbers that produced it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resolution {
    pub status: ApprovalStatus,
    /// `None` when the scope has no rule and approval is not gated.
    pub rule: Option<ApprovalRule>,
    pub approvals: usize,
    /// Approvals the rule asks for; `None` when not gated.
    pub required: Option<usize>,
}
