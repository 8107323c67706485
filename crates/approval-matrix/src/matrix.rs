use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use docgate_core_types::{DepartmentId, DocumentId, Scope, SubDepartmentId, UserId};
use docgate_hierarchy_store::ScopeDirectory;
use tracing::{debug, info};

use crate::errors::ApprovalError;
use crate::ledger::ApprovalLedger;
use crate::model::{ApprovalMatrixEntry, ApprovalRule, ApprovalStatus, Resolution};

/// Approval rules keyed by scope, at most one per (department, sub-department).
pub struct ApprovalMatrix {
    entries: DashMap<Scope, ApprovalMatrixEntry>,
    scopes: Arc<dyn ScopeDirectory>,
}

impl ApprovalMatrix {
    pub fn new(scopes: Arc<dyn ScopeDirectory>) -> Self {
        Self {
            entries: DashMap::new(),
            scopes,
        }
    }

    /// Define the rule for `scope`, atomically replacing any previous entry.
    ///
    /// A count supplied with `All` is ignored.
    pub fn define_rule(
        &self,
        scope: Scope,
        rule: ApprovalRule,
        required_approvers: Option<i64>,
        actor: &UserId,
    ) -> Result<ApprovalMatrixEntry, ApprovalError> {
        self.scopes
            .check_scope(scope)
            .map_err(ApprovalError::UnknownScope)?;
        let required_approvers = match rule {
            ApprovalRule::All => None,
            ApprovalRule::Majority => {
                let count = required_approvers.ok_or(ApprovalError::MissingApproverCount)?;
                let count = u32::try_from(count)
                    .ok()
                    .filter(|count| *count >= 1)
                    .ok_or(ApprovalError::InvalidApproverCount(count))?;
                Some(count)
            }
        };
        let entry = ApprovalMatrixEntry {
            scope,
            rule,
            required_approvers,
            defined_by: actor.clone(),
            defined_at: Utc::now(),
        };
        let replaced = self.entries.insert(scope, entry.clone()).is_some();
        info!(%scope, %rule, ?required_approvers, replaced, "approval rule defined");
        Ok(entry)
    }

    pub fn delete_rule(&self, scope: Scope) -> Result<ApprovalMatrixEntry, ApprovalError> {
        let (_, removed) = self
            .entries
            .remove(&scope)
            .ok_or(ApprovalError::NotFound(scope))?;
        info!(%scope, "approval rule deleted");
        Ok(removed)
    }

    pub fn rule(&self, scope: Scope) -> Option<ApprovalMatrixEntry> {
        self.entries.get(&scope).map(|entry| entry.value().clone())
    }

    pub fn list_rules(&self) -> Vec<ApprovalMatrixEntry> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by_key(|entry| entry.scope);
        entries
    }

    pub fn references(
        &self,
        department: DepartmentId,
        sub_department: Option<SubDepartmentId>,
    ) -> usize {
        self.entries
            .iter()
            .filter(|entry| {
                let scope = *entry.key();
                scope.department == department
                    && sub_department.map_or(true, |sub| scope.sub_department == sub)
            })
            .count()
    }

    /// Whether `approvals` satisfy the rule for `scope`. Scopes without a rule are not gated.
    pub fn resolve(
        &self,
        scope: Scope,
        approvals: &HashSet<UserId>,
        total_eligible: u32,
    ) -> ApprovalStatus {
        self.evaluate(scope, approvals, total_eligible).status
    }

    pub fn evaluate(
        &self,
        scope: Scope,
        approvals: &HashSet<UserId>,
        total_eligible: u32,
    ) -> Resolution {
        let cast = approvals.len();
        let resolution = match self.rule(scope) {
            None => Resolution {
                status: ApprovalStatus::Satisfied,
                rule: None,
                approvals: cast,
                required: None,
            },
            Some(entry) => {
                let (satisfied, required) = match entry.rule {
                    ApprovalRule::All => {
                        let total = total_eligible as usize;
                        (total > 0 && cast == total, total)
                    }
                    ApprovalRule::Majority => {
                        let required = entry.required_approvers.unwrap_or(1) as usize;
                        (cast >= required, required)
                    }
                };
                Resolution {
                    status: if satisfied {
                        ApprovalStatus::Satisfied
                    } else {
                        ApprovalStatus::Pending
                    },
                    rule: Some(entry.rule),
                    approvals: cast,
                    required: Some(required),
                }
            }
        };
        debug!(
            %scope,
            approvals = cast,
            total_eligible,
            status = resolution.status.as_str(),
            "approval resolved"
        );
        resolution
    }

    /// Resolve against the approvals the ledger currently holds for `document`.
    pub fn resolve_document(
        &self,
        ledger: &ApprovalLedger,
        document: &DocumentId,
        scope: Scope,
        total_eligible: u32,
    ) -> Resolution {
        self.evaluate(scope, &ledger.approvals(document), total_eligible)
    }
}
