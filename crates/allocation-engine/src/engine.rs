use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use docgate_core_types::{AdministratorPolicy, DepartmentId, Scope, SubDepartmentId, UserId};
use docgate_field_catalog::FieldDirectory;
use docgate_hierarchy_store::ScopeDirectory;
use tracing::{info, warn};

use crate::errors::AllocationError;
use crate::model::{Allocation, AllocationKey, AllocationRequest, CapabilityPolicy};
use crate::users::UserDirectory;

/// Read access to stored allocations, handed to the permission evaluator.
pub trait AllocationSource: Send + Sync {
    fn allocation(&self, user: &UserId, scope: Scope) -> Option<Allocation>;
}

/// Keyed store of allocations, one row per (user, department, sub-department).
///
/// `allocate` is a single map insert, so concurrent re-allocations of the same key
/// leave exactly one row: whichever write landed last.
pub struct AllocationEngine {
    rows: DashMap<AllocationKey, Allocation>,
    scopes: Arc<dyn ScopeDirectory>,
    fields: Arc<dyn FieldDirectory>,
    users: Arc<dyn UserDirectory>,
    admin: AdministratorPolicy,
    policy: CapabilityPolicy,
}

impl AllocationEngine {
    pub fn new(
        scopes: Arc<dyn ScopeDirectory>,
        fields: Arc<dyn FieldDirectory>,
        users: Arc<dyn UserDirectory>,
        admin: AdministratorPolicy,
    ) -> Self {
        Self {
            rows: DashMap::new(),
            scopes,
            fields,
            users,
            admin,
            policy: CapabilityPolicy::default(),
        }
    }

    pub fn with_capability_policy(mut self, policy: CapabilityPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn capability_policy(&self) -> CapabilityPolicy {
        self.policy
    }

    /// Store `request`, replacing any previous capability set and field list for its key.
    pub fn allocate(
        &self,
        request: AllocationRequest,
        actor: &UserId,
    ) -> Result<Allocation, AllocationError> {
        let AllocationRequest {
            user,
            scope,
            capabilities,
            fields,
        } = request;

        if self.admin.is_administrator(&user) {
            return Err(AllocationError::AdministratorExempt(user));
        }
        if !self.users.contains(&user) {
            return Err(AllocationError::UnknownUser(user));
        }
        self.scopes
            .check_scope(scope)
            .map_err(AllocationError::UnknownScope)?;

        let capabilities = if capabilities.requires_normalization() {
            match self.policy {
                CapabilityPolicy::Reject => {
                    return Err(AllocationError::InvalidCapabilitySet(capabilities))
                }
                CapabilityPolicy::Normalize => {
                    warn!(%user, %scope, "allocation grants more than view without view; forcing view");
                    capabilities.normalized()
                }
            }
        } else {
            capabilities
        };

        let mut field_list = Vec::with_capacity(fields.len());
        for field in fields {
            if !self.fields.is_allocatable(scope, &field) {
                return Err(AllocationError::UnknownField { field, scope });
            }
            if !field_list.contains(&field) {
                field_list.push(field);
            }
        }

        let allocation = Allocation {
            user,
            scope,
            capabilities,
            fields: field_list,
            allocated_by: actor.clone(),
            allocated_at: Utc::now(),
        };
        let replaced = self
            .rows
            .insert(allocation.key(), allocation.clone())
            .is_some();
        info!(
            user = %allocation.user,
            scope = %allocation.scope,
            fields = allocation.fields.len(),
            replaced,
            "allocation stored"
        );
        Ok(allocation)
    }

    pub fn revoke(&self, user: &UserId, scope: Scope) -> Result<Allocation, AllocationError> {
        let (_, removed) = self
            .rows
            .remove(&AllocationKey::new(user.clone(), scope))
            .ok_or_else(|| AllocationError::NotFound {
                user: user.clone(),
                scope,
            })?;
        info!(%user, %scope, "allocation revoked");
        Ok(removed)
    }

    /// Remove every allocation held by `user`. Returns how many rows were dropped.
    pub fn revoke_user(&self, user: &UserId) -> usize {
        let before = self.rows.len();
        self.rows.retain(|key, _| &key.user != user);
        let removed = before.saturating_sub(self.rows.len());
        if removed > 0 {
            info!(%user, removed, "all allocations revoked for user");
        }
        removed
    }

    pub fn allocation(&self, user: &UserId, scope: Scope) -> Option<Allocation> {
        self.rows
            .get(&AllocationKey::new(user.clone(), scope))
            .map(|entry| entry.value().clone())
    }

    /// Allocations matching the optional filters, ordered by department, sub-department, user.
    pub fn list_allocations(
        &self,
        department: Option<DepartmentId>,
        sub_department: Option<SubDepartmentId>,
    ) -> Vec<Allocation> {
        let mut rows: Vec<_> = self
            .rows
            .iter()
            .filter(|entry| {
                let scope = entry.key().scope;
                department.map_or(true, |dept| scope.department == dept)
                    && sub_department.map_or(true, |sub| scope.sub_department == sub)
            })
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by(|a, b| (a.scope, &a.user).cmp(&(b.scope, &b.user)));
        rows
    }

    pub fn allocations_for_user(&self, user: &UserId) -> Vec<Allocation> {
        let mut rows: Vec<_> = self
            .rows
            .iter()
            .filter(|entry| &entry.key().user == user)
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|row| row.scope);
        rows
    }

    /// Number of allocations inside the department (optionally narrowed to one sub-department).
    pub fn references(
        &self,
        department: DepartmentId,
        sub_department: Option<SubDepartmentId>,
    ) -> usize {
        self.rows
            .iter()
            .filter(|entry| {
                let scope = entry.key().scope;
                scope.department == department
                    && sub_department.map_or(true, |sub| scope.sub_department == sub)
            })
            .count()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl AllocationSource for AllocationEngine {
    fn allocation(&self, user: &UserId, scope: Scope) -> Option<Allocation> {
        AllocationEngine::allocation(self, user, scope)
    }
}
