//! `AccessCore` wires the component stores together and owns the rules that
//! span more than one of them.
//!
//! Administrative writes require the administrator identity. Deletions in the
//! hierarchy take the topology lock exclusively; allocation and rule writes take
//! it shared, so a scope cannot disappear between validation and insert.

use std::collections::HashSet;
use std::sync::Arc;

use docgate_allocation_engine::{
    Allocation, AllocationEngine, AllocationRequest, CapabilityPolicy, InMemoryUserDirectory,
    UserDirectory, UserRecord,
};
use docgate_approval_matrix::{
    ApprovalLedger, ApprovalMatrix, ApprovalMatrixEntry, ApprovalRule, ApprovalStatus, Resolution,
};
use docgate_core_types::{
    Action, AdministratorPolicy, Capabilities, DepartmentId, DocumentId, DocumentScope, FieldKey,
    FieldSlot, Scope, SubDepartmentId, UserId,
};
use docgate_field_catalog::{FieldCatalog, FieldDefinition, FieldScope};
use docgate_hierarchy_store::{
    Department, DepartmentTree, HierarchyError, HierarchyStore, SubDepartment,
};
use docgate_permission_evaluator::{
    AccessRequest, AuditEvent, Authorizer, Decision, PermissionEvaluator,
};
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::config::Config;
use crate::errors::CoreError;
use crate::metrics;

const DEFAULT_AUDIT_CAPACITY: usize = 128;

pub struct AccessCore {
    admin: AdministratorPolicy,
    hierarchy: Arc<HierarchyStore>,
    fields: Arc<FieldCatalog>,
    users: Arc<InMemoryUserDirectory>,
    allocations: Arc<AllocationEngine>,
    approvals: ApprovalMatrix,
    ledger: ApprovalLedger,
    evaluator: PermissionEvaluator,
    topology: RwLock<()>,
}

impl AccessCore {
    pub fn new(admin: AdministratorPolicy) -> Self {
        Self::assemble(admin, CapabilityPolicy::default(), DEFAULT_AUDIT_CAPACITY)
    }

    pub fn from_config(config: &Config) -> Self {
        Self::assemble(
            config.administrator_policy(),
            config.capability_policy,
            config.audit_channel_capacity,
        )
    }

    fn assemble(
        admin: AdministratorPolicy,
        policy: CapabilityPolicy,
        audit_capacity: usize,
    ) -> Self {
        let hierarchy = Arc::new(HierarchyStore::new());
        let fields = Arc::new(FieldCatalog::new());
        let users = Arc::new(InMemoryUserDirectory::new());
        let allocations = Arc::new(
            AllocationEngine::new(
                hierarchy.clone(),
                fields.clone(),
                users.clone(),
                admin.clone(),
            )
            .with_capability_policy(policy),
        );
        let approvals = ApprovalMatrix::new(hierarchy.clone());
        let evaluator = PermissionEvaluator::with_audit_capacity(
            allocations.clone(),
            admin.clone(),
            audit_capacity,
        );
        metrics::register_metrics(metrics::global_registry());
        info!(administrator = %admin.administrator(), ?policy, "access core assembled");

        Self {
            admin,
            hierarchy,
            fields,
            users,
            allocations,
            approvals,
            ledger: ApprovalLedger::new(),
            evaluator,
            topology: RwLock::new(()),
        }
    }

    pub fn administrator(&self) -> &UserId {
        self.admin.administrator()
    }

    pub fn is_administrator(&self, user: &UserId) -> bool {
        self.admin.is_administrator(user)
    }

    pub fn capability_policy(&self) -> CapabilityPolicy {
        self.allocations.capability_policy()
    }

    fn require_admin(&self, actor: &UserId) -> Result<(), CoreError> {
        if self.admin.is_administrator(actor) {
            Ok(())
        } else {
            warn!(%actor, "administrative write refused");
            Err(CoreError::Forbidden(format!(
                "{actor} is not the administrator"
            )))
        }
    }

    // Hierarchy

    pub fn create_department(
        &self,
        actor: &UserId,
        code: &str,
        name: &str,
    ) -> Result<Department, CoreError> {
        self.require_admin(actor)?;
        Ok(self.hierarchy.create_department(code, name, actor)?)
    }

    pub fn create_sub_department(
        &self,
        actor: &UserId,
        department: DepartmentId,
        code: &str,
        name: &str,
    ) -> Result<SubDepartment, CoreError> {
        self.require_admin(actor)?;
        Ok(self
            .hierarchy
            .create_sub_department(department, code, name, actor)?)
    }

    pub fn update_department(
        &self,
        actor: &UserId,
        id: DepartmentId,
        code: &str,
        name: &str,
    ) -> Result<Department, CoreError> {
        self.require_admin(actor)?;
        Ok(self.hierarchy.update_department(id, code, name)?)
    }

    /// Moving a sub-department is refused while allocations or rules still
    /// reference it under its current department.
    pub fn update_sub_department(
        &self,
        actor: &UserId,
        id: SubDepartmentId,
        department: DepartmentId,
        code: &str,
        name: &str,
    ) -> Result<SubDepartment, CoreError> {
        self.require_admin(actor)?;
        let _topology = self.topology.write();
        let current = self.hierarchy.sub_department(id)?;
        if current.department != department {
            self.ensure_unreferenced(current.department, Some(id))?;
        }
        Ok(self
            .hierarchy
            .update_sub_department(id, department, code, name)?)
    }

    pub fn set_department_active(
        &self,
        actor: &UserId,
        id: DepartmentId,
        active: bool,
    ) -> Result<Department, CoreError> {
        self.require_admin(actor)?;
        Ok(self.hierarchy.set_department_active(id, active)?)
    }

    pub fn set_sub_department_active(
        &self,
        actor: &UserId,
        id: SubDepartmentId,
        active: bool,
    ) -> Result<SubDepartment, CoreError> {
        self.require_admin(actor)?;
        Ok(self.hierarchy.set_sub_department_active(id, active)?)
    }

    pub fn delete_department(
        &self,
        actor: &UserId,
        id: DepartmentId,
    ) -> Result<Department, CoreError> {
        self.require_admin(actor)?;
        let _topology = self.topology.write();
        self.hierarchy.department(id)?;
        self.ensure_unreferenced(id, None)?;
        let removed = self.hierarchy.delete_department(id)?;
        self.fields
            .purge_scope(FieldScope::Department { department: id });
        Ok(removed)
    }

    pub fn delete_sub_department(
        &self,
        actor: &UserId,
        id: SubDepartmentId,
    ) -> Result<SubDepartment, CoreError> {
        self.require_admin(actor)?;
        let _topology = self.topology.write();
        let sub = self.hierarchy.sub_department(id)?;
        self.ensure_unreferenced(sub.department, Some(id))?;
        let removed = self.hierarchy.delete_sub_department(id)?;
        self.fields.purge_scope(FieldScope::SubDepartment {
            department: removed.department,
            sub_department: removed.id,
        });
        Ok(removed)
    }

    fn ensure_unreferenced(
        &self,
        department: DepartmentId,
        sub_department: Option<SubDepartmentId>,
    ) -> Result<(), CoreError> {
        let allocations = self.allocations.references(department, sub_department);
        let rules = self.approvals.references(department, sub_department);
        if allocations == 0 && rules == 0 {
            return Ok(());
        }
        let target = match sub_department {
            Some(sub) => format!("sub-department {sub}"),
            None => format!("department {department}"),
        };
        Err(CoreError::Conflict(format!(
            "{target} is referenced by {allocations} allocation(s) and {rules} approval rule(s)"
        )))
    }

    pub fn list_departments(&self) -> Vec<DepartmentTree> {
        self.hierarchy.list_departments()
    }

    pub fn department(&self, id: DepartmentId) -> Result<Department, CoreError> {
        Ok(self.hierarchy.department(id)?)
    }

    pub fn sub_department(&self, id: SubDepartmentId) -> Result<SubDepartment, CoreError> {
        Ok(self.hierarchy.sub_department(id)?)
    }

    pub fn department_by_code(&self, code: &str) -> Result<Department, CoreError> {
        self.hierarchy
            .department_by_code(code)
            .ok_or_else(|| CoreError::NotFound(format!("department code '{code}'")))
    }

    /// Resolve department and sub-department codes to a scope.
    pub fn scope_by_codes(
        &self,
        department: &str,
        sub_department: &str,
    ) -> Result<Scope, CoreError> {
        let dept = self.department_by_code(department)?;
        let sub = self
            .hierarchy
            .sub_department_by_code(sub_department)
            .ok_or_else(|| {
                CoreError::NotFound(format!("sub-department code '{sub_department}'"))
            })?;
        if sub.department != dept.id {
            return Err(CoreError::InvalidInput(format!(
                "sub-department '{}' does not belong to department '{}'",
                sub.code, dept.code
            )));
        }
        Ok(Scope::new(dept.id, sub.id))
    }

    pub(crate) fn hierarchy(&self) -> &HierarchyStore {
        &self.hierarchy
    }

    // Field catalog

    fn check_field_scope(&self, scope: FieldScope) -> Result<(), CoreError> {
        match scope {
            FieldScope::Global => Ok(()),
            FieldScope::Department { department } => {
                self.hierarchy.department(department)?;
                Ok(())
            }
            FieldScope::SubDepartment {
                department,
                sub_department,
            } => {
                let sub = self.hierarchy.sub_department(sub_department)?;
                if sub.department != department {
                    return Err(HierarchyError::UnknownScope {
                        scope: Scope::new(department, sub_department),
                        reason: "sub-department belongs to another department",
                    }
                    .into());
                }
                Ok(())
            }
        }
    }

    pub fn list_fields(&self, scope: FieldScope) -> Result<Vec<FieldDefinition>, CoreError> {
        self.check_field_scope(scope)?;
        Ok(self.fields.list_fields(scope))
    }

    pub fn active_fields(&self, scope: FieldScope) -> Result<Vec<FieldDefinition>, CoreError> {
        self.check_field_scope(scope)?;
        Ok(self.fields.active_fields(scope))
    }

    pub fn set_field(
        &self,
        actor: &UserId,
        scope: FieldScope,
        slot: FieldSlot,
        label: &str,
        active: bool,
    ) -> Result<FieldDefinition, CoreError> {
        self.require_admin(actor)?;
        let _topology = self.topology.read();
        self.check_field_scope(scope)?;
        Ok(self.fields.set_field(scope, slot, label, active)?)
    }

    pub fn reset_field(
        &self,
        actor: &UserId,
        scope: FieldScope,
        slot: FieldSlot,
    ) -> Result<FieldDefinition, CoreError> {
        self.require_admin(actor)?;
        Ok(self.fields.reset_field(scope, slot)?)
    }

    // Users

    pub fn register_user(
        &self,
        actor: &UserId,
        user: UserId,
        display_name: Option<String>,
    ) -> Result<UserRecord, CoreError> {
        self.require_admin(actor)?;
        if self.admin.is_administrator(&user) {
            return Err(CoreError::InvalidInput(format!(
                "{user} is the administrator and needs no registration"
            )));
        }
        if user.as_str().trim().is_empty() {
            return Err(CoreError::InvalidInput("user id must not be empty".into()));
        }
        let record = self.users.register(user, display_name);
        info!(user = %record.id, "user registered");
        Ok(record)
    }

    /// Remove a user and every allocation the user holds. Returns the revoked count.
    pub fn remove_user(&self, actor: &UserId, user: &UserId) -> Result<usize, CoreError> {
        self.require_admin(actor)?;
        self.users
            .remove(user)
            .ok_or_else(|| CoreError::UnknownUser(user.to_string()))?;
        let revoked = self.allocations.revoke_user(user);
        metrics::set_allocation_rows(self.allocations.len());
        info!(%user, revoked, "user removed");
        Ok(revoked)
    }

    pub fn users(&self) -> Vec<UserRecord> {
        self.users.list()
    }

    pub fn has_user(&self, user: &UserId) -> bool {
        self.users.contains(user)
    }

    // Allocations

    pub fn allocate(
        &self,
        actor: &UserId,
        request: AllocationRequest,
    ) -> Result<Allocation, CoreError> {
        self.require_admin(actor)?;
        let allocation = {
            let _topology = self.topology.read();
            self.allocations.allocate(request, actor)?
        };
        metrics::record_allocation(self.allocations.len());
        Ok(allocation)
    }

    pub fn revoke(
        &self,
        actor: &UserId,
        user: &UserId,
        scope: Scope,
    ) -> Result<Allocation, CoreError> {
        self.require_admin(actor)?;
        let removed = self.allocations.revoke(user, scope)?;
        metrics::set_allocation_rows(self.allocations.len());
        Ok(removed)
    }

    pub fn allocation(&self, user: &UserId, scope: Scope) -> Option<Allocation> {
        self.allocations.allocation(user, scope)
    }

    pub fn list_allocations(
        &self,
        department: Option<DepartmentId>,
        sub_department: Option<SubDepartmentId>,
    ) -> Vec<Allocation> {
        self.allocations.list_allocations(department, sub_department)
    }

    pub fn allocations_for_user(&self, user: &UserId) -> Vec<Allocation> {
        self.allocations.allocations_for_user(user)
    }

    // Approval matrix

    pub fn define_rule(
        &self,
        actor: &UserId,
        scope: Scope,
        rule: ApprovalRule,
        required_approvers: Option<i64>,
    ) -> Result<ApprovalMatrixEntry, CoreError> {
        self.require_admin(actor)?;
        let _topology = self.topology.read();
        Ok(self
            .approvals
            .define_rule(scope, rule, required_approvers, actor)?)
    }

    pub fn delete_rule(
        &self,
        actor: &UserId,
        scope: Scope,
    ) -> Result<ApprovalMatrixEntry, CoreError> {
        self.require_admin(actor)?;
        Ok(self.approvals.delete_rule(scope)?)
    }

    pub fn rule(&self, scope: Scope) -> Option<ApprovalMatrixEntry> {
        self.approvals.rule(scope)
    }

    pub fn list_rules(&self) -> Vec<ApprovalMatrixEntry> {
        self.approvals.list_rules()
    }

    pub fn resolve(
        &self,
        scope: Scope,
        approvals: &HashSet<UserId>,
        total_eligible: u32,
    ) -> ApprovalStatus {
        self.evaluate_approvals(scope, approvals, total_eligible)
            .status
    }

    pub fn evaluate_approvals(
        &self,
        scope: Scope,
        approvals: &HashSet<UserId>,
        total_eligible: u32,
    ) -> Resolution {
        let resolution = self.approvals.evaluate(scope, approvals, total_eligible);
        metrics::record_resolution(resolution.status.as_str());
        resolution
    }

    /// Record `approver`'s approval of `document`. Returns false when it was already recorded.
    pub fn cast_approval(
        &self,
        approver: &UserId,
        document: &DocumentId,
    ) -> Result<bool, CoreError> {
        if !self.admin.is_administrator(approver) && !self.users.contains(approver) {
            return Err(CoreError::UnknownUser(approver.to_string()));
        }
        let recorded = self.ledger.cast(document, approver);
        info!(%document, %approver, recorded, "approval cast");
        Ok(recorded)
    }

    pub fn withdraw_approval(&self, approver: &UserId, document: &DocumentId) -> bool {
        let withdrawn = self.ledger.withdraw(document, approver);
        if withdrawn {
            info!(%document, %approver, "approval withdrawn");
        }
        withdrawn
    }

    pub fn approvers(&self, document: &DocumentId) -> Vec<UserId> {
        self.ledger.approvers(document)
    }

    pub fn document_status(
        &self,
        document: &DocumentId,
        scope: Scope,
        total_eligible: u32,
    ) -> Resolution {
        let resolution = self
            .approvals
            .resolve_document(&self.ledger, document, scope, total_eligible);
        metrics::record_resolution(resolution.status.as_str());
        resolution
    }

    // Permission evaluation

    pub fn decide(&self, request: &AccessRequest) -> Decision {
        let decision = self.evaluator.decide(request);
        metrics::record_decision(decision.allowed);
        decision
    }

    pub fn can(&self, user: &UserId, action: Action, document: DocumentScope) -> bool {
        self.decide(&AccessRequest::new(user.clone(), action, document))
            .allowed
    }

    pub fn can_field(
        &self,
        user: &UserId,
        action: Action,
        document: DocumentScope,
        field: FieldKey,
    ) -> bool {
        self.decide(&AccessRequest::new(user.clone(), action, document).on_field(field))
            .allowed
    }

    pub fn effective_capabilities(&self, user: &UserId, scope: Scope) -> Option<Capabilities> {
        self.evaluator.effective_capabilities(user, scope)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuditEvent> {
        self.evaluator.subscribe()
    }
}
