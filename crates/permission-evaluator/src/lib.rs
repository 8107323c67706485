//! Allow/deny decisions for document operations.
//!
//! Resolution order: the administrator exemption, then the allocation for the
//! document's (department, sub-department), then the confidential gate, then the
//! capability matching the action, then the field list for field-scoped actions.
//! There is no inheritance between scopes.

mod decision;

pub use decision::{AccessRequest, AuditEvent, Decision, DecisionReason};

use std::sync::Arc;
use std::time::SystemTime;

use docgate_allocation_engine::AllocationSource;
use docgate_core_types::{
    Action, AdministratorPolicy, Capabilities, Capability, DocumentScope, FieldKey, Scope, UserId,
};
use tokio::sync::broadcast;
use tracing::{debug, trace};
use uuid::Uuid;

const DEFAULT_AUDIT_CAPACITY: usize = 128;

/// Operations exposed to the document store.
pub trait Authorizer: Send + Sync {
    fn decide(&self, request: &AccessRequest) -> Decision;
    fn subscribe(&self) -> broadcast::Receiver<AuditEvent>;

    fn can(&self, user: &UserId, action: Action, document: DocumentScope) -> bool {
        self.decide(&AccessRequest::new(user.clone(), action, document))
            .allowed
    }

    fn can_field(
        &self,
        user: &UserId,
        action: Action,
        document: DocumentScope,
        field: FieldKey,
    ) -> bool {
        self.decide(&AccessRequest::new(user.clone(), action, document).on_field(field))
            .allowed
    }
}

/// Evaluator over an explicit allocation store.
pub struct PermissionEvaluator {
    allocations: Arc<dyn AllocationSource>,
    admin: AdministratorPolicy,
    events: broadcast::Sender<AuditEvent>,
}

impl PermissionEvaluator {
    pub fn new(allocations: Arc<dyn AllocationSource>, admin: AdministratorPolicy) -> Self {
        Self::with_audit_capacity(allocations, admin, DEFAULT_AUDIT_CAPACITY)
    }

    pub fn with_audit_capacity(
        allocations: Arc<dyn AllocationSource>,
        admin: AdministratorPolicy,
        capacity: usize,
    ) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self {
            allocations,
            admin,
            events: tx,
        }
    }

    pub fn administrator(&self) -> &AdministratorPolicy {
        &self.admin
    }

    /// Capabilities the user effectively holds over `scope`, implicit view applied.
    pub fn effective_capabilities(&self, user: &UserId, scope: Scope) -> Option<Capabilities> {
        if self.admin.is_administrator(user) {
            return Some(Capabilities::full());
        }
        self.allocations
            .allocation(user, scope)
            .map(|allocation| allocation.capabilities.normalized())
    }

    fn evaluate(&self, request: &AccessRequest) -> Decision {
        if self.admin.is_administrator(&request.user) {
            return Decision::allow(DecisionReason::Administrator);
        }

        let Some(allocation) = self
            .allocations
            .allocation(&request.user, request.document.scope())
        else {
            return Decision::deny(DecisionReason::NoAllocation);
        };
        let capabilities = allocation.capabilities.normalized();

        if request.document.confidential && !capabilities.grants(Capability::Confidential) {
            return Decision::deny(DecisionReason::MissingConfidential);
        }

        let required = request.action.capability();
        if !capabilities.grants(required) {
            return Decision::deny(DecisionReason::MissingCapability(required));
        }

        if let Some(field) = request.field {
            if !allocation.has_field(&field) {
                return Decision::deny(DecisionReason::FieldNotAllocated(field));
            }
        }

        Decision::allow(DecisionReason::Granted)
    }

    fn publish_event(&self, request: &AccessRequest, decision: &Decision) {
        let event = AuditEvent {
            id: Uuid::new_v4(),
            user: request.user.clone(),
            action: request.action,
            document: request.document,
            field: request.field,
            allowed: decision.allowed,
            reason: decision.reason.clone(),
            timestamp: SystemTime::now(),
        };

        if self.events.send(event).is_err() {
            trace!("no audit subscribers for permission decision");
        }
    }
}

impl Authorizer for PermissionEvaluator {
    fn decide(&self, request: &AccessRequest) -> Decision {
        let decision = self.evaluate(request);
        debug!(
            user = %request.user,
            action = %request.action,
            scope = %request.document.scope(),
            confidential = request.document.confidential,
            allowed = decision.allowed,
            reason = %decision.reason,
            "permission decision"
        );
        self.publish_event(request, &decision);
        decision
    }

    fn subscribe(&self) -> broadcast::Receiver<AuditEvent> {
        self.events.subscribe()
    }
}
