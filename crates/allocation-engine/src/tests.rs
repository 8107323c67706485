use std::sync::Arc;

use docgate_core_types::{
    AdministratorPolicy, Capabilities, Capability, ErrorKind, FieldKey, FieldSlot, Scope,
    SystemField, UserId,
};
use docgate_field_catalog::{FieldCatalog, FieldScope};
use docgate_hierarchy_store::HierarchyStore;

use crate::engine::{AllocationEngine, AllocationSource};
use crate::errors::AllocationError;
use crate::model::{AllocationRequest, CapabilityPolicy};
use crate::users::InMemoryUserDirectory;

struct Fixture {
    engine: AllocationEngine,
    hierarchy: Arc<HierarchyStore>,
    catalog: Arc<FieldCatalog>,
    scope: Scope,
}

fn fixture() -> Fixture {
    let admin = UserId::new("admin");
    let hierarchy = Arc::new(HierarchyStore::new());
    let dept = hierarchy.create_department("FIN", "Finance", &admin).unwrap();
    let sub = hierarchy
        .create_sub_department(dept.id, "AP", "Accounts Payable", &admin)
        .unwrap();
    let catalog = Arc::new(FieldCatalog::new());
    catalog
        .set_field(FieldScope::Global, FieldSlot::text(1), "Invoice No", true)
        .unwrap();
    let users = Arc::new(InMemoryUserDirectory::new());
    users.register(UserId::new("alice"), Some("Alice".into()));
    users.register(UserId::new("bob"), None);

    let engine = AllocationEngine::new(
        hierarchy.clone(),
        catalog.clone(),
        users,
        AdministratorPolicy::default(),
    );
    Fixture {
        engine,
        hierarchy,
        catalog,
        scope: Scope::new(dept.id, sub.id),
    }
}

fn request(user: &str, scope: Scope, caps: &[Capability]) -> AllocationRequest {
    AllocationRequest {
        user: UserId::new(user),
        scope,
        capabilities: Capabilities::from_list(caps),
        fields: Vec::new(),
    }
}

fn actor() -> UserId {
    UserId::new("admin")
}

#[test]
fn allocate_then_lookup() {
    let fx = fixture();
    let stored = fx
        .engine
        .allocate(
            request("alice", fx.scope, &[Capability::View, Capability::Add]),
            &actor(),
        )
        .unwrap();
    assert_eq!(stored.allocated_by, actor());
    let found = fx
        .engine
        .allocation(&UserId::new("alice"), fx.scope)
        .unwrap();
    assert!(found.capabilities.add);
    assert!(!found.capabilities.edit);
}

#[test]
fn missing_view_is_normalized_by_default() {
    let fx = fixture();
    let stored = fx
        .engine
        .allocate(request("alice", fx.scope, &[Capability::Edit]), &actor())
        .unwrap();
    assert!(stored.capabilities.view);
    assert!(stored.capabilities.edit);
}

#[test]
fn missing_view_is_rejected_under_reject_policy() {
    let fx = fixture();
    let engine = fx.engine.with_capability_policy(CapabilityPolicy::Reject);
    let err = engine
        .allocate(request("alice", fx.scope, &[Capability::Print]), &actor())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCapabilitySet);
    assert!(engine.is_empty());
}

#[test]
fn reallocation_replaces_instead_of_merging() {
    let fx = fixture();
    let alice = UserId::new("alice");
    let mut first = request("alice", fx.scope, &[Capability::View, Capability::Add]);
    first.fields = vec![FieldKey::Slot(FieldSlot::text(1))];
    fx.engine.allocate(first, &actor()).unwrap();
    fx.engine
        .allocate(request("alice", fx.scope, &[Capability::View]), &actor())
        .unwrap();

    let rows = fx.engine.list_allocations(None, None);
    assert_eq!(rows.len(), 1);
    assert!(!rows[0].capabilities.add);
    assert!(rows[0].fields.is_empty());
    assert_eq!(rows[0].user, alice);
}

#[test]
fn unknown_user_and_scope_are_rejected() {
    let fx = fixture();
    let err = fx
        .engine
        .allocate(request("mallory", fx.scope, &[Capability::View]), &actor())
        .unwrap_err();
    assert_eq!(err, AllocationError::UnknownUser(UserId::new("mallory")));

    let hr = fx
        .hierarchy
        .create_department("HR", "Human Resources", &actor())
        .unwrap();
    let foreign = Scope::new(hr.id, fx.scope.sub_department);
    let err = fx
        .engine
        .allocate(request("alice", foreign, &[Capability::View]), &actor())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownScope);
}

#[test]
fn administrator_is_never_stored() {
    let fx = fixture();
    let err = fx
        .engine
        .allocate(request("admin", fx.scope, &[Capability::View]), &actor())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[test]
fn fields_must_be_active_and_are_deduplicated() {
    let fx = fixture();
    let mut req = request("alice", fx.scope, &[Capability::View]);
    req.fields = vec![FieldKey::Slot(FieldSlot::text(2))];
    let err = fx.engine.allocate(req, &actor()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownField);

    let mut req = request("alice", fx.scope, &[Capability::View]);
    req.fields = vec![
        FieldKey::Slot(FieldSlot::text(1)),
        FieldKey::System(SystemField::Title),
        FieldKey::Slot(FieldSlot::text(1)),
    ];
    let stored = fx.engine.allocate(req, &actor()).unwrap();
    assert_eq!(
        stored.fields,
        vec![
            FieldKey::Slot(FieldSlot::text(1)),
            FieldKey::System(SystemField::Title)
        ]
    );

    fx.catalog
        .set_field(FieldScope::Global, FieldSlot::text(1), "Invoice No", false)
        .unwrap();
    let kept = fx
        .engine
        .allocation(&UserId::new("alice"), fx.scope)
        .unwrap();
    assert!(kept.has_field(&FieldKey::Slot(FieldSlot::text(1))));
}

#[test]
fn revoke_removes_row_once() {
    let fx = fixture();
    let alice = UserId::new("alice");
    fx.engine
        .allocate(request("alice", fx.scope, &[Capability::View]), &actor())
        .unwrap();
    fx.engine.revoke(&alice, fx.scope).unwrap();
    assert!(AllocationSource::allocation(&fx.engine, &alice, fx.scope).is_none());
    let err = fx.engine.revoke(&alice, fx.scope).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn listing_filters_and_orders() {
    let fx = fixture();
    let ar = fx
        .hierarchy
        .create_sub_department(fx.scope.department, "AR", "Accounts Receivable", &actor())
        .unwrap();
    let ar_scope = Scope::new(fx.scope.department, ar.id);
    fx.engine
        .allocate(request("bob", ar_scope, &[Capability::View]), &actor())
        .unwrap();
    fx.engine
        .allocate(request("bob", fx.scope, &[Capability::View]), &actor())
        .unwrap();
    fx.engine
        .allocate(request("alice", fx.scope, &[Capability::View]), &actor())
        .unwrap();

    let all = fx.engine.list_allocations(Some(fx.scope.department), None);
    let order: Vec<_> = all
        .iter()
        .map(|row| (row.scope.sub_department.0, row.user.as_str().to_string()))
        .collect();
    assert_eq!(
        order,
        vec![
            (fx.scope.sub_department.0, "alice".to_string()),
            (fx.scope.sub_department.0, "bob".to_string()),
            (ar.id.0, "bob".to_string()),
        ]
    );
    assert_eq!(fx.engine.list_allocations(None, Some(ar.id)).len(), 1);
    assert_eq!(fx.engine.references(fx.scope.department, None), 3);
    assert_eq!(
        fx.engine
            .references(fx.scope.department, Some(fx.scope.sub_department)),
        2
    );
    assert_eq!(fx.engine.allocations_for_user(&UserId::new("bob")).len(), 2);
    assert_eq!(fx.engine.revoke_user(&UserId::new("bob")), 2);
    assert_eq!(fx.engine.len(), 1);
}

#[test]
fn concurrent_allocations_leave_one_row() {
    let fx = Arc::new(fixture());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let fx = Arc::clone(&fx);
            std::thread::spawn(move || {
                let caps = if i % 2 == 0 {
                    vec![Capability::View]
                } else {
                    vec![Capability::View, Capability::Delete]
                };
                fx.engine
                    .allocate(request("alice", fx.scope, &caps), &actor())
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(fx.engine.len(), 1);
}

#[test]
fn request_deserializes_from_flat_json() {
    let raw = serde_json::json!({
        "user": "alice",
        "department": 1,
        "sub_department": 1,
        "capabilities": { "view": true, "print": true },
        "fields": ["text:1", "system:title"]
    });
    let req: AllocationRequest = serde_json::from_value(raw).unwrap();
    assert!(req.capabilities.print);
    assert!(!req.capabilities.add);
    assert_eq!(req.fields.len(), 2);
}
