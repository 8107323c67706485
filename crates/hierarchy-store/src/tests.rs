use docgate_core_types::{DepartmentId, ErrorKind, Scope, SubDepartmentId, UserId};

use crate::api::ScopeDirectory;
use crate::errors::{HierarchyError, Tier};
use crate::state::HierarchyStore;

fn admin() -> UserId {
    UserId::new("admin")
}

fn store_with_finance() -> (HierarchyStore, DepartmentId, SubDepartmentId) {
    let store = HierarchyStore::new();
    let dept = store.create_department("FIN", "Finance", &admin()).unwrap();
    let sub = store
        .create_sub_department(dept.id, "AP", "Accounts Payable", &admin())
        .unwrap();
    (store, dept.id, sub.id)
}

#[test]
fn ids_are_sequential_per_tier() {
    let (store, dept, sub) = store_with_finance();
    assert_eq!(dept, DepartmentId(1));
    assert_eq!(sub, SubDepartmentId(1));
    let hr = store.create_department("HR", "Human Resources", &admin()).unwrap();
    assert_eq!(hr.id, DepartmentId(2));
    assert_eq!(hr.audit.created_by, admin());
}

#[test]
fn department_codes_are_unique_case_insensitively() {
    let (store, _, _) = store_with_finance();
    let err = store.create_department("fin", "Other", &admin()).unwrap_err();
    assert_eq!(
        err,
        HierarchyError::DuplicateCode {
            tier: Tier::Department,
            code: "fin".into()
        }
    );
    let err = store.create_department("FIN2", "FINANCE", &admin()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateName);
}

#[test]
fn sub_department_codes_are_unique_across_parents() {
    let (store, _, _) = store_with_finance();
    let hr = store.create_department("HR", "Human Resources", &admin()).unwrap();
    let err = store
        .create_sub_department(hr.id, "ap", "Applicants", &admin())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateCode);
}

#[test]
fn sub_department_requires_existing_department() {
    let store = HierarchyStore::new();
    let err = store
        .create_sub_department(DepartmentId(42), "X", "Nowhere", &admin())
        .unwrap_err();
    assert_eq!(err, HierarchyError::UnknownDepartment(DepartmentId(42)));
}

#[test]
fn blank_codes_are_rejected() {
    let store = HierarchyStore::new();
    let err = store.create_department("  ", "Finance", &admin()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn delete_department_with_sub_department_conflicts() {
    let (store, dept, sub) = store_with_finance();
    let err = store.delete_department(dept).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    store.delete_sub_department(sub).unwrap();
    store.delete_department(dept).unwrap();
    assert!(store.list_departments().is_empty());
}

#[test]
fn delete_missing_entities_is_not_found() {
    let store = HierarchyStore::new();
    assert_eq!(
        store.delete_department(DepartmentId(7)).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        store
            .delete_sub_department(SubDepartmentId(7))
            .unwrap_err()
            .kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn list_nests_sub_departments_in_order() {
    let (store, dept, _) = store_with_finance();
    store
        .create_sub_department(dept, "AR", "Accounts Receivable", &admin())
        .unwrap();
    let hr = store.create_department("HR", "Human Resources", &admin()).unwrap();
    store
        .create_sub_department(hr.id, "PAY", "Payroll", &admin())
        .unwrap();

    let tree = store.list_departments();
    assert_eq!(tree.len(), 2);
    let codes: Vec<_> = tree[0]
        .sub_departments
        .iter()
        .map(|sub| sub.code.as_str())
        .collect();
    assert_eq!(codes, vec!["AP", "AR"]);
    assert_eq!(tree[1].sub_departments[0].code, "PAY");
}

#[test]
fn deactivating_parent_with_active_children_conflicts() {
    let (store, dept, sub) = store_with_finance();
    assert_eq!(
        store.set_department_active(dept, false).unwrap_err().kind(),
        ErrorKind::Conflict
    );
    store.set_sub_department_active(sub, false).unwrap();
    assert!(!store.set_department_active(dept, false).unwrap().active);

    let err = store.set_sub_department_active(sub, true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownDepartment);
}

#[test]
fn moving_sub_department_validates_target() {
    let (store, dept, sub) = store_with_finance();
    let err = store
        .update_sub_department(sub, DepartmentId(99), "AP", "Accounts Payable")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownDepartment);

    let hr = store.create_department("HR", "Human Resources", &admin()).unwrap();
    let moved = store
        .update_sub_department(sub, hr.id, "ap", "Accounts Payable")
        .unwrap();
    assert_eq!(moved.department, hr.id);
    assert_eq!(moved.code, "ap");
    assert!(store.list_departments()[0].sub_departments.is_empty());
    assert_eq!(store.department(dept).unwrap().code, "FIN");
}

#[test]
fn renaming_to_own_code_is_allowed() {
    let (store, dept, _) = store_with_finance();
    let renamed = store.update_department(dept, "fin", "Finance Dept").unwrap();
    assert_eq!(renamed.name, "Finance Dept");
    assert!(renamed.audit.modified_at >= renamed.audit.created_at);
}

#[test]
fn scope_check_covers_membership_and_activity() {
    let (store, dept, sub) = store_with_finance();
    assert!(store.check_scope(Scope::new(dept, sub)).is_ok());

    let hr = store.create_department("HR", "Human Resources", &admin()).unwrap();
    let err = store.check_scope(Scope::new(hr.id, sub)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownScope);

    store.set_sub_department_active(sub, false).unwrap();
    assert!(store.check_scope(Scope::new(dept, sub)).is_err());
    assert!(store
        .check_scope(Scope::new(DepartmentId(9), SubDepartmentId(9)))
        .is_err());
}

#[test]
fn lookup_by_code_ignores_case() {
    let (store, dept, sub) = store_with_finance();
    assert_eq!(store.department_by_code("fin").unwrap().id, dept);
    assert_eq!(store.sub_department_by_code(" ap ").unwrap().id, sub);
    assert!(store.department_by_code("ops").is_none());
}

#[test]
fn tree_serializes_flat_department_fields() {
    let (store, _, _) = store_with_finance();
    let value = serde_json::to_value(store.list_departments()).unwrap();
    assert_eq!(value[0]["code"], "FIN");
    assert_eq!(value[0]["sub_departments"][0]["code"], "AP");
}

#[test]
fn uniqueness_and_lookup_fold_non_ascii_case() {
    let store = HierarchyStore::new();
    let eco = store.create_department("ÉCO", "Écologie", &admin()).unwrap();

    let err = store.create_department("éco", "Other", &admin()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateCode);
    let err = store.create_department("ECO2", "ÉCOLOGIE", &admin()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateName);

    store
        .create_sub_department(eco.id, "ÖKO", "Ökologie", &admin())
        .unwrap();
    let err = store
        .create_sub_department(eco.id, "öko", "Other", &admin())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateCode);

    assert_eq!(store.department_by_code("éco").unwrap().id, eco.id);
    assert_eq!(store.sub_department_by_code("öko").unwrap().code, "ÖKO");
}
