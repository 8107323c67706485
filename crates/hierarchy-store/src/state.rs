use std::collections::BTreeMap;

use docgate_core_types::{DepartmentId, Scope, SubDepartmentId, UserId};
use parking_lot::RwLock;
use tracing::info;

use crate::api::ScopeDirectory;
use crate::errors::{HierarchyError, Tier};
use crate::model::{Audit, Department, DepartmentTree, SubDepartment};
use crate::uniqueness::{department_peers, ensure_unique, same_key, sub_department_peers};

#[derive(Default)]
struct HierarchyState {
    departments: BTreeMap<DepartmentId, Department>,
    sub_departments: BTreeMap<SubDepartmentId, SubDepartment>,
    last_department: u64,
    last_sub_department: u64,
}

impl HierarchyState {
    fn department(&self, id: DepartmentId) -> Result<&Department, HierarchyError> {
        self.departments
            .get(&id)
            .ok_or(HierarchyError::DepartmentNotFound(id))
    }

    fn active_parent(&self, id: DepartmentId) -> Result<&Department, HierarchyError> {
        self.departments
            .get(&id)
            .filter(|dept| dept.active)
            .ok_or(HierarchyError::UnknownDepartment(id))
    }

    fn children(&self, id: DepartmentId) -> impl Iterator<Item = &SubDepartment> {
        self.sub_departments
            .values()
            .filter(move |sub| sub.department == id)
    }
}

/// In-memory hierarchy store.
///
/// Every write validates and inserts under a single write guard, so two
/// administrators creating the same code cannot both succeed.
#[derive(Default)]
pub struct HierarchyStore {
    state: RwLock<HierarchyState>,
}

impl HierarchyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_department(
        &self,
        code: &str,
        name: &str,
        actor: &UserId,
    ) -> Result<Department, HierarchyError> {
        let (code, name) = clean_pair(code, name)?;
        let mut state = self.state.write();
        ensure_unique(
            Tier::Department,
            department_peers(state.departments.values(), None),
            &code,
            &name,
        )?;
        state.last_department += 1;
        let department = Department {
            id: DepartmentId(state.last_department),
            code,
            name,
            active: true,
            audit: Audit::new(actor),
        };
        state
            .departments
            .insert(department.id, department.clone());
        info!(department = %department.id, code = %department.code, "department created");
        Ok(department)
    }

    pub fn create_sub_department(
        &self,
        department: DepartmentId,
        code: &str,
        name: &str,
        actor: &UserId,
    ) -> Result<SubDepartment, HierarchyError> {
        let (code, name) = clean_pair(code, name)?;
        let mut state = self.state.write();
        state.active_parent(department)?;
        ensure_unique(
            Tier::SubDepartment,
            sub_department_peers(state.sub_departments.values(), department, None),
            &code,
            &name,
        )?;
        state.last_sub_department += 1;
        let sub = SubDepartment {
            id: SubDepartmentId(state.last_sub_department),
            department,
            code,
            name,
            active: true,
            audit: Audit::new(actor),
        };
        state.sub_departments.insert(sub.id, sub.clone());
        info!(
            department = %department,
            sub_department = %sub.id,
            code = %sub.code,
            "sub-department created"
        );
        Ok(sub)
    }

    pub fn update_department(
        &self,
        id: DepartmentId,
        code: &str,
        name: &str,
    ) -> Result<Department, HierarchyError> {
        let (code, name) = clean_pair(code, name)?;
        let mut state = self.state.write();
        state.department(id)?;
        ensure_unique(
            Tier::Department,
            department_peers(state.departments.values(), Some(id)),
            &code,
            &name,
        )?;
        let dept = state
            .departments
            .get_mut(&id)
            .ok_or(HierarchyError::DepartmentNotFound(id))?;
        dept.code = code;
        dept.name = name;
        dept.audit.touch();
        Ok(dept.clone())
    }

    /// Rename a sub-department or move it under another active department.
    pub fn update_sub_department(
        &self,
        id: SubDepartmentId,
        department: DepartmentId,
        code: &str,
        name: &str,
    ) -> Result<SubDepartment, HierarchyError> {
        let (code, name) = clean_pair(code, name)?;
        let mut state = self.state.write();
        if !state.sub_departments.contains_key(&id) {
            return Err(HierarchyError::SubDepartmentNotFound(id));
        }
        state.active_parent(department)?;
        ensure_unique(
            Tier::SubDepartment,
            sub_department_peers(state.sub_departments.values(), department, Some(id)),
            &code,
            &name,
        )?;
        let sub = state
            .sub_departments
            .get_mut(&id)
            .ok_or(HierarchyError::SubDepartmentNotFound(id))?;
        sub.department = department;
        sub.code = code;
        sub.name = name;
        sub.audit.touch();
        Ok(sub.clone())
    }

    pub fn set_department_active(
        &self,
        id: DepartmentId,
        active: bool,
    ) -> Result<Department, HierarchyError> {
        let mut state = self.state.write();
        state.department(id)?;
        if !active && state.children(id).any(|sub| sub.active) {
            return Err(HierarchyError::Conflict(format!(
                "department {id} still has active sub-departments"
            )));
        }
        let dept = state
            .departments
            .get_mut(&id)
            .ok_or(HierarchyError::DepartmentNotFound(id))?;
        dept.active = active;
        dept.audit.touch();
        info!(department = %id, active, "department activation changed");
        Ok(dept.clone())
    }

    pub fn set_sub_department_active(
        &self,
        id: SubDepartmentId,
        active: bool,
    ) -> Result<SubDepartment, HierarchyError> {
        let mut state = self.state.write();
        let parent = state
            .sub_departments
            .get(&id)
            .map(|sub| sub.department)
            .ok_or(HierarchyError::SubDepartmentNotFound(id))?;
        if active {
            state.active_parent(parent)?;
        }
        let sub = state
            .sub_departments
            .get_mut(&id)
            .ok_or(HierarchyError::SubDepartmentNotFound(id))?;
        sub.active = active;
        sub.audit.touch();
        info!(sub_department = %id, active, "sub-department activation changed");
        Ok(sub.clone())
    }

    /// Fails with `Conflict` while any sub-department still references the department.
    pub fn delete_department(&self, id: DepartmentId) -> Result<Department, HierarchyError> {
        let mut state = self.state.write();
        state.department(id)?;
        let dependents = state.children(id).count();
        if dependents > 0 {
            return Err(HierarchyError::Conflict(format!(
                "department {id} is referenced by {dependents} sub-department(s)"
            )));
        }
        let removed = state
            .departments
            .remove(&id)
            .ok_or(HierarchyError::DepartmentNotFound(id))?;
        info!(department = %id, code = %removed.code, "department deleted");
        Ok(removed)
    }

    pub fn delete_sub_department(
        &self,
        id: SubDepartmentId,
    ) -> Result<SubDepartment, HierarchyError> {
        let removed = self
            .state
            .write()
            .sub_departments
            .remove(&id)
            .ok_or(HierarchyError::SubDepartmentNotFound(id))?;
        info!(sub_department = %id, code = %removed.code, "sub-department deleted");
        Ok(removed)
    }

    pub fn department(&self, id: DepartmentId) -> Result<Department, HierarchyError> {
        self.state.read().department(id).cloned()
    }

    pub fn sub_department(&self, id: SubDepartmentId) -> Result<SubDepartment, HierarchyError> {
        self.state
            .read()
            .sub_departments
            .get(&id)
            .cloned()
            .ok_or(HierarchyError::SubDepartmentNotFound(id))
    }

    pub fn department_by_code(&self, code: &str) -> Option<Department> {
        let code = code.trim();
        self.state
            .read()
            .departments
            .values()
            .find(|dept| same_key(&dept.code, code))
            .cloned()
    }

    pub fn sub_department_by_code(&self, code: &str) -> Option<SubDepartment> {
        let code = code.trim();
        self.state
            .read()
            .sub_departments
            .values()
            .find(|sub| same_key(&sub.code, code))
            .cloned()
    }

    /// Departments in creation order, each with its sub-departments in creation order.
    pub fn list_departments(&self) -> Vec<DepartmentTree> {
        let state = self.state.read();
        state
            .departments
            .values()
            .map(|dept| DepartmentTree {
                department: dept.clone(),
                sub_departments: state.children(dept.id).cloned().collect(),
            })
            .collect()
    }

    pub fn department_count(&self) -> usize {
        self.state.read().departments.len()
    }
}

impl ScopeDirectory for HierarchyStore {
    fn check_scope(&self, scope: Scope) -> Result<(), HierarchyError> {
        let state = self.state.read();
        let unknown = |reason| HierarchyError::UnknownScope { scope, reason };
        let dept = state
            .departments
            .get(&scope.department)
            .ok_or_else(|| unknown("department does not exist"))?;
        if !dept.active {
            return Err(unknown("department is inactive"));
        }
        let sub = state
            .sub_departments
            .get(&scope.sub_department)
            .ok_or_else(|| unknown("sub-department does not exist"))?;
        if sub.department != scope.department {
            return Err(unknown("sub-department belongs to another department"));
        }
        if !sub.active {
            return Err(unknown("sub-department is inactive"));
        }
        Ok(())
    }
}

fn clean_pair(code: &str, name: &str) -> Result<(String, String), HierarchyError> {
    let code = code.trim();
    let name = name.trim();
    if code.is_empty() {
        return Err(HierarchyError::InvalidInput("code must not be empty".into()));
    }
    if name.is_empty() {
        return Err(HierarchyError::InvalidInput("name must not be empty".into()));
    }
    Ok((code.to_string(), name.to_string()))
}
