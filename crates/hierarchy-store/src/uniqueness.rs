//! Code and name uniqueness for both tiers.
//!
//! Sub-department codes are unique across the whole tier, not per parent
//! department. Switching to per-parent scoping only touches `sub_department_peers`.

use docgate_core_types::{DepartmentId, SubDepartmentId};

use crate::errors::{HierarchyError, Tier};
use crate::model::{Department, SubDepartment};

pub(crate) fn department_peers<'a>(
    departments: impl Iterator<Item = &'a Department>,
    exclude: Option<DepartmentId>,
) -> impl Iterator<Item = (&'a str, &'a str)> {
    departments
        .filter(move |dept| Some(dept.id) != exclude)
        .map(|dept| (dept.code.as_str(), dept.name.as_str()))
}

pub(crate) fn sub_department_peers<'a>(
    sub_departments: impl Iterator<Item = &'a SubDepartment>,
    _parent: DepartmentId,
    exclude: Option<SubDepartmentId>,
) -> impl Iterator<Item = (&'a str, &'a str)> {
    sub_departments
        .filter(move |sub| Some(sub.id) != exclude)
        .map(|sub| (sub.code.as_str(), sub.name.as_str()))
}

/// Unicode case-insensitive equality, used for codes, names and code lookups.
pub(crate) fn same_key(left: &str, right: &str) -> bool {
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}

/// Case-insensitive comparison of `code` and `name` against the given peers.
pub(crate) fn ensure_unique<'a>(
    tier: Tier,
    mut peers: impl Iterator<Item = (&'a str, &'a str)>,
    code: &str,
    name: &str,
) -> Result<(), HierarchyError> {
    peers.try_for_each(|(peer_code, peer_name)| {
        if same_key(peer_code, code) {
            return Err(HierarchyError::DuplicateCode {
                tier,
                code: code.to_string(),
            });
        }
        if same_key(peer_name, name) {
            return Err(HierarchyError::DuplicateName {
                tier,
                name: name.to_string(),
            });
        }
        Ok(())
    })
}
