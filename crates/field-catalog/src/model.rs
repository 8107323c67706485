use std::fmt;

use docgate_core_types::{DepartmentId, FieldKey, FieldKind, Scope, SubDepartmentId};
use serde::{Deserialize, Serialize};

/// Where a field definition applies. More specific scopes shadow broader ones.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum FieldScope {
    Global,
    Department {
        department: DepartmentId,
    },
    SubDepartment {
        department: DepartmentId,
        sub_department: SubDepartmentId,
    },
}

impl FieldScope {
    /// This scope followed by each broader scope, most specific first.
    pub fn lineage(&self) -> Vec<FieldScope> {
        match *self {
            FieldScope::Global => vec![FieldScope::Global],
            FieldScope::Department { department } => {
                vec![FieldScope::Department { department }, FieldScope::Global]
            }
            FieldScope::SubDepartment {
                department,
                sub_department,
            } => vec![
                FieldScope::SubDepartment {
                    department,
                    sub_department,
                },
                FieldScope::Department { department },
                FieldScope::Global,
            ],
        }
    }
}

impl From<Scope> for FieldScope {
    fn from(scope: Scope) -> Self {
        FieldScope::SubDepartment {
            department: scope.department,
            sub_department: scope.sub_department,
        }
    }
}

impl fmt::Display for FieldScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldScope::Global => f.write_str("global"),
            FieldScope::Department { department } => write!(f, "department {department}"),
            FieldScope::SubDepartment {
                department,
                sub_department,
            } => write!(f, "department {department} / sub-department {sub_department}"),
        }
    }
}

/// A field as seen from some scope.
///
/// `scope` is where the definition was made; undefined slots and system fields
/// report `Global`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldDefinition {
    pub key: FieldKey,
    pub scope: FieldScope,
    pub kind: FieldKind,
    pub label: String,
    pub active: bool,
    pub system: bool,
}
