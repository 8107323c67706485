use chrono::{DateTime, Utc};
use docgate_core_types::{DepartmentId, SubDepartmentId, UserId};
use serde::{Deserialize, Serialize};

/// Who created a record and when it last changed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Audit {
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Audit {
    pub fn new(actor: &UserId) -> Self {
        let now = Utc::now();
        Self {
            created_by: actor.clone(),
            created_at: now,
            modified_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Department {
    pub id: DepartmentId,
    pub code: String,
    pub name: String,
    pub active: bool,
    pub audit: Audit,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubDepartment {
    pub id: SubDepartmentId,
    pub department: DepartmentId,
    pub code: String,
    pub name: String,
    pub active: bool,
    pub audit: Audit,
}

/// A department with its sub-departments, as returned by `list_departments`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DepartmentTree {
    #[serde(flatten)]
    pub department: Department,
    pub sub_departments: Vec<SubDepartment>,
}
