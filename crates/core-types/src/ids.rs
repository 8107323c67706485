use std::fmt;

/// Identifier of a department, allocated by the hierarchy store.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(transparent))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct DepartmentId(pub u64);

/// Identifier of a sub-department, allocated by the hierarchy store.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(transparent))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SubDepartmentId(pub u64);

/// Verified user identity handed over by the identity provider.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(transparent))]
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Identifier of a document owned by the external document store.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(transparent))]
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SubDepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A (department, sub-department) pair. Allocations and approval rules are keyed by it.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Scope {
    pub department: DepartmentId,
    pub sub_department: SubDepartmentId,
}

impl Scope {
    pub fn new(department: DepartmentId, sub_department: SubDepartmentId) -> Self {
        Self {
            department,
            sub_department,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "department={} sub={}", self.department, self.sub_department)
    }
}

/// What the document store tells us about a document before acting on it.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct DocumentScope {
    pub department: DepartmentId,
    pub sub_department: SubDepartmentId,
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub confidential: bool,
}

impl DocumentScope {
    pub fn new(
        department: DepartmentId,
        sub_department: SubDepartmentId,
        confidential: bool,
    ) -> Self {
        Self {
            department,
            sub_department,
            confidential,
        }
    }

    pub fn scope(&self) -> Scope {
        Scope::new(self.department, self.sub_department)
    }
}

/// Recognises the bootstrap administrator. The exemption is policy, never a stored row.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdministratorPolicy {
    administrator: UserId,
}

impl AdministratorPolicy {
    pub const DEFAULT_ADMINISTRATOR: &'static str = "admin";

    pub fn new(administrator: impl Into<UserId>) -> Self {
        Self {
            administrator: administrator.into(),
        }
    }

    pub fn administrator(&self) -> &UserId {
        &self.administrator
    }

    pub fn is_administrator(&self, user: &UserId) -> bool {
        &self.administrator == user
    }
}

impl Default for AdministratorPolicy {
    fn default() -> Self {
        Self::new(UserId::new(Self::DEFAULT_ADMINISTRATOR))
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
