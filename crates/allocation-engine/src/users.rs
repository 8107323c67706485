use chrono::{DateTime, Utc};
use dashmap::DashMap;
use docgate_core_types::UserId;
use serde::{Deserialize, Serialize};

/// Users known to the identity provider. Allocation targets must be listed here.
pub trait UserDirectory: Send + Sync {
    fn contains(&self, user: &UserId) -> bool;
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub display_name: Option<String>,
    pub registered_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: DashMap<UserId, UserRecord>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, user: UserId, display_name: Option<String>) -> UserRecord {
        let record = UserRecord {
            id: user.clone(),
            display_name,
            registered_at: Utc::now(),
        };
        self.users.insert(user, record.clone());
        record
    }

    pub fn remove(&self, user: &UserId) -> Option<UserRecord> {
        self.users.remove(user).map(|(_, record)| record)
    }

    pub fn list(&self) -> Vec<UserRecord> {
        let mut users: Vec<_> = self
            .users
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        users.sort_by(|a, b| a.id.cmp(&b.id));
        users
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn contains(&self, user: &UserId) -> bool {
        self.users.contains_key(user)
    }
}
