use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::user::User;

/// In-memory mirror of the campus user directory.
pub struct UserDirectory {
    users: DashMap<Uuid, Arc<User>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            users: DashMap::with_capacity(capacity),
        }
    }

    /// Add a user. An existing entry with the same id is replaced.
    pub fn add_user(&self, user: User) {
        self.users.insert(user.id, Arc::new(user));
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<User>> {
        self.users.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Linear search; the matricula lookup endpoint is rare enough that
    /// a second index is not worth carrying.
    pub fn get_by_matricula(&self, matricula: &str) -> Option<Arc<User>> {
        self.users
            .iter()
            .find(|entry| entry.value().matricula == matricula)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Every active member of a group, in arbitrary order. This is the
    /// roster used for bulk attendance initialization.
    pub fn active_in_group(&self, grupo: &str) -> Vec<Arc<User>> {
        self.users
            .iter()
            .filter(|entry| entry.value().activo && entry.value().grupo == grupo)
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    pub fn all(&self) -> Vec<Arc<User>> {
        self.users
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}
