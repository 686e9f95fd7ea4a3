use std::sync::RwLock;
use uuid::Uuid;

use crate::models::access::AccessEvent;

/// Append-only log of entrance/exit events. One row per access scan,
/// never deleted.
pub struct AccessLog {
    events: RwLock<Vec<AccessEvent>>,
}

impl AccessLog {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
        }
    }

    pub fn append(&self, event: AccessEvent) {
        self.events.write().unwrap().push(event);
    }

    pub fn len(&self) -> usize {
        self.events.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn for_user(&self, user_id: Uuid) -> Vec<AccessEvent> {
        self.events
            .read()
            .unwrap()
            .iter()
            .filter(|event| event.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn snapshot(&self) -> Vec<AccessEvent> {
        self.events.read().unwrap().clone()
    }
}

impl Default for AccessLog {
    fn default() -> Self {
        Self::new()
    }
}
