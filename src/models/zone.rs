use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A physical access point (entrance/exit) associated with access events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: Uuid,
    pub nombre: String,
}

impl Zone {
    pub fn new(id: Uuid, nombre: impl Into<String>) -> Self {
        Self {
            id,
            nombre: nombre.into(),
        }
    }
}
