use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of an access scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessKind {
    Entrada,
    Salida,
}

impl AccessKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessKind::Entrada => "entrada",
            AccessKind::Salida => "salida",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "entrada" => Some(AccessKind::Entrada),
            "salida" => Some(AccessKind::Salida),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccessKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the append-only access log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccessEvent {
    pub user_id: Uuid,
    pub zone_id: Uuid,

    #[serde(rename = "zone_nombre")]
    pub zone_nombre: String,

    #[serde(rename = "tipo")]
    pub kind: AccessKind,

    #[serde(with = "crate::utils::time::fecha_format")]
    pub fecha: NaiveDateTime,
}
