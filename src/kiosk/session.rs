use uuid::Uuid;

use crate::models::access::AccessKind;
use crate::models::schedule::ClassSchedule;

/// What the kiosk currently registers: entrance/exit at a zone, or
/// attendance for one class.
#[derive(Clone, Debug)]
pub enum KioskMode {
    Access {
        kind: AccessKind,
        zone_id: Uuid,
        zone_nombre: String,
    },
    Class {
        schedule: ClassSchedule,
    },
}

/// Explicit session state for the kiosk loop.
///
/// Mode changes are pure: each transition builds a fresh context, so
/// there is no page-global mode variable to drift out of sync.
#[derive(Clone, Debug)]
pub struct SessionContext {
    pub mode: KioskMode,
}

impl SessionContext {
    pub fn access(kind: AccessKind, zone_id: Uuid, zone_nombre: impl Into<String>) -> Self {
        Self {
            mode: KioskMode::Access {
                kind,
                zone_id,
                zone_nombre: zone_nombre.into(),
            },
        }
    }

    pub fn class(schedule: ClassSchedule) -> Self {
        Self {
            mode: KioskMode::Class { schedule },
        }
    }

    pub fn is_class(&self) -> bool {
        matches!(self.mode, KioskMode::Class { .. })
    }

    /// Display name of the current mode.
    pub fn label(&self) -> String {
        match &self.mode {
            KioskMode::Access { zone_nombre, .. } => zone_nombre.clone(),
            KioskMode::Class { schedule } => schedule.nombre.clone(),
        }
    }

    /// Idle prompt shown when no scan is in progress.
    pub fn banner(&self) -> String {
        format!("Modo: {} - Escanee un código QR", self.label())
    }
}
