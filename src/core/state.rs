// Application state (AppState)

use crate::core::config::Config;
use crate::metrics::collector::Metrics;
use crate::stores::{
    access_log::AccessLog, attendance_store::AttendanceStore, code_ledger::CodeLedger,
    schedule_registry::ScheduleRegistry, user_directory::UserDirectory,
    zone_registry::ZoneRegistry,
};
use crate::wal::wal::Wal;
use std::sync::Arc;

/// Shared application state
///
/// The stores together form the authoritative data store for scans; all
/// fields are wrapped in Arc for cheap cloning across handlers and the
/// kiosk task.
#[derive(Clone)]
pub struct AppState {
    /// Issued QR codes and their single-use state
    pub code_ledger: Arc<CodeLedger>,

    /// Mirror of the campus user directory
    pub user_directory: Arc<UserDirectory>,

    /// Zone id -> name resolver for access events
    pub zone_registry: Arc<ZoneRegistry>,

    /// Per-user, per-class daily attendance ledger
    pub attendance: Arc<AttendanceStore>,

    /// Append-only entrance/exit log
    pub access_log: Arc<AccessLog>,

    /// Class schedules from configuration
    pub schedules: Arc<ScheduleRegistry>,

    /// Scan counters
    pub metrics: Arc<Metrics>,

    /// Write-Ahead Log for scan-state durability
    pub wal: Arc<Wal>,

    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, wal: Wal) -> Self {
        let schedules = Arc::new(ScheduleRegistry::from_classes(&config.classes));

        Self {
            code_ledger: Arc::new(CodeLedger::new()),
            user_directory: Arc::new(UserDirectory::new()),
            zone_registry: Arc::new(ZoneRegistry::new()),
            attendance: Arc::new(AttendanceStore::new()),
            access_log: Arc::new(AccessLog::new()),
            schedules,
            metrics: Arc::new(Metrics::new()),
            wal: Arc::new(wal),
            config: Arc::new(config),
        }
    }
}
