use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::stores::access_log::AccessLog;
use crate::stores::attendance_store::AttendanceStore;
use crate::stores::code_ledger::CodeLedger;
use crate::stores::user_directory::UserDirectory;
use crate::stores::zone_registry::ZoneRegistry;

pub struct Metrics {
    pub total_scans: AtomicU64,
    pub accepted_scans: AtomicU64,
    pub rejected_scans: AtomicU64,
    pub failed_scans: AtomicU64,
    pub start_time: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_scans: u64,
    pub accepted_scans: u64,
    pub rejected_scans: u64,
    pub failed_scans: u64,
    pub acceptance_rate: f64,
    pub codes_cached: usize,
    pub codes_used: usize,
    pub users_cached: usize,
    pub zones_cached: usize,
    pub attendance_records: usize,
    pub access_events: usize,
    pub uptime_seconds: i64,
    pub scans_per_second: f64,
}

impl Metrics {
    pub fn new() -> Self {
        let start_time = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;

        Self {
            total_scans: AtomicU64::new(0),
            accepted_scans: AtomicU64::new(0),
            rejected_scans: AtomicU64::new(0),
            failed_scans: AtomicU64::new(0),
            start_time,
        }
    }

    pub fn increment_scans(&self) {
        self.total_scans.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_accepted(&self) {
        self.accepted_scans.fetch_add(1, Ordering::Relaxed);
    }

    /// A scan refused by policy: unknown/used code, inactive user,
    /// out-of-window, conflicting second pass.
    pub fn increment_rejected(&self) {
        self.rejected_scans.fetch_add(1, Ordering::Relaxed);
    }

    /// A scan that failed on the store/WAL side.
    pub fn increment_failed(&self) {
        self.failed_scans.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_snapshot(
        &self,
        code_ledger: &CodeLedger,
        user_directory: &UserDirectory,
        zone_registry: &ZoneRegistry,
        attendance: &AttendanceStore,
        access_log: &AccessLog,
    ) -> MetricsSnapshot {
        let current_time = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;

        let total_scans = self.total_scans.load(Ordering::Relaxed);
        let accepted_scans = self.accepted_scans.load(Ordering::Relaxed);
        let rejected_scans = self.rejected_scans.load(Ordering::Relaxed);
        let failed_scans = self.failed_scans.load(Ordering::Relaxed);

        let acceptance_rate = if total_scans > 0 {
            (accepted_scans as f64 / total_scans as f64) * 100.0
        } else {
            0.0
        };

        let uptime_seconds = current_time - self.start_time;
        let scans_per_second = if uptime_seconds > 0 {
            total_scans as f64 / uptime_seconds as f64
        } else {
            0.0
        };

        MetricsSnapshot {
            total_scans,
            accepted_scans,
            rejected_scans,
            failed_scans,
            acceptance_rate,
            codes_cached: code_ledger.len(),
            codes_used: code_ledger.used_count(),
            users_cached: user_directory.len(),
            zones_cached: zone_registry.len(),
            attendance_records: attendance.len(),
            access_events: access_log.len(),
            uptime_seconds,
            scans_per_second,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_counts() {
        let metrics = Metrics::new();
        metrics.increment_scans();
        metrics.increment_scans();
        metrics.increment_accepted();
        metrics.increment_rejected();

        let snapshot = metrics.get_snapshot(
            &CodeLedger::new(),
            &UserDirectory::new(),
            &ZoneRegistry::new(),
            &AttendanceStore::new(),
            &AccessLog::new(),
        );

        assert_eq!(snapshot.total_scans, 2);
        assert_eq!(snapshot.accepted_scans, 1);
        assert_eq!(snapshot.rejected_scans, 1);
        assert_eq!(snapshot.failed_scans, 0);
        assert!((snapshot.acceptance_rate - 50.0).abs() < f64::EPSILON);
    }
}
