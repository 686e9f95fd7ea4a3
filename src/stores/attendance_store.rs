use chrono::NaiveDate;
use dashmap::{DashMap, DashSet};
use uuid::Uuid;

use crate::models::attendance::AttendanceRecord;

/// Key of the attendance ledger: at most one record per user per class
/// per day.
pub type RecordKey = (Uuid, Uuid, NaiveDate);

/// In-memory attendance ledger.
///
/// Inserts go through `insert_if_absent`, which enforces the
/// (user, class, date) uniqueness at the store level, and roster
/// initialization for a class/day is claimed atomically through
/// `begin_roster_init` so two near-simultaneous first scans cannot
/// double-initialize within this process.
pub struct AttendanceStore {
    records: DashMap<RecordKey, AttendanceRecord>,
    initialized: DashSet<(Uuid, NaiveDate)>,
}

impl AttendanceStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            initialized: DashSet::new(),
        }
    }

    /// Whether the group roster was already created for this class/day.
    pub fn roster_ready(&self, class_id: Uuid, date: NaiveDate) -> bool {
        self.initialized.contains(&(class_id, date))
    }

    /// Claim roster initialization for a class/day. Returns true for the
    /// caller that wins the claim; every later caller gets false.
    pub fn begin_roster_init(&self, class_id: Uuid, date: NaiveDate) -> bool {
        self.initialized.insert((class_id, date))
    }

    /// Insert a record only if the (user, class, date) slot is empty.
    /// Returns false when a record already occupies the slot.
    pub fn insert_if_absent(&self, record: AttendanceRecord) -> bool {
        let key = (record.user_id, record.class_id, record.date());
        match self.records.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(record);
                true
            }
        }
    }

    pub fn get(&self, user_id: Uuid, class_id: Uuid, date: NaiveDate) -> Option<AttendanceRecord> {
        self.records
            .get(&(user_id, class_id, date))
            .map(|entry| entry.value().clone())
    }

    /// Overwrite the record in its slot (the slot key is derived from the
    /// record itself).
    pub fn put(&self, record: AttendanceRecord) {
        let key = (record.user_id, record.class_id, record.date());
        self.records.insert(key, record);
    }

    /// Replay path: upsert a record and remember that its class/day
    /// roster exists, so the init guard survives restarts.
    pub fn restore(&self, record: AttendanceRecord) {
        self.initialized.insert((record.class_id, record.date()));
        self.put(record);
    }

    pub fn count_for_class_day(&self, class_id: Uuid, date: NaiveDate) -> usize {
        self.records
            .iter()
            .filter(|entry| {
                let (_, class, day) = *entry.key();
                class == class_id && day == date
            })
            .count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for AttendanceStore {
    fn default() -> Self {
        Self::new()
    }
}
