pub mod access_log;
pub mod attendance_store;
pub mod code_ledger;
pub mod schedule_registry;
pub mod user_directory;
pub mod zone_registry;
