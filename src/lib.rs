pub mod access;
pub mod api;
pub mod attendance;
pub mod core;
pub mod handlers;
pub mod kiosk;
pub mod metrics;
pub mod models;
pub mod schedule;
pub mod stores;
pub mod utils;
pub mod validation;
pub mod wal;
