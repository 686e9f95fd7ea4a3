// Shared fixtures for handler and kiosk tests.

use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

use crate::core::config::{
    Config, KioskConfig, LoggingConfig, ServerConfig, StorageConfig, SyncConfig,
};
use crate::core::state::AppState;
use crate::models::schedule::ClassSchedule;
use crate::wal::wal::Wal;

pub fn entry_zone_id() -> Uuid {
    Uuid::parse_str("b8f5178d-6864-4865-ab43-295fe5dca7c6").unwrap()
}

pub fn exit_zone_id() -> Uuid {
    Uuid::parse_str("3f71b6a1-41ce-4f3d-9bb3-0e6f2a7c55aa").unwrap()
}

pub fn aula_uno_id() -> Uuid {
    Uuid::parse_str("d9a94c99-aa9e-45d1-a30f-7f17483639e0").unwrap()
}

pub fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            port: Some(3000),
            unix_socket: None,
            num_threads: 2,
            max_connections: 100,
        },
        sync: SyncConfig {
            data_endpoint: "http://localhost:8000/api/kiosk/data".to_string(),
            api_key: "test-api-key".to_string(),
        },
        logging: LoggingConfig {
            level: "info".to_string(),
            format: "console".to_string(),
            path: None,
            console: true,
        },
        kiosk: KioskConfig {
            enabled: true,
            entry_zone: Some(entry_zone_id()),
            exit_zone: Some(exit_zone_id()),
            display_clear_secs: 3,
        },
        storage: StorageConfig::default(),
        classes: vec![ClassSchedule {
            id: aula_uno_id(),
            nombre: "Aula 1 - Lunes 6:00 pm".to_string(),
            grupo: Some("IDGS15".to_string()),
            start_hour: 18,
            start_minute: 0,
            weekday: 1,
        }],
    }
}

/// Fresh state over a temp-dir WAL. Keep the `TempDir` alive for the
/// duration of the test.
pub fn create_test_state() -> (TempDir, Arc<AppState>) {
    let temp_dir = TempDir::new().unwrap();
    let wal = Wal::new(temp_dir.path().join("test.wal")).unwrap();
    let state = Arc::new(AppState::new(create_test_config(), wal));
    (temp_dir, state)
}
