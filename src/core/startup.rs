use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::client::DirectoryClient;
use crate::core::state::AppState;
use crate::models::code::Code;
use crate::models::user::User;
use crate::models::zone::Zone;
use crate::utils::time::parse_fecha;
use crate::wal::wal::WalOperation;

/// Re-apply logged scan state after a restart: spent codes stay spent,
/// the attendance ledger and access log are rebuilt.
///
/// Runs after the directory populate so used flags land on real code
/// entries; codes the directory dropped get tombstones.
pub fn apply_wal_operations(state: &AppState, operations: &[WalOperation]) -> Result<()> {
    for op in operations {
        match op {
            WalOperation::CodeUsed { code, used_at } => {
                state.code_ledger.restore_used(code, *used_at);
            }
            WalOperation::AttendanceUpsert { record } => {
                state.attendance.restore(record.clone());
            }
            WalOperation::AccessAppend { event } => {
                state.access_log.append(event.clone());
            }
        }
    }
    Ok(())
}

/// Populate the identity stores from the directory backend.
pub async fn populate_from_api(state: &AppState, client: &DirectoryClient) -> Result<()> {
    let data = client
        .fetch_data()
        .await
        .context("Failed to fetch data from directory backend")?;

    info!(
        users = data.users.len(),
        zones = data.zones.len(),
        codes = data.codes.len(),
        "Data fetched from directory backend"
    );

    for api_zone in data.zones {
        state
            .zone_registry
            .add_zone(Zone::new(api_zone.id, api_zone.nombre));
    }

    for api_user in data.users {
        state.user_directory.add_user(User {
            id: api_user.id,
            nombre: api_user.nombre,
            correo: api_user.correo,
            matricula: api_user.matricula,
            carrera: api_user.carrera,
            grupo: api_user.grupo,
            activo: api_user.activo,
            imagen: api_user.imagen,
        });
    }

    for api_code in data.codes {
        let mut code = Code::new(api_code.codigo, api_code.user_id);
        if api_code.usado {
            code.used = true;
            code.used_at = match api_code.usado_at.as_deref() {
                Some(raw) => match parse_fecha(raw) {
                    Ok(ts) => Some(ts),
                    Err(e) => {
                        warn!(
                            codigo = %code.code,
                            usado_at = raw,
                            error = %e,
                            "Invalid usado_at timestamp, keeping code used without one"
                        );
                        None
                    }
                },
                None => None,
            };
        }
        state.code_ledger.add_code(code);
    }

    info!(
        users_cached = state.user_directory.len(),
        zones_cached = state.zone_registry.len(),
        codes_cached = state.code_ledger.len(),
        "Stores populated from directory backend"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{
        Config, KioskConfig, LoggingConfig, ServerConfig, StorageConfig, SyncConfig,
    };
    use crate::models::access::{AccessEvent, AccessKind};
    use crate::models::attendance::{AttendanceRecord, AttendanceState};
    use crate::wal::wal::Wal;
    use chrono::NaiveDate;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn test_state() -> (TempDir, AppState) {
        let dir = TempDir::new().unwrap();
        let wal = Wal::new(dir.path().join("test.wal")).unwrap();
        let config = Config {
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
            kiosk: KioskConfig::default(),
            storage: StorageConfig::default(),
            classes: vec![],
        };
        (dir, AppState::new(config, wal))
    }

    fn ts(h: u32, m: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 8)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_apply_wal_operations_rebuilds_scan_state() {
        let (_dir, state) = test_state();

        let record = AttendanceRecord {
            state: AttendanceState::Presente,
            first_pass: true,
            first_pass_at: Some(ts(18, 1)),
            second_pass: true,
            second_pass_at: Some(ts(18, 11)),
            ..AttendanceRecord::absent(Uuid::new_v4(), Uuid::new_v4(), ts(18, 0))
        };
        let operations = vec![
            WalOperation::CodeUsed {
                code: "QR-1".to_string(),
                used_at: ts(18, 11),
            },
            WalOperation::AttendanceUpsert {
                record: record.clone(),
            },
            WalOperation::AccessAppend {
                event: AccessEvent {
                    user_id: Uuid::new_v4(),
                    zone_id: Uuid::new_v4(),
                    zone_nombre: "Entrada Principal".to_string(),
                    kind: AccessKind::Entrada,
                    fecha: ts(7, 45),
                },
            },
        ];

        apply_wal_operations(&state, &operations).unwrap();

        assert!(state.code_ledger.lookup("QR-1").unwrap().used);
        assert_eq!(state.access_log.len(), 1);
        assert_eq!(
            state
                .attendance
                .get(record.user_id, record.class_id, record.date())
                .unwrap()
                .state,
            AttendanceState::Presente
        );
        assert!(state.attendance.roster_ready(record.class_id, record.date()));
    }
}
