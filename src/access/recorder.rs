use chrono::NaiveDateTime;
use tracing::info;
use uuid::Uuid;

use crate::core::error::AccessError;
use crate::models::access::{AccessEvent, AccessKind};
use crate::stores::access_log::AccessLog;
use crate::stores::zone_registry::ZoneRegistry;
use crate::wal::wal::{Wal, WalOperation};

/// Append one entrance/exit event for a user at a zone.
///
/// The kind is already typed at the validation boundary; the zone must
/// resolve to a name. Access scans are always terminal, so the caller
/// marks the code used right after this succeeds.
pub fn record(
    zones: &ZoneRegistry,
    log: &AccessLog,
    wal: &Wal,
    user_id: Uuid,
    zone_id: Uuid,
    kind: AccessKind,
    now: NaiveDateTime,
) -> Result<AccessEvent, AccessError> {
    let zone = zones
        .resolve(zone_id)
        .ok_or(AccessError::UnknownZone(zone_id))?;

    let event = AccessEvent {
        user_id,
        zone_id,
        zone_nombre: zone.nombre,
        kind,
        fecha: now,
    };

    wal.log_operation(WalOperation::AccessAppend {
        event: event.clone(),
    })
    .map_err(AccessError::Store)?;
    log.append(event.clone());

    info!(
        user_id = %user_id,
        zone = %event.zone_nombre,
        tipo = %kind,
        "Access recorded"
    );

    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::zone::Zone;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 8)
            .unwrap()
            .and_hms_opt(7, 45, 0)
            .unwrap()
    }

    #[test]
    fn test_record_resolves_zone_name() {
        let dir = TempDir::new().unwrap();
        let wal = Wal::new(dir.path().join("test.wal")).unwrap();
        let zones = ZoneRegistry::new();
        let log = AccessLog::new();

        let zone_id = Uuid::new_v4();
        zones.add_zone(Zone::new(zone_id, "Entrada Principal"));

        let event = record(
            &zones,
            &log,
            &wal,
            Uuid::new_v4(),
            zone_id,
            AccessKind::Entrada,
            now(),
        )
        .unwrap();

        assert_eq!(event.zone_nombre, "Entrada Principal");
        assert_eq!(log.len(), 1);
        assert_eq!(wal.replay().unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_zone_appends_nothing() {
        let dir = TempDir::new().unwrap();
        let wal = Wal::new(dir.path().join("test.wal")).unwrap();
        let zones = ZoneRegistry::new();
        let log = AccessLog::new();

        let err = record(
            &zones,
            &log,
            &wal,
            Uuid::new_v4(),
            Uuid::new_v4(),
            AccessKind::Salida,
            now(),
        )
        .unwrap_err();

        assert!(matches!(err, AccessError::UnknownZone(_)));
        assert!(log.is_empty());
        assert!(wal.replay().unwrap().is_empty());
    }
}
