use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::AttendanceError;
use crate::models::attendance::{AttendanceRecord, AttendanceState, ScanClass};
use crate::stores::attendance_store::AttendanceStore;
use crate::stores::user_directory::UserDirectory;
use crate::wal::wal::{Wal, WalOperation};

/// The `estado_final` reported back to the orchestrator and the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalState {
    PrimeraPasada,
    Retardo,
    Presente,
}

/// Result of applying one scan to the attendance ledger.
///
/// `mark_used` tells the orchestrator whether the outcome is terminal
/// for the scanned code; intermediate first passes leave the code live
/// for the second pass.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub final_state: FinalState,
    pub mark_used: bool,
    pub record: AttendanceRecord,
}

/// Create the day's default-absent roster for a class if this scan is
/// the first one today.
///
/// The claim on (class, date) is atomic in the store, so concurrent
/// first scans create the roster exactly once per process; the record
/// slots themselves are insert-if-absent as a second guard.
fn ensure_roster(
    store: &AttendanceStore,
    directory: &UserDirectory,
    wal: &Wal,
    class_id: Uuid,
    grupo: &str,
    now: NaiveDateTime,
) -> Result<(), AttendanceError> {
    let date = now.date();
    if store.roster_ready(class_id, date) {
        return Ok(());
    }
    if !store.begin_roster_init(class_id, date) {
        // Another scan claimed initialization a moment ago.
        return Ok(());
    }

    let members = directory.active_in_group(grupo);
    if members.is_empty() {
        warn!(class_id = %class_id, grupo = %grupo, "Group has no active members");
    }

    let mut created = 0usize;
    for member in &members {
        let record = AttendanceRecord::absent(member.id, class_id, now);
        wal.log_operation(WalOperation::AttendanceUpsert {
            record: record.clone(),
        })
        .map_err(AttendanceError::RosterInit)?;
        if store.insert_if_absent(record) {
            created += 1;
        }
    }

    info!(
        class_id = %class_id,
        grupo = %grupo,
        members = members.len(),
        created = created,
        "Roster initialized with default absences"
    );
    Ok(())
}

/// Apply one classified scan to the unique (user, class, today) record.
///
/// Transition table:
/// - first pass: state becomes media_asistencia, not terminal;
/// - direct late: state becomes retardo, terminal;
/// - second pass: requires a prior first pass and no prior second pass;
///   media_asistencia is promoted to presente, retardo stays retardo;
///   terminal either way.
pub fn register_scan(
    store: &AttendanceStore,
    directory: &UserDirectory,
    wal: &Wal,
    user_id: Uuid,
    grupo: &str,
    class_id: Uuid,
    scan: ScanClass,
    now: NaiveDateTime,
) -> Result<ScanOutcome, AttendanceError> {
    ensure_roster(store, directory, wal, class_id, grupo, now)?;

    let date = now.date();
    let mut record = store
        .get(user_id, class_id, date)
        .ok_or(AttendanceError::RecordNotFound)?;

    let (final_state, mark_used) = match scan {
        ScanClass::FirstPass => {
            record.state = AttendanceState::MediaAsistencia;
            record.first_pass = true;
            record.first_pass_at = Some(now);
            (FinalState::PrimeraPasada, false)
        }
        ScanClass::LateDirect => {
            record.state = AttendanceState::Retardo;
            record.first_pass = true;
            record.first_pass_at = Some(now);
            record.second_pass = false;
            record.second_pass_at = None;
            (FinalState::Retardo, true)
        }
        ScanClass::SecondPass => {
            if !record.first_pass {
                return Err(AttendanceError::NoFirstPass);
            }
            if record.second_pass {
                return Err(AttendanceError::SecondPassCompleted);
            }
            match record.state {
                AttendanceState::MediaAsistencia => {
                    record.state = AttendanceState::Presente;
                    record.second_pass = true;
                    record.second_pass_at = Some(now);
                    (FinalState::Presente, true)
                }
                AttendanceState::Retardo => {
                    record.second_pass = true;
                    record.second_pass_at = Some(now);
                    (FinalState::Retardo, true)
                }
                _ => return Err(AttendanceError::InvalidSecondPassState),
            }
        }
    };

    wal.log_operation(WalOperation::AttendanceUpsert {
        record: record.clone(),
    })
    .map_err(AttendanceError::Store)?;
    store.put(record.clone());

    debug!(
        user_id = %user_id,
        class_id = %class_id,
        estado = record.state.as_str(),
        mark_used = mark_used,
        "Attendance record updated"
    );

    Ok(ScanOutcome {
        final_state,
        mark_used,
        record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::User;
    use chrono::{NaiveDate, NaiveDateTime};
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        store: AttendanceStore,
        directory: UserDirectory,
        wal: Wal,
        class_id: Uuid,
    }

    fn member(grupo: &str, n: u32, activo: bool) -> User {
        User {
            id: Uuid::new_v4(),
            nombre: format!("Alumno {}", n),
            correo: format!("alumno{}@uteq.edu.mx", n),
            matricula: format!("20223700{:02}", n),
            carrera: "IDGS".to_string(),
            grupo: grupo.to_string(),
            activo,
            imagen: None,
        }
    }

    fn fixture(group_size: u32) -> (Fixture, Vec<Uuid>) {
        let dir = TempDir::new().unwrap();
        let wal = Wal::new(dir.path().join("test.wal")).unwrap();
        let directory = UserDirectory::new();
        let mut ids = Vec::new();
        for n in 0..group_size {
            let user = member("IDGS15", n, true);
            ids.push(user.id);
            directory.add_user(user);
        }
        // One inactive straggler that must never get a roster slot.
        directory.add_user(member("IDGS15", 99, false));

        (
            Fixture {
                _dir: dir,
                store: AttendanceStore::new(),
                directory,
                wal,
                class_id: Uuid::new_v4(),
            },
            ids,
        )
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 8)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_first_scan_initializes_whole_roster() {
        let (fx, ids) = fixture(5);

        let outcome = register_scan(
            &fx.store,
            &fx.directory,
            &fx.wal,
            ids[0],
            "IDGS15",
            fx.class_id,
            ScanClass::FirstPass,
            at(18, 1, 30),
        )
        .unwrap();

        // Exactly N records, all created falta, and only the scanner's
        // left that state.
        assert_eq!(fx.store.count_for_class_day(fx.class_id, at(18, 1, 30).date()), 5);
        assert_eq!(outcome.record.state, AttendanceState::MediaAsistencia);
        assert!(!outcome.mark_used);
        for id in &ids[1..] {
            let record = fx.store.get(*id, fx.class_id, at(18, 1, 30).date()).unwrap();
            assert_eq!(record.state, AttendanceState::Falta);
        }
    }

    #[test]
    fn test_roster_initialized_once_per_day() {
        let (fx, ids) = fixture(3);

        for id in &ids {
            register_scan(
                &fx.store,
                &fx.directory,
                &fx.wal,
                *id,
                "IDGS15",
                fx.class_id,
                ScanClass::FirstPass,
                at(18, 1, 0),
            )
            .unwrap();
        }
        assert_eq!(fx.store.count_for_class_day(fx.class_id, at(18, 1, 0).date()), 3);
    }

    #[test]
    fn test_first_then_second_pass_reaches_presente() {
        let (fx, ids) = fixture(2);

        let first = register_scan(
            &fx.store,
            &fx.directory,
            &fx.wal,
            ids[0],
            "IDGS15",
            fx.class_id,
            ScanClass::FirstPass,
            at(18, 1, 30),
        )
        .unwrap();
        assert_eq!(first.final_state, FinalState::PrimeraPasada);
        assert!(!first.mark_used);
        assert!(first.record.first_pass);
        assert!(!first.record.second_pass);

        let second = register_scan(
            &fx.store,
            &fx.directory,
            &fx.wal,
            ids[0],
            "IDGS15",
            fx.class_id,
            ScanClass::SecondPass,
            at(18, 10, 50),
        )
        .unwrap();
        assert_eq!(second.final_state, FinalState::Presente);
        assert!(second.mark_used);
        assert_eq!(second.record.state, AttendanceState::Presente);
        assert!(second.record.second_pass);
        assert_eq!(second.record.second_pass_at, Some(at(18, 10, 50)));
    }

    #[test]
    fn test_late_direct_is_terminal() {
        let (fx, ids) = fixture(2);

        let outcome = register_scan(
            &fx.store,
            &fx.directory,
            &fx.wal,
            ids[0],
            "IDGS15",
            fx.class_id,
            ScanClass::LateDirect,
            at(18, 2, 30),
        )
        .unwrap();

        assert_eq!(outcome.final_state, FinalState::Retardo);
        assert!(outcome.mark_used);
        assert_eq!(outcome.record.state, AttendanceState::Retardo);
        assert!(outcome.record.first_pass);
        assert!(!outcome.record.second_pass);
    }

    #[test]
    fn test_second_pass_after_retardo_keeps_retardo() {
        let (fx, ids) = fixture(2);

        register_scan(
            &fx.store,
            &fx.directory,
            &fx.wal,
            ids[0],
            "IDGS15",
            fx.class_id,
            ScanClass::LateDirect,
            at(18, 2, 30),
        )
        .unwrap();

        let second = register_scan(
            &fx.store,
            &fx.directory,
            &fx.wal,
            ids[0],
            "IDGS15",
            fx.class_id,
            ScanClass::SecondPass,
            at(18, 11, 0),
        )
        .unwrap();

        assert_eq!(second.final_state, FinalState::Retardo);
        assert!(second.mark_used);
        assert_eq!(second.record.state, AttendanceState::Retardo);
        assert!(second.record.second_pass);
    }

    #[test]
    fn test_second_pass_without_first_fails_and_mutates_nothing() {
        let (fx, ids) = fixture(2);

        // Someone else opened the day, so the roster exists and the
        // scanner has a falta record without a first pass.
        register_scan(
            &fx.store,
            &fx.directory,
            &fx.wal,
            ids[0],
            "IDGS15",
            fx.class_id,
            ScanClass::FirstPass,
            at(18, 1, 0),
        )
        .unwrap();

        let err = register_scan(
            &fx.store,
            &fx.directory,
            &fx.wal,
            ids[1],
            "IDGS15",
            fx.class_id,
            ScanClass::SecondPass,
            at(18, 11, 0),
        )
        .unwrap_err();
        assert!(matches!(err, AttendanceError::NoFirstPass));

        let record = fx.store.get(ids[1], fx.class_id, at(18, 11, 0).date()).unwrap();
        assert_eq!(record.state, AttendanceState::Falta);
        assert!(!record.second_pass);
    }

    #[test]
    fn test_repeated_second_pass_is_rejected() {
        let (fx, ids) = fixture(2);

        register_scan(
            &fx.store,
            &fx.directory,
            &fx.wal,
            ids[0],
            "IDGS15",
            fx.class_id,
            ScanClass::FirstPass,
            at(18, 1, 0),
        )
        .unwrap();
        register_scan(
            &fx.store,
            &fx.directory,
            &fx.wal,
            ids[0],
            "IDGS15",
            fx.class_id,
            ScanClass::SecondPass,
            at(18, 11, 0),
        )
        .unwrap();

        let err = register_scan(
            &fx.store,
            &fx.directory,
            &fx.wal,
            ids[0],
            "IDGS15",
            fx.class_id,
            ScanClass::SecondPass,
            at(18, 12, 0),
        )
        .unwrap_err();
        assert!(matches!(err, AttendanceError::SecondPassCompleted));

        // Idempotent-safe: the record still carries the first completion
        // timestamp.
        let record = fx.store.get(ids[0], fx.class_id, at(18, 12, 0).date()).unwrap();
        assert_eq!(record.second_pass_at, Some(at(18, 11, 0)));
    }

    #[test]
    fn test_scanner_outside_roster_is_not_found() {
        let (fx, _ids) = fixture(2);
        let stranger = Uuid::new_v4();

        let err = register_scan(
            &fx.store,
            &fx.directory,
            &fx.wal,
            stranger,
            "IDGS15",
            fx.class_id,
            ScanClass::FirstPass,
            at(18, 1, 0),
        )
        .unwrap_err();
        assert!(matches!(err, AttendanceError::RecordNotFound));
    }

    #[test]
    fn test_updates_survive_wal_replay() {
        let (fx, ids) = fixture(2);

        register_scan(
            &fx.store,
            &fx.directory,
            &fx.wal,
            ids[0],
            "IDGS15",
            fx.class_id,
            ScanClass::FirstPass,
            at(18, 1, 0),
        )
        .unwrap();

        let restored = AttendanceStore::new();
        for op in fx.wal.replay().unwrap() {
            if let WalOperation::AttendanceUpsert { record } = op {
                restored.restore(record);
            }
        }

        assert!(restored.roster_ready(fx.class_id, at(18, 1, 0).date()));
        assert_eq!(
            restored
                .get(ids[0], fx.class_id, at(18, 1, 0).date())
                .unwrap()
                .state,
            AttendanceState::MediaAsistencia
        );
        assert_eq!(
            restored
                .get(ids[1], fx.class_id, at(18, 1, 0).date())
                .unwrap()
                .state,
            AttendanceState::Falta
        );
    }
}
