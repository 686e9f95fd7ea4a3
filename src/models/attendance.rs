use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Durable per-user, per-class daily attendance state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceState {
    Falta,
    MediaAsistencia,
    Retardo,
    Presente,
}

impl AttendanceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceState::Falta => "falta",
            AttendanceState::MediaAsistencia => "media_asistencia",
            AttendanceState::Retardo => "retardo",
            AttendanceState::Presente => "presente",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "falta" => Some(AttendanceState::Falta),
            "media_asistencia" => Some(AttendanceState::MediaAsistencia),
            "retardo" => Some(AttendanceState::Retardo),
            "presente" => Some(AttendanceState::Presente),
            _ => None,
        }
    }
}

/// How a class-mode scan is classified on the wire (`estado_asistencia`).
///
/// Out-of-window scans never reach the state machine, so they have no
/// wire value here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanClass {
    FirstPass,
    LateDirect,
    SecondPass,
}

impl ScanClass {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "primera_pasada_presente" => Some(ScanClass::FirstPass),
            "retardo_directo" => Some(ScanClass::LateDirect),
            "segunda_pasada" => Some(ScanClass::SecondPass),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanClass::FirstPass => "primera_pasada_presente",
            ScanClass::LateDirect => "retardo_directo",
            ScanClass::SecondPass => "segunda_pasada",
        }
    }
}

/// One row of the attendance ledger.
///
/// Keyed by (user_id, class_id, date); created as `falta` during roster
/// initialization, mutated in place by scans, never deleted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub user_id: Uuid,

    #[serde(rename = "clase_id")]
    pub class_id: Uuid,

    #[serde(with = "crate::utils::time::fecha_format")]
    pub fecha: NaiveDateTime,

    #[serde(rename = "estado")]
    pub state: AttendanceState,

    #[serde(rename = "primera_pasada")]
    pub first_pass: bool,

    #[serde(
        rename = "primera_pasada_at",
        with = "crate::utils::time::fecha_format_opt",
        default
    )]
    pub first_pass_at: Option<NaiveDateTime>,

    #[serde(rename = "segunda_pasada")]
    pub second_pass: bool,

    #[serde(
        rename = "segunda_pasada_at",
        with = "crate::utils::time::fecha_format_opt",
        default
    )]
    pub second_pass_at: Option<NaiveDateTime>,
}

impl AttendanceRecord {
    /// Default-absent row inserted for every group member at roster
    /// initialization.
    pub fn absent(user_id: Uuid, class_id: Uuid, now: NaiveDateTime) -> Self {
        Self {
            user_id,
            class_id,
            fecha: now,
            state: AttendanceState::Falta,
            first_pass: false,
            first_pass_at: None,
            second_pass: false,
            second_pass_at: None,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.fecha.date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_state_wire_values() {
        assert_eq!(
            serde_json::to_value(AttendanceState::MediaAsistencia).unwrap(),
            "media_asistencia"
        );
        assert_eq!(AttendanceState::parse("presente"), Some(AttendanceState::Presente));
        assert_eq!(AttendanceState::parse("ausente"), None);
    }

    #[test]
    fn test_scan_class_wire_values() {
        assert_eq!(ScanClass::parse("primera_pasada_presente"), Some(ScanClass::FirstPass));
        assert_eq!(ScanClass::parse("retardo_directo"), Some(ScanClass::LateDirect));
        assert_eq!(ScanClass::parse("segunda_pasada"), Some(ScanClass::SecondPass));
        assert_eq!(ScanClass::parse("fuera_de_tiempo"), None);
    }

    #[test]
    fn test_absent_record_defaults() {
        let now = NaiveDate::from_ymd_opt(2025, 9, 8)
            .unwrap()
            .and_hms_opt(18, 1, 0)
            .unwrap();
        let record = AttendanceRecord::absent(Uuid::new_v4(), Uuid::new_v4(), now);
        assert_eq!(record.state, AttendanceState::Falta);
        assert!(!record.first_pass);
        assert!(!record.second_pass);
        assert_eq!(record.date(), now.date());
    }

    #[test]
    fn test_record_wire_field_names() {
        let now = NaiveDate::from_ymd_opt(2025, 9, 8)
            .unwrap()
            .and_hms_opt(18, 1, 0)
            .unwrap();
        let record = AttendanceRecord::absent(Uuid::nil(), Uuid::nil(), now);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["estado"], "falta");
        assert_eq!(json["primera_pasada"], false);
        assert_eq!(json["fecha"], "2025-09-08 18:01:00");
        assert!(json["primera_pasada_at"].is_null());
    }
}
