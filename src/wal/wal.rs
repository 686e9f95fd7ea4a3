use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::models::access::{AccessEvent, AccessKind};
use crate::models::attendance::{AttendanceRecord, AttendanceState};
use crate::utils::time::{format_fecha, parse_fecha};

/// WAL operation types
///
/// Every scan-state mutation is logged before it is applied to the
/// in-memory stores, so a restart replays the full attendance/access
/// history and spent codes stay spent.
#[derive(Debug, Clone, PartialEq)]
pub enum WalOperation {
    CodeUsed {
        code: String,
        used_at: NaiveDateTime,
    },
    AttendanceUpsert {
        record: AttendanceRecord,
    },
    AccessAppend {
        event: AccessEvent,
    },
}

fn fmt_opt(ts: Option<NaiveDateTime>) -> String {
    match ts {
        Some(ts) => format_fecha(ts),
        None => "-".to_string(),
    }
}

fn parse_opt(raw: &str) -> Result<Option<NaiveDateTime>> {
    if raw == "-" {
        return Ok(None);
    }
    Ok(Some(parse_fecha(raw).context("Invalid timestamp")?))
}

impl WalOperation {
    fn encode(&self) -> String {
        match self {
            WalOperation::CodeUsed { code, used_at } => {
                format!("CODE_USED|{}|{}", code, format_fecha(*used_at))
            }
            WalOperation::AttendanceUpsert { record } => format!(
                "ATTENDANCE|{}|{}|{}|{}|{}|{}|{}|{}",
                record.user_id,
                record.class_id,
                format_fecha(record.fecha),
                record.state.as_str(),
                if record.first_pass { "1" } else { "0" },
                fmt_opt(record.first_pass_at),
                if record.second_pass { "1" } else { "0" },
                fmt_opt(record.second_pass_at),
            ),
            WalOperation::AccessAppend { event } => format!(
                "ACCESS|{}|{}|{}|{}|{}",
                event.user_id,
                event.zone_id,
                event.kind.as_str(),
                format_fecha(event.fecha),
                event.zone_nombre,
            ),
        }
    }

    fn decode(line: &str) -> Result<Self> {
        match line.split('|').next() {
            Some("CODE_USED") => {
                let parts: Vec<&str> = line.split('|').collect();
                if parts.len() != 3 {
                    bail!("Invalid CODE_USED format");
                }
                Ok(WalOperation::CodeUsed {
                    code: parts[1].to_string(),
                    used_at: parse_fecha(parts[2]).context("Invalid used_at")?,
                })
            }
            Some("ATTENDANCE") => {
                let parts: Vec<&str> = line.split('|').collect();
                if parts.len() != 9 {
                    bail!("Invalid ATTENDANCE format");
                }
                let state = AttendanceState::parse(parts[4])
                    .with_context(|| format!("Unknown attendance state: {}", parts[4]))?;
                Ok(WalOperation::AttendanceUpsert {
                    record: AttendanceRecord {
                        user_id: parts[1].parse::<Uuid>().context("Invalid user_id")?,
                        class_id: parts[2].parse::<Uuid>().context("Invalid class_id")?,
                        fecha: parse_fecha(parts[3]).context("Invalid fecha")?,
                        state,
                        first_pass: parts[5] == "1",
                        first_pass_at: parse_opt(parts[6])?,
                        second_pass: parts[7] == "1",
                        second_pass_at: parse_opt(parts[8])?,
                    },
                })
            }
            Some("ACCESS") => {
                // Zone name goes last: it is free text.
                let parts: Vec<&str> = line.splitn(6, '|').collect();
                if parts.len() != 6 {
                    bail!("Invalid ACCESS format");
                }
                let kind = AccessKind::parse(parts[3])
                    .with_context(|| format!("Unknown access kind: {}", parts[3]))?;
                Ok(WalOperation::AccessAppend {
                    event: AccessEvent {
                        user_id: parts[1].parse::<Uuid>().context("Invalid user_id")?,
                        zone_id: parts[2].parse::<Uuid>().context("Invalid zone_id")?,
                        kind,
                        fecha: parse_fecha(parts[4]).context("Invalid fecha")?,
                        zone_nombre: parts[5].to_string(),
                    },
                })
            }
            _ => bail!("Unknown operation type"),
        }
    }
}

pub struct Wal {
    file: Arc<Mutex<File>>,
    path: PathBuf,
}

impl Wal {
    pub fn new(path: PathBuf) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .context("Failed to open WAL file")?;

        Ok(Wal {
            file: Arc::new(Mutex::new(file)),
            path,
        })
    }

    pub fn log_operation(&self, op: WalOperation) -> Result<()> {
        let line = op.encode();
        let mut file = self.file.lock().unwrap();
        writeln!(file, "{}", line).context("Failed to write to WAL")?;
        file.flush().context("Failed to flush WAL")?;
        Ok(())
    }

    pub fn replay(&self) -> Result<Vec<WalOperation>> {
        let file = File::open(&self.path).context("Failed to open WAL for replay")?;
        let reader = BufReader::new(file);
        let mut operations = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result.context("Failed to read line from WAL")?;
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            match WalOperation::decode(line) {
                Ok(op) => operations.push(op),
                Err(e) => {
                    tracing::warn!(
                        line_num = line_num + 1,
                        error = %e,
                        "Failed to parse WAL line, skipping"
                    );
                }
            }
        }

        Ok(operations)
    }

    pub fn truncate(&self) -> Result<()> {
        let mut file = self.file.lock().unwrap();
        file.set_len(0).context("Failed to truncate WAL")?;
        file.flush().context("Failed to flush WAL after truncate")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn ts(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 8)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_code_used_round_trip() {
        let op = WalOperation::CodeUsed {
            code: "QR-2022370001".to_string(),
            used_at: ts(18, 1, 30),
        };
        let line = op.encode();
        assert_eq!(line, "CODE_USED|QR-2022370001|2025-09-08 18:01:30");
        assert_eq!(WalOperation::decode(&line).unwrap(), op);
    }

    #[test]
    fn test_attendance_round_trip() {
        let record = AttendanceRecord {
            user_id: Uuid::new_v4(),
            class_id: Uuid::new_v4(),
            fecha: ts(18, 0, 5),
            state: AttendanceState::MediaAsistencia,
            first_pass: true,
            first_pass_at: Some(ts(18, 1, 0)),
            second_pass: false,
            second_pass_at: None,
        };
        let op = WalOperation::AttendanceUpsert { record };
        let decoded = WalOperation::decode(&op.encode()).unwrap();
        assert_eq!(decoded, op);
    }

    #[test]
    fn test_access_round_trip_keeps_zone_name() {
        let event = AccessEvent {
            user_id: Uuid::new_v4(),
            zone_id: Uuid::new_v4(),
            zone_nombre: "Entrada Principal - Edificio B".to_string(),
            kind: AccessKind::Entrada,
            fecha: ts(7, 45, 0),
        };
        let op = WalOperation::AccessAppend { event };
        let decoded = WalOperation::decode(&op.encode()).unwrap();
        assert_eq!(decoded, op);
    }

    #[test]
    fn test_wal_log_and_replay() {
        let temp_dir = TempDir::new().unwrap();
        let wal = Wal::new(temp_dir.path().join("test.wal")).unwrap();

        let record = AttendanceRecord::absent(Uuid::new_v4(), Uuid::new_v4(), ts(18, 0, 0));
        wal.log_operation(WalOperation::AttendanceUpsert { record })
            .unwrap();
        wal.log_operation(WalOperation::CodeUsed {
            code: "QR-1".to_string(),
            used_at: ts(18, 2, 0),
        })
        .unwrap();

        let operations = wal.replay().unwrap();
        assert_eq!(operations.len(), 2);
        assert!(matches!(operations[0], WalOperation::AttendanceUpsert { .. }));
        assert!(matches!(operations[1], WalOperation::CodeUsed { .. }));
    }

    #[test]
    fn test_wal_truncate() {
        let temp_dir = TempDir::new().unwrap();
        let wal = Wal::new(temp_dir.path().join("test.wal")).unwrap();

        wal.log_operation(WalOperation::CodeUsed {
            code: "QR-1".to_string(),
            used_at: ts(18, 2, 0),
        })
        .unwrap();
        assert_eq!(wal.replay().unwrap().len(), 1);

        wal.truncate().unwrap();
        assert_eq!(wal.replay().unwrap().len(), 0);
    }

    #[test]
    fn test_wal_skips_invalid_lines() {
        let temp_dir = TempDir::new().unwrap();
        let wal_path = temp_dir.path().join("test.wal");

        fs::write(
            &wal_path,
            "GARBAGE|x\nCODE_USED|QR-1|2025-09-08 18:02:00\nATTENDANCE|not-a-uuid|x\n",
        )
        .unwrap();

        let wal = Wal::new(wal_path).unwrap();
        let operations = wal.replay().unwrap();
        assert_eq!(operations.len(), 1);
    }
}
