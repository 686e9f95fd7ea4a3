use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable class configuration, loaded from config.toml and looked up
/// by class id.
///
/// `weekday` uses the 0=domingo .. 6=sábado convention the kiosk
/// configuration has always used.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassSchedule {
    pub id: Uuid,
    pub nombre: String,
    #[serde(default)]
    pub grupo: Option<String>,
    pub start_hour: u8,
    pub start_minute: u8,
    pub weekday: u8,
}

impl ClassSchedule {
    /// The configured start-of-day instant for a given date.
    pub fn start_instant(&self, date: NaiveDate) -> NaiveDateTime {
        let time = NaiveTime::from_hms_opt(u32::from(self.start_hour), u32::from(self.start_minute), 0)
            .unwrap_or_else(|| NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        date.and_time(time)
    }

    /// Whether the class is scheduled on the given date's weekday.
    pub fn is_scheduled_day(&self, date: NaiveDate) -> bool {
        date.weekday().num_days_from_sunday() == u32::from(self.weekday)
    }
}
