use chrono::{Local, NaiveDate, NaiveDateTime};

/// Wire format for timestamps, matching what the directory backend stores.
pub const FECHA_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current wall-clock time in the kiosk's local timezone.
pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn today_local() -> NaiveDate {
    now_local().date()
}

pub fn format_fecha(dt: NaiveDateTime) -> String {
    dt.format(FECHA_FORMAT).to_string()
}

pub fn parse_fecha(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, FECHA_FORMAT)
}

/// Serde adapter for `NaiveDateTime` fields carried as "YYYY-MM-DD HH:MM:SS".
pub mod fecha_format {
    use super::FECHA_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.format(FECHA_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, FECHA_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Same as [`fecha_format`] but for nullable timestamps.
pub mod fecha_format_opt {
    use super::FECHA_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        dt: &Option<NaiveDateTime>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => s.serialize_str(&dt.format(FECHA_FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        match raw {
            Some(raw) => NaiveDateTime::parse_from_str(&raw, FECHA_FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
