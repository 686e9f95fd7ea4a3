use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single-use QR token tied to one person.
///
/// `used` is monotone: the ledger flips it false -> true exactly once and
/// never resets it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Code {
    #[serde(rename = "codigo")]
    pub code: String,

    /// Owner of the code in the user directory.
    pub user_id: Uuid,

    #[serde(rename = "usado")]
    pub used: bool,

    #[serde(
        rename = "usado_at",
        with = "crate::utils::time::fecha_format_opt",
        default
    )]
    pub used_at: Option<NaiveDateTime>,
}

impl Code {
    pub fn new(code: impl Into<String>, user_id: Uuid) -> Self {
        Self {
            code: code.into(),
            user_id,
            used: false,
            used_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_code_is_unused() {
        let code = Code::new("QR-123", Uuid::new_v4());
        assert!(!code.used);
        assert!(code.used_at.is_none());
    }

    #[test]
    fn test_wire_field_names() {
        let code = Code::new("QR-123", Uuid::nil());
        let json = serde_json::to_value(&code).unwrap();
        assert_eq!(json["codigo"], "QR-123");
        assert_eq!(json["usado"], false);
        assert!(json["usado_at"].is_null());
    }
}
