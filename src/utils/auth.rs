/// Verify an API key using a constant-time comparison.
///
/// Both length and content checks avoid early exit so the comparison
/// cannot be used to guess the key character by character.
pub fn verify_api_key(provided: &str, expected: &str) -> bool {
    let a = provided.as_bytes();
    let b = expected.as_bytes();

    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_api_key_valid() {
        assert!(verify_api_key("kiosk-key", "kiosk-key"));
    }

    #[test]
    fn test_verify_api_key_invalid() {
        assert!(!verify_api_key("wrong-key", "kiosk-key"));
    }

    #[test]
    fn test_verify_api_key_different_length() {
        assert!(!verify_api_key("short", "a-much-longer-key"));
    }

    #[test]
    fn test_verify_api_key_empty() {
        assert!(verify_api_key("", ""));
    }

    #[test]
    fn test_verify_api_key_case_sensitive() {
        assert!(!verify_api_key("Kiosk-Key", "kiosk-key"));
    }
}
