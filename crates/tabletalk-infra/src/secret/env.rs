//! Environment variable secret resolution.
//!
//! Reads the Google API key from `GOOGLE_API_KEY` and wraps it in
//! [`SecretString`] immediately, so the raw value never travels through
//! plain `String`s.

use secrecy::SecretString;

/// Environment variable holding the Google API key.
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Read the Google API key from the environment.
///
/// Returns `None` when the variable is unset, empty, or not valid
/// Unicode. Whitespace is trimmed; some shells leave a trailing newline
/// when the key is pasted from a file.
pub fn google_api_key() -> Option<SecretString> {
    api_key_from(API_KEY_VAR)
}

fn api_key_from(var: &str) -> Option<SecretString> {
    match std::env::var(var) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(SecretString::from(trimmed.to_string()))
            }
        }
        Err(std::env::VarError::NotPresent) => None,
        // Present but invalid Unicode: treat as unset, keys are ASCII.
        Err(std::env::VarError::NotUnicode(_)) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_api_key_present() {
        // SAFETY: test-scoped variable name nothing else reads; removed below.
        unsafe { std::env::set_var("TABLETALK_TEST_KEY_A", "AIza-test-value") };

        let key = api_key_from("TABLETALK_TEST_KEY_A").unwrap();
        assert_eq!(key.expose_secret(), "AIza-test-value");

        // SAFETY: just set above.
        unsafe { std::env::remove_var("TABLETALK_TEST_KEY_A") };
    }

    #[test]
    fn test_api_key_trims_whitespace() {
        // SAFETY: test-scoped variable name nothing else reads; removed below.
        unsafe { std::env::set_var("TABLETALK_TEST_KEY_B", "  AIza-test-value\n") };

        let key = api_key_from("TABLETALK_TEST_KEY_B").unwrap();
        assert_eq!(key.expose_secret(), "AIza-test-value");

        // SAFETY: just set above.
        unsafe { std::env::remove_var("TABLETALK_TEST_KEY_B") };
    }

    #[test]
    fn test_api_key_missing_is_none() {
        assert!(api_key_from("TABLETALK_TEST_KEY_MISSING_XYZ").is_none());
    }

    #[test]
    fn test_api_key_empty_is_none() {
        // SAFETY: test-scoped variable name nothing else reads; removed below.
        unsafe { std::env::set_var("TABLETALK_TEST_KEY_C", "   ") };

        assert!(api_key_from("TABLETALK_TEST_KEY_C").is_none());

        // SAFETY: just set above.
        unsafe { std::env::remove_var("TABLETALK_TEST_KEY_C") };
    }
}
