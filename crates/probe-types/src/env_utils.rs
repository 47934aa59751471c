//! Environment variable parsing utilities.
//!
//! Resolver configuration and the CLI read their overrides from `STATE_PROBE_*`
//! variables through these helpers instead of repeating
//! `std::env::var(..).ok().and_then(..)` chains.
//!
//! # Example
//!
//! ```
//! use state_probe_types::env_utils::{env_bool, env_var_or};
//!
//! let minor: u32 = env_var_or("STATE_PROBE_THRESHOLD_MINOR", 8);
//! let verbose = env_bool("STATE_PROBE_VERBOSE");
//! # let _ = (minor, verbose);
//! ```

use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable with a default value.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// A non-empty, trimmed string variable.
pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Check if an environment variable is set to a truthy value.
///
/// `1`, `true`, `yes` and `on` count as truthy (case-insensitive).
pub fn env_bool(key: &str) -> bool {
    std::env::var(key)
        .ok()
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_parsing() {
        std::env::set_var("STATE_PROBE_TEST_U32", " 42 ");
        let val: Option<u32> = env_var("STATE_PROBE_TEST_U32");
        assert_eq!(val, Some(42));

        let missing: Option<u32> = env_var("STATE_PROBE_TEST_MISSING_1");
        assert_eq!(missing, None);

        std::env::remove_var("STATE_PROBE_TEST_U32");
    }

    #[test]
    fn test_env_var_or_falls_back_on_garbage() {
        std::env::set_var("STATE_PROBE_TEST_GARBAGE", "eight");
        let val: u32 = env_var_or("STATE_PROBE_TEST_GARBAGE", 8);
        assert_eq!(val, 8);
        std::env::remove_var("STATE_PROBE_TEST_GARBAGE");
    }

    #[test]
    fn test_env_string_skips_blank() {
        std::env::set_var("STATE_PROBE_TEST_BLANK", "   ");
        assert_eq!(env_string("STATE_PROBE_TEST_BLANK"), None);
        std::env::set_var("STATE_PROBE_TEST_BLANK", " void ");
        assert_eq!(env_string("STATE_PROBE_TEST_BLANK").as_deref(), Some("void"));
        std::env::remove_var("STATE_PROBE_TEST_BLANK");
    }

    #[test]
    fn test_env_bool() {
        std::env::set_var("STATE_PROBE_TEST_BOOL_YES", "YES");
        std::env::set_var("STATE_PROBE_TEST_BOOL_OFF", "off");

        assert!(env_bool("STATE_PROBE_TEST_BOOL_YES"));
        assert!(!env_bool("STATE_PROBE_TEST_BOOL_OFF"));
        assert!(!env_bool("STATE_PROBE_TEST_MISSING_2"));

        std::env::remove_var("STATE_PROBE_TEST_BOOL_YES");
        std::env::remove_var("STATE_PROBE_TEST_BOOL_OFF");
    }
}
