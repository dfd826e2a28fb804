//! Environment lookup helpers shared by the service configurations.

use std::env;
use std::str::FromStr;

/// First set variable among `keys`, in order.
pub fn env_any(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| env::var(key).ok())
}

/// First set variable among `keys`, or `default`.
pub fn env_or(keys: &[&str], default: &str) -> String {
    env_any(keys).unwrap_or_else(|| default.to_string())
}

/// First set and parseable variable among `keys`, or `default`.
pub fn env_parse<T: FromStr>(keys: &[&str], default: T) -> T {
    env_any(keys)
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_through_keys() {
        env::set_var("EMPLEO_COMMON_TEST_SECOND", "42");
        assert_eq!(
            env_parse(&["EMPLEO_COMMON_TEST_FIRST", "EMPLEO_COMMON_TEST_SECOND"], 7u16),
            42
        );
        assert_eq!(env_or(&["EMPLEO_COMMON_TEST_UNSET"], "fallback"), "fallback");
    }

    #[test]
    fn unparseable_value_uses_default() {
        env::set_var("EMPLEO_COMMON_TEST_BAD_PORT", "not-a-port");
        assert_eq!(env_parse(&["EMPLEO_COMMON_TEST_BAD_PORT"], 3000u16), 3000);
    }
}
