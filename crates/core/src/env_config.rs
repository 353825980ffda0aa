//! Environment variable parsing with warn-level logging for invalid values.

/// Parse an environment variable with a default fallback.
///
/// - If the variable is not set: returns `default` silently (expected case).
/// - If the variable is set but cannot be parsed: logs a warning and returns `default`.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    parse_with_default(var, std::env::var(var).ok(), default)
}

fn parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    raw: Option<String>,
    default: T,
) -> T {
    let Some(v) = raw else {
        return default;
    };
    match v.trim().parse() {
        Ok(n) => n,
        Err(_) => {
            tracing::warn!(
                var,
                value = %v,
                default = %default,
                "invalid env var value, using default"
            );
            default
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_parse_valid_value() {
        let result: u32 = parse_with_default("X", Some("42".to_owned()), 10);
        assert_eq!(result, 42);
    }

    #[test]
    fn test_env_parse_trims_whitespace() {
        let result: u64 = parse_with_default("X", Some(" 7\n".to_owned()), 1);
        assert_eq!(result, 7);
    }

    #[test]
    fn test_env_parse_invalid_value() {
        let result: u32 = parse_with_default("X", Some("banana".to_owned()), 10);
        assert_eq!(result, 10);
    }

    #[test]
    fn test_env_parse_missing_var() {
        let result: u32 = parse_with_default("X", None, 10);
        assert_eq!(result, 10);
    }

    #[test]
    fn test_env_parse_empty_value() {
        let result: i64 = parse_with_default("X", Some(String::new()), -3);
        assert_eq!(result, -3);
    }

    #[test]
    fn test_env_parse_unset_process_var() {
        let result: u32 = env_parse_with_default("SEARCH_CACHE_TEST_UNSET_VAR_51723", 9);
        assert_eq!(result, 9);
    }
}
