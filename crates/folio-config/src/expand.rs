//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a string.
///
/// Bare `$VAR` is left alone, so prices and shell snippets in titles survive.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(LookupError {
                var_name: var.to_owned(),
            }),
        }
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: each test uses its own variable name
        unsafe {
            std::env::set_var("FOLIO_TEST_SIMPLE", "hello");
        }
        let result = expand_env("${FOLIO_TEST_SIMPLE}", "site.title").unwrap();
        assert_eq!(result, "hello");
        unsafe {
            std::env::remove_var("FOLIO_TEST_SIMPLE");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: each test uses its own variable name
        unsafe {
            std::env::remove_var("FOLIO_TEST_UNSET");
        }
        let result = expand_env("${FOLIO_TEST_UNSET:-/}", "site.base_url").unwrap();
        assert_eq!(result, "/");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: each test uses its own variable name
        unsafe {
            std::env::remove_var("FOLIO_TEST_MISSING");
        }
        let err = expand_env("${FOLIO_TEST_MISSING}", "site.url").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("FOLIO_TEST_MISSING"));
        assert!(err.to_string().contains("site.url"));
    }

    #[test]
    fn test_expand_embedded_var() {
        // SAFETY: each test uses its own variable name
        unsafe {
            std::env::set_var("FOLIO_TEST_HOST", "blog.example.com");
        }
        let result = expand_env("https://${FOLIO_TEST_HOST}/", "site.url").unwrap();
        assert_eq!(result, "https://blog.example.com/");
        unsafe {
            std::env::remove_var("FOLIO_TEST_HOST");
        }
    }

    #[test]
    fn test_literal_unchanged() {
        assert_eq!(expand_env("costs $5", "site.title").unwrap(), "costs $5");
    }
}
