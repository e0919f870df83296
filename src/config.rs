//! Environment-driven configuration.
//!
//! Everything this crate needs from the environment is resolved here, up
//! front, so the tools themselves stay pure and testable.

use crate::error::ReportError;

/// Credential variables checked in order; first non-empty value wins.
const API_KEY_VARS: &[&str] = &["STRIPE_SECRET_KEY", "STRIPE_API_KEY"];

const DEFAULT_API_BASE: &str = "https://api.stripe.com/v1";

/// Resolves the Stripe API key from the environment.
///
/// Values are trimmed; a variable that is set but blank counts as absent.
pub fn resolve_api_key() -> Result<String, ReportError> {
    for var in API_KEY_VARS {
        if let Ok(value) = std::env::var(var) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Ok(trimmed.to_string());
            }
        }
    }
    Err(ReportError::MissingCredential)
}

/// Returns the Stripe API base URL, honoring `STRIPE_API_BASE` overrides
/// (useful for pointing the report at stripe-mock).
pub fn resolve_api_base() -> String {
    std::env::var("STRIPE_API_BASE")
        .ok()
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

/// Returns the configured tracking pixel endpoint, if any.
///
/// Absent or blank means open tracking is disabled; HTML emails are still
/// rendered, just without a pixel.
pub fn resolve_pixel_endpoint() -> Option<String> {
    std::env::var("TRACKING_PIXEL_ENDPOINT")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for var in API_KEY_VARS {
            std::env::remove_var(var);
        }
        std::env::remove_var("STRIPE_API_BASE");
        std::env::remove_var("TRACKING_PIXEL_ENDPOINT");
    }

    #[test]
    #[serial]
    fn test_resolve_api_key_missing() {
        clear_env();
        let err = resolve_api_key().unwrap_err();
        assert!(matches!(err, ReportError::MissingCredential));
    }

    #[test]
    #[serial]
    fn test_resolve_api_key_blank_counts_as_missing() {
        clear_env();
        std::env::set_var("STRIPE_SECRET_KEY", "   ");
        assert!(resolve_api_key().is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_resolve_api_key_prefers_secret_key() {
        clear_env();
        std::env::set_var("STRIPE_SECRET_KEY", "sk_test_primary");
        std::env::set_var("STRIPE_API_KEY", "sk_test_fallback");
        assert_eq!(resolve_api_key().unwrap(), "sk_test_primary");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_resolve_api_key_falls_back_and_trims() {
        clear_env();
        std::env::set_var("STRIPE_API_KEY", "  sk_test_fallback\n");
        assert_eq!(resolve_api_key().unwrap(), "sk_test_fallback");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_resolve_api_base_default_and_override() {
        clear_env();
        assert_eq!(resolve_api_base(), DEFAULT_API_BASE);
        std::env::set_var("STRIPE_API_BASE", "http://localhost:12111/v1/");
        assert_eq!(resolve_api_base(), "http://localhost:12111/v1");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_resolve_pixel_endpoint() {
        clear_env();
        assert_eq!(resolve_pixel_endpoint(), None);
        std::env::set_var("TRACKING_PIXEL_ENDPOINT", "https://pixel.example.com/t");
        assert_eq!(
            resolve_pixel_endpoint().as_deref(),
            Some("https://pixel.example.com/t")
        );
        clear_env();
    }
}
