//! Terminal error conditions for the revenue report.
//!
//! Upstream Stripe failures (auth, rate limit, transport) are deliberately
//! not wrapped here; they propagate as `anyhow` chains so the operator sees
//! the provider's own message. Only the two configuration-class failures
//! that abort before/at client construction get typed variants.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("missing Stripe credential: set STRIPE_SECRET_KEY (or STRIPE_API_KEY)")]
    MissingCredential,

    #[error("billing client unavailable: {0}")]
    ClientUnavailable(String),
}
