//! Error type returned by the pricing engine.

use thiserror::Error;

/// Errors raised while pricing a job.
///
/// A missing tariff entry is deliberately *not* an error: it is reported
/// as a [`Diagnostic`](crate::models::Diagnostic) on the breakdown and the
/// charge is treated as zero.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// The job description violates a precondition of the engine.
    #[error("invalid job spec: {0}")]
    InvalidJobSpec(String),
}

impl PricingError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        PricingError::InvalidJobSpec(reason.into())
    }
}

impl From<serde_json::Error> for PricingError {
    fn from(err: serde_json::Error) -> Self {
        PricingError::InvalidJobSpec(err.to_string())
    }
}
