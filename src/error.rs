//! Error types for llm-gateway

use std::time::Duration;

/// Errors surfaced by gateway construction and execution.
///
/// Policy violations and rate limiting are not errors: they are expressed
/// in [`GatewayOutcome`](crate::gateway::GatewayOutcome) as structured data
/// so callers never have to parse failure text.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Invalid configuration: non-positive limit, bad pattern, missing
    /// provider settings. Fatal at startup.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The provider call failed. Transient; callers may retry with backoff.
    #[error("provider call failed: {0}")]
    Provider(#[from] ProviderError),

    /// The provider call did not complete within the configured deadline.
    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors from the completion provider transport.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Transport-level failure (connect, TLS, body read).
    #[error("transport error: {0}")]
    Transport(String),

    /// Provider returned a non-success status.
    #[error("provider returned status {0}")]
    Status(u16),

    /// Provider returned a payload the gateway could not interpret.
    #[error("malformed provider response: {0}")]
    Malformed(String),
}
