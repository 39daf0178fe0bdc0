use thiserror::Error;

use crate::providers::ProviderKind;

/// Errors resolved before any request is dispatched.
///
/// Capability degradations are not errors: the router folds them into the
/// decision itself. The only fatal routing condition is a missing baseline
/// credential, without which no turn can proceed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouterError {
    #[error("baseline credential missing: {0}")]
    ConfigurationMissing(String),
}

/// Errors surfaced by the dispatcher and the streaming transport.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Caller-initiated cancellation. Not a failure to report or retry.
    #[error("request aborted by caller")]
    Aborted,

    /// The upstream rejected our credentials. Not retryable without user action.
    #[error("authentication required for {provider}")]
    AuthRequired { provider: ProviderKind },

    /// The upstream answered with a non-2xx status.
    #[error("{provider} request failed with status {status}")]
    Provider { provider: ProviderKind, status: u16 },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The upstream answered 2xx but the body was not in the expected shape.
    #[error("malformed response from {provider}: {detail}")]
    MalformedResponse {
        provider: ProviderKind,
        detail: String,
    },

    /// The conversation cannot be turned into a valid upstream request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// Whether the caller may retry the request as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransportError::Provider { .. }
                | TransportError::Network(_)
                | TransportError::MalformedResponse { .. }
        )
    }
}
