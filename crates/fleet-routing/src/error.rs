use thiserror::Error;

/// A single failed provider call.
///
/// Every variant is recoverable: the client retries once and then answers
/// with a fallback estimate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProviderError {
    #[error("http request failed: {0}")]
    Http(String),

    #[error("request timed out")]
    Timeout,

    #[error("provider returned HTTP {0}")]
    Status(u16),

    /// HTTP 429 or the provider's equivalent.  Opens the circuit.
    #[error("provider rate limit reached")]
    RateLimited,

    /// The guard refused the call without contacting the provider.
    #[error("circuit open; provider calls suspended")]
    CircuitOpen,

    #[error("failed to decode provider response: {0}")]
    Decode(String),

    #[error("provider found no route: {0}")]
    NoRoute(String),
}

/// Errors surfaced by `fleet-routing` APIs that can genuinely fail.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("provider setup failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("invalid stop ordering: {0}")]
    InvalidOrdering(String),
}

pub type RoutingResult<T> = Result<T, RoutingError>;
