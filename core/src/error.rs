//! Error types for the movie gateway.
//!
//! # Design
//! Every failure a call can hit is an ordinary value delivered through the
//! call's single result. `InvalidArgument` is raised before any network
//! activity; `Transport` carries whatever the transport reported, untouched.

use thiserror::Error;

/// Errors reported by an HTTP transport.
///
/// Variants carry strings rather than the underlying library error so the
/// type stays `Clone` and test doubles can replay the same failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection could not be established (DNS, refused, TLS handshake).
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    /// Reading or writing the byte stream failed mid-flight.
    #[error("I/O error: {0}")]
    Io(String),

    /// The in-flight request was abandoned before it produced an outcome.
    #[error("request cancelled: {0}")]
    Cancelled(String),

    #[error("transport error: {0}")]
    Other(String),
}

/// Errors returned by `Gateway` calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// A parameter was rejected before the request was built.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The gateway configuration cannot produce a valid request URL.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The transport completed but delivered no payload at all.
    #[error("transport returned no payload")]
    EmptyResponse,
}
