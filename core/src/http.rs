//! HTTP request and response values exchanged with a `Transport`.
//!
//! # Design
//! Requests and responses are plain data. `MovieClient` builds an
//! `HttpRequest` without any I/O; a transport executes it and hands back an
//! `HttpResponse`. Every request the gateway issues is a GET, so the method
//! is not modelled.

use bytes::Bytes;

/// An absolute GET request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Absolute URL including the encoded query string.
    pub url: String,
}

/// Raw outcome of a completed HTTP exchange.
///
/// `body` is `None` only when the transport can tell that no payload was
/// delivered at all, which is distinct from an empty payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Option<Bytes>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: Some(body.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
