//! HTTP transport capability the gateway depends on.
//!
//! # Design
//! The gateway never performs I/O itself. It hands each `HttpRequest` to an
//! injected `Transport` and translates the outcome. `UreqTransport` is the
//! default: a blocking `ureq` agent driven from tokio's blocking pool so the
//! async caller is never blocked. Tests substitute their own implementation.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::trace;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes GET requests on behalf of the gateway.
///
/// Implementations must report every HTTP status as `Ok`; only failures to
/// complete the exchange are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Default transport backed by a shared `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }

    fn execute_blocking(agent: &ureq::Agent, url: &str) -> Result<HttpResponse, TransportError> {
        let mut response = agent.get(url).call().map_err(map_ureq_error)?;
        let status = response.status().as_u16();
        // Payloads are passed through whole; ureq's default cap is 10 MiB.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(map_ureq_error)?;
        trace!(status, bytes = body.len(), "ureq exchange finished");
        Ok(HttpResponse {
            status,
            body: Some(Bytes::from(body)),
        })
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        let url = request.url.clone();
        tokio::task::spawn_blocking(move || Self::execute_blocking(&agent, &url))
            .await
            .map_err(|e| {
                if e.is_cancelled() {
                    TransportError::Cancelled(e.to_string())
                } else {
                    TransportError::Other(format!("transport worker failed: {e}"))
                }
            })?
    }
}

fn map_ureq_error(err: ureq::Error) -> TransportError {
    let message = err.to_string();
    match err {
        ureq::Error::Timeout(_) => TransportError::Timeout(message),
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => TransportError::Connect(message),
        ureq::Error::Io(e) => match e.kind() {
            std::io::ErrorKind::TimedOut => TransportError::Timeout(message),
            std::io::ErrorKind::ConnectionRefused | std::io::ErrorKind::ConnectionReset => {
                TransportError::Connect(message)
            }
            _ => TransportError::Io(message),
        },
        _ => TransportError::Other(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_error_maps_to_timeout() {
        let err = map_ureq_error(ureq::Error::Io(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "deadline",
        )));
        assert!(matches!(err, TransportError::Timeout(_)));
    }

    #[test]
    fn refused_connection_maps_to_connect() {
        let err = map_ureq_error(ureq::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        )));
        assert!(matches!(err, TransportError::Connect(_)));
    }

    #[test]
    fn host_not_found_maps_to_connect() {
        assert!(matches!(map_ureq_error(ureq::Error::HostNotFound), TransportError::Connect(_)));
    }

    #[tokio::test]
    async fn unreachable_port_reports_transport_error() {
        // Bind then drop so the port is very likely closed.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let transport = UreqTransport::new(Some(Duration::from_secs(5)));
        let request = HttpRequest {
            url: format!("http://127.0.0.1:{port}/movie/1?api_key=KEY"),
        };
        assert!(transport.get(&request).await.is_err());
    }
}
