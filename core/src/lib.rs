//! Asynchronous request gateway for a remote movie-information service.
//!
//! # Overview
//! Given a logical `Operation` (category listing, text search, movie details,
//! movie reviews) the gateway builds the matching GET request, submits it to
//! an injected `Transport` exactly once, and resolves to exactly one
//! `FetchResult`: the raw payload bytes or a `GatewayError`.
//!
//! # Design
//! - `Operation::resolve` is pure and rejects bad parameters before any I/O.
//! - `MovieClient` turns a resolved spec into an absolute URL and holds only
//!   the base URL and API key.
//! - `Gateway` owns the immutable `GatewayConfig` and the transport. It never
//!   decodes payloads; non-2xx responses are passed through as payloads.
//! - `Gateway::shared` provides a lazily built process-wide instance for
//!   callers that need one; everything else can construct gateways directly.

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod operation;
pub mod transport;

pub use client::MovieClient;
pub use config::GatewayConfig;
pub use error::{GatewayError, TransportError};
pub use gateway::{FetchResult, Gateway, SharedGateway};
pub use http::{HttpRequest, HttpResponse};
pub use operation::{MovieCategory, Operation, RequestSpec, DEFAULT_PAGE};
pub use transport::{Transport, UreqTransport};
