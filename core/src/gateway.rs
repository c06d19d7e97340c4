//! The request gateway: resolve, submit once, report once.
//!
//! # Design
//! A call moves through `Built -> Submitted -> Completed`. Resolution
//! failures skip straight to a completed failure without touching the
//! transport. Each call's future resolves to exactly one `FetchResult`;
//! `submit` bridges that into a completion closure for callers that prefer
//! callback style.
//!
//! The gateway holds no mutable state. Its configuration is fixed at
//! construction and concurrency is delegated to the transport, so any number
//! of calls may be in flight at once with no ordering or deduplication.

use std::sync::{Arc, OnceLock};

use bytes::Bytes;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::client::MovieClient;
use crate::config::GatewayConfig;
use crate::error::{GatewayError, TransportError};
use crate::operation::{MovieCategory, Operation};
use crate::transport::{Transport, UreqTransport};

/// Outcome of one gateway call: the raw payload or the reason there is none.
pub type FetchResult = Result<Bytes, GatewayError>;

pub struct Gateway {
    config: GatewayConfig,
    client: MovieClient,
    transport: Arc<dyn Transport>,
}

impl Gateway {
    /// Build a gateway that talks to the network through `UreqTransport`.
    pub fn new(config: GatewayConfig) -> Self {
        let transport = Arc::new(UreqTransport::new(config.timeout));
        Self::with_transport(config, transport)
    }

    pub fn with_transport(config: GatewayConfig, transport: Arc<dyn Transport>) -> Self {
        let client = MovieClient::new(&config.base_url, &config.api_key);
        if let Err(e) = client.base_url() {
            warn!(error = %e, "every call on this gateway will fail");
        }
        Self {
            config,
            client,
            transport,
        }
    }

    /// Process-wide gateway configured from the environment.
    ///
    /// Constructed on first access; concurrent first accesses still build it
    /// only once. Every caller receives the same instance.
    pub fn shared() -> Arc<Gateway> {
        static SHARED: SharedGateway = SharedGateway::new();
        SHARED.get_or_init(|| Gateway::new(GatewayConfig::from_env()))
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub async fn fetch_category(&self, category: MovieCategory, page: u32) -> FetchResult {
        self.execute(Operation::ListCategory {
            category,
            page: Some(page),
        })
        .await
    }

    pub async fn search(&self, query: &str, page: u32) -> FetchResult {
        self.execute(Operation::SearchMovies {
            query: query.to_string(),
            page: Some(page),
        })
        .await
    }

    pub async fn fetch_details(&self, movie_id: i64) -> FetchResult {
        self.execute(Operation::MovieDetails { movie_id }).await
    }

    pub async fn fetch_ratings(&self, movie_id: i64, page: u32) -> FetchResult {
        self.execute(Operation::MovieRatings {
            movie_id,
            page: Some(page),
        })
        .await
    }

    /// Run one operation to completion.
    ///
    /// Any HTTP status is a success: the payload is returned as-is and
    /// interpreting it is left to the caller.
    #[instrument(name = "gateway", skip_all, fields(op = operation.name()))]
    pub async fn execute(&self, operation: Operation) -> FetchResult {
        let spec = operation.resolve().inspect_err(|e| debug!(error = %e, "rejected before submission"))?;
        let request = self
            .client
            .request_for(&spec)
            .inspect_err(|e| warn!(error = %e, "cannot build request"))?;

        debug!(path = %spec.path, "submitting");
        let response = self.transport.get(&request).await.map_err(|e| {
            debug!(path = %spec.path, error = %e, "transport failed");
            GatewayError::from(e)
        })?;

        if !response.is_success() {
            warn!(path = %spec.path, status = response.status, "passing through non-success status");
        }
        let body = response.body.ok_or(GatewayError::EmptyResponse)?;
        debug!(path = %spec.path, status = response.status, bytes = body.len(), "completed");
        Ok(body)
    }

    /// Run `operation` in the background and hand its result to `completion`.
    ///
    /// `completion` runs exactly once, on whatever worker finishes the call.
    /// Outside a Tokio runtime nothing can be spawned; `completion` then runs
    /// immediately with `InvalidConfig` and `None` is returned. If the task is
    /// aborted or its runtime shuts down first, `completion` receives
    /// `TransportError::Cancelled` when the task is dropped.
    pub fn submit<F>(self: &Arc<Self>, operation: Operation, completion: F) -> Option<JoinHandle<()>>
    where
        F: FnOnce(FetchResult) + Send + 'static,
    {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                completion(Err(GatewayError::InvalidConfig(format!(
                    "no async runtime to run {}: {e}",
                    operation.name()
                ))));
                return None;
            }
        };
        let gateway = Arc::clone(self);
        let completion = Completion::new(operation.name(), completion);
        Some(handle.spawn(async move {
            let result = gateway.execute(operation).await;
            completion.complete(result);
        }))
    }
}

/// Holds a completion until it has been called.
///
/// Dropping it unfired reports the call as cancelled, so the callback still
/// runs once when the owning task is torn down mid-flight.
struct Completion<F: FnOnce(FetchResult)> {
    op: &'static str,
    callback: Option<F>,
}

impl<F: FnOnce(FetchResult)> Completion<F> {
    fn new(op: &'static str, callback: F) -> Self {
        Self {
            op,
            callback: Some(callback),
        }
    }

    fn complete(mut self, result: FetchResult) {
        if let Some(callback) = self.callback.take() {
            callback(result);
        }
    }
}

impl<F: FnOnce(FetchResult)> Drop for Completion<F> {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            debug!(op = self.op, "call dropped before completion");
            callback(Err(GatewayError::Transport(TransportError::Cancelled(format!(
                "{} was dropped before it completed",
                self.op
            )))));
        }
    }
}

/// Lazily built, process-lifetime gateway slot.
///
/// `get_or_init` runs its initializer at most once even under concurrent
/// first access; later callers get a handle to the same instance.
pub struct SharedGateway {
    cell: OnceLock<Arc<Gateway>>,
}

impl SharedGateway {
    pub const fn new() -> Self {
        Self { cell: OnceLock::new() }
    }

    pub fn get_or_init(&self, init: impl FnOnce() -> Gateway) -> Arc<Gateway> {
        Arc::clone(self.cell.get_or_init(|| Arc::new(init())))
    }

    pub fn get(&self) -> Option<Arc<Gateway>> {
        self.cell.get().cloned()
    }
}

impl Default for SharedGateway {
    fn default() -> Self {
        Self::new()
    }
}
