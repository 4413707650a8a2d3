//! Router construction and server host for the API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, http::Request, middleware, routing::get};
use netgo_telemetry::build_sha;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{Span, info, warn};

use crate::error::{ApiServerError, ApiServerResult};
use crate::http::constants::HEADER_REQUEST_ID;
use crate::http::dispatch::dispatch_action;
use crate::http::metrics::metrics;
use crate::http::shutdown::{fire_after_response, shutdown};
use crate::http::telemetry::HttpMetricsLayer;
use crate::shutdown::ShutdownSignal;
use crate::state::ApiState;

/// Time open connections get to finish once shutdown fires.
const DEFAULT_DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Axum router wrapper that hosts the netgo HTTP surface.
pub struct ApiServer {
    router: Router,
    drain_grace: Duration,
}

impl ApiServer {
    /// Construct the server with its routes and middleware stack.
    #[must_use]
    pub fn new(state: ApiState) -> Self {
        let telemetry = state.telemetry.clone();
        let state = Arc::new(state);
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(HEADER_REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();

                tracing::info_span!(
                    "http.request",
                    method = %request.method(),
                    route = %request.uri().path(),
                    request_id = %request_id,
                    build_sha = %build_sha(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_request(|_request: &Request<_>, _span: &Span| {})
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );
        let layered = ServiceBuilder::new()
            .layer(netgo_telemetry::propagate_request_id_layer())
            .layer(netgo_telemetry::set_request_id_layer())
            .layer(trace_layer)
            .layer(HttpMetricsLayer::new(telemetry));

        let router = Self::build_router(&state)
            .route_layer(layered)
            .with_state(state);

        Self {
            router,
            drain_grace: DEFAULT_DRAIN_GRACE,
        }
    }

    /// Replace the drain deadline applied after shutdown fires.
    #[must_use]
    pub fn with_drain_grace(self, drain_grace: Duration) -> Self {
        Self {
            drain_grace,
            ..self
        }
    }

    fn build_router(state: &Arc<ApiState>) -> Router<Arc<ApiState>> {
        let fire_shutdown = middleware::from_fn_with_state(state.clone(), fire_after_response);

        Router::new()
            .route("/", get(dispatch_action))
            .route(
                "/shutdown/",
                get(shutdown).route_layer(fire_shutdown.clone()),
            )
            .route("/shutdown", get(shutdown).route_layer(fire_shutdown))
            .route("/metrics", get(metrics))
    }

    /// Bind `addr` and serve until `shutdown` fires.
    ///
    /// # Errors
    ///
    /// Returns an error if binding or serving fails.
    pub async fn serve(self, addr: SocketAddr, shutdown: ShutdownSignal) -> ApiServerResult<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Bind { addr, source })?;
        self.serve_listener(listener, shutdown).await
    }

    /// Serve on an already-bound listener until `shutdown` fires, then drain
    /// in-flight connections for at most the drain grace.
    ///
    /// Connections still open when the grace elapses are abandoned; a stalled
    /// download never holds the server past the deadline.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener address cannot be read or serving fails.
    pub async fn serve_listener(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> ApiServerResult<()> {
        let local = listener
            .local_addr()
            .map_err(|source| ApiServerError::LocalAddr { source })?;
        info!(addr = %local, "starting api");

        let drain_grace = self.drain_grace;
        let graceful = std::future::IntoFuture::into_future(
            axum::serve(listener, self.router.into_make_service()).with_graceful_shutdown({
                let shutdown = shutdown.clone();
                async move { shutdown.wait().await }
            }),
        );
        let deadline = async move {
            shutdown.wait().await;
            tokio::time::sleep(drain_grace).await;
        };

        tokio::select! {
            result = graceful => {
                result.map_err(|source| ApiServerError::Serve { source })?;
                info!("api stopped");
            }
            () = deadline => {
                let grace_ms = u64::try_from(drain_grace.as_millis()).unwrap_or(u64::MAX);
                warn!(grace_ms, "drain deadline elapsed; abandoning open connections");
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn router(&self) -> Router {
        self.router.clone()
    }
}
