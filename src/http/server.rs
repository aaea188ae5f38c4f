//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app with one fallback handler for every path and method
//! - Wire up middleware (timeout, request ID, tracing)
//! - Buffer the request body within the configured limit
//! - Run the router on the blocking pool, bounded by the dispatch pool
//! - Serve until the shutdown broadcast fires, then close the dispatch pool
//!
//! # Design Decisions
//! - The dispatch permit moves into the blocking task, so a request dropped by
//!   the timeout layer keeps its slot until the handler returns
//! - Only a body over the limit is answered with 413; other read errors get 400

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use http_body_util::LengthLimitError;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::WebApiConfig;
use crate::http::pool::DispatchPool;
use crate::http::request::HttpRequest;
use crate::routing::WebApiRouter;

/// Application state injected into the dispatch handler.
#[derive(Clone)]
struct AppState {
    router: Arc<WebApiRouter>,
    pool: DispatchPool,
    max_body_bytes: usize,
}

/// HTTP front end for a [`WebApiRouter`].
pub struct HttpServer {
    app: Router,
    pool: DispatchPool,
    config: WebApiConfig,
}

impl HttpServer {
    pub fn new(config: WebApiConfig, router: WebApiRouter) -> Self {
        let pool = DispatchPool::new(config.dispatch.max_concurrent_requests);
        let state = AppState {
            router: Arc::new(router),
            pool: pool.clone(),
            max_body_bytes: config.dispatch.max_body_bytes,
        };
        let app = Self::build_router(&config, state);
        Self { app, pool, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &WebApiConfig, state: AppState) -> Router {
        Router::new().fallback(dispatch_handler).with_state(state).layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.timeouts.request_secs,
                )))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
    }

    /// Run the server on `listener` until `shutdown` fires.
    ///
    /// On shutdown the dispatch pool is closed: requests still waiting for a
    /// slot are answered with 503 while in-flight dispatches drain.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let pool = self.pool;
        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
                pool.close();
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &WebApiConfig {
        &self.config
    }

    pub fn dispatch_pool(&self) -> &DispatchPool {
        &self.pool
    }
}

/// Convert the transport request, dispatch it and convert the response.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();

    let declared_length = parts
        .headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<usize>().ok());
    if declared_length.is_some_and(|length| length > state.max_body_bytes) {
        tracing::warn!(
            path = parts.uri.path(),
            content_length = declared_length,
            max_body_bytes = state.max_body_bytes,
            "Request body too large"
        );
        return StatusCode::PAYLOAD_TOO_LARGE.into_response();
    }

    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            let status = body_error_status(&e);
            tracing::warn!(
                path = parts.uri.path(),
                error = %e,
                status = status.as_u16(),
                "Failed to read request body"
            );
            return status.into_response();
        }
    };
    let request = HttpRequest::from_parts(parts.method, &parts.uri, &parts.headers, body);

    let Some(permit) = state.pool.acquire().await else {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    };

    let router = Arc::clone(&state.router);
    let dispatch = move || {
        let _permit = permit;
        router.dispatch(request)
    };
    match tokio::task::spawn_blocking(dispatch).await {
        Ok(message) => message.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Dispatch task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// 413 when the body ran over the limit, 400 for any other read failure.
fn body_error_status(error: &axum::Error) -> StatusCode {
    let too_large = std::error::Error::source(error)
        .is_some_and(|source| source.is::<LengthLimitError>());
    if too_large {
        StatusCode::PAYLOAD_TOO_LARGE
    } else {
        StatusCode::BAD_REQUEST
    }
}
