//! Web API dispatch server
//!
//! Serves the sample `Test` handler behind the declarative dispatcher.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (axum, request ID, timeout, trace)
//!                         │  buffered HttpRequest
//!                         ▼
//!                     routing::router ── url → handler → matcher
//!                         │
//!                         ▼
//!                     binding::binder ── query / JSON / form → typed args
//!                         │
//!                         ▼
//!                     handler::CallingMethod::call (thunk)
//!                         │  context.response().write(..)
//!     Client Response     ▼
//!     ◀────────────── ResponseMessage (200/204, 404, 500)
//! ```
//!
//! Cross-cutting: config (TOML + CLI), observability (tracing), lifecycle (signals, shutdown).

mod demo;

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use webapi_dispatch::config::{load_config, validate_config, ConfigError, WebApiConfig};
use webapi_dispatch::lifecycle::{shutdown_on_signal, Shutdown};
use webapi_dispatch::observability::{init_tracing, Logger};
use webapi_dispatch::{HttpServer, WebApiRouter};

use crate::demo::TestHandler;

const DEFAULT_APPLICATION_NAME: &str = "api";

#[derive(Parser)]
#[command(name = "webapi-dispatch")]
#[command(about = "Declarative HTTP request dispatcher", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overriding the config file.
    #[arg(short, long)]
    bind: Option<String>,

    /// Application name (first path segment), overriding the config file.
    #[arg(short, long)]
    app_name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => WebApiConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(app_name) = cli.app_name {
        config.application.name = Some(app_name);
    }
    if config.application.name.is_none() {
        config.application.name = Some(DEFAULT_APPLICATION_NAME.to_string());
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    init_tracing(&config.observability.log_level);
    tracing::info!("webapi-dispatch v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        application_name = config.application.name.as_deref().unwrap_or(""),
        max_concurrent_requests = config.dispatch.max_concurrent_requests,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let router = WebApiRouter::builder()
        .application_name(config.application.name.clone().unwrap_or_default())
        .logger(Logger::global())
        .handler::<TestHandler>()
        .build()?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, router);
    let serve = tokio::spawn(server.run(listener, shutdown.subscribe()));

    shutdown_on_signal(&shutdown).await;
    serve.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
