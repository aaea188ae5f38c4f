//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! router, binders, codec, server
//!     → tracing events (inside the Logger scope)
//!     → injected Dispatch, or the global subscriber from init_tracing
//! HTTP layer
//!     → tower_http TraceLayer (one span per request, with x-request-id)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event
//! - Request ID flows from the transport into the request view

pub mod logging;

pub use logging::{init_tracing, Logger};
