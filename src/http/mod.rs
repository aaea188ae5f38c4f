//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, timeout, tracing)
//!     → body buffered, request.rs (HttpRequest view)
//!     → pool.rs (dispatch slot) → blocking pool
//!     → WebApiRouter::dispatch (context.rs: request + response sink)
//!     → response.rs (ResponseMessage → Axum response)
//!     → Send to client
//! ```

pub mod context;
pub mod pool;
pub mod request;
pub mod response;
pub mod server;

pub use context::WebApiHttpContext;
pub use pool::{DispatchPermit, DispatchPool};
pub use request::{HttpRequest, QueryData};
pub use response::{HttpResponse, ResponseMessage};
pub use server::HttpServer;
