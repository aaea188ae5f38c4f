//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (verb, path, query, body)
//!     → url.rs (app/version/handler/action)
//!     → router.rs (handler lookup by "v{version}/{handler}")
//!     → matcher.rs (direct action lookup, or ordered scan)
//!     → binder → CallingMethod::call
//!     → ResponseMessage (handler output, 404 or 500)
//! ```
//!
//! # Design Decisions
//! - Handlers registered at startup, immutable at runtime
//! - Deterministic: same input always resolves the same method
//! - First match in declaration order wins

pub mod matcher;
pub mod router;
pub mod url;

pub use matcher::{BodyMethodMatcher, GetMethodMatcher, MethodMatcher};
pub use router::{WebApiRouter, WebApiRouterBuilder};
pub use url::{parse_url, WebApiUrlInfo};
