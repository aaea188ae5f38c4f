//! Declarative HTTP request dispatcher library

pub mod binding;
pub mod codec;
pub mod config;
pub mod handler;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use binding::{Properties, WebApiObject};
pub use config::schema::WebApiConfig;
pub use handler::{RegistrationError, WebApiHandler};
pub use http::{HttpServer, WebApiHttpContext};
pub use lifecycle::Shutdown;
pub use observability::Logger;
pub use routing::WebApiRouter;
