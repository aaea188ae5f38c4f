//! Request data → typed argument conversion.
//!
//! # Responsibilities
//! - Materialize composite objects from query or form data ([`materializer`])
//! - Parse form-encoded bodies ([`form`])
//! - Build the ordered argument list for a matched method ([`binder`])

pub mod binder;
pub mod form;
pub mod materializer;

pub use binder::{ArgumentBinder, BodyArgumentBinder, GetArgumentBinder};
pub use form::parse_form;
pub use materializer::{MaterializeError, ObjectMaterializer, Properties, WebApiObject};
