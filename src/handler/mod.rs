//! Handler declaration and registration subsystem.
//!
//! # Data Flow
//! ```text
//! web_api_handler! { impl H { #[get] pub fn ... } }
//!     → WebApiHandler::declare → MethodDeclarations<H>
//!     → HandlerRegistration::build::<H>() (validation, one instance of H)
//!     → CallingMethod table, in declaration order
//! ```
//!
//! # Design Decisions
//! - Declarations are produced by code generation, not runtime reflection
//! - Parameter types are described by [`TypeDescriptor`]s built from monomorphized functions
//! - Registration errors are fatal; request-time failures never are

pub mod attributes;
pub mod error;
pub mod macros;
pub mod method;
pub mod parameter;
pub mod registry;
pub mod value;

pub use attributes::{BindingSource, Mount, Verb};
pub use error::{InvokeError, RegistrationError, RegistrationResult};
pub use method::{Arguments, CallingMethod, HandlerOutcome, MethodDeclaration, MethodDeclarations, Thunk};
pub use parameter::{CallingParameter, ParameterDeclaration};
pub use registry::{HandlerRegistration, WebApiHandler};
pub use value::{Bindable, BoxedValue, TypeDescriptor, TypeKind};
