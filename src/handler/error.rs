//! Registration and invocation error definitions.

use thiserror::Error;

/// Errors detected while registering handler methods.
///
/// Each one is a programming mistake in a handler declaration and aborts
/// router construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A method carries more than one verb attribute.
    #[error("Method '{method}' declares more than one HTTP verb")]
    MultipleVerbs { method: String },

    /// A verb-tagged method is not `pub`.
    #[error("Method '{method}' must be public to be exposed as a web method")]
    NotPublic { method: String },

    /// The first parameter is not the request context.
    #[error("The first parameter of method '{method}' must be the request context")]
    MissingContext { method: String },

    /// The request context appears after the first parameter.
    #[error("Parameter '{parameter}' of method '{method}': the request context may only be the first parameter")]
    MisplacedContext { method: String, parameter: String },

    /// A parameter carries both `from_url` and `from_body`, or one of them twice.
    #[error("Parameter '{parameter}' of method '{method}' declares more than one binding source")]
    ConflictingBinding { method: String, parameter: String },

    #[error("Method '{method}' declares more than one from_url parameter")]
    MultipleFromUrl { method: String },

    #[error("Method '{method}' declares more than one from_body parameter")]
    MultipleFromBody { method: String },

    /// A `from_url` object would compete with plain query parameters.
    #[error("Method '{method}' mixes a from_url parameter with plain query parameters")]
    FromUrlWithQueryParameters { method: String },

    #[error("Get method '{method}' cannot declare a from_body parameter")]
    GetWithBody { method: String },

    /// A `from_url` parameter whose type cannot be default-constructed and populated.
    #[error("Parameter '{parameter}' of method '{method}': type {type_name} has no default constructor")]
    NoDefaultConstructor {
        method: String,
        parameter: String,
        type_name: &'static str,
    },

    #[error("Method '{method}' is declared more than once")]
    DuplicateMethod { method: String },

    /// Two handlers resolve to the same `v{version}/{name}` key.
    #[error("Handler key '{key}' is already registered")]
    DuplicateHandler { key: String },
}

/// Errors raised while invoking a bound method.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeError {
    #[error("Expected {expected} arguments, got {actual}")]
    ArgumentCount { expected: usize, actual: usize },

    #[error("Argument {position} is not a {expected}")]
    ArgumentType {
        position: usize,
        expected: &'static str,
    },

    #[error("Handler instance does not match the method owner")]
    OwnerMismatch,

    /// The method returned an error.
    #[error("Handler failed: {0}")]
    Handler(String),

    /// The method panicked.
    #[error("Handler panicked: {0}")]
    Panicked(String),
}

/// Result type for handler registration.
pub type RegistrationResult<T> = Result<T, RegistrationError>;
