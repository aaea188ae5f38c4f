//! Handler lookup, method resolution and dispatch.
//!
//! # Responsibilities
//! - Own the handler registrations, one matcher per verb and one binder per verb family
//! - Resolve a request to exactly one method, or none
//! - Bind, invoke and finish the response
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - An explicit action name is looked up directly; a rejected action never falls back to a scan
//! - Without an action, methods are scanned in declaration order and the first match wins
//! - Handler failures are answered with 500; anything unresolved with 404

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::http::StatusCode;
use uuid::Uuid;

use crate::binding::{ArgumentBinder, BodyArgumentBinder, GetArgumentBinder, ObjectMaterializer};
use crate::codec::TextCodec;
use crate::handler::{
    CallingMethod, HandlerRegistration, Mount, RegistrationError, RegistrationResult, Verb,
    WebApiHandler,
};
use crate::http::{HttpRequest, ResponseMessage, WebApiHttpContext};
use crate::observability::Logger;
use crate::routing::matcher::{BodyMethodMatcher, GetMethodMatcher, MethodMatcher};
use crate::routing::url::parse_url;

type Registrar = Box<dyn FnOnce() -> RegistrationResult<HandlerRegistration>>;

/// Builder for [`WebApiRouter`].
pub struct WebApiRouterBuilder {
    application_name: Option<String>,
    logger: Logger,
    codec: TextCodec,
    handlers: Vec<(Mount, Registrar)>,
}

impl WebApiRouterBuilder {
    fn new() -> Self {
        Self {
            application_name: None,
            logger: Logger::global(),
            codec: TextCodec::new(),
            handlers: Vec::new(),
        }
    }

    /// First path segment every request must carry. Empty means none.
    pub fn application_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into().to_lowercase();
        self.application_name = (!name.is_empty()).then_some(name);
        self
    }

    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Register handler type `H`, instantiated once when the router is built.
    pub fn handler<H: WebApiHandler>(mut self) -> Self {
        let register: Registrar = Box::new(HandlerRegistration::build::<H>);
        self.handlers.push((H::mount(), register));
        self
    }

    /// Register an already built handler.
    pub fn registration(mut self, registration: HandlerRegistration) -> Self {
        let mount = registration.mount().clone();
        let register: Registrar = Box::new(move || Ok(registration));
        self.handlers.push((mount, register));
        self
    }

    /// Register every handler. The first invalid declaration fails the build.
    pub fn build(self) -> RegistrationResult<WebApiRouter> {
        let Self {
            application_name,
            logger,
            codec,
            handlers,
        } = self;

        logger.clone().in_scope(move || {
            let mut registrations = HashMap::new();
            for (mount, register) in handlers {
                if mount.name().trim().is_empty() {
                    tracing::warn!(version = mount.version(), "Skipping handler with empty name");
                    continue;
                }
                let key = mount.key();
                if registrations.contains_key(&key) {
                    return Err(RegistrationError::DuplicateHandler { key });
                }
                registrations.insert(key, register()?);
            }

            let materializer = Arc::new(ObjectMaterializer::new(codec));
            let mut matchers: HashMap<Verb, Box<dyn MethodMatcher>> = HashMap::new();
            matchers.insert(Verb::Get, Box::new(GetMethodMatcher::new(Arc::clone(&materializer))));
            let body_binder: Arc<dyn ArgumentBinder> =
                Arc::new(BodyArgumentBinder::new(Arc::clone(&materializer)));
            let mut binders: HashMap<Verb, Arc<dyn ArgumentBinder>> = HashMap::new();
            binders.insert(Verb::Get, Arc::new(GetArgumentBinder::new(Arc::clone(&materializer))));
            for verb in [Verb::Post, Verb::Put, Verb::Delete] {
                matchers.insert(
                    verb,
                    Box::new(BodyMethodMatcher::new(verb, Arc::clone(&materializer))),
                );
                binders.insert(verb, Arc::clone(&body_binder));
            }

            tracing::info!(
                application_name = application_name.as_deref().unwrap_or(""),
                handlers = registrations.len(),
                "WebApi router created"
            );

            Ok(WebApiRouter {
                application_name,
                handlers: registrations,
                matchers,
                binders,
                codec,
                logger,
            })
        })
    }
}

/// Resolves requests to handler methods and invokes them.
pub struct WebApiRouter {
    application_name: Option<String>,
    handlers: HashMap<String, HandlerRegistration>,
    matchers: HashMap<Verb, Box<dyn MethodMatcher>>,
    binders: HashMap<Verb, Arc<dyn ArgumentBinder>>,
    codec: TextCodec,
    logger: Logger,
}

impl WebApiRouter {
    pub fn builder() -> WebApiRouterBuilder {
        WebApiRouterBuilder::new()
    }

    pub fn application_name(&self) -> Option<&str> {
        self.application_name.as_deref()
    }

    /// Registration under `key` (`v{version}/{name}`).
    pub fn registration(&self, key: &str) -> Option<&HandlerRegistration> {
        self.handlers.get(key)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Find the method that serves `request`, if any.
    pub fn resolve(&self, request: &HttpRequest) -> Option<&CallingMethod> {
        let verb = request.verb()?;
        let info = parse_url(self.application_name(), request.path())?;
        let registration = self.handlers.get(&info.handler_key())?;
        let matcher = self.matchers.get(&verb)?;

        if info.has_action() {
            registration
                .method(&info.action_name)
                .filter(|method| matcher.is_match(request, method))
        } else {
            registration
                .methods()
                .iter()
                .find(|method| matcher.is_match(request, method))
        }
    }

    /// Serve one request end to end. Never fails.
    ///
    /// Requests arriving without an `x-request-id` get a fresh UUID so log
    /// lines of one dispatch can be correlated.
    pub fn dispatch(&self, request: HttpRequest) -> ResponseMessage {
        let request = if request.request_id().is_some() {
            request
        } else {
            request.with_request_id(Uuid::new_v4().to_string())
        };
        self.logger.in_scope(|| {
            let span = tracing::debug_span!(
                "dispatch",
                request_id = request.request_id().unwrap_or_default()
            );
            let _guard = span.enter();
            self.dispatch_inner(Arc::new(request))
        })
    }

    fn dispatch_inner(&self, request: Arc<HttpRequest>) -> ResponseMessage {
        tracing::debug!(
            method = %request.method(),
            path = request.path(),
            "Handle request"
        );

        let Some(method) = self.resolve(&request) else {
            return not_found(&request);
        };
        let Some(binder) = self.binders.get(&method.verb()) else {
            return not_found(&request);
        };

        let context = WebApiHttpContext::for_request(Arc::clone(&request), self.codec);
        let args = binder.bind(&context, method.parameters());
        if args.len() != method.argument_count() {
            tracing::warn!(
                method = method.name(),
                expected = method.argument_count(),
                actual = args.len(),
                "Argument binding failed"
            );
            return not_found(&request);
        }

        let arguments = method.describe_arguments(&args);
        match method.call(args) {
            Ok(()) => context.response().finish(),
            Err(e) => {
                tracing::error!(
                    method = method.name(),
                    arguments = ?arguments,
                    error = %e,
                    "Handler invocation failed"
                );
                ResponseMessage::empty(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

fn not_found(request: &HttpRequest) -> ResponseMessage {
    tracing::info!(
        method = %request.method(),
        path = request.path(),
        "Handler for request not found"
    );
    ResponseMessage::empty(StatusCode::NOT_FOUND)
}

impl fmt::Debug for WebApiRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.handlers.keys().collect();
        keys.sort();
        f.debug_struct("WebApiRouter")
            .field("application_name", &self.application_name)
            .field("handlers", &keys)
            .finish()
    }
}
