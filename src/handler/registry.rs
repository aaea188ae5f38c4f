//! Per-handler registration.
//!
//! # Responsibilities
//! - Construct the single long-lived handler instance
//! - Validate every verb-tagged method declaration
//! - Build the name → [`CallingMethod`] table in declaration order
//!
//! # Design Decisions
//! - Any invalid declaration fails the whole registration
//! - Methods without a verb attribute are not web methods and are skipped
//! - Lookup tables are immutable once built; resolution takes no locks

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::sync::Arc;

use crate::handler::attributes::{BindingSource, Mount, Verb};
use crate::handler::error::{RegistrationError, RegistrationResult};
use crate::handler::method::{CallingMethod, MethodDeclaration, MethodDeclarations};
use crate::handler::parameter::CallingParameter;

/// A type whose methods are exposed as web methods.
///
/// Usually implemented through [`web_api_handler!`](crate::web_api_handler).
pub trait WebApiHandler: Default + Send + Sync + 'static {
    /// Where the handler is mounted.
    fn mount() -> Mount;

    /// Declare the handler's methods in source order.
    fn declare(methods: &mut MethodDeclarations<Self>);
}

/// One registered handler and its method table.
#[derive(Debug)]
pub struct HandlerRegistration {
    key: String,
    mount: Mount,
    methods: Vec<CallingMethod>,
    index: HashMap<String, usize>,
}

impl HandlerRegistration {
    /// Instantiate `H` and register its methods.
    pub fn build<H: WebApiHandler>() -> RegistrationResult<Self> {
        let mount = H::mount();
        let mut declarations = MethodDeclarations::new();
        H::declare(&mut declarations);
        Self::from_declarations(mount, H::default(), &declarations)
    }

    /// Register `handler` under `mount` from explicit declarations.
    pub fn from_declarations<H: Send + Sync + 'static>(
        mount: Mount,
        handler: H,
        declarations: &MethodDeclarations<H>,
    ) -> RegistrationResult<Self> {
        let key = mount.key();
        let owner: Arc<dyn Any + Send + Sync> = Arc::new(handler);
        let mut methods: Vec<CallingMethod> = Vec::new();
        let mut index = HashMap::new();

        for declaration in declarations.iter() {
            let Some((verb, parameters)) = validate(declaration)? else {
                tracing::debug!(
                    handler = %key,
                    method = declaration.name(),
                    "Skipping method without verb attribute"
                );
                continue;
            };
            if index.contains_key(declaration.name()) {
                return Err(RegistrationError::DuplicateMethod {
                    method: declaration.name().to_string(),
                });
            }

            let order = methods.len();
            let method = CallingMethod::new(
                declaration.name().to_string(),
                verb,
                parameters,
                order,
                Arc::clone(&owner),
                declaration.thunk(),
            );
            tracing::info!(
                handler = %key,
                method = method.name(),
                verb = %verb,
                parameters = method.parameters().len(),
                "Registered web method"
            );
            index.insert(method.name().to_string(), order);
            methods.push(method);
        }

        tracing::info!(
            handler = %key,
            handler_type = type_name::<H>(),
            methods = methods.len(),
            "Registered handler"
        );

        Ok(Self {
            key,
            mount,
            methods,
            index,
        })
    }

    /// `v{version}/{name}` key the handler is reachable under.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn mount(&self) -> &Mount {
        &self.mount
    }

    /// Direct lookup by action name (case-sensitive).
    pub fn method(&self, name: &str) -> Option<&CallingMethod> {
        self.index.get(name).map(|&i| &self.methods[i])
    }

    /// Registered methods in declaration order.
    pub fn methods(&self) -> &[CallingMethod] {
        &self.methods
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

/// Check one declaration. `None` means it is not a web method.
fn validate<H: 'static>(
    declaration: &MethodDeclaration<H>,
) -> RegistrationResult<Option<(Verb, Vec<CallingParameter>)>> {
    let method = declaration.name().to_string();

    let verb = match declaration.verbs().as_slice() {
        [] => return Ok(None),
        [verb] => *verb,
        _ => return Err(RegistrationError::MultipleVerbs { method }),
    };

    if !declaration.is_public() {
        return Err(RegistrationError::NotPublic { method });
    }

    let Some((first, rest)) = declaration.parameters().split_first() else {
        return Err(RegistrationError::MissingContext { method });
    };
    if !first.descriptor().is_context() {
        return Err(RegistrationError::MissingContext { method });
    }

    let mut parameters = Vec::with_capacity(rest.len());
    for parameter in rest {
        if parameter.descriptor().is_context() {
            return Err(RegistrationError::MisplacedContext {
                method,
                parameter: parameter.name().to_string(),
            });
        }
        let source = match parameter.binding_sources().as_slice() {
            [] => BindingSource::None,
            [source] => *source,
            _ => {
                return Err(RegistrationError::ConflictingBinding {
                    method,
                    parameter: parameter.name().to_string(),
                })
            }
        };
        if source == BindingSource::FromUrl && !parameter.descriptor().is_object() {
            return Err(RegistrationError::NoDefaultConstructor {
                method,
                parameter: parameter.name().to_string(),
                type_name: parameter.descriptor().name(),
            });
        }
        parameters.push(CallingParameter::new(
            parameter.name(),
            *parameter.descriptor(),
            source,
        ));
    }

    let count = |source: BindingSource| parameters.iter().filter(|p| p.source() == source).count();
    let from_url = count(BindingSource::FromUrl);
    let from_body = count(BindingSource::FromBody);
    let plain = count(BindingSource::None);

    if from_url > 1 {
        return Err(RegistrationError::MultipleFromUrl { method });
    }
    if from_body > 1 {
        return Err(RegistrationError::MultipleFromBody { method });
    }
    if from_url == 1 && plain > 0 {
        return Err(RegistrationError::FromUrlWithQueryParameters { method });
    }
    if verb == Verb::Get && from_body > 0 {
        return Err(RegistrationError::GetWithBody { method });
    }

    Ok(Some((verb, parameters)))
}
