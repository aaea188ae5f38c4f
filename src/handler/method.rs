//! Method declarations and the invocable [`CallingMethod`].
//!
//! # Data Flow
//! ```text
//! MethodDeclaration<H> (typed thunk over &H)
//!     → registry validation
//!     → CallingMethod (thunk erased over the owner via Any)
//!     → call(args) → downcast owner → thunk → take::<T>() per argument
//! ```
//!
//! # Design Decisions
//! - The thunk is built once per method; calls perform downcasts only
//! - Panics are caught at `call` so a failing handler cannot take down its task
//! - The argument count is checked before the thunk runs

use std::any::{type_name, Any};
use std::fmt::{self, Display};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::handler::attributes::Verb;
use crate::handler::error::InvokeError;
use crate::handler::parameter::{CallingParameter, ParameterDeclaration};
use crate::handler::value::BoxedValue;

/// Typed invocation thunk over a handler instance.
pub type Thunk<H> = Arc<dyn Fn(&H, Arguments) -> Result<(), InvokeError> + Send + Sync>;

type Invoker = Arc<dyn Fn(&(dyn Any + Send + Sync), Arguments) -> Result<(), InvokeError> + Send + Sync>;

/// Positional arguments handed to a thunk, consumed front to back.
pub struct Arguments {
    values: std::vec::IntoIter<BoxedValue>,
    position: usize,
}

impl Arguments {
    pub fn new(values: Vec<BoxedValue>) -> Self {
        Self {
            values: values.into_iter(),
            position: 0,
        }
    }

    /// Take the next argument as a `T`.
    pub fn take<T: 'static>(&mut self) -> Result<T, InvokeError> {
        let position = self.position;
        self.position += 1;
        let value = self.values.next().ok_or(InvokeError::ArgumentCount {
            expected: position + 1,
            actual: position,
        })?;
        value
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| InvokeError::ArgumentType {
                position,
                expected: type_name::<T>(),
            })
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

/// Return types a handler method may have.
pub trait HandlerOutcome {
    fn into_outcome(self) -> Result<(), InvokeError>;
}

impl HandlerOutcome for () {
    fn into_outcome(self) -> Result<(), InvokeError> {
        Ok(())
    }
}

impl<E: Display> HandlerOutcome for Result<(), E> {
    fn into_outcome(self) -> Result<(), InvokeError> {
        self.map_err(|e| InvokeError::Handler(e.to_string()))
    }
}

/// One method of a handler as declared, before validation.
pub struct MethodDeclaration<H> {
    name: String,
    public: bool,
    attributes: Vec<String>,
    parameters: Vec<ParameterDeclaration>,
    thunk: Thunk<H>,
}

impl<H: 'static> MethodDeclaration<H> {
    /// Declare a public method invoked through `thunk`.
    pub fn new<F>(name: impl Into<String>, thunk: F) -> Self
    where
        F: Fn(&H, Arguments) -> Result<(), InvokeError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            public: true,
            attributes: Vec::new(),
            parameters: Vec::new(),
            thunk: Arc::new(thunk),
        }
    }

    pub fn public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    /// Attach a method attribute (`get`, `post`, ...). Unknown attributes are ignored.
    pub fn attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    pub fn parameter(mut self, parameter: ParameterDeclaration) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_public(&self) -> bool {
        self.public
    }

    pub fn parameters(&self) -> &[ParameterDeclaration] {
        &self.parameters
    }

    /// Verbs named by the attributes.
    pub fn verbs(&self) -> Vec<Verb> {
        self.attributes
            .iter()
            .filter_map(|a| Verb::from_attribute(a))
            .collect()
    }

    pub(crate) fn thunk(&self) -> Thunk<H> {
        Arc::clone(&self.thunk)
    }
}

impl<H> fmt::Debug for MethodDeclaration<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDeclaration")
            .field("name", &self.name)
            .field("public", &self.public)
            .field("attributes", &self.attributes)
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// Methods of one handler type, in declaration order.
pub struct MethodDeclarations<H> {
    methods: Vec<MethodDeclaration<H>>,
}

impl<H: 'static> MethodDeclarations<H> {
    pub fn new() -> Self {
        Self {
            methods: Vec::new(),
        }
    }

    pub fn add(&mut self, method: MethodDeclaration<H>) -> &mut Self {
        self.methods.push(method);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &MethodDeclaration<H>> {
        self.methods.iter()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl<H: 'static> Default for MethodDeclarations<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// A registered, invocable handler method.
#[derive(Clone)]
pub struct CallingMethod {
    name: String,
    verb: Verb,
    parameters: Vec<CallingParameter>,
    order: usize,
    owner: Arc<dyn Any + Send + Sync>,
    invoker: Invoker,
}

impl CallingMethod {
    pub(crate) fn new<H: Send + Sync + 'static>(
        name: String,
        verb: Verb,
        parameters: Vec<CallingParameter>,
        order: usize,
        owner: Arc<dyn Any + Send + Sync>,
        thunk: Thunk<H>,
    ) -> Self {
        let invoker: Invoker = Arc::new(move |owner: &(dyn Any + Send + Sync), args: Arguments| {
            let handler = owner
                .downcast_ref::<H>()
                .ok_or(InvokeError::OwnerMismatch)?;
            thunk(handler, args)
        });
        Self {
            name,
            verb,
            parameters,
            order,
            owner,
            invoker,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Parameters after the request context.
    pub fn parameters(&self) -> &[CallingParameter] {
        &self.parameters
    }

    /// Position among the handler's registered methods.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of arguments `call` expects: the context plus every parameter.
    pub fn argument_count(&self) -> usize {
        self.parameters.len() + 1
    }

    /// Render bound arguments as `name = value` for logs. The context is skipped.
    pub fn describe_arguments(&self, args: &[BoxedValue]) -> Vec<String> {
        self.parameters
            .iter()
            .zip(args.iter().skip(1))
            .map(|(parameter, value)| {
                format!(
                    "{} = {}",
                    parameter.name(),
                    parameter.descriptor().describe(value.as_ref())
                )
            })
            .collect()
    }

    /// Invoke the method with `args` (context first).
    pub fn call(&self, args: Vec<BoxedValue>) -> Result<(), InvokeError> {
        if args.len() != self.argument_count() {
            return Err(InvokeError::ArgumentCount {
                expected: self.argument_count(),
                actual: args.len(),
            });
        }
        let owner = self.owner.as_ref();
        match catch_unwind(AssertUnwindSafe(|| (self.invoker)(owner, Arguments::new(args)))) {
            Ok(result) => result,
            Err(payload) => Err(InvokeError::Panicked(panic_message(payload.as_ref()))),
        }
    }
}

impl fmt::Debug for CallingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallingMethod")
            .field("name", &self.name)
            .field("verb", &self.verb)
            .field("parameters", &self.parameters)
            .field("order", &self.order)
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::attributes::BindingSource;
    use crate::handler::value::Bindable;
    use std::sync::atomic::{AtomicI32, Ordering};

    #[derive(Default)]
    struct Counter {
        total: AtomicI32,
    }

    fn add_method(order: usize, owner: Arc<dyn Any + Send + Sync>) -> CallingMethod {
        let thunk: Thunk<Counter> = Arc::new(
            |counter: &Counter, mut args: Arguments| -> Result<(), InvokeError> {
                let _context = args.take::<String>()?;
                let amount = args.take::<i32>()?;
                if amount < 0 {
                    return Err(InvokeError::Handler("negative amount".into()));
                }
                if amount == 13 {
                    panic!("unlucky");
                }
                counter.total.fetch_add(amount, Ordering::SeqCst);
                Ok(())
            },
        );
        CallingMethod::new(
            "Add".to_string(),
            Verb::Get,
            vec![CallingParameter::new(
                "amount",
                <i32 as Bindable>::descriptor(),
                BindingSource::None,
            )],
            order,
            owner,
            thunk,
        )
    }

    fn args(amount: i32) -> Vec<BoxedValue> {
        vec![Box::new(String::from("ctx")), Box::new(amount)]
    }

    #[test]
    fn test_call_invokes_owner() {
        let counter = Arc::new(Counter::default());
        let method = add_method(0, counter.clone());
        method.call(args(5)).unwrap();
        method.call(args(2)).unwrap();
        assert_eq!(counter.total.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_argument_count_is_checked() {
        let method = add_method(0, Arc::new(Counter::default()));
        let err = method.call(vec![Box::new(String::new())]).unwrap_err();
        assert_eq!(err, InvokeError::ArgumentCount { expected: 2, actual: 1 });
    }

    #[test]
    fn test_wrong_argument_type_is_reported() {
        let method = add_method(0, Arc::new(Counter::default()));
        let err = method
            .call(vec![Box::new(String::new()), Box::new("5")])
            .unwrap_err();
        assert!(matches!(err, InvokeError::ArgumentType { position: 1, .. }));
    }

    #[test]
    fn test_handler_error_and_panic_are_caught() {
        let method = add_method(0, Arc::new(Counter::default()));
        assert_eq!(
            method.call(args(-1)).unwrap_err(),
            InvokeError::Handler("negative amount".into())
        );
        assert_eq!(
            method.call(args(13)).unwrap_err(),
            InvokeError::Panicked("unlucky".into())
        );
    }

    #[test]
    fn test_owner_mismatch() {
        let method = add_method(0, Arc::new(String::from("not a counter")));
        assert_eq!(method.call(args(1)).unwrap_err(), InvokeError::OwnerMismatch);
    }

    #[test]
    fn test_describe_arguments_skips_context() {
        let method = add_method(0, Arc::new(Counter::default()));
        assert_eq!(method.describe_arguments(&args(10)), vec!["amount = 10"]);
    }

    #[test]
    fn test_result_outcome() {
        assert_eq!(().into_outcome(), Ok(()));
        let failed: Result<(), &str> = Err("boom");
        assert_eq!(failed.into_outcome(), Err(InvokeError::Handler("boom".into())));
    }
}
