//! Argument binders: produce the ordered argument list for a matched method.
//!
//! # Data Flow
//! ```text
//! context ──────────────────────────────────────────────▶ args[0]
//! None      → query[name]  → decode_value (or zero)     ▶ args[i]
//! FromUrl   → materialize(query)                        ▶ args[i]
//! FromBody  → Json: deserialize(body)                   ▶ args[i]
//!             Form: parse_form(body) → materialize
//!             other: zero
//! ```
//!
//! Binding never fails: every miss or conversion failure substitutes the
//! zero value. A parameter without any value (only possible for the context
//! type) is left out, so the argument count no longer matches and the router
//! treats the request as unresolved.

use std::sync::Arc;

use crate::binding::form::parse_form;
use crate::binding::materializer::ObjectMaterializer;
use crate::codec::ContentType;
use crate::handler::{BindingSource, BoxedValue, CallingParameter};
use crate::http::{HttpRequest, WebApiHttpContext};

/// Produces the positional arguments of a method, context first.
pub trait ArgumentBinder: Send + Sync {
    fn bind(&self, context: &WebApiHttpContext, parameters: &[CallingParameter]) -> Vec<BoxedValue>;
}

/// Binder for Get requests: query data only.
#[derive(Debug, Clone)]
pub struct GetArgumentBinder {
    materializer: Arc<ObjectMaterializer>,
}

impl GetArgumentBinder {
    pub fn new(materializer: Arc<ObjectMaterializer>) -> Self {
        Self { materializer }
    }
}

impl ArgumentBinder for GetArgumentBinder {
    fn bind(&self, context: &WebApiHttpContext, parameters: &[CallingParameter]) -> Vec<BoxedValue> {
        let request = context.request();
        let mut args: Vec<BoxedValue> = Vec::with_capacity(parameters.len() + 1);
        args.push(Box::new(context.clone()));
        for parameter in parameters {
            let value = match parameter.source() {
                BindingSource::FromUrl => from_url(&self.materializer, request, parameter),
                BindingSource::None => from_query(&self.materializer, request, parameter),
                BindingSource::FromBody => None,
            };
            args.extend(value.or_else(|| parameter.descriptor().zero()));
        }
        args
    }
}

/// Binder for Post, Put and Delete requests: query data and the body.
#[derive(Debug, Clone)]
pub struct BodyArgumentBinder {
    materializer: Arc<ObjectMaterializer>,
}

impl BodyArgumentBinder {
    pub fn new(materializer: Arc<ObjectMaterializer>) -> Self {
        Self { materializer }
    }

    fn from_body(&self, request: &HttpRequest, parameter: &CallingParameter) -> Option<BoxedValue> {
        let descriptor = parameter.descriptor();
        let text = String::from_utf8_lossy(request.body());
        match ContentType::parse(request.content_type()) {
            ContentType::Json => descriptor.from_json(self.materializer.codec(), &text),
            ContentType::FormUrlEncoded => {
                let data = parse_form(&text);
                descriptor.materialize(&self.materializer, &data)
            }
            ContentType::NotSupported => {
                tracing::warn!(
                    parameter = parameter.name(),
                    content_type = ?request.content_type(),
                    "Unsupported body content type, using zero value"
                );
                None
            }
        }
    }
}

impl ArgumentBinder for BodyArgumentBinder {
    fn bind(&self, context: &WebApiHttpContext, parameters: &[CallingParameter]) -> Vec<BoxedValue> {
        let request = context.request();
        let mut args: Vec<BoxedValue> = Vec::with_capacity(parameters.len() + 1);
        args.push(Box::new(context.clone()));
        for parameter in parameters {
            let value = match parameter.source() {
                BindingSource::FromBody => self.from_body(request, parameter),
                BindingSource::FromUrl => from_url(&self.materializer, request, parameter),
                BindingSource::None => from_query(&self.materializer, request, parameter),
            };
            args.extend(value.or_else(|| parameter.descriptor().zero()));
        }
        args
    }
}

fn from_url(
    materializer: &ObjectMaterializer,
    request: &HttpRequest,
    parameter: &CallingParameter,
) -> Option<BoxedValue> {
    parameter.descriptor().materialize(materializer, request.query())
}

fn from_query(
    materializer: &ObjectMaterializer,
    request: &HttpRequest,
    parameter: &CallingParameter,
) -> Option<BoxedValue> {
    let raw = request.query().get(parameter.name())?;
    let descriptor = parameter.descriptor();
    if descriptor.is_object() {
        tracing::warn!(
            parameter = parameter.name(),
            type_name = descriptor.name(),
            "Object parameter without a binding attribute, using zero value"
        );
        return None;
    }
    descriptor.from_text(materializer.codec(), raw)
}
