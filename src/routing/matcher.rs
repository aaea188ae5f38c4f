//! Structural eligibility of a method for a request.
//!
//! # Responsibilities
//! - Check the request verb against the method verb
//! - Check that the query data has every key the parameters bind from
//! - Check that a body is present for `from_body` parameters
//!
//! # Design Decisions
//! - Presence checks only; conversion failures are left to the binder
//! - Body content and shape are never inspected
//! - All parameter conditions combine with AND semantics

use std::fmt::Debug;
use std::sync::Arc;

use crate::binding::ObjectMaterializer;
use crate::handler::{BindingSource, CallingMethod, CallingParameter, Verb};
use crate::http::HttpRequest;

/// Decides whether a method can serve a request.
pub trait MethodMatcher: Send + Sync + Debug {
    fn is_match(&self, request: &HttpRequest, method: &CallingMethod) -> bool;
}

/// Matcher for Get methods.
#[derive(Debug, Clone)]
pub struct GetMethodMatcher {
    materializer: Arc<ObjectMaterializer>,
}

impl GetMethodMatcher {
    pub fn new(materializer: Arc<ObjectMaterializer>) -> Self {
        Self { materializer }
    }
}

impl MethodMatcher for GetMethodMatcher {
    fn is_match(&self, request: &HttpRequest, method: &CallingMethod) -> bool {
        method.verb() == Verb::Get
            && method.parameters().iter().all(|parameter| match parameter.source() {
                BindingSource::FromBody => false,
                BindingSource::FromUrl => has_object_keys(&self.materializer, request, parameter),
                BindingSource::None => request.query().contains_key(parameter.name()),
            })
    }
}

/// Matcher for Post, Put and Delete methods.
#[derive(Debug, Clone)]
pub struct BodyMethodMatcher {
    verb: Verb,
    materializer: Arc<ObjectMaterializer>,
}

impl BodyMethodMatcher {
    pub fn new(verb: Verb, materializer: Arc<ObjectMaterializer>) -> Self {
        Self { verb, materializer }
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }
}

impl MethodMatcher for BodyMethodMatcher {
    fn is_match(&self, request: &HttpRequest, method: &CallingMethod) -> bool {
        method.verb() == self.verb
            && method.parameters().iter().all(|parameter| match parameter.source() {
                BindingSource::FromBody => request.content_length() > 0,
                BindingSource::FromUrl => has_object_keys(&self.materializer, request, parameter),
                BindingSource::None => request.query().contains_key(parameter.name()),
            })
    }
}

fn has_object_keys(
    materializer: &ObjectMaterializer,
    request: &HttpRequest,
    parameter: &CallingParameter,
) -> bool {
    parameter
        .descriptor()
        .property_names(materializer)
        .is_some_and(|names| names.iter().all(|name| request.query().contains_key(name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{Properties, WebApiObject};
    use crate::handler::{
        Arguments, HandlerRegistration, MethodDeclaration, MethodDeclarations, Mount,
        ParameterDeclaration,
    };
    use crate::http::WebApiHttpContext;
    use axum::http::Method;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Person {
        #[serde(rename = "Name")]
        name: String,
        #[serde(rename = "Age")]
        age: i32,
    }

    impl WebApiObject for Person {
        fn properties(properties: &mut Properties<Self>) {
            properties
                .property("Name", |p: &mut Person, v| p.name = v)
                .property("Age", |p: &mut Person, v| p.age = v);
        }
    }

    #[derive(Default)]
    struct Sample;

    fn registration() -> HandlerRegistration {
        let declare = |name: &str, verb: &str| {
            MethodDeclaration::new(name, |_: &Sample, _: Arguments| Ok(()))
                .attribute(verb)
                .parameter(ParameterDeclaration::of::<WebApiHttpContext>("ctx"))
        };
        let mut declarations = MethodDeclarations::new();
        declarations
            .add(declare("Plain", "get").parameter(ParameterDeclaration::of::<String>("name")))
            .add(
                declare("Object", "get")
                    .parameter(ParameterDeclaration::of::<Person>("person").attribute("from_url")),
            )
            .add(
                declare("Body", "post")
                    .parameter(ParameterDeclaration::of::<Person>("person").attribute("from_body")),
            );
        HandlerRegistration::from_declarations(Mount::new("Sample"), Sample, &declarations).unwrap()
    }

    #[test]
    fn test_get_matcher_checks_query_keys() {
        let registration = registration();
        let matcher = GetMethodMatcher::new(Arc::default());
        let plain = registration.method("Plain").unwrap();
        assert!(matcher.is_match(&HttpRequest::new(Method::GET, "/?name=x"), plain));
        assert!(!matcher.is_match(&HttpRequest::new(Method::GET, "/?Name=x"), plain));
    }

    #[test]
    fn test_get_matcher_requires_every_property() {
        let registration = registration();
        let matcher = GetMethodMatcher::new(Arc::default());
        let object = registration.method("Object").unwrap();
        assert!(matcher.is_match(&HttpRequest::new(Method::GET, "/?Name=x&Age=1"), object));
        assert!(!matcher.is_match(&HttpRequest::new(Method::GET, "/?Name=x"), object));
    }

    #[test]
    fn test_body_matcher_requires_body_and_verb() {
        let registration = registration();
        let body = registration.method("Body").unwrap();
        let post = BodyMethodMatcher::new(Verb::Post, Arc::default());
        let put = BodyMethodMatcher::new(Verb::Put, Arc::default());
        let with_body = HttpRequest::new(Method::POST, "/").with_body("application/json", "{}");
        assert!(post.is_match(&with_body, body));
        assert!(!put.is_match(&with_body, body));
        assert!(!post.is_match(&HttpRequest::new(Method::POST, "/"), body));
    }

    #[test]
    fn test_verb_is_checked_first() {
        let registration = registration();
        let matcher = GetMethodMatcher::new(Arc::default());
        let body = registration.method("Body").unwrap();
        assert!(!matcher.is_match(&HttpRequest::new(Method::GET, "/"), body));
    }
}
