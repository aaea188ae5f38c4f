//! Parameter declarations and their registered form.

use crate::handler::attributes::BindingSource;
use crate::handler::value::{Bindable, TypeDescriptor};

/// A parameter as written in a handler method signature.
#[derive(Debug, Clone)]
pub struct ParameterDeclaration {
    name: String,
    descriptor: TypeDescriptor,
    attributes: Vec<String>,
}

impl ParameterDeclaration {
    /// Declare a parameter of type `T`.
    pub fn of<T: Bindable>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptor: T::descriptor(),
            attributes: Vec::new(),
        }
    }

    /// Attach an attribute (`from_url`, `from_body`, or anything else, which is ignored).
    pub fn attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Binding sources named by the attributes, in declaration order.
    pub fn binding_sources(&self) -> Vec<BindingSource> {
        self.attributes
            .iter()
            .filter_map(|a| BindingSource::from_attribute(a))
            .collect()
    }
}

/// A validated, immutable parameter of a registered method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallingParameter {
    name: String,
    descriptor: TypeDescriptor,
    source: BindingSource,
}

impl CallingParameter {
    pub fn new(name: impl Into<String>, descriptor: TypeDescriptor, source: BindingSource) -> Self {
        Self {
            name: name.into(),
            descriptor,
            source,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn source(&self) -> BindingSource {
        self.source
    }
}
