//! Object materialization from loose key/value data.
//!
//! # Responsibilities
//! - Default-construct composite objects
//! - Assign every settable property from a string map, or its zero value
//! - Memoize each type's property list and assignment thunks
//!
//! # Design Decisions
//! - Shapes are cached per `TypeId` in a sharded [`DashMap`]; no lock spans unrelated types
//! - A missing shape is compiled outside the map and then published with
//!   `entry().or_insert`, so concurrent first use may compile twice but exactly
//!   one shape is kept
//! - String values are percent-decoded before conversion

use std::any::{type_name, Any, TypeId};
use std::fmt::{self, Debug};
use std::sync::Arc;

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::codec::{Scalar, TextCodec};
use crate::handler::{BoxedValue, TypeDescriptor};
use crate::http::QueryData;

/// A composite type that can be bound from a query string, a form or a JSON body.
///
/// Implementors list their settable properties; each is assigned from the
/// key with the same name.
///
/// ```ignore
/// impl WebApiObject for Person {
///     fn properties(properties: &mut Properties<Self>) {
///         properties
///             .property("Name", |p: &mut Person, v| p.name = v)
///             .property("Age", |p: &mut Person, v| p.age = v);
///     }
/// }
/// ```
pub trait WebApiObject: Default + Debug + Serialize + DeserializeOwned + Send + 'static {
    fn properties(properties: &mut Properties<Self>);
}

/// Errors raised when constructing values by type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaterializeError {
    /// The type cannot be built without arguments (the request context).
    #[error("Type {0} has no default constructor")]
    NoDefaultConstructor(&'static str),

    /// The type has no settable properties to populate.
    #[error("Type {0} is not a composite object")]
    NotAnObject(&'static str),
}

type Assign<T> = Box<dyn Fn(&mut T, &TextCodec, Option<&str>) + Send + Sync>;

struct Property<T> {
    name: &'static str,
    assign: Assign<T>,
}

/// Settable properties of one object type, in declaration order.
pub struct Properties<T> {
    properties: Vec<Property<T>>,
}

impl<T: 'static> Properties<T> {
    fn new() -> Self {
        Self {
            properties: Vec::new(),
        }
    }

    /// Declare a property assigned through `set`.
    pub fn property<V, F>(&mut self, name: &'static str, set: F) -> &mut Self
    where
        V: Scalar,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let assign: Assign<T> = Box::new(move |target, codec, raw| {
            let value = match raw {
                Some(raw) => codec.decode_value::<V>(raw),
                None => V::default(),
            };
            set(target, value);
        });
        self.properties.push(Property { name, assign });
        self
    }
}

struct ObjectShape<T> {
    names: Arc<[&'static str]>,
    properties: Vec<Property<T>>,
}

impl<T: WebApiObject> ObjectShape<T> {
    fn compile() -> Self {
        let mut properties = Properties::new();
        T::properties(&mut properties);
        let names: Arc<[&'static str]> = properties.properties.iter().map(|p| p.name).collect();
        tracing::debug!(
            type_name = type_name::<T>(),
            properties = names.len(),
            "Compiled object shape"
        );
        Self {
            names,
            properties: properties.properties,
        }
    }
}

/// Builds objects from key/value data, caching per-type shapes.
pub struct ObjectMaterializer {
    shapes: DashMap<TypeId, Arc<dyn Any + Send + Sync>>,
    codec: TextCodec,
}

impl ObjectMaterializer {
    pub fn new(codec: TextCodec) -> Self {
        Self {
            shapes: DashMap::new(),
            codec,
        }
    }

    pub fn codec(&self) -> &TextCodec {
        &self.codec
    }

    /// Construct the zero value of a type.
    pub fn construct(&self, descriptor: &TypeDescriptor) -> Result<BoxedValue, MaterializeError> {
        descriptor
            .zero()
            .ok_or(MaterializeError::NoDefaultConstructor(descriptor.name()))
    }

    /// Construct an object and populate its properties from `data`.
    pub fn construct_from(
        &self,
        descriptor: &TypeDescriptor,
        data: &QueryData,
    ) -> Result<BoxedValue, MaterializeError> {
        if descriptor.is_context() {
            return Err(MaterializeError::NoDefaultConstructor(descriptor.name()));
        }
        descriptor
            .materialize(self, data)
            .ok_or(MaterializeError::NotAnObject(descriptor.name()))
    }

    /// Build a `T` from `data`. Missing keys leave the property at its zero value.
    pub fn materialize<T: WebApiObject>(&self, data: &QueryData) -> T {
        let shape = self.shape::<T>();
        let mut target = T::default();
        for property in &shape.properties {
            (property.assign)(&mut target, &self.codec, data.get(property.name));
        }
        target
    }

    /// Settable property names of `T`.
    pub fn property_names<T: WebApiObject>(&self) -> Arc<[&'static str]> {
        Arc::clone(&self.shape::<T>().names)
    }

    /// Number of object types with a cached shape.
    pub fn cached_types(&self) -> usize {
        self.shapes.len()
    }

    fn shape<T: WebApiObject>(&self) -> Arc<ObjectShape<T>> {
        let id = TypeId::of::<T>();
        let cached = self.shapes.get(&id).map(|entry| Arc::clone(entry.value()));
        if let Some(shape) = cached.and_then(|shape| shape.downcast::<ObjectShape<T>>().ok()) {
            return shape;
        }

        let compiled = Arc::new(ObjectShape::<T>::compile());
        let published = Arc::clone(
            self.shapes
                .entry(id)
                .or_insert_with(|| Arc::clone(&compiled) as Arc<dyn Any + Send + Sync>)
                .value(),
        );
        published.downcast::<ObjectShape<T>>().unwrap_or(compiled)
    }
}

impl Debug for ObjectMaterializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectMaterializer")
            .field("cached_types", &self.shapes.len())
            .finish()
    }
}

impl Default for ObjectMaterializer {
    fn default() -> Self {
        Self::new(TextCodec::new())
    }
}
