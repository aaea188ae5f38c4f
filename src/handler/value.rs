//! Semantic type descriptors for bindable parameter types.
//!
//! A [`TypeDescriptor`] is the runtime stand-in for a parameter's declared type:
//! it knows the type's name, whether it is the request context, a scalar or a
//! composite object, and carries monomorphized function pointers to produce its
//! zero value and to decode it from text, JSON or key/value data. Arguments
//! travel between binder and thunk as [`BoxedValue`]s and are downcast back to
//! the declared type inside the thunk.

use std::any::{type_name, Any, TypeId};
use std::fmt::{self, Debug};
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::binding::materializer::{ObjectMaterializer, WebApiObject};
use crate::codec::{Scalar, TextCodec};
use crate::http::{QueryData, WebApiHttpContext};

/// A type-erased argument value.
pub type BoxedValue = Box<dyn Any + Send>;

/// A type that can appear as a handler method parameter.
pub trait Bindable: Send + 'static {
    fn descriptor() -> TypeDescriptor;
}

impl<T: WebApiObject> Bindable for T {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::object::<T>()
    }
}

impl Bindable for WebApiHttpContext {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::context()
    }
}

crate::bindable_scalar!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, String,
);

/// Coarse classification of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Context,
    Scalar,
    Object,
}

/// Operations of a scalar type.
#[derive(Clone, Copy)]
struct ScalarOps {
    zero: fn() -> BoxedValue,
    from_text: fn(&TextCodec, &str) -> BoxedValue,
    from_json: fn(&TextCodec, &str) -> BoxedValue,
}

/// Operations of a composite object type.
#[derive(Clone, Copy)]
struct ObjectOps {
    zero: fn() -> BoxedValue,
    from_json: fn(&TextCodec, &str) -> BoxedValue,
    materialize: fn(&ObjectMaterializer, &QueryData) -> BoxedValue,
    property_names: fn(&ObjectMaterializer) -> Arc<[&'static str]>,
}

#[derive(Clone, Copy)]
enum TypeShape {
    Context,
    Scalar(ScalarOps),
    Object(ObjectOps),
}

/// Runtime description of one bindable type.
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    name: &'static str,
    id: TypeId,
    shape: TypeShape,
    describe: fn(&(dyn Any + Send)) -> String,
}

impl TypeDescriptor {
    pub fn context() -> Self {
        Self {
            name: type_name::<WebApiHttpContext>(),
            id: TypeId::of::<WebApiHttpContext>(),
            shape: TypeShape::Context,
            describe: describe_value::<WebApiHttpContext>,
        }
    }

    pub fn scalar<T: Scalar>() -> Self {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
            shape: TypeShape::Scalar(ScalarOps {
                zero: zero_value::<T>,
                from_text: scalar_from_text::<T>,
                from_json: from_json::<T>,
            }),
            describe: describe_value::<T>,
        }
    }

    pub fn object<T: WebApiObject>() -> Self {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
            shape: TypeShape::Object(ObjectOps {
                zero: zero_value::<T>,
                from_json: from_json::<T>,
                materialize: materialize_object::<T>,
                property_names: object_property_names::<T>,
            }),
            describe: describe_value::<T>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn kind(&self) -> TypeKind {
        match self.shape {
            TypeShape::Context => TypeKind::Context,
            TypeShape::Scalar(_) => TypeKind::Scalar,
            TypeShape::Object(_) => TypeKind::Object,
        }
    }

    pub fn is_context(&self) -> bool {
        self.kind() == TypeKind::Context
    }

    pub fn is_object(&self) -> bool {
        self.kind() == TypeKind::Object
    }

    /// The zero value; the context has none.
    pub fn zero(&self) -> Option<BoxedValue> {
        match self.shape {
            TypeShape::Context => None,
            TypeShape::Scalar(ops) => Some((ops.zero)()),
            TypeShape::Object(ops) => Some((ops.zero)()),
        }
    }

    /// Decode one raw query value. Only scalars convert from a single token.
    pub fn from_text(&self, codec: &TextCodec, raw: &str) -> Option<BoxedValue> {
        match self.shape {
            TypeShape::Scalar(ops) => Some((ops.from_text)(codec, raw)),
            TypeShape::Context | TypeShape::Object(_) => None,
        }
    }

    /// Decode a JSON document.
    pub fn from_json(&self, codec: &TextCodec, text: &str) -> Option<BoxedValue> {
        match self.shape {
            TypeShape::Scalar(ops) => Some((ops.from_json)(codec, text)),
            TypeShape::Object(ops) => Some((ops.from_json)(codec, text)),
            TypeShape::Context => None,
        }
    }

    /// Materialize an object from key/value data.
    pub fn materialize(
        &self,
        materializer: &ObjectMaterializer,
        data: &QueryData,
    ) -> Option<BoxedValue> {
        match self.shape {
            TypeShape::Object(ops) => Some((ops.materialize)(materializer, data)),
            TypeShape::Context | TypeShape::Scalar(_) => None,
        }
    }

    /// Settable property names of an object type (memoized by the materializer).
    pub fn property_names(&self, materializer: &ObjectMaterializer) -> Option<Arc<[&'static str]>> {
        match self.shape {
            TypeShape::Object(ops) => Some((ops.property_names)(materializer)),
            TypeShape::Context | TypeShape::Scalar(_) => None,
        }
    }

    /// Render a value of this type for logs.
    pub fn describe(&self, value: &(dyn Any + Send)) -> String {
        (self.describe)(value)
    }
}

impl Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .finish()
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

fn zero_value<T: Default + Send + 'static>() -> BoxedValue {
    Box::new(T::default())
}

fn scalar_from_text<T: Scalar>(codec: &TextCodec, raw: &str) -> BoxedValue {
    Box::new(codec.decode_value::<T>(raw))
}

fn from_json<T: DeserializeOwned + Default + Send + 'static>(
    codec: &TextCodec,
    text: &str,
) -> BoxedValue {
    Box::new(codec.deserialize::<T>(text))
}

fn materialize_object<T: WebApiObject>(
    materializer: &ObjectMaterializer,
    data: &QueryData,
) -> BoxedValue {
    Box::new(materializer.materialize::<T>(data))
}

fn object_property_names<T: WebApiObject>(materializer: &ObjectMaterializer) -> Arc<[&'static str]> {
    materializer.property_names::<T>()
}

fn describe_value<T: Debug + 'static>(value: &(dyn Any + Send)) -> String {
    match value.downcast_ref::<T>() {
        Some(value) => format!("{value:?}"),
        None => format!("<not a {}>", type_name::<T>()),
    }
}
