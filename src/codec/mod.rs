//! Text codec subsystem.
//!
//! # Data Flow
//! ```text
//! Outgoing value   → serialize()          → JSON text (response body)
//! Request body     → deserialize::<T>()   → T, or T::default() on failure
//! Query/form value → decode_value::<T>()  → unescape (text only) → text_to_scalar
//! ```
//!
//! # Design Decisions
//! - The codec never fails: malformed input degrades to the zero value
//! - Every degradation is logged at warn level with the offending input
//! - Scalar conversions are locale-independent

pub mod content_type;
pub mod scalar;

use std::any::type_name;
use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use content_type::ContentType;
pub use scalar::Scalar;

/// Converts between structured text (JSON) and typed values.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl TextCodec {
    pub fn new() -> Self {
        Self
    }

    /// Serialize a value to JSON text. Returns an empty string on failure.
    pub fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> String {
        match serde_json::to_string(value) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    type_name = type_name::<T>(),
                    error = %e,
                    "Failed to serialize value"
                );
                String::new()
            }
        }
    }

    /// Deserialize JSON text. Blank or malformed text yields `T::default()`.
    pub fn deserialize<T: DeserializeOwned + Default>(&self, text: &str) -> T {
        if text.trim().is_empty() {
            return T::default();
        }
        match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    type_name = type_name::<T>(),
                    text = %text,
                    error = %e,
                    "Failed to deserialize text, using zero value"
                );
                T::default()
            }
        }
    }

    /// Convert one text token to a scalar, or its zero value.
    pub fn text_to_scalar<T: Scalar>(&self, text: &str) -> T {
        match T::parse_text(text) {
            Some(value) => value,
            None => {
                tracing::warn!(
                    type_name = type_name::<T>(),
                    text = %text,
                    "Failed to convert text to scalar, using zero value"
                );
                T::default()
            }
        }
    }

    pub fn scalar_to_text<T: Scalar>(&self, value: &T) -> String {
        value.to_text()
    }

    /// Convert a query or form value. Text values are unescaped once more, so
    /// text encoded twice in the URL (`a%252Fb`) binds as `a/b`.
    pub fn decode_value<T: Scalar>(&self, raw: &str) -> T {
        let text = if T::IS_TEXT {
            percent_decode_str(raw).decode_utf8_lossy()
        } else {
            Cow::Borrowed(raw)
        };
        self.text_to_scalar(&text)
    }
}
