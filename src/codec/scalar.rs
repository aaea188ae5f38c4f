//! Single-value text conversions.
//!
//! Every type that can be bound from one query value or assigned to one object
//! property implements [`Scalar`]. Conversions are locale-independent and never
//! panic: a value that does not parse yields `None`, and callers substitute the
//! type's zero value (`Default`).

use std::fmt::Debug;

use serde::de::DeserializeOwned;

/// A primitive or string value convertible to and from a single text token.
pub trait Scalar: Default + Debug + DeserializeOwned + Send + Sync + 'static {
    /// Text values are percent-decoded before conversion.
    const IS_TEXT: bool = false;

    /// Parse one text token.
    fn parse_text(text: &str) -> Option<Self>;

    /// Render as one text token.
    fn to_text(&self) -> String;
}

macro_rules! scalar_from_str {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Scalar for $ty {
                fn parse_text(text: &str) -> Option<Self> {
                    text.trim().parse().ok()
                }

                fn to_text(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

scalar_from_str!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl Scalar for bool {
    fn parse_text(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("true") {
            Some(true)
        } else if text.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    fn to_text(&self) -> String {
        self.to_string()
    }
}

impl Scalar for char {
    fn parse_text(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }

    fn to_text(&self) -> String {
        self.to_string()
    }
}

impl Scalar for String {
    const IS_TEXT: bool = true;

    fn parse_text(text: &str) -> Option<Self> {
        Some(text.to_string())
    }

    fn to_text(&self) -> String {
        self.clone()
    }
}
