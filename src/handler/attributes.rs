//! Declaration tags: verbs, parameter binding sources, handler mount points.
//!
//! Tags arrive as the attribute text written on a handler method or parameter
//! (`#[get]`, `#[from_url]`, ...). Unknown attributes such as doc comments are
//! not tags and are ignored.

use std::fmt;

use axum::http::Method;

/// HTTP verb a handler method answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Put,
    Post,
    Delete,
}

impl Verb {
    pub fn from_method(method: &Method) -> Option<Self> {
        [
            (Method::GET, Self::Get),
            (Method::PUT, Self::Put),
            (Method::POST, Self::Post),
            (Method::DELETE, Self::Delete),
        ]
        .into_iter()
        .find_map(|(candidate, verb)| (*method == candidate).then_some(verb))
    }

    /// Parse a method attribute (`get`, `Post`, ...).
    pub fn from_attribute(attribute: &str) -> Option<Self> {
        match normalize(attribute).as_str() {
            "get" => Some(Self::Get),
            "put" => Some(Self::Put),
            "post" => Some(Self::Post),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Post => "post",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter's value is extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BindingSource {
    /// A single query value named after the parameter.
    #[default]
    None,
    /// An object materialized from the query data.
    FromUrl,
    /// The request body.
    FromBody,
}

impl BindingSource {
    /// Parse a parameter attribute (`from_url`, `FromBody`, ...).
    pub fn from_attribute(attribute: &str) -> Option<Self> {
        match normalize(attribute).as_str() {
            "fromurl" => Some(Self::FromUrl),
            "frombody" => Some(Self::FromBody),
            _ => None,
        }
    }
}

fn normalize(attribute: &str) -> String {
    attribute
        .trim()
        .chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Mount point of a handler: its name and API version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    name: String,
    version: u32,
}

impl Mount {
    /// Mount under `name` at version 1.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: 1,
        }
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Registry key: `v{version}/{name lowercased}`.
    pub fn key(&self) -> String {
        format!("v{}/{}", self.version, self.name.to_lowercase())
    }
}
