//! Request view handed to matchers, binders and handler methods.
//!
//! # Responsibilities
//! - Hold everything resolution needs: verb, path, query data, body
//! - Decode query pairs once (`+` as space, `%xx` escapes) like any form-urlencoded transport
//! - Report the declared body length, falling back to the buffered length
//!
//! # Design Decisions
//! - Built once per request by the transport glue, then shared read-only
//! - Body is fully buffered before dispatch (bounded by config)

use std::collections::HashMap;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, Method, Uri};
use url::form_urlencoded;

use crate::handler::Verb;

/// Loose string key/value data from a query string or a form body.
///
/// Duplicate keys keep the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryData {
    values: HashMap<String, String>,
}

impl QueryData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw query string (without the leading `?`).
    ///
    /// Keys and values are form-urlencoded decoded. Pairs with an empty key
    /// are skipped; a later duplicate key replaces the earlier value.
    pub fn parse(query: &str) -> Self {
        form_urlencoded::parse(query.as_bytes())
            .filter(|(key, _)| !key.is_empty())
            .collect()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = Self::new();
        for (key, value) in iter {
            data.insert(key, value);
        }
        data
    }
}

/// An inbound request as seen by the dispatcher.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    path: String,
    query: QueryData,
    body: Bytes,
    content_length: u64,
    content_type: Option<String>,
    request_id: Option<String>,
}

impl HttpRequest {
    /// Create a bodiless request from a method and a path with optional query.
    pub fn new(method: Method, path_and_query: &str) -> Self {
        let (path, query) = match path_and_query.split_once('?') {
            Some((path, query)) => (path, QueryData::parse(query)),
            None => (path_and_query, QueryData::new()),
        };
        Self {
            method,
            path: path.to_string(),
            query,
            body: Bytes::new(),
            content_length: 0,
            content_type: None,
            request_id: None,
        }
    }

    /// Build the view from transport parts and an already buffered body.
    pub fn from_parts(method: Method, uri: &Uri, headers: &HeaderMap, body: Bytes) -> Self {
        let content_length = headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(body.len() as u64);
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let request_id = headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Self {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(QueryData::parse).unwrap_or_default(),
            body,
            content_length,
            content_type,
            request_id,
        }
    }

    /// Attach a body with its content type; the declared length is the body length.
    pub fn with_body(mut self, content_type: &str, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self.content_length = self.body.len() as u64;
        self.content_type = Some(content_type.to_string());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The routable verb, if the HTTP method is one of the four supported.
    pub fn verb(&self) -> Option<Verb> {
        Verb::from_method(&self.method)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &QueryData {
        &self.query
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Declared body length (`Content-Length`), or the buffered length.
    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }
}
