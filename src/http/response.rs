//! Response sink handed to handler methods.
//!
//! # Responsibilities
//! - Let a handler set the status code and write one body
//! - Serialize written values as JSON (`application/json`)
//! - Produce exactly one finished [`ResponseMessage`] per request
//!
//! # Design Decisions
//! - The first write closes the sink; later writes are ignored with a warning
//! - A sink nobody wrote to finishes with its current status and no body
//! - Clones share one sink, so the dispatcher can finish what a handler wrote

use std::sync::{Arc, Mutex, PoisonError};

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::codec::TextCodec;

const APPLICATION_JSON: &str = "application/json";

/// The finished response for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMessage {
    pub status: StatusCode,
    pub content_type: Option<&'static str>,
    pub body: Bytes,
}

impl ResponseMessage {
    /// A response with a status code and no content.
    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            content_type: None,
            body: Bytes::new(),
        }
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl IntoResponse for ResponseMessage {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        if let Some(content_type) = self.content_type {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        response
    }
}

#[derive(Debug)]
struct SinkState {
    status: StatusCode,
    written: Option<ResponseMessage>,
}

/// Shared, write-once response sink.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    state: Arc<Mutex<SinkState>>,
    codec: TextCodec,
}

impl HttpResponse {
    pub fn new(codec: TextCodec) -> Self {
        Self {
            state: Arc::new(Mutex::new(SinkState {
                status: StatusCode::OK,
                written: None,
            })),
            codec,
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut SinkState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    pub fn status_code(&self) -> StatusCode {
        self.with_state(|state| state.status)
    }

    pub fn set_status_code(&self, status: StatusCode) {
        self.with_state(|state| state.status = status);
    }

    /// True once a body (or no-content) has been written.
    pub fn is_closed(&self) -> bool {
        self.with_state(|state| state.written.is_some())
    }

    /// Write a value back to the requester as JSON.
    pub fn write<T: Serialize + ?Sized>(&self, value: &T) {
        let body = self.codec.serialize(value);
        self.close_with(|status| ResponseMessage {
            status,
            content_type: Some(APPLICATION_JSON),
            body: Bytes::from(body),
        });
    }

    /// Write raw bytes back to the requester. Empty data closes with no body.
    pub fn write_bytes(&self, data: impl Into<Bytes>) {
        let body = data.into();
        self.close_with(|status| ResponseMessage {
            status,
            content_type: None,
            body,
        });
    }

    /// Answer 204 No Content.
    pub fn write_no_content(&self) {
        self.with_state(|state| state.status = StatusCode::NO_CONTENT);
        self.close_with(ResponseMessage::empty);
    }

    fn close_with(&self, build: impl FnOnce(StatusCode) -> ResponseMessage) {
        self.with_state(|state| {
            if state.written.is_some() {
                tracing::warn!("Response already written, ignoring additional write");
                return;
            }
            state.written = Some(build(state.status));
        });
    }

    /// Finish the exchange, returning what was written (or the bare status).
    pub(crate) fn finish(&self) -> ResponseMessage {
        self.with_state(|state| {
            state
                .written
                .take()
                .unwrap_or_else(|| ResponseMessage::empty(state.status))
        })
    }
}
