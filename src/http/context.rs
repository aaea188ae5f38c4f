//! The request context passed as the first argument of every handler method.

use std::fmt;
use std::sync::Arc;

use crate::codec::TextCodec;
use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;

/// A request view paired with its response sink.
#[derive(Clone)]
pub struct WebApiHttpContext {
    request: Arc<HttpRequest>,
    response: HttpResponse,
}

impl WebApiHttpContext {
    pub fn new(request: Arc<HttpRequest>, response: HttpResponse) -> Self {
        Self { request, response }
    }

    /// Create a context with a fresh response sink.
    pub fn for_request(request: Arc<HttpRequest>, codec: TextCodec) -> Self {
        Self::new(request, HttpResponse::new(codec))
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn response(&self) -> &HttpResponse {
        &self.response
    }
}

impl fmt::Debug for WebApiHttpContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebApiHttpContext")
            .field("method", self.request.method())
            .field("path", &self.request.path())
            .field("request_id", &self.request.request_id())
            .finish()
    }
}
