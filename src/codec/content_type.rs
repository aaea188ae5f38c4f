//! Request body encodings recognized by the binder.

/// Body encoding derived from the `Content-Type` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// `application/json`, or `text/plain` treated as JSON.
    Json,
    /// `application/x-www-form-urlencoded`.
    FormUrlEncoded,
    NotSupported,
}

impl ContentType {
    /// Classify a content type header value. Parameters after `;` are ignored.
    pub fn parse(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Self::NotSupported;
        };
        let media_type = value.split(';').next().unwrap_or_default().trim();
        if media_type.eq_ignore_ascii_case("application/json")
            || media_type.eq_ignore_ascii_case("text/plain")
        {
            Self::Json
        } else if media_type.eq_ignore_ascii_case("application/x-www-form-urlencoded") {
            Self::FormUrlEncoded
        } else {
            Self::NotSupported
        }
    }
}
