//! Request path decomposition.
//!
//! ```text
//! with application name:    app/version/handler/action | app/handler/action | app/handler
//! without application name: version/handler/action     | handler/action     | handler
//! ```
//!
//! Version and handler name are lowercased; the action name keeps its case.

/// Calling information extracted from a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebApiUrlInfo {
    pub version: String,
    pub handler_name: String,
    /// Empty when the method is resolved by structural matching.
    pub action_name: String,
}

impl WebApiUrlInfo {
    /// Registry key of the addressed handler.
    pub fn handler_key(&self) -> String {
        format!("{}/{}", self.version, self.handler_name)
    }

    pub fn has_action(&self) -> bool {
        !self.action_name.is_empty()
    }
}

const DEFAULT_VERSION: &str = "v1";

/// Parse `path` against an optional application name.
///
/// Returns `None` when the segment count is out of range or the application
/// segment does not match (case-insensitively).
pub fn parse_url(application_name: Option<&str>, path: &str) -> Option<WebApiUrlInfo> {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    let (version, handler, action) = match application_name.filter(|name| !name.is_empty()) {
        Some(application_name) => {
            let (app, rest) = segments.split_first()?;
            if app.to_lowercase() != application_name.to_lowercase() {
                return None;
            }
            split_rest(rest)?
        }
        None => split_rest(&segments)?,
    };

    Some(WebApiUrlInfo {
        version: version.map_or_else(|| DEFAULT_VERSION.to_string(), str::to_lowercase),
        handler_name: handler.to_lowercase(),
        action_name: action.unwrap_or_default().to_string(),
    })
}

/// Split `version?/handler/action?` once the application segment is removed.
fn split_rest<'a>(segments: &[&'a str]) -> Option<(Option<&'a str>, &'a str, Option<&'a str>)> {
    match *segments {
        [version, handler, action] => Some((Some(version), handler, Some(action))),
        [handler, action] => Some((None, handler, Some(action))),
        [handler] => Some((None, handler, None)),
        _ => None,
    }
}
