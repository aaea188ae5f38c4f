//! `application/x-www-form-urlencoded` body parsing.

use crate::http::QueryData;

/// Parse a form body into key/value data.
///
/// Pairs are separated by `&`; the name ends at the first `=`. Names and
/// values are trimmed, and pairs whose name or value is then empty are dropped.
/// Values stay percent-encoded until they are converted.
pub fn parse_form(body: &str) -> QueryData {
    body.split('&')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            let (name, value) = (name.trim(), value.trim());
            (!name.is_empty() && !value.is_empty()).then_some((name, value))
        })
        .collect()
}
