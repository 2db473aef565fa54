//! Action name extraction.
//!
//! The action travels as a request parameter, either in the URL query string or
//! in a form-encoded body. Reading a form body means buffering it, so the request
//! is rebuilt with the very same bytes before it continues down the pipeline.

use axum::{
    body::{self, Body},
    extract::Request,
    http::{header, Method},
};
use url::form_urlencoded;

use crate::http::error::PingError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Look up `name` in URL-encoded `key=value` pairs. First occurrence wins.
pub fn find_param(encoded: &[u8], name: &str) -> Option<String> {
    form_urlencoded::parse(encoded)
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Whether the request carries a form-encoded body worth inspecting.
pub fn is_form_request(request: &Request) -> bool {
    let method = request.method();
    if method != Method::POST && method != Method::PUT && method != Method::PATCH {
        return false;
    }

    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
        .unwrap_or(false)
}

/// Read the action parameter named `param`.
///
/// Form body values take precedence over the query string. Returns the request
/// (body restored if it was buffered) along with the action, if any.
pub async fn read_action(
    request: Request,
    param: &str,
    limit: usize,
) -> Result<(Request, Option<String>), PingError> {
    let (request, from_body) = if is_form_request(&request) {
        let (parts, body) = request.into_parts();
        let bytes = body::to_bytes(body, limit)
            .await
            .map_err(PingError::Input)?;
        let action = find_param(&bytes, param);
        (Request::from_parts(parts, Body::from(bytes)), action)
    } else {
        (request, None)
    };

    let action = from_body.or_else(|| {
        request
            .uri()
            .query()
            .and_then(|query| find_param(query.as_bytes(), param))
    });

    Ok((request, action))
}
