//! HTTP response building module
//!
//! Provides builders for the status codes the service emits. Builder failures
//! are logged and degrade to a bare response.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response, StatusCode};

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Render a method list as an `Allow` header value
pub fn format_allow(methods: &[Method]) -> String {
    methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build plain-text response; HEAD keeps the length but drops the body
pub fn build_text_response(
    status: StatusCode,
    content: String,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(status)
        .header("Content-Type", TEXT_PLAIN)
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 400 Bad Request response
pub fn build_400_response(reason: &str, is_head: bool) -> Response<Full<Bytes>> {
    build_text_response(
        StatusCode::BAD_REQUEST,
        format!("400 Bad Request: {reason}"),
        is_head,
    )
}

/// Build 404 Not Found response
pub fn build_404_response(is_head: bool) -> Response<Full<Bytes>> {
    build_text_response(StatusCode::NOT_FOUND, "404 Not Found".to_string(), is_head)
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(allowed: &[Method]) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", TEXT_PLAIN)
        .header("Allow", format_allow(allowed))
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build OPTIONS response listing the methods a path accepts
pub fn build_options_response(allowed: &[Method]) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Allow", format_allow(allowed))
        .header("Content-Length", 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::PAYLOAD_TOO_LARGE)
        .header("Content-Type", TEXT_PLAIN)
        .body(Full::new(Bytes::from("413 Payload Too Large")))
        .unwrap_or_else(|e| {
            log_build_error("413", &e);
            Response::new(Full::new(Bytes::from("413 Payload Too Large")))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
