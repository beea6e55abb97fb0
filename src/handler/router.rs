//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: body-size guard, route lookup,
//! handler invocation and access logging.

use crate::config::AppState;
use crate::handler::items;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::routing::{RouteError, RouteMatch, RouteTable};
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::header::{HeaderMap, HeaderValue, SERVER};
use hyper::{Method, Request, Response, StatusCode, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Register the service routes
///
/// Called once at startup; the resulting table is never modified.
pub fn build_routes() -> Result<RouteTable, RouteError> {
    Ok(RouteTable::builder()
        .route(Method::GET, "/items", items::list_items)?
        .route(Method::POST, "/items", items::add_item)?
        .route(Method::GET, "/items/{id}", items::get_item)?
        .build())
}

/// Main entry point for HTTP request handling
#[allow(clippy::unused_async)]
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let entry = state
        .access_log_enabled()
        .then(|| access_entry(&req, peer_addr));

    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    let response = dispatch(&req, &state);

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us =
            u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Produce the response for a request without touching its body
pub fn dispatch<B>(req: &Request<B>, state: &AppState) -> Response<Full<Bytes>> {
    let method = req.method();
    let path = req.uri().path();

    let max_body_size = state.config.http.max_body_size;
    let response = if let Some(resp) = check_body_size(req.headers(), max_body_size) {
        resp
    } else if method == Method::OPTIONS {
        let allowed = state.routes.allowed_methods(path);
        if allowed.is_empty() {
            http::build_404_response(false)
        } else {
            http::build_options_response(&allowed)
        }
    } else {
        route_request(method, path, &state.routes)
    };

    with_server_header(response, &state.config.http.server_name)
}

/// Look up the route table and run the matched handler
fn route_request(method: &Method, path: &str, routes: &RouteTable) -> Response<Full<Bytes>> {
    let is_head = method == Method::HEAD;

    match routes.find(method, path) {
        RouteMatch::Found { route, params } => match (route.handler)(&params) {
            Ok(text) => http::build_text_response(StatusCode::OK, text, is_head),
            Err(e) => {
                logger::log_debug(&format!("Rejected {method} {path}: {e}"));
                http::build_400_response(&e.to_string(), is_head)
            }
        },
        RouteMatch::MethodNotAllowed { allowed } => {
            logger::log_warning(&format!("Method not allowed: {method} {path}"));
            http::build_405_response(&allowed)
        }
        RouteMatch::NotFound => http::build_404_response(is_head),
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

fn with_server_header(
    mut response: Response<Full<Bytes>>,
    server_name: &str,
) -> Response<Full<Bytes>> {
    if let Ok(value) = HeaderValue::from_str(server_name) {
        response.headers_mut().insert(SERVER, value);
    }
    response
}

/// Start an access log entry from the request line and headers
fn access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
