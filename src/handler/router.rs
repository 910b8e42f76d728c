//! Request dispatch module
//!
//! Entry point for HTTP request processing: method check, resource resolution,
//! and an exhaustive dispatch over `(Method, ResourceKind)`.

use hyper::body::Incoming;
use hyper::header::{HeaderName, CONTENT_LENGTH, RANGE, REFERER, USER_AGENT};
use hyper::{HeaderMap, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use super::directory;
use super::error::ServeError;
use super::resource::{self, ResourceKind};
use super::static_files;
use crate::config::AppState;
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};

/// Methods the dispatcher knows how to answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
}

impl Method {
    pub fn from_http(method: &hyper::Method) -> Option<Self> {
        match *method {
            hyper::Method::GET => Some(Self::Get),
            hyper::Method::HEAD => Some(Self::Head),
            _ => None,
        }
    }
}

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub method: &'a hyper::Method,
    pub path: &'a str,
    pub range_header: Option<&'a str>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    // GET and HEAD carry no body worth reading
    let (parts, _body) = req.into_parts();

    let ctx = RequestContext {
        method: &parts.method,
        path: parts.uri.path(),
        range_header: range_header(&parts.headers),
    };
    let response = dispatch(&ctx, &state).await;

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            parts.method.to_string(),
            parts.uri.path().to_string(),
        );
        entry.query = parts.uri.query().map(ToString::to_string);
        entry.http_version = logger::http_version(parts.version).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = if parts.method == hyper::Method::HEAD {
            0
        } else {
            response
                .headers()
                .get(CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(0)
        };
        entry.referer = header_string(&parts.headers, &REFERER);
        entry.user_agent = header_string(&parts.headers, &USER_AGENT);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Resolve the request path and pick a response strategy
pub async fn dispatch(ctx: &RequestContext<'_>, state: &AppState) -> Response<ResponseBody> {
    let Some(method) = Method::from_http(ctx.method) else {
        logger::log_warning(&format!("Method not allowed: {}", ctx.method));
        return ServeError::MethodNotAllowed.into_response(false);
    };
    let is_head = method == Method::Head;

    let resource = resource::resolve(&state.root, ctx.path).await;

    let result = match (method, resource.kind) {
        (Method::Get, ResourceKind::File) => {
            static_files::serve_file(&resource, ctx.range_header, false).await
        }
        (Method::Head, ResourceKind::File) => {
            static_files::serve_file(&resource, ctx.range_header, true).await
        }
        (Method::Get, ResourceKind::Directory) if !ctx.path.ends_with('/') => {
            Ok(http::build_301_response(&format!("{}/", ctx.path)))
        }
        (Method::Get, ResourceKind::Directory) => {
            directory::serve_directory(&resource, &state.config.serve.exclude).await
        }
        (Method::Head, ResourceKind::Directory) => Err(ServeError::MethodNotAllowed),
        (Method::Get | Method::Head, ResourceKind::Missing) => Err(ServeError::NotFound),
    };

    result.unwrap_or_else(|err| {
        if let ServeError::Io(ref e) = err {
            logger::log_error(&format!("Failed to serve '{}': {e}", ctx.path));
        }
        err.into_response(is_head)
    })
}

/// `Range` value as text; a value that is not visible ASCII maps to `""`,
/// which the range resolver rejects as malformed
fn range_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(RANGE).map(|v| v.to_str().unwrap_or(""))
}

fn header_string(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}
