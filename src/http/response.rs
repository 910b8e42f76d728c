//! HTTP response building module
//!
//! Builders for the status codes the file server produces. None of them panic:
//! a builder failure is logged and a bare response is returned instead.

use hyper::header::{ACCEPT_RANGES, ALLOW, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, LOCATION};
use hyper::{Response, StatusCode};

use super::body::{self, ResponseBody};
use super::range::ByteRange;

/// Methods the server answers
pub const ALLOWED_METHODS: &str = "GET, HEAD";

/// Build 301 Moved Permanently response pointing at `location`
pub fn build_301_response(location: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, location)
        .body(body::empty())
        .unwrap_or_else(|e| fallback("301", &e))
}

/// Build 404 Not Found response
pub fn build_404_response(is_head: bool) -> Response<ResponseBody> {
    build_text_response(StatusCode::NOT_FOUND, "resource not found", is_head)
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(is_head: bool) -> Response<ResponseBody> {
    let text = "method not allowed";
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header(CONTENT_TYPE, "text/plain")
        .header(ALLOW, ALLOWED_METHODS)
        .body(text_body(text, is_head))
        .unwrap_or_else(|e| fallback("405", &e))
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(file_size: u64, is_head: bool) -> Response<ResponseBody> {
    let text = "range not satisfiable";
    Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header(CONTENT_TYPE, "text/plain")
        .header(CONTENT_RANGE, format!("bytes */{file_size}"))
        .body(text_body(text, is_head))
        .unwrap_or_else(|e| fallback("416", &e))
}

/// Build 500 Internal Server Error response
pub fn build_500_response(is_head: bool) -> Response<ResponseBody> {
    build_text_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal server error",
        is_head,
    )
}

/// Build HTML page response
pub fn build_html_response(content: String) -> Response<ResponseBody> {
    let content_length = content.len();
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CONTENT_LENGTH, content_length)
        .body(body::full(content))
        .unwrap_or_else(|e| fallback("HTML", &e))
}

/// Build 200 response for a whole file
///
/// `content_length` is the file size; the body is empty for HEAD.
pub fn build_file_response(
    data: ResponseBody,
    content_type: &str,
    content_length: u64,
) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .header(ACCEPT_RANGES, "bytes")
        .body(data)
        .unwrap_or_else(|e| fallback("200", &e))
}

/// Build 206 Partial Content response for one byte range
pub fn build_partial_response(
    data: ResponseBody,
    content_type: &str,
    range: ByteRange,
    total_size: u64,
) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, range.len())
        .header(CONTENT_RANGE, range.content_range(total_size))
        .header(ACCEPT_RANGES, "bytes")
        .body(data)
        .unwrap_or_else(|e| fallback("206", &e))
}

fn build_text_response(
    status: StatusCode,
    text: &'static str,
    is_head: bool,
) -> Response<ResponseBody> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain")
        .body(text_body(text, is_head))
        .unwrap_or_else(|e| fallback(status.as_str(), &e))
}

fn text_body(text: &'static str, is_head: bool) -> ResponseBody {
    if is_head {
        body::empty()
    } else {
        body::full(text)
    }
}

/// Log response build error and return an empty response
fn fallback(status: &str, error: &hyper::http::Error) -> Response<ResponseBody> {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
    Response::new(body::empty())
}
