//! Response body types
//!
//! Small responses are built in memory; file contents are streamed from disk so
//! a dropped connection releases the file handle without reading the rest.

use futures_util::TryStreamExt;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use std::io;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;

use crate::logger;

/// Body of every response produced by the server
pub type ResponseBody = UnsyncBoxBody<Bytes, io::Error>;

/// In-memory body
pub fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Body with no content
pub fn empty() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Stream at most `len` bytes from the current position of `file`
///
/// Read errors end the stream with an error, which makes hyper abort the
/// connection instead of sending a truncated body as if it were complete.
pub fn file_slice(file: File, len: u64) -> ResponseBody {
    let stream = ReaderStream::new(file.take(len))
        .inspect_err(|e| {
            logger::log_error(&format!("File read failed mid-transfer: {e}"));
        })
        .map_ok(Frame::data);
    StreamBody::new(stream).boxed_unsync()
}
