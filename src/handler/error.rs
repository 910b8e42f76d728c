//! Request failure taxonomy
//!
//! Every failure inside the dispatcher ends up as one of these and is turned
//! into a short response that never mentions filesystem paths.

use hyper::{Response, StatusCode};
use std::io;
use thiserror::Error;

use crate::http::{self, ResponseBody};

#[derive(Debug, Error)]
pub enum ServeError {
    /// Stat failed, the path left the serving root, or the target is not a
    /// regular file or directory
    #[error("resource not found")]
    NotFound,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("range not satisfiable for {size} bytes")]
    RangeNotSatisfiable { size: u64 },

    /// Filesystem failure after the resource was classified
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),
}

impl ServeError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::RangeNotSatisfiable { .. } => StatusCode::RANGE_NOT_SATISFIABLE,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_response(self, is_head: bool) -> Response<ResponseBody> {
        match self {
            Self::NotFound => http::build_404_response(is_head),
            Self::MethodNotAllowed => http::build_405_response(is_head),
            Self::RangeNotSatisfiable { size } => http::build_416_response(size, is_head),
            Self::Io(_) => http::build_500_response(is_head),
        }
    }
}
