//! HTTP protocol layer module
//!
//! Range resolution, MIME detection, body types and response builders,
//! decoupled from filesystem access.

pub mod body;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use body::ResponseBody;
pub use range::{resolve as resolve_range, ByteRange, RangeSpec};
pub use response::{
    build_301_response, build_404_response, build_405_response, build_416_response,
    build_500_response, build_html_response,
};
