//! HTTP Range request resolution
//!
//! Turns a raw `Range` header into concrete byte bounds for a resource of
//! known size. Only a single `bytes` range is understood.

/// Inclusive byte offsets, `start <= end < size`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

#[allow(clippy::len_without_is_empty)]
impl ByteRange {
    pub const fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Number of bytes covered, the `Content-Length` of a 206
    pub const fn len(self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` value against a resource of `size` bytes
    pub fn content_range(self, size: u64) -> String {
        format!("bytes {}-{}/{size}", self.start, self.end)
    }
}

/// Outcome of resolving a `Range` header against a resource size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    /// Serve the whole body with 200
    NoRange,
    /// Serve one slice with 206
    Bounded(ByteRange),
    /// Malformed or unsatisfiable, answered with 416
    Invalid,
}

/// Resolve a `Range` header against `size`
///
/// Supported formats:
/// - `bytes=start-end` - specific range, `end` clamped to the last byte
/// - `bytes=start-` - from `start` to the end
/// - `bytes=-suffix` - the last `suffix` bytes
///
/// `bytes=0-` is treated as no range at all so the client gets a plain 200.
///
/// # Examples
/// ```
/// use dirserve::http::range::{resolve, ByteRange, RangeSpec};
///
/// assert_eq!(resolve(None, 1000), RangeSpec::NoRange);
/// assert_eq!(
///     resolve(Some("bytes=0-99"), 1000),
///     RangeSpec::Bounded(ByteRange::new(0, 99))
/// );
/// assert_eq!(resolve(Some("bytes=2000-"), 1000), RangeSpec::Invalid);
/// ```
pub fn resolve(range_header: Option<&str>, size: u64) -> RangeSpec {
    let Some(header) = range_header else {
        return RangeSpec::NoRange;
    };

    let Some(spec) = header.trim().strip_prefix("bytes=") else {
        return RangeSpec::Invalid;
    };

    // multipart/byteranges is not supported
    if spec.contains(',') {
        return RangeSpec::Invalid;
    }

    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeSpec::Invalid;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    if start_str.is_empty() {
        return resolve_suffix(end_str, size);
    }

    resolve_standard(start_str, end_str, size)
}

/// Suffix form, e.g. `-500`
fn resolve_suffix(suffix_str: &str, size: u64) -> RangeSpec {
    let Ok(suffix) = suffix_str.parse::<u64>() else {
        return RangeSpec::Invalid;
    };

    if suffix == 0 || size == 0 {
        return RangeSpec::Invalid;
    }

    // A suffix longer than the file selects the whole file
    RangeSpec::Bounded(ByteRange::new(size - suffix.min(size), size - 1))
}

/// Standard form, e.g. `0-99` or `100-`
fn resolve_standard(start_str: &str, end_str: &str, size: u64) -> RangeSpec {
    let Ok(start) = start_str.parse::<u64>() else {
        return RangeSpec::Invalid;
    };

    if start == 0 && end_str.is_empty() {
        return RangeSpec::NoRange;
    }

    if start >= size {
        return RangeSpec::Invalid;
    }

    let end = if end_str.is_empty() {
        size - 1
    } else {
        let Ok(end) = end_str.parse::<u64>() else {
            return RangeSpec::Invalid;
        };
        end.min(size - 1)
    };

    if start > end {
        return RangeSpec::Invalid;
    }

    RangeSpec::Bounded(ByteRange::new(start, end))
}
