//! Request path resolution
//!
//! Maps a raw URL path onto the serving root and classifies what it points at.
//! A request can never resolve above the root: `..` is clamped lexically and
//! the canonical target must still live under the canonical root.

use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

use crate::http::mime;
use crate::logger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    File,
    Directory,
    Missing,
}

/// A request target after resolution and one stat call
#[derive(Debug, Clone)]
pub struct ResourceRef {
    /// Filesystem path, inside the serving root
    pub path: PathBuf,
    /// Normalized request path relative to the root, `""` for the root itself
    pub relative: String,
    pub kind: ResourceKind,
    /// Size in bytes, zero unless `kind` is `File`
    pub size: u64,
    pub modified: Option<SystemTime>,
    /// Content-Type, `Some` only for files
    pub mime: Option<&'static str>,
}

impl ResourceRef {
    fn missing(relative: String) -> Self {
        Self {
            path: PathBuf::new(),
            relative,
            kind: ResourceKind::Missing,
            size: 0,
            modified: None,
            mime: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.relative.is_empty()
    }
}

/// Decode and normalize a URL path into path segments
///
/// Each `/`-separated segment is percent-decoded on its own, so an encoded
/// `%2F` can never introduce a new separator. Returns `None` when a segment is
/// not valid UTF-8 or decodes into something other than a single file name.
pub fn normalize(raw_path: &str) -> Option<Vec<String>> {
    let mut segments: Vec<String> = Vec::new();

    for raw in raw_path.split('/') {
        let segment = percent_decode_str(raw).decode_utf8().ok()?;
        match segment.as_ref() {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            name => {
                if !is_plain_name(name) {
                    return None;
                }
                segments.push(name.to_string());
            }
        }
    }

    Some(segments)
}

fn is_plain_name(name: &str) -> bool {
    if name.contains(['\0', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Resolve `raw_path` against the canonical serving `root` and stat it
pub async fn resolve(root: &Path, raw_path: &str) -> ResourceRef {
    let Some(segments) = normalize(raw_path) else {
        return ResourceRef::missing(String::new());
    };
    let relative = segments.join("/");
    let target = segments
        .iter()
        .fold(root.to_path_buf(), |path, segment| path.join(segment));

    // Not found is common (404), no need to log
    let Ok(canonical) = fs::canonicalize(&target).await else {
        return ResourceRef::missing(relative);
    };
    if !canonical.starts_with(root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {raw_path} -> {}",
            canonical.display()
        ));
        return ResourceRef::missing(relative);
    }

    let Ok(metadata) = fs::metadata(&canonical).await else {
        return ResourceRef::missing(relative);
    };

    let (kind, size, mime) = if metadata.is_dir() {
        (ResourceKind::Directory, 0, None)
    } else if metadata.is_file() {
        // Named after the request, not the symlink target
        (
            ResourceKind::File,
            metadata.len(),
            Some(mime::content_type(&target)),
        )
    } else {
        return ResourceRef::missing(relative);
    };

    ResourceRef {
        path: canonical,
        relative,
        kind,
        size,
        modified: metadata.modified().ok(),
        mime,
    }
}
