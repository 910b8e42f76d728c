//! MIME type detection module
//!
//! Returns the Content-Type for a served file based on its extension.

use std::path::Path;

/// Content-Type for files without an extension, so browsers display them inline
pub const EXTENSIONLESS: &str = "text/plain";

/// Get the Content-Type for a file path
///
/// # Examples
/// ```
/// use dirserve::http::mime::content_type;
/// assert_eq!(content_type("movie.MP4"), "video/mp4");
/// assert_eq!(content_type("README"), "text/plain");
/// assert_eq!(content_type("blob.xyz"), "application/octet-stream");
/// ```
pub fn content_type(path: impl AsRef<Path>) -> &'static str {
    match path.as_ref().extension().and_then(|e| e.to_str()) {
        None => EXTENSIONLESS,
        Some(ext) => by_extension(&ext.to_ascii_lowercase()),
    }
}

/// Whether a path has an extension at all
pub fn has_extension(path: impl AsRef<Path>) -> bool {
    path.as_ref().extension().is_some()
}

fn by_extension(ext: &str) -> &'static str {
    match ext {
        // Web
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" | "mjs" => "text/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "wasm" => "application/wasm",

        // Text and source code
        "txt" | "md" => "text/plain; charset=utf-8",
        "yaml" | "yml" => "application/yaml",
        "toml" => "application/toml",
        "c" | "h" | "cpp" | "hpp" | "go" | "rs" | "php" | "py" | "sh" => {
            "text/plain; charset=utf-8"
        }

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "heic" => "image/heic",

        // Video
        "mp4" => "video/mp4",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "ogv" => "video/ogg",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",

        // Audio
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "wma" => "audio/x-ms-wma",
        "m4a" => "audio/mp4",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Documents and archives
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "gzip" => "application/gzip",
        "tar" => "application/x-tar",

        _ => "application/octet-stream",
    }
}
