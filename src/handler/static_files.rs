//! File serving
//!
//! Whole-file and single-range responses, streamed from disk.

use hyper::Response;
use std::io::SeekFrom;
use tokio::fs::File;
use tokio::io::AsyncSeekExt;

use super::error::ServeError;
use super::resource::ResourceRef;
use crate::http::response::{build_file_response, build_partial_response};
use crate::http::{self, body, mime, RangeSpec, ResponseBody};

/// Serve a resource already classified as a regular file
///
/// HEAD only describes the file. A file without an extension is always sent
/// whole as `text/plain`, whatever the `Range` header says.
pub async fn serve_file(
    resource: &ResourceRef,
    range_header: Option<&str>,
    is_head: bool,
) -> Result<Response<ResponseBody>, ServeError> {
    let content_type = resource.mime.unwrap_or(mime::EXTENSIONLESS);
    let size = resource.size;

    if is_head {
        return Ok(build_file_response(body::empty(), content_type, size));
    }

    if !mime::has_extension(&resource.relative) {
        let file = File::open(&resource.path).await?;
        return Ok(build_file_response(body::file_slice(file, size), mime::EXTENSIONLESS, size));
    }

    match http::resolve_range(range_header, size) {
        RangeSpec::NoRange => {
            let file = File::open(&resource.path).await?;
            Ok(build_file_response(body::file_slice(file, size), content_type, size))
        }
        RangeSpec::Bounded(range) => {
            let mut file = File::open(&resource.path).await?;
            file.seek(SeekFrom::Start(range.start)).await?;
            Ok(build_partial_response(
                body::file_slice(file, range.len()),
                content_type,
                range,
                size,
            ))
        }
        RangeSpec::Invalid => Err(ServeError::RangeNotSatisfiable { size }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::resource::{self, ResourceKind};
    use http_body_util::BodyExt;
    use hyper::header::{CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE};
    use hyper::StatusCode;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let data: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(dir.path().join("a.bin"), &data).unwrap();
        std::fs::write(dir.path().join("NOTES"), b"plain text notes").unwrap();
        let root = dir.path().canonicalize().unwrap();
        (dir, root)
    }

    async fn body_bytes(resp: Response<ResponseBody>) -> Vec<u8> {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        bytes.to_vec()
    }

    #[tokio::test]
    async fn test_full_file() {
        let (_dir, root) = fixture();
        let file = resource::resolve(&root, "/a.bin").await;
        assert_eq!(file.kind, ResourceKind::File);

        let resp = serve_file(&file, None, false).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(CONTENT_RANGE).is_none());
        assert_eq!(resp.headers()[CONTENT_LENGTH], "5000");
        assert_eq!(body_bytes(resp).await.len(), 5000);
    }

    #[tokio::test]
    async fn test_interior_range() {
        let (_dir, root) = fixture();
        let file = resource::resolve(&root, "/a.bin").await;

        let resp = serve_file(&file, Some("bytes=1000-1999"), false)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(resp.headers()[CONTENT_RANGE], "bytes 1000-1999/5000");
        let body = body_bytes(resp).await;
        assert_eq!(body.len(), 1000);
        assert_eq!(body[0], (1000 % 251) as u8);
        assert_eq!(body[999], (1999 % 251) as u8);
    }

    #[tokio::test]
    async fn test_every_range_matches_its_headers() {
        let dir = tempfile::tempdir().unwrap();
        let data: Vec<u8> = (0..17u8).collect();
        std::fs::write(dir.path().join("small.bin"), &data).unwrap();
        let root = dir.path().canonicalize().unwrap();
        let file = resource::resolve(&root, "/small.bin").await;

        for start in 0..17u64 {
            for end in start..17u64 {
                let header = format!("bytes={start}-{end}");
                let resp = serve_file(&file, Some(header.as_str()), false)
                    .await
                    .unwrap();
                assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT, "{header}");

                let expected_len = (end - start + 1).to_string();
                let expected_range = format!("bytes {start}-{end}/17");
                assert_eq!(resp.headers()[CONTENT_LENGTH], expected_len.as_str());
                assert_eq!(resp.headers()[CONTENT_RANGE], expected_range.as_str());

                let body = body_bytes(resp).await;
                assert_eq!(body, &data[start as usize..=end as usize], "{header}");
            }
        }
    }

    #[tokio::test]
    async fn test_range_to_end_of_file() {
        let (_dir, root) = fixture();
        let file = resource::resolve(&root, "/a.bin").await;

        let resp = serve_file(&file, Some("bytes=4000-"), false).await.unwrap();
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(body_bytes(resp).await.len(), 1000);

        let resp = serve_file(&file, Some("bytes=-100"), false).await.unwrap();
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(resp.headers()[CONTENT_RANGE], "bytes 4900-4999/5000");
    }

    #[tokio::test]
    async fn test_trivial_range_is_full_body() {
        let (_dir, root) = fixture();
        let file = resource::resolve(&root, "/a.bin").await;

        let resp = serve_file(&file, Some("bytes=0-"), false).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_bytes(resp).await.len(), 5000);
    }

    #[tokio::test]
    async fn test_invalid_range_is_416() {
        let (_dir, root) = fixture();
        let file = resource::resolve(&root, "/a.bin").await;

        let err = serve_file(&file, Some("bytes=9000-"), false)
            .await
            .unwrap_err();
        assert!(matches!(err, ServeError::RangeNotSatisfiable { size: 5000 }));

        let err = serve_file(&file, Some("bytes=oops"), false)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::RANGE_NOT_SATISFIABLE);
    }

    #[tokio::test]
    async fn test_extensionless_ignores_range() {
        let (_dir, root) = fixture();
        let file = resource::resolve(&root, "/NOTES").await;

        let resp = serve_file(&file, Some("bytes=0-4"), false).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/plain");
        assert_eq!(body_bytes(resp).await, b"plain text notes");
    }

    #[tokio::test]
    async fn test_head_has_no_body() {
        let (_dir, root) = fixture();
        let file = resource::resolve(&root, "/a.bin").await;

        let resp = serve_file(&file, Some("bytes=0-9"), true).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "5000");
        assert!(body_bytes(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_file_removed_after_stat() {
        let (dir, root) = fixture();
        let file = resource::resolve(&root, "/a.bin").await;
        std::fs::remove_file(dir.path().join("a.bin")).unwrap();

        let err = serve_file(&file, None, false).await.unwrap_err();
        assert!(matches!(err, ServeError::Io(_)));
    }
}
