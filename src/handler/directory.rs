//! Directory listing responses

use chrono::{DateTime, Local};
use hyper::Response;
use std::io;
use tokio::fs;

use super::error::ServeError;
use super::listing::{self, ListingEntry};
use super::resource::ResourceRef;
use crate::http::{self, ResponseBody};

/// Serve a resource already classified as a directory
pub async fn serve_directory(
    resource: &ResourceRef,
    exclude: &[String],
) -> Result<Response<ResponseBody>, ServeError> {
    let entries = read_entries(resource, exclude).await?;
    let html = listing::render_page(&resource.relative, &entries);
    Ok(http::build_html_response(html))
}

/// Collect listing rows for a directory, in enumeration order
///
/// Dotfiles, excluded names, names that are not valid UTF-8 and children whose
/// stat fails are left out. The parent row comes first except at the root.
pub async fn read_entries(
    resource: &ResourceRef,
    exclude: &[String],
) -> io::Result<Vec<ListingEntry>> {
    let mut entries = Vec::new();
    if !resource.is_root() {
        entries.push(ListingEntry::parent());
    }

    let mut dir = fs::read_dir(&resource.path).await?;
    while let Some(child) = dir.next_entry().await? {
        let Ok(name) = child.file_name().into_string() else {
            continue;
        };
        if name.starts_with('.') || exclude.contains(&name) {
            continue;
        }

        // Follows symlinks, like the stat of the request target
        let Ok(metadata) = fs::metadata(child.path()).await else {
            continue;
        };
        let modified = metadata.modified().ok().map(DateTime::<Local>::from);

        let entry = if metadata.is_dir() {
            ListingEntry::directory(&name, modified)
        } else {
            ListingEntry::file(&name, modified, metadata.len())
        };
        entries.push(entry);
    }

    Ok(entries)
}
