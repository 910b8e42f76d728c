//! Directory listing renderer
//!
//! Pure formatting: a sequence of [`ListingEntry`] rows in, HTML out. Styling
//! comes from externally hosted Bootstrap and Bootstrap Icons stylesheets.

use chrono::{DateTime, Local};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left alone when escaping a link segment (same set as
/// `encodeURIComponent`)
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub const PARENT_LINK: &str = "../";
const PARENT_LABEL: &str = "上一层";

const ICON_PARENT: &str = r#"<i class="bi bi-box-arrow-in-up"></i>"#;
const ICON_FOLDER: &str = r#"<i class="bi bi-folder"></i>"#;
const ICON_VIDEO: &str = r#"<i class="bi bi-film"></i>"#;
const ICON_CODE: &str = r#"<i class="bi bi-file-code"></i>"#;
const ICON_AUDIO: &str = r#"<i class="bi bi-file-music"></i>"#;
const ICON_IMAGE: &str = r#"<i class="bi bi-file-image"></i>"#;
const ICON_TEXT: &str = r#"<i class="bi bi-file-text"></i>"#;

const KIB: f64 = 1024.0;
const MIB: f64 = KIB * 1024.0;
const GIB: f64 = MIB * 1024.0;

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Raw file name, escaped only when written into markup
    pub display_name: String,
    /// Percent-encoded name, with a trailing `/` for directories
    pub link_target: String,
    pub modified: Option<DateTime<Local>>,
    /// Present for files only
    pub size: Option<u64>,
}

impl ListingEntry {
    /// The "go up" row
    pub fn parent() -> Self {
        Self {
            display_name: PARENT_LABEL.to_string(),
            link_target: PARENT_LINK.to_string(),
            modified: None,
            size: None,
        }
    }

    pub fn file(name: &str, modified: Option<DateTime<Local>>, size: u64) -> Self {
        Self {
            display_name: name.to_string(),
            link_target: encode_segment(name),
            modified,
            size: Some(size),
        }
    }

    pub fn directory(name: &str, modified: Option<DateTime<Local>>) -> Self {
        Self {
            display_name: name.to_string(),
            link_target: format!("{}/", encode_segment(name)),
            modified,
            size: None,
        }
    }
}

/// Percent-encode a single path segment for use in a relative link
pub fn encode_segment(name: &str) -> String {
    utf8_percent_encode(name, SEGMENT).to_string()
}

/// Human-scaled size; the larger unit is only used past 1.1 of it
///
/// # Examples
/// ```
/// use dirserve::handler::listing::format_size;
/// assert_eq!(format_size(Some(5000)), "4.9K");
/// assert_eq!(format_size(Some(2 * 1024 * 1024)), "2.0M");
/// assert_eq!(format_size(None), "-");
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn format_size(size: Option<u64>) -> String {
    let Some(size) = size else {
        return "-".to_string();
    };
    let size = size as f64;
    if size > 1.1 * GIB {
        format!("{:.1}G", size / GIB)
    } else if size > 1.1 * MIB {
        format!("{:.1}M", size / MIB)
    } else {
        format!("{:.1}K", size / KIB)
    }
}

/// `YYYY-MM-DD HH:MM` in local time
pub fn format_date(date: Option<&DateTime<Local>>) -> String {
    date.map_or_else(
        || "-".to_string(),
        |d| d.format("%Y-%m-%d %H:%M").to_string(),
    )
}

/// Icon markup for a link target, empty for unrecognized extensions
pub fn icon_for(link_target: &str) -> &'static str {
    if link_target == PARENT_LINK {
        return ICON_PARENT;
    }
    if link_target.ends_with('/') {
        return ICON_FOLDER;
    }

    let ext = link_target
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("mp4" | "mkv" | "webm") => ICON_VIDEO,
        Some("css" | "js" | "json" | "yaml" | "toml" | "html") => ICON_CODE,
        Some("php" | "cpp" | "h" | "c" | "go" | "rs") => ICON_CODE,
        Some("flac" | "wma" | "mp3" | "wav" | "ogg") => ICON_AUDIO,
        Some("gif" | "bmp" | "jpg" | "jpeg" | "heic" | "webp") => ICON_IMAGE,
        Some("txt" | "md") => ICON_TEXT,
        _ => "",
    }
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_row(entry: &ListingEntry) -> String {
    let date_cell = match entry.modified {
        Some(ref d) => format!(
            r#"<td class="text-secondary"><i class="bi bi-calendar2-day"></i> {}</td>"#,
            format_date(Some(d))
        ),
        None => "<td> - </td>".to_string(),
    };
    format!(
        r#"<tr><td>{icon} <a href="{link}">{name}</a></td>{date_cell}<td class="text-secondary">{size}</td></tr>"#,
        icon = icon_for(&entry.link_target),
        link = escape_html(&entry.link_target),
        name = escape_html(&entry.display_name),
        size = format_size(entry.size),
    )
}

/// Display form of a root-relative directory path
fn display_path(base_path: &str) -> String {
    let trimmed = base_path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

/// Render the listing fragment for the directory at `base_path`
///
/// `base_path` is relative to the serving root (`""` for the root). Rows are
/// written in the order given.
pub fn render(base_path: &str, entries: &[ListingEntry]) -> String {
    let rows: String = entries.iter().map(render_row).collect();
    format!(
        r#"
<div class="container">
<div class="row pt-3 pb-2"><div class="col-12">
    <h5>当前路径：<code>{path}</code></h5>
</div></div>
<div class="row"><div class="col-12">
<table class="table">
    <thead>
        <tr>
            <th>名称</th>
            <th style="width: 14em;">时间</th>
            <th style="width: 5em;">大小</th>
        </tr>
    </thead>
    <tbody>
        {rows}</tbody>
</table>
</div></div>
</div>"#,
        path = escape_html(&display_path(base_path)),
    )
}

/// Render a complete HTML document around [`render`]
pub fn render_page(base_path: &str, entries: &[ListingEntry]) -> String {
    format!(
        r#"<html>
<head>
    <meta charset="utf-8">
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap-icons@1.11.3/font/bootstrap-icons.min.css" crossorigin="anonymous">
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@4.4.1/dist/css/bootstrap.min.css" crossorigin="anonymous">
</head>
<body>{fragment}
</body>
</html>"#,
        fragment = render(base_path, entries),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_date() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 2, 8, 20, 3, 0).unwrap()
    }

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(None), "-");
        assert_eq!(format_size(Some(0)), "0.0K");
        assert_eq!(format_size(Some(5000)), "4.9K");
        assert_eq!(format_size(Some(1024 * 1024)), "1024.0K");
        assert_eq!(format_size(Some(120_000_000)), "114.4M");
    }

    #[test]
    fn test_format_size_mebibyte_boundary() {
        // 1.1 MiB = 1_153_433.6 bytes
        assert_eq!(format_size(Some(1_153_433)), "1126.4K");
        assert_eq!(format_size(Some(1_153_434)), "1.1M");
    }

    #[test]
    fn test_format_size_gibibyte_boundary() {
        // 1.05 GiB stays in mebibytes
        assert_eq!(format_size(Some(1_127_428_915)), "1075.2M");
        // 1.1 GiB = 1_181_116_006.4 bytes
        assert_eq!(format_size(Some(1_181_116_006)), "1126.4M");
        assert_eq!(format_size(Some(1_181_116_007)), "1.1G");
        assert_eq!(format_size(Some(3 * 1024 * 1024 * 1024)), "3.0G");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(Some(&sample_date())), "2025-02-08 20:03");
        assert_eq!(format_date(None), "-");
    }

    #[test]
    fn test_icons() {
        assert!(icon_for("../").contains("bi-box-arrow-in-up"));
        assert!(icon_for("photos/").contains("bi-folder"));
        assert!(icon_for("movie.mp4/").contains("bi-folder"));
        assert!(icon_for("movie.MKV").contains("bi-film"));
        assert!(icon_for("main.rs").contains("bi-file-code"));
        assert!(icon_for("song.flac").contains("bi-file-music"));
        assert!(icon_for("cat.jpeg").contains("bi-file-image"));
        assert!(icon_for("notes.md").contains("bi-file-text"));
        assert_eq!(icon_for("archive.zip"), "");
        assert_eq!(icon_for("README"), "");
    }

    #[test]
    fn test_entry_links() {
        let file = ListingEntry::file("my song #1.mp3", None, 10);
        assert_eq!(file.link_target, "my%20song%20%231.mp3");
        assert_eq!(file.display_name, "my song #1.mp3");

        let dir = ListingEntry::directory("a&b", None);
        assert_eq!(dir.link_target, "a%26b/");
        assert_eq!(dir.size, None);
    }

    #[test]
    fn test_row_markup() {
        let row = render_row(&ListingEntry::file("a.txt", Some(sample_date()), 5000));
        assert_eq!(
            row,
            r#"<tr><td><i class="bi bi-file-text"></i> <a href="a.txt">a.txt</a></td><td class="text-secondary"><i class="bi bi-calendar2-day"></i> 2025-02-08 20:03</td><td class="text-secondary">4.9K</td></tr>"#
        );

        let parent = render_row(&ListingEntry::parent());
        assert!(parent.contains(r#"<a href="../">上一层</a>"#));
        assert!(parent.contains("<td> - </td>"));
        assert!(parent.ends_with(r#"<td class="text-secondary">-</td></tr>"#));
    }

    #[test]
    fn test_names_are_escaped() {
        let row = render_row(&ListingEntry::file("<b>.txt", None, 1));
        assert!(row.contains("&lt;b&gt;.txt</a>"));
        assert!(!row.contains("<b>"));
    }

    #[test]
    fn test_render_heading_path() {
        assert!(render("", &[]).contains("<code>/</code>"));
        assert!(render("b/c", &[]).contains("<code>/b/c/</code>"));
    }

    #[test]
    fn test_render_preserves_order() {
        let entries = vec![
            ListingEntry::parent(),
            ListingEntry::file("z.txt", None, 1),
            ListingEntry::directory("a", None),
        ];
        let html = render("b", &entries);
        let parent = html.find(r#"href="../""#).unwrap();
        let z = html.find(r#"href="z.txt""#).unwrap();
        let a = html.find(r#"href="a/""#).unwrap();
        assert!(parent < z && z < a);
    }

    #[test]
    fn test_render_is_deterministic() {
        let entries = vec![
            ListingEntry::parent(),
            ListingEntry::file("a.txt", Some(sample_date()), 5000),
            ListingEntry::directory("b", Some(sample_date())),
        ];
        let first = render_page("docs", &entries);
        let second = render_page("docs", &entries);
        assert_eq!(first, second);
    }
}
