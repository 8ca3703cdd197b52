//! Content type resolution from file extensions.
//!
//! A fixed table seeded at compile time. Only the final extension counts,
//! so `results.tar.gz` is `application/gzip`.

use std::path::Path;

/// Content type for `path`, or `None` when the extension is not known.
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "gz" | "tgz" => "application/gzip",
        "tar" => "application/x-tar",
        "zip" => "application/zip",
        "json" => "application/json",
        "xml" => "text/xml; charset=utf-8",
        "yaml" | "yml" => "application/yaml",
        "txt" | "log" => "text/plain; charset=utf-8",
        "html" | "htm" => "text/html; charset=utf-8",
        _ => return None,
    };
    Some(mime)
}
