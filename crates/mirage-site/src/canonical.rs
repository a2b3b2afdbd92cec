//! Request path canonicalization.
//!
//! Every request path maps to a storage key that starts with `/` and ends
//! with `/index.html`, so `/docs`, `/docs/` and `/docs/index.html` share one
//! stored page.

use mirage_store::PageKind;

/// Document name appended to directory-style paths.
pub const DEFAULT_DOCUMENT: &str = "index.html";

/// Map a request path to its canonical storage key.
///
/// Backslashes count as separators, empty and `.` segments are dropped and
/// `..` removes the previous segment without ever climbing above the root.
///
/// ```
/// use mirage_site::canonicalize;
///
/// assert_eq!(canonicalize("/"), "/index.html");
/// assert_eq!(canonicalize("/about"), "/about/index.html");
/// assert_eq!(canonicalize("/a//b/../c/"), "/a/c/index.html");
/// ```
#[must_use]
pub fn canonicalize(request_path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in request_path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }

    if segments.last() != Some(&DEFAULT_DOCUMENT) {
        segments.push(DEFAULT_DOCUMENT);
    }

    format!("/{}", segments.join("/"))
}

/// Derive the page kind from a canonical key's extension.
///
/// Keys without an extension, or with an unsupported one, fall back to
/// [`PageKind::DEFAULT`].
#[must_use]
pub fn kind_for_key(key: &str) -> PageKind {
    let name = key.rsplit('/').next().unwrap_or(key);
    name.rsplit_once('.')
        .and_then(|(_, ext)| PageKind::from_extension(ext))
        .unwrap_or(PageKind::DEFAULT)
}
