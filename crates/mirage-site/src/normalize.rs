//! Page normalization.
//!
//! Generated content is stored raw: a title comment on the first line
//! followed by body markup. [`normalize`] wraps it into a complete HTML
//! document at serve time. It accepts any input and never fails.

/// Title used when the content has no usable first line.
pub const FALLBACK_TITLE: &str = "Untitled";

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Wrap raw page content into a complete HTML document.
///
/// The first line, stripped of comment delimiters and whitespace, becomes
/// the `<title>`. The content is placed verbatim in the body; `</body>` and
/// `</html>` are appended only when the content does not already end with
/// them. Content without a usable title gets a minimal shell titled
/// [`FALLBACK_TITLE`].
///
/// ```
/// use mirage_site::normalize;
///
/// let doc = normalize("<!--About Us-->\n<p>Hello</p>");
/// assert!(doc.contains("<title>About Us</title>"));
/// assert!(doc.contains("<p>Hello</p>\n</body>"));
/// ```
#[must_use]
pub fn normalize(content: &str) -> String {
    match extract_title(content) {
        Some(title) => titled_document(&title, content),
        None => fallback_document(content),
    }
}

/// Derive the page title from the first line of `content`.
fn extract_title(content: &str) -> Option<String> {
    let first_line = content.lines().next()?;
    let title = first_line
        .replace(COMMENT_OPEN, "")
        .replace(COMMENT_CLOSE, "");
    let title = title.trim();
    if title.is_empty() {
        return None;
    }
    Some(html_escape::encode_text(title).into_owned())
}

fn titled_document(title: &str, content: &str) -> String {
    format!(
        "<!DOCTYPE html>
<html lang=\"en\">
<head>
<meta charset=\"UTF-8\">
<meta http-equiv=\"X-UA-Compatible\" content=\"IE=edge\">
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">
<title>{title}</title>
</head>
<body>
{content}{closing}",
        closing = closing_tags(content),
    )
}

fn fallback_document(content: &str) -> String {
    format!(
        "<!DOCTYPE html>
<html>
<head>
<title>{FALLBACK_TITLE}</title>
</head>
<body>
{content}{closing}",
        closing = closing_tags(content),
    )
}

/// Closing tags still missing at the end of `content`.
fn closing_tags(content: &str) -> &'static str {
    let tail = content.trim_end();
    if ends_with_tag(tail, "</html>") {
        "\n"
    } else if ends_with_tag(tail, "</body>") {
        "\n</html>\n"
    } else {
        "\n</body>\n</html>\n"
    }
}

/// Case-insensitive suffix check on bytes (safe for any UTF-8 input).
fn ends_with_tag(text: &str, tag: &str) -> bool {
    let text = text.as_bytes();
    let tag = tag.as_bytes();
    text.len() >= tag.len() && text[text.len() - tag.len()..].eq_ignore_ascii_case(tag)
}
