//! Prompt templates.

use mirage_store::PageKind;

/// Placeholder replaced by the request path.
const PATH_PLACEHOLDER: &str = "{path}";

const HTML_TEMPLATE: &str = "\
You are a web server that invents a plausible, self-contained web page for any URL.
Write the HTML for the page served at the path \"{path}\".
The very first line must be an HTML comment holding only the page title, like <!--Page Title-->.
After that line, write only the contents of the <body> element: no doctype, <html> or <head>.
Use inline <style> or style attributes for styling and no external resources.
Link to other pages of the same site with relative paths.
";

/// Prompt template for `kind`.
#[must_use]
pub fn prompt_template(kind: PageKind) -> &'static str {
    match kind {
        PageKind::Html => HTML_TEMPLATE,
    }
}

/// Build the final prompt by substituting `request_path` into the template.
#[must_use]
pub fn build_prompt(kind: PageKind, request_path: &str) -> String {
    prompt_template(kind).replacen(PATH_PLACEHOLDER, request_path, 1)
}
