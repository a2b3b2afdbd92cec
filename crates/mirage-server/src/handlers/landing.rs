//! Landing page and favicon.

use axum::http::StatusCode;
use axum::response::Html;

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Mirage</title>
</head>
<body>
<h1>Mirage</h1>
<p>Every path on this site is written the first time someone visits it.</p>
<form action="/goto" method="get">
<input name="redir" value="/" size="40">
<button type="submit">Visit</button>
</form>
<p><a href="/all">Browse every page generated so far</a></p>
</body>
</html>
"#;

/// Handle GET /.
pub(crate) async fn get_landing() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

/// Handle GET /favicon.ico.
///
/// Answered without touching the page cache so browsers never trigger a
/// generation.
pub(crate) async fn get_favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}
