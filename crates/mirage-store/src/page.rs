//! Persisted page types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Content category of a page.
///
/// Determines the prompt template used to generate a page and the rules used
/// to normalize it before serving. The set is closed: every stored page
/// carries one of these variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    /// HTML document.
    Html,
}

impl PageKind {
    /// Kind used when a key carries no recognizable extension.
    pub const DEFAULT: Self = Self::Html;

    /// Every supported kind.
    pub const ALL: [Self; 1] = [Self::Html];

    /// Tag stored alongside the page content (e.g., "html").
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Html => "html",
        }
    }

    /// File extension of canonical keys holding this kind.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
        }
    }

    /// HTTP content type of the served document.
    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Html => "text/html; charset=utf-8",
        }
    }

    /// Resolve a stored tag. Returns `None` for unsupported tags.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Resolve a file extension (case-insensitive, without the dot).
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.extension().eq_ignore_ascii_case(ext))
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A stored page.
///
/// `content` is the raw generated text. It is never normalized or mutated
/// after insertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Content category.
    pub kind: PageKind,
    /// Canonical storage key (e.g., "/about/index.html").
    pub key: String,
    /// Raw content as produced by the generator.
    pub content: String,
}
