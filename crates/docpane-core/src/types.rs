use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Grouping label applied to manifest entries without a `section` field.
pub const DEFAULT_SECTION: &str = "General";

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\s+").unwrap()
});

/// One record of the startup manifest: a document descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Display name of the document; also the source of its slug.
    pub name: String,
    /// Source location, resolved against the manifest URL at fetch time.
    pub path: String,
    /// Optional grouping label; absent entries land in [`DEFAULT_SECTION`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

/// A fully loaded document, immutable for the rest of the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Opaque identifier, stable for the session (manifest position).
    pub id: usize,
    /// Display name from the manifest.
    pub title: String,
    /// Section label (defaulted when the manifest omitted it).
    pub section: String,
    /// Source location the content was fetched from.
    pub path: String,
    /// Hash-routing key derived from the title via [`slugify`].
    pub slug: String,
    /// Raw markdown body.
    pub content: String,
    /// Base64-encoded SHA256 of the content.
    pub sha256: String,
    /// When the content was fetched.
    pub fetched_at: DateTime<Utc>,
}

/// One content line that matched every term of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedLine {
    /// Zero-based index of the line within the document content.
    pub line_index: usize,
    /// The line text, unmodified.
    pub text: String,
}

/// Per-document search output. A document yields at most one result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Identifier of the matched document.
    pub document_id: usize,
    /// Slug of the matched document, for deep-linking.
    pub slug: String,
    /// Title of the matched document.
    pub title: String,
    /// Whether the lowercased title contains the whole normalized query.
    pub title_matched: bool,
    /// Every line where all query terms matched, in original line order.
    pub matched_lines: Vec<MatchedLine>,
}

impl SearchResult {
    /// The primary snippet: only the first matching line is surfaced.
    pub fn snippet(&self) -> Option<&MatchedLine> {
        self.matched_lines.first()
    }
}

/// One entry of the in-page table of contents, rebuilt per render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Heading identifier: the existing `id` attribute when present, else a
    /// synthetic `heading-<index>` stable within one render pass.
    pub heading_id: String,
    /// Heading rank, 2 through 6. Rank 1 never enters the TOC.
    pub level: u8,
    /// Rendered text content of the heading.
    pub text: String,
}

impl TocEntry {
    /// Indentation steps for display, proportional to the heading rank.
    pub const fn indent(&self) -> u8 {
        self.level.saturating_sub(2)
    }
}

/// Derive the hash-routing slug for a document title.
///
/// Lowercases the title and collapses every whitespace run to a single
/// hyphen. Deterministic; collisions between distinct titles are not
/// detected or corrected.
pub fn slugify(title: &str) -> String {
    WHITESPACE_RUN
        .replace_all(title.trim().to_lowercase().as_str(), "-")
        .into_owned()
}
