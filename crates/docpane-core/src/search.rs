//! Substring search over the document store.
//!
//! Matching is presence/absence only: no ranking, no fuzziness, no
//! stemming. A content line matches when every query term is a substring of
//! its lowercased text (conjunctive across terms), which keeps multi-word
//! queries from pulling in unrelated lines that match each word separately.
//! Results come back in store (manifest) order.
//!
//! The matcher is a pure function over a store snapshot: it never mutates
//! navigation or TOC state.

use crate::store::DocumentStore;
use crate::types::{MatchedLine, SearchResult};
use regex::RegexBuilder;
use tracing::debug;

/// Queries shorter than this (after normalization) never trigger a scan.
pub const MIN_QUERY_LEN: usize = 2;

/// A normalized search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// The operator input, trimmed and lowercased.
    pub raw: String,
    /// Non-empty whitespace-delimited tokens of `raw`, in input order.
    pub terms: Vec<String>,
}

impl Query {
    /// Normalizes operator input: trim, lowercase, tokenize on whitespace
    /// runs.
    pub fn parse(input: &str) -> Self {
        let raw = input.trim().to_lowercase();
        let terms = raw.split_whitespace().map(str::to_string).collect();
        Self { raw, terms }
    }

    /// Whether the query is long enough to scan.
    pub fn is_scannable(&self) -> bool {
        self.raw.chars().count() >= MIN_QUERY_LEN
    }
}

/// Outcome of a search: the UI renders each signal differently.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// Query under [`MIN_QUERY_LEN`] characters; the UI shows a hint, not
    /// "no results found".
    TooShort,
    /// A scannable query that matched nothing.
    NoMatches,
    /// At least one document matched, in store order.
    Results(Vec<SearchResult>),
}

impl SearchOutcome {
    /// The result list, empty for the non-result signals.
    pub fn results(&self) -> &[SearchResult] {
        match self {
            Self::Results(results) => results,
            _ => &[],
        }
    }
}

/// The search index & matcher. Stateless; scans a store snapshot per query.
#[derive(Debug, Clone, Default)]
pub struct Matcher;

impl Matcher {
    /// Creates a matcher.
    pub const fn new() -> Self {
        Self
    }

    /// Runs a query against the store.
    pub fn search(&self, store: &DocumentStore, input: &str) -> SearchOutcome {
        let query = Query::parse(input);
        if !query.is_scannable() {
            return SearchOutcome::TooShort;
        }

        let mut results = Vec::new();
        for doc in store.iter() {
            let title_matched = doc.title.to_lowercase().contains(&query.raw);

            let matched_lines: Vec<MatchedLine> = doc
                .content
                .lines()
                .enumerate()
                .filter(|(_, line)| {
                    let lowered = line.to_lowercase();
                    query.terms.iter().all(|term| lowered.contains(term))
                })
                .map(|(line_index, line)| MatchedLine {
                    line_index,
                    text: line.to_string(),
                })
                .collect();

            if title_matched || !matched_lines.is_empty() {
                results.push(SearchResult {
                    document_id: doc.id,
                    slug: doc.slug.clone(),
                    title: doc.title.clone(),
                    title_matched,
                    matched_lines,
                });
            }
        }

        debug!(
            "Query '{}' matched {} of {} documents",
            query.raw,
            results.len(),
            store.len()
        );

        if results.is_empty() {
            SearchOutcome::NoMatches
        } else {
            SearchOutcome::Results(results)
        }
    }
}

/// Wraps every case-insensitive occurrence of any query term in
/// `<mark>…</mark>`.
///
/// Terms are escaped before the alternation is built, so operator input
/// containing regex metacharacters highlights literally. The alternation
/// tries longer terms first so that when one term contains another, the
/// longer occurrence is wrapped once rather than twice.
pub fn highlight(text: &str, terms: &[String]) -> String {
    let mut escaped: Vec<String> = terms
        .iter()
        .filter(|t| !t.is_empty())
        .map(|t| regex::escape(t))
        .collect();
    if escaped.is_empty() {
        return text.to_string();
    }
    escaped.sort_by_key(|t| std::cmp::Reverse(t.len()));

    let pattern = escaped.join("|");
    let Ok(re) = RegexBuilder::new(&pattern).case_insensitive(true).build() else {
        // Escaped literals always compile; leave text unmarked if not.
        return text.to_string();
    };

    re.replace_all(text, "<mark>$0</mark>").into_owned()
}
