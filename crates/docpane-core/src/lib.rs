//! # docpane-core
//!
//! The search and navigation state engine of a single-page markdown
//! documentation viewer: it loads a manifest of documents, indexes them for
//! substring search with highlighted snippets, routes navigation through
//! the URL hash fragment, and tracks which heading of the active document
//! is in view.
//!
//! ## Architecture
//!
//! The engine is built leaf-first:
//!
//! - **Document Store**: the loaded document set, written once and
//!   read-only afterwards
//! - **Search Matcher**: conjunctive substring matching with snippet
//!   highlighting, no ranking
//! - **Navigation Router**: fragment-driven activation, pagination, and
//!   deep-linking to matched lines
//! - **TOC Tracker**: per-render heading index with viewport-intersection
//!   activation
//! - **UI Controller**: glues user events to the above and mediates with
//!   the external renderer
//!
//! Browser concerns stay behind narrow traits ([`Renderer`],
//! [`HistoryGateway`], [`ViewSurface`]) and the [`RenderedNode`] snapshot
//! type, so everything here runs and tests without a DOM.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docpane_core::{DocumentStore, Fetcher, Matcher, SearchOutcome};
//!
//! # async fn run() -> docpane_core::Result<()> {
//! let fetcher = Fetcher::new()?;
//! let store = DocumentStore::load(&fetcher, "https://docs.example.com/manifest.json").await?;
//!
//! let matcher = Matcher::new();
//! match matcher.search(&store, "user id") {
//!     SearchOutcome::TooShort => println!("keep typing"),
//!     SearchOutcome::NoMatches => println!("no results found"),
//!     SearchOutcome::Results(results) => println!("{} documents matched", results.len()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`] with structured error
//! information. Load failures are all-or-nothing; render and renderer
//! readiness failures degrade the UI instead of crashing it.

/// Viewer configuration (TOML, all fields defaulted)
pub mod config;
/// The UI controller and its host-facing traits
pub mod controller;
/// Rendered-content snapshot consumed by TOC and scroll lookup
pub mod dom;
/// Error types and result aliases
pub mod error;
/// HTTP fetching of the manifest and documents
pub mod fetcher;
/// Hash-fragment navigation and pagination
pub mod router;
/// Substring search with snippet highlighting
pub mod search;
/// The immutable document store
pub mod store;
/// Persisted light/dark preference
pub mod theme;
/// Table-of-contents tracking for the active document
pub mod toc;
/// Core data types and structures
pub mod types;

// Re-export commonly used types
pub use config::{RenderConfig, ScrollConfig, SearchConfig, TocConfig, ViewerConfig};
pub use controller::{Renderer, ResultItem, SearchDisplay, UiEvent, ViewSurface, ViewerController};
pub use dom::RenderedNode;
pub use error::{Error, Result};
pub use fetcher::Fetcher;
pub use router::{HistoryGateway, Router, RouterEffect, ScrollRequest};
pub use search::{Matcher, Query, SearchOutcome, highlight};
pub use store::DocumentStore;
pub use theme::{Theme, ThemeStore};
pub use toc::{IntersectionEvent, TocScroll, TocTracker, TocView};
pub use types::*;
