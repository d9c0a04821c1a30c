//! Hash-fragment navigation and pagination.
//!
//! The URL fragment is the single source of truth for which document is
//! active. The router turns activation requests into fragment writes (which
//! the host echoes back as a fragment-change event) and turns fragment
//! changes into typed effects the controller applies. The one exception is
//! re-activating the already-active slug, which requests a fresh render
//! directly instead of waiting on a fragment change that will never fire.

use crate::dom::RenderedNode;
use crate::store::DocumentStore;
use std::time::Duration;
use tracing::debug;

/// Default duration of the deep-link emphasis on a scrolled-to element.
pub const FLASH_DURATION: Duration = Duration::from_secs(2);

/// Host-side access to the URL fragment and history.
pub trait HistoryGateway {
    /// The current fragment, without the leading `#`.
    fn fragment(&self) -> String;
    /// Sets the fragment, pushing a history entry. The host must deliver a
    /// fragment-change event back to the controller.
    fn set_fragment(&mut self, fragment: &str);
    /// Replaces the fragment without a new history entry (in-page anchors).
    fn replace_fragment(&mut self, fragment: &str);
}

/// Effect of an activation request, applied by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterEffect {
    /// The fragment was changed; a fragment-change event will follow.
    FragmentSet,
    /// The slug was already active; render it again now.
    Rerender(String),
}

/// Where to scroll after a deep-linked render.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollRequest {
    /// Scroll a matched element into view with a transient emphasis
    /// ([`FLASH_DURATION`] by default).
    Element {
        /// Text content of the target element, for host-side lookup.
        target_text: String,
        /// Emphasis duration.
        flash: Duration,
    },
    /// No element matched the line text; scroll to an approximate vertical
    /// offset instead. Always non-negative.
    Offset(f64),
}

/// Navigation state over the document store's manifest order.
#[derive(Debug, Clone, Default)]
pub struct Router {
    active_slug: String,
}

impl Router {
    /// Creates a router with no active document.
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently active slug (mirrors the fragment).
    pub fn active_slug(&self) -> &str {
        &self.active_slug
    }

    /// Manifest index of the active document, if it resolves.
    pub fn current_index(&self, store: &DocumentStore) -> Option<usize> {
        store.position(&self.active_slug)
    }

    /// Requests activation of a document by slug.
    ///
    /// A differing fragment is written through the gateway and activation
    /// completes when the fragment-change event arrives. Re-activating the
    /// current fragment is idempotent: it requests a fresh render directly,
    /// matching the behavior of clicking the already-active link.
    pub fn activate(&mut self, gateway: &mut impl HistoryGateway, slug: &str) -> RouterEffect {
        if gateway.fragment() == slug {
            debug!("Re-activating '{slug}', forcing re-render");
            self.active_slug = slug.to_string();
            return RouterEffect::Rerender(slug.to_string());
        }
        gateway.set_fragment(slug);
        RouterEffect::FragmentSet
    }

    /// Records a fragment change and returns the slug to render.
    pub fn on_fragment_change(&mut self, fragment: &str) -> String {
        self.active_slug = fragment.to_string();
        self.active_slug.clone()
    }

    /// Whether a previous document exists in manifest order.
    pub fn can_go_previous(&self, store: &DocumentStore) -> bool {
        self.current_index(store).is_some_and(|i| i > 0)
    }

    /// Whether a next document exists in manifest order.
    pub fn can_go_next(&self, store: &DocumentStore) -> bool {
        self.current_index(store)
            .is_some_and(|i| i + 1 < store.len())
    }

    /// Activates the previous document in manifest order. No-op at the
    /// first document or when the active slug is unresolved.
    pub fn previous(
        &mut self,
        gateway: &mut impl HistoryGateway,
        store: &DocumentStore,
    ) -> Option<RouterEffect> {
        if !self.can_go_previous(store) {
            return None;
        }
        let index = self.current_index(store)?;
        let slug = store.get(index - 1)?.slug.clone();
        Some(self.activate(gateway, &slug))
    }

    /// Activates the next document in manifest order. No-op at the last
    /// document or when the active slug is unresolved.
    pub fn next(
        &mut self,
        gateway: &mut impl HistoryGateway,
        store: &DocumentStore,
    ) -> Option<RouterEffect> {
        if !self.can_go_next(store) {
            return None;
        }
        let index = self.current_index(store)?;
        let slug = store.get(index + 1)?.slug.clone();
        Some(self.activate(gateway, &slug))
    }

    /// Computes where to scroll for a deep-linked line after a render.
    ///
    /// Prefers the most specific rendered element containing the matched
    /// line's trimmed text; when the renderer transformed the line beyond
    /// recognition, falls back to a clamped proportional offset. Never
    /// fails.
    pub fn scroll_request(
        line_text: &str,
        line_index: usize,
        root: &RenderedNode,
        total_lines: usize,
        rendered_height: f64,
        flash: Duration,
    ) -> ScrollRequest {
        if let Some(target) = root.find_line_target(line_text.trim()) {
            return ScrollRequest::Element {
                target_text: target.text_content(),
                flash,
            };
        }

        debug!("No rendered element matched line {line_index}, using offset fallback");

        #[allow(clippy::cast_precision_loss)]
        let offset = if total_lines == 0 {
            0.0
        } else {
            (line_index as f64 / total_lines as f64) * rendered_height
        };
        ScrollRequest::Offset(offset.max(0.0))
    }
}
