//! Table-of-contents tracking for the active document.
//!
//! Rebuilt from scratch on every render. Active-heading tracking consumes
//! viewport-intersection events from the host; each rebuild bumps an
//! observation generation so events from observers registered before the
//! rebuild are ignored rather than corrupting the active entry. That is the
//! disconnect-before-rebuild contract: at most one observer generation is
//! ever live.

use crate::dom::RenderedNode;
use crate::types::TocEntry;
use tracing::debug;

/// Fraction of the container height from the top where the activation band
/// begins: a heading counts as current once it crosses into the top fifth.
pub const BAND_TOP: f64 = 0.20;

/// Fraction of the container height from the top where the activation band
/// ends: a heading stops counting once it leaves through the bottom 30%.
pub const BAND_BOTTOM: f64 = 0.70;

/// What the TOC panel should show after a rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TocView {
    /// The document has no rank-2..6 headings; hide the panel entirely.
    /// Distinct from showing an empty list.
    Hidden,
    /// Entries to display, in document order.
    Entries(Vec<TocEntry>),
}

/// A smooth-scroll request for a clicked TOC entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocScroll {
    /// Heading id to scroll to.
    pub heading_id: String,
    /// Pixels to subtract for the fixed header overlay plus margin.
    pub offset_px: u32,
}

/// An intersection event for one observed heading, tagged with the
/// generation of the observer set that produced it.
#[derive(Debug, Clone)]
pub struct IntersectionEvent {
    /// Observer generation the event came from (see
    /// [`TocTracker::generation`]).
    pub generation: u64,
    /// Id of the heading that changed intersection state.
    pub heading_id: String,
    /// Whether the heading entered the activation band.
    pub is_intersecting: bool,
}

/// Tracks headings of the currently rendered document.
#[derive(Debug, Clone, Default)]
pub struct TocTracker {
    entries: Vec<TocEntry>,
    active_id: Option<String>,
    generation: u64,
}

impl TocTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the TOC from rendered content.
    ///
    /// Discards the previous entries and observation generation first, so
    /// callbacks from observers created before this rebuild are dead on
    /// arrival. Headings keep an existing `id` attribute; headings without
    /// one get a synthetic `heading-<index>` stable within this render
    /// pass.
    pub fn rebuild(&mut self, root: &RenderedNode) -> TocView {
        self.generation += 1;
        self.active_id = None;
        self.entries.clear();

        let headings = root.headings();
        if headings.is_empty() {
            debug!("No headings in rendered content, hiding TOC");
            return TocView::Hidden;
        }

        for (index, (node, level)) in headings.into_iter().enumerate() {
            let heading_id = node
                .id
                .clone()
                .unwrap_or_else(|| format!("heading-{index}"));
            self.entries.push(TocEntry {
                heading_id,
                level,
                text: node.text_content().trim().to_string(),
            });
        }

        debug!("Rebuilt TOC with {} entries", self.entries.len());
        TocView::Entries(self.entries.clone())
    }

    /// The current observer generation. The host tags intersection events
    /// with the generation that was current when it registered its
    /// observers.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Current entries (empty when hidden).
    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    /// The currently active heading id, if any heading has intersected.
    pub fn active(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// Applies an intersection event.
    ///
    /// Events from stale generations are ignored. The most recently
    /// intersecting heading becomes the single active entry; all others are
    /// implicitly cleared. Returns the active heading id when the event
    /// changed it.
    pub fn observe(&mut self, event: &IntersectionEvent) -> Option<&str> {
        if event.generation != self.generation {
            debug!(
                "Dropping intersection event from stale generation {} (current {})",
                event.generation, self.generation
            );
            return None;
        }
        if !event.is_intersecting {
            return None;
        }
        if !self.entries.iter().any(|e| e.heading_id == event.heading_id) {
            return None;
        }
        self.active_id = Some(event.heading_id.clone());
        self.active_id.as_deref()
    }

    /// Scroll request for a clicked TOC entry. The controller also replaces
    /// the fragment with the heading id, without a new history entry.
    pub fn scroll_target(
        &self,
        heading_id: &str,
        header_offset_px: u32,
        margin_px: u32,
    ) -> Option<TocScroll> {
        self.entries
            .iter()
            .find(|e| e.heading_id == heading_id)
            .map(|entry| TocScroll {
                heading_id: entry.heading_id.clone(),
                offset_px: header_offset_px + margin_px,
            })
    }
}
