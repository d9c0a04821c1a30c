//! The UI controller: glue between user events and the engine.
//!
//! Owns the store, matcher, router, and TOC tracker, and mediates with the
//! host through three narrow traits: [`Renderer`] (the external
//! markdown-to-HTML collaborator), [`HistoryGateway`] (the URL fragment),
//! and [`ViewSurface`] (everything the user sees). Every user interaction
//! arrives as a [`UiEvent`]; every render follows the same pipeline:
//! render, then TOC rebuild, then scroll-to-match, in that order.

use crate::config::ViewerConfig;
use crate::router::{HistoryGateway, Router, RouterEffect, ScrollRequest};
use crate::search::{Matcher, Query, SearchOutcome, highlight};
use crate::store::DocumentStore;
use crate::theme::{Theme, ThemeStore};
use crate::toc::{IntersectionEvent, TocScroll, TocTracker, TocView};
use crate::types::{MatchedLine, SearchResult};
use crate::{Error, Result, dom::RenderedNode};
use std::time::Duration;
use tokio::time::{Instant, interval, sleep};
use tracing::{debug, info, warn};

/// The external markdown renderer collaborator.
///
/// `render` is a pure function from markdown to an HTML string. The
/// library may load late; `is_ready` gates rendering until it arrives (or
/// the readiness wait gives up and the viewer degrades to raw text).
pub trait Renderer {
    /// Whether the rendering library has become available.
    fn is_ready(&self) -> bool;
    /// Renders a markdown document to HTML.
    fn render(&self, markdown: &str) -> Result<String>;
    /// Renders a one-line markdown snippet. Defaults to `render`.
    fn render_inline(&self, markdown: &str) -> Result<String> {
        self.render(markdown)
    }
}

/// Host-side presentation surface.
///
/// The controller never touches a DOM; it hands the host finished values
/// and the host applies them. `show_content` returns the host's snapshot
/// of the rendered output so the TOC rebuild and scroll-target lookup can
/// run on it.
pub trait ViewSurface {
    /// Replaces the content pane and returns the rendered snapshot.
    fn show_content(&mut self, html: &str) -> RenderedNode;
    /// Total height of the rendered content, for the offset fallback.
    fn rendered_height(&self) -> f64;
    /// Replaces the content pane with a failure message.
    fn show_error(&mut self, message: &str);
    /// Updates the search panel.
    fn show_search(&mut self, display: SearchDisplay);
    /// Shows or hides the TOC panel.
    fn show_toc(&mut self, view: &TocView);
    /// Marks exactly one TOC entry active (or none).
    fn set_active_heading(&mut self, heading_id: Option<&str>);
    /// Scrolls to a deep-linked match.
    fn scroll_to_match(&mut self, request: &ScrollRequest);
    /// Smooth-scrolls to a clicked TOC heading.
    fn scroll_to_heading(&mut self, scroll: &TocScroll);
    /// Applies the theme.
    fn apply_theme(&mut self, theme: Theme);
}

/// What the search panel should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchDisplay {
    /// Query under the minimum length: show a "keep typing" hint.
    Hint,
    /// Scan pending: show the searching indicator.
    Searching,
    /// Scannable query with no matches.
    Empty,
    /// Matches to list.
    Results(Vec<ResultItem>),
}

/// One rendered search result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultItem {
    /// Slug of the matched document.
    pub slug: String,
    /// Title with query terms wrapped in `<mark>`.
    pub title_html: String,
    /// First matched line with query terms wrapped in `<mark>`, when any
    /// line matched.
    pub snippet_html: Option<String>,
    /// Line index of the snippet, for deep-linking.
    pub line_index: Option<usize>,
}

/// A user interaction, delivered by the host event loop.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// The search input changed.
    QueryInput(String),
    /// A search result row was clicked.
    ResultSelected {
        /// Slug of the selected document.
        slug: String,
        /// Snippet line to deep-link to, when the result had matched lines.
        line_index: Option<usize>,
    },
    /// The URL fragment changed (without the leading `#`).
    HashChange(String),
    /// A TOC entry was clicked.
    TocClick(String),
    /// A heading crossed the activation band.
    HeadingIntersection(IntersectionEvent),
    /// The next-document pagination control.
    NextPage,
    /// The previous-document pagination control.
    PrevPage,
    /// The theme toggle.
    ThemeToggle,
}

/// Deep-link state carried from a result selection to the matching render.
#[derive(Debug, Clone)]
struct PendingScroll {
    slug: String,
    line: MatchedLine,
}

/// Owns the engine state and reacts to [`UiEvent`]s.
pub struct ViewerController {
    config: ViewerConfig,
    store: DocumentStore,
    matcher: Matcher,
    router: Router,
    tracker: TocTracker,
    theme_store: ThemeStore,
    theme: Theme,
    renderer_ready: bool,
    last_results: Vec<SearchResult>,
    pending_scroll: Option<PendingScroll>,
}

impl ViewerController {
    /// Creates a controller over a loaded store.
    pub fn new(config: ViewerConfig, store: DocumentStore, theme_store: ThemeStore) -> Self {
        let theme = theme_store.load();
        Self {
            config,
            store,
            matcher: Matcher::new(),
            router: Router::new(),
            tracker: TocTracker::new(),
            theme_store,
            theme,
            renderer_ready: false,
            last_results: Vec::new(),
            pending_scroll: None,
        }
    }

    /// The loaded store.
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// The current theme.
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Whether the renderer became ready during bootstrap.
    pub const fn renderer_ready(&self) -> bool {
        self.renderer_ready
    }

    /// The TOC tracker (hosts read the generation when registering
    /// observers).
    pub const fn tracker(&self) -> &TocTracker {
        &self.tracker
    }

    /// Waits for the external renderer to become available.
    ///
    /// Polls at `render.ready_poll_ms` until `render.ready_timeout_secs`
    /// elapses, then gives up with [`Error::Timeout`]. Callers treat the
    /// timeout as soft: the viewer continues with raw-text rendering.
    pub async fn wait_for_renderer(&mut self, renderer: &impl Renderer) -> Result<()> {
        let deadline =
            Instant::now() + Duration::from_secs(self.config.render.ready_timeout_secs);
        let mut ticker = interval(Duration::from_millis(self.config.render.ready_poll_ms));

        loop {
            ticker.tick().await;
            if renderer.is_ready() {
                self.renderer_ready = true;
                debug!("Renderer ready");
                return Ok(());
            }
            if Instant::now() >= deadline {
                self.renderer_ready = false;
                return Err(Error::Timeout(
                    "Renderer library never became available".into(),
                ));
            }
        }
    }

    /// Bootstraps the viewer: renderer readiness, theme, and the initial
    /// document.
    ///
    /// An empty or unknown startup fragment falls back to the first
    /// document in manifest order; that is a fallback, not an error.
    pub async fn bootstrap(
        &mut self,
        renderer: &impl Renderer,
        history: &mut impl HistoryGateway,
        surface: &mut impl ViewSurface,
    ) {
        if let Err(e) = self.wait_for_renderer(renderer).await {
            warn!("Continuing degraded: {e}");
        }

        surface.apply_theme(self.theme);

        let fragment = history.fragment();
        let slug = match self.store.find_by_slug(&fragment) {
            Some(doc) => doc.slug.clone(),
            None => {
                let Some(first) = self.store.first() else {
                    surface.show_error("No documents are available");
                    return;
                };
                history.replace_fragment(&first.slug);
                first.slug.clone()
            },
        };

        self.router.on_fragment_change(&slug);
        self.render_document(&slug, renderer, surface);
        info!("Viewer ready at '{slug}'");
    }

    /// Dispatches one user event.
    pub async fn handle_event(
        &mut self,
        event: UiEvent,
        renderer: &impl Renderer,
        history: &mut impl HistoryGateway,
        surface: &mut impl ViewSurface,
    ) {
        match event {
            UiEvent::QueryInput(input) => self.handle_query(&input, surface).await,
            UiEvent::ResultSelected { slug, line_index } => {
                self.handle_result_selected(&slug, line_index, renderer, history, surface);
            },
            UiEvent::HashChange(fragment) => {
                let slug = self.router.on_fragment_change(&fragment);
                self.render_document(&slug, renderer, surface);
            },
            UiEvent::TocClick(heading_id) => {
                if let Some(scroll) = self.tracker.scroll_target(
                    &heading_id,
                    self.config.scroll.header_offset_px,
                    self.config.scroll.margin_px,
                ) {
                    surface.scroll_to_heading(&scroll);
                    // In-page anchor: replace, never push.
                    history.replace_fragment(&heading_id);
                }
            },
            UiEvent::HeadingIntersection(intersection) => {
                if self.tracker.observe(&intersection).is_some() {
                    surface.set_active_heading(self.tracker.active());
                }
            },
            UiEvent::NextPage => {
                if let Some(RouterEffect::Rerender(slug)) =
                    self.router.next(history, &self.store)
                {
                    self.render_document(&slug, renderer, surface);
                }
            },
            UiEvent::PrevPage => {
                if let Some(RouterEffect::Rerender(slug)) =
                    self.router.previous(history, &self.store)
                {
                    self.render_document(&slug, renderer, surface);
                }
            },
            UiEvent::ThemeToggle => {
                self.theme = self.theme.toggled();
                if let Err(e) = self.theme_store.save(self.theme) {
                    warn!("Failed to persist theme preference: {e}");
                }
                surface.apply_theme(self.theme);
            },
        }
    }

    /// Runs a search after the debounce pause.
    ///
    /// The searching indicator is shown before the pause so it can paint
    /// before the synchronous scan blocks the loop.
    async fn handle_query(&mut self, input: &str, surface: &mut impl ViewSurface) {
        let query = Query::parse(input);
        if !query.is_scannable()
            || query.raw.chars().count() < self.config.search.min_query_len
        {
            self.last_results.clear();
            surface.show_search(SearchDisplay::Hint);
            return;
        }

        surface.show_search(SearchDisplay::Searching);
        sleep(Duration::from_millis(self.config.search.debounce_ms)).await;

        match self.matcher.search(&self.store, input) {
            SearchOutcome::TooShort => {
                self.last_results.clear();
                surface.show_search(SearchDisplay::Hint);
            },
            SearchOutcome::NoMatches => {
                self.last_results.clear();
                surface.show_search(SearchDisplay::Empty);
            },
            SearchOutcome::Results(results) => {
                let items = results
                    .iter()
                    .map(|result| ResultItem {
                        slug: result.slug.clone(),
                        title_html: highlight(&result.title, &query.terms),
                        snippet_html: result
                            .snippet()
                            .map(|line| highlight(&line.text, &query.terms)),
                        line_index: result.snippet().map(|line| line.line_index),
                    })
                    .collect();
                self.last_results = results;
                surface.show_search(SearchDisplay::Results(items));
            },
        }
    }

    /// Deep-links into a document from a search result.
    fn handle_result_selected(
        &mut self,
        slug: &str,
        line_index: Option<usize>,
        renderer: &impl Renderer,
        history: &mut impl HistoryGateway,
        surface: &mut impl ViewSurface,
    ) {
        self.pending_scroll = line_index.and_then(|index| {
            self.last_results
                .iter()
                .find(|r| r.slug == slug)
                .and_then(|r| r.matched_lines.iter().find(|l| l.line_index == index))
                .map(|line| PendingScroll {
                    slug: slug.to_string(),
                    line: line.clone(),
                })
        });

        match self.router.activate(history, slug) {
            RouterEffect::FragmentSet => {
                // Render happens when the fragment-change event arrives;
                // the pending scroll survives until then.
            },
            RouterEffect::Rerender(slug) => self.render_document(&slug, renderer, surface),
        }
    }

    /// The render pipeline: render, TOC rebuild, then scroll-to-match.
    fn render_document(
        &mut self,
        slug: &str,
        renderer: &impl Renderer,
        surface: &mut impl ViewSurface,
    ) {
        let Some(doc) = self.store.find_by_slug(slug) else {
            // Soft failure: state stays pointed at the unresolved slug.
            surface.show_error(&format!("No document found for '{slug}'"));
            return;
        };

        let html = if self.renderer_ready {
            match renderer.render(&doc.content) {
                Ok(html) => html,
                Err(e) => {
                    warn!("Renderer failed for '{slug}', showing raw text: {e}");
                    raw_fallback(&doc.content)
                },
            }
        } else {
            raw_fallback(&doc.content)
        };

        let total_lines = doc.content.lines().count();
        let snapshot = surface.show_content(&html);

        let view = self.tracker.rebuild(&snapshot);
        surface.show_toc(&view);

        if let Some(pending) = self.pending_scroll.take() {
            if pending.slug == slug {
                let request = Router::scroll_request(
                    &pending.line.text,
                    pending.line.line_index,
                    &snapshot,
                    total_lines,
                    surface.rendered_height(),
                    Duration::from_millis(self.config.scroll.flash_ms),
                );
                surface.scroll_to_match(&request);
            } else {
                // Selection raced a navigation to another document.
                self.pending_scroll = Some(pending);
            }
        }
    }
}

/// Degraded rendering: the raw markdown in a preformatted block.
fn raw_fallback(content: &str) -> String {
    format!("<pre>{content}</pre>")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::types::{DEFAULT_SECTION, Document, slugify};
    use chrono::Utc;

    struct FakeRenderer {
        ready: bool,
        fail: bool,
    }

    impl Renderer for FakeRenderer {
        fn is_ready(&self) -> bool {
            self.ready
        }

        fn render(&self, markdown: &str) -> Result<String> {
            if self.fail {
                return Err(Error::Render("renderer exploded".into()));
            }
            Ok(format!("<article>{markdown}</article>"))
        }
    }

    #[derive(Default)]
    struct FakeHistory {
        fragment: String,
        pushes: Vec<String>,
        replaces: Vec<String>,
    }

    impl HistoryGateway for FakeHistory {
        fn fragment(&self) -> String {
            self.fragment.clone()
        }

        fn set_fragment(&mut self, fragment: &str) {
            self.fragment = fragment.to_string();
            self.pushes.push(fragment.to_string());
        }

        fn replace_fragment(&mut self, fragment: &str) {
            self.fragment = fragment.to_string();
            self.replaces.push(fragment.to_string());
        }
    }

    /// Records every effect; "parses" HTML by wrapping it in a single
    /// element whose text is the HTML string, unless a test presets a
    /// richer snapshot.
    #[derive(Default)]
    struct FakeSurface {
        contents: Vec<String>,
        errors: Vec<String>,
        searches: Vec<SearchDisplay>,
        toc_views: Vec<TocView>,
        active_headings: Vec<Option<String>>,
        match_scrolls: Vec<ScrollRequest>,
        heading_scrolls: Vec<TocScroll>,
        themes: Vec<Theme>,
        next_snapshot: Option<RenderedNode>,
        height: f64,
    }

    impl ViewSurface for FakeSurface {
        fn show_content(&mut self, html: &str) -> RenderedNode {
            self.contents.push(html.to_string());
            self.next_snapshot
                .clone()
                .unwrap_or_else(|| RenderedNode::element("article").with_text(html))
        }

        fn rendered_height(&self) -> f64 {
            self.height
        }

        fn show_error(&mut self, message: &str) {
            self.errors.push(message.to_string());
        }

        fn show_search(&mut self, display: SearchDisplay) {
            self.searches.push(display);
        }

        fn show_toc(&mut self, view: &TocView) {
            self.toc_views.push(view.clone());
        }

        fn set_active_heading(&mut self, heading_id: Option<&str>) {
            self.active_headings.push(heading_id.map(str::to_string));
        }

        fn scroll_to_match(&mut self, request: &ScrollRequest) {
            self.match_scrolls.push(request.clone());
        }

        fn scroll_to_heading(&mut self, scroll: &TocScroll) {
            self.heading_scrolls.push(scroll.clone());
        }

        fn apply_theme(&mut self, theme: Theme) {
            self.themes.push(theme);
        }
    }

    fn doc(id: usize, title: &str, content: &str) -> Document {
        Document {
            id,
            title: title.to_string(),
            section: DEFAULT_SECTION.to_string(),
            path: format!("docs/{id}.md"),
            slug: slugify(title),
            content: content.to_string(),
            sha256: String::new(),
            fetched_at: Utc::now(),
        }
    }

    fn controller() -> (ViewerController, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::from_documents(vec![
            doc(0, "Getting Started", "# Getting Started\nInstall the tool."),
            doc(1, "API", "# API\nReturns the user id for this session"),
            doc(2, "FAQ", "# FAQ\nCommon questions."),
        ]);
        let theme_store = ThemeStore::with_path(dir.path().join("theme.toml"));
        let controller = ViewerController::new(ViewerConfig::default(), store, theme_store);
        (controller, dir)
    }

    #[tokio::test(start_paused = true)]
    async fn test_bootstrap_falls_back_to_first_document() {
        let (mut controller, _dir) = controller();
        let renderer = FakeRenderer { ready: true, fail: false };
        let mut history = FakeHistory::default();
        let mut surface = FakeSurface::default();

        controller.bootstrap(&renderer, &mut history, &mut surface).await;

        assert!(controller.renderer_ready());
        assert_eq!(history.replaces, vec!["getting-started"]);
        assert_eq!(controller.router_slug(), "getting-started");
        assert_eq!(surface.contents.len(), 1);
        assert!(surface.contents[0].contains("Install the tool."));
        // Render is always followed by a TOC rebuild.
        assert_eq!(surface.toc_views.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bootstrap_honors_known_fragment() {
        let (mut controller, _dir) = controller();
        let renderer = FakeRenderer { ready: true, fail: false };
        let mut history = FakeHistory {
            fragment: "faq".into(),
            ..FakeHistory::default()
        };
        let mut surface = FakeSurface::default();

        controller.bootstrap(&renderer, &mut history, &mut surface).await;

        assert!(history.replaces.is_empty());
        assert_eq!(controller.router_slug(), "faq");
        assert!(surface.contents[0].contains("Common questions."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_renderer_timeout_degrades_to_raw_text() {
        let (mut controller, _dir) = controller();
        let renderer = FakeRenderer { ready: false, fail: false };
        let mut history = FakeHistory::default();
        let mut surface = FakeSurface::default();

        controller.bootstrap(&renderer, &mut history, &mut surface).await;

        assert!(!controller.renderer_ready());
        // Degraded mode shows preformatted raw text, not an error page.
        assert!(surface.errors.is_empty());
        assert!(surface.contents[0].starts_with("<pre>"));
    }

    #[tokio::test]
    async fn test_render_failure_degrades_to_raw_text() {
        let (mut controller, _dir) = controller();
        controller.renderer_ready = true;
        let renderer = FakeRenderer { ready: true, fail: true };
        let mut history = FakeHistory::default();
        let mut surface = FakeSurface::default();

        controller
            .handle_event(
                UiEvent::HashChange("api".into()),
                &renderer,
                &mut history,
                &mut surface,
            )
            .await;

        assert!(surface.errors.is_empty());
        assert!(surface.contents[0].starts_with("<pre>"));
        assert!(surface.contents[0].contains("user id"));
    }

    #[tokio::test]
    async fn test_unknown_fragment_surfaces_not_found() {
        let (mut controller, _dir) = controller();
        let renderer = FakeRenderer { ready: true, fail: false };
        let mut history = FakeHistory::default();
        let mut surface = FakeSurface::default();

        controller
            .handle_event(
                UiEvent::HashChange("missing-doc".into()),
                &renderer,
                &mut history,
                &mut surface,
            )
            .await;

        assert_eq!(surface.errors.len(), 1);
        assert!(surface.errors[0].contains("missing-doc"));
        // State stays pointed at the unresolved slug.
        assert_eq!(controller.router_slug(), "missing-doc");
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_flow_hint_searching_results() {
        let (mut controller, _dir) = controller();
        let renderer = FakeRenderer { ready: true, fail: false };
        let mut history = FakeHistory::default();
        let mut surface = FakeSurface::default();

        controller
            .handle_event(UiEvent::QueryInput("a".into()), &renderer, &mut history, &mut surface)
            .await;
        assert_eq!(surface.searches, vec![SearchDisplay::Hint]);

        controller
            .handle_event(
                UiEvent::QueryInput("user id".into()),
                &renderer,
                &mut history,
                &mut surface,
            )
            .await;

        assert_eq!(surface.searches.len(), 3);
        assert_eq!(surface.searches[1], SearchDisplay::Searching);
        let SearchDisplay::Results(items) = &surface.searches[2] else {
            panic!("expected results");
        };
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].slug, "api");
        assert_eq!(
            items[0].snippet_html.as_deref(),
            Some("Returns the <mark>user</mark> <mark>id</mark> for this session")
        );
        assert_eq!(items[0].line_index, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_no_matches_is_empty_not_hint() {
        let (mut controller, _dir) = controller();
        let renderer = FakeRenderer { ready: true, fail: false };
        let mut history = FakeHistory::default();
        let mut surface = FakeSurface::default();

        controller
            .handle_event(
                UiEvent::QueryInput("zzqqxx".into()),
                &renderer,
                &mut history,
                &mut surface,
            )
            .await;

        assert_eq!(surface.searches.last(), Some(&SearchDisplay::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_selection_deep_links_after_fragment_change() {
        let (mut controller, _dir) = controller();
        let renderer = FakeRenderer { ready: true, fail: false };
        let mut history = FakeHistory::default();
        let mut surface = FakeSurface::default();

        controller
            .handle_event(
                UiEvent::QueryInput("user id".into()),
                &renderer,
                &mut history,
                &mut surface,
            )
            .await;

        surface.next_snapshot = Some(
            RenderedNode::element("article").with_child(
                RenderedNode::element("p").with_text("Returns the user id for this session"),
            ),
        );
        surface.height = 1000.0;

        controller
            .handle_event(
                UiEvent::ResultSelected { slug: "api".into(), line_index: Some(1) },
                &renderer,
                &mut history,
                &mut surface,
            )
            .await;
        // Activation goes through the fragment; no render yet.
        assert_eq!(history.pushes, vec!["api"]);
        assert!(surface.contents.is_empty());

        controller
            .handle_event(
                UiEvent::HashChange("api".into()),
                &renderer,
                &mut history,
                &mut surface,
            )
            .await;

        assert_eq!(surface.contents.len(), 1);
        assert_eq!(surface.match_scrolls.len(), 1);
        match &surface.match_scrolls[0] {
            ScrollRequest::Element { target_text, .. } => {
                assert!(target_text.contains("user id"));
            },
            ScrollRequest::Offset(_) => panic!("expected element scroll"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_deep_link_offset_fallback_when_line_vanishes() {
        let (mut controller, _dir) = controller();
        let renderer = FakeRenderer { ready: true, fail: false };
        let mut history = FakeHistory::default();
        let mut surface = FakeSurface::default();

        controller
            .handle_event(
                UiEvent::QueryInput("user id".into()),
                &renderer,
                &mut history,
                &mut surface,
            )
            .await;

        // Snapshot without the matched text anywhere.
        surface.next_snapshot = Some(RenderedNode::element("article"));
        surface.height = 800.0;

        controller
            .handle_event(
                UiEvent::ResultSelected { slug: "api".into(), line_index: Some(1) },
                &renderer,
                &mut history,
                &mut surface,
            )
            .await;
        controller
            .handle_event(
                UiEvent::HashChange("api".into()),
                &renderer,
                &mut history,
                &mut surface,
            )
            .await;

        match surface.match_scrolls[0] {
            // Line 1 of 2 lines, 800px tall.
            ScrollRequest::Offset(offset) => assert!((offset - 400.0).abs() < f64::EPSILON),
            ScrollRequest::Element { .. } => panic!("expected offset fallback"),
        }
    }

    #[tokio::test]
    async fn test_reactivating_same_slug_rerenders() {
        let (mut controller, _dir) = controller();
        let renderer = FakeRenderer { ready: true, fail: false };
        let mut history = FakeHistory {
            fragment: "faq".into(),
            ..FakeHistory::default()
        };
        let mut surface = FakeSurface::default();
        controller.router.on_fragment_change("faq");

        controller
            .handle_event(
                UiEvent::ResultSelected { slug: "faq".into(), line_index: None },
                &renderer,
                &mut history,
                &mut surface,
            )
            .await;

        // No fragment change fired, yet the content pane refreshed.
        assert!(history.pushes.is_empty());
        assert_eq!(surface.contents.len(), 1);
        assert_eq!(surface.toc_views.len(), 1);
    }

    #[tokio::test]
    async fn test_toc_click_scrolls_and_replaces_fragment() {
        let (mut controller, _dir) = controller();
        let renderer = FakeRenderer { ready: true, fail: false };
        let mut history = FakeHistory::default();
        let mut surface = FakeSurface::default();

        surface.next_snapshot = Some(
            RenderedNode::element("article")
                .with_child(RenderedNode::element("h2").with_text("Intro")),
        );
        controller
            .handle_event(
                UiEvent::HashChange("faq".into()),
                &renderer,
                &mut history,
                &mut surface,
            )
            .await;

        controller
            .handle_event(
                UiEvent::TocClick("heading-0".into()),
                &renderer,
                &mut history,
                &mut surface,
            )
            .await;

        assert_eq!(surface.heading_scrolls.len(), 1);
        assert_eq!(surface.heading_scrolls[0].offset_px, 72);
        // Heading anchors replace the fragment, never push.
        assert_eq!(history.replaces, vec!["heading-0"]);
        assert!(history.pushes.is_empty());
    }

    #[tokio::test]
    async fn test_intersection_updates_single_active_heading() {
        let (mut controller, _dir) = controller();
        let renderer = FakeRenderer { ready: true, fail: false };
        let mut history = FakeHistory::default();
        let mut surface = FakeSurface::default();

        surface.next_snapshot = Some(
            RenderedNode::element("article")
                .with_child(RenderedNode::element("h2").with_text("Intro"))
                .with_child(RenderedNode::element("h3").with_text("Details")),
        );
        controller
            .handle_event(
                UiEvent::HashChange("faq".into()),
                &renderer,
                &mut history,
                &mut surface,
            )
            .await;

        let generation = controller.tracker().generation();
        controller
            .handle_event(
                UiEvent::HeadingIntersection(IntersectionEvent {
                    generation,
                    heading_id: "heading-1".into(),
                    is_intersecting: true,
                }),
                &renderer,
                &mut history,
                &mut surface,
            )
            .await;

        assert_eq!(surface.active_headings, vec![Some("heading-1".to_string())]);
    }

    #[tokio::test]
    async fn test_pagination_events() {
        let (mut controller, _dir) = controller();
        let renderer = FakeRenderer { ready: true, fail: false };
        let mut history = FakeHistory {
            fragment: "getting-started".into(),
            ..FakeHistory::default()
        };
        let mut surface = FakeSurface::default();
        controller.router.on_fragment_change("getting-started");

        // Previous at index 0 is a no-op.
        controller
            .handle_event(UiEvent::PrevPage, &renderer, &mut history, &mut surface)
            .await;
        assert!(history.pushes.is_empty());

        controller
            .handle_event(UiEvent::NextPage, &renderer, &mut history, &mut surface)
            .await;
        assert_eq!(history.pushes, vec!["api"]);
    }

    #[tokio::test]
    async fn test_theme_toggle_persists() {
        let (mut controller, dir) = controller();
        let renderer = FakeRenderer { ready: true, fail: false };
        let mut history = FakeHistory::default();
        let mut surface = FakeSurface::default();

        controller
            .handle_event(UiEvent::ThemeToggle, &renderer, &mut history, &mut surface)
            .await;

        assert_eq!(surface.themes, vec![Theme::Dark]);
        assert_eq!(controller.theme(), Theme::Dark);

        let reloaded = ThemeStore::with_path(dir.path().join("theme.toml")).load();
        assert_eq!(reloaded, Theme::Dark);
    }

    impl ViewerController {
        fn router_slug(&self) -> &str {
            self.router.active_slug()
        }
    }
}
