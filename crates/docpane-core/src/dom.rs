//! Host-built snapshot of rendered document content.
//!
//! The engine never touches a live DOM. After the external renderer runs,
//! the host hands over a [`RenderedNode`] tree describing the rendered
//! output; heading collection and scroll-target lookup operate on that
//! snapshot, which keeps navigation and TOC logic testable without a
//! browser.

/// One element (or text run) of rendered document content.
#[derive(Debug, Clone, Default)]
pub struct RenderedNode {
    /// Lowercase tag name; empty for plain text runs.
    pub tag: String,
    /// The element's `id` attribute, when present.
    pub id: Option<String>,
    /// Direct text of this node (not including descendants).
    pub text: Option<String>,
    /// Child nodes in document order.
    pub children: Vec<RenderedNode>,
}

impl RenderedNode {
    /// Builds an element node.
    pub fn element(tag: &str) -> Self {
        Self {
            tag: tag.to_lowercase(),
            ..Self::default()
        }
    }

    /// Builds a text run.
    pub fn text_run(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Self::default()
        }
    }

    /// Sets the `id` attribute.
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Sets direct text.
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    /// Appends a child.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Concatenated text of this node and all descendants, in document
    /// order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Number of descendant nodes (excluding `self`).
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }

    /// Visits this node and every descendant in document order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Self)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Collects heading elements of rank 2 through 6 in document order.
    ///
    /// Rank 1 is the document title and stays out of the TOC by design.
    pub fn headings(&self) -> Vec<(&Self, u8)> {
        let mut found = Vec::new();
        self.walk(&mut |node| {
            if let Some(level) = heading_level(&node.tag) {
                if (2..=6).contains(&level) {
                    found.push((node, level));
                }
            }
        });
        found
    }

    /// Finds the most specific node whose text content contains `needle`:
    /// among containing nodes, the one with the fewest descendants.
    ///
    /// Returns `None` when nothing in the tree contains the needle (for
    /// example when markdown rendering transformed the line beyond
    /// recognition); callers fall back to an approximate offset.
    pub fn find_line_target(&self, needle: &str) -> Option<&Self> {
        let needle = needle.trim();
        if needle.is_empty() {
            return None;
        }

        let mut best: Option<(&Self, usize)> = None;
        self.walk(&mut |node| {
            // Text runs are not scroll targets; elements are.
            if node.tag.is_empty() {
                return;
            }
            if node.text_content().contains(needle) {
                let count = node.descendant_count();
                if best.is_none_or(|(_, best_count)| count < best_count) {
                    best = Some((node, count));
                }
            }
        });
        best.map(|(node, _)| node)
    }
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn rendered_doc() -> RenderedNode {
        RenderedNode::element("article")
            .with_child(RenderedNode::element("h1").with_text("Title"))
            .with_child(RenderedNode::element("h2").with_text("Intro"))
            .with_child(
                RenderedNode::element("p")
                    .with_child(RenderedNode::text_run("Returns the "))
                    .with_child(RenderedNode::element("code").with_text("user id"))
                    .with_child(RenderedNode::text_run(" for this session")),
            )
            .with_child(RenderedNode::element("h3").with_id("details").with_text("Details"))
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let doc = rendered_doc();
        assert!(doc.text_content().contains("Returns the user id for this session"));
    }

    #[test]
    fn test_headings_skip_h1() {
        let doc = rendered_doc();
        let headings = doc.headings();
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].1, 2);
        assert_eq!(headings[0].0.text.as_deref(), Some("Intro"));
        assert_eq!(headings[1].1, 3);
        assert_eq!(headings[1].0.id.as_deref(), Some("details"));
    }

    #[test]
    fn test_find_line_target_prefers_most_specific() {
        let doc = rendered_doc();
        // Both <article> and <p> contain the needle; <p> has fewer
        // descendants and wins. <code> alone does not contain the full line.
        let target = doc
            .find_line_target("Returns the user id for this session")
            .unwrap();
        assert_eq!(target.tag, "p");
    }

    #[test]
    fn test_find_line_target_missing_text() {
        let doc = rendered_doc();
        assert!(doc.find_line_target("not in this document").is_none());
        assert!(doc.find_line_target("   ").is_none());
    }

    #[test]
    fn test_descendant_count() {
        let doc = RenderedNode::element("div")
            .with_child(RenderedNode::element("p").with_child(RenderedNode::text_run("x")));
        assert_eq!(doc.descendant_count(), 2);
    }
}
