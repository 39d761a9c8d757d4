//! Reversible highlight overlay
//!
//! At most one target is highlighted at a time. Every element the overlay
//! touches gets its six style fragments snapshotted first and a marker set,
//! so removal can put the page back exactly as it was.

pub mod snapshot;
pub mod state;

use tracing::{debug, info, warn};

use crate::page::{
    analysis::scanner::normalize_font_family,
    document::{PageError, PageMut, Priority},
};

pub use snapshot::{FragmentSnapshot, SnapshotTable, StyleFragment};
pub use state::{HighlightState, HighlightStyle, HighlightTarget, DEFAULT_HIGHLIGHT_COLOR};

/// Attribute carrying the highlight marker on page elements.
pub const MARKER_ATTRIBUTE: &str = "data-highlighted";

const PULSE_PROPERTY: &str = "--pulse-color";

/// Which computed colors of an element equal the target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Matched {
    text: bool,
    background: bool,
    border: bool,
    font: bool,
}

impl Matched {
    fn any(self) -> bool {
        self.text || self.background || self.border || self.font
    }
}

/// Owns the highlight state and the snapshots of every element it touched.
#[derive(Debug)]
pub struct HighlightEngine<N> {
    state: HighlightState,
    snapshots: SnapshotTable<N>,
}

impl<N> Default for HighlightEngine<N> {
    fn default() -> Self {
        Self {
            state: HighlightState::Idle,
            snapshots: SnapshotTable::default(),
        }
    }
}

impl<N: Clone + PartialEq + std::fmt::Debug> HighlightEngine<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &HighlightState {
        &self.state
    }

    /// Number of elements currently carrying the overlay.
    pub fn highlighted_count(&self) -> usize {
        self.snapshots.len()
    }

    /// Highlight every element matching `target`, replacing any previous
    /// highlight. Returns the number of matched elements.
    ///
    /// Zero matches still leaves the engine active on `target`.
    pub fn apply<P: PageMut<Node = N>>(
        &mut self,
        page: &mut P,
        target: HighlightTarget,
        style: &HighlightStyle,
    ) -> Result<usize, PageError> {
        self.remove(page);

        let root = page.document_element()?;
        let nodes = page.subtree(&root)?;
        let mut scrolled = false;
        let mut matched_count = 0;

        for node in nodes {
            let tag = page.tag_name(&node).to_lowercase();
            if tag == "html" || tag == "body" {
                continue;
            }
            let matched = match_element(page, &node, &target);
            if !matched.any() {
                continue;
            }

            if !page.is_marked(&node) {
                let snapshot = FragmentSnapshot::capture(page, &node);
                self.snapshots.insert(node.clone(), snapshot);
            }
            paint(page, &node, matched, &style.color);
            page.set_marked(&node, true);
            matched_count += 1;
            debug!("Highlighted <{}> for {}", tag, target);

            if let Some(options) = style.scroll {
                if !scrolled {
                    debug!(
                        "Scrolling <{}> into view, {} to {}",
                        tag, options.behavior, options.block
                    );
                    page.scroll_into_view(&node, options);
                    scrolled = true;
                }
            }
        }

        info!("Highlight on {} matched {} elements", target, matched_count);
        self.state = HighlightState::Active(target);
        Ok(matched_count)
    }

    /// Restore every highlighted element and return to idle. Returns the
    /// number of restored elements; a no-op when idle.
    pub fn remove<P: PageMut<Node = N>>(&mut self, page: &mut P) -> usize {
        let mut restored = 0;
        for (node, snapshot) in self.snapshots.drain() {
            snapshot.restore(page, &node);
            page.remove_inline_style(&node, PULSE_PROPERTY);
            page.set_marked(&node, false);
            restored += 1;
        }

        for node in page.marked_nodes() {
            warn!("Clearing highlight marker without snapshot on {:?}", node);
            page.remove_inline_style(&node, PULSE_PROPERTY);
            page.set_marked(&node, false);
        }

        if self.state.is_active() {
            info!("Highlight removed from {} elements", restored);
        }
        self.state = HighlightState::Idle;
        restored
    }

    /// The page is about to unload or navigate away.
    pub fn on_navigation<P: PageMut<Node = N>>(&mut self, page: &mut P) -> usize {
        if self.state.is_active() {
            info!("Page is navigating, dropping the active highlight");
        }
        self.remove(page)
    }
}

fn match_element<P: PageMut>(page: &P, node: &P::Node, target: &HighlightTarget) -> Matched {
    let value = target.value();
    if value.is_empty() {
        return Matched::default();
    }
    let Some(style) = page.computed_style(node) else {
        return Matched::default();
    };

    match target {
        HighlightTarget::Color(color) => Matched {
            text: style.color == *color,
            background: style.background_color == *color,
            border: style.border_color == *color,
            font: false,
        },
        HighlightTarget::Font(name) => Matched {
            font: normalize_font_family(&style.font_family) == *name,
            ..Default::default()
        },
    }
}

fn paint<P: PageMut>(page: &mut P, node: &P::Node, matched: Matched, color: &str) {
    if matched.text {
        page.set_inline_style(node, "color", color, Priority::Important);
        page.set_inline_style(
            node,
            "text-shadow",
            &format!("0 0 10px {}", color),
            Priority::Important,
        );
        return;
    }

    let ring = format!("3px solid {}", color);
    if matched.background || matched.font {
        page.set_inline_style(node, "outline", &ring, Priority::Important);
    }
    if matched.border {
        page.set_inline_style(node, "border", &ring, Priority::Important);
    }
    page.set_inline_style(node, PULSE_PROPERTY, color, Priority::Normal);
    page.set_inline_style(
        node,
        "box-shadow",
        &format!("0 0 15px {}", color),
        Priority::Important,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{
        css::InlineStyle,
        document::{ComputedStyle, Page},
        memory::{NodeId, StaticPage},
        ScrollOptions,
    };

    const DARK: &str = "rgb(10, 10, 10)";

    struct Fixture {
        page: StaticPage,
        div: NodeId,
        span: NodeId,
        framed: NodeId,
        code: NodeId,
    }

    fn fixture() -> Fixture {
        let mut page = StaticPage::new("https://example.test/", "Fixture");
        let root = page.root();
        let body = page.append_element(
            root,
            "body",
            ComputedStyle::default().with_background(DARK).with_color(DARK),
        );
        page.set_laid_out(body, false);

        let div = page.append_element(body, "div", ComputedStyle::default().with_background(DARK));
        page.set_inline(div, InlineStyle::parse("padding: 4px; outline: 1px dotted red;"));

        let span = page.append_element(
            div,
            "span",
            ComputedStyle::default()
                .with_color(DARK)
                .with_font("\"Fira Code\", monospace", "14px", "400"),
        );
        page.append_text(span, "text");
        page.set_inline(span, InlineStyle::parse("color: rgb(10, 10, 10) !important;"));

        let framed = page.append_element(body, "section", ComputedStyle::default().with_border(DARK));

        let code = page.append_element(
            body,
            "code",
            ComputedStyle::default().with_font("'Fira Code'", "14px", "400"),
        );
        page.append_text(code, "let x = 1;");

        Fixture {
            page,
            div,
            span,
            framed,
            code,
        }
    }

    fn inline_snapshot(page: &StaticPage) -> Vec<String> {
        let root = page.root();
        page.subtree(&root)
            .unwrap()
            .into_iter()
            .map(|node| page.inline(node).to_string())
            .collect()
    }

    #[test]
    fn color_treatments_by_role() {
        let Fixture {
            mut page,
            div,
            span,
            framed,
            ..
        } = fixture();
        let mut engine = HighlightEngine::new();

        let matched = engine
            .apply(
                &mut page,
                HighlightTarget::Color(DARK.into()),
                &HighlightStyle::default(),
            )
            .unwrap();
        assert_eq!(matched, 3);
        assert_eq!(engine.highlighted_count(), 3);

        assert_eq!(page.inline_style(&span, "color"), "#FFFF00");
        assert_eq!(page.inline_style(&span, "text-shadow"), "0 0 10px #FFFF00");
        assert_eq!(page.inline_style(&span, "box-shadow"), "");

        assert_eq!(page.inline_style(&div, "outline"), "3px solid #FFFF00");
        assert_eq!(page.inline_style(&div, "box-shadow"), "0 0 15px #FFFF00");
        assert_eq!(page.inline_style(&div, "--pulse-color"), "#FFFF00");
        assert!(page.inline(div).is_important("outline"));

        assert_eq!(page.inline_style(&framed, "border"), "3px solid #FFFF00");
        assert_eq!(page.inline_style(&framed, "outline"), "");

        let body = page.body().unwrap().unwrap();
        assert!(!page.is_marked(&body));
        assert_eq!(page.marked_nodes(), vec![div, span, framed]);
    }

    #[test]
    fn highlight_then_remove_restores_exactly() {
        let Fixture { mut page, .. } = fixture();
        let before = inline_snapshot(&page);
        let mut engine = HighlightEngine::new();

        engine
            .apply(
                &mut page,
                HighlightTarget::Color(DARK.into()),
                &HighlightStyle::default().with_color(Some("magenta")),
            )
            .unwrap();
        assert_ne!(inline_snapshot(&page), before);

        assert_eq!(engine.remove(&mut page), 3);
        assert_eq!(inline_snapshot(&page), before);
        assert!(page.marked_nodes().is_empty());
        assert_eq!(engine.state(), &HighlightState::Idle);
    }

    #[test]
    fn remove_when_idle_changes_nothing() {
        let Fixture { mut page, .. } = fixture();
        let before = inline_snapshot(&page);
        let mut engine = HighlightEngine::new();
        assert_eq!(engine.remove(&mut page), 0);
        assert_eq!(engine.remove(&mut page), 0);
        assert_eq!(inline_snapshot(&page), before);
    }

    #[test]
    fn no_match_is_still_active() {
        let Fixture { mut page, .. } = fixture();
        let before = inline_snapshot(&page);
        let mut engine = HighlightEngine::new();
        let target = HighlightTarget::Color("rgb(1, 2, 3)".into());

        let matched = engine
            .apply(&mut page, target.clone(), &HighlightStyle::default())
            .unwrap();
        assert_eq!(matched, 0);
        assert_eq!(engine.state(), &HighlightState::Active(target));
        assert_eq!(inline_snapshot(&page), before);
        assert!(page.scroll_log().is_empty());
    }

    #[test]
    fn only_first_match_scrolls() {
        let Fixture { mut page, div, .. } = fixture();
        let mut engine = HighlightEngine::new();
        engine
            .apply(
                &mut page,
                HighlightTarget::Color(DARK.into()),
                &HighlightStyle::default(),
            )
            .unwrap();
        assert_eq!(page.scroll_log(), &[(div, ScrollOptions::default())]);

        let quiet = HighlightStyle {
            scroll: None,
            ..Default::default()
        };
        engine
            .apply(&mut page, HighlightTarget::Color(DARK.into()), &quiet)
            .unwrap();
        assert_eq!(page.scroll_log().len(), 1);
    }

    #[test]
    fn font_mode_matches_family_of_each_element() {
        let Fixture {
            mut page,
            span,
            code,
            ..
        } = fixture();
        let mut engine = HighlightEngine::new();
        let matched = engine
            .apply(
                &mut page,
                HighlightTarget::Font("Fira Code".into()),
                &HighlightStyle::default(),
            )
            .unwrap();
        assert_eq!(matched, 2);
        assert_eq!(page.marked_nodes(), vec![span, code]);
        assert_eq!(page.inline_style(&code, "outline"), "3px solid #FFFF00");
        assert_eq!(page.inline_style(&code, "box-shadow"), "0 0 15px #FFFF00");
    }

    #[test]
    fn font_mode_includes_elements_without_text() {
        let Fixture { mut page, .. } = fixture();
        let root = page.root();
        let body = page.body().unwrap().unwrap();
        let img = page.append_element(
            body,
            "img",
            ComputedStyle::default().with_font("Inter, sans-serif", "16px", "400"),
        );
        assert_eq!(page.text_content(&img), "");
        assert!(page.subtree(&root).unwrap().contains(&img));

        let mut engine = HighlightEngine::new();
        let matched = engine
            .apply(
                &mut page,
                HighlightTarget::Font("Inter".into()),
                &HighlightStyle::default(),
            )
            .unwrap();
        assert_eq!(matched, 1);
        assert!(page.is_marked(&img));
        assert_eq!(page.inline_style(&img, "outline"), "3px solid #FFFF00");
        assert_eq!(page.inline_style(&img, "box-shadow"), "0 0 15px #FFFF00");
    }

    #[test]
    fn new_target_supersedes_previous() {
        let Fixture {
            mut page,
            div,
            code,
            ..
        } = fixture();
        let before = inline_snapshot(&page);
        let mut engine = HighlightEngine::new();
        engine
            .apply(
                &mut page,
                HighlightTarget::Color(DARK.into()),
                &HighlightStyle::default(),
            )
            .unwrap();
        engine
            .apply(
                &mut page,
                HighlightTarget::Font("Fira Code".into()),
                &HighlightStyle::default(),
            )
            .unwrap();

        assert!(!page.is_marked(&div));
        assert_eq!(page.inline(div).to_string(), "padding: 4px; outline: 1px dotted red;");
        assert!(page.is_marked(&code));

        engine.on_navigation(&mut page);
        assert_eq!(inline_snapshot(&page), before);
        assert_eq!(engine.state(), &HighlightState::Idle);
    }

    #[test]
    fn stray_marker_is_cleared_without_touching_style() {
        let Fixture { mut page, div, .. } = fixture();
        page.set_marked(&div, true);
        page.set_inline_style(&div, "--pulse-color", "red", Priority::Normal);

        let mut engine = HighlightEngine::new();
        assert_eq!(engine.remove(&mut page), 0);
        assert!(!page.is_marked(&div));
        assert_eq!(page.inline(div).to_string(), "padding: 4px; outline: 1px dotted red;");
    }

    #[test]
    fn empty_target_matches_nothing() {
        let Fixture { mut page, .. } = fixture();
        let mut engine = HighlightEngine::new();
        let matched = engine
            .apply(
                &mut page,
                HighlightTarget::Color(String::new()),
                &HighlightStyle::default(),
            )
            .unwrap();
        assert_eq!(matched, 0);
    }
}
