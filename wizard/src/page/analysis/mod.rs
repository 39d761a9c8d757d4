//! Style analysis of a page
//!
//! One walk over the element tree, one [`StyleSample`] per element, fed into
//! a [`ColorTally`] and a [`FontTally`]. The standalone aggregators run the
//! same tallies over an arbitrary root.

pub mod aggregate;
pub mod extractor;
pub mod scanner;

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    page::document::{Page, PageError},
    types::{AnalysisReport, ColorSummaryEntry, FontSummaryEntry},
};

pub use aggregate::{ColorTally, FontTally};
pub use extractor::{extract, StyleSample};
pub use scanner::{has_rendered_text, is_visible_color, normalize_font_family};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Failed to walk the page: {0}")]
    Page(#[from] PageError),
}

/// Colors used by `root` and its descendants, most used first.
///
/// Elements without a layout box are skipped, except the body container.
pub fn aggregate_colors<P: Page>(
    page: &P,
    root: &P::Node,
) -> Result<Vec<ColorSummaryEntry>, AnalysisError> {
    let body = page.body()?;
    let mut tally = ColorTally::new();
    for node in page.subtree(root)? {
        if !counts_for_colors(page, &node, body.as_ref()) {
            continue;
        }
        tally.observe(&extract(page, &node));
    }
    Ok(tally.finish())
}

/// Font families of the text-bearing elements under `root`, most used first.
pub fn aggregate_fonts<P: Page>(
    page: &P,
    root: &P::Node,
) -> Result<Vec<FontSummaryEntry>, AnalysisError> {
    let mut tally = FontTally::new();
    for node in page.subtree(root)? {
        tally.observe(&extract(page, &node));
    }
    Ok(tally.finish())
}

/// Full report: colors over the whole document, fonts over the body.
///
/// Each element is read once; the result matches running
/// [`aggregate_colors`] on the document element and [`aggregate_fonts`] on
/// the body. Any traversal failure fails the whole report.
pub fn analyze<P: Page>(page: &P) -> Result<AnalysisReport, AnalysisError> {
    let document_element = page.document_element()?;
    let body = page.body()?;
    let nodes = page.subtree(&document_element)?;
    info!("Analyzing {} elements", nodes.len());

    let mut colors = ColorTally::new();
    let mut fonts = FontTally::new();
    let mut text_bearing = 0;

    for node in &nodes {
        let sample = extract(page, node);
        if counts_for_colors(page, node, body.as_ref()) {
            colors.observe(&sample);
        }
        let in_body = body
            .as_ref()
            .is_some_and(|body| page.contains(body, node));
        if in_body && fonts.observe(&sample) {
            text_bearing += 1;
        }
    }
    debug!("{} text-bearing elements with a font family", text_bearing);

    let report = AnalysisReport {
        colors: colors.finish(),
        fonts: fonts.finish(),
        url: page.url()?,
        title: page.title(),
    };
    info!(
        "Analysis finished: {} colors, {} fonts",
        report.colors.len(),
        report.fonts.len()
    );
    Ok(report)
}

fn counts_for_colors<P: Page>(page: &P, node: &P::Node, body: Option<&P::Node>) -> bool {
    page.is_laid_out(node) || body.is_some_and(|body| body == node)
}
