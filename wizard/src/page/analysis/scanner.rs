//! Filters and normalization shared by the analysis passes

use crate::page::css::ZERO_ALPHA;

const TRANSPARENT: &str = "transparent";

/// Whether a resolved color string is worth reporting.
///
/// Only the zero-alpha sentinel and the `transparent` keyword are rejected;
/// partially transparent colors count as visible.
pub fn is_visible_color(value: &str) -> bool {
    !value.is_empty() && value != ZERO_ALPHA && value != TRANSPARENT
}

/// Whether an element renders any non-whitespace text.
pub fn has_rendered_text(text: &str) -> bool {
    !text.trim().is_empty()
}

/// Reduce a family list to the name used as aggregation key: first entry,
/// quotes removed, whitespace trimmed.
pub fn normalize_font_family(family: &str) -> String {
    family
        .split(',')
        .next()
        .unwrap_or_default()
        .replace(['\'', '"'], "")
        .trim()
        .to_string()
}

/// Render `count / total` as a one-decimal percentage with a trailing `%`.
///
/// The exact binary value is rounded, so `0.15` (stored just below) gives
/// `0.1%`. A one-decimal tie cannot be represented, so no tie rule applies.
pub fn usage_percent(count: usize, total: usize) -> String {
    let percent = count as f64 / total as f64 * 100.0;
    format!("{:.1}%", percent)
}
