use serde::{Deserialize, Serialize};

/// One distinct resolved color and where it was seen.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ColorSummaryEntry {
    pub color: String,
    /// Number of (element, role) observations; background, text and border
    /// each count separately.
    pub count: usize,
    /// Distinct lowercase tag names, first-seen order.
    pub elements: Vec<String>,
}

impl ColorSummaryEntry {
    pub fn new(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            count: 0,
            elements: Vec::new(),
        }
    }
}

/// One distinct font family (first entry of the family list).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSummaryEntry {
    pub name: String,
    /// Share of text-bearing elements, e.g. `"42.9%"`.
    pub usage_percent: String,
    pub weights: Vec<String>,
    pub sizes: Vec<String>,
    pub elements: Vec<String>,
    pub count: usize,
}

/// Result of one analysis pass over a page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnalysisReport {
    pub colors: Vec<ColorSummaryEntry>,
    pub fonts: Vec<FontSummaryEntry>,
    pub url: String,
    pub title: String,
}

/// Add `value` unless it is already present, keeping first-seen order.
pub(crate) fn insert_distinct(set: &mut Vec<String>, value: &str) {
    if !set.iter().any(|existing| existing == value) {
        set.push(value.to_string());
    }
}
