use std::fmt;

use crate::page::document::ScrollOptions;

/// Fallback highlight color.
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#FFFF00";

/// What a highlight matches against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HighlightTarget {
    /// A resolved color, compared against text, background and border color.
    Color(String),
    /// A normalized font family name.
    Font(String),
}

impl HighlightTarget {
    pub fn value(&self) -> &str {
        match self {
            HighlightTarget::Color(value) | HighlightTarget::Font(value) => value,
        }
    }
}

impl fmt::Display for HighlightTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighlightTarget::Color(color) => write!(f, "color {}", color),
            HighlightTarget::Font(font) => write!(f, "font {:?}", font),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum HighlightState {
    #[default]
    Idle,
    Active(HighlightTarget),
}

impl HighlightState {
    pub fn is_active(&self) -> bool {
        matches!(self, HighlightState::Active(_))
    }
}

/// How matches are painted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighlightStyle {
    pub color: String,
    /// `None` disables scrolling to the first match.
    pub scroll: Option<ScrollOptions>,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_HIGHLIGHT_COLOR.into(),
            scroll: Some(ScrollOptions::default()),
        }
    }
}

impl HighlightStyle {
    /// Use `color` when given and non-empty, the default otherwise.
    pub fn with_color(mut self, color: Option<&str>) -> Self {
        if let Some(color) = color.filter(|color| !color.is_empty()) {
            self.color = color.to_string();
        }
        self
    }
}
