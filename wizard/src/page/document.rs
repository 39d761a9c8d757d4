//! Styled element tree abstraction
//!
//! The probe never talks to a concrete DOM. Reads go through [`Page`], and the
//! inline style writes done by the highlight engine go through [`PageMut`].

use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("Document is not accessible: {0}")]
    Inaccessible(String),
    #[error("Document has no root element")]
    MissingDocumentElement,
    #[error("Node access failed: {0}")]
    NodeAccess(String),
}

/// Resolved style values as the rendering engine reports them.
///
/// Colors are in the resolved `rgb(r, g, b)` / `rgba(r, g, b, a)` form, font
/// family is the raw family list. An empty string means the engine reported
/// nothing for that property.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComputedStyle {
    pub background_color: String,
    pub color: String,
    pub border_color: String,
    pub font_family: String,
    pub font_size: String,
    pub font_weight: String,
}

impl ComputedStyle {
    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background_color = color.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_border(mut self, color: impl Into<String>) -> Self {
        self.border_color = color.into();
        self
    }

    pub fn with_font(
        mut self,
        family: impl Into<String>,
        size: impl Into<String>,
        weight: impl Into<String>,
    ) -> Self {
        self.font_family = family.into();
        self.font_size = size.into();
        self.font_weight = weight.into();
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
    Auto,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScrollBlock {
    Start,
    #[default]
    Center,
    End,
    Nearest,
}

/// How an element is brought into the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollOptions {
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

/// Priority of an inline declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Priority {
    Normal,
    /// `!important`, wins over anything the page's own CSS says
    Important,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Normal => "",
            Priority::Important => "important",
        }
    }
}

/// Read access to a rendered element tree.
pub trait Page {
    /// Stable handle to one element.
    type Node: Clone + PartialEq + Debug;

    /// The `<html>` element.
    fn document_element(&self) -> Result<Self::Node, PageError>;

    /// The top-level `<body>` container, if the document has one.
    fn body(&self) -> Result<Option<Self::Node>, PageError>;

    /// `root` followed by all of its descendant elements, depth-first in
    /// document order.
    fn subtree(&self, root: &Self::Node) -> Result<Vec<Self::Node>, PageError>;

    /// Inclusive: a node contains itself.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    /// Tag name as the engine reports it; callers lowercase it.
    fn tag_name(&self, node: &Self::Node) -> String;

    fn computed_style(&self, node: &Self::Node) -> Option<ComputedStyle>;

    /// Whether the element has a rendering box (an offset parent).
    fn is_laid_out(&self, node: &Self::Node) -> bool;

    fn text_content(&self, node: &Self::Node) -> String;

    fn url(&self) -> Result<String, PageError>;

    fn title(&self) -> String;
}

/// Inline style and marker writes used by the highlight engine.
pub trait PageMut: Page {
    /// Current inline value, empty when the element declares none.
    fn inline_style(&self, node: &Self::Node, property: &str) -> String;

    fn inline_priority(&self, node: &Self::Node, property: &str) -> Priority;

    /// Setting the empty string removes the declaration.
    fn set_inline_style(
        &mut self,
        node: &Self::Node,
        property: &str,
        value: &str,
        priority: Priority,
    );

    fn remove_inline_style(&mut self, node: &Self::Node, property: &str);

    fn is_marked(&self, node: &Self::Node) -> bool;

    fn set_marked(&mut self, node: &Self::Node, marked: bool);

    /// Every element currently carrying the highlight marker, in document order.
    fn marked_nodes(&self) -> Vec<Self::Node>;

    fn scroll_into_view(&mut self, node: &Self::Node, options: ScrollOptions);
}
