use crate::page::{
    css::InlineStyle,
    document::{ComputedStyle, Page, PageError, PageMut, Priority, ScrollOptions},
};

/// Handle of an element inside a [`StaticPage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StaticChild {
    Element(NodeId),
    Text(String),
}

#[derive(Clone, Debug)]
struct StaticElement {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<StaticChild>,
    attributes: Vec<(String, String)>,
    computed: Option<ComputedStyle>,
    laid_out: bool,
    inline: InlineStyle,
    marked: bool,
}

/// A page held entirely in memory.
///
/// Computed style is stored per element rather than derived, so callers (the
/// XHTML loader, tests) decide what the "rendering engine" reports. Inline
/// style writes are kept separately and do not feed back into computed style.
#[derive(Clone, Debug)]
pub struct StaticPage {
    url: String,
    title: String,
    elements: Vec<StaticElement>,
    scrolls: Vec<(NodeId, ScrollOptions)>,
}

impl StaticPage {
    /// Creates a page holding only its `<html>` element.
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        let root = StaticElement {
            tag: "html".into(),
            parent: None,
            children: Vec::new(),
            attributes: Vec::new(),
            computed: Some(ComputedStyle::default()),
            laid_out: false,
            inline: InlineStyle::default(),
            marked: false,
        };
        Self {
            url: url.into(),
            title: title.into(),
            elements: vec![root],
            scrolls: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: impl Into<String>,
        computed: ComputedStyle,
    ) -> NodeId {
        let id = NodeId(self.elements.len());
        self.elements.push(StaticElement {
            tag: tag.into(),
            parent: Some(parent),
            children: Vec::new(),
            attributes: Vec::new(),
            computed: Some(computed),
            laid_out: true,
            inline: InlineStyle::default(),
            marked: false,
        });
        self.element_mut(parent).children.push(StaticChild::Element(id));
        id
    }

    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) {
        self.element_mut(parent)
            .children
            .push(StaticChild::Text(text.into()));
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_laid_out(&mut self, node: NodeId, laid_out: bool) {
        self.element_mut(node).laid_out = laid_out;
    }

    pub fn set_computed_style(&mut self, node: NodeId, computed: Option<ComputedStyle>) {
        self.element_mut(node).computed = computed;
    }

    pub fn set_attribute(&mut self, node: NodeId, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        let attributes = &mut self.element_mut(node).attributes;
        match attributes.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = value,
            None => attributes.push((name, value)),
        }
    }

    pub fn attributes(&self, node: NodeId) -> &[(String, String)] {
        &self.element(node).attributes
    }

    pub fn set_inline(&mut self, node: NodeId, inline: InlineStyle) {
        self.element_mut(node).inline = inline;
    }

    pub fn inline(&self, node: NodeId) -> &InlineStyle {
        &self.element(node).inline
    }

    pub fn child_nodes(&self, node: NodeId) -> &[StaticChild] {
        &self.element(node).children
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.element(node).parent
    }

    /// Every scroll request received so far, oldest first.
    pub fn scroll_log(&self) -> &[(NodeId, ScrollOptions)] {
        &self.scrolls
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn element(&self, node: NodeId) -> &StaticElement {
        &self.elements[node.0]
    }

    fn element_mut(&mut self, node: NodeId) -> &mut StaticElement {
        &mut self.elements[node.0]
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        for child in &self.element(node).children {
            match child {
                StaticChild::Text(text) => out.push_str(text),
                StaticChild::Element(id) => self.collect_text(*id, out),
            }
        }
    }
}

impl Page for StaticPage {
    type Node = NodeId;

    fn document_element(&self) -> Result<NodeId, PageError> {
        if self.elements.is_empty() {
            return Err(PageError::MissingDocumentElement);
        }
        Ok(self.root())
    }

    fn body(&self) -> Result<Option<NodeId>, PageError> {
        let root = self.document_element()?;
        Ok(self.element(root).children.iter().find_map(|child| match child {
            StaticChild::Element(id) if self.element(*id).tag.eq_ignore_ascii_case("body") => {
                Some(*id)
            }
            _ => None,
        }))
    }

    fn subtree(&self, root: &NodeId) -> Result<Vec<NodeId>, PageError> {
        if root.0 >= self.elements.len() {
            return Err(PageError::NodeAccess(format!("unknown node {:?}", root)));
        }
        let mut out = Vec::new();
        let mut stack = vec![*root];
        while let Some(id) = stack.pop() {
            out.push(id);
            for child in self.element(id).children.iter().rev() {
                if let StaticChild::Element(child_id) = child {
                    stack.push(*child_id);
                }
            }
        }
        Ok(out)
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let mut current = Some(*node);
        while let Some(id) = current {
            if id == *ancestor {
                return true;
            }
            current = self.element(id).parent;
        }
        false
    }

    fn tag_name(&self, node: &NodeId) -> String {
        self.element(*node).tag.clone()
    }

    fn computed_style(&self, node: &NodeId) -> Option<ComputedStyle> {
        self.element(*node).computed.clone()
    }

    fn is_laid_out(&self, node: &NodeId) -> bool {
        self.element(*node).laid_out
    }

    fn text_content(&self, node: &NodeId) -> String {
        let mut text = String::new();
        self.collect_text(*node, &mut text);
        text
    }

    fn url(&self) -> Result<String, PageError> {
        Ok(self.url.clone())
    }

    fn title(&self) -> String {
        self.title.clone()
    }
}

impl PageMut for StaticPage {
    fn inline_style(&self, node: &NodeId, property: &str) -> String {
        self.element(*node).inline.get(property).to_string()
    }

    fn inline_priority(&self, node: &NodeId, property: &str) -> Priority {
        if self.element(*node).inline.is_important(property) {
            Priority::Important
        } else {
            Priority::Normal
        }
    }

    fn set_inline_style(&mut self, node: &NodeId, property: &str, value: &str, priority: Priority) {
        self.element_mut(*node)
            .inline
            .set(property, value, priority == Priority::Important);
    }

    fn remove_inline_style(&mut self, node: &NodeId, property: &str) {
        self.element_mut(*node).inline.remove(property);
    }

    fn is_marked(&self, node: &NodeId) -> bool {
        self.element(*node).marked
    }

    fn set_marked(&mut self, node: &NodeId, marked: bool) {
        self.element_mut(*node).marked = marked;
    }

    fn marked_nodes(&self) -> Vec<NodeId> {
        self.subtree(&self.root())
            .unwrap_or_default()
            .into_iter()
            .filter(|id| self.element(*id).marked)
            .collect()
    }

    fn scroll_into_view(&mut self, node: &NodeId, options: ScrollOptions) {
        self.scrolls.push((*node, options));
    }
}
