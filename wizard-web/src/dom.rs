use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CssStyleDeclaration, Document, Element, HtmlElement, NodeList, ScrollIntoViewOptions,
    ScrollLogicalPosition, SvgElement, Window,
};
use wizard::page::{
    document::{ScrollBehavior, ScrollBlock},
    highlight::MARKER_ATTRIBUTE,
    ComputedStyle, Page, PageError, PageMut, Priority, ScrollOptions,
};

/// The live document of the current window.
pub struct DomPage {
    window: Window,
    document: Document,
}

impl DomPage {
    pub fn current() -> Result<Self, PageError> {
        let window =
            web_sys::window().ok_or_else(|| PageError::Inaccessible("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| PageError::Inaccessible("window has no document".into()))?;
        Ok(Self { window, document })
    }

    fn inline_declaration(&self, node: &Element) -> Option<CssStyleDeclaration> {
        if let Some(html) = node.dyn_ref::<HtmlElement>() {
            return Some(html.style());
        }
        node.dyn_ref::<SvgElement>().map(SvgElement::style)
    }
}

fn js_error(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|idx| list.item(idx))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

impl Page for DomPage {
    type Node = Element;

    fn document_element(&self) -> Result<Element, PageError> {
        self.document
            .document_element()
            .ok_or(PageError::MissingDocumentElement)
    }

    fn body(&self) -> Result<Option<Element>, PageError> {
        Ok(self.document.body().map(Element::from))
    }

    fn subtree(&self, root: &Element) -> Result<Vec<Element>, PageError> {
        let descendants = root
            .query_selector_all("*")
            .map_err(|err| PageError::NodeAccess(js_error(err)))?;
        let mut nodes = vec![root.clone()];
        nodes.extend(elements(descendants));
        Ok(nodes)
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        ancestor.contains(Some(node.as_ref()))
    }

    fn tag_name(&self, node: &Element) -> String {
        node.tag_name()
    }

    fn computed_style(&self, node: &Element) -> Option<ComputedStyle> {
        let style = self.window.get_computed_style(node).ok().flatten()?;
        let read = |property: &str| style.get_property_value(property).unwrap_or_default();
        Some(ComputedStyle {
            background_color: read("background-color"),
            color: read("color"),
            border_color: read("border-color"),
            font_family: read("font-family"),
            font_size: read("font-size"),
            font_weight: read("font-weight"),
        })
    }

    /// Elements without an `offsetParent` property (SVG and friends) count as
    /// laid out.
    fn is_laid_out(&self, node: &Element) -> bool {
        match node.dyn_ref::<HtmlElement>() {
            Some(html) => html.offset_parent().is_some(),
            None => true,
        }
    }

    fn text_content(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn url(&self) -> Result<String, PageError> {
        self.document
            .location()
            .ok_or_else(|| PageError::Inaccessible("document has no location".into()))?
            .href()
            .map_err(|err| PageError::Inaccessible(js_error(err)))
    }

    fn title(&self) -> String {
        self.document.title()
    }
}

impl PageMut for DomPage {
    fn inline_style(&self, node: &Element, property: &str) -> String {
        self.inline_declaration(node)
            .and_then(|style| style.get_property_value(property).ok())
            .unwrap_or_default()
    }

    fn inline_priority(&self, node: &Element, property: &str) -> Priority {
        let important = self
            .inline_declaration(node)
            .is_some_and(|style| style.get_property_priority(property) == "important");
        if important {
            Priority::Important
        } else {
            Priority::Normal
        }
    }

    fn set_inline_style(&mut self, node: &Element, property: &str, value: &str, priority: Priority) {
        let Some(style) = self.inline_declaration(node) else {
            return;
        };
        if let Err(err) = style.set_property_with_priority(property, value, priority.as_str()) {
            warn!("Failed to set {} on <{}>: {}", property, node.tag_name(), js_error(err));
        }
    }

    fn remove_inline_style(&mut self, node: &Element, property: &str) {
        if let Some(style) = self.inline_declaration(node) {
            if let Err(err) = style.remove_property(property) {
                warn!("Failed to remove {} on <{}>: {}", property, node.tag_name(), js_error(err));
            }
        }
    }

    fn is_marked(&self, node: &Element) -> bool {
        node.get_attribute(MARKER_ATTRIBUTE).as_deref() == Some("true")
    }

    fn set_marked(&mut self, node: &Element, marked: bool) {
        let result = if marked {
            node.set_attribute(MARKER_ATTRIBUTE, "true")
        } else {
            node.remove_attribute(MARKER_ATTRIBUTE)
        };
        if let Err(err) = result {
            warn!("Failed to update marker on <{}>: {}", node.tag_name(), js_error(err));
        }
    }

    fn marked_nodes(&self) -> Vec<Element> {
        let selector = format!("[{}='true']", MARKER_ATTRIBUTE);
        match self.document.query_selector_all(&selector) {
            Ok(list) => elements(list),
            Err(err) => {
                warn!("Failed to query highlighted elements: {}", js_error(err));
                Vec::new()
            }
        }
    }

    fn scroll_into_view(&mut self, node: &Element, options: ScrollOptions) {
        let mut js_options = ScrollIntoViewOptions::new();
        js_options.behavior(match options.behavior {
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
            ScrollBehavior::Auto => web_sys::ScrollBehavior::Auto,
        });
        js_options.block(match options.block {
            ScrollBlock::Start => ScrollLogicalPosition::Start,
            ScrollBlock::Center => ScrollLogicalPosition::Center,
            ScrollBlock::End => ScrollLogicalPosition::End,
            ScrollBlock::Nearest => ScrollLogicalPosition::Nearest,
        });
        node.scroll_into_view_with_scroll_into_view_options(&js_options);
    }
}
