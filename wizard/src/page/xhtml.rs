//! XHTML page snapshots
//!
//! A snapshot is a well-formed XHTML document whose `style` attributes carry
//! all styling. Loading resolves the handful of properties the probe reads
//! the way a browser would; writing emits the current inline styles and
//! highlight markers back out.

use std::{
    fs::File,
    io::{BufReader, Read, Write},
    path::Path,
};

use thiserror::Error;
use tracing::{debug, info};
use xml::EmitterConfig;
use xmltree::{Element, XMLNode};

use crate::page::{
    css::{
        color_in_shorthand, parse_color, parse_declarations, ColorValue, Declaration, InlineStyle,
        ResolvedColor,
    },
    document::{ComputedStyle, Page, PageMut},
    highlight::MARKER_ATTRIBUTE,
    memory::{NodeId, StaticChild, StaticPage},
};

const HIDDEN_TAGS: &[&str] = &["head", "title", "style", "script", "meta", "link"];
const INITIAL_FONT_FAMILY: &str = "\"Times New Roman\"";
const INITIAL_FONT_SIZE: f64 = 16.0;
const INITIAL_FONT_WEIGHT: u32 = 400;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read page: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse page: {0}")]
    Parse(#[from] xmltree::ParseError),
    #[error("Failed to write page: {0}")]
    Write(#[from] xmltree::Error),
    #[error("Expected an <html> root element, found <{0}>")]
    UnexpectedRoot(String),
}

/// Values passed down from parent to child.
#[derive(Clone, Debug)]
struct Inherited {
    color: ResolvedColor,
    font_family: String,
    font_size: f64,
    font_weight: u32,
    hidden: bool,
}

impl Default for Inherited {
    fn default() -> Self {
        Self {
            color: ResolvedColor::opaque(0, 0, 0),
            font_family: INITIAL_FONT_FAMILY.into(),
            font_size: INITIAL_FONT_SIZE,
            font_weight: INITIAL_FONT_WEIGHT,
            hidden: false,
        }
    }
}

pub fn load_page_file(path: &Path) -> Result<StaticPage, LoadError> {
    let file = File::open(path)?;
    let url = format!("file://{}", path.display());
    load_page(BufReader::new(file), &url)
}

pub fn load_page<R: Read>(reader: R, url: &str) -> Result<StaticPage, LoadError> {
    let root = Element::parse(reader)?;
    if !root.name.eq_ignore_ascii_case("html") {
        return Err(LoadError::UnexpectedRoot(root.name));
    }

    let mut page = StaticPage::new(url, "");
    let node = page.root();
    build(&mut page, node, &root, &Inherited::default());

    if let Some(title) = find_title(&root) {
        page.set_title(title);
    }
    info!(
        "Loaded page {} with {} elements, title {:?}",
        url,
        page.len(),
        page.title()
    );
    Ok(page)
}

fn build(page: &mut StaticPage, node: NodeId, element: &Element, parent: &Inherited) {
    let tag = element.name.to_ascii_lowercase();
    let style_text = element
        .attributes
        .get("style")
        .map(String::as_str)
        .unwrap_or_default();
    let declarations = parse_declarations(style_text);
    let declared = |property: &str| last_declared(&declarations, property);

    let color = match declared("color").and_then(parse_color) {
        Some(ColorValue::Resolved(color)) => color,
        _ => parent.color,
    };
    let background = winning(&declarations, |decl| match decl.property.as_str() {
        "background-color" => parse_color(&decl.value).is_some(),
        "background" => true,
        _ => false,
    })
    .and_then(|decl| match decl.property.as_str() {
        "background" => color_in_shorthand(&decl.value),
        _ => parse_color(&decl.value),
    })
    .map(|value| resolve(value, color))
    .unwrap_or(ResolvedColor::TRANSPARENT);
    let border = winning(&declarations, |decl| match decl.property.as_str() {
        "border-color" => parse_color(&decl.value).is_some(),
        "border" => true,
        _ => false,
    })
    .map(|decl| {
        let value = match decl.property.as_str() {
            "border" => color_in_shorthand(&decl.value),
            _ => parse_color(&decl.value),
        };
        value.map_or(color, |value| resolve(value, color))
    });

    let font_family = declared("font-family")
        .map(str::to_string)
        .unwrap_or_else(|| parent.font_family.clone());
    let font_size = declared("font-size")
        .and_then(|value| resolve_font_size(value, parent.font_size))
        .unwrap_or(parent.font_size);
    let font_weight = declared("font-weight")
        .and_then(|value| resolve_font_weight(value, parent.font_weight))
        .unwrap_or(parent.font_weight);

    let display = declared("display").map(str::to_ascii_lowercase);
    let hidden = parent.hidden
        || match display.as_deref() {
            Some("none") => true,
            Some(_) => false,
            None => HIDDEN_TAGS.contains(&tag.as_str()),
        };
    let fixed = declared("position").is_some_and(|value| value.eq_ignore_ascii_case("fixed"));
    let laid_out = !hidden && !fixed && tag != "html" && tag != "body";

    let computed = ComputedStyle::default()
        .with_background(background.to_string())
        .with_color(color.to_string())
        .with_border(border.map(|border| border.to_string()).unwrap_or_default())
        .with_font(
            font_family.clone(),
            format_px(font_size),
            font_weight.to_string(),
        );
    page.set_computed_style(node, Some(computed));
    page.set_laid_out(node, laid_out);
    page.set_inline(node, InlineStyle::parse(style_text));

    let mut attributes = element
        .attributes
        .iter()
        .filter(|(name, _)| name.as_str() != "style" && name.as_str() != MARKER_ATTRIBUTE)
        .collect::<Vec<_>>();
    attributes.sort();
    for (name, value) in attributes {
        page.set_attribute(node, name.clone(), value.clone());
    }
    if element
        .attributes
        .get(MARKER_ATTRIBUTE)
        .is_some_and(|value| value == "true")
    {
        page.set_marked(&node, true);
    }

    let inherited = Inherited {
        color,
        font_family,
        font_size,
        font_weight,
        hidden,
    };
    for child in &element.children {
        match child {
            XMLNode::Element(child_element) => {
                let child_node = page.append_element(
                    node,
                    child_element.name.to_ascii_lowercase(),
                    ComputedStyle::default(),
                );
                build(page, child_node, child_element, &inherited);
            }
            XMLNode::Text(text) | XMLNode::CData(text) => page.append_text(node, text.clone()),
            _ => {}
        }
    }
}

fn last_declared<'a>(declarations: &'a [Declaration], property: &str) -> Option<&'a str> {
    winning(declarations, |decl| decl.property == property).map(|decl| decl.value.as_str())
}

/// The declaration that takes effect among those `accepts` lets through:
/// the last `!important` one, otherwise the last one.
fn winning<'a>(
    declarations: &'a [Declaration],
    accepts: impl Fn(&Declaration) -> bool,
) -> Option<&'a Declaration> {
    let mut winner: Option<&Declaration> = None;
    for decl in declarations.iter().filter(|decl| accepts(*decl)) {
        if decl.important || !winner.is_some_and(|current| current.important) {
            winner = Some(decl);
        }
    }
    winner
}

fn resolve(value: ColorValue, current: ResolvedColor) -> ResolvedColor {
    match value {
        ColorValue::Resolved(color) => color,
        ColorValue::CurrentColor => current,
    }
}

fn resolve_font_size(value: &str, parent: f64) -> Option<f64> {
    let value = value.trim().to_ascii_lowercase();
    let number = |suffix: &str| value.strip_suffix(suffix)?.trim().parse::<f64>().ok();
    if let Some(px) = number("px") {
        return Some(px);
    }
    if let Some(rem) = number("rem") {
        return Some(rem * INITIAL_FONT_SIZE);
    }
    if let Some(em) = number("em") {
        return Some(em * parent);
    }
    if let Some(pct) = number("%") {
        return Some(pct * parent / 100.0);
    }
    if let Some(pt) = number("pt") {
        return Some(pt * 4.0 / 3.0);
    }
    let keyword = match value.as_str() {
        "xx-small" => 9.0,
        "x-small" => 10.0,
        "small" => 13.0,
        "medium" => 16.0,
        "large" => 18.0,
        "x-large" => 24.0,
        "xx-large" => 32.0,
        "smaller" => parent / 1.2,
        "larger" => parent * 1.2,
        _ => return None,
    };
    Some(keyword)
}

fn resolve_font_weight(value: &str, parent: u32) -> Option<u32> {
    match value.trim().to_ascii_lowercase().as_str() {
        "normal" => Some(400),
        "bold" => Some(700),
        "bolder" => Some(match parent {
            0..=349 => 400,
            350..=549 => 700,
            _ => 900,
        }),
        "lighter" => Some(match parent {
            0..=549 => 100,
            550..=749 => 400,
            _ => 700,
        }),
        other => other.parse::<u32>().ok().filter(|weight| (1..=1000).contains(weight)),
    }
}

/// `16` -> `16px`, `13.333` -> `13.333px`
fn format_px(size: f64) -> String {
    let rounded = format!("{:.3}", size);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{}px", trimmed)
}

fn find_title(element: &Element) -> Option<String> {
    if element.name.eq_ignore_ascii_case("title") {
        let text = element
            .children
            .iter()
            .filter_map(|child| match child {
                XMLNode::Text(text) | XMLNode::CData(text) => Some(text.as_str()),
                _ => None,
            })
            .collect::<String>();
        return Some(text.trim().to_string());
    }
    element.children.iter().find_map(|child| match child {
        XMLNode::Element(child) => find_title(child),
        _ => None,
    })
}

/// Serialize the page with its current inline styles and markers.
pub fn write_page<W: Write>(page: &StaticPage, writer: W) -> Result<(), LoadError> {
    let root = to_element(page, page.root());
    let config = EmitterConfig::new().perform_indent(true);
    root.write_with_config(writer, config)?;
    debug!("Wrote page snapshot with {} elements", page.len());
    Ok(())
}

fn to_element(page: &StaticPage, node: NodeId) -> Element {
    let mut element = Element::new(&page.tag_name(&node));
    for (name, value) in page.attributes(node) {
        element.attributes.insert(name.clone(), value.clone());
    }
    let inline = page.inline(node);
    if !inline.is_empty() {
        element.attributes.insert("style".to_string(), inline.to_string());
    }
    if page.is_marked(&node) {
        element
            .attributes
            .insert(MARKER_ATTRIBUTE.to_string(), "true".to_string());
    }
    for child in page.child_nodes(node) {
        element.children.push(match child {
            StaticChild::Element(id) => XMLNode::Element(to_element(page, *id)),
            StaticChild::Text(text) => XMLNode::Text(text.clone()),
        });
    }
    element
}
