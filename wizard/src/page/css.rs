use std::fmt;

use colorsys::Rgb;

/// The resolved form of a fully transparent color.
pub const ZERO_ALPHA: &str = "rgba(0, 0, 0, 0)";

const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (255, 0, 0)),
    ("green", (0, 128, 0)),
    ("lime", (0, 255, 0)),
    ("blue", (0, 0, 255)),
    ("yellow", (255, 255, 0)),
    ("orange", (255, 165, 0)),
    ("purple", (128, 0, 128)),
    ("fuchsia", (255, 0, 255)),
    ("magenta", (255, 0, 255)),
    ("aqua", (0, 255, 255)),
    ("cyan", (0, 255, 255)),
    ("teal", (0, 128, 128)),
    ("navy", (0, 0, 128)),
    ("maroon", (128, 0, 0)),
    ("olive", (128, 128, 0)),
    ("silver", (192, 192, 192)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
];

/// One `property: value` pair of a `style` attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

/// Parse the body of a `style` attribute.
///
/// Property names are lowercased except for custom properties, values are
/// trimmed, and a trailing `!important` is split off into the flag.
pub fn parse_declarations(text: &str) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    for chunk in split_declarations(text) {
        let Some((property, value)) = chunk.split_once(':') else {
            continue;
        };
        let property = property.trim();
        if property.is_empty() {
            continue;
        }
        let property = if property.starts_with("--") {
            property.to_string()
        } else {
            property.to_ascii_lowercase()
        };

        let mut value = value.trim();
        let mut important = false;
        if let Some(idx) = value.to_ascii_lowercase().rfind("!important") {
            if value[idx..].trim().len() == "!important".len() {
                important = true;
                value = value[..idx].trim_end();
            }
        }
        if value.is_empty() {
            continue;
        }

        declarations.push(Declaration {
            property,
            value: value.to_string(),
            important,
        });
    }
    declarations
}

/// Split on `;` outside of quotes and parentheses, so values such as
/// `url("data:image/png;base64,...")` stay whole.
fn split_declarations(text: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut depth = 0usize;
    let mut quote = None;
    let mut start = 0;
    for (idx, ch) in text.char_indices() {
        match (quote, ch) {
            (Some(open), _) if ch == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                chunks.push(&text[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    chunks.push(&text[start..]);
    chunks
}

/// Ordered inline declarations of one element.
///
/// Overwriting an existing property keeps its position, so writing back a
/// previously read value reproduces the original attribute text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<Declaration>,
}

impl InlineStyle {
    pub fn parse(text: &str) -> Self {
        Self {
            declarations: parse_declarations(text),
        }
    }

    pub fn get(&self, property: &str) -> &str {
        self.declarations
            .iter()
            .find(|decl| decl.property == property)
            .map(|decl| decl.value.as_str())
            .unwrap_or("")
    }

    pub fn is_important(&self, property: &str) -> bool {
        self.declarations
            .iter()
            .any(|decl| decl.property == property && decl.important)
    }

    pub fn set(&mut self, property: &str, value: &str, important: bool) {
        if value.is_empty() {
            self.remove(property);
            return;
        }
        match self
            .declarations
            .iter_mut()
            .find(|decl| decl.property == property)
        {
            Some(decl) => {
                decl.value = value.to_string();
                decl.important = important;
            }
            None => self.declarations.push(Declaration {
                property: property.to_string(),
                value: value.to_string(),
                important,
            }),
        }
    }

    pub fn remove(&mut self, property: &str) {
        self.declarations.retain(|decl| decl.property != property);
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, decl) in self.declarations.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}: {}", decl.property, decl.value)?;
            if decl.important {
                f.write_str(" !important")?;
            }
            f.write_str(";")?;
        }
        Ok(())
    }
}

/// A color after the engine resolved it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: f64,
}

impl ResolvedColor {
    pub const TRANSPARENT: ResolvedColor = ResolvedColor {
        red: 0,
        green: 0,
        blue: 0,
        alpha: 0.0,
    };

    pub fn opaque(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }
}

impl fmt::Display for ResolvedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alpha >= 1.0 {
            return write!(f, "rgb({}, {}, {})", self.red, self.green, self.blue);
        }
        let alpha = format!("{:.3}", self.alpha.max(0.0));
        let alpha = alpha.trim_end_matches('0').trim_end_matches('.');
        write!(
            f,
            "rgba({}, {}, {}, {})",
            self.red, self.green, self.blue, alpha
        )
    }
}

/// A declared color value before inheritance is applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColorValue {
    Resolved(ResolvedColor),
    CurrentColor,
}

/// Parse a CSS color: hex, `rgb()` / `rgba()`, `transparent`, `currentcolor`
/// or one of the basic named colors.
pub fn parse_color(value: &str) -> Option<ColorValue> {
    let value = value.trim().to_ascii_lowercase();
    match value.as_str() {
        "transparent" => return Some(ColorValue::Resolved(ResolvedColor::TRANSPARENT)),
        "currentcolor" => return Some(ColorValue::CurrentColor),
        _ => {}
    }

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex).map(ColorValue::Resolved);
    }

    if let Some(args) = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))
    {
        return parse_rgb_args(args.strip_suffix(')')?).map(ColorValue::Resolved);
    }

    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == value)
        .map(|(_, (r, g, b))| ColorValue::Resolved(ResolvedColor::opaque(*r, *g, *b)))
}

fn parse_hex(hex: &str) -> Option<ResolvedColor> {
    let expanded = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => hex.to_string(),
        _ => return None,
    };
    let rgb = Rgb::from_hex_str(&format!("#{expanded}")).ok()?;
    Some(ResolvedColor::opaque(
        rgb.red().round() as u8,
        rgb.green().round() as u8,
        rgb.blue().round() as u8,
    ))
}

fn parse_rgb_args(args: &str) -> Option<ResolvedColor> {
    let parts = args
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let channel = |part: &str| -> Option<u8> {
        let value = match part.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().ok()? * 255.0 / 100.0,
            None => part.parse::<f64>().ok()?,
        };
        Some(value.round().clamp(0.0, 255.0) as u8)
    };
    let alpha = match parts.get(3) {
        Some(part) => match part.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().ok()? / 100.0,
            None => part.parse::<f64>().ok()?,
        }
        .clamp(0.0, 1.0),
        None => 1.0,
    };

    Some(ResolvedColor {
        red: channel(parts[0])?,
        green: channel(parts[1])?,
        blue: channel(parts[2])?,
        alpha,
    })
}

/// Pick the color component out of a shorthand like `1px solid #333` or
/// `url(x.png) rgb(1, 2, 3)`.
pub fn color_in_shorthand(value: &str) -> Option<ColorValue> {
    let lowered = value.to_ascii_lowercase();
    if let Some(start) = lowered.find("rgb") {
        let end = lowered[start..].find(')')? + start;
        return parse_color(&lowered[start..=end]);
    }
    lowered.split_whitespace().find_map(parse_color)
}
