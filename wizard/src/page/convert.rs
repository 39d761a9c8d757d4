//! Presentation-only color formats
//!
//! Reports always carry the resolved `rgb(r, g, b)` form. These helpers turn
//! it into hex or HSL for display; anything else is passed through untouched.

use std::sync::OnceLock;

use colorsys::{Hsl, Rgb};
use regex::Regex;
use serde::{Deserialize, Serialize};

fn rgb_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^rgb\((\d+),\s*(\d+),\s*(\d+)\)$").expect("rgb pattern is valid")
    })
}

fn parse_rgb(value: &str) -> Option<(u32, u32, u32)> {
    let caps = rgb_pattern().captures(value)?;
    let channel = |idx: usize| caps.get(idx)?.as_str().parse::<u32>().ok();
    Some((channel(1)?, channel(2)?, channel(3)?))
}

/// `rgb(255, 0, 0)` to `#ff0000`.
///
/// Channels are packed behind a leading one bit which is then dropped, so
/// out-of-range channels spill into their neighbours instead of widening the
/// result.
pub fn to_hex(value: &str) -> Option<String> {
    let (r, g, b) = parse_rgb(value)?;
    let packed = (1u64 << 24) + ((r as u64) << 16) + ((g as u64) << 8) + b as u64;
    let digits = format!("{:x}", packed);
    Some(format!("#{}", &digits[1..]))
}

/// `rgb(255, 0, 0)` to `hsl(0, 100%, 50%)`, each component rounded.
pub fn to_hsl(value: &str) -> Option<String> {
    let (r, g, b) = parse_rgb(value)?;
    let rgb = Rgb::from((r as f64, g as f64, b as f64));
    let hsl = Hsl::from(rgb);
    Some(format!(
        "hsl({}, {}%, {}%)",
        hsl.hue().round() as i64,
        hsl.saturation().round() as i64,
        hsl.lightness().round() as i64
    ))
}

/// Display format for colors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(strum_macros::Display, strum_macros::EnumString, strum_macros::EnumIter)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ColorFormat {
    #[default]
    Rgb,
    Hex,
    Hsl,
}

impl ColorFormat {
    /// Render `color` in this format, falling back to the input unchanged.
    pub fn format(self, color: &str) -> String {
        let converted = match self {
            ColorFormat::Rgb => None,
            ColorFormat::Hex => to_hex(color),
            ColorFormat::Hsl => to_hsl(color),
        };
        converted.unwrap_or_else(|| color.to_string())
    }
}
