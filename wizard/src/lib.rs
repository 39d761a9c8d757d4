//! Page style probe
//!
//! Walks the rendered element tree of a page and reports which colors and
//! font families it actually uses. It can also mark every element that uses
//! a given color or font and take those marks back off again.
//!
//! - `page`: the element tree abstraction, analysis passes, highlighting and
//!   color format conversion
//! - `types`: summary entries and the analysis report
//! - `exchange`: the JSON message contract spoken with the host
//! - `session`: dispatches host requests against one page
//! - `settings`: user configuration
//!
//! # Example Usage
//!
//! ```no_run
//! use wizard::page::{analysis::analyze, xhtml::load_page_file};
//!
//! let page = load_page_file("snapshot.xhtml".as_ref())?;
//! let report = analyze(&page)?;
//! for entry in &report.colors {
//!     println!("{} x{}", entry.color, entry.count);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod exchange;
pub mod page;
pub mod session;
pub mod settings;
pub mod types;

pub use exchange::{Request, Response};
pub use page::{
    analysis::{aggregate_colors, aggregate_fonts, analyze, AnalysisError},
    convert::{to_hex, to_hsl, ColorFormat},
    document::{ComputedStyle, Page, PageError, PageMut},
    highlight::{HighlightEngine, HighlightState, HighlightStyle, HighlightTarget},
    memory::{NodeId, StaticPage},
};
pub use session::ContentSession;
pub use settings::Settings;
pub use types::{AnalysisReport, ColorSummaryEntry, FontSummaryEntry};
