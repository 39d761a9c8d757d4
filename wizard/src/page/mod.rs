//! Everything that touches a page
//!
//! This module covers reading style off an element tree and the reversible
//! highlight overlay. The functionality is organized into several sub-modules:
//!
//! - `document`: the `Page` / `PageMut` traits every page backend implements
//! - `memory`: an in-memory page used for snapshots and tests
//! - `xhtml`: loading and writing page snapshots as XHTML
//! - `css`: inline declaration parsing and color canonicalization
//! - `analysis`: style extraction and the color / font aggregators
//! - `highlight`: the highlight state machine and its snapshot table
//! - `convert`: rgb to hex / hsl conversion for presentation

pub mod analysis;
pub mod convert;
pub mod css;
pub mod document;
pub mod highlight;
pub mod memory;
pub mod xhtml;

pub use document::{ComputedStyle, Page, PageError, PageMut, Priority, ScrollOptions};
pub use memory::{NodeId, StaticPage};
