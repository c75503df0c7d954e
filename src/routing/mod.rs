//! Routing module
//!
//! Maps a normalized content key to the site section that owns it:
//! - Ordered exact/prefix matching, first match wins
//! - Per-section default options and landing behaviour

mod matcher;
mod sections;

pub use sections::{Landing, Section, SectionTable};
