//! Layout module: panels, minimum sizes and panel placement.
//!
//! Placement is recomputed on relayout only (panel toggles, presets,
//! resize). Mouse handling maps cells back to panels through the same
//! regions.

mod panel;
mod rect;
mod region;
mod sizing;

pub use panel::{Panel, PanelSet};
pub use rect::Rect;
pub use region::{Arrangement, Layout, Region};
pub use sizing::{MinimumSizes, SizeRules, TermSize};
