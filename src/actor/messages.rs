//! Message types exchanged with the renderer and the collector.
//!
//! These define the protocol between the dispatcher and its collaborators.

use crate::layout::{Panel, PanelSet};

/// What the renderer should redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawScope {
    /// Every panel.
    Full,
    /// A single panel.
    Panel(Panel),
}

impl RedrawScope {
    /// Smallest scope covering both `self` and `other`.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Panel(a), Self::Panel(b)) if a == b => self,
            _ => Self::Full,
        }
    }
}

/// Modal menus the dispatcher can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Menu {
    /// Main menu.
    Main,
    /// Key bindings.
    Help,
    /// Options editor.
    Options,
    /// Confirm sending a signal to the selected process.
    SignalSend(i32),
    /// Pick a signal to send to the selected process.
    SignalChoose,
}

/// Non-fatal user-visible notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The requested panel combination does not fit the terminal.
    SizeError,
}

/// A request for the collector to run a cycle now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunRequest {
    /// Panels to refresh.
    pub panels: PanelSet,
    /// Redraw from existing data instead of collecting new data.
    pub no_update: bool,
    /// Redraw even if nothing changed.
    pub force_redraw: bool,
}

impl RunRequest {
    /// Collect and redraw every panel.
    pub const fn all() -> Self {
        Self {
            panels: PanelSet::all(),
            no_update: false,
            force_redraw: true,
        }
    }

    /// Refresh a single panel.
    pub fn panel(panel: Panel, no_update: bool, force_redraw: bool) -> Self {
        Self {
            panels: panel.into(),
            no_update,
            force_redraw,
        }
    }

    /// Combine two requests into one covering both.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            panels: self.panels | other.panels,
            no_update: self.no_update && other.no_update,
            force_redraw: self.force_redraw || other.force_redraw,
        }
    }
}

/// State changes only the collector can apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectorCommand {
    /// Expand a process tree node.
    Expand(i64),
    /// Collapse a process tree node.
    Collapse(i64),
    /// Expand or collapse a process tree node.
    ToggleTree(i64),
    /// Zero (or restore) the byte counters of an interface.
    ToggleNetTotals(String),
}

impl CollectorCommand {
    /// Panel whose data the command changes.
    pub const fn panel(&self) -> Panel {
        match self {
            Self::Expand(_) | Self::Collapse(_) | Self::ToggleTree(_) => Panel::Proc,
            Self::ToggleNetTotals(_) => Panel::Net,
        }
    }
}

/// What the dispatcher needs to know about the last collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectorView {
    /// Number of rows in the (filtered) process list.
    pub proc_count: usize,
    /// Network interfaces, in display order.
    pub interfaces: Vec<String>,
    /// The process shown in the detailed view has exited.
    pub detailed_dead: bool,
}

/// Result of dispatching one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Keep running.
    Continue,
    /// Leave the event loop.
    Quit,
}
