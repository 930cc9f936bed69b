//! Minimum terminal size rules for panel combinations.

use super::panel::{Panel, PanelSet};
use super::rect::Rect;

/// Terminal dimensions in cells.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TermSize {
    /// Columns.
    pub width: u16,
    /// Rows.
    pub height: u16,
}

impl TermSize {
    /// Create a new size.
    #[inline]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Check if `self` is at least `min` in both dimensions.
    #[inline]
    pub const fn covers(&self, min: Self) -> bool {
        self.width >= min.width && self.height >= min.height
    }

    /// Full-screen rectangle of this size.
    #[inline]
    pub const fn rect(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }
}

impl Default for TermSize {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

/// Minimum-size arithmetic for a set of visible panels.
pub trait SizeRules: Send + Sync {
    /// Smallest terminal that can show all of `panels` at once.
    fn minimum(&self, panels: PanelSet) -> TermSize;

    /// Check if `panels` fit into `term`.
    fn fits(&self, panels: PanelSet, term: TermSize) -> bool {
        term.covers(self.minimum(panels))
    }
}

/// Per-panel minimum sizes composed into a dashboard minimum.
///
/// The memory and network panels share one column; the process list sits
/// beside them. The processor panel spans the full width on top. Without a
/// process list, memory and network stack vertically.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MinimumSizes {
    /// Processor panel minimum.
    pub cpu: TermSize,
    /// Memory panel minimum.
    pub mem: TermSize,
    /// Network panel minimum.
    pub net: TermSize,
    /// Process panel minimum.
    pub proc: TermSize,
}

impl MinimumSizes {
    /// Minimum of a single panel.
    pub const fn of(&self, panel: Panel) -> TermSize {
        match panel {
            Panel::Cpu => self.cpu,
            Panel::Mem => self.mem,
            Panel::Net => self.net,
            Panel::Proc => self.proc,
        }
    }
}

impl Default for MinimumSizes {
    fn default() -> Self {
        Self {
            cpu: TermSize::new(60, 8),
            mem: TermSize::new(36, 10),
            net: TermSize::new(36, 6),
            proc: TermSize::new(44, 16),
        }
    }
}

impl SizeRules for MinimumSizes {
    fn minimum(&self, panels: PanelSet) -> TermSize {
        let mut width = 0;
        if panels.has(Panel::Mem) {
            width = self.mem.width;
        } else if panels.has(Panel::Net) {
            width = self.net.width;
        }
        if panels.has(Panel::Proc) {
            width += self.proc.width;
        }
        if panels.has(Panel::Cpu) {
            width = width.max(self.cpu.width);
        }

        let mut height = if panels.has(Panel::Cpu) { self.cpu.height } else { 0 };
        if panels.has(Panel::Proc) {
            height += self.proc.height;
        } else {
            if panels.has(Panel::Mem) {
                height += self.mem.height;
            }
            if panels.has(Panel::Net) {
                height += self.net.height;
            }
        }

        TermSize::new(width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_panels_fit_default_terminal() {
        let rules = MinimumSizes::default();
        assert_eq!(rules.minimum(PanelSet::all()), TermSize::new(80, 24));
        assert!(rules.fits(PanelSet::all(), TermSize::default()));
    }

    #[test]
    fn test_stacked_mem_net() {
        let rules = MinimumSizes::default();
        assert_eq!(rules.minimum(PanelSet::MEM | PanelSet::NET), TermSize::new(36, 16));
        assert_eq!(
            rules.minimum(PanelSet::CPU | PanelSet::MEM | PanelSet::NET),
            TermSize::new(60, 24)
        );
    }

    #[test]
    fn test_empty_set_needs_nothing() {
        let rules = MinimumSizes::default();
        assert_eq!(rules.minimum(PanelSet::empty()), TermSize::new(0, 0));
    }

    #[test]
    fn test_too_small() {
        let rules = MinimumSizes::default();
        assert!(!rules.fits(PanelSet::MEM | PanelSet::NET, TermSize::new(50, 15)));
        assert!(rules.fits(PanelSet::NET, TermSize::new(50, 15)));
    }
}
