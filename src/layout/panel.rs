//! Panel identifiers and sets of panels.

use bitflags::bitflags;
use std::fmt;

/// One visual section of the dashboard.
///
/// The declaration order is the canonical screen order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum Panel {
    /// Processor usage.
    Cpu,
    /// Memory and disks.
    Mem,
    /// Network interfaces.
    Net,
    /// Process list.
    Proc,
}

impl Panel {
    /// All panels in canonical order.
    pub const ALL: [Self; 4] = [Self::Cpu, Self::Mem, Self::Net, Self::Proc];

    /// Config name of the panel (`cpu`, `mem`, `net`, `proc`).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Mem => "mem",
            Self::Net => "net",
            Self::Proc => "proc",
        }
    }

    /// Look up a panel by its config name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Panel bound to the visibility digit key `1..=4`.
    pub const fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1 => Some(Self::Cpu),
            2 => Some(Self::Mem),
            3 => Some(Self::Net),
            4 => Some(Self::Proc),
            _ => None,
        }
    }

    /// Position in the canonical order.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parse a space separated list of panel names.
    ///
    /// Fails on unknown names and on duplicates. An empty list is valid.
    pub fn parse_list(spec: &str) -> Option<Vec<Self>> {
        let mut panels: Vec<Self> = Vec::new();
        for name in spec.split_whitespace() {
            let panel = Self::from_name(name)?;
            if panels.contains(&panel) {
                return None;
            }
            panels.push(panel);
        }
        Some(panels)
    }

    /// Render panels back into the space separated form.
    pub fn join(panels: &[Self]) -> String {
        panels.iter().map(|p| p.name()).collect::<Vec<_>>().join(" ")
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// An unordered set of panels.
    ///
    /// Used where only membership matters, e.g. minimum size arithmetic.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PanelSet: u8 {
        /// Processor panel.
        const CPU = 0b0001;
        /// Memory panel.
        const MEM = 0b0010;
        /// Network panel.
        const NET = 0b0100;
        /// Process panel.
        const PROC = 0b1000;
    }
}

impl PanelSet {
    /// Check membership of a single panel.
    #[inline]
    pub fn has(self, panel: Panel) -> bool {
        self.contains(panel.into())
    }
}

impl From<Panel> for PanelSet {
    fn from(panel: Panel) -> Self {
        match panel {
            Panel::Cpu => Self::CPU,
            Panel::Mem => Self::MEM,
            Panel::Net => Self::NET,
            Panel::Proc => Self::PROC,
        }
    }
}

impl FromIterator<Panel> for PanelSet {
    fn from_iter<I: IntoIterator<Item = Panel>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |set, p| set | p.into())
    }
}

impl<'a> FromIterator<&'a Panel> for PanelSet {
    fn from_iter<I: IntoIterator<Item = &'a Panel>>(iter: I) -> Self {
        iter.into_iter().copied().collect()
    }
}

impl fmt::Debug for PanelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(Panel::parse_list("cpu mem"), Some(vec![Panel::Cpu, Panel::Mem]));
        assert_eq!(Panel::parse_list("  proc   net "), Some(vec![Panel::Proc, Panel::Net]));
        assert_eq!(Panel::parse_list(""), Some(vec![]));
        assert_eq!(Panel::parse_list("cpu gpu0"), None);
        assert_eq!(Panel::parse_list("cpu cpu"), None);
    }

    #[test]
    fn test_join_round_trips_order() {
        let panels = [Panel::Net, Panel::Cpu];
        assert_eq!(Panel::join(&panels), "net cpu");
    }

    #[test]
    fn test_panel_set_collect() {
        let set: PanelSet = [Panel::Cpu, Panel::Proc].iter().collect();
        assert!(set.has(Panel::Cpu));
        assert!(set.has(Panel::Proc));
        assert!(!set.has(Panel::Mem));
        assert_eq!(set, PanelSet::CPU | PanelSet::PROC);
    }

    #[test]
    fn test_digits() {
        assert_eq!(Panel::from_digit(3), Some(Panel::Net));
        assert_eq!(Panel::from_digit(0), None);
        assert_eq!(Panel::from_digit(5), None);
    }
}
