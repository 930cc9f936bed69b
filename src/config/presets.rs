//! Preset descriptors.
//!
//! A preset is a comma separated list of `panel:subopt:variant` triplets,
//! e.g. `cpu:1:default,proc:0:default`. The `presets` key holds up to
//! [`MAX_PRESETS`] of them separated by spaces.
//!
//! `subopt` flips the panel's placement switch (`cpu_bottom`,
//! `mem_below_net`, `proc_left`; ignored for net). `variant` becomes the
//! panel's `graph_symbol_<panel>`.

use super::catalogue::GRAPH_SYMBOL_VARIANTS;
use crate::layout::Panel;

/// Maximum number of user presets.
pub const MAX_PRESETS: usize = 9;

/// The always-present first preset: every panel, default placement.
pub const BUILTIN_PRESET: &str = "cpu:0:default,mem:0:default,net:0:default,proc:0:default";

/// One parsed triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetEntry {
    /// Panel to show.
    pub panel: Panel,
    /// Placement switch.
    pub subopt: bool,
    /// Graph symbol variant for the panel.
    pub variant: &'static str,
}

impl PresetEntry {
    /// Config key of the panel's placement switch, if it has one.
    pub const fn placement_key(&self) -> Option<&'static str> {
        match self.panel {
            Panel::Cpu => Some("cpu_bottom"),
            Panel::Mem => Some("mem_below_net"),
            Panel::Proc => Some("proc_left"),
            Panel::Net => None,
        }
    }

    /// Config key of the panel's graph symbol.
    pub const fn symbol_key(&self) -> &'static str {
        match self.panel {
            Panel::Cpu => "graph_symbol_cpu",
            Panel::Mem => "graph_symbol_mem",
            Panel::Net => "graph_symbol_net",
            Panel::Proc => "graph_symbol_proc",
        }
    }
}

/// Parse one preset descriptor.
///
/// Fails on unknown or repeated panels, a subopt other than `0`/`1`, an
/// unknown variant, or an empty descriptor.
pub fn parse_preset(descriptor: &str) -> Option<Vec<PresetEntry>> {
    let mut entries: Vec<PresetEntry> = Vec::new();
    for triplet in descriptor.split(',') {
        let mut parts = triplet.split(':');
        let (Some(name), Some(subopt), Some(variant), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return None;
        };

        let panel = Panel::from_name(name)?;
        if entries.iter().any(|e| e.panel == panel) {
            return None;
        }
        let subopt = match subopt {
            "0" => false,
            "1" => true,
            _ => return None,
        };
        let variant = GRAPH_SYMBOL_VARIANTS.iter().copied().find(|v| *v == variant)?;

        entries.push(PresetEntry { panel, subopt, variant });
    }
    Some(entries)
}

/// Validate the space separated `presets` value.
pub fn validate_presets(presets: &str) -> bool {
    let mut count = 0;
    for descriptor in presets.split_whitespace() {
        count += 1;
        if count > MAX_PRESETS || parse_preset(descriptor).is_none() {
            return false;
        }
    }
    true
}

/// The preset list: the built-in preset followed by the configured ones.
pub fn preset_list(presets: &str) -> Vec<String> {
    std::iter::once(BUILTIN_PRESET)
        .chain(presets.split_whitespace())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_preset() {
        let entries = parse_preset("cpu:1:default,proc:0:braille").unwrap();
        assert_eq!(
            entries,
            vec![
                PresetEntry { panel: Panel::Cpu, subopt: true, variant: "default" },
                PresetEntry { panel: Panel::Proc, subopt: false, variant: "braille" },
            ]
        );
        assert_eq!(entries[0].placement_key(), Some("cpu_bottom"));
        assert_eq!(entries[1].symbol_key(), "graph_symbol_proc");
    }

    #[test]
    fn test_parse_preset_rejects() {
        for bad in [
            "",
            "cpu",
            "cpu:1",
            "cpu:2:default",
            "cpu:1:dots",
            "gpu0:0:default",
            "cpu:0:default,cpu:1:tty",
            "cpu:0:default:extra",
            "cpu:0:default,",
        ] {
            assert_eq!(parse_preset(bad), None, "{bad:?}");
        }
    }

    #[test]
    fn test_builtin_is_valid() {
        assert_eq!(parse_preset(BUILTIN_PRESET).map(|e| e.len()), Some(4));
    }

    #[test]
    fn test_validate_presets_limit() {
        let one = "net:0:tty";
        let nine = vec![one; MAX_PRESETS].join(" ");
        let ten = vec![one; MAX_PRESETS + 1].join(" ");
        assert!(validate_presets(&nine));
        assert!(!validate_presets(&ten));
        assert!(validate_presets(""));
        assert!(!validate_presets("net:0:tty mem:9:tty"));
    }

    #[test]
    fn test_preset_list_starts_with_builtin() {
        let list = preset_list("cpu:1:default,proc:0:default net:0:tty");
        assert_eq!(list.len(), 3);
        assert_eq!(list[0], BUILTIN_PRESET);
        assert_eq!(list[2], "net:0:tty");
    }
}
