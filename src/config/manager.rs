//! Config manager: typed stores plus the cross-key operations.
//!
//! The manager owns one [`ConfigStore`] per value type and keeps derived
//! state consistent with the keys it mirrors:
//!
//! | Derived state    | Mirrors                  |
//! | :--------------- | :----------------------- |
//! | `current_boxes`  | `shown_boxes`            |
//! | `preset_list`    | `presets` (+ built-in)   |
//!
//! Multi-key operations ([`toggle_box`], [`apply_preset`]) validate
//! everything before writing anything, so a rejected request leaves no
//! partial state behind.
//!
//! [`toggle_box`]: ConfigManager::toggle_box
//! [`apply_preset`]: ConfigManager::apply_preset

use super::catalogue::{
    self, ConfigKey, CATALOGUE, CPU_GRAPH_FIELDS, GRAPH_SYMBOLS, GRAPH_SYMBOL_VARIANTS, LOG_LEVELS,
    SORT_OPTIONS, TEMP_SCALES, UPDATE_MS_MAX, UPDATE_MS_MIN,
};
use super::error::ConfigError;
use super::presets::{self, parse_preset};
use super::store::ConfigStore;
use super::value::{ConfigValue, DefaultValue, ValueKind};
use crate::layout::{Arrangement, MinimumSizes, Panel, PanelSet, SizeRules, TermSize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Outcome of [`ConfigManager::load`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Keys accepted as given.
    pub loaded: usize,
    /// Unknown keys and rejected values, in key order.
    pub warnings: Vec<String>,
}

impl LoadReport {
    /// Check if every pair was accepted.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    fn warn(&mut self, message: String) {
        log::warn!("{message}");
        self.warnings.push(message);
    }
}

/// The live configuration.
pub struct ConfigManager {
    pub(super) strings: ConfigStore<String>,
    pub(super) bools: ConfigStore<bool>,
    pub(super) ints: ConfigStore<i64>,
    current_boxes: Vec<Panel>,
    /// Panel that followed each panel hidden by `toggle_box` (`None` if it
    /// was last), for re-insertion.
    removed_before: HashMap<Panel, Option<Panel>>,
    preset_list: Vec<String>,
    current_preset: Option<usize>,
    available_batteries: Vec<String>,
    terminal: TermSize,
    rules: Box<dyn SizeRules>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Catalogue defaults with the standard minimum panel sizes.
    pub fn new() -> Self {
        Self::with_rules(MinimumSizes::default())
    }

    /// Catalogue defaults with custom minimum-size rules.
    pub fn with_rules(rules: impl SizeRules + 'static) -> Self {
        let mut manager = Self {
            strings: ConfigStore::new(),
            bools: ConfigStore::new(),
            ints: ConfigStore::new(),
            current_boxes: Vec::new(),
            removed_before: HashMap::new(),
            preset_list: Vec::new(),
            current_preset: None,
            available_batteries: Vec::new(),
            terminal: TermSize::default(),
            rules: Box::new(rules),
        };

        for key in CATALOGUE {
            match key.default {
                DefaultValue::Str(s) => manager.strings.seed(key.name, s.to_owned()),
                DefaultValue::Bool(b) => manager.bools.seed(key.name, b),
                DefaultValue::Int(n) => manager.ints.seed(key.name, n),
            }
        }
        manager.install_validators();
        manager.sync_derived("shown_boxes");
        manager.sync_derived("presets");
        manager
    }

    fn install_validators(&mut self) {
        self.ints
            .add_validator("update_ms", |v| (UPDATE_MS_MIN..=UPDATE_MS_MAX).contains(v));
        for key in ["net_download", "net_upload"] {
            self.ints.add_validator(key, |v| *v >= 1);
        }
        for key in ["proc_selected", "proc_start", "proc_last_selected"] {
            self.ints.add_validator(key, |v| *v >= 0);
        }

        self.strings
            .add_validator("graph_symbol", |v| GRAPH_SYMBOLS.contains(&v.as_str()));
        for panel in Panel::ALL {
            self.strings.add_validator(&format!("graph_symbol_{panel}"), |v| {
                GRAPH_SYMBOL_VARIANTS.contains(&v.as_str())
            });
        }
        self.strings
            .add_validator("shown_boxes", |v| Panel::parse_list(v).is_some());
        self.strings
            .add_validator("presets", |v| presets::validate_presets(v));
        self.strings
            .add_validator("proc_sorting", |v| SORT_OPTIONS.contains(&v.as_str()));
        self.strings
            .add_validator("temp_scale", |v| TEMP_SCALES.contains(&v.as_str()));
        self.strings
            .add_validator("log_level", |v| LOG_LEVELS.contains(&v.as_str()));
        for key in ["cpu_graph_upper", "cpu_graph_lower"] {
            self.strings
                .add_validator(key, |v| CPU_GRAPH_FIELDS.contains(&v.as_str()));
        }
        self.install_battery_validator();
    }

    fn install_battery_validator(&mut self) {
        let batteries = self.available_batteries.clone();
        self.strings.add_validator("selected_battery", move |v| {
            v == "Auto" || batteries.iter().any(|b| b == v)
        });
    }

    // ------------------------------------------------------------------
    // Typed access
    // ------------------------------------------------------------------

    fn entry<T: ConfigValue>(key: &str) -> Result<&'static ConfigKey, ConfigError> {
        let entry = catalogue::lookup(key).ok_or_else(|| ConfigError::NotFound(key.to_owned()))?;
        if entry.kind() != T::KIND {
            log::error!("config key {key} holds {} values, accessed as {}", entry.kind(), T::KIND);
            return Err(ConfigError::TypeMismatch {
                key: key.to_owned(),
                actual: entry.kind(),
                requested: T::KIND,
            });
        }
        Ok(entry)
    }

    /// Active value of `key`.
    pub fn get<T: ConfigValue>(&self, key: &str) -> Result<T, ConfigError> {
        Self::entry::<T>(key)?;
        T::store(self).get(key)
    }

    /// Validate and write `key`.
    pub fn set<T: ConfigValue>(&mut self, key: &str, value: T) -> Result<(), ConfigError> {
        Self::entry::<T>(key)?;
        T::store_mut(self).set(key, value)?;
        self.sync_derived(key);
        Ok(())
    }

    /// Validate and stage `key`; readers keep seeing the active value.
    pub fn stage<T: ConfigValue>(&mut self, key: &str, value: T) -> Result<(), ConfigError> {
        Self::entry::<T>(key)?;
        T::store_mut(self).stage(key, value)
    }

    /// Pending value of `key`, if staged.
    pub fn staged<T: ConfigValue>(&self, key: &str) -> Option<T> {
        Self::entry::<T>(key).ok()?;
        T::store(self).staged(key).cloned()
    }

    /// Check if any store has pending edits.
    pub fn has_staged(&self) -> bool {
        self.strings.has_staged() || self.bools.has_staged() || self.ints.has_staged()
    }

    /// Merge all staged edits into the active values.
    pub fn commit(&mut self) {
        let boxes = self.strings.staged("shown_boxes").is_some();
        let presets = self.strings.staged("presets").is_some();
        self.strings.commit();
        self.bools.commit();
        self.ints.commit();
        if boxes {
            self.sync_derived("shown_boxes");
        }
        if presets {
            self.sync_derived("presets");
        }
    }

    /// Discard all staged edits.
    pub fn rollback(&mut self) {
        self.strings.rollback();
        self.bools.rollback();
        self.ints.rollback();
    }

    /// String value of a catalogue key.
    ///
    /// A key missing from the catalogue or of another type is a programming
    /// error: it is logged and the default of the type is returned.
    pub fn string(&self, key: &str) -> String {
        self.value_or_default(key)
    }

    /// Boolean value of a catalogue key. See [`string`](Self::string).
    pub fn boolean(&self, key: &str) -> bool {
        self.value_or_default(key)
    }

    /// Integer value of a catalogue key. See [`string`](Self::string).
    pub fn int(&self, key: &str) -> i64 {
        self.value_or_default(key)
    }

    fn value_or_default<T: ConfigValue>(&self, key: &str) -> T {
        self.get(key).unwrap_or_else(|e| {
            log::error!("{e}");
            catalogue::lookup(key)
                .and_then(|k| T::from_default(k.default))
                .unwrap_or_default()
        })
    }

    /// Negate a boolean key.
    pub fn flip(&mut self, key: &str) -> Result<(), ConfigError> {
        let value: bool = self.get(key)?;
        self.set(key, !value)
    }

    /// Parse `raw` as the key's catalogue type and set it.
    pub fn try_set(&mut self, key: &str, raw: &str) -> Result<(), ConfigError> {
        let entry = catalogue::lookup(key).ok_or_else(|| ConfigError::NotFound(key.to_owned()))?;
        match entry.kind() {
            ValueKind::String => self.set(key, raw.to_owned()),
            ValueKind::Bool => self.set(key, parse_as::<bool>(key, raw)?),
            ValueKind::Int => self.set(key, parse_as::<i64>(key, raw)?),
        }
    }

    fn reset(&mut self, key: &str) {
        let Some(entry) = catalogue::lookup(key) else {
            return;
        };
        match entry.default {
            DefaultValue::Str(s) => self.strings.seed(key, s.to_owned()),
            DefaultValue::Bool(b) => self.bools.seed(key, b),
            DefaultValue::Int(n) => self.ints.seed(key, n),
        }
        self.sync_derived(key);
    }

    // ------------------------------------------------------------------
    // Persistence map
    // ------------------------------------------------------------------

    /// Populate the stores from `name → raw value` pairs.
    ///
    /// Unknown keys are skipped. A value that fails to parse or validate
    /// leaves the key at its catalogue default. Both produce a warning.
    pub fn load<I, K, V>(&mut self, values: I) -> LoadReport
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut pairs: Vec<(K, V)> = values.into_iter().collect();
        pairs.sort_by(|a, b| a.0.as_ref().cmp(b.0.as_ref()));

        let mut report = LoadReport::default();
        for (key, raw) in &pairs {
            let (key, raw) = (key.as_ref(), raw.as_ref());
            if catalogue::lookup(key).is_none() {
                report.warn(format!("Unknown config key: {key}"));
                continue;
            }
            match self.try_set(key, raw) {
                Ok(()) => report.loaded += 1,
                Err(e) => {
                    self.reset(key);
                    report.warn(format!("{e}; using default"));
                }
            }
        }
        log::debug!("loaded {} config keys, {} warnings", report.loaded, report.warnings.len());
        report
    }

    /// Every active value rendered as its config file string.
    pub fn export(&self) -> BTreeMap<String, String> {
        CATALOGUE
            .iter()
            .map(|key| {
                let value = match key.kind() {
                    ValueKind::String => self.string(key.name),
                    ValueKind::Bool => self.boolean(key.name).to_string(),
                    ValueKind::Int => self.int(key.name).to_string(),
                };
                (key.name.to_owned(), value)
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Panels and presets
    // ------------------------------------------------------------------

    /// Visible panels in screen order.
    pub fn current_boxes(&self) -> &[Panel] {
        &self.current_boxes
    }

    /// Check if a panel is visible.
    pub fn is_shown(&self, panel: Panel) -> bool {
        self.current_boxes.contains(&panel)
    }

    /// Visible panels as a set.
    pub fn visible(&self) -> PanelSet {
        self.current_boxes.iter().collect()
    }

    /// Placement switches for the layout.
    pub fn arrangement(&self) -> Arrangement {
        Arrangement {
            cpu_bottom: self.boolean("cpu_bottom"),
            mem_below_net: self.boolean("mem_below_net"),
            proc_left: self.boolean("proc_left"),
        }
    }

    /// Replace the visible panels from a space separated list.
    ///
    /// Every name must be a known panel and appear once. The terminal size
    /// is not checked here.
    pub fn set_boxes(&mut self, spec: &str) -> bool {
        let Some(panels) = Panel::parse_list(spec) else {
            log::debug!("invalid panel list {spec:?}");
            return false;
        };
        self.removed_before.clear();
        self.write_boxes(panels)
    }

    /// Show a hidden panel or hide a shown one.
    ///
    /// The resulting combination must fit the terminal, otherwise nothing
    /// changes. Hiding remembers the panel that followed, so toggling twice
    /// restores the original order. A panel shown again goes back in front
    /// of that neighbour while it is still visible, otherwise (and when never
    /// shown before) at its canonical position.
    pub fn toggle_box(&mut self, name: &str) -> bool {
        let Some(panel) = Panel::from_name(name) else {
            log::debug!("toggle of unknown panel {name:?}");
            return false;
        };

        let mut next = self.current_boxes.clone();
        let removed = next.iter().position(|p| *p == panel);
        let follower = match removed {
            Some(pos) => {
                next.remove(pos);
                Some(next.get(pos).copied())
            }
            None => {
                let pos = self.insertion_point(&next, panel);
                next.insert(pos, panel);
                None
            }
        };

        if !self.fits(&next) {
            log::debug!("{} does not fit {:?}", Panel::join(&next), self.terminal);
            return false;
        }
        if !self.write_boxes(next) {
            return false;
        }
        match follower {
            Some(follower) => {
                self.removed_before.insert(panel, follower);
            }
            None => {
                self.removed_before.remove(&panel);
            }
        }
        true
    }

    fn insertion_point(&self, boxes: &[Panel], panel: Panel) -> usize {
        let canonical = || {
            boxes
                .iter()
                .position(|p| p.index() > panel.index())
                .unwrap_or(boxes.len())
        };
        match self.removed_before.get(&panel) {
            Some(Some(follower)) => boxes
                .iter()
                .position(|p| p == follower)
                .unwrap_or_else(canonical),
            Some(None) => boxes.len(),
            None => canonical(),
        }
    }

    /// Check if the listed panels fit the current terminal.
    ///
    /// Unknown or repeated names fail.
    pub fn validate_box_sizes(&self, spec: &str) -> bool {
        Panel::parse_list(spec).is_some_and(|panels| self.fits(&panels))
    }

    fn fits(&self, panels: &[Panel]) -> bool {
        self.rules.fits(panels.iter().collect(), self.terminal)
    }

    fn write_boxes(&mut self, panels: Vec<Panel>) -> bool {
        if let Err(e) = self.strings.set("shown_boxes", Panel::join(&panels)) {
            log::error!("{e}");
            return false;
        }
        self.current_boxes = panels;
        true
    }

    /// Check a space separated list of preset descriptors.
    pub fn validate_presets(&self, presets: &str) -> bool {
        presets::validate_presets(presets)
    }

    /// Apply a preset descriptor.
    ///
    /// The descriptor must parse, its panels must fit the terminal and its
    /// graph symbols must validate. Only then are the placement switches,
    /// the graph symbols and the visible panels written.
    pub fn apply_preset(&mut self, descriptor: &str) -> bool {
        let Some(entries) = parse_preset(descriptor) else {
            log::debug!("invalid preset {descriptor:?}");
            return false;
        };
        let panels: Vec<Panel> = entries.iter().map(|e| e.panel).collect();
        if !self.fits(&panels) {
            log::debug!("preset {descriptor:?} does not fit {:?}", self.terminal);
            return false;
        }
        if !entries
            .iter()
            .all(|e| self.strings.check(e.symbol_key(), &e.variant.to_owned()))
        {
            return false;
        }

        for entry in &entries {
            if let Some(key) = entry.placement_key() {
                if let Err(e) = self.bools.set(key, entry.subopt) {
                    log::error!("{e}");
                }
            }
            if let Err(e) = self.strings.set(entry.symbol_key(), entry.variant.to_owned()) {
                log::error!("{e}");
            }
        }
        self.removed_before.clear();
        self.write_boxes(panels)
    }

    /// The built-in preset followed by the configured ones.
    pub fn preset_list(&self) -> &[String] {
        &self.preset_list
    }

    /// Index into [`preset_list`](Self::preset_list) of the applied preset.
    pub const fn current_preset(&self) -> Option<usize> {
        self.current_preset
    }

    /// Record the applied preset, or `None` after a manual change.
    pub fn set_current_preset(&mut self, index: Option<usize>) {
        self.current_preset = index.filter(|i| *i < self.preset_list.len());
    }

    // ------------------------------------------------------------------
    // Environment
    // ------------------------------------------------------------------

    /// Current terminal size used for fit checks.
    pub const fn terminal_size(&self) -> TermSize {
        self.terminal
    }

    /// Update the terminal size used for fit checks.
    pub fn set_terminal_size(&mut self, size: TermSize) {
        self.terminal = size;
    }

    /// Batteries reported by the system.
    pub fn available_batteries(&self) -> &[String] {
        &self.available_batteries
    }

    /// Replace the battery list; `selected_battery` accepts `Auto` or one of
    /// these from now on.
    pub fn set_available_batteries(&mut self, batteries: Vec<String>) {
        self.available_batteries = batteries;
        self.install_battery_validator();
    }

    fn sync_derived(&mut self, key: &str) {
        match key {
            "shown_boxes" => {
                let spec = self.string("shown_boxes");
                self.current_boxes = Panel::parse_list(&spec).unwrap_or_default();
                self.removed_before.clear();
            }
            "presets" => {
                self.preset_list = presets::preset_list(&self.string("presets"));
                if self.current_preset.is_some_and(|i| i >= self.preset_list.len()) {
                    self.current_preset = None;
                }
            }
            _ => {}
        }
    }
}

impl fmt::Debug for ConfigManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigManager")
            .field("current_boxes", &self.current_boxes)
            .field("current_preset", &self.current_preset)
            .field("presets", &self.preset_list.len())
            .field("terminal", &self.terminal)
            .finish_non_exhaustive()
    }
}

fn parse_as<T: ConfigValue>(key: &str, raw: &str) -> Result<T, ConfigError> {
    T::parse(raw).ok_or_else(|| ConfigError::Parse {
        key: key.to_owned(),
        kind: T::KIND,
        value: raw.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let cfg = ConfigManager::new();
        assert_eq!(cfg.get::<i64>("update_ms"), Ok(2000));
        assert_eq!(cfg.get::<bool>("vim_keys"), Ok(false));
        assert_eq!(cfg.string("shown_boxes"), "cpu mem net proc");
        assert_eq!(cfg.current_boxes(), &Panel::ALL);
        assert_eq!(cfg.preset_list().len(), 4);
        assert_eq!(cfg.current_preset(), None);
    }

    #[test]
    fn test_unknown_key_and_type_mismatch() {
        let mut cfg = ConfigManager::new();
        assert_eq!(cfg.get::<i64>("nope"), Err(ConfigError::NotFound("nope".into())));
        assert!(matches!(
            cfg.get::<bool>("update_ms"),
            Err(ConfigError::TypeMismatch { actual: ValueKind::Int, requested: ValueKind::Bool, .. })
        ));
        assert!(matches!(cfg.set("vim_keys", 1_i64), Err(ConfigError::TypeMismatch { .. })));
        assert_eq!(cfg.int("vim_keys"), 0);
        assert!(!cfg.boolean("nope"));
    }

    #[test]
    fn test_update_ms_floor() {
        let mut cfg = ConfigManager::new();
        assert!(matches!(
            cfg.set("update_ms", 50_i64),
            Err(ConfigError::ValidationFailed { .. })
        ));
        assert_eq!(cfg.int("update_ms"), 2000);
        assert!(cfg.set("update_ms", 100_i64).is_ok());
        assert!(cfg.set("update_ms", UPDATE_MS_MAX + 1).is_err());
    }

    #[test]
    fn test_stage_commit_rollback() {
        let mut cfg = ConfigManager::new();
        cfg.stage("proc_filter", "fire".to_owned()).unwrap();
        assert_eq!(cfg.string("proc_filter"), "");
        assert_eq!(cfg.staged::<String>("proc_filter").as_deref(), Some("fire"));
        cfg.rollback();
        assert_eq!(cfg.string("proc_filter"), "");
        assert!(!cfg.has_staged());

        cfg.stage("proc_filter", "firefox".to_owned()).unwrap();
        cfg.commit();
        assert_eq!(cfg.string("proc_filter"), "firefox");
        assert_eq!(cfg.int("update_ms"), 2000);
    }

    #[test]
    fn test_flip() {
        let mut cfg = ConfigManager::new();
        cfg.flip("proc_tree").unwrap();
        assert!(cfg.boolean("proc_tree"));
        cfg.flip("proc_tree").unwrap();
        assert!(!cfg.boolean("proc_tree"));
        assert!(cfg.flip("update_ms").is_err());
    }

    #[test]
    fn test_try_set_parses_by_type() {
        let mut cfg = ConfigManager::new();
        cfg.try_set("vim_keys", "YES").unwrap();
        assert!(cfg.boolean("vim_keys"));
        cfg.try_set("update_ms", "1500").unwrap();
        assert_eq!(cfg.int("update_ms"), 1500);
        assert!(matches!(cfg.try_set("update_ms", "15s"), Err(ConfigError::Parse { .. })));
        assert!(matches!(cfg.try_set("vim_keys", "maybe"), Err(ConfigError::Parse { .. })));
        cfg.try_set("clock_format", "%H:%M").unwrap();
        assert_eq!(cfg.string("clock_format"), "%H:%M");
    }

    #[test]
    fn test_load_reports_and_falls_back() {
        let mut cfg = ConfigManager::new();
        cfg.set("update_ms", 700_i64).unwrap();
        let map: HashMap<String, String> = [
            ("update_ms", "50"),
            ("vim_keys", "true"),
            ("no_such_key", "1"),
            ("shown_boxes", "proc cpu"),
            ("graph_symbol", "dots"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();

        let report = cfg.load(&map);
        assert_eq!(report.loaded, 2);
        assert_eq!(report.warnings.len(), 3);
        assert!(report.warnings.iter().any(|w| w.contains("no_such_key")));
        assert_eq!(cfg.int("update_ms"), 2000);
        assert_eq!(cfg.string("graph_symbol"), "braille");
        assert!(cfg.boolean("vim_keys"));
        assert_eq!(cfg.current_boxes(), &[Panel::Proc, Panel::Cpu]);
    }

    #[test]
    fn test_load_bad_boxes_keeps_default() {
        let mut cfg = ConfigManager::new();
        let report = cfg.load([("shown_boxes", "cpu gpu0")]);
        assert!(!report.is_clean());
        assert_eq!(cfg.current_boxes(), &Panel::ALL);
    }

    #[test]
    fn test_export_covers_catalogue() {
        let mut cfg = ConfigManager::new();
        cfg.set("proc_tree", true).unwrap();
        let map = cfg.export();
        assert_eq!(map.len(), CATALOGUE.len());
        assert_eq!(map["proc_tree"], "true");
        assert_eq!(map["update_ms"], "2000");

        let mut reloaded = ConfigManager::new();
        assert!(reloaded.load(&map).is_clean());
        assert!(reloaded.boolean("proc_tree"));
    }

    #[test]
    fn test_box_scenario_on_small_terminal() {
        let mut cfg = ConfigManager::new();
        assert!(cfg.set_boxes("cpu mem"));
        assert_eq!(cfg.current_boxes(), &[Panel::Cpu, Panel::Mem]);
        assert!(cfg.toggle_box("net"));
        assert_eq!(cfg.current_boxes(), &[Panel::Cpu, Panel::Mem, Panel::Net]);
        assert_eq!(cfg.string("shown_boxes"), "cpu mem net");

        cfg.set_terminal_size(TermSize::new(50, 15));
        assert!(!cfg.validate_box_sizes("mem net"));
        assert!(!cfg.toggle_box("cpu"));
        assert_eq!(cfg.current_boxes(), &[Panel::Cpu, Panel::Mem, Panel::Net]);
        assert_eq!(cfg.string("shown_boxes"), "cpu mem net");
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let mut cfg = ConfigManager::new();
        let before = cfg.current_boxes().to_vec();
        assert!(cfg.toggle_box("mem"));
        assert_eq!(cfg.current_boxes(), &[Panel::Cpu, Panel::Net, Panel::Proc]);
        assert!(cfg.toggle_box("mem"));
        assert_eq!(cfg.current_boxes(), before.as_slice());

        assert!(cfg.set_boxes("proc cpu"));
        assert!(cfg.toggle_box("proc"));
        assert!(cfg.toggle_box("proc"));
        assert_eq!(cfg.current_boxes(), &[Panel::Proc, Panel::Cpu]);
    }

    #[test]
    fn test_interleaved_toggles_keep_canonical_order() {
        let mut cfg = ConfigManager::new();
        assert!(cfg.toggle_box("cpu"));
        assert!(cfg.toggle_box("mem"));
        assert_eq!(cfg.current_boxes(), &[Panel::Net, Panel::Proc]);
        assert!(cfg.toggle_box("cpu"));
        assert_eq!(cfg.current_boxes(), &[Panel::Cpu, Panel::Net, Panel::Proc]);
        assert!(cfg.toggle_box("mem"));
        assert_eq!(cfg.current_boxes(), &Panel::ALL);
    }

    #[test]
    fn test_toggle_restores_last_panel_at_end() {
        let mut cfg = ConfigManager::new();
        assert!(cfg.set_boxes("proc cpu"));
        assert!(cfg.toggle_box("cpu"));
        assert!(cfg.toggle_box("mem"));
        assert_eq!(cfg.current_boxes(), &[Panel::Mem, Panel::Proc]);
        assert!(cfg.toggle_box("cpu"));
        assert_eq!(cfg.current_boxes(), &[Panel::Mem, Panel::Proc, Panel::Cpu]);
    }

    #[test]
    fn test_set_boxes_rejects() {
        let mut cfg = ConfigManager::new();
        assert!(!cfg.set_boxes("cpu cpu"));
        assert!(!cfg.set_boxes("cpu disk"));
        assert!(!cfg.toggle_box("gpu0"));
        assert_eq!(cfg.current_boxes(), &Panel::ALL);
    }

    #[test]
    fn test_set_shown_boxes_key_syncs_panels() {
        let mut cfg = ConfigManager::new();
        cfg.set("shown_boxes", "net".to_owned()).unwrap();
        assert_eq!(cfg.current_boxes(), &[Panel::Net]);
        assert!(cfg.set("shown_boxes", "net net".to_owned()).is_err());
        assert_eq!(cfg.current_boxes(), &[Panel::Net]);
    }

    #[test]
    fn test_apply_preset() {
        let mut cfg = ConfigManager::new();
        assert!(cfg.apply_preset("cpu:1:block,proc:1:default"));
        assert_eq!(cfg.current_boxes(), &[Panel::Cpu, Panel::Proc]);
        assert!(cfg.boolean("cpu_bottom"));
        assert!(cfg.boolean("proc_left"));
        assert_eq!(cfg.string("graph_symbol_cpu"), "block");
        assert_eq!(cfg.string("shown_boxes"), "cpu proc");
    }

    #[test]
    fn test_apply_preset_is_all_or_nothing() {
        let mut cfg = ConfigManager::new();
        assert!(!cfg.apply_preset("cpu:1:block,proc:2:default"));
        assert!(!cfg.apply_preset("cpu:1:block,cpu:0:tty"));
        cfg.set_terminal_size(TermSize::new(40, 10));
        assert!(!cfg.apply_preset("cpu:1:block"));

        assert_eq!(cfg.current_boxes(), &Panel::ALL);
        assert!(!cfg.boolean("cpu_bottom"));
        assert_eq!(cfg.string("graph_symbol_cpu"), "default");
    }

    #[test]
    fn test_presets_key_rebuilds_list() {
        let mut cfg = ConfigManager::new();
        cfg.set("presets", "net:0:tty".to_owned()).unwrap();
        assert_eq!(cfg.preset_list(), &[presets::BUILTIN_PRESET.to_owned(), "net:0:tty".to_owned()]);
        assert!(cfg.set("presets", "net:0:dots".to_owned()).is_err());
        cfg.set_current_preset(Some(5));
        assert_eq!(cfg.current_preset(), None);
        cfg.set_current_preset(Some(1));
        assert_eq!(cfg.current_preset(), Some(1));
    }

    #[test]
    fn test_battery_validator_follows_list() {
        let mut cfg = ConfigManager::new();
        assert!(cfg.set("selected_battery", "BAT0".to_owned()).is_err());
        cfg.set_available_batteries(vec!["BAT0".into(), "BAT1".into()]);
        assert!(cfg.set("selected_battery", "BAT0".to_owned()).is_ok());
        assert!(cfg.set("selected_battery", "Auto".to_owned()).is_ok());
        assert_eq!(cfg.available_batteries().len(), 2);
    }
}
