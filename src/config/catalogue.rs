//! The closed catalogue of configuration keys.
//!
//! Every key the dashboard knows is listed here exactly once, with its value
//! type and default. Which store owns a key is decided by this table alone.

use super::value::{DefaultValue, ValueKind};

/// One catalogue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigKey {
    /// Key name as used in the config file.
    pub name: &'static str,
    /// Default value, which also fixes the key's type.
    pub default: DefaultValue,
}

impl ConfigKey {
    /// Value type of the key.
    #[inline]
    pub const fn kind(&self) -> ValueKind {
        self.default.kind()
    }
}

const fn s(name: &'static str, default: &'static str) -> ConfigKey {
    ConfigKey { name, default: DefaultValue::Str(default) }
}

const fn b(name: &'static str, default: bool) -> ConfigKey {
    ConfigKey { name, default: DefaultValue::Bool(default) }
}

const fn i(name: &'static str, default: i64) -> ConfigKey {
    ConfigKey { name, default: DefaultValue::Int(default) }
}

/// All configuration keys.
pub static CATALOGUE: &[ConfigKey] = &[
    s("color_theme", "Default"),
    s("shown_boxes", "cpu mem net proc"),
    s("graph_symbol", "braille"),
    s(
        "presets",
        "cpu:1:default,proc:0:default cpu:0:default,mem:0:default,net:0:default cpu:0:block,net:0:tty",
    ),
    s("graph_symbol_cpu", "default"),
    s("graph_symbol_mem", "default"),
    s("graph_symbol_net", "default"),
    s("graph_symbol_proc", "default"),
    s("proc_sorting", "cpu lazy"),
    s("cpu_graph_upper", "Auto"),
    s("cpu_graph_lower", "Auto"),
    s("cpu_sensor", "Auto"),
    s("selected_battery", "Auto"),
    s("cpu_core_map", ""),
    s("temp_scale", "celsius"),
    s("clock_format", "%X"),
    s("custom_cpu_name", ""),
    s("disks_filter", ""),
    s("io_graph_speeds", ""),
    s("net_iface", ""),
    s("log_level", "WARNING"),
    s("proc_filter", ""),
    s("proc_command", ""),
    s("selected_name", ""),
    b("theme_background", true),
    b("truecolor", true),
    b("rounded_corners", true),
    b("proc_reversed", false),
    b("proc_tree", false),
    b("proc_colors", true),
    b("proc_gradient", true),
    b("proc_per_core", false),
    b("proc_mem_bytes", true),
    b("proc_cpu_graphs", true),
    b("proc_info_smaps", false),
    b("proc_left", false),
    b("proc_filter_kernel", false),
    b("cpu_invert_lower", true),
    b("cpu_single_graph", false),
    b("cpu_bottom", false),
    b("show_uptime", true),
    b("check_temp", true),
    b("show_coretemp", true),
    b("show_cpu_freq", true),
    b("background_update", true),
    b("mem_graphs", true),
    b("mem_below_net", false),
    b("zfs_arc_cached", true),
    b("show_swap", true),
    b("swap_disk", true),
    b("show_disks", true),
    b("only_physical", true),
    b("use_fstab", true),
    b("zfs_hide_datasets", false),
    b("show_io_stat", true),
    b("io_mode", false),
    b("base_10_sizes", false),
    b("io_graph_combined", false),
    b("net_auto", true),
    b("net_sync", true),
    b("show_battery", true),
    b("show_battery_watts", true),
    b("vim_keys", false),
    b("tty_mode", false),
    b("disk_free_priv", false),
    b("force_tty", false),
    b("lowcolor", false),
    b("show_detailed", false),
    b("proc_filtering", false),
    b("proc_aggregate", false),
    i("update_ms", 2000),
    i("net_download", 100),
    i("net_upload", 100),
    i("detailed_pid", 0),
    i("selected_pid", 0),
    i("selected_depth", 0),
    i("proc_start", 0),
    i("proc_selected", 0),
    i("proc_last_selected", 0),
];

/// Find a key in the catalogue.
pub fn lookup(name: &str) -> Option<&'static ConfigKey> {
    CATALOGUE.iter().find(|k| k.name == name)
}

/// Lower bound of the refresh interval, in milliseconds.
pub const UPDATE_MS_MIN: i64 = 100;
/// Upper bound of the refresh interval: one day minus one fine step.
pub const UPDATE_MS_MAX: i64 = 86_399_900;

/// Accepted values of `graph_symbol`.
pub const GRAPH_SYMBOLS: &[&str] = &["braille", "block", "tty"];
/// Accepted values of `graph_symbol_<panel>`; `default` follows `graph_symbol`.
pub const GRAPH_SYMBOL_VARIANTS: &[&str] = &["default", "braille", "block", "tty"];
/// Accepted values of `temp_scale`.
pub const TEMP_SCALES: &[&str] = &["celsius", "fahrenheit", "kelvin", "rankine"];
/// Accepted values of `log_level`.
pub const LOG_LEVELS: &[&str] = &["DISABLED", "ERROR", "WARNING", "INFO", "DEBUG"];
/// Process list sort orders, in the order `Left`/`Right` cycle through them.
pub const SORT_OPTIONS: &[&str] = &[
    "pid",
    "name",
    "command",
    "threads",
    "user",
    "memory",
    "cpu direct",
    "cpu lazy",
];
/// Accepted values of `cpu_graph_upper` and `cpu_graph_lower`.
pub const CPU_GRAPH_FIELDS: &[&str] = &[
    "Auto",
    "total",
    "user",
    "nice",
    "system",
    "idle",
    "iowait",
    "irq",
    "softirq",
    "steal",
    "guest",
    "guest_nice",
];
