//! Live, validated configuration.
//!
//! ## Stores and the catalogue
//!
//! Values live in three typed [`ConfigStore`]s (string, bool, int). The
//! [`CATALOGUE`] decides which store owns a key; typed access with the wrong
//! type is rejected with [`ConfigError::TypeMismatch`].
//!
//! ## Staged edits
//!
//! A store can hold pending edits next to its active values. Readers only
//! see active values until [`ConfigManager::commit`] merges the pending ones
//! in; [`ConfigManager::rollback`] drops them. The process filter uses this
//! while the user is typing.
//!
//! ## Sharing
//!
//! The manager is handed around as a [`SharedConfig`]. Writers quiesce the
//! collector before taking the write lock.

mod catalogue;
mod error;
mod manager;
mod presets;
mod store;
mod value;

use std::sync::{Arc, RwLock};

pub use catalogue::{
    lookup, ConfigKey, CATALOGUE, CPU_GRAPH_FIELDS, GRAPH_SYMBOLS, GRAPH_SYMBOL_VARIANTS,
    LOG_LEVELS, SORT_OPTIONS, TEMP_SCALES, UPDATE_MS_MAX, UPDATE_MS_MIN,
};
pub use error::ConfigError;
pub use manager::{ConfigManager, LoadReport};
pub use presets::{parse_preset, preset_list, validate_presets, PresetEntry, BUILTIN_PRESET, MAX_PRESETS};
pub use store::ConfigStore;
pub use value::{ConfigValue, DefaultValue, ValueKind};

/// The configuration shared by the dispatcher, renderer and collector.
pub type SharedConfig = Arc<RwLock<ConfigManager>>;

/// Wrap a manager for sharing.
pub fn shared(manager: ConfigManager) -> SharedConfig {
    Arc::new(RwLock::new(manager))
}
