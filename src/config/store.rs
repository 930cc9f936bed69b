//! Config store: validated key/value map with staged edits.
//!
//! Each store keeps two maps. `active` holds the values in effect; `staged`
//! holds edits that readers of `active` cannot see yet. [`commit`] merges the
//! staged edits over `active`, [`rollback`] discards them.
//!
//! Every value in either map was accepted by the key's validator when it was
//! written (or the key had no validator at that time).
//!
//! [`commit`]: ConfigStore::commit
//! [`rollback`]: ConfigStore::rollback

use super::error::ConfigError;
use std::collections::HashMap;
use std::fmt;

type Validator<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Validated store for one value type.
pub struct ConfigStore<T> {
    active: HashMap<String, T>,
    staged: HashMap<String, T>,
    validators: HashMap<String, Validator<T>>,
}

impl<T> Default for ConfigStore<T> {
    fn default() -> Self {
        Self {
            active: HashMap::new(),
            staged: HashMap::new(),
            validators: HashMap::new(),
        }
    }
}

impl<T: Clone + fmt::Display> ConfigStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Active value of `key`.
    pub fn get(&self, key: &str) -> Result<T, ConfigError> {
        self.active
            .get(key)
            .cloned()
            .ok_or_else(|| ConfigError::NotFound(key.to_owned()))
    }

    /// Validate and write `value` into the active map.
    pub fn set(&mut self, key: &str, value: T) -> Result<(), ConfigError> {
        self.validate(key, &value)?;
        self.active.insert(key.to_owned(), value);
        Ok(())
    }

    /// Validate and write `value` into the staged map only.
    pub fn stage(&mut self, key: &str, value: T) -> Result<(), ConfigError> {
        self.validate(key, &value)?;
        self.staged.insert(key.to_owned(), value);
        Ok(())
    }

    /// Pending (not yet committed) value of `key`.
    pub fn staged(&self, key: &str) -> Option<&T> {
        self.staged.get(key)
    }

    /// Check if any edits are pending.
    pub fn has_staged(&self) -> bool {
        !self.staged.is_empty()
    }

    /// Write every staged edit over the active map.
    ///
    /// Keys that were never staged keep their active value. The staged map
    /// is empty afterwards.
    pub fn commit(&mut self) {
        self.active.extend(self.staged.drain());
    }

    /// Discard every staged edit.
    pub fn rollback(&mut self) {
        self.staged.clear();
    }

    /// Install or replace the validator of `key`.
    ///
    /// Values already stored are not re-checked.
    pub fn add_validator<F>(&mut self, key: &str, validator: F)
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.validators.insert(key.to_owned(), Box::new(validator));
    }

    /// Run the validator of `key` without writing anything.
    pub fn check(&self, key: &str, value: &T) -> bool {
        self.validators.get(key).map_or(true, |accept| accept(value))
    }

    /// Names of all keys with an active value.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.active.keys().map(String::as_str)
    }

    /// Write a value without validation, for defaults seeded before any
    /// validator is installed.
    pub(crate) fn seed(&mut self, key: &str, value: T) {
        self.active.insert(key.to_owned(), value);
    }

    fn validate(&self, key: &str, value: &T) -> Result<(), ConfigError> {
        if self.check(key, value) {
            Ok(())
        } else {
            log::debug!("rejected {value} for {key}");
            Err(ConfigError::ValidationFailed {
                key: key.to_owned(),
                value: value.to_string(),
            })
        }
    }
}

impl<T> fmt::Debug for ConfigStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("active", &self.active.len())
            .field("staged", &self.staged.len())
            .field("validators", &self.validators.len())
            .finish()
    }
}
