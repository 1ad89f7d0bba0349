//! # Configuration
//!
//! Plain `serde` structs with defaults, so applications can embed them in whatever
//! settings file they load.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::time::Duration;

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_STORE_BUFFER: usize = 32;

/// Settings for one [`FilterController`](crate::FilterController).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilterConfig {
    /// Quiet period after the last edit before criteria are emitted.
    pub debounce_ms: u64,
    /// Facet keys the controller accepts. Empty means any key.
    pub facet_keys: BTreeSet<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            facet_keys: BTreeSet::new(),
        }
    }
}

impl FilterConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub fn with_facets<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facet_keys = keys.into_iter().map(Into::into).collect();
        self
    }
}

/// Settings for one [`StoreActor`](crate::StoreActor).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    /// Capacity of the request channel between clients and the actor.
    pub buffer_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_STORE_BUFFER,
        }
    }
}
