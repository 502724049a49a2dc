//! `[store]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [store]
//! dir = ".websketch"   # Holds projects/ and trash/, relative to the config file
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Local project store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".websketch"),
        }
    }
}
