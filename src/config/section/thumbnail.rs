//! `[thumbnail]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [thumbnail]
//! scale = 0.75    # Body scale factor, in (0, 1]
//! ```

use serde::{Deserialize, Serialize};

use crate::compose::ThumbnailOptions;
use crate::config::{ConfigDiagnostics, FieldPath};

/// Thumbnail composition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    pub scale: f32,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            scale: ThumbnailOptions::default().scale,
        }
    }
}

impl ThumbnailConfig {
    pub fn options(&self) -> ThumbnailOptions {
        ThumbnailOptions { scale: self.scale }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !(self.scale > 0.0 && self.scale <= 1.0) {
            diag.error(
                FieldPath::new("thumbnail.scale"),
                format!("scale must be in (0, 1], got {}", self.scale),
            );
        }
    }
}
