//! `[preview]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [preview]
//! auto_refresh = true          # Recompose periodically while mounted
//! refresh_interval_ms = 1000   # Auto-refresh period
//! entry = "index.html"         # Initially requested entry file
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::preview::RendererOptions;

/// Live preview settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Enable periodic re-composition at mount.
    pub auto_refresh: bool,

    /// Auto-refresh period in milliseconds.
    pub refresh_interval_ms: u64,

    /// Entry file requested at mount (default: index.html, then first markup).
    pub entry: Option<String>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            auto_refresh: true,
            refresh_interval_ms: 1000,
            entry: None,
        }
    }
}

impl PreviewConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn renderer_options(&self) -> RendererOptions {
        RendererOptions {
            auto_refresh: self.auto_refresh,
            refresh_interval: self.refresh_interval(),
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.refresh_interval_ms == 0 {
            diag.error_with_hint(
                FieldPath::new("preview.refresh_interval_ms"),
                "refresh interval must be positive",
                "set `auto_refresh = false` to disable periodic refresh",
            );
        }
        if self.entry.as_deref().is_some_and(|e| e.trim().is_empty()) {
            diag.error(FieldPath::new("preview.entry"), "entry file name is empty");
        }
    }
}
