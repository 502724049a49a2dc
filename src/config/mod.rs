//! Configuration management for `websketch.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── preview    # [preview]
//! │   ├── thumbnail  # [thumbnail]
//! │   ├── collab     # [collab]
//! │   ├── serve      # [serve]
//! │   └── store      # [store]
//! ├── error          # ConfigError, ConfigDiagnostics
//! ├── util           # Config file discovery
//! └── mod.rs         # SketchConfig (this file)
//! ```
//!
//! The config file is optional: without one every section takes its
//! defaults. CLI flags override config values.

mod error;
pub mod section;
mod util;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};
pub use section::{CollabConfig, PreviewConfig, ServeConfig, StoreConfig, ThumbnailConfig};

use util::find_config_file;

use crate::{
    cli::{Cli, Commands},
    log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing websketch.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SketchConfig {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Directory relative paths resolve against (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub preview: PreviewConfig,

    #[serde(default)]
    pub thumbnail: ThumbnailConfig,

    #[serde(default)]
    pub collab: CollabConfig,

    #[serde(default)]
    pub serve: ServeConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

impl SketchConfig {
    /// Load configuration for the CLI invocation.
    ///
    /// Searches upward from cwd for the config file; falls back to defaults
    /// rooted at cwd when none exists.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or(cwd);
                config.config_path = Some(path);
                config
            }
            None => Self {
                root: cwd,
                ..Self::default()
            },
        };

        config.finalize(cli);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Resolve relative paths and apply CLI options.
    fn finalize(&mut self, cli: &Cli) {
        if self.store.dir.is_relative() {
            self.store.dir = self.root.join(&self.store.dir);
        }
        // One identity for the whole process.
        if self.collab.collaborator.is_none() {
            self.collab.collaborator = Some(self.collab.collaborator_id().to_string());
        }
        self.apply_command_options(cli);
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        crate::logger::set_verbose(cli.verbose);

        match &cli.command {
            Commands::Serve {
                interface,
                port,
                entry,
                auto_refresh,
                ..
            } => {
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
                Self::update_option(&mut self.preview.auto_refresh, auto_refresh.as_ref());
                if entry.is_some() {
                    self.preview.entry.clone_from(entry);
                }
            }
            Commands::Compose { entry, .. } if entry.is_some() => {
                self.preview.entry.clone_from(entry);
            }
            _ => {}
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.preview.validate(&mut diag);
        self.thumbnail.validate(&mut diag);
        self.collab.validate(&mut diag);

        diag.into_result().map_err(ConfigError::Validation)
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse a config snippet.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SketchConfig {
    let (parsed, ignored) = SketchConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_from_str_invalid_toml() {
        let result: Result<SketchConfig, _> = toml::from_str("[preview\nauto_refresh = true");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_config() {
        let config = SketchConfig::default();
        assert!(config.config_path.is_none());
        assert!(config.preview.auto_refresh);
        assert_eq!(config.collab.quiesce_ms, 100);
        assert_eq!(config.serve.port, 5280);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[preview]\nauto_refresh = false\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = SketchConfig::parse_with_ignored(content).unwrap();

        assert!(!config.preview.auto_refresh);
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_validation_reports_all_errors() {
        let config = test_parse_config(
            "[preview]\nrefresh_interval_ms = 0\n[thumbnail]\nscale = 2.0\n[collab]\nbroadcast_debounce_ms = 0",
        );
        let Err(ConfigError::Validation(diag)) = config.validate() else {
            panic!("expected validation errors");
        };
        assert_eq!(diag.len(), 3);
    }

    #[test]
    fn test_cli_overrides_serve_options() {
        let cli = Cli::try_parse_from([
            "websketch",
            "serve",
            "--port",
            "9000",
            "--auto-refresh",
            "false",
            "--entry",
            "about.html",
        ])
        .unwrap();
        let mut config = SketchConfig::default();
        config.finalize(&cli);

        assert_eq!(config.serve.port, 9000);
        assert!(!config.preview.auto_refresh);
        assert_eq!(config.preview.entry.as_deref(), Some("about.html"));
        assert!(config.collab.collaborator.is_some());
    }

    #[test]
    fn test_store_dir_resolved_against_root() {
        let cli = Cli::try_parse_from(["websketch", "store", "list"]).unwrap();
        let mut config = SketchConfig {
            root: PathBuf::from("/work/sketches"),
            ..SketchConfig::default()
        };
        config.finalize(&cli);
        assert_eq!(config.store.dir, Path::new("/work/sketches/.websketch"));
    }
}
