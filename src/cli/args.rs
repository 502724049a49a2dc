//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Web sketchbook: compose multi-file HTML/CSS/JS projects and preview them live
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Print debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (default: websketch.toml)
    #[arg(short = 'C', long, global = true, default_value = "websketch.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create a new project directory with the default files
    #[command(visible_alias = "n")]
    New {
        /// Project directory (relative to current directory)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        dir: PathBuf,

        /// Project name (default: directory name)
        #[arg(long)]
        name: Option<String>,

        /// Project description
        #[arg(short, long)]
        description: Option<String>,

        /// Single-file project (index.html only)
        #[arg(long)]
        single: bool,
    },

    /// Compose a project into one self-contained HTML document
    #[command(visible_alias = "c")]
    Compose {
        /// Project directory
        #[arg(default_value = ".", value_hint = clap::ValueHint::DirPath)]
        dir: PathBuf,

        /// Entry markup file (default: index.html, then the first markup file)
        #[arg(short, long)]
        entry: Option<String>,

        /// Compose the inert, scaled-down thumbnail variant
        #[arg(short, long)]
        thumbnail: bool,

        /// Output file (default: stdout)
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Export a project as a zip archive
    #[command(visible_alias = "e")]
    Export {
        /// Project directory
        #[arg(default_value = ".", value_hint = clap::ValueHint::DirPath)]
        dir: PathBuf,

        /// Archive path (default: <name>_export.zip)
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Add, remove or list the files of a project
    #[command(visible_alias = "f")]
    File {
        /// Project directory
        #[arg(short, long, global = true, default_value = ".", value_hint = clap::ValueHint::DirPath)]
        dir: PathBuf,

        #[command(subcommand)]
        action: FileAction,
    },

    /// Start the live preview server
    #[command(visible_alias = "s")]
    Serve {
        /// Project directory
        #[arg(default_value = ".", value_hint = clap::ValueHint::DirPath)]
        dir: PathBuf,

        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Initial entry markup file
        #[arg(short, long)]
        entry: Option<String>,

        /// Recompose the preview periodically
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        auto_refresh: Option<bool>,
    },

    /// Manage projects in the local store
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

/// File set operations
#[derive(Subcommand, Debug, Clone)]
pub enum FileAction {
    /// Create an empty file (kind follows the extension)
    Add { name: String },

    /// Remove a file from the project and from disk
    #[command(visible_alias = "remove")]
    Rm { name: String },

    /// List files in tab order
    #[command(visible_alias = "ls")]
    List,
}

/// Local store operations
#[derive(Subcommand, Debug, Clone)]
pub enum StoreAction {
    /// Save a project directory into the store
    Save {
        #[arg(default_value = ".", value_hint = clap::ValueHint::DirPath)]
        dir: PathBuf,
    },

    /// List stored projects (pinned first)
    #[command(visible_alias = "ls")]
    List {
        /// Only projects of this owner
        #[arg(long)]
        owner: Option<String>,
    },

    /// Write a stored project out to a directory
    Checkout {
        id: String,
        /// Target directory (default: the project's slug)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        dir: Option<PathBuf>,
    },

    /// Move a project to the trash
    #[command(visible_alias = "rm")]
    Delete { id: String },

    /// List projects in the trash
    Trash {
        /// Only projects of this owner
        #[arg(long)]
        owner: Option<String>,
    },

    /// Restore a project from the trash
    Restore { id: String },

    /// Permanently erase a project from the trash
    Purge { id: String },

    /// Pin or unpin a project
    Pin {
        id: String,
        #[arg(action = clap::ArgAction::Set, default_value = "true")]
        pinned: bool,
    },

    /// Make a project public or private
    Publish {
        id: String,
        #[arg(action = clap::ArgAction::Set, default_value = "true")]
        public: bool,
    },
}

impl Cli {
    /// Project directory the command works on, if any.
    pub fn project_dir(&self) -> Option<&std::path::Path> {
        match &self.command {
            Commands::New { dir, .. }
            | Commands::Compose { dir, .. }
            | Commands::Export { dir, .. }
            | Commands::File { dir, .. }
            | Commands::Serve { dir, .. } => Some(dir),
            Commands::Store {
                action: StoreAction::Save { dir },
            } => Some(dir),
            Commands::Store {
                action: StoreAction::Checkout { dir, .. },
            } => dir.as_deref(),
            Commands::Store { .. } => None,
        }
    }
}
