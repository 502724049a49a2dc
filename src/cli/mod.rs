//! Command-line interface module.

mod args;
pub mod compose;
pub mod export;
pub mod file;
pub mod new;
pub mod project_dir;
pub mod serve;
pub mod store;

pub use args::{Cli, Commands, FileAction, StoreAction};
