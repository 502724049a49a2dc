//! websketch - compose multi-file HTML/CSS/JS sketches and preview them live.
//!
//! # Module Structure
//!
//! ```text
//! project   FileSet model: ordered files, names, kinds, active file
//! compose   Document composer and thumbnail variant
//! preview   Preview renderer, surfaces, navigation interceptor
//! collab    Remote change reconciler, broadcast debouncer, presence
//! schedule  Clocks and the timer queue every component schedules on
//! session   EditorSession: one open project wired to all of the above
//! backend   Persistence service and collaboration channel seams
//! export    Zip archive export
//! config    websketch.toml
//! cli       Command-line front end (used by the `websketch` binary)
//! ```
//!
//! The core modules never block or spawn threads; an embedding editor owns
//! the event loop and drives an [`session::EditorSession`] from it.

pub mod backend;
pub mod cli;
pub mod collab;
pub mod compose;
pub mod config;
pub mod core;
pub mod embed;
pub mod export;
pub mod logger;
pub mod preview;
pub mod project;
pub mod schedule;
pub mod session;
