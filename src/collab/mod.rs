//! Real-time collaboration.
//!
//! ```text
//!  local edit ──▶ BroadcastDebouncer ──(window)──▶ CollabChannel ──▶ peers
//!  peers ──▶ CollabChannel ──▶ RemoteReconciler ──▶ Project + EditorSurface
//! ```
//!
//! There is no merging: the last applied write of a file wins.

mod broadcast;
mod channel;
mod editor;
mod event;
mod presence;
mod reconcile;

pub use broadcast::BroadcastDebouncer;
pub use channel::{ChannelError, CollabChannel, LoopbackHub};
pub use editor::{Cursor, EditorSurface, TextBuffer};
pub use event::{ChannelMessage, CollaboratorChangeEvent, CollaboratorId, FileChange, PresenceBeat};
pub use presence::{Collaborator, PresenceRoster};
pub use reconcile::{ReconcileOutcome, RemoteReconciler};
