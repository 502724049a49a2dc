//! Time and timers.
//!
//! - `clock` - [`Clock`] trait with wall-clock and manual (virtual) sources
//! - `timer` - [`TimerQueue`] of cancellable one-shot timers

mod clock;
mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use timer::{TimerId, TimerKind, TimerQueue};
