//! Configuration section definitions.
//!
//! Each module corresponds to a section in `websketch.toml`:
//!
//! | Module      | TOML Section   | Purpose                                  |
//! |-------------|----------------|------------------------------------------|
//! | `preview`   | `[preview]`    | Auto-refresh and initial entry           |
//! | `thumbnail` | `[thumbnail]`  | Preview-safe composition                 |
//! | `collab`    | `[collab]`     | Identity, echo and broadcast windows     |
//! | `serve`     | `[serve]`      | Live preview server                      |
//! | `store`     | `[store]`      | Local project store                      |

mod collab;
mod preview;
mod serve;
mod store;
mod thumbnail;

pub use collab::CollabConfig;
pub use preview::PreviewConfig;
pub use serve::ServeConfig;
pub use store::StoreConfig;
pub use thumbnail::ThumbnailConfig;
