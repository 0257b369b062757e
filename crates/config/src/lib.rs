//! Launchpick settings.
//!
//! Settings are read from a JSON file (by default
//! `~/.config/launchpick/config.json`) with camelCase keys. Every field is
//! optional; missing fields take the defaults below. Unknown keys are
//! ignored so the file can be shared with the launcher panel.
//!
//! | key | default |
//! |---|---|
//! | `shortcut` | `cmd+shift+space` |
//! | `switcherShortcut` | `alt+tab` |
//! | `sameAppSwitcherShortcut` | `alt+cmd+p` |
//! | `sameAppVisibleShortcut` | `shift+` + same-app shortcut |
//! | `suppressSystemShortcut` | `false` |
//! | `spotlightShortcut` | unset |
//! | `columns` | `4` |
//! | `groupWindowsByApp` | `false` |

use std::result::Result as StdResult;

mod defaults;
mod error;
mod loader;
mod settings;

pub use error::Error;
pub use loader::{default_path, load, load_or_default};
pub use settings::{LauncherEntry, Settings};

/// Result alias for this crate.
pub type Result<T> = StdResult<T, Error>;
