//! mac-hotkey: global keyboard plumbing for Launchpick.
//!
//! Two independent mechanisms live here:
//!
//! - [`Registry`]: discrete global hotkeys registered with the OS (Carbon
//!   `RegisterEventHotKey` on macOS). A press is reported by id to a
//!   non-blocking sink and later resolved on the main context with
//!   [`Registry::fire`].
//! - [`tap`]: a session-wide keyboard event tap used for hold-to-cycle
//!   gestures. [`tap::classify`] is a pure function; the CoreGraphics
//!   callback in `sys` only adapts OS events to it.
//!
//! [`symbolic`] rewrites the system search shortcut so the launcher can take
//! over its key combination.

mod error;
pub use error::{Error, Result};

mod registry;
pub use registry::{HotkeyBackend, HotkeyBinding, Registry};

pub mod symbolic;
pub mod tap;

#[cfg(target_os = "macos")]
mod carbon;
#[cfg(target_os = "macos")]
pub use carbon::{CarbonBackend, HotkeySink};

#[cfg(target_os = "macos")]
mod sys;
#[cfg(target_os = "macos")]
pub use sys::{EventTap, install_event_tap};
