//! mac-winops: window discovery and activation for the switcher.
//!
//! [`enumerate`] walks every regular application's windows through a
//! [`WinOps`] implementation and returns them most recently used first.
//! [`group_by_application`] collapses that list to one entry per process.
//!
//! The OS side ([`RealWinOps`]) uses the CoreGraphics window list for the
//! stacking order, AppKit for running applications and activation, and the
//! Accessibility API for per-window titles, minimized state, un-minimize and
//! raise. [`MockWinOps`] stands in for it in tests on any platform.

mod enumerate;
mod error;
mod ops;
mod window;

pub use enumerate::{StackingPositions, enumerate, group_by_application, order_windows};
pub use error::{Error, Result};
#[cfg(target_os = "macos")]
pub use ops::RealWinOps;
pub use ops::{MockElement, MockWinOps, WinOps};
pub use window::{AppInfo, DiscoveredWindow, WindowElement, WindowHandle, WindowIdentity};

#[cfg(target_os = "macos")]
mod apps;
#[cfg(target_os = "macos")]
mod ax;
#[cfg(target_os = "macos")]
mod ax_private;
#[cfg(target_os = "macos")]
mod cfutil;
#[cfg(target_os = "macos")]
mod stacking;
