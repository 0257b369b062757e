//! Launchpick Engine
//!
//! The engine owns everything that happens on the main context:
//! - the hold-to-cycle switcher session ([`SwitcherState`] driven by the
//!   pure [`controller::apply`])
//! - global hotkeys for the launcher and same-app window cycling
//! - background enumeration and activation on a tokio blocking pool
//! - event tap installation, retried until it succeeds
//!
//! The host run loop posts [`MainMsg`] values through a [`MainSender`] and
//! drains them with [`Engine::drain`]. Presentation is delegated to
//! [`SwitcherUi`] and [`LauncherSurface`].

pub mod controller;
mod deps;
mod engine;
mod error;
pub mod layout;
mod main_loop;
mod state;
pub mod test_support;
mod ui;

#[cfg(target_os = "macos")]
pub use deps::RealTapInstaller;
pub use deps::{
    MockHotkeyBackend, MockSystemApi, MockTapInstaller, RealSystemApi, SystemApi, TapGuard,
    TapInstaller, TapSink,
};
pub use engine::{
    Engine, Flow, HotkeyAction, LAUNCHER_HOTKEY_ID, SAME_APP_HOTKEY_ID,
    SAME_APP_VISIBLE_HOTKEY_ID, Services, TAP_RETRY_INTERVAL,
};
pub use error::{Error, Result};
pub use main_loop::{MainMsg, MainSender, Waker, channel};
pub use state::{SnapshotEntry, SwitcherSnapshot, SwitcherState, reconcile_pending};
pub use ui::{LauncherSurface, SwitcherUi};
