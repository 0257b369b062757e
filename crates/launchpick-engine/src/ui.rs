//! Hooks into the presentation layer.
//!
//! The engine never draws. It hands snapshots to a [`SwitcherUi`] and asks a
//! [`LauncherSurface`] to show or hide itself.

use mac_winops::WindowHandle;

use crate::state::SwitcherSnapshot;

/// Switcher presentation.
pub trait SwitcherUi {
    /// Draw the switcher. Called when it appears and after every selection
    /// change while it is visible.
    fn render(&mut self, snapshot: &SwitcherSnapshot);
    /// A window was brought to the front.
    fn on_activated(&mut self, window: &WindowHandle);
    /// The switcher went off screen.
    fn on_dismissed(&mut self);
}

/// The launcher panel.
pub trait LauncherSurface {
    /// The panel is on screen.
    fn is_visible(&self) -> bool;
    /// Show the panel if hidden, hide it if shown.
    fn toggle(&mut self);
    /// Hide the panel. No-op when hidden.
    fn hide(&mut self);
}
