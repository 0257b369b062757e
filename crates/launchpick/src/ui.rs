//! Log-only presentation hooks.
//!
//! The switcher and launcher panels are drawn elsewhere; this binary reports
//! what they would show.

use launchpick_engine::{LauncherSurface, SwitcherSnapshot, SwitcherUi};
use mac_winops::WindowHandle;
use tracing::{debug, info};

/// Switcher hooks that write each frame to the log.
pub struct LogUi;

impl SwitcherUi for LogUi {
    fn render(&mut self, snapshot: &SwitcherSnapshot) {
        let selected = snapshot.entries.get(snapshot.selected_index);
        info!(
            entries = snapshot.entries.len(),
            columns = snapshot.columns,
            grouped = snapshot.grouped,
            selected = selected.map_or("", |e| e.title.as_str()),
            app = selected.map_or("", |e| e.app_name.as_str()),
            "switcher"
        );
    }

    fn on_activated(&mut self, window: &WindowHandle) {
        debug!(pid = window.pid, title = %window.title, "activated");
    }

    fn on_dismissed(&mut self) {
        debug!("switcher_dismissed");
    }
}

/// Launcher stand-in that only tracks its visibility.
#[derive(Default)]
pub struct LogLauncher {
    /// Whether the launcher would be on screen.
    visible: bool,
}

impl LauncherSurface for LogLauncher {
    fn is_visible(&self) -> bool {
        self.visible
    }

    fn toggle(&mut self) {
        self.visible = !self.visible;
        info!(visible = self.visible, "launcher");
    }

    fn hide(&mut self) {
        if self.visible {
            self.visible = false;
            info!(visible = false, "launcher");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launcher_toggles_and_hides() {
        let mut l = LogLauncher::default();
        assert!(!l.is_visible());
        l.toggle();
        assert!(l.is_visible());
        l.hide();
        assert!(!l.is_visible());
        l.hide();
        assert!(!l.is_visible());
    }
}
