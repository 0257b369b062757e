//! Test support utilities for launchpick-engine integration/unit tests.
//! These helpers are public so the integration suite can share them.

use std::sync::Arc;

use mac_winops::WindowHandle;
use parking_lot::Mutex;

use crate::{
    state::SwitcherSnapshot,
    ui::{LauncherSurface, SwitcherUi},
};

/// Something the engine told the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A frame was rendered.
    Render(SwitcherSnapshot),
    /// A window title was activated.
    Activated(String),
    /// The switcher was dismissed.
    Dismissed,
}

/// Switcher UI that records every call.
#[derive(Clone, Default)]
pub struct RecordingUi(Arc<Mutex<Vec<UiEvent>>>);

impl RecordingUi {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    pub fn events(&self) -> Vec<UiEvent> {
        self.0.lock().clone()
    }

    /// The most recent render.
    pub fn last_render(&self) -> Option<SwitcherSnapshot> {
        self.0.lock().iter().rev().find_map(|e| match e {
            UiEvent::Render(s) => Some(s.clone()),
            _ => None,
        })
    }

    /// Titles of activated windows, in order.
    pub fn activated(&self) -> Vec<String> {
        self.0
            .lock()
            .iter()
            .filter_map(|e| match e {
                UiEvent::Activated(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of dismissals.
    pub fn dismissals(&self) -> usize {
        self.0
            .lock()
            .iter()
            .filter(|e| matches!(e, UiEvent::Dismissed))
            .count()
    }
}

impl SwitcherUi for RecordingUi {
    fn render(&mut self, snapshot: &SwitcherSnapshot) {
        self.0.lock().push(UiEvent::Render(snapshot.clone()));
    }

    fn on_activated(&mut self, window: &WindowHandle) {
        self.0.lock().push(UiEvent::Activated(window.title.clone()));
    }

    fn on_dismissed(&mut self) {
        self.0.lock().push(UiEvent::Dismissed);
    }
}

/// Launcher whose visibility is a shared flag.
#[derive(Clone, Default)]
pub struct RecordingLauncher {
    /// Current visibility.
    visible: Arc<Mutex<bool>>,
    /// Toggle and hide calls, in order.
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl RecordingLauncher {
    /// A hidden launcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Force visibility without recording a call.
    pub fn set_visible(&self, v: bool) {
        *self.visible.lock() = v;
    }

    /// Calls recorded so far.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }
}

impl LauncherSurface for RecordingLauncher {
    fn is_visible(&self) -> bool {
        *self.visible.lock()
    }

    fn toggle(&mut self) {
        let mut v = self.visible.lock();
        *v = !*v;
        self.calls.lock().push("toggle");
    }

    fn hide(&mut self) {
        *self.visible.lock() = false;
        self.calls.lock().push("hide");
    }
}
