//! Running applications, activation and screen metrics via AppKit.

use objc2_app_kit::{
    NSApplicationActivationOptions, NSApplicationActivationPolicy, NSRunningApplication,
    NSScreen, NSWorkspace,
};
use objc2_foundation::MainThreadMarker;
use tracing::{debug, warn};

use crate::{AppInfo, Error, Result};

/// Snapshot of `NSWorkspace.runningApplications`.
pub(crate) fn running_apps() -> Vec<AppInfo> {
    let ws = NSWorkspace::sharedWorkspace();
    ws.runningApplications()
        .iter()
        .map(|app| AppInfo {
            pid: app.processIdentifier(),
            name: app
                .localizedName()
                .map(|s| s.to_string())
                .unwrap_or_default(),
            bundle_id: app.bundleIdentifier().map(|s| s.to_string()),
            regular: app.activationPolicy() == NSApplicationActivationPolicy::Regular,
        })
        .collect()
}

/// Pid of the frontmost application.
pub(crate) fn frontmost_pid() -> Option<i32> {
    NSWorkspace::sharedWorkspace()
        .frontmostApplication()
        .map(|app| app.processIdentifier())
}

/// Perform activation of an app by pid using NSRunningApplication. Main-thread only.
pub(crate) fn activate_pid(pid: i32) -> Result<()> {
    let _mtm = MainThreadMarker::new().ok_or(Error::MainThread)?;
    let app = NSRunningApplication::runningApplicationWithProcessIdentifier(pid as libc::pid_t)
        .ok_or(Error::ActivationFailed)?;
    // Empty options: only the raised window comes forward.
    let ok = app.activateWithOptions(NSApplicationActivationOptions::empty());
    if ok {
        debug!(pid, "app_activated");
    } else {
        warn!(pid, "activateWithOptions returned false");
    }
    Ok(())
}

/// Width of the main screen in points. Main-thread only.
pub(crate) fn main_screen_width() -> Option<f64> {
    let mtm = MainThreadMarker::new()?;
    NSScreen::mainScreen(mtm).map(|s| s.frame().size.width)
}
