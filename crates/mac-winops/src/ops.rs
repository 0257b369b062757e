use std::{
    collections::HashMap,
    process,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use parking_lot::Mutex;

use crate::{AppInfo, DiscoveredWindow, Error, Result, WindowElement};

/// Trait abstraction over the OS window APIs, so enumeration and activation
/// can be exercised without a window server.
pub trait WinOps: Send + Sync {
    /// On-screen layer-0 window numbers, front to back. `None` when the
    /// window server cannot be queried.
    fn stacking_order(&self) -> Option<Vec<u32>>;
    /// Every running application.
    fn running_apps(&self) -> Vec<AppInfo>;
    /// The windows of one application. May block on the application.
    fn app_windows(&self, app: &AppInfo) -> Result<Vec<DiscoveredWindow>>;
    /// Make `pid` the active application. Main thread only.
    fn activate_app(&self, pid: i32) -> Result<()>;
    /// Pid of the frontmost application.
    fn frontmost_pid(&self) -> Option<i32>;
    /// Width in points of the main screen, when known. Main thread only.
    fn main_screen_width(&self) -> Option<f64>;
    /// This process, which never appears in its own switcher.
    fn own_pid(&self) -> i32 {
        process::id() as i32
    }
}

/// Production implementation of WinOps delegating to crate functions.
#[cfg(target_os = "macos")]
pub struct RealWinOps;

#[cfg(target_os = "macos")]
impl WinOps for RealWinOps {
    fn stacking_order(&self) -> Option<Vec<u32>> {
        crate::stacking::layer0_window_numbers()
    }
    fn running_apps(&self) -> Vec<AppInfo> {
        crate::apps::running_apps()
    }
    fn app_windows(&self, app: &AppInfo) -> Result<Vec<DiscoveredWindow>> {
        crate::ax::app_windows(app.pid)
    }
    fn activate_app(&self, pid: i32) -> Result<()> {
        crate::apps::activate_pid(pid)
    }
    fn frontmost_pid(&self) -> Option<i32> {
        crate::apps::frontmost_pid()
    }
    fn main_screen_width(&self) -> Option<f64> {
        crate::apps::main_screen_width()
    }
}

/// Shared log of calls made against the mock and its elements.
type CallLog = Arc<Mutex<Vec<String>>>;

/// Window element double that records un-minimize and raise requests.
#[derive(Debug, Clone, Default)]
pub struct MockElement {
    /// Used in recorded call names.
    label: String,
    /// Where calls are recorded.
    calls: CallLog,
    /// Make every request fail with `WindowGone`.
    fail: bool,
}

impl MockElement {
    /// Record a call, failing if configured to.
    fn note(&self, what: &str) -> Result<()> {
        self.calls.lock().push(format!("{what}:{}", self.label));
        if self.fail {
            return Err(Error::WindowGone);
        }
        Ok(())
    }
}

impl WindowElement for MockElement {
    fn unminimize(&self) -> Result<()> {
        self.note("unminimize")
    }
    fn raise(&self) -> Result<()> {
        self.note("raise")
    }
}

/// Scriptable in-memory [`WinOps`].
#[derive(Clone)]
pub struct MockWinOps {
    /// Calls made against the mock, in order.
    calls: CallLog,
    /// Value returned by `stacking_order`.
    stacking: Arc<Mutex<Option<Vec<u32>>>>,
    /// Applications in workspace order.
    apps: Arc<Mutex<Vec<AppInfo>>>,
    /// Windows per pid; a missing entry makes `app_windows` fail.
    windows: Arc<Mutex<HashMap<i32, Vec<DiscoveredWindow>>>>,
    /// Value returned by `frontmost_pid`.
    frontmost: Arc<Mutex<Option<i32>>>,
    /// Value returned by `main_screen_width`.
    screen_width: Arc<Mutex<Option<f64>>>,
    /// Value returned by `own_pid`.
    own_pid: Arc<Mutex<i32>>,
    /// Make `activate_app` fail.
    fail_activate: Arc<AtomicBool>,
}

impl Default for MockWinOps {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWinOps {
    /// Empty mock with an empty (but readable) stacking order.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            stacking: Arc::new(Mutex::new(Some(Vec::new()))),
            apps: Arc::new(Mutex::new(Vec::new())),
            windows: Arc::new(Mutex::new(HashMap::new())),
            frontmost: Arc::new(Mutex::new(None)),
            screen_width: Arc::new(Mutex::new(None)),
            own_pid: Arc::new(Mutex::new(-1)),
            fail_activate: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A discovered window whose element is not tied to any mock.
    pub fn window(title: &str, minimized: bool, window_number: Option<u32>) -> DiscoveredWindow {
        DiscoveredWindow {
            title: title.to_string(),
            minimized,
            window_number,
            element: Arc::new(MockElement {
                label: title.to_string(),
                ..MockElement::default()
            }),
        }
    }

    /// A discovered window whose element records into this mock's call log.
    pub fn tracked_window(
        &self,
        title: &str,
        minimized: bool,
        window_number: Option<u32>,
    ) -> DiscoveredWindow {
        DiscoveredWindow {
            title: title.to_string(),
            minimized,
            window_number,
            element: Arc::new(MockElement {
                label: title.to_string(),
                calls: self.calls.clone(),
                fail: false,
            }),
        }
    }

    /// Like `tracked_window`, but un-minimize and raise fail.
    pub fn failing_window(&self, title: &str, window_number: Option<u32>) -> DiscoveredWindow {
        DiscoveredWindow {
            title: title.to_string(),
            minimized: true,
            window_number,
            element: Arc::new(MockElement {
                label: title.to_string(),
                calls: self.calls.clone(),
                fail: true,
            }),
        }
    }

    /// Set the stacking order; `None` simulates an unreadable window list.
    pub fn set_stacking(&self, ids: Option<Vec<u32>>) {
        *self.stacking.lock() = ids;
    }

    /// Add an application with its windows.
    pub fn add_app(&self, app: AppInfo, windows: Vec<DiscoveredWindow>) {
        self.windows.lock().insert(app.pid, windows);
        self.apps.lock().push(app);
    }

    /// Add an application whose window list cannot be read.
    pub fn add_unreadable_app(&self, app: AppInfo) {
        self.apps.lock().push(app);
    }

    /// Set the frontmost application.
    pub fn set_frontmost(&self, pid: Option<i32>) {
        *self.frontmost.lock() = pid;
    }

    /// Set the main screen width.
    pub fn set_screen_width(&self, width: Option<f64>) {
        *self.screen_width.lock() = width;
    }

    /// Set the pid reported as this process.
    pub fn set_own_pid(&self, pid: i32) {
        *self.own_pid.lock() = pid;
    }

    /// Make `activate_app` fail.
    pub fn set_fail_activate(&self, v: bool) {
        self.fail_activate.store(v, Ordering::SeqCst);
    }

    /// Calls recorded so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// True if `s` was recorded.
    pub fn calls_contains(&self, s: &str) -> bool {
        self.calls.lock().iter().any(|x| x == s)
    }

    /// Record a call.
    fn note(&self, s: &str) {
        self.calls.lock().push(s.to_string());
    }
}

impl WinOps for MockWinOps {
    fn stacking_order(&self) -> Option<Vec<u32>> {
        self.note("stacking_order");
        self.stacking.lock().clone()
    }
    fn running_apps(&self) -> Vec<AppInfo> {
        self.apps.lock().clone()
    }
    fn app_windows(&self, app: &AppInfo) -> Result<Vec<DiscoveredWindow>> {
        self.windows
            .lock()
            .get(&app.pid)
            .cloned()
            .ok_or(Error::AppElement)
    }
    fn activate_app(&self, pid: i32) -> Result<()> {
        self.note(&format!("activate_app:{pid}"));
        if self.fail_activate.load(Ordering::SeqCst) {
            return Err(Error::ActivationFailed);
        }
        Ok(())
    }
    fn frontmost_pid(&self) -> Option<i32> {
        *self.frontmost.lock()
    }
    fn main_screen_width(&self) -> Option<f64> {
        *self.screen_width.lock()
    }
    fn own_pid(&self) -> i32 {
        *self.own_pid.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracked_elements_share_the_call_log() {
        let ops = MockWinOps::new();
        let w = ops.tracked_window("doc", true, Some(1));
        w.element.unminimize().unwrap();
        w.element.raise().unwrap();
        ops.activate_app(7).unwrap();
        assert_eq!(ops.calls(), ["unminimize:doc", "raise:doc", "activate_app:7"]);
    }

    #[test]
    fn failures_are_reported() {
        let ops = MockWinOps::new();
        let w = ops.failing_window("gone", None);
        assert_eq!(w.element.raise(), Err(Error::WindowGone));
        ops.set_fail_activate(true);
        assert_eq!(ops.activate_app(1), Err(Error::ActivationFailed));
        assert!(ops.calls_contains("raise:gone"));
    }
}
