//! OS seams the engine is driven through, with recording doubles for tests.

use std::{
    collections::HashSet,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use mac_hotkey::{
    HotkeyBackend,
    tap::{TapAction, TapShared},
};
use parking_lot::Mutex;

use crate::Result;

// ---- Event tap ----

/// Non-blocking consumer of classified tap actions.
pub type TapSink = Arc<dyn Fn(TapAction) + Send + Sync>;

/// Keeps an installed tap alive; dropping it removes the tap.
pub trait TapGuard {}

#[cfg(target_os = "macos")]
impl TapGuard for mac_hotkey::EventTap {}

/// Installs the session keyboard tap.
pub trait TapInstaller {
    /// Install on the current thread's run loop.
    fn install(&mut self, shared: Arc<TapShared>, sink: TapSink) -> Result<Box<dyn TapGuard>>;
}

/// CoreGraphics tap installer.
#[cfg(target_os = "macos")]
pub struct RealTapInstaller;

#[cfg(target_os = "macos")]
impl TapInstaller for RealTapInstaller {
    fn install(&mut self, shared: Arc<TapShared>, sink: TapSink) -> Result<Box<dyn TapGuard>> {
        let tap = mac_hotkey::install_event_tap(shared, sink)?;
        Ok(Box::new(tap))
    }
}

/// Guard handed out by [`MockTapInstaller`].
struct MockTap;

impl TapGuard for MockTap {}

/// Tap installer double that fails until told otherwise and keeps the sink
/// so tests can inject actions.
#[derive(Clone, Default)]
pub struct MockTapInstaller {
    /// Fail installation.
    fail: Arc<AtomicBool>,
    /// Installation attempts.
    attempts: Arc<AtomicUsize>,
    /// Sink from the last successful install.
    sink: Arc<Mutex<Option<TapSink>>>,
    /// Shared state from the last successful install.
    shared: Arc<Mutex<Option<Arc<TapShared>>>>,
}

impl MockTapInstaller {
    /// An installer that succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make installation fail (or succeed again).
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of install attempts.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// True once an install has succeeded.
    pub fn installed(&self) -> bool {
        self.sink.lock().is_some()
    }

    /// Deliver an action as the OS callback would. Returns false when no tap
    /// is installed.
    pub fn inject(&self, action: TapAction) -> bool {
        let sink = self.sink.lock().clone();
        match sink {
            Some(sink) => {
                sink(action);
                true
            }
            None => false,
        }
    }

    /// The shared state handed to the last successful install.
    pub fn shared(&self) -> Option<Arc<TapShared>> {
        self.shared.lock().clone()
    }
}

impl TapInstaller for MockTapInstaller {
    fn install(&mut self, shared: Arc<TapShared>, sink: TapSink) -> Result<Box<dyn TapGuard>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(mac_hotkey::Error::EventTapStart.into());
        }
        *self.sink.lock() = Some(sink);
        *self.shared.lock() = Some(shared);
        Ok(Box::new(MockTap))
    }
}

// ---- System integration ----

/// Process-level capabilities and system settings.
pub trait SystemApi: Send + Sync {
    /// The process may use Accessibility.
    fn accessibility_ok(&self) -> bool;
    /// Move the system search shortcut to `shortcut`. Blocking.
    fn apply_search_shortcut(&self, shortcut: &str) -> Result<()>;
    /// Put the system search shortcut back to its default. Blocking.
    fn restore_search_shortcut(&self) -> Result<()>;
}

/// Live system: permission checks and the symbolic hotkey table.
pub struct RealSystemApi;

impl SystemApi for RealSystemApi {
    fn accessibility_ok(&self) -> bool {
        permissions::accessibility_ok()
    }

    fn apply_search_shortcut(&self, shortcut: &str) -> Result<()> {
        Ok(mac_hotkey::symbolic::apply_search_shortcut(shortcut)?)
    }

    fn restore_search_shortcut(&self) -> Result<()> {
        Ok(mac_hotkey::symbolic::restore_default_search_shortcut()?)
    }
}

/// System double with a switchable Accessibility grant.
#[derive(Clone)]
pub struct MockSystemApi {
    /// Reported Accessibility state.
    accessibility: Arc<AtomicBool>,
    /// Search shortcuts applied so far.
    applied: Arc<Mutex<Vec<String>>>,
    /// Times the default search shortcut was restored.
    restores: Arc<AtomicUsize>,
}

impl Default for MockSystemApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSystemApi {
    /// A system with Accessibility granted.
    pub fn new() -> Self {
        Self {
            accessibility: Arc::new(AtomicBool::new(true)),
            applied: Arc::new(Mutex::new(Vec::new())),
            restores: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Grant or revoke Accessibility.
    pub fn set_accessibility(&self, ok: bool) {
        self.accessibility.store(ok, Ordering::SeqCst);
    }

    /// Search shortcuts applied so far.
    pub fn applied(&self) -> Vec<String> {
        self.applied.lock().clone()
    }

    /// Times the default search shortcut was restored.
    pub fn restores(&self) -> usize {
        self.restores.load(Ordering::SeqCst)
    }
}

impl SystemApi for MockSystemApi {
    fn accessibility_ok(&self) -> bool {
        self.accessibility.load(Ordering::SeqCst)
    }

    fn apply_search_shortcut(&self, shortcut: &str) -> Result<()> {
        self.applied.lock().push(shortcut.to_string());
        Ok(())
    }

    fn restore_search_shortcut(&self) -> Result<()> {
        self.restores.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ---- Hotkey backend ----

/// Shared state behind [`MockHotkeyBackend`].
#[derive(Default)]
struct BackendLog {
    /// Calls in order.
    calls: Vec<String>,
    /// Combinations owned by someone else.
    taken: HashSet<(u32, u32)>,
    /// Currently registered ids.
    live: HashSet<u32>,
}

/// Hotkey backend double that records calls and can refuse combinations.
#[derive(Clone, Default)]
pub struct MockHotkeyBackend(Arc<Mutex<BackendLog>>);

impl MockHotkeyBackend {
    /// An empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far.
    pub fn calls(&self) -> Vec<String> {
        self.0.lock().calls.clone()
    }

    /// Make `key_code` + `modifiers` fail to register.
    pub fn occupy(&self, key_code: u32, modifiers: u32) {
        self.0.lock().taken.insert((key_code, modifiers));
    }

    /// True if `id` is registered with the backend.
    pub fn is_live(&self, id: u32) -> bool {
        self.0.lock().live.contains(&id)
    }
}

impl HotkeyBackend for MockHotkeyBackend {
    fn install_handler(&mut self) -> mac_hotkey::Result<()> {
        self.0.lock().calls.push("install".into());
        Ok(())
    }

    fn remove_handler(&mut self) {
        self.0.lock().calls.push("remove".into());
    }

    fn register(&mut self, id: u32, key_code: u32, modifiers: u32) -> mac_hotkey::Result<()> {
        let mut log = self.0.lock();
        if log.taken.contains(&(key_code, modifiers)) {
            return Err(mac_hotkey::Error::Registration { id, status: -9878 });
        }
        log.calls.push(format!("register:{id}"));
        log.live.insert(id);
        Ok(())
    }

    fn unregister(&mut self, id: u32) {
        let mut log = self.0.lock();
        log.calls.push(format!("unregister:{id}"));
        log.live.remove(&id);
    }
}
