use std::{fmt::Debug, sync::Arc};

use crate::Result;

/// How a window is identified within one enumeration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowIdentity {
    /// The OS window number (`CGWindowID`).
    Stable(u32),
    /// Assigned when the OS cannot name the window. Unique within the pass
    /// that produced it and meaningless across passes.
    Synthetic(u32),
}

impl WindowIdentity {
    /// The OS window number, if there is one.
    pub fn stable(self) -> Option<u32> {
        match self {
            Self::Stable(id) => Some(id),
            Self::Synthetic(_) => None,
        }
    }
}

/// OS-side handle used to un-minimize and raise a window.
///
/// Calls may block for as long as the owning process takes to answer, so
/// they belong on a background thread.
pub trait WindowElement: Debug + Send + Sync {
    /// Clear the minimized state.
    fn unminimize(&self) -> Result<()>;
    /// Bring the window to the front of its application.
    fn raise(&self) -> Result<()>;
}

/// A running application as reported by the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    /// Process id.
    pub pid: i32,
    /// Localized name.
    pub name: String,
    /// Bundle identifier, used as the icon reference.
    pub bundle_id: Option<String>,
    /// Has the regular (Dock-visible) activation policy.
    pub regular: bool,
}

/// A window as read from an application, before identity assignment.
#[derive(Debug, Clone)]
pub struct DiscoveredWindow {
    /// Window title. Empty titles are skipped by enumeration.
    pub title: String,
    /// Minimized into the Dock.
    pub minimized: bool,
    /// OS window number, when it can be resolved.
    pub window_number: Option<u32>,
    /// Element for later un-minimize/raise.
    pub element: Arc<dyn WindowElement>,
}

/// One switchable window, created fresh by every enumeration.
#[derive(Debug, Clone)]
pub struct WindowHandle {
    /// Identity within this enumeration pass.
    pub identity: WindowIdentity,
    /// Non-empty title.
    pub title: String,
    /// Owning process.
    pub pid: i32,
    /// Owning application's name.
    pub app_name: String,
    /// Icon reference (bundle identifier); empty when unknown.
    pub icon: String,
    /// Minimized into the Dock.
    pub minimized: bool,
    /// OS element for un-minimize/raise.
    pub element: Arc<dyn WindowElement>,
}
