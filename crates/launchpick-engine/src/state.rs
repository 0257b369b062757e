//! Switcher session state, owned and mutated by the main context only.

use mac_winops::{WindowHandle, WindowIdentity};

/// The switcher's data for one session.
#[derive(Debug, Clone, Default)]
pub struct SwitcherState {
    /// Windows of the current session, most recently used first.
    pub windows: Vec<WindowHandle>,
    /// Index into `windows`; meaningful only when `windows` is non-empty.
    pub selected_index: usize,
    /// Layout columns for the current session.
    pub columns: usize,
    /// The switcher is on screen.
    pub visible: bool,
    /// Advance presses received before the window list arrived. Positive
    /// counts forward presses, negative counts backward ones.
    pub pending_advances: i32,
    /// Entries are one per application rather than one per window.
    pub grouped: bool,
    /// A window list is being fetched.
    pub(crate) loading: bool,
    /// The hold was released or the launcher opened while loading; the
    /// incoming list is discarded.
    pub(crate) abandoned: bool,
}

impl SwitcherState {
    /// Move the selection forward, wrapping. No-op on an empty list.
    pub fn select_next(&mut self) {
        let n = self.windows.len();
        if n == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % n;
    }

    /// Move the selection backward, wrapping. No-op on an empty list.
    pub fn select_previous(&mut self) {
        let n = self.windows.len();
        if n == 0 {
            return;
        }
        self.selected_index = (self.selected_index + n - 1) % n;
    }

    /// The selected window, if the index is in range.
    pub fn selected_window(&self) -> Option<&WindowHandle> {
        self.windows.get(self.selected_index)
    }

    /// A window list is being fetched for a live session.
    pub fn is_loading(&self) -> bool {
        self.loading && !self.abandoned
    }

    /// Owned view of the session for rendering.
    pub fn snapshot(&self) -> SwitcherSnapshot {
        SwitcherSnapshot {
            entries: self
                .windows
                .iter()
                .map(|w| SnapshotEntry {
                    identity: w.identity,
                    title: w.title.clone(),
                    app_name: w.app_name.clone(),
                    icon: w.icon.clone(),
                    minimized: w.minimized,
                })
                .collect(),
            selected_index: self.selected_index,
            columns: self.columns.max(1),
            grouped: self.grouped,
        }
    }
}

/// Initial selection for a freshly loaded list of `count` windows after
/// `pending` early presses.
///
/// Forward presses clamp at the last window rather than wrapping; backward
/// presses count from the end and clamp at the first.
pub fn reconcile_pending(pending: i32, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let n = i64::try_from(count).unwrap_or(i64::MAX);
    let p = i64::from(pending);
    let idx = match p {
        p if p > 0 => p.min(n - 1),
        p if p < 0 => (n + p).max(0),
        _ => 0,
    };
    usize::try_from(idx).unwrap_or(0)
}

/// One rendered switcher entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    /// Window identity within the session.
    pub identity: WindowIdentity,
    /// Window title, or the representative's title when grouped.
    pub title: String,
    /// Owning application.
    pub app_name: String,
    /// Icon reference.
    pub icon: String,
    /// Drawn dimmed.
    pub minimized: bool,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SwitcherSnapshot {
    /// Entries in display order.
    pub entries: Vec<SnapshotEntry>,
    /// Highlighted entry.
    pub selected_index: usize,
    /// Grid columns, at least 1.
    pub columns: usize,
    /// Entries are per application.
    pub grouped: bool,
}
