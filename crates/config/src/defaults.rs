//! Defaults for settings fields.

/// Launcher toggle.
pub(crate) const SHORTCUT: &str = "cmd+shift+space";
/// Hold-to-cycle window switcher.
pub(crate) const SWITCHER_SHORTCUT: &str = "alt+tab";
/// Same-app window cycling.
pub(crate) const SAME_APP_SWITCHER_SHORTCUT: &str = "alt+cmd+p";
/// Switcher columns when the screen size is unknown.
pub(crate) const COLUMNS: u32 = 4;

/// Serde default for `shortcut`.
pub(crate) fn default_shortcut() -> String {
    SHORTCUT.to_string()
}
/// Serde default for `switcherShortcut`.
pub(crate) fn default_switcher_shortcut() -> String {
    SWITCHER_SHORTCUT.to_string()
}
/// Serde default for `sameAppSwitcherShortcut`.
pub(crate) fn default_same_app_switcher_shortcut() -> String {
    SAME_APP_SWITCHER_SHORTCUT.to_string()
}
/// Serde default for `columns`.
pub(crate) const fn default_columns() -> u32 {
    COLUMNS
}
