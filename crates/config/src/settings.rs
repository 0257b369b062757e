use mac_keycode::derive_visible_shortcut;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, defaults};

/// An entry shown by the launcher panel. Carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LauncherEntry {
    /// Display name.
    pub name: String,
    /// Shell command run when chosen.
    pub exec: String,
    /// Optional icon path or name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// User settings consumed by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Launcher toggle.
    #[serde(default = "defaults::default_shortcut")]
    pub shortcut: String,
    /// Hold-to-cycle switcher over all windows.
    #[serde(default = "defaults::default_switcher_shortcut")]
    pub switcher_shortcut: String,
    /// Cycle the frontmost application's windows.
    #[serde(default = "defaults::default_same_app_switcher_shortcut")]
    pub same_app_switcher_shortcut: String,
    /// Cycle the frontmost application's non-minimized windows. Derived from
    /// `same_app_switcher_shortcut` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_app_visible_shortcut: Option<String>,
    /// Swallow the launcher shortcut in the event tap so a colliding system
    /// shortcut does not also fire.
    #[serde(default)]
    pub suppress_system_shortcut: bool,
    /// Move the system search shortcut to this combination at startup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spotlight_shortcut: Option<String>,
    /// Switcher column hint, used when the screen width is unknown.
    #[serde(default = "defaults::default_columns")]
    pub columns: u32,
    /// Show one switcher entry per application instead of per window.
    #[serde(default)]
    pub group_windows_by_app: bool,
    /// Launcher panel entries.
    #[serde(default)]
    pub launchers: Vec<LauncherEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            shortcut: defaults::default_shortcut(),
            switcher_shortcut: defaults::default_switcher_shortcut(),
            same_app_switcher_shortcut: defaults::default_same_app_switcher_shortcut(),
            same_app_visible_shortcut: None,
            suppress_system_shortcut: false,
            spotlight_shortcut: None,
            columns: defaults::COLUMNS,
            group_windows_by_app: false,
            launchers: Vec::new(),
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| Error::from_json(None, &e))
    }

    /// The visible-only same-app shortcut, derived when not configured.
    pub fn same_app_visible_or_derived(&self) -> String {
        match &self.same_app_visible_shortcut {
            Some(s) if !s.trim().is_empty() => s.clone(),
            _ => derive_visible_shortcut(&self.same_app_switcher_shortcut),
        }
    }

    /// Column hint, at least 1.
    pub fn columns_hint(&self) -> usize {
        self.columns.max(1) as usize
    }

    /// The search shortcut override, if one is configured.
    pub fn spotlight_override(&self) -> Option<&str> {
        self.spotlight_shortcut
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let s = Settings::from_json_str("{}").unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.shortcut, "cmd+shift+space");
        assert_eq!(s.switcher_shortcut, "alt+tab");
        assert_eq!(s.same_app_switcher_shortcut, "alt+cmd+p");
        assert_eq!(s.columns_hint(), 4);
        assert_eq!(s.same_app_visible_or_derived(), "shift+alt+cmd+p");
        assert_eq!(s.spotlight_override(), None);
    }

    #[test]
    fn parses_camel_case_keys_and_ignores_unknown() {
        let json = r#"{
            "shortcut": "cmd+space",
            "switcherShortcut": "cmd+tab",
            "sameAppVisibleShortcut": "ctrl+shift+p",
            "suppressSystemShortcut": true,
            "spotlightShortcut": "ctrl+space",
            "columns": 0,
            "groupWindowsByApp": true,
            "launchers": [{"name": "Finder", "exec": "open -a Finder"}],
            "theme": "dark"
        }"#;
        let s = Settings::from_json_str(json).unwrap();
        assert_eq!(s.shortcut, "cmd+space");
        assert_eq!(s.switcher_shortcut, "cmd+tab");
        assert_eq!(s.same_app_visible_or_derived(), "ctrl+shift+p");
        assert!(s.suppress_system_shortcut);
        assert_eq!(s.spotlight_override(), Some("ctrl+space"));
        assert_eq!(s.columns_hint(), 1);
        assert!(s.group_windows_by_app);
        assert_eq!(s.launchers.len(), 1);
        assert_eq!(s.launchers[0].icon, None);
    }

    #[test]
    fn parse_errors_carry_location() {
        let err = Settings::from_json_str("{\n  \"columns\": \"four\"\n}").unwrap_err();
        match err {
            Error::Parse { line, path, .. } => {
                assert_eq!(line, 2);
                assert!(path.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert!(json.contains("\"switcherShortcut\":\"alt+tab\""));
        assert!(!json.contains("spotlightShortcut"));
    }
}
