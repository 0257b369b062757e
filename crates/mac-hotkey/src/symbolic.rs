//! Rewrite the system "Show Spotlight search" shortcut.
//!
//! The shortcut lives in the `com.apple.symbolichotkeys` defaults domain
//! under symbolic hotkey 64. Writing it and asking the settings daemon to
//! reload takes a few hundred milliseconds, so callers run this off the
//! main context.

use std::process::Command;

use mac_keycode::{Key, Modifier, Shortcut};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Symbolic hotkey id of "Show Spotlight search".
pub const SEARCH_HOTKEY_ID: u32 = 64;

/// Tool that writes user defaults.
const DEFAULTS: &str = "/usr/bin/defaults";

/// Tool that makes the settings daemon pick up the new table.
const ACTIVATE_SETTINGS: &str =
    "/System/Library/PrivateFrameworks/SystemAdministration.framework/Resources/activateSettings";

/// The plist fragment for one enabled symbolic hotkey.
///
/// `modifiers` uses NSEvent modifier flag values, which coincide with
/// [`Modifier::cg_flag`].
pub fn symbolic_hotkey_plist(key_code: u16, modifiers: u64) -> String {
    format!(
        "<dict><key>enabled</key><true/><key>value</key><dict><key>parameters</key>\
         <array><integer>65535</integer><integer>{key_code}</integer>\
         <integer>{modifiers}</integer></array><key>type</key><string>standard</string>\
         </dict></dict>"
    )
}

/// Point the system search shortcut at `shortcut` (e.g. `"ctrl+space"`).
pub fn apply_search_shortcut(shortcut: &str) -> Result<()> {
    let parsed = Shortcut::parse(shortcut);
    write_search_hotkey(parsed.key.scancode(), parsed.cg_flags())
}

/// Key code and modifier flags of the factory default, ⌘Space.
fn default_search_hotkey() -> (u16, u64) {
    (Key::Space.scancode(), Modifier::Command.cg_flag())
}

/// Restore the factory default search shortcut.
pub fn restore_default_search_shortcut() -> Result<()> {
    let (key_code, modifiers) = default_search_hotkey();
    write_search_hotkey(key_code, modifiers)
}

/// Write hotkey 64 and ask the system to reload it.
fn write_search_hotkey(key_code: u16, modifiers: u64) -> Result<()> {
    let plist = symbolic_hotkey_plist(key_code, modifiers);
    let id = SEARCH_HOTKEY_ID.to_string();
    run(
        Command::new(DEFAULTS).args([
            "write",
            "com.apple.symbolichotkeys",
            "AppleSymbolicHotKeys",
            "-dict-add",
            id.as_str(),
            plist.as_str(),
        ]),
    )?;
    run(Command::new(ACTIVATE_SETTINGS).arg("-u"))?;
    debug!(key_code, modifiers, "search_shortcut_written");
    Ok(())
}

/// Run a command to completion, mapping failure to `Error::OsError`.
fn run(cmd: &mut Command) -> Result<()> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    let status = cmd.status().map_err(|e| {
        warn!(%program, error = %e, "spawn_failed");
        Error::OsError(format!("{program}: {e}"))
    })?;
    if status.success() {
        Ok(())
    } else {
        warn!(%program, ?status, "command_failed");
        Err(Error::OsError(format!("{program} exited with {status}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plist_carries_key_and_modifiers() {
        let p = symbolic_hotkey_plist(49, 1_048_576);
        assert!(p.starts_with("<dict><key>enabled</key><true/>"));
        assert!(p.contains(
            "<array><integer>65535</integer><integer>49</integer><integer>1048576</integer></array>"
        ));
        assert!(p.ends_with("<key>type</key><string>standard</string></dict></dict>"));
    }

    #[test]
    fn default_is_cmd_space() {
        assert_eq!(default_search_hotkey(), (49, 1_048_576));
        let parsed = Shortcut::parse("cmd+space");
        assert_eq!(
            default_search_hotkey(),
            (parsed.key.scancode(), parsed.cg_flags())
        );
    }

    #[test]
    fn modifier_values_match_nsevent_flags() {
        let s = Shortcut::parse("ctrl+opt+shift+cmd+space");
        assert_eq!(s.cg_flags(), 262_144 + 524_288 + 131_072 + 1_048_576);
    }
}
