//! Lenient parsing of `+`-joined shortcut strings.
//!
//! Parsing never fails: unknown tokens are ignored, the last key token wins,
//! and a missing key falls back to a per-kind default.

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

use crate::{Key, Modifier};

/// A key plus the set of modifiers that must be held with it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    /// The non-modifier key.
    pub key: Key,
    /// Required modifiers.
    pub modifiers: HashSet<Modifier>,
}

/// Tokens of a spec in the order they appeared.
struct Tokens {
    /// Last key token seen.
    key: Option<Key>,
    /// Modifier tokens, duplicates included.
    modifiers: Vec<Modifier>,
}

/// Split on `+`, dropping blanks and unknown tokens.
fn tokenize(s: &str) -> Tokens {
    let mut key = None;
    let mut modifiers = Vec::new();
    for raw in s.split('+') {
        let tok = raw.trim();
        if tok.is_empty() {
            continue;
        }
        if let Some(m) = Modifier::from_spec(tok) {
            modifiers.push(m);
        } else if let Some(k) = Key::from_spec(tok) {
            key = Some(k);
        }
    }
    Tokens { key, modifiers }
}

impl Shortcut {
    /// Parse a launcher-style shortcut; the key defaults to space.
    ///
    /// ```
    /// use mac_keycode::{Key, Modifier, Shortcut};
    /// let s = Shortcut::parse("cmd+shift+space");
    /// assert_eq!(s.key, Key::Space);
    /// assert!(s.has(Modifier::Command) && s.has(Modifier::Shift));
    /// ```
    pub fn parse(s: &str) -> Self {
        Self::parse_with_default(s, Key::Space)
    }

    /// Parse with an explicit default key.
    pub fn parse_with_default(s: &str, default_key: Key) -> Self {
        let t = tokenize(s);
        Self {
            key: t.key.unwrap_or(default_key),
            modifiers: t.modifiers.into_iter().collect(),
        }
    }

    /// True if `m` is one of the required modifiers.
    pub fn has(&self, m: Modifier) -> bool {
        self.modifiers.contains(&m)
    }

    /// Hardware keycode of the key.
    pub fn key_code(&self) -> u32 {
        u32::from(self.key.scancode())
    }

    /// Modifiers as a Carbon `RegisterEventHotKey` mask.
    pub fn carbon_modifiers(&self) -> u32 {
        self.modifiers.iter().fold(0, |acc, m| acc | m.carbon_flag())
    }

    /// Modifiers as CGEventFlags bits.
    pub fn cg_flags(&self) -> u64 {
        self.modifiers.iter().fold(0, |acc, m| acc | m.cg_flag())
    }

    /// Modifiers in canonical order.
    fn ordered_modifiers(&self) -> impl Iterator<Item = Modifier> + '_ {
        Modifier::ORDER.into_iter().filter(|m| self.has(*m))
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in self.ordered_modifiers() {
            write!(f, "{}+", m.to_spec())?;
        }
        f.write_str(&self.key.to_spec())
    }
}

/// A hold-to-cycle shortcut: releasing `hold` ends the switcher session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitcherShortcut {
    /// Key and modifiers that advance the selection.
    pub shortcut: Shortcut,
    /// Modifier whose release commits the selection.
    pub hold: Modifier,
}

impl SwitcherShortcut {
    /// Parse a switcher shortcut; the key defaults to tab.
    ///
    /// `hold` is the last non-shift modifier in token order, shift when shift
    /// is the only modifier, and command when there are none.
    pub fn parse(s: &str) -> Self {
        let t = tokenize(s);
        let hold = t
            .modifiers
            .iter()
            .rev()
            .copied()
            .find(|m| *m != Modifier::Shift)
            .or_else(|| t.modifiers.first().copied())
            .unwrap_or(Modifier::Command);
        Self {
            shortcut: Shortcut {
                key: t.key.unwrap_or(Key::Tab),
                modifiers: t.modifiers.into_iter().collect(),
            },
            hold,
        }
    }
}

impl fmt::Display for SwitcherShortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hold_last = self.hold != Modifier::Shift && self.shortcut.has(self.hold);
        for m in self.shortcut.ordered_modifiers() {
            if m == Modifier::Shift || (hold_last && m == self.hold) {
                continue;
            }
            write!(f, "{}+", m.to_spec())?;
        }
        if hold_last {
            write!(f, "{}+", self.hold.to_spec())?;
        }
        if self.shortcut.has(Modifier::Shift) {
            f.write_str("shift+")?;
        }
        f.write_str(&self.shortcut.key.to_spec())
    }
}

/// The "visible windows only" variant of a shortcut: `shift+` prefixed unless
/// a shift token is already present.
pub fn derive_visible_shortcut(s: &str) -> String {
    let has_shift = s
        .split('+')
        .any(|t| t.trim().eq_ignore_ascii_case("shift"));
    if has_shift {
        s.to_string()
    } else {
        format!("shift+{s}")
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn parses_launcher_shortcut() {
        let s = Shortcut::parse("cmd+shift+space");
        assert_eq!(s.key, Key::Space);
        assert_eq!(s.modifiers.len(), 2);
        assert_eq!(s.carbon_modifiers(), 0x100 | 0x200);
        assert_eq!(s.cg_flags(), (1 << 20) | (1 << 17));
        assert_eq!(s.key_code(), 49);
    }

    #[test]
    fn defaults_and_unknown_tokens() {
        let s = Shortcut::parse("cmd+bogus");
        assert_eq!(s.key, Key::Space);
        assert!(s.has(Modifier::Command));

        let s = Shortcut::parse("");
        assert_eq!(s.key, Key::Space);
        assert!(s.modifiers.is_empty());

        let sw = SwitcherShortcut::parse("alt");
        assert_eq!(sw.shortcut.key, Key::Tab);
        assert_eq!(sw.hold, Modifier::Option);
    }

    #[test]
    fn last_key_token_wins() {
        let s = Shortcut::parse("a+cmd+b");
        assert_eq!(s.key, Key::B);
    }

    #[test]
    fn case_insensitive() {
        let a = Shortcut::parse("CMD+Shift+SPACE");
        let b = Shortcut::parse("cmd+shift+space");
        assert_eq!(a, b);
        assert_eq!(Shortcut::parse("Ctrl+ENTER").key, Key::Return);
    }

    #[test]
    fn hold_rules() {
        assert_eq!(SwitcherShortcut::parse("alt+tab").hold, Modifier::Option);
        assert_eq!(SwitcherShortcut::parse("alt+cmd+p").hold, Modifier::Command);
        assert_eq!(SwitcherShortcut::parse("cmd+alt+p").hold, Modifier::Option);
        assert_eq!(SwitcherShortcut::parse("ctrl+shift+tab").hold, Modifier::Control);
        assert_eq!(SwitcherShortcut::parse("shift+tab").hold, Modifier::Shift);
        assert_eq!(SwitcherShortcut::parse("tab").hold, Modifier::Command);
        assert_eq!(SwitcherShortcut::parse("alt+cmd+p").shortcut.key, Key::P);
    }

    #[test]
    fn display_is_canonical() {
        assert_eq!(Shortcut::parse("shift+cmd+space").to_string(), "cmd+shift+space");
        assert_eq!(Shortcut::parse("alt+`").to_string(), "opt+`");
        assert_eq!(SwitcherShortcut::parse("alt+tab").to_string(), "opt+tab");
        assert_eq!(SwitcherShortcut::parse("alt+cmd+p").to_string(), "opt+cmd+p");
        assert_eq!(SwitcherShortcut::parse("shift+alt+f5").to_string(), "opt+shift+f5");
    }

    #[test]
    fn visible_shortcut_derivation() {
        assert_eq!(derive_visible_shortcut("alt+cmd+p"), "shift+alt+cmd+p");
        assert_eq!(derive_visible_shortcut("alt+SHIFT+p"), "alt+SHIFT+p");
        assert_eq!(derive_visible_shortcut(""), "shift+");
    }

    fn token() -> impl Strategy<Value = String> {
        prop_oneof![
            prop::sample::select(vec![
                "cmd", "command", "opt", "option", "alt", "ctrl", "control", "shift",
                "enter", "esc", "~", "junk",
            ])
            .prop_map(str::to_string),
            prop::sample::select(Key::ALL.to_vec()).prop_map(|k| k.to_spec()),
        ]
    }

    proptest! {
        #[test]
        fn shortcut_parse_is_idempotent(tokens in prop::collection::vec(token(), 0..6)) {
            let spec = tokens.join("+");
            let once = Shortcut::parse(&spec);
            let twice = Shortcut::parse(&once.to_string());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn switcher_parse_is_idempotent(tokens in prop::collection::vec(token(), 0..6)) {
            let spec = tokens.join("+");
            let once = SwitcherShortcut::parse(&spec);
            let twice = SwitcherShortcut::parse(&once.to_string());
            prop_assert_eq!(once, twice);
        }
    }
}
