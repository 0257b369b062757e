use crate::Key;

// Central mapping between enum variants and spec strings for shorthand specs.
macro_rules! key_spec_map {
    ($m:ident, $arg:tt) => {
        $m! { $arg,
            Digit0 => "0",
            Digit1 => "1",
            Digit2 => "2",
            Digit3 => "3",
            Digit4 => "4",
            Digit5 => "5",
            Digit6 => "6",
            Digit7 => "7",
            Digit8 => "8",
            Digit9 => "9",
            Grave => "`",
        }
    };
}

macro_rules! to_spec_match {
    ( $key:expr, $( $k:ident => $s:expr, )* ) => {
        match $key {
            $( Key::$k => $s, )*
            _ => $key.name(),
        }
    }
}

macro_rules! from_spec_match {
    ( $s:expr, $( $k:ident => $v:expr, )* ) => {{
        match $s {
            $( $v => Some(Key::$k), )*
            _ => None,
        }
    }}
}

// Aliases that only apply to parsing specs (not emitted by to_spec).
macro_rules! key_spec_aliases {
    ($m:ident, $arg:expr) => {
        $m! { $arg,
            Return => "enter",
            Escape => "esc",
            Grave => "~",
            Grave => "backtick",
        }
    };
}

/// Parses a key specification into a `Key`.
///
/// Tries a case-insensitive enum name first (which covers letters, `space`,
/// `return`, `tab`, `escape`, `grave` and `f1`–`f19`), then the shorthand
/// symbols in `key_spec_map`, then the alias words.
pub fn from_spec(s: &str) -> Option<Key> {
    if let Some(k) = Key::from_name(s) {
        return Some(k);
    }
    if let some @ Some(_) = key_spec_map!(from_spec_match, s) {
        return some;
    }
    let lowered = s.to_ascii_lowercase();
    key_spec_aliases!(from_spec_match, lowered.as_str())
}

/// Returns the key specification string for a `Key`.
pub fn to_spec(key: Key) -> String {
    let s = key_spec_map!(to_spec_match, key);
    s.to_ascii_lowercase()
}

impl Key {
    /// Parses a key specification string into a `Key`.
    ///
    /// Accepts variant names case-insensitively, the digits `0`–`9`, the
    /// backtick (also `~` and `backtick`), and the aliases `enter` and `esc`.
    /// Returns `None` if no mapping matches.
    pub fn from_spec(s: &str) -> Option<Self> {
        from_spec(s)
    }

    /// Returns the canonical spec string for this `Key`.
    pub fn to_spec(self) -> String {
        to_spec(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_roundtrip(k: Key) {
        let spec = to_spec(k);
        assert_eq!(
            from_spec(&spec),
            Some(k),
            "roundtrip failed for {} -> {}",
            k.name(),
            spec
        );
    }

    #[test]
    fn every_key_roundtrips() {
        for k in Key::ALL {
            assert_roundtrip(*k);
        }
    }

    #[test]
    fn digits_and_backtick() {
        assert_eq!(from_spec("1"), Some(Key::Digit1));
        assert_eq!(to_spec(Key::Digit9), "9");
        assert_eq!(from_spec("`"), Some(Key::Grave));
        assert_eq!(from_spec("~"), Some(Key::Grave));
        assert_eq!(to_spec(Key::Grave), "`");
    }

    #[test]
    fn named_keys_and_aliases() {
        assert_eq!(from_spec("space"), Some(Key::Space));
        assert_eq!(from_spec("Return"), Some(Key::Return));
        assert_eq!(from_spec("enter"), Some(Key::Return));
        assert_eq!(from_spec("ENTER"), Some(Key::Return));
        assert_eq!(from_spec("tab"), Some(Key::Tab));
        assert_eq!(from_spec("escape"), Some(Key::Escape));
        assert_eq!(from_spec("esc"), Some(Key::Escape));
        assert_eq!(from_spec("f12"), Some(Key::F12));
        assert_eq!(from_spec("F19"), Some(Key::F19));
        assert_eq!(from_spec("f20"), None);
        assert_eq!(to_spec(Key::Space), "space");
    }
}
