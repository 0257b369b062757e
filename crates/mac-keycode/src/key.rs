use serde::{Deserialize, Serialize};

/// Declares the `Key` enum together with its name and keycode lookups.
macro_rules! keys {
    ( $( $(#[$m:meta])* $v:ident = $code:expr, )* ) => {
        /// A key that can appear in a shortcut spec, valued by its `kVK_*` code.
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
        #[repr(u16)]
        pub enum Key {
            $( $(#[$m])* #[allow(missing_docs)] $v = $code, )*
        }

        impl Key {
            /// Every key known to this crate, in declaration order.
            pub const ALL: &'static [Key] = &[ $( Key::$v, )* ];

            /// The enum variant name.
            pub fn name(self) -> &'static str {
                match self {
                    $( Key::$v => stringify!($v), )*
                }
            }

            /// Look up a key by its hardware keycode.
            pub fn from_keycode(code: u16) -> Option<Self> {
                match code {
                    $( c if c == $code => Some(Key::$v), )*
                    _ => None,
                }
            }

            /// Case-insensitive lookup by variant name.
            pub fn from_name(s: &str) -> Option<Self> {
                $(
                    if s.eq_ignore_ascii_case(stringify!($v)) {
                        return Some(Key::$v);
                    }
                )*
                None
            }
        }
    };
}

keys! {
    A = 0x00,
    S = 0x01,
    D = 0x02,
    F = 0x03,
    H = 0x04,
    G = 0x05,
    Z = 0x06,
    X = 0x07,
    C = 0x08,
    V = 0x09,
    B = 0x0B,
    Q = 0x0C,
    W = 0x0D,
    E = 0x0E,
    R = 0x0F,
    Y = 0x10,
    T = 0x11,
    Digit1 = 0x12,
    Digit2 = 0x13,
    Digit3 = 0x14,
    Digit4 = 0x15,
    Digit6 = 0x16,
    Digit5 = 0x17,
    Digit9 = 0x19,
    Digit7 = 0x1A,
    Digit8 = 0x1C,
    Digit0 = 0x1D,
    O = 0x1F,
    U = 0x20,
    I = 0x22,
    P = 0x23,
    L = 0x25,
    J = 0x26,
    K = 0x28,
    N = 0x2D,
    M = 0x2E,
    Return = 0x24,
    Tab = 0x30,
    Space = 0x31,
    Grave = 0x32,
    Escape = 0x35,
    F17 = 0x40,
    F18 = 0x4F,
    F19 = 0x50,
    F5 = 0x60,
    F6 = 0x61,
    F7 = 0x62,
    F3 = 0x63,
    F8 = 0x64,
    F9 = 0x65,
    F11 = 0x67,
    F13 = 0x69,
    F16 = 0x6A,
    F14 = 0x6B,
    F10 = 0x6D,
    F12 = 0x6F,
    F15 = 0x71,
    F4 = 0x76,
    F2 = 0x78,
    F1 = 0x7A,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_hitoolbox() {
        assert_eq!(Key::A as u16, 0);
        assert_eq!(Key::P as u16, 35);
        assert_eq!(Key::Space as u16, 49);
        assert_eq!(Key::Tab as u16, 48);
        assert_eq!(Key::Escape as u16, 53);
        assert_eq!(Key::Grave as u16, 50);
        assert_eq!(Key::F1 as u16, 122);
        assert_eq!(Key::F19 as u16, 80);
    }

    #[test]
    fn keycode_lookup_covers_all() {
        for k in Key::ALL {
            assert_eq!(Key::from_keycode(*k as u16), Some(*k));
        }
        assert_eq!(Key::from_keycode(0x7F), None);
    }

    #[test]
    fn name_lookup_is_case_insensitive() {
        assert_eq!(Key::from_name("tab"), Some(Key::Tab));
        assert_eq!(Key::from_name("DIGIT7"), Some(Key::Digit7));
        assert_eq!(Key::from_name("nope"), None);
    }
}
