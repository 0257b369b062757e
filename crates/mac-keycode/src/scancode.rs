//! Scancodes (macOS hardware virtual keycodes).
//!
//! The integer reported by CoreGraphics in the `kCGKeyboardEventKeycode`
//! field and accepted by `RegisterEventHotKey`. It is positional and layout
//! independent, so `Key::A` is the key in the A position on any layout.

use crate::Key;

/// macOS hardware virtual keycode (`kVK_*`).
pub type Scancode = u16;

impl TryFrom<Scancode> for Key {
    type Error = ();
    fn try_from(value: Scancode) -> Result<Self, Self::Error> {
        Key::from_keycode(value).ok_or(())
    }
}

impl From<Key> for Scancode {
    fn from(k: Key) -> Self {
        k as u16
    }
}

impl Key {
    /// Returns the scancode (`kVK_*`) for this key.
    pub const fn scancode(self) -> Scancode {
        self as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(Key::Tab.scancode(), 48);
        assert_eq!(Scancode::from(Key::Escape), 53);
        assert_eq!(Key::try_from(49u16), Ok(Key::Space));
        assert!(Key::try_from(0xFFu16).is_err());
    }
}
