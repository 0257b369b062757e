//! mac-keycode: Virtual keycodes, modifiers and shortcut specs for macOS.
//!
//! - `Key`: the keys a shortcut may name, with their hardware codes.
//! - `Modifier`: the four primary modifier keys and their OS masks.
//! - `Shortcut` / `SwitcherShortcut`: lenient parsing of `+`-joined specs
//!   such as `"alt+cmd+p"`.
//!
//! `Key` values are the exact `kVK_*` hardware codes from the HIToolbox
//! header and the enum is `repr(u16)`.

mod key;
pub use key::Key;

mod spec;

mod modifiers;
pub use modifiers::Modifier;

mod shortcut;
pub use shortcut::{Shortcut, SwitcherShortcut, derive_visible_shortcut};

mod scancode;
pub use scancode::Scancode;
