use serde::{Deserialize, Serialize};

/// Primary modifier keys recognised in shortcut specs.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    /// ⌘
    Command,
    /// ⌥
    Option,
    /// ⌃
    Control,
    /// ⇧
    Shift,
}

/// `kCGEventFlagMaskShift`.
const CG_SHIFT: u64 = 1 << 17;
/// `kCGEventFlagMaskControl`.
const CG_CONTROL: u64 = 1 << 18;
/// `kCGEventFlagMaskAlternate`.
const CG_OPTION: u64 = 1 << 19;
/// `kCGEventFlagMaskCommand`.
const CG_COMMAND: u64 = 1 << 20;

/// Carbon `cmdKey`.
const CARBON_CMD: u32 = 0x0100;
/// Carbon `shiftKey`.
const CARBON_SHIFT: u32 = 0x0200;
/// Carbon `optionKey`.
const CARBON_OPTION: u32 = 0x0800;
/// Carbon `controlKey`.
const CARBON_CONTROL: u32 = 0x1000;

impl Modifier {
    /// All modifiers in canonical emission order.
    pub const ORDER: [Modifier; 4] = [
        Modifier::Command,
        Modifier::Option,
        Modifier::Control,
        Modifier::Shift,
    ];

    /// Parses a modifier token, accepting the usual aliases.
    ///
    /// `cmd`/`command`, `opt`/`option`/`alt`, `ctrl`/`control` and `shift`,
    /// all case-insensitive.
    pub fn from_spec(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cmd" | "command" => Some(Modifier::Command),
            "opt" | "option" | "alt" => Some(Modifier::Option),
            "ctrl" | "control" => Some(Modifier::Control),
            "shift" => Some(Modifier::Shift),
            _ => None,
        }
    }

    /// Returns the canonical spec string for this modifier.
    pub fn to_spec(self) -> &'static str {
        match self {
            Modifier::Command => "cmd",
            Modifier::Option => "opt",
            Modifier::Control => "ctrl",
            Modifier::Shift => "shift",
        }
    }

    /// The CGEventFlags bit for this modifier.
    ///
    /// These values are also the `NSEvent.ModifierFlags` raw values used by
    /// the system symbolic hotkey table.
    pub const fn cg_flag(self) -> u64 {
        match self {
            Modifier::Command => CG_COMMAND,
            Modifier::Option => CG_OPTION,
            Modifier::Control => CG_CONTROL,
            Modifier::Shift => CG_SHIFT,
        }
    }

    /// The Carbon hotkey modifier bit for this modifier.
    pub const fn carbon_flag(self) -> u32 {
        match self {
            Modifier::Command => CARBON_CMD,
            Modifier::Option => CARBON_OPTION,
            Modifier::Control => CARBON_CONTROL,
            Modifier::Shift => CARBON_SHIFT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_specs() {
        assert_eq!(Modifier::from_spec("cmd"), Some(Modifier::Command));
        assert_eq!(Modifier::from_spec("Command"), Some(Modifier::Command));
        assert_eq!(Modifier::from_spec("ctrl"), Some(Modifier::Control));
        assert_eq!(Modifier::from_spec("control"), Some(Modifier::Control));
        assert_eq!(Modifier::from_spec("alt"), Some(Modifier::Option));
        assert_eq!(Modifier::from_spec("opt"), Some(Modifier::Option));
        assert_eq!(Modifier::from_spec("OPTION"), Some(Modifier::Option));
        assert_eq!(Modifier::from_spec("shift"), Some(Modifier::Shift));
        assert_eq!(Modifier::from_spec("fn"), None);

        assert_eq!(Modifier::Command.to_spec(), "cmd");
        assert_eq!(Modifier::Shift.to_spec(), "shift");
    }

    #[test]
    fn cg_bits() {
        assert_eq!(Modifier::Shift.cg_flag(), 1 << 17);
        assert_eq!(Modifier::Control.cg_flag(), 1 << 18);
        assert_eq!(Modifier::Option.cg_flag(), 1 << 19);
        assert_eq!(Modifier::Command.cg_flag(), 1 << 20);
    }

    #[test]
    fn carbon_bits() {
        assert_eq!(Modifier::Command.carbon_flag(), 256);
        assert_eq!(Modifier::Shift.carbon_flag(), 512);
        assert_eq!(Modifier::Option.carbon_flag(), 2048);
        assert_eq!(Modifier::Control.carbon_flag(), 4096);
    }
}
