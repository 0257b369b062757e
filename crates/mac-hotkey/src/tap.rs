//! Keyboard event tap policy.
//!
//! The OS callback runs on a latency-critical thread, so everything it needs
//! to decide is kept here as plain data: the parsed shortcuts in
//! [`TapConfig`] and a lock-free [`SessionView`] of the switcher published by
//! the main context through [`TapShared`].

use std::sync::atomic::{AtomicBool, Ordering};

use bitflags::bitflags;
use mac_keycode::{Key, Modifier, Shortcut, SwitcherShortcut};
use parking_lot::RwLock;

bitflags! {
    /// The CGEventFlags bits the tap cares about.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EventFlags: u64 {
        /// ⇧
        const SHIFT = 1 << 17;
        /// ⌃
        const CONTROL = 1 << 18;
        /// ⌥
        const OPTION = 1 << 19;
        /// ⌘
        const COMMAND = 1 << 20;
    }
}

impl EventFlags {
    /// Command, option and control.
    pub const PRIMARY: Self = Self::COMMAND.union(Self::OPTION).union(Self::CONTROL);

    /// Keep only the modifier bits from a raw CGEventFlags value.
    pub fn from_raw(raw: u64) -> Self {
        Self::from_bits_truncate(raw)
    }

    /// Flag for a single modifier.
    pub fn from_modifier(m: Modifier) -> Self {
        Self::from_bits_truncate(m.cg_flag())
    }

    /// Flags required by a shortcut.
    pub fn of(shortcut: &Shortcut) -> Self {
        Self::from_bits_truncate(shortcut.cg_flags())
    }
}

/// An OS event reduced to what classification needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapInput {
    /// A key press (including auto-repeat).
    KeyDown {
        /// Hardware keycode.
        key_code: u16,
        /// Modifier flags at the time of the press.
        flags: EventFlags,
    },
    /// Modifier state changed.
    FlagsChanged {
        /// New modifier flags.
        flags: EventFlags,
    },
    /// The OS disabled the tap (timeout or user input).
    TapDisabled,
    /// Anything else.
    Other,
}

/// Switcher intent forwarded to the main context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapAction {
    /// Move the selection forward.
    AdvanceNext,
    /// Move the selection backward.
    AdvancePrevious,
    /// The hold modifier was released.
    ReleaseHold,
    /// Escape pressed while the switcher is showing.
    Cancel,
    /// The launcher combination, taken over from the system.
    ToggleLauncher,
}

/// Outcome of classifying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Decision {
    /// Action to forward, if any.
    pub action: Option<TapAction>,
    /// Drop the event so it never reaches the foreground app.
    pub swallow: bool,
    /// Re-enable the tap.
    pub reenable: bool,
}

impl Decision {
    /// Forward the event unchanged.
    const PASS: Self = Self {
        action: None,
        swallow: false,
        reenable: false,
    };

    /// Emit `action` and swallow the event.
    fn swallow(action: TapAction) -> Self {
        Self {
            action: Some(action),
            swallow: true,
            reenable: false,
        }
    }
}

/// Shortcuts the tap matches against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapConfig {
    /// Hold-to-cycle switcher combination.
    pub switcher: SwitcherShortcut,
    /// Launcher combination.
    pub launcher: Shortcut,
    /// Swallow the launcher combination so the system search shortcut does
    /// not also fire.
    pub suppress_system_shortcut: bool,
}

impl TapConfig {
    /// Build from shortcut strings.
    pub fn from_specs(switcher: &str, launcher: &str, suppress_system_shortcut: bool) -> Self {
        Self {
            switcher: SwitcherShortcut::parse(switcher),
            launcher: Shortcut::parse(launcher),
            suppress_system_shortcut,
        }
    }
}

/// Switcher state as seen from the tap thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionView {
    /// The switcher is on screen.
    pub visible: bool,
    /// A window list is being fetched for a pending session.
    pub loading: bool,
}

/// Escape.
const ESCAPE: u16 = Key::Escape.scancode();

/// Decide what to do with one event.
pub fn classify(config: &TapConfig, view: SessionView, input: TapInput) -> Decision {
    let hold = EventFlags::from_modifier(config.switcher.hold);
    match input {
        TapInput::TapDisabled => Decision {
            action: None,
            swallow: false,
            reenable: true,
        },
        TapInput::FlagsChanged { flags } => {
            if (view.visible || view.loading) && !flags.contains(hold) {
                Decision {
                    action: Some(TapAction::ReleaseHold),
                    swallow: false,
                    reenable: false,
                }
            } else {
                Decision::PASS
            }
        }
        TapInput::KeyDown { key_code, flags } => {
            let switcher = &config.switcher.shortcut;
            if key_code == switcher.key.scancode()
                && flags & EventFlags::PRIMARY == EventFlags::of(switcher) & EventFlags::PRIMARY
            {
                return Decision::swallow(if flags.contains(EventFlags::SHIFT) {
                    TapAction::AdvancePrevious
                } else {
                    TapAction::AdvanceNext
                });
            }
            let launcher = &config.launcher;
            if config.suppress_system_shortcut
                && key_code == launcher.key.scancode()
                && flags == EventFlags::of(launcher)
            {
                return Decision::swallow(TapAction::ToggleLauncher);
            }
            if key_code == ESCAPE && view.visible && flags.contains(hold) {
                return Decision::swallow(TapAction::Cancel);
            }
            Decision::PASS
        }
        TapInput::Other => Decision::PASS,
    }
}

/// State shared between the main context and the tap callback.
///
/// The main context publishes session flags after every transition; the
/// callback only ever reads.
#[derive(Debug)]
pub struct TapShared {
    /// Current shortcuts. Written on settings reload only.
    config: RwLock<TapConfig>,
    /// Mirrors the switcher's visibility.
    visible: AtomicBool,
    /// A load is in flight.
    loading: AtomicBool,
}

impl TapShared {
    /// New shared state with the switcher hidden.
    pub fn new(config: TapConfig) -> Self {
        Self {
            config: RwLock::new(config),
            visible: AtomicBool::new(false),
            loading: AtomicBool::new(false),
        }
    }

    /// Replace the shortcuts.
    pub fn set_config(&self, config: TapConfig) {
        *self.config.write() = config;
    }

    /// Publish the switcher session state.
    pub fn publish(&self, view: SessionView) {
        self.visible.store(view.visible, Ordering::Release);
        self.loading.store(view.loading, Ordering::Release);
    }

    /// Current session state.
    pub fn view(&self) -> SessionView {
        SessionView {
            visible: self.visible.load(Ordering::Acquire),
            loading: self.loading.load(Ordering::Acquire),
        }
    }

    /// Classify against the current shortcuts and session state.
    pub fn classify(&self, input: TapInput) -> Decision {
        let config = self.config.read();
        classify(&config, self.view(), input)
    }
}
