//! Permission checks for Launchpick.
//!
//! The event tap needs Accessibility (and on recent systems Input
//! Monitoring); window enumeration and raise need Accessibility. These
//! helpers only report status. `request_accessibility` additionally asks the
//! system to show its own prompt; guiding the user further is up to the UI.
//!
//! On platforms other than macOS every check reports `false`.

#[cfg(target_os = "macos")]
mod sys {
    use core_foundation::{
        base::TCFType,
        boolean::CFBoolean,
        dictionary::{CFDictionary, CFDictionaryRef},
        string::{CFString, CFStringRef},
    };

    #[link(name = "ApplicationServices", kind = "framework")]
    unsafe extern "C" {
        static kAXTrustedCheckOptionPrompt: CFStringRef;
        fn AXIsProcessTrusted() -> bool;
        fn AXIsProcessTrustedWithOptions(options: CFDictionaryRef) -> bool;
        fn CGPreflightListenEventAccess() -> bool;
    }

    /// `AXIsProcessTrusted`.
    pub(crate) fn accessibility_ok() -> bool {
        unsafe { AXIsProcessTrusted() }
    }

    /// `AXIsProcessTrustedWithOptions` with the prompt option set.
    pub(crate) fn request_accessibility() -> bool {
        let key = unsafe { CFString::wrap_under_get_rule(kAXTrustedCheckOptionPrompt) };
        let opts = CFDictionary::from_CFType_pairs(&[(key, CFBoolean::true_value())]);
        unsafe { AXIsProcessTrustedWithOptions(opts.as_concrete_TypeRef()) }
    }

    /// `CGPreflightListenEventAccess`.
    pub(crate) fn input_monitoring_ok() -> bool {
        unsafe { CGPreflightListenEventAccess() }
    }
}

#[cfg(not(target_os = "macos"))]
mod sys {
    /// No accessibility API here.
    pub(crate) fn accessibility_ok() -> bool {
        false
    }

    /// No accessibility API here.
    pub(crate) fn request_accessibility() -> bool {
        false
    }

    /// No event taps here.
    pub(crate) fn input_monitoring_ok() -> bool {
        false
    }
}

/// Check if the process is trusted for Accessibility.
pub fn accessibility_ok() -> bool {
    sys::accessibility_ok()
}

/// Like [`accessibility_ok`], but lets the system show its permission prompt
/// when the process is not yet trusted.
pub fn request_accessibility() -> bool {
    sys::request_accessibility()
}

/// Check if the application has the "Input Monitoring" permission.
///
/// Returns `true` when the process is allowed to listen for keyboard events
/// (CGEvent tap), and `false` otherwise.
pub fn input_monitoring_ok() -> bool {
    sys::input_monitoring_ok()
}

/// Current permission status for the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionsStatus {
    /// Accessibility (AX) permission; `true` if granted.
    pub accessibility_ok: bool,
    /// Input Monitoring permission; `true` if granted.
    pub input_ok: bool,
}

impl PermissionsStatus {
    /// Everything the switcher needs is granted.
    pub fn all_granted(self) -> bool {
        self.accessibility_ok && self.input_ok
    }
}

/// Query both Accessibility and Input Monitoring permissions.
///
/// The function performs no prompting and has no side effects.
pub fn check_permissions() -> PermissionsStatus {
    PermissionsStatus {
        accessibility_ok: accessibility_ok(),
        input_ok: input_monitoring_ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_reflects_individual_checks() {
        let s = check_permissions();
        assert_eq!(s.accessibility_ok, accessibility_ok());
        assert_eq!(s.input_ok, input_monitoring_ok());
        assert_eq!(s.all_granted(), s.accessibility_ok && s.input_ok);
    }
}
