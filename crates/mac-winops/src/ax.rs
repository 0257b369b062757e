//! Accessibility (AX) access to application windows.

use std::{cell::RefCell, collections::HashMap, ffi::c_void, ptr, sync::Arc, thread_local};

use core_foundation::{
    array::{CFArray, CFArrayGetCount, CFArrayGetValueAtIndex},
    base::{CFRelease, CFRetain, CFTypeRef, TCFType},
    boolean::{kCFBooleanFalse, kCFBooleanTrue},
    string::{CFString, CFStringRef},
};
use tracing::trace;

use crate::{
    DiscoveredWindow, WindowElement, ax_private,
    error::{Error, Result},
};

#[link(name = "ApplicationServices", kind = "framework")]
unsafe extern "C" {
    fn AXUIElementCreateApplication(pid: i32) -> *mut c_void;
    fn AXUIElementCopyAttributeValue(
        element: *mut c_void,
        attr: CFStringRef,
        value: *mut CFTypeRef,
    ) -> i32;
    fn AXUIElementSetAttributeValue(element: *mut c_void, attr: CFStringRef, value: CFTypeRef)
    -> i32;
    fn AXUIElementPerformAction(element: *mut c_void, action: CFStringRef) -> i32;
}

#[link(name = "CoreFoundation", kind = "framework")]
unsafe extern "C" {
    fn CFBooleanGetValue(b: CFTypeRef) -> bool;
}

/// AX error for invalid UI element (window closed / stale reference).
const K_AX_ERROR_INVALID_UI_ELEMENT: i32 = -25202;
/// AX error when the process is not trusted for accessibility.
const K_AX_ERROR_API_DISABLED: i32 = -25211;

thread_local! {
    /// Interned AX attribute names.
    static ATTR_STRINGS: RefCell<HashMap<&'static str, CFString>> = RefCell::new(HashMap::new());
}

/// Stable CFStringRef for an attribute or action name, cached per thread.
///
/// Avoids toll-free bridging of static strings, which can trip pointer
/// authentication on recent macOS versions.
fn cfstr(name: &'static str) -> CFStringRef {
    ATTR_STRINGS.with(|cell| {
        let mut m = cell.borrow_mut();
        let s = m.entry(name).or_insert_with(|| CFString::new(name));
        s.as_concrete_TypeRef()
    })
}

/// Map an AX status code to an error.
fn ax_err(code: i32) -> Error {
    match code {
        K_AX_ERROR_INVALID_UI_ELEMENT => Error::WindowGone,
        K_AX_ERROR_API_DISABLED => Error::Permission,
        c => Error::AxCode(c),
    }
}

/// Owned, retained AXUIElementRef.
#[derive(Debug)]
pub(crate) struct AXElem(*mut c_void);

// AXUIElementRef is a CF type; the AX API may be called from any thread.
unsafe impl Send for AXElem {}
unsafe impl Sync for AXElem {}

impl AXElem {
    /// Take ownership of a +1 reference. `None` for null.
    fn from_create(ptr: *mut c_void) -> Option<Self> {
        (!ptr.is_null()).then_some(Self(ptr))
    }

    /// Retain a borrowed reference. `None` for null.
    fn retain_from_borrowed(ptr: *mut c_void) -> Option<Self> {
        if ptr.is_null() {
            return None;
        }
        unsafe { CFRetain(ptr as CFTypeRef) };
        Some(Self(ptr))
    }

    /// Raw pointer for FFI calls.
    fn as_ptr(&self) -> *mut c_void {
        self.0
    }
}

impl Drop for AXElem {
    fn drop(&mut self) {
        unsafe { CFRelease(self.0 as CFTypeRef) };
    }
}

/// Read a boolean attribute.
fn ax_bool(element: *mut c_void, attr: CFStringRef) -> Result<Option<bool>> {
    let mut v: CFTypeRef = ptr::null_mut();
    let err = unsafe { AXUIElementCopyAttributeValue(element, attr, &mut v) };
    if err != 0 {
        return Err(ax_err(err));
    }
    if v.is_null() {
        return Ok(None);
    }
    let b = unsafe { CFBooleanGetValue(v) };
    unsafe { CFRelease(v) };
    Ok(Some(b))
}

/// Write a boolean attribute.
fn ax_set_bool(element: *mut c_void, attr: CFStringRef, value: bool) -> Result<()> {
    let val = unsafe {
        (if value {
            kCFBooleanTrue
        } else {
            kCFBooleanFalse
        }) as CFTypeRef
    };
    let err = unsafe { AXUIElementSetAttributeValue(element, attr, val) };
    if err != 0 {
        return Err(ax_err(err));
    }
    Ok(())
}

/// Read a string attribute.
fn ax_get_string(element: *mut c_void, attr: CFStringRef) -> Option<String> {
    let mut v: CFTypeRef = ptr::null_mut();
    let err = unsafe { AXUIElementCopyAttributeValue(element, attr, &mut v) };
    if err != 0 || v.is_null() {
        return None;
    }
    let s = unsafe { CFString::wrap_under_create_rule(v as _) };
    Some(s.to_string())
}

/// An application window reached through accessibility.
#[derive(Debug)]
struct AxWindow(AXElem);

impl WindowElement for AxWindow {
    fn unminimize(&self) -> Result<()> {
        ax_set_bool(self.0.as_ptr(), cfstr("AXMinimized"), false)
    }

    fn raise(&self) -> Result<()> {
        let err = unsafe { AXUIElementPerformAction(self.0.as_ptr(), cfstr("AXRaise")) };
        if err != 0 {
            return Err(ax_err(err));
        }
        Ok(())
    }
}

/// Every AX window of `pid` with its title, minimized flag and window
/// number. Blocks until the application answers.
pub(crate) fn app_windows(pid: i32) -> Result<Vec<DiscoveredWindow>> {
    let app = AXElem::from_create(unsafe { AXUIElementCreateApplication(pid) })
        .ok_or(Error::AppElement)?;
    let mut wins_ref: CFTypeRef = ptr::null_mut();
    let err =
        unsafe { AXUIElementCopyAttributeValue(app.as_ptr(), cfstr("AXWindows"), &mut wins_ref) };
    if err != 0 {
        return Err(ax_err(err));
    }
    if wins_ref.is_null() {
        return Ok(Vec::new());
    }
    let arr = unsafe { CFArray::<*const c_void>::wrap_under_create_rule(wins_ref as _) };
    let mut out = Vec::new();
    for i in 0..unsafe { CFArrayGetCount(arr.as_concrete_TypeRef()) } {
        let wref = unsafe { CFArrayGetValueAtIndex(arr.as_concrete_TypeRef(), i) } as *mut c_void;
        let Some(elem) = AXElem::retain_from_borrowed(wref) else {
            continue;
        };
        let title = ax_get_string(elem.as_ptr(), cfstr("AXTitle")).unwrap_or_default();
        let minimized = ax_bool(elem.as_ptr(), cfstr("AXMinimized"))
            .ok()
            .flatten()
            .unwrap_or(false);
        let window_number = ax_private::window_number(elem.as_ptr());
        out.push(DiscoveredWindow {
            title,
            minimized,
            window_number,
            element: Arc::new(AxWindow(elem)),
        });
    }
    trace!(pid, count = out.len(), "ax_app_windows");
    Ok(out)
}
