//! Front-to-back stacking order from the window server.

use std::ffi::c_void;

use core_foundation::{
    array::{CFArray, CFArrayGetCount, CFArrayGetValueAtIndex},
    base::{CFTypeRef, TCFType},
    dictionary::CFDictionaryRef,
};
use core_graphics::window as cgw;
use tracing::{trace, warn};

use crate::cfutil::dict_get_i32;

#[link(name = "CoreGraphics", kind = "framework")]
unsafe extern "C" {
    fn CGWindowListCopyWindowInfo(option: u32, relativeToWindow: u32) -> CFTypeRef; // CFArrayRef
}

#[link(name = "CoreFoundation", kind = "framework")]
unsafe extern "C" {
    fn CFGetTypeID(cf: CFTypeRef) -> usize;
    fn CFDictionaryGetTypeID() -> usize;
}

/// `kCGWindowListOptionOnScreenOnly`.
const K_CG_WINDOW_LIST_OPTION_ON_SCREEN_ONLY: u32 = 1 << 0;
/// `kCGWindowListExcludeDesktopElements`.
const K_CG_WINDOW_LIST_OPTION_EXCLUDE_DESKTOP_ELEMENTS: u32 = 1 << 4;

/// Window numbers of on-screen, layer-0 windows, frontmost first.
///
/// Other layers (menus, HUDs, the Dock) are not switchable and are left
/// out. Returns `None` when the window server does not answer.
pub(crate) fn layer0_window_numbers() -> Option<Vec<u32>> {
    let arr_ref = unsafe {
        CGWindowListCopyWindowInfo(
            K_CG_WINDOW_LIST_OPTION_ON_SCREEN_ONLY
                | K_CG_WINDOW_LIST_OPTION_EXCLUDE_DESKTOP_ELEMENTS,
            0,
        )
    };
    if arr_ref.is_null() {
        warn!("CGWindowListCopyWindowInfo returned null");
        return None;
    }
    let arr: CFArray<*const c_void> = unsafe { CFArray::wrap_under_create_rule(arr_ref as _) };
    let (key_layer, key_num) = unsafe { (cgw::kCGWindowLayer, cgw::kCGWindowNumber) };
    let mut out = Vec::new();
    for i in 0..unsafe { CFArrayGetCount(arr.as_concrete_TypeRef()) } {
        let item = unsafe { CFArrayGetValueAtIndex(arr.as_concrete_TypeRef(), i) } as CFTypeRef;
        if item.is_null() || unsafe { CFGetTypeID(item) != CFDictionaryGetTypeID() } {
            continue;
        }
        let d = item as CFDictionaryRef;
        if dict_get_i32(d, key_layer) != Some(0) {
            continue;
        }
        match dict_get_i32(d, key_num) {
            Some(n) if n > 0 => out.push(n as u32),
            _ => continue,
        }
    }
    trace!(count = out.len(), "layer0_windows");
    Some(out)
}
