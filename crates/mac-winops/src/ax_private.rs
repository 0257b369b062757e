use std::{ffi::c_void, mem};

use once_cell::sync::OnceCell;

/// Signature of the private `_AXUIElementGetWindow`.
type AxGetWindowFn = unsafe extern "C" fn(*mut c_void, *mut u32) -> i32;

/// Resolved once per process; `None` if the symbol is missing.
static AX_GET_WINDOW_SYM: OnceCell<Option<AxGetWindowFn>> = OnceCell::new();

/// Look up the symbol with `dlsym`.
fn resolve_sym() -> Option<AxGetWindowFn> {
    *AX_GET_WINDOW_SYM.get_or_init(|| {
        let ptr = unsafe { libc::dlsym(libc::RTLD_DEFAULT, c"_AXUIElementGetWindow".as_ptr()) };
        if ptr.is_null() {
            None
        } else {
            Some(unsafe { mem::transmute::<*mut c_void, AxGetWindowFn>(ptr) })
        }
    })
}

/// Window number (`CGWindowID`) of an AX window element, via the private
/// `_AXUIElementGetWindow`. `None` when the symbol is unavailable or the
/// element has no backing window.
pub(crate) fn window_number(element: *mut c_void) -> Option<u32> {
    let f = resolve_sym()?;
    let mut id: u32 = 0;
    let rc = unsafe { f(element, &mut id) };
    if rc == 0 && id != 0 { Some(id) } else { None }
}
