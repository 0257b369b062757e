//! CoreGraphics keyboard event tap.
//!
//! The `core-graphics` `CGEventTap` maps `CallbackResult::Drop` to a NULL
//! `CGEventRef` at the C boundary, which is what CoreGraphics requires to
//! suppress delivery. Swallowed events therefore never reach the foreground
//! app.

use std::{
    ffi::c_void,
    ptr,
    sync::{
        Arc,
        atomic::{AtomicPtr, Ordering},
    },
};

use core_foundation::{
    base::TCFType,
    mach_port::CFMachPortRef,
    runloop::{CFRunLoop, CFRunLoopSource, kCFRunLoopCommonModes},
};
use core_graphics::event::{self as cge, CallbackResult};
use tracing::{debug, trace, warn};

use crate::{
    Error, Result,
    tap::{EventFlags, TapAction, TapInput, TapShared},
};

#[link(name = "CoreGraphics", kind = "framework")]
unsafe extern "C" {
    fn CGEventTapEnable(tap: CFMachPortRef, enable: bool);
}

/// `kCGKeyboardEventKeycode`.
const FIELD_KEYBOARD_EVENT_KEYCODE: u32 = 9;

/// Reduce an OS event to a [`TapInput`].
fn tap_input(etype: cge::CGEventType, event: &cge::CGEvent) -> TapInput {
    match etype {
        cge::CGEventType::KeyDown => TapInput::KeyDown {
            key_code: event.get_integer_value_field(FIELD_KEYBOARD_EVENT_KEYCODE) as u16,
            flags: EventFlags::from_raw(event.get_flags().bits()),
        },
        cge::CGEventType::FlagsChanged => TapInput::FlagsChanged {
            flags: EventFlags::from_raw(event.get_flags().bits()),
        },
        cge::CGEventType::TapDisabledByTimeout | cge::CGEventType::TapDisabledByUserInput => {
            TapInput::TapDisabled
        }
        _ => TapInput::Other,
    }
}

/// An installed tap. Dropping it disables the tap and detaches it from the
/// run loop.
pub struct EventTap {
    /// Keeps the tap and its callback alive.
    tap: cge::CGEventTap<'static>,
    /// Source added to the installing thread's run loop.
    source: CFRunLoopSource,
    /// Run loop the source was added to.
    run_loop: CFRunLoop,
}

/// Create a session-level keyboard tap on the current thread's run loop.
///
/// Fails when the process lacks the Accessibility permission; callers retry
/// later. Classified actions go to `sink`, which must not block.
pub fn install_event_tap(
    shared: Arc<TapShared>,
    sink: Arc<dyn Fn(TapAction) + Send + Sync>,
) -> Result<EventTap> {
    let port_ptr: Arc<AtomicPtr<c_void>> = Arc::new(AtomicPtr::new(ptr::null_mut()));
    let port_ptr_cb = port_ptr.clone();

    debug!("creating_event_tap");
    let tap = cge::CGEventTap::new(
        cge::CGEventTapLocation::Session,
        cge::CGEventTapPlacement::HeadInsertEventTap,
        cge::CGEventTapOptions::Default,
        vec![cge::CGEventType::KeyDown, cge::CGEventType::FlagsChanged],
        move |_proxy, etype, event| {
            let input = tap_input(etype, event);
            let d = shared.classify(input);
            if d.reenable {
                let p = port_ptr_cb.load(Ordering::SeqCst) as CFMachPortRef;
                if !p.is_null() {
                    warn!("tap_disabled_by_os_reenabling");
                    unsafe { CGEventTapEnable(p, true) };
                }
            }
            if let Some(action) = d.action {
                trace!(?action, swallow = d.swallow, "tap_action");
                sink(action);
            }
            if d.swallow {
                CallbackResult::Drop
            } else {
                CallbackResult::Keep
            }
        },
    )
    .map_err(|_| {
        warn!("event_tap_create_failed");
        Error::EventTapStart
    })?;

    port_ptr.store(
        tap.mach_port().as_concrete_TypeRef() as *mut c_void,
        Ordering::SeqCst,
    );

    let source = tap.mach_port().create_runloop_source(0).map_err(|_| {
        warn!("run_loop_source_create_failed");
        Error::EventTapStart
    })?;
    let run_loop = CFRunLoop::get_current();
    run_loop.add_source(&source, unsafe { kCFRunLoopCommonModes });
    tap.enable();
    debug!("event_tap_installed");

    Ok(EventTap {
        tap,
        source,
        run_loop,
    })
}

impl Drop for EventTap {
    fn drop(&mut self) {
        unsafe { CGEventTapEnable(self.tap.mach_port().as_concrete_TypeRef(), false) };
        self.run_loop
            .remove_source(&self.source, unsafe { kCFRunLoopCommonModes });
        debug!("event_tap_removed");
    }
}
