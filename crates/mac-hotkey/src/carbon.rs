//! Carbon `RegisterEventHotKey` backend.
//!
//! Carbon hotkeys are delivered on the main run loop through an event
//! handler on the application event target. The handler only extracts the
//! hotkey id and passes it to the sink.

use std::{collections::HashMap, ffi::c_void, ptr, sync::Arc};

use tracing::{trace, warn};

use crate::{Error, HotkeyBackend, Result};

/// Carbon status code.
type OSStatus = i32;
/// Opaque Carbon reference.
type Ref = *mut c_void;

/// `EventTypeSpec`.
#[repr(C)]
struct EventTypeSpec {
    /// Event class.
    event_class: u32,
    /// Event kind within the class.
    event_kind: u32,
}

/// `EventHotKeyID`.
#[repr(C)]
#[derive(Default)]
struct EventHotKeyID {
    /// Four-char application signature.
    signature: u32,
    /// Caller-chosen id.
    id: u32,
}

/// Handler signature for `InstallEventHandler`.
type EventHandlerProc =
    extern "C" fn(call_ref: Ref, event: Ref, user_data: *mut c_void) -> OSStatus;

#[link(name = "Carbon", kind = "framework")]
unsafe extern "C" {
    fn GetApplicationEventTarget() -> Ref;
    fn InstallEventHandler(
        target: Ref,
        handler: EventHandlerProc,
        num_types: u32,
        list: *const EventTypeSpec,
        user_data: *mut c_void,
        out_ref: *mut Ref,
    ) -> OSStatus;
    fn RemoveEventHandler(handler: Ref) -> OSStatus;
    fn RegisterEventHotKey(
        key_code: u32,
        modifiers: u32,
        id: EventHotKeyID,
        target: Ref,
        options: u32,
        out_ref: *mut Ref,
    ) -> OSStatus;
    fn UnregisterEventHotKey(hotkey: Ref) -> OSStatus;
    fn GetEventParameter(
        event: Ref,
        name: u32,
        desired_type: u32,
        actual_type: *mut u32,
        buffer_size: usize,
        actual_size: *mut usize,
        data: *mut c_void,
    ) -> OSStatus;
}

/// `noErr`.
const NO_ERR: OSStatus = 0;
/// `eventNotHandledErr`.
const EVENT_NOT_HANDLED: OSStatus = -9874;
/// `kEventClassKeyboard` ('keyb').
const EVENT_CLASS_KEYBOARD: u32 = u32::from_be_bytes(*b"keyb");
/// `kEventHotKeyPressed`.
const EVENT_HOTKEY_PRESSED: u32 = 5;
/// `kEventParamDirectObject` ('----').
const PARAM_DIRECT_OBJECT: u32 = u32::from_be_bytes(*b"----");
/// `typeEventHotKeyID` ('hkid').
const TYPE_HOTKEY_ID: u32 = u32::from_be_bytes(*b"hkid");
/// Signature stamped on every hotkey we register.
const SIGNATURE: u32 = u32::from_be_bytes(*b"LNCH");

/// Receives fired hotkey ids. Must not block.
pub type HotkeySink = Arc<dyn Fn(u32) + Send + Sync>;

/// Carbon implementation of [`HotkeyBackend`]. Main thread only.
pub struct CarbonBackend {
    /// Where fired ids go.
    sink: HotkeySink,
    /// Installed handler and the boxed sink handed to it as user data.
    handler: Option<(Ref, *mut HotkeySink)>,
    /// Live registrations.
    hotkeys: HashMap<u32, Ref>,
}

impl CarbonBackend {
    /// Create a backend that reports presses to `sink`.
    pub fn new(sink: HotkeySink) -> Self {
        Self {
            sink,
            handler: None,
            hotkeys: HashMap::new(),
        }
    }
}

extern "C" fn hotkey_handler(_call_ref: Ref, event: Ref, user_data: *mut c_void) -> OSStatus {
    if user_data.is_null() {
        return EVENT_NOT_HANDLED;
    }
    let mut hk = EventHotKeyID::default();
    let status = unsafe {
        GetEventParameter(
            event,
            PARAM_DIRECT_OBJECT,
            TYPE_HOTKEY_ID,
            ptr::null_mut(),
            size_of::<EventHotKeyID>(),
            ptr::null_mut(),
            (&raw mut hk).cast(),
        )
    };
    if status != NO_ERR || hk.signature != SIGNATURE {
        return EVENT_NOT_HANDLED;
    }
    trace!(id = hk.id, "carbon_hotkey_pressed");
    let sink = unsafe { &*(user_data as *const HotkeySink) };
    sink(hk.id);
    NO_ERR
}

impl HotkeyBackend for CarbonBackend {
    fn install_handler(&mut self) -> Result<()> {
        if self.handler.is_some() {
            return Ok(());
        }
        let spec = EventTypeSpec {
            event_class: EVENT_CLASS_KEYBOARD,
            event_kind: EVENT_HOTKEY_PRESSED,
        };
        let user_data = Box::into_raw(Box::new(self.sink.clone()));
        let mut handler: Ref = ptr::null_mut();
        let status = unsafe {
            InstallEventHandler(
                GetApplicationEventTarget(),
                hotkey_handler,
                1,
                &spec,
                user_data.cast(),
                &mut handler,
            )
        };
        if status != NO_ERR {
            drop(unsafe { Box::from_raw(user_data) });
            return Err(Error::HandlerInstall(status));
        }
        self.handler = Some((handler, user_data));
        Ok(())
    }

    fn remove_handler(&mut self) {
        if let Some((handler, user_data)) = self.handler.take() {
            let status = unsafe { RemoveEventHandler(handler) };
            if status != NO_ERR {
                warn!(status, "remove_event_handler_failed");
            }
            drop(unsafe { Box::from_raw(user_data) });
        }
    }

    fn register(&mut self, id: u32, key_code: u32, modifiers: u32) -> Result<()> {
        let mut hotkey: Ref = ptr::null_mut();
        let status = unsafe {
            RegisterEventHotKey(
                key_code,
                modifiers,
                EventHotKeyID {
                    signature: SIGNATURE,
                    id,
                },
                GetApplicationEventTarget(),
                0,
                &mut hotkey,
            )
        };
        if status != NO_ERR || hotkey.is_null() {
            return Err(Error::Registration { id, status });
        }
        self.hotkeys.insert(id, hotkey);
        Ok(())
    }

    fn unregister(&mut self, id: u32) {
        if let Some(hotkey) = self.hotkeys.remove(&id) {
            let status = unsafe { UnregisterEventHotKey(hotkey) };
            if status != NO_ERR {
                warn!(id, status, "unregister_hotkey_failed");
            }
        }
    }
}

impl Drop for CarbonBackend {
    fn drop(&mut self) {
        let ids: Vec<u32> = self.hotkeys.keys().copied().collect();
        for id in ids {
            self.unregister(id);
        }
        self.remove_handler();
    }
}
