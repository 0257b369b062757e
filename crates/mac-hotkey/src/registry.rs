//! Id-keyed registry of global hotkeys.
//!
//! The registry owns the bookkeeping (at most one binding per id, a single
//! lazily installed OS handler) and delegates the OS calls to a
//! [`HotkeyBackend`]. Each binding carries an action value of type `A`;
//! [`Registry::fire`] hands a clone of it back to the caller on the main
//! context.

use std::collections::BTreeMap;

use tracing::{debug, trace, warn};

use crate::Result;

/// OS seam for global hotkey registration.
pub trait HotkeyBackend {
    /// Install the process-wide handler that reports presses by id.
    fn install_handler(&mut self) -> Result<()>;
    /// Remove the handler installed by `install_handler`.
    fn remove_handler(&mut self);
    /// Register `key_code` + `modifiers` (Carbon mask) under `id`.
    fn register(&mut self, id: u32, key_code: u32, modifiers: u32) -> Result<()>;
    /// Drop the OS registration for `id`. Unknown ids are ignored.
    fn unregister(&mut self, id: u32);
}

/// A live binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyBinding<A> {
    /// Caller-chosen id, unique within the registry.
    pub id: u32,
    /// Hardware keycode.
    pub key_code: u32,
    /// Carbon modifier mask.
    pub modifiers: u32,
    /// Value returned by `fire` when the combination is pressed.
    pub action: A,
}

/// Global hotkey registry over a backend `B`, with bindings carrying `A`.
pub struct Registry<B: HotkeyBackend, A> {
    /// OS access.
    backend: B,
    /// Active bindings by id.
    bindings: BTreeMap<u32, HotkeyBinding<A>>,
    /// Whether the OS handler is currently installed.
    handler_installed: bool,
}

impl<B: HotkeyBackend, A: Clone> Registry<B, A> {
    /// Create an empty registry. No OS handler is installed until the first
    /// registration.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            bindings: BTreeMap::new(),
            handler_installed: false,
        }
    }

    /// Bind `id` to a key combination, replacing any previous binding for it.
    ///
    /// On failure the binding is absent and the error is returned after being
    /// logged; callers typically carry on without the hotkey.
    pub fn register(&mut self, id: u32, key_code: u32, modifiers: u32, action: A) -> Result<()> {
        self.unregister(id);
        if !self.handler_installed {
            if let Err(e) = self.backend.install_handler() {
                warn!(id, error = %e, "hotkey_handler_install_failed");
                return Err(e);
            }
            self.handler_installed = true;
            debug!("hotkey_handler_installed");
        }
        if let Err(e) = self.backend.register(id, key_code, modifiers) {
            warn!(id, key_code, modifiers, error = %e, "hotkey_register_failed");
            return Err(e);
        }
        self.bindings.insert(
            id,
            HotkeyBinding {
                id,
                key_code,
                modifiers,
                action,
            },
        );
        debug!(id, key_code, modifiers, "hotkey_registered");
        Ok(())
    }

    /// Remove the binding for `id`, if any.
    pub fn unregister(&mut self, id: u32) {
        if self.bindings.remove(&id).is_some() {
            self.backend.unregister(id);
            trace!(id, "hotkey_unregistered");
        }
    }

    /// Remove every binding and tear down the OS handler.
    pub fn unregister_all(&mut self) {
        let ids: Vec<u32> = self.bindings.keys().copied().collect();
        for id in ids {
            self.unregister(id);
        }
        if self.handler_installed {
            self.backend.remove_handler();
            self.handler_installed = false;
            debug!("hotkey_handler_removed");
        }
    }

    /// Resolve a reported press. Unknown ids are logged and ignored.
    pub fn fire(&self, id: u32) -> Option<A> {
        match self.bindings.get(&id) {
            Some(b) => {
                trace!(id, "hotkey_fired");
                Some(b.action.clone())
            }
            None => {
                debug!(id, "hotkey_fired_without_binding");
                None
            }
        }
    }

    /// The binding registered under `id`.
    pub fn binding(&self, id: u32) -> Option<&HotkeyBinding<A>> {
        self.bindings.get(&id)
    }

    /// Number of active bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True when nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Arc};

    use parking_lot::Mutex;

    use super::*;
    use crate::Error;

    #[derive(Default)]
    struct Log {
        calls: Vec<String>,
        taken: HashSet<(u32, u32)>,
    }

    #[derive(Clone, Default)]
    struct Recording(Arc<Mutex<Log>>);

    impl Recording {
        fn calls(&self) -> Vec<String> {
            self.0.lock().calls.clone()
        }
        fn occupy(&self, key_code: u32, modifiers: u32) {
            self.0.lock().taken.insert((key_code, modifiers));
        }
    }

    impl HotkeyBackend for Recording {
        fn install_handler(&mut self) -> Result<()> {
            self.0.lock().calls.push("install".into());
            Ok(())
        }
        fn remove_handler(&mut self) {
            self.0.lock().calls.push("remove".into());
        }
        fn register(&mut self, id: u32, key_code: u32, modifiers: u32) -> Result<()> {
            let mut log = self.0.lock();
            if log.taken.contains(&(key_code, modifiers)) {
                return Err(Error::Registration { id, status: -9878 });
            }
            log.calls.push(format!("register:{id}"));
            Ok(())
        }
        fn unregister(&mut self, id: u32) {
            self.0.lock().calls.push(format!("unregister:{id}"));
        }
    }

    #[test]
    fn handler_installed_once() {
        let rec = Recording::default();
        let mut reg = Registry::new(rec.clone());
        reg.register(1, 49, 0x300, "launcher").unwrap();
        reg.register(2, 35, 0x900, "same_app").unwrap();
        assert_eq!(rec.calls(), vec!["install", "register:1", "register:2"]);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn reregister_replaces_binding() {
        let rec = Recording::default();
        let mut reg = Registry::new(rec.clone());
        reg.register(1, 49, 0x300, "a").unwrap();
        reg.register(1, 0, 0x100, "b").unwrap();
        assert_eq!(
            rec.calls(),
            vec!["install", "register:1", "unregister:1", "register:1"]
        );
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.fire(1), Some("b"));
        assert_eq!(reg.binding(1).map(|b| b.key_code), Some(0));
    }

    #[test]
    fn failed_registration_leaves_no_binding() {
        let rec = Recording::default();
        rec.occupy(49, 0x100);
        let mut reg = Registry::new(rec);
        let err = reg.register(7, 49, 0x100, "x").unwrap_err();
        assert!(matches!(err, Error::Registration { id: 7, .. }));
        assert!(reg.is_empty());
        assert_eq!(reg.fire(7), None);
    }

    #[test]
    fn unregister_is_idempotent() {
        let rec = Recording::default();
        let mut reg = Registry::new(rec.clone());
        reg.register(3, 35, 0xA00, ()).unwrap();
        reg.unregister(3);
        reg.unregister(3);
        reg.unregister(99);
        assert_eq!(rec.calls(), vec!["install", "register:3", "unregister:3"]);
    }

    #[test]
    fn unregister_all_removes_handler_and_reinstalls_lazily() {
        let rec = Recording::default();
        let mut reg = Registry::new(rec.clone());
        reg.register(1, 49, 0, 1u8).unwrap();
        reg.register(2, 48, 0, 2u8).unwrap();
        reg.unregister_all();
        assert!(reg.is_empty());
        assert_eq!(reg.fire(1), None);
        reg.register(1, 49, 0, 1u8).unwrap();
        assert_eq!(
            rec.calls(),
            vec![
                "install",
                "register:1",
                "register:2",
                "unregister:1",
                "unregister:2",
                "remove",
                "install",
                "register:1",
            ]
        );
    }
}
