use std::{mem, sync::Arc, time::Duration};

use config::Settings;
use crossbeam_channel::Receiver;
use mac_hotkey::{
    HotkeyBackend, Registry,
    tap::{SessionView, TapAction, TapConfig, TapShared},
};
use mac_keycode::Shortcut;
use mac_winops::{WinOps, WindowHandle, enumerate, group_by_application};
use tokio::{runtime::Handle, time::sleep};
use tracing::{debug, info, trace, warn};

use crate::{
    controller::{self, Direction, Effect, Input},
    deps::{SystemApi, TapGuard, TapInstaller, TapSink},
    layout::columns_for,
    main_loop::{MainMsg, MainSender},
    state::SwitcherState,
    ui::{LauncherSurface, SwitcherUi},
};

/// Hotkey id of the launcher toggle.
pub const LAUNCHER_HOTKEY_ID: u32 = 1;
/// Hotkey id of same-app cycling over all windows.
pub const SAME_APP_HOTKEY_ID: u32 = 2;
/// Hotkey id of same-app cycling over non-minimized windows.
pub const SAME_APP_VISIBLE_HOTKEY_ID: u32 = 3;
/// Delay between event tap install attempts.
pub const TAP_RETRY_INTERVAL: Duration = Duration::from_secs(2);

/// What a registered hotkey does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    /// Show or hide the launcher.
    ToggleLauncher,
    /// Raise another window of the frontmost application.
    CycleApp {
        /// Skip minimized windows.
        visible_only: bool,
    },
}

/// Whether the main loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep draining.
    Continue,
    /// Shut down.
    Exit,
}

/// Everything the engine talks to.
pub struct Services<B: HotkeyBackend> {
    /// Global hotkey registration.
    pub hotkeys: B,
    /// Window enumeration and activation.
    pub ops: Arc<dyn WinOps>,
    /// Switcher presentation.
    pub ui: Box<dyn SwitcherUi>,
    /// The launcher panel.
    pub launcher: Box<dyn LauncherSurface>,
    /// Event tap installation.
    pub tap: Box<dyn TapInstaller>,
    /// Permissions and system settings.
    pub system: Arc<dyn SystemApi>,
    /// Runtime whose blocking pool runs OS introspection.
    pub runtime: Handle,
    /// Channel back into the main context.
    pub sender: MainSender,
    /// Delay between event tap install attempts.
    pub tap_retry: Duration,
}

/// Main-context orchestrator.
///
/// Owns the switcher session and all hotkey bindings. Construct with
/// [`Engine::new`], call [`Engine::start`] once on the main thread, then
/// feed it every [`MainMsg`] via [`Engine::handle`] or [`Engine::drain`].
pub struct Engine<B: HotkeyBackend> {
    /// Settings currently applied.
    settings: Settings,
    /// Switcher session.
    state: SwitcherState,
    /// Discrete global hotkeys.
    registry: Registry<B, HotkeyAction>,
    /// Window enumeration and activation.
    ops: Arc<dyn WinOps>,
    /// Switcher presentation.
    ui: Box<dyn SwitcherUi>,
    /// The launcher panel.
    launcher: Box<dyn LauncherSurface>,
    /// Shortcuts and session flags read by the tap callback.
    tap_shared: Arc<TapShared>,
    /// Event tap installation.
    tap_installer: Box<dyn TapInstaller>,
    /// The installed tap, once installation succeeds.
    tap: Option<Box<dyn TapGuard>>,
    /// A `RetryTap` is scheduled.
    tap_retry_pending: bool,
    /// Failed install attempts since the last success.
    tap_failures: u32,
    /// Delay between tap install attempts.
    tap_retry: Duration,
    /// Permissions and system settings.
    system: Arc<dyn SystemApi>,
    /// Background pool.
    runtime: Handle,
    /// Channel back into the main context.
    sender: MainSender,
}

impl<B: HotkeyBackend> Engine<B> {
    /// Create an engine. Nothing touches the OS until [`Engine::start`].
    pub fn new(services: Services<B>, settings: Settings) -> Self {
        let tap_config = tap_config(&settings);
        Self {
            settings,
            state: SwitcherState::default(),
            registry: Registry::new(services.hotkeys),
            ops: services.ops,
            ui: services.ui,
            launcher: services.launcher,
            tap_shared: Arc::new(TapShared::new(tap_config)),
            tap_installer: services.tap,
            tap: None,
            tap_retry_pending: false,
            tap_failures: 0,
            tap_retry: services.tap_retry,
            system: services.system,
            runtime: services.runtime,
            sender: services.sender,
        }
    }

    /// Bind hotkeys, apply the search shortcut and install the event tap.
    pub fn start(&mut self) {
        let settings = self.settings.clone();
        self.apply_settings(settings);
        self.install_tap();
    }

    /// Current switcher session.
    pub fn state(&self) -> &SwitcherState {
        &self.state
    }

    /// Settings currently applied.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Hotkey registry.
    pub fn registry(&self) -> &Registry<B, HotkeyAction> {
        &self.registry
    }

    /// State shared with the tap callback.
    pub fn tap_shared(&self) -> &Arc<TapShared> {
        &self.tap_shared
    }

    /// The event tap is installed.
    pub fn tap_installed(&self) -> bool {
        self.tap.is_some()
    }

    /// Handle every queued message without blocking.
    pub fn drain(&mut self, rx: &Receiver<MainMsg>) -> Flow {
        for msg in rx.try_iter() {
            if self.handle(msg) == Flow::Exit {
                return Flow::Exit;
            }
        }
        Flow::Continue
    }

    /// Handle one message.
    pub fn handle(&mut self, msg: MainMsg) -> Flow {
        trace!(?msg, "main_msg");
        match msg {
            MainMsg::Tap(action) => self.on_tap(action),
            MainMsg::Hotkey(id) => match self.registry.fire(id) {
                Some(HotkeyAction::ToggleLauncher) => self.toggle_launcher(),
                Some(HotkeyAction::CycleApp { visible_only }) => self.cycle_app(visible_only),
                None => {}
            },
            MainMsg::WindowsLoaded { windows, grouped } => {
                self.feed(Input::WindowsLoaded { windows, grouped });
            }
            MainMsg::ActivateApp(window) => self.activate_app(&window),
            MainMsg::RetryTap => {
                self.tap_retry_pending = false;
                self.install_tap();
            }
            MainMsg::Reload(settings) => self.apply_settings(settings),
            MainMsg::Shutdown => {
                self.shutdown();
                return Flow::Exit;
            }
        }
        Flow::Continue
    }

    /// Replace all bindings and tap shortcuts with those of `settings`.
    ///
    /// Every binding is dropped first, so a combination that moved between
    /// actions never collides with its old registration.
    pub fn apply_settings(&mut self, settings: Settings) {
        self.registry.unregister_all();
        self.bind(
            LAUNCHER_HOTKEY_ID,
            &settings.shortcut,
            HotkeyAction::ToggleLauncher,
        );
        self.bind(
            SAME_APP_HOTKEY_ID,
            &settings.same_app_switcher_shortcut,
            HotkeyAction::CycleApp {
                visible_only: false,
            },
        );
        self.bind(
            SAME_APP_VISIBLE_HOTKEY_ID,
            &settings.same_app_visible_or_derived(),
            HotkeyAction::CycleApp { visible_only: true },
        );
        self.tap_shared.set_config(tap_config(&settings));
        let system = self.system.clone();
        if let Some(shortcut) = settings.spotlight_override() {
            let shortcut = shortcut.to_string();
            self.runtime.spawn_blocking(move || {
                if let Err(e) = system.apply_search_shortcut(&shortcut) {
                    warn!(%shortcut, error = %e, "search_shortcut_apply_failed");
                }
            });
        } else if self.settings.spotlight_override().is_some() {
            // The override was removed; hand the system its shortcut back.
            self.runtime.spawn_blocking(move || {
                if let Err(e) = system.restore_search_shortcut() {
                    warn!(error = %e, "search_shortcut_restore_failed");
                }
            });
        }
        debug!(bindings = self.registry.len(), "settings_applied");
        self.settings = settings;
    }

    /// Register one hotkey. Failures leave the binding absent.
    fn bind(&mut self, id: u32, spec: &str, action: HotkeyAction) {
        let shortcut = Shortcut::parse(spec);
        let (key_code, modifiers) = (shortcut.key_code(), shortcut.carbon_modifiers());
        if let Err(e) = self.registry.register(id, key_code, modifiers, action) {
            debug!(id, %shortcut, error = %e, "hotkey_unavailable");
        }
    }

    /// Route a classified tap action.
    fn on_tap(&mut self, action: TapAction) {
        match action {
            TapAction::AdvanceNext => self.feed(Input::Advance(Direction::Next)),
            TapAction::AdvancePrevious => self.feed(Input::Advance(Direction::Previous)),
            TapAction::ReleaseHold => self.feed(Input::ReleaseHold),
            TapAction::Cancel => self.feed(Input::Cancel),
            TapAction::ToggleLauncher => self.toggle_launcher(),
        }
    }

    /// Run one controller transition and its effects.
    fn feed(&mut self, input: Input) {
        let state = mem::take(&mut self.state);
        let (state, effects) = controller::apply(state, input);
        self.state = state;
        self.publish();
        for effect in effects {
            self.run_effect(effect);
        }
        if self.state.visible {
            self.ui.render(&self.state.snapshot());
        }
    }

    /// Perform one side effect requested by the controller.
    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::HideLauncher => {
                if self.launcher.is_visible() {
                    self.launcher.hide();
                }
            }
            Effect::StartEnumeration => self.start_enumeration(),
            Effect::Shown => {
                let count = self.state.windows.len();
                self.state.columns = columns_for(
                    self.ops.main_screen_width(),
                    self.settings.columns_hint(),
                    count,
                );
                debug!(
                    count,
                    selected = self.state.selected_index,
                    columns = self.state.columns,
                    "switcher_shown"
                );
            }
            Effect::Activate(window) => self.raise_in_background(window),
            Effect::Dismissed => self.ui.on_dismissed(),
        }
    }

    /// Mirror the session flags into the tap's shared state.
    fn publish(&self) {
        self.tap_shared.publish(SessionView {
            visible: self.state.visible,
            loading: self.state.is_loading(),
        });
    }

    /// Fetch the window list on the background pool.
    fn start_enumeration(&mut self) {
        if !self.system.accessibility_ok() {
            debug!("switcher_needs_accessibility");
            self.feed(Input::WindowsLoaded {
                windows: Vec::new(),
                grouped: false,
            });
            return;
        }
        let ops = self.ops.clone();
        let tx = self.sender.clone();
        let grouped = self.settings.group_windows_by_app;
        self.runtime.spawn_blocking(move || {
            let mut windows = enumerate(ops.as_ref());
            if grouped {
                windows = group_by_application(&windows);
            }
            trace!(count = windows.len(), "switcher_windows_loaded");
            tx.post(MainMsg::WindowsLoaded { windows, grouped });
        });
    }

    /// Un-minimize and raise off the main thread, then activate the owner
    /// back on it.
    fn raise_in_background(&self, window: WindowHandle) {
        let tx = self.sender.clone();
        self.runtime.spawn_blocking(move || {
            raise_window(&window);
            tx.post(MainMsg::ActivateApp(window));
        });
    }

    /// Activate the window's application and notify the UI.
    fn activate_app(&mut self, window: &WindowHandle) {
        if let Err(e) = self.ops.activate_app(window.pid) {
            warn!(pid = window.pid, error = %e, "activate_app_failed");
        }
        info!(pid = window.pid, app = %window.app_name, title = %window.title, "window_activated");
        self.ui.on_activated(window);
    }

    /// Hide the switcher, then flip the launcher.
    fn toggle_launcher(&mut self) {
        self.feed(Input::Dismiss);
        self.launcher.toggle();
    }

    /// Raise the frontmost application's rearmost window.
    fn cycle_app(&self, visible_only: bool) {
        let Some(pid) = self.ops.frontmost_pid() else {
            debug!("cycle_app_no_frontmost");
            return;
        };
        let ops = self.ops.clone();
        let tx = self.sender.clone();
        self.runtime.spawn_blocking(move || {
            let mut candidates: Vec<WindowHandle> = enumerate(ops.as_ref())
                .into_iter()
                .filter(|w| w.pid == pid && !(visible_only && w.minimized))
                .collect();
            if candidates.len() < 2 {
                trace!(pid, count = candidates.len(), "cycle_app_nothing_to_do");
                return;
            }
            let Some(next) = candidates.pop() else {
                return;
            };
            raise_window(&next);
            tx.post(MainMsg::ActivateApp(next));
        });
    }

    /// Install the event tap, scheduling a retry on failure.
    fn install_tap(&mut self) {
        if self.tap.is_some() {
            return;
        }
        let tx = self.sender.clone();
        let sink: TapSink = Arc::new(move |action| tx.post(MainMsg::Tap(action)));
        match self.tap_installer.install(self.tap_shared.clone(), sink) {
            Ok(guard) => {
                self.tap = Some(guard);
                self.tap_failures = 0;
                info!("event_tap_ready");
            }
            Err(e) => {
                if self.tap_failures == 0 {
                    warn!(
                        error = %e,
                        accessibility = self.system.accessibility_ok(),
                        "event_tap_unavailable_retrying"
                    );
                } else {
                    debug!(attempt = self.tap_failures + 1, error = %e, "event_tap_retry_failed");
                }
                self.tap_failures += 1;
                self.schedule_tap_retry();
            }
        }
    }

    /// Post `RetryTap` after the retry interval.
    fn schedule_tap_retry(&mut self) {
        if self.tap_retry_pending {
            return;
        }
        self.tap_retry_pending = true;
        let tx = self.sender.clone();
        let delay = self.tap_retry;
        self.runtime.spawn(async move {
            sleep(delay).await;
            tx.post(MainMsg::RetryTap);
        });
    }

    /// Release hotkeys and the tap.
    fn shutdown(&mut self) {
        self.registry.unregister_all();
        self.tap = None;
        debug!("engine_shutdown");
    }
}

/// Tap shortcuts for `settings`.
fn tap_config(settings: &Settings) -> TapConfig {
    TapConfig::from_specs(
        &settings.switcher_shortcut,
        &settings.shortcut,
        settings.suppress_system_shortcut,
    )
}

/// Un-minimize if needed, then raise. Failures are logged.
fn raise_window(window: &WindowHandle) {
    if window.minimized
        && let Err(e) = window.element.unminimize()
    {
        debug!(title = %window.title, error = %e, "unminimize_failed");
    }
    if let Err(e) = window.element.raise() {
        debug!(title = %window.title, error = %e, "raise_failed");
    }
}
