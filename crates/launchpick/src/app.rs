//! The macOS run loop: tao on the main thread, tokio for background work.

use std::{path::PathBuf, sync::Arc};

use config::Settings;
use launchpick_engine::{
    Engine, Flow, MainMsg, MainSender, RealSystemApi, RealTapInstaller, Services,
    TAP_RETRY_INTERVAL, channel,
};
use mac_hotkey::CarbonBackend;
use mac_winops::RealWinOps;
use parking_lot::Mutex;
use tao::{
    event::{Event, StartCause},
    event_loop::{ControlFlow, EventLoop},
    platform::macos::{ActivationPolicy, EventLoopExtMacOS},
};
use tokio::{
    runtime::{Builder, Runtime},
    signal::{
        ctrl_c,
        unix::{SignalKind, signal},
    },
};
use tracing::{debug, error, info, trace, warn};

use crate::ui::{LogLauncher, LogUi};

/// Run until shutdown. Must be called on the main thread.
pub fn run(settings: Settings, config_path: PathBuf) -> i32 {
    let runtime = match Builder::new_multi_thread()
        .thread_name("launchpick-bg")
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return 1;
        }
    };

    let mut event_loop = EventLoop::new();
    // No Dock icon.
    event_loop.set_activation_policy(ActivationPolicy::Accessory);
    let proxy = Mutex::new(event_loop.create_proxy());
    let (sender, rx) = channel(Arc::new(move || {
        if proxy.lock().send_event(()).is_err() {
            trace!("event_loop_gone");
        }
    }));

    watch_signals(&runtime, sender.clone(), config_path);

    let hotkey_tx = sender.clone();
    let hotkeys = CarbonBackend::new(Arc::new(move |id| hotkey_tx.post(MainMsg::Hotkey(id))));
    let mut engine = Engine::new(
        Services {
            hotkeys,
            ops: Arc::new(RealWinOps),
            ui: Box::new(LogUi),
            launcher: Box::new(LogLauncher::default()),
            tap: Box::new(RealTapInstaller),
            system: Arc::new(RealSystemApi),
            runtime: runtime.handle().clone(),
            sender,
            tap_retry: TAP_RETRY_INTERVAL,
        },
        settings,
    );

    // The runtime must outlive the loop; `run` never returns.
    let _runtime = runtime;
    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;
        match event {
            Event::NewEvents(StartCause::Init) => {
                engine.start();
                info!("launchpick_ready");
            }
            Event::UserEvent(()) => {
                if engine.drain(&rx) == Flow::Exit {
                    debug!("Shutdown requested, exiting event loop");
                    *control_flow = ControlFlow::Exit;
                }
            }
            Event::LoopDestroyed => info!("Shutdown complete"),
            _ => {}
        }
    })
}

/// Ctrl-C and SIGTERM shut down; SIGHUP reloads the config file.
fn watch_signals(runtime: &Runtime, sender: MainSender, config_path: PathBuf) {
    let shutdown_tx = sender.clone();
    runtime.spawn(async move {
        let mut term = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                warn!("SIGTERM handler unavailable: {}", e);
                return;
            }
        };
        tokio::select! {
            _ = ctrl_c() => {}
            _ = term.recv() => {}
        }
        shutdown_tx.post(MainMsg::Shutdown);
    });
    runtime.spawn(async move {
        let mut hup = match signal(SignalKind::hangup()) {
            Ok(s) => s,
            Err(e) => {
                warn!("SIGHUP handler unavailable: {}", e);
                return;
            }
        };
        while hup.recv().await.is_some() {
            let settings = config::load_or_default(&config_path);
            info!(path = %config_path.display(), "reloading config");
            sender.post(MainMsg::Reload(settings));
        }
    });
}
