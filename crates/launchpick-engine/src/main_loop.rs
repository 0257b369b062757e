//! Messages into the main context.
//!
//! Everything that mutates switcher state is funnelled through one FIFO
//! channel drained on the main thread. Posting wakes the host run loop.

use std::sync::Arc;

use config::Settings;
use crossbeam_channel::{Receiver, Sender, unbounded};
use mac_hotkey::tap::TapAction;
use mac_winops::WindowHandle;
use tracing::debug;

use crate::{Error, Result};

/// A unit of work for the main context.
#[derive(Debug)]
pub enum MainMsg {
    /// Classified by the event tap.
    Tap(TapAction),
    /// A registered global hotkey fired.
    Hotkey(u32),
    /// Background enumeration for the switcher finished.
    WindowsLoaded {
        /// Windows in display order.
        windows: Vec<WindowHandle>,
        /// The list holds one representative per application.
        grouped: bool,
    },
    /// A window was raised in the background; activate its application.
    ActivateApp(WindowHandle),
    /// Try installing the event tap again.
    RetryTap,
    /// Apply new settings.
    Reload(Settings),
    /// Stop the main loop.
    Shutdown,
}

/// Wakes the host run loop after a post.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Cloneable handle for posting to the main context from any thread.
#[derive(Clone)]
pub struct MainSender {
    /// Channel into the main context.
    tx: Sender<MainMsg>,
    /// Host run loop wake-up.
    waker: Waker,
}

impl MainSender {
    /// Post a message and wake the main context.
    pub fn send(&self, msg: MainMsg) -> Result<()> {
        self.tx.send(msg).map_err(|_| Error::ChannelClosed)?;
        (self.waker)();
        Ok(())
    }

    /// Post, logging instead of failing when the main context has gone.
    pub fn post(&self, msg: MainMsg) {
        if self.send(msg).is_err() {
            debug!("main_channel_closed");
        }
    }
}

/// A main-context channel. `waker` runs after every successful post.
pub fn channel(waker: Waker) -> (MainSender, Receiver<MainMsg>) {
    let (tx, rx) = unbounded();
    (MainSender { tx, waker }, rx)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn posts_arrive_in_order_and_wake() {
        let wakes = Arc::new(AtomicUsize::new(0));
        let w = wakes.clone();
        let (tx, rx) = channel(Arc::new(move || {
            w.fetch_add(1, Ordering::SeqCst);
        }));
        tx.post(MainMsg::Hotkey(1));
        tx.post(MainMsg::Tap(TapAction::AdvanceNext));
        tx.post(MainMsg::Shutdown);
        let got: Vec<MainMsg> = rx.try_iter().collect();
        assert!(matches!(got[0], MainMsg::Hotkey(1)));
        assert!(matches!(got[1], MainMsg::Tap(TapAction::AdvanceNext)));
        assert!(matches!(got[2], MainMsg::Shutdown));
        assert_eq!(wakes.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn closed_channel_reports_error() {
        let (tx, rx) = channel(Arc::new(|| {}));
        drop(rx);
        assert!(matches!(
            tx.send(MainMsg::RetryTap),
            Err(Error::ChannelClosed)
        ));
        tx.post(MainMsg::RetryTap);
    }
}
