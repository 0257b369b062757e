//! Hold-to-cycle session transitions.
//!
//! [`apply`] is pure: it consumes the state and one input and returns the
//! new state plus the side effects the engine must perform, in order. The
//! engine never mutates session fields anywhere else.

use std::mem;

use mac_winops::WindowHandle;
use tracing::trace;

use crate::state::{SwitcherState, reconcile_pending};

/// Which way an advance moves the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Forward (switcher key alone).
    Next,
    /// Backward (switcher key with shift).
    Previous,
}

impl Direction {
    /// Contribution to the pending-advance count.
    fn step(self) -> i32 {
        match self {
            Self::Next => 1,
            Self::Previous => -1,
        }
    }
}

/// Something that happened to the session.
#[derive(Debug, Clone)]
pub enum Input {
    /// The switcher key was pressed with the hold modifier down.
    Advance(Direction),
    /// The hold modifier was released.
    ReleaseHold,
    /// Escape while the switcher is on screen.
    Cancel,
    /// The background enumeration finished.
    WindowsLoaded {
        /// Windows in display order.
        windows: Vec<WindowHandle>,
        /// One representative per application.
        grouped: bool,
    },
    /// The launcher took over the screen.
    Dismiss,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone)]
pub enum Effect {
    /// Hide the launcher before the switcher opens.
    HideLauncher,
    /// Fetch the window list on the background pool.
    StartEnumeration,
    /// The switcher became visible.
    Shown,
    /// Un-minimize, raise and activate this window.
    Activate(WindowHandle),
    /// The switcher went off screen.
    Dismissed,
}

/// Apply one input to the session.
pub fn apply(mut state: SwitcherState, input: Input) -> (SwitcherState, Vec<Effect>) {
    let mut effects = Vec::new();
    match input {
        Input::Advance(dir) if state.visible => match dir {
            Direction::Next => state.select_next(),
            Direction::Previous => state.select_previous(),
        },
        Input::Advance(dir) => {
            if state.abandoned {
                // A new gesture before the stale list arrived takes the
                // in-flight load over.
                state.abandoned = false;
                state.pending_advances = 0;
            }
            state.pending_advances += dir.step();
            if !state.loading {
                state.loading = true;
                effects.push(Effect::HideLauncher);
                effects.push(Effect::StartEnumeration);
            }
        }
        Input::ReleaseHold if state.visible => {
            let selected = state.selected_window().cloned();
            hide(&mut state);
            if let Some(w) = selected {
                effects.push(Effect::Activate(w));
            }
            effects.push(Effect::Dismissed);
        }
        Input::ReleaseHold => {
            if state.loading {
                trace!("session_abandoned_while_loading");
                state.abandoned = true;
            }
        }
        Input::Cancel if state.visible => {
            hide(&mut state);
            effects.push(Effect::Dismissed);
        }
        Input::Cancel => {}
        Input::WindowsLoaded {
            windows: list,
            grouped,
        } => {
            if !state.loading {
                trace!(count = list.len(), "stale_window_list_ignored");
                return (state, effects);
            }
            state.loading = false;
            let pending = mem::take(&mut state.pending_advances);
            if mem::take(&mut state.abandoned) || list.is_empty() {
                return (state, effects);
            }
            state.selected_index = reconcile_pending(pending, list.len());
            state.windows = list;
            state.grouped = grouped;
            state.visible = true;
            effects.push(Effect::Shown);
        }
        Input::Dismiss if state.visible => {
            hide(&mut state);
            effects.push(Effect::Dismissed);
        }
        Input::Dismiss => {
            if state.loading {
                state.abandoned = true;
            }
        }
    }
    (state, effects)
}

/// Take the switcher off screen and drop the session's windows.
fn hide(state: &mut SwitcherState) {
    state.visible = false;
    state.windows.clear();
    state.selected_index = 0;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mac_winops::{MockElement, WindowIdentity};

    use super::*;

    fn windows(n: usize) -> Vec<WindowHandle> {
        (0..n)
            .map(|i| WindowHandle {
                identity: WindowIdentity::Stable(i as u32 + 1),
                title: format!("w{i}"),
                pid: 100 + i as i32,
                app_name: "app".into(),
                icon: String::new(),
                minimized: false,
                element: Arc::new(MockElement::default()),
            })
            .collect()
    }

    fn run(state: SwitcherState, inputs: Vec<Input>) -> (SwitcherState, Vec<Effect>) {
        let mut state = state;
        let mut all = Vec::new();
        for input in inputs {
            let (s, fx) = apply(state, input);
            state = s;
            all.extend(fx);
        }
        (state, all)
    }

    fn names(effects: &[Effect]) -> Vec<&'static str> {
        effects
            .iter()
            .map(|e| match e {
                Effect::HideLauncher => "hide_launcher",
                Effect::StartEnumeration => "start_enumeration",
                Effect::Shown => "shown",
                Effect::Activate(_) => "activate",
                Effect::Dismissed => "dismissed",
            })
            .collect()
    }

    fn loaded(windows: Vec<WindowHandle>) -> Input {
        Input::WindowsLoaded {
            windows,
            grouped: false,
        }
    }

    #[test]
    fn first_advance_starts_one_enumeration() {
        let (s, fx) = run(
            SwitcherState::default(),
            vec![
                Input::Advance(Direction::Next),
                Input::Advance(Direction::Next),
                Input::Advance(Direction::Next),
            ],
        );
        assert_eq!(names(&fx), ["hide_launcher", "start_enumeration"]);
        assert_eq!(s.pending_advances, 3);
        assert!(s.is_loading());
        assert!(!s.visible);
    }

    #[test]
    fn pending_forward_presses_select_by_count() {
        let (s, fx) = run(
            SwitcherState::default(),
            vec![
                Input::Advance(Direction::Next),
                Input::Advance(Direction::Next),
                Input::Advance(Direction::Next),
                loaded(windows(5)),
            ],
        );
        assert_eq!(names(&fx).last(), Some(&"shown"));
        assert!(s.visible);
        assert_eq!(s.selected_index, 3);
        assert_eq!(s.pending_advances, 0);
        assert!(!s.is_loading());
    }

    #[test]
    fn pending_backward_presses_count_from_end() {
        let (s, _) = run(
            SwitcherState::default(),
            vec![
                Input::Advance(Direction::Previous),
                Input::Advance(Direction::Previous),
                Input::Advance(Direction::Previous),
                loaded(windows(5)),
            ],
        );
        assert_eq!(s.selected_index, 2);
    }

    #[test]
    fn empty_list_stays_hidden() {
        let (s, fx) = run(
            SwitcherState::default(),
            vec![Input::Advance(Direction::Next), loaded(Vec::new())],
        );
        assert!(!s.visible);
        assert_eq!(s.pending_advances, 0);
        assert_eq!(names(&fx), ["hide_launcher", "start_enumeration"]);
    }

    #[test]
    fn visible_advance_wraps() {
        let (s, fx) = run(
            SwitcherState::default(),
            vec![
                Input::Advance(Direction::Next),
                loaded(windows(2)),
                Input::Advance(Direction::Next),
                Input::Advance(Direction::Next),
            ],
        );
        assert_eq!(s.selected_index, 1);
        assert_eq!(names(&fx), ["hide_launcher", "start_enumeration", "shown"]);
    }

    #[test]
    fn release_hides_then_activates_selection() {
        let (s, fx) = run(
            SwitcherState::default(),
            vec![
                Input::Advance(Direction::Next),
                loaded(windows(3)),
                Input::ReleaseHold,
            ],
        );
        assert!(!s.visible);
        assert!(s.windows.is_empty());
        assert_eq!(
            names(&fx),
            ["hide_launcher", "start_enumeration", "shown", "activate", "dismissed"]
        );
        let Some(Effect::Activate(w)) = fx.get(3) else {
            panic!("expected activation");
        };
        assert_eq!(w.title, "w1");
    }

    #[test]
    fn cancel_dismisses_without_activation() {
        let (s, fx) = run(
            SwitcherState::default(),
            vec![
                Input::Advance(Direction::Next),
                loaded(windows(3)),
                Input::Cancel,
            ],
        );
        assert!(!s.visible);
        assert_eq!(
            names(&fx),
            ["hide_launcher", "start_enumeration", "shown", "dismissed"]
        );
    }

    #[test]
    fn release_while_hidden_and_idle_is_noop() {
        let (s, fx) = run(SwitcherState::default(), vec![Input::ReleaseHold]);
        assert!(fx.is_empty());
        assert!(!s.visible);
        assert!(!s.abandoned);
    }

    #[test]
    fn release_while_loading_abandons_session() {
        let (s, fx) = run(
            SwitcherState::default(),
            vec![
                Input::Advance(Direction::Next),
                Input::Advance(Direction::Next),
                Input::ReleaseHold,
            ],
        );
        assert!(!s.is_loading());
        assert_eq!(names(&fx), ["hide_launcher", "start_enumeration"]);

        let (s, fx) = apply(s, loaded(windows(4)));
        assert!(fx.is_empty());
        assert!(!s.visible);
        assert_eq!(s.pending_advances, 0);
        assert!(s.windows.is_empty());
    }

    #[test]
    fn new_press_revives_abandoned_load() {
        let (s, fx) = run(
            SwitcherState::default(),
            vec![
                Input::Advance(Direction::Next),
                Input::Advance(Direction::Next),
                Input::ReleaseHold,
                Input::Advance(Direction::Next),
                loaded(windows(4)),
            ],
        );
        assert_eq!(names(&fx), ["hide_launcher", "start_enumeration", "shown"]);
        assert!(s.visible);
        assert_eq!(s.selected_index, 1);
    }

    #[test]
    fn dismiss_hides_visible_switcher() {
        let (s, fx) = run(
            SwitcherState::default(),
            vec![
                Input::Advance(Direction::Next),
                loaded(windows(2)),
                Input::Dismiss,
            ],
        );
        assert!(!s.visible);
        assert_eq!(names(&fx).last(), Some(&"dismissed"));
    }

    #[test]
    fn list_grouping_is_recorded_on_show() {
        let (s, _) = run(
            SwitcherState::default(),
            vec![
                Input::Advance(Direction::Next),
                Input::WindowsLoaded {
                    windows: windows(3),
                    grouped: true,
                },
            ],
        );
        assert!(s.visible);
        assert!(s.grouped);
        assert!(s.snapshot().grouped);
    }

    #[test]
    fn stale_list_is_ignored() {
        let (s, fx) = apply(SwitcherState::default(), loaded(windows(2)));
        assert!(fx.is_empty());
        assert!(!s.visible);
    }
}
