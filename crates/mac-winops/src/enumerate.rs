//! Window discovery, stacking-order sort and per-application grouping.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::{WinOps, WindowHandle, WindowIdentity};

/// Window number → front-to-back position (0 is frontmost).
pub type StackingPositions = HashMap<u32, usize>;

/// Enumerate switchable windows, most recently used first.
///
/// Blocks on every application's accessibility server in turn; run it off
/// the main context. Returns an empty list when the stacking order cannot
/// be read. Applications whose windows cannot be read are skipped.
pub fn enumerate(ops: &dyn WinOps) -> Vec<WindowHandle> {
    let Some(stack) = ops.stacking_order() else {
        debug!("stacking_order_unavailable");
        return Vec::new();
    };
    let positions: StackingPositions = stack
        .into_iter()
        .enumerate()
        .map(|(i, id)| (id, i))
        .collect();
    let own_pid = ops.own_pid();

    let mut next_synthetic = 0u32;
    let mut discovered = Vec::new();
    for app in ops.running_apps() {
        if !app.regular || app.pid == own_pid {
            continue;
        }
        let windows = match ops.app_windows(&app) {
            Ok(w) => w,
            Err(e) => {
                debug!(pid = app.pid, app = %app.name, error = %e, "app_windows_unreadable");
                continue;
            }
        };
        for w in windows {
            if w.title.is_empty() {
                continue;
            }
            let identity = match w.window_number {
                Some(n) => WindowIdentity::Stable(n),
                None => {
                    next_synthetic += 1;
                    WindowIdentity::Synthetic(next_synthetic)
                }
            };
            discovered.push(WindowHandle {
                identity,
                title: w.title,
                pid: app.pid,
                app_name: app.name.clone(),
                icon: app.bundle_id.clone().unwrap_or_default(),
                minimized: w.minimized,
                element: w.element,
            });
        }
    }
    trace!(count = discovered.len(), "windows_discovered");
    order_windows(&positions, discovered)
}

/// Sort discovered windows by stacking position.
///
/// Non-minimized windows come first: each one with a position is inserted
/// before the first window whose position is strictly greater (windows
/// without a position count as infinitely far back), so ties keep discovery
/// order. Minimized windows follow in discovery order.
pub fn order_windows(
    positions: &StackingPositions,
    discovered: Vec<WindowHandle>,
) -> Vec<WindowHandle> {
    let pos = |w: &WindowHandle| {
        w.identity
            .stable()
            .and_then(|id| positions.get(&id).copied())
    };
    let mut front: Vec<WindowHandle> = Vec::with_capacity(discovered.len());
    let mut minimized = Vec::new();
    for w in discovered {
        if w.minimized {
            minimized.push(w);
            continue;
        }
        match pos(&w) {
            Some(z) => {
                let at = front
                    .iter()
                    .position(|o| pos(o).is_none_or(|oz| oz > z))
                    .unwrap_or(front.len());
                front.insert(at, w);
            }
            None => front.push(w),
        }
    }
    front.extend(minimized);
    front
}

/// Collapse to one entry per process, in first-sighting order.
///
/// The representative is the process's first window in `windows`; it is
/// marked minimized only when every window of the process is.
pub fn group_by_application(windows: &[WindowHandle]) -> Vec<WindowHandle> {
    let mut any_visible: HashSet<i32> = HashSet::new();
    for w in windows {
        if !w.minimized {
            any_visible.insert(w.pid);
        }
    }
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for w in windows {
        if seen.insert(w.pid) {
            let mut rep = w.clone();
            rep.minimized = !any_visible.contains(&w.pid);
            out.push(rep);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;
    use crate::{AppInfo, MockElement, MockWinOps};

    fn handle(identity: WindowIdentity, pid: i32, minimized: bool, title: &str) -> WindowHandle {
        WindowHandle {
            identity,
            title: title.into(),
            pid,
            app_name: format!("app{pid}"),
            icon: String::new(),
            minimized,
            element: Arc::new(MockElement::default()),
        }
    }

    fn titles(ws: &[WindowHandle]) -> Vec<&str> {
        ws.iter().map(|w| w.title.as_str()).collect()
    }

    #[test]
    fn stacking_order_sorts_positioned_before_positionless() {
        let positions: StackingPositions = [(1, 0), (2, 1)].into_iter().collect();
        let discovered = vec![
            handle(WindowIdentity::Stable(2), 10, false, "W2"),
            handle(WindowIdentity::Stable(1), 11, false, "W1"),
            handle(WindowIdentity::Synthetic(1), 12, false, "W3"),
        ];
        let out = order_windows(&positions, discovered);
        assert_eq!(titles(&out), ["W1", "W2", "W3"]);
    }

    #[test]
    fn positioned_window_jumps_ahead_of_earlier_positionless() {
        let positions: StackingPositions = [(5, 0)].into_iter().collect();
        let discovered = vec![
            handle(WindowIdentity::Stable(9), 1, false, "offscreen"),
            handle(WindowIdentity::Stable(5), 2, false, "front"),
        ];
        let out = order_windows(&positions, discovered);
        assert_eq!(titles(&out), ["front", "offscreen"]);
    }

    #[test]
    fn minimized_last_in_discovery_order() {
        let positions: StackingPositions = [(1, 0), (2, 1)].into_iter().collect();
        let discovered = vec![
            handle(WindowIdentity::Stable(7), 1, true, "m1"),
            handle(WindowIdentity::Stable(2), 1, false, "b"),
            handle(WindowIdentity::Stable(1), 2, true, "m2"),
            handle(WindowIdentity::Stable(3), 2, false, "c"),
        ];
        let out = order_windows(&positions, discovered);
        assert_eq!(titles(&out), ["b", "c", "m1", "m2"]);
    }

    #[test]
    fn grouping_keeps_first_and_tracks_minimized() {
        let list = vec![
            handle(WindowIdentity::Stable(1), 1, false, "a1"),
            handle(WindowIdentity::Stable(2), 2, true, "b1"),
            handle(WindowIdentity::Stable(3), 1, true, "a2"),
            handle(WindowIdentity::Stable(4), 2, true, "b2"),
        ];
        let out = group_by_application(&list);
        assert_eq!(titles(&out), ["a1", "b1"]);
        assert!(!out[0].minimized);
        assert!(out[1].minimized);
    }

    #[test]
    fn enumerate_filters_and_assigns_identities() {
        let ops = MockWinOps::new();
        ops.set_own_pid(99);
        ops.set_stacking(Some(vec![20, 10]));
        ops.add_app(
            AppInfo {
                pid: 1,
                name: "Editor".into(),
                bundle_id: Some("com.example.editor".into()),
                regular: true,
            },
            vec![
                MockWinOps::window("doc", false, Some(10)),
                MockWinOps::window("", false, Some(11)),
                MockWinOps::window("palette", false, None),
            ],
        );
        ops.add_app(
            AppInfo {
                pid: 2,
                name: "Agent".into(),
                bundle_id: None,
                regular: false,
            },
            vec![MockWinOps::window("hidden agent", false, Some(30))],
        );
        ops.add_app(
            AppInfo {
                pid: 99,
                name: "Launchpick".into(),
                bundle_id: None,
                regular: true,
            },
            vec![MockWinOps::window("self", false, Some(40))],
        );
        ops.add_app(
            AppInfo {
                pid: 3,
                name: "Browser".into(),
                bundle_id: None,
                regular: true,
            },
            vec![
                MockWinOps::window("tab", false, Some(20)),
                MockWinOps::window("downloads", true, None),
            ],
        );
        ops.add_unreadable_app(AppInfo {
            pid: 4,
            name: "Hung".into(),
            bundle_id: None,
            regular: true,
        });

        let out = enumerate(&ops);
        assert_eq!(titles(&out), ["tab", "doc", "palette", "downloads"]);
        assert_eq!(out[1].icon, "com.example.editor");
        assert_eq!(out[1].app_name, "Editor");
        assert_eq!(out[2].identity, WindowIdentity::Synthetic(1));
        assert_eq!(out[3].identity, WindowIdentity::Synthetic(2));
    }

    #[test]
    fn enumerate_without_stacking_order_is_empty() {
        let ops = MockWinOps::new();
        ops.set_stacking(None);
        ops.add_app(
            AppInfo {
                pid: 1,
                name: "Editor".into(),
                bundle_id: None,
                regular: true,
            },
            vec![MockWinOps::window("doc", false, Some(10))],
        );
        assert!(enumerate(&ops).is_empty());
    }

    fn arb_windows() -> impl Strategy<Value = Vec<WindowHandle>> {
        prop::collection::vec((0i32..5, any::<bool>()), 0..24).prop_map(|v| {
            v.into_iter()
                .enumerate()
                .map(|(i, (pid, min))| {
                    handle(WindowIdentity::Stable(i as u32), pid, min, &format!("w{i}"))
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn grouping_one_per_pid(list in arb_windows()) {
            let out = group_by_application(&list);
            let pids: HashSet<i32> = list.iter().map(|w| w.pid).collect();
            prop_assert_eq!(out.len(), pids.len());
            for rep in &out {
                let all_min = list.iter().filter(|w| w.pid == rep.pid).all(|w| w.minimized);
                prop_assert_eq!(rep.minimized, all_min);
                let first = list.iter().find(|w| w.pid == rep.pid).map(|w| w.identity);
                prop_assert_eq!(Some(rep.identity), first);
            }
        }

        #[test]
        fn ordering_partitions_minimized(list in arb_windows()) {
            let positions: StackingPositions =
                (0..24u32).filter(|i| i % 3 != 0).map(|i| (i, (i as usize * 7) % 24)).collect();
            let out = order_windows(&positions, list.clone());
            prop_assert_eq!(out.len(), list.len());
            let first_min = out.iter().position(|w| w.minimized).unwrap_or(out.len());
            prop_assert!(out[first_min..].iter().all(|w| w.minimized));
        }
    }
}
