use tabhost_browser::{SimulatedHost, simulated_controller};
use tabhost_core::events::{Notification, TabEvent};
use tabhost_core::{
    BrowserContext, ContentHost, ControllerConfig, CreationOptions, Error, HostError, Partition,
    SurfaceId, TabLifecycleController, WindowCloseOutcome, WindowId,
};
use tokio::sync::mpsc::UnboundedReceiver;
use url::Url;

type Controller = TabLifecycleController<SimulatedHost>;

fn controller() -> Controller {
    simulated_controller(ControllerConfig::default())
}

fn new_tab(controller: &mut Controller, window: WindowId) -> SurfaceId {
    controller
        .create_tab(None, Some(window), CreationOptions::default())
        .unwrap()
}

fn pinned_tab(controller: &mut Controller, window: WindowId) -> SurfaceId {
    controller
        .create_tab(None, Some(window), CreationOptions::default().pinned(true))
        .unwrap()
}

fn strip(controller: &Controller, window: WindowId) -> Vec<SurfaceId> {
    controller.windows().get(window).unwrap().surfaces()
}

fn drain(rx: &mut UnboundedReceiver<Notification>) -> Vec<TabEvent> {
    let mut events = Vec::new();
    while let Ok(notification) = rx.try_recv() {
        events.push(notification.event);
    }
    events
}

// ---- creation and cloning -------------------------------------------------

/// Test that a tab created into a window is bound to its strip and guest
#[test]
fn test_create_tab_into_window() {
    let mut c = controller();
    let w1 = c.open_window();
    let mut rx = c.subscribe();

    let tab = new_tab(&mut c, w1);

    assert_eq!(c.window_of(tab), Some(w1));
    assert_eq!(c.slot_of(tab), Some(0));
    assert!(c.host().is_attached(tab));
    assert_eq!(
        c.host().attach_params(tab).map(|p| p.owner_window),
        Some(w1)
    );
    assert_eq!(
        drain(&mut rx),
        vec![
            TabEvent::Created { surface: tab },
            TabEvent::Attached {
                surface: tab,
                window: w1,
                slot: 0
            },
        ]
    );
    c.check_invariants().unwrap();
}

/// Test that creation against a missing owner fails without mutating state
#[test]
fn test_create_tab_with_invalid_owner() {
    let mut c = controller();
    let w1 = c.open_window();

    let result = c.create_tab(Some(SurfaceId(99)), Some(w1), CreationOptions::default());

    assert!(matches!(
        result,
        Err(Error::Creation(HostError::InvalidOwner(SurfaceId(99))))
    ));
    assert!(c.tabs().is_empty());
    assert!(strip(&c, w1).is_empty());
}

/// Test that creation into a window that does not exist allocates nothing
#[test]
fn test_create_tab_into_missing_window() {
    let mut c = controller();

    let result = c.create_tab(None, Some(WindowId(7)), CreationOptions::default());

    assert!(matches!(result, Err(Error::WindowNotFound(WindowId(7)))));
    assert!(c.host().is_empty());
}

/// Test that creation options pick the storage partition
#[test]
fn test_create_tab_in_off_the_record_context() {
    let mut c = controller();
    let context = BrowserContext::default().off_the_record("scratch");

    let tab = c
        .create_tab(None, None, CreationOptions::new(context))
        .unwrap();

    let surface = c.host().surface(tab).unwrap();
    assert_eq!(surface.partition(), "scratch");
    assert_eq!(surface.parent_partition(), Some("persist:default"));
    assert!(c.snapshot(tab).unwrap().incognito);
}

/// Test that a cloned surface gets a fresh record and copies no state
#[test]
fn test_clone_starts_unattached() {
    let mut c = controller();
    let w1 = c.open_window();
    c.activate_window(w1).unwrap();
    let source = pinned_tab(&mut c, w1);
    c.host_mut()
        .commit_navigation(source, Url::parse("https://a.test/").unwrap(), "A");

    let clone = c.clone_tab(source).unwrap();

    let record = c.record(clone).unwrap();
    assert_eq!(record.window_id, None);
    assert_eq!(record.slot_index, None);
    assert!(!record.pinned);
    assert!(!record.is_placeholder);
    assert!(!record.pending_close);
    assert_ne!(c.tab_id(clone), c.tab_id(source));
    assert_eq!(
        c.host().navigation_history(clone),
        c.host().navigation_history(source)
    );
}

// ---- attach / detach ------------------------------------------------------

/// Test that a detached tab leaves a placeholder carrying its history
#[test]
fn test_detach_substitutes_placeholder() {
    let mut c = controller();
    let w1 = c.open_window();
    let a = new_tab(&mut c, w1);
    let b = new_tab(&mut c, w1);
    c.host_mut()
        .commit_navigation(a, Url::parse("https://a.test/").unwrap(), "A");

    let retired = c.detach_guest(a);

    assert_eq!(retired, Some(a));
    let placeholder = strip(&c, w1)[0];
    assert_ne!(placeholder, a);
    assert_eq!(strip(&c, w1), vec![placeholder, b]);
    assert!(c.is_placeholder(placeholder));
    assert_eq!(c.slot_of(placeholder), Some(0));
    assert_eq!(c.window_of(a), None);
    assert!(!c.host().is_attached(a));
    assert!(c.host().is_attached(placeholder));
    assert!(c.host().is_placeholder_surface(placeholder));
    assert_eq!(
        c.host().navigation_history(placeholder),
        c.host().navigation_history(a)
    );
    c.check_invariants().unwrap();
}

/// Test that detaching a tab that is in no window does nothing
#[test]
fn test_detach_unattached_is_noop() {
    let mut c = controller();
    let tab = c.create_tab(None, None, CreationOptions::default()).unwrap();

    assert_eq!(c.detach_guest(tab), None);
    assert_eq!(c.tabs().len(), 1);
}

/// Test that detaching then re-attaching restores the strip
#[test]
fn test_detach_attach_round_trip() {
    let mut c = controller();
    let w1 = c.open_window();
    let a = new_tab(&mut c, w1);
    let b = new_tab(&mut c, w1);
    let before = strip(&c, w1);

    let retired = c.detach_guest(a).unwrap();
    let placeholder = strip(&c, w1)[0];
    assert!(c.attach_guest(retired, w1, 0));

    assert_eq!(strip(&c, w1), before);
    assert_eq!(c.window_of(a), Some(w1));
    assert_eq!(c.slot_of(a), Some(0));
    assert_eq!(c.slot_of(b), Some(1));
    assert_eq!(c.window_of(placeholder), None);
    c.check_invariants().unwrap();

    // The stand-in is torn down once posted tasks run
    c.run_until_idle();
    assert!(!c.host().is_alive(placeholder));
    assert!(c.record(placeholder).is_none());
    assert_eq!(strip(&c, w1), before);
    c.check_invariants().unwrap();
}

/// Test that an unpinned placeholder destroys itself asynchronously
#[test]
fn test_unpinned_placeholder_is_destroyed_after_attach() {
    let mut c = controller();
    let w1 = c.open_window();
    let a = new_tab(&mut c, w1);
    let b = new_tab(&mut c, w1);

    c.detach_guest(a);
    let placeholder = strip(&c, w1)[0];

    // Destruction is posted, not immediate
    assert!(c.host().is_alive(placeholder));
    assert!(c.pending_tasks() > 0);

    c.run_until_idle();
    assert!(!c.host().is_alive(placeholder));
    assert_eq!(strip(&c, w1), vec![b]);
    assert_eq!(c.slot_of(b), Some(0));
    c.check_invariants().unwrap();
}

/// Test that attaching into a missing window or slot is refused
#[test]
fn test_attach_refused_without_side_effects() {
    let mut c = controller();
    let w1 = c.open_window();
    let a = new_tab(&mut c, w1);
    let loose = c.create_tab(None, None, CreationOptions::default()).unwrap();

    assert!(!c.attach_guest(loose, WindowId(42), 0));
    assert!(!c.attach_guest(loose, w1, 3));

    assert_eq!(c.window_of(loose), None);
    assert_eq!(strip(&c, w1), vec![a]);
}

/// Test that attaching an already attached guest is a caller bug
#[test]
#[should_panic(expected = "already attached")]
fn test_attach_already_attached_panics() {
    let mut c = controller();
    let w1 = c.open_window();
    let a = new_tab(&mut c, w1);

    c.attach_guest(a, w1, 0);
}

/// Test that moving a tab between windows rebinds its guest
#[test]
fn test_set_window_moves_between_strips() {
    let mut c = controller();
    let w1 = c.open_window();
    let w2 = c.open_window();
    let a = new_tab(&mut c, w1);
    let b = new_tab(&mut c, w1);

    c.set_window(a, Some(w2)).unwrap();

    assert_eq!(strip(&c, w1), vec![b]);
    assert_eq!(strip(&c, w2), vec![a]);
    assert_eq!(c.slot_of(b), Some(0));
    assert_eq!(c.window_of(a), Some(w2));
    assert!(c.host().is_attached(a));
    assert_eq!(
        c.host().attach_params(a).map(|p| p.owner_window),
        Some(w2)
    );
    c.check_invariants().unwrap();
}

/// Test that a destroyed tab leaves its window and the registry
#[test]
fn test_destroy_tab_removes_record() {
    let mut c = controller();
    let w1 = c.open_window();
    let a = new_tab(&mut c, w1);
    let b = new_tab(&mut c, w1);
    let tab_id = c.tab_id(a).unwrap();

    c.destroy_tab(a);

    assert!(c.record(a).is_none());
    assert_eq!(c.tab_by_id(tab_id), None);
    assert_eq!(strip(&c, w1), vec![b]);
    c.check_invariants().unwrap();
}

// ---- pinned tabs ----------------------------------------------------------

/// Test that a pinned placeholder in a background window is not promoted
#[test]
fn test_reconcile_skips_wrong_window() {
    // Arrange - W2 is last active, P is a pinned placeholder in W1
    let mut c = controller();
    let w1 = c.open_window();
    let w2 = c.open_window();
    c.activate_window(w2).unwrap();
    let p = pinned_tab(&mut c, w1);
    assert!(c.is_placeholder(p));

    // Act
    let promoted = c.maybe_attach_or_create_pinned_tab(p);

    // Assert
    assert!(!promoted);
    assert!(c.is_placeholder(p));
    assert_eq!(c.host().load_count(p), 0);
}

/// Test that activating the pinned tab's window promotes it exactly once
#[test]
fn test_activation_promotes_pinned_placeholder() {
    let mut c = controller();
    let w1 = c.open_window();
    let w2 = c.open_window();
    c.activate_window(w2).unwrap();
    let p = pinned_tab(&mut c, w1);
    let mut rx = c.subscribe();

    c.activate_window(w1).unwrap();

    assert!(!c.is_placeholder(p));
    assert_eq!(c.host().load_count(p), 1);
    assert_eq!(c.host().gesture_count(p), 1);
    assert!(c.host().is_foreground_eligible(p));
    assert!(
        drain(&mut rx).contains(&TabEvent::Promoted {
            surface: p,
            window: w1
        })
    );
}

/// Test that reconciliation run twice has the effect of running it once
#[test]
fn test_reconcile_is_idempotent() {
    let mut c = controller();
    let w1 = c.open_window();
    c.activate_window(w1).unwrap();
    let p = pinned_tab(&mut c, w1);

    assert!(c.maybe_attach_or_create_pinned_tab(p));
    assert!(!c.maybe_attach_or_create_pinned_tab(p));

    assert!(!c.is_placeholder(p));
    assert_eq!(c.host().load_count(p), 1);
}

/// Test that unpinning a loaded tab never manufactures a placeholder
#[test]
fn test_unpin_does_not_create_placeholder() {
    let mut c = controller();
    let w1 = c.open_window();
    c.activate_window(w1).unwrap();
    let p = pinned_tab(&mut c, w1);
    c.reconcile();
    let surfaces = c.host().len();

    c.set_pinned(p, false);

    assert!(!c.is_pinned(p));
    assert!(!c.is_placeholder(p));
    assert!(!c.windows().get(w1).unwrap().is_pinned_at(0));
    assert_eq!(c.host().len(), surfaces);
    assert_eq!(c.tabs().len(), 1);
}

/// Test that pinning an attached tab makes it a reconciliation candidate
#[test]
fn test_pin_marks_candidate_for_next_activation() {
    let mut c = controller();
    let w1 = c.open_window();
    let w2 = c.open_window();
    c.activate_window(w2).unwrap();
    let a = new_tab(&mut c, w1);

    c.set_pinned(a, true);
    assert!(c.is_placeholder(a));
    assert!(c.windows().get(w1).unwrap().is_pinned_at(0));
    assert_eq!(c.host().load_count(a), 0);

    c.activate_window(w1).unwrap();
    assert!(!c.is_placeholder(a));
    assert_eq!(c.host().load_count(a), 1);
}

/// Test that a detached pinned tab's placeholder takes over in the active window
#[test]
fn test_detach_pinned_promotes_placeholder() {
    let mut c = controller();
    let w1 = c.open_window();
    c.activate_window(w1).unwrap();
    let p = pinned_tab(&mut c, w1);
    c.reconcile();

    c.detach_guest(p);
    let placeholder = strip(&c, w1)[0];
    c.run_until_idle();

    assert!(c.is_pinned(placeholder));
    assert!(!c.is_placeholder(placeholder));
    assert_eq!(c.host().load_count(placeholder), 1);
    assert!(c.host().is_alive(placeholder));
    c.check_invariants().unwrap();
}

/// Test that a posted destroy re-checks the placeholder flag before acting
#[test]
fn test_posted_destroy_skips_promoted_tab() {
    let mut c = controller();
    let w1 = c.open_window();
    let w2 = c.open_window();
    c.activate_window(w2).unwrap();
    let a = new_tab(&mut c, w1);

    c.detach_guest(a);
    let placeholder = strip(&c, w1)[0];
    assert!(c.pending_tasks() > 0);

    // Pinned and promoted before the posted destroy runs
    c.set_pinned(placeholder, true);
    c.activate_window(w1).unwrap();
    assert!(!c.is_placeholder(placeholder));

    c.run_until_idle();
    assert!(c.host().is_alive(placeholder));
    assert_eq!(strip(&c, w1), vec![placeholder]);
}

/// Test that no slot is ever claimed by a placeholder and a real surface
#[test]
fn test_single_occupant_per_slot() {
    let mut c = controller();
    let w1 = c.open_window();
    let w2 = c.open_window();
    c.activate_window(w1).unwrap();
    let p = pinned_tab(&mut c, w1);
    let a = new_tab(&mut c, w1);
    c.reconcile();

    c.detach_guest(p);
    c.detach_guest(a);
    c.activate_window(w2).unwrap();
    c.activate_window(w1).unwrap();
    c.run_until_idle();

    c.check_invariants().unwrap();
    for window in [w1, w2] {
        for slot in 0..strip(&c, window).len() {
            let claimants = c
                .tabs()
                .iter()
                .filter(|r| r.window_id == Some(window) && r.slot_index == Some(slot))
                .count();
            assert_eq!(claimants, 1);
        }
    }
}

/// Test that detaching an unpromoted pinned tab leaves one placeholder per tab
#[test]
fn test_detach_unpromoted_pinned_keeps_one_placeholder() {
    let mut c = controller();
    let w1 = c.open_window();
    let w2 = c.open_window();
    c.activate_window(w2).unwrap();
    let p = pinned_tab(&mut c, w1);
    assert!(c.is_placeholder(p));

    c.detach_guest(p);
    let stand_in = strip(&c, w1)[0];
    c.run_until_idle();

    assert!(!c.is_placeholder(p));
    assert!(c.is_placeholder(stand_in));
    assert_eq!(c.record(stand_in).unwrap().lineage, p);
    let placeholders = c
        .tabs()
        .iter()
        .filter(|r| r.lineage == p && r.is_placeholder)
        .count();
    assert_eq!(placeholders, 1);
    c.check_invariants().unwrap();
}

// ---- window close ---------------------------------------------------------

/// Test that a window holding a loaded pinned tab is hidden instead of closed
#[test]
fn test_close_with_pinned_tab_hides_window() {
    let mut c = controller();
    let w1 = c.open_window();
    let _w2 = c.open_window();
    c.activate_window(w1).unwrap();
    let p = pinned_tab(&mut c, w1);
    c.reconcile();
    let mut rx = c.subscribe();

    let outcome = c.close_window(w1).unwrap();

    assert_eq!(outcome, WindowCloseOutcome::Hidden);
    let window = c.windows().get(w1).unwrap();
    assert!(!window.is_visible());
    assert!(!window.is_activated());
    assert!(c.host().is_alive(p));
    let events = drain(&mut rx);
    assert!(events.contains(&TabEvent::WindowHidden { window: w1 }));
    assert!(!events.contains(&TabEvent::WindowRemoved { window: w1 }));
}

/// Test that shutdown lets a window with a pinned tab close
#[test]
fn test_close_during_shutdown_removes_window() {
    let mut c = controller();
    let w1 = c.open_window();
    let _w2 = c.open_window();
    c.activate_window(w1).unwrap();
    let p = pinned_tab(&mut c, w1);
    c.reconcile();
    let mut rx = c.subscribe();

    c.begin_shutdown();
    let outcome = c.close_window(w1).unwrap();

    assert_eq!(outcome, WindowCloseOutcome::Closed);
    assert!(!c.windows().contains(w1));
    assert!(!c.host().is_alive(p));
    assert!(c.record(p).is_none());
    assert!(drain(&mut rx).contains(&TabEvent::WindowRemoved { window: w1 }));
}

/// Test that the last window closes even with a pinned tab
#[test]
fn test_close_last_window() {
    let mut c = controller();
    let w1 = c.open_window();
    c.activate_window(w1).unwrap();
    pinned_tab(&mut c, w1);
    c.reconcile();

    assert_eq!(c.close_window(w1).unwrap(), WindowCloseOutcome::Closed);
    assert!(c.windows().is_empty());
    assert!(c.tabs().is_empty());
}

/// Test that closing the last-active window reconciles the next one
#[test]
fn test_closing_last_active_window_promotes_pinned_in_successor() {
    let mut c = controller();
    let w1 = c.open_window();
    let w2 = c.open_window();
    c.activate_window(w1).unwrap();
    c.activate_window(w2).unwrap();
    let p = pinned_tab(&mut c, w1);
    assert!(c.is_placeholder(p));
    let mut rx = c.subscribe();

    assert_eq!(c.close_window(w2).unwrap(), WindowCloseOutcome::Closed);
    c.run_until_idle();

    assert_eq!(c.windows().last_active(), Some(w1));
    assert!(!c.is_placeholder(p));
    assert_eq!(c.host().load_count(p), 1);
    let events = drain(&mut rx);
    assert!(events.contains(&TabEvent::LastActiveChanged { window: w1 }));
    assert!(events.contains(&TabEvent::Promoted { surface: p, window: w1 }));
    c.check_invariants().unwrap();
}

/// Test that a deferred close is requested again once the pinned tab leaves
#[test]
fn test_deferred_close_resumes_after_move() {
    let config = ControllerConfig {
        defer_close_for_pinned: true,
        ..ControllerConfig::default()
    };
    let mut c = simulated_controller(config);
    let w1 = c.open_window();
    let w2 = c.open_window();
    c.activate_window(w1).unwrap();
    let p = pinned_tab(&mut c, w1);
    let other = new_tab(&mut c, w1);
    c.reconcile();

    assert_eq!(c.close_window(w1).unwrap(), WindowCloseOutcome::Deferred);
    assert!(c.record(p).unwrap().pending_close);
    assert!(c.windows().contains(w1));

    c.set_window(p, Some(w2)).unwrap();
    assert!(!c.record(p).unwrap().pending_close);
    c.run_until_idle();

    assert!(!c.windows().contains(w1));
    assert!(!c.host().is_alive(other));
    assert_eq!(c.window_of(p), Some(w2));
    assert!(c.is_pinned(p));
    assert!(c.windows().get(w2).unwrap().is_pinned_at(0));
    c.check_invariants().unwrap();
}

// ---- strip replacement ----------------------------------------------------

/// Test that an external replace moves bookkeeping to the new surface
#[test]
fn test_tab_replaced_at_transfers_slot() {
    let mut c = controller();
    let w1 = c.open_window();
    new_tab(&mut c, w1);
    new_tab(&mut c, w1);
    let old = new_tab(&mut c, w1);
    let new = c.create_tab(None, None, CreationOptions::default()).unwrap();
    let params = c.host().attach_params(old);

    let replaced = c.replace_in_strip(w1, 2, new).unwrap();

    assert_eq!(replaced, Some(old));
    assert_eq!(c.slot_of(new), Some(2));
    assert_eq!(c.window_of(new), Some(w1));
    assert_eq!(c.window_of(old), None);
    assert_eq!(c.slot_of(old), None);
    assert_eq!(c.host().attach_params(new), params);
    assert!(c.host().is_attached(new));
    assert!(!c.host().is_attached(old));
    assert!(!c.host().is_visible(old));
    c.check_invariants().unwrap();
}

/// Test that dropping a tab onto a later slot of its own window accounts for
/// its removal
#[test]
fn test_replace_within_same_window() {
    let mut c = controller();
    let w1 = c.open_window();
    let a = new_tab(&mut c, w1);
    let b = new_tab(&mut c, w1);
    let last = new_tab(&mut c, w1);

    let replaced = c.replace_in_strip(w1, 2, a).unwrap();

    assert_eq!(replaced, Some(last));
    assert_eq!(strip(&c, w1), vec![b, a]);
    assert_eq!(c.slot_of(a), Some(1));
    c.check_invariants().unwrap();
}

/// Test that a replace onto a missing slot fails before touching anything
#[test]
fn test_replace_out_of_range() {
    let mut c = controller();
    let w1 = c.open_window();
    let w2 = c.open_window();
    let a = new_tab(&mut c, w1);

    let result = c.replace_in_strip(w2, 0, a);

    assert!(matches!(result, Err(Error::SlotOutOfRange { .. })));
    assert_eq!(c.window_of(a), Some(w1));
}

/// Test that a placeholder replaced out of its slot is reaped once tasks run
#[test]
fn test_replaced_placeholder_is_reaped() {
    let mut c = controller();
    let w1 = c.open_window();
    let p = pinned_tab(&mut c, w1);
    c.detach_guest(p);
    c.run_until_idle();
    let placeholder = strip(&c, w1)[0];
    let incoming = c.create_tab(None, None, CreationOptions::default()).unwrap();

    let replaced = c.replace_in_strip(w1, 0, incoming).unwrap();

    assert_eq!(replaced, Some(placeholder));
    assert!(c.host().is_alive(placeholder));
    assert!(c.is_pinned(incoming));

    c.run_until_idle();
    assert!(!c.host().is_alive(placeholder));
    assert!(c.record(placeholder).is_none());
    assert_eq!(strip(&c, w1), vec![incoming]);
    c.check_invariants().unwrap();
}

/// Test that reaping can be switched off
#[test]
fn test_replaced_placeholder_kept_without_reaping() {
    let config = ControllerConfig {
        reap_orphaned_placeholders: false,
        ..ControllerConfig::default()
    };
    let mut c = simulated_controller(config);
    let w1 = c.open_window();
    let p = pinned_tab(&mut c, w1);
    c.detach_guest(p);
    c.run_until_idle();
    let placeholder = strip(&c, w1)[0];
    let incoming = c.create_tab(None, None, CreationOptions::default()).unwrap();

    c.replace_in_strip(w1, 0, incoming).unwrap();
    c.run_until_idle();

    assert!(c.host().is_alive(placeholder));
    assert_eq!(c.window_of(placeholder), None);
    c.check_invariants().unwrap();
}

/// Test that run_posted_tasks runs only what was already queued
#[test]
fn test_run_posted_tasks_runs_queued_tasks() {
    let mut c = controller();
    let w1 = c.open_window();
    let a = new_tab(&mut c, w1);
    new_tab(&mut c, w1);
    c.detach_guest(a);
    let placeholder = strip(&c, w1)[0];
    let queued = c.pending_tasks();
    assert!(queued > 0);

    let ran = c.run_posted_tasks();

    assert_eq!(ran, queued);
    assert!(!c.host().is_alive(placeholder));
    assert_eq!(c.pending_tasks(), 0);
}

// ---- queries and snapshots ------------------------------------------------

/// Test that selecting a tab shows it and reports it active
#[test]
fn test_set_active_selects_and_shows() {
    let mut c = controller();
    let w1 = c.open_window();
    let a = new_tab(&mut c, w1);
    let b = new_tab(&mut c, w1);
    let mut rx = c.subscribe();

    c.set_active(b, true);

    assert!(c.is_active(b));
    assert!(!c.is_active(a));
    assert!(c.host().is_visible(b));
    assert!(drain(&mut rx).contains(&TabEvent::Activated {
        surface: b,
        window: w1
    }));

    c.set_active(b, false);
    assert!(!c.host().is_visible(b));
}

/// Test that a discarded tab is selected without being shown
#[test]
fn test_discarded_tab_stays_hidden() {
    let mut c = controller();
    let w1 = c.open_window();
    let a = new_tab(&mut c, w1);

    assert!(c.discard(a));
    c.set_active(a, true);

    assert!(c.is_discarded(a));
    assert!(c.is_active(a));
    assert!(!c.host().is_visible(a));
}

/// Test tab lookup by session id, optionally scoped to a partition
#[test]
fn test_tab_by_id_in_partition() {
    let mut c = controller();
    let w1 = c.open_window();
    let a = new_tab(&mut c, w1);
    let tab_id = c.tab_id(a).unwrap();

    assert_eq!(c.tab_by_id(tab_id), Some(a));
    assert_eq!(
        c.tab_by_id_in(tab_id, &Partition::persistent("default")),
        Some(a)
    );
    assert_eq!(c.tab_by_id_in(tab_id, &Partition::temporary("default")), None);
}

/// Test that snapshots merge extra values without overriding core fields
#[test]
fn test_snapshot_with_extra_values() {
    let mut c = controller();
    let w1 = c.open_window();
    let url = Url::parse("https://start.test/").unwrap();
    let a = c
        .create_tab(
            None,
            Some(w1),
            CreationOptions::default().with_url(url).active(true),
        )
        .unwrap();
    let mut values = serde_json::Map::new();
    values.insert("index".to_string(), serde_json::Value::from(9));
    values.insert("openerTabId".to_string(), serde_json::Value::from(3));

    assert!(c.set_tab_values(a, values));
    let snapshot = c.snapshot(a).unwrap();

    assert_eq!(snapshot.window(), Some(w1));
    assert_eq!(snapshot.slot(), Some(0));
    assert!(snapshot.active);
    assert_eq!(snapshot.url, "https://start.test/");
    assert_eq!(snapshot.values.get("openerTabId"), Some(&serde_json::Value::from(3)));
    assert!(!snapshot.values.contains_key("index"));
}
