use remotepad::clock::MockClock;
use remotepad::events::TouchEvent;
use remotepad::geometry::ScreenBounds;
use remotepad::injector::{Button, InjectorCall, MockInjector};
use remotepad::settings::Settings;
use remotepad::{watchdog, TrackpadCore};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn core_with_settings(settings: Settings) -> (TrackpadCore, Arc<MockInjector>, Arc<MockClock>) {
    let injector = Arc::new(MockInjector::default());
    let clock = Arc::new(MockClock::at(10_000));
    let core = TrackpadCore::with_backends(
        settings,
        injector.clone(),
        clock.clone(),
        ScreenBounds::new(0, 0, 1920, 1080),
    );
    (core, injector, clock)
}

fn core_with_mocks() -> (TrackpadCore, Arc<MockInjector>, Arc<MockClock>) {
    core_with_settings(Settings::default())
}

fn releases(injector: &MockInjector) -> usize {
    injector.count(|c| matches!(c, InjectorCall::Release(Button::Left)))
}

#[test]
fn sweep_releases_only_stale_holds() {
    let (core, injector, clock) = core_with_mocks();
    let timeout = core.settings().hold_timeout_ms;

    core.mouse_down("stale");
    clock.advance(timeout / 2);
    core.mouse_down("fresh");

    // Neither hold is old enough yet.
    clock.advance(timeout / 2);
    watchdog::release_stale_holds(core.store(), injector.as_ref(), clock.as_ref(), timeout);
    assert_eq!(releases(&injector), 0);

    // Now only the first one has crossed the timeout.
    clock.advance(timeout / 4);
    watchdog::release_stale_holds(core.store(), injector.as_ref(), clock.as_ref(), timeout);
    assert_eq!(releases(&injector), 1);
    assert!(core.store().with_session("fresh", |s| s.double_tap_hold_active));
    assert!(!core.store().with_session("stale", |s| s.double_tap_hold_active));

    // A second sweep finds nothing left to do for the released session.
    watchdog::release_stale_holds(core.store(), injector.as_ref(), clock.as_ref(), timeout);
    assert_eq!(releases(&injector), 1);
}

#[test]
fn watchdog_thread_releases_within_its_interval() {
    let settings = Settings {
        hold_timeout_ms: 50,
        watchdog_interval_ms: 20,
        ..Settings::default()
    };
    let (core, injector, clock) = core_with_settings(settings);
    remotepad::logging::init(false);

    core.mouse_down("a");
    core.start_watchdog();
    assert!(core.watchdog_running());

    clock.advance(100);
    // A few intervals are more than enough for one sweep to run.
    thread::sleep(Duration::from_millis(120));

    core.stop_watchdog();
    assert!(!core.watchdog_running());
    assert_eq!(releases(&injector), 1);
    assert!(!core.store().with_session("a", |s| s.double_tap_hold_active));
}

#[test]
fn starting_the_watchdog_twice_is_harmless() {
    let (core, _injector, _clock) = core_with_mocks();
    core.start_watchdog();
    core.start_watchdog();
    assert!(core.watchdog_running());
    core.stop_watchdog();
    core.stop_watchdog();
    assert!(!core.watchdog_running());
}

#[test]
fn disconnect_releases_an_active_hold() {
    let (core, injector, _clock) = core_with_mocks();

    core.mouse_down("a");
    assert_eq!(
        injector.count(|c| matches!(c, InjectorCall::Press(Button::Left))),
        1
    );

    core.disconnect("a");
    assert_eq!(releases(&injector), 1);
    assert!(!core.store().with_session("a", |s| s.double_tap_hold_active));
    assert_eq!(core.store().active_touches("a"), 0);
}

#[test]
fn disconnect_without_hold_releases_nothing() {
    let (core, injector, _clock) = core_with_mocks();
    core.connect("a");
    core.disconnect("a");
    assert_eq!(releases(&injector), 0);
}

#[test]
fn stale_hold_recovers_on_the_next_gesture() {
    let (core, injector, clock) = core_with_mocks();
    let timeout = core.settings().hold_timeout_ms;

    core.mouse_down("a");
    clock.advance(timeout + 1);

    // The client comes back with a plain move gesture; the dead hold is
    // released before the gesture is interpreted.
    core.handle_touch("a", &TouchEvent::down(1, 100.0, 100.0));
    clock.advance(16);
    core.handle_touch("a", &TouchEvent::moved(1, 110.0, 100.0));

    assert_eq!(releases(&injector), 1);
    assert!(!core.store().with_session("a", |s| s.double_tap_hold_active));
}

#[test]
fn release_all_holds_clears_every_session() {
    let (core, injector, _clock) = core_with_mocks();

    core.mouse_down("a");
    core.mouse_down("b");
    core.store()
        .with_session("b", |s| s.pending_double_tap = true);

    core.release_all_holds();

    // One OS-level release covers all sessions; the button is a shared
    // resource.
    assert_eq!(releases(&injector), 1);
    assert!(!core.store().with_session("a", |s| s.double_tap_hold_active));
    assert!(!core.store().with_session("b", |s| s.double_tap_hold_active));
    assert!(!core.store().with_session("b", |s| s.pending_double_tap));
}

#[test]
fn mouse_up_clears_the_hold_bookkeeping() {
    let (core, injector, _clock) = core_with_mocks();

    core.mouse_down("a");
    assert!(core.store().with_session("a", |s| s.double_tap_hold_active));

    core.mouse_up("a");
    assert_eq!(releases(&injector), 1);
    assert!(!core.store().with_session("a", |s| s.double_tap_hold_active));
    assert_eq!(core.store().with_session("a", |s| s.last_mouse_down_time), 0);
}
