use remotepad::clock::MockClock;
use remotepad::events::TouchEvent;
use remotepad::geometry::ScreenBounds;
use remotepad::injector::{Button, InjectorCall, MockInjector};
use remotepad::settings::Settings;
use remotepad::TrackpadCore;
use std::sync::Arc;

fn core_with_mocks() -> (TrackpadCore, Arc<MockInjector>, Arc<MockClock>) {
    let injector = Arc::new(MockInjector::default());
    let clock = Arc::new(MockClock::at(10_000));
    let core = TrackpadCore::with_backends(
        Settings::default(),
        injector.clone(),
        clock.clone(),
        ScreenBounds::new(0, 0, 1920, 1080),
    );
    (core, injector, clock)
}

#[test]
fn single_finger_tap_clicks_left() {
    let (core, injector, clock) = core_with_mocks();

    core.handle_touch("a", &TouchEvent::down(1, 100.0, 100.0));
    clock.advance(50);
    core.handle_touch("a", &TouchEvent::up(1, 100.0, 100.0));

    assert_eq!(
        injector.count(|c| matches!(c, InjectorCall::Click(Button::Left))),
        1
    );
    assert_eq!(injector.count(|c| matches!(c, InjectorCall::Click(_))), 1);
}

#[test]
fn two_finger_tap_right_clicks() {
    let (core, injector, clock) = core_with_mocks();

    core.handle_touch("a", &TouchEvent::down(1, 100.0, 100.0));
    // The anchoring finger stays down long enough that its own release no
    // longer qualifies as a tap.
    clock.advance(300);
    core.handle_touch("a", &TouchEvent::down(2, 120.0, 100.0));
    clock.advance(50);
    core.handle_touch("a", &TouchEvent::up(2, 120.0, 100.0));
    clock.advance(200);
    core.handle_touch("a", &TouchEvent::up(1, 100.0, 100.0));

    assert_eq!(
        injector.count(|c| matches!(c, InjectorCall::Click(Button::Right))),
        1
    );
    assert_eq!(injector.count(|c| matches!(c, InjectorCall::Click(_))), 1);
}

#[test]
fn three_finger_tap_middle_clicks() {
    let (core, injector, clock) = core_with_mocks();

    core.handle_touch("a", &TouchEvent::down(1, 100.0, 100.0));
    clock.advance(300);
    core.handle_touch("a", &TouchEvent::down(2, 120.0, 100.0));
    clock.advance(300);
    core.handle_touch("a", &TouchEvent::down(3, 140.0, 100.0));
    clock.advance(50);
    core.handle_touch("a", &TouchEvent::up(3, 140.0, 100.0));
    clock.advance(250);
    core.handle_touch("a", &TouchEvent::up(2, 120.0, 100.0));
    core.handle_touch("a", &TouchEvent::up(1, 100.0, 100.0));

    assert_eq!(
        injector.count(|c| matches!(c, InjectorCall::Click(Button::Middle))),
        1
    );
    assert_eq!(injector.count(|c| matches!(c, InjectorCall::Click(_))), 1);
}

#[test]
fn slow_touch_is_not_a_tap() {
    let (core, injector, clock) = core_with_mocks();

    core.handle_touch("a", &TouchEvent::down(1, 100.0, 100.0));
    clock.advance(500);
    core.handle_touch("a", &TouchEvent::up(1, 100.0, 100.0));

    assert_eq!(injector.count(|c| matches!(c, InjectorCall::Click(_))), 0);
}

#[test]
fn travelled_touch_is_not_a_tap() {
    let (core, injector, clock) = core_with_mocks();

    core.handle_touch("a", &TouchEvent::down(1, 100.0, 100.0));
    clock.advance(30);
    core.handle_touch("a", &TouchEvent::moved(1, 110.0, 100.0));
    clock.advance(30);
    core.handle_touch("a", &TouchEvent::up(1, 110.0, 100.0));

    assert_eq!(injector.count(|c| matches!(c, InjectorCall::Click(_))), 0);
    assert_eq!(
        injector.count(|c| matches!(c, InjectorCall::DoubleClick)),
        0
    );
}

#[test]
fn right_click_suppresses_following_moves() {
    let (core, injector, clock) = core_with_mocks();
    injector.set_position(500, 500);

    core.handle_touch("a", &TouchEvent::down(1, 100.0, 100.0));
    clock.advance(300);
    core.handle_touch("a", &TouchEvent::down(2, 120.0, 100.0));
    clock.advance(50);
    core.handle_touch("a", &TouchEvent::up(2, 120.0, 100.0));
    assert_eq!(
        injector.count(|c| matches!(c, InjectorCall::Click(Button::Right))),
        1
    );

    // Drift inside the suppression window is discarded.
    clock.advance(100);
    core.handle_touch("a", &TouchEvent::moved(1, 150.0, 100.0));
    assert_eq!(injector.count(|c| matches!(c, InjectorCall::MoveAbs(_, _))), 0);

    // Once the window passes the finger moves the pointer again.
    clock.advance(300);
    core.handle_touch("a", &TouchEvent::moved(1, 200.0, 100.0));
    assert!(injector.count(|c| matches!(c, InjectorCall::MoveAbs(_, _))) > 0);
}
