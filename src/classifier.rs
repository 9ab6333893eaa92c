use crate::clock::Clock;
use crate::commands;
use crate::events::{TouchEvent, TouchPhase};
use crate::injector::{Axis, Button, Injector};
use crate::motion::MotionTracker;
use crate::scroll::ScrollTracker;
use crate::session::{Session, TouchRecord};
use crate::settings::Settings;
use std::sync::Arc;

/// The touch state machine. Consumes down/move/up events per touch id within
/// a session and decides which of single-finger move, two-finger scroll,
/// three-finger swipe, tap, double-tap or hold-drag applies, driving the
/// motion/scroll trackers and the injector accordingly.
///
/// State is carried per touch (`down -> (moving)* -> up`) and per session
/// (tap chaining, hold flags, three-finger latches). The caller serializes
/// events for one session by holding the session store lock across each call.
pub struct Classifier {
    settings: Arc<Settings>,
    clock: Arc<dyn Clock>,
    injector: Arc<dyn Injector>,
    motion: Arc<MotionTracker>,
    scroll: Arc<ScrollTracker>,
}

impl Classifier {
    pub fn new(
        settings: Arc<Settings>,
        clock: Arc<dyn Clock>,
        injector: Arc<dyn Injector>,
        motion: Arc<MotionTracker>,
        scroll: Arc<ScrollTracker>,
    ) -> Self {
        Self {
            settings,
            clock,
            injector,
            motion,
            scroll,
        }
    }

    pub fn process(&self, session: &mut Session, event: &TouchEvent) {
        match event.phase {
            TouchPhase::Down => self.on_down(session, event.id, event.x, event.y),
            TouchPhase::Move => self.on_move(session, event.id, event.x, event.y),
            TouchPhase::Up => self.on_up(session, event.id),
        }
    }

    /// Pre-batched events are processed in array order with semantics
    /// identical to individually dispatched events.
    pub fn process_batch(&self, session: &mut Session, events: &[TouchEvent]) {
        for event in events {
            self.process(session, event);
        }
    }

    pub fn on_down(&self, session: &mut Session, id: u64, x: f64, y: f64) {
        let now = self.clock.now_ms();
        tracing::trace!(id, x, y, "touch down");

        // A stale pending double-tap marker arms nothing.
        if session.pending_double_tap
            && now.saturating_sub(session.last_tap_time) > self.settings.double_tap_max_interval_ms
        {
            session.pending_double_tap = false;
        }

        // A down quickly after the last tap is the second tap of a
        // double-tap-and-hold: wait for the hold trigger before pressing.
        if session.pending_double_tap
            && now.saturating_sub(session.last_tap_time) <= self.settings.double_tap_max_interval_ms
        {
            session.pending_double_tap = false;
            session.double_tap_expect_hold = true;
            session.double_tap_down_time = now;
        }

        session.touches.insert(id, TouchRecord::at(x, y, now));
        let count = session.touches.len();
        if let Some(touch) = session.touches.get_mut(&id) {
            touch.touch_count_at_down = count;
        }
    }

    pub fn on_move(&self, session: &mut Session, id: u64, x: f64, y: f64) {
        let now = self.clock.now_ms();

        let mut dx = 0.0;
        let mut dy = 0.0;
        if let Some(touch) = session.touches.get_mut(&id) {
            dx = x - touch.last_x;
            dy = y - touch.last_y;
            let dist = dx.hypot(dy);
            touch.last_x = x;
            touch.last_y = y;
            touch.total_distance += dist;
            touch.last_delta_x = dx;
            touch.last_delta_y = dy;
            if touch.total_distance > self.settings.tap_move_threshold {
                touch.has_moved = true;
            }
        }

        // Stale-hold recovery: a move can arrive before the watchdog tick.
        if session.double_tap_hold_active
            && session.last_mouse_down_time != 0
            && now.saturating_sub(session.last_mouse_down_time) > self.settings.hold_timeout_ms
        {
            self.release_hold(session);
        }

        // Hold-arm: the second tap stayed down past the trigger, so the drag
        // starts here. Subsequent moves flow through the single-finger path.
        if session.double_tap_expect_hold
            && session.double_tap_down_time != 0
            && now.saturating_sub(session.double_tap_down_time)
                >= self.settings.double_tap_hold_trigger_ms
        {
            if let Err(err) = self.injector.press(Button::Left) {
                tracing::warn!(?err, "failed to press button for hold");
            }
            session.double_tap_hold_active = true;
            session.last_mouse_down_time = now;
            session.double_tap_expect_hold = false;
        }

        if session.suppress_move_until > now {
            if let Some(touch) = session.touches.get_mut(&id) {
                touch.last_delta_x = 0.0;
                touch.last_delta_y = 0.0;
            }
            return;
        }

        match session.touches.len() {
            1 => self.motion.apply_delta(dx, dy),
            2 => self.two_finger_scroll(session),
            3 => self.three_finger_swipe(session),
            // Four and more fingers are reserved.
            _ => {}
        }
    }

    pub fn on_up(&self, session: &mut Session, id: u64) {
        let now = self.clock.now_ms();
        tracing::trace!(id, "touch up");

        let tap = session.touches.get(&id).map(|touch| {
            (
                now.saturating_sub(touch.start_time),
                touch.has_moved,
                touch.total_distance,
                touch.touch_count_at_down,
            )
        });
        if let Some((duration, has_moved, total_distance, count_at_down)) = tap {
            let is_tap = (!has_moved || total_distance <= self.settings.tap_move_threshold)
                && duration <= self.settings.tap_timeout_ms;
            if is_tap {
                // Second tap released before the hold fired: double-click,
                // and the whole chain resets.
                if session.double_tap_expect_hold {
                    if let Err(err) = self.injector.double_click() {
                        tracing::warn!(?err, "failed to double-click");
                    }
                    session.double_tap_expect_hold = false;
                    session.pending_double_tap = false;
                    session.last_tap_time = 0;
                    session.touches.remove(&id);
                    return;
                }

                // Click type is decided by how many fingers were down when
                // this touch started.
                match count_at_down {
                    1 => {
                        if let Err(err) = self.injector.click(Button::Left) {
                            tracing::warn!(?err, "failed to click");
                        }
                        session.last_tap_time = now;
                        session.pending_double_tap = true;
                    }
                    2 => {
                        if let Err(err) = self.injector.click(Button::Right) {
                            tracing::warn!(?err, "failed to right-click");
                        }
                        session.suppress_move_until =
                            now + self.settings.suppress_after_right_click_ms;
                    }
                    _ => {
                        if let Err(err) = self.injector.click(Button::Middle) {
                            tracing::warn!(?err, "failed to middle-click");
                        }
                    }
                }
            }
        }

        session.touches.remove(&id);
        if session.touches.len() < 3 {
            session.reset_three_finger();
        }
        if session.double_tap_hold_active && session.touches.is_empty() {
            self.release_hold(session);
        }
    }

    /// Averages the pending vertical delta across both touches and feeds it,
    /// speed-amplified, to the vertical scroll axis. Each move's delta is
    /// consumed exactly once.
    fn two_finger_scroll(&self, session: &mut Session) {
        let count = session.touches.len();
        if count == 0 {
            return;
        }
        let mut total_delta = 0.0;
        let mut speed_acc = 0.0;
        for touch in session.touches.values() {
            total_delta += touch.last_delta_y;
            speed_acc += touch.last_delta_y.abs();
        }
        let avg_dy = total_delta / count as f64;
        let speed = speed_acc / count as f64;
        let accel =
            1.0 + speed.min(self.settings.scroll_accel_cap) * self.settings.scroll_accel_factor;

        // The tracker applies the scroll multiplier; dragging down scrolls
        // the wheel down.
        self.scroll.apply_scroll(Axis::Vertical, -avg_dy * accel);

        for touch in session.touches.values_mut() {
            touch.last_delta_y = 0.0;
        }
    }

    /// Accumulates the mean vertical displacement of a three-finger contact
    /// and fires each task-switch command at most once per contact.
    fn three_finger_swipe(&self, session: &mut Session) {
        let count = session.touches.len();
        if count == 0 {
            return;
        }
        let sum: f64 = session
            .touches
            .values()
            .map(|touch| touch.last_y - touch.start_y)
            .sum();
        session.three_finger_accum_y += -(sum / count as f64);

        if !session.three_finger_triggered_up
            && session.three_finger_accum_y >= self.settings.three_finger_threshold
        {
            session.three_finger_triggered_up = true;
            commands::task_switch_forward(self.injector.as_ref());
        }
        if !session.three_finger_triggered_down
            && session.three_finger_accum_y <= -self.settings.three_finger_threshold
        {
            session.three_finger_triggered_down = true;
            commands::task_switch_exit(self.injector.as_ref());
        }
    }

    fn release_hold(&self, session: &mut Session) {
        if let Err(err) = self.injector.release(Button::Left) {
            tracing::warn!(?err, "failed to release held button");
        }
        session.clear_hold();
    }
}
