use std::collections::HashMap;
use std::sync::Mutex;

/// Per-touch state. A record exists for an id exactly between its down and
/// the matching up.
#[derive(Debug, Clone, Default)]
pub struct TouchRecord {
    pub last_x: f64,
    pub last_y: f64,
    pub start_x: f64,
    pub start_y: f64,
    pub start_time: u64,
    pub has_moved: bool,
    pub total_distance: f64,
    /// Delta since the previous move event, zeroed once folded into a
    /// gesture so it is never re-applied.
    pub last_delta_x: f64,
    pub last_delta_y: f64,
    /// Touches active at the moment this one went down, counting itself.
    /// Decides the tap click type.
    pub touch_count_at_down: usize,
}

impl TouchRecord {
    pub fn at(x: f64, y: f64, now_ms: u64) -> Self {
        Self {
            last_x: x,
            last_y: y,
            start_x: x,
            start_y: y,
            start_time: now_ms,
            ..Default::default()
        }
    }
}

/// Gesture-relevant state for one client connection.
#[derive(Debug, Default)]
pub struct Session {
    pub touches: HashMap<u64, TouchRecord>,
    /// Accumulated vertical displacement while exactly three touches are
    /// active; reset together with the latches below whenever fewer remain.
    pub three_finger_accum_y: f64,
    pub three_finger_triggered_up: bool,
    pub three_finger_triggered_down: bool,
    /// True while a synthesized press-and-hold is in effect.
    pub double_tap_hold_active: bool,
    pub last_mouse_down_time: u64,
    /// Move events before this time are discarded, so drift right after a
    /// right-click cannot close the context menu.
    pub suppress_move_until: u64,
    pub last_tap_time: u64,
    pub pending_double_tap: bool,
    /// Set when a second tap's down arrived within the double-tap window;
    /// a hold-trigger duration later the press fires.
    pub double_tap_expect_hold: bool,
    pub double_tap_down_time: u64,
}

impl Session {
    pub fn reset_three_finger(&mut self) {
        self.three_finger_accum_y = 0.0;
        self.three_finger_triggered_up = false;
        self.three_finger_triggered_down = false;
    }

    pub fn clear_hold(&mut self) {
        self.double_tap_hold_active = false;
        self.last_mouse_down_time = 0;
    }

    /// Disconnect reset: drops every touch and latch. The caller must release
    /// any active hold via the injector before calling this.
    pub fn reset(&mut self) {
        self.touches.clear();
        self.reset_three_finger();
        self.clear_hold();
        self.suppress_move_until = 0;
        self.last_tap_time = 0;
        self.pending_double_tap = false;
        self.double_tap_expect_hold = false;
        self.double_tap_down_time = 0;
    }
}

/// Owns one mutable session per connection key. Created lazily on first
/// event; reset on disconnect; entries are never removed (stale resets are
/// harmless).
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with the session for `key`, creating it if absent. All
    /// session-field access goes through this lock, so concurrent events for
    /// the same connection are serialized.
    pub fn with_session<R>(&self, key: &str, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut sessions = match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(sessions.entry(key.to_string()).or_default())
    }

    /// Watchdog iteration over every session under the store lock.
    pub fn for_each(&self, mut f: impl FnMut(&str, &mut Session)) {
        let mut sessions = match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        for (key, session) in sessions.iter_mut() {
            f(key, session);
        }
    }

    pub fn active_touches(&self, key: &str) -> usize {
        self.with_session(key, |session| session.touches.len())
    }
}
