use crate::classifier::Classifier;
use crate::clock::{Clock, SystemClock};
use crate::commands;
use crate::events::{KeyInput, TouchEvent};
use crate::geometry::{self, ScreenBounds};
use crate::injector::{Axis, Button, EnigoInjector, Injector};
use crate::motion::MotionTracker;
use crate::scroll::ScrollTracker;
use crate::session::SessionStore;
use crate::settings::Settings;
use crate::watchdog::HoldWatchdog;
use std::sync::{Arc, Mutex};

/// The touch-to-intent interpreter. One instance per process; the transport
/// layer hands it raw touch events and direct commands together with a
/// connection key, and it drives the injector.
///
/// The motion and scroll accumulators are owned here, shared across all
/// sessions; per-session gesture state lives in the session store.
pub struct TrackpadCore {
    settings: Arc<Settings>,
    injector: Arc<dyn Injector>,
    clock: Arc<dyn Clock>,
    store: Arc<SessionStore>,
    classifier: Classifier,
    scroll: Arc<ScrollTracker>,
    watchdog: Mutex<HoldWatchdog>,
}

impl TrackpadCore {
    /// Core with the default backends: enigo injection, wall clock, detected
    /// screen bounds.
    pub fn new(settings: Settings) -> Self {
        Self::with_backends(
            settings,
            Arc::new(EnigoInjector::default()),
            Arc::new(SystemClock::default()),
            geometry::screen_bounds(),
        )
    }

    pub fn with_backends(
        settings: Settings,
        injector: Arc<dyn Injector>,
        clock: Arc<dyn Clock>,
        bounds: ScreenBounds,
    ) -> Self {
        let settings = Arc::new(settings);
        let store = Arc::new(SessionStore::new());
        let motion = Arc::new(MotionTracker::new(
            Arc::clone(&settings),
            Arc::clone(&injector),
            Arc::clone(&clock),
            bounds,
        ));
        let scroll = Arc::new(ScrollTracker::new(
            Arc::clone(&settings),
            Arc::clone(&injector),
        ));
        let classifier = Classifier::new(
            Arc::clone(&settings),
            Arc::clone(&clock),
            Arc::clone(&injector),
            motion,
            Arc::clone(&scroll),
        );
        let watchdog = Mutex::new(HoldWatchdog::new(
            Arc::clone(&store),
            Arc::clone(&injector),
            Arc::clone(&clock),
            settings.hold_timeout_ms,
            settings.watchdog_interval_ms,
        ));
        Self {
            settings,
            injector,
            clock,
            store,
            classifier,
            scroll,
            watchdog,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    // Connection lifecycle -------------------------------------------------

    pub fn connect(&self, key: &str) {
        self.store.with_session(key, |_| {});
        tracing::debug!(key, "session connected");
    }

    /// Resets the session synchronously: an active hold is released before
    /// any state is cleared, so no stuck button survives a disconnect.
    pub fn disconnect(&self, key: &str) {
        self.store.with_session(key, |session| {
            if session.double_tap_hold_active {
                if let Err(err) = self.injector.release(Button::Left) {
                    tracing::warn!(?err, key, "failed to release hold on disconnect");
                }
            }
            session.reset();
        });
        tracing::debug!(key, "session disconnected");
    }

    // Raw touch events -----------------------------------------------------

    pub fn handle_touch(&self, key: &str, event: &TouchEvent) {
        self.store
            .with_session(key, |session| self.classifier.process(session, event));
    }

    /// Batched events are processed in array order, equivalent to dispatching
    /// them one by one.
    pub fn handle_batch(&self, key: &str, events: &[TouchEvent]) {
        self.store
            .with_session(key, |session| self.classifier.process_batch(session, events));
    }

    // Direct (non-touch) commands ------------------------------------------

    pub fn click(&self, button: Button) {
        if let Err(err) = self.injector.click(button) {
            tracing::warn!(?err, "failed to click");
        }
    }

    pub fn scroll(&self, scroll_x: f64, scroll_y: f64) {
        if scroll_y != 0.0 {
            self.scroll.apply_scroll(Axis::Vertical, scroll_y);
        }
        if scroll_x != 0.0 {
            self.scroll.apply_scroll(Axis::Horizontal, scroll_x);
        }
    }

    /// Explicit press from the client. The session records the hold so the
    /// watchdog can recover it if the matching release never arrives.
    pub fn mouse_down(&self, key: &str) {
        if let Err(err) = self.injector.press(Button::Left) {
            tracing::warn!(?err, "failed to press button");
        }
        let now = self.clock.now_ms();
        self.store.with_session(key, |session| {
            session.double_tap_hold_active = true;
            session.last_mouse_down_time = now;
        });
    }

    pub fn mouse_up(&self, key: &str) {
        if let Err(err) = self.injector.release(Button::Left) {
            tracing::warn!(?err, "failed to release button");
        }
        self.store.with_session(key, |session| {
            session.clear_hold();
        });
    }

    pub fn key(&self, input: &KeyInput) {
        commands::dispatch_key(self.injector.as_ref(), input);
    }

    pub fn task_view(&self) {
        commands::task_switch_forward(self.injector.as_ref());
    }

    pub fn task_view_exit(&self) {
        commands::task_switch_exit(self.injector.as_ref());
    }

    /// Releases any OS-level hold and clears the hold and tap-chain flags of
    /// every session. Useful when the transport lost track of its clients.
    pub fn release_all_holds(&self) {
        if let Err(err) = self.injector.release(Button::Left) {
            tracing::warn!(?err, "failed to release button");
        }
        self.store.for_each(|_, session| {
            session.clear_hold();
            session.double_tap_expect_hold = false;
            session.pending_double_tap = false;
        });
    }

    // Watchdog -------------------------------------------------------------

    pub fn start_watchdog(&self) {
        if let Ok(mut watchdog) = self.watchdog.lock() {
            watchdog.start();
        }
    }

    pub fn stop_watchdog(&self) {
        if let Ok(mut watchdog) = self.watchdog.lock() {
            watchdog.stop();
        }
    }

    pub fn watchdog_running(&self) -> bool {
        self.watchdog.lock().map(|w| w.is_running()).unwrap_or(false)
    }
}
