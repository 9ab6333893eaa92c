use crate::clock::Clock;
use crate::injector::{Button, Injector};
use crate::session::SessionStore;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Debug)]
struct WorkerHandle {
    stop_tx: Sender<()>,
    join: JoinHandle<()>,
}

/// Periodic background task that force-releases any button left pressed
/// beyond the hold timeout, recovering from connections that vanished without
/// sending a release. Redundant with the classifier's own stale-hold check on
/// move events; both are idempotent no-ops when there is nothing to release.
pub struct HoldWatchdog {
    store: Arc<SessionStore>,
    injector: Arc<dyn Injector>,
    clock: Arc<dyn Clock>,
    timeout_ms: u64,
    interval: Duration,
    worker: Option<WorkerHandle>,
}

impl HoldWatchdog {
    pub fn new(
        store: Arc<SessionStore>,
        injector: Arc<dyn Injector>,
        clock: Arc<dyn Clock>,
        timeout_ms: u64,
        interval_ms: u64,
    ) -> Self {
        Self {
            store,
            injector,
            clock,
            timeout_ms,
            interval: Duration::from_millis(interval_ms.max(1)),
            worker: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    pub fn start(&mut self) {
        if self.worker.is_some() {
            return;
        }

        let (stop_tx, stop_rx) = mpsc::channel();
        let store = Arc::clone(&self.store);
        let injector = Arc::clone(&self.injector);
        let clock = Arc::clone(&self.clock);
        let timeout_ms = self.timeout_ms;
        let interval = self.interval;
        let join = thread::spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }
            release_stale_holds(&store, injector.as_ref(), clock.as_ref(), timeout_ms);
        });
        self.worker = Some(WorkerHandle { stop_tx, join });
    }

    pub fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop_tx.send(());
            let _ = worker.join.join();
        }
    }
}

impl Drop for HoldWatchdog {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One sweep over every session: holds older than `timeout_ms` are released
/// and their session fields cleared. Safe to call when nothing is held.
pub fn release_stale_holds(
    store: &SessionStore,
    injector: &dyn Injector,
    clock: &dyn Clock,
    timeout_ms: u64,
) {
    let now = clock.now_ms();
    store.for_each(|key, session| {
        if session.double_tap_hold_active
            && session.last_mouse_down_time != 0
            && now.saturating_sub(session.last_mouse_down_time) > timeout_ms
        {
            if let Err(err) = injector.release(Button::Left) {
                tracing::warn!(?err, key, "watchdog failed to release stale hold");
            }
            session.clear_hold();
            tracing::debug!(key, "watchdog released stale hold");
        }
    });
}
