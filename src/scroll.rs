use crate::injector::{Axis, Injector, Key};
use crate::settings::Settings;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct ScrollAccum {
    x: f64,
    y: f64,
}

/// Buffers fractional scroll amounts per axis so very small client deltas
/// still result in discrete wheel steps. Shared by every session; fed both by
/// direct scroll commands and by the two-finger gesture path.
pub struct ScrollTracker {
    settings: Arc<Settings>,
    injector: Arc<dyn Injector>,
    accum: Mutex<ScrollAccum>,
}

impl ScrollTracker {
    pub fn new(settings: Arc<Settings>, injector: Arc<dyn Injector>) -> Self {
        Self {
            settings,
            injector,
            accum: Mutex::new(ScrollAccum::default()),
        }
    }

    /// Multiplies `raw` by the scroll multiplier, accumulates it on `axis`
    /// and emits however many whole wheel steps are pending. A fractional
    /// balance past the minimum-step threshold forces a single ±1 step.
    pub fn apply_scroll(&self, axis: Axis, raw: f64) {
        if raw == 0.0 {
            return;
        }

        let mut accum = match self.accum.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let slot = match axis {
            Axis::Horizontal => &mut accum.x,
            Axis::Vertical => &mut accum.y,
        };
        *slot += raw * self.settings.scroll_multiplier;

        let mut steps = slot.trunc() as i32;
        if steps == 0 && slot.abs() >= self.settings.min_scroll_frac_to_step {
            steps = slot.signum() as i32;
        }
        if steps == 0 {
            return;
        }
        *slot -= f64::from(steps);
        drop(accum);

        self.emit(axis, steps);
    }

    fn emit(&self, axis: Axis, steps: i32) {
        match axis {
            Axis::Vertical => {
                if let Err(err) = self.injector.wheel(Axis::Vertical, steps) {
                    tracing::warn!(?err, "failed to scroll");
                }
            }
            Axis::Horizontal => self.emit_horizontal(steps),
        }
    }

    // Fallback chain: native horizontal wheel, then shift + vertical steps.
    fn emit_horizontal(&self, steps: i32) {
        match self.injector.wheel(Axis::Horizontal, steps) {
            Ok(()) => {}
            Err(err) => {
                tracing::debug!(?err, "native horizontal scroll unavailable; emulating");
                if let Err(err) = self.injector.key_down(Key::Shift) {
                    tracing::warn!(?err, "failed to emulate horizontal scroll");
                    return;
                }
                if let Err(err) = self.injector.wheel(Axis::Vertical, steps) {
                    tracing::warn!(?err, "failed to emulate horizontal scroll");
                }
                // Shift must come back up even when the wheel step failed.
                if let Err(err) = self.injector.key_up(Key::Shift) {
                    tracing::warn!(?err, "failed to release shift after scroll");
                }
            }
        }
    }
}
