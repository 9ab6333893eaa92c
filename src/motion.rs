use crate::clock::Clock;
use crate::geometry::ScreenBounds;
use crate::injector::Injector;
use crate::settings::Settings;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct MotionState {
    accum_x: f64,
    accum_y: f64,
    last_sample_ms: Option<u64>,
}

/// Converts raw per-event pointer deltas into accelerated, integer-pixel
/// moves. Fractional remainders carry forward so tiny client movements still
/// add up to eventual motion. Shared by every session.
pub struct MotionTracker {
    settings: Arc<Settings>,
    injector: Arc<dyn Injector>,
    clock: Arc<dyn Clock>,
    bounds: ScreenBounds,
    state: Mutex<MotionState>,
}

impl MotionTracker {
    pub fn new(
        settings: Arc<Settings>,
        injector: Arc<dyn Injector>,
        clock: Arc<dyn Clock>,
        bounds: ScreenBounds,
    ) -> Self {
        Self {
            settings,
            injector,
            clock,
            bounds,
            state: Mutex::new(MotionState::default()),
        }
    }

    /// Applies a raw client-pixel delta, emitting at most one absolute move.
    /// Injector failures are logged and swallowed; the interpreter keeps
    /// processing subsequent events.
    pub fn apply_delta(&self, delta_x: f64, delta_y: f64) {
        let now = self.clock.now_ms();

        let dx_raw = delta_x * self.settings.move_multiplier;
        let dy_raw = delta_y * self.settings.move_multiplier;

        let (dx_apply, dy_apply) = {
            let mut state = match self.state.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };

            // 16 ms stands in for the first sample's elapsed time.
            let dt_ms = match state.last_sample_ms {
                Some(last) => now.saturating_sub(last).max(1),
                None => 16,
            };
            state.last_sample_ms = Some(now);

            let speed = dx_raw.hypot(dy_raw) / (dt_ms as f64 / 1000.0);
            // Fast path for speed == 0 avoids a wasted powf.
            let accel_mult = if speed > 0.0 {
                (self.settings.base_speed_scale
                    + (self.settings.acceleration_factor * speed).powf(self.settings.accel_exponent))
                .min(self.settings.accel_cap)
            } else {
                self.settings.base_speed_scale
            };

            state.accum_x += dx_raw * accel_mult;
            state.accum_y += dy_raw * accel_mult;

            // Round to nearest to reduce bias for small fractions.
            let mut dx_apply = state.accum_x.round() as i32;
            let mut dy_apply = state.accum_y.round() as i32;

            // Minimal one-pixel step once fractional accumulation passes the
            // threshold, so small gestures are never silently dropped.
            if dx_apply == 0 && state.accum_x.abs() >= self.settings.min_move_frac_to_step {
                dx_apply = state.accum_x.signum() as i32;
            }
            if dy_apply == 0 && state.accum_y.abs() >= self.settings.min_move_frac_to_step {
                dy_apply = state.accum_y.signum() as i32;
            }

            if dx_apply != 0 {
                state.accum_x -= f64::from(dx_apply);
            }
            if dy_apply != 0 {
                state.accum_y -= f64::from(dy_apply);
            }

            (dx_apply, dy_apply)
        };

        if dx_apply == 0 && dy_apply == 0 {
            return;
        }

        let (cx, cy) = match self.injector.position() {
            Ok(pos) => pos,
            Err(err) => {
                tracing::warn!(?err, "failed to read pointer position");
                return;
            }
        };
        let (nx, ny) = self.bounds.clamp(cx + dx_apply, cy + dy_apply);
        if let Err(err) = self.injector.move_abs(nx, ny) {
            tracing::warn!(?err, "failed to move pointer");
        }
    }
}
