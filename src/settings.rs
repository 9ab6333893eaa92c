use serde::{Deserialize, Serialize};

/// Tuning knobs for the interpreter. Every field has a default so a partial
/// settings file keeps working across releases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Server-side multiplier applied to incoming move deltas.
    #[serde(default = "default_move_multiplier")]
    pub move_multiplier: f64,
    /// Server-side multiplier applied to incoming fractional scroll values.
    #[serde(default = "default_scroll_multiplier")]
    pub scroll_multiplier: f64,
    /// Baseline motion multiplier applied regardless of speed.
    #[serde(default = "default_base_speed_scale")]
    pub base_speed_scale: f64,
    /// Exponent of the acceleration curve; values > 1 increase acceleration.
    #[serde(default = "default_accel_exponent")]
    pub accel_exponent: f64,
    /// Scales the measured speed before the exponent is applied.
    #[serde(default = "default_acceleration_factor")]
    pub acceleration_factor: f64,
    /// Maximum acceleration multiplier, to avoid runaway motion.
    #[serde(default = "default_accel_cap")]
    pub accel_cap: f64,
    /// Accumulated fractional motion above this forces a one-pixel step.
    #[serde(default = "default_min_frac_to_step")]
    pub min_move_frac_to_step: f64,
    /// Accumulated fractional scroll above this forces a one-step wheel turn.
    #[serde(default = "default_min_frac_to_step")]
    pub min_scroll_frac_to_step: f64,
    /// Speed multiplier for two-finger scroll acceleration.
    #[serde(default = "default_scroll_accel_factor")]
    pub scroll_accel_factor: f64,
    /// Cap on the measured two-finger speed before amplification.
    #[serde(default = "default_scroll_accel_cap")]
    pub scroll_accel_cap: f64,
    /// Maximum down-to-up duration for a touch to count as a tap.
    #[serde(default = "default_tap_timeout_ms")]
    pub tap_timeout_ms: u64,
    /// Maximum travel for a touch to count as a tap, in client pixels.
    #[serde(default = "default_tap_move_threshold")]
    pub tap_move_threshold: f64,
    /// Maximum interval between the taps of a double tap.
    #[serde(default = "default_double_tap_max_interval_ms")]
    pub double_tap_max_interval_ms: u64,
    /// How long the second tap must be held before it becomes a drag.
    #[serde(default = "default_double_tap_hold_trigger_ms")]
    pub double_tap_hold_trigger_ms: u64,
    /// A held button not released by the client within this window is
    /// force-released to avoid a stuck mouse state.
    #[serde(default = "default_hold_timeout_ms")]
    pub hold_timeout_ms: u64,
    /// Watchdog sweep interval.
    #[serde(default = "default_watchdog_interval_ms")]
    pub watchdog_interval_ms: u64,
    /// Mean vertical travel required to fire a three-finger swipe.
    #[serde(default = "default_three_finger_threshold")]
    pub three_finger_threshold: f64,
    /// Move events are discarded for this long after a right-click, so drift
    /// does not immediately close the context menu.
    #[serde(default = "default_suppress_after_right_click_ms")]
    pub suppress_after_right_click_ms: u64,
    /// When enabled the logger is initialised at debug level.
    #[serde(default)]
    pub debug_logging: bool,
}

fn default_move_multiplier() -> f64 {
    0.1
}

fn default_scroll_multiplier() -> f64 {
    2.0
}

fn default_base_speed_scale() -> f64 {
    0.2
}

fn default_accel_exponent() -> f64 {
    1.1
}

fn default_acceleration_factor() -> f64 {
    0.2
}

fn default_accel_cap() -> f64 {
    40.0
}

fn default_min_frac_to_step() -> f64 {
    0.05
}

fn default_scroll_accel_factor() -> f64 {
    2.0
}

fn default_scroll_accel_cap() -> f64 {
    2000.0
}

fn default_tap_timeout_ms() -> u64 {
    200
}

fn default_tap_move_threshold() -> f64 {
    4.0
}

fn default_double_tap_max_interval_ms() -> u64 {
    200
}

fn default_double_tap_hold_trigger_ms() -> u64 {
    200
}

fn default_hold_timeout_ms() -> u64 {
    3000
}

fn default_watchdog_interval_ms() -> u64 {
    500
}

fn default_three_finger_threshold() -> f64 {
    12.0
}

fn default_suppress_after_right_click_ms() -> u64 {
    300
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            move_multiplier: default_move_multiplier(),
            scroll_multiplier: default_scroll_multiplier(),
            base_speed_scale: default_base_speed_scale(),
            accel_exponent: default_accel_exponent(),
            acceleration_factor: default_acceleration_factor(),
            accel_cap: default_accel_cap(),
            min_move_frac_to_step: default_min_frac_to_step(),
            min_scroll_frac_to_step: default_min_frac_to_step(),
            scroll_accel_factor: default_scroll_accel_factor(),
            scroll_accel_cap: default_scroll_accel_cap(),
            tap_timeout_ms: default_tap_timeout_ms(),
            tap_move_threshold: default_tap_move_threshold(),
            double_tap_max_interval_ms: default_double_tap_max_interval_ms(),
            double_tap_hold_trigger_ms: default_double_tap_hold_trigger_ms(),
            hold_timeout_ms: default_hold_timeout_ms(),
            watchdog_interval_ms: default_watchdog_interval_ms(),
            three_finger_threshold: default_three_finger_threshold(),
            suppress_after_right_click_ms: default_suppress_after_right_click_ms(),
            debug_logging: false,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
