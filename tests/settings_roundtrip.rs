use remotepad::settings::Settings;

#[test]
fn defaults_cover_every_knob() {
    let settings = Settings::default();
    assert_eq!(settings.move_multiplier, 0.1);
    assert_eq!(settings.scroll_multiplier, 2.0);
    assert_eq!(settings.accel_cap, 40.0);
    assert_eq!(settings.min_move_frac_to_step, 0.05);
    assert_eq!(settings.min_scroll_frac_to_step, 0.05);
    assert_eq!(settings.tap_timeout_ms, 200);
    assert_eq!(settings.tap_move_threshold, 4.0);
    assert_eq!(settings.hold_timeout_ms, 3000);
    assert_eq!(settings.watchdog_interval_ms, 500);
    assert_eq!(settings.three_finger_threshold, 12.0);
    assert!(!settings.debug_logging);
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let settings = Settings::load(path.to_str().unwrap()).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn partial_file_keeps_defaults_for_absent_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{"move_multiplier": 0.25, "hold_timeout_ms": 1000}"#).unwrap();

    let settings = Settings::load(path.to_str().unwrap()).unwrap();
    assert_eq!(settings.move_multiplier, 0.25);
    assert_eq!(settings.hold_timeout_ms, 1000);
    assert_eq!(settings.scroll_multiplier, 2.0);
    assert_eq!(settings.tap_timeout_ms, 200);
}

#[test]
fn save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let mut settings = Settings::default();
    settings.three_finger_threshold = 20.0;
    settings.debug_logging = true;
    settings.save(path.to_str().unwrap()).unwrap();

    let loaded = Settings::load(path.to_str().unwrap()).unwrap();
    assert_eq!(loaded, settings);
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(Settings::load(path.to_str().unwrap()).is_err());
}
