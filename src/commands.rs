use crate::events::KeyInput;
use crate::injector::{Injector, Key};

/// Task-switch-forward chord: Win+Tab opens Task View on Windows, Alt+Tab is
/// the closest equivalent elsewhere.
pub fn task_switch_forward(injector: &dyn Injector) {
    let chord: &[Key] = if cfg!(windows) {
        &[Key::Meta, Key::Tab]
    } else {
        &[Key::Alt, Key::Tab]
    };
    if let Err(err) = injector.press_chord(chord) {
        tracing::warn!(?err, "failed to send task-switch chord");
    }
}

/// Escape leaves Task View again.
pub fn task_switch_exit(injector: &dyn Injector) {
    if let Err(err) = injector.press_key(Key::Escape) {
        tracing::warn!(?err, "failed to send escape");
    }
}

/// Maps the named keys clients send to injector keys. Unknown names fall
/// through to literal typing when they are a single character.
pub fn map_named_key(name: &str) -> Option<Key> {
    match name {
        "Enter" => Some(Key::Enter),
        "Backspace" => Some(Key::Backspace),
        "Tab" => Some(Key::Tab),
        "Escape" => Some(Key::Escape),
        "ArrowLeft" => Some(Key::ArrowLeft),
        "ArrowRight" => Some(Key::ArrowRight),
        "ArrowUp" => Some(Key::ArrowUp),
        "ArrowDown" => Some(Key::ArrowDown),
        _ => None,
    }
}

/// Dispatches one keyboard input: literal characters are typed, named keys
/// pressed, anything unrecognised but single-character typed literally.
pub fn dispatch_key(injector: &dyn Injector, input: &KeyInput) {
    match input {
        KeyInput::Char { value } => {
            if value.is_empty() {
                return;
            }
            if let Err(err) = injector.type_text(value) {
                tracing::warn!(?err, "failed to type text");
            }
        }
        KeyInput::Key { key } => {
            if let Some(mapped) = map_named_key(key) {
                if let Err(err) = injector.press_key(mapped) {
                    tracing::warn!(?err, "failed to press key");
                }
            } else if key.chars().count() == 1 {
                if let Err(err) = injector.type_text(key) {
                    tracing::warn!(?err, "failed to type key");
                }
            }
        }
    }
}
