use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Pointer buttons the interpreter can synthesize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    Left,
    Right,
    Middle,
}

impl Default for Button {
    fn default() -> Self {
        Button::Left
    }
}

/// Wheel axis. Positive vertical counts scroll up, positive horizontal counts
/// scroll right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Keys the interpreter needs; `Char` covers everything typed literally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Meta,
    Alt,
    Shift,
    Tab,
    Escape,
    Enter,
    Backspace,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Char(char),
}

/// The emulated input device. Every call may fail (platform restriction,
/// permissions); callers catch at the call site and keep processing events.
pub trait Injector: Send + Sync {
    fn position(&self) -> anyhow::Result<(i32, i32)>;
    fn move_abs(&self, x: i32, y: i32) -> anyhow::Result<()>;
    fn press(&self, button: Button) -> anyhow::Result<()>;
    fn release(&self, button: Button) -> anyhow::Result<()>;
    fn click(&self, button: Button) -> anyhow::Result<()>;
    fn double_click(&self) -> anyhow::Result<()>;
    fn wheel(&self, axis: Axis, count: i32) -> anyhow::Result<()>;
    fn key_down(&self, key: Key) -> anyhow::Result<()>;
    fn key_up(&self, key: Key) -> anyhow::Result<()>;
    fn press_key(&self, key: Key) -> anyhow::Result<()>;

    /// Hold every key but the last, tap the last, release in reverse order.
    fn press_chord(&self, keys: &[Key]) -> anyhow::Result<()> {
        let Some((last, mods)) = keys.split_last() else {
            return Ok(());
        };
        for key in mods {
            self.key_down(*key)?;
        }
        let result = self.press_key(*last);
        for key in mods.iter().rev() {
            if let Err(err) = self.key_up(*key) {
                tracing::warn!(?err, "failed to release chord modifier");
            }
        }
        result
    }

    fn type_text(&self, text: &str) -> anyhow::Result<()>;
}

fn to_enigo_button(button: Button) -> enigo::Button {
    match button {
        Button::Left => enigo::Button::Left,
        Button::Right => enigo::Button::Right,
        Button::Middle => enigo::Button::Middle,
    }
}

fn to_enigo_key(key: Key) -> enigo::Key {
    match key {
        Key::Meta => enigo::Key::Meta,
        Key::Alt => enigo::Key::Alt,
        Key::Shift => enigo::Key::Shift,
        Key::Tab => enigo::Key::Tab,
        Key::Escape => enigo::Key::Escape,
        Key::Enter => enigo::Key::Return,
        Key::Backspace => enigo::Key::Backspace,
        Key::ArrowLeft => enigo::Key::LeftArrow,
        Key::ArrowRight => enigo::Key::RightArrow,
        Key::ArrowUp => enigo::Key::UpArrow,
        Key::ArrowDown => enigo::Key::DownArrow,
        Key::Char(c) => enigo::Key::Unicode(c),
    }
}

/// Default backend driving the OS pointer through `enigo`. The instance is
/// created lazily on first use so the library can be constructed in
/// environments without input-injection support (tests, headless CI).
#[derive(Default)]
pub struct EnigoInjector {
    inner: Mutex<Option<enigo::Enigo>>,
}

impl EnigoInjector {
    fn with_enigo<R>(
        &self,
        f: impl FnOnce(&mut enigo::Enigo) -> Result<R, enigo::InputError>,
    ) -> anyhow::Result<R> {
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.is_none() {
            let enigo = enigo::Enigo::new(&enigo::Settings::default())
                .map_err(|err| anyhow!("failed to initialize input backend: {err}"))?;
            *guard = Some(enigo);
        }
        match guard.as_mut() {
            Some(enigo) => f(enigo).map_err(|err| anyhow!("input injection failed: {err}")),
            None => Err(anyhow!("input backend unavailable")),
        }
    }
}

impl Injector for EnigoInjector {
    fn position(&self) -> anyhow::Result<(i32, i32)> {
        use enigo::Mouse;
        self.with_enigo(|e| e.location())
            .context("failed to read pointer position")
    }

    fn move_abs(&self, x: i32, y: i32) -> anyhow::Result<()> {
        use enigo::Mouse;
        self.with_enigo(|e| e.move_mouse(x, y, enigo::Coordinate::Abs))
    }

    fn press(&self, button: Button) -> anyhow::Result<()> {
        use enigo::Mouse;
        self.with_enigo(|e| e.button(to_enigo_button(button), enigo::Direction::Press))
    }

    fn release(&self, button: Button) -> anyhow::Result<()> {
        use enigo::Mouse;
        self.with_enigo(|e| e.button(to_enigo_button(button), enigo::Direction::Release))
    }

    fn click(&self, button: Button) -> anyhow::Result<()> {
        use enigo::Mouse;
        self.with_enigo(|e| e.button(to_enigo_button(button), enigo::Direction::Click))
    }

    fn double_click(&self) -> anyhow::Result<()> {
        use enigo::Mouse;
        self.with_enigo(|e| {
            e.button(enigo::Button::Left, enigo::Direction::Click)?;
            e.button(enigo::Button::Left, enigo::Direction::Click)
        })
    }

    fn wheel(&self, axis: Axis, count: i32) -> anyhow::Result<()> {
        use enigo::Mouse;
        // enigo scrolls down/right for positive lengths; our vertical
        // convention is scroll-up-positive.
        let (length, axis) = match axis {
            Axis::Vertical => (-count, enigo::Axis::Vertical),
            Axis::Horizontal => (count, enigo::Axis::Horizontal),
        };
        self.with_enigo(|e| e.scroll(length, axis))
    }

    fn key_down(&self, key: Key) -> anyhow::Result<()> {
        use enigo::Keyboard;
        self.with_enigo(|e| e.key(to_enigo_key(key), enigo::Direction::Press))
    }

    fn key_up(&self, key: Key) -> anyhow::Result<()> {
        use enigo::Keyboard;
        self.with_enigo(|e| e.key(to_enigo_key(key), enigo::Direction::Release))
    }

    fn press_key(&self, key: Key) -> anyhow::Result<()> {
        use enigo::Keyboard;
        self.with_enigo(|e| e.key(to_enigo_key(key), enigo::Direction::Click))
    }

    fn type_text(&self, text: &str) -> anyhow::Result<()> {
        use enigo::Keyboard;
        self.with_enigo(|e| e.text(text))
    }
}

/// One recorded injector call, in program order.
#[derive(Debug, Clone, PartialEq)]
pub enum InjectorCall {
    MoveAbs(i32, i32),
    Press(Button),
    Release(Button),
    Click(Button),
    DoubleClick,
    Wheel(Axis, i32),
    KeyDown(Key),
    KeyUp(Key),
    PressKey(Key),
    TypeText(String),
}

/// Recording backend for tests. Tracks the synthetic pointer position and can
/// simulate a platform without native horizontal scroll.
#[derive(Default)]
pub struct MockInjector {
    calls: Mutex<Vec<InjectorCall>>,
    position: Mutex<(i32, i32)>,
    fail_horizontal_wheel: AtomicBool,
}

impl MockInjector {
    pub fn set_position(&self, x: i32, y: i32) {
        if let Ok(mut pos) = self.position.lock() {
            *pos = (x, y);
        }
    }

    pub fn set_fail_horizontal_wheel(&self, fail: bool) {
        self.fail_horizontal_wheel.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<InjectorCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn clear_calls(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }

    pub fn count(&self, predicate: impl Fn(&InjectorCall) -> bool) -> usize {
        self.calls().iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, call: InjectorCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl Injector for MockInjector {
    fn position(&self) -> anyhow::Result<(i32, i32)> {
        Ok(self.position.lock().map(|p| *p).unwrap_or_default())
    }

    fn move_abs(&self, x: i32, y: i32) -> anyhow::Result<()> {
        self.set_position(x, y);
        self.record(InjectorCall::MoveAbs(x, y));
        Ok(())
    }

    fn press(&self, button: Button) -> anyhow::Result<()> {
        self.record(InjectorCall::Press(button));
        Ok(())
    }

    fn release(&self, button: Button) -> anyhow::Result<()> {
        self.record(InjectorCall::Release(button));
        Ok(())
    }

    fn click(&self, button: Button) -> anyhow::Result<()> {
        self.record(InjectorCall::Click(button));
        Ok(())
    }

    fn double_click(&self) -> anyhow::Result<()> {
        self.record(InjectorCall::DoubleClick);
        Ok(())
    }

    fn wheel(&self, axis: Axis, count: i32) -> anyhow::Result<()> {
        if axis == Axis::Horizontal && self.fail_horizontal_wheel.load(Ordering::SeqCst) {
            anyhow::bail!("horizontal wheel unsupported");
        }
        self.record(InjectorCall::Wheel(axis, count));
        Ok(())
    }

    fn key_down(&self, key: Key) -> anyhow::Result<()> {
        self.record(InjectorCall::KeyDown(key));
        Ok(())
    }

    fn key_up(&self, key: Key) -> anyhow::Result<()> {
        self.record(InjectorCall::KeyUp(key));
        Ok(())
    }

    fn press_key(&self, key: Key) -> anyhow::Result<()> {
        self.record(InjectorCall::PressKey(key));
        Ok(())
    }

    fn type_text(&self, text: &str) -> anyhow::Result<()> {
        self.record(InjectorCall::TypeText(text.to_string()));
        Ok(())
    }
}
