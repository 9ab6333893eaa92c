use once_cell::sync::OnceCell;

/// Usable screen rectangle for clamping synthesized absolute moves. On
/// Windows this is the virtual screen, so the cursor can cross monitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenBounds {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl ScreenBounds {
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn clamp(&self, x: i32, y: i32) -> (i32, i32) {
        let x = x.clamp(self.left, self.left + self.width - 1);
        let y = y.clamp(self.top, self.top + self.height - 1);
        (x, y)
    }
}

impl Default for ScreenBounds {
    fn default() -> Self {
        Self::new(0, 0, 1920, 1080)
    }
}

static BOUNDS: OnceCell<ScreenBounds> = OnceCell::new();

/// Detected screen bounds, queried once and cached for the process lifetime.
pub fn screen_bounds() -> ScreenBounds {
    *BOUNDS.get_or_init(|| {
        let bounds = detect_screen_bounds();
        tracing::info!(
            left = bounds.left,
            top = bounds.top,
            width = bounds.width,
            height = bounds.height,
            "detected screen bounds"
        );
        bounds
    })
}

#[cfg(windows)]
fn detect_screen_bounds() -> ScreenBounds {
    use windows::Win32::UI::WindowsAndMessaging::{
        GetSystemMetrics, SM_CXVIRTUALSCREEN, SM_CYVIRTUALSCREEN, SM_XVIRTUALSCREEN,
        SM_YVIRTUALSCREEN,
    };

    let left = unsafe { GetSystemMetrics(SM_XVIRTUALSCREEN) };
    let top = unsafe { GetSystemMetrics(SM_YVIRTUALSCREEN) };
    let width = unsafe { GetSystemMetrics(SM_CXVIRTUALSCREEN) };
    let height = unsafe { GetSystemMetrics(SM_CYVIRTUALSCREEN) };
    if width > 0 && height > 0 {
        ScreenBounds::new(left, top, width, height)
    } else {
        tracing::warn!("virtual screen metrics unavailable; using default bounds");
        ScreenBounds::default()
    }
}

#[cfg(not(windows))]
fn detect_screen_bounds() -> ScreenBounds {
    use enigo::Mouse;

    match enigo::Enigo::new(&enigo::Settings::default()) {
        Ok(enigo) => match enigo.main_display() {
            Ok((width, height)) if width > 0 && height > 0 => {
                ScreenBounds::new(0, 0, width, height)
            }
            Ok(_) => ScreenBounds::default(),
            Err(err) => {
                tracing::warn!(?err, "failed to query display size; using default bounds");
                ScreenBounds::default()
            }
        },
        Err(err) => {
            tracing::warn!(?err, "failed to initialize input backend for display query");
            ScreenBounds::default()
        }
    }
}
