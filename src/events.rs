use serde::{Deserialize, Serialize};

/// Lifecycle phase of a raw touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    Down,
    Move,
    Up,
}

/// One raw touch event as delivered by the transport layer, singly or inside
/// an ordered batch. Clients occasionally send partial payloads; missing
/// fields decode as zero rather than rejecting the event, so the state
/// machine stays resilient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    #[serde(rename = "type")]
    pub phase: TouchPhase,
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl TouchEvent {
    pub fn down(id: u64, x: f64, y: f64) -> Self {
        Self {
            phase: TouchPhase::Down,
            id,
            x,
            y,
        }
    }

    pub fn moved(id: u64, x: f64, y: f64) -> Self {
        Self {
            phase: TouchPhase::Move,
            id,
            x,
            y,
        }
    }

    pub fn up(id: u64, x: f64, y: f64) -> Self {
        Self {
            phase: TouchPhase::Up,
            id,
            x,
            y,
        }
    }
}

/// Keyboard input delivered by the transport: either a literal character or a
/// named key such as `Enter` or `ArrowLeft`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum KeyInput {
    Char {
        #[serde(default)]
        value: String,
    },
    Key {
        #[serde(default)]
        key: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_touch_payload_defaults_to_zero() {
        let event: TouchEvent = serde_json::from_str(r#"{"type":"move","id":3}"#).unwrap();
        assert_eq!(event.phase, TouchPhase::Move);
        assert_eq!(event.id, 3);
        assert_eq!(event.x, 0.0);
        assert_eq!(event.y, 0.0);
    }

    #[test]
    fn key_input_decodes_both_shapes() {
        let ch: KeyInput = serde_json::from_str(r#"{"type":"char","value":"a"}"#).unwrap();
        assert_eq!(
            ch,
            KeyInput::Char {
                value: "a".to_string()
            }
        );
        let key: KeyInput = serde_json::from_str(r#"{"type":"key","key":"Enter"}"#).unwrap();
        assert_eq!(
            key,
            KeyInput::Key {
                key: "Enter".to_string()
            }
        );
    }
}
