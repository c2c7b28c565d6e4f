//! Command arbitration — keyboard and gesture signals resolved into
//! exactly one command per tick.
//!
//! Keyboard always wins over gestures; a missing face forces rotation off
//! regardless of what was active the previous tick.

use crate::face::Gesture;

// ── Command ────────────────────────────────────────────────

/// The single directive applied to the device on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Forward,
    Backward,
    RotateLeft,
    RotateRight,
    /// Deliberate halt (mouth open).
    Stop,
    /// Nothing requested this tick.
    None,
}

impl Command {
    /// String representation for logs and status display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::RotateLeft => "rotate-left",
            Self::RotateRight => "rotate-right",
            Self::Stop => "stop",
            Self::None => "none",
        }
    }

    /// Whether the command translates the device.
    pub fn is_translation(&self) -> bool {
        matches!(self, Self::Forward | Self::Backward)
    }
}

// ── Keyboard snapshot ──────────────────────────────────────

/// Per-tick keyboard state.
///
/// Arrow keys are level-held; pause/reset/quit are edge-triggered presses
/// delivered once on the tick the key went down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub pause: bool,
    pub reset: bool,
    pub quit: bool,
}

// ── Arbitration ────────────────────────────────────────────

/// The resolved outcome of one tick's arbitration: the command plus the
/// rotation flags the kinematic step consumes on the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arbitration {
    pub command: Command,
    pub rotating: bool,
    /// -1 left, +1 right, 0 when not rotating.
    pub rotation_sign: i8,
    /// True when the command came from the keyboard rather than a gesture.
    pub from_keyboard: bool,
}

impl Arbitration {
    fn keyboard(command: Command, rotation_sign: i8) -> Self {
        Self {
            command,
            rotating: rotation_sign != 0,
            rotation_sign,
            from_keyboard: true,
        }
    }

    fn gesture(command: Command, rotation_sign: i8) -> Self {
        Self {
            command,
            rotating: rotation_sign != 0,
            rotation_sign,
            from_keyboard: false,
        }
    }
}

/// Resolve keyboard state and the current gesture into one command.
///
/// Rules, in order:
/// 1. Any held directional key wins outright (precedence up, down, left,
///    right); gesture-derived rotation is cancelled for the tick.
/// 2. With no face detected the result is `None` and rotation is forced
///    off, even if a rotation was active on the previous tick.
/// 3. Otherwise the gesture maps directly: eyebrows forward, smile
///    backward, gaze left/right rotates, open mouth stops, neutral does
///    nothing.  Every non-rotating mapping stops rotation.
pub fn resolve(keys: &KeyboardInput, gesture: Gesture, face_detected: bool) -> Arbitration {
    if keys.up {
        return Arbitration::keyboard(Command::Forward, 0);
    }
    if keys.down {
        return Arbitration::keyboard(Command::Backward, 0);
    }
    if keys.left {
        return Arbitration::keyboard(Command::RotateLeft, -1);
    }
    if keys.right {
        return Arbitration::keyboard(Command::RotateRight, 1);
    }

    if !face_detected {
        return Arbitration::gesture(Command::None, 0);
    }

    match gesture {
        Gesture::EyebrowsRaised => Arbitration::gesture(Command::Forward, 0),
        Gesture::Smiling => Arbitration::gesture(Command::Backward, 0),
        Gesture::LookingLeft => Arbitration::gesture(Command::RotateLeft, -1),
        Gesture::LookingRight => Arbitration::gesture(Command::RotateRight, 1),
        Gesture::MouthOpen => Arbitration::gesture(Command::Stop, 0),
        Gesture::Neutral => Arbitration::gesture(Command::None, 0),
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_beats_gesture() {
        let keys = KeyboardInput {
            up: true,
            ..Default::default()
        };
        let arb = resolve(&keys, Gesture::Smiling, true);
        assert_eq!(arb.command, Command::Forward);
        assert!(arb.from_keyboard);
        assert!(!arb.rotating);
    }

    #[test]
    fn test_keyboard_precedence_up_over_down() {
        let keys = KeyboardInput {
            up: true,
            down: true,
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(resolve(&keys, Gesture::Neutral, true).command, Command::Forward);
    }

    #[test]
    fn test_keyboard_rotation_signs() {
        let left = KeyboardInput {
            left: true,
            ..Default::default()
        };
        let arb = resolve(&left, Gesture::Neutral, true);
        assert_eq!(arb.command, Command::RotateLeft);
        assert!(arb.rotating);
        assert_eq!(arb.rotation_sign, -1);

        let right = KeyboardInput {
            right: true,
            ..Default::default()
        };
        let arb = resolve(&right, Gesture::Neutral, true);
        assert_eq!(arb.command, Command::RotateRight);
        assert_eq!(arb.rotation_sign, 1);
    }

    #[test]
    fn test_keyboard_translation_cancels_gesture_rotation() {
        // Gaze asks for rotation but a held arrow wins and stops it.
        let keys = KeyboardInput {
            down: true,
            ..Default::default()
        };
        let arb = resolve(&keys, Gesture::LookingLeft, true);
        assert_eq!(arb.command, Command::Backward);
        assert!(!arb.rotating);
        assert_eq!(arb.rotation_sign, 0);
    }

    #[test]
    fn test_no_face_forces_rotation_off() {
        let keys = KeyboardInput::default();
        // The stale gesture label is irrelevant without a face.
        let arb = resolve(&keys, Gesture::LookingRight, false);
        assert_eq!(arb.command, Command::None);
        assert!(!arb.rotating);
        assert_eq!(arb.rotation_sign, 0);
    }

    #[test]
    fn test_gesture_mapping_table() {
        let keys = KeyboardInput::default();
        let cases = [
            (Gesture::EyebrowsRaised, Command::Forward, 0),
            (Gesture::Smiling, Command::Backward, 0),
            (Gesture::LookingLeft, Command::RotateLeft, -1),
            (Gesture::LookingRight, Command::RotateRight, 1),
            (Gesture::MouthOpen, Command::Stop, 0),
            (Gesture::Neutral, Command::None, 0),
        ];
        for (gesture, command, sign) in cases {
            let arb = resolve(&keys, gesture, true);
            assert_eq!(arb.command, command, "gesture {:?}", gesture);
            assert_eq!(arb.rotation_sign, sign, "gesture {:?}", gesture);
            assert_eq!(arb.rotating, sign != 0, "gesture {:?}", gesture);
            assert!(!arb.from_keyboard);
        }
    }

    #[test]
    fn test_is_translation() {
        assert!(Command::Forward.is_translation());
        assert!(Command::Backward.is_translation());
        assert!(!Command::RotateLeft.is_translation());
        assert!(!Command::Stop.is_translation());
        assert!(!Command::None.is_translation());
    }
}
