//! Render handoff — the per-tick snapshot consumed by the external
//! renderer, plus the human-readable status/action labels shown on the
//! info panel.
//!
//! Drawing itself happens outside this crate; a `RenderSink` receives one
//! snapshot per tick and does whatever presentation it wants with it.

use tracing::info;

use crate::command::{Arbitration, Command};
use crate::device::Device;
use crate::face::Gesture;
use crate::session::SessionPhase;
use crate::world::World;

// ── Statistics view ────────────────────────────────────────

/// Statistics bundle attached to every render snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsView {
    pub frame_count: u64,
    pub detection_count: u64,
    /// Detections as a percentage of frames; 0 before the first frame.
    pub detection_rate_pct: f64,
    /// Seconds since the last reset, frozen at completion.
    pub elapsed_s: f64,
    pub distance_traveled: f64,
}

// ── Render snapshot ────────────────────────────────────────

/// Everything the renderer needs for one tick.
#[derive(Debug, Clone)]
pub struct RenderSnapshot {
    pub phase: SessionPhase,
    pub device: Device,
    pub world: World,
    pub gesture: Gesture,
    pub command: Command,
    /// Detection status line, e.g. "Looking left".
    pub status: &'static str,
    /// Resolved action line, e.g. "KEY: Rotate Left".
    pub action: &'static str,
    pub stats: StatsView,
}

/// Status line for the current detection state.
pub fn status_label(face_detected: bool, gesture: Gesture) -> &'static str {
    if !face_detected {
        return "No face detected";
    }
    match gesture {
        Gesture::EyebrowsRaised => "Eyebrows raised",
        Gesture::Smiling => "Smile detected",
        Gesture::LookingLeft => "Looking left",
        Gesture::LookingRight => "Looking right",
        Gesture::MouthOpen => "Mouth open",
        Gesture::Neutral => "Face detected",
    }
}

/// Action line for the resolved command, distinguishing keyboard input
/// from gesture control.
pub fn action_label(arbitration: &Arbitration, face_detected: bool) -> &'static str {
    if arbitration.from_keyboard {
        return match arbitration.command {
            Command::Forward => "KEY: Forward",
            Command::Backward => "KEY: Backward",
            Command::RotateLeft => "KEY: Rotate Left",
            Command::RotateRight => "KEY: Rotate Right",
            Command::Stop | Command::None => "No movement",
        };
    }
    if !face_detected {
        return "No movement";
    }
    match arbitration.command {
        Command::Forward => "EYEBROWS: Forward",
        Command::Backward => "SMILE: Backward",
        Command::RotateLeft => "LOOK LEFT: Rotate Left",
        Command::RotateRight => "LOOK RIGHT: Rotate Right",
        Command::Stop => "MOUTH OPEN: Stop",
        Command::None => "NEUTRAL: No movement",
    }
}

// ── Sink ───────────────────────────────────────────────────

/// Receiver for per-tick render snapshots.
pub trait RenderSink {
    fn present(&mut self, snapshot: &RenderSnapshot);
}

/// Sink that logs a status line every N snapshots — the presentation used
/// for headless runs.
pub struct LogSink {
    every: u64,
    presented: u64,
}

impl LogSink {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            presented: 0,
        }
    }
}

impl RenderSink for LogSink {
    fn present(&mut self, snapshot: &RenderSnapshot) {
        self.presented += 1;
        if self.presented % self.every != 0 {
            return;
        }
        info!(
            "status: {} [{}] pos=({:.1}, {:.1}) heading={:.0} gesture={} detection={:.1}% time={:.1}s distance={:.0} | {}",
            snapshot.phase.as_str(),
            snapshot.command.as_str(),
            snapshot.device.x,
            snapshot.device.y,
            snapshot.device.heading_deg,
            snapshot.gesture.as_str(),
            snapshot.stats.detection_rate_pct,
            snapshot.stats.elapsed_s,
            snapshot.stats.distance_traveled,
            snapshot.action,
        );
    }
}

// ── Tests ──────────────────────────────────────────────────
