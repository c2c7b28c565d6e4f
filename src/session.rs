//! Session control — the Running/Paused/Completed state machine, tick
//! sequencing, and accumulated statistics.
//!
//! One `Session` owns the device, the world, and the classifier, and is
//! advanced exclusively by the tick driver.  Timestamps come in from the
//! caller as monotonic seconds so the session clock is deterministic
//! under test.

use tracing::{debug, info};

use crate::command::{resolve, Command, KeyboardInput};
use crate::device::{Device, DeviceConfig};
use crate::face::{FaceSnapshot, Gesture, GestureClassifier, GestureConfig};
use crate::render::{action_label, status_label, RenderSnapshot, StatsView};
use crate::world::World;

// ── Phase ──────────────────────────────────────────────────

/// Session lifecycle phase.
///
/// Transitions: pause toggles Running and Paused; reset returns to Running
/// from anywhere with fresh state; reaching the goal moves Running to
/// Completed one-shot.  Quit is an external signal handled by the driver,
/// not a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Running,
    Paused,
    Completed,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }
}

// ── Statistics ─────────────────────────────────────────────

/// Counters accumulated while the session runs.
#[derive(Debug, Clone)]
struct SessionStats {
    frame_count: u64,
    detection_count: u64,
    distance_traveled: f64,
    /// Monotonic timestamp of the last reset.
    start_s: f64,
    /// Elapsed seconds captured at the moment of completion.
    frozen_elapsed_s: Option<f64>,
}

impl SessionStats {
    fn new(now_s: f64) -> Self {
        Self {
            frame_count: 0,
            detection_count: 0,
            distance_traveled: 0.0,
            start_s: now_s,
            frozen_elapsed_s: None,
        }
    }

    fn record_frame(&mut self, detected: bool) {
        self.frame_count += 1;
        if detected {
            self.detection_count += 1;
        }
    }

    fn detection_rate_pct(&self) -> f64 {
        if self.frame_count == 0 {
            return 0.0;
        }
        self.detection_count as f64 / self.frame_count as f64 * 100.0
    }

    fn elapsed_s(&self, now_s: f64) -> f64 {
        self.frozen_elapsed_s.unwrap_or(now_s - self.start_s)
    }

    fn freeze(&mut self, now_s: f64) {
        self.frozen_elapsed_s = Some(now_s - self.start_s);
    }
}

// ── Tick input ─────────────────────────────────────────────

/// Everything a tick consumes from the outside world.
#[derive(Debug, Clone)]
pub struct TickInput {
    pub keys: KeyboardInput,
    pub snapshot: Option<FaceSnapshot>,
    /// Monotonic timestamp in seconds.
    pub now_s: f64,
}

// ── Session ────────────────────────────────────────────────

/// One run of the simulation from spawn/reset to completion or quit.
pub struct Session {
    pub phase: SessionPhase,
    pub world: World,
    pub device: Device,
    classifier: GestureClassifier,
    device_config: DeviceConfig,
    stats: SessionStats,
    pub current_gesture: Gesture,
    pub last_command: Command,
    last_status: &'static str,
    last_action: &'static str,
}

impl Session {
    pub fn new(
        world: World,
        device_config: DeviceConfig,
        gesture_config: GestureConfig,
        now_s: f64,
    ) -> Self {
        let (spawn_x, spawn_y) = world.arena.spawn_point();
        info!(
            "session started: arena {:.0}x{:.0}, spawn ({:.0}, {:.0})",
            world.arena.width, world.arena.height, spawn_x, spawn_y
        );
        for obstacle in &world.obstacles {
            debug!(
                "obstacle: {} at ({:.0}, {:.0}) {}x{}",
                obstacle.kind.as_str(),
                obstacle.x,
                obstacle.y,
                obstacle.width,
                obstacle.height
            );
        }
        Self {
            phase: SessionPhase::Running,
            device: Device::new(device_config, spawn_x, spawn_y),
            world,
            classifier: GestureClassifier::new(gesture_config),
            device_config,
            stats: SessionStats::new(now_s),
            current_gesture: Gesture::Neutral,
            last_command: Command::None,
            last_status: "No face detected",
            last_action: "No movement",
        }
    }

    /// Advance the session one tick and hand back the render snapshot.
    ///
    /// Order: pause/reset handling, then — only while Running —
    /// classification, arbitration, kinematics, goal check, statistics.
    /// While Paused or Completed the simulation step is skipped entirely.
    pub fn tick(&mut self, input: &TickInput) -> RenderSnapshot {
        if input.keys.reset {
            self.reset(input.now_s);
            return self.render_snapshot(input.now_s);
        }
        if input.keys.pause {
            self.toggle_pause();
        }

        if self.phase != SessionPhase::Running {
            return self.render_snapshot(input.now_s);
        }

        let face_detected = input.snapshot.is_some();
        self.stats.record_frame(face_detected);

        self.current_gesture = self.classifier.classify(input.snapshot.as_ref());

        let arbitration = resolve(&input.keys, self.current_gesture, face_detected);
        self.device
            .set_rotation(arbitration.rotating, arbitration.rotation_sign);

        let (prev_x, prev_y) = (self.device.x, self.device.y);
        self.device
            .advance(arbitration.command, 1.0, &self.world.arena);
        let (dx, dy) = (self.device.x - prev_x, self.device.y - prev_y);
        self.stats.distance_traveled += (dx * dx + dy * dy).sqrt();

        self.world.target.advance_pulse();

        self.last_command = arbitration.command;
        self.last_status = status_label(face_detected, self.current_gesture);
        self.last_action = action_label(&arbitration, face_detected);

        if self
            .world
            .goal_reached(self.device.x, self.device.y, self.device.half_width())
        {
            self.phase = SessionPhase::Completed;
            self.stats.freeze(input.now_s);
            info!(
                "goal reached in {:.1}s after {:.0} units",
                self.stats.elapsed_s(input.now_s),
                self.stats.distance_traveled
            );
        }

        self.render_snapshot(input.now_s)
    }

    /// Full reset: fresh device at the spawn point, statistics zeroed,
    /// gesture cleared.  Valid from every phase.
    fn reset(&mut self, now_s: f64) {
        let (spawn_x, spawn_y) = self.world.arena.spawn_point();
        self.device = Device::new(self.device_config, spawn_x, spawn_y);
        self.stats = SessionStats::new(now_s);
        self.current_gesture = Gesture::Neutral;
        self.last_command = Command::None;
        self.last_status = "No face detected";
        self.last_action = "No movement";
        self.phase = SessionPhase::Running;
        info!("session reset");
    }

    fn toggle_pause(&mut self) {
        match self.phase {
            SessionPhase::Running => {
                self.phase = SessionPhase::Paused;
                debug!("session paused");
            }
            SessionPhase::Paused => {
                self.phase = SessionPhase::Running;
                debug!("session resumed");
            }
            // Completed only leaves via reset.
            SessionPhase::Completed => {}
        }
    }

    fn render_snapshot(&self, now_s: f64) -> RenderSnapshot {
        RenderSnapshot {
            phase: self.phase,
            device: self.device.clone(),
            world: self.world.clone(),
            gesture: self.current_gesture,
            command: self.last_command,
            status: self.last_status,
            action: self.last_action,
            stats: StatsView {
                frame_count: self.stats.frame_count,
                detection_count: self.stats.detection_count,
                detection_rate_pct: self.stats.detection_rate_pct(),
                elapsed_s: self.stats.elapsed_s(now_s),
                distance_traveled: self.stats.distance_traveled,
            },
        }
    }
}

// ── Tests ──────────────────────────────────────────────────
