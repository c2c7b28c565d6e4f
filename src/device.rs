//! Device kinematics — pose, heading, trail, and the per-tick advance.
//!
//! Heading 0° points up the screen; positive headings rotate clockwise.
//! Speeds are expressed per tick at the nominal 60 Hz rate and scale
//! linearly through the `dt` argument for other rates.

use crate::command::Command;
use crate::world::Arena;

// ── Config ─────────────────────────────────────────────────

/// Fixed physical parameters of the device.
#[derive(Debug, Clone, Copy)]
pub struct DeviceConfig {
    /// Footprint width in arena units.
    pub width: f64,
    /// Footprint height in arena units.
    pub height: f64,
    /// Linear speed, units per tick.
    pub speed: f64,
    /// Rotation speed, degrees per tick.
    pub rotation_speed: f64,
    /// Hard ceiling on recorded trail samples.
    pub trail_capacity: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            width: 120.0,
            height: 160.0,
            speed: 5.0,
            rotation_speed: 3.0,
            trail_capacity: 15,
        }
    }
}

// ── Trail ──────────────────────────────────────────────────

/// One recorded pose sample for the fading motion trail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSample {
    pub x: f64,
    pub y: f64,
    pub heading_deg: f64,
}

// ── Device ─────────────────────────────────────────────────

/// The simulated device: pose plus rotation state and cosmetic
/// accumulators, advanced once per tick by the resolved command.
#[derive(Debug, Clone)]
pub struct Device {
    pub config: DeviceConfig,
    pub x: f64,
    pub y: f64,
    /// Heading in degrees, always held in [0, 360).
    pub heading_deg: f64,
    pub rotating: bool,
    /// -1 left, +1 right, 0 when not rotating.
    pub rotation_sign: i8,
    /// Cosmetic wheel angle accumulator, unbounded.
    pub wheel_spin: f64,
    /// Samples recorded while translating; stops growing once full.
    pub trail: Vec<TrailSample>,
}

impl Device {
    /// Place a fresh device at (x, y) facing up.
    pub fn new(config: DeviceConfig, x: f64, y: f64) -> Self {
        Self {
            config,
            x,
            y,
            heading_deg: 0.0,
            rotating: false,
            rotation_sign: 0,
            wheel_spin: 0.0,
            trail: Vec::with_capacity(config.trail_capacity),
        }
    }

    /// Half the footprint width — the goal check's reach.
    pub fn half_width(&self) -> f64 {
        self.config.width / 2.0
    }

    /// Install the rotation flags resolved by arbitration for this tick.
    pub fn set_rotation(&mut self, rotating: bool, sign: i8) {
        self.rotating = rotating;
        self.rotation_sign = if rotating { sign } else { 0 };
    }

    /// Advance the pose one step.  `dt` is in ticks (1.0 at 60 Hz).
    ///
    /// Translation and rotation are mutually exclusive by arbitration; a
    /// rotating tick never moves the center.  After motion the heading is
    /// renormalized, a trail sample is recorded if the device translated
    /// and the trail has room, and the position is clamped so the
    /// footprint stays inside the arena.
    pub fn advance(&mut self, command: Command, dt: f64, arena: &Arena) {
        let step = self.config.speed * dt;
        match command {
            Command::Forward => {
                let rad = self.heading_deg.to_radians();
                self.x += rad.sin() * step;
                self.y -= rad.cos() * step;
                self.wheel_spin += step * 2.0;
            }
            Command::Backward => {
                let rad = self.heading_deg.to_radians();
                self.x -= rad.sin() * step;
                self.y += rad.cos() * step;
                self.wheel_spin -= step * 2.0;
            }
            Command::RotateLeft | Command::RotateRight | Command::Stop | Command::None => {}
        }

        if self.rotating {
            self.heading_deg += self.config.rotation_speed * self.rotation_sign as f64 * dt;
        }
        self.heading_deg = normalize_heading(self.heading_deg);

        if command.is_translation() && self.trail.len() < self.config.trail_capacity {
            self.trail.push(TrailSample {
                x: self.x,
                y: self.y,
                heading_deg: self.heading_deg,
            });
        }

        let half_w = self.config.width / 2.0;
        let half_h = self.config.height / 2.0;
        self.x = self.x.clamp(half_w, arena.width - half_w);
        self.y = self.y.clamp(half_h, arena.height - half_h);
    }
}

/// Fold a heading into [0, 360).
fn normalize_heading(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn device_at(x: f64, y: f64) -> Device {
        Device::new(DeviceConfig::default(), x, y)
    }

    #[test]
    fn test_forward_at_zero_heading_moves_up() {
        let arena = Arena::default();
        let mut device = device_at(600.0, 400.0);
        device.advance(Command::Forward, 1.0, &arena);
        assert!((device.x - 600.0).abs() < 1e-9);
        assert!((device.y - 395.0).abs() < 1e-9, "y = {}", device.y);
        assert!((device.wheel_spin - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_backward_mirrors_forward() {
        let arena = Arena::default();
        let mut device = device_at(600.0, 400.0);
        device.heading_deg = 90.0;
        device.advance(Command::Backward, 1.0, &arena);
        // Heading 90° points along +x, so backward moves -x.
        assert!((device.x - 595.0).abs() < 1e-9, "x = {}", device.x);
        assert!((device.y - 400.0).abs() < 1e-9, "y = {}", device.y);
        assert!((device.wheel_spin + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_changes_heading_only() {
        let arena = Arena::default();
        let mut device = device_at(600.0, 400.0);
        device.set_rotation(true, 1);
        device.advance(Command::RotateRight, 1.0, &arena);
        assert_eq!(device.heading_deg, 3.0);
        assert_eq!((device.x, device.y), (600.0, 400.0));
        assert!(device.trail.is_empty(), "rotation must not record trail");
    }

    #[test]
    fn test_heading_wraps_both_directions() {
        let arena = Arena::default();
        let mut device = device_at(600.0, 400.0);
        device.set_rotation(true, -1);
        // 121 left ticks from 0°: -363° → 357° after normalization.
        for _ in 0..121 {
            device.advance(Command::RotateLeft, 1.0, &arena);
            assert!(
                (0.0..360.0).contains(&device.heading_deg),
                "heading left [0,360): {}",
                device.heading_deg
            );
        }
        assert!((device.heading_deg - 357.0).abs() < 1e-9);

        device.set_rotation(true, 1);
        for _ in 0..2 {
            device.advance(Command::RotateRight, 1.0, &arena);
        }
        assert!((device.heading_deg - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_trail_hard_ceiling() {
        let arena = Arena::default();
        let mut device = device_at(600.0, 400.0);
        for _ in 0..50 {
            device.advance(Command::Forward, 1.0, &arena);
            assert!(device.trail.len() <= 15, "trail grew past capacity");
        }
        assert_eq!(device.trail.len(), 15);
        let first = device.trail[0];
        // Full trail stays frozen: no eviction, no further samples.
        device.advance(Command::Forward, 1.0, &arena);
        assert_eq!(device.trail.len(), 15);
        assert_eq!(device.trail[0], first);
    }

    #[test]
    fn test_clamp_keeps_footprint_inside() {
        let arena = Arena::default();
        let mut device = device_at(62.0, 400.0);
        device.heading_deg = 270.0; // facing -x
        for _ in 0..10 {
            device.advance(Command::Forward, 1.0, &arena);
        }
        assert_eq!(device.x, 60.0, "clamped at half width");

        let mut device = device_at(600.0, 85.0);
        for _ in 0..10 {
            device.advance(Command::Forward, 1.0, &arena);
        }
        assert_eq!(device.y, 80.0, "clamped at half height");
    }

    #[test]
    fn test_stop_and_none_leave_pose_untouched() {
        let arena = Arena::default();
        let mut device = device_at(600.0, 400.0);
        device.advance(Command::Stop, 1.0, &arena);
        device.advance(Command::None, 1.0, &arena);
        assert_eq!((device.x, device.y, device.heading_deg), (600.0, 400.0, 0.0));
        assert_eq!(device.wheel_spin, 0.0);
        assert!(device.trail.is_empty());
    }

    #[test]
    fn test_set_rotation_clears_sign_when_stopped() {
        let mut device = device_at(600.0, 400.0);
        device.set_rotation(true, -1);
        assert_eq!(device.rotation_sign, -1);
        device.set_rotation(false, -1);
        assert!(!device.rotating);
        assert_eq!(device.rotation_sign, 0);
    }

    #[test]
    fn test_dt_scales_motion() {
        let arena = Arena::default();
        let mut device = device_at(600.0, 400.0);
        device.advance(Command::Forward, 0.5, &arena);
        assert!((device.y - 397.5).abs() < 1e-9, "y = {}", device.y);
    }
}
