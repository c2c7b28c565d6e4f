//! Arena geometry — bounds, decorative obstacles, and the goal target.
//!
//! Obstacles are render-only scenery: the device drives straight through
//! them and no collision query exists.  The only spatial predicate the
//! world answers is whether the device has reached the target.

// ── Arena ──────────────────────────────────────────────────

/// Rectangular drivable area, origin at the top-left corner.
#[derive(Debug, Clone, Copy)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

impl Arena {
    /// Where the device spawns at session start and on reset.
    pub fn spawn_point(&self) -> (f64, f64) {
        (self.width / 4.0, self.height / 2.0)
    }
}

// ── Obstacles ──────────────────────────────────────────────

/// Obstacle flavor, selecting how the renderer draws it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Wall,
    Cone,
    Plant,
}

impl ObstacleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wall => "wall",
            Self::Cone => "cone",
            Self::Plant => "plant",
        }
    }
}

/// Axis-aligned scenery box.  Fixed after arena setup.
#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            kind,
            x,
            y,
            width,
            height,
        }
    }
}

// ── Target ─────────────────────────────────────────────────

/// Goal marker with a cosmetic pulse animation.
#[derive(Debug, Clone, Copy)]
pub struct Target {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Pulse phase, cycling in [0, 1).
    pub pulse: f64,
    pub pulse_speed: f64,
}

impl Target {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            radius: 25.0,
            pulse: 0.0,
            pulse_speed: 0.05,
        }
    }

    /// Advance the pulse one tick, wrapping back into [0, 1).
    pub fn advance_pulse(&mut self) {
        self.pulse += self.pulse_speed;
        if self.pulse >= 1.0 {
            self.pulse -= 1.0;
        }
    }
}

// ── World ──────────────────────────────────────────────────

/// Static world state: arena bounds, scenery, and the goal.
#[derive(Debug, Clone)]
pub struct World {
    pub arena: Arena,
    pub obstacles: Vec<Obstacle>,
    pub target: Target,
}

impl World {
    /// The standard course: two walls, a cone, two plants, and the target
    /// near the right edge at mid-height.
    pub fn standard(arena: Arena) -> Self {
        let obstacles = vec![
            Obstacle::new(ObstacleKind::Wall, 600.0, 200.0, 150.0, 25.0),
            Obstacle::new(ObstacleKind::Wall, 800.0, 400.0, 25.0, 150.0),
            Obstacle::new(ObstacleKind::Cone, 400.0, 500.0, 40.0, 40.0),
            Obstacle::new(ObstacleKind::Plant, 900.0, 300.0, 50.0, 50.0),
            Obstacle::new(ObstacleKind::Plant, 300.0, 100.0, 50.0, 50.0),
        ];
        let target = Target::new(arena.width - 150.0, arena.height / 2.0);
        Self {
            arena,
            obstacles,
            target,
        }
    }

    /// Whether a device centered at (x, y) with the given half-width has
    /// reached the target.
    pub fn goal_reached(&self, x: f64, y: f64, device_half_width: f64) -> bool {
        let dx = x - self.target.x;
        let dy = y - self.target.y;
        let distance = (dx * dx + dy * dy).sqrt();
        distance < device_half_width + self.target.radius
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_threshold() {
        // Half-width 60 + radius 25 ⇒ threshold 85.
        let world = World::standard(Arena::default());
        let (tx, ty) = (world.target.x, world.target.y);
        assert!(world.goal_reached(tx - 84.9, ty, 60.0), "84.9 should reach");
        assert!(!world.goal_reached(tx - 85.1, ty, 60.0), "85.1 should not");
        assert!(!world.goal_reached(tx - 85.0, ty, 60.0), "strict inequality");
    }

    #[test]
    fn test_pulse_wraps() {
        let mut target = Target::new(0.0, 0.0);
        for _ in 0..25 {
            target.advance_pulse();
            assert!(
                (0.0..1.0).contains(&target.pulse),
                "pulse left [0,1): {}",
                target.pulse
            );
        }
    }

    #[test]
    fn test_spawn_point() {
        let arena = Arena::default();
        assert_eq!(arena.spawn_point(), (300.0, 400.0));
    }

    #[test]
    fn test_standard_course() {
        let world = World::standard(Arena::default());
        assert_eq!(world.obstacles.len(), 5);
        let walls = world
            .obstacles
            .iter()
            .filter(|o| o.kind == ObstacleKind::Wall)
            .count();
        assert_eq!(walls, 2);
        assert_eq!(world.target.x, 1050.0);
        assert_eq!(world.target.y, 400.0);
        assert_eq!(world.target.radius, 25.0);
    }
}
