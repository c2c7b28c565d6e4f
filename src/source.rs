//! Boundary collaborators — where landmark snapshots and keyboard state
//! enter the core.
//!
//! The camera, the face-mesh model, and the real event queue all live
//! outside this crate.  A `LandmarkSource` hands the tick driver at most
//! one snapshot per tick; an `InputSource` hands it the keyboard state.
//! Initialization reports availability explicitly — a missing camera
//! degrades to "no snapshot this tick", never to an error path.

use tracing::info;

use crate::command::KeyboardInput;
use crate::face::{FaceLandmark, FaceSnapshot, Gesture, LANDMARK_COUNT};

// ── Availability ───────────────────────────────────────────

/// Result of initializing an external source, checked once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Unavailable => "unavailable",
        }
    }
}

// ── Landmark source ────────────────────────────────────────

/// Per-tick supplier of landmark snapshots.
///
/// `next_snapshot` must never block the tick: a stalled or absent
/// detector returns `None`, which downstream reads as "no face".
pub trait LandmarkSource {
    fn availability(&self) -> Availability;
    fn next_snapshot(&mut self) -> Option<FaceSnapshot>;
}

/// Source used when no detector is present — every tick is face-less and
/// the session runs keyboard-only.
pub struct NullLandmarkSource;

impl LandmarkSource for NullLandmarkSource {
    fn availability(&self) -> Availability {
        Availability::Unavailable
    }

    fn next_snapshot(&mut self) -> Option<FaceSnapshot> {
        None
    }
}

/// Plays back a canned sequence of gesture segments, synthesizing a
/// snapshot exhibiting each gesture for its duration.  Used for headless
/// demos and CI runs.
pub struct ScriptedLandmarkSource {
    segments: Vec<(Option<FaceSnapshot>, u32)>,
    segment: usize,
    remaining: u32,
}

impl ScriptedLandmarkSource {
    /// Parse a script of `label:ticks` segments separated by commas, e.g.
    /// `eyebrows:120,left:60,none:30,neutral:10`.  Labels are the gesture
    /// names accepted by `Gesture::from_str`, plus `none` for a face-less
    /// segment.  Returns `None` on any malformed segment.
    pub fn parse(script: &str) -> Option<Self> {
        let mut segments = Vec::new();
        for part in script.split(',') {
            let (label, ticks) = part.split_once(':')?;
            let ticks = ticks.trim().parse::<u32>().ok()?;
            if ticks == 0 {
                return None;
            }
            let snapshot = match label.trim() {
                "none" | "absent" => None,
                label => Some(synthetic_face(Gesture::from_str(label)?)),
            };
            segments.push((snapshot, ticks));
        }
        if segments.is_empty() {
            return None;
        }
        let remaining = segments[0].1;
        info!("scripted landmark source: {} segment(s)", segments.len());
        Some(Self {
            segments,
            segment: 0,
            remaining,
        })
    }
}

impl LandmarkSource for ScriptedLandmarkSource {
    fn availability(&self) -> Availability {
        Availability::Available
    }

    fn next_snapshot(&mut self) -> Option<FaceSnapshot> {
        if self.segment >= self.segments.len() {
            // Script exhausted: the face leaves the frame.
            return None;
        }
        let snapshot = self.segments[self.segment].0.clone();
        self.remaining -= 1;
        if self.remaining == 0 {
            self.segment += 1;
            if let Some((_, ticks)) = self.segments.get(self.segment) {
                self.remaining = *ticks;
            }
        }
        snapshot
    }
}

// ── Input source ───────────────────────────────────────────

/// Per-tick supplier of keyboard state.
pub trait InputSource {
    fn poll(&mut self) -> KeyboardInput;
}

/// Source used when no keyboard is wired up (scripted/CI runs).
pub struct NullInputSource;

impl InputSource for NullInputSource {
    fn poll(&mut self) -> KeyboardInput {
        KeyboardInput::default()
    }
}

// ── Synthetic faces ────────────────────────────────────────

/// A neutral reference face: closed mouth, relaxed brows, centered gaze.
fn base_face() -> FaceSnapshot {
    let mut s = FaceSnapshot::new([[0.0; 2]; LANDMARK_COUNT]);
    s.set_point(FaceLandmark::MouthCornerLeft, 0.44, 0.62);
    s.set_point(FaceLandmark::MouthCornerRight, 0.56, 0.62);
    s.set_point(FaceLandmark::UpperLip, 0.50, 0.600);
    s.set_point(FaceLandmark::LowerLip, 0.50, 0.608);
    s.set_point(FaceLandmark::LeftBrowOuter, 0.36, 0.35);
    s.set_point(FaceLandmark::LeftBrowMid, 0.40, 0.35);
    s.set_point(FaceLandmark::LeftBrowInner, 0.44, 0.35);
    s.set_point(FaceLandmark::RightBrowInner, 0.56, 0.35);
    s.set_point(FaceLandmark::RightBrowMid, 0.60, 0.35);
    s.set_point(FaceLandmark::RightBrowOuter, 0.64, 0.35);
    s.set_point(FaceLandmark::LeftEyelidTop, 0.40, 0.37);
    s.set_point(FaceLandmark::RightEyelidTop, 0.60, 0.37);
    s.set_point(FaceLandmark::LeftEyeOuter, 0.35, 0.40);
    s.set_point(FaceLandmark::LeftEyeInner, 0.45, 0.40);
    s.set_point(FaceLandmark::LeftIris, 0.40, 0.40);
    s.set_point(FaceLandmark::RightEyeInner, 0.55, 0.40);
    s.set_point(FaceLandmark::RightEyeOuter, 0.65, 0.40);
    s.set_point(FaceLandmark::RightIris, 0.60, 0.40);
    s
}

/// Synthesize a face exhibiting the given gesture.
///
/// The adjustments push each detector comfortably past its threshold
/// without tripping any higher-priority one.
pub fn synthetic_face(gesture: Gesture) -> FaceSnapshot {
    let mut s = base_face();
    match gesture {
        Gesture::Neutral => {}
        Gesture::EyebrowsRaised => {
            for l in FaceLandmark::left_brow_points() {
                let [x, _] = s.point(l);
                s.set_point(l, x, 0.32);
            }
            for l in FaceLandmark::right_brow_points() {
                let [x, _] = s.point(l);
                s.set_point(l, x, 0.32);
            }
        }
        Gesture::Smiling => {
            s.set_point(FaceLandmark::MouthCornerLeft, 0.40, 0.62);
            s.set_point(FaceLandmark::MouthCornerRight, 0.60, 0.62);
            s.set_point(FaceLandmark::UpperLip, 0.50, 0.600);
            s.set_point(FaceLandmark::LowerLip, 0.50, 0.620);
        }
        Gesture::LookingRight => {
            // Low iris ratio reads as looking right (mirrored mapping).
            s.set_point(FaceLandmark::LeftIris, 0.385, 0.40);
            s.set_point(FaceLandmark::RightIris, 0.585, 0.40);
        }
        Gesture::LookingLeft => {
            s.set_point(FaceLandmark::LeftIris, 0.415, 0.40);
            s.set_point(FaceLandmark::RightIris, 0.615, 0.40);
        }
        Gesture::MouthOpen => {
            // Narrow the mouth so the lip gap doesn't read as a smile.
            s.set_point(FaceLandmark::MouthCornerLeft, 0.455, 0.63);
            s.set_point(FaceLandmark::MouthCornerRight, 0.545, 0.63);
            s.set_point(FaceLandmark::UpperLip, 0.50, 0.600);
            s.set_point(FaceLandmark::LowerLip, 0.50, 0.660);
        }
    }
    s
}

// ── Tests ──────────────────────────────────────────────────
