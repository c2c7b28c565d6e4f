//! Gesture classification from facial landmark snapshots.
//!
//! Evaluates four boolean detectors (eyebrows raised, smiling, gaze
//! direction, mouth open) against fixed thresholds and resolves them in a
//! strict priority order.  Stateless: the classifier is a pure function of
//! the snapshot it is handed.

use tracing::debug;

use super::landmarks::{FaceLandmark, FaceSnapshot};

// ── Gesture label ──────────────────────────────────────────

/// Discrete facial gesture driving the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// Both or either eyebrow raised well above the eyelid.
    EyebrowsRaised,
    /// Mouth wide relative to its height.
    Smiling,
    /// Gaze held toward the left edge of the image.
    LookingLeft,
    /// Gaze held toward the right edge of the image.
    LookingRight,
    /// Lips parted beyond the open threshold.
    MouthOpen,
    /// No detector fired, or no face visible.
    Neutral,
}

impl Gesture {
    /// String representation for logs and status display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EyebrowsRaised => "eyebrows-raised",
            Self::Smiling => "smiling",
            Self::LookingLeft => "looking-left",
            Self::LookingRight => "looking-right",
            Self::MouthOpen => "mouth-open",
            Self::Neutral => "neutral",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "eyebrows-raised" | "eyebrows" => Some(Self::EyebrowsRaised),
            "smiling" | "smile" => Some(Self::Smiling),
            "looking-left" | "left" => Some(Self::LookingLeft),
            "looking-right" | "right" => Some(Self::LookingRight),
            "mouth-open" | "mouth" => Some(Self::MouthOpen),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

// ── Config ─────────────────────────────────────────────────

/// Detection thresholds, in normalized image coordinates.
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// Minimum mouth width/height ratio for a smile.
    pub smile_ratio: f32,
    /// Mouth heights below this are treated as a closed mouth and never
    /// smile (guards the ratio's denominator).
    pub mouth_height_floor: f32,
    /// Minimum eyelid-to-eyebrow gap for a raised eyebrow.
    pub brow_gap: f32,
    /// Minimum lip separation for an open mouth.
    pub mouth_open_gap: f32,
    /// Iris ratios below this read as gaze toward one side.
    pub gaze_low: f32,
    /// Iris ratios above this read as gaze toward the other side.
    pub gaze_high: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            smile_ratio: 1.6,
            mouth_height_floor: 0.01,
            brow_gap: 0.03,
            mouth_open_gap: 0.05,
            gaze_low: 0.4,
            gaze_high: 0.6,
        }
    }
}

// ── Classifier ─────────────────────────────────────────────

/// Priority-ordered gesture classifier.
///
/// Detector priority, highest first: eyebrows raised, smiling, gaze
/// direction, mouth open.  The first detector that fires determines the
/// label; otherwise the snapshot is `Neutral`.
///
/// The gaze mapping is deliberately inverted from the raw geometric
/// reading: an iris ratio below `gaze_low` yields `LookingRight` and one
/// above `gaze_high` yields `LookingLeft`.  Whether that matches the
/// operator's physical left/right depends on the camera mirroring the
/// image, which is a calibration concern upstream of this crate — tune
/// there rather than swapping the mapping here.
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    pub config: GestureConfig,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        Self { config }
    }

    /// Classify a snapshot.  An absent snapshot is `Neutral`; callers use
    /// the absence itself as the no-face signal.
    pub fn classify(&self, snapshot: Option<&FaceSnapshot>) -> Gesture {
        let Some(snapshot) = snapshot else {
            return Gesture::Neutral;
        };

        let gesture = if self.eyebrows_raised(snapshot) {
            Gesture::EyebrowsRaised
        } else if self.is_smiling(snapshot) {
            Gesture::Smiling
        } else if let Some(direction) = self.gaze_direction(snapshot) {
            direction
        } else if self.mouth_open(snapshot) {
            Gesture::MouthOpen
        } else {
            Gesture::Neutral
        };

        if gesture != Gesture::Neutral {
            debug!("gesture detected: {}", gesture.as_str());
        }
        gesture
    }

    /// Mouth wide relative to its height.
    fn is_smiling(&self, snapshot: &FaceSnapshot) -> bool {
        let mouth_width = (snapshot.x(FaceLandmark::MouthCornerRight)
            - snapshot.x(FaceLandmark::MouthCornerLeft))
        .abs();
        let mouth_height =
            (snapshot.y(FaceLandmark::LowerLip) - snapshot.y(FaceLandmark::UpperLip)).abs();

        if mouth_height < self.config.mouth_height_floor {
            return false;
        }
        mouth_width / mouth_height > self.config.smile_ratio
    }

    /// Either eyebrow held above its eyelid by more than the gap threshold.
    /// y grows downward, so a raised brow makes `eyelid_y - brow_y` large.
    fn eyebrows_raised(&self, snapshot: &FaceSnapshot) -> bool {
        let left_brow_y = snapshot.mean_y(&FaceLandmark::left_brow_points());
        let right_brow_y = snapshot.mean_y(&FaceLandmark::right_brow_points());

        let left_gap = snapshot.y(FaceLandmark::LeftEyelidTop) - left_brow_y;
        let right_gap = snapshot.y(FaceLandmark::RightEyelidTop) - right_brow_y;

        left_gap > self.config.brow_gap || right_gap > self.config.brow_gap
    }

    /// Sustained gaze toward either side, or `None` when centered.
    fn gaze_direction(&self, snapshot: &FaceSnapshot) -> Option<Gesture> {
        let left_ratio = iris_ratio(
            snapshot.x(FaceLandmark::LeftIris),
            snapshot.x(FaceLandmark::LeftEyeOuter),
            snapshot.x(FaceLandmark::LeftEyeInner),
        );
        let right_ratio = iris_ratio(
            snapshot.x(FaceLandmark::RightIris),
            snapshot.x(FaceLandmark::RightEyeInner),
            snapshot.x(FaceLandmark::RightEyeOuter),
        );
        let avg = (left_ratio + right_ratio) / 2.0;

        if avg < self.config.gaze_low {
            Some(Gesture::LookingRight)
        } else if avg > self.config.gaze_high {
            Some(Gesture::LookingLeft)
        } else {
            None
        }
    }

    /// Lips parted beyond the open threshold.
    fn mouth_open(&self, snapshot: &FaceSnapshot) -> bool {
        snapshot.y(FaceLandmark::LowerLip) - snapshot.y(FaceLandmark::UpperLip)
            > self.config.mouth_open_gap
    }
}

/// Position of the iris between an eye's two horizontal corners, as a
/// fraction of the corner-to-corner span.
fn iris_ratio(iris_x: f32, near_x: f32, far_x: f32) -> f32 {
    (iris_x - near_x) / (far_x - near_x)
}

// ── Test helpers ───────────────────────────────────────────

#[cfg(test)]
pub(crate) fn neutral_snapshot() -> FaceSnapshot {
    use super::landmarks::LANDMARK_COUNT;

    let mut s = FaceSnapshot::new([[0.0; 2]; LANDMARK_COUNT]);
    // Closed mouth: tiny lip separation keeps both smile and open checks off.
    s.set_point(FaceLandmark::MouthCornerLeft, 0.44, 0.62);
    s.set_point(FaceLandmark::MouthCornerRight, 0.56, 0.62);
    s.set_point(FaceLandmark::UpperLip, 0.50, 0.600);
    s.set_point(FaceLandmark::LowerLip, 0.50, 0.608);
    // Brows sit 0.02 above the eyelids — under the raise threshold.
    s.set_point(FaceLandmark::LeftBrowOuter, 0.36, 0.35);
    s.set_point(FaceLandmark::LeftBrowMid, 0.40, 0.35);
    s.set_point(FaceLandmark::LeftBrowInner, 0.44, 0.35);
    s.set_point(FaceLandmark::RightBrowInner, 0.56, 0.35);
    s.set_point(FaceLandmark::RightBrowMid, 0.60, 0.35);
    s.set_point(FaceLandmark::RightBrowOuter, 0.64, 0.35);
    s.set_point(FaceLandmark::LeftEyelidTop, 0.40, 0.37);
    s.set_point(FaceLandmark::RightEyelidTop, 0.60, 0.37);
    // Irises centered between the eye corners (ratio 0.5 each).
    s.set_point(FaceLandmark::LeftEyeOuter, 0.35, 0.40);
    s.set_point(FaceLandmark::LeftEyeInner, 0.45, 0.40);
    s.set_point(FaceLandmark::LeftIris, 0.40, 0.40);
    s.set_point(FaceLandmark::RightEyeInner, 0.55, 0.40);
    s.set_point(FaceLandmark::RightEyeOuter, 0.65, 0.40);
    s.set_point(FaceLandmark::RightIris, 0.60, 0.40);
    s
}

// ── Tests ──────────────────────────────────────────────────
