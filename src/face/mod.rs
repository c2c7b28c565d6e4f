//! Face subsystem — landmark model and gesture classification.
//!
//! Provides:
//! - `landmarks`: the semantic facial-landmark set and per-tick snapshot
//! - `gesture`: threshold-based classification of a snapshot into a
//!   discrete gesture label
//!
//! Landmark detection itself (camera, face-mesh model) lives outside this
//! crate; snapshots arrive through `crate::source`.

pub mod gesture;
pub mod landmarks;

pub use gesture::{Gesture, GestureClassifier, GestureConfig};
pub use landmarks::{FaceLandmark, FaceSnapshot, LANDMARK_COUNT};
