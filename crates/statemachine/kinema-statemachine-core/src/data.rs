//! Animation clip data model.
//!
//! Clips arrive fully populated from the external deserialization layer and
//! are owned by the [`StateMachineDef`](crate::graph::StateMachineDef);
//! states reference them by [`AnimId`](crate::ids::AnimId) index.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Per-segment timing of a track.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyInterp {
    /// Hold the left key until the next.
    Step,
    /// Component-wise linear blend between keys.
    #[default]
    Linear,
}

/// A single keyframe in normalized time [0,1] within the clip duration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Keyframe {
    pub stamp: f32,
    pub value: Value,
}

/// A track targeting one animated property by its canonical key.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Track {
    pub target: String,
    #[serde(default)]
    pub interp: KeyInterp,
    pub keys: Vec<Keyframe>,
}

/// A linear animation clip: a set of tracks over a fixed duration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    /// Duration in seconds (authoritative for mapping normalized stamps).
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    /// Basic invariants: positive finite duration, finite monotonic stamps
    /// in [0,1].
    pub fn validate_basic(&self) -> Result<(), String> {
        if !(self.duration > 0.0 && self.duration.is_finite()) {
            return Err("clip duration must be positive and finite".into());
        }
        for track in &self.tracks {
            let mut last = -f32::INFINITY;
            for key in &track.keys {
                if !key.stamp.is_finite() || key.stamp < 0.0 || key.stamp > 1.0 {
                    return Err(format!(
                        "keyframe stamp must be finite and in [0,1] for '{}'",
                        track.target
                    ));
                }
                if key.stamp < last {
                    return Err(format!(
                        "keyframe stamps must be non-decreasing for '{}'",
                        track.target
                    ));
                }
                last = key.stamp;
            }
        }
        Ok(())
    }
}
