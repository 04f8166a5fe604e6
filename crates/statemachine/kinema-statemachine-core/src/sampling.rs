//! Track sampling and the per-frame sample buffers.

use hashbrown::HashMap;

use crate::data::{KeyInterp, Keyframe, Track};
use crate::interp::mix_value;
use crate::value::Value;

/// Find the segment [i, i+1] containing normalized time `u`, returning
/// (i, i+1, local_t) with local_t normalized into the segment. Outside the
/// keyed range the nearest end key is held (i == i+1, local_t == 0).
fn find_segment(keys: &[Keyframe], u: f32) -> (usize, usize, f32) {
    let n = keys.len();
    if n <= 1 || u <= keys[0].stamp {
        return (0, 0, 0.0);
    }
    if u >= keys[n - 1].stamp {
        return (n - 1, n - 1, 0.0);
    }
    for i in 0..(n - 1) {
        let t0 = keys[i].stamp;
        let t1 = keys[i + 1].stamp;
        if u >= t0 && u <= t1 {
            let denom = (t1 - t0).max(f32::EPSILON);
            let lt = (u - t0) / denom;
            return (i, i + 1, lt.clamp(0.0, 1.0));
        }
    }
    (n - 1, n - 1, 0.0)
}

/// Sample a track at normalized time `u` in [0,1].
///
/// Empty tracks yield `None` (skipped by the runtime), single-key tracks are
/// constant, and `Bool` values always step regardless of the track interp.
pub fn sample_track(track: &Track, u: f32) -> Option<Value> {
    let keys = &track.keys;
    match keys.len() {
        0 => None,
        1 => Some(keys[0].value.clone()),
        _ => {
            let (i0, i1, lt) = find_segment(keys, u.clamp(0.0, 1.0));
            if i0 == i1 {
                return Some(keys[i0].value.clone());
            }
            let left = &keys[i0];
            let right = &keys[i1];
            match track.interp {
                KeyInterp::Step => Some(left.value.clone()),
                KeyInterp::Linear => Some(mix_value(&left.value, &right.value, lt)),
            }
        }
    }
}

/// One frame's worth of sampled property values for a single state instance.
#[derive(Default, Debug)]
pub(crate) struct SampleSet {
    map: HashMap<String, Value>,
}

impl SampleSet {
    #[inline]
    pub(crate) fn insert(&mut self, key: &str, value: Value) {
        self.map.insert(key.to_string(), value);
    }

    #[inline]
    pub(crate) fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Mix another sample set into this one with weight `t` toward `other`.
    /// Keys present on only one side pass through unchanged.
    pub(crate) fn mix_toward(&mut self, other: &SampleSet, t: f32) {
        for (key, theirs) in &other.map {
            match self.map.get_mut(key) {
                Some(ours) => *ours = mix_value(ours, theirs, t),
                None => {
                    self.map.insert(key.clone(), theirs.clone());
                }
            }
        }
    }

    /// Drain into (key, value) pairs sorted by key, so downstream change
    /// lists are deterministic across runs and instances.
    pub(crate) fn into_sorted(self) -> Vec<(String, Value)> {
        let mut pairs: Vec<(String, Value)> = self.map.into_iter().collect();
        pairs.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        pairs
    }
}
