//! Direct blend state runtime.
//!
//! Child weights are derived from the bound inputs each frame: children
//! sharing an input form one sorted threshold axis, and the input value is
//! interpolated piecewise-linearly along it, so each child contributes a hat
//! function peaking at its own threshold. Weights are normalized to sum 1;
//! when every raw weight is zero the previous frame's weights are held
//! rather than reset.
//!
//! All fan-out-proportional allocation (child contexts, threshold axes, the
//! raw weight buffer) happens once, at `make`; `advance` only rewrites the
//! buffers in place.

use kinema_math_core::nearly_zero;

use crate::graph::{BlendStateDirect, StateMachineDef};
use crate::ids::{AnimId, InputIdx, StateIdx};
use crate::inputs::InputSet;
use crate::sampling::{sample_track, SampleSet};

#[derive(Clone, Debug)]
struct BlendChildContext {
    animation: AnimId,
    speed: f32,
    /// Local clock in seconds; runs at the shared clock rate scaled by the
    /// child's own speed.
    time: f32,
    weight: f32,
}

/// Sorted threshold axis for one bound input; entries pair a threshold with
/// the owning child's index.
#[derive(Clone, Debug)]
struct BlendAxis {
    input: InputIdx,
    entries: Vec<(f32, usize)>,
}

/// Runtime instance of a [`BlendStateDirect`] state.
#[derive(Clone, Debug)]
pub struct BlendStateDirectInstance {
    state_idx: StateIdx,
    children: Vec<BlendChildContext>,
    axes: Vec<BlendAxis>,
    /// Per-child raw weights, rewritten each advance.
    raw: Vec<f32>,
    /// Shared clock in seconds, before per-child speed scaling.
    time: f32,
}

impl BlendStateDirectInstance {
    pub(crate) fn make(state_idx: StateIdx, state: &BlendStateDirect) -> Self {
        let children: Vec<BlendChildContext> = state
            .children
            .iter()
            .map(|c| BlendChildContext {
                animation: c.animation,
                speed: c.speed,
                time: 0.0,
                weight: 0.0,
            })
            .collect();

        let mut axes: Vec<BlendAxis> = Vec::new();
        for (i, c) in state.children.iter().enumerate() {
            match axes.iter_mut().find(|a| a.input == c.input) {
                Some(axis) => axis.entries.push((c.threshold, i)),
                None => axes.push(BlendAxis {
                    input: c.input,
                    entries: vec![(c.threshold, i)],
                }),
            }
        }
        for axis in &mut axes {
            axis.entries
                .sort_unstable_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        }

        Self {
            state_idx,
            raw: vec![0.0; children.len()],
            children,
            axes,
            time: 0.0,
        }
    }

    pub fn state_idx(&self) -> StateIdx {
        self.state_idx
    }

    pub fn weights(&self) -> Vec<f32> {
        self.children.iter().map(|c| c.weight).collect()
    }

    pub(crate) fn advance(&mut self, dt: f32, _def: &StateMachineDef, inputs: &InputSet) {
        self.time += dt;
        for child in &mut self.children {
            child.time += dt * child.speed;
        }
        self.update_weights(inputs);
    }

    /// Normalized position of the shared clock against the longest child
    /// clip, so exit-time gates see the slowest constituent complete.
    pub(crate) fn normalized_time(&self, def: &StateMachineDef) -> f32 {
        let longest = self
            .children
            .iter()
            .map(|c| def.animation(c.animation).duration)
            .fold(0.0f32, f32::max);
        if longest > 0.0 {
            self.time / longest
        } else {
            1.0
        }
    }

    fn update_weights(&mut self, inputs: &InputSet) {
        for w in &mut self.raw {
            *w = 0.0;
        }
        for axis in &self.axes {
            assign_axis_weights(&axis.entries, inputs.number(axis.input), &mut self.raw);
        }
        let total: f32 = self.raw.iter().sum();
        if nearly_zero(total) {
            // Hold the previous frame's weights.
            log::debug!("all blend weights zero; holding previous weights");
            return;
        }
        for (child, w) in self.children.iter_mut().zip(&self.raw) {
            child.weight = w / total;
        }
    }

    pub(crate) fn sample(&self, def: &StateMachineDef, out: &mut SampleSet) {
        // Iterated pairwise mix in declared order: each child folds in with
        // t = w / running_total, which reproduces the normalized weights
        // without a second pass.
        let mut running_total = 0.0f32;
        let mut first = true;
        for child in &self.children {
            if child.weight <= 0.0 {
                continue;
            }
            running_total += child.weight;
            let clip = def.animation(child.animation);
            let u = (child.time / clip.duration).rem_euclid(1.0);
            if first {
                for track in &clip.tracks {
                    if let Some(value) = sample_track(track, u) {
                        out.insert(&track.target, value);
                    }
                }
                first = false;
            } else {
                let mut theirs = SampleSet::default();
                for track in &clip.tracks {
                    if let Some(value) = sample_track(track, u) {
                        theirs.insert(&track.target, value);
                    }
                }
                out.mix_toward(&theirs, child.weight / running_total);
            }
        }
    }
}

/// Distribute `value` across one sorted threshold axis: the two entries
/// bracketing it split the weight linearly, outside the axis the end entry
/// takes 1, and a lone entry always takes 1. Coincident brackets split
/// evenly. A NaN value matches no bracket and contributes nothing.
fn assign_axis_weights(entries: &[(f32, usize)], value: f32, raw: &mut [f32]) {
    if entries.len() == 1 {
        raw[entries[0].1] = 1.0;
        return;
    }
    let (first, last) = (entries[0], entries[entries.len() - 1]);
    if value <= first.0 {
        raw[first.1] = 1.0;
        return;
    }
    if value >= last.0 {
        raw[last.1] = 1.0;
        return;
    }
    for pair in entries.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if value >= lo.0 && value <= hi.0 {
            let span = hi.0 - lo.0;
            if nearly_zero(span) {
                raw[lo.1] = 0.5;
                raw[hi.1] = 0.5;
            } else {
                raw[lo.1] = (hi.0 - value) / span;
                raw[hi.1] = (value - lo.0) / span;
            }
            return;
        }
    }
}
