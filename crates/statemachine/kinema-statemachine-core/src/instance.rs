//! Per-state runtime instances.
//!
//! Instances carry all mutable playback state (clocks, blend weights); the
//! shared definition is passed back in on every call rather than owned, so
//! one definition can back any number of independent instances.

use crate::blend::BlendStateDirectInstance;
use crate::graph::{AnimationState, LayerState, StateMachineDef};
use crate::ids::{AnimId, StateIdx};
use crate::inputs::InputSet;
use crate::sampling::{sample_track, SampleSet};

/// Runtime counterpart of one graph state.
#[derive(Clone, Debug)]
pub enum StateInstance {
    Animation(AnimationStateInstance),
    BlendDirect(BlendStateDirectInstance),
    /// Entry, Exit and Any. No playable content; reports a normalized time
    /// of 1 so exit-time gates never block leaving it.
    System(SystemStateInstance),
}

impl StateInstance {
    pub(crate) fn make(def: &StateMachineDef, layer: usize, idx: StateIdx) -> StateInstance {
        let node = &def.layers[layer].states[idx.index()];
        match &node.state {
            LayerState::Animation(anim) => {
                StateInstance::Animation(AnimationStateInstance::make(idx, anim))
            }
            LayerState::BlendDirect(blend) => {
                StateInstance::BlendDirect(BlendStateDirectInstance::make(idx, blend))
            }
            LayerState::Entry | LayerState::Exit | LayerState::Any => {
                StateInstance::System(SystemStateInstance { state_idx: idx })
            }
        }
    }

    pub fn state_idx(&self) -> StateIdx {
        match self {
            StateInstance::Animation(i) => i.state_idx,
            StateInstance::BlendDirect(i) => i.state_idx(),
            StateInstance::System(i) => i.state_idx,
        }
    }

    pub(crate) fn advance(&mut self, dt: f32, def: &StateMachineDef, inputs: &InputSet) {
        match self {
            StateInstance::Animation(i) => i.advance(dt),
            StateInstance::BlendDirect(i) => i.advance(dt, def, inputs),
            StateInstance::System(_) => {}
        }
    }

    /// Playback position of the instance's own clock in clip-duration units.
    /// Unclamped: a looping animation's value keeps growing across loops, so
    /// exit times past 1 gate on later loops.
    pub fn normalized_time(&self, def: &StateMachineDef) -> f32 {
        match self {
            StateInstance::Animation(i) => i.normalized_time(def),
            StateInstance::BlendDirect(i) => i.normalized_time(def),
            StateInstance::System(_) => 1.0,
        }
    }

    pub(crate) fn sample(&self, def: &StateMachineDef, out: &mut SampleSet) {
        match self {
            StateInstance::Animation(i) => i.sample(def, out),
            StateInstance::BlendDirect(i) => i.sample(def, out),
            StateInstance::System(_) => {}
        }
    }
}

/// A single clip playing on its own clock.
#[derive(Clone, Debug)]
pub struct AnimationStateInstance {
    pub(crate) state_idx: StateIdx,
    animation: AnimId,
    speed: f32,
    looping: bool,
    /// Seconds since the instance was created.
    time: f32,
}

impl AnimationStateInstance {
    fn make(state_idx: StateIdx, state: &AnimationState) -> Self {
        Self {
            state_idx,
            animation: state.animation,
            speed: state.speed,
            looping: state.looping,
            time: 0.0,
        }
    }

    fn advance(&mut self, dt: f32) {
        self.time += dt * self.speed;
    }

    fn normalized_time(&self, def: &StateMachineDef) -> f32 {
        self.time / def.animation(self.animation).duration
    }

    fn sample(&self, def: &StateMachineDef, out: &mut SampleSet) {
        let clip = def.animation(self.animation);
        let raw = self.time / clip.duration;
        let u = if self.looping {
            raw.rem_euclid(1.0)
        } else {
            raw.clamp(0.0, 1.0)
        };
        for track in &clip.tracks {
            if let Some(value) = sample_track(track, u) {
                out.insert(&track.target, value);
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct SystemStateInstance {
    pub(crate) state_idx: StateIdx,
}
