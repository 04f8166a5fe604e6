//! State graph definitions: states, transitions, guard conditions.
//!
//! Definitions are immutable once validated; all runtime mutation lives in
//! instances ([`crate::instance`], [`crate::layer`]).

use serde::{Deserialize, Serialize};

use crate::data::AnimationClip;
use crate::ids::{AnimId, InputIdx, StateIdx};
use crate::inputs::{InputDef, InputSet};

/// Transition toggles, stored as the authored bit encoding.
///
/// `DISABLED` is direct: bit set means the edge is ignored during
/// arbitration. `PAUSE_ON_EXIT` and `ENABLE_EXIT_TIME` are stored with
/// inverted sense in authored content: the bit set means the behavior is
/// *off*. The accessors, not the raw bits, are the behavioral contract;
/// always go through them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionFlags(pub u32);

impl TransitionFlags {
    pub const DISABLED: u32 = 1 << 0;
    pub const PAUSE_ON_EXIT: u32 = 1 << 1;
    pub const ENABLE_EXIT_TIME: u32 = 1 << 2;

    #[inline]
    pub fn is_disabled(self) -> bool {
        self.0 & Self::DISABLED == Self::DISABLED
    }

    /// Whether the outgoing animation is held at exit or keeps advancing
    /// during mixing.
    #[inline]
    pub fn pause_on_exit(self) -> bool {
        self.0 & Self::PAUSE_ON_EXIT != Self::PAUSE_ON_EXIT
    }

    /// Whether exit time gates this transition. All other conditions still
    /// apply; the exit time is effectively ANDed with the rest.
    #[inline]
    pub fn enable_exit_time(self) -> bool {
        self.0 & Self::ENABLE_EXIT_TIME != Self::ENABLE_EXIT_TIME
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Eq,
    NotEq,
}

/// Guard on a transition, evaluated against the instance's current inputs.
/// Numeric guards use plain float comparison semantics: on a NaN input the
/// ordered operators and `Eq` are false, while `NotEq` is true and will
/// select its edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Condition {
    Number {
        input: InputIdx,
        op: CompareOp,
        value: f32,
    },
    Bool {
        input: InputIdx,
        value: bool,
    },
    Trigger {
        input: InputIdx,
    },
}

impl Condition {
    pub(crate) fn evaluate(&self, inputs: &InputSet) -> bool {
        match self {
            Condition::Number { input, op, value } => {
                let current = inputs.number(*input);
                match op {
                    CompareOp::Less => current < *value,
                    CompareOp::LessEq => current <= *value,
                    CompareOp::Greater => current > *value,
                    CompareOp::GreaterEq => current >= *value,
                    CompareOp::Eq => current == *value,
                    CompareOp::NotEq => current != *value,
                }
            }
            Condition::Bool { input, value } => inputs.boolean(*input) == *value,
            Condition::Trigger { input } => inputs.trigger(*input),
        }
    }

    pub(crate) fn input(&self) -> InputIdx {
        match self {
            Condition::Number { input, .. } => *input,
            Condition::Bool { input, .. } => *input,
            Condition::Trigger { input } => *input,
        }
    }
}

/// Directed edge between two states of the same layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    pub target: StateIdx,
    /// Crossfade duration in seconds; 0 is an instantaneous cut.
    #[serde(default)]
    pub duration: f32,
    /// Normalized playback position of the source state that gates this
    /// edge when the exit-time flag is enabled. May exceed 1 to gate on a
    /// later loop of a looping source.
    #[serde(default)]
    pub exit_time: f32,
    #[serde(default)]
    pub flags: TransitionFlags,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl StateTransition {
    /// An enabled, condition-free, instantaneous edge. Exit time and
    /// pause-on-exit start off (their flag bits set, per the inverted
    /// encoding).
    pub fn new(target: StateIdx) -> Self {
        Self {
            target,
            duration: 0.0,
            exit_time: 0.0,
            flags: TransitionFlags(
                TransitionFlags::PAUSE_ON_EXIT | TransitionFlags::ENABLE_EXIT_TIME,
            ),
            conditions: Vec::new(),
        }
    }

    pub fn with_duration(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    /// Gate on the source's normalized playback position reaching `t`.
    pub fn with_exit_time(mut self, t: f32) -> Self {
        self.exit_time = t;
        self.flags.0 &= !TransitionFlags::ENABLE_EXIT_TIME;
        self
    }

    /// Freeze the source instance's clock for the whole crossfade.
    pub fn pausing_on_exit(mut self) -> Self {
        self.flags.0 &= !TransitionFlags::PAUSE_ON_EXIT;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.flags.0 |= TransitionFlags::DISABLED;
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }
}

/// A single animation clip played by a state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationState {
    pub animation: AnimId,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default)]
    pub looping: bool,
}

fn default_speed() -> f32 {
    1.0
}

impl AnimationState {
    pub fn new(animation: AnimId) -> Self {
        Self {
            animation,
            speed: 1.0,
            looping: false,
        }
    }
}

/// One constituent animation of a blend space, bound to a named input at a
/// threshold along that input's axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlendChild {
    pub animation: AnimId,
    pub input: InputIdx,
    pub threshold: f32,
    #[serde(default = "default_speed")]
    pub speed: f32,
}

/// Blend space mixing N animations by weights derived from input values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlendStateDirect {
    pub children: Vec<BlendChild>,
}

/// Node in the state graph. `Entry`, `Exit` and `Any` are graph control
/// nodes with no playable content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum LayerState {
    Animation(AnimationState),
    BlendDirect(BlendStateDirect),
    Entry,
    Exit,
    Any,
}

impl LayerState {
    pub fn is_control(&self) -> bool {
        matches!(
            self,
            LayerState::Entry | LayerState::Exit | LayerState::Any
        )
    }
}

/// A state together with its outgoing transitions, in declared order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateNode {
    pub name: String,
    pub state: LayerState,
    #[serde(default)]
    pub transitions: Vec<StateTransition>,
}

impl StateNode {
    pub fn new(name: &str, state: LayerState) -> Self {
        Self {
            name: name.to_string(),
            state,
            transitions: Vec::new(),
        }
    }

    pub fn with_transition(mut self, transition: StateTransition) -> Self {
        self.transitions.push(transition);
        self
    }
}

/// A layer owns its state graph; at runtime at most two of its states are
/// live at once (active plus mixing-out).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerDef {
    pub name: String,
    pub states: Vec<StateNode>,
}

impl LayerDef {
    pub fn state(&self, idx: StateIdx) -> &StateNode {
        &self.states[idx.index()]
    }

    pub fn entry_index(&self) -> Option<StateIdx> {
        self.states
            .iter()
            .position(|s| matches!(s.state, LayerState::Entry))
            .map(|i| StateIdx(i as u32))
    }

    pub fn any_index(&self) -> Option<StateIdx> {
        self.states
            .iter()
            .position(|s| matches!(s.state, LayerState::Any))
            .map(|i| StateIdx(i as u32))
    }
}

/// The complete, immutable definition a state machine validates and
/// instances share.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateMachineDef {
    pub name: String,
    #[serde(default)]
    pub animations: Vec<AnimationClip>,
    #[serde(default)]
    pub inputs: Vec<InputDef>,
    pub layers: Vec<LayerDef>,
}

impl StateMachineDef {
    pub fn animation(&self, id: AnimId) -> &AnimationClip {
        &self.animations[id.index()]
    }
}
