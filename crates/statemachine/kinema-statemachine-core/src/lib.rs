//! Kinema state-machine core (engine-agnostic).
//!
//! The runtime that decides which animation(s) are playing, crossfades
//! between them, and produces per-frame blended property values. The host
//! embeds a [`StateMachineInstance`], mutates its inputs between frames, and
//! calls [`StateMachineInstance::advance`] once per render frame; the
//! returned [`Outputs`] feed the host's own object graph and renderer.
//!
//! Graph definitions arrive fully populated from an external
//! deserialization layer; [`StateMachine::new`] validates them (two passes:
//! local shape, then cross-references) before any instance can exist, so a
//! validated graph never errors during `advance`.

pub mod blend;
pub mod config;
pub mod data;
pub mod graph;
pub mod ids;
pub mod inputs;
pub mod instance;
pub mod interp;
pub mod layer;
pub mod machine;
pub mod outputs;
pub mod sampling;
pub mod validate;
pub mod value;

pub use blend::BlendStateDirectInstance;
pub use config::Config;
pub use data::{AnimationClip, KeyInterp, Keyframe, Track};
pub use graph::{
    AnimationState, BlendChild, BlendStateDirect, CompareOp, Condition, LayerDef, LayerState,
    StateMachineDef, StateNode, StateTransition, TransitionFlags,
};
pub use ids::{AnimId, InputIdx, LayerIdx, StateIdx};
pub use inputs::{InputDef, InputKind, InputSet};
pub use instance::StateInstance;
pub use machine::{StateMachine, StateMachineInstance};
pub use outputs::{Change, CoreEvent, Outputs};
pub use sampling::sample_track;
pub use validate::ValidationError;
pub use value::{Value, ValueKind};
