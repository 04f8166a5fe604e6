//! Two-phase graph validation.
//!
//! A definition is checked once, up front, so instances can run without any
//! error paths: first a local pass over each piece in isolation, then a
//! reference pass that resolves every cross-reference (targets, inputs,
//! animations, control chains). A `StateMachine` can only be built from a
//! definition that passed both.

use thiserror::Error;

use crate::graph::{Condition, LayerDef, LayerState, StateMachineDef};
use crate::ids::{InputIdx, StateIdx};
use crate::inputs::InputKind;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("layer '{layer}' state '{state}' transition {transition} targets state index {target} out of range")]
    DanglingTarget {
        layer: String,
        state: String,
        transition: usize,
        target: u32,
    },

    #[error("layer '{layer}' state '{state}' references undeclared input index {input}")]
    UndeclaredInput {
        layer: String,
        state: String,
        input: u32,
    },

    #[error("layer '{layer}' state '{state}' binds input '{input}' as {wanted:?} but it is declared {found:?}")]
    InputKindMismatch {
        layer: String,
        state: String,
        input: String,
        wanted: InputKind,
        found: InputKind,
    },

    #[error("layer '{layer}' state '{state}' references animation index {animation} out of range")]
    DanglingAnimation {
        layer: String,
        state: String,
        animation: u32,
    },

    #[error("layer '{layer}' has no Entry state")]
    MissingEntry { layer: String },

    #[error("layer '{layer}' declares more than one Entry state")]
    MultipleEntry { layer: String },

    #[error("layer '{layer}' declares more than one Any state")]
    MultipleAny { layer: String },

    #[error("layer '{layer}' has a cycle through its control states starting at '{state}'")]
    CyclicControlChain { layer: String, state: String },

    #[error("layer '{layer}' Exit state '{state}' has no outgoing transition")]
    ExitWithoutTransition { layer: String, state: String },

    #[error("animation '{clip}' is malformed: {reason}")]
    MalformedClip { clip: String, reason: String },

    #[error("layer '{layer}' state '{state}' transition {transition} is malformed: {reason}")]
    MalformedTransition {
        layer: String,
        state: String,
        transition: usize,
        reason: String,
    },

    #[error("layer '{layer}' blend state '{state}' has no children")]
    EmptyBlend { layer: String, state: String },

    #[error("layer '{layer}' state '{state}' is malformed: {reason}")]
    MalformedState {
        layer: String,
        state: String,
        reason: String,
    },
}

pub(crate) fn validate(def: &StateMachineDef) -> Result<(), ValidationError> {
    local_pass(def)?;
    reference_pass(def)
}

fn local_pass(def: &StateMachineDef) -> Result<(), ValidationError> {
    for clip in &def.animations {
        clip.validate_basic()
            .map_err(|reason| ValidationError::MalformedClip {
                clip: clip.name.clone(),
                reason,
            })?;
    }

    for layer in &def.layers {
        let mut entries = 0usize;
        let mut anys = 0usize;
        for node in &layer.states {
            match &node.state {
                LayerState::Entry => entries += 1,
                LayerState::Any => anys += 1,
                LayerState::Exit => {
                    if node.transitions.is_empty() {
                        return Err(ValidationError::ExitWithoutTransition {
                            layer: layer.name.clone(),
                            state: node.name.clone(),
                        });
                    }
                }
                LayerState::BlendDirect(blend) => {
                    if blend.children.is_empty() {
                        return Err(ValidationError::EmptyBlend {
                            layer: layer.name.clone(),
                            state: node.name.clone(),
                        });
                    }
                    for child in &blend.children {
                        if !child.threshold.is_finite() {
                            return Err(ValidationError::MalformedState {
                                layer: layer.name.clone(),
                                state: node.name.clone(),
                                reason: "blend child threshold must be finite".into(),
                            });
                        }
                        if !child.speed.is_finite() {
                            return Err(ValidationError::MalformedState {
                                layer: layer.name.clone(),
                                state: node.name.clone(),
                                reason: "blend child speed must be finite".into(),
                            });
                        }
                    }
                }
                LayerState::Animation(anim) => {
                    if !anim.speed.is_finite() {
                        return Err(ValidationError::MalformedState {
                            layer: layer.name.clone(),
                            state: node.name.clone(),
                            reason: "state speed must be finite".into(),
                        });
                    }
                }
            }

            for (i, t) in node.transitions.iter().enumerate() {
                if !(t.duration.is_finite() && t.duration >= 0.0) {
                    return Err(ValidationError::MalformedTransition {
                        layer: layer.name.clone(),
                        state: node.name.clone(),
                        transition: i,
                        reason: "duration must be finite and non-negative".into(),
                    });
                }
                if !(t.exit_time.is_finite() && t.exit_time >= 0.0) {
                    return Err(ValidationError::MalformedTransition {
                        layer: layer.name.clone(),
                        state: node.name.clone(),
                        transition: i,
                        reason: "exit_time must be finite and non-negative".into(),
                    });
                }
            }
        }
        if entries == 0 {
            return Err(ValidationError::MissingEntry {
                layer: layer.name.clone(),
            });
        }
        if entries > 1 {
            return Err(ValidationError::MultipleEntry {
                layer: layer.name.clone(),
            });
        }
        if anys > 1 {
            return Err(ValidationError::MultipleAny {
                layer: layer.name.clone(),
            });
        }
    }
    Ok(())
}

fn reference_pass(def: &StateMachineDef) -> Result<(), ValidationError> {
    let anim_count = def.animations.len() as u32;

    for layer in &def.layers {
        let state_count = layer.states.len() as u32;
        for node in &layer.states {
            for (i, t) in node.transitions.iter().enumerate() {
                if t.target.0 >= state_count {
                    return Err(ValidationError::DanglingTarget {
                        layer: layer.name.clone(),
                        state: node.name.clone(),
                        transition: i,
                        target: t.target.0,
                    });
                }
                for cond in &t.conditions {
                    check_condition_input(def, layer, &node.name, cond)?;
                }
            }

            match &node.state {
                LayerState::Animation(anim) => {
                    if anim.animation.0 >= anim_count {
                        return Err(ValidationError::DanglingAnimation {
                            layer: layer.name.clone(),
                            state: node.name.clone(),
                            animation: anim.animation.0,
                        });
                    }
                }
                LayerState::BlendDirect(blend) => {
                    for child in &blend.children {
                        if child.animation.0 >= anim_count {
                            return Err(ValidationError::DanglingAnimation {
                                layer: layer.name.clone(),
                                state: node.name.clone(),
                                animation: child.animation.0,
                            });
                        }
                        check_input_kind(
                            def,
                            layer,
                            &node.name,
                            child.input,
                            InputKind::Number,
                        )?;
                    }
                }
                _ => {}
            }
        }

        check_control_chains(layer)?;
    }
    Ok(())
}

fn check_condition_input(
    def: &StateMachineDef,
    layer: &LayerDef,
    state: &str,
    cond: &Condition,
) -> Result<(), ValidationError> {
    let wanted = match cond {
        Condition::Number { .. } => InputKind::Number,
        Condition::Bool { .. } => InputKind::Bool,
        Condition::Trigger { .. } => InputKind::Trigger,
    };
    check_input_kind(def, layer, state, cond.input(), wanted)
}

fn check_input_kind(
    def: &StateMachineDef,
    layer: &LayerDef,
    state: &str,
    input: InputIdx,
    wanted: InputKind,
) -> Result<(), ValidationError> {
    let decl = def.inputs.get(input.index()).ok_or_else(|| {
        ValidationError::UndeclaredInput {
            layer: layer.name.clone(),
            state: state.to_string(),
            input: input.0,
        }
    })?;
    if decl.kind() != wanted {
        return Err(ValidationError::InputKindMismatch {
            layer: layer.name.clone(),
            state: state.to_string(),
            input: decl.name().to_string(),
            wanted,
            found: decl.kind(),
        });
    }
    Ok(())
}

/// Control states resolve to a playable destination by following their first
/// outgoing edge. Walk that resolution from every control state; revisiting
/// a control state means the chain can never terminate.
fn check_control_chains(layer: &LayerDef) -> Result<(), ValidationError> {
    for (start, node) in layer.states.iter().enumerate() {
        if !node.state.is_control() {
            continue;
        }
        let mut visited = vec![false; layer.states.len()];
        let mut current = StateIdx(start as u32);
        loop {
            let state = layer.state(current);
            if !state.state.is_control() {
                break;
            }
            if visited[current.index()] {
                return Err(ValidationError::CyclicControlChain {
                    layer: layer.name.clone(),
                    state: node.name.clone(),
                });
            }
            visited[current.index()] = true;
            match state.transitions.first() {
                // Targets were bounds-checked above.
                Some(t) => current = t.target,
                // Entry/Any with no edges is allowed; the chain just ends.
                None => break,
            }
        }
    }
    Ok(())
}
