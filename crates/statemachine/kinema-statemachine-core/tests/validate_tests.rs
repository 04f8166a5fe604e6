use kinema_statemachine_core::{
    AnimationClip, AnimationState, AnimId, BlendChild, BlendStateDirect, Condition, InputDef,
    InputIdx, Keyframe, KeyInterp, LayerDef, LayerState, StateIdx, StateMachine, StateMachineDef,
    StateNode, StateTransition, Track, ValidationError, Value,
};

fn clip(name: &str) -> AnimationClip {
    AnimationClip {
        name: name.to_string(),
        duration: 1.0,
        tracks: vec![Track {
            target: "x".into(),
            interp: KeyInterp::Linear,
            keys: vec![Keyframe {
                stamp: 0.0,
                value: Value::Float(0.0),
            }],
        }],
    }
}

fn anim_node(name: &str, anim: u32) -> StateNode {
    StateNode::new(name, LayerState::Animation(AnimationState::new(AnimId(anim))))
}

fn single_layer(states: Vec<StateNode>) -> StateMachineDef {
    StateMachineDef {
        name: "m".into(),
        animations: vec![clip("a")],
        inputs: vec![InputDef::Number {
            name: "x".into(),
            default: 0.0,
        }],
        layers: vec![LayerDef {
            name: "base".into(),
            states,
        }],
    }
}

fn entry_to(idx: u32) -> StateNode {
    StateNode::new("entry", LayerState::Entry)
        .with_transition(StateTransition::new(StateIdx(idx)))
}

#[test]
fn accepts_a_minimal_valid_graph() {
    let def = single_layer(vec![entry_to(1), anim_node("A", 0)]);
    assert!(StateMachine::new(def).is_ok());
}

#[test]
fn rejects_out_of_range_target() {
    let def = single_layer(vec![
        entry_to(1),
        anim_node("A", 0).with_transition(StateTransition::new(StateIdx(99))),
    ]);
    assert!(matches!(
        StateMachine::new(def),
        Err(ValidationError::DanglingTarget { target: 99, .. })
    ));
}

#[test]
fn rejects_undeclared_input() {
    let def = single_layer(vec![
        entry_to(1),
        anim_node("A", 0).with_transition(StateTransition::new(StateIdx(0)).with_condition(
            Condition::Bool {
                input: InputIdx(5),
                value: true,
            },
        )),
    ]);
    assert!(matches!(
        StateMachine::new(def),
        Err(ValidationError::UndeclaredInput { input: 5, .. })
    ));
}

#[test]
fn rejects_condition_on_wrong_input_kind() {
    // Input 0 is a Number; a Bool condition cannot bind it.
    let def = single_layer(vec![
        entry_to(1),
        anim_node("A", 0).with_transition(StateTransition::new(StateIdx(0)).with_condition(
            Condition::Bool {
                input: InputIdx(0),
                value: true,
            },
        )),
    ]);
    assert!(matches!(
        StateMachine::new(def),
        Err(ValidationError::InputKindMismatch { .. })
    ));
}

#[test]
fn rejects_out_of_range_animation() {
    let def = single_layer(vec![entry_to(1), anim_node("A", 7)]);
    assert!(matches!(
        StateMachine::new(def),
        Err(ValidationError::DanglingAnimation { animation: 7, .. })
    ));
}

#[test]
fn rejects_layer_without_entry() {
    let def = single_layer(vec![anim_node("A", 0)]);
    assert!(matches!(
        StateMachine::new(def),
        Err(ValidationError::MissingEntry { .. })
    ));
}

#[test]
fn rejects_duplicate_entry() {
    let def = single_layer(vec![entry_to(2), entry_to(2), anim_node("A", 0)]);
    assert!(matches!(
        StateMachine::new(def),
        Err(ValidationError::MultipleEntry { .. })
    ));
}

#[test]
fn rejects_duplicate_any() {
    let def = single_layer(vec![
        entry_to(3),
        StateNode::new("any1", LayerState::Any),
        StateNode::new("any2", LayerState::Any),
        anim_node("A", 0),
    ]);
    assert!(matches!(
        StateMachine::new(def),
        Err(ValidationError::MultipleAny { .. })
    ));
}

#[test]
fn rejects_cycle_through_control_states() {
    // Two Exit states whose first edges point at each other; resolution
    // could never terminate.
    let def = single_layer(vec![
        entry_to(3),
        StateNode::new("exit1", LayerState::Exit)
            .with_transition(StateTransition::new(StateIdx(2))),
        StateNode::new("exit2", LayerState::Exit)
            .with_transition(StateTransition::new(StateIdx(1))),
        anim_node("A", 0),
    ]);
    assert!(matches!(
        StateMachine::new(def),
        Err(ValidationError::CyclicControlChain { .. })
    ));
}

#[test]
fn rejects_exit_with_no_edges() {
    let def = single_layer(vec![
        entry_to(2),
        StateNode::new("exit", LayerState::Exit),
        anim_node("A", 0),
    ]);
    assert!(matches!(
        StateMachine::new(def),
        Err(ValidationError::ExitWithoutTransition { .. })
    ));
}

#[test]
fn rejects_malformed_clip() {
    let mut def = single_layer(vec![entry_to(1), anim_node("A", 0)]);
    def.animations[0].duration = 0.0;
    assert!(matches!(
        StateMachine::new(def),
        Err(ValidationError::MalformedClip { .. })
    ));
}

#[test]
fn rejects_non_finite_transition_duration() {
    let def = single_layer(vec![
        entry_to(1),
        anim_node("A", 0)
            .with_transition(StateTransition::new(StateIdx(0)).with_duration(f32::NAN)),
    ]);
    assert!(matches!(
        StateMachine::new(def),
        Err(ValidationError::MalformedTransition { .. })
    ));
}

#[test]
fn rejects_negative_exit_time() {
    let def = single_layer(vec![
        entry_to(1),
        anim_node("A", 0)
            .with_transition(StateTransition::new(StateIdx(0)).with_exit_time(-0.5)),
    ]);
    assert!(matches!(
        StateMachine::new(def),
        Err(ValidationError::MalformedTransition { .. })
    ));
}

#[test]
fn rejects_childless_blend() {
    let def = single_layer(vec![
        entry_to(1),
        StateNode::new(
            "blend",
            LayerState::BlendDirect(BlendStateDirect { children: vec![] }),
        ),
    ]);
    assert!(matches!(
        StateMachine::new(def),
        Err(ValidationError::EmptyBlend { .. })
    ));
}

#[test]
fn rejects_non_finite_blend_threshold() {
    let def = single_layer(vec![
        entry_to(1),
        StateNode::new(
            "blend",
            LayerState::BlendDirect(BlendStateDirect {
                children: vec![BlendChild {
                    animation: AnimId(0),
                    input: InputIdx(0),
                    threshold: f32::NAN,
                    speed: 1.0,
                }],
            }),
        ),
    ]);
    assert!(matches!(
        StateMachine::new(def),
        Err(ValidationError::MalformedState { .. })
    ));
}

#[test]
fn rejects_non_finite_state_speed() {
    let mut state = AnimationState::new(AnimId(0));
    state.speed = f32::INFINITY;
    let def = single_layer(vec![
        entry_to(1),
        StateNode::new("A", LayerState::Animation(state)),
    ]);
    assert!(matches!(
        StateMachine::new(def),
        Err(ValidationError::MalformedState { .. })
    ));
}

#[test]
fn rejects_blend_child_bound_to_non_number_input() {
    let mut def = single_layer(vec![
        entry_to(1),
        StateNode::new(
            "blend",
            LayerState::BlendDirect(BlendStateDirect {
                children: vec![BlendChild {
                    animation: AnimId(0),
                    input: InputIdx(0),
                    threshold: 0.0,
                    speed: 1.0,
                }],
            }),
        ),
    ]);
    def.inputs = vec![InputDef::Bool {
        name: "flag".into(),
        default: false,
    }];
    assert!(matches!(
        StateMachine::new(def),
        Err(ValidationError::InputKindMismatch { .. })
    ));
}
