use kinema_statemachine_core::{
    AnimationClip, AnimId, BlendChild, BlendStateDirect, InputDef, InputIdx, Keyframe, KeyInterp,
    LayerDef, LayerIdx, LayerState, StateIdx, StateMachine, StateMachineDef, StateNode,
    StateTransition, Track, Value,
};

fn const_clip(name: &str, target: &str, value: f32) -> AnimationClip {
    AnimationClip {
        name: name.to_string(),
        duration: 1.0,
        tracks: vec![Track {
            target: target.to_string(),
            interp: KeyInterp::Linear,
            keys: vec![Keyframe {
                stamp: 0.0,
                value: Value::Float(value),
            }],
        }],
    }
}

fn ramp_clip(name: &str, target: &str, from: f32, to: f32, duration: f32) -> AnimationClip {
    AnimationClip {
        name: name.to_string(),
        duration,
        tracks: vec![Track {
            target: target.to_string(),
            interp: KeyInterp::Linear,
            keys: vec![
                Keyframe {
                    stamp: 0.0,
                    value: Value::Float(from),
                },
                Keyframe {
                    stamp: 1.0,
                    value: Value::Float(to),
                },
            ],
        }],
    }
}

fn child(anim: u32, threshold: f32, speed: f32) -> BlendChild {
    BlendChild {
        animation: AnimId(anim),
        input: InputIdx(0),
        threshold,
        speed,
    }
}

fn blend_def(animations: Vec<AnimationClip>, children: Vec<BlendChild>) -> StateMachineDef {
    StateMachineDef {
        name: "m".into(),
        animations,
        inputs: vec![InputDef::Number {
            name: "t".into(),
            default: 0.0,
        }],
        layers: vec![LayerDef {
            name: "base".into(),
            states: vec![
                StateNode::new("entry", LayerState::Entry)
                    .with_transition(StateTransition::new(StateIdx(1))),
                StateNode::new(
                    "blend",
                    LayerState::BlendDirect(BlendStateDirect { children }),
                ),
            ],
        }],
    }
}

fn change_value(outputs: &kinema_statemachine_core::Outputs, key: &str) -> Option<f32> {
    outputs.changes.iter().find_map(|c| {
        if c.key == key {
            match c.value {
                Value::Float(v) => Some(v),
                _ => None,
            }
        } else {
            None
        }
    })
}

fn approx(a: f32, b: f32) {
    assert!((a - b).abs() < 1e-5, "left={a} right={b}");
}

#[test]
fn midpoint_splits_weight_evenly() {
    let def = blend_def(
        vec![const_clip("lo", "x", 0.0), const_clip("hi", "x", 10.0)],
        vec![child(0, 0.0, 1.0), child(1, 1.0, 1.0)],
    );
    let machine = StateMachine::new(def).unwrap();
    let mut inst = machine.instance();
    inst.set_number("t", 0.5);
    let outputs = inst.advance(0.1);
    approx(change_value(outputs, "x").unwrap(), 5.0);
}

#[test]
fn axis_ends_take_full_weight() {
    let def = blend_def(
        vec![const_clip("lo", "x", 0.0), const_clip("hi", "x", 10.0)],
        vec![child(0, 0.0, 1.0), child(1, 1.0, 1.0)],
    );
    let machine = StateMachine::new(def).unwrap();

    let mut inst = machine.instance();
    inst.set_number("t", 0.0);
    approx(change_value(inst.advance(0.1), "x").unwrap(), 0.0);

    // Outside the axis clamps to the end child.
    let mut inst = machine.instance();
    inst.set_number("t", 7.0);
    approx(change_value(inst.advance(0.1), "x").unwrap(), 10.0);
}

#[test]
fn three_children_interpolate_between_neighbors() {
    let def = blend_def(
        vec![
            const_clip("a", "x", 0.0),
            const_clip("b", "x", 10.0),
            const_clip("c", "x", 100.0),
        ],
        vec![child(0, 0.0, 1.0), child(1, 1.0, 1.0), child(2, 2.0, 1.0)],
    );
    let machine = StateMachine::new(def).unwrap();
    let mut inst = machine.instance();
    // Between the second and third thresholds; the first contributes 0.
    inst.set_number("t", 1.25);
    approx(change_value(inst.advance(0.1), "x").unwrap(), 32.5);
}

#[test]
fn zero_weight_set_holds_previous_weights() {
    let def = blend_def(
        vec![const_clip("lo", "x", 0.0), const_clip("hi", "x", 10.0)],
        vec![child(0, 0.0, 1.0), child(1, 1.0, 1.0)],
    );
    let machine = StateMachine::new(def).unwrap();
    let mut inst = machine.instance();
    inst.set_number("t", 0.5);
    approx(change_value(inst.advance(0.1), "x").unwrap(), 5.0);

    // A NaN input produces an all-zero raw weight set; the previous frame's
    // weights stay in effect.
    inst.set_number("t", f32::NAN);
    approx(change_value(inst.advance(0.1), "x").unwrap(), 5.0);
}

#[test]
fn children_run_their_own_clocks() {
    let def = blend_def(
        vec![
            ramp_clip("slow", "x", 0.0, 10.0, 1.0),
            ramp_clip("fast", "x", 0.0, 20.0, 1.0),
        ],
        vec![child(0, 0.0, 1.0), child(1, 1.0, 2.0)],
    );
    let machine = StateMachine::new(def).unwrap();
    let mut inst = machine.instance();
    inst.set_number("t", 0.5);
    // After 0.25s: slow at u=0.25 -> 2.5, fast at u=0.5 -> 10.
    let outputs = inst.advance(0.25);
    approx(change_value(outputs, "x").unwrap(), 6.25);
}

#[test]
fn children_on_different_inputs_form_separate_axes() {
    // Each child is alone on its own input's threshold axis, so each gets a
    // raw weight of 1 regardless of the input values; normalization splits
    // them evenly.
    let def = StateMachineDef {
        name: "m".into(),
        animations: vec![const_clip("lo", "x", 0.0), const_clip("hi", "x", 10.0)],
        inputs: vec![
            InputDef::Number {
                name: "t".into(),
                default: 0.0,
            },
            InputDef::Number {
                name: "u".into(),
                default: 0.0,
            },
        ],
        layers: vec![LayerDef {
            name: "base".into(),
            states: vec![
                StateNode::new("entry", LayerState::Entry)
                    .with_transition(StateTransition::new(StateIdx(1))),
                StateNode::new(
                    "blend",
                    LayerState::BlendDirect(BlendStateDirect {
                        children: vec![
                            child(0, 0.5, 1.0),
                            BlendChild {
                                animation: AnimId(1),
                                input: InputIdx(1),
                                threshold: 0.5,
                                speed: 1.0,
                            },
                        ],
                    }),
                ),
            ],
        }],
    };
    let machine = StateMachine::new(def).unwrap();
    let mut inst = machine.instance();
    inst.set_number("t", 7.0);
    inst.set_number("u", -3.0);
    approx(change_value(inst.advance(0.1), "x").unwrap(), 5.0);
}

#[test]
fn is_not_a_transition() {
    let def = blend_def(
        vec![const_clip("lo", "x", 0.0), const_clip("hi", "x", 10.0)],
        vec![child(0, 0.0, 1.0), child(1, 1.0, 1.0)],
    );
    let machine = StateMachine::new(def).unwrap();
    let mut inst = machine.instance();
    inst.set_number("t", 0.5);
    inst.advance(0.1);
    // Blend weight motion is internal to the state; no crossfade runs.
    assert!(!inst.is_transitioning());
    assert_eq!(inst.current_state(LayerIdx(0)), Some(StateIdx(1)));
}
