//! Layer runtime: transition arbitration and crossfading.
//!
//! At most two state instances are live per layer at any time, the active
//! one and an optional mixing-out one left over from the in-progress
//! crossfade. Arbitration happens only while no crossfade is in progress:
//! the layer's `Any` edges first, then the active state's own edges, in
//! declared order, first match wins.

use crate::graph::{StateMachineDef, StateTransition};
use crate::ids::{LayerIdx, StateIdx};
use crate::inputs::InputSet;
use crate::instance::StateInstance;
use crate::outputs::{CoreEvent, Outputs};
use crate::sampling::SampleSet;

/// Crossfade bookkeeping for a selected transition.
#[derive(Clone, Debug)]
struct ActiveTransition {
    duration: f32,
    pause_on_exit: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct LayerInstance {
    layer: usize,
    active: StateInstance,
    mixing_out: Option<StateInstance>,
    transition: Option<ActiveTransition>,
    /// Crossfade weight toward the active instance, in [0,1]. 1 when no
    /// crossfade is in progress.
    mix: f32,
}

impl LayerInstance {
    pub(crate) fn make(def: &StateMachineDef, layer: usize, inputs: &InputSet) -> Self {
        let layer_def = &def.layers[layer];
        // Entry existence is validated; fall back to state 0 defensively.
        let entry = layer_def.entry_index().unwrap_or(StateIdx(0));
        let start = resolve_destination(def, layer, entry);
        let mut active = StateInstance::make(def, layer, start);
        // Zero-length advance initializes derived state (blend weights)
        // before the first sample.
        active.advance(0.0, def, inputs);
        Self {
            layer,
            active,
            mixing_out: None,
            transition: None,
            mix: 1.0,
        }
    }

    pub(crate) fn current_state(&self) -> StateIdx {
        self.active.state_idx()
    }

    pub(crate) fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub(crate) fn advance(
        &mut self,
        dt: f32,
        def: &StateMachineDef,
        inputs: &InputSet,
        outputs: &mut Outputs,
        max_events: usize,
    ) {
        self.active.advance(dt, def, inputs);
        if let (Some(mixing_out), Some(transition)) = (&mut self.mixing_out, &self.transition) {
            if !transition.pause_on_exit {
                mixing_out.advance(dt, def, inputs);
            }
        }

        if self.transition.is_none() {
            if let Some(selected) = self.arbitrate(def, inputs) {
                self.begin_transition(selected, def, inputs, outputs, max_events);
            }
        }

        if let Some(transition) = &self.transition {
            self.mix = if transition.duration > 0.0 {
                (self.mix + dt / transition.duration).min(1.0)
            } else {
                1.0
            };
            if self.mix >= 1.0 {
                self.mixing_out = None;
                self.transition = None;
                outputs.push_event(
                    CoreEvent::TransitionCompleted {
                        layer: LayerIdx(self.layer as u32),
                        state: self.active.state_idx(),
                    },
                    max_events,
                );
            }
        }

        self.emit_samples(def, outputs);
    }

    /// First qualifying edge wins: `Any` edges before the active state's
    /// own, both in declared order.
    fn arbitrate<'d>(
        &self,
        def: &'d StateMachineDef,
        inputs: &InputSet,
    ) -> Option<&'d StateTransition> {
        let layer_def = &def.layers[self.layer];
        let active_idx = self.active.state_idx();
        let source_time = self.active.normalized_time(def);

        if let Some(any_idx) = layer_def.any_index() {
            for t in &layer_def.state(any_idx).transitions {
                if !self.qualifies(t, source_time, inputs) {
                    continue;
                }
                // An Any edge landing back on the active state is a no-op;
                // skip it rather than restarting the state.
                if resolve_destination(def, self.layer, t.target) == active_idx {
                    continue;
                }
                return Some(t);
            }
        }

        layer_def
            .state(active_idx)
            .transitions
            .iter()
            .find(|t| self.qualifies(t, source_time, inputs))
    }

    fn qualifies(&self, t: &StateTransition, source_time: f32, inputs: &InputSet) -> bool {
        if t.flags.is_disabled() {
            return false;
        }
        if t.flags.enable_exit_time() && !(source_time >= t.exit_time) {
            return false;
        }
        t.conditions.iter().all(|c| c.evaluate(inputs))
    }

    fn begin_transition(
        &mut self,
        selected: &StateTransition,
        def: &StateMachineDef,
        inputs: &InputSet,
        outputs: &mut Outputs,
        max_events: usize,
    ) {
        let layer = LayerIdx(self.layer as u32);
        let from = self.active.state_idx();
        let destination = resolve_destination(def, self.layer, selected.target);
        let mut next = StateInstance::make(def, self.layer, destination);
        next.advance(0.0, def, inputs);

        outputs.push_event(
            CoreEvent::TransitionStarted {
                layer,
                from,
                to: destination,
            },
            max_events,
        );
        outputs.push_event(
            CoreEvent::StateChanged {
                layer,
                from,
                to: destination,
            },
            max_events,
        );

        self.mixing_out = Some(std::mem::replace(&mut self.active, next));
        self.mix = 0.0;
        self.transition = Some(ActiveTransition {
            duration: selected.duration,
            pause_on_exit: selected.flags.pause_on_exit(),
        });
    }

    fn emit_samples(&self, def: &StateMachineDef, outputs: &mut Outputs) {
        let mut blended = SampleSet::default();
        match &self.mixing_out {
            Some(mixing_out) => {
                mixing_out.sample(def, &mut blended);
                let mut incoming = SampleSet::default();
                self.active.sample(def, &mut incoming);
                blended.mix_toward(&incoming, self.mix);
            }
            None => self.active.sample(def, &mut blended),
        }
        if blended.is_empty() {
            return;
        }
        let layer = LayerIdx(self.layer as u32);
        for (key, value) in blended.into_sorted() {
            outputs.push_change(layer, key, value);
        }
    }
}

/// Follow control states (`Entry`, `Exit`, `Any`) through their first
/// outgoing edge until a playable state is reached. Validation guarantees
/// the walk terminates; a control state with no edges resolves to itself.
fn resolve_destination(def: &StateMachineDef, layer: usize, target: StateIdx) -> StateIdx {
    let layer_def = &def.layers[layer];
    let mut current = target;
    loop {
        let node = layer_def.state(current);
        if !node.state.is_control() {
            return current;
        }
        match node.transitions.first() {
            Some(t) => current = t.target,
            None => return current,
        }
    }
}
