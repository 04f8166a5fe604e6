//! Validated machine handle and runtime instances.

use std::sync::Arc;

use crate::config::Config;
use crate::graph::StateMachineDef;
use crate::ids::{LayerIdx, StateIdx};
use crate::inputs::InputSet;
use crate::layer::LayerInstance;
use crate::outputs::Outputs;
use crate::validate::{validate, ValidationError};

/// A validated definition, cheap to clone and share. Instances spawned from
/// the same machine share one `Arc`'d definition and run independently.
#[derive(Clone, Debug)]
pub struct StateMachine {
    def: Arc<StateMachineDef>,
}

impl StateMachine {
    /// Validates the definition (local pass, then cross-references); a
    /// machine that constructs successfully never errors during `advance`.
    pub fn new(def: StateMachineDef) -> Result<StateMachine, ValidationError> {
        validate(&def)?;
        Ok(StateMachine { def: Arc::new(def) })
    }

    pub fn def(&self) -> &StateMachineDef {
        &self.def
    }

    pub fn instance(&self) -> StateMachineInstance {
        self.instance_with(Config::default())
    }

    pub fn instance_with(&self, config: Config) -> StateMachineInstance {
        let inputs = InputSet::new(&self.def.inputs);
        let layers = (0..self.def.layers.len())
            .map(|i| LayerInstance::make(&self.def, i, &inputs))
            .collect();
        StateMachineInstance {
            outputs: Outputs::with_capacity(config.expected_changes),
            def: Arc::clone(&self.def),
            config,
            inputs,
            layers,
        }
    }
}

/// One running copy of a machine. Single-threaded per instance; independent
/// instances are `Send` and never block.
#[derive(Clone, Debug)]
pub struct StateMachineInstance {
    def: Arc<StateMachineDef>,
    config: Config,
    inputs: InputSet,
    layers: Vec<LayerInstance>,
    outputs: Outputs,
}

impl StateMachineInstance {
    /// Advance every layer by `dt` seconds and return this frame's outputs.
    /// Non-finite or negative `dt` is clamped to 0 with a warning; the frame
    /// still runs, so pending transitions with zero duration can resolve.
    pub fn advance(&mut self, dt: f32) -> &Outputs {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            log::warn!("non-finite or negative dt {dt}; clamping to 0");
            0.0
        };
        self.outputs.clear();
        let max_events = self.config.max_events_per_advance;
        for layer in &mut self.layers {
            layer.advance(dt, &self.def, &self.inputs, &mut self.outputs, max_events);
        }
        self.inputs.reset_triggers();
        &self.outputs
    }

    pub fn def(&self) -> &StateMachineDef {
        &self.def
    }

    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    pub fn set_number(&mut self, name: &str, value: f32) -> bool {
        self.inputs.set_number(name, value)
    }

    pub fn set_bool(&mut self, name: &str, value: bool) -> bool {
        self.inputs.set_bool(name, value)
    }

    pub fn fire_trigger(&mut self, name: &str) -> bool {
        self.inputs.fire_trigger(name)
    }

    /// Whether any layer is mid-crossfade.
    pub fn is_transitioning(&self) -> bool {
        self.layers.iter().any(|l| l.is_transitioning())
    }

    /// Index of the layer's active state.
    pub fn current_state(&self, layer: LayerIdx) -> Option<StateIdx> {
        self.layers.get(layer.index()).map(|l| l.current_state())
    }

    /// Name of the layer's active state, for host-side telemetry.
    pub fn current_state_name(&self, layer: LayerIdx) -> Option<&str> {
        let idx = self.current_state(layer)?;
        let layer_def = self.def.layers.get(layer.index())?;
        Some(layer_def.state(idx).name.as_str())
    }
}
