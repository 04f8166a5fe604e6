//! Named inputs: the only mutable surface the host shares with a running
//! state-machine instance.
//!
//! The declared input set is fixed at construction; the host mutates values
//! between frames (never during `advance`) and conditions read them by index
//! during arbitration. Triggers auto-reset after one evaluation pass, so a
//! fired trigger is consumed at most once per advance.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::ids::InputIdx;

/// Declared input, produced by the deserialization layer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind")]
pub enum InputDef {
    Number {
        name: String,
        #[serde(default)]
        default: f32,
    },
    Bool {
        name: String,
        #[serde(default)]
        default: bool,
    },
    Trigger {
        name: String,
    },
}

impl InputDef {
    pub fn name(&self) -> &str {
        match self {
            InputDef::Number { name, .. } => name,
            InputDef::Bool { name, .. } => name,
            InputDef::Trigger { name } => name,
        }
    }

    pub fn kind(&self) -> InputKind {
        match self {
            InputDef::Number { .. } => InputKind::Number,
            InputDef::Bool { .. } => InputKind::Bool,
            InputDef::Trigger { .. } => InputKind::Trigger,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputKind {
    Number,
    Bool,
    Trigger,
}

#[derive(Clone, Copy, Debug)]
enum Slot {
    Number(f32),
    Bool(bool),
    Trigger(bool),
}

/// Runtime input values, one slot per declared input.
#[derive(Clone, Debug)]
pub struct InputSet {
    slots: Vec<Slot>,
    by_name: HashMap<String, InputIdx>,
}

impl InputSet {
    pub fn new(defs: &[InputDef]) -> Self {
        let mut slots = Vec::with_capacity(defs.len());
        let mut by_name = HashMap::with_capacity(defs.len());
        for (i, def) in defs.iter().enumerate() {
            slots.push(match def {
                InputDef::Number { default, .. } => Slot::Number(*default),
                InputDef::Bool { default, .. } => Slot::Bool(*default),
                InputDef::Trigger { .. } => Slot::Trigger(false),
            });
            by_name.insert(def.name().to_string(), InputIdx(i as u32));
        }
        Self { slots, by_name }
    }

    pub fn index_of(&self, name: &str) -> Option<InputIdx> {
        self.by_name.get(name).copied()
    }

    /// Returns false (and leaves the set unchanged) for an unknown name or a
    /// kind mismatch; mutation is fail-soft by design.
    pub fn set_number(&mut self, name: &str, value: f32) -> bool {
        match self.slot_mut(name) {
            Some(Slot::Number(v)) => {
                *v = value;
                true
            }
            _ => false,
        }
    }

    pub fn set_bool(&mut self, name: &str, value: bool) -> bool {
        match self.slot_mut(name) {
            Some(Slot::Bool(v)) => {
                *v = value;
                true
            }
            _ => false,
        }
    }

    /// Arms a trigger; it stays armed until the end of the next advance.
    pub fn fire_trigger(&mut self, name: &str) -> bool {
        match self.slot_mut(name) {
            Some(Slot::Trigger(v)) => {
                *v = true;
                true
            }
            _ => false,
        }
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Slot> {
        let idx = self.by_name.get(name)?.index();
        self.slots.get_mut(idx)
    }

    pub(crate) fn number(&self, idx: InputIdx) -> f32 {
        match self.slots.get(idx.index()) {
            Some(Slot::Number(v)) => *v,
            _ => 0.0,
        }
    }

    pub(crate) fn boolean(&self, idx: InputIdx) -> bool {
        matches!(self.slots.get(idx.index()), Some(Slot::Bool(true)))
    }

    pub(crate) fn trigger(&self, idx: InputIdx) -> bool {
        matches!(self.slots.get(idx.index()), Some(Slot::Trigger(true)))
    }

    pub(crate) fn reset_triggers(&mut self) {
        for slot in &mut self.slots {
            if let Slot::Trigger(v) = slot {
                *v = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defs() -> Vec<InputDef> {
        vec![
            InputDef::Number {
                name: "speed".into(),
                default: 1.5,
            },
            InputDef::Bool {
                name: "grounded".into(),
                default: true,
            },
            InputDef::Trigger {
                name: "jump".into(),
            },
        ]
    }

    #[test]
    fn defaults_and_mutation() {
        let mut set = InputSet::new(&defs());
        let speed = set.index_of("speed").unwrap();
        assert_eq!(set.number(speed), 1.5);
        assert!(set.set_number("speed", 3.0));
        assert_eq!(set.number(speed), 3.0);
        assert!(set.boolean(set.index_of("grounded").unwrap()));
    }

    #[test]
    fn mutation_is_fail_soft() {
        let mut set = InputSet::new(&defs());
        assert!(!set.set_number("missing", 1.0));
        assert!(!set.set_number("grounded", 1.0));
        assert!(!set.fire_trigger("speed"));
    }

    #[test]
    fn triggers_reset() {
        let mut set = InputSet::new(&defs());
        let jump = set.index_of("jump").unwrap();
        assert!(!set.trigger(jump));
        assert!(set.fire_trigger("jump"));
        assert!(set.trigger(jump));
        set.reset_triggers();
        assert!(!set.trigger(jump));
    }
}
