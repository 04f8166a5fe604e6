//! Per-frame outputs handed back to the host.
//!
//! `Outputs` is owned by the instance and reused across frames; `advance`
//! clears it, fills it, and returns a borrow. Changes are the per-property
//! value feed for the host's object graph; events are telemetry about the
//! graph's own motion (state changes, crossfade lifecycle).

use serde::{Deserialize, Serialize};

use crate::ids::{LayerIdx, StateIdx};
use crate::value::Value;

/// One animated property resolving to a blended value this frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub layer: LayerIdx,
    pub key: String,
    pub value: Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CoreEvent {
    StateChanged {
        layer: LayerIdx,
        from: StateIdx,
        to: StateIdx,
    },
    TransitionStarted {
        layer: LayerIdx,
        from: StateIdx,
        to: StateIdx,
    },
    TransitionCompleted {
        layer: LayerIdx,
        state: StateIdx,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Outputs {
    pub changes: Vec<Change>,
    pub events: Vec<CoreEvent>,
}

impl Outputs {
    pub(crate) fn with_capacity(changes: usize) -> Self {
        Self {
            changes: Vec::with_capacity(changes),
            events: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }

    pub(crate) fn push_change(&mut self, layer: LayerIdx, key: String, value: Value) {
        self.changes.push(Change { layer, key, value });
    }

    /// Fail-soft past the configured cap: the event is dropped, not the
    /// frame.
    pub(crate) fn push_event(&mut self, event: CoreEvent, max_events: usize) {
        if self.events.len() < max_events {
            self.events.push(event);
        } else {
            log::warn!("event cap {max_events} reached; dropping {event:?}");
        }
    }
}
