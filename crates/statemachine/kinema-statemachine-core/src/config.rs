//! Instance tuning knobs.

use serde::{Deserialize, Serialize};

/// Capacity hints and caps applied when an instance is created. The
/// defaults suit small machines; hosts driving large graphs raise the hints
/// to avoid growth during the first frames.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Expected number of per-frame property changes, used to pre-size the
    /// change list.
    pub expected_changes: usize,
    /// Hard cap on events emitted by a single advance; excess events are
    /// dropped with a warning.
    pub max_events_per_advance: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            expected_changes: 64,
            max_events_per_advance: 64,
        }
    }
}
