//! Stable indices for core entities.
//!
//! Indices are assigned by the file/deserialization layer and resolve into
//! the owning [`StateMachineDef`](crate::graph::StateMachineDef): animations
//! and inputs machine-wide, states within their declaring layer. They are
//! opaque to the host.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateIdx(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputIdx(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerIdx(pub u32);

impl AnimId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl StateIdx {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl InputIdx {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl LayerIdx {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
