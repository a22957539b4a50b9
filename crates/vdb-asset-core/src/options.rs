//! Configuration options for volume sequences.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VdbError};

/// How a sequenced volume resolves a frame index past its last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FramePolicy {
    /// Hold the last frame.
    #[default]
    Clamp,
    /// Loop back to the start (`index % frame_count`).
    Wrap,
    /// Fail with [`VdbError::FrameIndexOutOfRange`](crate::VdbError::FrameIndexOutOfRange).
    Error,
}

impl FramePolicy {
    /// Maps `index` into `0..count` according to this policy.
    ///
    /// `count` must be non-zero.
    pub fn resolve(self, index: u32, count: u32) -> Result<u32> {
        debug_assert!(count > 0);
        if index < count {
            return Ok(index);
        }
        match self {
            FramePolicy::Clamp => Ok(count - 1),
            FramePolicy::Wrap => Ok(index % count),
            FramePolicy::Error => Err(VdbError::FrameIndexOutOfRange { index, count }),
        }
    }
}

/// Options applied when a [`VolumeSequence`](crate::VolumeSequence) is built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceOptions {
    /// Out-of-range frame resolution.
    pub frame_policy: FramePolicy,
}

impl SequenceOptions {
    /// Parses options from a JSON document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the options to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
