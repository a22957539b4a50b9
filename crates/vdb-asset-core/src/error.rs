//! Error types for vdb-asset.

use thiserror::Error;

/// The main error type for vdb-asset operations.
#[derive(Error, Debug)]
pub enum VdbError {
    /// A query that needs the primary volume was issued while it is unset.
    #[error("no primary volume assigned")]
    NoPrimaryVolume,

    /// Render data was requested for a volume the container does not hold.
    #[error("volume '{0}' is not held by this container")]
    VolumeNotOwned(String),

    /// A sequenced volume was asked for a frame it does not have.
    #[error("frame index {index} out of range (frame count: {count})")]
    FrameIndexOutOfRange { index: u32, count: u32 },

    /// A volume sequence was built without any frame.
    #[error("volume sequence '{0}' has no frames")]
    EmptySequence(String),

    /// A frame disagrees with the first frame on class or channel layout.
    #[error("frame {frame} of sequence '{name}' does not match its grid class or channels")]
    FrameMismatch { name: String, frame: u32 },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for vdb-asset operations.
pub type Result<T> = std::result::Result<T, VdbError>;
