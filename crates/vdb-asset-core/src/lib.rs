//! Core abstractions for vdb-asset.
//!
//! This crate provides the capability surface the asset container is built on:
//! - [`Volume`] trait for opaque sparse-volume assets, shared through [`VolumeHandle`]
//! - [`RenderInfo`] per-frame render metadata and its GPU packing
//! - [`StaticVolume`] and [`VolumeSequence`] reference volumes
//! - [`Multicast`] ordered callback lists
//! - Error type and configuration options

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Frame counts and voxel extents are small; casts are range-checked where it matters
#![allow(clippy::cast_possible_truncation)]

pub mod delegate;
pub mod error;
pub mod options;
pub mod render_info;
pub mod sequence;
pub mod static_volume;
pub mod volume;

pub use delegate::{Multicast, SubscriptionId};
pub use error::{Result, VdbError};
pub use options::{FramePolicy, SequenceOptions};
pub use render_info::{RenderInfo, RenderInfoUniforms};
pub use sequence::VolumeSequence;
pub use static_volume::StaticVolume;
pub use volume::{VdbClass, Volume, VolumeBounds, VolumeHandle};

// Re-export glam types for convenience
pub use glam::{IVec3, Mat4, UVec3, Vec3};
