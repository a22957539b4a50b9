//! vdb-asset: volume asset containers with frame sequencing.
//!
//! An [`AssetContainer`] aggregates one or two sparse-volume assets, tracks
//! which frame of a time-varying sequence is active, and tells its dependents
//! when that frame changes. It knows nothing about how volumes are stored or
//! drawn: volumes are opaque [`Volume`] objects and renderers pull
//! [`RenderInfo`] for the active frame on demand.
//!
//! # Quick Start
//!
//! ```
//! use vdb_asset::*;
//!
//! fn main() -> Result<()> {
//!     let frames = (0..6)
//!         .map(|i| RenderInfo::new(VdbClass::LevelSet, IVec3::ZERO, UVec3::splat(8 + i)))
//!         .collect();
//!     let surface = VolumeHandle::new(VolumeSequence::new("surface", frames)?);
//!
//!     let mut container = AssetContainer::new();
//!     container.set_volumes(Some(surface.clone()), None);
//!     container.subscribe_frame_changed(|container, frame| {
//!         assert_eq!(container.current_frame_index(), frame);
//!     });
//!
//!     container.advance_to_frame(3);
//!     let info = container.resolve_render_info(&surface)?;
//!     assert_eq!(info.index_size, UVec3::splat(11));
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`Volume`] / [`VolumeHandle`] - the opaque, shared volume capability
//! - [`SequenceController`] - the active frame index
//! - [`AssetContainer`] - primary/secondary slots, queries, notifications
//! - [`SequencePlayer`] - turns elapsed time into frame requests

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Playback maps seconds to frame indices
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

pub mod asset_container;
pub mod player;
pub mod sequence;

// Re-export core types
pub use vdb_asset_core::{
    delegate::{Multicast, SubscriptionId},
    error::{Result, VdbError},
    options::{FramePolicy, SequenceOptions},
    render_info::{RenderInfo, RenderInfoUniforms},
    sequence::VolumeSequence,
    static_volume::StaticVolume,
    volume::{VdbClass, Volume, VolumeBounds, VolumeHandle},
    IVec3, Mat4, UVec3, Vec3,
};

pub use asset_container::{AssetContainer, ChannelRole, FrameChangedCallback, VdbChangedCallback};
pub use player::{PlaybackOptions, SequencePlayer};
pub use sequence::{SequenceController, SequenceState};
