//! Volume capability trait and shared volume handles.
//!
//! A [`Volume`] is an opaque sparse-volume asset. The container layer only
//! ever asks it for its classification, channel layout, static bounds, frame
//! count, and per-frame [`RenderInfo`]; voxel storage and sampling stay behind
//! the trait.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::render_info::RenderInfo;

/// Grid classification of a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VdbClass {
    /// Continuous density field.
    #[default]
    FogVolume,
    /// Narrow-band signed distance field.
    LevelSet,
}

impl VdbClass {
    /// Stable integer code used in GPU uniforms.
    pub fn as_u32(self) -> u32 {
        match self {
            VdbClass::FogVolume => 0,
            VdbClass::LevelSet => 1,
        }
    }
}

/// Static geometric description of a volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeBounds {
    /// Extent of the volume.
    pub size: Vec3,
    /// Position of the volume's minimum corner.
    pub offset: Vec3,
    /// Scale applied to texture coordinates.
    pub uv_scale: Vec3,
}

impl VolumeBounds {
    /// All-zero bounds, reported when no volume is available.
    pub const ZERO: Self = Self {
        size: Vec3::ZERO,
        offset: Vec3::ZERO,
        uv_scale: Vec3::ZERO,
    };

    /// Creates bounds with a unit UV scale.
    pub fn new(size: Vec3, offset: Vec3) -> Self {
        Self {
            size,
            offset,
            uv_scale: Vec3::ONE,
        }
    }

    /// Smallest bounds enclosing both `self` and `other`, with a unit UV scale.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let min = self.offset.min(other.offset);
        let max = (self.offset + self.size).max(other.offset + other.size);
        Self::new(max - min, min)
    }
}

impl Default for VolumeBounds {
    fn default() -> Self {
        Self::ZERO
    }
}

/// An opaque sparse-volume asset, either static or sequenced.
pub trait Volume: Send + Sync {
    /// Returns the asset name, used in logs and errors.
    fn name(&self) -> &str;

    /// Returns the grid classification.
    fn vdb_class(&self) -> VdbClass;

    /// Returns whether the grid stores vectors rather than scalars.
    fn is_vector_grid(&self) -> bool;

    /// Returns the static bounds shared by every frame.
    fn bounds(&self) -> VolumeBounds;

    /// Returns the number of frames. Static volumes have exactly one.
    fn frame_count(&self) -> u32 {
        1
    }

    /// Returns whether the volume varies over frames.
    fn is_sequence(&self) -> bool {
        self.frame_count() > 1
    }

    /// Resolves render metadata for `frame_index`.
    ///
    /// Static volumes ignore the index. Sequenced volumes decide how an
    /// out-of-range index is handled.
    fn render_info(&self, frame_index: u32) -> Result<RenderInfo>;

    /// Extent of the volume.
    fn size(&self) -> Vec3 {
        self.bounds().size
    }

    /// Minimum corner of the volume.
    fn offset(&self) -> Vec3 {
        self.bounds().offset
    }

    /// Texture coordinate scale.
    fn uv_scale(&self) -> Vec3 {
        self.bounds().uv_scale
    }
}

/// A shared reference to an externally owned volume.
///
/// Handles compare by identity: two handles are equal only when they point
/// at the same volume object, regardless of content.
#[derive(Clone)]
pub struct VolumeHandle(Arc<dyn Volume>);

impl VolumeHandle {
    /// Wraps a volume in a new handle.
    pub fn new(volume: impl Volume + 'static) -> Self {
        Self(Arc::new(volume))
    }

    /// Returns whether both handles refer to the same volume.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        // Compare data pointers only; vtable pointers may differ across codegen units.
        Arc::as_ptr(&self.0).cast::<()>() == Arc::as_ptr(&other.0).cast::<()>()
    }

    /// Returns the underlying shared pointer.
    pub fn as_arc(&self) -> &Arc<dyn Volume> {
        &self.0
    }

    /// Number of handles currently sharing this volume.
    pub fn share_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl From<Arc<dyn Volume>> for VolumeHandle {
    fn from(volume: Arc<dyn Volume>) -> Self {
        Self(volume)
    }
}

impl Deref for VolumeHandle {
    type Target = dyn Volume;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl PartialEq for VolumeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for VolumeHandle {}

impl fmt::Debug for VolumeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VolumeHandle")
            .field("name", &self.name())
            .field("vdb_class", &self.vdb_class())
            .field("frame_count", &self.frame_count())
            .finish()
    }
}
