//! Per-frame render metadata.
//!
//! A [`RenderInfo`] describes one frame of one volume as the rendering
//! pipeline sees it: the active voxel box in index space, the index-to-local
//! transform, and the grid classification and channel layout.

use glam::{IVec3, Mat4, UVec3, Vec3};

use crate::volume::{VdbClass, VolumeBounds};

/// Resolved render metadata for a single volume frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderInfo {
    /// Grid classification of this frame.
    pub vdb_class: VdbClass,
    /// Whether the grid stores vectors rather than scalars.
    pub is_vector_grid: bool,
    /// Minimum active voxel coordinate.
    pub index_min: IVec3,
    /// Number of voxels covered by the active box along each axis.
    pub index_size: UVec3,
    /// Transform from index space to volume-local space.
    pub index_to_local: Mat4,
}

impl RenderInfo {
    /// Creates render info for an axis-aligned box in index space with an
    /// identity index-to-local transform.
    pub fn new(vdb_class: VdbClass, index_min: IVec3, index_size: UVec3) -> Self {
        Self {
            vdb_class,
            is_vector_grid: false,
            index_min,
            index_size,
            index_to_local: Mat4::IDENTITY,
        }
    }

    /// Marks this frame as holding a vector grid.
    #[must_use]
    pub fn with_vector_grid(mut self, is_vector_grid: bool) -> Self {
        self.is_vector_grid = is_vector_grid;
        self
    }

    /// Replaces the index-to-local transform.
    #[must_use]
    pub fn with_index_to_local(mut self, index_to_local: Mat4) -> Self {
        self.index_to_local = index_to_local;
        self
    }

    /// Exclusive maximum voxel coordinate of the active box.
    pub fn index_max(&self) -> IVec3 {
        self.index_min + self.index_size.as_ivec3()
    }

    /// Axis-aligned bounds of the active box in volume-local space.
    pub fn local_bounds(&self) -> (Vec3, Vec3) {
        let a = self
            .index_to_local
            .transform_point3(self.index_min.as_vec3());
        let b = self
            .index_to_local
            .transform_point3(self.index_max().as_vec3());
        (a.min(b), a.max(b))
    }

    /// Index-space bounds of this frame alone.
    pub fn index_bounds(&self) -> VolumeBounds {
        VolumeBounds {
            size: self.index_size.as_vec3(),
            offset: self.index_min.as_vec3(),
            uv_scale: Vec3::ONE,
        }
    }

    /// Size, offset and UV scale of this frame expressed relative to the
    /// static bounds of the volume it belongs to.
    ///
    /// The offset is measured from the volume origin and the UV scale maps the
    /// volume extent onto this frame's extent. Empty axes keep a scale of 1.
    pub fn bounds_within(&self, volume: &VolumeBounds) -> VolumeBounds {
        let size = self.index_size.as_vec3();
        let uv_scale = Vec3::select(size.cmpgt(Vec3::ZERO), volume.size / size, Vec3::ONE);
        VolumeBounds {
            size,
            offset: self.index_min.as_vec3() - volume.offset,
            uv_scale,
        }
    }

    /// Packs this render info for upload to the GPU.
    pub fn to_uniforms(&self) -> RenderInfoUniforms {
        RenderInfoUniforms {
            index_to_local: self.index_to_local.to_cols_array_2d(),
            index_min: self.index_min.to_array(),
            vdb_class: self.vdb_class.as_u32(),
            index_size: self.index_size.to_array(),
            is_vector_grid: u32::from(self.is_vector_grid),
        }
    }
}

/// GPU-compatible render info.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RenderInfoUniforms {
    /// Index-to-local transform, column major.
    pub index_to_local: [[f32; 4]; 4],
    /// Minimum active voxel coordinate.
    pub index_min: [i32; 3],
    /// Grid classification, see [`VdbClass::as_u32`].
    pub vdb_class: u32,
    /// Active voxel box extent.
    pub index_size: [u32; 3],
    /// 1 for vector grids, 0 for scalar grids.
    pub is_vector_grid: u32,
}

impl Default for RenderInfoUniforms {
    fn default() -> Self {
        Self {
            index_to_local: Mat4::IDENTITY.to_cols_array_2d(),
            index_min: [0; 3],
            vdb_class: VdbClass::FogVolume.as_u32(),
            index_size: [0; 3],
            is_vector_grid: 0,
        }
    }
}
