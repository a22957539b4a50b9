//! Single-frame volume.

use crate::error::Result;
use crate::render_info::RenderInfo;
use crate::volume::{VdbClass, Volume, VolumeBounds};

/// A volume with exactly one frame.
///
/// Every frame index resolves to the same [`RenderInfo`].
#[derive(Debug, Clone)]
pub struct StaticVolume {
    name: String,
    render_info: RenderInfo,
    bounds: VolumeBounds,
}

impl StaticVolume {
    /// Creates a static volume whose bounds are the index box of `render_info`.
    pub fn new(name: impl Into<String>, render_info: RenderInfo) -> Self {
        Self {
            name: name.into(),
            bounds: render_info.index_bounds(),
            render_info,
        }
    }

    /// Creates a static volume with explicit bounds.
    pub fn with_bounds(
        name: impl Into<String>,
        render_info: RenderInfo,
        bounds: VolumeBounds,
    ) -> Self {
        Self {
            name: name.into(),
            render_info,
            bounds,
        }
    }
}

impl Volume for StaticVolume {
    fn name(&self) -> &str {
        &self.name
    }

    fn vdb_class(&self) -> VdbClass {
        self.render_info.vdb_class
    }

    fn is_vector_grid(&self) -> bool {
        self.render_info.is_vector_grid
    }

    fn bounds(&self) -> VolumeBounds {
        self.bounds
    }

    fn render_info(&self, _frame_index: u32) -> Result<RenderInfo> {
        Ok(self.render_info)
    }
}
