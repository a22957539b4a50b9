//! Time-varying volume made of an ordered list of frames.

use crate::error::{Result, VdbError};
use crate::options::{FramePolicy, SequenceOptions};
use crate::render_info::RenderInfo;
use crate::volume::{VdbClass, Volume, VolumeBounds};

/// A sequenced volume, such as a cached simulation.
///
/// Static bounds are the union of every frame's index box and are computed
/// once when the sequence is built.
#[derive(Debug, Clone)]
pub struct VolumeSequence {
    name: String,
    frames: Vec<RenderInfo>,
    bounds: VolumeBounds,
    frame_policy: FramePolicy,
}

impl VolumeSequence {
    /// Builds a sequence with default options.
    pub fn new(name: impl Into<String>, frames: Vec<RenderInfo>) -> Result<Self> {
        Self::with_options(name, frames, &SequenceOptions::default())
    }

    /// Builds a sequence.
    ///
    /// Fails if `frames` is empty or if any frame disagrees with the first one
    /// on grid class or channel layout.
    pub fn with_options(
        name: impl Into<String>,
        frames: Vec<RenderInfo>,
        options: &SequenceOptions,
    ) -> Result<Self> {
        let name = name.into();
        let Some(first) = frames.first() else {
            return Err(VdbError::EmptySequence(name));
        };

        let mut bounds = first.index_bounds();
        for (i, frame) in frames.iter().enumerate().skip(1) {
            if frame.vdb_class != first.vdb_class || frame.is_vector_grid != first.is_vector_grid {
                return Err(VdbError::FrameMismatch {
                    name,
                    frame: u32::try_from(i).unwrap_or(u32::MAX),
                });
            }
            bounds = bounds.union(&frame.index_bounds());
        }

        log::debug!(
            "built volume sequence '{name}' with {} frames, size {:?}",
            frames.len(),
            bounds.size
        );

        Ok(Self {
            name,
            frames,
            bounds,
            frame_policy: options.frame_policy,
        })
    }

    /// Returns the out-of-range policy.
    pub fn frame_policy(&self) -> FramePolicy {
        self.frame_policy
    }

    /// Sets the out-of-range policy.
    pub fn set_frame_policy(&mut self, policy: FramePolicy) {
        self.frame_policy = policy;
    }

    /// Returns all frames in order.
    pub fn frames(&self) -> &[RenderInfo] {
        &self.frames
    }

    /// Size, offset and UV scale of one frame relative to the sequence bounds.
    pub fn frame_bounds(&self, frame_index: u32) -> Result<VolumeBounds> {
        Ok(self.render_info(frame_index)?.bounds_within(&self.bounds))
    }
}

impl Volume for VolumeSequence {
    fn name(&self) -> &str {
        &self.name
    }

    fn vdb_class(&self) -> VdbClass {
        self.frames[0].vdb_class
    }

    fn is_vector_grid(&self) -> bool {
        self.frames[0].is_vector_grid
    }

    fn bounds(&self) -> VolumeBounds {
        self.bounds
    }

    fn frame_count(&self) -> u32 {
        u32::try_from(self.frames.len()).unwrap_or(u32::MAX)
    }

    fn is_sequence(&self) -> bool {
        true
    }

    fn render_info(&self, frame_index: u32) -> Result<RenderInfo> {
        let index = self.frame_policy.resolve(frame_index, self.frame_count())?;
        Ok(self.frames[index as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{IVec3, UVec3, Vec3};

    fn growing_frames(count: u32) -> Vec<RenderInfo> {
        (0..count)
            .map(|i| RenderInfo::new(VdbClass::LevelSet, IVec3::ZERO, UVec3::splat(2 + i)))
            .collect()
    }

    #[test]
    fn test_empty_sequence_rejected() {
        assert!(matches!(
            VolumeSequence::new("empty", Vec::new()),
            Err(VdbError::EmptySequence(name)) if name == "empty"
        ));
    }

    #[test]
    fn test_mismatched_frame_rejected() {
        let mut frames = growing_frames(3);
        frames[2].vdb_class = VdbClass::FogVolume;
        assert!(matches!(
            VolumeSequence::new("mixed", frames),
            Err(VdbError::FrameMismatch { frame: 2, .. })
        ));
    }

    #[test]
    fn test_bounds_are_union_of_frames() {
        let mut frames = growing_frames(3);
        frames[1].index_min = IVec3::new(-3, 0, 0);
        let sequence = VolumeSequence::new("wave", frames).unwrap();

        assert_eq!(sequence.frame_count(), 3);
        assert!(sequence.is_sequence());
        assert_eq!(sequence.offset(), Vec3::new(-3.0, 0.0, 0.0));
        assert_eq!(sequence.size(), Vec3::new(7.0, 4.0, 4.0));
    }

    #[test]
    fn test_single_frame_sequence_is_still_a_sequence() {
        let sequence = VolumeSequence::new("one", growing_frames(1)).unwrap();
        assert_eq!(sequence.frame_count(), 1);
        assert!(sequence.is_sequence());
    }

    #[test]
    fn test_render_info_per_frame() {
        let sequence = VolumeSequence::new("wave", growing_frames(6)).unwrap();
        assert_eq!(sequence.render_info(3).unwrap().index_size, UVec3::splat(5));
    }

    #[test]
    fn test_out_of_range_follows_policy() {
        let mut sequence = VolumeSequence::new("wave", growing_frames(6)).unwrap();
        assert_eq!(sequence.frame_policy(), FramePolicy::Clamp);
        assert_eq!(sequence.render_info(40).unwrap().index_size, UVec3::splat(7));

        sequence.set_frame_policy(FramePolicy::Wrap);
        assert_eq!(sequence.render_info(7).unwrap().index_size, UVec3::splat(3));

        sequence.set_frame_policy(FramePolicy::Error);
        assert!(matches!(
            sequence.render_info(6),
            Err(VdbError::FrameIndexOutOfRange { index: 6, count: 6 })
        ));
    }

    #[test]
    fn test_options_set_policy() {
        let options = SequenceOptions {
            frame_policy: FramePolicy::Error,
        };
        let sequence = VolumeSequence::with_options("wave", growing_frames(2), &options).unwrap();
        assert_eq!(sequence.frame_policy(), FramePolicy::Error);
    }

    #[test]
    fn test_frame_bounds_relative_to_sequence() {
        let sequence = VolumeSequence::new("wave", growing_frames(3)).unwrap();
        let first = sequence.frame_bounds(0).unwrap();
        assert_eq!(first.size, Vec3::splat(2.0));
        assert_eq!(first.offset, Vec3::ZERO);
        assert_eq!(first.uv_scale, Vec3::splat(2.0));
    }
}
