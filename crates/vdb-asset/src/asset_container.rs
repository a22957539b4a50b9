//! The volume asset container.
//!
//! An [`AssetContainer`] holds up to two shared volume handles: a mandatory
//! primary (density or level set) and an optional secondary channel
//! (temperature for fog volumes). It tracks the active frame, resolves
//! [`RenderInfo`] for either held volume on demand, and notifies subscribers
//! whenever a frame is requested.
//!
//! The container never mutates volume content and never caches render infos.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use glam::Vec3;
use vdb_asset_core::{
    Multicast, RenderInfo, Result, SubscriptionId, VdbClass, VdbError, VolumeBounds, VolumeHandle,
};

use crate::sequence::{SequenceController, SequenceState};

/// Callback signature of the broadcast channel. Receives the new frame index.
pub type VdbChangedCallback = dyn FnMut(u32);

/// Callback signature of the direct channel. Receives the container, already
/// moved to the new frame, and the new frame index.
pub type FrameChangedCallback = dyn FnMut(&AssetContainer, u32);

/// What a held volume's values mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelRole {
    /// Primary fog volume: density values.
    Density,
    /// Primary level set: narrow-band signed distances.
    LevelSet,
    /// Secondary volume alongside a fog primary: temperature values.
    Temperature,
    /// Secondary volume alongside a level-set primary: not sampled.
    Unused,
}

/// Aggregates a primary and an optional secondary volume with frame tracking.
///
/// Invariant: a secondary volume is only ever held together with a primary.
#[derive(Default)]
pub struct AssetContainer {
    primary: Option<VolumeHandle>,
    secondary: Option<VolumeHandle>,
    sequence: SequenceController,
    on_vdb_changed: Multicast<VdbChangedCallback>,
    on_frame_changed: Multicast<FrameChangedCallback>,
}

impl AssetContainer {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a container holding `primary` and optionally `secondary`.
    pub fn from_volumes(primary: VolumeHandle, secondary: Option<VolumeHandle>) -> Self {
        Self {
            primary: Some(primary),
            secondary,
            ..Self::default()
        }
    }

    // --- Volume assignment ---

    /// Replaces both volumes.
    ///
    /// Returns `false` and leaves the container untouched when `primary` is
    /// `None` while a secondary is given or still held; clear the secondary
    /// first. Grid compatibility between the two is not checked. The current
    /// frame is kept.
    pub fn set_volumes(
        &mut self,
        primary: Option<VolumeHandle>,
        secondary: Option<VolumeHandle>,
    ) -> bool {
        if primary.is_none() && secondary.is_some() {
            log::warn!("ignoring volume assignment: secondary volume given without a primary");
            return false;
        }
        if primary.is_none() && self.secondary.is_some() {
            log::warn!("ignoring volume assignment: clear the secondary volume first");
            return false;
        }
        log::debug!(
            "assigning volumes: primary {:?}, secondary {:?} (frame stays {})",
            primary.as_ref().map(|v| v.name()),
            secondary.as_ref().map(|v| v.name()),
            self.current_frame_index()
        );
        self.primary = primary;
        self.secondary = secondary;
        true
    }

    /// Replaces the primary volume.
    ///
    /// Clearing the primary while a secondary is held is rejected; clear the
    /// secondary first.
    pub fn set_primary_volume(&mut self, primary: Option<VolumeHandle>) -> bool {
        if primary.is_none() && self.secondary.is_some() {
            log::warn!("ignoring primary volume removal: clear the secondary volume first");
            return false;
        }
        log::debug!(
            "assigning primary volume {:?}",
            primary.as_ref().map(|v| v.name())
        );
        self.primary = primary;
        true
    }

    /// Replaces the secondary volume.
    ///
    /// Setting a secondary while no primary is held is rejected. Clearing is
    /// always accepted.
    pub fn set_secondary_volume(&mut self, secondary: Option<VolumeHandle>) -> bool {
        if secondary.is_some() && self.primary.is_none() {
            log::warn!("ignoring secondary volume: no primary volume assigned");
            return false;
        }
        log::debug!(
            "assigning secondary volume {:?}",
            secondary.as_ref().map(|v| v.name())
        );
        self.secondary = secondary;
        true
    }

    /// Drops both volume handles. The current frame is kept.
    pub fn clear_volumes(&mut self) {
        self.secondary = None;
        self.primary = None;
    }

    /// Returns the primary volume.
    #[must_use]
    pub fn primary_volume(&self) -> Option<&VolumeHandle> {
        self.primary.as_ref()
    }

    /// Returns the secondary volume.
    #[must_use]
    pub fn secondary_volume(&self) -> Option<&VolumeHandle> {
        self.secondary.as_ref()
    }

    // --- Metadata queries ---

    /// Returns the primary volume's grid classification.
    pub fn vdb_class(&self) -> Result<VdbClass> {
        self.primary
            .as_ref()
            .map(|v| v.vdb_class())
            .ok_or(VdbError::NoPrimaryVolume)
    }

    /// Returns the primary volume's static bounds, or [`VolumeBounds::ZERO`].
    #[must_use]
    pub fn volume_bounds(&self) -> VolumeBounds {
        self.primary
            .as_ref()
            .map_or(VolumeBounds::ZERO, |v| v.bounds())
    }

    /// Returns the primary volume's size, or zero when unset.
    #[must_use]
    pub fn volume_size(&self) -> Vec3 {
        self.volume_bounds().size
    }

    /// Returns the primary volume's offset, or zero when unset.
    #[must_use]
    pub fn volume_offset(&self) -> Vec3 {
        self.volume_bounds().offset
    }

    /// Returns the primary volume's UV scale, or zero when unset.
    #[must_use]
    pub fn volume_uv_scale(&self) -> Vec3 {
        self.volume_bounds().uv_scale
    }

    /// Returns whether the primary volume is a vector grid. False when unset.
    #[must_use]
    pub fn is_vector_grid(&self) -> bool {
        self.primary.as_ref().is_some_and(|v| v.is_vector_grid())
    }

    /// Returns the largest frame count among held volumes, 1 when none is
    /// sequenced.
    #[must_use]
    pub fn frame_count(&self) -> u32 {
        self.volumes().map(|v| v.frame_count()).max().unwrap_or(1)
    }

    /// Returns what `volume`'s values mean inside this container.
    pub fn channel_role(&self, volume: &VolumeHandle) -> Result<ChannelRole> {
        let primary = self.primary.as_ref();
        if primary.is_some_and(|p| p.ptr_eq(volume)) {
            return Ok(match volume.vdb_class() {
                VdbClass::FogVolume => ChannelRole::Density,
                VdbClass::LevelSet => ChannelRole::LevelSet,
            });
        }
        match (primary, self.secondary.as_ref()) {
            (Some(primary), Some(secondary)) if secondary.ptr_eq(volume) => {
                Ok(match primary.vdb_class() {
                    VdbClass::FogVolume => ChannelRole::Temperature,
                    VdbClass::LevelSet => ChannelRole::Unused,
                })
            }
            _ => Err(VdbError::VolumeNotOwned(volume.name().to_string())),
        }
    }

    // --- Enumeration ---

    /// Iterates held volumes, primary first.
    pub fn volumes(&self) -> impl Iterator<Item = &VolumeHandle> + '_ {
        self.primary.iter().chain(self.secondary.iter())
    }

    /// Iterates held volume slots mutably, primary first.
    ///
    /// A slot's handle may be swapped in place; slots cannot be emptied here.
    pub fn volumes_mut(&mut self) -> impl Iterator<Item = &mut VolumeHandle> + '_ {
        self.primary.iter_mut().chain(self.secondary.iter_mut())
    }

    /// Returns the number of held volumes (0, 1 or 2).
    #[must_use]
    pub fn num_volumes(&self) -> usize {
        self.volumes().count()
    }

    /// Appends every held volume to `out`, primary first.
    pub fn collect_referenced_assets(&self, out: &mut Vec<VolumeHandle>) {
        out.extend(self.volumes().cloned());
    }

    /// Returns whether `volume` is the primary or secondary of this container.
    #[must_use]
    pub fn holds(&self, volume: &VolumeHandle) -> bool {
        self.volumes().any(|held| held.ptr_eq(volume))
    }

    // --- Render info ---

    /// Resolves render info of `volume` for the current frame.
    ///
    /// Fails with [`VdbError::VolumeNotOwned`] unless `volume` is the very
    /// handle held as primary or secondary. Out-of-range frames are handled by
    /// the volume itself.
    pub fn resolve_render_info(&self, volume: &VolumeHandle) -> Result<RenderInfo> {
        if !self.holds(volume) {
            return Err(VdbError::VolumeNotOwned(volume.name().to_string()));
        }
        volume.render_info(self.current_frame_index())
    }

    // --- Frames and notifications ---

    /// Returns the active frame index.
    #[must_use]
    pub fn current_frame_index(&self) -> u32 {
        self.sequence.current_frame_index()
    }

    /// Returns the sequence controller state.
    #[must_use]
    pub fn sequence_state(&self) -> SequenceState {
        self.sequence.state()
    }

    /// Makes `frame_index` the active frame and notifies every subscriber.
    ///
    /// The index is stored unclamped before any callback runs. Broadcast
    /// subscribers are called first, then direct subscribers, each in
    /// registration order. Calling twice with the same index notifies twice.
    pub fn advance_to_frame(&mut self, frame_index: u32) {
        let previous = self.sequence.advance(frame_index);
        log::debug!("advancing from frame {previous} to frame {frame_index}");

        let frame_count = self.frame_count();
        if self.volumes().any(|v| v.is_sequence()) && frame_index >= frame_count {
            log::debug!(
                "frame {frame_index} is past the last sequenced frame ({}); \
                 resolution is left to the volumes",
                frame_count.saturating_sub(1)
            );
        }

        self.broadcast_frame_changed(frame_index);
    }

    /// Notifies every subscriber again with the current frame.
    pub fn refresh(&mut self) {
        self.advance_to_frame(self.current_frame_index());
    }

    fn broadcast_frame_changed(&mut self, frame_index: u32) {
        log::trace!(
            "notifying {} broadcast and {} direct subscribers of frame {frame_index}",
            self.on_vdb_changed.len(),
            self.on_frame_changed.len()
        );

        for callback in self.on_vdb_changed.iter_mut() {
            callback(frame_index);
        }

        // Direct subscribers see the container immutably while they run. The
        // list goes back in place even if one of them panics.
        let mut on_frame_changed = std::mem::take(&mut self.on_frame_changed);
        let outcome = {
            let container: &Self = self;
            panic::catch_unwind(AssertUnwindSafe(|| {
                for callback in on_frame_changed.iter_mut() {
                    callback(container, frame_index);
                }
            }))
        };
        self.on_frame_changed = on_frame_changed;
        if let Err(payload) = outcome {
            panic::resume_unwind(payload);
        }
    }

    /// Subscribes to the broadcast channel.
    pub fn subscribe_vdb_changed(
        &mut self,
        callback: impl FnMut(u32) + 'static,
    ) -> SubscriptionId {
        self.on_vdb_changed.add(Box::new(callback))
    }

    /// Unsubscribes from the broadcast channel.
    pub fn unsubscribe_vdb_changed(&mut self, id: SubscriptionId) -> bool {
        self.on_vdb_changed.remove(id)
    }

    /// Subscribes to the direct channel.
    pub fn subscribe_frame_changed(
        &mut self,
        callback: impl FnMut(&AssetContainer, u32) + 'static,
    ) -> SubscriptionId {
        self.on_frame_changed.add(Box::new(callback))
    }

    /// Unsubscribes from the direct channel.
    pub fn unsubscribe_frame_changed(&mut self, id: SubscriptionId) -> bool {
        self.on_frame_changed.remove(id)
    }

    /// Returns the number of broadcast subscribers.
    #[must_use]
    pub fn num_vdb_changed_subscribers(&self) -> usize {
        self.on_vdb_changed.len()
    }

    /// Returns the number of direct subscribers.
    ///
    /// Reads zero from inside a direct callback.
    #[must_use]
    pub fn num_frame_changed_subscribers(&self) -> usize {
        self.on_frame_changed.len()
    }
}

impl fmt::Debug for AssetContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetContainer")
            .field("primary", &self.primary)
            .field("secondary", &self.secondary)
            .field("sequence", &self.sequence)
            .field("on_vdb_changed", &self.on_vdb_changed)
            .field("on_frame_changed", &self.on_frame_changed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use vdb_asset_core::{IVec3, StaticVolume, UVec3, VolumeSequence};

    fn fog(name: &str) -> VolumeHandle {
        VolumeHandle::new(StaticVolume::new(
            name,
            RenderInfo::new(VdbClass::FogVolume, IVec3::ZERO, UVec3::splat(10)),
        ))
    }

    fn level_set_sequence(name: &str, frames: u32) -> VolumeHandle {
        let frames = (0..frames)
            .map(|i| RenderInfo::new(VdbClass::LevelSet, IVec3::ZERO, UVec3::splat(4 + i)))
            .collect();
        VolumeHandle::new(VolumeSequence::new(name, frames).unwrap())
    }

    #[test]
    fn test_set_volumes_rejects_secondary_without_primary() {
        let mut container = AssetContainer::new();
        assert!(!container.set_volumes(None, Some(fog("temperature"))));
        assert!(container.primary_volume().is_none());
        assert!(container.secondary_volume().is_none());
    }

    #[test]
    fn test_set_secondary_requires_primary() {
        let mut container = AssetContainer::new();
        assert!(!container.set_secondary_volume(Some(fog("temperature"))));
        assert_eq!(container.num_volumes(), 0);

        assert!(container.set_primary_volume(Some(fog("density"))));
        assert!(container.set_secondary_volume(Some(fog("temperature"))));
        assert_eq!(container.num_volumes(), 2);
    }

    #[test]
    fn test_primary_cannot_be_cleared_under_secondary() {
        let mut container = AssetContainer::from_volumes(fog("density"), Some(fog("temperature")));
        assert!(!container.set_primary_volume(None));
        assert!(container.primary_volume().is_some());

        assert!(container.set_secondary_volume(None));
        assert!(container.set_primary_volume(None));
        assert_eq!(container.num_volumes(), 0);
    }

    #[test]
    fn test_set_volumes_keeps_secondary_until_cleared() {
        let mut container = AssetContainer::from_volumes(fog("density"), Some(fog("temperature")));
        assert!(!container.set_volumes(None, None));
        assert_eq!(container.num_volumes(), 2);

        assert!(container.set_secondary_volume(None));
        assert!(container.set_volumes(None, None));
        assert_eq!(container.num_volumes(), 0);
    }

    #[test]
    fn test_clear_volumes() {
        let mut container = AssetContainer::from_volumes(fog("density"), Some(fog("temperature")));
        container.clear_volumes();
        assert_eq!(container.num_volumes(), 0);
        assert!(container.vdb_class().is_err());
    }

    #[test]
    fn test_channel_roles() {
        let density = fog("density");
        let temperature = fog("temperature");
        let container = AssetContainer::from_volumes(density.clone(), Some(temperature.clone()));
        assert_eq!(container.channel_role(&density).unwrap(), ChannelRole::Density);
        assert_eq!(container.channel_role(&temperature).unwrap(), ChannelRole::Temperature);

        let surface = level_set_sequence("surface", 3);
        let extra = fog("extra");
        let container = AssetContainer::from_volumes(surface.clone(), Some(extra.clone()));
        assert_eq!(container.channel_role(&surface).unwrap(), ChannelRole::LevelSet);
        assert_eq!(container.channel_role(&extra).unwrap(), ChannelRole::Unused);

        assert!(matches!(
            container.channel_role(&fog("stranger")),
            Err(VdbError::VolumeNotOwned(name)) if name == "stranger"
        ));
    }

    #[test]
    fn test_frame_count_uses_longest_sequence() {
        let mut container = AssetContainer::new();
        assert_eq!(container.frame_count(), 1);

        container.set_volumes(Some(fog("density")), None);
        assert_eq!(container.frame_count(), 1);

        container.set_volumes(
            Some(level_set_sequence("a", 4)),
            Some(level_set_sequence("b", 9)),
        );
        assert_eq!(container.frame_count(), 9);
    }

    #[test]
    fn test_volumes_mut_swaps_in_place() {
        let mut container = AssetContainer::from_volumes(fog("old"), None);
        let replacement = fog("new");
        for slot in container.volumes_mut() {
            *slot = replacement.clone();
        }
        assert_eq!(container.primary_volume(), Some(&replacement));
        assert!(container.secondary_volume().is_none());
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut container = AssetContainer::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let broadcast = container.subscribe_vdb_changed(move |frame| sink.borrow_mut().push(frame));
        let sink = Rc::clone(&seen);
        let direct =
            container.subscribe_frame_changed(move |_, frame| sink.borrow_mut().push(frame + 100));

        container.advance_to_frame(1);
        assert!(container.unsubscribe_vdb_changed(broadcast));
        container.advance_to_frame(2);
        assert!(container.unsubscribe_frame_changed(direct));
        assert!(!container.unsubscribe_frame_changed(direct));
        container.advance_to_frame(3);

        assert_eq!(*seen.borrow(), vec![1, 101, 102]);
        assert_eq!(container.num_vdb_changed_subscribers(), 0);
        assert_eq!(container.num_frame_changed_subscribers(), 0);
    }

    #[test]
    fn test_direct_subscribers_survive_fan_out() {
        let mut container = AssetContainer::new();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        container.subscribe_frame_changed(move |c, _| {
            assert_eq!(c.num_frame_changed_subscribers(), 0);
            *sink.borrow_mut() += 1;
        });

        container.advance_to_frame(0);
        container.advance_to_frame(0);
        assert_eq!(container.num_frame_changed_subscribers(), 1);
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_panicking_subscriber_keeps_subscriptions() {
        let mut container = AssetContainer::new();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        container.subscribe_frame_changed(move |_, _| *sink.borrow_mut() += 1);
        container.subscribe_frame_changed(|_, frame| assert_ne!(frame, 7, "bad frame"));

        let result = panic::catch_unwind(AssertUnwindSafe(|| container.advance_to_frame(7)));
        assert!(result.is_err());
        assert_eq!(container.num_frame_changed_subscribers(), 2);

        container.advance_to_frame(8);
        assert_eq!(*count.borrow(), 2);
        assert_eq!(container.current_frame_index(), 8);
    }

    #[test]
    fn test_refresh_renotifies_current_frame() {
        let mut container = AssetContainer::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        container.subscribe_vdb_changed(move |frame| sink.borrow_mut().push(frame));

        container.advance_to_frame(4);
        container.refresh();
        assert_eq!(*seen.borrow(), vec![4, 4]);
        assert_eq!(container.sequence_state(), SequenceState::Bound { frame_index: 4 });
    }
}
