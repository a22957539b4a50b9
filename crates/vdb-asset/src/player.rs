//! Time-based playback driver for asset containers.
//!
//! A [`SequencePlayer`] turns elapsed time into frame indices and pushes them
//! into an [`AssetContainer`]. Unlike the container, the player skips frames
//! that would not change anything.

use serde::{Deserialize, Serialize};
use vdb_asset_core::Result;

use crate::asset_container::AssetContainer;
use crate::sequence::SequenceState;

/// Playback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackOptions {
    /// Frames per second of the source sequence.
    pub frame_rate: f32,
    /// Multiplier applied to elapsed time. Negative values play backwards.
    pub playback_speed: f32,
    /// Whether playback wraps around at the end of the sequence.
    pub looping: bool,
    /// Whether a new player starts playing immediately.
    pub autoplay: bool,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            frame_rate: 24.0,
            playback_speed: 1.0,
            looping: true,
            autoplay: true,
        }
    }
}

impl PlaybackOptions {
    /// Parses options from a JSON document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Drives a container's frame index from wall-clock time.
#[derive(Debug, Clone)]
pub struct SequencePlayer {
    options: PlaybackOptions,
    elapsed: f32,
    playing: bool,
    // Whether the container was last given the frame at `elapsed`.
    synced: bool,
}

impl Default for SequencePlayer {
    fn default() -> Self {
        Self::new(PlaybackOptions::default())
    }
}

impl SequencePlayer {
    /// Creates a player at time zero.
    pub fn new(options: PlaybackOptions) -> Self {
        Self {
            playing: options.autoplay,
            options,
            elapsed: 0.0,
            synced: false,
        }
    }

    /// Returns the playback options.
    pub fn options(&self) -> &PlaybackOptions {
        &self.options
    }

    /// Returns the playback options for editing.
    pub fn options_mut(&mut self) -> &mut PlaybackOptions {
        &mut self.options
    }

    /// Returns the playback position in seconds.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Returns whether the player advances on [`tick`](Self::tick).
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Resumes playback. The next tick shows the current position before
    /// moving on.
    pub fn play(&mut self) {
        if !self.playing {
            self.synced = false;
        }
        self.playing = true;
    }

    /// Pauses playback, keeping the position.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Stops playback, rewinds, and moves `container` back to frame 0.
    pub fn stop(&mut self, container: &mut AssetContainer) {
        self.playing = false;
        self.elapsed = 0.0;
        self.synced = false;
        container.advance_to_frame(0);
    }

    /// Moves the playback position. Negative times are treated as zero.
    ///
    /// The next tick pushes the frame at the new position.
    pub fn seek(&mut self, seconds: f32) {
        self.elapsed = seconds.max(0.0);
        self.synced = false;
    }

    /// Maps a playback position to a frame of a `frame_count`-long sequence.
    pub fn frame_at(&self, seconds: f32, frame_count: u32) -> u32 {
        let frame_count = frame_count.max(1);
        let raw = (seconds * self.options.frame_rate).floor();
        if !raw.is_finite() || raw <= 0.0 {
            return 0;
        }
        let raw = raw.min(u32::MAX as f32) as u32;
        if self.options.looping {
            raw % frame_count
        } else {
            raw.min(frame_count - 1)
        }
    }

    /// Advances the playback position by `dt` seconds and pushes the resulting
    /// frame into `container`.
    ///
    /// The first tick after [`new`](Self::new), [`play`](Self::play) or
    /// [`seek`](Self::seek) does not advance; it pushes the frame at the
    /// current position, so playback starts on frame 0.
    ///
    /// Returns the frame that was pushed, or `None` when paused or when the
    /// container already shows that frame. Non-looping playback pauses once it
    /// reaches the last frame.
    pub fn tick(&mut self, dt: f32, container: &mut AssetContainer) -> Option<u32> {
        if !self.playing {
            return None;
        }

        let frame_count = container.frame_count();
        let duration = if self.options.frame_rate > 0.0 {
            frame_count as f32 / self.options.frame_rate
        } else {
            0.0
        };

        if self.synced {
            self.elapsed += dt * self.options.playback_speed;
        }
        self.synced = true;
        if self.options.looping && duration > 0.0 {
            self.elapsed = self.elapsed.rem_euclid(duration);
        } else {
            self.elapsed = self.elapsed.clamp(0.0, duration);
            if self.elapsed >= duration {
                log::debug!("playback reached the end of a {frame_count}-frame sequence");
                self.playing = false;
            }
        }

        let frame = self.frame_at(self.elapsed, frame_count);
        let already_shown = matches!(
            container.sequence_state(),
            SequenceState::Bound { frame_index } if frame_index == frame
        );
        if already_shown {
            return None;
        }

        container.advance_to_frame(frame);
        Some(frame)
    }
}
