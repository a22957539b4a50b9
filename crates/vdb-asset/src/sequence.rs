//! Current-frame tracking for an asset container.

/// State of a [`SequenceController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequenceState {
    /// No frame has been requested yet.
    #[default]
    Idle,
    /// A frame was explicitly requested.
    Bound {
        /// The requested frame.
        frame_index: u32,
    },
}

/// Single source of truth for the active frame of a container.
///
/// The index is stored as given. Whether it is valid for a particular
/// sequenced volume is decided when that volume resolves its render info.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceController {
    state: SequenceState,
}

impl SequenceController {
    /// Creates an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves to `frame_index` and returns the previous index.
    pub fn advance(&mut self, frame_index: u32) -> u32 {
        let previous = self.current_frame_index();
        self.state = SequenceState::Bound { frame_index };
        previous
    }

    /// Returns the active frame, `0` while idle.
    #[must_use]
    pub fn current_frame_index(&self) -> u32 {
        match self.state {
            SequenceState::Idle => 0,
            SequenceState::Bound { frame_index } => frame_index,
        }
    }

    /// Returns the controller state.
    #[must_use]
    pub fn state(&self) -> SequenceState {
        self.state
    }

    /// Returns whether a frame was ever requested.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        matches!(self.state, SequenceState::Bound { .. })
    }
}
