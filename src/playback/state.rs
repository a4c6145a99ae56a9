/// Coarse playback phase derived from [`PlaybackState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackPhase {
    Idle,
    Playing,
    Paused,
}

/// Playback flags and timing, owned by the player.
///
/// `is_playing` and `is_paused` are never both true; the setters keep it that way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackState {
    is_playing: bool,
    is_paused: bool,
    elapsed_ms: u64,
    total_duration_ms: u64,
}

impl PlaybackState {
    pub fn new(total_duration_ms: u64) -> Self {
        Self {
            total_duration_ms,
            ..Self::default()
        }
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.total_duration_ms
    }

    pub fn phase(&self) -> PlaybackPhase {
        match (self.is_playing, self.is_paused) {
            (true, _) => PlaybackPhase::Playing,
            (false, true) => PlaybackPhase::Paused,
            (false, false) => PlaybackPhase::Idle,
        }
    }

    /// True once elapsed time has reached the total duration.
    pub fn is_complete(&self) -> bool {
        self.total_duration_ms > 0 && self.elapsed_ms >= self.total_duration_ms
    }

    /// Overall progress as a percentage, capped at 100.
    pub fn percent(&self) -> f64 {
        if self.total_duration_ms == 0 {
            return 0.0;
        }
        (self.elapsed_ms as f64 / self.total_duration_ms as f64 * 100.0).min(100.0)
    }

    pub(crate) fn set_playing(&mut self) {
        self.is_playing = true;
        self.is_paused = false;
    }

    pub(crate) fn set_paused(&mut self) {
        self.is_playing = false;
        self.is_paused = true;
    }

    pub(crate) fn set_idle(&mut self) {
        self.is_playing = false;
        self.is_paused = false;
    }

    pub(crate) fn set_elapsed(&mut self, elapsed_ms: u64) {
        self.elapsed_ms = elapsed_ms;
    }
}
