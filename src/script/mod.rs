//! Script intake: word statistics for the UI and the timed scenes built from a script.

pub mod scene;
pub mod summary;

/// Fixed length of the single scrolling scene.
pub const DEFAULT_SCENE_DURATION_MS: u64 = 14_000;
