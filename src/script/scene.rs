use crate::foundation::error::{TelescrollError, TelescrollResult};

/// One timed segment of the video.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    text: String,
    duration_ms: u64,
}

impl Scene {
    pub fn new(text: impl Into<String>, duration_ms: u64) -> TelescrollResult<Self> {
        if duration_ms == 0 {
            return Err(TelescrollError::validation("scene duration must be > 0 ms"));
        }
        Ok(Self {
            text: text.into(),
            duration_ms,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}

/// Position inside the scene list for a given elapsed time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneCursor {
    pub index: usize,
    /// Cumulative duration of all scenes before `index`.
    pub start_ms: u64,
    /// Normalized position within the scene, in `[0, 1]`.
    pub progress: f64,
}

/// Ordered, immutable scene sequence with cumulative timing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneList {
    scenes: Vec<Scene>,
}

impl SceneList {
    pub fn new(scenes: Vec<Scene>) -> Self {
        Self { scenes }
    }

    /// Build the single full-script scrolling scene.
    pub fn from_script(script: &str, duration_ms: u64) -> TelescrollResult<Self> {
        let text = script.trim();
        if text.is_empty() {
            return Err(TelescrollError::validation("script is empty"));
        }
        Ok(Self::new(vec![Scene::new(text, duration_ms)?]))
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn get(&self, index: usize) -> Option<&Scene> {
        self.scenes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.iter()
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.scenes.iter().map(Scene::duration_ms).sum()
    }

    /// Linear scan for the first scene whose window contains `elapsed_ms`.
    ///
    /// Returns `None` once `elapsed_ms` reaches the total duration.
    pub fn locate(&self, elapsed_ms: u64) -> Option<SceneCursor> {
        let mut before = 0u64;
        for (index, scene) in self.scenes.iter().enumerate() {
            let end = before + scene.duration_ms;
            if elapsed_ms < end {
                let progress =
                    ((elapsed_ms - before) as f64 / scene.duration_ms as f64).clamp(0.0, 1.0);
                return Some(SceneCursor {
                    index,
                    start_ms: before,
                    progress,
                });
            }
            before = end;
        }
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/scene.rs"]
mod tests;
