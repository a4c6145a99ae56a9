//! JSON project files: script, canvas, style, assets, and export settings.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::Container;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{TelescrollError, TelescrollResult};
use crate::script::DEFAULT_SCENE_DURATION_MS;
use crate::style::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE_RATIO, GradientPreset, StyleConfig};

pub const MAX_FONT_SIZE_RATIO: f64 = 0.5;

fn default_fps() -> Fps {
    Fps { num: 30, den: 1 }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Inline script text. Takes precedence over `script_path`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_path: Option<PathBuf>,
    pub canvas: Canvas,
    #[serde(default = "default_fps")]
    pub fps: Fps,
    pub scene_duration_ms: u64,
    pub style: StyleSection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<PathBuf>,
    pub output: OutputSection,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            script: None,
            script_path: None,
            canvas: Canvas::default(),
            fps: default_fps(),
            scene_duration_ms: DEFAULT_SCENE_DURATION_MS,
            style: StyleSection::default(),
            audio: None,
            output: OutputSection::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StyleSection {
    pub gradient: GradientPreset,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<PathBuf>,
    pub font_family: String,
    /// Base font size as a fraction of the shorter canvas side.
    pub font_size_ratio: f64,
    /// Font file used for shaping; discovered from the system when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
}

impl Default for StyleSection {
    fn default() -> Self {
        Self {
            gradient: GradientPreset::default(),
            background_image: None,
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
            font_size_ratio: DEFAULT_FONT_SIZE_RATIO,
            font_path: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub dir: PathBuf,
    pub container: Container,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            container: Container::default(),
        }
    }
}

impl ProjectConfig {
    /// Read a project file. Relative paths inside it resolve against its directory.
    pub fn load(path: &Path) -> TelescrollResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read project file '{}'", path.display()))?;
        let mut cfg = Self::from_json_str(&text)
            .with_context(|| format!("failed to parse project file '{}'", path.display()))?;
        if let Some(base) = path.parent() {
            cfg.resolve_relative_to(base);
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_pretty(&self) -> TelescrollResult<String> {
        Ok(serde_json::to_string_pretty(self).context("failed to serialize project")?)
    }

    pub fn resolve_relative_to(&mut self, base: &Path) {
        let fix = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        for p in [
            self.script_path.as_mut(),
            self.audio.as_mut(),
            self.style.background_image.as_mut(),
            self.style.font_path.as_mut(),
        ]
        .into_iter()
        .flatten()
        {
            fix(p);
        }
        fix(&mut self.output.dir);
    }

    pub fn validate(&self) -> TelescrollResult<()> {
        self.canvas.validate()?;
        if !self.canvas.width.is_multiple_of(2) || !self.canvas.height.is_multiple_of(2) {
            return Err(TelescrollError::validation(
                "canvas width/height must be even (required for yuv420p output)",
            ));
        }
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(TelescrollError::validation("fps must be non-zero"));
        }
        if self.scene_duration_ms == 0 {
            return Err(TelescrollError::validation(
                "scene_duration_ms must be non-zero",
            ));
        }
        let ratio = self.style.font_size_ratio;
        if !(ratio > 0.0 && ratio <= MAX_FONT_SIZE_RATIO) {
            return Err(TelescrollError::validation(format!(
                "font_size_ratio must be in (0, {MAX_FONT_SIZE_RATIO}], got {ratio}"
            )));
        }
        Ok(())
    }

    /// The script text: inline when present, otherwise read from `script_path`.
    pub fn script_text(&self) -> TelescrollResult<String> {
        if let Some(s) = &self.script {
            return Ok(s.clone());
        }
        match &self.script_path {
            Some(path) => Ok(std::fs::read_to_string(path)
                .with_context(|| format!("failed to read script '{}'", path.display()))?),
            None => Ok(String::new()),
        }
    }

    /// Style without the background image, which is loaded as an asset.
    pub fn style_config(&self) -> StyleConfig {
        StyleConfig {
            gradient: self.style.gradient,
            custom_image: None,
            font_family: self.style.font_family.clone(),
            base_font_size_ratio: self.style.font_size_ratio,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
