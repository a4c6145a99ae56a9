//! Read-only style configuration supplied to the frame renderer.

pub mod palette;

use std::sync::Arc;

use crate::assets::image::RasterImage;
use crate::foundation::core::Canvas;
use crate::layout::FontSpec;

pub use palette::{GradientPreset, Palette};

pub const DEFAULT_FONT_FAMILY: &str = "Arial, Helvetica, sans-serif";
pub const DEFAULT_FONT_SIZE_RATIO: f64 = 0.055;
/// Wrapped lines may use this fraction of the surface width.
pub const MAX_LINE_WIDTH_RATIO: f64 = 0.85;

/// Shared handle to a decoded background image.
pub type ImageHandle = Arc<RasterImage>;

/// What gets painted behind the text.
#[derive(Clone, Debug)]
pub enum BackgroundKind {
    Gradient(GradientPreset),
    CustomImage(ImageHandle),
}

#[derive(Clone, Debug)]
pub struct StyleConfig {
    /// Gradient used whenever no custom image is loaded.
    pub gradient: GradientPreset,
    pub custom_image: Option<ImageHandle>,
    pub font_family: String,
    /// Base font size as a fraction of the shorter surface side.
    pub base_font_size_ratio: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            gradient: GradientPreset::default(),
            custom_image: None,
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
            base_font_size_ratio: DEFAULT_FONT_SIZE_RATIO,
        }
    }
}

impl StyleConfig {
    pub fn background(&self) -> BackgroundKind {
        match &self.custom_image {
            Some(img) => BackgroundKind::CustomImage(img.clone()),
            None => BackgroundKind::Gradient(self.gradient),
        }
    }

    pub fn base_font_size(&self, canvas: Canvas) -> f64 {
        canvas.min_side() * self.base_font_size_ratio
    }

    pub fn font(&self, canvas: Canvas) -> FontSpec {
        FontSpec {
            family: self.font_family.clone(),
            size_px: self.base_font_size(canvas),
            bold: true,
        }
    }

    pub fn max_line_width(&self, canvas: Canvas) -> f64 {
        f64::from(canvas.width) * MAX_LINE_WIDTH_RATIO
    }
}
