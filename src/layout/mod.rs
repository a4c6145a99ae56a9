//! Script text layout: greedy word wrapping against a text-measurement capability.

pub mod font;
pub mod wrap;

pub use font::FontMeasurer;
pub use wrap::{LayoutCache, WrappedText, wrap};

/// Font selection used for both measuring and drawing a line.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size_px: f64,
    pub bold: bool,
}

/// Measures the advance width of a single line of text in pixels.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> f64;
}

/// Fixed advance per character, as a fraction of the font size.
///
/// Used where no real font is available: tests and recording surfaces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMeasurer {
    pub advance_em: f64,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self { advance_em: 0.6 }
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> f64 {
        text.chars().count() as f64 * self.advance_em * font.size_px
    }
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, text: &str, font: &FontSpec) -> f64 {
        (**self).measure(text, font)
    }
}
