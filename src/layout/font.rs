use std::borrow::Cow;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::foundation::error::{TelescrollError, TelescrollResult};
use crate::layout::{FontSpec, TextMeasurer};

/// Overrides font discovery with an explicit font file.
pub const FONT_ENV_VAR: &str = "TELESCROLL_FONT";

/// Bold sans-serif faces commonly shipped by desktop and server distributions.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Brush carried through Parley layouts. Glyph colors are chosen per draw pass, so this
/// stays at its default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlyphBrush;

struct ShapingContexts {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<GlyphBrush>,
}

/// Text measurer and shaper backed by one font file.
///
/// The `family` of a [`FontSpec`] is informational here: every line is shaped with the loaded
/// face, which is chosen to be a bold sans-serif.
pub struct FontMeasurer {
    source: Option<PathBuf>,
    family_name: String,
    font_data: vello_cpu::peniko::FontData,
    shaping: RefCell<ShapingContexts>,
}

impl std::fmt::Debug for FontMeasurer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontMeasurer")
            .field("source", &self.source)
            .field("family_name", &self.family_name)
            .finish_non_exhaustive()
    }
}

impl FontMeasurer {
    pub fn from_bytes(bytes: Vec<u8>) -> TelescrollResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| TelescrollError::asset("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| TelescrollError::asset("registered font family has no name"))?
            .to_string();

        let font_data = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);

        Ok(Self {
            source: None,
            family_name,
            font_data,
            shaping: RefCell::new(ShapingContexts {
                font_ctx,
                layout_ctx: parley::LayoutContext::new(),
            }),
        })
    }

    pub fn from_path(path: &Path) -> TelescrollResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            TelescrollError::asset(format!("read font '{}': {e}", path.display()))
        })?;
        let mut measurer = Self::from_bytes(bytes)?;
        measurer.source = Some(path.to_path_buf());
        Ok(measurer)
    }

    /// Load `explicit` if given, else the font named by `TELESCROLL_FONT`, else the first
    /// system candidate that exists.
    pub fn discover(explicit: Option<&Path>) -> TelescrollResult<Self> {
        let path = locate_font(explicit).ok_or_else(|| {
            TelescrollError::asset(format!(
                "no usable font found; set {FONT_ENV_VAR} or configure style.font_path"
            ))
        })?;
        let measurer = Self::from_path(&path)?;
        tracing::info!(font = %path.display(), family = %measurer.family_name, "loaded font");
        Ok(measurer)
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn font_data(&self) -> &vello_cpu::peniko::FontData {
        &self.font_data
    }

    /// Shape a single unwrapped line at `size_px`.
    pub fn shape_line(&self, text: &str, size_px: f32) -> parley::Layout<GlyphBrush> {
        let mut shaping = self.shaping.borrow_mut();
        let ShapingContexts {
            font_ctx,
            layout_ctx,
        } = &mut *shaping;

        let mut builder = layout_ctx.ranged_builder(font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(GlyphBrush));

        let mut layout: parley::Layout<GlyphBrush> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

impl TextMeasurer for FontMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        let layout = self.shape_line(text, font.size_px as f32);
        layout
            .lines()
            .map(|line| f64::from(line.metrics().advance))
            .fold(0.0, f64::max)
    }
}

pub fn locate_font(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }
    if let Some(p) = std::env::var_os(FONT_ENV_VAR).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(p));
    }
    FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}
