use crate::foundation::core::{Canvas, Point, Rgba8, Vec2};
use crate::foundation::error::TelescrollResult;
use crate::foundation::math::{lerp, smoothstep};
use crate::layout::{FontSpec, LayoutCache, TextMeasurer, WrappedText};
use crate::render::background::{paint_background, paint_vignette};
use crate::render::surface::{Shadow, Surface, TextPass};
use crate::style::StyleConfig;

/// Line pitch as a multiple of the base font size.
pub const LINE_HEIGHT_FACTOR: f64 = 2.3;
/// Lines further than this many line heights outside the surface are not drawn.
pub const CULL_MARGIN_LINES: f64 = 6.0;
pub const FADE_ZONE_RATIO: f64 = 0.15;
/// Distance from the vertical center, as a fraction of height, where highlight reaches 0.
pub const HIGHLIGHT_RANGE_RATIO: f64 = 0.4;
pub const MIN_VISIBLE_ALPHA: f64 = 0.01;
pub const GLOW_THRESHOLD: f64 = 0.5;

/// Vertical scroll path for one wrapped scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollGeometry {
    pub line_height: f64,
    pub total_height: f64,
    pub start_y: f64,
    pub end_y: f64,
}

impl ScrollGeometry {
    pub fn new(line_count: usize, base_font_size: f64, surface_height: f64) -> Self {
        let line_height = base_font_size * LINE_HEIGHT_FACTOR;
        let total_height = line_count as f64 * line_height;
        Self {
            line_height,
            total_height,
            start_y: surface_height * 0.55,
            end_y: surface_height * 0.45 - total_height * 0.3,
        }
    }

    /// Y of the first line at `progress`; linear in `progress`.
    pub fn offset(&self, progress: f64) -> f64 {
        lerp(self.start_y, self.end_y, progress.clamp(0.0, 1.0))
    }

    pub fn line_y(&self, index: usize, offset: f64) -> f64 {
        offset + index as f64 * self.line_height
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineVisual {
    pub alpha: f64,
    /// 1 at the vertical center, falling linearly to 0.
    pub highlight: f64,
}

/// Opacity and center highlight for a line at `screen_y`, or `None` when it is culled.
pub fn line_visual(screen_y: f64, surface_height: f64, line_height: f64) -> Option<LineVisual> {
    let band = line_height * CULL_MARGIN_LINES;
    if !(screen_y > -band && screen_y < surface_height + band) {
        return None;
    }

    let fade_zone = surface_height * FADE_ZONE_RATIO;
    let alpha = if screen_y < fade_zone {
        smoothstep(screen_y / fade_zone)
    } else if screen_y > surface_height - fade_zone {
        smoothstep((surface_height - screen_y) / fade_zone)
    } else {
        1.0
    };

    let distance = (screen_y - surface_height / 2.0).abs();
    let highlight = (1.0 - distance / (surface_height * HIGHLIGHT_RANGE_RATIO)).max(0.0);

    Some(LineVisual {
        alpha: alpha.clamp(0.0, 1.0),
        highlight,
    })
}

/// Draw passes for one visible line, back to front.
pub fn line_passes(text: &str, center: Point, font: &FontSpec, v: LineVisual) -> Vec<TextPass> {
    let pass = |center: Point, color: Rgba8, opacity: f64| TextPass {
        text: text.to_owned(),
        center,
        font: font.clone(),
        color,
        opacity,
        outline_width: None,
        shadow: None,
    };
    let h = v.highlight;

    let drop_shadow = pass(
        center + Vec2::new(4.0, 4.0),
        Rgba8::rgba(0, 0, 0, 0.9),
        v.alpha * 0.95,
    );

    let outline = TextPass {
        outline_width: Some(10.0 + h * 4.0),
        shadow: Some(Shadow {
            color: Rgba8::rgba(0, 0, 0, 0.98),
            blur: 20.0,
            offset: Vec2::ZERO,
        }),
        ..pass(center, Rgba8::BLACK, v.alpha)
    };

    // Brightness above 1 saturates at white; the highlight shows through the glow pass.
    let fill_shadow_offset = Vec2::new(3.0, 3.0);
    let fill = TextPass {
        shadow: Some(Shadow {
            color: Rgba8::rgba(0, 0, 0, 0.8),
            blur: 15.0,
            offset: fill_shadow_offset,
        }),
        ..pass(center, Rgba8::WHITE, v.alpha)
    };

    let mut passes = vec![drop_shadow, outline, fill];
    if h > GLOW_THRESHOLD {
        passes.push(TextPass {
            shadow: Some(Shadow {
                color: Rgba8::rgba(255, 255, 255, 0.8),
                blur: 30.0,
                offset: fill_shadow_offset,
            }),
            ..pass(center, Rgba8::WHITE, v.alpha * h * 0.5)
        });
    }
    passes
}

/// One frame to draw: scene text plus its scroll progress.
#[derive(Clone, Copy, Debug)]
pub struct FrameRequest<'a> {
    pub scene_index: usize,
    pub text: &'a str,
    pub progress: f64,
    pub style: &'a StyleConfig,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub line_count: usize,
    pub lines_drawn: usize,
}

/// Paints complete frames and keeps wrapped lines cached per scene.
#[derive(Debug, Default)]
pub struct FrameRenderer {
    layout: LayoutCache,
}

impl FrameRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout_passes(&self) -> u64 {
        self.layout.wrap_passes()
    }

    pub fn invalidate_layout(&mut self) {
        self.layout.clear();
    }

    pub fn wrapped(
        &mut self,
        surface: &dyn Surface,
        scene_index: usize,
        text: &str,
        style: &StyleConfig,
    ) -> WrappedText {
        let canvas = surface_canvas(surface);
        let font = style.font(canvas);
        let measurer: &dyn TextMeasurer = surface;
        self.layout.lines_for(
            scene_index,
            text,
            style.max_line_width(canvas),
            &font,
            measurer,
        )
    }

    pub fn render(
        &mut self,
        surface: &mut dyn Surface,
        req: &FrameRequest<'_>,
    ) -> TelescrollResult<FrameReport> {
        let canvas = surface_canvas(surface);
        let wrapped = self.wrapped(surface, req.scene_index, req.text, req.style);
        let font = req.style.font(canvas);
        let width = f64::from(canvas.width);
        let height = f64::from(canvas.height);

        surface.clear();
        paint_background(surface, req.style, req.progress)?;

        let geometry = ScrollGeometry::new(wrapped.line_count(), font.size_px, height);
        let offset = geometry.offset(req.progress);
        let mut drawn = 0usize;
        for (index, line) in wrapped.lines().iter().enumerate() {
            let screen_y = geometry.line_y(index, offset);
            let Some(visual) = line_visual(screen_y, height, geometry.line_height) else {
                continue;
            };
            if line.trim().is_empty() || visual.alpha <= MIN_VISIBLE_ALPHA {
                continue;
            }
            let center = Point::new(width / 2.0, screen_y);
            for pass in line_passes(line, center, &font, visual) {
                surface.draw_text(&pass)?;
            }
            drawn += 1;
        }

        paint_vignette(surface)?;

        tracing::trace!(
            scene = req.scene_index,
            progress = req.progress,
            lines = wrapped.line_count(),
            drawn,
            "rendered frame"
        );
        Ok(FrameReport {
            line_count: wrapped.line_count(),
            lines_drawn: drawn,
        })
    }
}

fn surface_canvas(surface: &dyn Surface) -> Canvas {
    Canvas {
        width: surface.width(),
        height: surface.height(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
