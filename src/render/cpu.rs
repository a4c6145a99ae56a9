use rayon::prelude::*;

use crate::assets::image::RasterImage;
use crate::foundation::core::{Canvas, Point, Rect};
use crate::foundation::error::{TelescrollError, TelescrollResult};
use crate::layout::{FontMeasurer, FontSpec, MonospaceMeasurer, TextMeasurer};
use crate::render::composite::{self, AlphaMask, PremulRgba8};
use crate::render::surface::{BlendMode, FrameRGBA, Paint, Surface, TextPass};

/// Raster surface: premultiplied RGBA8 pixels composited on the CPU, glyph coverage
/// rasterized by `vello_cpu` from `parley` shaping.
pub struct CpuSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    font: Option<FontMeasurer>,
    warned_no_font: bool,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("font", &self.font)
            .finish_non_exhaustive()
    }
}

impl CpuSurface {
    pub fn new(canvas: Canvas, font: FontMeasurer) -> TelescrollResult<Self> {
        let mut surface = Self::shapes_only(canvas)?;
        surface.font = Some(font);
        Ok(surface)
    }

    /// Surface without a font: shapes and images draw normally, text passes are skipped and
    /// measurement falls back to a fixed advance.
    pub fn shapes_only(canvas: Canvas) -> TelescrollResult<Self> {
        canvas.validate()?;
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            pixels: vec![0; (canvas.width as usize) * (canvas.height as usize) * 4],
            font: None,
            warned_no_font: false,
        })
    }

    pub fn font(&self) -> Option<&FontMeasurer> {
        self.font.as_ref()
    }

    /// Apply `shade` to every pixel whose center lies in `rect`, row-parallel.
    fn shade_region(
        &mut self,
        rect: Rect,
        blend: BlendMode,
        opacity: f64,
        shade: impl Fn(Point) -> Option<PremulRgba8> + Sync,
    ) {
        let Some((x0, y0, x1, y1)) = clip_to_pixels(rect, self.width, self.height) else {
            return;
        };
        let opacity = opacity as f32;
        let row_bytes = self.width as usize * 4;
        self.pixels
            .par_chunks_mut(row_bytes)
            .enumerate()
            .skip(y0)
            .take(y1 - y0)
            .for_each(|(y, row)| {
                let py = y as f64 + 0.5;
                for x in x0..x1 {
                    let Some(src) = shade(Point::new(x as f64 + 0.5, py)) else {
                        continue;
                    };
                    let i = x * 4;
                    let d = [row[i], row[i + 1], row[i + 2], row[i + 3]];
                    row[i..i + 4].copy_from_slice(&composite::blend(d, src, blend, opacity));
                }
            });
    }

    fn glyph_mask(&self, pass: &TextPass, margin: f64) -> TelescrollResult<Option<GlyphTile>> {
        let font = self
            .font
            .as_ref()
            .ok_or_else(|| TelescrollError::render("no font loaded for text drawing"))?;
        let size_px = pass.font.size_px as f32;
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(TelescrollError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let layout = font.shape_line(&pass.text, size_px);
        let Some(line) = layout.lines().next() else {
            return Ok(None);
        };
        let metrics = line.metrics();
        let advance = f64::from(metrics.advance);
        let ascent = f64::from(metrics.ascent);
        let descent = f64::from(metrics.descent);

        // Horizontally centered; vertically centered on the em box.
        let left = pass.center.x - advance / 2.0;
        let baseline = pass.center.y + (ascent - descent) / 2.0;
        let line_rect = Rect::new(left, baseline - ascent, left + advance, baseline + descent);

        let bounds = Rect::new(
            -margin,
            -margin,
            f64::from(self.width) + margin,
            f64::from(self.height) + margin,
        );
        let tile_rect = line_rect.inflate(margin, margin).intersect(bounds);
        if tile_rect.width() < 1.0 || tile_rect.height() < 1.0 {
            return Ok(None);
        }
        let ox = tile_rect.x0.floor() as i64;
        let oy = tile_rect.y0.floor() as i64;
        let tw = u16::try_from((tile_rect.x1.ceil() as i64 - ox).max(1))
            .map_err(|_| TelescrollError::render("text tile width exceeds u16"))?;
        let th = u16::try_from((tile_rect.y1.ceil() as i64 - oy).max(1))
            .map_err(|_| TelescrollError::render("text tile height exceeds u16"))?;

        let shift_x = (left - ox as f64) as f32;
        let shift_y = (baseline - oy as f64) as f32 - metrics.baseline;

        let mut ctx = vello_cpu::RenderContext::new(tw, th);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x + shift_x,
                y: g.y + shift_y,
            });
            ctx.glyph_run(font.font_data())
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(tw, th);
        ctx.render_to_pixmap(&mut pixmap);

        let mask = AlphaMask::from_rgba8_alpha(
            u32::from(tw),
            u32::from(th),
            pixmap.data_as_u8_slice(),
        )?;
        Ok(Some(GlyphTile { mask, ox, oy }))
    }
}

struct GlyphTile {
    mask: AlphaMask,
    ox: i64,
    oy: i64,
}

/// Pixel index range `[x0, x1) x [y0, y1)` of pixel centers inside `rect`.
fn clip_to_pixels(rect: Rect, width: u32, height: u32) -> Option<(usize, usize, usize, usize)> {
    let x0 = (rect.x0 - 0.5).ceil().max(0.0);
    let y0 = (rect.y0 - 0.5).ceil().max(0.0);
    let x1 = (rect.x1 - 0.5).ceil().min(f64::from(width));
    let y1 = (rect.y1 - 0.5).ceil().min(f64::from(height));
    if !(x0 < x1 && y0 < y1) {
        return None;
    }
    Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
}

impl TextMeasurer for CpuSurface {
    fn measure(&self, text: &str, font: &FontSpec) -> f64 {
        match &self.font {
            Some(f) => f.measure(text, font),
            None => MonospaceMeasurer::default().measure(text, font),
        }
    }
}

impl Surface for CpuSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn fill_rect(
        &mut self,
        rect: Rect,
        paint: &Paint,
        blend: BlendMode,
        opacity: f64,
    ) -> TelescrollResult<()> {
        self.shade_region(rect, blend, opacity, |p| Some(paint.sample(p)));
        Ok(())
    }

    fn fill_circle(
        &mut self,
        center: Point,
        radius: f64,
        paint: &Paint,
        blend: BlendMode,
        opacity: f64,
    ) -> TelescrollResult<()> {
        if radius <= 0.0 || !radius.is_finite() {
            return Ok(());
        }
        let bounds = Rect::new(
            center.x - radius - 1.0,
            center.y - radius - 1.0,
            center.x + radius + 1.0,
            center.y + radius + 1.0,
        );
        self.shade_region(bounds, blend, opacity, |p| {
            let coverage = (radius + 0.5 - p.distance(center)).clamp(0.0, 1.0);
            if coverage <= 0.0 {
                return None;
            }
            Some(composite::scale(
                paint.sample(p),
                (coverage * 255.0).round() as u8,
            ))
        });
        Ok(())
    }

    fn draw_image(&mut self, image: &RasterImage, dest: Rect) -> TelescrollResult<()> {
        if dest.width() <= 0.0 || dest.height() <= 0.0 {
            return Err(TelescrollError::render("image destination must be non-empty"));
        }
        let sx = f64::from(image.width) / dest.width();
        let sy = f64::from(image.height) / dest.height();
        self.shade_region(dest, BlendMode::Normal, 1.0, |p| {
            let u = (p.x - dest.x0) * sx - 0.5;
            let v = (p.y - dest.y0) * sy - 0.5;
            Some(sample_bilinear(image, u, v))
        });
        Ok(())
    }

    fn draw_text(&mut self, pass: &TextPass) -> TelescrollResult<()> {
        if pass.text.trim().is_empty() || pass.opacity <= 0.0 {
            return Ok(());
        }
        if self.font.is_none() {
            if !self.warned_no_font {
                tracing::warn!("no font loaded; skipping text passes");
                self.warned_no_font = true;
            }
            return Ok(());
        }
        let half_stroke = pass.outline_width.map_or(0.0, |w| w / 2.0);
        let shadow_reach = pass.shadow.map_or(0.0, |s| {
            (s.blur / 2.0) * 3.0 + s.offset.x.abs().max(s.offset.y.abs())
        });
        let margin = (half_stroke + shadow_reach + 2.0).ceil();

        let Some(tile) = self.glyph_mask(pass, margin)? else {
            return Ok(());
        };
        let shape = match pass.outline_width {
            Some(w) => composite::dilate_mask(&tile.mask, w / 2.0),
            None => tile.mask,
        };
        if shape.is_empty() {
            return Ok(());
        }
        let opacity = pass.opacity as f32;

        if let Some(shadow) = pass.shadow
            && shadow.color.a > 0
        {
            let blurred = composite::blur_mask(&shape, shadow.blur / 2.0)?;
            composite::composite_mask(
                &mut self.pixels,
                self.width,
                self.height,
                &blurred,
                tile.ox + shadow.offset.x.round() as i64,
                tile.oy + shadow.offset.y.round() as i64,
                shadow.color.to_premul(),
                opacity,
            )?;
        }

        composite::composite_mask(
            &mut self.pixels,
            self.width,
            self.height,
            &shape,
            tile.ox,
            tile.oy,
            pass.color.to_premul(),
            opacity,
        )
    }

    fn snapshot(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.width,
            height: self.height,
            data: self.pixels.clone(),
            premultiplied: true,
        }
    }
}

fn sample_bilinear(image: &RasterImage, u: f64, v: f64) -> PremulRgba8 {
    let max_x = f64::from(image.width - 1);
    let max_y = f64::from(image.height - 1);
    let u = u.clamp(0.0, max_x);
    let v = v.clamp(0.0, max_y);
    let (x0, y0) = (u.floor(), v.floor());
    let (fx, fy) = (u - x0, v - y0);
    let (x0, y0) = (x0 as u32, y0 as u32);

    let p00 = image.pixel(x0, y0);
    let p10 = image.pixel(x0 + 1, y0);
    let p01 = image.pixel(x0, y0 + 1);
    let p11 = image.pixel(x0 + 1, y0 + 1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = f64::from(p00[c]) * (1.0 - fx) + f64::from(p10[c]) * fx;
        let bottom = f64::from(p01[c]) * (1.0 - fx) + f64::from(p11[c]) * fx;
        out[c] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
