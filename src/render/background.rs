//! Everything painted around the text: gradient or image background, bokeh, vignette.

use std::f64::consts::PI;

use crate::assets::image::RasterImage;
use crate::foundation::core::{Point, Rect, Rgba8};
use crate::foundation::error::TelescrollResult;
use crate::render::surface::{BlendMode, GradientStop, Paint, RadialGradient, Surface};
use crate::style::palette::{GRADIENT_STOP_OFFSETS, Palette};
use crate::style::{BackgroundKind, StyleConfig};

pub const BOKEH_COUNT: usize = 15;
pub const BOKEH_OPACITY: f64 = 0.15;
/// Golden angle in degrees, used directly as a radian seed.
const BOKEH_SEED_STEP: f64 = 137.508;
pub const IMAGE_OVERLAY_ALPHA: f64 = 0.4;
pub const VIGNETTE_ALPHA: f64 = 0.3;

pub fn gradient_for(width: f64, height: f64, palette: &Palette) -> RadialGradient {
    RadialGradient {
        start_center: Point::new(width * 0.5, height * 0.3),
        start_radius: 0.0,
        end_center: Point::new(width * 0.5, height * 0.5),
        end_radius: width.max(height) * 0.8,
        stops: GRADIENT_STOP_OFFSETS
            .iter()
            .zip(palette.stops)
            .map(|(&offset, color)| GradientStop::new(f64::from(offset), color))
            .collect(),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BokehBlob {
    pub center: Point,
    pub radius: f64,
    pub color: Rgba8,
}

impl BokehBlob {
    pub fn paint(&self) -> Paint {
        Paint::Radial(RadialGradient::concentric(
            self.center,
            0.0,
            self.radius,
            vec![
                GradientStop::new(0.0, self.color.with_alpha(0x60)),
                GradientStop::new(0.5, self.color.with_alpha(0x30)),
                GradientStop::new(1.0, self.color.with_alpha(0x00)),
            ],
        ))
    }
}

/// Blob `index` at `progress`. Depends on nothing else, so every frame is reproducible.
pub fn bokeh_blob(
    index: usize,
    progress: f64,
    width: f64,
    height: f64,
    palette: &Palette,
) -> BokehBlob {
    let i = index as f64;
    let seed = i * BOKEH_SEED_STEP;
    let x = (seed.sin() * 0.5 + 0.5) * width;
    let y = (seed.cos() * 0.5 + 0.5) * height;

    let base_radius = 40.0 + (index % 4) as f64 * 25.0;
    let radius = base_radius + (progress * PI * 2.0 + i).sin() * 8.0;
    let dx = (progress * PI + i * 0.5).sin() * 15.0;
    let dy = (progress * PI + i * 0.3).cos() * 15.0;

    BokehBlob {
        center: Point::new(x + dx, y + dy),
        radius,
        color: palette.bokeh[index % palette.bokeh.len()],
    }
}

pub fn bokeh_blobs(progress: f64, width: f64, height: f64, palette: &Palette) -> Vec<BokehBlob> {
    (0..BOKEH_COUNT)
        .map(|i| bokeh_blob(i, progress, width, height, palette))
        .collect()
}

/// Destination rect that covers `width`x`height` with the image, preserving its aspect
/// ratio and centering the overflow.
pub fn cover_rect(image_w: u32, image_h: u32, width: f64, height: f64) -> Rect {
    let image_aspect = f64::from(image_w) / f64::from(image_h);
    let canvas_aspect = width / height;
    if image_aspect > canvas_aspect {
        let draw_w = height * image_aspect;
        let x = (width - draw_w) / 2.0;
        Rect::new(x, 0.0, x + draw_w, height)
    } else {
        let draw_h = width / image_aspect;
        let y = (height - draw_h) / 2.0;
        Rect::new(0.0, y, width, y + draw_h)
    }
}

pub fn vignette_for(width: f64, height: f64) -> RadialGradient {
    RadialGradient::concentric(
        Point::new(width / 2.0, height / 2.0),
        height * 0.5,
        height * 0.9,
        vec![
            GradientStop::new(0.0, Rgba8::TRANSPARENT),
            GradientStop::new(1.0, Rgba8::rgba(0, 0, 0, VIGNETTE_ALPHA)),
        ],
    )
}

pub fn paint_background(
    surface: &mut dyn Surface,
    style: &StyleConfig,
    progress: f64,
) -> TelescrollResult<()> {
    match style.background() {
        BackgroundKind::CustomImage(image) => paint_image_background(surface, &image),
        BackgroundKind::Gradient(preset) => {
            let (w, h) = surface_size(surface);
            let palette = preset.palette();
            surface.fill_rect(
                full_rect(w, h),
                &Paint::Radial(gradient_for(w, h, &palette)),
                BlendMode::Normal,
                1.0,
            )?;
            for blob in bokeh_blobs(progress, w, h, &palette) {
                surface.fill_circle(
                    blob.center,
                    blob.radius,
                    &blob.paint(),
                    BlendMode::Screen,
                    BOKEH_OPACITY,
                )?;
            }
            Ok(())
        }
    }
}

fn paint_image_background(surface: &mut dyn Surface, image: &RasterImage) -> TelescrollResult<()> {
    let (w, h) = surface_size(surface);
    surface.draw_image(image, cover_rect(image.width, image.height, w, h))?;
    surface.fill_rect(
        full_rect(w, h),
        &Paint::Solid(Rgba8::rgba(0, 0, 0, IMAGE_OVERLAY_ALPHA)),
        BlendMode::Normal,
        1.0,
    )
}

pub fn paint_vignette(surface: &mut dyn Surface) -> TelescrollResult<()> {
    let (w, h) = surface_size(surface);
    surface.fill_rect(
        full_rect(w, h),
        &Paint::Radial(vignette_for(w, h)),
        BlendMode::Normal,
        1.0,
    )
}

fn surface_size(surface: &dyn Surface) -> (f64, f64) {
    (f64::from(surface.width()), f64::from(surface.height()))
}

fn full_rect(w: f64, h: f64) -> Rect {
    Rect::new(0.0, 0.0, w, h)
}

#[cfg(test)]
#[path = "../../tests/unit/render/background.rs"]
mod tests;
