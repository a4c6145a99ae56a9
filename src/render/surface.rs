use crate::assets::image::RasterImage;
use crate::foundation::core::{Point, Rect, Rgba8, Vec2};
use crate::foundation::error::TelescrollResult;
use crate::layout::{FontSpec, TextMeasurer};

/// A rendered frame in RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    /// True if `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize) * 4],
            premultiplied: true,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Straight-alpha copy of the pixel data, as image encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u32::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    /// Source-over.
    #[default]
    Normal,
    /// `s + d - s·d`, which only ever brightens.
    Screen,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Rgba8,
}

impl GradientStop {
    pub const fn new(offset: f64, color: Rgba8) -> Self {
        Self { offset, color }
    }
}

/// Two-circle radial gradient, padded beyond its first and last stop.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    pub start_center: Point,
    pub start_radius: f64,
    pub end_center: Point,
    pub end_radius: f64,
    pub stops: Vec<GradientStop>,
}

impl RadialGradient {
    /// Gradient between two circles sharing `center`.
    pub fn concentric(
        center: Point,
        start_radius: f64,
        end_radius: f64,
        stops: Vec<GradientStop>,
    ) -> Self {
        Self {
            start_center: center,
            start_radius,
            end_center: center,
            end_radius,
            stops,
        }
    }

    /// Gradient parameter at `p`, or `None` where no interpolated circle passes through `p`.
    pub fn param_at(&self, p: Point) -> Option<f64> {
        let cd = self.end_center - self.start_center;
        let pd = p - self.start_center;
        let dr = self.end_radius - self.start_radius;
        let r0 = self.start_radius;

        let a = cd.dot(cd) - dr * dr;
        let b = pd.dot(cd) + r0 * dr;
        let c = pd.dot(pd) - r0 * r0;
        let radius_ok = |t: f64| r0 + t * dr >= 0.0;

        let t = if a.abs() < 1e-9 {
            if b.abs() < 1e-12 {
                return None;
            }
            let t = c / (2.0 * b);
            radius_ok(t).then_some(t)?
        } else {
            let disc = b * b - a * c;
            if disc < 0.0 {
                return None;
            }
            let sq = disc.sqrt();
            let (t_hi, t_lo) = {
                let t1 = (b + sq) / a;
                let t2 = (b - sq) / a;
                if t1 >= t2 { (t1, t2) } else { (t2, t1) }
            };
            if radius_ok(t_hi) {
                t_hi
            } else if radius_ok(t_lo) {
                t_lo
            } else {
                return None;
            }
        };
        Some(t.clamp(0.0, 1.0))
    }

    /// Premultiplied color at `t` in `[0, 1]`.
    pub fn color_at_param(&self, t: f64) -> [u8; 4] {
        let Some(first) = self.stops.first() else {
            return [0; 4];
        };
        if t <= first.offset {
            return first.color.to_premul();
        }
        for pair in self.stops.windows(2) {
            let (s0, s1) = (pair[0], pair[1]);
            if t <= s1.offset {
                let span = s1.offset - s0.offset;
                let f = if span <= 0.0 { 1.0 } else { (t - s0.offset) / span };
                return lerp_premul(s0.color.to_premul(), s1.color.to_premul(), f);
            }
        }
        self.stops
            .last()
            .map(|s| s.color.to_premul())
            .unwrap_or([0; 4])
    }

    pub fn color_at(&self, p: Point) -> [u8; 4] {
        match self.param_at(p) {
            Some(t) => self.color_at_param(t),
            None => [0; 4],
        }
    }
}

fn lerp_premul(a: [u8; 4], b: [u8; 4], t: f64) -> [u8; 4] {
    let t = t.clamp(0.0, 1.0);
    let mut out = [0u8; 4];
    for i in 0..4 {
        let v = f64::from(a[i]) + (f64::from(b[i]) - f64::from(a[i])) * t;
        out[i] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba8),
    Radial(RadialGradient),
}

impl Paint {
    /// Premultiplied color at `p`.
    pub fn sample(&self, p: Point) -> [u8; 4] {
        match self {
            Paint::Solid(c) => c.to_premul(),
            Paint::Radial(g) => g.color_at(p),
        }
    }
}

/// Blurred, tinted copy of a shape drawn underneath it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub color: Rgba8,
    /// Blur extent in pixels; the Gaussian sigma is half of this.
    pub blur: f64,
    pub offset: Vec2,
}

/// One draw of a single line of text, centered on `center`.
#[derive(Clone, Debug, PartialEq)]
pub struct TextPass {
    pub text: String,
    pub center: Point,
    pub font: FontSpec,
    pub color: Rgba8,
    pub opacity: f64,
    /// Stroke the glyph outlines with this width (round joins) instead of filling them.
    pub outline_width: Option<f64>,
    pub shadow: Option<Shadow>,
}

/// 2D raster target the frame renderer paints into.
pub trait Surface: TextMeasurer {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn clear(&mut self);
    fn fill_rect(
        &mut self,
        rect: Rect,
        paint: &Paint,
        blend: BlendMode,
        opacity: f64,
    ) -> TelescrollResult<()>;
    fn fill_circle(
        &mut self,
        center: Point,
        radius: f64,
        paint: &Paint,
        blend: BlendMode,
        opacity: f64,
    ) -> TelescrollResult<()>;
    /// Scale `image` into `dest`; parts of `dest` outside the surface are clipped.
    fn draw_image(&mut self, image: &RasterImage, dest: Rect) -> TelescrollResult<()>;
    fn draw_text(&mut self, pass: &TextPass) -> TelescrollResult<()>;

    fn snapshot(&self) -> FrameRGBA;
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
