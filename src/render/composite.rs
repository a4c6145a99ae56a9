//! CPU pixel kernels on premultiplied RGBA8 and single-channel coverage masks.

use rayon::prelude::*;

use crate::foundation::error::{TelescrollError, TelescrollResult};
use crate::foundation::math::mul_div255;
use crate::render::surface::BlendMode;

pub type PremulRgba8 = [u8; 4];

pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Screen blend: each channel becomes `s + d - s·d`.
pub fn screen(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }
    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;

    let mut out = [0u8; 4];
    for i in 0..4 {
        let s = mul_div255(u16::from(src[i]), op);
        let d = dst[i];
        let sd = mul_div255(u16::from(s), u16::from(d));
        out[i] = (u16::from(s) + u16::from(d) - u16::from(sd)).min(255) as u8;
    }
    out
}

pub fn blend(dst: PremulRgba8, src: PremulRgba8, mode: BlendMode, opacity: f32) -> PremulRgba8 {
    match mode {
        BlendMode::Normal => over(dst, src, opacity),
        BlendMode::Screen => screen(dst, src, opacity),
    }
}

/// Scale a premultiplied color by an 8-bit coverage value.
pub fn scale(px: PremulRgba8, coverage: u8) -> PremulRgba8 {
    if coverage == 255 {
        return px;
    }
    let c = u16::from(coverage);
    [
        mul_div255(u16::from(px[0]), c),
        mul_div255(u16::from(px[1]), c),
        mul_div255(u16::from(px[2]), c),
        mul_div255(u16::from(px[3]), c),
    ]
}

/// Single-channel 8-bit mask, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlphaMask {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl AlphaMask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize)],
        }
    }

    /// Alpha channel of a premultiplied RGBA8 buffer.
    pub fn from_rgba8_alpha(width: u32, height: u32, rgba: &[u8]) -> TelescrollResult<Self> {
        if rgba.len() != (width as usize) * (height as usize) * 4 {
            return Err(TelescrollError::render(
                "mask source must be width*height*4 bytes",
            ));
        }
        Ok(Self {
            width,
            height,
            data: rgba.chunks_exact(4).map(|px| px[3]).collect(),
        })
    }

    /// Coverage at signed coordinates; outside the mask is zero.
    pub fn get(&self, x: i64, y: i64) -> u8 {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return 0;
        }
        self.data[(y as usize) * (self.width as usize) + (x as usize)]
    }

    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&a| a == 0)
    }
}

/// Gaussian blur of a coverage mask. A `sigma` of zero or less returns the input unchanged.
pub fn blur_mask(src: &AlphaMask, sigma: f64) -> TelescrollResult<AlphaMask> {
    if !sigma.is_finite() {
        return Err(TelescrollError::validation("blur sigma must be finite"));
    }
    let radius = (sigma * 3.0).ceil() as u32;
    if sigma <= 0.0 || radius == 0 || src.width == 0 || src.height == 0 {
        return Ok(src.clone());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let w = src.width as usize;
    let mut tmp = vec![0u8; src.data.len()];
    let mut out = vec![0u8; src.data.len()];

    tmp.par_chunks_mut(w)
        .zip(src.data.par_chunks(w))
        .for_each(|(dst_row, src_row)| horizontal_pass(src_row, dst_row, &kernel));
    vertical_pass(&tmp, &mut out, src.width, src.height, &kernel);

    Ok(AlphaMask {
        width: src.width,
        height: src.height,
        data: out,
    })
}

fn gaussian_kernel_q16(radius: u32, sigma: f64) -> TelescrollResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if sigma <= 0.0 {
        return Err(TelescrollError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(TelescrollError::render("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

// Samples beyond the edge are transparent, so shapes near a tile border fade out.
fn horizontal_pass(src: &[u8], dst: &mut [u8], k: &[u32]) {
    let radius = (k.len() / 2) as i64;
    let w = src.len() as i64;
    for x in 0..w {
        let mut acc = 0u64;
        for (ki, &kw) in k.iter().enumerate() {
            let sx = x + ki as i64 - radius;
            if (0..w).contains(&sx) {
                acc += u64::from(kw) * u64::from(src[sx as usize]);
            }
        }
        dst[x as usize] = q16_to_u8(acc);
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i64;
    let w = width as usize;
    let h = i64::from(height);
    dst.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
        let y = y as i64;
        for (x, out) in row.iter_mut().enumerate() {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sy = y + ki as i64 - radius;
                if (0..h).contains(&sy) {
                    acc += u64::from(kw) * u64::from(src[(sy as usize) * w + x]);
                }
            }
            *out = q16_to_u8(acc);
        }
    });
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

/// Grow a coverage mask by `radius` pixels with a round structuring element.
///
/// The edge of the disc is antialiased over one pixel.
pub fn dilate_mask(src: &AlphaMask, radius: f64) -> AlphaMask {
    if radius <= 0.0 || !radius.is_finite() {
        return src.clone();
    }
    let reach = (radius + 0.5).ceil() as i64;
    let mut taps = Vec::new();
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let d = ((dx * dx + dy * dy) as f64).sqrt();
            let weight = (radius + 0.5 - d).clamp(0.0, 1.0);
            if weight > 0.0 {
                taps.push((dx, dy, (weight * 255.0).round() as u16));
            }
        }
    }

    let w = src.width as usize;
    let mut out = vec![0u8; src.data.len()];
    out.par_chunks_mut(w.max(1)).enumerate().for_each(|(y, row)| {
        let y = y as i64;
        for (x, px) in row.iter_mut().enumerate() {
            let x = x as i64;
            let mut best = 0u8;
            for &(dx, dy, weight) in &taps {
                let a = src.get(x + dx, y + dy);
                if a == 0 {
                    continue;
                }
                let v = mul_div255(u16::from(a), weight);
                if v > best {
                    best = v;
                    if best == 255 {
                        break;
                    }
                }
            }
            *px = best;
        }
    });

    AlphaMask {
        width: src.width,
        height: src.height,
        data: out,
    }
}

/// Composite `color` through `mask` onto `dst`, placing the mask's origin at `(ox, oy)`.
#[allow(clippy::too_many_arguments)]
pub fn composite_mask(
    dst: &mut [u8],
    dst_width: u32,
    dst_height: u32,
    mask: &AlphaMask,
    ox: i64,
    oy: i64,
    color: PremulRgba8,
    opacity: f32,
) -> TelescrollResult<()> {
    if dst.len() != (dst_width as usize) * (dst_height as usize) * 4 {
        return Err(TelescrollError::render(
            "composite_mask expects dst matching width*height*4",
        ));
    }
    if opacity <= 0.0 || color[3] == 0 {
        return Ok(());
    }
    let x0 = ox.max(0);
    let x1 = (ox + i64::from(mask.width)).min(i64::from(dst_width));
    let y0 = oy.max(0);
    let y1 = (oy + i64::from(mask.height)).min(i64::from(dst_height));
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    let row_bytes = dst_width as usize * 4;
    dst.par_chunks_mut(row_bytes)
        .enumerate()
        .skip(y0 as usize)
        .take((y1 - y0) as usize)
        .for_each(|(y, row)| {
            let my = y as i64 - oy;
            for x in x0..x1 {
                let a = mask.get(x - ox, my);
                if a == 0 {
                    continue;
                }
                let i = x as usize * 4;
                let d = [row[i], row[i + 1], row[i + 2], row[i + 3]];
                row[i..i + 4].copy_from_slice(&over(d, scale(color, a), opacity));
            }
        });
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
