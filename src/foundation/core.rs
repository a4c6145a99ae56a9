use crate::foundation::error::{TelescrollError, TelescrollResult};

pub use kurbo::{Point, Rect, Vec2};

/// Absolute 0-based index of a captured frame.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> TelescrollResult<Self> {
        if den == 0 {
            return Err(TelescrollError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(TelescrollError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Timestamp of frame `idx` in whole milliseconds (floor).
    pub fn frame_to_ms(self, idx: FrameIndex) -> u64 {
        let num = u128::from(idx.0) * 1000 * u128::from(self.den);
        (num / u128::from(self.num)) as u64
    }

    /// Number of frames whose timestamp is strictly before `ms`.
    pub fn frames_before_ms(self, ms: u64) -> u64 {
        let num = u128::from(ms) * u128::from(self.num);
        let den = 1000 * u128::from(self.den);
        num.div_ceil(den) as u64
    }
}

/// Drawing surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> TelescrollResult<Self> {
        let canvas = Self { width, height };
        canvas.validate()?;
        Ok(canvas)
    }

    pub fn validate(&self) -> TelescrollResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TelescrollError::validation(
                "canvas width/height must be non-zero",
            ));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(TelescrollError::validation(
                "canvas width/height must fit in u16",
            ));
        }
        Ok(())
    }

    pub fn min_side(&self) -> f64 {
        f64::from(self.width.min(self.height))
    }

    pub fn max_side(&self) -> f64 {
        f64::from(self.width.max(self.height))
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Color with alpha given as a `[0, 1]` fraction, like CSS `rgba()`.
    pub fn rgba(r: u8, g: u8, b: u8, alpha: f64) -> Self {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> TelescrollResult<Self> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| TelescrollError::validation(format!("color '{s}' must start with '#'")))?;
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return Err(TelescrollError::validation(format!(
                "color '{s}' must be #rrggbb or #rrggbbaa"
            )));
        }
        let byte = |i: usize| -> TelescrollResult<u8> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| TelescrollError::validation(format!("invalid hex color '{s}'")))
        };
        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, a))
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Premultiplied `[r, g, b, a]` bytes.
    pub fn to_premul(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }
        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
