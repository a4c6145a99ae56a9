use std::fmt;
use std::str::FromStr;

use crate::foundation::core::Rgba8;
use crate::foundation::error::TelescrollError;

/// Built-in background gradients.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientPreset {
    #[default]
    #[serde(alias = "gradient1")]
    DeepBlue,
    #[serde(alias = "gradient2")]
    Navy,
    #[serde(alias = "gradient3")]
    DarkTeal,
    #[serde(alias = "gradient4")]
    Midnight,
}

/// Gradient stops (at 0, 0.4, 0.7, 1) plus the bokeh blob colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub stops: [Rgba8; 4],
    pub bokeh: [Rgba8; 4],
}

pub const GRADIENT_STOP_OFFSETS: [f32; 4] = [0.0, 0.4, 0.7, 1.0];

const fn rgb(hex: u32) -> Rgba8 {
    Rgba8::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8, 255)
}

impl GradientPreset {
    pub const ALL: [Self; 4] = [Self::DeepBlue, Self::Navy, Self::DarkTeal, Self::Midnight];

    pub fn id(self) -> &'static str {
        match self {
            Self::DeepBlue => "deep_blue",
            Self::Navy => "navy",
            Self::DarkTeal => "dark_teal",
            Self::Midnight => "midnight",
        }
    }

    /// Lenient lookup: unknown ids fall back to the default preset.
    pub fn from_id_or_default(id: &str) -> Self {
        id.parse().unwrap_or_default()
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::DeepBlue => Palette {
                stops: [rgb(0x0a1628), rgb(0x1a2744), rgb(0x0f1f3a), rgb(0x162d4a)],
                bokeh: [rgb(0x3a5f8f), rgb(0x4a7fb8), rgb(0x5a8fc8), rgb(0x2a4f7f)],
            },
            Self::Navy => Palette {
                stops: [rgb(0x0d1b2a), rgb(0x1b263b), rgb(0x0f1e2e), rgb(0x1a3a52)],
                bokeh: [rgb(0x415a77), rgb(0x778da9), rgb(0x5a7a9a), rgb(0x2d4a6a)],
            },
            Self::DarkTeal => Palette {
                stops: [rgb(0x0a1f1f), rgb(0x1a3535), rgb(0x0f2828), rgb(0x1a4040)],
                bokeh: [rgb(0x2d5f5f), rgb(0x3d7f7f), rgb(0x4d8f8f), rgb(0x1d4f4f)],
            },
            Self::Midnight => Palette {
                stops: [rgb(0x0c1445), rgb(0x1a2465), rgb(0x0f1855), rgb(0x1a2f75)],
                bokeh: [rgb(0x2a4495), rgb(0x3a54b5), rgb(0x4a64c5), rgb(0x1a3485)],
            },
        }
    }
}

impl FromStr for GradientPreset {
    type Err = TelescrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deep_blue" | "deep-blue" | "gradient1" => Ok(Self::DeepBlue),
            "navy" | "gradient2" => Ok(Self::Navy),
            "dark_teal" | "dark-teal" | "gradient3" => Ok(Self::DarkTeal),
            "midnight" | "gradient4" => Ok(Self::Midnight),
            other => Err(TelescrollError::validation(format!(
                "unknown gradient preset '{other}'"
            ))),
        }
    }
}

impl fmt::Display for GradientPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/palette.rs"]
mod tests;
