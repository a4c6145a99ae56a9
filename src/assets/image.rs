use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{TelescrollError, TelescrollResult};

/// Decoded raster image, premultiplied RGBA8, row-major, tightly packed.
#[derive(Clone, Debug)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl RasterImage {
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> TelescrollResult<Self> {
        if width == 0 || height == 0 {
            return Err(TelescrollError::asset("image must have non-zero dimensions"));
        }
        if rgba8_premul.len() != (width as usize) * (height as usize) * 4 {
            return Err(TelescrollError::asset(
                "image data length must equal width*height*4",
            ));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Premultiplied pixel at `(x, y)`; coordinates are clamped to the image.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let i = (y * self.width as usize + x) * 4;
        let d = &self.rgba8_premul;
        [d[i], d[i + 1], d[i + 2], d[i + 3]]
    }
}

pub fn decode_image(bytes: &[u8]) -> TelescrollResult<RasterImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    RasterImage::from_premul(width, height, rgba8_premul)
}

pub fn load_image(path: &Path) -> TelescrollResult<RasterImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| TelescrollError::asset(format!("read image '{}': {e}", path.display())))?;
    let img = decode_image(&bytes)
        .map_err(|e| TelescrollError::asset(format!("image '{}': {e}", path.display())))?;
    tracing::debug!(path = %path.display(), width = img.width, height = img.height, "decoded image");
    Ok(img)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/image.rs"]
mod tests;
