use crate::assets::image::RasterImage;
use crate::foundation::core::{Canvas, Point, Rect};
use crate::foundation::error::TelescrollResult;
use crate::layout::{FontSpec, MonospaceMeasurer, TextMeasurer};
use crate::render::surface::{BlendMode, FrameRGBA, Paint, Surface, TextPass};

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillRect {
        rect: Rect,
        paint: Paint,
        blend: BlendMode,
        opacity: f64,
    },
    FillCircle {
        center: Point,
        radius: f64,
        paint: Paint,
        blend: BlendMode,
        opacity: f64,
    },
    Image {
        width: u32,
        height: u32,
        dest: Rect,
    },
    Text(TextPass),
}

/// Surface that records draw calls instead of rasterizing them.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    canvas: Canvas,
    measurer: MonospaceMeasurer,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            measurer: MonospaceMeasurer::default(),
            commands: Vec::new(),
        }
    }

    /// Everything drawn since the last `clear`.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn text_passes(&self) -> impl Iterator<Item = &TextPass> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text(t) => Some(t),
            _ => None,
        })
    }
}

impl TextMeasurer for RecordingSurface {
    fn measure(&self, text: &str, font: &FontSpec) -> f64 {
        self.measurer.measure(text, font)
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.canvas.width
    }

    fn height(&self) -> u32 {
        self.canvas.height
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_rect(
        &mut self,
        rect: Rect,
        paint: &Paint,
        blend: BlendMode,
        opacity: f64,
    ) -> TelescrollResult<()> {
        self.commands.push(DrawCommand::FillRect {
            rect,
            paint: paint.clone(),
            blend,
            opacity,
        });
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
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            paint: paint.clone(),
            blend,
            opacity,
        });
        Ok(())
    }

    fn draw_image(&mut self, image: &RasterImage, dest: Rect) -> TelescrollResult<()> {
        self.commands.push(DrawCommand::Image {
            width: image.width,
            height: image.height,
            dest,
        });
        Ok(())
    }

    fn draw_text(&mut self, pass: &TextPass) -> TelescrollResult<()> {
        self.commands.push(DrawCommand::Text(pass.clone()));
        Ok(())
    }

    fn snapshot(&self) -> FrameRGBA {
        FrameRGBA::blank(self.canvas.width, self.canvas.height)
    }
}
