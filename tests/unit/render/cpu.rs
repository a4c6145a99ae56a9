use super::*;
use crate::foundation::core::{Rgba8, Vec2};
use crate::render::surface::{GradientStop, RadialGradient, Shadow};

fn surface(w: u32, h: u32) -> CpuSurface {
    CpuSurface::shapes_only(Canvas::new(w, h).unwrap()).unwrap()
}

#[test]
fn new_surface_is_transparent() {
    let s = surface(4, 3);
    let frame = s.snapshot();
    assert_eq!((frame.width, frame.height), (4, 3));
    assert!(frame.premultiplied);
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn fill_rect_covers_pixel_centers_only() {
    let mut s = surface(4, 4);
    s.fill_rect(
        Rect::new(1.0, 1.0, 3.0, 3.0),
        &Paint::Solid(Rgba8::WHITE),
        BlendMode::Normal,
        1.0,
    )
    .unwrap();
    let f = s.snapshot();
    assert_eq!(f.pixel(0, 0), [0, 0, 0, 0]);
    assert_eq!(f.pixel(1, 1), [255, 255, 255, 255]);
    assert_eq!(f.pixel(2, 2), [255, 255, 255, 255]);
    assert_eq!(f.pixel(3, 3), [0, 0, 0, 0]);
}

#[test]
fn overlay_at_forty_percent_darkens() {
    let mut s = surface(2, 2);
    let full = Rect::new(0.0, 0.0, 2.0, 2.0);
    s.fill_rect(full, &Paint::Solid(Rgba8::WHITE), BlendMode::Normal, 1.0)
        .unwrap();
    s.fill_rect(
        full,
        &Paint::Solid(Rgba8::rgba(0, 0, 0, 0.4)),
        BlendMode::Normal,
        1.0,
    )
    .unwrap();
    assert_eq!(s.snapshot().pixel(0, 0), [153, 153, 153, 255]);
}

#[test]
fn screen_blend_brightens_background() {
    let mut s = surface(8, 8);
    let full = Rect::new(0.0, 0.0, 8.0, 8.0);
    s.fill_rect(
        full,
        &Paint::Solid(Rgba8::new(40, 40, 40, 255)),
        BlendMode::Normal,
        1.0,
    )
    .unwrap();
    s.fill_circle(
        Point::new(4.0, 4.0),
        3.0,
        &Paint::Solid(Rgba8::new(200, 200, 200, 255)),
        BlendMode::Screen,
        0.15,
    )
    .unwrap();
    let f = s.snapshot();
    assert!(f.pixel(4, 4)[0] > 40);
    assert_eq!(f.pixel(0, 0), [40, 40, 40, 255]);
}

#[test]
fn radial_fill_follows_gradient() {
    let mut s = surface(21, 1);
    let g = RadialGradient::concentric(
        Point::new(0.5, 0.5),
        0.0,
        20.0,
        vec![
            GradientStop::new(0.0, Rgba8::WHITE),
            GradientStop::new(1.0, Rgba8::BLACK),
        ],
    );
    s.fill_rect(
        Rect::new(0.0, 0.0, 21.0, 1.0),
        &Paint::Radial(g),
        BlendMode::Normal,
        1.0,
    )
    .unwrap();
    let f = s.snapshot();
    assert_eq!(f.pixel(0, 0), [255, 255, 255, 255]);
    assert_eq!(f.pixel(20, 0), [0, 0, 0, 255]);
    assert!(f.pixel(5, 0)[0] > f.pixel(15, 0)[0]);
}

#[test]
fn draw_image_scales_to_destination() {
    let mut s = surface(4, 2);
    let img = RasterImage::from_premul(
        2,
        1,
        vec![255, 0, 0, 255, 0, 0, 255, 255],
    )
    .unwrap();
    s.draw_image(&img, Rect::new(0.0, 0.0, 4.0, 2.0)).unwrap();
    let f = s.snapshot();
    assert_eq!(f.pixel(0, 0), [255, 0, 0, 255]);
    assert_eq!(f.pixel(3, 1), [0, 0, 255, 255]);
}

#[test]
fn text_without_font_is_skipped() {
    let mut s = surface(32, 32);
    let pass = TextPass {
        text: "hi".to_owned(),
        center: Point::new(16.0, 16.0),
        font: FontSpec {
            family: "x".to_owned(),
            size_px: 12.0,
            bold: true,
        },
        color: Rgba8::WHITE,
        opacity: 1.0,
        outline_width: None,
        shadow: Some(Shadow {
            color: Rgba8::BLACK,
            blur: 4.0,
            offset: Vec2::new(1.0, 1.0),
        }),
    };
    s.draw_text(&pass).unwrap();
    s.draw_text(&pass).unwrap();
    assert!(s.snapshot().data.iter().all(|&b| b == 0));
    assert!(s.warned_no_font);
}

#[test]
fn blank_text_pass_is_a_noop_even_without_font() {
    let mut s = surface(8, 8);
    s.draw_text(&TextPass {
        text: "   ".to_owned(),
        center: Point::new(4.0, 4.0),
        font: FontSpec {
            family: "x".to_owned(),
            size_px: 12.0,
            bold: true,
        },
        color: Rgba8::WHITE,
        opacity: 1.0,
        outline_width: Some(10.0),
        shadow: None,
    })
    .unwrap();
    assert!(s.snapshot().data.iter().all(|&b| b == 0));
}
