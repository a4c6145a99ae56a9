use super::*;
use crate::render::recording::{DrawCommand, RecordingSurface};

const H: f64 = 720.0;

fn font() -> FontSpec {
    FontSpec {
        family: "test".to_owned(),
        size_px: 40.0,
        bold: true,
    }
}

#[test]
fn scroll_is_linear_between_start_and_end() {
    let g = ScrollGeometry::new(10, 40.0, H);
    assert!((g.line_height - 92.0).abs() < 1e-9);
    assert!((g.total_height - 920.0).abs() < 1e-9);
    assert!((g.offset(0.0) - 396.0).abs() < 1e-9);
    assert!((g.offset(1.0) - (324.0 - 276.0)).abs() < 1e-9);
    let mid = g.offset(0.5);
    assert!((mid - (g.start_y + g.end_y) / 2.0).abs() < 1e-9);
    assert_eq!(g.offset(2.0), g.offset(1.0));
}

#[test]
fn lines_far_outside_are_culled() {
    let lh = 92.0;
    assert!(line_visual(-lh * 6.0, H, lh).is_none());
    assert!(line_visual(H + lh * 6.0, H, lh).is_none());
    assert!(line_visual(-lh * 5.9, H, lh).is_some());
}

#[test]
fn edges_fade_with_smoothstep() {
    let lh = 92.0;
    let fade = H * 0.15;
    let top = line_visual(fade / 2.0, H, lh).unwrap();
    assert!((top.alpha - 0.5).abs() < 1e-9);
    let bottom = line_visual(H - fade / 2.0, H, lh).unwrap();
    assert!((bottom.alpha - 0.5).abs() < 1e-9);
    assert_eq!(line_visual(-10.0, H, lh).unwrap().alpha, 0.0);
    assert_eq!(line_visual(H / 2.0, H, lh).unwrap().alpha, 1.0);
}

#[test]
fn highlight_peaks_at_center_and_vanishes_at_forty_percent() {
    let lh = 92.0;
    assert_eq!(line_visual(H / 2.0, H, lh).unwrap().highlight, 1.0);
    let edge = line_visual(H / 2.0 + H * 0.4, H, lh).unwrap().highlight;
    assert!(edge.abs() < 1e-9);
    let quarter = line_visual(H / 2.0 + H * 0.1, H, lh).unwrap().highlight;
    assert!((quarter - 0.75).abs() < 1e-9);
}

#[test]
fn centered_line_gets_glow_pass() {
    let v = LineVisual {
        alpha: 1.0,
        highlight: 1.0,
    };
    let passes = line_passes("hi", Point::new(100.0, 50.0), &font(), v);
    assert_eq!(passes.len(), 4);

    assert_eq!(passes[0].center, Point::new(104.0, 54.0));
    assert!((passes[0].opacity - 0.95).abs() < 1e-9);
    assert_eq!(passes[0].color, Rgba8::rgba(0, 0, 0, 0.9));

    assert_eq!(passes[1].outline_width, Some(14.0));
    assert_eq!(passes[1].shadow.unwrap().blur, 20.0);

    assert_eq!(passes[2].color, Rgba8::WHITE);
    assert_eq!(passes[2].shadow.unwrap().offset, Vec2::new(3.0, 3.0));

    assert!((passes[3].opacity - 0.5).abs() < 1e-9);
    assert_eq!(passes[3].shadow.unwrap().blur, 30.0);
}

#[test]
fn off_center_line_has_white_fill_and_no_glow() {
    let v = LineVisual {
        alpha: 0.8,
        highlight: 0.0,
    };
    let passes = line_passes("hi", Point::new(0.0, 0.0), &font(), v);
    assert_eq!(passes.len(), 3);
    assert_eq!(passes[1].outline_width, Some(10.0));
    assert_eq!(passes[2].color, Rgba8::WHITE);
    assert!((passes[2].opacity - 0.8).abs() < 1e-9);
}

fn surface() -> RecordingSurface {
    RecordingSurface::new(Canvas::new(1280, 720).unwrap())
}

#[test]
fn frame_paints_background_text_then_vignette() {
    let mut s = surface();
    let mut r = FrameRenderer::new();
    let style = StyleConfig::default();
    let report = r
        .render(
            &mut s,
            &FrameRequest {
                scene_index: 0,
                text: "Hello world",
                progress: 0.0,
                style: &style,
            },
        )
        .unwrap();
    assert_eq!(report, FrameReport { line_count: 1, lines_drawn: 1 });

    let cmds = s.commands();
    assert_eq!(cmds[0], DrawCommand::Clear);
    assert!(matches!(cmds[1], DrawCommand::FillRect { .. }));
    let texts: Vec<&TextPass> = s.text_passes().collect();
    // The single line sits at 0.55h, close enough to center for the glow pass.
    assert_eq!(texts.len(), 4);
    assert!(texts.iter().all(|t| t.text == "Hello world"));
    assert!((texts[2].center.y - 396.0).abs() < 1e-9);
    assert!((texts[2].center.x - 640.0).abs() < 1e-9);
    assert!(matches!(cmds.last(), Some(DrawCommand::FillRect { .. })));
}

#[test]
fn blank_lines_take_space_but_are_not_drawn() {
    let mut s = surface();
    let mut r = FrameRenderer::new();
    let style = StyleConfig::default();
    let report = r
        .render(
            &mut s,
            &FrameRequest {
                scene_index: 0,
                text: "one\ntwo",
                progress: 0.0,
                style: &style,
            },
        )
        .unwrap();
    assert_eq!(report.line_count, 3);
    assert_eq!(report.lines_drawn, 2);
    let ys: Vec<f64> = s
        .text_passes()
        .filter(|t| t.outline_width.is_some())
        .map(|t| t.center.y)
        .collect();
    assert_eq!(ys.len(), 2);
    let lh = 720.0 * 0.055 * LINE_HEIGHT_FACTOR;
    assert!((ys[1] - ys[0] - 2.0 * lh).abs() < 1e-6);
}

#[test]
fn layout_is_reused_across_frames_of_one_scene() {
    let mut s = surface();
    let mut r = FrameRenderer::new();
    let style = StyleConfig::default();
    for i in 0..=10 {
        let req = FrameRequest {
            scene_index: 0,
            text: "the same words every frame",
            progress: f64::from(i) / 10.0,
            style: &style,
        };
        r.render(&mut s, &req).unwrap();
    }
    assert_eq!(r.layout_passes(), 1);

    r.render(
        &mut s,
        &FrameRequest {
            scene_index: 0,
            text: "different words",
            progress: 0.0,
            style: &style,
        },
    )
    .unwrap();
    assert_eq!(r.layout_passes(), 2);
}

#[test]
fn rendering_is_deterministic() {
    let style = StyleConfig::default();
    let req = FrameRequest {
        scene_index: 0,
        text: "alpha beta gamma\ndelta",
        progress: 0.42,
        style: &style,
    };
    let mut a = surface();
    let mut b = surface();
    FrameRenderer::new().render(&mut a, &req).unwrap();
    FrameRenderer::new().render(&mut b, &req).unwrap();
    assert_eq!(a.commands(), b.commands());
}
