use super::*;

#[test]
fn fps_rejects_zero() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn fps_frame_timestamps_at_30() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.frame_to_ms(FrameIndex(0)), 0);
    assert_eq!(fps.frame_to_ms(FrameIndex(1)), 33);
    assert_eq!(fps.frame_to_ms(FrameIndex(30)), 1000);
    assert_eq!(fps.frames_before_ms(1000), 30);
    assert_eq!(fps.frames_before_ms(1001), 31);
}

#[test]
fn canvas_validation() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    let c = Canvas::new(1280, 720).unwrap();
    assert_eq!(c.min_side(), 720.0);
    assert_eq!(c.max_side(), 1280.0);
}

#[test]
fn hex_colors_parse() {
    assert_eq!(
        Rgba8::from_hex("#0a1628").unwrap(),
        Rgba8::new(0x0a, 0x16, 0x28, 255)
    );
    assert_eq!(
        Rgba8::from_hex("#3a5f8f60").unwrap(),
        Rgba8::new(0x3a, 0x5f, 0x8f, 0x60)
    );
    assert!(Rgba8::from_hex("0a1628").is_err());
    assert!(Rgba8::from_hex("#12345").is_err());
    assert!(Rgba8::from_hex("#zzzzzz").is_err());
}

#[test]
fn premul_halves_channels_at_half_alpha() {
    let c = Rgba8::new(255, 0, 100, 128);
    assert_eq!(c.to_premul(), [128, 0, 50, 128]);
    assert_eq!(Rgba8::rgba(0, 0, 0, 0.4).a, 102);
}
