use super::*;

fn cfg() -> EncoderConfig {
    EncoderConfig {
        width: 1280,
        height: 720,
        fps: Fps::new(30, 1).unwrap(),
        container: Container::Mp4,
        audio: None,
    }
}

#[test]
fn container_names() {
    assert_eq!(Container::default(), Container::Mp4);
    assert_eq!(Container::WebM.extension(), "webm");
    assert_eq!(Container::Mp4.mime_type(), "video/mp4");
    assert_eq!("WEBM".parse::<Container>().unwrap(), Container::WebM);
    assert!("avi".parse::<Container>().is_err());
    assert_eq!(serde_json::to_string(&Container::WebM).unwrap(), "\"webm\"");
}

#[test]
fn config_validation() {
    assert!(cfg().validate().is_ok());
    let mut odd = cfg();
    odd.width = 1281;
    assert!(odd.validate().is_err());
    let mut silent = cfg();
    silent.audio = Some(AudioInputConfig {
        path: "a.f32".into(),
        sample_rate: 0,
        channels: 2,
    });
    assert!(silent.validate().is_err());
}

#[test]
fn frames_must_increase_and_match_size() {
    let c = EncoderConfig {
        width: 2,
        height: 2,
        ..cfg()
    };
    let frame = FrameRGBA::blank(2, 2);
    assert!(check_frame(&c, None, FrameIndex(0), &frame).is_ok());
    assert!(check_frame(&c, Some(FrameIndex(3)), FrameIndex(3), &frame).is_err());
    assert!(check_frame(&c, None, FrameIndex(0), &FrameRGBA::blank(4, 2)).is_err());
}

#[test]
fn ensure_parent_dir_creates_nested_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("a/b/video.mp4");
    ensure_parent_dir(&out).unwrap();
    assert!(dir.path().join("a/b").is_dir());
    ensure_parent_dir(std::path::Path::new("video.mp4")).unwrap();
}
