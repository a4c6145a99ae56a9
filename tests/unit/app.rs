use super::*;
use crate::assets::audio::PcmTrack;
use crate::assets::media::AudioPcm;
use crate::foundation::core::Canvas;
use crate::playback::clock::ManualClock;
use crate::playback::sink::RecordingSink;
use crate::playback::state::PlaybackPhase;
use crate::render::recording::RecordingSurface;
use crate::style::BackgroundKind;

fn studio(clock: &ManualClock, sink: &RecordingSink) -> Studio {
    Studio::new(
        Box::new(RecordingSurface::new(Canvas::default())),
        Box::new(clock.clone()),
        SinkHandle::new(sink.clone()),
    )
}

fn image() -> RasterImage {
    RasterImage::from_premul(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 255]).unwrap()
}

#[test]
fn script_changes_publish_summaries() {
    let sink = RecordingSink::new();
    let mut s = studio(&ManualClock::new(0), &sink);
    let summary = s.set_script("  Hello world  ").clone();
    assert_eq!(summary.word_count, 2);
    assert_eq!(summary.duration_label(), "0:14");
    assert!(
        sink.events()
            .iter()
            .any(|e| matches!(e, crate::playback::sink::UiEvent::ScriptSummary(x) if x.word_count == 2))
    );
}

#[test]
fn generate_with_empty_script_only_notifies() {
    let sink = RecordingSink::new();
    let mut s = studio(&ManualClock::new(0), &sink);
    s.set_script("   \n  ");
    assert!(s.generate().is_err());
    assert_eq!(sink.notices(), vec![EMPTY_SCRIPT_NOTICE.to_owned()]);
    assert!(s.player().scenes().is_empty());
    assert!(sink.statuses().is_empty());
}

#[test]
fn generate_builds_one_scene_and_enables_controls() {
    let sink = RecordingSink::new();
    let mut s = studio(&ManualClock::new(0), &sink);
    s.set_script("  Hello world  ");
    s.generate().unwrap();

    let scenes = s.player().scenes();
    assert_eq!(scenes.len(), 1);
    assert_eq!(scenes.get(0).unwrap().text(), "Hello world");
    assert_eq!(scenes.total_duration_ms(), 14_000);
    assert_eq!(
        sink.statuses(),
        vec![Status::VideoReady {
            duration_label: "0:14".to_owned(),
            word_count: 2
        }]
    );
    let controls = sink.last_controls().unwrap();
    assert!(controls.play && controls.export && !controls.pause);
    assert_eq!(s.player().renderer().layout_passes(), 1);
}

#[test]
fn play_before_generate_shows_notice() {
    let sink = RecordingSink::new();
    let mut s = studio(&ManualClock::new(0), &sink);
    assert!(s.play().is_err());
    assert_eq!(sink.notices().len(), 1);
}

#[test]
fn play_pause_reset_cycle() {
    let clock = ManualClock::new(0);
    let sink = RecordingSink::new();
    let mut s = studio(&clock, &sink);
    s.set_script("one two three");
    s.generate().unwrap();
    s.play().unwrap();
    clock.advance(700);
    s.player_mut().tick_pending().unwrap();
    s.pause();
    assert_eq!(s.player().phase(), PlaybackPhase::Paused);
    s.reset().unwrap();
    assert_eq!(s.player().phase(), PlaybackPhase::Idle);
    assert_eq!(sink.last_progress().unwrap().time_label(), "00:00 / 00:14");
}

#[test]
fn missing_assets_keep_previous_state() {
    let sink = RecordingSink::new();
    let mut s = studio(&ManualClock::new(0), &sink);
    s.set_background_image(image(), "red.png").unwrap();
    assert!(!s.load_background(Path::new("/definitely/missing.png")));
    assert!(matches!(s.style().background(), BackgroundKind::CustomImage(_)));
    assert!(matches!(
        sink.statuses().last(),
        Some(Status::AssetLoadFailed {
            asset: "background image",
            ..
        })
    ));

    assert!(!s.load_audio(Path::new("/definitely/missing.mp3")));
    assert!(s.player().audio().is_none());
}

#[test]
fn background_changes_repaint_and_report() {
    let sink = RecordingSink::new();
    let mut s = studio(&ManualClock::new(0), &sink);
    s.set_script("words");
    s.generate().unwrap();
    s.set_background_image(image(), "red.png").unwrap();
    s.remove_background().unwrap();
    let statuses = sink.statuses();
    assert_eq!(statuses[1], Status::BackgroundLoaded("red.png".to_owned()));
    assert_eq!(statuses[2], Status::BackgroundRemoved);
    assert!(matches!(s.style().background(), BackgroundKind::Gradient(_)));
}

#[test]
fn audio_attach_and_remove() {
    let sink = RecordingSink::new();
    let mut s = studio(&ManualClock::new(0), &sink);
    s.remove_audio();
    assert!(sink.statuses().is_empty());

    let pcm = AudioPcm {
        sample_rate: 48_000,
        channels: 2,
        interleaved_f32: vec![0.0; 960],
    };
    s.attach_audio(Box::new(PcmTrack::new(pcm)), "song.mp3");
    assert!(s.player().audio().is_some());
    s.remove_audio();
    assert_eq!(
        sink.statuses(),
        vec![
            Status::AudioLoaded("song.mp3".to_owned()),
            Status::AudioRemoved
        ]
    );
}

#[test]
fn gradient_switch_updates_style() {
    let sink = RecordingSink::new();
    let mut s = studio(&ManualClock::new(0), &sink);
    s.set_gradient(GradientPreset::DarkTeal);
    assert_eq!(s.style().gradient, GradientPreset::DarkTeal);
}

#[test]
fn from_config_applies_style_and_script() {
    let sink = RecordingSink::new();
    let mut cfg = ProjectConfig::default();
    cfg.script = Some("alpha beta gamma".to_owned());
    cfg.scene_duration_ms = 5_000;
    cfg.style.gradient = GradientPreset::Navy;
    let mut s = Studio::from_config(
        &cfg,
        Box::new(RecordingSurface::new(Canvas::default())),
        Box::new(ManualClock::new(0)),
        SinkHandle::new(sink.clone()),
    )
    .unwrap();
    assert_eq!(s.summary().word_count, 3);
    assert_eq!(s.style().gradient, GradientPreset::Navy);
    s.generate().unwrap();
    assert_eq!(s.player().total_duration_ms(), 5_000);
}
