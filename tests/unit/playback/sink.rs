use super::*;

#[test]
fn progress_labels() {
    let p = ProgressUpdate::new(7_000, 14_000);
    assert_eq!(p.percent, 50.0);
    assert_eq!(p.percent_label(), "50%");
    assert_eq!(p.time_label(), "00:07 / 00:14");

    let done = ProgressUpdate::new(14_500, 14_000);
    assert_eq!(done.percent_label(), "100%");
    assert_eq!(ProgressUpdate::new(0, 0).percent_label(), "0%");
}

#[test]
fn status_messages() {
    let ready = Status::VideoReady {
        duration_label: "0:14".to_owned(),
        word_count: 2,
    };
    assert_eq!(ready.to_string(), "Video ready! Duration: 0:14 (2 words)");
    assert!(!ready.is_error());
    let failed = Status::AssetLoadFailed {
        asset: "audio",
        reason: "boom".to_owned(),
    };
    assert_eq!(failed.to_string(), "Failed to load audio: boom");
    assert!(failed.is_error());
}

#[test]
fn recording_sink_clones_share_the_log() {
    let rec = RecordingSink::new();
    let handle = SinkHandle::new(rec.clone());
    handle.notice("generate first");
    handle.progress(&ProgressUpdate::new(1_000, 2_000));
    handle.controls(Controls {
        play: true,
        pause: false,
        export: true,
    });
    handle.status(&Status::Recording);

    assert_eq!(rec.notices(), vec!["generate first".to_owned()]);
    assert_eq!(rec.last_progress().unwrap().percent, 50.0);
    assert!(rec.last_controls().unwrap().export);
    assert_eq!(rec.statuses(), vec![Status::Recording]);
    assert_eq!(rec.events().len(), 4);
    rec.clear();
    assert!(rec.events().is_empty());
}

#[test]
fn default_handle_discards_events() {
    let handle = SinkHandle::default();
    handle.notice("ignored");
    handle.status(&Status::AudioRemoved);
}
