use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::playback::clock::ManualClock;
use crate::playback::sink::{RecordingSink, UiEvent};
use crate::render::recording::RecordingSurface;
use crate::script::scene::Scene;

#[derive(Clone, Default)]
struct AudioLog(Rc<RefCell<Vec<String>>>);

impl AudioLog {
    fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

struct FakeAudio {
    log: AudioLog,
    playing: bool,
}

impl AudioTrack for FakeAudio {
    fn play(&mut self, now_ms: u64) {
        self.playing = true;
        self.log.0.borrow_mut().push(format!("play@{now_ms}"));
    }

    fn pause(&mut self, now_ms: u64) {
        self.playing = false;
        self.log.0.borrow_mut().push(format!("pause@{now_ms}"));
    }

    fn seek(&mut self, position_ms: u64, _now_ms: u64) {
        self.log.0.borrow_mut().push(format!("seek:{position_ms}"));
    }

    fn position_ms(&self, _now_ms: u64) -> u64 {
        0
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

fn player(clock: &ManualClock, sink: &RecordingSink) -> Player {
    let mut p = Player::new(
        Box::new(RecordingSurface::new(Canvas::default())),
        Box::new(clock.clone()),
        SinkHandle::new(sink.clone()),
    );
    p.set_scenes(SceneList::from_script("Hello world", 14_000).unwrap());
    p
}

#[test]
fn start_without_scenes_shows_notice() {
    let clock = ManualClock::new(0);
    let sink = RecordingSink::new();
    let mut p = Player::new(
        Box::new(RecordingSurface::new(Canvas::default())),
        Box::new(clock),
        SinkHandle::new(sink.clone()),
    );
    assert!(p.start().is_err());
    assert_eq!(sink.notices(), vec![NO_SCENES_NOTICE.to_owned()]);
    assert_eq!(p.phase(), PlaybackPhase::Idle);
    assert!(p.pending_tick().is_none());
}

#[test]
fn tick_at_half_duration_renders_half_progress() {
    let clock = ManualClock::new(1_000);
    let sink = RecordingSink::new();
    let mut p = player(&clock, &sink);
    p.start().unwrap();
    clock.advance(7_000);
    let out = p.tick_pending().unwrap();
    assert_eq!(
        out,
        TickOutcome::Rendered {
            scene_index: 0,
            progress: 0.5,
            elapsed_ms: 7_000
        }
    );
    let last = sink.last_progress().unwrap();
    assert_eq!(last.percent_label(), "50%");
    assert_eq!(last.time_label(), "00:07 / 00:14");
    assert!(p.pending_tick().is_some());
}

#[test]
fn tick_past_total_completes() {
    let clock = ManualClock::new(0);
    let sink = RecordingSink::new();
    let mut p = player(&clock, &sink);
    p.start().unwrap();
    clock.set(14_500);
    assert_eq!(p.tick_pending().unwrap(), TickOutcome::Completed);
    assert_eq!(p.phase(), PlaybackPhase::Idle);
    assert!(p.pending_tick().is_none());
    assert_eq!(sink.last_progress().unwrap().percent_label(), "100%");
    assert!(sink.last_controls().unwrap().play);
    assert_eq!(p.tick_pending().unwrap(), TickOutcome::Stale);
}

#[test]
fn pause_then_stale_tick_changes_nothing() {
    let clock = ManualClock::new(0);
    let sink = RecordingSink::new();
    let mut p = player(&clock, &sink);
    p.start().unwrap();
    clock.advance(2_000);
    p.tick_pending().unwrap();
    let handle = p.pending_tick().unwrap();

    p.pause();
    let frozen = p.state();
    clock.advance(5_000);
    assert_eq!(p.tick(handle).unwrap(), TickOutcome::Stale);
    assert_eq!(p.state(), frozen);
    assert_eq!(p.paused_elapsed_ms(), 2_000);

    p.pause();
    assert_eq!(p.state(), frozen);
}

#[test]
fn resume_continues_from_paused_elapsed() {
    let clock = ManualClock::new(0);
    let sink = RecordingSink::new();
    let mut p = player(&clock, &sink);
    p.start().unwrap();
    clock.advance(3_000);
    p.tick_pending().unwrap();
    p.pause();

    clock.advance(10_000);
    p.start().unwrap();
    clock.advance(500);
    match p.tick_pending().unwrap() {
        TickOutcome::Rendered { elapsed_ms, .. } => assert_eq!(elapsed_ms, 3_500),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn elapsed_never_decreases_within_a_session() {
    let clock = ManualClock::new(5_000);
    let sink = RecordingSink::new();
    let mut p = player(&clock, &sink);
    p.start().unwrap();
    clock.advance(4_000);
    p.tick_pending().unwrap();
    clock.set(6_000);
    match p.tick_pending().unwrap() {
        TickOutcome::Rendered { elapsed_ms, .. } => assert_eq!(elapsed_ms, 4_000),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn reset_returns_to_idle_zero() {
    let clock = ManualClock::new(0);
    let sink = RecordingSink::new();
    let mut p = player(&clock, &sink);
    let log = AudioLog::default();
    p.set_audio(Some(Box::new(FakeAudio {
        log: log.clone(),
        playing: false,
    })));
    p.start().unwrap();
    clock.advance(4_000);
    let handle = p.pending_tick().unwrap();
    p.tick(handle).unwrap();

    p.reset().unwrap();
    assert_eq!(p.state().elapsed_ms(), 0);
    assert_eq!(p.phase(), PlaybackPhase::Idle);
    assert!(p.pending_tick().is_none());
    assert_eq!(sink.last_progress().unwrap().percent, 0.0);
    assert_eq!(log.entries(), vec!["seek:0", "play@0", "pause@4000", "seek:0"]);
}

#[test]
fn restart_after_completion_begins_at_zero() {
    let clock = ManualClock::new(0);
    let sink = RecordingSink::new();
    let mut p = player(&clock, &sink);
    p.start().unwrap();
    clock.set(20_000);
    p.tick_pending().unwrap();

    p.start().unwrap();
    clock.advance(1_400);
    match p.tick_pending().unwrap() {
        TickOutcome::Rendered { progress, .. } => assert!((progress - 0.1).abs() < 1e-9),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn audio_resumes_from_current_position_after_pause() {
    let clock = ManualClock::new(0);
    let sink = RecordingSink::new();
    let mut p = player(&clock, &sink);
    let log = AudioLog::default();
    p.set_audio(Some(Box::new(FakeAudio {
        log: log.clone(),
        playing: false,
    })));
    p.start().unwrap();
    clock.advance(1_000);
    p.tick_pending().unwrap();
    p.pause();
    clock.advance(1_000);
    p.start().unwrap();
    assert_eq!(
        log.entries(),
        vec!["seek:0", "play@0", "pause@1000", "play@2000"]
    );
}

#[test]
fn layout_is_reused_across_ticks() {
    let clock = ManualClock::new(0);
    let sink = RecordingSink::new();
    let mut p = player(&clock, &sink);
    p.start().unwrap();
    for _ in 0..5 {
        clock.advance(100);
        p.tick_pending().unwrap();
    }
    assert_eq!(p.renderer().layout_passes(), 1);
}

#[test]
fn controls_follow_playback() {
    let clock = ManualClock::new(0);
    let sink = RecordingSink::new();
    let mut p = player(&clock, &sink);
    p.set_export_enabled(true);
    p.start().unwrap();
    let c = sink.last_controls().unwrap();
    assert!(!c.play && c.pause && c.export);
    p.pause();
    let c = sink.last_controls().unwrap();
    assert!(c.play && !c.pause);
    assert!(
        sink.events()
            .iter()
            .any(|e| matches!(e, UiEvent::Controls(c) if c.pause))
    );
}

#[test]
fn stale_handle_from_previous_session_is_rejected() {
    let clock = ManualClock::new(0);
    let sink = RecordingSink::new();
    let mut p = player(&clock, &sink);
    p.start().unwrap();
    let old = p.pending_tick().unwrap();
    p.pause();
    p.start().unwrap();
    let fresh = p.pending_tick().unwrap();
    assert_ne!(old, fresh);
    assert!(fresh.generation() > old.generation());
    assert_eq!(p.tick(old).unwrap(), TickOutcome::Stale);
    assert_eq!(p.pending_tick(), Some(fresh));
}

#[test]
fn render_scene_rejects_unknown_index() {
    let clock = ManualClock::new(0);
    let sink = RecordingSink::new();
    let mut p = player(&clock, &sink);
    assert!(p.render_scene(3, 0.0).is_err());
    assert!(p.render_scene(0, 0.0).is_ok());
}

#[test]
fn many_scenes_are_located_in_order() {
    let clock = ManualClock::new(0);
    let sink = RecordingSink::new();
    let mut p = player(&clock, &sink);
    p.set_scenes(SceneList::new(vec![
        Scene::new("one", 1_000).unwrap(),
        Scene::new("two", 3_000).unwrap(),
    ]));
    p.start().unwrap();
    clock.set(2_500);
    match p.tick_pending().unwrap() {
        TickOutcome::Rendered {
            scene_index,
            progress,
            ..
        } => {
            assert_eq!(scene_index, 1);
            assert!((progress - 0.5).abs() < 1e-9);
        }
        other => panic!("unexpected {other:?}"),
    }
}
