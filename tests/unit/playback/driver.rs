use super::*;
use crate::foundation::core::Canvas;
use crate::playback::clock::ManualClock;
use crate::playback::sink::{RecordingSink, SinkHandle};
use crate::playback::state::PlaybackPhase;
use crate::render::recording::RecordingSurface;
use crate::script::scene::SceneList;

fn player(clock: &ManualClock) -> Player {
    let mut p = Player::new(
        Box::new(RecordingSurface::new(Canvas::default())),
        Box::new(clock.clone()),
        SinkHandle::new(RecordingSink::new()),
    );
    p.set_scenes(SceneList::from_script("one two three", 1_000).unwrap());
    p
}

#[test]
fn drive_runs_until_completion() {
    let clock = ManualClock::new(0);
    let mut p = player(&clock);
    p.start().unwrap();
    let mut refresh = CountedRefresh::new(1_000);
    let ticks = drive(&mut p, &mut refresh, |_| {
        clock.advance(100);
        Ok(())
    })
    .unwrap();
    assert_eq!(ticks, 9);
    assert_eq!(p.phase(), PlaybackPhase::Idle);
    assert!(p.state().is_complete());
}

#[test]
fn drive_stops_when_refresh_ends() {
    let clock = ManualClock::new(0);
    let mut p = player(&clock);
    p.start().unwrap();
    let mut refresh = CountedRefresh::new(3);
    let ticks = drive(&mut p, &mut refresh, |_| {
        clock.advance(10);
        Ok(())
    })
    .unwrap();
    assert_eq!(ticks, 3);
    assert_eq!(p.phase(), PlaybackPhase::Playing);
}

#[test]
fn pausing_inside_the_loop_ends_it() {
    let clock = ManualClock::new(0);
    let mut p = player(&clock);
    p.start().unwrap();
    let mut refresh = CountedRefresh::new(100);
    let ticks = drive(&mut p, &mut refresh, |pl| {
        if clock.advance(50) >= 200 {
            pl.pause();
        }
        Ok(())
    })
    .unwrap();
    assert_eq!(ticks, 3);
    assert_eq!(p.phase(), PlaybackPhase::Paused);
    assert_eq!(p.paused_elapsed_ms(), 150);
}

#[test]
fn idle_player_does_not_tick() {
    let clock = ManualClock::new(0);
    let mut p = player(&clock);
    let mut refresh = CountedRefresh::new(10);
    assert_eq!(drive(&mut p, &mut refresh, |_| Ok(())).unwrap(), 0);
}

#[test]
fn paced_refresh_period() {
    assert_eq!(PacedRefresh::new(50).period(), Duration::from_millis(20));
    let mut r = PacedRefresh::new(1_000);
    assert!(r.wait_for_refresh());
    assert!(r.wait_for_refresh());
}
