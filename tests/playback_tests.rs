//! Playback tests: drive the scheduler with simulated frame timestamps and
//! check the cursor, the transport state and the outstanding frames.

use std::cell::RefCell;
use std::rc::Rc;

use composerlib::{
    Composer, ComposerConfig, Duration, FrameClock, ManualFrameClock, MemoryStorage, NewEvent, NoteName,
    PlaybackScheduler, TickOutcome, TransportState,
};

type SharedClock = Rc<RefCell<ManualFrameClock>>;

fn composer_with(events: &[NewEvent]) -> (Composer<MemoryStorage, SharedClock>, SharedClock) {
    let clock: SharedClock = Rc::new(RefCell::new(ManualFrameClock::new()));
    let mut composer = Composer::new(ComposerConfig::default(), MemoryStorage::new(), Rc::clone(&clock));
    for event in events {
        composer.add_event(event.clone());
    }
    (composer, clock)
}

/// Fire the pending frame and deliver it at `now_ms`, as a host would.
fn frame(composer: &mut Composer<MemoryStorage, SharedClock>, clock: &SharedClock, now_ms: f64) -> TickOutcome {
    let fired = clock.borrow_mut().fire();
    assert!(fired.is_some(), "no frame was scheduled before t = {now_ms}");
    composer.tick(now_ms)
}

fn two_quarters() -> Vec<NewEvent> {
    vec![
        NewEvent::note(NoteName::C, Duration::Quarter),
        NewEvent::note(NoteName::D, Duration::Quarter),
    ]
}

#[test]
fn two_quarters_at_sixty_bpm_finish_after_two_seconds() {
    let (mut composer, clock) = composer_with(&two_quarters());
    composer.set_tempo(60);
    composer.play(0.0).unwrap();

    for step in 1..8 {
        let now = step as f64 * 250.0;
        match frame(&mut composer, &clock, now) {
            TickOutcome::Advanced { cursor } => assert!((cursor - now / 1000.0).abs() < 1e-9),
            other => panic!("unexpected {other:?} at t = {now}"),
        }
    }
    assert_eq!(frame(&mut composer, &clock, 2000.0), TickOutcome::Finished);

    let state = composer.scheduler().snapshot();
    assert_eq!(state.state, TransportState::Stopped);
    assert_eq!(state.cursor, 0.0);
    assert!(!state.playing);
    assert!(clock.borrow().scheduled().is_empty());
}

#[test]
fn highlight_follows_the_cursor() {
    let (mut composer, clock) = composer_with(&two_quarters());
    composer.set_tempo(60);
    assert_eq!(composer.scheduler().active_position(), None);

    composer.play(0.0).unwrap();
    frame(&mut composer, &clock, 500.0);
    assert_eq!(composer.scheduler().active_position(), Some(0));
    frame(&mut composer, &clock, 1500.0);
    assert_eq!(composer.scheduler().active_position(), Some(1));

    let active: Vec<String> = composer
        .row_views()
        .iter()
        .flat_map(|row| row.glyphs.iter())
        .filter(|g| g.is_active())
        .map(|g| g.id().to_string())
        .collect();
    assert_eq!(active, vec![composer.events()[1].id().to_string()]);
}

#[test]
fn pause_then_play_preserves_the_cursor() {
    let (mut composer, clock) = composer_with(&two_quarters());
    composer.set_tempo(120);
    composer.play(0.0).unwrap();
    frame(&mut composer, &clock, 300.0);
    let before = composer.scheduler().cursor();

    composer.pause();
    assert_eq!(composer.scheduler().state(), TransportState::Paused);
    assert!(clock.borrow().scheduled().is_empty());

    // time spent paused does not count
    composer.play(10_000.0).unwrap();
    assert_eq!(composer.scheduler().cursor(), before);
    frame(&mut composer, &clock, 10_100.0);
    assert!((composer.scheduler().cursor() - (before + 0.2)).abs() < 1e-9);
}

#[test]
fn tempo_change_applies_on_next_tick() {
    let (mut composer, clock) = composer_with(&[NewEvent::note(NoteName::G, Duration::Whole)]);
    composer.set_tempo(60);
    composer.play(0.0).unwrap();
    frame(&mut composer, &clock, 1000.0);
    assert!((composer.scheduler().cursor() - 1.0).abs() < 1e-9);

    composer.set_tempo(120);
    frame(&mut composer, &clock, 2000.0);
    assert!((composer.scheduler().cursor() - 3.0).abs() < 1e-9);
}

#[test]
fn play_with_nothing_to_play_is_rejected() {
    let (mut composer, clock) = composer_with(&[]);
    let err = composer.play(0.0).unwrap_err();
    assert_eq!(err.to_string(), "No notes to play");
    assert_eq!(composer.error(), Some("No notes to play"));
    assert_eq!(composer.scheduler().state(), TransportState::Stopped);
    assert!(clock.borrow().scheduled().is_empty());
}

#[test]
fn no_frame_outstanding_after_stop_clear_or_load() {
    let (mut composer, clock) = composer_with(&two_quarters());
    let song = composer.save_song("Two quarters").unwrap();

    composer.play(0.0).unwrap();
    composer.stop();
    assert!(clock.borrow().scheduled().is_empty());
    assert_eq!(composer.scheduler().cursor(), 0.0);

    composer.play(0.0).unwrap();
    frame(&mut composer, &clock, 100.0);
    composer.clear();
    assert!(clock.borrow().scheduled().is_empty());
    assert!(composer.events().is_empty());

    composer.load_song(&song.id).unwrap();
    composer.play(0.0).unwrap();
    frame(&mut composer, &clock, 400.0);
    composer.load_song(&song.id).unwrap();
    assert!(clock.borrow().scheduled().is_empty());
    assert_eq!(composer.scheduler().state(), TransportState::Stopped);
    assert_eq!(composer.scheduler().cursor(), 0.0);
}

#[test]
fn deleting_past_a_paused_cursor_stops_playback() {
    let (mut composer, clock) = composer_with(&two_quarters());
    composer.set_tempo(60);
    composer.play(0.0).unwrap();
    frame(&mut composer, &clock, 1500.0);
    composer.pause();

    let first = composer.events()[0].id().to_string();
    let second = composer.events()[1].id().to_string();
    assert!(composer.delete_event(&second));
    assert_eq!(composer.scheduler().state(), TransportState::Stopped);
    assert_eq!(composer.scheduler().cursor(), 0.0);
    assert_eq!(composer.scheduler().active_position(), None);
    assert!(clock.borrow().scheduled().is_empty());

    assert!(composer.delete_event(&first));
    assert_eq!(composer.store().total_beats(), 0.0);
    assert_eq!(composer.play(0.0).unwrap_err().to_string(), "No notes to play");
    assert_eq!(composer.scheduler().state(), TransportState::Stopped);
}

#[test]
fn deleting_ahead_of_the_cursor_keeps_playing() {
    let (mut composer, clock) = composer_with(&[
        NewEvent::note(NoteName::C, Duration::Quarter),
        NewEvent::note(NoteName::D, Duration::Quarter),
        NewEvent::note(NoteName::E, Duration::Quarter),
    ]);
    composer.set_tempo(60);
    composer.play(0.0).unwrap();
    frame(&mut composer, &clock, 500.0);

    let last = composer.events()[2].id().to_string();
    assert!(composer.delete_event(&last));
    assert_eq!(composer.scheduler().state(), TransportState::Playing);
    assert_eq!(clock.borrow().scheduled().len(), 1);
}

#[test]
fn delivered_frames_are_never_cancelled() {
    let (mut composer, clock) = composer_with(&two_quarters());
    composer.play(0.0).unwrap();
    for i in 1..=3 {
        frame(&mut composer, &clock, i as f64 * 100.0);
    }
    assert!(clock.borrow().cancelled().is_empty());
    composer.stop();
    assert_eq!(clock.borrow().cancelled().len(), 1);
}

#[test]
fn dropping_the_session_cancels_the_frame() {
    let (mut composer, clock) = composer_with(&two_quarters());
    composer.play(0.0).unwrap();
    assert_eq!(clock.borrow().scheduled().len(), 1);

    drop(composer);
    assert!(clock.borrow().scheduled().is_empty());
    assert_eq!(clock.borrow().cancelled().len(), 1);
}

#[test]
fn playing_twice_keeps_a_single_frame() {
    let (mut composer, clock) = composer_with(&two_quarters());
    composer.play(0.0).unwrap();
    composer.play(50.0).unwrap();
    assert_eq!(clock.borrow().scheduled().len(), 1);
}

#[test]
fn replaying_after_the_end_starts_over() {
    let mut scheduler = PlaybackScheduler::new(ManualFrameClock::new());
    assert!(scheduler.play(0.0, 1.0));
    scheduler.clock_mut().fire();
    assert_eq!(scheduler.tick(600.0, 120, 1.0), TickOutcome::Finished);
    assert!(scheduler.play(1_000.0, 1.0));
    assert_eq!(scheduler.cursor(), 0.0);
    assert_eq!(scheduler.clock().scheduled().len(), 1);
}

/// A clock that counts outstanding frames without storing them.
#[derive(Default)]
struct CountingClock {
    next: u64,
    outstanding: i64,
}

impl FrameClock for CountingClock {
    fn request_frame(&mut self) -> composerlib::FrameHandle {
        self.next += 1;
        self.outstanding += 1;
        composerlib::FrameHandle(self.next)
    }

    fn cancel_frame(&mut self, _handle: composerlib::FrameHandle) {
        self.outstanding -= 1;
    }
}

#[test]
fn custom_clock_sees_balanced_requests() {
    let mut scheduler = PlaybackScheduler::new(CountingClock::default());
    scheduler.play(0.0, 4.0);
    scheduler.pause();
    scheduler.play(100.0, 4.0);
    scheduler.stop();
    assert_eq!(scheduler.clock().outstanding, 0);
}
