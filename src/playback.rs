//! Playback scheduler: advances a fractional beat cursor over wall-clock
//! time and tells the host which event to highlight.
//!
//! The scheduler never sleeps or spawns. The host owns the frame loop
//! (`requestAnimationFrame` in the browser) behind the [`FrameClock`]
//! trait; the scheduler requests exactly one frame at a time while playing
//! and cancels it whenever playback stops, pauses, or the scheduler is
//! dropped. Each delivered frame is passed back through [`PlaybackScheduler::tick`]:
//!
//!   `cursor += (now_ms - last_tick_ms) / 1000 * tempo / 60`

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::layout::active_position;

/// Opaque id of a scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FrameHandle(pub u64);

/// The host's frame scheduling primitive.
pub trait FrameClock {
    /// Schedule one callback for the next display refresh.
    fn request_frame(&mut self) -> FrameHandle;
    /// Revoke a scheduled callback that has not fired yet.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TickOutcome {
    /// Not playing; the frame was stale and is ignored.
    Idle,
    /// Cursor moved; the next frame has been requested.
    Advanced { cursor: f64 },
    /// Cursor reached the end; transport is stopped at 0.
    Finished,
}

/// Snapshot of the transport for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub cursor: f64,
    pub state: TransportState,
    pub playing: bool,
    pub last_tick_ms: Option<f64>,
}

pub struct PlaybackScheduler<C: FrameClock> {
    clock: C,
    state: TransportState,
    /// Beats elapsed since the start of the composition
    cursor: f64,
    last_tick_ms: Option<f64>,
    pending: Option<FrameHandle>,
}

impl<C: FrameClock> PlaybackScheduler<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            state: TransportState::Stopped,
            cursor: 0.0,
            last_tick_ms: None,
            pending: None,
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    /// The frame currently scheduled, if any.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn snapshot(&self) -> PlaybackState {
        PlaybackState {
            cursor: self.cursor,
            state: self.state,
            playing: self.is_playing(),
            last_tick_ms: self.last_tick_ms,
        }
    }

    /// Global position of the sounding event while the transport is
    /// running or paused.
    pub fn active_position(&self) -> Option<usize> {
        match self.state {
            TransportState::Stopped => None,
            TransportState::Playing | TransportState::Paused => active_position(self.cursor),
        }
    }

    /// Start or resume from the current cursor. Returns `false` (and stays
    /// put) when there is nothing to play. Playing again is a no-op.
    pub fn play(&mut self, now_ms: f64, total_beats: f64) -> bool {
        if total_beats <= 0.0 {
            return false;
        }
        if self.state == TransportState::Playing {
            return true;
        }
        if self.cursor >= total_beats {
            self.cursor = 0.0;
        }
        log::info!("Playback {:?} → Playing at beat {:.3}", self.state, self.cursor);
        self.state = TransportState::Playing;
        self.last_tick_ms = Some(now_ms);
        self.schedule();
        true
    }

    /// Freeze the cursor where it is.
    pub fn pause(&mut self) {
        if self.state != TransportState::Playing {
            return;
        }
        self.cancel_pending();
        self.state = TransportState::Paused;
        self.last_tick_ms = None;
        log::info!("Playback paused at beat {:.3}", self.cursor);
    }

    /// Stop and rewind to the beginning. Also used for clear and load.
    pub fn stop(&mut self) {
        self.cancel_pending();
        if self.state != TransportState::Stopped {
            log::info!("Playback {:?} → Stopped", self.state);
        }
        self.state = TransportState::Stopped;
        self.cursor = 0.0;
        self.last_tick_ms = None;
    }

    /// Stop if the cursor no longer lies inside a composition of
    /// `total_beats` (events were removed). Returns whether it stopped.
    pub fn fit_to(&mut self, total_beats: f64) -> bool {
        if self.cursor < total_beats {
            return false;
        }
        let running = self.state != TransportState::Stopped;
        self.stop();
        running
    }

    /// Advance by the time since the previous tick. Call from the frame
    /// callback: the pending frame counts as delivered. `tempo` is read fresh
    /// every frame, so a tempo change applies from the next tick on.
    pub fn tick(&mut self, now_ms: f64, tempo: u16, total_beats: f64) -> TickOutcome {
        self.pending = None;
        if self.state != TransportState::Playing {
            return TickOutcome::Idle;
        }
        let last = self.last_tick_ms.unwrap_or(now_ms);
        let delta_seconds = ((now_ms - last) / 1000.0).max(0.0);
        let beats_per_second = tempo as f64 / 60.0;
        self.cursor += delta_seconds * beats_per_second;
        self.last_tick_ms = Some(now_ms);

        if self.cursor >= total_beats {
            log::info!("Playback reached the end ({total_beats} beats)");
            self.stop();
            return TickOutcome::Finished;
        }

        self.schedule();
        TickOutcome::Advanced { cursor: self.cursor }
    }

    fn schedule(&mut self) {
        self.cancel_pending();
        let handle = self.clock.request_frame();
        log::debug!("Requested frame {:?}", handle);
        self.pending = Some(handle);
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            log::debug!("Cancelled frame {:?}", handle);
            self.clock.cancel_frame(handle);
        }
    }
}

impl<C: FrameClock> Drop for PlaybackScheduler<C> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

/// A frame clock the caller drives by hand: it only records what was
/// requested and cancelled. Useful for native hosts and tests that deliver
/// frames from their own loop.
#[derive(Debug, Clone, Default)]
pub struct ManualFrameClock {
    next: u64,
    scheduled: Vec<FrameHandle>,
    cancelled: Vec<FrameHandle>,
}

impl ManualFrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames requested and not yet fired or cancelled.
    pub fn scheduled(&self) -> &[FrameHandle] {
        &self.scheduled
    }

    pub fn cancelled(&self) -> &[FrameHandle] {
        &self.cancelled
    }

    /// Mark the oldest scheduled frame as fired and return it.
    pub fn fire(&mut self) -> Option<FrameHandle> {
        if self.scheduled.is_empty() {
            None
        } else {
            Some(self.scheduled.remove(0))
        }
    }
}

impl FrameClock for ManualFrameClock {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.scheduled.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.scheduled.retain(|h| *h != handle);
        self.cancelled.push(handle);
    }
}

/// Shared clock, for hosts whose frame callback also needs the clock.
impl<T: FrameClock> FrameClock for Rc<RefCell<T>> {
    fn request_frame(&mut self) -> FrameHandle {
        self.borrow_mut().request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.borrow_mut().cancel_frame(handle)
    }
}
