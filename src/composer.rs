//! Composer session: the single entry point the UI talks to.
//!
//! Owns the storage handle, the composition store, the song library and
//! the playback scheduler, and routes every UI command to them. All
//! commands run to completion synchronously; the only recurring activity is
//! the frame-driven `tick`.

use serde::Serialize;

use crate::config::ComposerConfig;
use crate::error::{ComposerError, Result};
use crate::layout::{row_views, RowView};
use crate::library::SongLibrary;
use crate::model::{MusicalEvent, NewEvent, SavedSong};
use crate::playback::{FrameClock, PlaybackScheduler, TickOutcome, TransportState};
use crate::renderer::render_rows_to_svg;
use crate::storage::KeyValueStore;
use crate::store::CompositionStore;

pub const MSG_NOTHING_TO_PLAY: &str = "No notes to play";
pub const MSG_SONG_NOT_FOUND: &str = "Song not found";

/// Library entry as listed in the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongSummary {
    pub id: String,
    pub name: String,
    pub event_count: usize,
    pub tempo: u16,
}

impl From<&SavedSong> for SongSummary {
    fn from(song: &SavedSong) -> Self {
        Self {
            id: song.id.clone(),
            name: song.name.clone(),
            event_count: song.notes_and_chords.len(),
            tempo: song.tempo,
        }
    }
}

/// Everything the UI needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposerView {
    pub rows: Vec<RowView>,
    pub cursor: f64,
    pub state: TransportState,
    pub playing: bool,
    pub tempo: u16,
    pub total_beats: f64,
    pub width: f64,
    pub songs: Vec<SongSummary>,
    /// Message to show the user, if the last failing command left one
    pub error: Option<String>,
}

pub struct Composer<S: KeyValueStore, C: FrameClock> {
    config: ComposerConfig,
    storage: S,
    store: CompositionStore,
    library: SongLibrary,
    scheduler: PlaybackScheduler<C>,
    error: Option<String>,
}

impl<S: KeyValueStore, C: FrameClock> Composer<S, C> {
    /// Open a session: restore the working draft and the song library once.
    /// Malformed records start empty and leave a warning in `error()`.
    pub fn new(config: ComposerConfig, storage: S, clock: C) -> Self {
        let (store, draft_warning) =
            CompositionStore::restore(&storage, &config.draft_key, config.metrics.clone(), config.default_tempo);
        let (library, songs_warning) = SongLibrary::load(&storage, &config.songs_key);
        let error = songs_warning.or(draft_warning).map(|e| e.to_string());
        log::info!(
            "Composer session opened: {} draft events, {} saved songs",
            store.len(),
            library.len()
        );
        Self {
            config,
            storage,
            store,
            library,
            scheduler: PlaybackScheduler::new(clock),
            error,
        }
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    pub fn store(&self) -> &CompositionStore {
        &self.store
    }

    pub fn library(&self) -> &SongLibrary {
        &self.library
    }

    pub fn scheduler(&self) -> &PlaybackScheduler<C> {
        &self.scheduler
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn clock_mut(&mut self) -> &mut C {
        self.scheduler.clock_mut()
    }

    pub fn events(&self) -> &[MusicalEvent] {
        self.store.events()
    }

    pub fn songs(&self) -> &[SavedSong] {
        self.library.songs()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    // ── Editing ─────────────────────────────────────────────────────

    /// Append an event at the end of the composition and return its id.
    pub fn add_event(&mut self, request: NewEvent) -> String {
        let id = self.store.append(request).id().to_string();
        self.save_draft();
        id
    }

    /// Delete by id. Returns `false` if the id is unknown. Playback stops
    /// when the cursor is left past the shortened composition.
    pub fn delete_event(&mut self, id: &str) -> bool {
        let deleted = self.store.delete(id);
        if deleted {
            self.scheduler.fit_to(self.store.total_beats());
            self.save_draft();
        }
        deleted
    }

    /// Change the tempo (clamped). A running transport picks it up on its
    /// next tick.
    pub fn set_tempo(&mut self, bpm: i32) -> u16 {
        self.store.set_tempo(bpm)
    }

    /// Width measurement from the rendering surface. Returns whether the
    /// rows were repacked.
    pub fn observe_width(&mut self, width: f64) -> bool {
        self.store.observe_width(width)
    }

    /// Empty the composition and stop playback.
    pub fn clear(&mut self) {
        self.scheduler.stop();
        self.store.clear();
        self.save_draft();
    }

    // ── Transport ───────────────────────────────────────────────────

    pub fn play(&mut self, now_ms: f64) -> Result<()> {
        if self.scheduler.play(now_ms, self.store.total_beats()) {
            Ok(())
        } else {
            self.record(Err(ComposerError::validation(MSG_NOTHING_TO_PLAY)))
        }
    }

    pub fn pause(&mut self) {
        self.scheduler.pause();
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    /// Deliver a frame scheduled through the clock.
    pub fn tick(&mut self, now_ms: f64) -> TickOutcome {
        self.scheduler.tick(now_ms, self.store.tempo(), self.store.total_beats())
    }

    // ── Song library ────────────────────────────────────────────────

    /// Save the current composition under `name`.
    pub fn save_song(&mut self, name: &str) -> Result<SavedSong> {
        let result = self
            .library
            .save(&mut self.storage, name, self.store.events(), self.store.tempo())
            .map(SavedSong::clone);
        self.record(result)
    }

    /// Replace the composition with a saved song. Playback always ends up
    /// stopped at the beginning.
    pub fn load_song(&mut self, id: &str) -> Result<()> {
        let Some(song) = self.library.get(id).cloned() else {
            return self.record(Err(ComposerError::validation(MSG_SONG_NOT_FOUND)));
        };
        self.scheduler.stop();
        self.store.replace(song.notes_and_chords, song.tempo);
        log::info!("Loaded song '{}'", song.name);
        self.save_draft();
        Ok(())
    }

    pub fn delete_song(&mut self, id: &str) -> Result<bool> {
        let result = self.library.delete(&mut self.storage, id);
        self.record(result)
    }

    // ── Output ──────────────────────────────────────────────────────

    pub fn row_views(&self) -> Vec<RowView> {
        row_views(self.store.rows(), self.scheduler.active_position(), self.store.metrics())
    }

    pub fn view(&self) -> ComposerView {
        let playback = self.scheduler.snapshot();
        ComposerView {
            rows: self.row_views(),
            cursor: playback.cursor,
            state: playback.state,
            playing: playback.playing,
            tempo: self.store.tempo(),
            total_beats: self.store.total_beats(),
            width: self.store.effective_width(),
            songs: self.library.songs().iter().map(SongSummary::from).collect(),
            error: self.error.clone(),
        }
    }

    pub fn view_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.view())?)
    }

    pub fn render_svg(&self) -> String {
        render_rows_to_svg(&self.row_views(), self.store.metrics())
    }

    fn save_draft(&mut self) {
        // the edit stands even if the draft could not be written
        if let Err(e) = self.store.persist_draft(&mut self.storage, &self.config.draft_key) {
            self.error = Some(e.to_string());
        }
    }

    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.error = None,
            Err(e) => self.error = Some(e.to_string()),
        }
        result
    }
}
