//! Composition store: owns the event sequence and tempo, and keeps the
//! packed rows in step with every mutation and width change.

use crate::config::StaffMetrics;
use crate::error::{ComposerError, Result};
use crate::layout::{pack_rows, LayoutRow};
use crate::model::{self, clamp_tempo, generate_id, MusicalEvent, NewEvent};
use crate::storage::KeyValueStore;

pub const MSG_DRAFT_LOAD_FAILED: &str = "Error loading the working draft";
pub const MSG_DRAFT_SAVE_FAILED: &str = "Error saving the working draft";

#[derive(Debug, Clone)]
pub struct CompositionStore {
    events: Vec<MusicalEvent>,
    tempo: u16,
    metrics: StaffMetrics,
    /// Last width reported by the host, if any
    last_width: Option<f64>,
    rows: Vec<LayoutRow>,
}

impl CompositionStore {
    /// Empty composition.
    pub fn new(metrics: StaffMetrics, tempo: u16) -> Self {
        let mut store = Self {
            events: Vec::new(),
            tempo: clamp_tempo(tempo as i32),
            metrics,
            last_width: None,
            rows: Vec::new(),
        };
        store.repack();
        store
    }

    /// Build the store from the working draft under `draft_key`.
    ///
    /// A missing draft starts empty. A malformed one also starts empty and is
    /// reported through the second value.
    pub fn restore(
        storage: &dyn KeyValueStore,
        draft_key: &str,
        metrics: StaffMetrics,
        tempo: u16,
    ) -> (Self, Option<ComposerError>) {
        let mut store = Self::new(metrics, tempo);
        let stored = match storage.get(draft_key) {
            Ok(stored) => stored,
            Err(e) => {
                log::warn!("Could not read working draft: {e}");
                return (store, Some(ComposerError::storage(MSG_DRAFT_LOAD_FAILED)));
            }
        };
        let Some(json) = stored else {
            return (store, None);
        };
        match serde_json::from_str::<Vec<MusicalEvent>>(&json) {
            Ok(mut events) => {
                if !model::positions_contiguous(&events) {
                    log::warn!("Working draft had non-contiguous positions, re-deriving them");
                    model::reindex(&mut events);
                }
                log::debug!("Restored working draft with {} events", events.len());
                store.events = events;
                store.repack();
                (store, None)
            }
            Err(e) => {
                log::warn!("Working draft is malformed, starting empty: {e}");
                (store, Some(ComposerError::malformed(MSG_DRAFT_LOAD_FAILED)))
            }
        }
    }

    /// Write the event sequence as the working draft.
    pub fn persist_draft(&self, storage: &mut dyn KeyValueStore, draft_key: &str) -> Result<()> {
        let json = serde_json::to_string(&self.events)?;
        storage.set(draft_key, &json).map_err(|e| {
            log::warn!("Could not write working draft: {e}");
            ComposerError::storage(MSG_DRAFT_SAVE_FAILED)
        })
    }

    pub fn events(&self) -> &[MusicalEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn tempo(&self) -> u16 {
        self.tempo
    }

    pub fn metrics(&self) -> &StaffMetrics {
        &self.metrics
    }

    pub fn rows(&self) -> &[LayoutRow] {
        &self.rows
    }

    pub fn last_width(&self) -> Option<f64> {
        self.last_width
    }

    /// Width the rows are currently packed for.
    pub fn effective_width(&self) -> f64 {
        self.last_width.unwrap_or(self.metrics.default_width)
    }

    pub fn total_beats(&self) -> f64 {
        model::total_beats(&self.events)
    }

    /// Append a new event at the end and return it.
    pub fn append(&mut self, request: NewEvent) -> &MusicalEvent {
        let position = self.events.len();
        self.events.push(request.into_event(generate_id(), position));
        self.repack();
        &self.events[position]
    }

    /// Remove the event with `id`; later events shift down one slot.
    /// Returns `false` if there is no such event.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(index) = self.events.iter().position(|e| e.id() == id) else {
            return false;
        };
        self.events.remove(index);
        model::reindex(&mut self.events);
        self.repack();
        true
    }

    /// Set the tempo, clamped to the supported range. Returns the tempo applied.
    pub fn set_tempo(&mut self, bpm: i32) -> u16 {
        self.tempo = clamp_tempo(bpm);
        self.tempo
    }

    /// Record a width measurement. Repacks only when it differs from the
    /// last one; returns whether it did.
    pub fn observe_width(&mut self, width: f64) -> bool {
        if self.last_width == Some(width) {
            return false;
        }
        self.last_width = Some(width);
        self.repack();
        true
    }

    /// Replace the whole composition (loading a song).
    pub fn replace(&mut self, events: Vec<MusicalEvent>, tempo: u16) {
        self.events = events;
        model::reindex(&mut self.events);
        self.tempo = clamp_tempo(tempo as i32);
        self.repack();
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.repack();
    }

    fn repack(&mut self) {
        debug_assert!(model::positions_contiguous(&self.events));
        self.rows = pack_rows(&self.events, self.effective_width(), &self.metrics);
        log::debug!(
            "Packed {} events into {} rows at width {}",
            self.events.len(),
            self.rows.len(),
            self.effective_width()
        );
    }
}
