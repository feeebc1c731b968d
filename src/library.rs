//! Saved-song library, persisted as one JSON array under a fixed key.

use crate::error::{ComposerError, Result};
use crate::model::{generate_id, MusicalEvent, SavedSong};
use crate::storage::KeyValueStore;

pub const MSG_LOAD_FAILED: &str = "Error loading saved songs";
pub const MSG_EMPTY_NAME: &str = "Please enter a name for the song";
pub const MSG_NO_NOTES: &str = "No notes to save";
pub const MSG_SAVE_FAILED: &str = "Error saving the song";
pub const MSG_DELETE_FAILED: &str = "Error deleting the song";

#[derive(Debug, Clone)]
pub struct SongLibrary {
    key: String,
    songs: Vec<SavedSong>,
}

impl SongLibrary {
    /// Library with no songs that persists under `key`.
    pub fn empty(key: impl Into<String>) -> Self {
        Self { key: key.into(), songs: Vec::new() }
    }

    /// Read the library from storage.
    ///
    /// A missing record is an empty library. An unreadable or unparseable
    /// record is also an empty library, reported through the second value
    /// so the host can show a warning.
    pub fn load(storage: &dyn KeyValueStore, key: &str) -> (Self, Option<ComposerError>) {
        let stored = match storage.get(key) {
            Ok(stored) => stored,
            Err(e) => {
                log::warn!("Could not read saved songs: {e}");
                return (Self::empty(key), Some(ComposerError::storage(MSG_LOAD_FAILED)));
            }
        };
        let Some(json) = stored else {
            return (Self::empty(key), None);
        };
        match serde_json::from_str::<Vec<SavedSong>>(&json) {
            Ok(songs) => {
                log::debug!("Loaded {} saved songs", songs.len());
                (Self { key: key.to_string(), songs }, None)
            }
            Err(e) => {
                log::warn!("Saved songs record is malformed, ignoring it: {e}");
                (Self::empty(key), Some(ComposerError::malformed(MSG_LOAD_FAILED)))
            }
        }
    }

    pub fn songs(&self) -> &[SavedSong] {
        &self.songs
    }

    pub fn get(&self, id: &str) -> Option<&SavedSong> {
        self.songs.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Save a snapshot of `events` under `name`.
    ///
    /// Names are trimmed and need not be unique. The in-memory list only
    /// changes once the record has been written.
    pub fn save(
        &mut self,
        storage: &mut dyn KeyValueStore,
        name: &str,
        events: &[MusicalEvent],
        tempo: u16,
    ) -> Result<&SavedSong> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ComposerError::validation(MSG_EMPTY_NAME));
        }
        if events.is_empty() {
            return Err(ComposerError::validation(MSG_NO_NOTES));
        }

        let song = SavedSong {
            id: generate_id(),
            name: name.to_string(),
            notes_and_chords: events.to_vec(),
            tempo,
        };
        let mut updated = self.songs.clone();
        updated.push(song);
        self.persist(storage, &updated, MSG_SAVE_FAILED)?;

        self.songs = updated;
        let saved = &self.songs[self.songs.len() - 1];
        log::info!("Saved song '{}' ({} events, {} BPM)", saved.name, saved.notes_and_chords.len(), saved.tempo);
        Ok(saved)
    }

    /// Remove a song. Returns `false` if no song has that id.
    pub fn delete(&mut self, storage: &mut dyn KeyValueStore, id: &str) -> Result<bool> {
        if self.get(id).is_none() {
            return Ok(false);
        }
        let updated: Vec<SavedSong> = self.songs.iter().filter(|s| s.id != id).cloned().collect();
        self.persist(storage, &updated, MSG_DELETE_FAILED)?;
        self.songs = updated;
        log::info!("Deleted song {id}");
        Ok(true)
    }

    fn persist(&self, storage: &mut dyn KeyValueStore, songs: &[SavedSong], message: &str) -> Result<()> {
        let json = serde_json::to_string(songs).map_err(|e| {
            log::warn!("Could not encode saved songs: {e}");
            ComposerError::storage(message)
        })?;
        storage.set(&self.key, &json).map_err(|e| {
            log::warn!("Could not write saved songs: {e}");
            ComposerError::storage(message)
        })
    }
}
