//! Data model for a composition: notes, rests and chord symbols placed on a
//! single staff, plus the saved-song records kept in the library.
//!
//! The serialized form keeps the field names the browser client has always
//! written to local storage, so drafts and song libraries survive upgrades.

use serde::{Deserialize, Serialize};

/// Lowest tempo the transport accepts (BPM).
pub const MIN_TEMPO: u16 = 40;
/// Highest tempo the transport accepts (BPM).
pub const MAX_TEMPO: u16 = 200;
/// Tempo of a fresh composition (BPM).
pub const DEFAULT_TEMPO: u16 = 120;
/// Octave given to notes when none is specified.
pub const DEFAULT_OCTAVE: i32 = 4;

/// Clamp a requested tempo into the supported range.
pub fn clamp_tempo(bpm: i32) -> u16 {
    bpm.clamp(MIN_TEMPO as i32, MAX_TEMPO as i32) as u16
}

/// Natural letter name of a pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteName {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteName {
    /// All letters in ascending diatonic order.
    pub const ALL: [NoteName; 7] = [
        NoteName::C,
        NoteName::D,
        NoteName::E,
        NoteName::F,
        NoteName::G,
        NoteName::A,
        NoteName::B,
    ];

    /// Scale degree within the octave (C = 0 … B = 6).
    pub fn step_index(self) -> i32 {
        match self {
            NoteName::C => 0,
            NoteName::D => 1,
            NoteName::E => 2,
            NoteName::F => 3,
            NoteName::G => 4,
            NoteName::A => 5,
            NoteName::B => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NoteName::C => "C",
            NoteName::D => "D",
            NoteName::E => "E",
            NoteName::F => "F",
            NoteName::G => "G",
            NoteName::A => "A",
            NoteName::B => "B",
        }
    }
}

/// Accidental attached to a note or chord root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Accidental {
    #[default]
    #[serde(rename = "")]
    Natural,
    #[serde(rename = "#")]
    Sharp,
    #[serde(rename = "b")]
    Flat,
}

impl Accidental {
    /// Glyph drawn next to the note head, if any.
    pub fn symbol(self) -> Option<&'static str> {
        match self {
            Accidental::Natural => None,
            Accidental::Sharp => Some("♯"),
            Accidental::Flat => Some("♭"),
        }
    }
}

/// Written note value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Duration {
    Whole,
    Half,
    #[default]
    Quarter,
    Eighth,
}

impl Duration {
    pub const ALL: [Duration; 4] = [
        Duration::Whole,
        Duration::Half,
        Duration::Quarter,
        Duration::Eighth,
    ];

    /// Length in beats (quarter note = 1 beat).
    pub fn beats(self) -> f64 {
        match self {
            Duration::Whole => 4.0,
            Duration::Half => 2.0,
            Duration::Quarter => 1.0,
            Duration::Eighth => 0.5,
        }
    }
}

/// Free-form chord annotation (e.g. quality, extension).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub value: String,
}

fn default_octave() -> i32 {
    DEFAULT_OCTAVE
}

/// A note or rest on the staff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteEvent {
    pub id: String,
    /// Letter name; `None` when the pitch has not been chosen
    pub note: Option<NoteName>,
    #[serde(default)]
    pub accidental: Accidental,
    #[serde(default = "default_octave")]
    pub octave: i32,
    pub duration: Duration,
    /// Zero-based slot index within the composition (or row)
    pub position: usize,
    #[serde(default)]
    pub is_rest: bool,
}

/// A chord symbol written above the staff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordEvent {
    pub id: String,
    /// Root letter; `None` when unset
    pub note: Option<NoteName>,
    pub position: usize,
    pub duration: Duration,
    #[serde(default)]
    pub accidental: Accidental,
    pub features: Vec<Feature>,
}

/// One slot of the composition.
///
/// Serialized without a tag: an object carrying `features` is a chord,
/// anything else is a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MusicalEvent {
    Chord(ChordEvent),
    Note(NoteEvent),
}

impl MusicalEvent {
    pub fn id(&self) -> &str {
        match self {
            MusicalEvent::Note(n) => &n.id,
            MusicalEvent::Chord(c) => &c.id,
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            MusicalEvent::Note(n) => n.duration,
            MusicalEvent::Chord(c) => c.duration,
        }
    }

    pub fn accidental(&self) -> Accidental {
        match self {
            MusicalEvent::Note(n) => n.accidental,
            MusicalEvent::Chord(c) => c.accidental,
        }
    }

    pub fn position(&self) -> usize {
        match self {
            MusicalEvent::Note(n) => n.position,
            MusicalEvent::Chord(c) => c.position,
        }
    }

    pub fn set_position(&mut self, position: usize) {
        match self {
            MusicalEvent::Note(n) => n.position = position,
            MusicalEvent::Chord(c) => c.position = position,
        }
    }

    /// Copy of this event placed at another slot.
    pub fn with_position(&self, position: usize) -> Self {
        let mut event = self.clone();
        event.set_position(position);
        event
    }

    pub fn is_chord(&self) -> bool {
        matches!(self, MusicalEvent::Chord(_))
    }
}

/// Request to add an event at the end of the composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NewEvent {
    #[serde(rename_all = "camelCase")]
    Note {
        note: Option<NoteName>,
        #[serde(default = "default_octave")]
        octave: i32,
        duration: Duration,
        #[serde(default)]
        accidental: Accidental,
        #[serde(default)]
        is_rest: bool,
    },
    #[serde(rename_all = "camelCase")]
    Chord {
        root: Option<NoteName>,
        duration: Duration,
        #[serde(default)]
        accidental: Accidental,
    },
}

impl NewEvent {
    /// A pitched note in the default octave.
    pub fn note(letter: NoteName, duration: Duration) -> Self {
        NewEvent::Note {
            note: Some(letter),
            octave: DEFAULT_OCTAVE,
            duration,
            accidental: Accidental::Natural,
            is_rest: false,
        }
    }

    pub fn rest(duration: Duration) -> Self {
        NewEvent::Note {
            note: None,
            octave: DEFAULT_OCTAVE,
            duration,
            accidental: Accidental::Natural,
            is_rest: true,
        }
    }

    pub fn chord(root: NoteName, duration: Duration) -> Self {
        NewEvent::Chord {
            root: Some(root),
            duration,
            accidental: Accidental::Natural,
        }
    }

    /// Materialize the request as an event with the given id and slot.
    pub fn into_event(self, id: String, position: usize) -> MusicalEvent {
        match self {
            NewEvent::Note { note, octave, duration, accidental, is_rest } => {
                MusicalEvent::Note(NoteEvent {
                    id,
                    note,
                    accidental,
                    octave,
                    duration,
                    position,
                    is_rest,
                })
            }
            NewEvent::Chord { root, duration, accidental } => MusicalEvent::Chord(ChordEvent {
                id,
                note: root,
                position,
                duration,
                accidental,
                features: Vec::new(),
            }),
        }
    }
}

/// Sum of the event durations in beats.
pub fn total_beats(events: &[MusicalEvent]) -> f64 {
    events.iter().fold(0.0, |acc, e| acc + e.duration().beats())
}

/// Rewrite `position` so it matches array order (0..n-1).
pub fn reindex(events: &mut [MusicalEvent]) {
    for (i, event) in events.iter_mut().enumerate() {
        event.set_position(i);
    }
}

/// Whether positions form the contiguous sequence 0..n-1 in array order.
pub fn positions_contiguous(events: &[MusicalEvent]) -> bool {
    events.iter().enumerate().all(|(i, e)| e.position() == i)
}

/// A composition saved to the song library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSong {
    pub id: String,
    pub name: String,
    /// Snapshot of the event sequence at save time
    pub notes_and_chords: Vec<MusicalEvent>,
    pub tempo: u16,
}

/// Fresh opaque identifier for events and songs.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_json_matches_client_format() {
        let json = r##"{"id":"a1","note":"E","accidental":"#","octave":5,"duration":"eighth","position":3,"isRest":false}"##;
        let event: MusicalEvent = serde_json::from_str(json).unwrap();
        match &event {
            MusicalEvent::Note(n) => {
                assert_eq!(n.note, Some(NoteName::E));
                assert_eq!(n.accidental, Accidental::Sharp);
                assert_eq!(n.octave, 5);
                assert_eq!(n.duration, Duration::Eighth);
                assert_eq!(n.position, 3);
            }
            other => panic!("expected a note, got {other:?}"),
        }
        let back = serde_json::to_string(&event).unwrap();
        assert!(back.contains("\"isRest\":false"));
        assert!(back.contains("\"accidental\":\"#\""));
    }

    #[test]
    fn features_field_selects_chord_variant() {
        let json = r#"{"id":"c1","note":"G","position":0,"duration":"half","accidental":"b","features":[]}"#;
        let event: MusicalEvent = serde_json::from_str(json).unwrap();
        assert!(event.is_chord());
        assert_eq!(event.accidental(), Accidental::Flat);
    }

    #[test]
    fn missing_octave_defaults_to_four() {
        let json = r#"{"id":"r","note":null,"accidental":"","duration":"whole","position":0,"isRest":true}"#;
        let event: MusicalEvent = serde_json::from_str(json).unwrap();
        match event {
            MusicalEvent::Note(n) => {
                assert_eq!(n.octave, DEFAULT_OCTAVE);
                assert!(n.is_rest);
                assert_eq!(n.note, None);
            }
            other => panic!("expected a note, got {other:?}"),
        }
    }

    #[test]
    fn tempo_is_clamped() {
        assert_eq!(clamp_tempo(10), MIN_TEMPO);
        assert_eq!(clamp_tempo(500), MAX_TEMPO);
        assert_eq!(clamp_tempo(96), 96);
    }

    #[test]
    fn durations_sum_to_beats() {
        let events: Vec<MusicalEvent> = [Duration::Whole, Duration::Half, Duration::Quarter, Duration::Eighth]
            .into_iter()
            .enumerate()
            .map(|(i, d)| NewEvent::rest(d).into_event(format!("e{i}"), i))
            .collect();
        assert_eq!(total_beats(&events), 7.5);
        assert!(total_beats(&[]).is_sign_positive());
        assert!(positions_contiguous(&events));
    }
}
