//! Pitch → vertical staff position.

use crate::config::StaffMetrics;
use crate::model::{MusicalEvent, NoteName};

/// Diatonic steps from C4: C=0 … B=6, plus 7 per octave above 4.
/// Accidentals do not move a note on the staff.
pub fn pitch_offset(letter: NoteName, octave: i32) -> i32 {
    letter.step_index() + (octave - 4) * 7
}

/// Vertical pixel position of a pitch. Each diatonic step moves half a
/// line spacing; higher pitches get smaller y.
pub fn staff_y(letter: NoteName, octave: i32, metrics: &StaffMetrics) -> f64 {
    let offset = pitch_offset(letter, octave);
    metrics.middle_c_y - offset as f64 * (metrics.line_spacing / 2.0)
}

/// Note head y for a pitched, sounding note. Rests, chords and notes
/// without a letter have no head position.
pub fn event_y(event: &MusicalEvent, metrics: &StaffMetrics) -> Option<f64> {
    match event {
        MusicalEvent::Note(n) if !n.is_rest => n.note.map(|letter| staff_y(letter, n.octave, metrics)),
        _ => None,
    }
}
