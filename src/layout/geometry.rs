//! Per-event draw geometry: everything the host (or the SVG renderer) needs
//! to put a row on screen without knowing any music.

use serde::Serialize;

use super::constants::{ACCIDENTAL_OFFSET_Y, FLAG_OFFSET_Y, STEM_OFFSET_Y};
use super::ledger::ledger_lines;
use super::pitch::event_y;
use super::rows::LayoutRow;
use crate::config::StaffMetrics;
use crate::model::{Duration, MusicalEvent, NoteEvent};

/// Accidental glyph placed left of a note head.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccidentalGlyph {
    pub symbol: &'static str,
    pub y: f64,
}

/// Drawing instructions for one event. Coordinates are relative to the
/// row origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EventGlyph {
    #[serde(rename_all = "camelCase")]
    Note {
        id: String,
        x: f64,
        y: f64,
        duration: Duration,
        /// Open head (whole, half)
        hollow: bool,
        /// Head drawn tilted (everything but whole notes)
        tilted: bool,
        ledger_lines: Vec<f64>,
        /// Top of the stem, if the note has one
        stem_y: Option<f64>,
        flag_y: Option<f64>,
        accidental: Option<AccidentalGlyph>,
        active: bool,
    },
    /// A note whose letter has not been chosen yet; drawn on the middle line.
    #[serde(rename_all = "camelCase")]
    Unpitched {
        id: String,
        x: f64,
        y: f64,
        duration: Duration,
        active: bool,
    },
    #[serde(rename_all = "camelCase")]
    Rest {
        id: String,
        x: f64,
        duration: Duration,
        symbol: &'static str,
        active: bool,
    },
    #[serde(rename_all = "camelCase")]
    Chord {
        id: String,
        x: f64,
        duration: Duration,
        label: String,
        active: bool,
    },
}

impl EventGlyph {
    pub fn id(&self) -> &str {
        match self {
            EventGlyph::Note { id, .. }
            | EventGlyph::Unpitched { id, .. }
            | EventGlyph::Rest { id, .. }
            | EventGlyph::Chord { id, .. } => id,
        }
    }

    pub fn x(&self) -> f64 {
        match self {
            EventGlyph::Note { x, .. }
            | EventGlyph::Unpitched { x, .. }
            | EventGlyph::Rest { x, .. }
            | EventGlyph::Chord { x, .. } => *x,
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            EventGlyph::Note { active, .. }
            | EventGlyph::Unpitched { active, .. }
            | EventGlyph::Rest { active, .. }
            | EventGlyph::Chord { active, .. } => *active,
        }
    }
}

/// A row ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    pub index: usize,
    /// Global position of the first glyph
    pub start: usize,
    /// Vertical origin of the row
    pub y: f64,
    pub width: f64,
    /// y of the five staff lines, relative to the row origin
    pub staff_lines: Vec<f64>,
    /// Only the last row accepts new events
    pub accepts_insert: bool,
    pub glyphs: Vec<EventGlyph>,
}

/// Which global position, if any, is highlighted during playback.
pub fn active_position(cursor: f64) -> Option<usize> {
    if cursor.is_finite() && cursor >= 0.0 {
        Some(cursor.floor() as usize)
    } else {
        None
    }
}

pub fn rest_symbol(duration: Duration) -> &'static str {
    match duration {
        Duration::Whole => "𝄻",
        Duration::Half => "𝄼",
        _ => "𝄽",
    }
}

fn note_glyph(note: &NoteEvent, event: &MusicalEvent, x: f64, active: bool, metrics: &StaffMetrics) -> EventGlyph {
    let duration = note.duration;
    if note.is_rest {
        return EventGlyph::Rest {
            id: note.id.clone(),
            x,
            duration,
            symbol: rest_symbol(duration),
            active,
        };
    }
    let Some(y) = event_y(event, metrics) else {
        return EventGlyph::Unpitched {
            id: note.id.clone(),
            x,
            y: metrics.middle_line_y(),
            duration,
            active,
        };
    };

    let is_whole = duration == Duration::Whole;
    EventGlyph::Note {
        id: note.id.clone(),
        x,
        y,
        duration,
        hollow: matches!(duration, Duration::Whole | Duration::Half),
        tilted: !is_whole,
        ledger_lines: ledger_lines(y, metrics),
        stem_y: (!is_whole).then_some(y + STEM_OFFSET_Y),
        flag_y: (duration == Duration::Eighth).then_some(y + FLAG_OFFSET_Y),
        accidental: note.accidental.symbol().map(|symbol| AccidentalGlyph {
            symbol,
            y: y + ACCIDENTAL_OFFSET_Y,
        }),
        active,
    }
}

/// Geometry of a single event at a local slot.
pub fn event_glyph(event: &MusicalEvent, local: usize, active: bool, metrics: &StaffMetrics) -> EventGlyph {
    let x = metrics.slot_x(local);
    match event {
        MusicalEvent::Note(note) => note_glyph(note, event, x, active, metrics),
        MusicalEvent::Chord(chord) => {
            let mut label = chord.note.map(|n| n.as_str().to_string()).unwrap_or_default();
            if let Some(symbol) = chord.accidental.symbol() {
                label.push_str(symbol);
            }
            EventGlyph::Chord {
                id: chord.id.clone(),
                x,
                duration: chord.duration,
                label,
                active,
            }
        }
    }
}

/// Build draw instructions for packed rows.
///
/// `highlight` is the global position to mark active (usually
/// `active_position(cursor)` while the transport is running).
pub fn row_views(rows: &[LayoutRow], highlight: Option<usize>, metrics: &StaffMetrics) -> Vec<RowView> {
    let last = rows.len().saturating_sub(1);
    rows.iter()
        .map(|row| {
            let active_local = highlight.filter(|&p| row.contains_position(p)).map(|p| p - row.start);
            let glyphs = row
                .events
                .iter()
                .enumerate()
                .map(|(local, event)| event_glyph(event, local, active_local == Some(local), metrics))
                .collect();
            RowView {
                index: row.index,
                start: row.start,
                y: row.index as f64 * metrics.row_height,
                width: metrics.min_staff_width.max(metrics.needed_width(row.len())),
                staff_lines: metrics.staff_lines(),
                accepts_insert: row.index == last,
                glyphs,
            }
        })
        .collect()
}
