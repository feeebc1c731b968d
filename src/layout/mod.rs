//! Staff layout: turns an ordered event sequence into pixel geometry.
//!
//! - `pitch`: letter/octave → diatonic offset → y
//! - `ledger`: y → ledger lines beyond the five-line staff
//! - `rows`: width-constrained wrapping into rows
//! - `geometry`: per-event glyph instructions for a packed row

pub(crate) mod constants;
pub mod geometry;
pub mod ledger;
pub mod pitch;
pub mod rows;

use crate::config::StaffMetrics;
use crate::model::MusicalEvent;

pub use geometry::{active_position, event_glyph, row_views, AccidentalGlyph, EventGlyph, RowView};
pub use ledger::ledger_lines;
pub use pitch::{event_y, pitch_offset, staff_y};
pub use rows::{flatten_rows, insertion_row, notes_per_row, pack_rows, LayoutRow};

/// Pack `events` at `available_width` and compute their geometry in one go.
/// Used by hosts that keep no state of their own (see the C ABI).
pub fn layout_events(
    events: &[MusicalEvent],
    available_width: f64,
    highlight: Option<usize>,
    metrics: &StaffMetrics,
) -> Vec<RowView> {
    let rows = pack_rows(events, available_width, metrics);
    row_views(&rows, highlight, metrics)
}
