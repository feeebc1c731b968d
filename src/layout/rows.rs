//! Row packing: determines how events are wrapped into staff rows when the
//! available width cannot hold the whole composition.

use serde::{Deserialize, Serialize};

use crate::config::StaffMetrics;
use crate::model::MusicalEvent;

/// One visual staff line of a wrapped composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRow {
    /// Row number, top to bottom (0-based)
    pub index: usize,
    /// Global position of the row's first event in the composition
    pub start: usize,
    /// The row's events, re-positioned to local slots 0..k-1
    pub events: Vec<MusicalEvent>,
}

impl LayoutRow {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Global position of a local slot.
    pub fn global_position(&self, local: usize) -> usize {
        self.start + local
    }

    /// Whether a global position falls inside this row.
    pub fn contains_position(&self, global: usize) -> bool {
        global >= self.start && global < self.start + self.events.len()
    }
}

/// Number of events one row can hold at `available_width`, or `None` when
/// the whole sequence (plus its insertion slot) fits on a single row.
pub fn notes_per_row(count: usize, available_width: f64, metrics: &StaffMetrics) -> Option<usize> {
    if available_width >= metrics.needed_width(count) {
        return None;
    }
    let usable = (available_width - 2.0 * metrics.padding) / metrics.note_width;
    let per_row = if usable.is_finite() && usable >= 1.0 {
        usable.floor() as usize
    } else {
        1
    };
    Some(per_row.max(1))
}

/// Partition `events` into rows for the given width.
///
/// Rows are consecutive chunks in original order; within each row the
/// events are re-positioned from 0. An empty sequence still yields one
/// (empty) row so there is always somewhere to insert.
pub fn pack_rows(events: &[MusicalEvent], available_width: f64, metrics: &StaffMetrics) -> Vec<LayoutRow> {
    if events.is_empty() {
        return vec![LayoutRow { index: 0, start: 0, events: Vec::new() }];
    }

    let chunk_size = notes_per_row(events.len(), available_width, metrics).unwrap_or(events.len());

    events
        .chunks(chunk_size)
        .enumerate()
        .map(|(index, chunk)| LayoutRow {
            index,
            start: index * chunk_size,
            events: chunk
                .iter()
                .enumerate()
                .map(|(local, event)| event.with_position(local))
                .collect(),
        })
        .collect()
}

/// Concatenate rows back into one sequence with global positions.
pub fn flatten_rows(rows: &[LayoutRow]) -> Vec<MusicalEvent> {
    rows.iter()
        .flat_map(|row| {
            row.events
                .iter()
                .enumerate()
                .map(move |(local, event)| event.with_position(row.global_position(local)))
        })
        .collect()
}

/// Index of the row that accepts new events (always the last one).
pub fn insertion_row(rows: &[LayoutRow]) -> usize {
    rows.len().saturating_sub(1)
}
