//! Host-tunable configuration: staff geometry and session settings.
//!
//! Every field has a default, so a host can pass partial JSON and only
//! override what its stylesheet changes.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layout::constants::*;
use crate::model::{clamp_tempo, DEFAULT_TEMPO};

/// Storage key of the working draft.
pub const DRAFT_KEY: &str = "sheet-music-draft";
/// Storage key of the saved-song library.
pub const SONGS_KEY: &str = "sheet-music-songs";

/// Staff geometry used by layout and rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StaffMetrics {
    /// Distance between adjacent staff lines
    pub line_spacing: f64,
    /// y of the top staff line, relative to the row origin
    pub staff_top: f64,
    /// y of diatonic offset 0 (C4), relative to the row origin
    pub middle_c_y: f64,
    /// Width of one event slot
    pub note_width: f64,
    /// Horizontal padding on each side of the staff
    pub padding: f64,
    /// Vertical distance between wrapped rows
    pub row_height: f64,
    /// Rows are never drawn narrower than this
    pub min_staff_width: f64,
    /// Available width assumed before the host reports one
    pub default_width: f64,
}

impl Default for StaffMetrics {
    fn default() -> Self {
        Self {
            line_spacing: LINE_SPACING,
            staff_top: STAFF_TOP,
            middle_c_y: MIDDLE_C_Y,
            note_width: NOTE_WIDTH,
            padding: STAFF_PADDING,
            row_height: ROW_HEIGHT,
            min_staff_width: MIN_STAFF_WIDTH,
            default_width: DEFAULT_AVAILABLE_WIDTH,
        }
    }
}

impl StaffMetrics {
    /// y of the bottom staff line.
    pub fn staff_bottom(&self) -> f64 {
        self.staff_top + (STAFF_LINES as f64 - 1.0) * self.line_spacing
    }

    /// y of the middle (third) staff line.
    pub fn middle_line_y(&self) -> f64 {
        self.staff_top + 2.0 * self.line_spacing
    }

    /// y of each of the five staff lines, top to bottom.
    pub fn staff_lines(&self) -> Vec<f64> {
        (0..STAFF_LINES)
            .map(|i| self.staff_top + i as f64 * self.line_spacing)
            .collect()
    }

    /// Width a single row needs to hold `count` events plus the insertion slot.
    pub fn needed_width(&self, count: usize) -> f64 {
        2.0 * self.padding + (count as f64 + 1.0) * self.note_width
    }

    /// x of a local slot within a row.
    pub fn slot_x(&self, local_position: usize) -> f64 {
        self.padding + local_position as f64 * self.note_width
    }
}

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComposerConfig {
    pub metrics: StaffMetrics,
    /// Tempo of a new composition (clamped on use)
    pub default_tempo: u16,
    pub draft_key: String,
    pub songs_key: String,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            metrics: StaffMetrics::default(),
            default_tempo: DEFAULT_TEMPO,
            draft_key: DRAFT_KEY.to_string(),
            songs_key: SONGS_KEY.to_string(),
        }
    }
}

impl ComposerConfig {
    /// Parse a (possibly partial) JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: ComposerConfig = serde_json::from_str(json)?;
        config.default_tempo = clamp_tempo(config.default_tempo as i32);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ComposerConfig::from_json(r#"{"metrics":{"noteWidth":50},"defaultTempo":20}"#).unwrap();
        assert_eq!(config.metrics.note_width, 50.0);
        assert_eq!(config.metrics.line_spacing, LINE_SPACING);
        assert_eq!(config.default_tempo, 40);
        assert_eq!(config.draft_key, DRAFT_KEY);
    }

    #[test]
    fn staff_lines_are_evenly_spaced() {
        let m = StaffMetrics::default();
        assert_eq!(m.staff_lines(), vec![40.0, 50.0, 60.0, 70.0, 80.0]);
        assert_eq!(m.staff_bottom(), 80.0);
        assert_eq!(m.middle_line_y(), 60.0);
    }
}
