//! Drawing constants for the SVG renderer (all in SVG user units).
//! Geometry that layout depends on lives in `StaffMetrics` instead.

// ── Page ────────────────────────────────────────────────────────────
pub(super) const PAGE_MARGIN_BOTTOM: f64 = 20.0;
pub(super) const CLEF_X: f64 = 8.0;
pub(super) const CLEF_FONT_SIZE: f64 = 44.0;

// ── Note dimensions ─────────────────────────────────────────────────
pub(super) const NOTEHEAD_RX: f64 = 5.5; // notehead ellipse x-radius
pub(super) const NOTEHEAD_RY: f64 = 4.0; // notehead ellipse y-radius
pub(super) const NOTEHEAD_TILT: f64 = -10.0; // degrees, all but whole notes
pub(super) const STEM_LENGTH: f64 = 30.0;
pub(super) const STEM_WIDTH: f64 = 1.2;
pub(super) const FLAG_LENGTH: f64 = 10.0;
pub(super) const STAFF_LINE_WIDTH: f64 = 0.8;
pub(super) const LEDGER_LINE_WIDTH: f64 = 0.8;
pub(super) const LEDGER_LINE_EXTEND: f64 = 5.0;
pub(super) const ACCIDENTAL_OFFSET_X: f64 = 14.0;
pub(super) const ACCIDENTAL_FONT_SIZE: f64 = 16.0;
pub(super) const REST_FONT_SIZE: f64 = 28.0;
pub(super) const CHORD_FONT_SIZE: f64 = 16.0;
pub(super) const CHORD_SYMBOL_OFFSET_Y: f64 = -18.0; // above staff

// ── Colors ──────────────────────────────────────────────────────────
pub(super) const NOTE_COLOR: &str = "#1a1a1a";
pub(super) const STAFF_COLOR: &str = "#555555";
pub(super) const CHORD_COLOR: &str = "#4a4a9a";
pub(super) const REST_COLOR: &str = "#1a1a1a";
pub(super) const ACTIVE_COLOR: &str = "#d9480f";
