//! Default staff geometry (in host pixels). `StaffMetrics::default()` is
//! built from these.

// ── Staff ───────────────────────────────────────────────────────────
pub(crate) const LINE_SPACING: f64 = 10.0; // distance between staff lines
pub(crate) const STAFF_TOP: f64 = 40.0; // top staff line, relative to the row origin
pub(crate) const STAFF_LINES: usize = 5;
/// y of C4 (diatonic offset 0): one ledger line below a treble staff
pub(crate) const MIDDLE_C_Y: f64 = STAFF_TOP + 5.0 * LINE_SPACING;

// ── Horizontal slots ────────────────────────────────────────────────
pub(crate) const NOTE_WIDTH: f64 = 40.0; // width of one event slot
pub(crate) const STAFF_PADDING: f64 = 60.0; // left/right padding, leaves room for the clef

// ── Rows ────────────────────────────────────────────────────────────
pub(crate) const ROW_HEIGHT: f64 = 150.0; // vertical distance between wrapped rows
pub(crate) const MIN_STAFF_WIDTH: f64 = 800.0;
/// Width assumed until the host reports a measurement
pub(crate) const DEFAULT_AVAILABLE_WIDTH: f64 = 800.0;

// ── Glyph offsets from the note head y ──────────────────────────────
pub(crate) const STEM_OFFSET_Y: f64 = 3.0;
pub(crate) const FLAG_OFFSET_Y: f64 = 27.0;
pub(crate) const ACCIDENTAL_OFFSET_Y: f64 = 5.0;
