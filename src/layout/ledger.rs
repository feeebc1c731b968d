//! Ledger lines for pitches outside the five-line staff.

use crate::config::StaffMetrics;

/// Absorbs float noise when comparing against the half-space tolerance.
const EPSILON: f64 = 1e-9;

/// y of every ledger line a note head at `y` needs, ordered outward from
/// the staff.
///
/// Lines are generated one spacing beyond the nearest outer staff line and
/// continue while they lie within half a spacing of the note (inclusive),
/// so a head sitting between two ledger positions also gets the outer one.
pub fn ledger_lines(y: f64, metrics: &StaffMetrics) -> Vec<f64> {
    let spacing = metrics.line_spacing;
    let top = metrics.staff_top;
    let bottom = metrics.staff_bottom();
    let mut lines = Vec::new();

    if spacing <= 0.0 {
        return lines;
    }

    if y < top {
        let mut line = top - spacing;
        while line >= y - spacing / 2.0 - EPSILON {
            lines.push(line);
            line -= spacing;
        }
    }

    if y > bottom {
        let mut line = bottom + spacing;
        while line <= y + spacing / 2.0 + EPSILON {
            lines.push(line);
            line += spacing;
        }
    }

    lines
}
