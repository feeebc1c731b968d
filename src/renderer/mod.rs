//! Staff renderer: draws packed rows as one self-contained SVG document,
//! for hosts that display an image rather than building their own DOM from
//! the row views.

mod constants;
mod svg_builder;

use crate::config::StaffMetrics;
use crate::layout::{EventGlyph, RowView};
use constants::*;
use svg_builder::{empty_svg, SvgBuilder};

// ═══════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════

/// Render row views (see `layout::row_views`) into an SVG string.
/// Rows are stacked at their own `y`; active glyphs use the highlight colour.
pub fn render_rows_to_svg(rows: &[RowView], metrics: &StaffMetrics) -> String {
    if rows.is_empty() {
        return empty_svg("Nothing to display");
    }

    let width = rows.iter().map(|r| r.width).fold(metrics.min_staff_width, f64::max);
    let height = rows.iter().map(|r| r.y).fold(0.0, f64::max) + metrics.row_height + PAGE_MARGIN_BOTTOM;

    let mut svg = SvgBuilder::new(width, height);
    svg.rect(0.0, 0.0, width, height, "white");

    for row in rows {
        svg.begin_group(if row.accepts_insert { "row insert" } else { "row" }, row.y);
        render_staff(&mut svg, row, metrics);
        for glyph in &row.glyphs {
            render_glyph(&mut svg, glyph, metrics);
        }
        svg.end_group();
    }

    svg.build()
}

// ═══════════════════════════════════════════════════════════════════════
// Staff
// ═══════════════════════════════════════════════════════════════════════

fn render_staff(svg: &mut SvgBuilder, row: &RowView, metrics: &StaffMetrics) {
    for &y in &row.staff_lines {
        svg.line(0.0, y, row.width, y, STAFF_COLOR, STAFF_LINE_WIDTH);
    }
    // treble clef, baseline a little below the G line
    let clef_y = metrics.staff_bottom() + metrics.line_spacing;
    svg.text(CLEF_X, clef_y, "𝄞", CLEF_FONT_SIZE, NOTE_COLOR, "start");
}

// ═══════════════════════════════════════════════════════════════════════
// Events
// ═══════════════════════════════════════════════════════════════════════

fn render_glyph(svg: &mut SvgBuilder, glyph: &EventGlyph, metrics: &StaffMetrics) {
    match glyph {
        EventGlyph::Note {
            id,
            x,
            y,
            hollow,
            tilted,
            ledger_lines,
            stem_y,
            flag_y,
            accidental,
            active,
            ..
        } => {
            let color = if *active { ACTIVE_COLOR } else { NOTE_COLOR };
            let cx = x + metrics.note_width / 2.0;

            for &ly in ledger_lines {
                svg.line(
                    cx - NOTEHEAD_RX - LEDGER_LINE_EXTEND,
                    ly,
                    cx + NOTEHEAD_RX + LEDGER_LINE_EXTEND,
                    ly,
                    STAFF_COLOR,
                    LEDGER_LINE_WIDTH,
                );
            }

            svg.notehead(cx, *y, *hollow, *tilted, color, id);

            if let Some(sy) = stem_y {
                let sx = cx - NOTEHEAD_RX + 1.0;
                svg.line(sx, *sy, sx, sy + STEM_LENGTH, color, STEM_WIDTH);
                if let Some(fy) = flag_y {
                    svg.flag(sx, *fy, color);
                }
            }

            if let Some(acc) = accidental {
                svg.text(cx - ACCIDENTAL_OFFSET_X, acc.y, acc.symbol, ACCIDENTAL_FONT_SIZE, color, "middle");
            }
        }
        EventGlyph::Unpitched { x, y, active, id, .. } => {
            let color = if *active { ACTIVE_COLOR } else { STAFF_COLOR };
            let cx = x + metrics.note_width / 2.0;
            svg.notehead(cx, *y, true, true, color, id);
        }
        EventGlyph::Rest { x, symbol, active, .. } => {
            let color = if *active { ACTIVE_COLOR } else { REST_COLOR };
            let cx = x + metrics.note_width / 2.0;
            svg.text(cx, metrics.middle_line_y() + metrics.line_spacing, symbol, REST_FONT_SIZE, color, "middle");
        }
        EventGlyph::Chord { id, x, label, active, .. } => {
            let color = if *active { ACTIVE_COLOR } else { CHORD_COLOR };
            svg.chord_text(*x, metrics.staff_top + CHORD_SYMBOL_OFFSET_Y, label, color, id);
        }
    }
}
