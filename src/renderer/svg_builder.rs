//! SVG builder: accumulates SVG elements and produces the final string.

use super::constants::*;

// ═══════════════════════════════════════════════════════════════════════
// SvgBuilder
// ═══════════════════════════════════════════════════════════════════════

pub(super) struct SvgBuilder {
    pub(super) elements: Vec<String>,
    width: f64,
    height: f64,
}

fn escape(content: &str) -> String {
    content
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl SvgBuilder {
    pub(super) fn new(width: f64, height: f64) -> Self {
        Self {
            elements: Vec::new(),
            width,
            height,
        }
    }

    pub(super) fn build(self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}" style="font-family: 'Georgia', 'Times New Roman', serif;">"#,
            self.width, self.height, self.width, self.height
        );
        svg.push('\n');
        for el in &self.elements {
            svg.push_str("  ");
            svg.push_str(el);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    /// Open a `<g>` translated to a row origin.
    pub(super) fn begin_group(&mut self, class: &str, dy: f64) {
        self.elements.push(format!(
            r#"<g class="{}" transform="translate(0,{:.1})">"#,
            class, dy
        ));
    }

    pub(super) fn end_group(&mut self) {
        self.elements.push("</g>".to_string());
    }

    pub(super) fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64) {
        self.elements.push(format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{:.1}" stroke-linecap="round"/>"#,
            x1, y1, x2, y2, color, width
        ));
    }

    pub(super) fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str) {
        self.elements.push(format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
            x, y, w, h, fill
        ));
    }

    pub(super) fn text(&mut self, x: f64, y: f64, content: &str, size: f64, fill: &str, anchor: &str) {
        self.elements.push(format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="{:.0}" fill="{}" text-anchor="{}">{}</text>"#,
            x, y, size, fill, anchor, escape(content)
        ));
    }

    /// Chord symbol text, tagged with the event id for hit-testing.
    pub(super) fn chord_text(&mut self, x: f64, y: f64, content: &str, fill: &str, id: &str) {
        self.elements.push(format!(
            r#"<text data-id="{}" x="{:.1}" y="{:.1}" font-family="Times New Roman, serif" font-size="{:.0}" font-weight="normal" fill="{}" text-anchor="start">{}</text>"#,
            escape(id), x, y, CHORD_FONT_SIZE, fill, escape(content)
        ));
    }

    pub(super) fn path(&mut self, d: &str, fill: &str, stroke: &str, stroke_width: f64) {
        self.elements.push(format!(
            r#"<path d="{}" fill="{}" stroke="{}" stroke-width="{:.1}" stroke-linecap="round"/>"#,
            d, fill, stroke, stroke_width
        ));
    }

    pub(super) fn notehead(&mut self, cx: f64, cy: f64, hollow: bool, tilted: bool, color: &str, id: &str) {
        let rx = NOTEHEAD_RX;
        let ry = NOTEHEAD_RY;
        let angle = if tilted { NOTEHEAD_TILT } else { 0.0 };
        if hollow {
            let sw = 2.0;
            self.elements.push(format!(
                r#"<ellipse data-id="{}" cx="{:.1}" cy="{:.1}" rx="{:.1}" ry="{:.1}" fill="none" stroke="{}" stroke-width="{:.1}" transform="rotate({:.0},{:.1},{:.1})"/>"#,
                escape(id), cx, cy, rx - sw / 2.0, ry - sw / 2.0, color, sw, angle, cx, cy
            ));
        } else {
            self.elements.push(format!(
                r#"<ellipse data-id="{}" cx="{:.1}" cy="{:.1}" rx="{:.1}" ry="{:.1}" fill="{}" stroke="none" stroke-width="0" transform="rotate({:.0},{:.1},{:.1})"/>"#,
                escape(id), cx, cy, rx, ry, color, angle, cx, cy
            ));
        }
    }

    /// Single eighth-note flag hanging off the stem at (x, y).
    pub(super) fn flag(&mut self, x: f64, y: f64, color: &str) {
        let d = format!(
            "M{:.1},{:.1} C{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}",
            x, y,
            x + 2.0, y + FLAG_LENGTH * 0.4,
            x + 8.0, y + FLAG_LENGTH * 0.6,
            x + 6.0, y + FLAG_LENGTH,
        );
        self.path(&d, "none", color, 1.5);
    }
}

pub(super) fn empty_svg(message: &str) -> String {
    let mut svg = SvgBuilder::new(400.0, 100.0);
    svg.rect(0.0, 0.0, 400.0, 100.0, "white");
    svg.text(200.0, 55.0, message, 14.0, STAFF_COLOR, "middle");
    svg.build()
}
