//! SVG builder. Accumulates SVG elements and produces the final string.
//!
//! Used to export stacked system graphics as a single SVG document.

use crate::geometry::{Point, Rect};
use super::graphic::{Anchor, Primitive, SystemGraphic};

// ═══════════════════════════════════════════════════════════════════════
// SvgBuilder
// ═══════════════════════════════════════════════════════════════════════

pub(crate) struct SvgBuilder {
    elements: Vec<String>,
    width: f64,
    height: f64,
}

impl SvgBuilder {
    pub(crate) fn new(width: f64, height: f64) -> Self {
        Self {
            elements: Vec::new(),
            width,
            height,
        }
    }

    pub(crate) fn build(self) -> String {
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

    fn line(&mut self, from: Point, to: Point, color: &str, width: f64) {
        self.elements.push(format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{:.1}" stroke-linecap="round"/>"#,
            from.x, from.y, to.x, to.y, color, width
        ));
    }

    fn rect(&mut self, r: Rect, fill: &str) {
        self.elements.push(format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
            r.x, r.y, r.width, r.height, fill
        ));
    }

    fn text(&mut self, at: Point, content: &str, size: f64, anchor: Anchor, fill: &str) {
        let escaped = content
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;");
        self.elements.push(format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="{:.0}" fill="{}" text-anchor="{}">{}</text>"#,
            at.x, at.y, size, fill, anchor.as_svg(), escaped
        ));
    }

    /// Append every primitive of `graphic`, translated to `pos`.
    pub(crate) fn graphic(&mut self, graphic: &SystemGraphic, pos: Point) {
        self.elements.push(format!(
            r#"<g transform="translate({:.1},{:.1})">"#,
            pos.x, pos.y
        ));
        for primitive in &graphic.primitives {
            match primitive {
                Primitive::Line { from, to, width, color } => self.line(*from, *to, color, *width),
                Primitive::Rect { rect, color } => self.rect(*rect, color),
                Primitive::Text { at, content, size, anchor, color } => {
                    self.text(*at, content, *size, *anchor, color)
                }
            }
        }
        self.elements.push("</g>".to_string());
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Empty SVG fallback
// ═══════════════════════════════════════════════════════════════════════

pub(crate) fn empty_svg(message: &str) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 400 100\">\
         <text x=\"200\" y=\"50\" text-anchor=\"middle\" font-size=\"14\" fill=\"gray\">{}</text>\
         </svg>\n",
        message
    )
}
