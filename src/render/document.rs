//! Static layout of the capture copy, emitted as an SVG document.
//!
//! All geometry is in logical px at the canonical width. Ink is not part of the SVG; the layout
//! reports where each signature box sits so the rasterizer can composite ink into it.

use std::fmt::Write as _;

use crate::config::CaptureConfig;
use crate::foundation::core::{Color, Rect};
use crate::form::view::CaptureElement;
use crate::ink::surface::SignerRole;

const PADDING: f64 = 48.0;
const BLOCK_GAP: f64 = 20.0;

const HEADING_SIZE: f64 = 28.0;
const HEADING_HEIGHT: f64 = 48.0;

const LABEL_SIZE: f64 = 12.0;
const VALUE_SIZE: f64 = 18.0;
const VALUE_PAD_TOP: f64 = 24.0;
const VALUE_LINE: f64 = 22.0;
const VALUE_PAD_BOTTOM: f64 = 8.0;
const RULE_WIDTH: f64 = 2.0;

const PAD_LABEL_HEIGHT: f64 = 20.0;
const PAD_OUTLINE: Color = Color::rgb(0xcb, 0xd5, 0xe1);

/// Where ink for `role` is composited, logical px.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignatureSlot {
    pub role: SignerRole,
    pub rect: Rect,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DocumentLayout {
    pub width: f64,
    pub height: f64,
    pub svg: String,
    pub slots: Vec<SignatureSlot>,
}

/// Lay `elements` out top to bottom and emit the SVG for everything but the ink.
pub fn layout_document(
    elements: &[CaptureElement],
    capture: &CaptureConfig,
    date_stamp: &str,
) -> DocumentLayout {
    let width = capture.canonical_width;
    let x = PADDING;
    let content_w = (width - 2.0 * PADDING).max(1.0);
    let font = font_family_attr(&capture.font_family);

    let mut body = String::new();
    let mut slots = Vec::new();
    let mut y = PADDING;

    for el in elements {
        match el {
            CaptureElement::Heading(text) => {
                push_text(
                    &mut body,
                    x,
                    y + HEADING_SIZE,
                    HEADING_SIZE,
                    "bold",
                    &font,
                    capture.text_color,
                    text,
                );
                y += HEADING_HEIGHT;
            }
            CaptureElement::StaticText { label, value } => {
                y = push_static_field(&mut body, x, y, content_w, &font, capture, label, value);
            }
            CaptureElement::DateStamp { label } => {
                y = push_static_field(&mut body, x, y, content_w, &font, capture, label, date_stamp);
            }
            CaptureElement::Signature { role, label } => {
                push_text(
                    &mut body,
                    x,
                    y + LABEL_SIZE,
                    LABEL_SIZE,
                    "normal",
                    &font,
                    capture.label_color,
                    label,
                );
                let rect = Rect::new(
                    x,
                    y + PAD_LABEL_HEIGHT,
                    x + content_w,
                    y + PAD_LABEL_HEIGHT + capture.signature_height,
                );
                let _ = writeln!(
                    body,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" rx="8" fill="none" {}/>"#,
                    num(rect.x0),
                    num(rect.y0),
                    num(rect.width()),
                    num(rect.height()),
                    stroke_attrs(PAD_OUTLINE, 1.0),
                );
                slots.push(SignatureSlot { role: *role, rect });
                y = rect.y1;
            }
        }
        y += BLOCK_GAP;
    }

    let height = (y - BLOCK_GAP + PADDING).max(2.0 * PADDING);

    let mut svg = String::with_capacity(body.len() + 512);
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = num(width),
        h = num(height),
    );
    let _ = writeln!(
        svg,
        r#"<rect x="0" y="0" width="{}" height="{}" {}/>"#,
        num(width),
        num(height),
        fill_attrs(capture.background),
    );
    if capture.border_width > 0.0 {
        let half = capture.border_width / 2.0;
        let _ = writeln!(
            svg,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" {}/>"#,
            num(half),
            num(half),
            num(width - capture.border_width),
            num(height - capture.border_width),
            stroke_attrs(capture.border_color, capture.border_width),
        );
    }
    svg.push_str(&body);
    svg.push_str("</svg>\n");

    DocumentLayout {
        width,
        height,
        svg,
        slots,
    }
}

/// Label at the top-left, value underneath with a rule below it. Returns the block's bottom.
#[allow(clippy::too_many_arguments)]
fn push_static_field(
    out: &mut String,
    x: f64,
    y: f64,
    width: f64,
    font: &str,
    capture: &CaptureConfig,
    label: &str,
    value: &str,
) -> f64 {
    push_text(
        out,
        x,
        y + LABEL_SIZE,
        LABEL_SIZE,
        "normal",
        font,
        capture.label_color,
        label,
    );
    push_text(
        out,
        x,
        y + VALUE_PAD_TOP + VALUE_SIZE,
        VALUE_SIZE,
        "normal",
        font,
        capture.text_color,
        value,
    );
    let bottom = y + VALUE_PAD_TOP + VALUE_LINE + VALUE_PAD_BOTTOM;
    let _ = writeln!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" {}/>"#,
        num(x),
        num(bottom),
        num(width),
        num(RULE_WIDTH),
        fill_attrs(capture.rule_color),
    );
    bottom + RULE_WIDTH
}

#[allow(clippy::too_many_arguments)]
fn push_text(
    out: &mut String,
    x: f64,
    baseline: f64,
    size: f64,
    weight: &str,
    font: &str,
    color: Color,
    text: &str,
) {
    if text.trim().is_empty() {
        return;
    }
    let _ = writeln!(
        out,
        r#"<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{}" {} xml:space="preserve">{}</text>"#,
        num(x),
        num(baseline),
        font,
        num(size),
        weight,
        fill_attrs(color),
        escape_xml(text),
    );
}

fn font_family_attr(family: &str) -> String {
    let family = family.trim();
    if family.is_empty() {
        return "sans-serif".to_owned();
    }
    format!("{}, sans-serif", escape_xml(family))
}

fn fill_attrs(c: Color) -> String {
    format!(
        r#"fill="{}" fill-opacity="{}""#,
        Color { a: 255, ..c }.to_hex(),
        num(f64::from(c.a) / 255.0)
    )
}

fn stroke_attrs(c: Color, width: f64) -> String {
    format!(
        r#"stroke="{}" stroke-opacity="{}" stroke-width="{}""#,
        Color { a: 255, ..c }.to_hex(),
        num(f64::from(c.a) / 255.0),
        num(width)
    )
}

/// Fixed-precision number formatting keeps the SVG byte-stable.
fn num(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_owned() } else { s.to_owned() }
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() && c != '\t' => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/document.rs"]
mod tests;
