// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Text emission over the base-14 font model.
//!
//! There is no shaping and no font file access here: glyph runs use
//! a reserved font name and an average-width estimate per family.

use svgscene::{units, Color, Element, ElementTag, FontStyle, Node, Paint, Style, TextAnchor};

use crate::paint_server::Resources;
use crate::stream::ContentStream;

/// One positioned chunk of text.
struct Span {
    text: String,
    x: Option<f64>,
    y: Option<f64>,
    dx: f64,
    dy: f64,
}

/// Maps a font family list onto a reserved base font name and the
/// family's average glyph width factor.
fn base_font(style: &Style) -> (&'static str, f64) {
    let family = style.font_family.to_ascii_lowercase();
    let bold = style.font_weight >= 600;
    let italic = style.font_style != FontStyle::Normal;

    if family.contains("courier") || family.contains("mono") {
        let name = match (bold, italic) {
            (false, false) => "Courier",
            (true, false) => "Courier-Bold",
            (false, true) => "Courier-Oblique",
            (true, true) => "Courier-BoldOblique",
        };
        (name, 0.6)
    } else if (family.contains("times") || family.contains("serif")) && !family.contains("sans") {
        let name = match (bold, italic) {
            (false, false) => "Times-Roman",
            (true, false) => "Times-Bold",
            (false, true) => "Times-Italic",
            (true, true) => "Times-BoldItalic",
        };
        (name, 0.45)
    } else {
        let name = match (bold, italic) {
            (false, false) => "Helvetica",
            (true, false) => "Helvetica-Bold",
            (false, true) => "Helvetica-Oblique",
            (true, true) => "Helvetica-BoldOblique",
        };
        (name, 0.5)
    }
}

fn estimate_width(text: &str, font_size: f64, factor: f64) -> f64 {
    text.chars().count() as f64 * font_size * factor
}

fn resolve_fill_color(style: &Style) -> Option<Color> {
    match style.fill {
        None => None,
        Some(Paint::Color(c)) => Some(c),
        Some(Paint::CurrentColor) => Some(style.color),
        Some(Paint::Link(ref id)) => {
            // Paint servers on text degrade to plain black.
            log::warn!("Text cannot be filled with '{}', using black.", id);
            Some(Color::black())
        }
    }
}

fn first_number(element: &Element, name: &str) -> Option<f64> {
    let list = units::parse_list(element.attribute(name)?);
    list.first().copied()
}

/// Renders a `text` element.
pub(crate) fn draw(node: &Node, style: &Style, cs: &mut ContentStream, res: &mut Resources) {
    let element = node.borrow();

    let color = match resolve_fill_color(style) {
        Some(c) => c,
        None => return,
    };

    let x = first_number(&element, "x").unwrap_or(0.0);
    let y = first_number(&element, "y").unwrap_or(0.0);

    // Collect the element's own text and its tspan children.
    let mut spans = Vec::new();
    if let Some(ref text) = element.text {
        if !text.is_empty() {
            spans.push(Span {
                text: text.clone(),
                x: None,
                y: None,
                dx: 0.0,
                dy: 0.0,
            });
        }
    }

    let mut positioned = false;
    for child in node.children() {
        let child = child.borrow();
        if child.tag != ElementTag::Tspan {
            continue;
        }

        let span = Span {
            text: child.text.clone().unwrap_or_default(),
            x: first_number(&child, "x"),
            y: first_number(&child, "y"),
            dx: first_number(&child, "dx").unwrap_or(0.0),
            dy: first_number(&child, "dy").unwrap_or(0.0),
        };
        positioned |=
            span.x.is_some() || span.y.is_some() || span.dx != 0.0 || span.dy != 0.0;
        if !span.text.is_empty() {
            spans.push(span);
        }
    }

    if spans.is_empty() {
        return;
    }

    let (font, factor) = base_font(style);
    res.add_font(font);

    let alpha = style.fill_opacity * style.opacity;

    if positioned {
        draw_positioned(&spans, x, y, style, color, alpha, font, factor, cs, res);
        return;
    }

    let text: String = spans.into_iter().map(|s| s.text).collect();
    let size = style.font_size;
    let width = estimate_width(&text, size, factor);

    // `textLength` forces the measured width through a horizontal
    // scale.
    let text_length = element
        .attribute("textLength")
        .map(|v| units::parse_length(v, width, size, 0.0))
        .filter(|n| *n > 0.0);
    let scale = text_length.map(|tl| tl / width * 100.0);
    let shown_width = text_length.unwrap_or(width);

    let x = match style.text_anchor {
        TextAnchor::Start => x,
        TextAnchor::Middle => x - shown_width / 2.0,
        TextAnchor::End => x - shown_width,
    };

    cs.begin_text();
    cs.set_font(font, size);
    if let Some(scale) = scale {
        cs.set_horizontal_scale(scale);
    }
    cs.text_move(x, y);
    let (r, g, b) = color.rgb_f64();
    cs.set_fill_color(r, g, b);
    if alpha < 1.0 {
        let name = res.alpha_state(alpha, alpha);
        cs.graphics_state(&name);
    }
    cs.show_text(&text);
    cs.end_text();

    draw_decorations(style, color, x, y, shown_width, cs);
}

fn draw_positioned(
    spans: &[Span],
    x: f64,
    y: f64,
    style: &Style,
    color: Color,
    alpha: f64,
    font: &str,
    factor: f64,
    cs: &mut ContentStream,
    res: &mut Resources,
) {
    let size = style.font_size;

    cs.begin_text();
    cs.set_font(font, size);
    let (r, g, b) = color.rgb_f64();
    cs.set_fill_color(r, g, b);
    if alpha < 1.0 {
        let name = res.alpha_state(alpha, alpha);
        cs.graphics_state(&name);
    }

    let mut cur_x = x;
    let mut cur_y = y;
    let mut last_td = (0.0, 0.0);
    for span in spans {
        if let Some(sx) = span.x {
            cur_x = sx;
        }
        if let Some(sy) = span.y {
            cur_y = sy;
        }
        cur_x += span.dx;
        cur_y += span.dy;

        // `Td` moves relative to the previous text position.
        cs.text_move(cur_x - last_td.0, cur_y - last_td.1);
        last_td = (cur_x, cur_y);

        cs.show_text(&span.text);
        cur_x += estimate_width(&span.text, size, factor);
    }

    cs.end_text();
}

/// Decoration lines are plain strokes after the text object.
fn draw_decorations(
    style: &Style,
    color: Color,
    x: f64,
    y: f64,
    width: f64,
    cs: &mut ContentStream,
) {
    let decoration = style.text_decoration;
    if decoration.is_none() || width <= 0.0 {
        return;
    }

    let size = style.font_size;
    let offsets = [
        (decoration.underline, -0.1),
        (decoration.overline, 0.9),
        (decoration.line_through, 0.3),
    ];

    let (r, g, b) = color.rgb_f64();
    cs.set_stroke_color(r, g, b);
    cs.set_line_width(size * 0.05);
    for (enabled, factor) in &offsets {
        if !enabled {
            continue;
        }

        let line_y = y - factor * size;
        cs.move_to(x, line_y);
        cs.line_to(x + width, line_y);
        cs.paint(false, true, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_variants() {
        let mut style = Style::default();
        assert_eq!(base_font(&style).0, "Helvetica");

        style.font_weight = 700;
        assert_eq!(base_font(&style).0, "Helvetica-Bold");

        style.font_family = "Times New Roman".to_string();
        style.font_style = FontStyle::Italic;
        assert_eq!(base_font(&style).0, "Times-BoldItalic");

        style.font_family = "monospace".to_string();
        style.font_weight = 400;
        assert_eq!(base_font(&style).0, "Courier-Oblique");

        // `sans-serif` must not match the serif branch.
        style.font_family = "sans-serif".to_string();
        style.font_style = FontStyle::Normal;
        assert_eq!(base_font(&style).0, "Helvetica");
        assert_eq!(base_font(&style).1, 0.5);
    }

    #[test]
    fn width_estimate() {
        assert_eq!(estimate_width("abcd", 10.0, 0.5), 20.0);
    }
}
