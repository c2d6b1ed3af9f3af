// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashMap;

use svgscene::{
    Color, Document, FillRule, Gradient, LineCap, LineJoin, Paint, Pattern, Rect, SpreadMethod,
    Stop, Style, Transform, Units,
};

use crate::path::Shape;
use crate::stream::{fmt_num, ContentStream};
use crate::{PatternResource, XObject};

/// Paint resources accumulated during a single compilation.
///
/// Names are generated from per-class counters and are independent
/// from any object numbering the caller may use.
#[derive(Default)]
pub(crate) struct Resources {
    pub shadings: Vec<(String, String)>,
    pub patterns: Vec<(String, PatternResource)>,
    pub graphics_states: Vec<(String, String)>,
    pub xobjects: Vec<(String, XObject)>,
    pub fonts: Vec<String>,

    // Alpha pairs are deduplicated, identical states share a name.
    gs_cache: HashMap<(u64, u64), String>,
}

impl Resources {
    pub fn add_shading(&mut self, dict: String) -> String {
        let name = format!("Sh{}", self.shadings.len() + 1);
        self.shadings.push((name.clone(), dict));
        name
    }

    pub fn add_pattern(&mut self, pattern: PatternResource) -> String {
        let name = format!("P{}", self.patterns.len() + 1);
        self.patterns.push((name.clone(), pattern));
        name
    }

    pub fn add_image(&mut self, media_type: String, data: Vec<u8>) -> String {
        let name = format!("Im{}", self.image_count() + 1);
        self.xobjects.push((name.clone(), XObject::Image { media_type, data }));
        name
    }

    pub fn add_form(&mut self, bbox: (f64, f64, f64, f64), content: Vec<u8>) -> String {
        let name = format!("FXO{}", self.form_count() + 1);
        self.xobjects.push((name.clone(), XObject::Form { bbox, content }));
        name
    }

    fn image_count(&self) -> usize {
        self.xobjects
            .iter()
            .filter(|(_, x)| matches!(x, XObject::Image { .. }))
            .count()
    }

    fn form_count(&self) -> usize {
        self.xobjects
            .iter()
            .filter(|(_, x)| matches!(x, XObject::Form { .. }))
            .count()
    }

    /// Returns a graphics state name for an alpha pair.
    pub fn alpha_state(&mut self, fill_alpha: f64, stroke_alpha: f64) -> String {
        let key = (fill_alpha.to_bits(), stroke_alpha.to_bits());
        if let Some(name) = self.gs_cache.get(&key) {
            return name.clone();
        }

        let name = format!("GS{}", self.graphics_states.len() + 1);
        let dict = format!(
            "<< /Type /ExtGState /ca {} /CA {} >>",
            fmt_num(fill_alpha),
            fmt_num(stroke_alpha)
        );
        self.graphics_states.push((name.clone(), dict));
        self.gs_cache.insert(key, name.clone());
        name
    }

    pub fn add_font(&mut self, name: &str) {
        if !self.fonts.iter().any(|f| f == name) {
            self.fonts.push(name.to_string());
        }
    }
}

/// A classified paint.
#[derive(Clone, Copy)]
enum ResolvedPaint<'a> {
    None,
    Solid(Color),
    Gradient(&'a Gradient),
    Pattern(&'a Pattern),
}

fn resolve_paint<'a>(
    paint: &Option<Paint>,
    style: &Style,
    doc: &'a Document,
) -> ResolvedPaint<'a> {
    match paint {
        None => ResolvedPaint::None,
        Some(Paint::Color(c)) => ResolvedPaint::Solid(*c),
        Some(Paint::CurrentColor) => ResolvedPaint::Solid(style.color),
        Some(Paint::Link(ref id)) => {
            if let Some(gradient) = doc.gradients.get(id) {
                ResolvedPaint::Gradient(gradient)
            } else if let Some(pattern) = doc.patterns.get(id) {
                ResolvedPaint::Pattern(pattern)
            } else {
                log::warn!("Paint server '{}' was not found.", id);
                ResolvedPaint::None
            }
        }
    }
}

/// Returns the solid color a gradient degenerates into, if it does.
fn gradient_as_color(gradient: &Gradient) -> Option<Color> {
    let stops = &gradient.base().stops;
    match stops.len() {
        0 => None,
        1 => Some(stops[0].color),
        _ => None,
    }
}

/// Paints a shape: state setup, construction operators and the
/// final painting operator.
pub(crate) fn fill_and_stroke(
    shape: &Shape,
    style: &Style,
    doc: &Document,
    cs: &mut ContentStream,
    res: &mut Resources,
    stroke_only: bool,
    depth: usize,
) {
    let bbox = shape.bbox();

    let mut fill = if stroke_only {
        ResolvedPaint::None
    } else {
        resolve_paint(&style.fill, style, doc)
    };
    let stroke = resolve_paint(&style.stroke, style, doc);

    // Single-stop gradients are just solid colors.
    if let ResolvedPaint::Gradient(gradient) = fill {
        if let Some(color) = gradient_as_color(gradient) {
            fill = ResolvedPaint::Solid(color);
        }
    }

    // Opacity goes through an extended graphics state.
    let fill_alpha = style.fill_opacity * style.opacity;
    let stroke_alpha = style.stroke_opacity * style.opacity;
    if fill_alpha < 1.0 || stroke_alpha < 1.0 {
        let name = res.alpha_state(fill_alpha, stroke_alpha);
        cs.graphics_state(&name);
    }

    let mut has_fill = false;
    let mut gradient_fill = None;
    match fill {
        ResolvedPaint::None => {}
        ResolvedPaint::Solid(color) => {
            let (r, g, b) = color.rgb_f64();
            cs.set_fill_color(r, g, b);
            has_fill = true;
        }
        ResolvedPaint::Gradient(gradient) => {
            // Painted through a clip + shading block after the
            // construction ops; the plain fill operator is suppressed.
            gradient_fill = Some(gradient);
        }
        ResolvedPaint::Pattern(pattern) => {
            if let Some(name) = build_pattern(pattern, bbox, doc, cs, res, depth) {
                cs.set_fill_pattern(&name);
                has_fill = true;
            }
        }
    }

    let mut has_stroke = false;
    match stroke {
        ResolvedPaint::None => {}
        ResolvedPaint::Solid(color) => {
            let (r, g, b) = color.rgb_f64();
            cs.set_stroke_color(r, g, b);
            has_stroke = true;
        }
        ResolvedPaint::Gradient(gradient) => {
            // A gradient stroke degrades to its first stop color.
            if let Some(stop) = gradient.base().stops.first() {
                let (r, g, b) = stop.color.rgb_f64();
                cs.set_stroke_color(r, g, b);
                has_stroke = true;
            }
        }
        ResolvedPaint::Pattern(pattern) => {
            if let Some(name) = build_pattern(pattern, bbox, doc, cs, res, depth) {
                cs.set_stroke_pattern(&name);
                has_stroke = true;
            }
        }
    }

    if has_stroke {
        emit_stroke_state(style, cs);
    }

    shape.emit(cs);

    let even_odd = style.fill_rule == FillRule::EvenOdd;

    if let Some(gradient) = gradient_fill {
        match shading_operands(gradient, bbox) {
            Some((dict, ts)) => {
                let name = res.add_shading(dict);
                cs.save();
                cs.clip(even_odd);
                if !ts.is_default() {
                    cs.concat(&ts);
                }
                cs.shading(&name);
                cs.restore();
            }
            None => {
                log::warn!("A gradient fill without a bounding box was skipped.");
                // The path is still open; drop it unless the stroke
                // needs it below.
                if !has_stroke {
                    cs.paint(false, false, false);
                }
            }
        }

        // The shading block consumed the path; a stroke needs the
        // construction operators again.
        if has_stroke {
            shape.emit(cs);
            cs.paint(false, true, even_odd);
        }
        return;
    }

    cs.paint(has_fill, has_stroke, even_odd);
}

fn emit_stroke_state(style: &Style, cs: &mut ContentStream) {
    cs.set_line_width(style.stroke_width);

    if style.stroke_linecap != LineCap::Butt {
        cs.set_line_cap(match style.stroke_linecap {
            LineCap::Butt => 0,
            LineCap::Round => 1,
            LineCap::Square => 2,
        });
    }

    if style.stroke_linejoin != LineJoin::Miter {
        cs.set_line_join(match style.stroke_linejoin {
            LineJoin::Miter => 0,
            LineJoin::Round => 1,
            LineJoin::Bevel => 2,
        });
    }

    if style.stroke_miterlimit != 4.0 {
        cs.set_miter_limit(style.stroke_miterlimit);
    }

    if let Some(ref dasharray) = style.stroke_dasharray {
        let array = svgscene::units::parse_list(dasharray);
        if !array.is_empty() && !array.iter().any(|n| *n < 0.0) {
            cs.set_dash(&array, style.stroke_dashoffset);
        }
    }
}

/// Produces the shading dictionary and the gradient transform.
///
/// Bounding-box gradient coordinates are mapped into the current
/// user space up front, so an untransformed gradient needs no
/// extra matrix at all.
fn shading_operands(gradient: &Gradient, bbox: Option<Rect>) -> Option<(String, Transform)> {
    let base = gradient.base();

    let (map_x, map_y, diag): (Box<dyn Fn(f64) -> f64>, Box<dyn Fn(f64) -> f64>, f64) =
        if base.units == Units::ObjectBoundingBox {
            let bbox = bbox?;
            bbox.size()?;
            let (x, y, w, h) = (bbox.x(), bbox.y(), bbox.width(), bbox.height());
            (
                Box::new(move |v| x + v * w),
                Box::new(move |v| y + v * h),
                ((w * w + h * h) / 2.0).sqrt(),
            )
        } else {
            (Box::new(|v| v), Box::new(|v| v), 1.0)
        };

    let extend = match base.spread_method {
        SpreadMethod::Pad => "[true true]",
        // Reflection and repetition cannot be expressed by an axial
        // or radial shading; clamping them off is the nearest output.
        SpreadMethod::Reflect | SpreadMethod::Repeat => "[false false]",
    };

    let function = stops_function(&base.stops);

    let dict = match gradient {
        Gradient::Linear(ref lg) => format!(
            "<< /ShadingType 2 /ColorSpace /DeviceRGB /Coords [{} {} {} {}] /Function {} /Extend {} >>",
            fmt_num(map_x(lg.x1)),
            fmt_num(map_y(lg.y1)),
            fmt_num(map_x(lg.x2)),
            fmt_num(map_y(lg.y2)),
            function,
            extend,
        ),
        Gradient::Radial(ref rg) => format!(
            "<< /ShadingType 3 /ColorSpace /DeviceRGB /Coords [{} {} {} {} {} {}] /Function {} /Extend {} >>",
            fmt_num(map_x(rg.fx)),
            fmt_num(map_y(rg.fy)),
            // Radii scale along the box diagonal, like percentage
            // lengths do.
            fmt_num(rg.fr * diag),
            fmt_num(map_x(rg.cx)),
            fmt_num(map_y(rg.cy)),
            fmt_num(rg.r * diag),
            function,
            extend,
        ),
    };

    Some((dict, base.transform))
}

fn color_array(color: Color) -> String {
    let (r, g, b) = color.rgb_f64();
    format!("[{} {} {}]", fmt_num(r), fmt_num(g), fmt_num(b))
}

fn segment_function(from: &Stop, to: &Stop) -> String {
    format!(
        "<< /FunctionType 2 /Domain [0 1] /C0 {} /C1 {} /N 1 >>",
        color_array(from.color),
        color_array(to.color)
    )
}

/// Builds the color function: a single exponential segment for two
/// stops, a stitching function otherwise.
fn stops_function(stops: &[Stop]) -> String {
    debug_assert!(stops.len() >= 2);

    if stops.len() == 2 {
        return segment_function(&stops[0], &stops[1]);
    }

    let mut functions = String::new();
    let mut bounds = String::new();
    let mut encode = String::new();
    for pair in stops.windows(2) {
        if !functions.is_empty() {
            functions.push(' ');
            encode.push(' ');
        }
        functions.push_str(&segment_function(&pair[0], &pair[1]));
        encode.push_str("0 1");
    }
    for stop in &stops[1..stops.len() - 1] {
        if !bounds.is_empty() {
            bounds.push(' ');
        }
        bounds.push_str(&fmt_num(stop.offset));
    }

    format!(
        "<< /FunctionType 3 /Domain [0 1] /Functions [{}] /Bounds [{}] /Encode [{}] >>",
        functions, bounds, encode
    )
}

/// Renders a pattern tile into a form XObject and registers the
/// tiling pattern dictionary.
fn build_pattern(
    pattern: &Pattern,
    bbox: Option<Rect>,
    doc: &Document,
    cs: &mut ContentStream,
    res: &mut Resources,
    depth: usize,
) -> Option<String> {
    // Resolve the tile rect into user space.
    let (x, y, w, h) = if pattern.units == Units::ObjectBoundingBox {
        let bbox = bbox?;
        (
            bbox.x() + pattern.rect.x() * bbox.width(),
            bbox.y() + pattern.rect.y() * bbox.height(),
            pattern.rect.width() * bbox.width(),
            pattern.rect.height() * bbox.height(),
        )
    } else {
        (
            pattern.rect.x(),
            pattern.rect.y(),
            pattern.rect.width(),
            pattern.rect.height(),
        )
    };

    if w <= 0.0 || h <= 0.0 {
        return None;
    }

    // Capture the tile content into a nested stream.
    cs.push_buffer();
    if let Some(vb) = pattern.view_box.filter(|vb| vb.size().is_some()) {
        let sx = w / vb.width();
        let sy = h / vb.height();
        cs.concat(&Transform::new(sx, 0.0, 0.0, sy, -vb.x() * sx, -vb.y() * sy));
    } else if pattern.content_units == Units::ObjectBoundingBox {
        if let Some(bbox) = bbox {
            cs.concat(&Transform::new_scale(bbox.width(), bbox.height()));
        }
    }
    for child in pattern.node.children() {
        crate::render::render_node(&child, None, doc, cs, res, depth + 1);
    }
    let tile = cs.pop_buffer();

    let form = res.add_form((0.0, 0.0, w, h), tile);

    // The tile placement matrix. The pattern transform comes first,
    // then the translation to the tile origin.
    let mut matrix = pattern.transform;
    matrix.translate(x, y);

    let dict = format!(
        "<< /PatternType 1 /PaintType 1 /TilingType 1 /BBox [0 0 {} {}] /XStep {} /YStep {} /Matrix [{} {} {} {} {} {}] >>",
        fmt_num(w),
        fmt_num(h),
        fmt_num(w),
        fmt_num(h),
        fmt_num(matrix.a),
        fmt_num(matrix.b),
        fmt_num(matrix.c),
        fmt_num(matrix.d),
        fmt_num(matrix.e),
        fmt_num(matrix.f),
    );

    let mut content = Vec::new();
    content.extend_from_slice(b"/");
    content.extend_from_slice(form.as_bytes());
    content.extend_from_slice(b" Do\n");

    Some(res.add_pattern(PatternResource {
        dict,
        content,
        xobject: form,
    }))
}
