// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgscene::{
    units, Document, Element, ElementTag, Node, Rect, Shadow, Style, Transform, Visibility,
};

use crate::paint_server::{self, Resources};
use crate::path::{self, Shape};
use crate::stream::ContentStream;
use crate::{clip, image, marker, text, Output};

/// A depth limit against reference loops (`use` chains, markers
/// referencing their own path and so on).
const MAX_DEPTH: usize = 20;

/// Compiles a document into a content stream plus resources.
pub(crate) fn render(doc: &Document) -> Output {
    let mut cs = ContentStream::new();
    let mut res = Resources::default();

    cs.save();

    // PDF grows upwards; the source grows downwards.
    let height = doc.size.height();
    cs.concat(&Transform::new(1.0, 0.0, 0.0, -1.0, 0.0, height));

    if let Some(vb) = doc.view_box {
        let sx = doc.size.width() / vb.width();
        let sy = doc.size.height() / vb.height();
        cs.concat(&Transform::new(sx, 0.0, 0.0, sy, -vb.x() * sx, -vb.y() * sy));
    }

    for child in doc.root.children() {
        render_node(&child, None, doc, &mut cs, &mut res, 0);
    }

    cs.restore();

    Output {
        content: cs.finish(),
        shadings: res.shadings,
        patterns: res.patterns,
        graphics_states: res.graphics_states,
        xobjects: res.xobjects,
        fonts: res.fonts,
    }
}

/// Renders one element.
///
/// `inherited` carries a style base for re-cascading: `use`
/// expansion passes an override context down instead of mutating
/// the referenced nodes.
pub(crate) fn render_node(
    node: &Node,
    inherited: Option<&Style>,
    doc: &Document,
    cs: &mut ContentStream,
    res: &mut Resources,
    depth: usize,
) {
    if depth > MAX_DEPTH {
        log::warn!("Element nesting is too deep, giving up.");
        return;
    }

    let element = node.borrow();
    let tag = element.tag;

    // Definitions render only when referenced; a `symbol` becomes
    // visible through `use` expansion.
    if tag.is_never_rendered() && !(tag == ElementTag::Symbol && inherited.is_some()) {
        return;
    }

    let style = match inherited {
        Some(base) => element.cascaded_style(base, None),
        None => element.style.clone(),
    };

    if !style.display || style.visibility != Visibility::Visible {
        return;
    }

    cs.save();

    if let Some(ts) = element.transform {
        if !ts.is_default() {
            cs.concat(&ts);
        }
    }

    let shape = if tag.is_shape() {
        path::convert_shape(&element)
    } else {
        None
    };

    // Clipping and masking need the element bounding box for
    // objectBoundingBox units.
    if style.clip_path.is_some() || style.mask.is_some() {
        let bbox = match shape {
            Some(ref shape) => shape.bbox(),
            None => node_bbox(node),
        };

        if let Some(ref id) = style.clip_path {
            clip::apply(id, bbox, doc, cs);
        }
        if let Some(ref id) = style.mask {
            clip::apply_mask(id, bbox, doc, cs);
        }
    }

    match tag {
        ElementTag::G | ElementTag::Svg => {
            for child in node.children() {
                let child_inherited = if inherited.is_some() { Some(&style) } else { None };
                render_node(&child, child_inherited, doc, cs, res, depth + 1);
            }
        }
        ElementTag::Symbol => {
            // Only reachable through `use`.
            for child in node.children() {
                render_node(&child, Some(&style), doc, cs, res, depth + 1);
            }
        }
        ElementTag::Use => {
            render_use(&element, &style, doc, cs, res, depth);
        }
        ElementTag::Text => {
            text::draw(node, &style, cs, res);
        }
        ElementTag::Image => {
            image::draw(&element, cs, res);
        }
        _ if tag.is_shape() => {
            if let Some(shape) = shape {
                if let Some(shadow) = resolve_shadow(&style, doc) {
                    draw_shadow(&shape, &shadow, cs, res);
                }

                let stroke_only = tag == ElementTag::Line;
                paint_server::fill_and_stroke(&shape, &style, doc, cs, res, stroke_only, depth);

                let has_markers = style.marker_start.is_some()
                    || style.marker_mid.is_some()
                    || style.marker_end.is_some();
                if has_markers {
                    marker::draw_markers(&shape.to_path(), &style, doc, cs, res, depth);
                }
            }
        }
        _ => {
            // Tspans render through their parent; anything else is
            // silently skipped.
        }
    }

    cs.restore();
}

fn render_use(
    element: &Element,
    style: &Style,
    doc: &Document,
    cs: &mut ContentStream,
    res: &mut Resources,
    depth: usize,
) {
    let id = match element.href().and_then(|h| h.strip_prefix('#')) {
        Some(id) => id,
        None => return,
    };

    // A dangling reference renders nothing.
    let target = match doc.element_by_id(id) {
        Some(target) => target.clone(),
        None => return,
    };

    let font_size = style.font_size;
    let length = |name: &str| -> f64 {
        match element.attribute(name) {
            Some(v) => units::parse_length(v, 0.0, font_size, 0.0),
            None => 0.0,
        }
    };

    let x = length("x");
    let y = length("y");
    if x != 0.0 || y != 0.0 {
        cs.concat(&Transform::new_translate(x, y));
    }

    render_node(&target, Some(style), doc, cs, res, depth + 1);
}

fn resolve_shadow(style: &Style, doc: &Document) -> Option<Shadow> {
    let id = style.filter.as_ref()?;
    match doc.filters.get(id) {
        Some(filter) => filter.shadow,
        None => {
            log::warn!("Filter '{}' was not found.", id);
            None
        }
    }
}

/// Paints the offset-copy drop shadow below a shape.
fn draw_shadow(shape: &Shape, shadow: &Shadow, cs: &mut ContentStream, res: &mut Resources) {
    cs.save();
    cs.concat(&Transform::new_translate(shadow.dx, shadow.dy));
    if shadow.opacity < 1.0 {
        let name = res.alpha_state(shadow.opacity, shadow.opacity);
        cs.graphics_state(&name);
    }
    let (r, g, b) = shadow.color.rgb_f64();
    cs.set_fill_color(r, g, b);
    shape.emit(cs);
    cs.paint(true, false, false);
    cs.restore();
}

/// Computes the union of the shape bounding boxes below a node,
/// in the node's own coordinate space.
pub(crate) fn node_bbox(node: &Node) -> Option<Rect> {
    let mut acc: Option<Rect> = None;
    for child in node.children() {
        walk_bbox(&child, Transform::default(), &mut acc);
    }
    acc
}

fn walk_bbox(node: &Node, ts: Transform, acc: &mut Option<Rect>) {
    let element = node.borrow();

    let mut ts = ts;
    if let Some(t) = element.transform {
        ts.append(&t);
    }

    if element.tag.is_shape() {
        if let Some(shape) = path::convert_shape(&element) {
            let mut data = shape.to_path();
            data.transform(ts);
            if let Some(bbox) = data.bbox() {
                *acc = Some(match acc {
                    Some(prev) => prev.expand(bbox),
                    None => bbox,
                });
            }
        }
    }

    for child in node.children() {
        walk_bbox(&child, ts, acc);
    }
}
