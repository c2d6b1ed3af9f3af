// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashMap;

use crate::color::{self, Color};
use crate::css::{self, Stylesheet};
use crate::error::Error;
use crate::geom::{Rect, Size};
use crate::paint_server::{
    BaseGradient, ClipPath, Filter, Gradient, LinearGradient, Marker, MarkerOrient, MarkerUnits,
    Mask, MaskType, Pattern, RadialGradient, Shadow, SpreadMethod, Stop, Units,
};
use crate::style::Style;
use crate::transform::Transform;
use crate::tree::{Document, Element, ElementTag, Node};
use crate::units;
use crate::OptionLog;

/// Pixels to points. CSS defines 96 px and 72 pt per inch.
const PX_TO_PT: f64 = 0.75;

pub(crate) fn convert_document(xml: &roxmltree::Document) -> Result<Document, Error> {
    let xml_root = xml.root_element();
    if xml_root.tag_name().name() != "svg" {
        return Err(Error::MalformedDocument);
    }

    let sheet = collect_stylesheet(xml);

    let view_box = xml_root
        .attribute("viewBox")
        .map(|vb| units::parse_list_exact(vb, 4))
        .and_then(|list| {
            if list.is_empty() {
                None
            } else {
                Rect::new(list[0], list[1], list[2], list[3])
            }
        })
        .filter(|r| r.size().is_some());

    let size = resolve_size(&xml_root, view_box).ok_or(Error::InvalidSize)?;

    let mut root_data = Element::new(ElementTag::Svg);
    copy_attributes(&xml_root, &mut root_data);
    root_data.style = root_data.cascaded_style(&Style::default(), Some(&sheet));

    let mut root = Node::new(root_data);
    convert_children(xml_root, &mut root, &sheet);

    let mut doc = Document {
        root,
        size,
        view_box,
        definitions: HashMap::new(),
        gradients: HashMap::new(),
        patterns: HashMap::new(),
        clip_paths: HashMap::new(),
        masks: HashMap::new(),
        markers: HashMap::new(),
        filters: HashMap::new(),
    };

    collect_definitions(&mut doc);

    Ok(doc)
}

/// Resolves the effective document size in points.
///
/// Declared width/height win; the viewBox size is the fallback.
fn resolve_size(root: &roxmltree::Node, view_box: Option<Rect>) -> Option<Size> {
    let (vb_w, vb_h) = match view_box {
        Some(vb) => (vb.width(), vb.height()),
        None => (100.0, 100.0),
    };

    let width = match root.attribute("width") {
        Some(v) => units::parse_length(v, vb_w, 16.0, vb_w),
        None => vb_w,
    };
    let height = match root.attribute("height") {
        Some(v) => units::parse_length(v, vb_h, 16.0, vb_h),
        None => vb_h,
    };

    Size::new(width * PX_TO_PT, height * PX_TO_PT)
}

fn collect_stylesheet(xml: &roxmltree::Document) -> Stylesheet {
    let mut sheet = Stylesheet::new();
    for node in xml.root().descendants() {
        if node.is_element() && node.tag_name().name() == "style" {
            let is_css = node
                .attribute("type")
                .map_or(true, |t| t.is_empty() || t == "text/css");
            if is_css {
                sheet.parse(&collect_text(&node));
            }
        }
    }

    sheet
}

fn collect_text(xml_node: &roxmltree::Node) -> String {
    let mut text = String::new();
    for child in xml_node.children() {
        if let Some(t) = child.text() {
            text.push_str(t);
        }
    }
    text
}

fn copy_attributes(xml_node: &roxmltree::Node, element: &mut Element) {
    for attr in xml_node.attributes() {
        let name = attr.name();
        if name == "id" {
            element.id = attr.value().to_string();
        } else if attr.namespace().is_some() && name == "href" {
            // Keep the `xlink:` prefixed form, the tree is namespace-free.
            element
                .attributes
                .insert("xlink:href".to_string(), attr.value().to_string());
        } else {
            element
                .attributes
                .insert(name.to_string(), attr.value().to_string());
        }
    }
}

fn convert_children(xml_parent: roxmltree::Node, parent: &mut Node, sheet: &Stylesheet) {
    for xml_child in xml_parent.children() {
        if !xml_child.is_element() {
            continue;
        }

        let tag = match ElementTag::from_str(xml_child.tag_name().name()) {
            Some(tag) => tag,
            None => {
                log::debug!(
                    "Element '{}' is not supported and will be skipped.",
                    xml_child.tag_name().name()
                );
                continue;
            }
        };

        let mut element = Element::new(tag);
        copy_attributes(&xml_child, &mut element);

        if matches!(tag, ElementTag::Text | ElementTag::Tspan) {
            element.text = Some(collect_text(&xml_child));
        }

        element.style = element.cascaded_style(&parent.borrow().style, Some(sheet));

        if let Some(ts) = element.attribute("transform") {
            element.transform = ts
                .parse::<Transform>()
                .ok()
                .log_none(|| log::warn!("Failed to parse a transform: '{}'.", ts));
        }

        let mut node = Node::new(element);
        parent.append(node.clone());

        convert_children(xml_child, &mut node, sheet);
    }
}

fn collect_definitions(doc: &mut Document) {
    let root = doc.root.clone();
    for node in root.descendants() {
        let id = node.borrow().id.clone();
        if id.is_empty() {
            continue;
        }

        // The first occurrence of an id wins.
        if doc.definitions.contains_key(&id) {
            log::warn!("Duplicated id: '{}'.", id);
            continue;
        }
        doc.definitions.insert(id.clone(), node.clone());
    }

    // Paint servers can reference each other, so the id map
    // must be complete before they are resolved.
    for node in root.descendants() {
        let (tag, id) = {
            let b = node.borrow();
            (b.tag, b.id.clone())
        };
        if id.is_empty() || !doc.definitions.contains_key(&id) {
            continue;
        }

        match tag {
            ElementTag::LinearGradient | ElementTag::RadialGradient => {
                if let Some(gradient) = convert_gradient(&node, doc) {
                    doc.gradients.insert(id, gradient);
                }
            }
            ElementTag::Pattern => {
                if let Some(pattern) = convert_pattern(&node) {
                    doc.patterns.insert(id, pattern);
                }
            }
            ElementTag::ClipPath => {
                doc.clip_paths.insert(id, convert_clip_path(&node));
            }
            ElementTag::Mask => {
                doc.masks.insert(id, convert_mask(&node));
            }
            ElementTag::Marker => {
                doc.markers.insert(id, convert_marker(&node));
            }
            ElementTag::Filter => {
                doc.filters.insert(id, convert_filter(&node));
            }
            _ => {}
        }
    }
}

/// Collects the `href` inheritance chain of a gradient element,
/// starting with the element itself.
fn href_chain(node: &Node, doc: &Document) -> Vec<Node> {
    let mut chain = vec![node.clone()];
    let mut seen = vec![node.borrow().id.clone()];
    let mut current = node.clone();

    for _ in 0..10 {
        let href = match current.borrow().href().map(str::to_string) {
            Some(h) => h,
            None => break,
        };

        let id = match href.strip_prefix('#') {
            Some(id) => id,
            None => break,
        };

        if seen.iter().any(|s| s == id) {
            log::warn!("Gradient href loop detected at '{}'.", id);
            break;
        }

        let linked = match doc.definitions.get(id) {
            Some(n) => n.clone(),
            None => break,
        };

        seen.push(id.to_string());
        chain.push(linked.clone());
        current = linked;
    }

    chain
}

/// Returns the first attribute value along the href chain.
fn chain_attribute(chain: &[Node], name: &str) -> Option<String> {
    for node in chain {
        if let Some(v) = node.borrow().attribute(name) {
            return Some(v.to_string());
        }
    }
    None
}

fn convert_gradient(node: &Node, doc: &Document) -> Option<Gradient> {
    let chain = href_chain(node, doc);

    let units = chain_attribute(&chain, "gradientUnits")
        .and_then(|v| Units::from_str(&v))
        .unwrap_or(Units::ObjectBoundingBox);

    let transform = chain_attribute(&chain, "gradientTransform")
        .and_then(|v| v.parse::<Transform>().ok())
        .unwrap_or_default();

    let spread_method = match chain_attribute(&chain, "spreadMethod").as_deref() {
        Some("reflect") => SpreadMethod::Reflect,
        Some("repeat") => SpreadMethod::Repeat,
        _ => SpreadMethod::Pad,
    };

    let stops = convert_stops(&chain);
    if stops.is_empty() {
        log::warn!("Gradient '{}' has no stops.", node.borrow().id);
        return None;
    }

    let coord = |name: &str, default: f64| -> f64 {
        match chain_attribute(&chain, name) {
            Some(v) => parse_server_coord(&v, default, units),
            None => default,
        }
    };

    let base = BaseGradient {
        units,
        transform,
        spread_method,
        stops,
    };

    let tag = node.borrow().tag;
    if tag == ElementTag::LinearGradient {
        Some(Gradient::Linear(LinearGradient {
            x1: coord("x1", 0.0),
            y1: coord("y1", 0.0),
            x2: coord("x2", 1.0),
            y2: coord("y2", 0.0),
            base,
        }))
    } else {
        let cx = coord("cx", 0.5);
        let cy = coord("cy", 0.5);
        Some(Gradient::Radial(RadialGradient {
            cx,
            cy,
            r: coord("r", 0.5),
            // The focal point defaults to the center.
            fx: coord("fx", cx),
            fy: coord("fy", cy),
            fr: coord("fr", 0.0),
            base,
        }))
    }
}

/// Parses a paint-server coordinate.
///
/// In bounding-box units percentages collapse into fractions.
fn parse_server_coord(text: &str, default: f64, units: Units) -> f64 {
    let reference = match units {
        Units::ObjectBoundingBox => 1.0,
        // User-space percentages are rare enough that resolving them
        // against the unit square keeps the parser context-free.
        Units::UserSpaceOnUse => 1.0,
    };
    units::parse_length(text, default, 16.0, reference)
}

/// Collects stops from the first element along the chain that has any.
fn convert_stops(chain: &[Node]) -> Vec<Stop> {
    for node in chain {
        let mut stops = Vec::new();

        for child in node.children() {
            let b = child.borrow();
            if b.tag != ElementTag::Stop {
                continue;
            }

            let offset = match b.attribute("offset") {
                Some(v) => parse_stop_offset(v),
                None => 0.0,
            };

            let mut color = Color::black();
            let mut opacity = 1.0;

            if let Some(v) = b.attribute("stop-color") {
                if let Some(c) = color::parse_color(v) {
                    color = c;
                }
            }
            if let Some(v) = b.attribute("stop-opacity") {
                opacity = units::parse_number(v, opacity).max(0.0).min(1.0);
            }

            // The inline style has priority over attributes.
            if let Some(inline) = b.attribute("style") {
                for decl in css::parse_declarations(inline) {
                    match decl.property.as_str() {
                        "stop-color" => {
                            if let Some(c) = color::parse_color(&decl.value) {
                                color = c;
                            }
                        }
                        "stop-opacity" => {
                            opacity = units::parse_number(&decl.value, opacity).max(0.0).min(1.0);
                        }
                        _ => {}
                    }
                }
            }

            stops.push(Stop { offset, color, opacity });
        }

        if !stops.is_empty() {
            stops.sort_by(|a, b| a.offset.partial_cmp(&b.offset).unwrap());
            return stops;
        }
    }

    Vec::new()
}

fn parse_stop_offset(text: &str) -> f64 {
    let text = text.trim();
    let n = if let Some(p) = text.strip_suffix('%') {
        units::parse_number(p, 0.0) / 100.0
    } else {
        units::parse_number(text, 0.0)
    };
    n.max(0.0).min(1.0)
}

fn convert_pattern(node: &Node) -> Option<Pattern> {
    let b = node.borrow();

    let units = b
        .attribute("patternUnits")
        .and_then(Units::from_str)
        .unwrap_or(Units::ObjectBoundingBox);
    let content_units = b
        .attribute("patternContentUnits")
        .and_then(Units::from_str)
        .unwrap_or(Units::UserSpaceOnUse);

    let coord = |name: &str| -> f64 {
        match b.attribute(name) {
            Some(v) => parse_server_coord(v, 0.0, units),
            None => 0.0,
        }
    };

    let rect = Rect::new(coord("x"), coord("y"), coord("width"), coord("height"))?;
    if rect.size().is_none() {
        log::warn!("Pattern '{}' has an invalid size.", b.id);
        return None;
    }

    let transform = b
        .attribute("patternTransform")
        .and_then(|v| v.parse::<Transform>().ok())
        .unwrap_or_default();

    let view_box = b
        .attribute("viewBox")
        .map(|vb| units::parse_list_exact(vb, 4))
        .and_then(|l| if l.is_empty() { None } else { Rect::new(l[0], l[1], l[2], l[3]) });

    Some(Pattern {
        rect,
        units,
        content_units,
        transform,
        view_box,
        node: node.clone(),
    })
}

fn convert_clip_path(node: &Node) -> ClipPath {
    let b = node.borrow();

    ClipPath {
        units: b
            .attribute("clipPathUnits")
            .and_then(Units::from_str)
            .unwrap_or(Units::UserSpaceOnUse),
        transform: b
            .attribute("transform")
            .and_then(|v| v.parse::<Transform>().ok())
            .unwrap_or_default(),
        node: node.clone(),
    }
}

fn convert_mask(node: &Node) -> Mask {
    let b = node.borrow();

    let units = b
        .attribute("maskUnits")
        .and_then(Units::from_str)
        .unwrap_or(Units::ObjectBoundingBox);
    let content_units = b
        .attribute("maskContentUnits")
        .and_then(Units::from_str)
        .unwrap_or(Units::UserSpaceOnUse);

    let coord = |name: &str, default: f64| -> f64 {
        match b.attribute(name) {
            Some(v) => parse_server_coord(v, default, units),
            None => default,
        }
    };

    // The lacuna region from the SVG spec.
    let region = Rect::new(coord("x", -0.1), coord("y", -0.1), coord("width", 1.2), coord("height", 1.2))
        .unwrap_or_else(|| Rect::new(-0.1, -0.1, 1.2, 1.2).unwrap());

    let kind = match b.attribute("mask-type") {
        Some("alpha") => MaskType::Alpha,
        _ => MaskType::Luminance,
    };

    Mask {
        region,
        units,
        content_units,
        kind,
        node: node.clone(),
    }
}

fn convert_marker(node: &Node) -> Marker {
    let b = node.borrow();

    let number = |name: &str, default: f64| -> f64 {
        match b.attribute(name) {
            Some(v) => units::parse_number(v, default),
            None => default,
        }
    };

    let orient = match b.attribute("orient") {
        Some("auto") => MarkerOrient::Auto,
        Some("auto-start-reverse") => MarkerOrient::AutoStartReverse,
        Some(v) => MarkerOrient::Angle(units::parse_number(v, 0.0)),
        None => MarkerOrient::Angle(0.0),
    };

    let view_box = b
        .attribute("viewBox")
        .map(|vb| units::parse_list_exact(vb, 4))
        .and_then(|l| if l.is_empty() { None } else { Rect::new(l[0], l[1], l[2], l[3]) });

    Marker {
        ref_x: number("refX", 0.0),
        ref_y: number("refY", 0.0),
        width: number("markerWidth", 3.0),
        height: number("markerHeight", 3.0),
        units: match b.attribute("markerUnits") {
            Some("userSpaceOnUse") => MarkerUnits::UserSpaceOnUse,
            _ => MarkerUnits::StrokeWidth,
        },
        orient,
        view_box,
        node: node.clone(),
    }
}

/// Collapses a filter into the offset-copy drop-shadow model.
///
/// `feDropShadow` maps directly; a `feGaussianBlur` + `feOffset`
/// chain maps to a gray shadow. Anything else yields an empty filter.
fn convert_filter(node: &Node) -> Filter {
    let mut dx = None;
    let mut dy = None;
    let mut std_dev = 0.0;
    let mut color = Color::black();
    let mut opacity = 0.5;

    for child in node.children() {
        let b = child.borrow();
        let number = |name: &str, default: f64| -> f64 {
            match b.attribute(name) {
                Some(v) => units::parse_number(v, default),
                None => default,
            }
        };

        match b.tag {
            ElementTag::FeDropShadow => {
                dx = Some(number("dx", 2.0));
                dy = Some(number("dy", 2.0));
                std_dev = number("stdDeviation", 2.0);
                if let Some(c) = b.attribute("flood-color").and_then(color::parse_color) {
                    color = c;
                }
                opacity = number("flood-opacity", 1.0).max(0.0).min(1.0);
            }
            ElementTag::FeOffset => {
                dx = Some(number("dx", 0.0));
                dy = Some(number("dy", 0.0));
            }
            ElementTag::FeGaussianBlur => {
                std_dev = number("stdDeviation", 0.0);
            }
            _ => {}
        }
    }

    let shadow = match (dx, dy) {
        (Some(dx), Some(dy)) => Some(Shadow { dx, dy, std_dev, color, opacity }),
        _ => None,
    };

    Filter { shadow }
}
