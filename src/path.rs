// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgscene::{units, Element, ElementTag, PathData, PathSegment, Rect};

use crate::stream::ContentStream;

/// The circle-to-cubic approximation factor.
pub(crate) const KAPPA: f64 = 0.5522847498;

/// A shape ready for emission.
///
/// Plain rectangles keep their own variant so they can be emitted
/// with the dedicated rectangle operator.
#[derive(Clone, Debug)]
pub(crate) enum Shape {
    Rect { x: f64, y: f64, w: f64, h: f64 },
    Path(PathData),
}

impl Shape {
    /// Emits path construction operators for the shape.
    pub fn emit(&self, cs: &mut ContentStream) {
        match self {
            Shape::Rect { x, y, w, h } => cs.rect(*x, *y, *w, *h),
            Shape::Path(ref path) => emit_path(path, cs),
        }
    }

    /// Returns the shape bounding box.
    pub fn bbox(&self) -> Option<Rect> {
        match self {
            Shape::Rect { x, y, w, h } => Rect::new(*x, *y, *w, *h),
            Shape::Path(ref path) => path.bbox(),
        }
    }

    /// Converts the shape into plain path data.
    pub fn to_path(&self) -> PathData {
        match self {
            Shape::Rect { x, y, w, h } => {
                PathData::from_rect(Rect::new(*x, *y, *w, *h).unwrap_or_else(|| {
                    Rect::new(0.0, 0.0, 0.0, 0.0).unwrap()
                }))
            }
            Shape::Path(ref path) => path.clone(),
        }
    }
}

pub(crate) fn emit_path(path: &PathData, cs: &mut ContentStream) {
    for segment in path.segments() {
        match segment {
            PathSegment::MoveTo { x, y } => cs.move_to(x, y),
            PathSegment::LineTo { x, y } => cs.line_to(x, y),
            PathSegment::CurveTo { x1, y1, x2, y2, x, y } => cs.curve_to(x1, y1, x2, y2, x, y),
            PathSegment::ClosePath => cs.close_path(),
        }
    }
}

/// Converts a basic shape element into an emittable shape.
///
/// Returns `None` for elements that are not shapes or have
/// a degenerate geometry.
pub(crate) fn convert_shape(element: &Element) -> Option<Shape> {
    match element.tag {
        ElementTag::Rect => convert_rect(element),
        ElementTag::Circle => {
            let r = length(element, "r", 0.0);
            convert_ellipse_like(element, r, r)
        }
        ElementTag::Ellipse => {
            let rx = length(element, "rx", 0.0);
            let ry = length(element, "ry", 0.0);
            convert_ellipse_like(element, rx, ry)
        }
        ElementTag::Line => {
            let mut path = PathData::new();
            path.push_move_to(length(element, "x1", 0.0), length(element, "y1", 0.0));
            path.push_line_to(length(element, "x2", 0.0), length(element, "y2", 0.0));
            Some(Shape::Path(path))
        }
        ElementTag::Polyline => convert_poly(element, false),
        ElementTag::Polygon => convert_poly(element, true),
        ElementTag::Path => {
            let data = element.attribute("d")?;
            let path = PathData::from_str(data);
            if path.is_empty() {
                None
            } else {
                Some(Shape::Path(path))
            }
        }
        _ => None,
    }
}

fn length(element: &Element, name: &str, default: f64) -> f64 {
    match element.attribute(name) {
        Some(v) => units::parse_length(v, default, element.style.font_size, 0.0),
        None => default,
    }
}

fn convert_rect(element: &Element) -> Option<Shape> {
    let x = length(element, "x", 0.0);
    let y = length(element, "y", 0.0);
    let w = length(element, "width", 0.0);
    let h = length(element, "height", 0.0);
    if w <= 0.0 || h <= 0.0 {
        return None;
    }

    // Corner radii fill in for each other when only one is given.
    let rx = element.attribute("rx").map(|v| units::parse_length(v, 0.0, element.style.font_size, 0.0));
    let ry = element.attribute("ry").map(|v| units::parse_length(v, 0.0, element.style.font_size, 0.0));
    let (rx, ry) = match (rx, ry) {
        (None, None) => (0.0, 0.0),
        (Some(rx), None) => (rx, rx),
        (None, Some(ry)) => (ry, ry),
        (Some(rx), Some(ry)) => (rx, ry),
    };
    let rx = rx.max(0.0).min(w / 2.0);
    let ry = ry.max(0.0).min(h / 2.0);

    if rx == 0.0 || ry == 0.0 {
        return Some(Shape::Rect { x, y, w, h });
    }

    // Four lines and four corner curves, clockwise from the top-left
    // corner end.
    let mut path = PathData::new();
    path.push_move_to(x + rx, y);
    path.push_line_to(x + w - rx, y);
    path.push_curve_to(
        x + w - rx + KAPPA * rx, y,
        x + w, y + ry - KAPPA * ry,
        x + w, y + ry,
    );
    path.push_line_to(x + w, y + h - ry);
    path.push_curve_to(
        x + w, y + h - ry + KAPPA * ry,
        x + w - rx + KAPPA * rx, y + h,
        x + w - rx, y + h,
    );
    path.push_line_to(x + rx, y + h);
    path.push_curve_to(
        x + rx - KAPPA * rx, y + h,
        x, y + h - ry + KAPPA * ry,
        x, y + h - ry,
    );
    path.push_line_to(x, y + ry);
    path.push_curve_to(
        x, y + ry - KAPPA * ry,
        x + rx - KAPPA * rx, y,
        x + rx, y,
    );
    path.push_close_path();

    Some(Shape::Path(path))
}

fn convert_ellipse_like(element: &Element, rx: f64, ry: f64) -> Option<Shape> {
    if rx <= 0.0 || ry <= 0.0 {
        return None;
    }

    let cx = length(element, "cx", 0.0);
    let cy = length(element, "cy", 0.0);

    let mut path = PathData::new();
    path.push_move_to(cx + rx, cy);
    path.push_curve_to(cx + rx, cy + KAPPA * ry, cx + KAPPA * rx, cy + ry, cx, cy + ry);
    path.push_curve_to(cx - KAPPA * rx, cy + ry, cx - rx, cy + KAPPA * ry, cx - rx, cy);
    path.push_curve_to(cx - rx, cy - KAPPA * ry, cx - KAPPA * rx, cy - ry, cx, cy - ry);
    path.push_curve_to(cx + KAPPA * rx, cy - ry, cx + rx, cy - KAPPA * ry, cx + rx, cy);
    path.push_close_path();

    Some(Shape::Path(path))
}

fn convert_poly(element: &Element, close: bool) -> Option<Shape> {
    let points = units::parse_list(element.attribute("points")?);
    if points.len() < 4 {
        return None;
    }

    let mut path = PathData::new();
    path.push_move_to(points[0], points[1]);
    for pair in points[2..].chunks_exact(2) {
        path.push_line_to(pair[0], pair[1]);
    }
    if close {
        path.push_close_path();
    }

    Some(Shape::Path(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use svgscene::FuzzyEq;

    fn element(tag: ElementTag, attrs: &[(&str, &str)]) -> Element {
        let mut element = Element::new(tag);
        for (name, value) in attrs {
            element
                .attributes
                .insert(name.to_string(), value.to_string());
        }
        element
    }

    #[test]
    fn plain_rect() {
        let el = element(ElementTag::Rect, &[("x", "10"), ("y", "10"), ("width", "80"), ("height", "30")]);
        match convert_shape(&el).unwrap() {
            Shape::Rect { x, y, w, h } => {
                assert_eq!((x, y, w, h), (10.0, 10.0, 80.0, 30.0));
            }
            _ => panic!("expected a plain rect"),
        }
    }

    #[test]
    fn rounded_rect_radius_fill_in() {
        // A missing ry takes the rx value; both are clamped to the
        // half-side.
        let el = element(
            ElementTag::Rect,
            &[("width", "20"), ("height", "10"), ("rx", "40")],
        );
        match convert_shape(&el).unwrap() {
            Shape::Path(ref path) => {
                let bbox = path.bbox().unwrap();
                assert!(bbox.width().fuzzy_eq(&20.0));
                assert!(bbox.height().fuzzy_eq(&10.0));
            }
            _ => panic!("expected a rounded rect path"),
        }
    }

    #[test]
    fn degenerate_rect() {
        let el = element(ElementTag::Rect, &[("width", "0"), ("height", "10")]);
        assert!(convert_shape(&el).is_none());
    }

    #[test]
    fn circle_bbox() {
        let el = element(ElementTag::Circle, &[("cx", "10"), ("cy", "10"), ("r", "5")]);
        let shape = convert_shape(&el).unwrap();
        let bbox = shape.bbox().unwrap();
        // The control-point box is conservative but contains the circle.
        assert!(bbox.x() <= 5.0 && bbox.right() >= 15.0);
    }

    #[test]
    fn polygon_closes() {
        let el = element(ElementTag::Polygon, &[("points", "0,0 10,0 10,10")]);
        match convert_shape(&el).unwrap() {
            Shape::Path(ref path) => {
                assert_eq!(
                    path.commands().last(),
                    Some(&svgscene::PathCommand::ClosePath)
                );
            }
            _ => panic!("expected a path"),
        }
    }
}
