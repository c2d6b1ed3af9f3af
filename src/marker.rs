// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgscene::{
    Document, Marker, MarkerOrient, MarkerUnits, PathData, PathSegment, Style, Transform,
};

use crate::paint_server::Resources;
use crate::stream::ContentStream;

/// A path vertex with tangent angles in degrees.
///
/// The incoming angle comes from the previous point; the outgoing
/// angle is filled in when the next vertex arrives.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Vertex {
    pub x: f64,
    pub y: f64,
    pub angle_in: Option<f64>,
    pub angle_out: Option<f64>,
}

#[derive(Clone, Copy)]
enum MarkerKind {
    Start,
    Middle,
    End,
}

/// Extracts path vertices with their tangents.
///
/// Curve tangents use the adjacent control points; close segments
/// do not produce vertices.
pub(crate) fn collect_vertices(path: &PathData) -> Vec<Vertex> {
    fn push(vertices: &mut Vec<Vertex>, x: f64, y: f64, angle_in: Option<f64>) {
        vertices.push(Vertex { x, y, angle_in, angle_out: None });
    }

    let mut vertices: Vec<Vertex> = Vec::new();
    let mut prev = (0.0, 0.0);

    for segment in path.segments() {
        match segment {
            PathSegment::MoveTo { x, y } => {
                push(&mut vertices, x, y, None);
                prev = (x, y);
            }
            PathSegment::LineTo { x, y } => {
                let angle = angle_deg(prev, (x, y));
                if let Some(last) = vertices.last_mut() {
                    last.angle_out = angle;
                }
                push(&mut vertices, x, y, angle);
                prev = (x, y);
            }
            PathSegment::CurveTo { x1, y1, x2, y2, x, y } => {
                // Outgoing along the first control point, incoming
                // along the last one.
                let out = angle_deg(prev, (x1, y1)).or_else(|| angle_deg(prev, (x, y)));
                let inc = angle_deg((x2, y2), (x, y)).or_else(|| angle_deg(prev, (x, y)));
                if let Some(last) = vertices.last_mut() {
                    last.angle_out = out;
                }
                push(&mut vertices, x, y, inc);
                prev = (x, y);
            }
            PathSegment::ClosePath => {}
        }
    }

    vertices
}

fn angle_deg(from: (f64, f64), to: (f64, f64)) -> Option<f64> {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    if dx == 0.0 && dy == 0.0 {
        None
    } else {
        Some(dy.atan2(dx).to_degrees())
    }
}

/// The mean direction of two angles, degrees.
fn bisect(a: f64, b: f64) -> f64 {
    let a = a.to_radians();
    let b = b.to_radians();
    (a.sin() + b.sin()).atan2(a.cos() + b.cos()).to_degrees()
}

/// Places start/mid/end markers along a path.
pub(crate) fn draw_markers(
    path: &PathData,
    style: &Style,
    doc: &Document,
    cs: &mut ContentStream,
    res: &mut Resources,
    depth: usize,
) {
    let vertices = collect_vertices(path);
    if vertices.is_empty() {
        return;
    }

    let list = [
        (&style.marker_start, MarkerKind::Start),
        (&style.marker_mid, MarkerKind::Middle),
        (&style.marker_end, MarkerKind::End),
    ];

    for (reference, kind) in list {
        let id = match reference {
            Some(id) => id,
            None => continue,
        };

        let marker = match doc.markers.get(id) {
            Some(marker) => marker,
            None => {
                log::warn!("Marker '{}' was not found.", id);
                continue;
            }
        };

        match kind {
            MarkerKind::Start => {
                place(marker, &vertices[0], kind, style, doc, cs, res, depth);
            }
            MarkerKind::Middle => {
                for vertex in vertices.iter().take(vertices.len().saturating_sub(1)).skip(1) {
                    place(marker, vertex, kind, style, doc, cs, res, depth);
                }
            }
            MarkerKind::End => {
                if vertices.len() > 1 {
                    place(marker, &vertices[vertices.len() - 1], kind, style, doc, cs, res, depth);
                }
            }
        }
    }
}

fn resolve_angle(marker: &Marker, vertex: &Vertex, kind: MarkerKind) -> f64 {
    let tangent = match kind {
        MarkerKind::Start => vertex.angle_out.or(vertex.angle_in),
        MarkerKind::End => vertex.angle_in.or(vertex.angle_out),
        MarkerKind::Middle => match (vertex.angle_in, vertex.angle_out) {
            (Some(a), Some(b)) => Some(bisect(a, b)),
            (a, b) => a.or(b),
        },
    }
    .unwrap_or(0.0);

    match marker.orient {
        MarkerOrient::Auto => tangent,
        MarkerOrient::AutoStartReverse => match kind {
            MarkerKind::Start => tangent + 180.0,
            _ => tangent,
        },
        MarkerOrient::Angle(angle) => angle,
    }
}

fn place(
    marker: &Marker,
    vertex: &Vertex,
    kind: MarkerKind,
    style: &Style,
    doc: &Document,
    cs: &mut ContentStream,
    res: &mut Resources,
    depth: usize,
) {
    cs.save();

    let mut ts = Transform::new_translate(vertex.x, vertex.y);

    let angle = resolve_angle(marker, vertex, kind);
    if angle != 0.0 {
        ts.rotate(angle);
    }

    if marker.units == MarkerUnits::StrokeWidth {
        ts.scale(style.stroke_width, style.stroke_width);
    }

    if let Some(vb) = marker.view_box {
        if vb.size().is_some() {
            ts.scale(marker.width / vb.width(), marker.height / vb.height());
            ts.translate(-vb.x(), -vb.y());
        }
    }

    ts.translate(-marker.ref_x, -marker.ref_y);
    cs.concat(&ts);

    for child in marker.node.children() {
        crate::render::render_node(&child, None, doc, cs, res, depth + 1);
    }

    cs.restore();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_tangents() {
        let path = PathData::from_str("M 0 0 L 10 0 L 10 10");
        let vertices = collect_vertices(&path);
        assert_eq!(vertices.len(), 3);

        let close = |a: Option<f64>, b: f64| (a.unwrap() - b).abs() < 1e-9;

        assert_eq!(vertices[0].angle_in, None);
        assert!(close(vertices[0].angle_out, 0.0));
        // The corner sees both directions.
        assert!(close(vertices[1].angle_in, 0.0));
        assert!(close(vertices[1].angle_out, 90.0));
        assert!(close(vertices[2].angle_in, 90.0));
        assert_eq!(vertices[2].angle_out, None);
    }

    #[test]
    fn bisector() {
        assert!((bisect(0.0, 90.0) - 45.0).abs() < 1e-9);
        // Wrapping around the discontinuity.
        let b = bisect(170.0, -170.0);
        assert!((b - 180.0).abs() < 1e-9 || (b + 180.0).abs() < 1e-9);
    }
}
