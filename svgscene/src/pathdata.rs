// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::geom::{FuzzyZero, Rect};
use crate::transform::Transform;

/// A path command.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PathCommand {
    MoveTo,
    LineTo,
    CurveTo,
    ClosePath,
}

/// A path's absolute segment.
///
/// Unlike the SVG spec, can contain only `M`, `L`, `C` and `Z` segments.
/// All other segments will be converted into this one.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug)]
pub enum PathSegment {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    CurveTo { x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64 },
    ClosePath,
}

/// An SVG path data container.
///
/// All segments are in absolute coordinates.
#[derive(Clone, Default, Debug)]
pub struct PathData {
    commands: Vec<PathCommand>,
    points: Vec<f64>,
}

impl PathData {
    /// Creates a new path.
    #[inline]
    pub fn new() -> Self {
        PathData::default()
    }

    /// Parses path data from the `d` attribute string.
    ///
    /// Parsing never fails. A malformed tail is simply ignored,
    /// so an unparseable string produces an empty path.
    pub fn from_str(text: &str) -> Self {
        parse_path(text)
    }

    /// Returns `true` if the path contains no segment.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Returns the number of segments in the path.
    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns a slice of the path commands.
    #[inline]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Returns a slice of the path points.
    #[inline]
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Creates a path from a rect.
    #[inline]
    pub fn from_rect(rect: Rect) -> Self {
        let mut path = PathData::default();
        path.push_rect(rect);
        path
    }

    /// Pushes a MoveTo segment to the path.
    #[inline]
    pub fn push_move_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::MoveTo);
        self.points.push(x);
        self.points.push(y);
    }

    /// Pushes a LineTo segment to the path.
    #[inline]
    pub fn push_line_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::LineTo);
        self.points.push(x);
        self.points.push(y);
    }

    /// Pushes a CurveTo segment to the path.
    #[inline]
    pub fn push_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.commands.push(PathCommand::CurveTo);
        self.points.push(x1);
        self.points.push(y1);
        self.points.push(x2);
        self.points.push(y2);
        self.points.push(x);
        self.points.push(y);
    }

    /// Pushes a ClosePath segment to the path.
    #[inline]
    pub fn push_close_path(&mut self) {
        self.commands.push(PathCommand::ClosePath);
    }

    /// Pushes a rect to the path.
    #[inline]
    pub fn push_rect(&mut self, rect: Rect) {
        self.push_move_to(rect.x(), rect.y());
        self.push_line_to(rect.right(), rect.y());
        self.push_line_to(rect.right(), rect.bottom());
        self.push_line_to(rect.x(), rect.bottom());
        self.push_close_path();
    }

    /// Applies the transform to the path.
    pub fn transform(&mut self, ts: Transform) {
        if ts.is_default() {
            return;
        }

        for p in self.points.chunks_exact_mut(2) {
            let (x, y) = ts.apply(p[0], p[1]);
            p[0] = x;
            p[1] = y;
        }
    }

    /// Calculates the path bounding box.
    ///
    /// The box is conservative: curve control points are treated
    /// as path points, without extrema analysis.
    pub fn bbox(&self) -> Option<Rect> {
        if self.points.is_empty() {
            return None;
        }

        let mut minx = self.points[0];
        let mut miny = self.points[1];
        let mut maxx = minx;
        let mut maxy = miny;

        for p in self.points.chunks_exact(2) {
            if p[0] < minx {
                minx = p[0];
            }
            if p[0] > maxx {
                maxx = p[0];
            }
            if p[1] < miny {
                miny = p[1];
            }
            if p[1] > maxy {
                maxy = p[1];
            }
        }

        Rect::new(minx, miny, maxx - minx, maxy - miny)
    }

    /// Returns an iterator over path segments.
    #[inline]
    pub fn segments(&self) -> PathSegmentsIter {
        PathSegmentsIter {
            path: self,
            cmd_index: 0,
            points_index: 0,
        }
    }
}

/// A path segments iterator.
#[allow(missing_debug_implementations)]
#[derive(Clone)]
pub struct PathSegmentsIter<'a> {
    path: &'a PathData,
    cmd_index: usize,
    points_index: usize,
}

impl<'a> Iterator for PathSegmentsIter<'a> {
    type Item = PathSegment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cmd_index < self.path.commands.len() {
            let verb = self.path.commands[self.cmd_index];
            self.cmd_index += 1;

            match verb {
                PathCommand::MoveTo => {
                    self.points_index += 2;
                    Some(PathSegment::MoveTo {
                        x: self.path.points[self.points_index - 2],
                        y: self.path.points[self.points_index - 1],
                    })
                }
                PathCommand::LineTo => {
                    self.points_index += 2;
                    Some(PathSegment::LineTo {
                        x: self.path.points[self.points_index - 2],
                        y: self.path.points[self.points_index - 1],
                    })
                }
                PathCommand::CurveTo => {
                    self.points_index += 6;
                    Some(PathSegment::CurveTo {
                        x1: self.path.points[self.points_index - 6],
                        y1: self.path.points[self.points_index - 5],
                        x2: self.path.points[self.points_index - 4],
                        y2: self.path.points[self.points_index - 3],
                        x: self.path.points[self.points_index - 2],
                        y: self.path.points[self.points_index - 1],
                    })
                }
                PathCommand::ClosePath => Some(PathSegment::ClosePath),
            }
        } else {
            None
        }
    }
}

struct Lexer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Lexer { data: text.as_bytes(), pos: 0 }
    }

    fn skip_separators(&mut self) {
        while self.pos < self.data.len() {
            match self.data[self.pos] {
                b' ' | b'\t' | b'\r' | b'\n' | b',' => self.pos += 1,
                _ => break,
            }
        }
    }

    fn at_end(&mut self) -> bool {
        self.skip_separators();
        self.pos == self.data.len()
    }

    fn peek_command(&mut self) -> Option<u8> {
        self.skip_separators();
        let c = *self.data.get(self.pos)?;
        if c.is_ascii_alphabetic() {
            Some(c)
        } else {
            None
        }
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Parses a signed float with an optional decimal part and exponent.
    fn number(&mut self) -> Option<f64> {
        self.skip_separators();
        let start = self.pos;

        if matches!(self.data.get(self.pos), Some(b'+') | Some(b'-')) {
            self.pos += 1;
        }
        while matches!(self.data.get(self.pos), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        if matches!(self.data.get(self.pos), Some(b'.')) {
            self.pos += 1;
            while matches!(self.data.get(self.pos), Some(c) if c.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        if matches!(self.data.get(self.pos), Some(b'e') | Some(b'E')) {
            // Only consume the exponent when digits follow. `1e` is two tokens.
            let mut end = self.pos + 1;
            if matches!(self.data.get(end), Some(b'+') | Some(b'-')) {
                end += 1;
            }
            if matches!(self.data.get(end), Some(c) if c.is_ascii_digit()) {
                self.pos = end;
                while matches!(self.data.get(self.pos), Some(c) if c.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
        }

        if self.pos == start {
            return None;
        }

        std::str::from_utf8(&self.data[start..self.pos])
            .ok()?
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
    }

    fn pair(&mut self) -> Option<(f64, f64)> {
        let x = self.number()?;
        let y = self.number()?;
        Some((x, y))
    }
}

fn parse_path(text: &str) -> PathData {
    let mut path = PathData::new();
    let mut lex = Lexer::new(text);

    let mut cur = (0.0, 0.0);
    let mut start = (0.0, 0.0);
    let mut prev_cmd: Option<u8> = None;
    // Last control points, for S/T reflection.
    let mut cubic_ctrl: Option<(f64, f64)> = None;
    let mut quad_ctrl: Option<(f64, f64)> = None;

    loop {
        if lex.at_end() {
            break;
        }

        let cmd = match lex.peek_command() {
            Some(c) => {
                lex.advance();
                c
            }
            None => match prev_cmd {
                // A repeated MoveTo degrades into a LineTo.
                Some(b'M') => b'L',
                Some(b'm') => b'l',
                Some(c) => c,
                None => break,
            },
        };

        // The first command must establish a subpath.
        if prev_cmd.is_none() && !matches!(cmd, b'M' | b'm') {
            break;
        }

        let abs = cmd.is_ascii_uppercase();
        let (ox, oy) = if abs { (0.0, 0.0) } else { cur };

        let mut new_cubic_ctrl = None;
        let mut new_quad_ctrl = None;

        match cmd.to_ascii_uppercase() {
            b'M' => {
                let (x, y) = match lex.pair() {
                    Some(p) => p,
                    None => break,
                };
                cur = (ox + x, oy + y);
                start = cur;
                path.push_move_to(cur.0, cur.1);
            }
            b'L' => {
                let (x, y) = match lex.pair() {
                    Some(p) => p,
                    None => break,
                };
                cur = (ox + x, oy + y);
                path.push_line_to(cur.0, cur.1);
            }
            b'H' => {
                let x = match lex.number() {
                    Some(n) => n,
                    None => break,
                };
                cur.0 = ox + x;
                path.push_line_to(cur.0, cur.1);
            }
            b'V' => {
                let y = match lex.number() {
                    Some(n) => n,
                    None => break,
                };
                cur.1 = oy + y;
                path.push_line_to(cur.0, cur.1);
            }
            b'C' => {
                let (c1, c2, p) = match (lex.pair(), lex.pair(), lex.pair()) {
                    (Some(a), Some(b), Some(c)) => (a, b, c),
                    _ => break,
                };
                let c1 = (ox + c1.0, oy + c1.1);
                let c2 = (ox + c2.0, oy + c2.1);
                cur = (ox + p.0, oy + p.1);
                path.push_curve_to(c1.0, c1.1, c2.0, c2.1, cur.0, cur.1);
                new_cubic_ctrl = Some(c2);
            }
            b'S' => {
                let (c2, p) = match (lex.pair(), lex.pair()) {
                    (Some(a), Some(b)) => (a, b),
                    _ => break,
                };
                let c1 = match (prev_cmd, cubic_ctrl) {
                    (Some(b'C') | Some(b'c') | Some(b'S') | Some(b's'), Some(pc)) => {
                        (2.0 * cur.0 - pc.0, 2.0 * cur.1 - pc.1)
                    }
                    _ => cur,
                };
                let c2 = (ox + c2.0, oy + c2.1);
                cur = (ox + p.0, oy + p.1);
                path.push_curve_to(c1.0, c1.1, c2.0, c2.1, cur.0, cur.1);
                new_cubic_ctrl = Some(c2);
            }
            b'Q' => {
                let (c1, p) = match (lex.pair(), lex.pair()) {
                    (Some(a), Some(b)) => (a, b),
                    _ => break,
                };
                let c1 = (ox + c1.0, oy + c1.1);
                let end = (ox + p.0, oy + p.1);
                push_quad(&mut path, cur, c1, end);
                cur = end;
                new_quad_ctrl = Some(c1);
            }
            b'T' => {
                let p = match lex.pair() {
                    Some(p) => p,
                    None => break,
                };
                let c1 = match (prev_cmd, quad_ctrl) {
                    (Some(b'Q') | Some(b'q') | Some(b'T') | Some(b't'), Some(pc)) => {
                        (2.0 * cur.0 - pc.0, 2.0 * cur.1 - pc.1)
                    }
                    _ => cur,
                };
                let end = (ox + p.0, oy + p.1);
                push_quad(&mut path, cur, c1, end);
                cur = end;
                new_quad_ctrl = Some(c1);
            }
            b'A' => {
                let rx = lex.number();
                let ry = lex.number();
                let rot = lex.number();
                let large = lex.number();
                let sweep = lex.number();
                let p = lex.pair();
                let (rx, ry, rot, large, sweep, p) = match (rx, ry, rot, large, sweep, p) {
                    (Some(a), Some(b), Some(c), Some(d), Some(e), Some(f)) => (a, b, c, d, e, f),
                    _ => break,
                };
                let end = (ox + p.0, oy + p.1);
                push_arc(&mut path, cur, rx, ry, rot, large != 0.0, sweep != 0.0, end);
                cur = end;
            }
            b'Z' => {
                path.push_close_path();
                cur = start;
            }
            _ => break,
        }

        prev_cmd = Some(cmd);
        cubic_ctrl = new_cubic_ctrl;
        quad_ctrl = new_quad_ctrl;
    }

    path
}

/// Converts a quadratic curve into a cubic one.
///
/// `C1 = P0 + 2/3 (Q - P0)`, `C2 = P3 + 2/3 (Q - P3)`.
fn push_quad(path: &mut PathData, from: (f64, f64), ctrl: (f64, f64), to: (f64, f64)) {
    let x1 = from.0 + 2.0 / 3.0 * (ctrl.0 - from.0);
    let y1 = from.1 + 2.0 / 3.0 * (ctrl.1 - from.1);
    let x2 = to.0 + 2.0 / 3.0 * (ctrl.0 - to.0);
    let y2 = to.1 + 2.0 / 3.0 * (ctrl.1 - to.1);
    path.push_curve_to(x1, y1, x2, y2, to.0, to.1);
}

/// Converts an elliptical arc into up to four cubic curves,
/// one per quadrant-sized slice.
fn push_arc(
    path: &mut PathData,
    from: (f64, f64),
    rx: f64,
    ry: f64,
    x_axis_rotation: f64,
    large_arc: bool,
    sweep: bool,
    to: (f64, f64),
) {
    let (x1, y1) = from;
    let (x2, y2) = to;

    if (x1 - x2).is_fuzzy_zero() && (y1 - y2).is_fuzzy_zero() {
        return;
    }

    let mut rx = rx.abs();
    let mut ry = ry.abs();
    if rx.is_fuzzy_zero() || ry.is_fuzzy_zero() {
        path.push_line_to(x2, y2);
        return;
    }

    let phi = x_axis_rotation.to_radians();
    let cos_phi = phi.cos();
    let sin_phi = phi.sin();

    // Rotate into the ellipse axes and center on the chord midpoint.
    let dx2 = (x1 - x2) / 2.0;
    let dy2 = (y1 - y2) / 2.0;
    let x1p = cos_phi * dx2 + sin_phi * dy2;
    let y1p = -sin_phi * dx2 + cos_phi * dy2;

    // Scale up the radii when the chord doesn't fit.
    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    let sign = if large_arc != sweep { 1.0 } else { -1.0 };
    let num = rx * rx * ry * ry - rx * rx * y1p * y1p - ry * ry * x1p * x1p;
    let den = rx * rx * y1p * y1p + ry * ry * x1p * x1p;
    // Clamped at zero: rounding can push the radicand slightly negative.
    let coef = sign * (num / den).max(0.0).sqrt();

    let cxp = coef * rx * y1p / ry;
    let cyp = -coef * ry * x1p / rx;

    let cx = cos_phi * cxp - sin_phi * cyp + (x1 + x2) / 2.0;
    let cy = sin_phi * cxp + cos_phi * cyp + (y1 + y2) / 2.0;

    let theta1 = ((y1p - cyp) / ry).atan2((x1p - cxp) / rx);
    let theta2 = ((-y1p - cyp) / ry).atan2((-x1p - cxp) / rx);

    let mut delta = theta2 - theta1;
    if sweep && delta < 0.0 {
        delta += 2.0 * std::f64::consts::PI;
    } else if !sweep && delta > 0.0 {
        delta -= 2.0 * std::f64::consts::PI;
    }

    let segments = (delta.abs() / std::f64::consts::FRAC_PI_2).ceil().max(1.0);
    let step = delta / segments;

    // A point and its derivative on the rotated ellipse.
    let point = |t: f64| {
        (
            cx + rx * cos_phi * t.cos() - ry * sin_phi * t.sin(),
            cy + rx * sin_phi * t.cos() + ry * cos_phi * t.sin(),
        )
    };
    let derivative = |t: f64| {
        (
            -rx * cos_phi * t.sin() - ry * sin_phi * t.cos(),
            -rx * sin_phi * t.sin() + ry * cos_phi * t.cos(),
        )
    };

    let mut t1 = theta1;
    for _ in 0..segments as usize {
        let t2 = t1 + step;
        let dt = t2 - t1;
        let half_tan = (dt / 2.0).tan();
        let alpha = dt.sin() * ((4.0 + 3.0 * half_tan * half_tan).sqrt() - 1.0) / 3.0;

        let (px1, py1) = point(t1);
        let (px2, py2) = point(t2);
        let (dx1, dy1) = derivative(t1);
        let (dx2r, dy2r) = derivative(t2);

        path.push_curve_to(
            px1 + alpha * dx1,
            py1 + alpha * dy1,
            px2 - alpha * dx2r,
            py2 - alpha * dy2r,
            px2,
            py2,
        );

        t1 = t2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(text: &str) -> Vec<PathSegment> {
        PathData::from_str(text).segments().collect()
    }

    #[test]
    fn simple_path() {
        let path = PathData::from_str("M 10 10 L 20 10 L 20 20 Z");
        let cmds = path.commands();
        assert_eq!(
            cmds,
            &[
                PathCommand::MoveTo,
                PathCommand::LineTo,
                PathCommand::LineTo,
                PathCommand::ClosePath
            ]
        );

        let bbox = path.bbox().unwrap();
        assert_eq!(bbox.x(), 10.0);
        assert_eq!(bbox.y(), 10.0);
        assert_eq!(bbox.width(), 10.0);
        assert_eq!(bbox.height(), 10.0);
    }

    #[test]
    fn polyline_bbox_matches_vertices() {
        let path = PathData::from_str("M 0 0 L 10 -5 L 3 7 Z");
        let bbox = path.bbox().unwrap();
        assert_eq!(bbox.x(), 0.0);
        assert_eq!(bbox.y(), -5.0);
        assert_eq!(bbox.width(), 10.0);
        assert_eq!(bbox.height(), 12.0);
    }

    #[test]
    fn relative_commands() {
        let path = PathData::from_str("m 10 10 l 5 0 v 5 h -5 z");
        let points: Vec<_> = path
            .segments()
            .filter_map(|s| match s {
                PathSegment::MoveTo { x, y } | PathSegment::LineTo { x, y } => Some((x, y)),
                _ => None,
            })
            .collect();
        assert_eq!(points, vec![(10.0, 10.0), (15.0, 10.0), (15.0, 15.0), (10.0, 15.0)]);
    }

    #[test]
    fn implicit_line_to() {
        // Extra coordinate pairs after MoveTo are LineTo.
        let path = PathData::from_str("M 0 0 10 0 10 10");
        assert_eq!(
            path.commands(),
            &[PathCommand::MoveTo, PathCommand::LineTo, PathCommand::LineTo]
        );
    }

    #[test]
    fn quad_to_cubic() {
        let path = PathData::from_str("M 0 0 Q 10 0 10 10");
        match path.segments().nth(1).unwrap() {
            PathSegment::CurveTo { x1, y1, x2, y2, x, y } => {
                assert!((x1 - 20.0 / 3.0).abs() < 1e-9);
                assert!((y1 - 0.0).abs() < 1e-9);
                assert!((x2 - 10.0).abs() < 1e-9);
                assert!((y2 - 10.0 / 3.0).abs() < 1e-9);
                assert_eq!((x, y), (10.0, 10.0));
            }
            _ => panic!("expected a curve"),
        }
    }

    #[test]
    fn smooth_cubic_reflection() {
        let path = PathData::from_str("M 0 0 C 0 10 10 10 10 0 S 20 -10 20 0");
        match path.segments().nth(2).unwrap() {
            PathSegment::CurveTo { x1, y1, .. } => {
                // Reflection of (10 10) through (10 0).
                assert!((x1 - 10.0).abs() < 1e-9);
                assert!((y1 + 10.0).abs() < 1e-9);
            }
            _ => panic!("expected a curve"),
        }
    }

    #[test]
    fn smooth_without_previous_curve() {
        // No preceding curve, the first control point must match
        // the current point.
        let path = PathData::from_str("M 5 5 S 20 -10 20 0");
        match path.segments().nth(1).unwrap() {
            PathSegment::CurveTo { x1, y1, .. } => {
                assert_eq!((x1, y1), (5.0, 5.0));
            }
            _ => panic!("expected a curve"),
        }
    }

    #[test]
    fn arc_single_quadrant() {
        let path = PathData::from_str("M 0 0 A 50 50 0 0 1 100 0");
        // A half circle splits into two quadrant curves.
        assert_eq!(path.commands().len(), 3);

        match path.segments().nth(1).unwrap() {
            PathSegment::CurveTo { y1, x, y, .. } => {
                // The tangent at the start of a sweeping top arc points up.
                assert!(y1 < 0.0);
                // The quadrant boundary is the circle top.
                assert!((x - 50.0).abs() < 1e-6);
                assert!((y + 50.0).abs() < 1e-6);
            }
            _ => panic!("expected a curve"),
        }
    }

    #[test]
    fn arc_tangent_continuity() {
        let path = PathData::from_str("M 0 0 A 50 50 0 0 1 100 0");
        let segments: Vec<_> = path.segments().collect();

        // The outgoing tangent of the first curve and the incoming tangent
        // of the second one must agree at their shared point.
        if let (
            PathSegment::CurveTo { x2, y2, x, y, .. },
            PathSegment::CurveTo { x1: nx1, y1: ny1, .. },
        ) = (segments[1], segments[2])
        {
            let out = ((x - x2), (y - y2));
            let inc = ((nx1 - x), (ny1 - y));
            let cross = out.0 * inc.1 - out.1 * inc.0;
            let dot = out.0 * inc.0 + out.1 * inc.1;
            assert!(cross.abs() < 1e-6);
            assert!(dot > 0.0);
        } else {
            panic!("expected two curves");
        }
    }

    #[test]
    fn arc_degenerate_cases() {
        // Identical endpoints produce nothing.
        let path = PathData::from_str("M 10 10 A 5 5 0 0 1 10 10");
        assert_eq!(path.commands(), &[PathCommand::MoveTo]);

        // A zero radius produces a line.
        let path = PathData::from_str("M 0 0 A 0 5 0 0 1 10 10");
        assert_eq!(path.commands(), &[PathCommand::MoveTo, PathCommand::LineTo]);
    }

    #[test]
    fn arc_radius_correction() {
        // The radii are too small for the chord and must be scaled up
        // until the arc endpoints are reachable.
        let path = PathData::from_str("M 0 0 A 1 1 0 0 1 100 0");
        let last = path.segments().last().unwrap();
        match last {
            PathSegment::CurveTo { x, y, .. } => {
                assert!((x - 100.0).abs() < 1e-6);
                assert!(y.abs() < 1e-6);
            }
            _ => panic!("expected a curve"),
        }
    }

    #[test]
    fn smooth_quad_reflection() {
        let path = PathData::from_str("M 0 0 Q 5 10 10 0 T 20 0");
        // The reflected control of the T segment is (15, -10); the
        // first cubic control is 1/3 of the way there.
        match path.segments().nth(2).unwrap() {
            PathSegment::CurveTo { x1, y1, .. } => {
                assert!((x1 - (10.0 + 2.0 / 3.0 * 5.0)).abs() < 1e-9);
                assert!((y1 - (2.0 / 3.0 * -10.0)).abs() < 1e-9);
            }
            _ => panic!("expected a curve"),
        }
    }

    #[test]
    fn bbox_is_conservative_over_control_points() {
        // The control points stick out above the curve; the box
        // includes them without extrema analysis.
        let path = PathData::from_str("M 0 0 C 0 -30 10 -30 10 0");
        let bbox = path.bbox().unwrap();
        assert_eq!(bbox.y(), -30.0);
        assert_eq!(bbox.height(), 30.0);
    }

    #[test]
    fn malformed_tail_is_ignored(){
        let path = PathData::from_str("M 10 10 L 20 20 L nope");
        assert_eq!(path.commands(), &[PathCommand::MoveTo, PathCommand::LineTo]);
    }

    #[test]
    fn must_start_with_move_to() {
        assert!(PathData::from_str("L 10 10").is_empty());
    }

    #[test]
    fn close_resets_current_point() {
        let path = PathData::from_str("M 10 10 L 20 10 Z l 5 0");
        match segs("M 10 10 L 20 10 Z l 5 0")[3] {
            PathSegment::LineTo { x, y } => assert_eq!((x, y), (15.0, 10.0)),
            _ => panic!("expected a line"),
        }
        assert_eq!(path.len(), 4);
    }
}
