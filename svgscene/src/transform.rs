// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::geom::FuzzyEq;
use crate::units;

/// Representation of the `<transform>` type.
///
/// Stores a 2x3 affine matrix `[[a c e] [b d f]]`.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Transform {
    /// Constructs a new transform.
    #[inline]
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Transform { a, b, c, d, e, f }
    }

    /// Constructs a new translate transform.
    #[inline]
    pub fn new_translate(x: f64, y: f64) -> Self {
        Transform::new(1.0, 0.0, 0.0, 1.0, x, y)
    }

    /// Constructs a new scale transform.
    #[inline]
    pub fn new_scale(sx: f64, sy: f64) -> Self {
        Transform::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Constructs a new rotate transform.
    #[inline]
    pub fn new_rotate(angle: f64) -> Self {
        let v = angle.to_radians();
        let a = v.cos();
        let b = v.sin();
        let c = -b;
        let d = a;
        Transform::new(a, b, c, d, 0.0, 0.0)
    }

    /// Constructs a new rotate transform at the specified position.
    #[inline]
    pub fn new_rotate_at(angle: f64, x: f64, y: f64) -> Self {
        let mut ts = Self::default();
        ts.translate(x, y);
        ts.rotate(angle);
        ts.translate(-x, -y);
        ts
    }

    /// Constructs a new skew transform along then X axis.
    #[inline]
    pub fn new_skew_x(angle: f64) -> Self {
        let c = angle.to_radians().tan();
        Transform::new(1.0, 0.0, c, 1.0, 0.0, 0.0)
    }

    /// Constructs a new skew transform along then Y axis.
    #[inline]
    pub fn new_skew_y(angle: f64) -> Self {
        let b = angle.to_radians().tan();
        Transform::new(1.0, b, 0.0, 1.0, 0.0, 0.0)
    }

    /// Translates the current transform.
    #[inline]
    pub fn translate(&mut self, x: f64, y: f64) {
        self.append(&Transform::new_translate(x, y));
    }

    /// Scales the current transform.
    #[inline]
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.append(&Transform::new_scale(sx, sy));
    }

    /// Rotates the current transform.
    #[inline]
    pub fn rotate(&mut self, angle: f64) {
        self.append(&Transform::new_rotate(angle));
    }

    /// Appends transform to the current transform.
    #[inline]
    pub fn append(&mut self, other: &Transform) {
        let ts = multiply(self, other);
        self.a = ts.a;
        self.b = ts.b;
        self.c = ts.c;
        self.d = ts.d;
        self.e = ts.e;
        self.f = ts.f;
    }

    /// Prepends transform to the current transform.
    #[inline]
    pub fn prepend(&mut self, other: &Transform) {
        let ts = multiply(other, self);
        self.a = ts.a;
        self.b = ts.b;
        self.c = ts.c;
        self.d = ts.d;
        self.e = ts.e;
        self.f = ts.f;
    }

    /// Returns `true` if the transform is default, aka `(1 0 0 1 0 0)`.
    pub fn is_default(&self) -> bool {
        self.a.fuzzy_eq(&1.0)
            && self.b.fuzzy_eq(&0.0)
            && self.c.fuzzy_eq(&0.0)
            && self.d.fuzzy_eq(&1.0)
            && self.e.fuzzy_eq(&0.0)
            && self.f.fuzzy_eq(&0.0)
    }

    /// Returns transform's scale part.
    #[inline]
    pub fn get_scale(&self) -> (f64, f64) {
        let x_scale = (self.a * self.a + self.c * self.c).sqrt();
        let y_scale = (self.b * self.b + self.d * self.d).sqrt();
        (x_scale, y_scale)
    }

    /// Applies transform to selected coordinates.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let new_x = self.a * x + self.c * y + self.e;
        let new_y = self.b * x + self.d * y + self.f;
        (new_x, new_y)
    }
}

#[inline(never)]
fn multiply(ts1: &Transform, ts2: &Transform) -> Transform {
    Transform {
        a: ts1.a * ts2.a + ts1.c * ts2.b,
        b: ts1.b * ts2.a + ts1.d * ts2.b,
        c: ts1.a * ts2.c + ts1.c * ts2.d,
        d: ts1.b * ts2.c + ts1.d * ts2.d,
        e: ts1.a * ts2.e + ts1.c * ts2.f + ts1.e,
        f: ts1.b * ts2.e + ts1.d * ts2.f + ts1.f,
    }
}

impl Default for Transform {
    #[inline]
    fn default() -> Transform {
        Transform::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }
}

impl FuzzyEq for Transform {
    fn fuzzy_eq(&self, other: &Self) -> bool {
        self.a.fuzzy_eq(&other.a)
            && self.b.fuzzy_eq(&other.b)
            && self.c.fuzzy_eq(&other.c)
            && self.d.fuzzy_eq(&other.d)
            && self.e.fuzzy_eq(&other.e)
            && self.f.fuzzy_eq(&other.f)
    }
}

impl std::str::FromStr for Transform {
    type Err = &'static str;

    /// Parses a transform list.
    ///
    /// Each parsed transform is multiplied on the right of the accumulated
    /// matrix, so a textual left-to-right list composes left-to-right.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut ts = Transform::default();
        let mut s = text;

        loop {
            s = s.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == ',');
            if s.is_empty() {
                break;
            }

            let paren = s.find('(').ok_or("expected '('")?;
            let name = s[..paren].trim();
            let end = s[paren..].find(')').ok_or("expected ')'")? + paren;
            let args = units::parse_list(&s[paren + 1..end]);
            s = &s[end + 1..];

            let t = match (name, args.as_slice()) {
                ("translate", [tx]) => Transform::new_translate(*tx, 0.0),
                ("translate", [tx, ty]) => Transform::new_translate(*tx, *ty),
                ("scale", [sx]) => Transform::new_scale(*sx, *sx),
                ("scale", [sx, sy]) => Transform::new_scale(*sx, *sy),
                ("rotate", [angle]) => Transform::new_rotate(*angle),
                ("rotate", [angle, cx, cy]) => Transform::new_rotate_at(*angle, *cx, *cy),
                ("skewX", [angle]) => Transform::new_skew_x(*angle),
                ("skewY", [angle]) => Transform::new_skew_y(*angle),
                ("matrix", [a, b, c, d, e, f]) => Transform::new(*a, *b, *c, *d, *e, *f),
                _ => return Err("invalid transform"),
            };

            ts.append(&t);
        }

        Ok(ts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Transform {
        text.parse().unwrap()
    }

    #[test]
    fn parse_translate() {
        assert!(parse("translate(10 20)").fuzzy_eq(&Transform::new_translate(10.0, 20.0)));
        assert!(parse("translate(10)").fuzzy_eq(&Transform::new_translate(10.0, 0.0)));
    }

    #[test]
    fn parse_matrix() {
        let ts = parse("matrix(1, 2, 3, 4, 5, 6)");
        assert!(ts.fuzzy_eq(&Transform::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0)));
    }

    #[test]
    fn parse_list_composes_left_to_right() {
        let ts = parse("translate(10 0) scale(2)");
        let mut manual = Transform::default();
        manual.append(&Transform::new_translate(10.0, 0.0));
        manual.append(&Transform::new_scale(2.0, 2.0));
        assert!(ts.fuzzy_eq(&manual));

        // A point transform must match the manual composition as well.
        let (x1, y1) = ts.apply(3.0, 4.0);
        let (x2, y2) = manual.apply(3.0, 4.0);
        assert!((x1 - x2).abs() < 1e-9);
        assert!((y1 - y2).abs() < 1e-9);
        assert!((x1 - 16.0).abs() < 1e-9);
        assert!((y1 - 8.0).abs() < 1e-9);
    }

    #[test]
    fn parse_rotate_at() {
        let ts = parse("rotate(90 10 10)");
        let (x, y) = ts.apply(20.0, 10.0);
        assert!((x - 10.0).abs() < 1e-9);
        assert!((y - 20.0).abs() < 1e-9);
    }

    #[test]
    fn parse_skew() {
        let ts = parse("skewX(45)");
        let (x, y) = ts.apply(0.0, 10.0);
        assert!((x - 10.0).abs() < 1e-9);
        assert!((y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_transform() {
        assert!("rotate(10".parse::<Transform>().is_err());
        assert!("spin(10)".parse::<Transform>().is_err());
    }
}
