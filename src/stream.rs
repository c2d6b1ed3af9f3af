// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The PDF content-stream emitter.
//!
//! Operators are written as ASCII lines. Pattern tiles are rendered
//! through a buffer stack: pushing makes a fresh buffer the active
//! sink, popping returns the captured stream.

use std::fmt::Write;

use svgscene::Transform;

/// A content-stream builder.
#[derive(Debug)]
pub struct ContentStream {
    // The last buffer is the active sink.
    buffers: Vec<String>,
}

impl ContentStream {
    /// Creates a stream with a single active buffer.
    pub fn new() -> Self {
        ContentStream {
            buffers: vec![String::new()],
        }
    }

    /// Returns the finished top-level stream.
    ///
    /// Panics when a nested buffer was pushed but never popped;
    /// capture must be balanced on all paths.
    pub fn finish(mut self) -> Vec<u8> {
        assert_eq!(self.buffers.len(), 1, "unbalanced buffer stack");
        self.buffers.pop().unwrap().into_bytes()
    }

    /// Makes a fresh buffer the active sink.
    pub fn push_buffer(&mut self) {
        self.buffers.push(String::new());
    }

    /// Finishes the active buffer, restoring the previous sink.
    pub fn pop_buffer(&mut self) -> Vec<u8> {
        assert!(self.buffers.len() > 1, "no nested buffer to pop");
        self.buffers.pop().unwrap().into_bytes()
    }

    fn buf(&mut self) -> &mut String {
        self.buffers.last_mut().unwrap()
    }

    /// Writes numbers followed by an operator, space separated.
    pub fn op(&mut self, args: &[f64], operator: &str) {
        let buf = self.buf();
        for n in args {
            write_num(buf, *n);
            buf.push(' ');
        }
        buf.push_str(operator);
        buf.push('\n');
    }

    /// Writes a raw operator line.
    pub fn raw(&mut self, line: &str) {
        let buf = self.buf();
        buf.push_str(line);
        buf.push('\n');
    }

    /// `q`, graphics state save.
    pub fn save(&mut self) {
        self.raw("q");
    }

    /// `Q`, graphics state restore.
    pub fn restore(&mut self) {
        self.raw("Q");
    }

    /// `cm`, concatenates a matrix onto the CTM.
    pub fn concat(&mut self, ts: &Transform) {
        self.op(&[ts.a, ts.b, ts.c, ts.d, ts.e, ts.f], "cm");
    }

    /// `m`, begins a new subpath.
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.op(&[x, y], "m");
    }

    /// `l`, a line segment.
    pub fn line_to(&mut self, x: f64, y: f64) {
        self.op(&[x, y], "l");
    }

    /// `c`, a cubic segment.
    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.op(&[x1, y1, x2, y2, x, y], "c");
    }

    /// `h`, closes the current subpath.
    pub fn close_path(&mut self) {
        self.raw("h");
    }

    /// `re`, a rectangle subpath.
    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.op(&[x, y, w, h], "re");
    }

    /// `rg`, the non-stroking color.
    pub fn set_fill_color(&mut self, r: f64, g: f64, b: f64) {
        self.op(&[r, g, b], "rg");
    }

    /// `RG`, the stroking color.
    pub fn set_stroke_color(&mut self, r: f64, g: f64, b: f64) {
        self.op(&[r, g, b], "RG");
    }

    /// `w`, the line width.
    pub fn set_line_width(&mut self, w: f64) {
        self.op(&[w], "w");
    }

    /// `J`, the line cap.
    pub fn set_line_cap(&mut self, cap: i32) {
        self.op(&[cap as f64], "J");
    }

    /// `j`, the line join.
    pub fn set_line_join(&mut self, join: i32) {
        self.op(&[join as f64], "j");
    }

    /// `M`, the miter limit.
    pub fn set_miter_limit(&mut self, limit: f64) {
        self.op(&[limit], "M");
    }

    /// `d`, the dash pattern.
    pub fn set_dash(&mut self, array: &[f64], phase: f64) {
        let buf = self.buf();
        buf.push('[');
        for (i, n) in array.iter().enumerate() {
            if i > 0 {
                buf.push(' ');
            }
            write_num(buf, *n);
        }
        buf.push_str("] ");
        write_num(buf, phase);
        buf.push_str(" d\n");
    }

    /// The painting operator for a filled/stroked path.
    pub fn paint(&mut self, fill: bool, stroke: bool, even_odd: bool) {
        let operator = match (fill, stroke, even_odd) {
            (true, true, false) => "B",
            (true, true, true) => "B*",
            (true, false, false) => "f",
            (true, false, true) => "f*",
            (false, true, _) => "S",
            (false, false, _) => "n",
        };
        self.raw(operator);
    }

    /// `W n`, intersects the clip region with the current path.
    pub fn clip(&mut self, even_odd: bool) {
        self.raw(if even_odd { "W* n" } else { "W n" });
    }

    /// `sh`, paints a shading.
    pub fn shading(&mut self, name: &str) {
        let buf = self.buf();
        buf.push('/');
        buf.push_str(name);
        buf.push_str(" sh\n");
    }

    /// `gs`, applies an extended graphics state.
    pub fn graphics_state(&mut self, name: &str) {
        let buf = self.buf();
        buf.push('/');
        buf.push_str(name);
        buf.push_str(" gs\n");
    }

    /// `Do`, paints an external object.
    pub fn xobject(&mut self, name: &str) {
        let buf = self.buf();
        buf.push('/');
        buf.push_str(name);
        buf.push_str(" Do\n");
    }

    /// `cs`/`scn`, selects a tiling pattern as the fill paint.
    pub fn set_fill_pattern(&mut self, name: &str) {
        self.raw("/Pattern cs");
        let buf = self.buf();
        buf.push('/');
        buf.push_str(name);
        buf.push_str(" scn\n");
    }

    /// `CS`/`SCN`, selects a tiling pattern as the stroke paint.
    pub fn set_stroke_pattern(&mut self, name: &str) {
        self.raw("/Pattern CS");
        let buf = self.buf();
        buf.push('/');
        buf.push_str(name);
        buf.push_str(" SCN\n");
    }

    /// `BT`, begins a text object.
    pub fn begin_text(&mut self) {
        self.raw("BT");
    }

    /// `ET`, ends a text object.
    pub fn end_text(&mut self) {
        self.raw("ET");
    }

    /// `Tf`, selects a font.
    pub fn set_font(&mut self, name: &str, size: f64) {
        let buf = self.buf();
        buf.push('/');
        buf.push_str(name);
        buf.push(' ');
        write_num(buf, size);
        buf.push_str(" Tf\n");
    }

    /// `Tz`, the horizontal scale in percent.
    pub fn set_horizontal_scale(&mut self, percent: f64) {
        self.op(&[percent], "Tz");
    }

    /// `Td`, moves the text position.
    pub fn text_move(&mut self, x: f64, y: f64) {
        self.op(&[x, y], "Td");
    }

    /// `Tj`, shows a string with PDF escaping.
    pub fn show_text(&mut self, text: &str) {
        let buf = self.buf();
        buf.push('(');
        for c in text.chars() {
            match c {
                '(' => buf.push_str("\\("),
                ')' => buf.push_str("\\)"),
                '\\' => buf.push_str("\\\\"),
                _ => buf.push(c),
            }
        }
        buf.push_str(") Tj\n");
    }
}

impl Default for ContentStream {
    fn default() -> Self {
        ContentStream::new()
    }
}

/// Writes a number in a locale-independent form.
///
/// Integral values lose the fractional part; everything else is
/// printed with six decimals and trailing zeros trimmed.
pub(crate) fn write_num(buf: &mut String, n: f64) {
    // Protect the output from NaN/inf producing garbage operands.
    let n = if n.is_finite() { n } else { 0.0 };

    if (n - n.round()).abs() < 1e-9 && n.abs() < 1e13 {
        let i = n.round() as i64;
        // Avoid `-0`.
        let i = if i == 0 { 0 } else { i };
        write!(buf, "{}", i).unwrap();
        return;
    }

    let s = format!("{:.6}", n);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    buf.push_str(s);
}

/// Formats a number the way the emitter does.
pub(crate) fn fmt_num(n: f64) -> String {
    let mut s = String::new();
    write_num(&mut s, n);
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_formatting() {
        assert_eq!(fmt_num(2.0), "2");
        assert_eq!(fmt_num(-1.0), "-1");
        assert_eq!(fmt_num(0.0), "0");
        assert_eq!(fmt_num(-0.0), "0");
        assert_eq!(fmt_num(0.5), "0.5");
        assert_eq!(fmt_num(0.5522847498), "0.552285");
        assert_eq!(fmt_num(f64::NAN), "0");
    }

    #[test]
    fn operator_lines() {
        let mut cs = ContentStream::new();
        cs.save();
        cs.concat(&Transform::new(1.0, 0.0, 0.0, -1.0, 0.0, 100.0));
        cs.rect(10.0, 10.0, 80.0, 30.0);
        cs.paint(true, false, false);
        cs.restore();

        let out = String::from_utf8(cs.finish()).unwrap();
        assert_eq!(out, "q\n1 0 0 -1 0 100 cm\n10 10 80 30 re\nf\nQ\n");
    }

    #[test]
    fn text_escaping() {
        let mut cs = ContentStream::new();
        cs.show_text("a(b)c\\d");
        let out = String::from_utf8(cs.finish()).unwrap();
        assert_eq!(out, "(a\\(b\\)c\\\\d) Tj\n");
    }

    #[test]
    fn buffer_stack() {
        let mut cs = ContentStream::new();
        cs.raw("outer");
        cs.push_buffer();
        cs.raw("inner");
        let inner = cs.pop_buffer();
        cs.raw("outer2");

        assert_eq!(inner, b"inner\n");
        assert_eq!(cs.finish(), b"outer\nouter2\n");
    }

    #[test]
    #[should_panic]
    fn unbalanced_stack_panics() {
        let mut cs = ContentStream::new();
        cs.push_buffer();
        cs.finish();
    }
}
