// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use float_cmp::ApproxEqUlps;

/// A trait for fuzzy/approximate equality comparisons of float numbers.
pub trait FuzzyEq<Rhs: ?Sized = Self> {
    /// Returns `true` if values are approximately equal.
    fn fuzzy_eq(&self, other: &Rhs) -> bool;

    /// Returns `true` if values are not approximately equal.
    #[inline]
    fn fuzzy_ne(&self, other: &Rhs) -> bool {
        !self.fuzzy_eq(other)
    }
}

/// A trait for fuzzy/approximate comparisons of float numbers.
pub trait FuzzyZero: FuzzyEq {
    /// Returns `true` if the number is approximately zero.
    fn is_fuzzy_zero(&self) -> bool;
}

impl FuzzyEq for f64 {
    #[inline]
    fn fuzzy_eq(&self, other: &f64) -> bool {
        self.approx_eq_ulps(other, 4)
    }
}

impl FuzzyZero for f64 {
    #[inline]
    fn is_fuzzy_zero(&self) -> bool {
        self.fuzzy_eq(&0.0)
    }
}

/// Checks that the current number is > 0.
pub trait IsValidLength {
    /// Checks that the current number is > 0.
    fn is_valid_length(&self) -> bool;
}

impl IsValidLength for f64 {
    #[inline]
    fn is_valid_length(&self) -> bool {
        *self > 0.0 && self.is_finite()
    }
}

/// A 2D size representation.
///
/// Width and height are guarantee to be > 0.
#[derive(Clone, Copy)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    /// Creates a new `Size` from values.
    #[inline]
    pub fn new(width: f64, height: f64) -> Option<Self> {
        if width.is_valid_length() && height.is_valid_length() {
            Some(Size { width, height })
        } else {
            None
        }
    }

    /// Returns width.
    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns height.
    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Converts the current size to `Rect` at provided position.
    #[inline]
    pub fn to_rect(&self, x: f64, y: f64) -> Rect {
        // Can't fail, because `Size` is always valid.
        Rect::new(x, y, self.width, self.height).unwrap()
    }
}

impl std::fmt::Debug for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Size({} {})", self.width, self.height)
    }
}

impl FuzzyEq for Size {
    #[inline]
    fn fuzzy_eq(&self, other: &Self) -> bool {
        self.width.fuzzy_eq(&other.width) && self.height.fuzzy_eq(&other.height)
    }
}

/// A rect representation.
///
/// Width and height are guarantee to be >= 0, but can be zero,
/// so a `Rect` can also represent a bounding box of a horizontal
/// or a vertical line.
#[derive(Clone, Copy)]
pub struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Rect {
    /// Creates a new `Rect` from values.
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Option<Self> {
        if x.is_finite() && y.is_finite() && width >= 0.0 && height >= 0.0 && width.is_finite() && height.is_finite() {
            Some(Rect { x, y, width, height })
        } else {
            None
        }
    }

    /// Returns X position.
    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Returns Y position.
    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Returns width.
    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns height.
    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns the rightmost X position.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Returns the bottommost Y position.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Expands the rect to the provided one.
    pub fn expand(&self, r: Rect) -> Rect {
        let x = self.x.min(r.x);
        let y = self.y.min(r.y);
        let right = self.right().max(r.right());
        let bottom = self.bottom().max(r.bottom());
        // Can't fail, because the union of two valid rects is valid.
        Rect::new(x, y, right - x, bottom - y).unwrap()
    }

    /// Returns the rect size.
    ///
    /// Returns `None` when width or height is zero.
    #[inline]
    pub fn size(&self) -> Option<Size> {
        Size::new(self.width, self.height)
    }
}

impl std::fmt::Debug for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Rect({} {} {} {})", self.x, self.y, self.width, self.height)
    }
}

impl FuzzyEq for Rect {
    #[inline]
    fn fuzzy_eq(&self, other: &Self) -> bool {
        self.x.fuzzy_eq(&other.x)
            && self.y.fuzzy_eq(&other.y)
            && self.width.fuzzy_eq(&other.width)
            && self.height.fuzzy_eq(&other.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_size() {
        assert!(Size::new(0.0, 10.0).is_none());
        assert!(Size::new(-1.0, 10.0).is_none());
        assert!(Size::new(f64::NAN, 10.0).is_none());
    }

    #[test]
    fn zero_rect_is_valid() {
        let r = Rect::new(10.0, 20.0, 0.0, 5.0).unwrap();
        assert!(r.size().is_none());
        assert!(r.width().fuzzy_eq(&0.0));
    }

    #[test]
    fn rect_expand() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0).unwrap();
        let b = Rect::new(5.0, -5.0, 10.0, 10.0).unwrap();
        let c = a.expand(b);
        assert!(c.fuzzy_eq(&Rect::new(0.0, -5.0, 15.0, 15.0).unwrap()));
    }
}
