// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned bounding box algebra.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Vec2};

use crate::Tolerance;

/// Axis-aligned bounding box in 2D.
///
/// A box is *empty* when a minimum exceeds its maximum; the canonical
/// empty box is [`AABox::EMPTY`] (`+∞` minimums, `-∞` maximums). Empty is
/// a meaningful sentinel, not an error: it is the identity element for
/// [`AABox::hull`] and the absorbing element for [`AABox::intersection`],
/// and [`AABox::encapsulate_point`] collapses it to a zero-size box at the
/// given point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AABox {
    /// Minimum x (left)
    pub min_x: f64,
    /// Minimum y (top)
    pub min_y: f64,
    /// Maximum x (right)
    pub max_x: f64,
    /// Maximum y (bottom)
    pub max_y: f64,
}

impl AABox {
    /// The empty box: `+∞` minimums, `-∞` maximums.
    pub const EMPTY: Self = Self {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    /// The box encompassing every finite coordinate.
    pub const INFINITE: Self = Self {
        min_x: f64::NEG_INFINITY,
        min_y: f64::NEG_INFINITY,
        max_x: f64::INFINITY,
        max_y: f64::INFINITY,
    };

    /// Create a new box from min/max corners.
    #[inline(always)]
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// A box with its top-left corner at the origin, extending by `size`.
    ///
    /// Negative sizes extend toward negative coordinates; the stored
    /// min/max stay ordered either way.
    #[inline]
    pub fn from_size_at_origin(size: Vec2) -> Self {
        Self::from_origin_and_size(Point::ORIGIN, size)
    }

    /// A box with its top-left corner at `origin`, extending by `size`.
    ///
    /// Negative sizes are folded back so the box remains valid (min below
    /// max) rather than producing an accidental empty sentinel.
    pub fn from_origin_and_size(origin: Point, size: Vec2) -> Self {
        let (min_x, max_x) = if size.x < 0.0 {
            (origin.x + size.x, origin.x)
        } else {
            (origin.x, origin.x + size.x)
        };
        let (min_y, max_y) = if size.y < 0.0 {
            (origin.y + size.y, origin.y)
        } else {
            (origin.y, origin.y + size.y)
        };
        Self::new(min_x, min_y, max_x, max_y)
    }

    /// A box centered on `center` reaching `extents` outward in each axis.
    pub fn from_center_and_extents(center: Point, extents: Vec2) -> Self {
        let ex = extents.x.abs();
        let ey = extents.y.abs();
        Self::new(center.x - ex, center.y - ey, center.x + ex, center.y + ey)
    }

    /// Whether the box is empty (a minimum exceeds its maximum).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Whether any boundary is non-finite.
    ///
    /// Note that [`AABox::EMPTY`] is infinite by this definition; callers
    /// that need to distinguish check [`AABox::is_empty`] first.
    #[inline]
    pub fn is_infinite(&self) -> bool {
        !(self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite())
    }

    /// Component-wise approximate equality with absolute tolerance.
    pub fn approx_eq(&self, other: &Self, tol: Tolerance) -> bool {
        tol.absolute_eq(self.min_x, other.min_x)
            && tol.absolute_eq(self.min_y, other.min_y)
            && tol.absolute_eq(self.max_x, other.max_x)
            && tol.absolute_eq(self.max_y, other.max_y)
    }

    /// Width/height of the box.
    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.max_x - self.min_x, self.max_y - self.min_y)
    }

    /// Half the size in each axis, measured from the center.
    #[inline]
    pub fn extents(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// Center point of the box.
    #[inline]
    pub fn center(&self) -> Point {
        let e = self.extents();
        Point::new(self.min_x + e.x, self.min_y + e.y)
    }

    /// Grow (or shrink, with negative margins) by `margin` per axis.
    pub fn expand(&self, margin: Vec2) -> Self {
        Self::new(
            self.min_x - margin.x,
            self.min_y - margin.y,
            self.max_x + margin.x,
            self.max_y + margin.y,
        )
    }

    /// Area of the box; empty boxes have zero area.
    pub fn area(&self) -> f64 {
        let w = (self.max_x - self.min_x).max(0.0);
        let h = (self.max_y - self.min_y).max(0.0);
        w * h
    }

    /// The smallest box containing both `self` and `other`.
    ///
    /// The empty box is the identity: `b.hull(&AABox::EMPTY) == b`.
    pub fn hull(&self, other: &Self) -> Self {
        Self::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// The intersection of two boxes.
    ///
    /// All-or-nothing: if the boxes fail to overlap on *either* axis, the
    /// result is the canonical empty box. A partially-valid per-axis clamp
    /// is never produced.
    pub fn intersection(&self, other: &Self) -> Self {
        if self.max_x < other.min_x
            || self.min_x > other.max_x
            || self.max_y < other.min_y
            || self.min_y > other.max_y
        {
            return Self::EMPTY;
        }
        Self::new(
            self.min_x.max(other.min_x),
            self.min_y.max(other.min_y),
            self.max_x.min(other.max_x),
            self.max_y.min(other.max_y),
        )
    }

    /// Whether the boxes overlap with positive area (exclusive edges).
    ///
    /// Two boxes sharing only a boundary edge do *not* overlap. Contrast
    /// with [`AABox::contains_point`], which is inclusive.
    pub fn overlaps(&self, other: &Self) -> bool {
        !(self.max_x <= other.min_x
            || self.min_x >= other.max_x
            || self.max_y <= other.min_y
            || self.min_y >= other.max_y)
    }

    /// Whether `self` fully contains `other` (inclusive edges).
    pub fn contains(&self, other: &Self) -> bool {
        !(other.min_x < self.min_x
            || other.max_x > self.max_x
            || other.min_y < self.min_y
            || other.max_y > self.max_y)
    }

    /// Whether the box contains a point (inclusive edges).
    #[inline]
    pub fn contains_point(&self, pt: Point) -> bool {
        pt.x >= self.min_x && pt.x <= self.max_x && pt.y >= self.min_y && pt.y <= self.max_y
    }

    /// The minimal extension of the box that includes `pt`.
    ///
    /// An empty box collapses to a zero-size box at `pt`.
    pub fn encapsulate_point(&self, pt: Point) -> Self {
        if self.is_empty() {
            return Self::new(pt.x, pt.y, pt.x, pt.y);
        }
        Self::new(
            self.min_x.min(pt.x),
            self.min_y.min(pt.y),
            self.max_x.max(pt.x),
            self.max_y.max(pt.y),
        )
    }

    /// Translate the box by `offset`.
    pub fn translate(&self, offset: Vec2) -> Self {
        Self::new(
            self.min_x + offset.x,
            self.min_y + offset.y,
            self.max_x + offset.x,
            self.max_y + offset.y,
        )
    }

    /// Transform the box by an affine and return the enclosing box.
    ///
    /// The four corners are transformed individually and re-encapsulated,
    /// so axis alignment is re-derived after rotation rather than
    /// transforming min/max pairs directly.
    pub fn transform(&self, affine: Affine) -> Self {
        if self.is_empty() {
            return Self::EMPTY;
        }
        let corners = [
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
        ];
        let mut out = Self::EMPTY;
        for c in corners {
            out = out.encapsulate_point(affine * c);
        }
        out
    }
}

impl Default for AABox {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_identity_for_hull() {
        let b = AABox::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(b.hull(&AABox::EMPTY), b);
        assert_eq!(AABox::EMPTY.hull(&b), b);
    }

    #[test]
    fn empty_absorbs_intersection() {
        let b = AABox::new(1.0, 2.0, 3.0, 4.0);
        assert!(b.intersection(&AABox::EMPTY).is_empty());
        assert!(AABox::EMPTY.intersection(&b).is_empty());
    }

    #[test]
    fn intersection_is_all_or_nothing() {
        let a = AABox::new(0.0, 0.0, 10.0, 10.0);
        // Overlaps in x only; the result must be fully empty, not a
        // degenerate x-interval.
        let b = AABox::new(5.0, 20.0, 15.0, 30.0);
        let i = a.intersection(&b);
        assert!(i.is_empty());
        assert_eq!(i, AABox::EMPTY);

        let c = AABox::new(5.0, 5.0, 15.0, 15.0);
        assert_eq!(a.intersection(&c), AABox::new(5.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn containment_is_inclusive_overlap_is_exclusive() {
        let a = AABox::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.contains_point(Point::new(10.0, 5.0)), "edges contain");
        assert!(a.contains_point(Point::new(0.0, 0.0)), "corners contain");
        assert!(!a.contains_point(Point::new(10.1, 5.0)));

        // Sharing an edge is not an overlap.
        let b = AABox::new(10.0, 0.0, 20.0, 10.0);
        assert!(!a.overlaps(&b));
        let c = AABox::new(9.0, 0.0, 20.0, 10.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn contains_box_inclusive() {
        let a = AABox::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.contains(&AABox::new(0.0, 0.0, 10.0, 10.0)));
        assert!(a.contains(&AABox::new(2.0, 2.0, 8.0, 8.0)));
        assert!(!a.contains(&AABox::new(2.0, 2.0, 11.0, 8.0)));
    }

    #[test]
    fn encapsulate_point_collapses_empty() {
        let b = AABox::EMPTY.encapsulate_point(Point::new(3.0, 4.0));
        assert_eq!(b, AABox::new(3.0, 4.0, 3.0, 4.0));

        let b = b.encapsulate_point(Point::new(-1.0, 6.0));
        assert_eq!(b, AABox::new(-1.0, 4.0, 3.0, 6.0));
    }

    #[test]
    fn negative_sizes_stay_ordered() {
        let b = AABox::from_origin_and_size(Point::new(5.0, 5.0), Vec2::new(-3.0, 2.0));
        assert_eq!(b, AABox::new(2.0, 5.0, 5.0, 7.0));
        assert!(!b.is_empty());

        let c = AABox::from_center_and_extents(Point::ORIGIN, Vec2::new(-2.0, 1.0));
        assert_eq!(c, AABox::new(-2.0, -1.0, 2.0, 1.0));
    }

    #[test]
    fn size_extents_center_area() {
        let b = AABox::new(-5.0, -5.0, 5.0, 15.0);
        assert_eq!(b.size(), Vec2::new(10.0, 20.0));
        assert_eq!(b.extents(), Vec2::new(5.0, 10.0));
        assert_eq!(b.center(), Point::new(0.0, 5.0));
        assert_eq!(b.area(), 200.0);
        assert_eq!(AABox::EMPTY.area(), 0.0);
    }

    #[test]
    fn transform_rederives_axis_alignment() {
        let b = AABox::new(-5.0, -5.0, 5.0, 5.0);
        let rotated = b.transform(Affine::rotate(core::f64::consts::FRAC_PI_2));
        assert!(rotated.approx_eq(&b, Tolerance::DEFAULT), "square is 90° invariant");

        let shifted = b.transform(Affine::translate(Vec2::new(3.0, 4.0)));
        assert!(shifted.approx_eq(&AABox::new(-2.0, -1.0, 8.0, 9.0), Tolerance::DEFAULT));

        let rot45 = b.transform(Affine::rotate(core::f64::consts::FRAC_PI_4));
        let d = 5.0 * core::f64::consts::SQRT_2;
        assert!(rot45.approx_eq(&AABox::new(-d, -d, d, d), Tolerance::DEFAULT));
    }

    #[test]
    fn infinite_and_empty_sentinels() {
        assert!(AABox::EMPTY.is_empty());
        assert!(AABox::EMPTY.is_infinite());
        assert!(AABox::INFINITE.is_infinite());
        assert!(!AABox::INFINITE.is_empty());
        assert!(!AABox::new(0.0, 0.0, 1.0, 1.0).is_infinite());
    }
}
