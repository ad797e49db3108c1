// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kind-specific shape geometry and bounds computation.

use alloc::vec::Vec;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Vec2};
use smallvec::SmallVec;
use vellum_geom::{AABox, Tolerance, affine, hull};

use crate::error::SceneError;

/// Kind-specific geometry of a shape.
#[derive(Clone, Debug)]
pub enum Geometry {
    /// A circle of the given radius, centered on its transform origin.
    Circle {
        /// Radius in local units.
        radius: f64,
    },
    /// An axis-aligned rectangle centered on its transform origin.
    Rect {
        /// Width in local units.
        width: f64,
        /// Height in local units.
        height: f64,
    },
    /// An open or closed sequence of vertices.
    Poly(PolyGeom),
}

impl Geometry {
    /// Untransformed width/height of the geometry.
    pub(crate) fn dimensions(&mut self) -> Vec2 {
        match self {
            Self::Circle { radius } => Vec2::new(*radius * 2.0, *radius * 2.0),
            Self::Rect { width, height } => Vec2::new(*width, *height),
            Self::Poly(p) => Vec2::new(p.width(), p.height()),
        }
    }

    /// World-space bounds under the given global matrix.
    pub(crate) fn bounds(&mut self, global: Affine) -> AABox {
        match self {
            Self::Circle { radius } => circle_bounds(*radius, global),
            Self::Rect { width, height } => {
                AABox::from_center_and_extents(Point::ORIGIN, Vec2::new(*width / 2.0, *height / 2.0))
                    .transform(global)
            }
            Self::Poly(p) => p.bounds(global),
        }
    }
}

/// Bounds of a circle under an arbitrary affine.
///
/// The image of a circle is an ellipse: the pre-rotation of the matrix
/// decomposition maps the circle onto itself, so only the scale and the
/// post-rotation shape the result. With semi-axes `a = |sx|·r`,
/// `b = |sy|·r` at angle θ, the axis-aligned extents are
/// `A = √(b²sin²θ + a²cos²θ)` and `B = √(a²sin²θ + b²cos²θ)`.
fn circle_bounds(radius: f64, global: Affine) -> AABox {
    let d = affine::decompose(global);
    let a = d.scale.x * radius;
    let b = d.scale.y * radius;
    let theta = d.rotation.1;
    let (sin, cos) = theta.sin_cos();
    let (sinsqr, cossqr) = (sin * sin, cos * cos);
    let (asqr, bsqr) = (a * a, b * b);
    let ext_x = (bsqr * sinsqr + asqr * cossqr).sqrt();
    let ext_y = (asqr * sinsqr + bsqr * cossqr).sqrt();
    AABox::from_center_and_extents(d.translation.to_point(), Vec2::new(ext_x, ext_y))
}

/// Vertex-list geometry for polylines and polygons.
///
/// The convex hull of the vertex sequence is cached so bounds
/// recomputation under a changed transform only visits hull vertices.
/// Structural edits (insert/remove/move) invalidate the hull, the local
/// extent bookkeeping, and the derived bounds; the hull is then rebuilt in
/// full on next use rather than maintained incrementally.
#[derive(Clone, Debug)]
pub struct PolyGeom {
    closed: bool,
    verts: Vec<Point>,
    hull: SmallVec<[usize; 8]>,
    /// Vertex indices realizing min-x, min-y, max-x, max-y.
    extent_indices: [usize; 4],
    stale: bool,
}

/// Minimum vertex count for a closed polygon.
pub(crate) const POLY_MIN_VERTS: usize = 3;

impl PolyGeom {
    /// Build vertex geometry. Open polylines require at least one vertex,
    /// closed polygons at least three.
    pub(crate) fn new(verts: Vec<Point>, closed: bool) -> Result<Self, SceneError> {
        let min = if closed { POLY_MIN_VERTS } else { 1 };
        if verts.len() < min {
            return Err(SceneError::TooFewVertices {
                min,
                got: verts.len(),
            });
        }
        let mut geom = Self {
            closed,
            verts,
            hull: SmallVec::new(),
            extent_indices: [0; 4],
            stale: true,
        };
        geom.refresh();
        Ok(geom)
    }

    /// Whether the vertex sequence closes back on itself.
    pub fn closed(&self) -> bool {
        self.closed
    }

    /// The vertex list.
    pub fn verts(&self) -> &[Point] {
        &self.verts
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.verts.len()
    }

    /// Whether the vertex list is empty.
    pub fn is_empty(&self) -> bool {
        self.verts.is_empty()
    }

    /// Hull indices (CCW) into the vertex list.
    pub fn hull(&mut self) -> &[usize] {
        self.refresh();
        &self.hull
    }

    /// Recompute the hull and extent bookkeeping if a structural edit
    /// invalidated them.
    fn refresh(&mut self) {
        if !self.stale {
            return;
        }
        self.hull = SmallVec::from_vec(hull::hull_indices(&self.verts));
        let mut bounds = AABox::EMPTY;
        for &idx in &self.hull {
            let pt = self.verts[idx];
            if bounds.is_empty() {
                self.extent_indices = [idx; 4];
            } else {
                if pt.x < bounds.min_x {
                    self.extent_indices[0] = idx;
                } else if pt.x > bounds.max_x {
                    self.extent_indices[2] = idx;
                }
                if pt.y < bounds.min_y {
                    self.extent_indices[1] = idx;
                } else if pt.y > bounds.max_y {
                    self.extent_indices[3] = idx;
                }
            }
            bounds = bounds.encapsulate_point(pt);
        }
        self.stale = false;
    }

    /// Untransformed bounds of the vertex list.
    pub(crate) fn local_bounds(&mut self) -> AABox {
        self.refresh();
        let [ix0, iy0, ix1, iy1] = self.extent_indices;
        AABox::new(
            self.verts[ix0].x,
            self.verts[iy0].y,
            self.verts[ix1].x,
            self.verts[iy1].y,
        )
    }

    /// Untransformed width (extent in x).
    pub(crate) fn width(&mut self) -> f64 {
        self.refresh();
        self.verts[self.extent_indices[2]].x - self.verts[self.extent_indices[0]].x
    }

    /// Untransformed height (extent in y).
    pub(crate) fn height(&mut self) -> f64 {
        self.refresh();
        self.verts[self.extent_indices[3]].y - self.verts[self.extent_indices[1]].y
    }

    /// World bounds: hull vertices through the global matrix, encapsulated
    /// one at a time.
    fn bounds(&mut self, global: Affine) -> AABox {
        self.refresh();
        let mut out = AABox::EMPTY;
        for &idx in &self.hull {
            out = out.encapsulate_point(global * self.verts[idx]);
        }
        out
    }

    /// Apply a matrix to every vertex in place (used when local transforms
    /// are flattened into the vertex data).
    pub(crate) fn apply(&mut self, m: Affine) {
        for v in &mut self.verts {
            *v = m * *v;
        }
        self.stale = true;
    }

    /// Insert a vertex, clamping the index into `[0, len]`. Returns the
    /// index actually used.
    pub(crate) fn insert(&mut self, index: usize, pos: Point) -> usize {
        let index = index.min(self.verts.len());
        self.verts.insert(index, pos);
        self.stale = true;
        index
    }

    /// Remove the vertex at `index`.
    ///
    /// Closed polygons refuse to drop below [`POLY_MIN_VERTS`].
    pub(crate) fn remove(&mut self, index: usize) -> Result<Point, SceneError> {
        if index >= self.verts.len() {
            return Err(SceneError::VertexIndexOutOfRange {
                index,
                len: self.verts.len(),
            });
        }
        if self.closed && self.verts.len() <= POLY_MIN_VERTS {
            return Err(SceneError::TooFewVertices {
                min: POLY_MIN_VERTS,
                got: self.verts.len() - 1,
            });
        }
        let pt = self.verts.remove(index);
        self.stale = true;
        Ok(pt)
    }

    /// Set the position of the vertex at `index`. Returns whether it
    /// moved.
    pub(crate) fn set_vert(&mut self, index: usize, pos: Point) -> Result<bool, SceneError> {
        if index >= self.verts.len() {
            return Err(SceneError::VertexIndexOutOfRange {
                index,
                len: self.verts.len(),
            });
        }
        if self.verts[index] == pos {
            return Ok(false);
        }
        self.verts[index] = pos;
        self.stale = true;
        Ok(true)
    }

    /// Centroid of the closed polygon via the signed-area accumulation.
    ///
    /// Returns `None` when the signed area is within tolerance of zero
    /// (collinear or self-cancelling vertices), where the division is
    /// meaningless.
    pub fn centroid(&self, tol: Tolerance) -> Option<Point> {
        let n = self.verts.len();
        if n < POLY_MIN_VERTS {
            return None;
        }
        let mut cx = 0.0;
        let mut cy = 0.0;
        let mut signed_area = 0.0;
        for i in 0..n {
            let p1 = self.verts[i];
            let p2 = self.verts[(i + 1) % n];
            let a = p1.x * p2.y - p2.x * p1.y;
            cx += (p1.x + p2.x) * a;
            cy += (p1.y + p2.y) * a;
            signed_area += a;
        }
        signed_area *= 0.5;
        if signed_area.abs() <= tol.0 {
            return None;
        }
        Some(Point::new(
            cx / (6.0 * signed_area),
            cy / (6.0 * signed_area),
        ))
    }
}
