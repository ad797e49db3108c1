// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertex-edit hit-testing for polylines and polygons.
//!
//! In vertex-edit mode a shape exposes one control per existing vertex
//! (controls `[0, n)`) plus an "insert a vertex here" affordance at each
//! edge midpoint (controls `[n, 2n)`; control `n + i` is the midpoint of
//! the edge from vertex `i` to vertex `i + 1`). Existing vertices are
//! tested first so a midpoint square overlapping a vertex square never
//! shadows it. The closing edge participates only for closed polygons.

use kurbo::{Affine, Point, Vec2};
use smallvec::SmallVec;
use vellum_geom::AABox;
use vellum_scene::{Scene, ShapeId};

/// Sizing parameters for vertex-edit hit testing, in screen units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexParams {
    /// Radius of the square around each existing vertex.
    pub vert_radius: f64,
    /// Stroke width of the edit overlay; midpoint affordances scale with
    /// it.
    pub stroke_width: f64,
}

impl Default for VertexParams {
    fn default() -> Self {
        Self {
            vert_radius: 4.0,
            stroke_width: 2.0,
        }
    }
}

/// Hit-test vertex-edit controls at a screen point.
///
/// Returns the control index: `[0, n)` for existing vertices, `[n, 2n)`
/// for edge-midpoint insertion affordances.
pub fn pick_vertex(
    scene: &mut Scene,
    shape: ShapeId,
    world_to_screen: Affine,
    screen_pt: Point,
    params: &VertexParams,
) -> Option<usize> {
    let n = scene.num_verts(shape)?;
    let bounds = scene.bounds(shape)?;
    let pad = params.vert_radius + params.stroke_width;
    let gate = bounds
        .transform(world_to_screen)
        .expand(Vec2::new(pad, pad));
    if !gate.contains_point(screen_pt) {
        return None;
    }

    let full = world_to_screen * scene.global_matrix(shape)?;
    let closed = match scene.geometry(shape)? {
        vellum_scene::Geometry::Poly(p) => p.closed(),
        _ => return None,
    };
    let verts = scene.verts(shape)?;
    let screen_verts: SmallVec<[Point; 8]> = verts.iter().map(|v| full * *v).collect();

    let half = params.vert_radius + params.stroke_width / 2.0;
    let extents = Vec2::new(half, half);
    for (i, v) in screen_verts.iter().enumerate() {
        if AABox::from_center_and_extents(*v, extents).contains_point(screen_pt) {
            return Some(i);
        }
    }

    let half = params.stroke_width * 1.5;
    let extents = Vec2::new(half, half);
    let edges = if closed { n } else { n.saturating_sub(1) };
    for i in 0..edges {
        let a = screen_verts[i];
        let b = screen_verts[(i + 1) % n];
        let mid = a.midpoint(b);
        if AABox::from_center_and_extents(mid, extents).contains_point(screen_pt) {
            return Some(n + i);
        }
    }
    None
}
