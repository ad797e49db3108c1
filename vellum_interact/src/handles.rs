// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Oriented-bounding-box handle hit-testing.
//!
//! An editable shape's selection frame is its OBB: the untransformed
//! width/height box carried through the full object-to-screen matrix.
//! Handles sit at the four corners (controls 0-3) and, when the frame is
//! scalable, at the four edge midpoints (controls 4-7). Each handle is a
//! small square in *screen* space; corner handles are additionally
//! surrounded by a one-sided rotation margin, so a pick inside the inner
//! square means scale and a pick in the margin means rotate.
//!
//! Corner controls index x-major: 0 = (-,-), 1 = (-,+), 2 = (+,-),
//! 3 = (+,+) in OBB half-extent signs. Edge controls follow as
//! 4 = left, 5 = top, 6 = right, 7 = bottom.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Vec2};
use vellum_geom::{AABox, affine};
use vellum_scene::{Scene, ShapeId};

/// Sizing and capability parameters for a shape's selection frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameParams {
    /// Side length of a handle square, in screen units.
    pub handle_size: f64,
    /// Width of the rotation margin around corner handles, in screen
    /// units.
    pub handle_padding: f64,
    /// Whether the frame offers scale handles.
    pub scalable: bool,
    /// Whether corner handles carry the rotation affordance.
    pub rotatable: bool,
}

impl Default for FrameParams {
    fn default() -> Self {
        Self {
            handle_size: 8.0,
            handle_padding: 10.0,
            scalable: true,
            rotatable: true,
        }
    }
}

/// A successful handle pick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandlePick {
    /// Which control was grabbed: corners 0-3, edges 4-7.
    pub control: usize,
    /// Whether the grab is a rotation (corner margin) rather than a
    /// scale.
    pub rotate: bool,
}

/// Screen-space bounding box of the selection frame, padded so the
/// handle squares and rotation margins are inside it.
pub fn frame_bounds(
    scene: &mut Scene,
    shape: ShapeId,
    world_to_screen: Affine,
    params: &FrameParams,
) -> Option<AABox> {
    let global = scene.global_matrix(shape)?;
    let dims = scene.dimensions(shape)?;
    let full = world_to_screen * global;
    let margin = if params.rotatable {
        params.handle_padding
    } else {
        0.0
    };
    let padding = margin + params.handle_size / 2.0;
    Some(
        AABox::from_center_and_extents(Point::ORIGIN, dims / 2.0)
            .transform(full)
            .expand(Vec2::new(padding, padding)),
    )
}

/// Hit-test the selection frame's handles at a screen point.
///
/// Corner handles are tested before edge handles, so a corner pick wins
/// where the two would overlap on a small shape. On frames that cannot
/// rotate, a margin hit demotes to a scale grab; on frames that cannot
/// scale, an inner-square hit promotes to a rotation grab.
pub fn pick_handle(
    scene: &mut Scene,
    shape: ShapeId,
    world_to_screen: Affine,
    screen_pt: Point,
    params: &FrameParams,
) -> Option<HandlePick> {
    if !params.scalable && !params.rotatable {
        return None;
    }
    let bounds = frame_bounds(scene, shape, world_to_screen, params)?;
    if !bounds.contains_point(screen_pt) {
        return None;
    }

    let global = scene.global_matrix(shape)?;
    let full = world_to_screen * global;
    let dims = scene.dimensions(shape)?;
    let half_w = dims.x / 2.0;
    let half_h = dims.y / 2.0;

    // Screen -> handle-local: undo the frame's orientation (and
    // reflection) without undoing its scale magnitude, so handle squares
    // stay a fixed screen size.
    let d = affine::decompose(full);
    let sx = if d.scale.x < 0.0 { -1.0 } else { 1.0 };
    let sy = if d.scale.y < 0.0 { -1.0 } else { 1.0 };
    let mut rot = d.rotation;
    if sx * sy > 0.0 {
        rot = (-rot.0, -rot.1);
    }
    let unrotate =
        Affine::rotate(rot.1) * Affine::scale_non_uniform(sx, sy) * Affine::rotate(rot.0);

    let box_padding = if params.rotatable {
        params.handle_padding
    } else {
        0.0
    };
    let half_box = params.handle_size / 2.0;
    let pad_sz = half_box + box_padding;
    let pad_radius = (2.0 * pad_sz * pad_sz).sqrt();

    let mut pick = None;
    for i in 0..4 {
        let xs = if i < 2 { -1.0 } else { 1.0 };
        let ys = if i % 2 == 0 { -1.0 } else { 1.0 };
        let corner = Point::new(xs * half_w, ys * half_h);
        if let Some(rotate) =
            hit_handle_square(screen_pt, corner, full, unrotate, half_box, pad_sz, pad_radius, xs, ys)
        {
            pick = Some(HandlePick { control: i, rotate });
            break;
        }
    }

    if pick.is_none() && params.scalable {
        for i in 0..4 {
            let (xs, ys) = if i % 2 == 0 {
                (if i < 2 { -1.0 } else { 1.0 }, 0.0)
            } else {
                (0.0, if i < 2 { -1.0 } else { 1.0 })
            };
            let mid = Point::new(xs * half_w, ys * half_h);
            if let Some(rotate) =
                hit_handle_square(screen_pt, mid, full, unrotate, half_box, pad_sz, pad_radius, xs, ys)
            {
                pick = Some(HandlePick {
                    control: i + 4,
                    rotate,
                });
                break;
            }
        }
    }

    pick.map(|mut p| {
        if p.rotate && !params.rotatable {
            p.rotate = false;
        } else if !p.rotate && !params.scalable {
            p.rotate = true;
        }
        p
    })
}

/// Test one handle square. Returns `Some(rotate)` on a hit.
///
/// `handle_obj` is the handle center in object space; `xs`/`ys` are the
/// outward half-extent signs of that handle (zero along an edge-handle's
/// free axis, which disables its rotation margin).
fn hit_handle_square(
    screen_pt: Point,
    handle_obj: Point,
    obj_to_screen: Affine,
    unrotate: Affine,
    half_box: f64,
    pad_sz: f64,
    pad_radius: f64,
    xs: f64,
    ys: f64,
) -> Option<bool> {
    let center = obj_to_screen * handle_obj;
    if center.distance(screen_pt) > pad_radius {
        return None;
    }

    // Compose the translation taking the handle center to the origin in
    // handle-local space.
    let [a, b, c, d, _, _] = unrotate.as_coeffs();
    let tx = a * -center.x + c * -center.y;
    let ty = b * -center.x + d * -center.y;
    let local = Affine::new([a, b, c, d, tx, ty]) * screen_pt;

    if local.x.abs() <= half_box && local.y.abs() <= half_box {
        return Some(false);
    }
    if xs != 0.0 && ys != 0.0 {
        // The rotation margin extends outward from the corner only: a
        // one-sided square past the handle box in the corner's sign
        // direction.
        let x = xs * local.x;
        let y = ys * local.y;
        if x > -half_box && x <= pad_sz && y > -half_box && y <= pad_sz {
            return Some(true);
        }
    }
    None
}
