// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag sessions: pointer deltas to transform updates.
//!
//! A [`DragSession`] is created on pointer-down over a shape (or one of
//! its handles), consumed on every pointer-move, and dropped on release.
//! It snapshots everything the update math needs at press time: the
//! pointer in screen, world, and object space, the shape's local
//! position/scale/rotation, its untransformed dimensions, and the
//! object-to-world matrix with its checked inverse. Updates always work
//! from the snapshot plus the *current* pointer, never incrementally, so
//! a drag is insensitive to event coalescing.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use core::f64::consts::FRAC_PI_4;
use kurbo::{Affine, Point, Vec2};
use vellum_geom::{Tolerance, affine};
use vellum_scene::{Scene, SceneError, ShapeId};

use crate::handles::HandlePick;
use crate::modifiers::Modifiers;

/// What a drag session manipulates, switched explicitly on update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    /// Plain translation of the whole shape.
    Move,
    /// Handle-driven rotation or scaling of the shape's OBB.
    Transform {
        /// Grabbed control: corners 0-3, edges 4-7.
        control: usize,
        /// True when the grab was a rotation handle.
        rotate: bool,
    },
    /// Vertex editing: controls `[0, n)` address existing vertices,
    /// `[n, 2n)` address edge-midpoint insertion affordances.
    VertexEdit {
        /// Grabbed control index.
        control: usize,
    },
}

/// Per-shape scale policy, independent of held modifier keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScalePolicy {
    /// Scale uniformly even without shift.
    pub uniform_only: bool,
    /// Scale about the center even without alt.
    pub center_only: bool,
}

/// Ephemeral state of one pointer drag.
#[derive(Clone, Debug)]
pub struct DragSession {
    /// The shape being manipulated.
    pub shape: ShapeId,
    mode: DragMode,
    start_screen: Point,
    start_world: Point,
    start_object: Point,
    start_position: Point,
    start_scale: Vec2,
    start_rotation: f64,
    dims: Vec2,
    object_to_world: Affine,
    world_to_object: Affine,
    /// Modifier keys; refresh from each pointer event via
    /// [`DragSession::set_modifiers`].
    pub modifiers: Modifiers,
    policy: ScalePolicy,
}

impl DragSession {
    fn begin(
        scene: &mut Scene,
        shape: ShapeId,
        mode: DragMode,
        screen_pt: Point,
        world_pt: Point,
        modifiers: Modifiers,
        policy: ScalePolicy,
    ) -> Result<Self, SceneError> {
        let object_to_world = scene.global_matrix(shape).ok_or(SceneError::StaleId)?;
        let world_to_object = affine::try_invert(object_to_world, Tolerance::DEFAULT)
            .ok_or(SceneError::SingularTransform)?;
        let xform = scene.xform(shape).ok_or(SceneError::StaleId)?;
        let dims = scene.dimensions(shape).ok_or(SceneError::StaleId)?;
        Ok(Self {
            shape,
            mode,
            start_screen: screen_pt,
            start_world: world_pt,
            start_object: world_to_object * world_pt,
            start_position: xform.position,
            start_scale: xform.scale,
            start_rotation: xform.rotation_deg,
            dims,
            object_to_world,
            world_to_object,
            modifiers,
            policy,
        })
    }

    /// Begin a plain move drag.
    pub fn begin_move(
        scene: &mut Scene,
        shape: ShapeId,
        screen_pt: Point,
        world_pt: Point,
        modifiers: Modifiers,
    ) -> Result<Self, SceneError> {
        Self::begin(
            scene,
            shape,
            DragMode::Move,
            screen_pt,
            world_pt,
            modifiers,
            ScalePolicy::default(),
        )
    }

    /// Begin a rotate/scale drag from a handle pick.
    pub fn begin_transform(
        scene: &mut Scene,
        shape: ShapeId,
        pick: HandlePick,
        screen_pt: Point,
        world_pt: Point,
        modifiers: Modifiers,
        policy: ScalePolicy,
    ) -> Result<Self, SceneError> {
        Self::begin(
            scene,
            shape,
            DragMode::Transform {
                control: pick.control,
                rotate: pick.rotate,
            },
            screen_pt,
            world_pt,
            modifiers,
            policy,
        )
    }

    /// Begin a vertex-edit drag from a vertex pick.
    pub fn begin_vertex(
        scene: &mut Scene,
        shape: ShapeId,
        control: usize,
        screen_pt: Point,
        world_pt: Point,
        modifiers: Modifiers,
    ) -> Result<Self, SceneError> {
        Self::begin(
            scene,
            shape,
            DragMode::VertexEdit { control },
            screen_pt,
            world_pt,
            modifiers,
            ScalePolicy::default(),
        )
    }

    /// The session's current mode (the control index can change when a
    /// vertex drag materializes an edge-midpoint insertion).
    pub fn mode(&self) -> DragMode {
        self.mode
    }

    /// Refresh held modifier keys from the latest pointer event.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Apply one pointer-move to the scene.
    ///
    /// `screen_to_world` is the camera's current screen-to-world matrix,
    /// used only for axis-snapped translation.
    pub fn update(
        &mut self,
        scene: &mut Scene,
        screen_pt: Point,
        world_pt: Point,
        screen_to_world: Affine,
    ) -> Result<(), SceneError> {
        match self.mode {
            DragMode::Move => {
                self.update_move(scene, screen_pt, world_pt, screen_to_world);
                Ok(())
            }
            DragMode::Transform { rotate: true, .. } => {
                self.update_rotate(scene, world_pt);
                Ok(())
            }
            DragMode::Transform { control, .. } => {
                self.update_scale(scene, control, world_pt);
                Ok(())
            }
            DragMode::VertexEdit { control } => self.update_vertex(scene, control, world_pt),
        }
    }

    /// New rotation = starting rotation + the signed angle swept by the
    /// pointer around the shape's world position, snapped to 45° under
    /// shift.
    fn update_rotate(&self, scene: &mut Scene, world_pt: Point) {
        let d = affine::decompose(self.object_to_world);
        let center = d.translation.to_point();
        let start_dir = self.start_world - center;
        let dir = world_pt - center;
        let mut angle = start_dir.cross(dir).atan2(start_dir.dot(dir));
        if self.modifiers.contains(Modifiers::SHIFT) {
            angle = (angle / FRAC_PI_4).round() * FRAC_PI_4;
        }
        scene.set_rotation(self.shape, self.start_rotation + angle.to_degrees());
    }

    /// Corner and edge scaling, with pivot compensation so the opposite
    /// corner/edge stays put unless center scaling is requested.
    fn update_scale(&self, scene: &mut Scene, control: usize, world_pt: Point) {
        let uniform = self.modifiers.contains(Modifiers::SHIFT) || self.policy.uniform_only;
        let center = self.modifiers.contains(Modifiers::ALT) || self.policy.center_only;

        let [ma, mb, mc, md, _, _] = self.object_to_world.as_coeffs();
        let mut world = world_pt;
        let mut delta = world - self.start_world;

        if uniform && control < 4 {
            // Project the drag onto the OBB diagonal through the grabbed
            // corner, picking the projection axis on the near side of the
            // diagonal so the handle tracks the pointer.
            let mut x_axis = Vec2::new(ma, mb);
            let mut y_axis = Vec2::new(mc, md);
            if control < 2 {
                x_axis = -x_axis;
            }
            if control % 2 == 0 {
                y_axis = -y_axis;
            }
            let x_axis = normalize(x_axis);
            let y_axis = normalize(y_axis);
            let diag = normalize(x_axis + y_axis);
            let cross = delta.cross(diag);
            let axis = if control == 0 || control == 3 {
                if cross < 0.0 { x_axis } else { y_axis }
            } else if cross < 0.0 {
                y_axis
            } else {
                x_axis
            };
            let along = delta.dot(axis);
            let dist = along.signum() * (2.0 * along * along).sqrt();
            delta = diag * dist;
            world = self.start_world + delta;
        }

        // Pointer delta in object space is the dimension delta.
        let obj = self.world_to_object * world;
        let mut delta_dims = obj - self.start_object;

        let mut pt = self.start_position;
        let mut xs;
        let mut ys;
        if control < 4 {
            xs = if control < 2 { -1.0 } else { 1.0 };
            ys = if control % 2 == 0 { -1.0 } else { 1.0 };
            // Scaling acts about the shape center; shifting the position
            // by half the world delta re-pins the opposite corner.
            if !center {
                pt += delta * 0.5;
            }
        } else {
            let idx = control - 4;
            if idx % 2 == 0 {
                // Dragging along the object's x axis.
                let axis = normalize(Vec2::new(ma, mb));
                ys = 0.0;
                xs = if idx < 2 { -1.0 } else { 1.0 };
                if uniform {
                    ys = xs;
                    delta_dims.y = delta_dims.x;
                }
                if !center {
                    pt += axis * delta.dot(axis) * 0.5;
                }
            } else {
                // Dragging along the object's y axis.
                let axis = normalize(Vec2::new(mc, md));
                xs = 0.0;
                ys = if idx < 2 { -1.0 } else { 1.0 };
                if uniform {
                    xs = ys;
                    delta_dims.x = delta_dims.y;
                }
                if !center {
                    pt += axis * delta.dot(axis) * 0.5;
                }
            }
        }
        scene.set_position(self.shape, pt);

        if center {
            xs *= 2.0;
            ys *= 2.0;
        }
        scene.set_scale(
            self.shape,
            Vec2::new(
                self.start_scale.x * (1.0 + xs * delta_dims.x / self.dims.x),
                self.start_scale.y * (1.0 + ys * delta_dims.y / self.dims.y),
            ),
        );
    }

    /// Plain translation; shift snaps the *screen* delta to the nearest
    /// 45° ray before mapping it back through the camera's linear part.
    fn update_move(
        &self,
        scene: &mut Scene,
        screen_pt: Point,
        world_pt: Point,
        screen_to_world: Affine,
    ) {
        let diff = if self.modifiers.contains(Modifiers::SHIFT) {
            let d = screen_pt - self.start_screen;
            let snapped = (d.y.atan2(d.x) / FRAC_PI_4).round() * FRAC_PI_4;
            let dir = Vec2::new(snapped.cos(), snapped.sin());
            let d = dir * d.dot(dir);
            // Directions transform by the linear part only.
            let [a, b, c, d2, _, _] = screen_to_world.as_coeffs();
            Vec2::new(a * d.x + c * d.y, b * d.x + d2 * d.y)
        } else {
            world_pt - self.start_world
        };
        scene.set_position(self.shape, self.start_position + diff);
    }

    /// Vertex dragging. Grabbing an edge-midpoint affordance first
    /// inserts a vertex there and retargets the session at it.
    fn update_vertex(
        &mut self,
        scene: &mut Scene,
        control: usize,
        world_pt: Point,
    ) -> Result<(), SceneError> {
        let n = scene.num_verts(self.shape).ok_or(SceneError::StaleId)?;
        if control >= n {
            let idx1 = (control - n).min(n - 1);
            let idx2 = if idx1 == n - 1 { 0 } else { idx1 + 1 };
            let xform = scene.global_matrix(self.shape).ok_or(SceneError::StaleId)?;
            let verts = scene.verts(self.shape).ok_or(SceneError::StaleId)?;
            let mid = (xform * verts[idx1]).midpoint(xform * verts[idx2]);
            let inserted = scene.insert_vert(self.shape, idx1 + 1, mid)?;
            self.mode = DragMode::VertexEdit { control: inserted };
            Ok(())
        } else {
            scene.set_vert_position(self.shape, control, world_pt)
        }
    }
}

/// Remove the picked vertex when alt is held on press.
///
/// Returns `Ok(true)` when a vertex was removed (no drag should begin),
/// `Ok(false)` when the pick was not an existing-vertex control or alt
/// was not held.
pub fn alt_removes_vertex(
    scene: &mut Scene,
    shape: ShapeId,
    control: usize,
    modifiers: Modifiers,
) -> Result<bool, SceneError> {
    if !modifiers.contains(Modifiers::ALT) {
        return Ok(false);
    }
    let n = scene.num_verts(shape).ok_or(SceneError::StaleId)?;
    if control >= n {
        return Ok(false);
    }
    scene.remove_vert(shape, control)?;
    Ok(true)
}

fn normalize(v: Vec2) -> Vec2 {
    let len = v.hypot();
    if len > 0.0 { v / len } else { v }
}
