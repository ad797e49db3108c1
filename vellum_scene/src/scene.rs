// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene: shape slots composed over the transform arena.

use alloc::boxed::Box;
use alloc::vec::Vec;
use kurbo::{Affine, Point, Vec2};
use vellum_geom::{AABox, Tolerance, affine};

use crate::error::SceneError;
use crate::geometry::{Geometry, PolyGeom, POLY_MIN_VERTS};
use crate::sink::{ChangeKind, ChangeSink};
use crate::style::{FillStyle, SavedState, StrokeStyle};
use crate::types::{NodeId, ShapeFlags, Xform};
use crate::xform::XformTree;

/// Identifier for a shape in the scene (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ShapeId(pub(crate) u32, pub(crate) u32);

impl ShapeId {
    const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
pub(crate) struct ShapeData {
    generation: u32,
    pub(crate) node: NodeId,
    pub(crate) geom: Geometry,
    pub(crate) fill: FillStyle,
    pub(crate) stroke: StrokeStyle,
    pub(crate) flags: ShapeFlags,
    pub(crate) z_index: i32,
    pub(crate) visible: bool,
    geom_dirty: bool,
    aabox: AABox,
    pub(crate) saved: Vec<SavedState>,
}

/// A scene of shapes over a hierarchical transform arena.
///
/// Each shape composes a transform node, kind-specific [`Geometry`],
/// independent fill/stroke styles, a z-index, and a cached world-space
/// bounding box. The bounds cache is guarded by two independent dirty
/// sources: the shape's own geometry-dirty flag and the transform node's
/// bounds-stale bit, so style-only changes never trigger bounds work.
///
/// Mutators on stale ids are no-ops (returning `false` where they report
/// change); operations with validation return `Result` and never leave a
/// shape partially mutated.
pub struct Scene {
    pub(crate) xforms: XformTree,
    pub(crate) shapes: Vec<Option<ShapeData>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    sink: Option<Box<dyn ChangeSink>>,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let alive = self.shapes.iter().filter(|s| s.is_some()).count();
        f.debug_struct("Scene")
            .field("shapes_alive", &alive)
            .field("shapes_total", &self.shapes.len())
            .field("has_sink", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self {
            xforms: XformTree::new(),
            shapes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            sink: None,
        }
    }

    /// Install (or clear) the change observer.
    pub fn set_sink(&mut self, sink: Option<Box<dyn ChangeSink>>) {
        self.sink = sink;
    }

    fn fire(&mut self, id: ShapeId, kind: ChangeKind) {
        if let Some(sink) = self.sink.as_mut() {
            sink.changed(id, kind);
        }
    }

    // --- construction and removal ---

    fn add_shape(&mut self, geom: Geometry, xform: Xform) -> ShapeId {
        let node = self.xforms.insert(xform);
        let data = |generation: u32| ShapeData {
            generation,
            node,
            geom,
            fill: FillStyle::default(),
            stroke: StrokeStyle::default(),
            flags: ShapeFlags::default(),
            z_index: 0,
            visible: true,
            geom_dirty: true,
            aabox: AABox::EMPTY,
            saved: Vec::new(),
        };
        if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.shapes[idx] = Some(data(generation));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ShapeId uses 32-bit indices by design."
            )]
            ShapeId::new(idx as u32, generation)
        } else {
            self.shapes.push(Some(data(1)));
            self.generations.push(1);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ShapeId uses 32-bit indices by design."
            )]
            ShapeId::new((self.shapes.len() - 1) as u32, 1)
        }
    }

    /// Add a circle of `radius`, centered on its transform origin.
    pub fn add_circle(&mut self, radius: f64, xform: Xform) -> Result<ShapeId, SceneError> {
        if !radius.is_finite() {
            return Err(SceneError::InvalidDimension);
        }
        Ok(self.add_shape(Geometry::Circle { radius }, xform))
    }

    /// Add a `width` x `height` rectangle centered on its transform
    /// origin.
    pub fn add_rect(
        &mut self,
        width: f64,
        height: f64,
        xform: Xform,
    ) -> Result<ShapeId, SceneError> {
        if !width.is_finite() || !height.is_finite() {
            return Err(SceneError::InvalidDimension);
        }
        Ok(self.add_shape(Geometry::Rect { width, height }, xform))
    }

    /// Add an open polyline (at least 1 vertex).
    ///
    /// The transform pivot starts at the center of the vertex bounds, so
    /// rotation and scale act about the shape's visual middle.
    pub fn add_poly_line(&mut self, verts: Vec<Point>) -> Result<ShapeId, SceneError> {
        self.add_poly_impl(verts, false)
    }

    /// Add a closed polygon (at least 3 vertices).
    pub fn add_poly(&mut self, verts: Vec<Point>) -> Result<ShapeId, SceneError> {
        self.add_poly_impl(verts, true)
    }

    fn add_poly_impl(&mut self, verts: Vec<Point>, closed: bool) -> Result<ShapeId, SceneError> {
        let mut geom = PolyGeom::new(verts, closed)?;
        let pivot = geom.local_bounds().center().to_vec2();
        let xform = Xform {
            pivot,
            ..Xform::default()
        };
        Ok(self.add_shape(Geometry::Poly(geom), xform))
    }

    /// Remove a shape; its id and transform node become stale.
    pub fn remove_shape(&mut self, id: ShapeId) {
        if !self.is_alive(id) {
            return;
        }
        let node = self.shape(id).node;
        self.xforms.remove(node);
        self.shapes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Returns true if `id` refers to a live shape.
    pub fn is_alive(&self, id: ShapeId) -> bool {
        self.shapes
            .get(id.idx())
            .and_then(|s| s.as_ref())
            .map(|s| s.generation == id.1)
            .unwrap_or(false)
    }

    /// Iterate live shape ids in slot order.
    pub fn ids(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.shapes.iter().enumerate().filter_map(|(i, s)| {
            s.as_ref().map(|s| {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "ShapeId uses 32-bit indices by design."
                )]
                ShapeId::new(i as u32, s.generation)
            })
        })
    }

    /// Live shape ids sorted back-to-front by z-index (ties by slot).
    pub fn ids_by_z(&self) -> Vec<ShapeId> {
        let mut ids: Vec<ShapeId> = self.ids().collect();
        ids.sort_by_key(|id| (self.shape(*id).z_index, id.idx()));
        ids
    }

    // --- internal accessors ---

    pub(crate) fn shape(&self, id: ShapeId) -> &ShapeData {
        self.shapes[id.idx()].as_ref().expect("dangling ShapeId")
    }

    fn shape_mut(&mut self, id: ShapeId) -> &mut ShapeData {
        self.shapes[id.idx()].as_mut().expect("dangling ShapeId")
    }

    // --- transform ---

    /// Parent one shape's transform under another's.
    pub fn attach(&mut self, parent: ShapeId, child: ShapeId) -> Result<(), SceneError> {
        if !self.is_alive(parent) || !self.is_alive(child) {
            return Err(SceneError::StaleId);
        }
        let (p, c) = (self.shape(parent).node, self.shape(child).node);
        self.xforms.attach(p, c)?;
        self.fire(child, ChangeKind::Transform);
        Ok(())
    }

    /// Detach a shape's transform from its parent.
    pub fn detach(&mut self, id: ShapeId) {
        if !self.is_alive(id) {
            return;
        }
        let node = self.shape(id).node;
        self.xforms.detach(node);
        self.fire(id, ChangeKind::Transform);
    }

    fn xform_change(&mut self, id: ShapeId, apply: impl FnOnce(&mut XformTree, NodeId) -> bool) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let node = self.shape(id).node;
        let changed = apply(&mut self.xforms, node);
        if changed {
            self.fire(id, ChangeKind::Transform);
        }
        changed
    }

    /// Set the shape's position. Returns whether anything changed.
    pub fn set_position(&mut self, id: ShapeId, pos: Point) -> bool {
        self.xform_change(id, |t, n| t.set_position(n, pos))
    }

    /// Translate the shape's position by an offset.
    pub fn translate(&mut self, id: ShapeId, offset: Vec2) -> bool {
        self.xform_change(id, |t, n| t.translate(n, offset))
    }

    /// Set the shape's scale.
    pub fn set_scale(&mut self, id: ShapeId, scale: Vec2) -> bool {
        self.xform_change(id, |t, n| t.set_scale(n, scale))
    }

    /// Multiply the shape's scale component-wise.
    pub fn scale_by(&mut self, id: ShapeId, factor: Vec2) -> bool {
        self.xform_change(id, |t, n| t.scale_by(n, factor))
    }

    /// Set the shape's rotation in degrees.
    pub fn set_rotation(&mut self, id: ShapeId, deg: f64) -> bool {
        self.xform_change(id, |t, n| t.set_rotation(n, deg))
    }

    /// Add to the shape's rotation in degrees.
    pub fn rotate_by(&mut self, id: ShapeId, deg: f64) -> bool {
        self.xform_change(id, |t, n| t.rotate_by(n, deg))
    }

    /// Set the shape's pivot offset.
    pub fn set_pivot(&mut self, id: ShapeId, pivot: Vec2) -> bool {
        self.xform_change(id, |t, n| t.set_pivot(n, pivot))
    }

    /// The shape's local transform parameters.
    pub fn xform(&self, id: ShapeId) -> Option<Xform> {
        if !self.is_alive(id) {
            return None;
        }
        self.xforms.xform(self.shape(id).node).copied()
    }

    /// The shape's position relative to its parent.
    pub fn position(&self, id: ShapeId) -> Option<Point> {
        self.xform(id).map(|x| x.position)
    }

    /// The shape's scale.
    pub fn scale(&self, id: ShapeId) -> Option<Vec2> {
        self.xform(id).map(|x| x.scale)
    }

    /// The shape's rotation in degrees.
    pub fn rotation(&self, id: ShapeId) -> Option<f64> {
        self.xform(id).map(|x| x.rotation_deg)
    }

    /// The shape's pivot offset.
    pub fn pivot(&self, id: ShapeId) -> Option<Vec2> {
        self.xform(id).map(|x| x.pivot)
    }

    /// The shape's local matrix (lazily rebuilt).
    pub fn local_matrix(&mut self, id: ShapeId) -> Option<Affine> {
        if !self.is_alive(id) {
            return None;
        }
        let node = self.shape(id).node;
        self.xforms.local_matrix(node)
    }

    /// The shape's global matrix (lazily rebuilt along the parent chain).
    pub fn global_matrix(&mut self, id: ShapeId) -> Option<Affine> {
        if !self.is_alive(id) {
            return None;
        }
        let node = self.shape(id).node;
        self.xforms.global_matrix(node)
    }

    /// Where the shape's local origin lands in world space.
    pub fn world_position(&mut self, id: ShapeId) -> Option<Point> {
        if !self.is_alive(id) {
            return None;
        }
        let node = self.shape(id).node;
        self.xforms.world_position(node)
    }

    // --- geometry ---

    /// Borrow the shape's geometry.
    pub fn geometry(&self, id: ShapeId) -> Option<&Geometry> {
        if !self.is_alive(id) {
            return None;
        }
        Some(&self.shape(id).geom)
    }

    /// Set a circle's radius.
    pub fn set_radius(&mut self, id: ShapeId, radius: f64) -> Result<(), SceneError> {
        if !self.is_alive(id) {
            return Err(SceneError::StaleId);
        }
        if !radius.is_finite() {
            return Err(SceneError::InvalidDimension);
        }
        let changed = {
            let shape = self.shape_mut(id);
            match &mut shape.geom {
                Geometry::Circle { radius: r } => {
                    if *r == radius {
                        false
                    } else {
                        *r = radius;
                        shape.geom_dirty = true;
                        true
                    }
                }
                _ => return Err(SceneError::KindMismatch),
            }
        };
        if changed {
            self.fire(id, ChangeKind::Geometry);
        }
        Ok(())
    }

    /// Set a rectangle's width and height.
    pub fn set_rect_size(&mut self, id: ShapeId, width: f64, height: f64) -> Result<(), SceneError> {
        if !self.is_alive(id) {
            return Err(SceneError::StaleId);
        }
        if !width.is_finite() || !height.is_finite() {
            return Err(SceneError::InvalidDimension);
        }
        let changed = {
            let shape = self.shape_mut(id);
            match &mut shape.geom {
                Geometry::Rect { width: w, height: h } => {
                    if *w == width && *h == height {
                        false
                    } else {
                        *w = width;
                        *h = height;
                        shape.geom_dirty = true;
                        true
                    }
                }
                _ => return Err(SceneError::KindMismatch),
            }
        };
        if changed {
            self.fire(id, ChangeKind::Geometry);
        }
        Ok(())
    }

    /// Untransformed width/height of the shape.
    pub fn dimensions(&mut self, id: ShapeId) -> Option<Vec2> {
        if !self.is_alive(id) {
            return None;
        }
        Some(self.shape_mut(id).geom.dimensions())
    }

    /// The shape's world-space bounding box, recomputed only when the
    /// geometry or the global transform changed since the last read.
    pub fn bounds(&mut self, id: ShapeId) -> Option<AABox> {
        if !self.is_alive(id) {
            return None;
        }
        let node = self.shape(id).node;
        let global = self.xforms.global_matrix(node)?;
        let stale = self.xforms.take_bounds_stale(node);

        let mut recentered_pivot = None;
        let result = {
            let shape = self.shapes[id.idx()].as_mut().expect("dangling ShapeId");
            if shape.geom_dirty || stale {
                shape.aabox = shape.geom.bounds(global);
                if shape.geom_dirty {
                    // Geometry edits re-center the pivot at the vertex
                    // bounds so subsequent rotate/scale act about the
                    // shape's middle.
                    if let Geometry::Poly(p) = &mut shape.geom {
                        recentered_pivot = Some(p.local_bounds().center().to_vec2());
                    }
                    shape.geom_dirty = false;
                }
            }
            shape.aabox
        };
        if let Some(pivot) = recentered_pivot
            && self.xforms.set_pivot(node, pivot)
        {
            self.fire(id, ChangeKind::Transform);
        }
        Some(result)
    }

    // --- vertex editing ---

    fn poly(&self, id: ShapeId) -> Result<&PolyGeom, SceneError> {
        if !self.is_alive(id) {
            return Err(SceneError::StaleId);
        }
        match &self.shape(id).geom {
            Geometry::Poly(p) => Ok(p),
            _ => Err(SceneError::KindMismatch),
        }
    }

    fn poly_mut(&mut self, id: ShapeId) -> Result<&mut PolyGeom, SceneError> {
        if !self.is_alive(id) {
            return Err(SceneError::StaleId);
        }
        match &mut self.shape_mut(id).geom {
            Geometry::Poly(p) => Ok(p),
            _ => Err(SceneError::KindMismatch),
        }
    }

    /// The shape's vertices (polylines and polygons).
    pub fn verts(&self, id: ShapeId) -> Option<&[Point]> {
        self.poly(id).ok().map(|p| p.verts())
    }

    /// Number of vertices, for polylines and polygons.
    pub fn num_verts(&self, id: ShapeId) -> Option<usize> {
        self.poly(id).ok().map(|p| p.len())
    }

    /// Centroid of a closed polygon, or `None` when the signed area is
    /// degenerate.
    pub fn centroid(&self, id: ShapeId) -> Option<Point> {
        self.poly(id).ok().and_then(|p| p.centroid(Tolerance::DEFAULT))
    }

    /// Flatten any local transform into the vertex data and reset the
    /// node to identity.
    ///
    /// Vertex edits arrive in world coordinates; re-deriving pivots and
    /// transforms around an edited vertex list is error-prone, so the list
    /// is collapsed to its effective coordinates first and the transform
    /// parameters start over.
    fn collapse_verts(&mut self, id: ShapeId) -> Result<bool, SceneError> {
        let node = self.shape(id).node;
        let local = self.xforms.local_matrix(node).ok_or(SceneError::StaleId)?;
        if affine::approx_eq(local, Affine::IDENTITY, Tolerance::DEFAULT) {
            return Ok(false);
        }
        let shape = self.shapes[id.idx()].as_mut().expect("dangling ShapeId");
        if let Geometry::Poly(p) = &mut shape.geom {
            p.apply(local);
        }
        self.xforms.reset(node);
        Ok(true)
    }

    fn after_vert_edit(&mut self, id: ShapeId, collapsed: bool) {
        self.shape_mut(id).geom_dirty = true;
        if collapsed {
            self.fire(id, ChangeKind::Transform);
        }
        self.fire(id, ChangeKind::Geometry);
    }

    /// Insert a vertex before `index` (clamped to the list length).
    /// Returns the index actually used.
    pub fn insert_vert(&mut self, id: ShapeId, index: usize, pos: Point) -> Result<usize, SceneError> {
        let _ = self.poly(id)?;
        let collapsed = self.collapse_verts(id)?;
        let idx = self.poly_mut(id)?.insert(index, pos);
        self.after_vert_edit(id, collapsed);
        Ok(idx)
    }

    /// Append a vertex at the end of the list. Returns its index.
    pub fn append_vert(&mut self, id: ShapeId, pos: Point) -> Result<usize, SceneError> {
        let len = self.poly(id)?.len();
        self.insert_vert(id, len, pos)
    }

    /// Remove the vertex at `index`.
    ///
    /// Fails before mutating anything when the index is out of range or a
    /// closed polygon would drop below its minimum vertex count.
    pub fn remove_vert(&mut self, id: ShapeId, index: usize) -> Result<(), SceneError> {
        let p = self.poly(id)?;
        if index >= p.len() {
            return Err(SceneError::VertexIndexOutOfRange {
                index,
                len: p.len(),
            });
        }
        if p.closed() && p.len() <= POLY_MIN_VERTS {
            return Err(SceneError::TooFewVertices {
                min: POLY_MIN_VERTS,
                got: p.len() - 1,
            });
        }
        let collapsed = self.collapse_verts(id)?;
        self.poly_mut(id)?.remove(index)?;
        self.after_vert_edit(id, collapsed);
        Ok(())
    }

    /// Move the vertex at `index` to an absolute position.
    pub fn set_vert_position(&mut self, id: ShapeId, index: usize, pos: Point) -> Result<(), SceneError> {
        let p = self.poly(id)?;
        if index >= p.len() {
            return Err(SceneError::VertexIndexOutOfRange {
                index,
                len: p.len(),
            });
        }
        let collapsed = self.collapse_verts(id)?;
        let moved = self.poly_mut(id)?.set_vert(index, pos)?;
        if moved || collapsed {
            self.after_vert_edit(id, collapsed);
        }
        Ok(())
    }

    /// Translate the vertex at `index` by an offset.
    pub fn translate_vert(&mut self, id: ShapeId, index: usize, delta: Vec2) -> Result<(), SceneError> {
        let p = self.poly(id)?;
        if index >= p.len() {
            return Err(SceneError::VertexIndexOutOfRange {
                index,
                len: p.len(),
            });
        }
        if delta.x == 0.0 && delta.y == 0.0 {
            return Ok(());
        }
        let collapsed = self.collapse_verts(id)?;
        let p = self.poly_mut(id)?;
        let current = p.verts()[index];
        p.set_vert(index, current + delta)?;
        self.after_vert_edit(id, collapsed);
        Ok(())
    }

    // --- style, order, visibility ---

    /// The shape's fill style.
    pub fn fill(&self, id: ShapeId) -> Option<&FillStyle> {
        if !self.is_alive(id) {
            return None;
        }
        Some(&self.shape(id).fill)
    }

    /// Replace the fill style.
    pub fn set_fill(&mut self, id: ShapeId, fill: FillStyle) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let shape = self.shape_mut(id);
        if shape.fill == fill {
            return false;
        }
        shape.fill = fill;
        self.fire(id, ChangeKind::Style);
        true
    }

    /// The shape's stroke style.
    pub fn stroke(&self, id: ShapeId) -> Option<&StrokeStyle> {
        if !self.is_alive(id) {
            return None;
        }
        Some(&self.shape(id).stroke)
    }

    /// Replace the stroke style.
    pub fn set_stroke(&mut self, id: ShapeId, stroke: StrokeStyle) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let shape = self.shape_mut(id);
        if shape.stroke == stroke {
            return false;
        }
        shape.stroke = stroke;
        self.fire(id, ChangeKind::Style);
        true
    }

    /// The shape's z-index.
    pub fn z_index(&self, id: ShapeId) -> Option<i32> {
        if !self.is_alive(id) {
            return None;
        }
        Some(self.shape(id).z_index)
    }

    /// Set the z-index (draw order).
    pub fn set_z_index(&mut self, id: ShapeId, z: i32) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let shape = self.shape_mut(id);
        if shape.z_index == z {
            return false;
        }
        shape.z_index = z;
        self.fire(id, ChangeKind::Order);
        true
    }

    /// Whether the shape is effectively visible: the visibility flag is
    /// set *and* at least one of fill/stroke would draw.
    pub fn is_visible(&self, id: ShapeId) -> Option<bool> {
        if !self.is_alive(id) {
            return None;
        }
        let s = self.shape(id);
        Some(s.visible && (s.fill.is_visible() || s.stroke.is_visible()))
    }

    /// The raw visibility flag, independent of styles.
    pub fn visible_flag(&self, id: ShapeId) -> Option<bool> {
        if !self.is_alive(id) {
            return None;
        }
        Some(self.shape(id).visible)
    }

    /// Set the visibility flag.
    pub fn set_visible(&mut self, id: ShapeId, visible: bool) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let shape = self.shape_mut(id);
        if shape.visible == visible {
            return false;
        }
        shape.visible = visible;
        self.fire(id, ChangeKind::Visibility);
        true
    }

    /// The shape's interaction flags.
    pub fn flags(&self, id: ShapeId) -> Option<ShapeFlags> {
        if !self.is_alive(id) {
            return None;
        }
        Some(self.shape(id).flags)
    }

    /// Replace the interaction flags.
    pub fn set_flags(&mut self, id: ShapeId, flags: ShapeFlags) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let shape = self.shape_mut(id);
        if shape.flags == flags {
            return false;
        }
        shape.flags = flags;
        true
    }

    // --- save / restore ---

    /// Push the current style state (fill, stroke, z-index) onto the
    /// shape's state stack.
    pub fn save(&mut self, id: ShapeId) {
        if !self.is_alive(id) {
            return;
        }
        let shape = self.shape_mut(id);
        let state = SavedState {
            fill: shape.fill.clone(),
            stroke: shape.stroke.clone(),
            z_index: shape.z_index,
        };
        shape.saved.push(state);
    }

    /// Pop and re-apply the most recently saved style state.
    pub fn restore(&mut self, id: ShapeId) {
        if !self.is_alive(id) {
            return;
        }
        let Some(state) = self.shape_mut(id).saved.pop() else {
            return;
        };
        self.set_fill(id, state.fill);
        self.set_stroke(id, state.stroke);
        self.set_z_index(id, state.z_index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::ChangeKind;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    #[test]
    fn rect_bounds_scenarios() {
        let mut scene = Scene::new();
        let rect = scene.add_rect(10.0, 10.0, Xform::default()).unwrap();
        let b = scene.bounds(rect).unwrap();
        assert!(b.approx_eq(&AABox::new(-5.0, -5.0, 5.0, 5.0), Tolerance::DEFAULT));

        scene.set_rotation(rect, 90.0);
        let b = scene.bounds(rect).unwrap();
        assert!(
            b.approx_eq(&AABox::new(-5.0, -5.0, 5.0, 5.0), Tolerance::DEFAULT),
            "a square is invariant under 90 degree rotation, got {b:?}"
        );

        scene.set_rotation(rect, 0.0);
        scene.translate(rect, Vec2::new(3.0, 4.0));
        let b = scene.bounds(rect).unwrap();
        assert!(b.approx_eq(&AABox::new(-2.0, -1.0, 8.0, 9.0), Tolerance::DEFAULT));
    }

    #[test]
    fn bounds_cache_skips_clean_reads() {
        let mut scene = Scene::new();
        let rect = scene.add_rect(4.0, 2.0, Xform::default()).unwrap();
        let a = scene.bounds(rect).unwrap();
        let b = scene.bounds(rect).unwrap();
        assert_eq!(a, b);

        // A style change must not invalidate bounds.
        scene.set_fill(
            rect,
            FillStyle {
                color: Some(crate::style::Rgba::rgb(10, 20, 30)),
                opacity: 1.0,
            },
        );
        let c = scene.bounds(rect).unwrap();
        assert_eq!(a, c);
    }

    #[test]
    fn poly_dimensions_and_pivot() {
        let mut scene = Scene::new();
        let poly = scene
            .add_poly(vec![
                Point::new(0.0, 0.0),
                Point::new(4.0, 0.0),
                Point::new(4.0, 3.0),
                Point::new(0.0, 3.0),
            ])
            .unwrap();
        assert_eq!(scene.dimensions(poly), Some(Vec2::new(4.0, 3.0)));
        // The pivot starts at the vertex-bounds center.
        assert_eq!(scene.pivot(poly), Some(Vec2::new(2.0, 1.5)));
        let b = scene.bounds(poly).unwrap();
        assert!(b.approx_eq(&AABox::new(0.0, 0.0, 4.0, 3.0), Tolerance::DEFAULT));
    }

    #[test]
    fn poly_rotates_about_its_pivot() {
        let mut scene = Scene::new();
        let poly = scene
            .add_poly(vec![
                Point::new(0.0, 0.0),
                Point::new(4.0, 0.0),
                Point::new(4.0, 3.0),
                Point::new(0.0, 3.0),
            ])
            .unwrap();
        scene.set_rotation(poly, 180.0);
        let b = scene.bounds(poly).unwrap();
        // Rotating the box about its own center maps it onto itself.
        assert!(b.approx_eq(&AABox::new(0.0, 0.0, 4.0, 3.0), Tolerance::DEFAULT), "got {b:?}");
    }

    #[test]
    fn vertex_edits_collapse_transforms_and_recenter() {
        let mut scene = Scene::new();
        let poly = scene
            .add_poly(vec![
                Point::new(0.0, 0.0),
                Point::new(4.0, 0.0),
                Point::new(4.0, 4.0),
            ])
            .unwrap();
        scene.translate(poly, Vec2::new(10.0, 0.0));
        let _ = scene.bounds(poly);

        // The edit lands in world coordinates; the translation collapses
        // into the vertex data.
        scene.append_vert(poly, Point::new(10.0, 4.0)).unwrap();
        assert_eq!(scene.position(poly), Some(Point::ORIGIN));
        let verts = scene.verts(poly).unwrap();
        assert_eq!(verts[0], Point::new(10.0, 0.0));
        assert_eq!(verts[3], Point::new(10.0, 4.0));

        let b = scene.bounds(poly).unwrap();
        assert!(b.approx_eq(&AABox::new(10.0, 0.0, 14.0, 4.0), Tolerance::DEFAULT), "got {b:?}");
        // Pivot re-centers on the edited vertex bounds.
        assert_eq!(scene.pivot(poly), Some(Vec2::new(12.0, 2.0)));
    }

    #[test]
    fn validation_precedes_mutation() {
        let mut scene = Scene::new();
        assert_eq!(
            scene.add_circle(f64::NAN, Xform::default()).unwrap_err(),
            SceneError::InvalidDimension
        );
        let tri = scene
            .add_poly(vec![
                Point::new(0.0, 0.0),
                Point::new(4.0, 0.0),
                Point::new(0.0, 4.0),
            ])
            .unwrap();
        scene.rotate_by(tri, 45.0);
        let err = scene.remove_vert(tri, 0).unwrap_err();
        assert!(matches!(err, SceneError::TooFewVertices { .. }));
        // The failed removal must not have collapsed the transform.
        assert_eq!(scene.rotation(tri), Some(45.0));
        assert_eq!(scene.num_verts(tri), Some(3));

        let circle = scene.add_circle(5.0, Xform::default()).unwrap();
        assert_eq!(
            scene.insert_vert(circle, 0, Point::ORIGIN).unwrap_err(),
            SceneError::KindMismatch
        );
    }

    #[derive(Default)]
    struct Recorder(Vec<(ShapeId, ChangeKind)>);
    struct SharedRecorder(Rc<RefCell<Recorder>>);
    impl ChangeSink for SharedRecorder {
        fn changed(&mut self, shape: ShapeId, kind: ChangeKind) {
            self.0.borrow_mut().0.push((shape, kind));
        }
    }

    #[test]
    fn change_sink_sees_mutations() {
        let log = Rc::new(RefCell::new(Recorder::default()));
        let mut scene = Scene::new();
        scene.set_sink(Some(Box::new(SharedRecorder(Rc::clone(&log)))));

        let rect = scene.add_rect(2.0, 2.0, Xform::default()).unwrap();
        scene.set_position(rect, Point::new(1.0, 1.0));
        scene.set_position(rect, Point::new(1.0, 1.0)); // no-op
        scene.set_z_index(rect, 3);
        scene.set_visible(rect, false);
        scene.set_rect_size(rect, 2.0, 5.0).unwrap();

        let events = log.borrow().0.clone();
        assert_eq!(
            events,
            vec![
                (rect, ChangeKind::Transform),
                (rect, ChangeKind::Order),
                (rect, ChangeKind::Visibility),
                (rect, ChangeKind::Geometry),
            ]
        );
    }

    #[test]
    fn save_restore_round_trips_style() {
        let mut scene = Scene::new();
        let rect = scene.add_rect(2.0, 2.0, Xform::default()).unwrap();
        scene.set_z_index(rect, 7);
        scene.save(rect);

        scene.set_z_index(rect, 99);
        scene.set_fill(
            rect,
            FillStyle {
                color: Some(crate::style::Rgba::rgb(1, 2, 3)),
                opacity: 0.5,
            },
        );
        scene.restore(rect);
        assert_eq!(scene.z_index(rect), Some(7));
        assert_eq!(scene.fill(rect).unwrap().color, None);
    }

    #[test]
    fn stale_ids_are_inert() {
        let mut scene = Scene::new();
        let rect = scene.add_rect(2.0, 2.0, Xform::default()).unwrap();
        scene.remove_shape(rect);
        assert!(!scene.is_alive(rect));
        assert_eq!(scene.bounds(rect), None);
        assert!(!scene.set_position(rect, Point::new(1.0, 1.0)));
        assert_eq!(
            scene.set_radius(rect, 1.0).unwrap_err(),
            SceneError::StaleId
        );

        let again = scene.add_rect(2.0, 2.0, Xform::default()).unwrap();
        assert!(scene.is_alive(again));
        assert!(!scene.is_alive(rect), "reused slot must not revive old id");
    }
}
