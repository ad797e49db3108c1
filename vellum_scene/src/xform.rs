// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena of hierarchical 2D transform nodes with lazy matrix caches.

use alloc::vec::Vec;
use kurbo::{Affine, Point, Vec2};

use crate::error::SceneError;
use crate::types::{NodeId, Xform};

/// Build the local matrix for a set of transform parameters.
///
/// Rotation and scale apply about the pivot: `T(position + pivot) ·
/// R(rotation) · S(scale) · T(-pivot)`. Degrees convert to radians here,
/// at rebuild time, not at storage time.
pub(crate) fn local_matrix_of(x: &Xform) -> Affine {
    Affine::translate(x.position.to_vec2() + x.pivot)
        * Affine::rotate(x.rotation_deg.to_radians())
        * Affine::scale_non_uniform(x.scale.x, x.scale.y)
        * Affine::translate(-x.pivot)
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: Xform,
    local_matrix: Affine,
    global_matrix: Affine,
    local_dirty: bool,
    global_dirty: bool,
    bounds_stale: bool,
}

impl Node {
    fn new(generation: u32, local: Xform) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            local,
            local_matrix: Affine::IDENTITY,
            global_matrix: Affine::IDENTITY,
            local_dirty: true,
            global_dirty: true,
            bounds_stale: true,
        }
    }
}

/// Arena of transform nodes addressed by generational [`NodeId`] handles.
///
/// Parent/child links are stored as handle lists, so the hierarchy carries
/// no ownership cycles and reparenting is O(1) plus the child-list edit.
///
/// Matrices are cached and recomputed lazily: reading
/// [`XformTree::local_matrix`] rebuilds iff a parameter changed since the
/// last read, and [`XformTree::global_matrix`] additionally recomposes
/// against the parent chain iff this node or an ancestor changed. Every
/// mutation eagerly marks the whole descendant subtree's global matrices
/// dirty, trading some redundant marking for an O(1) validity check on
/// read. Repeated reads without intervening mutation return bit-identical
/// cached values.
///
/// ## Example
///
/// ```rust
/// use kurbo::Point;
/// use vellum_scene::{Xform, XformTree};
///
/// let mut tree = XformTree::new();
/// let parent = tree.insert(Xform::default());
/// let child = tree.insert(Xform {
///     position: Point::new(10.0, 0.0),
///     ..Xform::default()
/// });
/// tree.attach(parent, child).unwrap();
///
/// // Rotating the parent is visible through the child's global matrix
/// // without touching the child.
/// tree.set_rotation(parent, 90.0);
/// let p = tree.global_matrix(child).unwrap() * Point::ORIGIN;
/// assert!((p.x).abs() < 1e-9 && (p.y - 10.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug, Default)]
pub struct XformTree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl XformTree {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new unparented node with the given parameters.
    pub fn insert(&mut self, local: Xform) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, local));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, local)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Remove a node and its whole subtree. Ids into the subtree become
    /// stale immediately.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.generation())
            .unwrap_or(false)
    }

    /// Returns the parent of a node if live, or `None` for roots or stale
    /// ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        if !self.is_alive(id) {
            return None;
        }
        self.node(id).parent
    }

    /// Get the children of a node, or an empty slice if the id is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        if !self.is_alive(id) {
            return &[];
        }
        &self.node(id).children
    }

    /// Attach `child` under `parent`, detaching it from any prior parent
    /// first. Attaching a node that is already a child of `parent` is a
    /// no-op.
    ///
    /// Fails with [`SceneError::WouldCycle`] when `parent` is `child` or
    /// one of its descendants, and [`SceneError::StaleId`] when either id
    /// is stale.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        if !self.is_alive(parent) || !self.is_alive(child) {
            return Err(SceneError::StaleId);
        }
        if self.node(child).parent == Some(parent) {
            return Ok(());
        }
        // Walk up from the prospective parent; finding `child` there means
        // the attach would close a loop.
        let mut cursor = Some(parent);
        while let Some(n) = cursor {
            if n == child {
                return Err(SceneError::WouldCycle);
            }
            cursor = self.node(n).parent;
        }
        if let Some(old) = self.node(child).parent {
            self.unlink_parent(child, old);
        }
        self.link_parent(child, parent);
        self.mark_global_dirty(child);
        Ok(())
    }

    /// Detach a node from its parent, making it a root. No-op for roots
    /// and stale ids.
    pub fn detach(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
            self.mark_global_dirty(id);
        }
    }

    // --- parameter access ---

    /// The local transform parameters, if live.
    pub fn xform(&self, id: NodeId) -> Option<&Xform> {
        if !self.is_alive(id) {
            return None;
        }
        Some(&self.node(id).local)
    }

    /// Set the position. Returns whether anything changed.
    pub fn set_position(&mut self, id: NodeId, pos: Point) -> bool {
        self.mutate(id, |x| {
            if x.position == pos {
                return false;
            }
            x.position = pos;
            true
        })
    }

    /// Translate the position by an offset. Zero offsets are a no-op.
    pub fn translate(&mut self, id: NodeId, offset: Vec2) -> bool {
        self.mutate(id, |x| {
            if offset.x == 0.0 && offset.y == 0.0 {
                return false;
            }
            x.position += offset;
            true
        })
    }

    /// Set the scale. Returns whether anything changed.
    pub fn set_scale(&mut self, id: NodeId, scale: Vec2) -> bool {
        self.mutate(id, |x| {
            if x.scale == scale {
                return false;
            }
            x.scale = scale;
            true
        })
    }

    /// Multiply the scale component-wise. `(1, 1)` is a no-op.
    pub fn scale_by(&mut self, id: NodeId, factor: Vec2) -> bool {
        self.mutate(id, |x| {
            if factor.x == 1.0 && factor.y == 1.0 {
                return false;
            }
            x.scale = Vec2::new(x.scale.x * factor.x, x.scale.y * factor.y);
            true
        })
    }

    /// Set the rotation in degrees, normalized into (-360, 360).
    pub fn set_rotation(&mut self, id: NodeId, deg: f64) -> bool {
        let deg = deg % 360.0;
        self.mutate(id, |x| {
            if x.rotation_deg == deg {
                return false;
            }
            x.rotation_deg = deg;
            true
        })
    }

    /// Add to the rotation in degrees; the sum is normalized into
    /// (-360, 360). Zero is a no-op.
    pub fn rotate_by(&mut self, id: NodeId, deg: f64) -> bool {
        self.mutate(id, |x| {
            if deg == 0.0 {
                return false;
            }
            x.rotation_deg = (x.rotation_deg + deg) % 360.0;
            true
        })
    }

    /// Set the pivot offset. Returns whether anything changed.
    pub fn set_pivot(&mut self, id: NodeId, pivot: Vec2) -> bool {
        self.mutate(id, |x| {
            if x.pivot == pivot {
                return false;
            }
            x.pivot = pivot;
            true
        })
    }

    /// Reset every parameter to the identity transform.
    pub fn reset(&mut self, id: NodeId) -> bool {
        self.mutate(id, |x| {
            let identity = Xform::default();
            if *x == identity {
                return false;
            }
            *x = identity;
            true
        })
    }

    // --- matrix access ---

    /// The node's local matrix, rebuilding it if a parameter changed.
    pub fn local_matrix(&mut self, id: NodeId) -> Option<Affine> {
        if !self.is_alive(id) {
            return None;
        }
        Some(self.update_local(id))
    }

    /// The node's global matrix: its local matrix composed under every
    /// ancestor. Rebuilds lazily along the dirty ancestor chain.
    pub fn global_matrix(&mut self, id: NodeId) -> Option<Affine> {
        if !self.is_alive(id) {
            return None;
        }
        Some(self.update_global(id))
    }

    /// Where the node's local origin lands in world space.
    pub fn world_position(&mut self, id: NodeId) -> Option<Point> {
        let m = self.global_matrix(id)?;
        let [.., tx, ty] = m.as_coeffs();
        Some(Point::new(tx, ty))
    }

    /// Read and clear the node's bounds-stale bit.
    ///
    /// The bit is set whenever either cached matrix is actually
    /// recomputed; shape bounds caches key their invalidation off it. Call
    /// after [`XformTree::global_matrix`] so pending recomputes have
    /// happened.
    pub fn take_bounds_stale(&mut self, id: NodeId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let n = self.node_mut(id);
        let stale = n.bounds_stale;
        n.bounds_stale = false;
        stale
    }

    // --- internals ---

    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    /// Apply `f` to the node's parameters; when it reports a change, mark
    /// this node's matrices and every descendant's global matrix dirty.
    fn mutate(&mut self, id: NodeId, f: impl FnOnce(&mut Xform) -> bool) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let n = self.node_mut(id);
        if !f(&mut n.local) {
            return false;
        }
        n.local_dirty = true;
        self.mark_global_dirty(id);
        true
    }

    /// Eagerly mark `id` and all descendants global-dirty.
    fn mark_global_dirty(&mut self, id: NodeId) {
        let children = {
            let n = self.node_mut(id);
            n.global_dirty = true;
            n.children.clone()
        };
        for c in children {
            self.mark_global_dirty(c);
        }
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }

    fn update_local(&mut self, id: NodeId) -> Affine {
        let n = self.node_mut(id);
        if n.local_dirty {
            n.local_matrix = local_matrix_of(&n.local);
            n.local_dirty = false;
            n.bounds_stale = true;
        }
        n.local_matrix
    }

    fn update_global(&mut self, id: NodeId) -> Affine {
        let (dirty, parent) = {
            let n = self.node(id);
            (n.local_dirty || n.global_dirty, n.parent)
        };
        if !dirty {
            return self.node(id).global_matrix;
        }
        let local = self.update_local(id);
        let global = match parent {
            Some(p) => self.update_global(p) * local,
            None => local,
        };
        let n = self.node_mut(id);
        n.global_matrix = global;
        n.global_dirty = false;
        n.bounds_stale = true;
        global
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_geom::{Tolerance, affine};

    fn tree_with_chain() -> (XformTree, NodeId, NodeId, NodeId) {
        let mut tree = XformTree::new();
        let root = tree.insert(Xform::default());
        let child = tree.insert(Xform::default());
        let grandchild = tree.insert(Xform::default());
        tree.attach(root, child).unwrap();
        tree.attach(child, grandchild).unwrap();
        (tree, root, child, grandchild)
    }

    #[test]
    fn local_matrix_composition_order() {
        let mut tree = XformTree::new();
        let id = tree.insert(Xform {
            position: Point::new(10.0, 0.0),
            scale: Vec2::new(2.0, 2.0),
            rotation_deg: 90.0,
            pivot: Vec2::ZERO,
        });
        let m = tree.local_matrix(id).unwrap();
        // Scale happens in local axes before the rotation: (1, 0) scales
        // to (2, 0), rotates to (0, 2), then translates.
        let p = m * Point::new(1.0, 0.0);
        assert!((p.x - 10.0).abs() < 1e-9 && (p.y - 2.0).abs() < 1e-9, "got {p:?}");
    }

    #[test]
    fn pivot_offsets_the_rotation_center() {
        let mut tree = XformTree::new();
        let id = tree.insert(Xform {
            rotation_deg: 180.0,
            pivot: Vec2::new(1.0, 0.0),
            ..Xform::default()
        });
        let m = tree.local_matrix(id).unwrap();
        // The pivot point itself is fixed under rotation about it.
        let p = m * Point::new(1.0, 0.0);
        assert!((p.x - 1.0).abs() < 1e-9 && p.y.abs() < 1e-9, "got {p:?}");
        // The origin swings around the pivot to (2, 0).
        let o = m * Point::ORIGIN;
        assert!((o.x - 2.0).abs() < 1e-9 && o.y.abs() < 1e-9, "got {o:?}");
    }

    #[test]
    fn ancestor_mutation_reaches_grandchild_lazily() {
        let (mut tree, root, _child, grandchild) = tree_with_chain();
        let before = tree.global_matrix(grandchild).unwrap();
        assert!(affine::approx_eq(before, Affine::IDENTITY, Tolerance::DEFAULT));

        tree.set_rotation(root, 90.0);
        // No reads of the intermediate nodes: the grandchild alone must
        // observe the new ancestor rotation.
        let after = tree.global_matrix(grandchild).unwrap();
        assert!(affine::approx_eq(
            after,
            Affine::rotate(core::f64::consts::FRAC_PI_2),
            Tolerance::DEFAULT
        ));
    }

    #[test]
    fn repeated_reads_are_bit_identical() {
        let (mut tree, root, _child, grandchild) = tree_with_chain();
        tree.set_rotation(root, 33.0);
        tree.translate(grandchild, Vec2::new(1.5, -2.5));
        let a = tree.global_matrix(grandchild).unwrap();
        let b = tree.global_matrix(grandchild).unwrap();
        assert_eq!(a.as_coeffs(), b.as_coeffs(), "cache hit must not recompute");
    }

    #[test]
    fn reparent_detaches_first_and_dirties() {
        let mut tree = XformTree::new();
        let a = tree.insert(Xform {
            position: Point::new(100.0, 0.0),
            ..Xform::default()
        });
        let b = tree.insert(Xform {
            position: Point::new(0.0, 50.0),
            ..Xform::default()
        });
        let child = tree.insert(Xform::default());
        tree.attach(a, child).unwrap();
        let wp = tree.world_position(child).unwrap();
        assert_eq!(wp, Point::new(100.0, 0.0));

        tree.attach(b, child).unwrap();
        assert_eq!(tree.parent_of(child), Some(b));
        assert!(!tree.children_of(a).contains(&child));
        let wp = tree.world_position(child).unwrap();
        assert_eq!(wp, Point::new(0.0, 50.0));

        // Re-attaching to the current parent changes nothing.
        tree.attach(b, child).unwrap();
        assert_eq!(tree.children_of(b), &[child]);
    }

    #[test]
    fn attach_rejects_cycles() {
        let (mut tree, root, child, grandchild) = tree_with_chain();
        assert_eq!(tree.attach(grandchild, root), Err(SceneError::WouldCycle));
        assert_eq!(tree.attach(child, root), Err(SceneError::WouldCycle));
        assert_eq!(tree.attach(root, root), Err(SceneError::WouldCycle));
        // The failed attach must leave the hierarchy intact.
        assert_eq!(tree.parent_of(child), Some(root));
        assert_eq!(tree.parent_of(root), None);
    }

    #[test]
    fn rotation_normalizes_into_open_range() {
        let mut tree = XformTree::new();
        let id = tree.insert(Xform::default());
        tree.set_rotation(id, 725.0);
        assert_eq!(tree.xform(id).unwrap().rotation_deg, 5.0);
        tree.set_rotation(id, -450.0);
        assert_eq!(tree.xform(id).unwrap().rotation_deg, -90.0);
        tree.rotate_by(id, -280.0);
        assert_eq!(tree.xform(id).unwrap().rotation_deg, -10.0);
    }

    #[test]
    fn noop_setters_do_not_dirty() {
        let mut tree = XformTree::new();
        let id = tree.insert(Xform::default());
        let _ = tree.global_matrix(id);
        assert!(tree.take_bounds_stale(id), "first read computes");

        assert!(!tree.translate(id, Vec2::ZERO));
        assert!(!tree.scale_by(id, Vec2::new(1.0, 1.0)));
        assert!(!tree.rotate_by(id, 0.0));
        assert!(!tree.set_position(id, Point::ORIGIN));
        let _ = tree.global_matrix(id);
        assert!(!tree.take_bounds_stale(id), "no-ops must not invalidate");
    }

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut tree = XformTree::new();
        let a = tree.insert(Xform::default());
        let child = tree.insert(Xform::default());
        tree.attach(a, child).unwrap();

        tree.remove(a);
        assert!(!tree.is_alive(a));
        assert!(!tree.is_alive(child), "subtree removal is recursive");

        let b = tree.insert(Xform::default());
        assert!(tree.is_alive(b));
        assert!(!tree.is_alive(a));
        if a.0 == b.0 {
            assert!(b.1 > a.1, "generation must increase on reuse");
        }
        assert_eq!(tree.global_matrix(a), None, "stale ids expose nothing");
    }
}
