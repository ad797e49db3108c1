// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: node identifiers, flags, and local
//! transform parameters.

use kurbo::{Point, Vec2};

/// Identifier for a transform node in the arena (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Interaction capabilities of a shape, consumed by the editing layer.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ShapeFlags: u8 {
        /// Shape can be dragged to a new position.
        const MOVABLE   = 0b0000_0001;
        /// Shape exposes scale handles.
        const SCALABLE  = 0b0000_0010;
        /// Shape exposes the rotation affordance on its corner handles.
        const ROTATABLE = 0b0000_0100;
    }
}

impl Default for ShapeFlags {
    fn default() -> Self {
        Self::MOVABLE | Self::SCALABLE | Self::ROTATABLE
    }
}

/// Local transform parameters of a node, relative to its parent.
///
/// The local matrix is built as `T(position + pivot) · R(rotation) ·
/// S(scale) · T(-pivot)`: rotation and scale apply about the pivot offset
/// rather than the node origin. Rotation is stored in degrees and
/// converted to radians only when the matrix is rebuilt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Xform {
    /// Position relative to the parent space.
    pub position: Point,
    /// Non-uniform scale.
    pub scale: Vec2,
    /// Rotation in degrees, kept normalized within (-360, 360).
    pub rotation_deg: f64,
    /// Offset from the origin about which rotation and scale apply.
    pub pivot: Vec2,
}

impl Default for Xform {
    fn default() -> Self {
        Self {
            position: Point::ORIGIN,
            scale: Vec2::new(1.0, 1.0),
            rotation_deg: 0.0,
            pivot: Vec2::ZERO,
        }
    }
}
