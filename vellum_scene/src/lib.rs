// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vellum Scene: a transform-tree scene of editable 2D shapes.
//!
//! This crate is the stateful core of Vellum. It owns:
//!
//! - [`XformTree`]: an arena of transform nodes addressed by generational
//!   [`NodeId`] handles. Each node carries position, non-uniform scale,
//!   rotation (degrees), and a pivot offset; local and global matrices are
//!   cached behind dirty flags and recomputed lazily on read. Mutating a
//!   node eagerly marks every descendant's global matrix dirty, so
//!   validity checks on read are O(1).
//! - [`Scene`]: generational shape slots over the arena. A shape composes
//!   a transform node, kind-specific geometry (circle, rect, polyline,
//!   polygon), independent [`FillStyle`]/[`StrokeStyle`] capability
//!   structs, a z-index, and a cached world-space [`AABox`]. Bounds are
//!   recomputed only when the shape's geometry or its global transform
//!   actually changed; polygon bounds visit only convex-hull vertices.
//!
//! ## Dirty tracking
//!
//! Two independent flag families gate recomputation. Transform mutations
//! set `local`/`global` matrix dirty bits (the matrices rebuild on the
//! next read); geometry mutations set the shape's own geometry-dirty bit.
//! Styling changes set neither, so restyling never forces a bounds pass.
//!
//! ## Change notification
//!
//! Mutations report through an injected [`ChangeSink`] observer as
//! `(ShapeId, ChangeKind)` pairs. Dirty flags are set before the sink
//! fires, so a listener reading derived state observes post-change values.
//! The crate defines no event transport of its own.
//!
//! ## Persistence
//!
//! [`ShapeRecord`] is the serde model for a shape's durable state (type
//! tag, style fields, transform parameters with the pivot in local space,
//! and kind-specific geometry). See [`Scene::record`] and
//! [`Scene::add_record`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod draw;
mod error;
mod geometry;
mod persist;
mod scene;
mod sink;
mod style;
mod types;
mod xform;

pub use draw::PathSink;
pub use error::SceneError;
pub use geometry::{Geometry, PolyGeom};
pub use persist::{BaseRecord, ShapeRecord};
pub use scene::{Scene, ShapeId};
pub use sink::{ChangeKind, ChangeSink};
pub use style::{FillStyle, Rgba, StrokeStyle};
pub use types::{NodeId, ShapeFlags, Xform};
pub use xform::XformTree;

pub use vellum_geom::{AABox, Tolerance};
