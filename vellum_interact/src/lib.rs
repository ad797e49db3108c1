// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vellum Interact: pointer-driven shape manipulation math.
//!
//! This crate turns pointer positions into transform edits on a
//! [`vellum_scene::Scene`]. It has no opinion about where the pointer
//! events come from; the embedder supplies screen coordinates and the
//! camera's world/screen matrices.
//!
//! - [`handles`]: oriented-bounding-box handle picking. Every editable
//!   shape exposes four corner handles and (when scalable) four
//!   edge-midpoint handles, each a small screen-space square. Corner
//!   handles carry a surrounding rotation margin, so a single pick
//!   distinguishes scale grabs from rotate grabs.
//! - [`vertex`]: vertex-edit picking for polylines and polygons —
//!   existing vertices first, then edge-midpoint "insert here"
//!   affordances.
//! - [`drag`]: the [`DragSession`](drag::DragSession) lifecycle. A
//!   session snapshots the grabbed shape's transform and the pointer's
//!   screen/world/object positions at press time, then converts each
//!   subsequent pointer move into a position/rotation/scale or vertex
//!   update. Modifier keys select uniform scaling (shift), center
//!   pivoting (alt), and 45° snapping for rotation and translation.
//!
//! Sessions are ephemeral: drop them on pointer release. Mutations
//! applied mid-drag stay applied; there is no rollback.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod drag;
pub mod handles;
mod modifiers;
pub mod vertex;

pub use modifiers::Modifiers;
