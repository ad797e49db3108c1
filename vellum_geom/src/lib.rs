// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vellum Geom: geometry value math for 2D shape authoring.
//!
//! This crate holds the leaf-level math shared by the Vellum scene and
//! interaction crates, built on top of [`kurbo`]. It is intentionally free
//! of any scene or event machinery.
//!
//! - [`AABox`]: an axis-aligned bounding box with an explicit "empty"
//!   sentinel that acts as the identity for [`AABox::hull`] and the
//!   absorbing element for [`AABox::intersection`].
//! - [`affine`]: decomposition of a [`kurbo::Affine`] into translation,
//!   non-uniform scale, and a rotation pair, plus checked inversion and
//!   tolerant comparison.
//! - [`hull`]: Melkman's O(n) convex hull over a simple polyline, used to
//!   restrict polygon bounds recomputation to hull vertices.
//! - [`Tolerance`]: the comparison tolerance threaded through all
//!   approximate equality checks.
//!
//! Boxes are plain `Copy` values; operations return fresh boxes rather
//! than mutating in place. None of the operations panic: a malformed box
//! (min above max) is the meaningful "empty" state, not an error.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod aabox;
pub mod affine;
pub mod hull;
mod tolerance;

pub use aabox::AABox;
pub use tolerance::Tolerance;
