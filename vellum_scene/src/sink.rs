// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change notification through an injected observer.

use crate::scene::ShapeId;

/// What aspect of a shape changed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChangeKind {
    /// Position, scale, rotation, pivot, or parenting changed.
    Transform,
    /// Kind-specific geometry (radius, width/height, vertices) changed.
    Geometry,
    /// Fill or stroke style changed.
    Style,
    /// The z-index changed.
    Order,
    /// The visibility flag changed.
    Visibility,
}

/// Observer invoked after each shape mutation.
///
/// The scene fires this *after* dirty flags are set, so reading derived
/// state (matrices, bounds) from within the callback observes the
/// post-change values. The transport to the rest of an application is up
/// to the embedder; the scene never defines one.
pub trait ChangeSink {
    /// Called once per observable mutation.
    fn changed(&mut self, shape: ShapeId, kind: ChangeKind);
}
