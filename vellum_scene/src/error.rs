// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Validation errors raised by scene mutations.

use thiserror::Error;

/// Errors returned by scene construction and mutation.
///
/// Validation runs before any state is assigned, so a failed call leaves
/// the shape untouched. Numerical degeneracy (singular matrices,
/// zero-area polygons) is reported through `Option`/`Err` returns rather
/// than panics.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// A radius, width, or height was NaN or infinite.
    #[error("shape dimension must be finite")]
    InvalidDimension,
    /// A vertex index was outside the polygon's vertex list.
    #[error("vertex index {index} out of range for {len} vertices")]
    VertexIndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of vertices in the list.
        len: usize,
    },
    /// A polygon was constructed with, or would be reduced to, too few
    /// vertices.
    #[error("polygon requires at least {min} vertices, got {got}")]
    TooFewVertices {
        /// Minimum vertex count for the shape kind.
        min: usize,
        /// The count that was supplied or would result.
        got: usize,
    },
    /// A transform could not be inverted (determinant within tolerance of
    /// zero).
    #[error("transform is not invertible")]
    SingularTransform,
    /// The shape or node id refers to a removed slot.
    #[error("stale shape or node id")]
    StaleId,
    /// The operation does not apply to this shape kind (e.g. vertex edits
    /// on a circle).
    #[error("operation does not apply to this shape kind")]
    KindMismatch,
    /// Attaching the node would make it its own ancestor.
    #[error("attach would create a cycle in the transform tree")]
    WouldCycle,
}
