// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Comparison tolerance for approximate floating-point equality.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Tolerance used by approximate comparisons throughout Vellum.
///
/// Callers thread a `Tolerance` value through comparison functions instead
/// of consulting mutable global state. [`Tolerance::DEFAULT`] matches the
/// granularity of typical world-space coordinates; embedders working at a
/// very different resolution can construct their own and pass it
/// consistently.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance(pub f64);

impl Tolerance {
    /// The process-wide default tolerance.
    pub const DEFAULT: Self = Self(1e-6);

    /// Absolute comparison: `|a - b| <= tol`.
    ///
    /// Used for coordinate-space values (box edges, points) where the
    /// magnitudes are commensurate.
    #[inline]
    pub fn absolute_eq(self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.0
    }

    /// Relative comparison scaled by the larger operand magnitude.
    ///
    /// Used for matrix coefficients, whose magnitudes can vary widely
    /// between the linear and translation parts.
    #[inline]
    pub fn relative_eq(self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.0 * 1.0_f64.max(a.abs()).max(b.abs())
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
