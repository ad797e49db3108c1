// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decomposition, inversion, and comparison helpers for [`kurbo::Affine`].
//!
//! A 2×3 affine matrix `[a, b, c, d, tx, ty]` built from affine
//! transformations decomposes (singular value decomposition) into a
//! translation, a non-uniform scale, and a *pair* of rotations applied
//! before and after the scale. The decomposition is not unique beyond
//! sign: only the full composition `T · R(post) · S · R(pre)` is
//! guaranteed to reconstruct the input. Reflections come back as a
//! negative scale component paired with a compensating rotation; callers
//! needing a single orientation angle must pick a convention.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Vec2};

use crate::Tolerance;

/// Result of [`decompose`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decomposition {
    /// Translation component `(tx, ty)`.
    pub translation: Vec2,
    /// Non-uniform scale `(sx, sy)`. Signs are coupled to `rotation`.
    pub scale: Vec2,
    /// Pre- and post-rotation angles in radians, applied as
    /// `R(rotation.1) · S · R(rotation.0)`.
    pub rotation: (f64, f64),
}

/// Decompose an affine into translation, scale, and a rotation pair.
///
/// With coefficients `[a, b, c, d, tx, ty]`, the relations are
/// `E = (a+d)/2`, `F = (a-d)/2`, `G = (b+c)/2`, `H = (b-c)/2`,
/// `Q = √(E²+H²)`, `R = √(F²+G²)`, scale `(Q+R, Q-R)`, rotations
/// `((atan2(H,E) - atan2(G,F))/2, (atan2(H,E) + atan2(G,F))/2)`.
pub fn decompose(m: Affine) -> Decomposition {
    let [a, b, c, d, tx, ty] = m.as_coeffs();
    let e = (a + d) / 2.0;
    let f = (a - d) / 2.0;
    let g = (b + c) / 2.0;
    let h = (b - c) / 2.0;

    let q = (e * e + h * h).sqrt();
    let r = (f * f + g * g).sqrt();
    let a1 = g.atan2(f);
    let a2 = h.atan2(e);

    Decomposition {
        translation: Vec2::new(tx, ty),
        scale: Vec2::new(q + r, q - r),
        rotation: ((a2 - a1) / 2.0, (a2 + a1) / 2.0),
    }
}

/// Rebuild the affine described by a [`Decomposition`].
pub fn recompose(d: &Decomposition) -> Affine {
    Affine::translate(d.translation)
        * Affine::rotate(d.rotation.1)
        * Affine::scale_non_uniform(d.scale.x, d.scale.y)
        * Affine::rotate(d.rotation.0)
}

/// Invert an affine, or `None` when the determinant is within `tol` of
/// zero.
pub fn try_invert(m: Affine, tol: Tolerance) -> Option<Affine> {
    let [a, b, c, d, tx, ty] = m.as_coeffs();
    let det = a * d - b * c;
    if det.abs() <= tol.0 {
        return None;
    }
    Some(Affine::new([
        d / det,
        -b / det,
        -c / det,
        a / det,
        (c * ty - d * tx) / det,
        (b * tx - a * ty) / det,
    ]))
}

/// Component-wise approximate equality with magnitude-relative tolerance.
pub fn approx_eq(a: Affine, b: Affine, tol: Tolerance) -> bool {
    let ca = a.as_coeffs();
    let cb = b.as_coeffs();
    ca.iter().zip(cb.iter()).all(|(&x, &y)| tol.relative_eq(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{FRAC_PI_3, FRAC_PI_4, FRAC_PI_6};

    #[test]
    fn decompose_pure_rotation() {
        let d = decompose(Affine::rotate(FRAC_PI_3));
        assert!(Tolerance::DEFAULT.absolute_eq(d.scale.x, 1.0));
        assert!(Tolerance::DEFAULT.absolute_eq(d.scale.y, 1.0));
        // The rotation splits across the pair but sums to the input angle.
        assert!(Tolerance::DEFAULT.absolute_eq(d.rotation.0 + d.rotation.1, FRAC_PI_3));
    }

    #[test]
    fn decompose_recompose_round_trip() {
        let cases = [
            Affine::translate(Vec2::new(3.0, -7.0))
                * Affine::rotate(FRAC_PI_6)
                * Affine::scale_non_uniform(2.0, 0.5),
            Affine::rotate(FRAC_PI_4) * Affine::scale_non_uniform(1.0, 3.0) * Affine::rotate(-0.2),
            Affine::scale_non_uniform(-1.5, 2.0),
            Affine::translate(Vec2::new(0.25, 0.75)),
        ];
        for m in cases {
            let d = decompose(m);
            assert!(
                approx_eq(recompose(&d), m, Tolerance::DEFAULT),
                "round trip failed for {m:?} -> {d:?}"
            );
        }
    }

    #[test]
    fn reflection_shows_up_as_negative_scale() {
        // Mirror across x: determinant is negative, so one scale
        // component must come back negative.
        let m = Affine::scale_non_uniform(1.0, -1.0);
        let d = decompose(m);
        assert!(d.scale.x * d.scale.y < 0.0, "expected a negative component");
        assert!(approx_eq(recompose(&d), m, Tolerance::DEFAULT));
    }

    #[test]
    fn invert_checks_determinant() {
        let m = Affine::translate(Vec2::new(5.0, 6.0)) * Affine::rotate(FRAC_PI_4);
        let inv = try_invert(m, Tolerance::DEFAULT).expect("rigid transform is invertible");
        assert!(approx_eq(inv * m, Affine::IDENTITY, Tolerance::DEFAULT));
        assert!(approx_eq(m * inv, Affine::IDENTITY, Tolerance::DEFAULT));

        let singular = Affine::scale_non_uniform(1.0, 0.0);
        assert!(try_invert(singular, Tolerance::DEFAULT).is_none());
    }

    #[test]
    fn relative_comparison_tracks_magnitude() {
        let a = Affine::translate(Vec2::new(1e9, 0.0));
        let b = Affine::translate(Vec2::new(1e9 + 10.0, 0.0));
        assert!(approx_eq(a, b, Tolerance::DEFAULT));
        let c = Affine::translate(Vec2::new(1.0, 0.0));
        let d = Affine::translate(Vec2::new(1.1, 0.0));
        assert!(!approx_eq(c, d, Tolerance::DEFAULT));
    }
}
