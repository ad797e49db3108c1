// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fill and stroke style capability structs.
//!
//! Styles are independent value structs composed into a shape by field.
//! Color parsing and rendering-context application are the embedder's
//! concern; the core only needs the visibility predicates to decide
//! whether a shape participates in drawing and hit testing.

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// An 8-bit RGB color with floating-point alpha.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha in `[0, 1]`.
    pub a: f32,
}

impl Rgba {
    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// Fill styling for a shape interior.
#[derive(Clone, Debug, PartialEq)]
pub struct FillStyle {
    /// Fill color; `None` disables filling entirely.
    pub color: Option<Rgba>,
    /// Multiplier applied on top of the color's alpha.
    pub opacity: f32,
}

impl FillStyle {
    /// Whether filling would produce any output.
    pub fn is_visible(&self) -> bool {
        self.color.is_some_and(|c| c.a > 0.0) && self.opacity > 0.0
    }
}

impl Default for FillStyle {
    fn default() -> Self {
        Self {
            color: None,
            opacity: 1.0,
        }
    }
}

/// Stroke styling for a shape outline.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke color; `None` disables stroking entirely.
    pub color: Option<Rgba>,
    /// Stroke width in world units.
    pub width: f64,
    /// Dash pattern; empty means solid.
    pub dash: Vec<f64>,
}

impl StrokeStyle {
    /// Whether stroking would produce any output.
    pub fn is_visible(&self) -> bool {
        self.color.is_some_and(|c| c.a > 0.0) && self.width > 0.0
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: None,
            width: 1.0,
            dash: Vec::new(),
        }
    }
}

/// Snapshot pushed by `Scene::save` and re-applied by `Scene::restore`.
#[derive(Clone, Debug)]
pub(crate) struct SavedState {
    pub(crate) fill: FillStyle,
    pub(crate) stroke: StrokeStyle,
    pub(crate) z_index: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_predicates() {
        assert!(!FillStyle::default().is_visible(), "no color, no fill");
        let fill = FillStyle {
            color: Some(Rgba::rgb(255, 0, 0)),
            opacity: 1.0,
        };
        assert!(fill.is_visible());
        let faded = FillStyle {
            opacity: 0.0,
            ..fill
        };
        assert!(!faded.is_visible());

        let stroke = StrokeStyle {
            color: Some(Rgba::rgb(0, 0, 0)),
            width: 0.0,
            dash: Vec::new(),
        };
        assert!(!stroke.is_visible(), "zero width strokes draw nothing");
    }
}
