// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Durable shape state as serde records.
//!
//! Records capture everything needed to reconstruct a shape: the kind
//! tag, style fields, z-order, visibility, the local transform
//! parameters, and the kind-specific geometry. The pivot is always
//! recorded relative to the shape's own local origin, never in world
//! space. Parenting is *not* recorded; a loaded shape starts unparented.

use alloc::vec::Vec;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::SceneError;
use crate::geometry::Geometry;
use crate::scene::{Scene, ShapeId};
use crate::style::{FillStyle, Rgba, StrokeStyle};
use crate::types::Xform;

/// Style, order, visibility, and transform fields common to every kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseRecord {
    /// Visibility flag.
    pub visible: bool,
    /// Draw order.
    pub z_index: i32,
    /// Fill color, if any.
    #[serde(default)]
    pub fill_color: Option<Rgba>,
    /// Fill opacity multiplier.
    pub fill_opacity: f32,
    /// Stroke color, if any.
    #[serde(default)]
    pub stroke_color: Option<Rgba>,
    /// Stroke width.
    pub stroke_width: f64,
    /// Dash pattern; empty means solid.
    #[serde(default)]
    pub stroke_dash: Vec<f64>,
    /// Position `[x, y]` relative to the parent space.
    pub position: [f64; 2],
    /// Scale `[x, y]`.
    pub scale: [f64; 2],
    /// Rotation in degrees.
    pub rotation: f64,
    /// Pivot offset `[x, y]` in local coordinates.
    pub pivot: [f64; 2],
}

/// A shape's durable state, tagged by kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShapeRecord {
    /// A circle.
    Circle {
        /// Common fields.
        #[serde(flatten)]
        base: BaseRecord,
        /// Radius in local units.
        radius: f64,
    },
    /// A rectangle.
    Rect {
        /// Common fields.
        #[serde(flatten)]
        base: BaseRecord,
        /// Width in local units.
        width: f64,
        /// Height in local units.
        height: f64,
    },
    /// An open polyline.
    PolyLine {
        /// Common fields.
        #[serde(flatten)]
        base: BaseRecord,
        /// Vertices as `[x, y]` pairs.
        verts: Vec<[f64; 2]>,
    },
    /// A closed polygon.
    Poly {
        /// Common fields.
        #[serde(flatten)]
        base: BaseRecord,
        /// Vertices as `[x, y]` pairs.
        verts: Vec<[f64; 2]>,
    },
}

impl ShapeRecord {
    /// The common fields of any kind.
    pub fn base(&self) -> &BaseRecord {
        match self {
            Self::Circle { base, .. }
            | Self::Rect { base, .. }
            | Self::PolyLine { base, .. }
            | Self::Poly { base, .. } => base,
        }
    }
}

impl Scene {
    /// Capture a shape's durable state.
    ///
    /// A shape with saved style states records the *base* (oldest) entry
    /// of its save stack, so a transient selection highlight is not
    /// persisted.
    pub fn record(&self, id: ShapeId) -> Option<ShapeRecord> {
        if !self.is_alive(id) {
            return None;
        }
        let shape = self.shape(id);
        let (fill, stroke, z_index) = match shape.saved.first() {
            Some(state) => (&state.fill, &state.stroke, state.z_index),
            None => (&shape.fill, &shape.stroke, shape.z_index),
        };
        let x = self.xforms.xform(shape.node)?;
        let base = BaseRecord {
            visible: shape.visible,
            z_index,
            fill_color: fill.color,
            fill_opacity: fill.opacity,
            stroke_color: stroke.color,
            stroke_width: stroke.width,
            stroke_dash: stroke.dash.clone(),
            position: [x.position.x, x.position.y],
            scale: [x.scale.x, x.scale.y],
            rotation: x.rotation_deg,
            pivot: [x.pivot.x, x.pivot.y],
        };
        Some(match &shape.geom {
            Geometry::Circle { radius } => ShapeRecord::Circle {
                base,
                radius: *radius,
            },
            Geometry::Rect { width, height } => ShapeRecord::Rect {
                base,
                width: *width,
                height: *height,
            },
            Geometry::Poly(p) => {
                let verts = p.verts().iter().map(|v| [v.x, v.y]).collect();
                if p.closed() {
                    ShapeRecord::Poly { base, verts }
                } else {
                    ShapeRecord::PolyLine { base, verts }
                }
            }
        })
    }

    /// Reconstruct a shape from a record. The new shape is unparented.
    pub fn add_record(&mut self, record: &ShapeRecord) -> Result<ShapeId, SceneError> {
        let base = record.base();
        let xform = Xform {
            position: Point::new(base.position[0], base.position[1]),
            scale: Vec2::new(base.scale[0], base.scale[1]),
            rotation_deg: base.rotation,
            pivot: Vec2::new(base.pivot[0], base.pivot[1]),
        };
        let id = match record {
            ShapeRecord::Circle { radius, .. } => self.add_circle(*radius, xform)?,
            ShapeRecord::Rect { width, height, .. } => self.add_rect(*width, *height, xform)?,
            ShapeRecord::PolyLine { verts, .. } | ShapeRecord::Poly { verts, .. } => {
                let pts: Vec<Point> = verts.iter().map(|v| Point::new(v[0], v[1])).collect();
                let id = match record {
                    ShapeRecord::Poly { .. } => self.add_poly(pts)?,
                    _ => self.add_poly_line(pts)?,
                };
                // Poly constructors derive a pivot from the vertex
                // bounds; the recorded pivot wins.
                self.set_pivot(id, xform.pivot);
                self.set_position(id, xform.position);
                self.set_scale(id, xform.scale);
                self.set_rotation(id, xform.rotation_deg);
                id
            }
        };
        self.set_visible(id, base.visible);
        self.set_z_index(id, base.z_index);
        self.set_fill(
            id,
            FillStyle {
                color: base.fill_color,
                opacity: base.fill_opacity,
            },
        );
        self.set_stroke(
            id,
            StrokeStyle {
                color: base.stroke_color,
                width: base.stroke_width,
                dash: base.stroke_dash.clone(),
            },
        );
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Rgba;
    use alloc::string::String;
    use alloc::vec;

    #[test]
    fn record_round_trips_through_json() {
        let mut scene = Scene::new();
        let poly = scene
            .add_poly(vec![
                Point::new(0.0, 0.0),
                Point::new(4.0, 0.0),
                Point::new(4.0, 3.0),
                Point::new(0.0, 3.0),
            ])
            .unwrap();
        scene.set_rotation(poly, 30.0);
        scene.set_z_index(poly, 5);
        scene.set_fill(
            poly,
            FillStyle {
                color: Some(Rgba::rgb(200, 100, 50)),
                opacity: 0.8,
            },
        );

        let record = scene.record(poly).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        let parsed: ShapeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);

        let mut restored = Scene::new();
        let copy = restored.add_record(&parsed).unwrap();
        assert_eq!(restored.rotation(copy), Some(30.0));
        assert_eq!(restored.z_index(copy), Some(5));
        assert_eq!(restored.pivot(copy), scene.pivot(poly));
        assert_eq!(restored.verts(copy), scene.verts(poly));
        assert_eq!(
            restored.bounds(copy).unwrap(),
            scene.bounds(poly).unwrap(),
            "restored shape must occupy the same world region"
        );
    }

    #[test]
    fn json_field_names_are_camel_case_with_type_tag() {
        let mut scene = Scene::new();
        let circle = scene.add_circle(7.5, Xform::default()).unwrap();
        let json: String = serde_json::to_string(&scene.record(circle).unwrap()).unwrap();
        assert!(json.contains("\"type\":\"Circle\""), "got {json}");
        assert!(json.contains("\"zIndex\":0"), "got {json}");
        assert!(json.contains("\"radius\":7.5"), "got {json}");
        assert!(json.contains("\"position\":[0.0,0.0]"), "got {json}");
    }

    #[test]
    fn saved_selection_style_is_not_persisted() {
        let mut scene = Scene::new();
        let rect = scene.add_rect(2.0, 2.0, Xform::default()).unwrap();
        scene.save(rect);
        // Selection highlight applied after save.
        scene.set_fill(
            rect,
            FillStyle {
                color: Some(Rgba::rgb(255, 255, 255)),
                opacity: 1.0,
            },
        );
        scene.set_z_index(rect, 999);

        let record = scene.record(rect).unwrap();
        assert_eq!(record.base().fill_color, None, "base style wins");
        assert_eq!(record.base().z_index, 0);
    }
}
