// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Abstract path-sink drawing contract.
//!
//! Shapes emit their outline in *local* coordinates into a [`PathSink`];
//! applying the object-to-screen matrix, pixel-ratio handling, and
//! fill/stroke execution are all surface concerns. This keeps the core
//! independent of any particular canvas implementation.

use core::f64::consts::TAU;
use kurbo::Point;

use crate::geometry::Geometry;
use crate::scene::{Scene, ShapeId};

/// A 2D path-building sink, the drawing half of a rendering surface.
pub trait PathSink {
    /// Begin a new subpath at `p`.
    fn move_to(&mut self, p: Point);
    /// Extend the current subpath with a line to `p`.
    fn line_to(&mut self, p: Point);
    /// Append a circular arc around `center`.
    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, sweep_angle: f64);
    /// Append an axis-aligned rectangle subpath.
    fn rect(&mut self, origin: Point, width: f64, height: f64);
    /// Close the current subpath.
    fn close(&mut self);
}

impl Scene {
    /// Emit the shape's outline in local coordinates.
    ///
    /// Returns `false` when there was nothing to emit (stale id, or a
    /// vertex list too short to form a path).
    pub fn draw(&self, id: ShapeId, sink: &mut dyn PathSink) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        match &self.shape(id).geom {
            Geometry::Circle { radius } => {
                sink.arc(Point::ORIGIN, *radius, 0.0, TAU);
                true
            }
            Geometry::Rect { width, height } => {
                sink.rect(Point::new(-width / 2.0, -height / 2.0), *width, *height);
                true
            }
            Geometry::Poly(p) => {
                let verts = p.verts();
                let min = if p.closed() { 3 } else { 2 };
                if verts.len() < min {
                    return false;
                }
                sink.move_to(verts[0]);
                for v in &verts[1..] {
                    sink.line_to(*v);
                }
                if p.closed() {
                    sink.close();
                }
                true
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use alloc::vec::Vec;
    use kurbo::Point;

    use super::PathSink;

    /// Test sink that records emitted path commands.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSink(pub(crate) Vec<Cmd>);

    #[derive(Clone, Debug, PartialEq)]
    pub(crate) enum Cmd {
        MoveTo(Point),
        LineTo(Point),
        Arc(Point, f64),
        Rect(Point, f64, f64),
        Close,
    }

    impl PathSink for RecordingSink {
        fn move_to(&mut self, p: Point) {
            self.0.push(Cmd::MoveTo(p));
        }
        fn line_to(&mut self, p: Point) {
            self.0.push(Cmd::LineTo(p));
        }
        fn arc(&mut self, center: Point, radius: f64, _start_angle: f64, _sweep_angle: f64) {
            self.0.push(Cmd::Arc(center, radius));
        }
        fn rect(&mut self, origin: Point, width: f64, height: f64) {
            self.0.push(Cmd::Rect(origin, width, height));
        }
        fn close(&mut self) {
            self.0.push(Cmd::Close);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::recording::{Cmd, RecordingSink};
    use crate::scene::Scene;
    use crate::types::Xform;
    use alloc::vec;
    use kurbo::Point;

    #[test]
    fn shapes_emit_local_space_outlines() {
        let mut scene = Scene::new();
        let circle = scene.add_circle(5.0, Xform::default()).unwrap();
        let rect = scene.add_rect(10.0, 4.0, Xform::default()).unwrap();
        let poly = scene
            .add_poly(vec![
                Point::new(0.0, 0.0),
                Point::new(2.0, 0.0),
                Point::new(1.0, 2.0),
            ])
            .unwrap();

        let mut sink = RecordingSink::default();
        assert!(scene.draw(circle, &mut sink));
        assert!(scene.draw(rect, &mut sink));
        assert!(scene.draw(poly, &mut sink));

        assert_eq!(
            sink.0,
            vec![
                Cmd::Arc(Point::ORIGIN, 5.0),
                Cmd::Rect(Point::new(-5.0, -2.0), 10.0, 4.0),
                Cmd::MoveTo(Point::new(0.0, 0.0)),
                Cmd::LineTo(Point::new(2.0, 0.0)),
                Cmd::LineTo(Point::new(1.0, 2.0)),
                Cmd::Close,
            ]
        );
    }

    #[test]
    fn single_vertex_polyline_emits_nothing() {
        let mut scene = Scene::new();
        let line = scene.add_poly_line(vec![Point::new(1.0, 1.0)]).unwrap();
        let mut sink = RecordingSink::default();
        assert!(!scene.draw(line, &mut sink));
        assert!(sink.0.is_empty());
    }
}
