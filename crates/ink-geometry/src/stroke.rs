//! Closed, filled stroke outlines.

use ink_core::Tolerance;
use ink_math::{Point2, Transform2, Vector2};
use serde::{Deserialize, Serialize};

use crate::command::{to_svg_path_data, PathCommand};
use crate::curve::Curve;
use crate::tessellate::commands_to_polylines;

/// A closed outline described by drawing commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    commands: Vec<PathCommand>,
}

impl Stroke {
    /// Ribbon between two offset curves.
    ///
    /// Runs along `upper`, caps its end with a semicircle onto the start of
    /// `lower`, runs along `lower`, and caps back onto the start of `upper`.
    /// `lower` is expected to run in the opposite direction to `upper`.
    pub fn new(upper: &Curve, lower: &Curve) -> Self {
        let r1 = upper.end_point().distance(lower.start_point()) / 2.0;
        let r2 = lower.end_point().distance(upper.start_point()) / 2.0;

        let mut commands = upper.commands();
        commands.push(cap(r1, lower.start_point()));
        commands.extend(lower.curve_commands());
        commands.push(cap(r2, upper.start_point()));
        commands.push(PathCommand::Close);
        Self { commands }
    }

    /// Teardrop of a head circle and a tail circle joined by their outer
    /// tangents, with the tail `length` away from `head` along `heading`
    /// (radians).
    ///
    /// When one circle contains the other the larger circle is returned.
    pub fn teardrop(head: Point2, head_radius: f64, tail_radius: f64, length: f64, heading: f64) -> Self {
        let to_image = Transform2::from_translation(head).then(&Transform2::from_rotation_about(head, heading));
        let r1 = head_radius.abs();
        let r2 = tail_radius.abs();

        if length <= (r1 - r2).abs() {
            return if r1 >= r2 {
                Self::circle(head, r1)
            } else {
                Self::circle(to_image.transform_point(Point2::new(length, 0.0)), r2)
            };
        }

        // Tangent points sit at +-phi from the axis on both circles.
        let phi = ((r1 - r2) / length).clamp(-1.0, 1.0).acos();
        let dir_up = Vector2::from_angle(phi);
        let dir_down = Vector2::new(dir_up.x, -dir_up.y);
        let tail = Point2::new(length, 0.0);

        let local = [
            PathCommand::MoveTo(dir_up * r1),
            PathCommand::LineTo(tail + dir_up * r2),
            PathCommand::ArcTo {
                rx: r2,
                ry: r2,
                rotation: 0.0,
                large_arc: 2.0 * phi > std::f64::consts::PI,
                sweep: false,
                to: tail + dir_down * r2,
            },
            PathCommand::LineTo(dir_down * r1),
            PathCommand::ArcTo {
                rx: r1,
                ry: r1,
                rotation: 0.0,
                large_arc: 2.0 * phi < std::f64::consts::PI,
                sweep: false,
                to: dir_up * r1,
            },
            PathCommand::Close,
        ];

        Self {
            commands: local.iter().map(|c| c.transformed(&to_image)).collect(),
        }
    }

    /// Full circle as two half arcs.
    pub fn circle(center: Point2, radius: f64) -> Self {
        let east = center + Vector2::new(radius, 0.0);
        let west = center - Vector2::new(radius, 0.0);
        let half = |to| PathCommand::ArcTo {
            rx: radius,
            ry: radius,
            rotation: 0.0,
            large_arc: false,
            sweep: true,
            to,
        };
        Self {
            commands: vec![PathCommand::MoveTo(east), half(west), half(east), PathCommand::Close],
        }
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Where the outline starts.
    pub fn start_point(&self) -> Option<Point2> {
        match self.commands.first() {
            Some(PathCommand::MoveTo(p)) => Some(*p),
            _ => None,
        }
    }

    /// Where the last drawing command ends.
    pub fn end_point(&self) -> Option<Point2> {
        self.commands.iter().rev().find_map(PathCommand::end_point)
    }

    /// Whether the outline returns to its start within `tolerance`.
    pub fn is_closed(&self, tolerance: f64) -> bool {
        match (self.start_point(), self.end_point()) {
            (Some(start), Some(end)) => start.distance(end) <= tolerance.max(Tolerance::DEFAULT_LINEAR),
            _ => false,
        }
    }

    /// Flattened outline polygons.
    pub fn outline(&self, tolerance: f64) -> Vec<Vec<Point2>> {
        commands_to_polylines(&self.commands, tolerance)
    }

    /// SVG `d` attribute for this outline.
    pub fn svg_path_data(&self) -> String {
        to_svg_path_data(&self.commands)
    }
}

fn cap(radius: f64, to: Point2) -> PathCommand {
    PathCommand::ArcTo {
        rx: radius,
        ry: radius,
        rotation: 0.0,
        large_arc: true,
        sweep: true,
        to,
    }
}
