//! The stroke generator contract and the stroke sets generators produce.

use ink_core::Settings;
use ink_geometry::{PathCommand, Stroke, Surface};
use ink_math::segment::polylines_intersect;
use ink_math::{Aabb2, Point2};
use serde::{Deserialize, Serialize};

/// Chord tolerance (px) used when flattening outlines for clip tests.
pub(crate) const CLIP_FLATTEN_TOLERANCE: f64 = 0.1;

/// The kind of mark a stroke set contains, in drawing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeClass {
    Silhouette,
    InternalEdges,
    Streamlines,
    Stipples,
}

impl StrokeClass {
    pub fn name(self) -> &'static str {
        match self {
            StrokeClass::Silhouette => "silhouette",
            StrokeClass::InternalEdges => "internal_edges",
            StrokeClass::Streamlines => "streamlines",
            StrokeClass::Stipples => "stipples",
        }
    }
}

/// How a stroke set is masked by the silhouette boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clip {
    None,
    /// The whole set is clipped at once.
    Group,
    /// One flag per stroke.
    PerStroke(Vec<bool>),
}

/// The silhouette polygon, used to mask other stroke classes to the
/// subject's footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipPath {
    points: Vec<Point2>,
}

impl ClipPath {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn bounding_box(&self) -> Option<Aabb2> {
        Aabb2::from_points(&self.points)
    }

    /// Closed polygon commands.
    pub fn commands(&self) -> Vec<PathCommand> {
        let mut commands = Vec::with_capacity(self.points.len() + 1);
        if let Some((&first, rest)) = self.points.split_first() {
            commands.push(PathCommand::MoveTo(first));
            commands.extend(rest.iter().map(|&p| PathCommand::LineTo(p)));
            commands.push(PathCommand::Close);
        }
        commands
    }

    /// Whether any outline of `stroke` crosses the boundary.
    pub fn crosses(&self, stroke: &Stroke) -> bool {
        let Some(bounds) = self.bounding_box() else {
            return false;
        };
        stroke.outline(CLIP_FLATTEN_TOLERANCE).iter().any(|outline| {
            Aabb2::from_points(outline).is_some_and(|b| b.intersects(&bounds))
                && polylines_intersect(outline, true, &self.points, true)
        })
    }
}

/// The strokes of one class together with their clipping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeSet {
    pub class: StrokeClass,
    pub strokes: Vec<Stroke>,
    pub clip: Clip,
}

impl StrokeSet {
    pub fn new(class: StrokeClass, strokes: Vec<Stroke>, clip: Clip) -> Self {
        Self { class, strokes, clip }
    }

    pub fn empty(class: StrokeClass) -> Self {
        Self::new(class, Vec::new(), Clip::None)
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Whether stroke `index` is drawn through the silhouette clip.
    pub fn is_clipped(&self, index: usize) -> bool {
        match &self.clip {
            Clip::None => false,
            Clip::Group => true,
            Clip::PerStroke(flags) => flags.get(index).copied().unwrap_or(false),
        }
    }
}

/// A source of strokes of one class.
///
/// Generators only read the surface; any path or stroke that cannot be built
/// is skipped, so generation itself cannot fail.
pub trait StrokeGenerator: Send + Sync {
    fn class(&self) -> StrokeClass;

    /// Build this generator's strokes. `boundary` is the silhouette polygon,
    /// when the surface has one.
    fn generate(&self, surface: &Surface, settings: &Settings, boundary: Option<&ClipPath>) -> StrokeSet;
}
