//! Co-registered raster channels of a rendered subject.

use ink_core::traits::Validate;
use ink_core::{InkError, Result};
use ink_math::{Aabb2, Point2};
use ink_raster::{adjust_gamma, Raster};

/// Gamma applied to UV and normal channels delivered as display-encoded
/// image components.
pub const CHANNEL_ENCODING_GAMMA: f64 = 2.2;

/// The raw channels a [`Surface`] is built from.
///
/// Every channel is indexed `(x = column, y = row)` and must share the same
/// dimensions. `object` is nonzero inside the subject.
#[derive(Debug, Clone)]
pub struct SurfaceChannels {
    pub object: Raster,
    pub depth: Raster,
    pub diffuse_direct: Raster,
    pub normal_x: Raster,
    pub normal_y: Raster,
    pub normal_z: Raster,
    pub u: Raster,
    pub v: Raster,
    pub shadow: Option<Raster>,
    pub ambient_occlusion: Option<Raster>,
}

impl SurfaceChannels {
    /// Linearise `u` and `v` when they arrive as gamma-encoded image components.
    pub fn with_encoded_uv(mut self) -> Self {
        self.u = adjust_gamma(&self.u, CHANNEL_ENCODING_GAMMA, 1.0);
        self.v = adjust_gamma(&self.v, CHANNEL_ENCODING_GAMMA, 1.0);
        self
    }

    /// Linearise `normal_x` and `normal_y` when they arrive as the red and
    /// green components of a gamma-encoded normal image. `normal_z` is left
    /// alone.
    pub fn with_encoded_normals(mut self) -> Self {
        self.normal_x = adjust_gamma(&self.normal_x, CHANNEL_ENCODING_GAMMA, 1.0);
        self.normal_y = adjust_gamma(&self.normal_y, CHANNEL_ENCODING_GAMMA, 1.0);
        self
    }

    fn named(&self) -> impl Iterator<Item = (&'static str, &Raster)> {
        [
            ("object", &self.object),
            ("depth", &self.depth),
            ("diffuse_direct", &self.diffuse_direct),
            ("normal_x", &self.normal_x),
            ("normal_y", &self.normal_y),
            ("normal_z", &self.normal_z),
            ("u", &self.u),
            ("v", &self.v),
        ]
        .into_iter()
        .chain(self.shadow.as_ref().map(|r| ("shadow", r)))
        .chain(self.ambient_occlusion.as_ref().map(|r| ("ambient_occlusion", r)))
    }
}

impl Validate for SurfaceChannels {
    fn validate(&self) -> Result<()> {
        if self.object.is_empty() {
            return Err(InkError::EmptyRaster);
        }
        let expected = self.object.dimensions();
        for (channel, raster) in self.named() {
            if raster.dimensions() != expected {
                return Err(InkError::DimensionMismatch {
                    channel,
                    expected,
                    actual: raster.dimensions(),
                });
            }
        }
        Ok(())
    }
}

/// Every channel value at one pixel.
///
/// Absent optional channels sample as `1.0` (fully lit, unoccluded).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub object: f64,
    pub depth: f64,
    pub diffuse_direct: f64,
    pub normal_x: f64,
    pub normal_y: f64,
    pub normal_z: f64,
    pub u: f64,
    pub v: f64,
    pub shadow: f64,
    pub ambient_occlusion: f64,
}

/// Read-only view of a subject's channels, shared by every generator.
#[derive(Debug, Clone)]
pub struct Surface {
    channels: SurfaceChannels,
}

impl Surface {
    pub fn new(channels: SurfaceChannels) -> Result<Self> {
        channels.validate()?;
        Ok(Self { channels })
    }

    pub fn width(&self) -> usize {
        self.channels.object.width()
    }

    pub fn height(&self) -> usize {
        self.channels.object.height()
    }

    pub fn bounds(&self) -> Aabb2 {
        Aabb2::from_size(self.width(), self.height())
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width() && (y as usize) < self.height()
    }

    /// The pixel nearest to `point`, if it lies inside the raster.
    pub fn pixel(&self, point: Point2) -> Option<(usize, usize)> {
        let (x, y) = (point.x.round(), point.y.round());
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let (x, y) = (x as i64, y as i64);
        self.contains(x, y).then_some((x as usize, y as usize))
    }

    /// Whether the pixel nearest to `point` is inside the raster and the subject.
    pub fn is_valid(&self, point: Point2) -> bool {
        self.pixel(point)
            .is_some_and(|(x, y)| self.channels.object.get(x, y) != 0.0)
    }

    /// All channel values at the pixel nearest to `point`.
    pub fn at_point(&self, point: Point2) -> Option<SurfaceSample> {
        let (x, y) = self.pixel(point)?;
        let c = &self.channels;
        Some(SurfaceSample {
            object: c.object.get(x, y),
            depth: c.depth.get(x, y),
            diffuse_direct: c.diffuse_direct.get(x, y),
            normal_x: c.normal_x.get(x, y),
            normal_y: c.normal_y.get(x, y),
            normal_z: c.normal_z.get(x, y),
            u: c.u.get(x, y),
            v: c.v.get(x, y),
            shadow: c.shadow.as_ref().map_or(1.0, |r| r.get(x, y)),
            ambient_occlusion: c.ambient_occlusion.as_ref().map_or(1.0, |r| r.get(x, y)),
        })
    }

    /// Sample a single channel at the pixel nearest to `point`.
    pub fn sample(&self, channel: &Raster, point: Point2) -> Option<f64> {
        self.pixel(point).map(|(x, y)| channel.get(x, y))
    }

    pub fn object(&self) -> &Raster {
        &self.channels.object
    }

    pub fn depth(&self) -> &Raster {
        &self.channels.depth
    }

    pub fn diffuse_direct(&self) -> &Raster {
        &self.channels.diffuse_direct
    }

    pub fn normal_x(&self) -> &Raster {
        &self.channels.normal_x
    }

    pub fn normal_y(&self) -> &Raster {
        &self.channels.normal_y
    }

    pub fn normal_z(&self) -> &Raster {
        &self.channels.normal_z
    }

    pub fn u(&self) -> &Raster {
        &self.channels.u
    }

    pub fn v(&self) -> &Raster {
        &self.channels.v
    }

    pub fn shadow(&self) -> Option<&Raster> {
        self.channels.shadow.as_ref()
    }

    pub fn ambient_occlusion(&self) -> Option<&Raster> {
        self.channels.ambient_occlusion.as_ref()
    }
}
