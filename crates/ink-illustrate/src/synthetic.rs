//! Synthetic surfaces for demos and tests.

use glam::DVec3;
use ink_core::Result;
use ink_geometry::{Surface, SurfaceChannels};
use ink_raster::Raster;

/// Channels of a diffuse sphere rendered orthographically.
#[derive(Debug, Clone, Copy)]
pub struct SphereScene {
    /// Width and height of the square image.
    pub size: usize,
    /// Sphere radius in pixels; the sphere is centred in the image.
    pub radius: f64,
    /// Direction towards the light, in image space with `+z` towards the viewer.
    pub light: DVec3,
    /// Render a shadow channel that darkens the unlit side.
    pub with_shadow: bool,
}

impl Default for SphereScene {
    fn default() -> Self {
        Self {
            size: 128,
            radius: 56.0,
            light: DVec3::new(-0.5, -0.6, 0.62),
            with_shadow: false,
        }
    }
}

impl SphereScene {
    pub fn new(size: usize, radius: f64) -> Self {
        Self {
            size,
            radius,
            ..Self::default()
        }
    }

    /// Unit normal at pixel `(x, y)`, `None` off the sphere.
    fn normal(&self, x: usize, y: usize) -> Option<DVec3> {
        let c = (self.size as f64 - 1.0) / 2.0;
        let nx = (x as f64 - c) / self.radius;
        let ny = (y as f64 - c) / self.radius;
        let rr = nx * nx + ny * ny;
        (rr < 1.0).then(|| DVec3::new(nx, ny, (1.0 - rr).sqrt()))
    }

    fn channel(&self, inside: impl Fn(DVec3) -> f64, outside: f64) -> Raster {
        Raster::from_fn(self.size, self.size, |x, y| self.normal(x, y).map_or(outside, &inside))
    }

    pub fn channels(&self) -> SurfaceChannels {
        let light = self.light.normalize_or_zero();
        let lit = move |n: DVec3| n.dot(light).max(0.0);
        SurfaceChannels {
            object: self.channel(|_| 1.0, 0.0),
            depth: self.channel(|n| 1.0 - 0.5 * n.z, 1.0),
            diffuse_direct: self.channel(lit, 0.0),
            normal_x: self.channel(|n| n.x, 0.0),
            normal_y: self.channel(|n| n.y, 0.0),
            normal_z: self.channel(|n| n.z, 0.0),
            // Longitude and latitude, both scaled into (0, 1).
            u: self.channel(|n| n.x.atan2(n.z) / std::f64::consts::PI + 0.5, 0.0),
            v: self.channel(|n| n.y.asin() / std::f64::consts::PI + 0.5, 0.0),
            shadow: self
                .with_shadow
                .then(|| self.channel(move |n| if lit(n) > 0.0 { 1.0 } else { 0.0 }, 1.0)),
            ambient_occlusion: None,
        }
    }

    pub fn surface(&self) -> Result<Surface> {
        Surface::new(self.channels())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    #[test]
    fn test_sphere_channels() {
        let scene = SphereScene::new(33, 12.0);
        let surface = scene.surface().unwrap();
        let centre = surface.at_point(dvec2(16.0, 16.0)).unwrap();
        assert_eq!(centre.object, 1.0);
        assert!((centre.normal_z - 1.0).abs() < 1e-12);
        assert!((centre.u - 0.5).abs() < 1e-12);
        assert!((centre.v - 0.5).abs() < 1e-12);
        assert!((centre.depth - 0.5).abs() < 1e-12);

        assert!(!surface.is_valid(dvec2(0.0, 0.0)));
        assert!(surface.is_valid(dvec2(16.0, 5.0)));
        // Longitude grows to the right, latitude downwards.
        let right = surface.at_point(dvec2(24.0, 16.0)).unwrap();
        let below = surface.at_point(dvec2(16.0, 24.0)).unwrap();
        assert!(right.u > 0.5);
        assert!(below.v > 0.5);
        assert!(surface.shadow().is_none());
    }

    #[test]
    fn test_shadow_channel() {
        let scene = SphereScene {
            with_shadow: true,
            ..SphereScene::new(33, 12.0)
        };
        let surface = scene.surface().unwrap();
        let shadow = surface.shadow().unwrap();
        // Light comes from the upper left.
        assert_eq!(shadow.get(10, 10), 1.0);
        assert_eq!(shadow.get(24, 24), 0.0);
    }
}
