// Integration tests: contour tracing through path refinement to strokes

use glam::dvec2;
use ink_core::ThicknessWeights;
use ink_geometry::{Curve, OffsetDirection, Path, Stroke, Surface, SurfaceChannels};
use ink_math::Point2;
use ink_raster::{find_contours, Raster};

fn square_mask(size: usize, lo: usize, hi: usize) -> Raster {
    Raster::from_fn(size, size, |x, y| {
        if (lo..=hi).contains(&x) && (lo..=hi).contains(&y) {
            1.0
        } else {
            0.0
        }
    })
}

fn flat_surface(mask: Raster) -> Surface {
    let (w, h) = mask.dimensions();
    let half = Raster::new(w, h, 0.5);
    Surface::new(SurfaceChannels {
        object: mask,
        depth: half.clone(),
        diffuse_direct: half.clone(),
        normal_x: Raster::new(w, h, 0.0),
        normal_y: Raster::new(w, h, 0.0),
        normal_z: Raster::new(w, h, 1.0),
        u: Raster::from_fn(w, h, |x, _| x as f64 / (w - 1) as f64),
        v: Raster::from_fn(w, h, |_, y| y as f64 / (h - 1) as f64),
        shadow: None,
        ambient_occlusion: None,
    })
    .unwrap()
}

#[test]
fn integration_square_corners_split_into_four_sides() {
    let mask = square_mask(10, 2, 7);
    let surface = flat_surface(mask.clone());
    let contours = find_contours(&mask, 0.99);
    assert_eq!(contours.len(), 1);

    let path = Path::new(contours[0].clone()).round().bump(&surface).remove_duplicates();
    assert_eq!(path.len(), 20);
    // Every rounded point already lies on the subject.
    assert_eq!(path.bump(&surface), path);

    let corners = path.find_corners(&mask, 1, 1);
    let mut corner_points: Vec<(f64, f64)> = corners.iter().map(|&i| (path.points()[i].x, path.points()[i].y)).collect();
    corner_points.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(corner_points, vec![(2.0, 2.0), (2.0, 7.0), (7.0, 2.0), (7.0, 7.0)]);

    let sides = path.split_corners(&corners);
    assert_eq!(sides.len(), 4);
    for side in &sides {
        assert_eq!(side.len(), 6);
        let first = side.points()[0];
        let last = side.points()[5];
        let horizontal = side.points().iter().all(|p| p.y == first.y);
        let vertical = side.points().iter().all(|p| p.x == first.x);
        assert!(horizontal ^ vertical, "side is not straight: {:?}", side.points());
        assert_eq!(first.distance(last), 5.0);
    }
    for pair in sides.windows(2) {
        assert_eq!(pair[0].points().last(), pair[1].points().first());
    }
    assert_eq!(sides[3].points().last(), sides[0].points().first());
}

#[test]
fn integration_uv_band_trim_splits_around_perturbation() {
    let n = 10;
    let mut primary = Raster::from_fn(n, n, |x, y| {
        if x == 0 || y == 0 || x == n - 1 || y == n - 1 {
            0.0
        } else {
            x as f64 / (n - 1) as f64
        }
    });
    primary.set(3, 5, 0.9);
    let secondary = Raster::from_fn(n, n, |_, y| y as f64 / (n - 1) as f64);

    let contours = find_contours(&primary, 0.4);
    assert_eq!(contours.len(), 1);
    let rounded = Path::new(contours[0].clone()).round();
    assert!(rounded.is_closed());
    let path = rounded.remove_duplicates();
    assert!(!path.is_closed());

    let runs = path.trim_loop_by_band(0.4, &primary, &secondary, 0.1, 0.1);
    assert_eq!(runs.len(), 2);

    let to_tuples = |p: &Path| -> Vec<(f64, f64)> { p.points().iter().map(|q| (q.x, q.y)).collect() };
    assert_eq!(to_tuples(&runs[0]), vec![(4.0, 8.0), (4.0, 7.0), (4.0, 6.0), (3.0, 6.0)]);
    // The run through the loop's start comes back in one piece.
    assert_eq!(
        to_tuples(&runs[1]),
        vec![(3.0, 4.0), (4.0, 4.0), (4.0, 3.0), (4.0, 2.0), (4.0, 1.0)]
    );
    // The perturbed pixel's neighbourhood is excluded.
    assert!(runs.iter().all(|r| !r.points().contains(&dvec2(2.0, 5.0))));
}

#[test]
fn integration_ribbon_stroke_is_closed() {
    let surface = flat_surface(Raster::new(60, 60, 1.0));
    let spine: Vec<Point2> = (10..=50).map(|x| dvec2(x as f64, 30.0 + 0.1 * x as f64)).collect();

    let path = Path::new(spine).round().bump(&surface).remove_duplicates().simple_cull(5);
    let weights = ThicknessWeights::new(1.0, 2.0, 0.0, 0.0);
    let reference = path.compute_offset_vector(&surface, &weights, surface.normal_x());
    let thickness = reference.offset_vector().unwrap()[0];
    assert!((thickness - 2.0).abs() < 1e-12);

    let curve = Curve::fit(reference.simplify(1.0).points(), 0.01).unwrap();
    let upper = curve.offset(5.0, &reference, OffsetDirection::Upper).unwrap();
    let lower = curve.offset(5.0, &reference, OffsetDirection::Lower).unwrap();
    assert_eq!(upper.len(), lower.len());

    let upper = Curve::fit(upper.simplify(0.5).points(), 0.01).unwrap();
    let lower = Curve::fit(lower.simplify(0.5).points(), 0.01).unwrap();
    let stroke = Stroke::new(&upper, &lower);
    assert!(stroke.is_closed(1e-9));
    assert_eq!(stroke.start_point(), Some(upper.start_point()));

    // Offsets sit one thickness either side of the spine.
    for p in upper.segments().iter().map(|s| s.p0) {
        let nearest = reference.nearest_neighbour(p).unwrap();
        assert!(p.distance(nearest) < 2.0 + 1.0);
        assert!(p.distance(nearest) > 2.0 - 1.0);
    }
}
