// Integration tests: contour and corner extraction on a filled square mask

use ink_raster::{corner_harris, corner_peaks, corner_subpix, find_contours, Raster};

fn square_mask(size: usize, lo: usize, hi: usize) -> Raster {
    Raster::from_fn(size, size, |x, y| {
        if (lo..=hi).contains(&x) && (lo..=hi).contains(&y) {
            1.0
        } else {
            0.0
        }
    })
}

#[test]
fn integration_square_contour_encloses_mask() {
    let mask = square_mask(10, 2, 7);
    let contours = find_contours(&mask, 0.99);
    assert_eq!(contours.len(), 1);

    let contour = &contours[0];
    assert_eq!(contour.first(), contour.last());
    let xs: Vec<f64> = contour.iter().map(|p| p.x).collect();
    let min_x = xs.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_x = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    assert!((min_x - 1.99).abs() < 1e-9);
    assert!((max_x - 7.01).abs() < 1e-9);
}

#[test]
fn integration_square_has_four_corners() {
    let mask = square_mask(10, 2, 7);
    let response = corner_harris(&mask, 0.05, 1.0);
    let mut peaks = corner_peaks(&response, 2, 0.1);
    peaks.sort();
    assert_eq!(peaks, vec![(2, 2), (2, 7), (7, 2), (7, 7)]);

    let refined = corner_subpix(&response, &peaks, 4);
    assert_eq!(refined.len(), 4);
    for (refined, &(x, y)) in refined.iter().zip(&peaks) {
        if let Some(p) = refined {
            assert!((p.x - x as f64).abs() <= 2.0);
            assert!((p.y - y as f64).abs() <= 2.0);
        }
    }
}

#[test]
fn integration_two_squares_give_two_contours() {
    let mask = Raster::from_fn(20, 10, |x, y| {
        let a = (2..=6).contains(&x) && (2..=6).contains(&y);
        let b = (12..=17).contains(&x) && (2..=7).contains(&y);
        if a || b {
            1.0
        } else {
            0.0
        }
    });
    let contours = find_contours(&mask, 0.5);
    assert_eq!(contours.len(), 2);
    assert!(contours.iter().all(|c| c.first() == c.last()));
}
