//! Target size of the rectified view.

use crate::{AspectRatio, CalibError, Result};
use scorecast_core::CornerPin;

/// Rectified image size in pixels. Both axes are positive and never exceed
/// the smallest measured extent of that axis in the corner pin, so
/// rectification only ever downsamples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RectifiedDimensions {
    width: u32,
    height: u32,
}

impl RectifiedDimensions {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CalibError::EmptyDimensions);
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl std::fmt::Display for RectifiedDimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Solves the largest rectified size with the given aspect ratio that fits
/// the corner pin's pixel budget on both axes.
///
/// Horizontal capacity is the shorter of the top and bottom edges, vertical
/// capacity the shorter of the left and right edges. Whichever axis binds
/// first is filled; the other follows from the aspect ratio, floored.
pub fn solve_dimensions(pin: &CornerPin, aspect_ratio: AspectRatio) -> Result<RectifiedDimensions> {
    let edges = pin.edge_lengths();
    let horizontal = edges.top.min(edges.bottom).trunc() as u32;
    let vertical = edges.left.min(edges.right).trunc() as u32;
    if horizontal == 0 || vertical == 0 {
        return Err(CalibError::EmptyDimensions);
    }

    let ratio = aspect_ratio.value();
    let (width, height) = if horizontal as f64 / ratio <= vertical as f64 {
        (horizontal, (horizontal as f64 / ratio).floor() as u32)
    } else {
        ((vertical as f64 * ratio).floor() as u32, vertical)
    };

    RectifiedDimensions::new(width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn pin(points: [(f64, f64); 4]) -> CornerPin {
        CornerPin::new(points.map(|(x, y)| Point2::new(x, y))).unwrap()
    }

    #[test]
    fn axis_aligned_rectangle_keeps_its_size() {
        let pin = pin([(100.0, 50.0), (500.0, 50.0), (500.0, 350.0), (100.0, 350.0)]);
        let dims = solve_dimensions(&pin, AspectRatio::new(400.0 / 300.0).unwrap()).unwrap();
        // 400 / (4/3) lands a hair above 300 in floating point, so the
        // height-limited branch fires and the width floors to 399.
        assert_eq!(dims.height(), 300);
        assert!((399..=400).contains(&dims.width()));
    }

    #[test]
    fn never_exceeds_edge_capacity_on_either_axis() {
        let quads = [
            [(300.0, 200.0), (900.0, 180.0), (950.0, 500.0), (250.0, 520.0)],
            [(0.0, 0.0), (100.0, 10.0), (110.0, 400.0), (5.0, 390.0)],
            [(50.0, 50.0), (850.0, 60.0), (840.0, 160.0), (60.0, 150.0)],
        ];
        // Ratios chosen to defeat a single-axis bound: far wider and far
        // narrower than the quads themselves.
        let ratios = [0.2, 1.0, 5.0, 20.0];
        for q in quads {
            let pin = pin(q);
            let edges = pin.edge_lengths();
            for r in ratios {
                let dims = solve_dimensions(&pin, AspectRatio::new(r).unwrap()).unwrap();
                assert!(dims.width() as f64 <= edges.top.min(edges.bottom));
                assert!(dims.height() as f64 <= edges.left.min(edges.right));
            }
        }
    }

    #[test]
    fn preserves_aspect_ratio_within_rounding() {
        let pin = pin([(300.0, 200.0), (900.0, 180.0), (950.0, 500.0), (250.0, 520.0)]);
        let ratio = 1.7;
        let dims = solve_dimensions(&pin, AspectRatio::new(ratio).unwrap()).unwrap();
        let achieved = dims.width() as f64 / dims.height() as f64;
        assert!((achieved - ratio).abs() / ratio < 0.02, "achieved {}", achieved);
    }

    #[test]
    fn degenerate_pin_collapses_to_error() {
        let pin = pin([(10.0, 10.0), (10.0, 10.0), (10.0, 10.0), (10.0, 10.0)]);
        assert_eq!(
            solve_dimensions(&pin, AspectRatio::new(1.0).unwrap()),
            Err(CalibError::EmptyDimensions)
        );
    }

    #[test]
    fn extreme_ratio_that_floors_to_zero_is_an_error() {
        let pin = pin([(0.0, 0.0), (500.0, 0.0), (500.0, 300.0), (0.0, 300.0)]);
        assert_eq!(
            solve_dimensions(&pin, AspectRatio::new(1e6).unwrap()),
            Err(CalibError::EmptyDimensions)
        );
    }
}
