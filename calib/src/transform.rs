//! Exact projective transform from the corner pin onto the rectified
//! rectangle.

use crate::{CalibError, RectifiedDimensions, Result};
use nalgebra::{Matrix3, Point2, SMatrix, SVector};
use scorecast_core::CornerPin;

/// 3x3 homography mapping corner-pin coordinates to rectified coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformMatrix(Matrix3<f64>);

impl TransformMatrix {
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.0
    }

    /// Projects a point through the homography. `None` if the point maps to
    /// the plane at infinity.
    pub fn apply(&self, point: &Point2<f64>) -> Option<Point2<f64>> {
        let p = self.0 * nalgebra::Vector3::new(point.x, point.y, 1.0);
        if p.z.abs() < 1e-12 {
            return None;
        }
        Some(Point2::new(p.x / p.z, p.y / p.z))
    }

    pub fn try_inverse(&self) -> Option<TransformMatrix> {
        self.0.try_inverse().map(TransformMatrix)
    }
}

/// Solves the homography that maps the four pin corners onto
/// (0,0), (W-1,0), (W-1,H-1), (0,H-1).
///
/// With exactly four correspondences the eight unknowns are determined by
/// an 8x8 linear system (h22 fixed at 1), so the solution is exact rather
/// than a least-squares fit.
pub fn build_transform(pin: &CornerPin, dims: &RectifiedDimensions) -> Result<TransformMatrix> {
    let w = dims.width() as f64 - 1.0;
    let h = dims.height() as f64 - 1.0;
    let src = pin.points();
    let dst = [
        Point2::new(0.0, 0.0),
        Point2::new(w, 0.0),
        Point2::new(w, h),
        Point2::new(0.0, h),
    ];

    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();
    for i in 0..4 {
        let (x, y) = (src[i].x, src[i].y);
        let (u, v) = (dst[i].x, dst[i].y);
        let r = 2 * i;

        a[(r, 0)] = x;
        a[(r, 1)] = y;
        a[(r, 2)] = 1.0;
        a[(r, 6)] = -u * x;
        a[(r, 7)] = -u * y;
        b[r] = u;

        a[(r + 1, 3)] = x;
        a[(r + 1, 4)] = y;
        a[(r + 1, 5)] = 1.0;
        a[(r + 1, 6)] = -v * x;
        a[(r + 1, 7)] = -v * y;
        b[r + 1] = v;
    }

    let coeffs = a.lu().solve(&b).ok_or(CalibError::SingularTransform)?;
    let matrix = Matrix3::new(
        coeffs[0], coeffs[1], coeffs[2],
        coeffs[3], coeffs[4], coeffs[5],
        coeffs[6], coeffs[7], 1.0,
    );
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(CalibError::SingularTransform);
    }

    tracing::debug!(?matrix, "solved corner-pin transform");
    Ok(TransformMatrix(matrix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pin(points: [(f64, f64); 4]) -> CornerPin {
        CornerPin::new(points.map(|(x, y)| Point2::new(x, y))).unwrap()
    }

    #[test]
    fn maps_source_corners_onto_target_rectangle() {
        let pin = pin([(300.0, 200.0), (900.0, 180.0), (950.0, 500.0), (250.0, 520.0)]);
        let dims = RectifiedDimensions::new(640, 360).unwrap();
        let transform = build_transform(&pin, &dims).unwrap();

        let expected = [(0.0, 0.0), (639.0, 0.0), (639.0, 359.0), (0.0, 359.0)];
        for (src, (ex, ey)) in pin.points().iter().zip(expected) {
            let mapped = transform.apply(src).unwrap();
            assert_relative_eq!(mapped.x, ex, epsilon = 1e-6);
            assert_relative_eq!(mapped.y, ey, epsilon = 1e-6);
        }
    }

    #[test]
    fn axis_aligned_pin_yields_affine_transform() {
        let pin = pin([(100.0, 50.0), (500.0, 50.0), (500.0, 350.0), (100.0, 350.0)]);
        let dims = RectifiedDimensions::new(400, 300).unwrap();
        let transform = build_transform(&pin, &dims).unwrap();

        // No perspective component for a parallel-edge pin.
        let m = transform.matrix();
        assert_relative_eq!(m[(2, 0)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(m[(2, 1)], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn inverse_round_trips_interior_points() {
        let pin = pin([(300.0, 200.0), (900.0, 180.0), (950.0, 500.0), (250.0, 520.0)]);
        let dims = RectifiedDimensions::new(640, 360).unwrap();
        let transform = build_transform(&pin, &dims).unwrap();
        let inverse = transform.try_inverse().unwrap();

        for p in [Point2::new(500.0, 300.0), Point2::new(320.0, 240.0)] {
            let out = transform.apply(&p).unwrap();
            let back = inverse.apply(&out).unwrap();
            assert_relative_eq!(back.x, p.x, epsilon = 1e-8);
            assert_relative_eq!(back.y, p.y, epsilon = 1e-8);
        }
    }

    #[test]
    fn collapsed_pin_has_no_unique_transform() {
        let pin = pin([(10.0, 10.0), (10.0, 10.0), (10.0, 10.0), (10.0, 10.0)]);
        let dims = RectifiedDimensions::new(100, 100).unwrap();
        assert_eq!(
            build_transform(&pin, &dims),
            Err(CalibError::SingularTransform)
        );
    }
}
