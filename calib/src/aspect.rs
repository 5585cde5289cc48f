//! True aspect ratio of a perspective-distorted rectangle.
//!
//! Single-view metrology after Zhang & He, "Whiteboard Scanning and Image
//! Enhancement": the two pairs of opposite edges define two vanishing
//! points, which together with the principal point determine the squared
//! effective focal length, from which the ratio of the true side lengths
//! follows.

use crate::{CalibError, Result};
use nalgebra::Point2;
use scorecast_core::CornerPin;

/// Width/height ratio of the undistorted rectangle. Always positive and
/// finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectRatio(f64);

impl AspectRatio {
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(CalibError::InvalidAspectRatio(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// Cross-ratio terms this close to 1 mean the corresponding vanishing point
/// is at infinity (the image edges are parallel).
const UNITY_TOL: f64 = 1e-6;

/// Absolute cutoff below which a determinant-like term counts as zero.
const DEGENERACY_EPS: f64 = 1e-9;

/// Estimates the true aspect ratio of the rectangle behind `pin`.
///
/// `principal_point` is the assumed optical center, normally half the
/// capture resolution in each axis. The result is invariant under uniform
/// scaling of the corners about the principal point.
pub fn estimate_aspect_ratio(pin: &CornerPin, principal_point: Point2<f64>) -> Result<AspectRatio> {
    // Corner roles in the Zhang-He construction: m1 is the corner shared by
    // the two measured edges, m2 closes the bottom edge, m3 the left edge,
    // and m4 is diagonal to m1. All are centered on the principal point.
    let m1 = pin.bottom_left() - principal_point;
    let m2 = pin.bottom_right() - principal_point;
    let m3 = pin.top_left() - principal_point;
    let m4 = pin.top_right() - principal_point;

    let k2_den = (m2.y - m4.y) * m3.x - (m2.x - m4.x) * m3.y + m2.x * m4.y - m2.y * m4.x;
    let k3_den = (m3.y - m4.y) * m2.x - (m3.x - m4.x) * m2.y + m3.x * m4.y - m3.y * m4.x;
    if k2_den.abs() < DEGENERACY_EPS || k3_den.abs() < DEGENERACY_EPS {
        return Err(CalibError::CollinearCorners);
    }

    let k2 = ((m1.y - m4.y) * m3.x - (m1.x - m4.x) * m3.y + m1.x * m4.y - m1.y * m4.x) / k2_den;
    let k3 = ((m1.y - m4.y) * m2.x - (m1.x - m4.x) * m2.y + m1.x * m4.y - m1.y * m4.x) / k3_den;

    // Fronto-parallel pin: both vanishing points at infinity, the projection
    // is affine and the image edge lengths already carry the true ratio.
    if (k2 - 1.0).abs() < UNITY_TOL && (k3 - 1.0).abs() < UNITY_TOL {
        let width = (m2 - m1).norm();
        let height = (m3 - m1).norm();
        if height < DEGENERACY_EPS {
            return Err(CalibError::ZeroLengthEdge);
        }
        return AspectRatio::new(width / height);
    }

    let focal_den = (k3 - 1.0) * (k2 - 1.0);
    if focal_den.abs() < DEGENERACY_EPS {
        // Exactly one vanishing point at infinity; the focal solve blows up.
        return Err(CalibError::ParallelEdges);
    }

    let f_sq = -((k3 * m3.y - m1.y) * (k2 * m2.y - m1.y)
        + (k3 * m3.x - m1.x) * (k2 * m2.x - m1.x))
        / focal_den;
    if f_sq <= 0.0 {
        return Err(CalibError::NonPositiveFocal(f_sq));
    }

    let width_sq =
        (k2 - 1.0).powi(2) + ((k2 * m2.y - m1.y).powi(2) + (k2 * m2.x - m1.x).powi(2)) / f_sq;
    let height_sq =
        (k3 - 1.0).powi(2) + ((k3 * m3.y - m1.y).powi(2) + (k3 * m3.x - m1.x).powi(2)) / f_sq;
    if height_sq < DEGENERACY_EPS {
        return Err(CalibError::ZeroLengthEdge);
    }

    AspectRatio::new((width_sq / height_sq).sqrt())
}
