use nalgebra::Point2;
use scorecast_calib::{
    build_transform, estimate_aspect_ratio, solve_dimensions, AspectRatio, RectifiedDimensions,
    TransformMatrix,
};
use scorecast_core::CornerPin;

/// Everything the rectification engine needs, produced in one shot from an
/// accepted corner pin and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Calibration {
    corner_pin: CornerPin,
    aspect_ratio: AspectRatio,
    dimensions: RectifiedDimensions,
    transform: TransformMatrix,
}

impl Calibration {
    /// Runs the estimator, dimension solver, and transform builder in
    /// sequence. Any degenerate-geometry error aborts the chain.
    pub fn solve(
        corner_pin: CornerPin,
        principal_point: Point2<f64>,
    ) -> scorecast_calib::Result<Self> {
        let aspect_ratio = estimate_aspect_ratio(&corner_pin, principal_point)?;
        let dimensions = solve_dimensions(&corner_pin, aspect_ratio)?;
        let transform = build_transform(&corner_pin, &dimensions)?;

        tracing::info!(
            aspect = %aspect_ratio,
            dimensions = %dimensions,
            "scoreboard calibrated"
        );

        Ok(Self {
            corner_pin,
            aspect_ratio,
            dimensions,
            transform,
        })
    }

    pub fn corner_pin(&self) -> &CornerPin {
        &self.corner_pin
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn dimensions(&self) -> RectifiedDimensions {
        self.dimensions
    }

    pub fn transform(&self) -> &TransformMatrix {
        &self.transform
    }
}
