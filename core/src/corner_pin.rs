use nalgebra::Point2;

/// The four user-selected corners of the scoreboard in raw-frame pixel
/// coordinates, clockwise starting at the visual top-left.
///
/// Validated on construction and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CornerPin {
    points: [Point2<f64>; 4],
}

/// Euclidean lengths of the four quadrilateral edges, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeLengths {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl CornerPin {
    pub fn new(points: [Point2<f64>; 4]) -> crate::Result<Self> {
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(crate::CoreError::NonFiniteCorner);
        }
        Ok(Self { points })
    }

    /// Builds a pin from collaborator input, which must contain exactly
    /// four points.
    pub fn from_slice(points: &[Point2<f64>]) -> crate::Result<Self> {
        let points: [Point2<f64>; 4] = points
            .try_into()
            .map_err(|_| crate::CoreError::InvalidCornerPin(points.len()))?;
        Self::new(points)
    }

    pub fn points(&self) -> &[Point2<f64>; 4] {
        &self.points
    }

    pub fn top_left(&self) -> Point2<f64> {
        self.points[0]
    }

    pub fn top_right(&self) -> Point2<f64> {
        self.points[1]
    }

    pub fn bottom_right(&self) -> Point2<f64> {
        self.points[2]
    }

    pub fn bottom_left(&self) -> Point2<f64> {
        self.points[3]
    }

    pub fn edge_lengths(&self) -> EdgeLengths {
        EdgeLengths {
            top: (self.top_right() - self.top_left()).norm(),
            bottom: (self.bottom_right() - self.bottom_left()).norm(),
            left: (self.bottom_left() - self.top_left()).norm(),
            right: (self.bottom_right() - self.top_right()).norm(),
        }
    }
}
