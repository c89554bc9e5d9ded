//! Reference model: the ordered model-frame points a user must match.

use crate::PoseTransform;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Lift applied to the unit square corners so markers sit just above the surface.
pub const UNIT_SQUARE_LIFT: f64 = 0.01;

/// Validation errors for [`ReferenceModelSpec`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("model point {index} has non-finite coordinates")]
    NonFinitePoint { index: usize },
}

/// Serializable list of model points, `[x, y, z]` each.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceModelSpec {
    pub points: Vec<[f64; 3]>,
}

/// Fixed, ordered set of points in a model's local frame.
///
/// The order is the order in which correspondences are requested. Points are
/// never mutated after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceModel {
    points: Vec<Point3<f64>>,
}

impl ReferenceModel {
    pub fn new(points: Vec<Point3<f64>>) -> Self {
        Self { points }
    }

    /// The four corners of the unit square in the `z = 0.01` plane.
    pub fn unit_square() -> Self {
        let z = UNIT_SQUARE_LIFT;
        Self::new(vec![
            Point3::new(0.0, 1.0, z),
            Point3::new(0.0, 0.0, z),
            Point3::new(1.0, 0.0, z),
            Point3::new(1.0, 1.0, z),
        ])
    }

    /// Validate and build a model from its serialized form.
    pub fn from_spec(spec: &ReferenceModelSpec) -> Result<Self, ModelError> {
        let mut points = Vec::with_capacity(spec.points.len());
        for (index, p) in spec.points.iter().enumerate() {
            if p.iter().any(|v| !v.is_finite()) {
                return Err(ModelError::NonFinitePoint { index });
            }
            points.push(Point3::new(p[0], p[1], p[2]));
        }
        Ok(Self::new(points))
    }

    pub fn to_spec(&self) -> ReferenceModelSpec {
        ReferenceModelSpec {
            points: self.points.iter().map(|p| [p.x, p.y, p.z]).collect(),
        }
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Map every model point through `transform`, keeping the model order.
    pub fn projected_points(&self, transform: &PoseTransform) -> Vec<Point3<f64>> {
        self.points
            .iter()
            .map(|p| transform.transform_point(p))
            .collect()
    }

    /// Projection of a single model point, `None` past the end of the model.
    pub fn projected_point(&self, index: usize, transform: &PoseTransform) -> Option<Point3<f64>> {
        self.points.get(index).map(|p| transform.transform_point(p))
    }
}

impl Default for ReferenceModel {
    fn default() -> Self {
        Self::unit_square()
    }
}
