//! Homogeneous pose transforms and their scale / rotation / translation split.
//!
//! Matrices follow the column-vector convention `p' = T * p`. Arrays exchanged
//! with OpenGL-style pose sources are column-major, 16 elements.

use nalgebra::{Matrix3, Matrix4, Point3, Rotation3, UnitQuaternion, Vector3, Vector4};
use serde::{Deserialize, Serialize};

/// Errors produced when a transform cannot be split into a uniform-scale pose.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TransformError {
    #[error("transform contains non-finite entries")]
    NonFinite,
    #[error("degenerate scale factor {scale}")]
    DegenerateScale { scale: f64 },
    #[error("anisotropic scale (column norms {column_norms:?})")]
    Anisotropic { column_norms: [f64; 3] },
    #[error("sheared linear block (orthogonality residual {residual})")]
    Sheared { residual: f64 },
    #[error("mirrored transform (determinant {determinant})")]
    Mirrored { determinant: f64 },
}

/// Tolerances used by [`decompose_transform`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecomposeParams {
    /// Scale factors below this value (or non-finite) are rejected.
    #[serde(default = "default_min_scale")]
    pub min_scale: f64,
    /// Maximum allowed `(max - min) / mean` spread of the linear block's column norms,
    /// and maximum Frobenius norm of `UᵀU - I` for the unit-normalized columns `U`.
    #[serde(default = "default_anisotropy_tolerance")]
    pub anisotropy_tolerance: f64,
}

fn default_min_scale() -> f64 {
    1e-9
}

fn default_anisotropy_tolerance() -> f64 {
    1e-2
}

impl Default for DecomposeParams {
    fn default() -> Self {
        Self {
            min_scale: default_min_scale(),
            anisotropy_tolerance: default_anisotropy_tolerance(),
        }
    }
}

/// A 4×4 homogeneous transform, model-to-world or world-to-camera.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 16]", into = "[f64; 16]")]
pub struct PoseTransform {
    matrix: Matrix4<f64>,
}

impl PoseTransform {
    pub fn new(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    pub fn identity() -> Self {
        Self::new(Matrix4::identity())
    }

    /// Build from a column-major array, the layout used by OpenGL matrices.
    pub fn from_column_major(values: [f64; 16]) -> Self {
        Self::new(Matrix4::from_column_slice(&values))
    }

    /// Build from a single-precision column-major array as delivered by GL pose sources.
    pub fn from_gl(values: &[f32; 16]) -> Self {
        Self::from_column_major(values.map(f64::from))
    }

    pub fn to_column_major(&self) -> [f64; 16] {
        let mut out = [0.0; 16];
        out.copy_from_slice(self.matrix.as_slice());
        out
    }

    /// Compose `translate(t) * rotate(q) * scale(s, s, s)`.
    pub fn from_components(
        scale: f64,
        rotation: UnitQuaternion<f64>,
        translation: Vector3<f64>,
    ) -> Self {
        let m = Matrix4::new_translation(&translation)
            * rotation.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&Vector3::repeat(scale));
        Self::new(m)
    }

    #[inline]
    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// Apply the transform to a point (`w = 1`); the resulting `w` is discarded.
    #[inline]
    pub fn transform_point(&self, p: &Point3<f64>) -> Point3<f64> {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Translation column.
    pub fn translation(&self) -> Vector3<f64> {
        self.matrix.fixed_view::<3, 1>(0, 3).into_owned()
    }

    pub fn decompose(&self, params: &DecomposeParams) -> Result<PoseComponents, TransformError> {
        decompose_transform(&self.matrix, params)
    }
}

impl Default for PoseTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<[f64; 16]> for PoseTransform {
    fn from(values: [f64; 16]) -> Self {
        Self::from_column_major(values)
    }
}

impl From<PoseTransform> for [f64; 16] {
    fn from(t: PoseTransform) -> Self {
        t.to_column_major()
    }
}

impl From<Matrix4<f64>> for PoseTransform {
    fn from(matrix: Matrix4<f64>) -> Self {
        Self::new(matrix)
    }
}

/// Isolated pose components of a uniformly scaled rigid transform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseComponents {
    pub scale: f64,
    pub rotation: UnitQuaternion<f64>,
    pub translation: Vector3<f64>,
}

impl PoseComponents {
    pub fn to_transform(&self) -> PoseTransform {
        PoseTransform::from_components(self.scale, self.rotation, self.translation)
    }
}

/// Split `matrix` into uniform scale, rotation and translation.
///
/// The scale is the mean of the column norms of the upper-left 3×3 block. It is
/// stripped by right-multiplying with `diag(1/s, 1/s, 1/s, 1)` before the
/// rotation is read, so it never leaks into the orientation. The quaternion is
/// renormalized after extraction.
///
/// For `translate(t) * rotate(q) * scale(s)` with `s > 0` the recovered values
/// match `s`, `±q` and `t` to about `1e-9` in `f64`.
///
/// Anisotropic or sheared (beyond `params.anisotropy_tolerance`) and mirrored
/// transforms are rejected instead of producing a skewed rotation.
pub fn decompose_transform(
    matrix: &Matrix4<f64>,
    params: &DecomposeParams,
) -> Result<PoseComponents, TransformError> {
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(TransformError::NonFinite);
    }

    let linear: Matrix3<f64> = matrix.fixed_view::<3, 3>(0, 0).into_owned();
    let column_norms = [
        linear.column(0).norm(),
        linear.column(1).norm(),
        linear.column(2).norm(),
    ];
    let scale = column_norms.iter().sum::<f64>() / 3.0;
    if !scale.is_finite() || scale < params.min_scale {
        return Err(TransformError::DegenerateScale { scale });
    }

    let max = column_norms.iter().copied().fold(f64::MIN, f64::max);
    let min = column_norms.iter().copied().fold(f64::MAX, f64::min);
    if (max - min) / scale > params.anisotropy_tolerance {
        return Err(TransformError::Anisotropic { column_norms });
    }

    let mut unit_columns = linear;
    for (j, norm) in column_norms.iter().enumerate() {
        unit_columns.column_mut(j).unscale_mut(*norm);
    }
    let residual = (unit_columns.transpose() * unit_columns - Matrix3::identity()).norm();
    if residual > params.anisotropy_tolerance {
        return Err(TransformError::Sheared { residual });
    }

    let determinant = linear.determinant();
    if determinant < 0.0 {
        return Err(TransformError::Mirrored { determinant });
    }

    let inv_scale = Matrix4::new_nonuniform_scaling(&Vector3::repeat(1.0 / scale));
    let normalized = matrix * inv_scale;
    let rotation_block: Matrix3<f64> = normalized.fixed_view::<3, 3>(0, 0).into_owned();

    let mut rotation =
        UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(rotation_block));
    rotation.renormalize();

    let translation = matrix.fixed_view::<3, 1>(0, 3).into_owned();

    Ok(PoseComponents {
        scale,
        rotation,
        translation,
    })
}
