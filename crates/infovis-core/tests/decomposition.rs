use approx::assert_relative_eq;
use infovis_core::{DecomposeParams, PoseTransform, ReferenceModel, TransformError};
use nalgebra::{Matrix4, UnitQuaternion, Vector3};

/// Deterministic spread of poses: every axis, a range of angles and scales.
fn pose_grid() -> Vec<(f64, UnitQuaternion<f64>, Vector3<f64>)> {
    let mut out = Vec::new();
    for (k, angle) in [-2.9, -1.0, 0.0, 0.3, 1.7, 3.1].into_iter().enumerate() {
        for axis in [Vector3::x(), Vector3::y(), Vector3::z(), Vector3::new(1.0, -2.0, 0.5)] {
            let q = UnitQuaternion::from_scaled_axis(axis.normalize() * angle);
            let s = 0.01 * 10f64.powi(k as i32 % 4);
            let t = Vector3::new(angle, -0.5 * angle, 2.0 + k as f64);
            out.push((s, q, t));
        }
    }
    out
}

#[test]
fn decomposition_recovers_every_component() {
    let params = DecomposeParams::default();
    for (s, q, t) in pose_grid() {
        let parts = PoseTransform::from_components(s, q, t)
            .decompose(&params)
            .expect("uniform scale decomposes");
        assert_relative_eq!(parts.scale, s, max_relative = 1e-9);
        assert_relative_eq!(parts.rotation.coords.dot(&q.coords).abs(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(parts.translation, t, epsilon = 1e-12);
    }
}

#[test]
fn recomposed_transform_projects_like_the_original() {
    let model = ReferenceModel::unit_square();
    let params = DecomposeParams::default();
    for (s, q, t) in pose_grid() {
        let original = PoseTransform::from_components(s, q, t);
        let rebuilt = original.decompose(&params).expect("decomposes").to_transform();
        for (a, b) in model
            .projected_points(&original)
            .iter()
            .zip(model.projected_points(&rebuilt).iter())
        {
            assert_relative_eq!(*a, *b, epsilon = 1e-9);
        }
    }
}

#[test]
fn scale_below_minimum_is_reported() {
    let params = DecomposeParams {
        min_scale: 1e-3,
        ..DecomposeParams::default()
    };
    let m = Matrix4::new_nonuniform_scaling(&Vector3::repeat(1e-4));
    match PoseTransform::new(m).decompose(&params) {
        Err(TransformError::DegenerateScale { scale }) => {
            assert_relative_eq!(scale, 1e-4, max_relative = 1e-12)
        }
        other => panic!("expected degenerate scale, got {other:?}"),
    }
}
