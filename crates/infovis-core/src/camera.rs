use nalgebra::{Point3, Quaternion, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Quaternion handedness expected by a scene's camera.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    /// Same convention as the pose source.
    #[default]
    RightHanded,
    /// Engines that read quaternions left-handed get the conjugate orientation.
    LeftHanded,
}

/// Camera pose in the start-of-tracking frame, as delivered by a pose source.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Point3<f64>,
    pub orientation: UnitQuaternion<f64>,
}

impl CameraPose {
    pub fn new(position: Point3<f64>, orientation: UnitQuaternion<f64>) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Build from a translation and a `(x, y, z, w)` rotation, the layout most
    /// tracking SDKs use. The quaternion is normalized.
    pub fn from_translation_xyzw(translation: [f64; 3], rotation: [f64; 4]) -> Self {
        let [x, y, z, w] = rotation;
        Self::new(
            Point3::from(Vector3::from(translation)),
            UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z)),
        )
    }

    /// Orientation expressed in the opposite handedness convention.
    pub fn conjugate_orientation(&self) -> UnitQuaternion<f64> {
        self.orientation.conjugate()
    }

    /// This pose with its orientation converted for a scene using `handedness`.
    pub fn for_handedness(&self, handedness: Handedness) -> Self {
        match handedness {
            Handedness::RightHanded => *self,
            Handedness::LeftHanded => Self::new(self.position, self.conjugate_orientation()),
        }
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::new(Point3::origin(), UnitQuaternion::identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn xyzw_order_maps_to_scalar_last() {
        let half = std::f64::consts::FRAC_1_SQRT_2;
        let pose = CameraPose::from_translation_xyzw([1.0, 2.0, 3.0], [0.0, 0.0, half, half]);
        assert_relative_eq!(pose.position, Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(pose.orientation.angle(), std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        let axis = pose.orientation.axis().expect("axis");
        assert_relative_eq!(axis.into_inner(), Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn conjugate_inverts_rotation() {
        let pose = CameraPose::from_translation_xyzw([0.0; 3], [0.1, 0.2, 0.3, 0.9]);
        let round = pose.orientation * pose.conjugate_orientation();
        assert_relative_eq!(round.angle(), 0.0, epsilon = 1e-7);
    }

    #[test]
    fn left_handed_scene_gets_conjugate_orientation() {
        let pose = CameraPose::from_translation_xyzw([1.0, 0.0, 0.0], [0.1, 0.2, 0.3, 0.9]);
        assert_eq!(pose.for_handedness(Handedness::RightHanded), pose);

        let left = pose.for_handedness(Handedness::LeftHanded);
        assert_eq!(left.position, pose.position);
        assert_eq!(left.orientation, pose.orientation.conjugate());
    }
}
