use infovis_core::CameraPose;
use nalgebra::{Matrix4, Point3, UnitQuaternion};
use serde::{Deserialize, Serialize};

/// Opaque handle to an object owned by a scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectHandle(pub u64);

/// Texture id handed out by the scene for the camera background.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureId(pub u32);

/// 8-bit RGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Sphere marker appearance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub color: Rgb,
    pub radius: f64,
}

/// What kind of object a scene is asked to create.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ObjectKind {
    /// A measured correspondence point.
    ConfirmedMarker(MarkerStyle),
    /// The next model point to measure.
    PendingMarker(MarkerStyle),
    /// The model visualization placed by the correspondence transform.
    Overlay,
}

/// Errors reported by a scene for resources it could not create.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("texture creation failed: {0}")]
    Texture(String),
    #[error("operation not supported by this scene")]
    Unsupported,
}

/// Render scene seen from the correspondence logic.
///
/// The scene owns the objects; callers only keep the handles returned by
/// [`SceneSink::add_object`]. All calls are expected on the render thread and
/// complete synchronously.
pub trait SceneSink {
    fn add_object(&mut self, position: Point3<f64>, kind: ObjectKind) -> ObjectHandle;

    /// Remove an object. Unknown handles are ignored.
    fn remove_object(&mut self, handle: ObjectHandle);

    fn set_position(&mut self, handle: ObjectHandle, position: Point3<f64>);

    fn set_orientation(&mut self, handle: ObjectHandle, orientation: UnitQuaternion<f64>);

    fn set_scale(&mut self, handle: ObjectHandle, scale: f64);

    /// Move the viewing camera.
    fn set_camera_pose(&mut self, _pose: &CameraPose) {}

    /// Replace the camera projection, typically built from the colour camera
    /// intrinsics. Scenes may reset it when the render surface changes.
    fn set_projection(&mut self, _projection: &Matrix4<f64>) {}

    /// Replace the background quad texture coordinates.
    fn set_background_uv(&mut self, _uv: &[f32; 8]) {}

    /// Create the texture the camera frames are streamed into.
    fn bind_camera_texture(&mut self) -> Result<TextureId, SceneError> {
        Err(SceneError::Unsupported)
    }
}
