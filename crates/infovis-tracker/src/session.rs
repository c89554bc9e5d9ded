//! Per-frame driver tying the tracker, the measurement log and a scene together.

use crate::{CorrespondenceTracker, MeasurementError, MeasurementLog, RenderUpdate, TrackerParams};
use infovis_core::{CameraPose, PoseTransform, ReferenceModel};
use infovis_scene::{DisplayRotation, SceneSink, TextureId};
use log::{debug, info, warn};
use nalgebra::{Matrix4, Point3};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// An AR session rendering into one scene.
///
/// `frame` must be called from the thread that owns the scene. Measurements may
/// be added from elsewhere through the handle returned by
/// [`measurements`](Self::measurements).
pub struct Session<S: SceneSink> {
    tracker: CorrespondenceTracker,
    measurements: MeasurementLog,
    scene: S,
    texture: Option<TextureId>,
    camera_configured: bool,
}

impl<S: SceneSink> Session<S> {
    /// Attach to `scene` and bind the camera background texture.
    ///
    /// A texture failure is logged and the session renders without background.
    pub fn new(model: ReferenceModel, params: TrackerParams, mut scene: S) -> Self {
        let measurements = MeasurementLog::with_capacity(model.point_count());
        let tracker = CorrespondenceTracker::attach(model, params, &mut scene);
        let texture = match scene.bind_camera_texture() {
            Ok(id) => Some(id),
            Err(err) => {
                warn!("camera texture unavailable, rendering without background: {err}");
                None
            }
        };
        info!(
            "session started with {} model points",
            tracker.model().point_count()
        );
        Self {
            tracker,
            measurements,
            scene,
            texture,
            camera_configured: false,
        }
    }

    pub fn tracker(&self) -> &CorrespondenceTracker {
        &self.tracker
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn into_scene(self) -> S {
        self.scene
    }

    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    /// Shared handle to the measured point list.
    pub fn measurements(&self) -> MeasurementLog {
        self.measurements.clone()
    }

    /// Remap the background quad for a new display rotation.
    pub fn set_display_rotation(&mut self, rotation: DisplayRotation) {
        self.scene.set_background_uv(&rotation.texture_coords());
    }

    /// Set the scene camera projection (column-vector convention), usually
    /// derived from the colour camera intrinsics.
    pub fn set_projection(&mut self, projection: &Matrix4<f64>) {
        self.scene.set_projection(projection);
        self.camera_configured = true;
    }

    /// The render surface was resized; the scene may have reset its projection,
    /// so [`set_projection`](Self::set_projection) is needed again.
    pub fn surface_changed(&mut self) {
        if self.camera_configured {
            debug!("render surface changed, camera projection must be set again");
        }
        self.camera_configured = false;
    }

    /// Whether a projection has been set since the last surface change.
    pub fn is_camera_configured(&self) -> bool {
        self.camera_configured
    }

    /// Render one frame: move the camera, then reconcile against a snapshot of
    /// the measured points.
    ///
    /// The camera orientation is converted to the scene's
    /// [`camera_handedness`](TrackerParams::camera_handedness).
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
    pub fn frame(
        &mut self,
        camera: Option<&CameraPose>,
        model_transform: &PoseTransform,
    ) -> RenderUpdate {
        if let Some(pose) = camera {
            let handedness = self.tracker.params().camera_handedness;
            self.scene.set_camera_pose(&pose.for_handedness(handedness));
        }
        let measured = self.measurements.snapshot();
        self.tracker.reconcile(&measured, model_transform, &mut self.scene)
    }

    pub fn add_measurement(&self, point: Point3<f64>) -> Result<usize, MeasurementError> {
        self.measurements.push(point)
    }

    /// Measure the next model point at its position under `model_transform`.
    ///
    /// The index is read and the point appended under one lock, so concurrent
    /// callers still store model point `k` as correspondence `k`.
    pub fn add_aimed_measurement(
        &self,
        model_transform: &PoseTransform,
    ) -> Result<usize, MeasurementError> {
        self.measurements
            .push_with(|len| self.tracker.next_reference_point(len, model_transform))
    }

    pub fn undo_measurement(&self) -> Option<Point3<f64>> {
        self.measurements.undo()
    }

    pub fn clear_measurements(&self) {
        self.measurements.clear();
    }
}
