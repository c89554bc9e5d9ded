//! JSON session scripts and replay reports.
//!
//! A script lists frames; each frame optionally moves the camera, supplies the
//! model transform, and applies one measurement action before rendering. The
//! replay runs against a [`RecordingScene`] and summarizes what happened.

use crate::{HighlightOp, OverlayOp, RenderUpdate, Session, TrackerParams};
use infovis_core::{CameraPose, ModelError, PoseTransform, ReferenceModel, ReferenceModelSpec};
use infovis_scene::{DisplayRotation, RecordingScene};
use log::{info, warn};
use nalgebra::{Matrix4, Point3};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum SessionIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Camera pose as delivered by a tracking source.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraScript {
    pub translation: [f64; 3],
    /// Rotation quaternion, `(x, y, z, w)`.
    pub rotation: [f64; 4],
}

impl CameraScript {
    pub fn to_pose(&self) -> CameraPose {
        CameraPose::from_translation_xyzw(self.translation, self.rotation)
    }
}

/// User input applied before a frame is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum MeasurementAction {
    /// Append an independently sensed point.
    Add { point: [f64; 3] },
    /// Append the projected position of the next model point.
    AddAimed,
    Undo,
    Clear,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameScript {
    /// The render surface was resized before this frame.
    #[serde(default)]
    pub surface_changed: bool,
    /// Column-major camera projection, applied after any surface change.
    #[serde(default)]
    pub projection: Option<[f64; 16]>,
    #[serde(default)]
    pub camera: Option<CameraScript>,
    /// Column-major model-to-world transform; the previous frame's is reused when absent.
    #[serde(default)]
    pub transform: Option<PoseTransform>,
    #[serde(default)]
    pub action: Option<MeasurementAction>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionScript {
    /// Model points; the unit square when absent.
    #[serde(default)]
    pub model: Option<ReferenceModelSpec>,
    #[serde(default)]
    pub params: Option<TrackerParams>,
    #[serde(default)]
    pub display_rotation: DisplayRotation,
    #[serde(default)]
    pub frames: Vec<FrameScript>,
    #[serde(default)]
    pub output_path: Option<String>,
}

impl SessionScript {
    /// Load a JSON script from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SessionIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this script to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SessionIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("infovis_report.json"))
    }

    /// Build the validated reference model.
    pub fn build_model(&self) -> Result<ReferenceModel, SessionConfigError> {
        match &self.model {
            Some(spec) => Ok(ReferenceModel::from_spec(spec)?),
            None => Ok(ReferenceModel::unit_square()),
        }
    }

    pub fn build_params(&self) -> TrackerParams {
        self.params.clone().unwrap_or_default()
    }
}

/// Final overlay placement, in plain arrays.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayPlacement {
    pub scale: f64,
    pub translation: [f64; 3],
    /// `(x, y, z, w)`.
    pub rotation: [f64; 4],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameSummary {
    pub index: usize,
    pub measured: usize,
    pub markers_added: usize,
    pub markers_removed: usize,
    #[serde(default)]
    pub highlight: Option<[f64; 3]>,
    pub overlay_placed: bool,
    #[serde(default)]
    pub overlay_skip_reason: Option<String>,
    #[serde(default)]
    pub action_error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub model_points: usize,
    pub display_rotation: DisplayRotation,
    pub texture_bound: bool,
    /// A projection was set after the last surface change.
    #[serde(default)]
    pub camera_configured: bool,
    pub frames: Vec<FrameSummary>,
    pub confirmed_markers: usize,
    pub highlight_visible: bool,
    #[serde(default)]
    pub overlay: Option<OverlayPlacement>,
}

impl SessionReport {
    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SessionIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SessionIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

fn summarize(
    index: usize,
    measured: usize,
    update: &RenderUpdate,
    action_error: Option<String>,
) -> FrameSummary {
    let highlight = match &update.highlight {
        HighlightOp::Show { position, .. } => Some([position.x, position.y, position.z]),
        HighlightOp::Hide | HighlightOp::Absent => None,
    };
    let (overlay_placed, overlay_skip_reason) = match &update.overlay {
        OverlayOp::Place { .. } => (true, None),
        OverlayOp::Skip { reason } => (false, Some(reason.to_string())),
    };
    FrameSummary {
        index,
        measured,
        markers_added: update.markers.added(),
        markers_removed: update.markers.removed(),
        highlight,
        overlay_placed,
        overlay_skip_reason,
        action_error,
    }
}

fn apply_action(
    session: &Session<RecordingScene>,
    action: MeasurementAction,
    transform: &PoseTransform,
) -> Option<String> {
    let result = match action {
        MeasurementAction::Add { point } => session
            .add_measurement(Point3::new(point[0], point[1], point[2]))
            .map(|_| ()),
        MeasurementAction::AddAimed => session.add_aimed_measurement(transform).map(|_| ()),
        MeasurementAction::Undo => {
            session.undo_measurement();
            Ok(())
        }
        MeasurementAction::Clear => {
            session.clear_measurements();
            Ok(())
        }
    };
    result.err().map(|err| {
        warn!("measurement action {action:?} rejected: {err}");
        err.to_string()
    })
}

/// Replay `script` against an in-memory scene.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "info", skip(script), fields(frames = script.frames.len()))
)]
pub fn run_script(script: &SessionScript) -> Result<SessionReport, SessionConfigError> {
    let model = script.build_model()?;
    let model_points = model.point_count();
    let mut session = Session::new(model, script.build_params(), RecordingScene::new());
    session.set_display_rotation(script.display_rotation);

    let mut transform = PoseTransform::identity();
    let mut frames = Vec::with_capacity(script.frames.len());
    for (index, frame) in script.frames.iter().enumerate() {
        if frame.surface_changed {
            session.surface_changed();
        }
        if let Some(values) = &frame.projection {
            session.set_projection(&Matrix4::from_column_slice(values));
        }
        if let Some(t) = frame.transform {
            transform = t;
        }
        let action_error = frame
            .action
            .and_then(|action| apply_action(&session, action, &transform));
        let camera = frame.camera.map(|c| c.to_pose());
        let update = session.frame(camera.as_ref(), &transform);
        let measured = session.measurements().len();
        frames.push(summarize(index, measured, &update, action_error));
    }

    let tracker = session.tracker();
    let overlay = tracker.overlay_pose().map(|pose| {
        let q = pose.rotation.coords;
        OverlayPlacement {
            scale: pose.scale,
            translation: [pose.translation.x, pose.translation.y, pose.translation.z],
            rotation: [q.x, q.y, q.z, q.w],
        }
    });
    let report = SessionReport {
        model_points,
        display_rotation: script.display_rotation,
        texture_bound: session.texture().is_some(),
        camera_configured: session.is_camera_configured(),
        confirmed_markers: tracker.confirmed_count(),
        highlight_visible: tracker.has_highlight(),
        frames,
        overlay,
    };
    info!(
        "replayed {} frames: {} confirmed markers, highlight visible: {}",
        report.frames.len(),
        report.confirmed_markers,
        report.highlight_visible
    );
    Ok(report)
}
