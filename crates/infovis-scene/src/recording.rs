//! In-memory scene that records every call.
//!
//! Used by tests and by the CLI replay to observe what the tracker asks a
//! renderer to do, without a live rendering engine.

use crate::{ObjectHandle, ObjectKind, SceneError, SceneSink, TextureId};
use infovis_core::CameraPose;
use nalgebra::{Matrix4, Point3, UnitQuaternion};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One call made against a [`RecordingScene`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum SceneCommand {
    Add {
        handle: ObjectHandle,
        position: Point3<f64>,
        kind: ObjectKind,
    },
    Remove {
        handle: ObjectHandle,
    },
    SetPosition {
        handle: ObjectHandle,
        position: Point3<f64>,
    },
    SetOrientation {
        handle: ObjectHandle,
        orientation: UnitQuaternion<f64>,
    },
    SetScale {
        handle: ObjectHandle,
        scale: f64,
    },
    SetCamera {
        pose: CameraPose,
    },
    SetProjection {
        projection: Matrix4<f64>,
    },
    SetBackgroundUv {
        uv: [f32; 8],
    },
    BindTexture {
        texture: Option<TextureId>,
    },
}

/// Live state of an object in a [`RecordingScene`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub kind: ObjectKind,
    pub position: Point3<f64>,
    pub orientation: UnitQuaternion<f64>,
    pub scale: f64,
}

#[derive(Debug, Default)]
pub struct RecordingScene {
    next_handle: u64,
    objects: BTreeMap<ObjectHandle, SceneObject>,
    commands: Vec<SceneCommand>,
    camera: Option<CameraPose>,
    projection: Option<Matrix4<f64>>,
    background_uv: Option<[f32; 8]>,
    texture_failure: Option<String>,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `bind_camera_texture` fail with the given message.
    pub fn with_texture_failure(mut self, message: impl Into<String>) -> Self {
        self.texture_failure = Some(message.into());
        self
    }

    pub fn commands(&self) -> &[SceneCommand] {
        &self.commands
    }

    /// Drain the recorded commands, keeping the live object table.
    pub fn take_commands(&mut self) -> Vec<SceneCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn objects(&self) -> &BTreeMap<ObjectHandle, SceneObject> {
        &self.objects
    }

    pub fn object(&self, handle: ObjectHandle) -> Option<&SceneObject> {
        self.objects.get(&handle)
    }

    /// Live confirmed markers in creation order.
    pub fn confirmed_markers(&self) -> Vec<&SceneObject> {
        self.objects
            .values()
            .filter(|o| matches!(o.kind, ObjectKind::ConfirmedMarker(_)))
            .collect()
    }

    /// Live pending (next point) markers.
    pub fn pending_markers(&self) -> Vec<&SceneObject> {
        self.objects
            .values()
            .filter(|o| matches!(o.kind, ObjectKind::PendingMarker(_)))
            .collect()
    }

    pub fn overlay(&self) -> Option<&SceneObject> {
        self.objects
            .values()
            .find(|o| matches!(o.kind, ObjectKind::Overlay))
    }

    pub fn camera(&self) -> Option<&CameraPose> {
        self.camera.as_ref()
    }

    pub fn projection(&self) -> Option<&Matrix4<f64>> {
        self.projection.as_ref()
    }

    pub fn background_uv(&self) -> Option<&[f32; 8]> {
        self.background_uv.as_ref()
    }

    /// Count recorded adds and removes.
    pub fn structural_counts(&self) -> (usize, usize) {
        self.commands.iter().fold((0, 0), |(adds, removes), c| match c {
            SceneCommand::Add { .. } => (adds + 1, removes),
            SceneCommand::Remove { .. } => (adds, removes + 1),
            _ => (adds, removes),
        })
    }
}

impl SceneSink for RecordingScene {
    fn add_object(&mut self, position: Point3<f64>, kind: ObjectKind) -> ObjectHandle {
        let handle = ObjectHandle(self.next_handle);
        self.next_handle += 1;
        self.objects.insert(
            handle,
            SceneObject {
                kind,
                position,
                orientation: UnitQuaternion::identity(),
                scale: 1.0,
            },
        );
        self.commands.push(SceneCommand::Add {
            handle,
            position,
            kind,
        });
        handle
    }

    fn remove_object(&mut self, handle: ObjectHandle) {
        if self.objects.remove(&handle).is_none() {
            log::debug!("remove of unknown object {handle:?} ignored");
        }
        self.commands.push(SceneCommand::Remove { handle });
    }

    fn set_position(&mut self, handle: ObjectHandle, position: Point3<f64>) {
        if let Some(obj) = self.objects.get_mut(&handle) {
            obj.position = position;
        }
        self.commands.push(SceneCommand::SetPosition { handle, position });
    }

    fn set_orientation(&mut self, handle: ObjectHandle, orientation: UnitQuaternion<f64>) {
        if let Some(obj) = self.objects.get_mut(&handle) {
            obj.orientation = orientation;
        }
        self.commands.push(SceneCommand::SetOrientation {
            handle,
            orientation,
        });
    }

    fn set_scale(&mut self, handle: ObjectHandle, scale: f64) {
        if let Some(obj) = self.objects.get_mut(&handle) {
            obj.scale = scale;
        }
        self.commands.push(SceneCommand::SetScale { handle, scale });
    }

    fn set_camera_pose(&mut self, pose: &CameraPose) {
        self.camera = Some(*pose);
        self.commands.push(SceneCommand::SetCamera { pose: *pose });
    }

    fn set_projection(&mut self, projection: &Matrix4<f64>) {
        self.projection = Some(*projection);
        self.commands.push(SceneCommand::SetProjection {
            projection: *projection,
        });
    }

    fn set_background_uv(&mut self, uv: &[f32; 8]) {
        self.background_uv = Some(*uv);
        self.commands.push(SceneCommand::SetBackgroundUv { uv: *uv });
    }

    fn bind_camera_texture(&mut self) -> Result<TextureId, SceneError> {
        let result = match &self.texture_failure {
            Some(message) => Err(SceneError::Texture(message.clone())),
            None => Ok(TextureId(1)),
        };
        self.commands.push(SceneCommand::BindTexture {
            texture: result.as_ref().ok().copied(),
        });
        result
    }
}
