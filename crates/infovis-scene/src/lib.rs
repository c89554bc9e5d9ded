//! Render scene interface for correspondence-driven AR overlays.
//!
//! The correspondence logic talks to a renderer only through [`SceneSink`]:
//! it creates objects, keeps the returned [`ObjectHandle`]s, and moves or
//! removes them later. [`RecordingScene`] is an in-memory sink that records
//! every call, which is what tests and the CLI replay use.

mod background;
mod recording;
mod sink;

pub use background::DisplayRotation;
pub use recording::{RecordingScene, SceneCommand, SceneObject};
pub use sink::{MarkerStyle, ObjectHandle, ObjectKind, Rgb, SceneError, SceneSink, TextureId};
