//! Core geometry for correspondence-driven AR overlays.
//!
//! This crate is intentionally small and purely geometric. It knows nothing
//! about rendering engines or input handling:
//! - [`PoseTransform`]: 4×4 homogeneous transforms (column-vector convention),
//! - [`decompose_transform`]: uniform scale / rotation / translation split,
//! - [`ReferenceModel`]: the ordered model-frame points a user must match,
//! - [`CameraPose`]: per-frame camera pose from a tracking source.

mod camera;
mod logger;
mod model;
mod transform;

pub use camera::{CameraPose, Handedness};
pub use model::{ModelError, ReferenceModel, ReferenceModelSpec, UNIT_SQUARE_LIFT};
pub use transform::{
    decompose_transform, DecomposeParams, PoseComponents, PoseTransform, TransformError,
};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;

pub use nalgebra;
