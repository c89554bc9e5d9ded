//! High-level facade crate for the `infovis-*` workspace.
//!
//! This crate provides:
//! - stable re-exports of the model, scene and tracker crates
//! - [`replay_file`], which runs a JSON session script end to end and writes
//!   the resulting report
//!
//! ## Quickstart
//!
//! ```no_run
//! use infovis::core::{PoseTransform, ReferenceModel};
//! use infovis::scene::RecordingScene;
//! use infovis::tracker::{Session, TrackerParams};
//!
//! let mut session = Session::new(
//!     ReferenceModel::unit_square(),
//!     TrackerParams::default(),
//!     RecordingScene::new(),
//! );
//! let transform = PoseTransform::identity();
//! session.add_aimed_measurement(&transform).ok();
//! let update = session.frame(None, &transform);
//! println!("markers added: {}", update.markers.added());
//! ```
//!
//! ## API map
//! - `infovis::core`: reference models, model transforms and their decomposition, camera poses, logging.
//! - `infovis::scene`: the `SceneSink` seam, a recording scene, background texture coordinates.
//! - `infovis::tracker`: marker reconciliation, highlight and overlay placement, sessions and script replay.

use std::path::{Path, PathBuf};

pub use infovis_core as core;
pub use infovis_scene as scene;
pub use infovis_tracker as tracker;

pub use infovis_core::{PoseComponents, PoseTransform, ReferenceModel, TransformError};
pub use infovis_scene::{RecordingScene, SceneSink};
pub use infovis_tracker::{
    CorrespondenceTracker, RenderUpdate, Session, SessionReport, SessionScript, TrackerParams,
};

#[derive(thiserror::Error, Debug)]
pub enum ReplayError {
    #[error("failed to read or write session files: {0}")]
    Io(#[from] infovis_tracker::SessionIoError),
    #[error("invalid session script: {0}")]
    Config(#[from] infovis_tracker::SessionConfigError),
}

/// Replay the script at `script_path` and write the report.
///
/// The report goes to `out` when given, otherwise to the script's own
/// `output_path`. Returns the report and the path it was written to.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "info", skip_all, fields(script = %script_path.display()))
)]
pub fn replay_file(
    script_path: &Path,
    out: Option<&Path>,
) -> Result<(SessionReport, PathBuf), ReplayError> {
    let script = SessionScript::load_json(script_path)?;
    let report = infovis_tracker::run_script(&script)?;
    let out_path = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| script.output_path());
    report.write_json(&out_path)?;
    log::info!("report written to {}", out_path.display());
    Ok((report, out_path))
}
