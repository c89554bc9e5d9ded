//! Correspondence tracking for AR overlays.
//!
//! Each frame the tracker:
//! 1. reconciles one confirmed marker per measured point (append or truncate at the tail),
//! 2. moves a highlight marker to the projection of the next model point to measure,
//!    or removes it once every model point has a measurement,
//! 3. splits the model transform into scale / rotation / translation and places
//!    the overlay object with it.
//!
//! The work is expressed as data first ([`RenderUpdate`] from
//! [`CorrespondenceTracker::plan`]) and then applied to a
//! [`SceneSink`](infovis_scene::SceneSink), so the logic can be exercised
//! without a renderer.

mod io;
mod measurements;
mod params;
mod session;
mod tracker;
mod update;

pub use io::{
    run_script, CameraScript, FrameScript, FrameSummary, MeasurementAction, OverlayPlacement,
    SessionConfigError, SessionIoError, SessionReport, SessionScript,
};
pub use measurements::{MeasurementError, MeasurementLog};
pub use params::TrackerParams;
pub use session::Session;
pub use tracker::CorrespondenceTracker;
pub use update::{HighlightOp, MarkerDiff, OverlayOp, RenderUpdate};
