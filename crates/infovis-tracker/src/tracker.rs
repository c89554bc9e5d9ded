use crate::{HighlightOp, MarkerDiff, OverlayOp, RenderUpdate, TrackerParams};
use infovis_core::{PoseComponents, PoseTransform, ReferenceModel};
use infovis_scene::{ObjectHandle, ObjectKind, SceneSink};
use log::{debug, warn};
use nalgebra::Point3;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Keeps the scene's markers and overlay consistent with the measured points.
///
/// The tracker owns the handles of everything it created: one marker per
/// measured point, at most one highlight marker for the next model point, and
/// the overlay object, which lives as long as the tracker.
#[derive(Debug)]
pub struct CorrespondenceTracker {
    model: ReferenceModel,
    params: TrackerParams,
    overlay: ObjectHandle,
    markers: Vec<ObjectHandle>,
    highlight: Option<ObjectHandle>,
    overlay_pose: Option<PoseComponents>,
}

impl CorrespondenceTracker {
    /// Create the tracker and its overlay object in `scene`.
    pub fn attach<S: SceneSink + ?Sized>(
        model: ReferenceModel,
        params: TrackerParams,
        scene: &mut S,
    ) -> Self {
        let overlay = scene.add_object(Point3::origin(), ObjectKind::Overlay);
        debug!(
            "tracker attached: {} model points, overlay {:?}",
            model.point_count(),
            overlay
        );
        Self {
            model,
            params,
            overlay,
            markers: Vec::new(),
            highlight: None,
            overlay_pose: None,
        }
    }

    #[inline]
    pub fn model(&self) -> &ReferenceModel {
        &self.model
    }

    #[inline]
    pub fn params(&self) -> &TrackerParams {
        &self.params
    }

    /// Number of displayed confirmed markers.
    #[inline]
    pub fn confirmed_count(&self) -> usize {
        self.markers.len()
    }

    #[inline]
    pub fn marker_handles(&self) -> &[ObjectHandle] {
        &self.markers
    }

    #[inline]
    pub fn has_highlight(&self) -> bool {
        self.highlight.is_some()
    }

    #[inline]
    pub fn overlay_handle(&self) -> ObjectHandle {
        self.overlay
    }

    /// Last overlay pose pushed to the scene.
    #[inline]
    pub fn overlay_pose(&self) -> Option<&PoseComponents> {
        self.overlay_pose.as_ref()
    }

    /// Projected position of the model point that should be measured next.
    pub fn next_reference_point(
        &self,
        measured_len: usize,
        transform: &PoseTransform,
    ) -> Option<Point3<f64>> {
        self.model.projected_point(measured_len, transform)
    }

    /// Compute the frame update without touching any scene.
    pub fn plan(&self, measured: &[Point3<f64>], transform: &PoseTransform) -> RenderUpdate {
        let markers = MarkerDiff::between(self.markers.len(), measured);

        let next = measured.len();
        let highlight = match self.model.projected_point(next, transform) {
            Some(position) => HighlightOp::Show {
                index: next,
                position,
            },
            None if self.highlight.is_some() => HighlightOp::Hide,
            None => HighlightOp::Absent,
        };

        let overlay = match transform.decompose(&self.params.decompose) {
            Ok(pose) => OverlayOp::Place { pose },
            Err(reason) => OverlayOp::Skip { reason },
        };

        RenderUpdate {
            markers,
            highlight,
            overlay,
        }
    }

    /// Execute `update` against `scene`.
    ///
    /// `update` must come from [`plan`](Self::plan) on the current tracker
    /// state. Marker indices already displayed are not added again.
    pub fn apply<S: SceneSink + ?Sized>(&mut self, update: &RenderUpdate, scene: &mut S) {
        match &update.markers {
            MarkerDiff::Unchanged => {}
            MarkerDiff::Append { start, points } => {
                let style = self.params.confirmed_style();
                for (index, p) in (*start..).zip(points) {
                    if index < self.markers.len() {
                        continue;
                    }
                    let handle = scene.add_object(*p, ObjectKind::ConfirmedMarker(style));
                    self.markers.push(handle);
                }
                debug!("confirmed markers: {}", self.markers.len());
            }
            MarkerDiff::Truncate { keep, .. } => {
                while self.markers.len() > *keep {
                    if let Some(handle) = self.markers.pop() {
                        scene.remove_object(handle);
                    }
                }
                debug!("confirmed markers: {}", self.markers.len());
            }
        }

        match &update.highlight {
            HighlightOp::Show { position, .. } => match self.highlight {
                Some(handle) => scene.set_position(handle, *position),
                None => {
                    let style = self.params.pending_style();
                    let handle = scene.add_object(*position, ObjectKind::PendingMarker(style));
                    self.highlight = Some(handle);
                }
            },
            HighlightOp::Hide => {
                if let Some(handle) = self.highlight.take() {
                    scene.remove_object(handle);
                    debug!("all model points measured, highlight removed");
                }
            }
            HighlightOp::Absent => {}
        }

        match &update.overlay {
            OverlayOp::Place { pose } => {
                scene.set_scale(self.overlay, pose.scale);
                scene.set_position(self.overlay, Point3::from(pose.translation));
                scene.set_orientation(self.overlay, pose.rotation);
                self.overlay_pose = Some(*pose);
            }
            OverlayOp::Skip { reason } => {
                warn!("overlay placement skipped: {reason}");
            }
        }
    }

    /// Plan and apply one frame.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, measured, transform, scene), fields(measured = measured.len()))
    )]
    pub fn reconcile<S: SceneSink + ?Sized>(
        &mut self,
        measured: &[Point3<f64>],
        transform: &PoseTransform,
        scene: &mut S,
    ) -> RenderUpdate {
        let update = self.plan(measured, transform);
        self.apply(&update, scene);
        update
    }

    /// Remove every object this tracker created, overlay included.
    pub fn detach<S: SceneSink + ?Sized>(mut self, scene: &mut S) {
        while let Some(handle) = self.markers.pop() {
            scene.remove_object(handle);
        }
        if let Some(handle) = self.highlight.take() {
            scene.remove_object(handle);
        }
        scene.remove_object(self.overlay);
    }
}
