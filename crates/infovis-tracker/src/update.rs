//! Render updates as data: what a frame changes, computed before touching a scene.

use infovis_core::{PoseComponents, TransformError};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Structural change of the confirmed marker list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum MarkerDiff {
    Unchanged,
    /// Add markers for measured indices `start..start + points.len()`.
    Append {
        start: usize,
        points: Vec<Point3<f64>>,
    },
    /// Remove markers from the tail until `keep` remain.
    Truncate { keep: usize, remove: usize },
}

impl MarkerDiff {
    /// Delta from `existing` displayed markers to the `measured` list.
    pub fn between(existing: usize, measured: &[Point3<f64>]) -> Self {
        let target = measured.len();
        if target > existing {
            MarkerDiff::Append {
                start: existing,
                points: measured[existing..].to_vec(),
            }
        } else if target < existing {
            MarkerDiff::Truncate {
                keep: target,
                remove: existing - target,
            }
        } else {
            MarkerDiff::Unchanged
        }
    }

    pub fn added(&self) -> usize {
        match self {
            MarkerDiff::Append { points, .. } => points.len(),
            _ => 0,
        }
    }

    pub fn removed(&self) -> usize {
        match self {
            MarkerDiff::Truncate { remove, .. } => *remove,
            _ => 0,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, MarkerDiff::Unchanged)
    }
}

/// What happens to the next-point highlight marker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum HighlightOp {
    /// Create or move the highlight to the projected model point `index`.
    Show { index: usize, position: Point3<f64> },
    /// All points are measured: remove the existing highlight.
    Hide,
    /// All points are measured and no highlight is displayed.
    Absent,
}

/// Overlay placement for this frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum OverlayOp {
    Place { pose: PoseComponents },
    /// The transform could not be decomposed; the overlay keeps its last pose.
    Skip { reason: TransformError },
}

/// Everything one frame asks the scene to do.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderUpdate {
    pub markers: MarkerDiff,
    pub highlight: HighlightOp,
    pub overlay: OverlayOp,
}
