use infovis_core::{DecomposeParams, Handedness};
use infovis_scene::{MarkerStyle, Rgb};
use serde::{Deserialize, Serialize};

fn default_confirmed_color() -> Rgb {
    Rgb::RED
}

fn default_pending_color() -> Rgb {
    Rgb::GREEN
}

fn default_marker_radius() -> f64 {
    0.01
}

/// Configuration for the correspondence tracker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackerParams {
    /// Colour of markers for measured points.
    #[serde(default = "default_confirmed_color")]
    pub confirmed_color: Rgb,
    /// Colour of the marker at the next model point to measure.
    #[serde(default = "default_pending_color")]
    pub pending_color: Rgb,
    /// Marker sphere radius in world units.
    #[serde(default = "default_marker_radius")]
    pub marker_radius: f64,
    /// Tolerances for splitting the model transform into overlay pose parts.
    #[serde(default)]
    pub decompose: DecomposeParams,
    /// Quaternion convention of the scene camera; camera poses are converted before use.
    #[serde(default)]
    pub camera_handedness: Handedness,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            confirmed_color: default_confirmed_color(),
            pending_color: default_pending_color(),
            marker_radius: default_marker_radius(),
            decompose: DecomposeParams::default(),
            camera_handedness: Handedness::default(),
        }
    }
}

impl TrackerParams {
    pub fn confirmed_style(&self) -> MarkerStyle {
        MarkerStyle {
            color: self.confirmed_color,
            radius: self.marker_radius,
        }
    }

    pub fn pending_style(&self) -> MarkerStyle {
        MarkerStyle {
            color: self.pending_color,
            radius: self.marker_radius,
        }
    }
}
