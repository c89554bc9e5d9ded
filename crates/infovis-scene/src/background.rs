//! Camera background quad texture coordinates per display rotation.

use serde::{Deserialize, Serialize};

/// Display rotation reported by the platform, clockwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayRotation {
    #[default]
    #[serde(rename = "0")]
    Deg0,
    #[serde(rename = "90")]
    Deg90,
    #[serde(rename = "180")]
    Deg180,
    #[serde(rename = "270")]
    Deg270,
}

// Four (u, v) pairs for the quad vertices in strip order.
const UV_DEG0: [f32; 8] = [0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0];
const UV_DEG90: [f32; 8] = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0];
const UV_DEG180: [f32; 8] = [1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0];
const UV_DEG270: [f32; 8] = [1.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0];

impl DisplayRotation {
    /// Parse a rotation in degrees; only multiples of 90 in `[0, 360)` are valid.
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Texture coordinates for the background quad at this rotation.
    pub fn texture_coords(self) -> [f32; 8] {
        match self {
            Self::Deg0 => UV_DEG0,
            Self::Deg90 => UV_DEG90,
            Self::Deg180 => UV_DEG180,
            Self::Deg270 => UV_DEG270,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degrees_round_trip() {
        for d in [0, 90, 180, 270] {
            let r = DisplayRotation::from_degrees(d).expect("valid rotation");
            assert_eq!(r.degrees(), d);
        }
        assert_eq!(DisplayRotation::from_degrees(45), None);
        assert_eq!(DisplayRotation::from_degrees(360), None);
    }

    #[test]
    fn presets_are_distinct_permutations_of_the_unit_square() {
        let all = [
            DisplayRotation::Deg0,
            DisplayRotation::Deg90,
            DisplayRotation::Deg180,
            DisplayRotation::Deg270,
        ];
        for (i, a) in all.iter().enumerate() {
            let uv = a.texture_coords();
            let mut corners: Vec<(u8, u8)> =
                uv.chunks(2).map(|c| (c[0] as u8, c[1] as u8)).collect();
            corners.sort_unstable();
            assert_eq!(corners, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
            for b in &all[i + 1..] {
                assert_ne!(uv, b.texture_coords());
            }
        }
    }

    #[test]
    fn serializes_as_degrees() {
        let json = serde_json::to_string(&DisplayRotation::Deg270).expect("serialize");
        assert_eq!(json, "\"270\"");
    }
}
