//! Explicit configuration for geometry and mesh builds.

use crate::Result;
use serde::{Deserialize, Serialize};

/// Parameters which control how a wing is turned into surfaces and panels.  A single instance is
/// passed into every build so that two builds with the same inputs and the same configuration
/// always produce the same mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Section pairs whose span separation is below this length do not produce a surface. This
    /// allows coincident sections to be used for sharp panel breaks.
    pub min_surface_length: f64,

    /// The number of panel strips used to wrap around a closed wing tip.
    pub tip_strip_count: usize,

    /// The vertex coincidence tolerance used when stitching adjacent surfaces of the same side.
    pub stitch_tolerance: f64,

    /// The vertex coincidence tolerance used when stitching the left and right center surfaces
    /// across the symmetry plane.
    pub center_stitch_tolerance: f64,

    /// Build top and bottom surfaces with tip patches (`true`) or only the mid camber surface.
    pub thick_surfaces: bool,

    /// Whether flap panels are stitched to the panels of the neighbouring surface.
    pub connect_flaps: bool,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            min_surface_length: 0.0001,
            tip_strip_count: 1,
            stitch_tolerance: 0.0001,
            center_stitch_tolerance: 0.0005,
            thick_surfaces: true,
            connect_flaps: true,
        }
    }
}

impl MeshConfig {
    /// Returns a configuration identical to the default one but for thin (mid camber) surfaces.
    pub fn thin() -> Self {
        Self {
            thick_surfaces: false,
            ..Self::default()
        }
    }

    /// The tip strip count, never less than one.
    pub fn tip_strips(&self) -> usize {
        self.tip_strip_count.max(1)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
