use crate::common::WindAxes;
use crate::geom3::Point3;
use serde::{Deserialize, Serialize};

/// The panel method which produced a solution, which decides how panel forces are computed from
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisMethod {
    /// Triangles with a uniform pressure over each panel
    TriUniform,

    /// Triangles with a pressure varying linearly between the vertices
    TriLinear,

    /// Quadrilateral panels with a uniform pressure
    Quad,

    /// Vortex lattice with horseshoe vortices
    Vlm1,

    /// Vortex lattice with vortex rings
    Vlm2,
}

impl AnalysisMethod {
    pub fn is_tri(&self) -> bool {
        matches!(self, AnalysisMethod::TriUniform | AnalysisMethod::TriLinear)
    }

    pub fn is_vlm(&self) -> bool {
        matches!(self, AnalysisMethod::Vlm1 | AnalysisMethod::Vlm2)
    }
}

/// The settings of a polar which are needed to integrate panel results into loads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolarSettings {
    pub method: AnalysisMethod,
    pub thin_surfaces: bool,

    /// Fluid density in kg/m³
    pub density: f64,

    /// Kinematic viscosity in m²/s
    pub viscosity: f64,

    /// The centre of gravity about which moments are taken
    pub cog: Point3,

    /// Whether the forces acting on the tip patches contribute to the resultant
    pub include_tip_moments: bool,
}

impl Default for PolarSettings {
    fn default() -> Self {
        Self {
            method: AnalysisMethod::TriUniform,
            thin_surfaces: false,
            density: 1.225,
            viscosity: 1.5e-5,
            cog: Point3::origin(),
            include_tip_moments: false,
        }
    }
}

impl PolarSettings {
    pub fn new(method: AnalysisMethod) -> Self {
        Self {
            method,
            thin_surfaces: method.is_vlm(),
            ..Self::default()
        }
    }

    /// The dynamic pressure ρQ²/2 at the given freestream speed
    pub fn dynamic_pressure(&self, q_inf: f64) -> f64 {
        0.5 * self.density * q_inf * q_inf
    }
}

/// One operating point: incidence and sideslip in degrees, freestream speed in m/s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingPoint {
    pub alpha: f64,
    pub beta: f64,
    pub q_inf: f64,
}

impl OperatingPoint {
    pub fn new(alpha: f64, beta: f64, q_inf: f64) -> Self {
        Self { alpha, beta, q_inf }
    }

    pub fn wind(&self) -> WindAxes {
        WindAxes::new(self.alpha, self.beta)
    }
}
