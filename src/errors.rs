use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors raised while building wing geometry and meshes, or while integrating loads over them.
/// Degenerate sections closer than the minimum surface length are not errors and never appear
/// here.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshError {
    /// The wing has fewer than two sections and is therefore undefined
    NotEnoughSections(usize),

    /// A section references a foil which the foil source cannot provide
    MissingFoil(String),

    /// Every section pair was degenerate so no surface could be created
    NoSurfaces,

    /// A computed panel index fell outside of the panel arena
    PanelIndexOutOfBounds { index: usize, len: usize },

    /// A surface index fell outside of the wing's surface array
    SurfaceIndexOutOfBounds(usize),

    /// An operation required a mesh or a station layout which has not been built yet
    NotMeshed,

    /// Station arrays do not have the length of the current station layout
    StationMismatch { expected: usize, found: usize },

    /// A solver output array does not match the size of the mesh it was computed on
    SolutionMismatch { expected: usize, found: usize },

    /// A section asks for no chordwise or no spanwise panels
    NoPanels { section: usize },

    /// The polar integrates thin surfaces over a thick mesh, or the reverse
    SurfaceKindMismatch { thin_polar: bool },
}

impl Display for MeshError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshError::NotEnoughSections(n) => {
                write!(f, "wing has {} section(s), at least 2 are required", n)
            }
            MeshError::MissingFoil(name) => write!(f, "Missing foil: {}", name),
            MeshError::NoSurfaces => write!(f, "no surface could be built from the sections"),
            MeshError::PanelIndexOutOfBounds { index, len } => {
                write!(f, "panel index {} is out of bounds for {} panels", index, len)
            }
            MeshError::SurfaceIndexOutOfBounds(i) => write!(f, "surface index {} is out of bounds", i),
            MeshError::NotMeshed => write!(f, "the mesh or the station layout has not been built"),
            MeshError::StationMismatch { expected, found } => {
                write!(f, "expected {} stations, found {}", expected, found)
            }
            MeshError::SolutionMismatch { expected, found } => {
                write!(f, "solution array has {} values, expected {}", found, expected)
            }
            MeshError::NoPanels { section } => {
                write!(f, "section {} needs at least one chordwise and one spanwise panel", section)
            }
            MeshError::SurfaceKindMismatch { thin_polar: true } => {
                write!(f, "the polar expects thin surfaces but the mesh is thick")
            }
            MeshError::SurfaceKindMismatch { thin_polar: false } => {
                write!(f, "the polar expects thick surfaces but the mesh is thin")
            }
        }
    }
}

impl Error for MeshError {}
