//! Wing geometry, panel meshing and load integration for panel method analyses of planes.
//!
//! A [`Wing`] is described by its sections.  Rebuilding it produces the surfaces, which are meshed
//! into the triangle or quad arenas shared by the wings of a [`Plane`].  The loads of a wing are
//! then integrated from the output of an external panel solver through the functions of [`aero`].
//!
//! ```
//! use wingpanel::{FoilDatabase, Foil, MeshConfig, Placement, Plane, Wing, WingSection, WingType};
//!
//! let foils: FoilDatabase = vec![Foil::naca4("0012").unwrap()].into_iter().collect();
//! let wing = Wing::from_sections(
//!     "wing",
//!     WingType::Main,
//!     true,
//!     vec![
//!         WingSection::new(0.0, 0.3, 0.0).with_panels(6, 4).with_foil("NACA 0012"),
//!         WingSection::new(0.5, 0.3, 0.0).with_foil("NACA 0012"),
//!     ],
//! );
//!
//! let mut plane = Plane::new("demo");
//! plane.add_wing(wing, Placement::default());
//! plane.rebuild_quad_mesh(&foils, &MeshConfig::default()).unwrap();
//! assert_eq!(plane.quad_range(0).unwrap().strip_count(), 8);
//! ```

use std::error::Error;

pub mod aero;
pub mod common;
pub mod config;
pub mod errors;
pub mod foil;
pub mod geom2;
pub mod geom3;
pub mod mesh;
pub mod plane;
pub mod provider;
pub mod wing;

pub use config::MeshConfig;
pub use errors::MeshError;
pub use foil::{Foil, FoilDatabase, FoilSource};
pub use geom3::{Point3, UnitVec3, Vector3, rotate_point, rotate_vector};
pub use mesh::{MeshRange, QuadMesh, SurfacePosition, TriMesh};
pub use plane::{PlacedWing, Plane};
pub use provider::{Dirty, SurfaceProvider};
pub use wing::{Inertia, Placement, Surface, Wing, WingSection, WingType};

pub type Result<T> = std::result::Result<T, Box<dyn Error>>;
