//! Common constructs shared by the geometry, meshing and integration modules: panel spacing
//! distributions and the wind reference frame.

mod distribution;
mod wind;

pub use distribution::{Distribution, point_distribution};
pub use wind::WindAxes;
