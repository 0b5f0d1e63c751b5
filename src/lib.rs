pub mod animation;
pub mod blend;
pub mod error;
pub mod grid;
pub mod meshing;
pub mod params;
pub mod resample;
pub mod smooth;
pub mod source;
pub mod surface;

pub use error::{Result, TerrainError};
pub use grid::Grid;
pub use params::TerrainParams;
pub use surface::{SurfaceMode, TerrainSurface};
