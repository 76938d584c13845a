pub mod atmosphere;
pub mod heat_flux;
pub mod longwave;
pub mod model;
pub mod solar;
pub mod wind;
