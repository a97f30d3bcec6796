pub mod coordinate_system;
pub mod sampling;
pub mod texture;
