pub mod lights;
pub mod terrain;
pub mod water;
