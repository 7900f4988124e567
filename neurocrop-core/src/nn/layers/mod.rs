// src/nn/layers/mod.rs
// Concrete layers.

pub mod crop;

// Re-export key layer structs
pub use crop::CropLayer;
