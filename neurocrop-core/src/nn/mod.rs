// src/nn/mod.rs
// Layers of the execution graph and the shape resolution they rely on.

pub mod crop_resolver; // Crop corner / crop shape resolution
pub mod layer; // Trait Layer, struct LayerOutput
pub mod layers;

// Re-export common items
pub use crop_resolver::{CropResolver, ResolvedCrop};
pub use layer::{Layer, LayerOutput};
pub use layers::crop::CropLayer;
