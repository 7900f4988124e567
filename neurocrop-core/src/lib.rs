//! Crop layer for 4D (batch, channel, height, width) tensors.
//!
//! The crate resolves, from a starting axis, per-axis offsets and a target
//! shape (a sibling tensor's shape or a literal one), the exact region of an
//! input to extract, and runs the forward crop and the backward gradient
//! accumulation over that region.

// Main modules of the crate
pub mod buffer;
pub mod config;
pub mod error;
pub mod nn;
pub mod ops;
pub mod shape;

// Re-export the main types so they are reachable from the crate root
pub use buffer::Buffer;
pub use config::{CropConf, CropLayerConfig, ImageConf, TargetSource};
pub use error::{ConfigError, NeuroCropError};
pub use nn::{CropLayer, CropResolver, Layer, LayerOutput, ResolvedCrop};
pub use ops::{CropGradOp, CropKernel, CropOp, CropParams, WriteMode};
pub use shape::{Axis, TensorShape};

// Re-export traits required by public functions/structs
pub use num_traits;
