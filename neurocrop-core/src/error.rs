use thiserror::Error;

/// Errors raised while validating a crop configuration.
///
/// All of these are detected once, when the layer is initialized, and are
/// never recoverable: the configuration itself has to be fixed.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid crop axis {axis}: expected a value in [0, 3]")]
    InvalidAxis { axis: usize },

    #[error("Invalid number of crop offsets for axis {axis}: expected 1 or {expected}, got {actual}")]
    InvalidOffsetsLength {
        axis: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Ambiguous crop target: both a reference input and a literal crop shape were given")]
    AmbiguousTargetSource,

    #[error("Missing crop target: neither a reference input nor a literal crop shape was given")]
    MissingTargetSource,

    #[error("Invalid image configuration for input '{input}': {message}")]
    InvalidImageConf { input: String, message: String },
}

/// Custom error type for the NeuroCrop crate.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum NeuroCropError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error(
        "Crop region out of bounds on axis {axis}: corner {corner} + extent {extent} exceeds input size {dim_size}"
    )]
    CropOutOfBounds {
        axis: usize,
        corner: usize,
        extent: usize,
        dim_size: usize,
    },

    #[error("Buffer size mismatch: buffer holds {data_len} elements but shape {shape:?} needs {expected} during operation {operation}")]
    BufferSizeMismatch {
        data_len: usize,
        expected: usize,
        shape: Vec<usize>,
        operation: String,
    },

    #[error("Batch size is not resolved for the shape bound in operation {operation}")]
    UnresolvedBatch { operation: String },

    #[error("Write mode mismatch in {operation}: expected {expected}, got {actual}")]
    WriteModeMismatch {
        expected: String,
        actual: String,
        operation: String,
    },

    #[error("Layer '{layer}' has no gradient buffer for {which}")]
    MissingGradient { layer: String, which: String },
}

impl NeuroCropError {
    /// Returns `true` for errors raised while validating the configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(self, NeuroCropError::Config(_))
    }

    /// Returns `true` for errors raised when a kernel is bound to buffers whose
    /// shapes do not agree with the resolved crop.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            NeuroCropError::ShapeMismatch { .. }
                | NeuroCropError::CropOutOfBounds { .. }
                | NeuroCropError::BufferSizeMismatch { .. }
                | NeuroCropError::UnresolvedBatch { .. }
        )
    }
}
