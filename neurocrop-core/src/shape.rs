// src/shape.rs

use std::fmt;

use crate::error::{ConfigError, NeuroCropError};

/// Number of axes of every shape handled by the crop layer (N, C, H, W).
pub const RANK: usize = 4;

/// A validated axis index of a 4D NCHW shape.
///
/// Constructing an `Axis` through [`Axis::new`] is the only place where an
/// out-of-range axis can be rejected; everything downstream indexes shapes
/// infallibly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Axis(usize);

impl Axis {
    pub const BATCH: Axis = Axis(0);
    pub const CHANNEL: Axis = Axis(1);
    pub const HEIGHT: Axis = Axis(2);
    pub const WIDTH: Axis = Axis(3);

    /// Validates `index` as an axis of a 4D shape.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidAxis` if `index` is not in `[0, 3]`.
    pub fn new(index: usize) -> Result<Self, ConfigError> {
        if index < RANK {
            Ok(Axis(index))
        } else {
            Err(ConfigError::InvalidAxis { axis: index })
        }
    }

    pub fn index(self) -> usize {
        self.0
    }

    /// Iterates over the four axes in order, batch first.
    pub fn all() -> impl Iterator<Item = Axis> {
        [Axis::BATCH, Axis::CHANNEL, Axis::HEIGHT, Axis::WIDTH].into_iter()
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shape descriptor of a 4D (batch, channel, height, width) tensor.
///
/// The batch extent is optional: `None` means it is not known yet and will be
/// supplied at runtime, while `Some(0)` is a real, empty batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TensorShape {
    batch: Option<usize>,
    /// Channel, height and width, in that order.
    dims: [usize; 3],
}

impl TensorShape {
    pub fn new(batch: Option<usize>, channels: usize, height: usize, width: usize) -> Self {
        TensorShape {
            batch,
            dims: [channels, height, width],
        }
    }

    /// Creates a shape whose batch size is resolved later.
    pub fn unbatched(channels: usize, height: usize, width: usize) -> Self {
        Self::new(None, channels, height, width)
    }

    /// Builds a shape from a literal 4-tuple as found in layer configurations,
    /// where a batch extent of 0 stands for "unresolved".
    pub fn from_literal(dims: [usize; RANK]) -> Self {
        let batch = if dims[0] == 0 { None } else { Some(dims[0]) };
        Self::new(batch, dims[1], dims[2], dims[3])
    }

    pub fn batch(&self) -> Option<usize> {
        self.batch
    }

    pub fn channels(&self) -> usize {
        self.dims[0]
    }

    pub fn height(&self) -> usize {
        self.dims[1]
    }

    pub fn width(&self) -> usize {
        self.dims[2]
    }

    /// Extent along `axis`. Only an unresolved batch yields `None`.
    pub fn dim(&self, axis: Axis) -> Option<usize> {
        match axis.index() {
            0 => self.batch,
            i => Some(self.dims[i - 1]),
        }
    }

    pub fn set_dim(&mut self, axis: Axis, value: usize) {
        match axis.index() {
            0 => self.batch = Some(value),
            i => self.dims[i - 1] = value,
        }
    }

    /// Copies the extent of `axis` from `other`, including an unresolved batch.
    pub fn copy_dim_from(&mut self, axis: Axis, other: &TensorShape) {
        match axis.index() {
            0 => self.batch = other.batch,
            i => self.dims[i - 1] = other.dims[i - 1],
        }
    }

    pub fn with_batch(mut self, batch: usize) -> Self {
        self.batch = Some(batch);
        self
    }

    /// Replaces all four extents at once.
    pub fn reshape(&mut self, batch: Option<usize>, channels: usize, height: usize, width: usize) {
        *self = Self::new(batch, channels, height, width);
    }

    /// Number of elements of a single sample (C * H * W).
    pub fn per_sample_numel(&self) -> usize {
        self.dims.iter().product()
    }

    /// Total number of elements, or `None` while the batch is unresolved.
    pub fn numel(&self) -> Option<usize> {
        self.batch.map(|n| n * self.per_sample_numel())
    }

    /// Returns the four extents, failing if the batch is still unresolved.
    ///
    /// # Errors
    /// Returns `NeuroCropError::UnresolvedBatch` tagged with `operation`.
    pub fn resolved_dims(&self, operation: &str) -> Result<[usize; RANK], NeuroCropError> {
        let batch = self.batch.ok_or_else(|| NeuroCropError::UnresolvedBatch {
            operation: operation.to_string(),
        })?;
        Ok([batch, self.dims[0], self.dims[1], self.dims[2]])
    }
}

impl fmt::Display for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.batch {
            Some(n) => write!(f, "({}, ", n)?,
            None => write!(f, "(N, ")?,
        }
        write!(f, "{}, {}, {})", self.dims[0], self.dims[1], self.dims[2])
    }
}

/// Calculates the row-major strides for a fully resolved 4D shape.
///
/// Example: dims = [2, 3, 4, 5] -> strides = [60, 20, 5, 1]
pub fn calculate_strides(dims: &[usize; RANK]) -> [usize; RANK] {
    let mut strides = [1; RANK];
    for i in (0..RANK - 1).rev() {
        strides[i] = strides[i + 1] * dims[i + 1];
    }
    strides
}

#[cfg(test)]
#[path = "shape_test.rs"]
mod tests;
