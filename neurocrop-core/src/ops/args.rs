use std::fmt;

use crate::error::NeuroCropError;
use crate::shape::{TensorShape, RANK};

/// How a kernel writes into its output buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteMode {
    /// Overwrite the destination.
    Assign,
    /// Accumulate onto the existing destination values.
    AddTo,
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteMode::Assign => write!(f, "ASSIGN_TO"),
            WriteMode::AddTo => write!(f, "ADD_TO"),
        }
    }
}

/// Read-only buffer bound to the 4D shape it should be interpreted with.
#[derive(Debug)]
pub struct BufferArg<'a, T> {
    data: &'a [T],
    shape: TensorShape,
}

impl<'a, T> BufferArg<'a, T> {
    pub fn new(data: &'a [T], shape: TensorShape) -> Self {
        BufferArg { data, shape }
    }

    pub fn data(&self) -> &[T] {
        self.data
    }

    pub fn shape(&self) -> &TensorShape {
        &self.shape
    }

    /// Resolved dims of the binding, checked against the buffer length.
    pub(crate) fn checked_dims(&self, operation: &str) -> Result<[usize; RANK], NeuroCropError> {
        checked_dims(self.data.len(), &self.shape, operation)
    }
}

/// Mutable buffer bound to its 4D shape and a write mode.
#[derive(Debug)]
pub struct BufferArgMut<'a, T> {
    data: &'a mut [T],
    shape: TensorShape,
    mode: WriteMode,
}

impl<'a, T> BufferArgMut<'a, T> {
    pub fn new(data: &'a mut [T], shape: TensorShape, mode: WriteMode) -> Self {
        BufferArgMut { data, shape, mode }
    }

    pub fn data(&self) -> &[T] {
        &*self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut *self.data
    }

    pub fn shape(&self) -> &TensorShape {
        &self.shape
    }

    pub fn mode(&self) -> WriteMode {
        self.mode
    }

    pub(crate) fn checked_dims(&self, operation: &str) -> Result<[usize; RANK], NeuroCropError> {
        checked_dims(self.data.len(), &self.shape, operation)
    }
}

fn checked_dims(
    data_len: usize,
    shape: &TensorShape,
    operation: &str,
) -> Result<[usize; RANK], NeuroCropError> {
    let dims = shape.resolved_dims(operation)?;
    let expected: usize = dims.iter().product();
    if data_len != expected {
        return Err(NeuroCropError::BufferSizeMismatch {
            data_len,
            expected,
            shape: dims.to_vec(),
            operation: operation.to_string(),
        });
    }
    Ok(dims)
}
