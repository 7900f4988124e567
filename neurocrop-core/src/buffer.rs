use std::fmt::Debug;

use num_traits::Zero;

use crate::error::NeuroCropError;

/// Row-major CPU storage for a batch of samples.
///
/// Each row holds one flattened sample (C * H * W elements), so `rows` is the
/// batch size. This mirrors how layer outputs are stored by the execution
/// graph: the 4D interpretation comes from a separate [`TensorShape`] bound to
/// the buffer when a kernel runs.
///
/// [`TensorShape`]: crate::shape::TensorShape
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T> Buffer<T>
where
    T: Zero + Copy + Debug,
{
    /// Allocates a zero-filled `rows x cols` buffer.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Buffer {
            data: vec![T::zero(); rows * cols],
            rows,
            cols,
        }
    }

    /// Wraps existing row-major data.
    ///
    /// # Errors
    /// Returns `NeuroCropError::BufferSizeMismatch` if `data.len() != rows * cols`.
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self, NeuroCropError> {
        let expected = rows * cols;
        if data.len() != expected {
            return Err(NeuroCropError::BufferSizeMismatch {
                data_len: data.len(),
                expected,
                shape: vec![rows, cols],
                operation: "Buffer::from_vec".to_string(),
            });
        }
        Ok(Buffer { data, rows, cols })
    }

    /// Resizes the buffer to `rows x cols`, reusing the allocation when possible.
    ///
    /// Existing contents are not preserved in any meaningful layout; callers
    /// either overwrite the buffer entirely or call [`Buffer::zero`] afterwards.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.data.resize(rows * cols, T::zero());
        self.rows = rows;
        self.cols = cols;
    }

    /// Sets every element to zero.
    pub fn zero(&mut self) {
        self.data.iter_mut().for_each(|x| *x = T::zero());
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}
