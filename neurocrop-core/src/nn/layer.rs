use std::fmt::Debug;

use num_traits::Zero;

use crate::buffer::Buffer;
use crate::error::NeuroCropError;

/// Output of a layer as seen by the layers that consume it.
///
/// Holds the value buffer (one row per sample), an optional gradient buffer
/// of the same size, and the per-sample frame height/width the producing
/// layer observed at runtime. A frame size of 0 means the producer has no
/// runtime spatial size and consumers should fall back to their static
/// configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerOutput<T> {
    value: Buffer<T>,
    grad: Option<Buffer<T>>,
    frame_height: usize,
    frame_width: usize,
}

impl<T> LayerOutput<T>
where
    T: Zero + Copy + Debug,
{
    /// Wraps a value buffer without gradient and without runtime frame size.
    pub fn new(value: Buffer<T>) -> Self {
        LayerOutput {
            value,
            grad: None,
            frame_height: 0,
            frame_width: 0,
        }
    }

    /// Attaches a zero-filled gradient buffer matching the value buffer.
    pub fn with_grad(mut self) -> Self {
        self.grad = Some(Buffer::zeros(self.value.rows(), self.value.cols()));
        self
    }

    pub fn with_frame_size(mut self, height: usize, width: usize) -> Self {
        self.set_frame_size(height, width);
        self
    }

    pub fn value(&self) -> &Buffer<T> {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut Buffer<T> {
        &mut self.value
    }

    pub fn grad(&self) -> Option<&Buffer<T>> {
        self.grad.as_ref()
    }

    pub fn grad_mut(&mut self) -> Option<&mut Buffer<T>> {
        self.grad.as_mut()
    }

    /// Batch size, i.e. the number of rows of the value buffer.
    pub fn batch_size(&self) -> usize {
        self.value.rows()
    }

    pub fn frame_height(&self) -> usize {
        self.frame_height
    }

    pub fn frame_width(&self) -> usize {
        self.frame_width
    }

    pub fn set_frame_size(&mut self, height: usize, width: usize) {
        self.frame_height = height;
        self.frame_width = width;
    }

    /// Resizes the value buffer to `rows x cols` and the gradient buffer to
    /// the same size, zeroing the gradient.
    pub fn reset(&mut self, rows: usize, cols: usize) {
        self.value.resize(rows, cols);
        let grad = self.grad.get_or_insert_with(|| Buffer::zeros(rows, cols));
        grad.resize(rows, cols);
        grad.zero();
    }
}

/// The base trait for layers of the execution graph.
///
/// A layer reads the output of its upstream layer in `forward`, keeps its
/// own output, and in `backward` routes the gradient of its output back into
/// the upstream layer's gradient buffer.
pub trait Layer<T>: Debug + Send + Sync {
    /// Name of the layer, as given in its configuration.
    fn name(&self) -> &str;

    /// Performs a forward pass.
    ///
    /// # Arguments
    /// * `input`: Output of the upstream layer.
    ///
    /// # Returns
    /// A reference to this layer's freshly computed output.
    fn forward(&mut self, input: &LayerOutput<T>) -> Result<&LayerOutput<T>, NeuroCropError>;

    /// Performs a backward pass, accumulating into `input`'s gradient buffer.
    ///
    /// Must follow a `forward` for the same batch.
    fn backward(&self, input: &mut LayerOutput<T>) -> Result<(), NeuroCropError>;

    /// This layer's output from the last forward pass.
    fn output(&self) -> &LayerOutput<T>;
}
