use std::fmt::Debug;
use std::ops::AddAssign;
use std::time::Instant;

use log::{debug, trace};
use num_traits::Zero;

use crate::buffer::Buffer;
use crate::config::CropLayerConfig;
use crate::error::NeuroCropError;
use crate::nn::crop_resolver::CropResolver;
use crate::nn::layer::{Layer, LayerOutput};
use crate::ops::{BufferArg, BufferArgMut, CropGradOp, CropKernel, CropOp};

/// Extracts a rectangular region of a 4D (N, C, H, W) input.
///
/// Axes before the configured crop axis are copied in full; from the crop axis
/// on, the region starts at the configured offsets and has the extents of the
/// reference input (if configured) or of the literal crop shape.
///
/// The forward pass overwrites the layer output with the region. The backward
/// pass adds the output gradient into the same region of the input gradient
/// and leaves the rest of the input gradient untouched, so the caller is
/// responsible for zeroing it before the first producer writes to it.
#[derive(Debug)]
pub struct CropLayer<T> {
    config: CropLayerConfig,
    resolver: CropResolver,
    forward_kernel: Box<dyn CropKernel<T>>,
    backward_kernel: Box<dyn CropKernel<T>>,
    output: LayerOutput<T>,
}

impl<T> CropLayer<T>
where
    T: Zero + Copy + AddAssign + Debug + Send + Sync + 'static,
{
    /// Creates a crop layer from its configuration.
    ///
    /// The input shape template comes from the primary input's image
    /// configuration; the target extents come from the reference input's image
    /// configuration when there is one, from the literal crop shape otherwise.
    ///
    /// # Errors
    /// Returns `NeuroCropError::Config` if the crop cannot be resolved.
    pub fn new(config: CropLayerConfig) -> Result<Self, NeuroCropError> {
        let target = config.target_source()?;
        let resolver = CropResolver::initialize(config.crop(), config.input_shape(), &target)?;
        debug!(
            "CropLayer '{}': input {}, output {}",
            config.name(),
            resolver.input_shape(),
            resolver.output_shape()
        );
        Ok(CropLayer {
            config,
            resolver,
            forward_kernel: Box::new(CropOp),
            backward_kernel: Box::new(CropGradOp),
            output: LayerOutput::new(Buffer::zeros(0, 0)),
        })
    }

    pub fn config(&self) -> &CropLayerConfig {
        &self.config
    }

    pub fn resolver(&self) -> &CropResolver {
        &self.resolver
    }

    /// Gradient of this layer's output, to be filled by the downstream layers
    /// before `backward`.
    pub fn output_grad_mut(&mut self) -> Option<&mut Buffer<T>> {
        self.output.grad_mut()
    }
}

impl<T> Layer<T> for CropLayer<T>
where
    T: Zero + Copy + AddAssign + Debug + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        self.config.name()
    }

    fn forward(&mut self, input: &LayerOutput<T>) -> Result<&LayerOutput<T>, NeuroCropError> {
        let start = Instant::now();
        let batch_size = input.batch_size();
        self.resolver.adapt_to_batch(batch_size, input.frame_height(), input.frame_width());

        let in_dims = *self.resolver.input_shape();
        let out_dims = *self.resolver.output_shape();
        let rows = out_dims.batch().unwrap_or(batch_size);
        self.output.reset(rows, out_dims.per_sample_numel());
        self.output.set_frame_size(out_dims.height(), out_dims.width());

        let params = self.resolver.resolved().params();
        let input_arg = BufferArg::new(input.value().as_slice(), in_dims);
        let mut output_arg = BufferArgMut::new(
            self.output.value_mut().as_mut_slice(),
            out_dims,
            self.forward_kernel.write_mode(),
        );
        self.forward_kernel.calc(&params, &input_arg, &mut output_arg)?;

        trace!(
            "{} '{}': CropForward took {:?}",
            self.forward_kernel.name(),
            self.config.name(),
            start.elapsed()
        );
        Ok(&self.output)
    }

    fn backward(&self, input: &mut LayerOutput<T>) -> Result<(), NeuroCropError> {
        let start = Instant::now();
        let output_grad = self.output.grad().ok_or_else(|| NeuroCropError::MissingGradient {
            layer: self.config.name().to_string(),
            which: "output".to_string(),
        })?;
        let input_grad = input.grad_mut().ok_or_else(|| NeuroCropError::MissingGradient {
            layer: self.config.name().to_string(),
            which: "input 0".to_string(),
        })?;

        let params = self.resolver.resolved().params();
        let grad_arg = BufferArg::new(output_grad.as_slice(), *self.resolver.output_shape());
        let mut input_grad_arg = BufferArgMut::new(
            input_grad.as_mut_slice(),
            *self.resolver.input_shape(),
            self.backward_kernel.write_mode(),
        );
        self.backward_kernel.calc(&params, &grad_arg, &mut input_grad_arg)?;

        trace!(
            "{} '{}': CropBackward took {:?}",
            self.backward_kernel.name(),
            self.config.name(),
            start.elapsed()
        );
        Ok(())
    }

    fn output(&self) -> &LayerOutput<T> {
        &self.output
    }
}

#[cfg(test)]
#[path = "crop_test.rs"]
mod tests;
