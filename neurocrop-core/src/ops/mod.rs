//! # Kernel Module (`ops`)
//!
//! Data-movement kernels driven by the crop layer.
//!
//! - [`args`]: buffer bindings handed to a kernel (`BufferArg`, `BufferArgMut`)
//!   and the write mode of an output binding (assign vs. add-to).
//! - [`crop`]: the two concrete kernels, [`CropOp`] (forward copy) and
//!   [`CropGradOp`] (backward accumulation), plus their shared parameters.
//!
//! Kernels are selected statically when a layer is constructed; there is no
//! lookup by name at runtime. The [`CropKernel::name`] string is only used for
//! logging and timing.

use std::fmt::Debug;

use crate::error::NeuroCropError;

pub mod args;
pub mod crop;

pub use args::{BufferArg, BufferArgMut, WriteMode};
pub use crop::{CropGradOp, CropOp, CropParams};

/// A kernel that moves data between one input binding and one output binding
/// according to a crop region.
pub trait CropKernel<T>: Debug + Send + Sync {
    /// Stable kernel name, e.g. `"Crop"`.
    fn name(&self) -> &'static str;

    /// The write mode this kernel requires on its output binding.
    fn write_mode(&self) -> WriteMode;

    /// Runs the kernel.
    ///
    /// # Arguments
    /// * `params` - Crop corner and crop shape of the current pass.
    /// * `input` - Read-only binding.
    /// * `output` - Mutable binding, written with its declared [`WriteMode`].
    ///
    /// # Errors
    /// Returns a shape error if the bindings disagree with their shapes or the
    /// crop region does not fit inside the uncropped tensor.
    fn calc(
        &self,
        params: &CropParams,
        input: &BufferArg<'_, T>,
        output: &mut BufferArgMut<'_, T>,
    ) -> Result<(), NeuroCropError>;
}
