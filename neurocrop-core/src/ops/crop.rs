// neurocrop-core/src/ops/crop.rs

use std::fmt::Debug;
use std::ops::AddAssign;

use crate::error::NeuroCropError;
use crate::ops::args::{BufferArg, BufferArgMut, WriteMode};
use crate::ops::CropKernel;
use crate::shape::{calculate_strides, Axis, TensorShape, RANK};

/// Parameters shared by the forward and backward crop kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropParams {
    /// Starting index of the crop region along each axis.
    pub corner: [usize; RANK],
    /// Extent of the crop region along each axis. An unresolved batch extent
    /// accepts whatever batch size the bindings carry.
    pub shape: TensorShape,
}

impl CropParams {
    pub fn new(corner: [usize; RANK], shape: TensorShape) -> Self {
        CropParams { corner, shape }
    }

    /// Checks that `cropped` has the crop extents and that the crop region
    /// placed at `corner` lies inside `full`.
    fn validate_region(
        &self,
        full: &[usize; RANK],
        cropped: &[usize; RANK],
        operation: &str,
    ) -> Result<(), NeuroCropError> {
        for axis in Axis::all() {
            let i = axis.index();
            if let Some(extent) = self.shape.dim(axis) {
                if cropped[i] != extent {
                    return Err(NeuroCropError::ShapeMismatch {
                        expected: self.expected_dims(cropped),
                        actual: cropped.to_vec(),
                        operation: operation.to_string(),
                    });
                }
            }
            let past_end = self.corner[i]
                .checked_add(cropped[i])
                .map_or(true, |end| end > full[i]);
            if past_end {
                return Err(NeuroCropError::CropOutOfBounds {
                    axis: i,
                    corner: self.corner[i],
                    extent: cropped[i],
                    dim_size: full[i],
                });
            }
        }
        Ok(())
    }

    fn expected_dims(&self, cropped: &[usize; RANK]) -> Vec<usize> {
        Axis::all()
            .map(|axis| self.shape.dim(axis).unwrap_or(cropped[axis.index()]))
            .collect()
    }
}

/// Calls `f(full_offset, cropped_offset, len)` for every contiguous row (along
/// the width axis) of the crop region.
fn for_each_crop_row<F>(full: &[usize; RANK], cropped: &[usize; RANK], corner: &[usize; RANK], mut f: F)
where
    F: FnMut(usize, usize, usize),
{
    let full_strides = calculate_strides(full);
    let cropped_strides = calculate_strides(cropped);
    let row_len = cropped[3];
    if row_len == 0 {
        return;
    }
    for n in 0..cropped[0] {
        for c in 0..cropped[1] {
            for h in 0..cropped[2] {
                let full_offset = (n + corner[0]) * full_strides[0]
                    + (c + corner[1]) * full_strides[1]
                    + (h + corner[2]) * full_strides[2]
                    + corner[3];
                let cropped_offset =
                    n * cropped_strides[0] + c * cropped_strides[1] + h * cropped_strides[2];
                f(full_offset, cropped_offset, row_len);
            }
        }
    }
}

fn check_mode<T>(output: &BufferArgMut<'_, T>, expected: WriteMode, operation: &str) -> Result<(), NeuroCropError> {
    if output.mode() != expected {
        return Err(NeuroCropError::WriteModeMismatch {
            expected: expected.to_string(),
            actual: output.mode().to_string(),
            operation: operation.to_string(),
        });
    }
    Ok(())
}

/// Forward crop: copies the crop region of the full input into the output.
///
/// The input binding carries the uncropped shape, the output binding the
/// cropped shape. The output is fully overwritten.
#[derive(Debug, Clone, Copy, Default)]
pub struct CropOp;

impl<T> CropKernel<T> for CropOp
where
    T: Copy + Debug + Send + Sync,
{
    fn name(&self) -> &'static str {
        "Crop"
    }

    fn write_mode(&self) -> WriteMode {
        WriteMode::Assign
    }

    fn calc(
        &self,
        params: &CropParams,
        input: &BufferArg<'_, T>,
        output: &mut BufferArgMut<'_, T>,
    ) -> Result<(), NeuroCropError> {
        check_mode(output, WriteMode::Assign, "Crop")?;
        let full = input.checked_dims("Crop input")?;
        let cropped = output.checked_dims("Crop output")?;
        params.validate_region(&full, &cropped, "Crop")?;

        let src = input.data();
        let dst = output.data_mut();
        for_each_crop_row(&full, &cropped, &params.corner, |full_off, crop_off, len| {
            dst[crop_off..crop_off + len].copy_from_slice(&src[full_off..full_off + len]);
        });
        Ok(())
    }
}

/// Backward crop: adds the gradient of the cropped output into the matching
/// region of the input gradient.
///
/// The input binding carries the cropped shape (output gradient), the output
/// binding the uncropped shape (input gradient). Elements of the input
/// gradient outside the crop region are left untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct CropGradOp;

impl<T> CropKernel<T> for CropGradOp
where
    T: Copy + AddAssign + Debug + Send + Sync,
{
    fn name(&self) -> &'static str {
        "CropGrad"
    }

    fn write_mode(&self) -> WriteMode {
        WriteMode::AddTo
    }

    fn calc(
        &self,
        params: &CropParams,
        input: &BufferArg<'_, T>,
        output: &mut BufferArgMut<'_, T>,
    ) -> Result<(), NeuroCropError> {
        check_mode(output, WriteMode::AddTo, "CropGrad")?;
        let cropped = input.checked_dims("CropGrad input")?;
        let full = output.checked_dims("CropGrad output")?;
        params.validate_region(&full, &cropped, "CropGrad")?;

        let grad_out = input.data();
        let grad_in = output.data_mut();
        for_each_crop_row(&full, &cropped, &params.corner, |full_off, crop_off, len| {
            let dst = &mut grad_in[full_off..full_off + len];
            let src = &grad_out[crop_off..crop_off + len];
            for (d, &s) in dst.iter_mut().zip(src.iter()) {
                *d += s;
            }
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "crop_test.rs"]
mod tests;
