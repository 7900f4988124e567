// src/nn/crop_resolver.rs

use log::{debug, trace};

use crate::config::{CropConf, TargetSource};
use crate::error::NeuroCropError;
use crate::ops::CropParams;
use crate::shape::{Axis, TensorShape, RANK};

/// Crop region resolved from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCrop {
    /// Extent of the region along each axis.
    pub crop_shape: TensorShape,
    /// Starting index of the region along each axis.
    pub crop_corner: [usize; RANK],
}

impl ResolvedCrop {
    /// Kernel parameters for this region.
    pub fn params(&self) -> CropParams {
        CropParams::new(self.crop_corner, self.crop_shape)
    }
}

/// Resolves the crop region of a layer and keeps its input and output shape
/// descriptors in sync with the runtime batch.
///
/// Axes before the crop axis are passed through: their crop extent is the
/// input's own extent and their corner is 0. Axes from the crop axis on take
/// their extent from the target source and their corner from the offsets.
///
/// `initialize` and `adapt_to_batch` are the only ways to change the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropResolver {
    axis: Axis,
    resolved: ResolvedCrop,
    in_dims: TensorShape,
    out_dims: TensorShape,
}

impl CropResolver {
    /// Resolves the crop corner and crop shape.
    ///
    /// # Arguments
    /// * `conf` - Crop axis and offsets.
    /// * `input_template` - Static shape of the primary input, batch unresolved.
    /// * `target` - Source of the extents of the cropped axes.
    ///
    /// # Errors
    /// Returns `NeuroCropError::Config` if the axis is out of range or the
    /// number of offsets is neither 1 nor `4 - axis`.
    pub fn initialize(
        conf: &CropConf,
        input_template: TensorShape,
        target: &TargetSource,
    ) -> Result<Self, NeuroCropError> {
        let axis = conf.validate()?;
        let target_shape = target.shape();

        let mut crop_shape = input_template;
        let mut crop_corner = [0; RANK];
        for i in Axis::all().filter(|i| *i >= axis) {
            crop_shape.copy_dim_from(i, target_shape);
            crop_corner[i.index()] = if conf.offsets.len() > 1 {
                conf.offsets[i.index() - axis.index()]
            } else {
                conf.offsets[0]
            };
        }

        let mut resolver = CropResolver {
            axis,
            resolved: ResolvedCrop {
                crop_shape,
                crop_corner,
            },
            in_dims: input_template,
            out_dims: TensorShape::unbatched(0, 0, 0),
        };
        resolver.refresh_output(None);

        debug!(
            "CropResolver: axis {}, crop_shape {}, crop_corner {:?}, target {:?}",
            axis, resolver.resolved.crop_shape, crop_corner, target
        );
        Ok(resolver)
    }

    /// Prepares the shape descriptors for one pass at `batch_size`.
    ///
    /// Non-zero `observed_height`/`observed_width` replace the statically
    /// configured input height/width; 0 keeps them. Pass-through axes of the
    /// crop shape follow the updated input shape, and the output shape is
    /// recomputed from the crop shape.
    pub fn adapt_to_batch(&mut self, batch_size: usize, observed_height: usize, observed_width: usize) {
        self.in_dims.set_dim(Axis::BATCH, batch_size);
        if observed_height != 0 {
            trace!("CropResolver: input height overridden to {}", observed_height);
            self.in_dims.set_dim(Axis::HEIGHT, observed_height);
        }
        if observed_width != 0 {
            trace!("CropResolver: input width overridden to {}", observed_width);
            self.in_dims.set_dim(Axis::WIDTH, observed_width);
        }

        let axis = self.axis;
        for i in Axis::all().filter(|i| *i < axis) {
            self.resolved.crop_shape.copy_dim_from(i, &self.in_dims);
        }
        self.refresh_output(Some(batch_size));
    }

    /// Output batch is the crop batch when the batch axis is cropped to a
    /// known size, the runtime batch otherwise.
    fn refresh_output(&mut self, batch_size: Option<usize>) {
        let crop = &self.resolved.crop_shape;
        let batch = crop.batch().or(batch_size);
        self.out_dims.reshape(batch, crop.channels(), crop.height(), crop.width());
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn resolved(&self) -> &ResolvedCrop {
        &self.resolved
    }

    pub fn crop_shape(&self) -> &TensorShape {
        &self.resolved.crop_shape
    }

    pub fn crop_corner(&self) -> &[usize; RANK] {
        &self.resolved.crop_corner
    }

    pub fn input_shape(&self) -> &TensorShape {
        &self.in_dims
    }

    pub fn output_shape(&self) -> &TensorShape {
        &self.out_dims
    }
}

#[cfg(test)]
#[path = "crop_resolver_test.rs"]
mod tests;
