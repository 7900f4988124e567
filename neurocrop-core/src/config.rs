//! Static configuration of a crop layer.
//!
//! A crop layer is described by its primary input's image configuration, an
//! optional second (reference) input whose shape supplies the crop extents,
//! and the crop parameters themselves (`axis`, `offsets`, literal `shape`).
//! Everything here is validated once, when the configuration is built, and is
//! immutable afterwards.

use crate::error::ConfigError;
use crate::shape::{Axis, TensorShape, RANK};

/// Static image description of a layer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageConf {
    pub channels: usize,
    /// Image width, and height too unless `img_size_y` is set.
    pub img_size: usize,
    pub img_size_y: Option<usize>,
}

impl ImageConf {
    /// Square image of `img_size x img_size` with `channels` channels.
    pub fn new(channels: usize, img_size: usize) -> Self {
        ImageConf {
            channels,
            img_size,
            img_size_y: None,
        }
    }

    pub fn with_img_size_y(mut self, img_size_y: usize) -> Self {
        self.img_size_y = Some(img_size_y);
        self
    }

    pub fn height(&self) -> usize {
        self.img_size_y.unwrap_or(self.img_size)
    }

    pub fn width(&self) -> usize {
        self.img_size
    }

    /// Static shape of the input with the batch left unresolved.
    pub fn shape(&self) -> TensorShape {
        TensorShape::unbatched(self.channels, self.height(), self.width())
    }

    fn validate(&self, input: &str) -> Result<(), ConfigError> {
        if self.channels == 0 {
            return Err(ConfigError::InvalidImageConf {
                input: input.to_string(),
                message: "channels must be non-zero".to_string(),
            });
        }
        if self.img_size == 0 {
            return Err(ConfigError::InvalidImageConf {
                input: input.to_string(),
                message: "img_size must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Crop parameters: starting axis, per-axis offsets and an optional literal
/// target shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropConf {
    pub axis: usize,
    /// Either one offset shared by every cropped axis, or exactly `4 - axis`
    /// offsets, one per cropped axis.
    pub offsets: Vec<usize>,
    /// Literal target shape, used when no reference input is configured.
    /// A batch extent of 0 means "unresolved".
    pub shape: Option<[usize; RANK]>,
}

impl CropConf {
    pub fn new(axis: usize, offsets: Vec<usize>) -> Self {
        CropConf {
            axis,
            offsets,
            shape: None,
        }
    }

    pub fn with_shape(mut self, shape: [usize; RANK]) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Checks the axis range and the number of offsets.
    ///
    /// # Returns
    /// The validated starting axis.
    ///
    /// # Errors
    /// * `ConfigError::InvalidAxis` if `axis` is not in `[0, 3]`.
    /// * `ConfigError::InvalidOffsetsLength` unless there is exactly one offset
    ///   or exactly `4 - axis` offsets.
    pub fn validate(&self) -> Result<Axis, ConfigError> {
        let axis = Axis::new(self.axis)?;
        let cropped_axes = RANK - axis.index();
        let len = self.offsets.len();
        if len != 1 && len != cropped_axes {
            return Err(ConfigError::InvalidOffsetsLength {
                axis: axis.index(),
                expected: cropped_axes,
                actual: len,
            });
        }
        Ok(axis)
    }
}

/// Where the crop extents of the cropped axes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSource {
    /// Shape of a sibling tensor in the same graph.
    Reference(TensorShape),
    /// Literal shape from the crop configuration.
    Literal(TensorShape),
}

impl TargetSource {
    /// Picks the single configured source of target extents.
    ///
    /// # Errors
    /// * `ConfigError::AmbiguousTargetSource` if both are given.
    /// * `ConfigError::MissingTargetSource` if neither is given.
    pub fn from_parts(
        reference: Option<TensorShape>,
        literal: Option<[usize; RANK]>,
    ) -> Result<Self, ConfigError> {
        match (reference, literal) {
            (Some(shape), None) => Ok(TargetSource::Reference(shape)),
            (None, Some(dims)) => Ok(TargetSource::Literal(TensorShape::from_literal(dims))),
            (Some(_), Some(_)) => Err(ConfigError::AmbiguousTargetSource),
            (None, None) => Err(ConfigError::MissingTargetSource),
        }
    }

    pub fn shape(&self) -> &TensorShape {
        match self {
            TargetSource::Reference(shape) | TargetSource::Literal(shape) => shape,
        }
    }
}

/// Complete, validated configuration of one crop layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropLayerConfig {
    name: String,
    input: ImageConf,
    reference: Option<ImageConf>,
    crop: CropConf,
}

impl CropLayerConfig {
    /// Starts a builder for the layer called `name`.
    ///
    /// `input`, `axis` and `offsets` are required, plus exactly one of
    /// `reference` or `shape`. Without `offsets` the build fails with
    /// `ConfigError::InvalidOffsetsLength` reporting zero offsets.
    pub fn builder(name: impl Into<String>) -> CropLayerConfigBuilder {
        CropLayerConfigBuilder {
            name: name.into(),
            input: None,
            reference: None,
            crop: CropConf::new(0, Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input(&self) -> &ImageConf {
        &self.input
    }

    pub fn reference(&self) -> Option<&ImageConf> {
        self.reference.as_ref()
    }

    pub fn crop(&self) -> &CropConf {
        &self.crop
    }

    /// Static shape of the primary input.
    pub fn input_shape(&self) -> TensorShape {
        self.input.shape()
    }

    /// The source of target extents: the reference input if one is
    /// configured, the literal crop shape otherwise.
    pub fn target_source(&self) -> Result<TargetSource, ConfigError> {
        TargetSource::from_parts(self.reference.map(|r| r.shape()), self.crop.shape)
    }
}

/// Consuming builder for [`CropLayerConfig`].
#[derive(Debug, Clone)]
pub struct CropLayerConfigBuilder {
    name: String,
    input: Option<ImageConf>,
    reference: Option<ImageConf>,
    crop: CropConf,
}

impl CropLayerConfigBuilder {
    pub fn input(mut self, input: ImageConf) -> Self {
        self.input = Some(input);
        self
    }

    pub fn reference(mut self, reference: ImageConf) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn axis(mut self, axis: usize) -> Self {
        self.crop.axis = axis;
        self
    }

    pub fn offsets(mut self, offsets: Vec<usize>) -> Self {
        self.crop.offsets = offsets;
        self
    }

    pub fn shape(mut self, shape: [usize; RANK]) -> Self {
        self.crop.shape = Some(shape);
        self
    }

    /// Validates and freezes the configuration.
    ///
    /// # Errors
    /// Any `ConfigError`: missing or invalid image configuration, invalid axis
    /// or offsets, or an ambiguous/missing target source.
    pub fn build(self) -> Result<CropLayerConfig, ConfigError> {
        let input = self.input.ok_or_else(|| ConfigError::InvalidImageConf {
            input: self.name.clone(),
            message: "primary input image configuration is missing".to_string(),
        })?;
        input.validate(&self.name)?;
        if let Some(reference) = &self.reference {
            reference.validate(&format!("{}.reference", self.name))?;
        }
        self.crop.validate()?;

        let config = CropLayerConfig {
            name: self.name,
            input,
            reference: self.reference,
            crop: self.crop,
        };
        config.target_source()?;
        Ok(config)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
