use super::*;
use crate::error::ConfigError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn literal(dims: [usize; RANK]) -> TargetSource {
    TargetSource::Literal(TensorShape::from_literal(dims))
}

#[test]
fn test_literal_target_hw_crop() -> Result<(), NeuroCropError> {
    let conf = CropConf::new(2, vec![1, 2]);
    let resolver = CropResolver::initialize(&conf, TensorShape::unbatched(3, 10, 10), &literal([0, 3, 8, 6]))?;

    assert_eq!(resolver.axis(), Axis::HEIGHT);
    assert_eq!(*resolver.crop_shape(), TensorShape::unbatched(3, 8, 6));
    assert_eq!(*resolver.crop_corner(), [0, 0, 1, 2]);
    assert_eq!(*resolver.output_shape(), TensorShape::unbatched(3, 8, 6));
    assert_eq!(*resolver.input_shape(), TensorShape::unbatched(3, 10, 10));
    Ok(())
}

#[test]
fn test_reference_target_channel_crop() -> Result<(), NeuroCropError> {
    let conf = CropConf::new(1, vec![0]);
    let target = TargetSource::Reference(TensorShape::unbatched(2, 5, 5));
    let resolver = CropResolver::initialize(&conf, TensorShape::unbatched(4, 5, 5), &target)?;

    assert_eq!(*resolver.crop_shape(), TensorShape::unbatched(2, 5, 5));
    assert_eq!(*resolver.crop_corner(), [0, 0, 0, 0]);
    Ok(())
}

#[test]
fn test_invalid_axis() {
    let conf = CropConf::new(5, vec![0]);
    let result = CropResolver::initialize(&conf, TensorShape::unbatched(3, 10, 10), &literal([0, 3, 8, 6]));
    assert_eq!(result, Err(NeuroCropError::Config(ConfigError::InvalidAxis { axis: 5 })));
    assert!(result.unwrap_err().is_config_error());
}

#[test]
fn test_invalid_offsets_length() {
    let conf = CropConf::new(2, vec![0, 1, 2]);
    let result = CropResolver::initialize(&conf, TensorShape::unbatched(3, 10, 10), &literal([0, 3, 8, 6]));
    assert_eq!(
        result,
        Err(NeuroCropError::Config(ConfigError::InvalidOffsetsLength {
            axis: 2,
            expected: 2,
            actual: 3
        }))
    );
}

#[test]
fn test_initialize_is_idempotent() -> Result<(), NeuroCropError> {
    let conf = CropConf::new(1, vec![1, 2, 3]);
    let target = literal([0, 2, 4, 4]);
    let a = CropResolver::initialize(&conf, TensorShape::unbatched(4, 8, 8), &target)?;
    let b = CropResolver::initialize(&conf, TensorShape::unbatched(4, 8, 8), &target)?;
    assert_eq!(a, b);
    assert_eq!(a.resolved(), b.resolved());
    Ok(())
}

#[test]
fn test_adapt_to_batch_keeps_static_size() -> Result<(), NeuroCropError> {
    let conf = CropConf::new(2, vec![0]);
    let mut resolver =
        CropResolver::initialize(&conf, TensorShape::unbatched(3, 32, 32), &literal([0, 3, 16, 16]))?;

    resolver.adapt_to_batch(8, 0, 0);
    assert_eq!(*resolver.input_shape(), TensorShape::new(Some(8), 3, 32, 32));
    assert_eq!(*resolver.output_shape(), TensorShape::new(Some(8), 3, 16, 16));
    Ok(())
}

#[test]
fn test_adapt_to_batch_overrides_observed_size() -> Result<(), NeuroCropError> {
    let conf = CropConf::new(2, vec![0]);
    let mut resolver =
        CropResolver::initialize(&conf, TensorShape::unbatched(3, 32, 32), &literal([0, 3, 16, 16]))?;

    resolver.adapt_to_batch(8, 20, 20);
    assert_eq!(*resolver.input_shape(), TensorShape::new(Some(8), 3, 20, 20));
    assert_eq!(*resolver.output_shape(), TensorShape::new(Some(8), 3, 16, 16));

    // Only the non-zero side is overridden.
    resolver.adapt_to_batch(4, 0, 24);
    assert_eq!(*resolver.input_shape(), TensorShape::new(Some(4), 3, 20, 24));
    Ok(())
}

#[test]
fn test_adapt_to_batch_pass_through_axes_follow_input() -> Result<(), NeuroCropError> {
    // Cropping only the width: the height is passed through and must follow
    // the observed frame height.
    let conf = CropConf::new(3, vec![2]);
    let mut resolver =
        CropResolver::initialize(&conf, TensorShape::unbatched(1, 10, 10), &literal([0, 1, 10, 4]))?;
    resolver.adapt_to_batch(2, 6, 0);

    assert_eq!(*resolver.crop_shape(), TensorShape::new(Some(2), 1, 6, 4));
    assert_eq!(*resolver.output_shape(), TensorShape::new(Some(2), 1, 6, 4));
    assert_eq!(*resolver.crop_corner(), [0, 0, 0, 2]);
    Ok(())
}

#[test]
fn test_batch_axis_crop_with_literal_batch() -> Result<(), NeuroCropError> {
    let conf = CropConf::new(0, vec![1, 0, 0, 0]);
    let mut resolver =
        CropResolver::initialize(&conf, TensorShape::unbatched(1, 2, 2), &literal([2, 1, 2, 2]))?;
    assert_eq!(*resolver.output_shape(), TensorShape::new(Some(2), 1, 2, 2));

    resolver.adapt_to_batch(4, 0, 0);
    assert_eq!(*resolver.output_shape(), TensorShape::new(Some(2), 1, 2, 2));
    assert_eq!(*resolver.crop_corner(), [1, 0, 0, 0]);
    Ok(())
}

#[test]
fn test_batch_axis_with_reference_defers_batch() -> Result<(), NeuroCropError> {
    let conf = CropConf::new(0, vec![0]);
    let target = TargetSource::Reference(TensorShape::unbatched(1, 2, 2));
    let mut resolver = CropResolver::initialize(&conf, TensorShape::unbatched(3, 4, 4), &target)?;
    assert_eq!(resolver.output_shape().batch(), None);

    resolver.adapt_to_batch(5, 0, 0);
    assert_eq!(*resolver.output_shape(), TensorShape::new(Some(5), 1, 2, 2));
    Ok(())
}

#[test]
fn test_resolved_params() -> Result<(), NeuroCropError> {
    let conf = CropConf::new(2, vec![1, 2]);
    let resolver = CropResolver::initialize(&conf, TensorShape::unbatched(3, 10, 10), &literal([0, 3, 8, 6]))?;
    let params = resolver.resolved().params();
    assert_eq!(params.corner, [0, 0, 1, 2]);
    assert_eq!(params.shape, TensorShape::unbatched(3, 8, 6));
    Ok(())
}

#[test]
fn test_random_configurations_respect_axis_invariants() -> Result<(), NeuroCropError> {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let axis = rng.gen_range(0..RANK);
        let input = TensorShape::unbatched(rng.gen_range(1..6), rng.gen_range(1..12), rng.gen_range(1..12));
        let target_dims = [0, rng.gen_range(1..6), rng.gen_range(1..12), rng.gen_range(1..12)];
        let shared = rng.gen_bool(0.5);
        let offsets: Vec<usize> = if shared {
            vec![rng.gen_range(0..4)]
        } else {
            (0..RANK - axis).map(|_| rng.gen_range(0..4)).collect()
        };
        let conf = CropConf::new(axis, offsets.clone());
        let resolver = CropResolver::initialize(&conf, input, &literal(target_dims))?;
        let target = TensorShape::from_literal(target_dims);

        for i in Axis::all() {
            let k = i.index();
            if k < axis {
                assert_eq!(resolver.crop_shape().dim(i), input.dim(i));
                assert_eq!(resolver.crop_corner()[k], 0);
            } else {
                assert_eq!(resolver.crop_shape().dim(i), target.dim(i));
                let expected = if shared { offsets[0] } else { offsets[k - axis] };
                assert_eq!(resolver.crop_corner()[k], expected);
            }
        }
    }
    Ok(())
}
