//! # Crop Layer Forward/Backward Example
//!
//! Builds a crop layer that cuts an 8x6 window out of 3-channel 10x10 images,
//! runs a forward pass on a batch of two samples, fills the output gradient
//! with ones and routes it back into the input gradient.
//!
//! ## Execution
//! `cargo run --example crop_forward_backward`

use neurocrop_core::{Buffer, CropLayer, CropLayerConfig, ImageConf, Layer, LayerOutput, NeuroCropError};

fn main() -> Result<(), NeuroCropError> {
    let config = CropLayerConfig::builder("crop")
        .input(ImageConf::new(3, 10))
        .axis(2)
        .offsets(vec![1, 2])
        .shape([0, 3, 8, 6])
        .build()?;
    let mut layer = CropLayer::<f32>::new(config)?;
    println!(
        "crop_shape = {}, crop_corner = {:?}",
        layer.resolver().crop_shape(),
        layer.resolver().crop_corner()
    );

    let batch = 2;
    let data: Vec<f32> = (0..batch * 300).map(|x| x as f32).collect();
    let mut input = LayerOutput::new(Buffer::from_vec(data, batch, 300)?).with_grad();

    let output = layer.forward(&input)?;
    println!(
        "output: {} rows x {} values, first row starts with {:?}",
        output.value().rows(),
        output.value().cols(),
        &output.value().as_slice()[..6]
    );

    if let Some(grad) = layer.output_grad_mut() {
        grad.as_mut_slice().iter_mut().for_each(|g| *g = 1.0);
    }
    layer.backward(&mut input)?;

    let touched = input
        .grad()
        .map(|g| g.as_slice().iter().filter(|&&g| g != 0.0).count())
        .unwrap_or(0);
    println!("input gradient entries inside the crop: {}", touched);
    Ok(())
}
