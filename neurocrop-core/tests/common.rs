use neurocrop_core::{Buffer, LayerOutput};

// Helpers shared by the integration tests.
// Added allow(dead_code) because usage across different test crates isn't detected easily.

/// Upstream output of `rows` samples holding `0, 1, 2, ...`, with a zeroed
/// gradient buffer attached.
#[allow(dead_code)]
pub fn iota_output(rows: usize, cols: usize) -> LayerOutput<f32> {
    let data = (0..rows * cols).map(|x| x as f32).collect();
    let value = Buffer::from_vec(data, rows, cols).expect("Test buffer creation failed");
    LayerOutput::new(value).with_grad()
}

/// Row-major index into an (N, C, H, W) tensor.
#[allow(dead_code)]
pub fn nchw_index(dims: [usize; 4], n: usize, c: usize, h: usize, w: usize) -> usize {
    ((n * dims[1] + c) * dims[2] + h) * dims[3] + w
}
