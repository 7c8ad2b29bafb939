//! Image acquisition and normalization utilities.

mod load;
mod normalize;
mod raw;

pub use load::load_image;
pub use normalize::{normalize, Interpolation};
pub use raw::{Acquisition, RawImage};

use ndarray::Array4;

/// Image tensor in NCHW format (batch, channels, height, width).
/// Values are standardized per channel with the ImageNet statistics.
pub type NormalizedTensor = Array4<f32>;

/// Spatial resolution expected by the classifier.
pub const INPUT_SIZE: u32 = 224;

/// Number of channels in RGB images.
pub const RGB_CHANNELS: usize = 3;

/// Per-channel mean the model was trained with.
pub const CHANNEL_MEAN: [f32; RGB_CHANNELS] = [0.485, 0.456, 0.406];

/// Per-channel standard deviation the model was trained with.
pub const CHANNEL_STD: [f32; RGB_CHANNELS] = [0.229, 0.224, 0.225];
