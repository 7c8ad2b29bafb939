//! Decoded input bitmaps and acquisition results.

use image::{DynamicImage, RgbImage};

/// An 8-bit interleaved bitmap handed over by an acquisition source.
///
/// No validation happens on construction; the normalizer rejects images
/// that are empty, not RGB, or whose buffer does not match the dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl RawImage {
    /// Wrap a raw interleaved pixel buffer.
    #[must_use]
    pub const fn from_raw(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub const fn channels(&self) -> u8 {
        self.channels
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the image, returning an RGB buffer when the layout allows it.
    pub(crate) fn into_rgb(self) -> Option<RgbImage> {
        if self.channels != 3 {
            return None;
        }
        RgbImage::from_raw(self.width, self.height, self.data)
    }
}

impl From<RgbImage> for RawImage {
    fn from(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self::from_raw(width, height, 3, img.into_raw())
    }
}

impl From<DynamicImage> for RawImage {
    fn from(img: DynamicImage) -> Self {
        Self::from(img.into_rgb8())
    }
}

/// What an acquisition source (camera, gallery, file) produced.
#[derive(Debug, Clone)]
pub enum Acquisition {
    /// A decoded image ready for classification.
    Captured(RawImage),
    /// The user backed out before an image was produced.
    Cancelled,
    /// The source could not deliver an image.
    Failed(String),
}
