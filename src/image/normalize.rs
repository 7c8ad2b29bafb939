//! Conversion of decoded bitmaps into model input tensors.

use image::imageops::FilterType;
use ndarray::Array4;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::{NormalizedTensor, RawImage, CHANNEL_MEAN, CHANNEL_STD, INPUT_SIZE, RGB_CHANNELS};

/// Resampling filter used to bring images to the model resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Interpolation {
    #[default]
    Bilinear,
    CatmullRom,
    Lanczos3,
}

impl Interpolation {
    const fn filter(self) -> FilterType {
        match self {
            Self::Bilinear => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl std::str::FromStr for Interpolation {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bilinear" => Ok(Self::Bilinear),
            "catmull-rom" => Ok(Self::CatmullRom),
            "lanczos3" => Ok(Self::Lanczos3),
            _ => Err(format!(
                "Unknown interpolation: {s}. Use 'bilinear', 'catmull-rom' or 'lanczos3'."
            )),
        }
    }
}

/// Convert a decoded image into a normalized NCHW tensor.
///
/// The image is:
/// 1. Validated (non-zero dimensions, 3 channels, matching buffer)
/// 2. Resized to 224x224 with the requested filter
/// 3. Scaled from [0, 255] to [0, 1]
/// 4. Standardized per channel with the ImageNet mean/std
/// 5. Returned as NCHW tensor (1, 3, 224, 224)
///
/// # Errors
///
/// Returns [`Error::InvalidImage`] if the image cannot be interpreted as RGB.
#[allow(clippy::cast_possible_truncation)]
pub fn normalize(raw: RawImage, interpolation: Interpolation) -> Result<NormalizedTensor> {
    let (width, height, channels) = (raw.width(), raw.height(), raw.channels());
    let invalid = |reason: &str| Error::InvalidImage {
        width,
        height,
        channels,
        reason: reason.to_string(),
    };

    if width == 0 || height == 0 {
        return Err(invalid("dimensions must be positive"));
    }
    if usize::from(channels) != RGB_CHANNELS {
        return Err(invalid("expected 3 color channels"));
    }
    let rgb = raw
        .into_rgb()
        .ok_or_else(|| invalid("pixel buffer does not match dimensions"))?;

    let resized = if (width, height) == (INPUT_SIZE, INPUT_SIZE) {
        rgb
    } else {
        image::imageops::resize(&rgb, INPUT_SIZE, INPUT_SIZE, interpolation.filter())
    };

    let size = INPUT_SIZE as usize;
    let mut tensor = Array4::<f32>::zeros((1, RGB_CHANNELS, size, size));

    for (x, y, pixel) in resized.enumerate_pixels() {
        // Safe: x and y are bounded by INPUT_SIZE (224)
        let (x, y) = (x as usize, y as usize);
        for c in 0..RGB_CHANNELS {
            let scaled = f32::from(pixel[c]) / 255.0;
            tensor[[0, c, y, x]] = (scaled - CHANNEL_MEAN[c]) / CHANNEL_STD[c];
        }
    }

    Ok(tensor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> RawImage {
        RawImage::from(RgbImage::from_pixel(width, height, Rgb(rgb)))
    }

    #[test]
    fn test_tensor_shape() {
        for (w, h) in [(1, 1), (100, 100), (640, 480), (3, 1000)] {
            let tensor = normalize(solid(w, h, [10, 20, 30]), Interpolation::Bilinear).unwrap();
            assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
            assert!(tensor.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_black_image_values() {
        let tensor = normalize(solid(50, 50, [0, 0, 0]), Interpolation::Bilinear).unwrap();

        for c in 0..RGB_CHANNELS {
            let expected = -CHANNEL_MEAN[c] / CHANNEL_STD[c];
            let channel = tensor.slice(ndarray::s![0, c, .., ..]);
            assert!(channel.iter().all(|v| (v - expected).abs() < 1e-5));
        }
    }

    #[test]
    fn test_white_image_values() {
        let tensor = normalize(solid(224, 224, [255, 255, 255]), Interpolation::Lanczos3).unwrap();

        // (1 - 0.485) / 0.229
        assert!((tensor[[0, 0, 0, 0]] - 2.248_908).abs() < 1e-4);
        // (1 - 0.406) / 0.225
        assert!((tensor[[0, 2, 223, 223]] - 2.64).abs() < 1e-4);
    }

    #[test]
    fn test_channel_first_layout() {
        let mut img = RgbImage::new(224, 224);
        img.put_pixel(5, 7, Rgb([255, 0, 0]));
        let tensor = normalize(RawImage::from(img), Interpolation::Bilinear).unwrap();

        let red_hi = (1.0 - CHANNEL_MEAN[0]) / CHANNEL_STD[0];
        let green_lo = -CHANNEL_MEAN[1] / CHANNEL_STD[1];
        assert!((tensor[[0, 0, 7, 5]] - red_hi).abs() < 1e-5);
        assert!((tensor[[0, 1, 7, 5]] - green_lo).abs() < 1e-5);
        assert!((tensor[[0, 0, 5, 7]] - red_hi).abs() > 1.0);
    }

    #[test]
    fn test_deterministic() {
        let img = RawImage::from(RgbImage::from_fn(37, 91, |x, y| {
            Rgb([(x * 7) as u8, (y * 3) as u8, ((x + y) % 256) as u8])
        }));

        let a = normalize(img.clone(), Interpolation::CatmullRom).unwrap();
        let b = normalize(img, Interpolation::CatmullRom).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_empty_image() {
        let err = normalize(RawImage::from_raw(0, 10, 3, Vec::new()), Interpolation::Bilinear)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidImage { width: 0, .. }));
    }

    #[test]
    fn test_rejects_non_rgb() {
        let err = normalize(RawImage::from_raw(2, 2, 4, vec![0; 16]), Interpolation::Bilinear)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidImage { channels: 4, .. }));
    }

    #[test]
    fn test_rejects_short_buffer() {
        let err = normalize(RawImage::from_raw(4, 4, 3, vec![0; 10]), Interpolation::Bilinear)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidImage { .. }));
    }

    #[test]
    fn test_parse_interpolation() {
        assert_eq!(
            "Lanczos3".parse::<Interpolation>().unwrap(),
            Interpolation::Lanczos3
        );
        assert_eq!(
            "catmull-rom".parse::<Interpolation>().unwrap(),
            Interpolation::CatmullRom
        );
        assert!("nearest".parse::<Interpolation>().is_err());
    }
}
