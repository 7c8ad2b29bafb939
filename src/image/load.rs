//! Image loading utilities.

use std::path::Path;

use crate::error::{Error, Result};

use super::RawImage;

/// Load an image from disk and decode it to an RGB bitmap.
///
/// Any format the `image` crate can decode is accepted; alpha and
/// grayscale inputs are converted to RGB.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<RawImage> {
    let path = path.as_ref();

    let img = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(
        "Loaded {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );

    Ok(RawImage::from(img))
}
