// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PNG data URLs for showing results inside the web view.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bildwerk_core::error::Result;
use bildwerk_imaging::ImageProcessor;
use image::DynamicImage;

/// `data:image/png;base64,...` for an in-memory image.
pub fn image_data_url(image: &DynamicImage) -> Result<String> {
    let png = ImageProcessor::from_dynamic(image.clone()).to_png_bytes()?;
    Ok(png_data_url(&png))
}

/// Data URL for a PNG already written to disk.
pub fn file_data_url(path: &Path) -> Result<String> {
    let png = std::fs::read(path)?;
    Ok(png_data_url(&png))
}

fn png_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn data_url_round_trips_through_base64() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 2, Rgb([1, 2, 3])));
        let url = image_data_url(&img).unwrap();
        let payload = url.strip_prefix("data:image/png;base64,").unwrap();
        let bytes = STANDARD.decode(payload).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = file_data_url(&dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, bildwerk_core::BildwerkError::Io(_)));
    }
}
