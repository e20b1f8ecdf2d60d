// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Trimap-based alpha matting for segmentation masks.
//
// The raw mask is split into certain foreground, certain background and an
// unknown band. Both certain regions are eroded so the band around the subject
// edge widens; inside the band the model's soft mask value is kept as alpha.
//
// Erosion only looks at pixels inside the image, so the image border is not
// treated as background: a subject touching the edge stays certain foreground
// there instead of being pulled into the unknown band.

use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology::erode;
use bildwerk_core::config::MattingConfig;
use bildwerk_core::error::{BildwerkError, Result};
use tracing::{debug, instrument};

pub const TRIMAP_FOREGROUND: u8 = 255;
pub const TRIMAP_BACKGROUND: u8 = 0;
pub const TRIMAP_UNKNOWN: u8 = 128;

/// Thresholds for building the trimap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MattingParams {
    /// Mask values strictly above this are certain foreground.
    pub foreground_threshold: u8,
    /// Mask values strictly below this are certain background.
    pub background_threshold: u8,
    /// Side of the square structuring element used for erosion.
    pub erode_size: u8,
}

impl Default for MattingParams {
    fn default() -> Self {
        Self {
            foreground_threshold: 10,
            background_threshold: 10,
            erode_size: 10,
        }
    }
}

impl From<&MattingConfig> for MattingParams {
    fn from(config: &MattingConfig) -> Self {
        Self {
            foreground_threshold: config.foreground_threshold,
            background_threshold: config.background_threshold,
            erode_size: config.erode_size,
        }
    }
}

/// Build a trimap from a soft mask.
#[instrument(skip(mask), fields(width = mask.width(), height = mask.height()))]
pub fn trimap(mask: &GrayImage, params: &MattingParams) -> GrayImage {
    let region = |keep: &dyn Fn(u8) -> bool| {
        GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
            if keep(mask.get_pixel(x, y).0[0]) {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        })
    };
    let foreground = region(&|v| v > params.foreground_threshold);
    let background = region(&|v| v < params.background_threshold);

    let radius = params.erode_size / 2;
    let (foreground, background) = if radius > 0 {
        (
            erode(&foreground, Norm::LInf, radius),
            erode(&background, Norm::LInf, radius),
        )
    } else {
        (foreground, background)
    };

    let trimap = GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
        if foreground.get_pixel(x, y).0[0] > 0 {
            Luma([TRIMAP_FOREGROUND])
        } else if background.get_pixel(x, y).0[0] > 0 {
            Luma([TRIMAP_BACKGROUND])
        } else {
            Luma([TRIMAP_UNKNOWN])
        }
    });
    debug!(radius, "Trimap built");
    trimap
}

/// Alpha from a trimap: certain regions become fully opaque or transparent,
/// the unknown band keeps the soft mask value.
pub fn refine_alpha(mask: &GrayImage, params: &MattingParams) -> GrayImage {
    let trimap = trimap(mask, params);
    GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
        match trimap.get_pixel(x, y).0[0] {
            TRIMAP_FOREGROUND => Luma([255]),
            TRIMAP_BACKGROUND => Luma([0]),
            _ => *mask.get_pixel(x, y),
        }
    })
}

/// Apply `alpha` to `image`, multiplying any alpha the image already has.
pub fn cutout(image: &DynamicImage, alpha: &GrayImage) -> Result<RgbaImage> {
    if image.width() != alpha.width() || image.height() != alpha.height() {
        return Err(BildwerkError::Segmentation(format!(
            "mask is {}x{} but image is {}x{}",
            alpha.width(),
            alpha.height(),
            image.width(),
            image.height()
        )));
    }

    let mut rgba = image.to_rgba8();
    for (x, y, pixel) in rgba.enumerate_pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        let mask = alpha.get_pixel(x, y).0[0] as u16;
        let combined = (a as u16 * mask + 127) / 255;
        *pixel = Rgba([r, g, b, combined as u8]);
    }
    Ok(rgba)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    /// 40x40 mask: solid square 10..30, soft ring one pixel wide around it.
    fn square_mask() -> GrayImage {
        GrayImage::from_fn(40, 40, |x, y| {
            let inside = (10..30).contains(&x) && (10..30).contains(&y);
            let ring = (9..31).contains(&x) && (9..31).contains(&y);
            if inside {
                Luma([255])
            } else if ring {
                Luma([100])
            } else {
                Luma([0])
            }
        })
    }

    #[test]
    fn trimap_has_three_levels() {
        let tri = trimap(&square_mask(), &MattingParams::default());
        assert_eq!(tri.get_pixel(20, 20).0[0], TRIMAP_FOREGROUND);
        assert_eq!(tri.get_pixel(0, 0).0[0], TRIMAP_BACKGROUND);
        // The subject edge is eroded into the unknown band.
        assert_eq!(tri.get_pixel(10, 20).0[0], TRIMAP_UNKNOWN);
        assert_eq!(tri.get_pixel(6, 20).0[0], TRIMAP_UNKNOWN);
    }

    #[test]
    fn refine_keeps_soft_values_in_band_only() {
        let mask = square_mask();
        let alpha = refine_alpha(&mask, &MattingParams::default());
        assert_eq!(alpha.get_pixel(20, 20).0[0], 255);
        assert_eq!(alpha.get_pixel(0, 0).0[0], 0);
        assert_eq!(alpha.get_pixel(9, 20).0[0], 100);
    }

    #[test]
    fn no_erosion_thresholds_directly() {
        let params = MattingParams {
            erode_size: 0,
            ..Default::default()
        };
        let alpha = refine_alpha(&square_mask(), &params);
        // 100 > 10, so the ring is certain foreground without erosion.
        assert_eq!(alpha.get_pixel(9, 20).0[0], 255);
    }

    #[test]
    fn subject_touching_the_border_stays_opaque() {
        let mask = GrayImage::from_pixel(12, 12, Luma([255]));
        let alpha = refine_alpha(&mask, &MattingParams::default());
        assert_eq!(alpha.get_pixel(0, 0).0[0], 255);
        assert_eq!(alpha.get_pixel(11, 6).0[0], 255);
    }

    #[test]
    fn cutout_applies_mask_as_alpha() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 1, Rgb([10, 20, 30])));
        let mask = GrayImage::from_raw(2, 1, vec![255, 0]).unwrap();
        let out = cutout(&img, &mask).unwrap();
        assert_eq!(out.get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
        assert_eq!(out.get_pixel(1, 0).0[3], 0);
    }

    #[test]
    fn cutout_rejects_mismatched_mask() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        let mask = GrayImage::new(3, 4);
        assert!(matches!(cutout(&img, &mask), Err(BildwerkError::Segmentation(_))));
    }
}
