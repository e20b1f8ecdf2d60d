// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Background remover — cut the subject out and composite it over a solid
// colour or a blurred, stretched background image.

use std::sync::Arc;

use image::{DynamicImage, Rgba, RgbaImage};
use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::types::{BackgroundSource, RgbaColor};
use tracing::{debug, info, instrument};

use super::matting::{self, MattingParams};
use super::segment::ForegroundSegmenter;
use crate::image::processor::ImageProcessor;

/// Removes and optionally replaces the background of a subject image.
#[derive(Clone)]
pub struct BackgroundRemover {
    segmenter: Arc<dyn ForegroundSegmenter>,
    /// Trimap thresholds, or `None` to use the raw mask as alpha.
    matting: Option<MattingParams>,
}

impl BackgroundRemover {
    pub fn new(segmenter: Arc<dyn ForegroundSegmenter>) -> Self {
        Self {
            segmenter,
            matting: Some(MattingParams::default()),
        }
    }

    /// Refine masks with the given trimap parameters (`None` disables matting).
    pub fn with_matting(mut self, params: Option<MattingParams>) -> Self {
        self.matting = params;
        self
    }

    /// Cut the subject out of `subject`, returning an RGBA image whose alpha is
    /// the (refined) foreground mask.
    #[instrument(skip_all, fields(width = subject.width(), height = subject.height()))]
    pub fn remove(&self, subject: &DynamicImage) -> Result<RgbaImage> {
        info!(matting = self.matting.is_some(), "Removing background");
        let mask = self.segmenter.segment(subject)?;
        if mask.dimensions() != (subject.width(), subject.height()) {
            return Err(BildwerkError::Segmentation(format!(
                "segmenter returned a {}x{} mask for a {}x{} image",
                mask.width(),
                mask.height(),
                subject.width(),
                subject.height()
            )));
        }

        let alpha = match &self.matting {
            Some(params) => matting::refine_alpha(&mask, params),
            None => mask,
        };
        matting::cutout(subject, &alpha)
    }

    /// Put `cutout` in front of the background described by `source`.
    ///
    /// The result always has the cut-out's dimensions.
    #[instrument(skip(self, cutout), fields(width = cutout.width(), height = cutout.height()))]
    pub fn replace(&self, cutout: &RgbaImage, source: &BackgroundSource) -> Result<RgbaImage> {
        let (width, height) = cutout.dimensions();
        let background = match source {
            BackgroundSource::Transparent => return Ok(cutout.clone()),
            BackgroundSource::Color(color) => solid_background(width, height, *color),
            BackgroundSource::Image { path, blur_radius } => {
                info!(path = %path.display(), blur_radius, "Preparing background image");
                ImageProcessor::open(path)?
                    .blur(*blur_radius)
                    .resize_exact(width, height)
                    .into_dynamic()
                    .to_rgba8()
            }
        };
        alpha_composite(&background, cutout)
    }
}

/// A canvas of `width` x `height` filled with `color`.
pub fn solid_background(width: u32, height: u32, color: RgbaColor) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color.to_array()))
}

/// Porter-Duff "over": `foreground` on top of `background`. Both must have the
/// same dimensions.
pub fn alpha_composite(background: &RgbaImage, foreground: &RgbaImage) -> Result<RgbaImage> {
    if background.dimensions() != foreground.dimensions() {
        return Err(BildwerkError::ImageError(format!(
            "cannot composite {}x{} over {}x{}",
            foreground.width(),
            foreground.height(),
            background.width(),
            background.height()
        )));
    }
    let out = RgbaImage::from_fn(background.width(), background.height(), |x, y| {
        over(*foreground.get_pixel(x, y), *background.get_pixel(x, y))
    });
    debug!("Composite complete");
    Ok(out)
}

/// Porter-Duff "over" for one pixel with straight (non-premultiplied) alpha.
///
/// An opaque backdrop always yields an opaque result.
fn over(fg: Rgba<u8>, bg: Rgba<u8>) -> Rgba<u8> {
    let fa = fg.0[3] as f32 / 255.0;
    let ba = bg.0[3] as f32 / 255.0;
    let under = ba * (1.0 - fa);
    let out_a = fa + under;
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let mut out = [0u8; 4];
    for c in 0..3 {
        let value = (fg.0[c] as f32 * fa + bg.0[c] as f32 * under) / out_a;
        out[c] = value.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    /// Segmenter that marks the left half of the image as foreground.
    fn left_half() -> Arc<dyn ForegroundSegmenter> {
        Arc::new(|img: &DynamicImage| -> Result<GrayImage> {
            let half = img.width() / 2;
            Ok(GrayImage::from_fn(img.width(), img.height(), |x, _| {
                if x < half { Luma([255]) } else { Luma([0]) }
            }))
        })
    }

    fn red_subject() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 24, Rgb([200, 0, 0])))
    }

    #[test]
    fn remove_makes_background_transparent() {
        let remover = BackgroundRemover::new(left_half());
        let cut = remover.remove(&red_subject()).unwrap();
        assert_eq!(cut.dimensions(), (32, 24));
        assert_eq!(cut.get_pixel(2, 12), &Rgba([200, 0, 0, 255]));
        assert_eq!(cut.get_pixel(30, 12).0[3], 0);
    }

    #[test]
    fn colour_background_fills_transparent_area() {
        let remover = BackgroundRemover::new(left_half()).with_matting(None);
        let cut = remover.remove(&red_subject()).unwrap();
        let out = remover
            .replace(&cut, &BackgroundSource::Color(RgbaColor::opaque(0, 0, 255)))
            .unwrap();
        assert_eq!(out.dimensions(), (32, 24));
        assert_eq!(out.get_pixel(2, 12), &Rgba([200, 0, 0, 255]));
        assert_eq!(out.get_pixel(30, 12), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn image_background_is_resized_to_subject() {
        let dir = tempfile::tempdir().unwrap();
        let bg_path = dir.path().join("bg.png");
        RgbImage::from_pixel(100, 7, Rgb([0, 255, 0])).save(&bg_path).unwrap();

        let remover = BackgroundRemover::new(left_half());
        let cut = remover.remove(&red_subject()).unwrap();
        let out = remover
            .replace(
                &cut,
                &BackgroundSource::Image {
                    path: bg_path,
                    blur_radius: 3.0,
                },
            )
            .unwrap();
        assert_eq!(out.dimensions(), (32, 24));
        let Rgba([r, g, b, a]) = *out.get_pixel(30, 12);
        assert_eq!((r, b), (0, 0));
        assert!(g > 250 && a > 250);
    }

    #[test]
    fn transparent_source_returns_cutout() {
        let remover = BackgroundRemover::new(left_half());
        let cut = remover.remove(&red_subject()).unwrap();
        let out = remover.replace(&cut, &BackgroundSource::Transparent).unwrap();
        assert_eq!(out, cut);
    }

    #[test]
    fn half_transparent_pixel_blends() {
        let bg = solid_background(1, 1, RgbaColor::opaque(0, 0, 0));
        let fg = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 128]));
        let out = alpha_composite(&bg, &fg).unwrap();
        let Rgba([r, _, _, a]) = *out.get_pixel(0, 0);
        assert!((126..=130).contains(&r), "got {r}");
        assert_eq!(a, 255);
    }

    #[test]
    fn opaque_backdrop_stays_opaque_for_every_foreground_alpha() {
        let bg = solid_background(1, 1, RgbaColor::opaque(0, 0, 255));
        for alpha in 0..=255u8 {
            let fg = RgbaImage::from_pixel(1, 1, Rgba([200, 0, 0, alpha]));
            let Rgba([r, g, b, a]) = *alpha_composite(&bg, &fg).unwrap().get_pixel(0, 0);
            assert_eq!(a, 255, "foreground alpha {alpha}");
            assert_eq!(g, 0);
            let expected_r = (200.0 * alpha as f32 / 255.0).round() as i32;
            let expected_b = (255.0 * (255 - alpha) as f32 / 255.0).round() as i32;
            assert!((r as i32 - expected_r).abs() <= 1, "alpha {alpha}: r {r}");
            assert!((b as i32 - expected_b).abs() <= 1, "alpha {alpha}: b {b}");
        }
    }

    #[test]
    fn transparent_over_transparent_is_transparent() {
        let bg = RgbaImage::from_pixel(1, 1, Rgba([9, 9, 9, 0]));
        let fg = RgbaImage::from_pixel(1, 1, Rgba([7, 7, 7, 0]));
        assert_eq!(alpha_composite(&bg, &fg).unwrap().get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn composite_rejects_size_mismatch() {
        let bg = solid_background(4, 4, RgbaColor::WHITE);
        let fg = RgbaImage::new(3, 4);
        assert!(alpha_composite(&bg, &fg).is_err());
    }

    #[test]
    fn wrong_mask_size_is_a_segmentation_error() {
        let bad: Arc<dyn ForegroundSegmenter> =
            Arc::new(|_: &DynamicImage| -> Result<GrayImage> { Ok(GrayImage::new(1, 1)) });
        let err = BackgroundRemover::new(bad).remove(&red_subject()).unwrap_err();
        assert!(matches!(err, BildwerkError::Segmentation(_)));
    }
}
