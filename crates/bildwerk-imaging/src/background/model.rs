// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Saliency-model foreground segmenter, executed with `rten`.
//
// # Model Setup
//
// Expects a U²-Net style salient-object model taking a `[1, 3, 320, 320]`
// normalised RGB tensor and producing a `[1, 1, 320, 320]` probability map as
// its first output. ONNX exports can be converted with `rten-convert`:
//
// ```sh
// pip install rten-convert
// rten-convert u2net.onnx ~/.cache/bildwerk/u2net.rten
// ```

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma};
use rten::Model;
use rten_tensor::NdTensor;
use rten_tensor::prelude::*;
use bildwerk_core::error::{BildwerkError, Result};
use tracing::{debug, info, instrument};

use super::segment::ForegroundSegmenter;

/// Square input resolution of the model.
const INPUT_SIZE: u32 = 320;

/// ImageNet channel statistics the model was trained with.
const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Salient-object segmentation model.
///
/// Loading is the expensive step — keep the model around and reuse it for
/// every image.
pub struct SaliencyModel {
    model: Model,
}

impl SaliencyModel {
    /// Load the model file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`BildwerkError::ModelUnavailable`] if the file is missing or
    /// cannot be parsed.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(BildwerkError::ModelUnavailable(format!(
                "segmentation model not found at {}; convert a U²-Net export with \
                 `rten-convert` and place it there, or change the path in Settings",
                path.display()
            )));
        }

        info!("Loading segmentation model");
        let model = Model::load_file(path).map_err(|err| {
            BildwerkError::ModelUnavailable(format!(
                "failed to load segmentation model from {}: {}",
                path.display(),
                err
            ))
        })?;
        Ok(Self { model })
    }

    /// Build the normalised NCHW input tensor.
    ///
    /// Pixels are divided by the brightest channel value in the image before
    /// the per-channel mean/std normalisation.
    fn prepare_input(image: &DynamicImage) -> NdTensor<f32, 4> {
        let rgb = image
            .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Lanczos3)
            .to_rgb8();
        let peak = rgb.as_raw().iter().copied().max().unwrap_or(0).max(1) as f32;

        let side = INPUT_SIZE as usize;
        let mut data = vec![0f32; 3 * side * side];
        for (x, y, pixel) in rgb.enumerate_pixels() {
            for c in 0..3 {
                let value = pixel.0[c] as f32 / peak;
                data[c * side * side + y as usize * side + x as usize] =
                    (value - MEAN[c]) / STD[c];
            }
        }
        NdTensor::from_data([1, 3, side, side], data)
    }
}

impl ForegroundSegmenter for SaliencyModel {
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    fn segment(&self, image: &DynamicImage) -> Result<GrayImage> {
        let input = Self::prepare_input(image);

        let output = self
            .model
            .run_one(input.view().into(), None)
            .map_err(|err| BildwerkError::Segmentation(format!("model run failed: {}", err)))?;
        let output: NdTensor<f32, 4> = output.try_into().map_err(|err| {
            BildwerkError::Segmentation(format!("unexpected model output: {:?}", err))
        })?;

        let [_, _, out_h, out_w] = output.shape();
        let (min, max) = output
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let range = (max - min).max(f32::EPSILON);
        debug!(out_w, out_h, min, max, "Model output received");

        let small = GrayImage::from_fn(out_w as u32, out_h as u32, |x, y| {
            let v = (output[[0, 0, y as usize, x as usize]] - min) / range;
            Luma([(v * 255.0).round().clamp(0.0, 255.0) as u8])
        });

        Ok(image::imageops::resize(
            &small,
            image.width(),
            image.height(),
            FilterType::Lanczos3,
        ))
    }
}
