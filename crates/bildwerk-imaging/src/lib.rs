// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildwerk-imaging — Pixel work for the Bildwerk editor.
//
// Provides image processing (grayscale, brightness/darkness, rotate, skew,
// blur, resize) and background removal (foreground segmentation, alpha
// matting, compositing over a colour or image).

pub mod background;
pub mod image;

// Re-export the primary structs so callers can use `bildwerk_imaging::ImageProcessor` etc.
pub use background::{BackgroundRemover, ForegroundSegmenter, MattingParams, load_segmenter};
pub use crate::image::processor::ImageProcessor;

#[cfg(feature = "matting")]
pub use background::SaliencyModel;
