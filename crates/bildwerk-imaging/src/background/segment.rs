// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Foreground segmentation seam.

use image::{DynamicImage, GrayImage};
use bildwerk_core::error::Result;

/// Produces a soft foreground mask for an image.
///
/// The mask must have the same dimensions as the input. 255 means certain
/// foreground, 0 certain background.
pub trait ForegroundSegmenter: Send + Sync {
    fn segment(&self, image: &DynamicImage) -> Result<GrayImage>;
}

impl<F> ForegroundSegmenter for F
where
    F: Fn(&DynamicImage) -> Result<GrayImage> + Send + Sync,
{
    fn segment(&self, image: &DynamicImage) -> Result<GrayImage> {
        self(image)
    }
}
