// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Background removal and replacement — foreground segmentation, trimap-based
// alpha matting, and compositing the cut-out subject over a new background.
//
// # Feature Gate
//
// The model-backed segmenter (`SaliencyModel`) is only available when the
// `matting` feature is enabled. Without it, `load_segmenter` reports
// `ModelUnavailable` and callers can still supply their own
// `ForegroundSegmenter`.

pub mod composite;
pub mod matting;
pub mod segment;

#[cfg(feature = "matting")]
pub mod model;

use std::sync::Arc;

use bildwerk_core::config::MattingConfig;
use bildwerk_core::error::Result;

pub use composite::{BackgroundRemover, alpha_composite, solid_background};
pub use matting::MattingParams;
pub use segment::ForegroundSegmenter;

#[cfg(feature = "matting")]
pub use model::SaliencyModel;

/// Load the segmenter configured in `config`.
#[cfg(feature = "matting")]
pub fn load_segmenter(config: &MattingConfig) -> Result<Arc<dyn ForegroundSegmenter>> {
    Ok(Arc::new(SaliencyModel::load(&config.model_path)?))
}

/// Load the segmenter configured in `config`.
#[cfg(not(feature = "matting"))]
pub fn load_segmenter(config: &MattingConfig) -> Result<Arc<dyn ForegroundSegmenter>> {
    Err(bildwerk_core::BildwerkError::ModelUnavailable(format!(
        "built without the `matting` feature; cannot load {}",
        config.model_path.display()
    )))
}
