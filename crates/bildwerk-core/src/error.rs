// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Bildwerk.

use thiserror::Error;

/// Top-level error type for all Bildwerk operations.
#[derive(Debug, Error)]
pub enum BildwerkError {
    // -- Imaging errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("missing input: {0}")]
    MissingInput(&'static str),

    // -- Background removal --
    #[error("foreground segmentation failed: {0}")]
    Segmentation(String),

    #[error("segmentation model unavailable: {0}")]
    ModelUnavailable(String),

    // -- Upscale API --
    #[error("upscale request failed: {0}")]
    UpscaleRequest(String),

    #[error("non-200 response ({status}): {body}")]
    UpscaleRejected { status: u16, body: String },

    #[error("invalid image data: {0}")]
    InvalidImageData(String),

    #[error("API key not set (expected environment variable {0})")]
    MissingApiKey(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BildwerkError>;
