// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildwerk Upscale — async client for the image-to-image upscale endpoint
// (`POST {host}/v1/generation/{engine}/image-to-image/upscale`), using bearer
// token authentication and multipart uploads.

pub mod client;

pub use client::{UpscaleClient, UpscaleRequest};
