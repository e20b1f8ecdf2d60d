// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Link shown on the object-remover tab.
pub const DEFAULT_OBJECT_REMOVER_URL: &str = "https://huggingface.co/spaces/Pontarids/IOPaint_Runner";

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory the fixed output files are written to. `None` means the
    /// `output` subdirectory of the data directory.
    pub output_dir: Option<PathBuf>,
    /// Remote upscaling API settings.
    pub upscale: UpscaleConfig,
    /// Background removal model and alpha matting settings.
    pub matting: MattingConfig,
    /// External object-removal tool.
    pub object_remover_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            upscale: UpscaleConfig::default(),
            matting: MattingConfig::default(),
            object_remover_url: DEFAULT_OBJECT_REMOVER_URL.into(),
        }
    }
}

/// Settings for the image-to-image upscale endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpscaleConfig {
    /// Base URL of the API, without a trailing slash.
    pub api_host: String,
    /// Upscaling engine, e.g. `esrgan-v1-x2plus`.
    pub engine_id: String,
    /// Requested output width. Only one of width/height is normally set.
    pub width: Option<u32>,
    /// Requested output height.
    pub height: Option<u32>,
    /// Environment variable holding the bearer token. The key itself is never
    /// written to the config file.
    pub api_key_env: String,
}

impl Default for UpscaleConfig {
    fn default() -> Self {
        Self {
            api_host: "https://api.stability.ai".into(),
            engine_id: "esrgan-v1-x2plus".into(),
            width: Some(1024),
            height: None,
            api_key_env: "STABILITY_API_KEY".into(),
        }
    }
}

impl UpscaleConfig {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Settings for foreground segmentation and trimap-based alpha matting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MattingConfig {
    /// Path to the saliency model (`.rten`).
    pub model_path: PathBuf,
    /// Refine the raw mask with a trimap before cutting out.
    pub alpha_matting: bool,
    /// Mask values above this are certain foreground.
    pub foreground_threshold: u8,
    /// Mask values below this are certain background.
    pub background_threshold: u8,
    /// Side length of the square structuring element used to erode both regions.
    pub erode_size: u8,
}

impl Default for MattingConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_dir().join("u2net.rten"),
            alpha_matting: true,
            foreground_threshold: 10,
            background_threshold: 10,
            erode_size: 10,
        }
    }
}

/// `$XDG_CACHE_HOME/bildwerk`, falling back to `~/.cache/bildwerk`.
fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("bildwerk")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("bildwerk")
    } else {
        PathBuf::from("bildwerk-models")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_upscale_endpoint() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.upscale.engine_id, "esrgan-v1-x2plus");
        assert_eq!(cfg.upscale.width, Some(1024));
        assert_eq!(cfg.upscale.height, None);
        assert_eq!(cfg.matting.foreground_threshold, 10);
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let cfg: AppConfig =
            serde_json::from_str(r#"{ "upscale": { "engine_id": "custom" } }"#).unwrap();
        assert_eq!(cfg.upscale.engine_id, "custom");
        assert_eq!(cfg.upscale.api_host, "https://api.stability.ai");
        assert_eq!(cfg.object_remover_url, DEFAULT_OBJECT_REMOVER_URL);
    }

    #[test]
    fn config_round_trips_through_json() {
        let mut cfg = AppConfig::default();
        cfg.output_dir = Some(PathBuf::from("/tmp/bildwerk"));
        let json = serde_json::to_string_pretty(&cfg).unwrap();
        let back: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
