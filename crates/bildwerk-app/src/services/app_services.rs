// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — holds the settings and the lazily loaded
// segmentation model, and exposes one handler per editor tab.
//
// Handlers are independent: each reads its input from disk, runs one
// transform and overwrites its fixed output file. Two requests of the same kind
// running at once write the same file; the last one wins.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use bildwerk_core::AppConfig;
use bildwerk_core::error::Result;
use bildwerk_core::types::{
    BackgroundOptions, BackgroundSource, BrightnessAdjustment, OutputFile, SkewFactors,
};
use bildwerk_imaging::{
    BackgroundRemover, ForegroundSegmenter, ImageProcessor, MattingParams, load_segmenter,
};
use bildwerk_upscale::{UpscaleClient, UpscaleRequest};
use image::DynamicImage;
use tracing::{info, warn};

use super::data_dir;

/// A link to an external tool, rendered by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalLink {
    pub label: &'static str,
    pub url: String,
}

impl ExternalLink {
    /// `[label](url)`
    pub fn markdown(&self) -> String {
        format!("[{}]({})", self.label, self.url)
    }
}

/// Shared application services accessible from all Dioxus components via
/// `use_context::<AppServices>()`.
///
/// All fields are Arc-wrapped so the struct can be moved into closures and
/// async blocks freely.
#[derive(Clone)]
pub struct AppServices {
    data_dir: PathBuf,
    config: Arc<Mutex<AppConfig>>,
    /// Loaded on first background removal and kept for the session.
    segmenter: Arc<Mutex<Option<Arc<dyn ForegroundSegmenter>>>>,
}

impl AppServices {
    /// Initialise services in the platform data directory. Call once at app
    /// startup.
    pub fn init() -> Result<Self> {
        Self::with_data_dir(data_dir::data_dir())
    }

    /// Initialise services rooted at `dir`, loading `config.json` from it if
    /// present.
    pub fn with_data_dir(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)?;
        info!(path = %dir.display(), "initialising app services");

        let config = load_config(&dir).unwrap_or_default();

        Ok(Self {
            data_dir: dir,
            config: Arc::new(Mutex::new(config)),
            segmenter: Arc::new(Mutex::new(None)),
        })
    }

    // -- Background ----------------------------------------------------------

    /// Cut the subject out of `subject` and, if asked, put it in front of a
    /// colour or a blurred background image.
    ///
    /// Writes `subject_no_bg.png` when the background is not replaced and
    /// `combined_image.png` otherwise.
    pub fn remove_and_replace_background(
        &self,
        subject: &Path,
        options: &BackgroundOptions,
    ) -> Result<PathBuf> {
        // Resolve first so a missing background image fails before inference.
        let source = options.resolve()?;
        let config = self.config();
        let matting = config
            .matting
            .alpha_matting
            .then(|| MattingParams::from(&config.matting));
        let remover = BackgroundRemover::new(self.segmenter()?).with_matting(matting);

        let subject_image = ImageProcessor::open(subject)?.into_dynamic();
        let cutout = remover.remove(&subject_image)?;

        let (file, result) = match source {
            BackgroundSource::Transparent => (OutputFile::SubjectNoBackground, cutout),
            other => (OutputFile::Combined, remover.replace(&cutout, &other)?),
        };

        let path = file.path_in(&self.output_dir()?);
        ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(result)).save(&path)?;
        info!(output = %path.display(), "background step written");
        Ok(path)
    }

    /// Use `segmenter` instead of loading the configured model.
    pub fn set_segmenter(&self, segmenter: Arc<dyn ForegroundSegmenter>) {
        *self.segmenter.lock().expect("segmenter lock poisoned") = Some(segmenter);
    }

    fn segmenter(&self) -> Result<Arc<dyn ForegroundSegmenter>> {
        let mut guard = self.segmenter.lock().expect("segmenter lock poisoned");
        if let Some(segmenter) = guard.as_ref() {
            return Ok(Arc::clone(segmenter));
        }
        let loaded = load_segmenter(&self.config().matting)?;
        *guard = Some(Arc::clone(&loaded));
        Ok(loaded)
    }

    // -- Upscale -------------------------------------------------------------

    /// Stage `input` as `input_image.png`, send it to the upscale API and
    /// write the answer to `upscaled_image.png`.
    pub async fn upscale_image(&self, input: &Path) -> Result<PathBuf> {
        let config = self.config();
        let client = UpscaleClient::from_config(&config.upscale)?;
        self.upscale_with(&client, &UpscaleRequest::from(&config.upscale), input)
            .await
    }

    async fn upscale_with(
        &self,
        client: &UpscaleClient,
        request: &UpscaleRequest,
        input: &Path,
    ) -> Result<PathBuf> {
        let out = self.output_dir()?;
        let staged = OutputFile::UpscaleInput.path_in(&out);
        ImageProcessor::open(input)?.into_8bit().save(&staged)?;

        let result = OutputFile::Upscaled.path_in(&out);
        client.upscale_file(&staged, &result, request).await?;
        info!(output = %result.display(), "upscaled image written");
        Ok(result)
    }

    // -- Adjustments ---------------------------------------------------------

    /// Grayscale `input` into `image_gray.png`.
    pub fn gray(&self, input: &Path) -> Result<PathBuf> {
        let path = OutputFile::Gray.path_in(&self.output_dir()?);
        ImageProcessor::open(input)?.grayscale().save(&path)?;
        Ok(path)
    }

    /// Brighten and/or darken `input` into `adjusted_image.png`.
    pub fn adjust_brightness_and_darkness(
        &self,
        input: &Path,
        adjustment: &BrightnessAdjustment,
    ) -> Result<PathBuf> {
        let path = OutputFile::Adjusted.path_in(&self.output_dir()?);
        ImageProcessor::open(input)?
            .adjust_levels(adjustment)
            .save(&path)?;
        Ok(path)
    }

    /// Rotate `input` counter-clockwise by `degrees` into `rotated.png`.
    pub fn rotate_image(&self, input: &Path, degrees: f32) -> Result<PathBuf> {
        let path = OutputFile::Rotated.path_in(&self.output_dir()?);
        ImageProcessor::open(input)?.rotate(degrees).save(&path)?;
        Ok(path)
    }

    /// Skew `input`, write `skewed.png` and return the skewed image.
    pub fn skew_image(&self, input: &Path, skew: SkewFactors) -> Result<DynamicImage> {
        let path = OutputFile::Skewed.path_in(&self.output_dir()?);
        let skewed = ImageProcessor::open(input)?.skew(skew)?;
        skewed.save(&path)?;
        Ok(skewed.into_dynamic())
    }

    // -- Object remover ------------------------------------------------------

    /// Link to the hosted object-removal tool.
    pub fn object_remover_link(&self) -> ExternalLink {
        ExternalLink {
            label: "Open the IOPaint object remover",
            url: self.config().object_remover_url,
        }
    }

    // -- Config Persistence --------------------------------------------------

    /// Get a clone of the current config.
    pub fn config(&self) -> AppConfig {
        self.config.lock().expect("config lock poisoned").clone()
    }

    /// Update and persist the config.
    ///
    /// A changed model path drops the cached segmenter so the next removal
    /// loads the new model.
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        let previous = {
            let mut guard = self.config.lock().expect("config lock poisoned");
            std::mem::replace(&mut *guard, config.clone())
        };
        if previous.matting.model_path != config.matting.model_path {
            *self.segmenter.lock().expect("segmenter lock poisoned") = None;
        }
        persist_config(&self.data_dir, config)
    }

    /// Directory the fixed output files go to, created on demand.
    pub fn output_dir(&self) -> Result<PathBuf> {
        match self.config().output_dir {
            Some(dir) => {
                std::fs::create_dir_all(&dir)?;
                Ok(dir)
            }
            None => Ok(data_dir::subdir(&self.data_dir, "output")?),
        }
    }
}

// -- Config file persistence -------------------------------------------------

const CONFIG_FILE: &str = "config.json";

fn load_config(data_dir: &Path) -> Option<AppConfig> {
    let path = data_dir.join(CONFIG_FILE);
    let data = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&data) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
            None
        }
    }
}

fn persist_config(data_dir: &Path, config: &AppConfig) -> Result<()> {
    let path = data_dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}
