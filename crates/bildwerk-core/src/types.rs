// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Bildwerk image editor.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BildwerkError, Result};

/// The fixed files each editing operation writes into the output directory.
///
/// Every invocation overwrites the previous result of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFile {
    /// Subject with its background removed (no replacement).
    SubjectNoBackground,
    /// Subject composited over a replacement background.
    Combined,
    /// Staged copy of the image sent to the upscale API.
    UpscaleInput,
    /// Image returned by the upscale API.
    Upscaled,
    Gray,
    Adjusted,
    Rotated,
    Skewed,
}

impl OutputFile {
    /// File name inside the output directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::SubjectNoBackground => "subject_no_bg.png",
            Self::Combined => "combined_image.png",
            Self::UpscaleInput => "input_image.png",
            Self::Upscaled => "upscaled_image.png",
            Self::Gray => "image_gray.png",
            Self::Adjusted => "adjusted_image.png",
            Self::Rotated => "rotated.png",
            Self::Skewed => "skewed.png",
        }
    }

    /// Full path of this output inside `dir`.
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }
}

/// An sRGB colour with alpha, as chosen in the colour picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbaColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl RgbaColor {
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (the leading `#` is optional).
    pub fn from_hex(input: &str) -> Result<Self> {
        let hex = input.trim().trim_start_matches('#');
        let invalid = || BildwerkError::InvalidParameter(format!("invalid colour '{input}'"));
        if !hex.is_ascii() {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

        match hex.len() {
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16).ok_or_else(invalid)? as u8;
                    out[i] = v * 17;
                }
                Ok(Self::opaque(out[0], out[1], out[2]))
            }
            6 => Ok(Self::opaque(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => Ok(Self {
                r: channel(&hex[0..2])?,
                g: channel(&hex[2..4])?,
                b: channel(&hex[4..6])?,
                a: channel(&hex[6..8])?,
            }),
            _ => Err(invalid()),
        }
    }

    /// `#rrggbb` form used by HTML colour inputs.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for RgbaColor {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Where the replacement background comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundSource {
    /// Keep the cut-out subject on a transparent canvas.
    Transparent,
    /// Fill behind the subject with a solid colour.
    Color(RgbaColor),
    /// Use another image, blurred by `blur_radius` and stretched to the subject size.
    Image { path: PathBuf, blur_radius: f32 },
}

/// Raw form inputs of the background tab, before they are resolved into a
/// [`BackgroundSource`].
#[derive(Debug, Clone, Default)]
pub struct BackgroundOptions {
    pub replace_background: bool,
    pub use_color_picker: bool,
    pub color: RgbaColor,
    pub background_path: Option<PathBuf>,
    pub blur_radius: f32,
}

impl BackgroundOptions {
    /// Decide which background layer the options ask for.
    ///
    /// The colour picker wins over a background image. Replacing without either
    /// is an error.
    pub fn resolve(&self) -> Result<BackgroundSource> {
        if !self.replace_background {
            return Ok(BackgroundSource::Transparent);
        }
        if self.use_color_picker {
            return Ok(BackgroundSource::Color(self.color));
        }
        match &self.background_path {
            Some(path) => Ok(BackgroundSource::Image {
                path: path.clone(),
                blur_radius: self.blur_radius.max(0.0),
            }),
            None => Err(BildwerkError::MissingInput("background image")),
        }
    }
}

/// Brightness and darkness toggles with their values (0..=255).
///
/// Brightness is added first, darkness subtracted second, both saturating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrightnessAdjustment {
    pub brightness_enabled: bool,
    pub brightness: u8,
    pub darkness_enabled: bool,
    pub darkness: u8,
}

impl BrightnessAdjustment {
    /// Amount to add, if brightening is on.
    pub fn brighten_by(&self) -> Option<u8> {
        self.brightness_enabled.then_some(self.brightness)
    }

    /// Amount to subtract, if darkening is on.
    pub fn darken_by(&self) -> Option<u8> {
        self.darkness_enabled.then_some(self.darkness)
    }
}

/// Horizontal and vertical skew in percent (the UI offers -100..=100).
///
/// `factor = percent / 100` is used as the shear coefficient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SkewFactors {
    pub horizontal_percent: f32,
    pub vertical_percent: f32,
}

impl SkewFactors {
    pub fn new(horizontal_percent: f32, vertical_percent: f32) -> Self {
        Self {
            horizontal_percent,
            vertical_percent,
        }
    }

    pub fn horizontal_factor(&self) -> f32 {
        self.horizontal_percent / 100.0
    }

    pub fn vertical_factor(&self) -> f32 {
        self.vertical_percent / 100.0
    }

    pub fn is_identity(&self) -> bool {
        self.horizontal_percent == 0.0 && self.vertical_percent == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_hex() {
        let c = RgbaColor::from_hex("#1e90ff").unwrap();
        assert_eq!(c, RgbaColor::opaque(0x1e, 0x90, 0xff));
        assert_eq!(c.to_hex(), "#1e90ff");
    }

    #[test]
    fn parses_short_and_alpha_forms() {
        assert_eq!(RgbaColor::from_hex("f0a").unwrap(), RgbaColor::opaque(255, 0, 170));
        let c = RgbaColor::from_hex("#00000080").unwrap();
        assert_eq!(c.a, 0x80);
    }

    #[test]
    fn rejects_garbage_colour() {
        assert!(RgbaColor::from_hex("#12345").is_err());
        assert!(RgbaColor::from_hex("zzzzzz").is_err());
        assert!(RgbaColor::from_hex("#ééé").is_err());
    }

    #[test]
    fn background_without_replacement_is_transparent() {
        let opts = BackgroundOptions {
            use_color_picker: true,
            ..Default::default()
        };
        assert_eq!(opts.resolve().unwrap(), BackgroundSource::Transparent);
    }

    #[test]
    fn colour_picker_takes_precedence_over_image() {
        let opts = BackgroundOptions {
            replace_background: true,
            use_color_picker: true,
            color: RgbaColor::opaque(1, 2, 3),
            background_path: Some(PathBuf::from("bg.png")),
            blur_radius: 4.0,
        };
        assert_eq!(
            opts.resolve().unwrap(),
            BackgroundSource::Color(RgbaColor::opaque(1, 2, 3))
        );
    }

    #[test]
    fn replacing_without_background_image_fails() {
        let opts = BackgroundOptions {
            replace_background: true,
            ..Default::default()
        };
        assert!(matches!(
            opts.resolve(),
            Err(BildwerkError::MissingInput("background image"))
        ));
    }

    #[test]
    fn toggles_gate_adjustment_values() {
        let adj = BrightnessAdjustment {
            brightness_enabled: false,
            brightness: 40,
            darkness_enabled: true,
            darkness: 15,
        };
        assert_eq!(adj.brighten_by(), None);
        assert_eq!(adj.darken_by(), Some(15));
    }

    #[test]
    fn skew_percent_maps_to_factor() {
        let skew = SkewFactors::new(50.0, -25.0);
        assert!((skew.horizontal_factor() - 0.5).abs() < f32::EPSILON);
        assert!((skew.vertical_factor() + 0.25).abs() < f32::EPSILON);
        assert!(SkewFactors::default().is_identity());
    }

    #[test]
    fn output_files_are_fixed() {
        let dir = Path::new("/tmp/out");
        assert_eq!(
            OutputFile::Combined.path_in(dir),
            PathBuf::from("/tmp/out/combined_image.png")
        );
        assert_eq!(OutputFile::Gray.file_name(), "image_gray.png");
    }
}
