// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — grayscale, brightness/darkness, rotation, skew, blur and
// resize. Operates on in-memory images using the `image` and `imageproc`
// crates.

use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, Rgba};
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometric_transformations::{Interpolation, Projection, warp};
use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::types::{BrightnessAdjustment, SkewFactors};
use tracing::{debug, info, instrument};

/// Image processing pipeline operating on a single in-memory image.
///
/// Each method consumes `self` and returns a new `ImageProcessor` wrapping the
/// transformed image, enabling method chaining. Geometric transforms keep the
/// canvas size and fill uncovered pixels with zeros.
///
/// ```ignore
/// let png = ImageProcessor::open("photo.jpg")?
///     .rotate(30.0)
///     .skew(SkewFactors::new(20.0, 0.0))?
///     .to_png_bytes()?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let img = image::open(path.as_ref()).map_err(|err| {
            BildwerkError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Convert to a single-channel luma image.
    ///
    /// Uses the BT.601 weights (0.299, 0.587, 0.114) with rounding, the same
    /// mapping as the common RGB-to-gray conversion in computer vision
    /// libraries. Alpha is dropped.
    #[instrument(skip(self))]
    pub fn grayscale(self) -> Self {
        info!("Converting to grayscale");
        let rgb = self.image.to_rgb8();
        let gray = GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
            let Rgb([r, g, b]) = *rgb.get_pixel(x, y);
            let luma = (299 * r as u32 + 587 * g as u32 + 114 * b as u32 + 500) / 1000;
            Luma([luma as u8])
        });
        Self {
            image: DynamicImage::ImageLuma8(gray),
        }
    }

    /// Brighten and/or darken every colour channel.
    ///
    /// When enabled, brightness is added first and darkness subtracted second,
    /// both saturating at the 0..=255 bounds. Alpha is left untouched.
    #[instrument(skip(self))]
    pub fn adjust_levels(self, adjustment: &BrightnessAdjustment) -> Self {
        let brighten = adjustment.brighten_by();
        let darken = adjustment.darken_by();
        info!(?brighten, ?darken, "Adjusting brightness and darkness");

        let shift = |channel: u8| -> u8 {
            let lifted = match brighten {
                Some(v) => channel.saturating_add(v),
                None => channel,
            };
            match darken {
                Some(v) => lifted.saturating_sub(v),
                None => lifted,
            }
        };

        let image = if self.image.color().has_alpha() {
            let mut rgba = self.image.to_rgba8();
            for Rgba([r, g, b, _]) in rgba.pixels_mut() {
                *r = shift(*r);
                *g = shift(*g);
                *b = shift(*b);
            }
            DynamicImage::ImageRgba8(rgba)
        } else {
            let mut rgb = self.image.to_rgb8();
            for Rgb([r, g, b]) in rgb.pixels_mut() {
                *r = shift(*r);
                *g = shift(*g);
                *b = shift(*b);
            }
            DynamicImage::ImageRgb8(rgb)
        };
        Self { image }
    }

    /// Rotate about the image centre by `degrees`, counter-clockwise.
    ///
    /// The canvas keeps its size, so corners are clipped and the uncovered area
    /// is filled with zeros. Multiples of 360 return the image untouched.
    #[instrument(skip(self), fields(degrees))]
    pub fn rotate(self, degrees: f32) -> Self {
        info!(degrees, "Rotating image");

        let normalised = degrees.rem_euclid(360.0);
        if normalised.abs() < 1e-4 || (normalised - 360.0).abs() < 1e-4 {
            return self;
        }

        let projection = rotation_about_center(self.width(), self.height(), degrees);
        debug!("General rotation applied");
        Self {
            image: warp_keep_canvas(&self.image, &projection),
        }
    }

    /// Shear horizontally, then vertically.
    ///
    /// With `h` and `v` the percentages divided by 100, source pixel `(x, y)`
    /// lands at `(x + h*y, y)` after the first pass, and each pixel of that
    /// result lands at `(x, y + v*x)` after the second.
    #[instrument(skip(self), fields(h = skew.horizontal_percent, v = skew.vertical_percent))]
    pub fn skew(self, skew: SkewFactors) -> Result<Self> {
        info!("Skewing image");
        if skew.is_identity() {
            return Ok(self);
        }

        let h = skew.horizontal_factor();
        let v = skew.vertical_factor();
        let horizontal = projection_from([1.0, h, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0])?;
        let vertical = projection_from([1.0, 0.0, 0.0, v, 1.0, 0.0, 0.0, 0.0, 1.0])?;

        let sheared = warp_keep_canvas(&self.image, &horizontal);
        let sheared = warp_keep_canvas(&sheared, &vertical);
        debug!(h, v, "Skew applied");
        Ok(Self { image: sheared })
    }

    /// Gaussian blur with standard deviation `radius`. Radius 0 is a no-op.
    #[instrument(skip(self), fields(radius))]
    pub fn blur(self, radius: f32) -> Self {
        if radius <= 0.0 || !radius.is_finite() {
            return self;
        }
        info!(radius, "Blurring image");
        let rgba = self.image.to_rgba8();
        Self {
            image: DynamicImage::ImageRgba8(gaussian_blur_f32(&rgba, radius)),
        }
    }

    /// Resize to exactly `width` x `height`, ignoring aspect ratio.
    pub fn resize_exact(self, width: u32, height: u32) -> Self {
        if self.image.width() == width && self.image.height() == height {
            return self;
        }
        let resized =
            self.image
                .resize_exact(width, height, image::imageops::FilterType::CatmullRom);
        Self { image: resized }
    }

    /// Convert to 8 bits per channel for encoding.
    ///
    /// Float images with every sample in `[0, 1]` are scaled to `0..=255`;
    /// float images with larger samples are taken to be on the 8-bit scale
    /// already. 16-bit images are narrowed.
    pub fn into_8bit(self) -> Self {
        let image = match self.image {
            DynamicImage::ImageRgb32F(buf) => {
                let scale = float_scale(buf.as_raw());
                let (w, h) = buf.dimensions();
                DynamicImage::ImageRgb8(image::RgbImage::from_fn(w, h, |x, y| {
                    let [r, g, b] = buf.get_pixel(x, y).0;
                    Rgb([to_u8(r, scale), to_u8(g, scale), to_u8(b, scale)])
                }))
            }
            DynamicImage::ImageRgba32F(buf) => {
                let scale = float_scale(buf.as_raw());
                let (w, h) = buf.dimensions();
                DynamicImage::ImageRgba8(image::RgbaImage::from_fn(w, h, |x, y| {
                    let [r, g, b, a] = buf.get_pixel(x, y).0;
                    Rgba([
                        to_u8(r, scale),
                        to_u8(g, scale),
                        to_u8(b, scale),
                        to_u8(a, scale),
                    ])
                }))
            }
            DynamicImage::ImageLuma16(_) => DynamicImage::ImageLuma8(self.image.to_luma8()),
            DynamicImage::ImageLumaA16(_) => {
                DynamicImage::ImageLumaA8(self.image.to_luma_alpha8())
            }
            DynamicImage::ImageRgb16(_) => DynamicImage::ImageRgb8(self.image.to_rgb8()),
            DynamicImage::ImageRgba16(_) => DynamicImage::ImageRgba8(self.image.to_rgba8()),
            other => other,
        };
        Self { image }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| BildwerkError::ImageError(format!("PNG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Write the image to `path` as PNG, whatever the extension says.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        self.image
            .save_with_format(path.as_ref(), ImageFormat::Png)
            .map_err(|err| {
                BildwerkError::ImageError(format!(
                    "failed to save image to {}: {}",
                    path.as_ref().display(),
                    err
                ))
            })
    }
}

/// Affine rotation matrix about the canvas centre at scale 1. Positive angles
/// turn the picture counter-clockwise on screen.
fn rotation_about_center(width: u32, height: u32, degrees: f32) -> Projection {
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let (sin, cos) = degrees.to_radians().sin_cos();
    let tx = (1.0 - cos) * cx - sin * cy;
    let ty = sin * cx + (1.0 - cos) * cy;
    // A pure rotation is always invertible.
    Projection::from_matrix([cos, sin, tx, -sin, cos, ty, 0.0, 0.0, 1.0])
        .unwrap_or_else(|| Projection::scale(1.0, 1.0))
}

fn projection_from(matrix: [f32; 9]) -> Result<Projection> {
    Projection::from_matrix(matrix).ok_or_else(|| {
        BildwerkError::InvalidParameter(format!("transform {matrix:?} is not invertible"))
    })
}

/// Forward-map `image` through `projection` onto a canvas of the same size,
/// with bilinear sampling and zero fill.
fn warp_keep_canvas(image: &DynamicImage, projection: &Projection) -> DynamicImage {
    if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        DynamicImage::ImageRgba8(warp(
            &rgba,
            projection,
            Interpolation::Bilinear,
            Rgba([0, 0, 0, 0]),
        ))
    } else {
        let rgb = image.to_rgb8();
        DynamicImage::ImageRgb8(warp(
            &rgb,
            projection,
            Interpolation::Bilinear,
            Rgb([0, 0, 0]),
        ))
    }
}

/// Multiplier that brings float samples onto the 8-bit scale.
fn float_scale(samples: &[f32]) -> f32 {
    let peak = samples.iter().copied().fold(0.0f32, f32::max);
    if peak <= 1.0 { 255.0 } else { 1.0 }
}

fn to_u8(sample: f32, scale: f32) -> u8 {
    (sample * scale).round().clamp(0.0, 255.0) as u8
}
