// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Crop processor — portrait normalisation, 3x3 sharpening and PNG encoding of
// a single straightened crop.

use image::{DynamicImage, ImageFormat, RgbaImage};
use imageproc::filter::filter3x3;
use polaroid_core::Orientation;
use polaroid_core::error::PolaroidError;
use tracing::{debug, instrument};

/// Post-processing for one extracted crop.
///
/// Each method consumes `self` and returns the transformed processor, so the
/// emit path reads as a chain:
///
/// ```ignore
/// let png = CropProcessor::new(crop)
///     .to_portrait()
///     .sharpen(&SHARPEN_KERNEL)
///     .to_png_bytes()?;
/// ```
pub struct CropProcessor {
    image: RgbaImage,
}

impl CropProcessor {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_rgba(self) -> RgbaImage {
        self.image
    }

    /// Rotate a quarter turn clockwise when the crop is wider than tall.
    #[instrument(skip_all)]
    pub fn to_portrait(self) -> Self {
        let (width, height) = self.image.dimensions();
        match Orientation::of(width, height) {
            Orientation::Portrait => self,
            Orientation::Landscape => {
                debug!(width, height, "Landscape crop rotated to portrait");
                Self {
                    image: image::imageops::rotate90(&self.image),
                }
            }
        }
    }

    /// Correlate the colour channels with a row-major 3x3 `kernel`.
    ///
    /// Borders are padded by continuity and results saturate to 0..=255.
    /// Alpha is carried over from the input.
    #[instrument(skip_all)]
    pub fn sharpen(self, kernel: &[f32; 9]) -> Self {
        let mut sharpened: RgbaImage = filter3x3::<_, f32, u8>(&self.image, kernel);
        for (out, src) in sharpened.pixels_mut().zip(self.image.pixels()) {
            out.0[3] = src.0[3];
        }
        Self { image: sharpened }
    }

    /// Encode the crop as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, PolaroidError> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        DynamicImage::ImageRgba8(self.image.clone())
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| PolaroidError::ImageEncode(format!("PNG encoding failed: {}", err)))?;
        Ok(buffer)
    }
}
