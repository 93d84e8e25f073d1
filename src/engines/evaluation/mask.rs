use crate::error::{GlobeError, Result};
use image::{GrayImage, Luma};
use std::path::Path;

/// Mask pixels below this brightness (0.0 black, 1.0 white) mark the region
/// a mask is about.
pub const MASK_THRESHOLD: f64 = 0.9;

fn brightness(value: u8) -> f64 {
    value as f64 / 255.0
}

/// Mean darkness of an image: `1 - average gray`.
///
/// Glyph ink is dark on a white background, so this is the fraction of
/// non-background coverage.
pub fn darkness(image: &GrayImage) -> f64 {
    let pixels = image.width() as f64 * image.height() as f64;
    if pixels == 0.0 {
        return 0.0;
    }
    let gray: f64 = image.pixels().map(|p| brightness(p[0])).sum();
    1.0 - gray / pixels
}

/// A reference image together with its precomputed darkness.
#[derive(Debug, Clone)]
pub struct MaskImage {
    image: GrayImage,
    darkness: f64,
}

impl MaskImage {
    pub fn new(image: GrayImage) -> Self {
        let darkness = darkness(&image);
        Self { image, darkness }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(GlobeError::MissingMask { path: path.to_path_buf() });
        }
        Ok(Self::new(image::open(path)?.into_luma8()))
    }

    pub fn darkness(&self) -> f64 {
        self.darkness
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    /// The complementary mask: designated pixels turn white, everything
    /// else black.
    pub fn inverted(&self) -> Self {
        let (width, height) = self.image.dimensions();
        let image = GrayImage::from_fn(width, height, |x, y| {
            if brightness(self.image.get_pixel(x, y)[0]) < MASK_THRESHOLD {
                Luma([255])
            } else {
                Luma([0])
            }
        });
        Self::new(image)
    }

    /// Darkness of `frame` seen through this mask.
    ///
    /// Inside the designated region the frame pixel counts, elsewhere the
    /// mask's own (bright) pixel does.
    pub fn masked_darkness(&self, frame: &GrayImage) -> Result<f64> {
        if frame.dimensions() != self.image.dimensions() {
            return Err(GlobeError::DimensionMismatch {
                expected: self.image.dimensions(),
                actual: frame.dimensions(),
            });
        }
        let pixels = frame.width() as f64 * frame.height() as f64;
        if pixels == 0.0 {
            return Ok(0.0);
        }
        let gray: f64 = self
            .image
            .pixels()
            .zip(frame.pixels())
            .map(|(mask, shot)| {
                let mask = brightness(mask[0]);
                if mask < MASK_THRESHOLD {
                    brightness(shot[0])
                } else {
                    mask
                }
            })
            .sum();
        Ok(1.0 - gray / pixels)
    }

    /// `1 - (darkness - masked) / darkness`: the share of the designated
    /// region that `frame` covers with ink. A mask without a designated
    /// region scores 0.
    pub fn score(&self, frame: &GrayImage) -> Result<f64> {
        let masked = self.masked_darkness(frame)?;
        if self.darkness <= 0.0 {
            return Ok(0.0);
        }
        Ok(1.0 - (self.darkness - masked) / self.darkness)
    }
}
