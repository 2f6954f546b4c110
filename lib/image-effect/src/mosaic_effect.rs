use crate::{Effect, ImageEffectError, ImageEffectResult, Region};
use cutil::number::round_up_decimal;
use derivative::Derivative;
use derive_setters::Setters;
use fast_image_resize::{
    FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image as FastImage,
};
use image::{RgbaImage, imageops};

/// Minimum mosaic cell edge length in pixels.
///
/// A smaller cell keeps too much detail to redact anything.
pub const MIN_CELL_SIZE: u32 = 4;

/// Cell size selection for the mosaic effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellSize {
    /// Derive the cell size from the image dimensions at application time.
    Auto,
    /// Use a fixed cell edge length.
    Fixed(u32),
}

/// Mosaic (pixelation) effect configuration.
///
/// Pixelates a region by downscaling it with a box (area-average) filter and
/// upscaling back with nearest-neighbor, which leaves flat-color blocks with
/// hard edges. The region is truncated to a whole number of cells; a
/// fractional-cell strip at the right/bottom edge is left untouched.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct MosaicConfig {
    #[derivative(Default(value = "16"))]
    cell_size: u32,
}

impl MosaicConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Derives a cell size from the image dimensions.
    ///
    /// The long side divided by 100, rounded up to a whole number of pixels,
    /// floored at [`MIN_CELL_SIZE`]: 300x200 -> 4, 800x600 -> 8,
    /// 1280x1024 -> 13, 2894x4093 -> 41.
    pub fn calc_cell_size(image: &RgbaImage) -> u32 {
        let long_side = image.width().max(image.height());
        let cell = round_up_decimal(long_side as f64 / 100.0, 0) as u32;
        cell.max(MIN_CELL_SIZE)
    }
}

impl Effect for MosaicConfig {
    fn apply(&self, image: &mut RgbaImage, region: Region) -> ImageEffectResult<bool> {
        if self.cell_size < MIN_CELL_SIZE {
            return Err(ImageEffectError::InvalidParameter(format!(
                "cell size {} is below the minimum of {MIN_CELL_SIZE}",
                self.cell_size
            )));
        }

        let region = region.clamp_to(image.width(), image.height());
        if region.is_empty() {
            // a click without a drag, skip
            return Ok(false);
        }

        let cell = self.cell_size;
        let new_width = region.width() / cell * cell;
        let new_height = region.height() / cell * cell;
        if new_width == 0 || new_height == 0 {
            // the whole region is a fractional-cell strip
            return Ok(false);
        }

        let cropped =
            imageops::crop_imm(image, region.left, region.top, new_width, new_height).to_image();
        let src = FastImage::from_vec_u8(new_width, new_height, cropped.into_raw(), PixelType::U8x4)
            .map_err(|e| ImageEffectError::Resize(e.to_string()))?;

        let mut resizer = Resizer::new();

        // box downscale averages each cell into one flat pixel
        let mut small = FastImage::new(new_width / cell, new_height / cell, PixelType::U8x4);
        let downscale = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Box));
        resizer
            .resize(&src, &mut small, &downscale)
            .map_err(|e| ImageEffectError::Resize(e.to_string()))?;

        // nearest upscale keeps hard block edges
        let mut blocks = FastImage::new(new_width, new_height, PixelType::U8x4);
        let upscale = ResizeOptions::new().resize_alg(ResizeAlg::Nearest);
        resizer
            .resize(&small, &mut blocks, &upscale)
            .map_err(|e| ImageEffectError::Resize(e.to_string()))?;

        let blocks = RgbaImage::from_raw(new_width, new_height, blocks.into_vec())
            .ok_or_else(|| ImageEffectError::Resize("pixelated buffer size mismatch".into()))?;
        imageops::replace(image, &blocks, region.left as i64, region.top as i64);

        Ok(true)
    }
}
