pub mod mosaic_effect;
pub mod preset;
pub mod region;

pub use mosaic_effect::{CellSize, MIN_CELL_SIZE, MosaicConfig};
pub use preset::{EffectPresets, MosaicPreset};
pub use region::Region;

use image::RgbaImage;

pub type ImageEffectResult<T> = Result<T, ImageEffectError>;

#[derive(thiserror::Error, Debug)]
pub enum ImageEffectError {
    #[error("Resize error: {0}")]
    Resize(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// A destructive effect applied to a rectangular region of an image.
pub trait Effect {
    /// Mutates `image` in place inside `region`.
    ///
    /// Returns `Ok(false)` when the region was degenerate and nothing was
    /// changed; this is a defined no-op, not an error.
    fn apply(&self, image: &mut RgbaImage, region: Region) -> ImageEffectResult<bool>;
}
