pub mod format;
pub mod metadata;
pub mod naming;
pub mod persistence;

pub use format::SourceFormat;
pub use naming::mosaic_output_path;
pub use persistence::{image_dimensions, is_supported_extension, load, save};

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, ImageFileError>;

#[derive(thiserror::Error, Debug)]
pub enum ImageFileError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PNG decode error: {0}")]
    PngDecode(#[from] png::DecodingError),

    #[error("PNG encode error: {0}")]
    PngEncode(#[from] png::EncodingError),

    #[error("No available output name for {}: gave up after {attempts} attempts", path.display())]
    OutputNamesExhausted { path: PathBuf, attempts: u32 },
}
