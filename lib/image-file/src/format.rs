//! Source format detection from leading magic bytes.

use std::{fs::File, io::Read, path::Path};

/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// JPEG start-of-image marker.
pub const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];

/// The detected on-disk format of a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Png,
    Jpeg,
    Other,
}

/// Detects the image format from the file's magic bytes.
///
/// The extension is never consulted, so a mislabeled file is classified by
/// its actual content. An unreadable file is `Other`; callers degrade to a
/// metadata-less save in that case.
pub fn detect_format(path: &Path) -> SourceFormat {
    let mut header = Vec::with_capacity(PNG_SIGNATURE.len());
    if let Err(e) =
        File::open(path).and_then(|f| f.take(PNG_SIGNATURE.len() as u64).read_to_end(&mut header))
    {
        log::debug!("cannot read header of {}: {e}", path.display());
        return SourceFormat::Other;
    }

    if header.len() >= PNG_SIGNATURE.len() && header[..PNG_SIGNATURE.len()] == PNG_SIGNATURE {
        SourceFormat::Png
    } else if header.len() >= JPEG_SOI.len() && header[..JPEG_SOI.len()] == JPEG_SOI {
        SourceFormat::Jpeg
    } else {
        SourceFormat::Other
    }
}

pub fn is_png(path: &Path) -> bool {
    detect_format(path) == SourceFormat::Png
}

pub fn is_jpg(path: &Path) -> bool {
    detect_format(path) == SourceFormat::Jpeg
}
