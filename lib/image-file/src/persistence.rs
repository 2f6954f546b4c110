//! Image loading and metadata-preserving saving.

use crate::{
    ImageFileError, Result,
    format::{self, SourceFormat},
    metadata,
};
use image::{DynamicImage, ImageFormat, RgbaImage, codecs::jpeg::JpegEncoder};
use std::{
    fs::{self, File},
    io::BufWriter,
    path::Path,
};

/// Encode quality for JPEG output.
const JPEG_QUALITY: u8 = 95;

/// File extensions accepted by the document list and drop handlers.
pub const SUPPORTED_EXTENSIONS: [&str; 8] =
    ["png", "jpg", "jpeg", "webp", "bmp", "pbm", "pgm", "ppm"];

pub fn is_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Loads an image file into an RGBA buffer.
pub fn load(path: &Path) -> Result<RgbaImage> {
    if !path.exists() {
        return Err(ImageFileError::NotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(image::open(path)?.to_rgba8())
}

/// Probes image dimensions without decoding pixel data.
pub fn image_dimensions(path: &Path) -> Result<(u32, u32)> {
    Ok(image::image_dimensions(path)?)
}

/// Writes the edited image to `output_path`, carrying metadata over from
/// `source_path` when the source format supports it.
///
/// Metadata loss is acceptable degradation and only logged; pixel loss is
/// not. Missing parent directories are created first.
pub fn save(image: &RgbaImage, output_path: &Path, source_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }

    match format::detect_format(source_path) {
        SourceFormat::Png => save_png_with_metadata(image, output_path, source_path),
        SourceFormat::Jpeg => save_jpeg_with_metadata(image, output_path, source_path),
        SourceFormat::Other => {
            log::warn!(
                "unrecognized source format for {}, saving without metadata",
                source_path.display()
            );
            save_plain(image, output_path)
        }
    }
}

fn save_png_with_metadata(image: &RgbaImage, output_path: &Path, source_path: &Path) -> Result<()> {
    let entries = match metadata::read_png_text(source_path) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!(
                "cannot read PNG metadata from {}: {e}, saving without it",
                source_path.display()
            );
            vec![]
        }
    };

    metadata::write_png_with_text(image, output_path, &entries)
}

fn save_jpeg_with_metadata(
    image: &RgbaImage,
    output_path: &Path,
    source_path: &Path,
) -> Result<()> {
    let exif = match metadata::read_jpeg_exif(source_path) {
        Ok(exif) => exif,
        Err(e) => {
            log::warn!(
                "cannot read EXIF from {}: {e}, saving without it",
                source_path.display()
            );
            None
        }
    };

    // JPEG carries no alpha channel
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut encoded = vec![];
    JpegEncoder::new_with_quality(&mut encoded, JPEG_QUALITY).encode_image(&rgb)?;

    let bytes = match exif {
        Some(exif) => metadata::splice_jpeg_exif(&encoded, &exif),
        None => encoded,
    };
    fs::write(output_path, bytes)?;
    Ok(())
}

fn save_plain(image: &RgbaImage, output_path: &Path) -> Result<()> {
    if let Err(e) = image.save(output_path) {
        // an extension the encoder table does not know; PNG keeps the pixels
        log::warn!(
            "saving {} in its own format failed ({e}), falling back to PNG",
            output_path.display()
        );
        let file = File::create(output_path)?;
        image.write_to(&mut BufWriter::new(file), ImageFormat::Png)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::TextEntry;
    use image::Rgba;

    fn sample_image() -> RgbaImage {
        RgbaImage::from_fn(12, 8, |x, y| {
            Rgba([(x * 20) as u8, (y * 30) as u8, 64, 255])
        })
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("/nonexistent/image.png")).unwrap_err();
        assert!(matches!(err, ImageFileError::NotFound { .. }));
    }

    #[test]
    fn test_load_round_trip() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("img.png");
        sample_image().save(&path)?;

        let loaded = load(&path)?;
        assert_eq!(loaded.as_raw(), sample_image().as_raw());
        assert_eq!(image_dimensions(&path)?, (12, 8));
        Ok(())
    }

    #[test]
    fn test_save_creates_parent_directories() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("src.png");
        sample_image().save(&source)?;

        let output = dir.path().join("nested").join("deep").join("out.png");
        save(&sample_image(), &output, &source)?;
        assert!(output.exists());
        Ok(())
    }

    #[test]
    fn test_png_metadata_is_carried_over() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("src.png");
        metadata::write_png_with_text(
            &sample_image(),
            &source,
            &[TextEntry::new("Software", "mosaicshot")],
        )?;

        let output = dir.path().join("out.png");
        save(&sample_image(), &output, &source)?;

        let entries = metadata::read_png_text(&output)?;
        assert!(
            entries
                .iter()
                .any(|e| e.keyword == "Software" && e.text == "mosaicshot")
        );
        Ok(())
    }

    #[test]
    fn test_jpeg_exif_is_carried_over() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("src.jpg");

        let mut exif = b"Exif\x00\x00".to_vec();
        exif.extend_from_slice(&[0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00]);

        let rgb = DynamicImage::ImageRgba8(sample_image()).to_rgb8();
        let mut encoded = vec![];
        JpegEncoder::new_with_quality(&mut encoded, JPEG_QUALITY).encode_image(&rgb)?;
        fs::write(&source, metadata::splice_jpeg_exif(&encoded, &exif))?;

        let output = dir.path().join("out.jpg");
        save(&sample_image(), &output, &source)?;

        assert_eq!(metadata::read_jpeg_exif(&output)?, Some(exif));
        Ok(())
    }

    #[test]
    fn test_unreadable_source_still_saves_pixels() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("gone.png");
        // source never written

        let output = dir.path().join("out.png");
        save(&sample_image(), &output, &source)?;

        assert_eq!(load(&output)?.as_raw(), sample_image().as_raw());
        Ok(())
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_extension(Path::new("a.PNG")));
        assert!(is_supported_extension(Path::new("a.jpeg")));
        assert!(!is_supported_extension(Path::new("a.txt")));
        assert!(!is_supported_extension(Path::new("a")));
    }
}
