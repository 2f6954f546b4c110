//! Source metadata carry-over: PNG textual chunks and the JPEG EXIF segment.

use crate::Result;
use image::RgbaImage;
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

/// Identifier prefix of an EXIF APP1 payload.
const EXIF_IDENTIFIER: &[u8] = b"Exif\x00\x00";

/// A textual metadata entry carried from the source image to the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEntry {
    pub keyword: String,
    pub text: String,
}

impl TextEntry {
    pub fn new(keyword: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            text: text.into(),
        }
    }
}

/// Reads all textual metadata from a PNG file.
///
/// tEXt, zTXt and iTXt chunks are collected as they are; numeric source
/// fields (gamma, pixel density) are coerced to their string representation
/// because the output metadata container only accepts text.
pub fn read_png_text(path: &Path) -> Result<Vec<TextEntry>> {
    let decoder = png::Decoder::new(BufReader::new(File::open(path)?));
    let mut reader = decoder.read_info()?;
    // text chunks may trail the image data
    reader.finish()?;
    let info = reader.info();

    let mut entries = vec![];
    for chunk in &info.uncompressed_latin1_text {
        entries.push(TextEntry::new(chunk.keyword.clone(), chunk.text.clone()));
    }
    for chunk in &info.compressed_latin1_text {
        match chunk.get_text() {
            Ok(text) => entries.push(TextEntry::new(chunk.keyword.clone(), text)),
            Err(e) => log::warn!("skipping zTXt chunk {}: {e}", chunk.keyword),
        }
    }
    for chunk in &info.utf8_text {
        match chunk.get_text() {
            Ok(text) => entries.push(TextEntry::new(chunk.keyword.clone(), text)),
            Err(e) => log::warn!("skipping iTXt chunk {}: {e}", chunk.keyword),
        }
    }

    if let Some(gamma) = info.source_gamma {
        entries.push(TextEntry::new("gamma", format!("{}", gamma.into_value())));
    }
    if let Some(dims) = info.pixel_dims {
        match dims.unit {
            png::Unit::Meter => {
                // pixels per meter to the conventional dots per inch
                let x = (dims.xppu as f64 * 0.0254).round() as u32;
                let y = (dims.yppu as f64 * 0.0254).round() as u32;
                entries.push(TextEntry::new("dpi", format!("{x}, {y}")));
            }
            png::Unit::Unspecified => {
                entries.push(TextEntry::new(
                    "aspect",
                    format!("{}, {}", dims.xppu, dims.yppu),
                ));
            }
        }
    }

    Ok(entries)
}

/// Writes `image` as a PNG carrying the given textual metadata.
pub fn write_png_with_text(image: &RgbaImage, path: &Path, entries: &[TextEntry]) -> Result<()> {
    let file = File::create(path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    for entry in entries {
        encoder.add_itxt_chunk(entry.keyword.clone(), entry.text.clone())?;
    }

    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())?;
    Ok(())
}

/// Extracts the EXIF APP1 payload from a JPEG file, if one is present.
pub fn read_jpeg_exif(path: &Path) -> Result<Option<Vec<u8>>> {
    let data = std::fs::read(path)?;
    Ok(extract_exif(&data))
}

/// Walks the JPEG segment stream up to the scan data looking for an EXIF
/// APP1 segment. Returns its payload including the `Exif\0\0` identifier.
fn extract_exif(data: &[u8]) -> Option<Vec<u8>> {
    if data.len() < 4 || data[..2] != [0xFF, 0xD8] {
        return None;
    }

    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            // corrupt segment stream
            return None;
        }
        let marker = data[pos + 1];
        if marker == 0xDA || marker == 0xD9 {
            // entropy-coded data or end of image: no EXIF ahead
            return None;
        }

        let length = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        if length < 2 || pos + 2 + length > data.len() {
            return None;
        }

        let payload = &data[pos + 4..pos + 2 + length];
        if marker == 0xE1 && payload.starts_with(EXIF_IDENTIFIER) {
            return Some(payload.to_vec());
        }

        pos += 2 + length;
    }

    None
}

/// Splices an EXIF payload into an encoded JPEG as an APP1 segment directly
/// after the start-of-image marker. The payload is carried verbatim.
pub fn splice_jpeg_exif(jpeg: &[u8], exif: &[u8]) -> Vec<u8> {
    if jpeg.len() < 2 || jpeg[..2] != [0xFF, 0xD8] {
        log::warn!("not a JPEG stream, EXIF not attached");
        return jpeg.to_vec();
    }
    // segment length field counts itself
    let length = exif.len() + 2;
    if length > u16::MAX as usize {
        log::warn!("EXIF payload of {} bytes does not fit a segment", exif.len());
        return jpeg.to_vec();
    }

    let mut out = Vec::with_capacity(jpeg.len() + exif.len() + 4);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&(length as u16).to_be_bytes());
    out.extend_from_slice(exif);
    out.extend_from_slice(&jpeg[2..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::jpeg::JpegEncoder;

    fn sample_exif() -> Vec<u8> {
        let mut exif = EXIF_IDENTIFIER.to_vec();
        exif.extend_from_slice(&[0x4D, 0x4D, 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00]);
        exif
    }

    fn encoded_jpeg() -> Vec<u8> {
        let image = image::RgbImage::from_fn(16, 16, |x, y| {
            image::Rgb([(x * 16) as u8, (y * 16) as u8, 128])
        });
        let mut data = vec![];
        JpegEncoder::new_with_quality(&mut data, 90)
            .encode_image(&image)
            .unwrap();
        data
    }

    #[test]
    fn test_png_text_round_trip() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("meta.png");

        let entries = vec![
            TextEntry::new("Author", "nobody"),
            TextEntry::new("Comment", "holiday photo"),
        ];
        write_png_with_text(&RgbaImage::new(8, 8), &path, &entries)?;

        let read_back = read_png_text(&path)?;
        assert_eq!(read_back, entries);
        Ok(())
    }

    #[test]
    fn test_exif_splice_round_trip() {
        let exif = sample_exif();
        let jpeg = encoded_jpeg();
        assert_eq!(extract_exif(&jpeg), None);

        let with_exif = splice_jpeg_exif(&jpeg, &exif);
        assert_eq!(extract_exif(&with_exif), Some(exif));
    }

    #[test]
    fn test_spliced_jpeg_still_decodes() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("spliced.jpg");

        std::fs::write(&path, splice_jpeg_exif(&encoded_jpeg(), &sample_exif()))?;

        let decoded = image::open(&path)?;
        assert_eq!((decoded.width(), decoded.height()), (16, 16));
        Ok(())
    }

    #[test]
    fn test_oversized_exif_is_dropped() {
        let jpeg = encoded_jpeg();
        let huge = vec![0u8; u16::MAX as usize];
        assert_eq!(splice_jpeg_exif(&jpeg, &huge), jpeg);
    }

    #[test]
    fn test_extract_exif_rejects_non_jpeg() {
        assert_eq!(extract_exif(b"not a jpeg"), None);
        assert_eq!(extract_exif(&[0xFF, 0xD8]), None);
    }
}
