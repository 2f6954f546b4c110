//! Status payload for the (excluded) UI's status bar and property window.

use anyhow::{Context, Result};
use cutil::{fs as size, number, time};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Immutable snapshot of the displayed file's facts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileInfo {
    pub file_path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// 1-based position in the document list.
    pub current: usize,
    pub total: usize,
    /// File size in bytes.
    pub file_size: u64,
    /// Last modification time, ISO 8601 local time.
    pub mtime: String,
}

impl FileInfo {
    /// Gathers the snapshot for `path` at position `current` of `total`.
    pub fn gather(path: &Path, current: usize, total: usize) -> Result<Self> {
        let (width, height) = image_file::image_dimensions(path)
            .with_context(|| format!("measuring {}", path.display()))?;
        let meta = fs::metadata(path).with_context(|| format!("stat {}", path.display()))?;
        let mtime = time::format_system_time(meta.modified()?, "%Y-%m-%dT%H:%M:%S");

        Ok(Self {
            file_path: path.to_path_buf(),
            width,
            height,
            current,
            total,
            file_size: meta.len(),
            mtime,
        })
    }

    /// File size in KB, rounded up to two decimals for display.
    pub fn file_size_kb(&self) -> f64 {
        number::round_up_decimal(size::bytes_to_kb(self.file_size), 2)
    }

    /// Human-readable size line, e.g. `12,345 bytes (12.06 KB)`.
    pub fn pretty_size(&self) -> String {
        format!(
            "{} bytes ({})",
            number::format_number_with_commas(&self.file_size.to_string()),
            size::pretty_bytes_size(self.file_size)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("a.png");
        image::RgbaImage::new(20, 10).save(&path)?;

        let info = FileInfo::gather(&path, 1, 3)?;
        assert_eq!((info.width, info.height), (20, 10));
        assert_eq!((info.current, info.total), (1, 3));
        assert!(info.file_size > 0);
        // ISO 8601 shape: YYYY-MM-DDTHH:MM:SS
        assert_eq!(info.mtime.len(), 19);
        assert_eq!(&info.mtime[10..11], "T");
        Ok(())
    }

    #[test]
    fn test_gather_missing_file() {
        assert!(FileInfo::gather(Path::new("/nonexistent/a.png"), 1, 1).is_err());
    }

    #[test]
    fn test_size_display() {
        let info = FileInfo {
            file_size: 1234567,
            ..FileInfo::default()
        };

        // 1234567 / 1024 = 1205.631..., rounded up at 2 decimals
        assert_eq!(info.file_size_kb(), 1205.64);
        assert_eq!(info.pretty_size(), "1,234,567 bytes (1.18 MB)");
    }
}
