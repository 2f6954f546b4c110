//! The ordered list of images the user is working through.

use image_file::is_supported_extension;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Edit state of the currently displayed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataState {
    #[default]
    Unchanged,
    Modified,
}

/// Ordered collection of image paths with a current position.
///
/// Navigation clamps at both ends instead of wrapping; the (excluded) UI
/// disables its buttons accordingly.
#[derive(Debug, Clone, Default)]
pub struct Document {
    file_paths: Vec<PathBuf>,
    current: usize,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file when it exists and carries a supported extension.
    /// Returns the number of entries added (0 or 1).
    pub fn add_file(&mut self, path: &Path) -> usize {
        if path.is_file() && is_supported_extension(path) {
            self.file_paths.push(path.to_path_buf());
            1
        } else {
            0
        }
    }

    /// Adds all supported images directly inside `dir`, sorted by name.
    /// Returns the number of entries added.
    pub fn add_directory(&mut self, dir: &Path) -> usize {
        let mut found: Vec<PathBuf> = WalkDir::new(dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| is_supported_extension(path))
            .collect();
        found.sort();

        let count = found.len();
        self.file_paths.extend(found);
        count
    }

    pub fn count(&self) -> usize {
        self.file_paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_paths.is_empty()
    }

    pub fn clear(&mut self) {
        self.file_paths.clear();
        self.current = 0;
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn set_current(&mut self, index: usize) -> anyhow::Result<()> {
        if index >= self.file_paths.len() {
            anyhow::bail!("current index out of range: {index}");
        }
        self.current = index;
        Ok(())
    }

    /// Moves to the next file; stays put on the last one.
    pub fn next(&mut self) {
        if self.current + 1 < self.file_paths.len() {
            self.current += 1;
        }
    }

    /// Moves to the previous file; stays put on the first one.
    pub fn previous(&mut self) {
        if self.current > 0 {
            self.current -= 1;
        }
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.file_paths.get(self.current).map(PathBuf::as_path)
    }

    pub fn file_paths(&self) -> &[PathBuf] {
        &self.file_paths
    }
}
