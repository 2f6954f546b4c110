//! Collision-avoiding output naming for mosaic results.
//!
//! The resolver never returns a path whose existing content has dimensions
//! different from the source image: such a file is unrelated user data. A
//! previous run's output of the same source (same dimensions) may be reused.

use crate::{ImageFileError, Result};
use std::{
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

/// Hard cap on probed candidate names per save.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Attempts for one dimension probe before giving up on a candidate.
const PROBE_ATTEMPTS: u32 = 3;

const PROBE_RETRY_DELAY: Duration = Duration::from_millis(50);

/// Derives the output path for the mosaic result of `source`.
///
/// With `into_mosaic_dir` (directory-drop flow) the destination directory is
/// the source's parent with a `_mosaic` suffix; the directory itself is
/// created later by the save step.
pub fn mosaic_output_path(source: &Path, into_mosaic_dir: bool) -> Result<PathBuf> {
    // (0, 0) when the source vanished between selection and save
    let source_size = match image::image_dimensions(source) {
        Ok(size) => size,
        Err(e) => {
            log::warn!("cannot measure source {}: {e}", source.display());
            (0, 0)
        }
    };

    let base = if into_mosaic_dir {
        let file_name = source.file_name().unwrap_or_default();
        match source.parent() {
            Some(parent) if parent.file_name().is_some() => {
                let mut dir_name = parent.file_name().unwrap_or_default().to_os_string();
                dir_name.push("_mosaic");
                parent.with_file_name(dir_name).join(file_name)
            }
            _ => source.to_path_buf(),
        }
    } else {
        source.to_path_buf()
    };

    resolve_collision(&base, source_size)
}

/// Probes `base`-derived candidate names until one is available or proven to
/// be our own prior output.
pub fn resolve_collision(base: &Path, source_size: (u32, u32)) -> Result<PathBuf> {
    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let extension = base.extension().and_then(|e| e.to_str());

    for i in 0..MAX_NAME_ATTEMPTS {
        let candidate_name = match extension {
            Some(ext) => format!("{stem}_mosaic_{i}.{ext}"),
            None => format!("{stem}_mosaic_{i}"),
        };
        let candidate = base.with_file_name(candidate_name);

        if !candidate.exists() {
            return Ok(candidate);
        }

        if source_size == (0, 0) {
            // cannot distinguish collision from reuse, proceed optimistically
            return Ok(candidate);
        }

        match probe_dimensions(&candidate) {
            // same dimensions: a prior mosaic output of this source
            Some(size) if size == source_size => return Ok(candidate),
            Some(size) => {
                log::debug!(
                    "{} is {}x{}, source is {}x{}: unrelated file, skipping",
                    candidate.display(),
                    size.0,
                    size.1,
                    source_size.0,
                    source_size.1
                );
            }
            // unprovable content is treated as foreign
            None => {}
        }
    }

    Err(ImageFileError::OutputNamesExhausted {
        path: base.to_path_buf(),
        attempts: MAX_NAME_ATTEMPTS,
    })
}

/// Reads image dimensions, retrying briefly on transient failures.
fn probe_dimensions(path: &Path) -> Option<(u32, u32)> {
    for attempt in 1..=PROBE_ATTEMPTS {
        match image::image_dimensions(path) {
            Ok(size) => return Some(size),
            Err(e) => {
                log::warn!(
                    "probing {} failed (attempt {attempt}/{PROBE_ATTEMPTS}): {e}",
                    path.display()
                );
                if attempt < PROBE_ATTEMPTS {
                    thread::sleep(PROBE_RETRY_DELAY);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn write_image(path: &Path, width: u32, height: u32) {
        RgbaImage::new(width, height).save(path).unwrap();
    }

    #[test]
    fn test_first_candidate_when_free() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("foo.png");
        write_image(&source, 20, 10);

        let output = mosaic_output_path(&source, false)?;
        assert_eq!(output, dir.path().join("foo_mosaic_0.png"));
        Ok(())
    }

    #[test]
    fn test_foreign_collision_is_skipped() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("foo.png");
        write_image(&source, 20, 10);

        // unrelated file with different dimensions at the first candidate
        write_image(&dir.path().join("foo_mosaic_0.png"), 5, 5);

        let output = mosaic_output_path(&source, false)?;
        assert_eq!(output, dir.path().join("foo_mosaic_1.png"));
        Ok(())
    }

    #[test]
    fn test_own_output_is_reused() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("foo.png");
        write_image(&source, 20, 10);

        // a prior run's output: same dimensions as the source
        write_image(&dir.path().join("foo_mosaic_0.png"), 20, 10);

        let output = mosaic_output_path(&source, false)?;
        assert_eq!(output, dir.path().join("foo_mosaic_0.png"));
        Ok(())
    }

    #[test]
    fn test_unmeasurable_source_proceeds_optimistically() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("foo.png");
        // source never written: deleted between selection and save

        write_image(&dir.path().join("foo_mosaic_0.png"), 5, 5);

        let output = mosaic_output_path(&source, false)?;
        assert_eq!(output, dir.path().join("foo_mosaic_0.png"));
        Ok(())
    }

    #[test]
    fn test_mosaic_dir_flow() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let drop_dir = dir.path().join("holiday");
        std::fs::create_dir(&drop_dir)?;
        let source = drop_dir.join("a.png");
        write_image(&source, 20, 10);

        let output = mosaic_output_path(&source, true)?;
        assert_eq!(
            output,
            dir.path().join("holiday_mosaic").join("a_mosaic_0.png")
        );
        Ok(())
    }

    #[test]
    fn test_unprobeable_collision_is_never_returned() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("foo.png");
        write_image(&source, 20, 10);

        // existing file that is not an image at all
        std::fs::write(dir.path().join("foo_mosaic_0.png"), b"garbage")?;

        let output = mosaic_output_path(&source, false)?;
        assert_eq!(output, dir.path().join("foo_mosaic_1.png"));
        Ok(())
    }
}
