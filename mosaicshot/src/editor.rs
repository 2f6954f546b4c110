//! The seam between pointer selections and the effect engine.
//!
//! [`Editor`] holds the preset registry and the active preset;
//! [`EditSession`] owns one open document's image buffer. The UI layer
//! translates drag coordinates into image pixel space and calls
//! [`Editor::apply_mosaic`]; the edited buffer is auto-saved next to the
//! original on a background worker.

use crate::{config::Config, document::DataState};
use anyhow::{Context, Result};
use crossbeam::channel::{Receiver, bounded};
use image::RgbaImage;
use image_effect::{CellSize, Effect, EffectPresets, MosaicConfig, MosaicPreset, Region};
use std::{
    path::{Path, PathBuf},
    thread,
};

/// Direction for cycling through the mosaic presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    Forward,
    Back,
}

/// Completion handle of one background save.
///
/// The worker writes a snapshot of the edited buffer; the outcome arrives
/// on a bounded channel and [`SaveTask::wait`] joins the worker.
pub struct SaveTask {
    output_path: PathBuf,
    handle: thread::JoinHandle<()>,
    done: Receiver<image_file::Result<()>>,
}

impl SaveTask {
    fn spawn(image: RgbaImage, output_path: PathBuf, source_path: PathBuf) -> Self {
        let (sender, done) = bounded(1);
        let path = output_path.clone();
        let handle = thread::spawn(move || {
            let result = image_file::save(&image, &path, &source_path);
            if let Err(ref e) = result {
                log::warn!("background save of {} failed: {e}", path.display());
            }
            _ = sender.send(result);
        });

        Self {
            output_path,
            handle,
            done,
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Blocks until the save finishes and returns the written path.
    pub fn wait(self) -> Result<PathBuf> {
        let result = self
            .done
            .recv()
            .context("save worker exited without signaling")?;
        _ = self.handle.join();
        result.with_context(|| format!("saving {}", self.output_path.display()))?;
        Ok(self.output_path)
    }
}

/// One open document being edited.
///
/// Owns the image buffer for the duration of the session; the mosaic effect
/// mutates it in place. Callers needing the pre-edit state must snapshot
/// before applying.
pub struct EditSession {
    source_path: PathBuf,
    image: RgbaImage,
    data_state: DataState,
    pending_save: Option<SaveTask>,
}

impl EditSession {
    /// Opens an image file for editing.
    pub fn open(path: &Path) -> Result<Self> {
        let image =
            image_file::load(path).with_context(|| format!("opening {}", path.display()))?;
        Ok(Self::from_image(image, path))
    }

    /// Wraps an already-decoded buffer (e.g. the UI's displayed copy).
    pub fn from_image(image: RgbaImage, source_path: &Path) -> Self {
        Self {
            source_path: source_path.to_path_buf(),
            image,
            data_state: DataState::Unchanged,
            pending_save: None,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn data_state(&self) -> DataState {
        self.data_state
    }

    pub fn is_modified(&self) -> bool {
        self.data_state == DataState::Modified
    }

    /// Waits out the pending background save, if any, returning the path it
    /// wrote to.
    pub fn wait_pending_save(&mut self) -> Result<Option<PathBuf>> {
        match self.pending_save.take() {
            Some(task) => Ok(Some(task.wait()?)),
            None => Ok(None),
        }
    }

    /// Closes the session. Blocks until a pending save has flushed; that is
    /// the documented close policy, applied consistently.
    pub fn close(mut self) -> Result<()> {
        self.wait_pending_save()?;
        Ok(())
    }
}

impl Drop for EditSession {
    fn drop(&mut self) {
        // backstop for sessions dropped without close()
        if let Some(task) = self.pending_save.take()
            && let Err(e) = task.wait()
        {
            log::warn!("pending save failed while closing: {e}");
        }
    }
}

/// Selects the active mosaic preset and routes selections to the effect.
pub struct Editor {
    presets: EffectPresets,
    current: String,
    directory_mode: bool,
}

impl Editor {
    pub fn new(config: &Config) -> Self {
        let presets = EffectPresets::new(
            &config.mosaic.cell_size_candidates(),
            config.mosaic.default_cell_size(),
        );
        let current = presets.default_name().to_string();
        log::debug!("presets loaded, starting with {current}");

        Self {
            presets,
            current,
            directory_mode: false,
        }
    }

    pub fn presets(&self) -> &EffectPresets {
        &self.presets
    }

    /// The active preset.
    pub fn current_effect(&self) -> &MosaicPreset {
        self.presets
            .get(&self.current)
            .expect("current preset is always registered")
    }

    pub fn current_effect_name(&self) -> &str {
        &self.current
    }

    /// Directory-drop mode: save results into a sibling `<dir>_mosaic`
    /// directory instead of next to each file.
    pub fn set_directory_mode(&mut self, enabled: bool) {
        self.directory_mode = enabled;
    }

    /// Switches to the neighboring preset, wrapping at the ends.
    pub fn cycle_effect(&mut self, direction: CycleDirection) {
        let entry = match direction {
            CycleDirection::Forward => self.presets.next(&self.current),
            CycleDirection::Back => self.presets.previous(&self.current),
        };

        match entry {
            Some((name, _)) => self.current = name.to_string(),
            None => log::warn!("preset {} not in the registry, keeping it", self.current),
        }
    }

    /// Applies the active mosaic preset to the dragged selection and
    /// schedules the auto-save.
    ///
    /// The two positions may come in any drag direction. Returns `Ok(false)`
    /// for a degenerate selection — a click without a drag — with no save
    /// and no error.
    pub fn apply_mosaic(
        &self,
        session: &mut EditSession,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
    ) -> Result<bool> {
        // one in-flight save per document; a new edit waits the old one out
        if let Some(path) = session.wait_pending_save()? {
            log::debug!("previous save to {} flushed", path.display());
        }

        let region = Region::from_points(x1, y1, x2, y2);
        let effect = self.resolve_effect(&session.image);
        let applied = effect
            .apply(&mut session.image, region)
            .context("applying mosaic")?;
        if !applied {
            return Ok(false);
        }

        session.data_state = DataState::Modified;

        let output_path =
            image_file::mosaic_output_path(&session.source_path, self.directory_mode)
                .context("resolving output name")?;
        log::info!("mosaic applied, saving to {}", output_path.display());
        session.pending_save = Some(SaveTask::spawn(
            session.image.clone(),
            output_path,
            session.source_path.clone(),
        ));

        Ok(true)
    }

    /// Materializes the active preset, computing the auto cell size fresh
    /// for the given image.
    fn resolve_effect(&self, image: &RgbaImage) -> MosaicConfig {
        match self.current_effect().cell_size {
            CellSize::Fixed(size) => MosaicConfig::new().with_cell_size(size),
            CellSize::Auto => {
                let size = MosaicConfig::calc_cell_size(image);
                log::debug!("auto cell size for {}x{}: {size}", image.width(), image.height());
                MosaicConfig::new().with_cell_size(size)
            }
        }
    }
}
