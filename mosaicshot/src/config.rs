//! Application configuration.
//!
//! Loaded once at startup from a JSON file and passed to constructors; a
//! missing file or malformed content degrades to the documented defaults
//! instead of failing startup.

use anyhow::{Context, Result};
use derivative::Derivative;
use image_effect::CellSize;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct Config {
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub mosaic: Mosaic,
}

/// One cell size entry in the configuration: a fixed pixel count, or the
/// keyword `"auto"` for dimension-derived sizing. Nothing numeric is
/// overloaded to mean auto.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum CellSizeEntry {
    Size(u32),
    Keyword(String),
}

impl CellSizeEntry {
    /// Interprets the entry; `None` for anything that is neither a positive
    /// size nor `"auto"`.
    pub fn to_cell_size(&self) -> Option<CellSize> {
        match self {
            CellSizeEntry::Size(size) if *size > 0 => Some(CellSize::Fixed(*size)),
            CellSizeEntry::Size(_) => None,
            CellSizeEntry::Keyword(word) if word == "auto" => Some(CellSize::Auto),
            CellSizeEntry::Keyword(_) => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
pub struct Mosaic {
    #[derivative(Default(value = "cell_sizes_default()"))]
    #[serde(default = "cell_sizes_default")]
    pub cell_sizes: Vec<CellSizeEntry>,

    #[serde(default)]
    pub default: DefaultEffect,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
pub struct DefaultEffect {
    #[derivative(Default(value = "default_cell_size()"))]
    #[serde(default = "default_cell_size")]
    pub cell_size: CellSizeEntry,
}

fn cell_sizes_default() -> Vec<CellSizeEntry> {
    vec![
        CellSizeEntry::Keyword("auto".to_string()),
        CellSizeEntry::Size(8),
        CellSizeEntry::Size(16),
        CellSizeEntry::Size(24),
        CellSizeEntry::Size(32),
    ]
}

fn default_cell_size() -> CellSizeEntry {
    CellSizeEntry::Size(16)
}

impl Mosaic {
    /// Candidate cell sizes with invalid entries skipped.
    pub fn cell_size_candidates(&self) -> Vec<CellSize> {
        self.cell_sizes
            .iter()
            .filter_map(|entry| {
                let cell_size = entry.to_cell_size();
                if cell_size.is_none() {
                    log::warn!("ignoring invalid mosaic cell size entry {entry:?}");
                }
                cell_size
            })
            .collect()
    }

    /// The nominated default cell size.
    pub fn default_cell_size(&self) -> CellSize {
        self.default.cell_size.to_cell_size().unwrap_or_else(|| {
            log::warn!(
                "invalid default cell size entry {:?}, using the built-in default",
                self.default.cell_size
            );
            CellSize::Fixed(16)
        })
    }
}

impl Config {
    /// Loads the configuration from a JSON file.
    pub fn load(config_path: &Path) -> Self {
        let mut config = match fs::read_to_string(config_path) {
            Ok(text) => match serde_json::from_str::<Config>(&text) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!(
                        "malformed config {}: {e}, using defaults",
                        config_path.display()
                    );
                    Config::default()
                }
            },
            Err(e) => {
                log::info!(
                    "no config at {} ({e}), using defaults",
                    config_path.display()
                );
                Config::default()
            }
        };

        config.config_path = config_path.to_path_buf();
        config
    }

    /// Writes the configuration back to its JSON file.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let text = serde_json::to_string_pretty(self)?;
        fs::write(&self.config_path, text)
            .with_context(|| format!("writing {}", self.config_path.display()))?;
        Ok(())
    }
}
