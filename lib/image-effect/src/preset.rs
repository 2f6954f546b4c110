use crate::mosaic_effect::{CellSize, MIN_CELL_SIZE};
use indexmap::IndexMap;

/// Built-in candidate set used when configuration yields no usable presets.
const FALLBACK_CELL_SIZES: [CellSize; 5] = [
    CellSize::Auto,
    CellSize::Fixed(8),
    CellSize::Fixed(16),
    CellSize::Fixed(24),
    CellSize::Fixed(32),
];

/// A named, user-selectable mosaic strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicPreset {
    pub cell_size: CellSize,
}

impl MosaicPreset {
    /// The derived registry key: `mosaic_auto` or `mosaic_<size>`.
    pub fn name(&self) -> String {
        match self.cell_size {
            CellSize::Auto => "mosaic_auto".to_string(),
            CellSize::Fixed(size) => format!("mosaic_{size}"),
        }
    }
}

/// Insertion-ordered registry of mosaic presets with cyclic navigation.
///
/// Never empty after construction: an empty candidate list is replaced by a
/// built-in fallback set.
#[derive(Debug, Clone)]
pub struct EffectPresets {
    presets: IndexMap<String, MosaicPreset>,
    default_name: String,
}

impl EffectPresets {
    /// Builds the registry from candidate cell sizes and a nominated default.
    ///
    /// Fixed candidates below [`MIN_CELL_SIZE`] are skipped; duplicates
    /// collapse onto one entry. When the nominated default is not among the
    /// built presets, the middle entry of the list is used instead.
    pub fn new(cell_sizes: &[CellSize], default: CellSize) -> Self {
        let mut presets = IndexMap::new();
        for &cell_size in cell_sizes {
            if let CellSize::Fixed(size) = cell_size
                && size < MIN_CELL_SIZE
            {
                log::warn!(
                    "ignoring preset cell size {size}: below the minimum of {MIN_CELL_SIZE}"
                );
                continue;
            }

            let preset = MosaicPreset { cell_size };
            presets.insert(preset.name(), preset);
        }

        if presets.is_empty() {
            log::warn!("no usable mosaic presets configured, using the built-in set");
            for cell_size in FALLBACK_CELL_SIZES {
                let preset = MosaicPreset { cell_size };
                presets.insert(preset.name(), preset);
            }
        }

        let nominated = MosaicPreset { cell_size: default }.name();
        let default_name = if presets.contains_key(&nominated) {
            nominated
        } else {
            // middle of the list, clamped so tiny registries stay in range
            let index = (presets.len() / 2).saturating_sub(1);
            let (name, _) = presets.get_index(index).expect("registry is never empty");
            log::warn!("default preset {nominated} not configured, using {name}");
            name.clone()
        };

        Self {
            presets,
            default_name,
        }
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&MosaicPreset> {
        self.presets.get(name)
    }

    /// The entry following `current` in insertion order, wrapping past the
    /// end. `None` when `current` is not in the registry.
    pub fn next(&self, current: &str) -> Option<(&str, &MosaicPreset)> {
        let index = self.presets.get_index_of(current)?;
        let next = (index + 1) % self.presets.len();
        self.presets
            .get_index(next)
            .map(|(name, preset)| (name.as_str(), preset))
    }

    /// The entry preceding `current` in insertion order, wrapping before the
    /// beginning. `None` when `current` is not in the registry.
    pub fn previous(&self, current: &str) -> Option<(&str, &MosaicPreset)> {
        let index = self.presets.get_index_of(current)?;
        let previous = (index + self.presets.len() - 1) % self.presets.len();
        self.presets
            .get_index(previous)
            .map(|(name, preset)| (name.as_str(), preset))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MosaicPreset)> {
        self.presets
            .iter()
            .map(|(name, preset)| (name.as_str(), preset))
    }
}
