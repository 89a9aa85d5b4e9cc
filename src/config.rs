//! Configuration for a level generation run.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ascii::RenderStyle;
use crate::error::LevelError;
use crate::excavation::{ExcavationParams, LevelPreset};

/// Everything a driver needs to generate and print one level.
///
/// Explicit dimensions, budget and padding override the preset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Base parameter set (default: classic).
    pub preset: LevelPreset,

    pub width: Option<usize>,
    pub height: Option<usize>,
    pub removal_budget: Option<usize>,
    pub padding: Option<usize>,

    /// Number of caves to generate before picking the best (default: 100).
    pub candidates: usize,

    /// Master seed; random when unset.
    pub seed: Option<u64>,

    /// Generate candidates on the rayon thread pool.
    pub parallel: bool,

    /// Glyphs used when printing the level.
    pub style: RenderStyle,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            preset: LevelPreset::Classic,
            width: None,
            height: None,
            removal_budget: None,
            padding: None,
            candidates: 100,
            seed: None,
            parallel: false,
            style: RenderStyle::Classic,
        }
    }
}

impl LevelConfig {
    /// Parse a JSON configuration.
    pub fn from_json(text: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Preset parameters with any explicit overrides applied.
    pub fn excavation_params(&self) -> ExcavationParams {
        let base = ExcavationParams::from_preset(self.preset);
        ExcavationParams {
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
            removal_budget: self.removal_budget.unwrap_or(base.removal_budget),
            padding: self.padding.unwrap_or(base.padding),
        }
    }
}
