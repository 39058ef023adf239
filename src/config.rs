//! Converter configuration, loadable from a JSON file.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    converters::iwb::constants::{DEFAULT_GRID_LINE_WIDTH, DEFAULT_GRID_SPACING},
    errors::Result,
};

/// How the grid of a crossed background is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GridMode {
    /// Grid lines are emitted as SVG `line` elements over the background image.
    #[default]
    Vector,
    /// Grid lines are painted into the background raster.
    Raster,
}

/// Options controlling a conversion. Every field has a default, so a JSON
/// file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConverterOptions {
    /// Use sequential ids (`id-0001`, ...) instead of random UUIDs.
    pub deterministic_ids: bool,
    /// Prefix of sequential ids.
    pub id_prefix: String,
    pub grid_mode: GridMode,
    /// Distance between grid lines, in document units.
    pub grid_spacing: u32,
    pub grid_line_width: u32,
    /// Drop elements referencing unsupported media instead of failing.
    pub tolerate_unsupported_content: bool,
    /// Indentation width of the generated `content.xml`.
    pub indent: usize,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        ConverterOptions {
            deterministic_ids: false,
            id_prefix: "id-".to_string(),
            grid_mode: GridMode::default(),
            grid_spacing: DEFAULT_GRID_SPACING,
            grid_line_width: DEFAULT_GRID_LINE_WIDTH,
            tolerate_unsupported_content: false,
            indent: 2,
        }
    }
}

impl ConverterOptions {
    /// Reads options from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
