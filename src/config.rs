use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::filter::PostalRange;
use crate::parser::Columns;
use crate::stats::CenterStrategy;

pub const DEFAULT_DATASET_URL: &str =
    "https://www.data.gouv.fr/fr/datasets/r/d7f3ddf4-2225-4ac2-9a1d-26971ce92969";

/// Everything a run needs. Every field has a default, so a JSON file only
/// lists what it changes:
///
/// ```json
/// {
///   "postal_range": { "start": 29000, "end": 29200 },
///   "output_file": "carte.html",
///   "zoom": 12
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub dataset_url: String,
    pub cache_file: PathBuf,
    pub output_file: PathBuf,
    pub postal_range: PostalRange,
    pub zoom: u8,
    pub center: CenterStrategy,
    pub title: String,
    pub template_dir: PathBuf,
    pub popup_template: String,
    pub popup_width: u32,
    pub columns: Columns,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_url: DEFAULT_DATASET_URL.to_string(),
            cache_file: PathBuf::from("geolocalisation.csv"),
            output_file: PathBuf::from("index.html"),
            postal_range: PostalRange::default(),
            zoom: 10,
            center: CenterStrategy::Mean,
            title: "Sites touristiques du Finistère".to_string(),
            template_dir: PathBuf::from("templates"),
            popup_template: "display_row.html".to_string(),
            popup_width: 800,
            columns: Columns::default(),
        }
    }
}

impl Config {
    /// Loads a JSON config file, filling unset fields with defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.postal_range.is_empty() {
            bail!("postal range {} contains no code", self.postal_range);
        }
        if self.zoom > 18 {
            bail!("zoom {} is outside 0..=18", self.zoom);
        }
        if self.popup_width == 0 {
            bail!("popup_width must be positive");
        }
        Ok(())
    }
}
