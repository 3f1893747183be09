use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::{cost::CostModel, funding::FundingModel, history::DEFAULT_HISTORY_LIMIT};

pub const CONFIG_FILE_NAME: &str = "vmassess.toml";
pub const DEFAULT_HISTORY_PATH: &str = "vmassess-history.json";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub history_path: Option<PathBuf>,
    pub history_limit: Option<usize>,
    /// Worksheet to read from spreadsheet inventories.
    pub sheet: Option<String>,
    pub pricing: CostModel,
    pub funding: FundingModel,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let config: Config =
            toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
        Ok(config)
    }

    pub fn discover() -> Option<Self> {
        let path = Path::new(CONFIG_FILE_NAME);
        if path.exists() {
            Config::load(path).ok()
        } else {
            None
        }
    }

    pub fn history_path(&self) -> PathBuf {
        self.history_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_PATH))
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT)
    }
}
