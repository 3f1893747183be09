use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    cost::CostSummary,
    funding::FundingSummary,
    report::{AnalysisResult, Summary},
};

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// A past run without its per-VM detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Run timestamp in epoch milliseconds.
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub summary: Summary,
    pub costs: CostSummary,
    pub funding: FundingSummary,
}

impl HistoryEntry {
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            id: result.timestamp.timestamp_millis(),
            timestamp: result.timestamp,
            summary: result.summary.clone(),
            costs: result.costs,
            funding: result.funding,
        }
    }
}

/// Newest-first list of past runs, capped at `limit` entries (at least one).
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    entries: Vec<HistoryEntry>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn from_json(bytes: &[u8], limit: usize) -> anyhow::Result<Self> {
        let mut entries: Vec<HistoryEntry> =
            serde_json::from_slice(bytes).context("parse history json")?;
        let limit = limit.max(1);
        entries.truncate(limit);
        Ok(Self { entries, limit })
    }

    /// A missing file is an empty history.
    pub fn load(path: &Path, limit: usize) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::new(limit));
        }
        let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_json(&bytes, limit).with_context(|| format!("load history {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
        let json = serde_json::to_vec_pretty(&self.entries).context("serialize history json")?;
        std::fs::write(path, json).with_context(|| format!("write {}", path.display()))
    }

    /// Puts the run at the front and evicts the oldest past the limit.
    pub fn record(&mut self, result: &AnalysisResult) -> &HistoryEntry {
        self.entries.insert(0, HistoryEntry::from_result(result));
        self.entries.truncate(self.limit);
        tracing::debug!(entries = self.entries.len(), limit = self.limit, "recorded assessment");
        &self.entries[0]
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_from_empty_json_array() {
        let h = History::from_json(b"[]", DEFAULT_HISTORY_LIMIT).unwrap();
        assert!(h.is_empty());
    }

    #[test]
    fn invalid_json_is_an_error() {
        let h = History::from_json(b"not json", 3);
        assert!(h.is_err());
    }
}
