pub mod config;
pub mod cost;
pub mod error;
pub mod funding;
pub mod history;
pub mod input;
pub mod os;
pub mod report;
pub mod rules;
pub mod sample;
pub mod types;

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};

use crate::{
    config::Config,
    cost::{estimate_costs, CostModel},
    funding::{estimate_funding, FundingModel},
    input::Row,
    report::{AnalysisResult, Summary},
    rules::classify,
    types::{ClassifiedVm, InventoryRecord},
};

#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    pub pricing: CostModel,
    pub funding: FundingModel,
    /// Worksheet for spreadsheet input; the first sheet when unset.
    pub sheet: Option<String>,
    /// Pins the result timestamp; the current time when unset.
    pub now: Option<DateTime<Utc>>,
}

impl AnalyzeOptions {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            pricing: cfg.pricing,
            funding: cfg.funding,
            sheet: cfg.sheet.clone(),
            now: None,
        }
    }
}

/// Normalizes the OS, snapshots its lifecycle data and assigns a strategy.
pub fn classify_record(record: InventoryRecord) -> ClassifiedVm {
    let normalized_os = os::normalize(&record.os);
    let lifecycle = os::lookup(normalized_os);
    let decision = classify(normalized_os, record.has_database(), record.is_production());

    if lifecycle.is_none() {
        tracing::warn!(vm = %record.name, os = %record.os, "unrecognised operating system");
    }

    ClassifiedVm {
        normalized_os: normalized_os.to_string(),
        os_status: rules::status_of(normalized_os),
        eol: lifecycle
            .map(|e| e.end_of_life)
            .unwrap_or("N/A")
            .to_string(),
        upgrade_path: lifecycle
            .map(|e| e.upgrade_target)
            .unwrap_or("Unknown")
            .to_string(),
        color: lifecycle
            .map(|e| e.display_color)
            .unwrap_or(os::lifecycle::UNKNOWN_COLOR)
            .to_string(),
        strategy: decision.strategy,
        confidence: decision.confidence,
        record,
    }
}

/// Classifies every row and aggregates the run.
///
/// Fails before classifying anything when `rows` is empty or the first row
/// lacks a required column.
pub fn analyze(rows: &[Row], opts: &AnalyzeOptions) -> anyhow::Result<AnalysisResult> {
    input::validate_columns(rows)?;

    let vms: Vec<ClassifiedVm> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| classify_record(input::to_record(row, i)))
        .collect();

    let summary = Summary::from_vms(&vms);
    let costs = estimate_costs(&vms, &opts.pricing);
    let funding = estimate_funding(vms.len(), &costs, &opts.funding);

    tracing::info!(
        total_vms = summary.total_vms,
        critical_eol = summary.critical_eol,
        cloud_ready = summary.cloud_ready,
        monthly_cost = costs.current,
        "analysis complete"
    );

    Ok(AnalysisResult {
        vms,
        summary,
        costs,
        funding,
        timestamp: opts.now.unwrap_or_else(Utc::now),
    })
}

pub fn analyze_file(path: &Path, opts: &AnalyzeOptions) -> anyhow::Result<AnalysisResult> {
    let rows = input::load_rows(path, opts.sheet.as_deref())
        .with_context(|| format!("failed to load inventory {}", path.display()))?;
    analyze(&rows, opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;
    use crate::input::Cell;
    use crate::types::{OsStatus, Strategy};

    fn row(name: &str, os: &str, env: &str, db: &str) -> Row {
        Row::new()
            .with("VM Name", Cell::text(name))
            .with("OS", Cell::text(os))
            .with("CPU", Cell::Number(4.0))
            .with("Memory", Cell::Number(8.0))
            .with("Storage", Cell::Number(100.0))
            .with("Environment", Cell::text(env))
            .with("Database", Cell::text(db))
    }

    #[test]
    fn eol_production_vm_is_replatformed() {
        let rows = vec![row("VM-1", "Windows Server 2012 R2", "Production", "None")];
        let result = analyze(&rows, &AnalyzeOptions::default()).unwrap();
        let vm = &result.vms[0];

        assert_eq!(vm.normalized_os, "windows server 2012 r2");
        assert_eq!(vm.os_status, OsStatus::Eol);
        assert_eq!(vm.strategy, Strategy::Replatform);
        assert_eq!(vm.confidence, 92);
        assert_eq!(vm.eol, "2023-10-10");
        assert_eq!(result.costs.current, 306);
    }

    #[test]
    fn unknown_os_gets_placeholder_lifecycle() {
        let vm = classify_record(input::to_record(&row("x", "AIX 7.2", "Dev", "None"), 0));
        assert_eq!(vm.normalized_os, os::UNKNOWN_OS);
        assert_eq!(vm.os_status, OsStatus::Unknown);
        assert_eq!(vm.eol, "N/A");
        assert_eq!(vm.upgrade_path, "Unknown");
        assert_eq!(vm.confidence, 88);
    }

    #[test]
    fn missing_environment_is_not_production() {
        let r = Row::new()
            .with("VM Name", Cell::text("a"))
            .with("OS", Cell::text("RHEL 9"))
            .with("CPU", Cell::Number(2.0))
            .with("Memory", Cell::Number(4.0))
            .with("Storage", Cell::Number(100.0));
        let vm = classify_record(input::to_record(&r, 0));
        assert_eq!(vm.confidence, 90);
        assert_eq!(vm.record.environment_label(), "Production");
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = analyze(&[], &AnalyzeOptions::default()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<InputError>(),
            Some(&InputError::EmptyDataset)
        );
    }
}
