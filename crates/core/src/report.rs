use std::collections::BTreeMap;

use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    cost::{percent, round_half_up, CostSummary},
    funding::FundingSummary,
    types::{ClassifiedVm, CriticalServer, OsStatus, Priority, Strategy},
};

/// How many critical servers the markdown report lists.
pub const CRITICAL_SERVERS_SHOWN: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub vms: Vec<ClassifiedVm>,
    pub summary: Summary,
    pub costs: CostSummary,
    pub funding: FundingSummary,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(rename = "totalVMs")]
    pub total_vms: usize,
    #[serde(rename = "criticalEOL")]
    pub critical_eol: usize,
    #[serde(rename = "extendedSupport")]
    pub extended_support: usize,
    #[serde(rename = "activeOS")]
    pub active_os: usize,
    #[serde(rename = "cloudReady")]
    pub cloud_ready: i64,
    #[serde(rename = "osBreakdown")]
    pub os_breakdown: BTreeMap<String, usize>,
    #[serde(rename = "strategyBreakdown")]
    pub strategy_breakdown: BTreeMap<String, usize>,
    #[serde(rename = "criticalServers")]
    pub critical_servers: Vec<CriticalServer>,
}

impl Summary {
    pub fn from_vms(vms: &[ClassifiedVm]) -> Self {
        let mut os_breakdown: BTreeMap<String, usize> = BTreeMap::new();
        let mut strategy_breakdown: BTreeMap<String, usize> = BTreeMap::new();
        let mut critical_servers: Vec<CriticalServer> = Vec::new();

        for vm in vms {
            *os_breakdown.entry(vm.os_status.to_string()).or_insert(0) += 1;
            *strategy_breakdown
                .entry(vm.strategy.to_string())
                .or_insert(0) += 1;

            if let Some(priority) = Priority::for_status(vm.os_status) {
                critical_servers.push(CriticalServer {
                    vm: vm.clone(),
                    priority,
                });
            }
        }

        // sort_by_key is stable: input order survives within a priority.
        critical_servers.sort_by_key(|s| s.priority);

        let count = |status: OsStatus| os_breakdown.get(status.as_str()).copied().unwrap_or(0);
        let active_os = count(OsStatus::Active);
        let critical_eol = count(OsStatus::Eol);
        let extended_support = count(OsStatus::Extended);

        Self {
            total_vms: vms.len(),
            critical_eol,
            extended_support,
            active_os,
            cloud_ready: percent(active_os as f64, vms.len() as f64),
            os_breakdown,
            strategy_breakdown,
            critical_servers,
        }
    }

    pub fn os_count(&self, status: OsStatus) -> usize {
        self.os_breakdown.get(status.as_str()).copied().unwrap_or(0)
    }

    pub fn strategy_count(&self, strategy: Strategy) -> usize {
        self.strategy_breakdown
            .get(strategy.as_str())
            .copied()
            .unwrap_or(0)
    }
}

/// `1234567` as `1,234,567`.
pub fn commas(n: u64) -> String {
    let s = n.to_string();
    let bytes = s.as_bytes();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, &b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(b as char);
    }
    result
}

pub fn money(n: i64) -> String {
    if n < 0 {
        format!("-${}", commas(n.unsigned_abs()))
    } else {
        format!("${}", commas(n.unsigned_abs()))
    }
}

impl AnalysisResult {
    pub fn generated_at(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    pub fn to_markdown(&self) -> String {
        let sm = &self.summary;
        let c = &self.costs;
        let f = &self.funding;

        let mut s = String::new();
        s.push_str("# Migration assessment\n\n");
        s.push_str(&format!("- generated: `{}`\n", self.generated_at()));
        s.push_str(&format!("- total_vms: `{}`\n", sm.total_vms));
        s.push('\n');

        s.push_str("## Key metrics\n\n");
        s.push_str(&format!("- active_os: `{}`\n", sm.active_os));
        s.push_str(&format!("- extended_support: `{}`\n", sm.extended_support));
        s.push_str(&format!("- critical_eol: `{}`\n", sm.critical_eol));
        s.push_str(&format!("- cloud_ready: `{}%`\n", sm.cloud_ready));
        s.push('\n');

        s.push_str("## Monthly cost\n\n");
        s.push_str(&format!("- current_on_prem: `{}`\n", money(c.current)));
        s.push_str(&format!("- aws_on_demand: `{}`\n", money(c.aws_on_demand)));
        s.push_str(&format!("- aws_byol: `{}`\n", money(c.aws_byol)));
        s.push_str(&format!(
            "- savings: `{}` (`{}%`)\n",
            money(c.savings),
            c.savings_percent
        ));
        s.push('\n');

        s.push_str("## Funding\n\n");
        s.push_str(&format!(
            "- isv_funding: `{}`\n",
            money(round_half_up(f.isv_funding))
        ));
        s.push_str(&format!(
            "- assess_credit: `{}`\n",
            money(round_half_up(f.assess_credit))
        ));
        s.push_str(&format!(
            "- mobilize_credit: `{}`\n",
            money(round_half_up(f.mobilize_credit))
        ));
        s.push_str(&format!(
            "- migrate_credit: `{}`\n",
            money(round_half_up(f.migrate_credit))
        ));
        s.push_str(&format!("- total_funding: `{}`\n", money(f.total_funding)));
        s.push_str(&format!("- coverage: `{}%`\n", f.coverage));
        s.push_str(&format!("- net_year1: `{}`\n", money(f.net_year1)));
        s.push('\n');

        s.push_str("## OS status\n\n");
        for (status, n) in &sm.os_breakdown {
            s.push_str(&format!("- {}: `{}`\n", status, n));
        }
        s.push('\n');

        s.push_str("## Strategies\n\n");
        for (strategy, n) in &sm.strategy_breakdown {
            s.push_str(&format!("- {}: `{}`\n", strategy, n));
        }
        s.push('\n');

        s.push_str("## Critical servers\n\n");
        if sm.critical_servers.is_empty() {
            s.push_str("- (none)\n");
        } else {
            s.push_str("| Priority | VM Name | OS | Status | EOL Date | Strategy |\n");
            s.push_str("| --- | --- | --- | --- | --- | --- |\n");
            for server in sm.critical_servers.iter().take(CRITICAL_SERVERS_SHOWN) {
                let vm = &server.vm;
                s.push_str(&format!(
                    "| {} | {} | {} | {} | {} | {} |\n",
                    server.priority, vm.record.name, vm.record.os, vm.os_status, vm.eol, vm.strategy
                ));
            }
            if sm.critical_servers.len() > CRITICAL_SERVERS_SHOWN {
                s.push_str(&format!(
                    "\n_{} more not shown_\n",
                    sm.critical_servers.len() - CRITICAL_SERVERS_SHOWN
                ));
            }
        }

        s
    }

    /// The per-VM detail sheet as CSV.
    pub fn vm_details_csv(&self) -> anyhow::Result<String> {
        let mut w = csv::Writer::from_writer(Vec::new());
        w.write_record([
            "VM Name",
            "OS",
            "Status",
            "EOL Date",
            "CPU",
            "Memory",
            "Storage",
            "Environment",
            "Strategy",
            "Confidence",
        ])
        .context("write csv header")?;

        for vm in &self.vms {
            let r = &vm.record;
            w.write_record([
                r.name.clone(),
                r.os.clone(),
                vm.os_status.to_string(),
                vm.eol.clone(),
                r.cpu.to_string(),
                r.memory.to_string(),
                r.storage.to_string(),
                r.environment_label().to_string(),
                vm.strategy.to_string(),
                format!("{}%", vm.confidence),
            ])
            .with_context(|| format!("write csv row {}", r.name))?;
        }

        let bytes = w
            .into_inner()
            .map_err(|e| e.into_error())
            .context("flush csv")?;
        String::from_utf8(bytes).context("csv is not utf-8")
    }
}
