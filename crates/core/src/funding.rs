use serde::{Deserialize, Serialize};

use crate::cost::{percent, round_half_up, CostSummary};

/// Incentive credit rates. The three program credits are fractions of the
/// current monthly cost; ISV funding is a flat amount per VM.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FundingModel {
    pub isv_per_vm: f64,
    pub assess_rate: f64,
    pub mobilize_rate: f64,
    pub migrate_rate: f64,
}

impl Default for FundingModel {
    fn default() -> Self {
        Self {
            isv_per_vm: 50.0,
            assess_rate: 0.05,
            mobilize_rate: 0.20,
            migrate_rate: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FundingSummary {
    #[serde(rename = "isvFunding")]
    pub isv_funding: f64,
    #[serde(rename = "assessCredit")]
    pub assess_credit: f64,
    #[serde(rename = "mobilizeCredit")]
    pub mobilize_credit: f64,
    #[serde(rename = "migrateCredit")]
    pub migrate_credit: f64,
    #[serde(rename = "totalFunding")]
    pub total_funding: i64,
    pub coverage: i64,
    /// Negative when credits exceed the first-year cost.
    #[serde(rename = "netYear1")]
    pub net_year1: i64,
}

pub fn estimate_funding(vm_count: usize, costs: &CostSummary, model: &FundingModel) -> FundingSummary {
    let current = costs.current as f64;
    let isv_funding = model.isv_per_vm * vm_count as f64;
    let assess_credit = current * model.assess_rate;
    let mobilize_credit = current * model.mobilize_rate;
    let migrate_credit = current * model.migrate_rate;

    let total_funding =
        round_half_up(isv_funding + assess_credit + mobilize_credit + migrate_credit);

    FundingSummary {
        isv_funding,
        assess_credit,
        mobilize_credit,
        migrate_credit,
        total_funding,
        // Rounded total, not the raw credit sum.
        coverage: percent(total_funding as f64, costs.aws_byol as f64),
        net_year1: costs.aws_byol - total_funding,
    }
}
