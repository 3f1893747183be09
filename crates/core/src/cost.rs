use serde::{Deserialize, Serialize};

use crate::types::ClassifiedVm;

/// Linear monthly cost model. Defaults are the calibrated values; `[pricing]`
/// in the config file may override any of them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModel {
    pub base: f64,
    pub per_cpu: f64,
    pub per_memory_gib: f64,
    pub per_storage_gib: f64,
    pub on_demand_factor: f64,
    pub reserved_factor: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            base: 200.0,
            per_cpu: 10.0,
            per_memory_gib: 2.0,
            per_storage_gib: 0.5,
            on_demand_factor: 1.3,
            reserved_factor: 0.7,
        }
    }
}

impl CostModel {
    pub fn monthly_vm_cost(&self, cpu: u32, memory_gib: u32, storage_gib: u32) -> f64 {
        self.base
            + self.per_cpu * f64::from(cpu)
            + self.per_memory_gib * f64::from(memory_gib)
            + self.per_storage_gib * f64::from(storage_gib)
    }
}

/// Monthly figures in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostSummary {
    pub current: i64,
    #[serde(rename = "awsOnDemand")]
    pub aws_on_demand: i64,
    #[serde(rename = "awsBYOL")]
    pub aws_byol: i64,
    pub savings: i64,
    #[serde(rename = "savingsPercent")]
    pub savings_percent: i64,
}

/// Rounds half-way values towards positive infinity, so `-2.5` becomes `-2`.
pub fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// `100 * part / whole`, rounded; zero when `whole` is zero.
pub fn percent(part: f64, whole: f64) -> i64 {
    if whole == 0.0 {
        0
    } else {
        round_half_up(100.0 * part / whole)
    }
}

/// Sums the per-VM cost across the set and rounds once at the end.
pub fn estimate_costs(vms: &[ClassifiedVm], model: &CostModel) -> CostSummary {
    let current: f64 = vms
        .iter()
        .map(|vm| model.monthly_vm_cost(vm.record.cpu, vm.record.memory, vm.record.storage))
        .sum();
    let on_demand = current * model.on_demand_factor;
    let reserved = current * model.reserved_factor;
    let savings = current - reserved;

    CostSummary {
        current: round_half_up(current),
        aws_on_demand: round_half_up(on_demand),
        aws_byol: round_half_up(reserved),
        savings: round_half_up(savings),
        savings_percent: percent(savings, current),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_vm_cost_is_linear() {
        let m = CostModel::default();
        assert_eq!(m.monthly_vm_cost(4, 8, 100), 306.0);
        assert_eq!(m.monthly_vm_cost(2, 4, 100), 278.0);
    }

    #[test]
    fn rounding_matches_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
        assert_eq!(round_half_up(1994.3), 1994);
    }

    #[test]
    fn empty_set_has_zero_percentages() {
        let c = estimate_costs(&[], &CostModel::default());
        assert_eq!(c.current, 0);
        assert_eq!(c.savings_percent, 0);
    }
}
