use proptest::prelude::*;

use vmassess_core::cost::{estimate_costs, CostModel};
use vmassess_core::funding::{estimate_funding, FundingModel};
use vmassess_core::input::{parse_csv_rows, Cell, Row};
use vmassess_core::os::{lookup, normalize, UNKNOWN_OS, LIFECYCLE_TABLE};
use vmassess_core::rules::classify;
use vmassess_core::types::{OsStatus, Priority, Strategy as MigrationStrategy};
use vmassess_core::{analyze, classify_record, input, AnalyzeOptions};

fn os_name() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec![
            "Windows Server 2022",
            "Windows Server 2016",
            "Windows Server 2012 R2",
            "Windows Server 2012",
            "RHEL 7",
            "CentOS 8",
            "Ubuntu 22.04",
            "Debian 10",
            "Solaris 11",
            "",
        ])
        .prop_map(str::to_string),
        ".{0,40}",
    ]
}

fn vm_row() -> impl Strategy<Value = Row> {
    (os_name(), 0u32..64, 0u32..512, 0u32..4096, any::<bool>(), any::<bool>()).prop_map(
        |(os, cpu, memory, storage, prod, db)| {
            Row::new()
                .with("VM Name", Cell::text("vm"))
                .with("OS", Cell::text(&os))
                .with("CPU", Cell::Number(cpu as f64))
                .with("Memory", Cell::Number(memory as f64))
                .with("Storage", Cell::Number(storage as f64))
                .with("Environment", Cell::text(if prod { "Production" } else { "Dev" }))
                .with("Database", Cell::text(if db { "MySQL" } else { "None" }))
        },
    )
}

proptest! {
    #[test]
    fn csv_parser_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = parse_csv_rows(bytes.as_slice());
    }

    #[test]
    fn normalize_is_total(raw in ".{0,80}") {
        let key = normalize(&raw);
        prop_assert!(key == UNKNOWN_OS || lookup(key).is_some(), "unexpected key {}", key);
    }

    #[test]
    fn unsupported_os_always_replatforms(
        key in prop::sample::select(
            LIFECYCLE_TABLE
                .iter()
                .filter(|(_, e)| e.status == OsStatus::Eol)
                .map(|(k, _)| *k)
                .chain(std::iter::once(UNKNOWN_OS))
                .collect::<Vec<_>>()
        ),
        has_db in any::<bool>(),
        is_prod in any::<bool>(),
    ) {
        let c = classify(key, has_db, is_prod);
        prop_assert_eq!(c.strategy, MigrationStrategy::Replatform);
        prop_assert_eq!(c.confidence, if is_prod { 92 } else { 88 });
    }

    #[test]
    fn more_cpu_costs_more(cpu in 0u32..1000, extra in 1u32..1000, memory in 0u32..1000, storage in 0u32..10_000) {
        let vm = |cpu: u32| {
            let row = Row::new()
                .with("OS", Cell::text("RHEL 8"))
                .with("CPU", Cell::Number(cpu as f64))
                .with("Memory", Cell::Number(memory as f64))
                .with("Storage", Cell::Number(storage as f64));
            classify_record(input::to_record(&row, 0))
        };
        // Zero counts fall back to defaults, so compare against a non-zero base.
        let low = estimate_costs(&[vm(cpu + 1)], &CostModel::default());
        let high = estimate_costs(&[vm(cpu + 1 + extra)], &CostModel::default());
        prop_assert!(high.current > low.current);
    }

    #[test]
    fn funding_total_is_rounded_sum_and_net_is_exact(vms in 1usize..500, current in 0i64..5_000_000) {
        let model = CostModel::default();
        let reserved = (current as f64 * model.reserved_factor).round() as i64;
        let costs = vmassess_core::cost::CostSummary {
            current,
            aws_on_demand: 0,
            aws_byol: reserved,
            savings: current - reserved,
            savings_percent: 0,
        };
        let f = estimate_funding(vms, &costs, &FundingModel::default());
        let sum = f.isv_funding + f.assess_credit + f.mobilize_credit + f.migrate_credit;
        prop_assert!((f.total_funding as f64 - sum).abs() <= 0.5 + 1e-6);
        prop_assert_eq!(f.net_year1, reserved - f.total_funding);
    }

    #[test]
    fn breakdowns_account_for_every_vm(rows in prop::collection::vec(vm_row(), 1..40)) {
        let result = analyze(&rows, &AnalyzeOptions::default()).unwrap();
        let s = &result.summary;
        prop_assert_eq!(s.total_vms, result.vms.len());
        prop_assert_eq!(s.os_breakdown.values().sum::<usize>(), s.total_vms);
        prop_assert_eq!(s.strategy_breakdown.values().sum::<usize>(), s.total_vms);
        prop_assert_eq!(s.critical_servers.len(), s.critical_eol + s.extended_support);
    }

    #[test]
    fn critical_servers_are_grouped_and_stable(rows in prop::collection::vec(vm_row(), 1..40)) {
        let rows: Vec<Row> = rows
            .into_iter()
            .enumerate()
            .map(|(i, r)| {
                let mut named = Row::new().with("VM Name", Cell::text(&format!("vm-{i:03}")));
                for col in ["OS", "CPU", "Memory", "Storage", "Environment", "Database"] {
                    if let Some(cell) = r.get(col) {
                        named.push(col, cell.clone());
                    }
                }
                named
            })
            .collect();
        let result = analyze(&rows, &AnalyzeOptions::default()).unwrap();
        let servers = &result.summary.critical_servers;

        let first_high = servers.iter().position(|s| s.priority == Priority::High).unwrap_or(servers.len());
        prop_assert!(servers[first_high..].iter().all(|s| s.priority == Priority::High));
        for group in [&servers[..first_high], &servers[first_high..]] {
            let names: Vec<&str> = group.iter().map(|s| s.vm.record.name.as_str()).collect();
            let mut sorted = names.clone();
            sorted.sort();
            prop_assert_eq!(names, sorted);
        }
    }
}
