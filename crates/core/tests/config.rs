use std::io::Write;
use std::path::PathBuf;

use vmassess_core::config::Config;
use vmassess_core::cost::CostModel;
use vmassess_core::AnalyzeOptions;

#[test]
fn parse_valid_toml() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(
        f,
        r#"
history_path = "out/history.json"
history_limit = 5
sheet = "VMs"

[pricing]
base = 150.0
per_cpu = 12.0

[funding]
isv_per_vm = 75.0
"#
    )
    .unwrap();

    let cfg = Config::load(f.path()).unwrap();
    assert_eq!(cfg.history_path(), PathBuf::from("out/history.json"));
    assert_eq!(cfg.history_limit(), 5);
    assert_eq!(cfg.sheet.as_deref(), Some("VMs"));
    assert_eq!(cfg.pricing.base, 150.0);
    assert_eq!(cfg.pricing.per_cpu, 12.0);
    assert_eq!(cfg.pricing.per_storage_gib, 0.5);
    assert_eq!(cfg.funding.isv_per_vm, 75.0);
    assert_eq!(cfg.funding.migrate_rate, 0.25);

    let opts = AnalyzeOptions::from_config(&cfg);
    assert_eq!(opts.sheet.as_deref(), Some("VMs"));
    assert_eq!(opts.pricing.monthly_vm_cost(1, 0, 0), 162.0);
}

#[test]
fn parse_empty_toml_gives_defaults() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(f, "").unwrap();

    let cfg = Config::load(f.path()).unwrap();
    assert_eq!(cfg.history_path(), PathBuf::from("vmassess-history.json"));
    assert_eq!(cfg.history_limit(), 10);
    assert_eq!(cfg.sheet, None);
    assert_eq!(cfg.pricing, CostModel::default());
}

#[test]
fn parse_invalid_toml_returns_error() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(f, "this is not valid [ toml {{{{").unwrap();

    let result = Config::load(f.path());
    assert!(result.is_err());
}
