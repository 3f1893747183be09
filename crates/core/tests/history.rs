use chrono::{Duration, TimeZone, Utc};

use vmassess_core::history::{History, DEFAULT_HISTORY_LIMIT};
use vmassess_core::sample::sample_rows;
use vmassess_core::{analyze, AnalyzeOptions};

fn run_at(minute: i64) -> vmassess_core::report::AnalysisResult {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    let opts = AnalyzeOptions {
        now: Some(base + Duration::minutes(minute)),
        ..AnalyzeOptions::default()
    };
    analyze(&sample_rows(5 + minute as usize), &opts).unwrap()
}

#[test]
fn history_keeps_newest_ten_first() {
    let mut history = History::default();
    for minute in 0..12 {
        history.record(&run_at(minute));
    }

    assert_eq!(history.len(), DEFAULT_HISTORY_LIMIT);
    let vm_counts: Vec<usize> = history
        .entries()
        .iter()
        .map(|e| e.summary.total_vms)
        .collect();
    assert_eq!(vm_counts, vec![16, 15, 14, 13, 12, 11, 10, 9, 8, 7]);
}

#[test]
fn history_round_trips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("history.json");

    let missing = History::load(&path, 3).unwrap();
    assert!(missing.is_empty());

    let mut history = History::new(3);
    let result = run_at(0);
    let entry = history.record(&result).clone();
    assert_eq!(entry.id, result.timestamp.timestamp_millis());
    history.save(&path).unwrap();

    let loaded = History::load(&path, 3).unwrap();
    assert_eq!(loaded.entries(), history.entries());
    assert_eq!(loaded.entries()[0].summary, result.summary);

    let raw: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert!(raw[0].get("vms").is_none());
    assert!(raw[0]["summary"]["criticalServers"].is_array());
}

#[test]
fn loading_respects_a_smaller_limit() {
    let mut history = History::new(10);
    for minute in 0..4 {
        history.record(&run_at(minute));
    }
    let bytes = serde_json::to_vec(history.entries()).unwrap();

    let trimmed = History::from_json(&bytes, 2).unwrap();
    assert_eq!(trimmed.len(), 2);
    assert_eq!(trimmed.entries()[0].summary.total_vms, 8);
}
