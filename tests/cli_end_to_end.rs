use std::fs;
use std::path::Path;

use qc_sampler::app::run_sampler;
use qc_sampler::transport::csv::read_table_from_path;
use tempfile::tempdir;

fn write_population(path: &Path) {
    let mut csv = String::from("Kip - UID MainCategory,session_id,message\n");
    for session in 0..30 {
        let category = if session % 3 == 0 { "complaint" } else { "billing" };
        for turn in 0..2 {
            csv.push_str(&format!("{category},s{session},\"turn {turn}, hello\"\n"));
        }
    }
    csv.push_str(",s99,no category\n");
    fs::write(path, csv).unwrap();
}

fn args(values: &[&str]) -> impl Iterator<Item = String> {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .into_iter()
}

#[test]
fn writes_sample_next_to_input_by_default() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("population.csv");
    write_population(&input);

    run_sampler(args(&["--input", input.to_str().unwrap(), "--min-sessions", "3"])).unwrap();

    let output = dir.path().join("sample_stratified_min_3.csv");
    let sampled = read_table_from_path(&output).unwrap();
    assert_eq!(
        sampled.columns(),
        ["Kip - UID MainCategory", "session_id", "message"]
    );
    // 20 billing sessions and 10 complaint sessions, both below the minimum at p = 0.1.
    assert_eq!(sampled.len(), (3 + 3) * 2);
    assert_eq!(sampled.value(0, 2).map(|text| text.ends_with(", hello")), Some(true));
}

#[test]
fn writes_summary_and_report() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("population.csv");
    let output = dir.path().join("sample.csv");
    let summary = dir.path().join("summary.csv");
    let report = dir.path().join("report.json");
    write_population(&input);

    run_sampler(args(&[
        "--input",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "--summary-output",
        summary.to_str().unwrap(),
        "--report-json",
        report.to_str().unwrap(),
        "--margin-of-error",
        "0.1",
        "--confidence",
        "90",
        "--min-sessions",
        "1",
    ]))
    .unwrap();

    let summary_table = read_table_from_path(&summary).unwrap();
    assert_eq!(
        summary_table.columns(),
        [
            "category",
            "population_session_count",
            "target_session_count",
            "actual_session_count"
        ]
    );
    assert_eq!(summary_table.value(0, 0), Some("billing"));
    assert_eq!(summary_table.value(1, 0), Some("complaint"));
    for row_idx in 0..summary_table.len() {
        assert_eq!(summary_table.value(row_idx, 2), summary_table.value(row_idx, 3));
    }

    let report: serde_json::Value =
        serde_json::from_slice(&fs::read(&report).unwrap()).unwrap();
    assert_eq!(report["effective"]["base_population"], 31);
    assert!(report["effective"]["required_size"].as_u64().is_some());
    assert_eq!(report["summary"].as_array().map(Vec::len), Some(2));
    assert!(report["generated_at"].is_string());
    assert!(output.exists());
}

#[test]
fn missing_columns_and_bad_flags_fail() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("population.csv");
    write_population(&input);

    let err = run_sampler(args(&[
        "--input",
        input.to_str().unwrap(),
        "--category-column",
        "kategori",
        "--session-column",
        "sesi",
    ]))
    .unwrap_err();
    assert_eq!(err.to_string(), "column(s) not found in dataset: kategori, sesi");
    assert!(!dir.path().join("sample_stratified_min_5.csv").exists());

    assert!(run_sampler(args(&["--input", input.to_str().unwrap(), "--proportion", "1.5"])).is_err());
    assert!(run_sampler(args(&["--input", dir.path().join("absent.csv").to_str().unwrap()])).is_err());
}

#[test]
fn help_exits_cleanly() {
    assert!(run_sampler(args(&["--help"])).is_ok());
}
