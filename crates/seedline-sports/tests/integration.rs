//! End-to-end tests for the sports seeder against a local fixture dataset.

use std::path::{Path, PathBuf};

use seedline_core::ProgressContext;
use seedline_sports::{Config, SportRecord, run};
use tempfile::TempDir;

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn sport(name: &str, popularity: u64) -> SportRecord {
    SportRecord {
        name: name.to_string(),
        popularity,
    }
}

#[test]
fn aggregates_whole_dataset() {
    let out = TempDir::new().unwrap();
    let mut config = Config::local(fixtures());
    config.output_path = out.path().join("data/sports.json");

    let (summary, sports) = run(&config, &ProgressContext::hidden()).unwrap();

    assert_eq!(
        sports,
        vec![
            sport("Basketball", 3),
            sport("Baseball", 2),
            sport("Football", 2),
            sport("Bowling", 1),
            sport("Soccer", 1),
        ]
    );
    assert_eq!(summary.input_rows, 10);
    assert_eq!(summary.counted_rows, 9);
    let total: u64 = sports.iter().map(|s| s.popularity).sum();
    assert_eq!(total as usize, summary.counted_rows);

    let written: Vec<SportRecord> =
        serde_json::from_str(&std::fs::read_to_string(&config.output_path).unwrap()).unwrap();
    assert_eq!(written, sports);
}

#[test]
fn limit_applies_before_counting() {
    let out = TempDir::new().unwrap();
    let mut config = Config::local(fixtures());
    config.output_path = out.path().join("sports.json");
    config.limit = Some(4);

    let (summary, sports) = run(&config, &ProgressContext::hidden()).unwrap();
    assert_eq!(summary.processed_rows, 4);
    assert_eq!(
        sports,
        vec![sport("Basketball", 2), sport("Baseball", 1), sport("Football", 1)]
    );
}

#[test]
fn output_is_pretty_printed() {
    let out = TempDir::new().unwrap();
    let mut config = Config::local(fixtures());
    config.output_path = out.path().join("sports.json");
    config.limit = Some(1);

    run(&config, &ProgressContext::hidden()).unwrap();
    let text = std::fs::read_to_string(&config.output_path).unwrap();
    assert_eq!(
        text,
        "[\n  {\n    \"name\": \"Football\",\n    \"popularity\": 1\n  }\n]"
    );
}

#[test]
fn missing_sports_column_is_fatal() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    std::fs::write(input.path().join("other.csv"), "sport_name\nSoccer\n").unwrap();
    let mut config = Config::local(input.path());
    config.output_path = out.path().join("sports.json");

    let err = run(&config, &ProgressContext::hidden()).unwrap_err();
    assert!(format!("{err:#}").contains("column 'sports' not found"));
    assert!(!config.output_path.exists());
}
