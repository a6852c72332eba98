//! Pipeline and CLI handler tests.
//!
//! Runs the load → compare → report workflow against the release fixtures,
//! writing reports into temporary directories.

use instance_diff::{
    cli::{run_compare, run_compare_class, ClassRequest, PairRequest},
    config::{load_config_file, AppConfig, ConfigPreset},
    model::DbId,
    pipeline::{
        compare_pair, compare_roots_of_class, exit_codes, load_snapshot_with_context,
        output_batch_report, output_pair_report,
    },
    reports::ReportFormat,
    InstanceDiffError,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn quiet_config(format: ReportFormat, file: &Path) -> AppConfig {
    AppConfig::builder()
        .quiet(true)
        .output_format(format)
        .output_file(Some(file.to_path_buf()))
        .build()
}

fn pair_request(id: i64) -> PairRequest {
    PairRequest {
        left: fixture_path("release_85.json"),
        right: fixture_path("release_86.yaml"),
        left_id: DbId(id),
        right_id: DbId(id),
    }
}

// ============================================================================
// Stage tests
// ============================================================================

#[test]
fn test_json_pair_report_metadata() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("report.json");
    let config = quiet_config(ReportFormat::Json, &out);

    let left = load_snapshot_with_context(&fixture_path("release_85.json"), true).unwrap();
    let right = load_snapshot_with_context(&fixture_path("release_86.yaml"), true).unwrap();
    let comparison =
        compare_pair(&config, left.store(), right.store(), DbId(100), DbId(100)).unwrap();
    output_pair_report(&config, &comparison, &left, &right).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["metadata"]["tool"]["name"], "instance-diff");
    assert_eq!(
        json["metadata"]["left"]["fingerprint"].as_str().map(str::len),
        Some(16)
    );
    assert!(json["metadata"]["right"]["file_path"]
        .as_str()
        .is_some_and(|p| p.ends_with("release_86.yaml")));
    assert_eq!(json["left"]["class"], "Pathway");
    assert_eq!(json["summary"]["differences"], 4);
    assert_eq!(json["differences"][0]["path"], "summation.text");
    assert_eq!(json["differences"][0]["kind"]["type"], "value_mismatch");
}

#[test]
fn test_text_batch_report() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("pathways.txt");
    let config = quiet_config(ReportFormat::Text, &out);

    let left = load_snapshot_with_context(&fixture_path("release_85.json"), true).unwrap();
    let right = load_snapshot_with_context(&fixture_path("release_86.yaml"), true).unwrap();
    let batch = compare_roots_of_class(&config, left.store(), right.store(), "Pathway").unwrap();
    output_batch_report(&config, &batch, &left, &right).unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.contains("\"Glycolysis\" [Pathway:100] (4 differences)"), "{text}");
    assert!(text.contains("\"Gluconeogenesis\" [Pathway:200] (1 differences)"), "{text}");
    assert!(text.contains("[Pathway:202] missing from right"));
    assert!(text.contains("[Pathway:201] missing from left"));
}

#[test]
fn test_missing_snapshot_reports_path() {
    let err = load_snapshot_with_context(Path::new("/nonexistent/release.json"), true).unwrap_err();
    assert!(matches!(err, InstanceDiffError::Snapshot { .. }));
    assert!(err.to_string().contains("/nonexistent/release.json"));
}

// ============================================================================
// CLI handler tests
// ============================================================================

#[test]
fn test_run_compare_exit_codes() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("summary.txt");

    let lenient = quiet_config(ReportFormat::Summary, &out);
    assert_eq!(run_compare(lenient, &pair_request(100)).unwrap(), exit_codes::SUCCESS);
    assert!(out.exists());

    let mut strict = quiet_config(ReportFormat::Summary, &out);
    strict.behavior.fail_on_diff = true;
    assert_eq!(
        run_compare(strict.clone(), &pair_request(100)).unwrap(),
        exit_codes::DIFFERENCES_FOUND
    );

    // The compartment is unchanged between releases
    assert_eq!(run_compare(strict, &pair_request(1)).unwrap(), exit_codes::SUCCESS);
}

#[test]
fn test_run_compare_shallow_preset() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("shallow.json");

    let mut config = AppConfig::from_preset(ConfigPreset::Shallow);
    config.behavior.quiet = true;
    config.behavior.fail_on_diff = true;
    config.output.format = ReportFormat::Json;
    config.output.file = Some(out);

    // Root attributes of the pathway are unchanged
    assert_eq!(run_compare(config, &pair_request(100)).unwrap(), exit_codes::SUCCESS);
}

#[test]
fn test_run_compare_rejects_invalid_config() {
    let mut config = AppConfig::default();
    config.comparison.exclude_patterns.push("[".into());
    let err = run_compare(config, &pair_request(100)).unwrap_err();
    assert!(err.to_string().contains("exclude_patterns"), "{err}");
}

#[test]
fn test_run_compare_unknown_root() {
    let tmp = TempDir::new().unwrap();
    let config = quiet_config(ReportFormat::Text, &tmp.path().join("x.txt"));
    let err = run_compare(config, &pair_request(999)).unwrap_err();
    assert!(format!("{err:#}").contains("999"), "{err:#}");
}

#[test]
fn test_run_compare_class_counts_missing_roots() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("batch.json");
    let mut config = quiet_config(ReportFormat::Json, &out);
    config.behavior.fail_on_diff = true;

    let request = ClassRequest {
        left: fixture_path("release_85.json"),
        right: fixture_path("release_86.yaml"),
        class: "Compartment".into(),
    };
    // Compartments are identical in both releases
    assert_eq!(run_compare_class(config.clone(), &request).unwrap(), exit_codes::SUCCESS);

    let request = ClassRequest {
        class: "Pathway".into(),
        ..request
    };
    assert_eq!(
        run_compare_class(config, &request).unwrap(),
        exit_codes::DIFFERENCES_FOUND
    );

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["summary"]["total_differences"], 5);
    assert_eq!(json["missing_in_right"][0], 202);
}

// ============================================================================
// Config file tests
// ============================================================================

#[test]
fn test_config_file_drives_comparison() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join(".instance-diff.yaml");
    let yaml = "\
comparison:
  max_depth: 1
  class_exclusions:
    - { class: Reaction, attribute: input }
behavior:
  quiet: true
";
    std::fs::write(&config_path, yaml).unwrap();

    let config = load_config_file(&config_path).unwrap();
    let left = load_snapshot_with_context(&fixture_path("release_85.json"), true).unwrap();
    let right = load_snapshot_with_context(&fixture_path("release_86.yaml"), true).unwrap();
    let comparison =
        compare_pair(&config, left.store(), right.store(), DbId(100), DbId(100)).unwrap();

    let paths: Vec<&str> = comparison
        .result
        .differences
        .iter()
        .map(|d| d.path.as_str())
        .collect();
    assert_eq!(paths, ["summation.text"]);
}
