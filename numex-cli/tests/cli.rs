use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write fixture");
    path
}

#[test]
fn extract_json_in_document_order() {
    let dir = TempDir::new().unwrap();
    let path = fixture(
        &dir,
        "data.json",
        r#"{"a": 1, "b": [2, 3.5], "c": "4", "d": {"e": -7}}"#,
    );

    cargo_bin_cmd!("numex")
        .arg("extract")
        .arg(&path)
        .assert()
        .success()
        .stdout("1\n2\n3.5\n-7\n");
}

#[test]
fn extract_yaml_does_not_coerce_strings() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "config.yml", "port: 8080\nversion: \"2\"\nratio: 0.25\n");

    cargo_bin_cmd!("numex")
        .arg("extract")
        .arg(&path)
        .assert()
        .success()
        .stdout("8080\n0.25\n");
}

#[test]
fn extract_env_coerces_values() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "app.env", "PORT=8080\nNAME=John\nRATE=\"12.5%\"\n");

    cargo_bin_cmd!("numex")
        .arg("extract")
        .arg(&path)
        .assert()
        .success()
        .stdout("8080\n12.5\n");
}

#[test]
fn extract_csv_row_major() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "table.csv", "name,score,weight\nann,10,1.5\nbob,20,$3\n");

    cargo_bin_cmd!("numex")
        .arg("extract")
        .arg(&path)
        .assert()
        .success()
        .stdout("10\n1.5\n20\n");
}

#[test]
fn extract_unknown_type_uses_fallback() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "notes.txt", "Shipped 12 crates at 3.5 each, -4 returned");

    cargo_bin_cmd!("numex")
        .arg("extract")
        .arg(&path)
        .assert()
        .success()
        .stdout("12\n3.5\n-4\n");
}

#[test]
fn extract_type_flag_overrides_detection() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "payload.txt", r#"{"id": "a1", "n": [5, 6]}"#);

    cargo_bin_cmd!("numex")
        .args(["extract", "--type", "json"])
        .arg(&path)
        .assert()
        .success()
        .stdout("5\n6\n");
}

#[test]
fn extract_dedupe_and_sort() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "values.json", "[3, -10, 3, 1, -10, 7]");

    cargo_bin_cmd!("numex")
        .args(["--notifications", "all", "extract", "--dedupe", "--sort", "magnitude-desc"])
        .arg(&path)
        .assert()
        .success()
        .stdout("-10\n7\n3\n1\n")
        .stderr(predicate::str::contains("Dedupe/Sort applied"));
}

#[test]
fn extract_sort_from_config_file() {
    let dir = TempDir::new().unwrap();
    let config = fixture(
        &dir,
        "numex.toml",
        "[extraction]\nsort_enabled = true\nsort_mode = \"numeric-asc\"\n",
    );
    let path = fixture(&dir, "values.json", "[3, 1, 2]");

    cargo_bin_cmd!("numex")
        .arg("--config")
        .arg(&config)
        .arg("extract")
        .arg(&path)
        .assert()
        .success()
        .stdout("1\n2\n3\n");
}

#[test]
fn extract_malformed_json_fails_with_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "broken.json", r#"{"a": 1,"#);

    cargo_bin_cmd!("numex")
        .arg("extract")
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Failed to parse JSON"));
}

#[test]
fn extract_hides_parse_details_when_disabled() {
    let dir = TempDir::new().unwrap();
    let config = fixture(&dir, "numex.toml", "[extraction]\nshow_parse_errors = false\n");
    let path = fixture(&dir, "broken.toml", "key = = 1");

    cargo_bin_cmd!("numex")
        .arg("--config")
        .arg(&config)
        .arg("extract")
        .arg(&path)
        .env("NUMEX_LOG", "off")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: Extraction failed"))
        .stderr(predicate::str::contains("Failed to parse TOML").not());
}

#[test]
fn extract_empty_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "empty.json", "  \n\n");

    cargo_bin_cmd!("numex")
        .args(["--notifications", "all", "extract"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("info: File is empty"));
}

#[test]
fn extract_without_numbers_is_not_a_failure() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "names.json", r#"{"name": "numex", "tags": ["a", "b"]}"#);

    cargo_bin_cmd!("numex")
        .args(["--notifications", "all", "extract"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No numbers found"));
}

#[test]
fn silent_notifications_print_nothing() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "names.json", r#"{"name": "numex"}"#);

    cargo_bin_cmd!("numex")
        .args(["--notifications", "silent", "extract"])
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn extract_with_analysis_appends_report() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "values.json", "[1, 2, 2, 3]");

    cargo_bin_cmd!("numex")
        .args(["extract", "--analyze"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("1\n2\n2\n3\n\n=== Number Analysis Report ==="))
        .stdout(predicate::str::contains("Type: json\n"))
        .stdout(predicate::str::contains("Mode: 2\n"));
}

#[test]
fn extract_single_csv_column() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "table.csv", "id,price\n1,9.99\n2,\"1,000\"\n3,4.5\n");

    cargo_bin_cmd!("numex")
        .args(["extract", "--columns", "1", "--header"])
        .arg(&path)
        .assert()
        .success()
        .stdout("9.99\n1\n4.5\n");
}

#[test]
fn extract_all_csv_columns_to_directory() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("columns");
    let path = fixture(&dir, "table.csv", "a,b,label\n1,2,x\n3,4,y\n");

    cargo_bin_cmd!("numex")
        .args(["extract", "--all-columns", "--header", "--out-dir"])
        .arg(&out)
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(fs::read_to_string(out.join("column-0.txt")).unwrap(), "1\n3");
    assert_eq!(fs::read_to_string(out.join("column-1.txt")).unwrap(), "2\n4");
    assert!(!out.join("column-2.txt").exists());
}

#[test]
fn extract_csv_columns_to_stdout_blocks() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "table.csv", "5,6,7\n8,9,10\n");

    cargo_bin_cmd!("numex")
        .args(["extract", "--columns", "2,0", "--streaming"])
        .arg(&path)
        .assert()
        .success()
        .stdout("==> column 2 <==\n7\n10\n==> column 0 <==\n5\n8\n");
}

#[test]
fn many_columns_need_confirmation() {
    let dir = TempDir::new().unwrap();
    let config = fixture(&dir, "numex.toml", "[safety]\nmany_documents_threshold = 2\n");
    let path = fixture(&dir, "table.csv", "1,2\n3,4\n");

    cargo_bin_cmd!("numex")
        .args(["--notifications", "all", "--config"])
        .arg(&config)
        .args(["extract", "--all-columns"])
        .arg(&path)
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Cancelled"));

    cargo_bin_cmd!("numex")
        .arg("--config")
        .arg(&config)
        .args(["extract", "--all-columns", "--force"])
        .arg(&path)
        .assert()
        .success()
        .stdout("==> column 0 <==\n1\n3\n==> column 1 <==\n2\n4\n");
}

#[test]
fn oversized_column_is_refused() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("columns");
    let config = fixture(
        &dir,
        "numex.toml",
        "[safety]\nlarge_output_lines_threshold = 100\n",
    );
    let rows: String = (1..=250).map(|i| format!("{i},label\n")).collect();
    let path = fixture(&dir, "table.csv", &rows);

    cargo_bin_cmd!("numex")
        .arg("--config")
        .arg(&config)
        .args(["extract", "--columns", "0,1", "--out-dir"])
        .arg(&out)
        .arg(&path)
        .write_stdin("y\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Output too large (250 numbers)"))
        .stderr(predicate::str::contains("Safety check failed"));

    assert!(!out.join("column-0.txt").exists());
}

#[test]
fn column_selection_requires_csv() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "values.json", "[1, 2]");

    cargo_bin_cmd!("numex")
        .args(["extract", "--columns", "0,1"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Column selection needs a CSV document"));
}

#[test]
fn oversized_file_is_refused_unless_forced() {
    let dir = TempDir::new().unwrap();
    let config = fixture(&dir, "numex.toml", "[safety]\nfile_size_warn_bytes = 1000\n");
    let path = fixture(&dir, "big.txt", &"12345\n".repeat(2000));

    cargo_bin_cmd!("numex")
        .arg("--config")
        .arg(&config)
        .arg("extract")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Safety check failed"))
        .stderr(predicate::str::contains("--force"));

    cargo_bin_cmd!("numex")
        .arg("--config")
        .arg(&config)
        .args(["extract", "--force", "--dedupe"])
        .arg(&path)
        .assert()
        .success()
        .stdout("12345\n");
}

#[test]
fn missing_file_fails() {
    cargo_bin_cmd!("numex")
        .args(["extract", "/definitely/not/here.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn dedupe_numbers_file() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "list.txt", "3\n1\n3\n\n2\n1\n");

    cargo_bin_cmd!("numex")
        .arg("dedupe")
        .arg(&path)
        .assert()
        .success()
        .stdout("3\n1\n2\n");
}

#[test]
fn dedupe_in_place_rewrites_document() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "values.json", "[5, 5, 6]");

    cargo_bin_cmd!("numex")
        .args(["dedupe", "--in-place"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(fs::read_to_string(&path).unwrap(), "5\n6");
}

#[test]
fn dedupe_without_duplicates_leaves_document_alone() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "list.txt", "1\n2\n3\n");

    cargo_bin_cmd!("numex")
        .args(["--notifications", "all", "dedupe", "--in-place"])
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("No duplicate numbers found"));

    assert_eq!(fs::read_to_string(&path).unwrap(), "1\n2\n3\n");
}

#[test]
fn dedupe_reports_extraction_failure() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "broken.yaml", "key: [1, 2\n");

    cargo_bin_cmd!("numex")
        .arg("dedupe")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to extract numbers: Failed to parse YAML"));
}

#[test]
fn sort_with_mode() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "list.txt", "-5\n2\n-1\n10\n");

    cargo_bin_cmd!("numex")
        .args(["sort", "--mode", "magnitude-asc"])
        .arg(&path)
        .assert()
        .success()
        .stdout("-1\n2\n-5\n10\n");
}

#[test]
fn sort_asks_for_mode() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "list.txt", "1\n3\n2\n");

    cargo_bin_cmd!("numex")
        .arg("sort")
        .arg(&path)
        .write_stdin("2\n")
        .assert()
        .success()
        .stdout("3\n2\n1\n")
        .stderr(predicate::str::contains("Numeric Descending"));
}

#[test]
fn sort_cancelled_on_empty_choice() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "list.txt", "1\n3\n2\n");

    cargo_bin_cmd!("numex")
        .args(["--notifications", "all", "sort"])
        .arg(&path)
        .write_stdin("\n")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Sort cancelled"));
}

#[test]
fn analyze_numbers_file() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "list.txt", "1\n2\n3\n4\n5\n6\n7\n8\n9\n100\n");

    cargo_bin_cmd!("numex")
        .arg("analyze")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Type: numbers\n"))
        .stdout(predicate::str::contains("Average: 14.5000\n"))
        .stdout(predicate::str::contains("Outliers: 1 (100)\n"));
}

#[test]
fn analyze_as_json() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "data.toml", "a = 1\nb = [2, 3]\n");

    let output = cargo_bin_cmd!("numex")
        .args(["analyze", "--json"])
        .arg(&path)
        .output()
        .expect("run numex");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(report["source_type"], "toml");
    assert_eq!(report["basic"]["count"], 3);
    assert_eq!(report["basic"]["sum"], 6.0);
}

#[test]
fn filter_inclusive_bounds() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "list.txt", "-3\n-1\n0\n5\n6\n");

    cargo_bin_cmd!("numex")
        .args(["filter", "--min", "-1", "--max", "5"])
        .arg(&path)
        .assert()
        .success()
        .stdout("-1\n0\n5\n");
}

#[test]
fn filter_rejects_inverted_bounds() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "list.txt", "1\n");

    cargo_bin_cmd!("numex")
        .args(["filter", "--min", "5", "--max", "1"])
        .arg(&path)
        .assert()
        .failure();
}

#[test]
fn detect_prints_type() {
    cargo_bin_cmd!("numex")
        .args(["detect", "settings.YML"])
        .assert()
        .success()
        .stdout("yaml\n");

    cargo_bin_cmd!("numex")
        .args(["detect", "Makefile"])
        .assert()
        .success()
        .stdout("unknown\n");
}

#[test]
fn formats_lists_extractors() {
    cargo_bin_cmd!("numex")
        .arg("formats")
        .assert()
        .success()
        .stdout(predicate::str::contains("fallback"))
        .stdout(predicate::str::contains("unknown"))
        .stdout(predicate::str::contains("yaml       yaml, yml"));
}

#[test]
fn safety_report_for_small_file() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "small.csv", "1,2,3\n");

    cargo_bin_cmd!("numex")
        .arg("safety")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# numex Safety Report"))
        .stdout(predicate::str::contains("**Status**: Safe"));
}

#[test]
fn safety_report_marks_excluded_file() {
    let dir = TempDir::new().unwrap();
    let config = fixture(&dir, "numex.toml", "[safety]\nfile_size_warn_bytes = 1000\n");
    let big = fixture(&dir, "big.txt", &"12345\n".repeat(2000));
    let large = fixture(&dir, "large.txt", &"12345\n".repeat(500));

    cargo_bin_cmd!("numex")
        .arg("--config")
        .arg(&config)
        .arg("safety")
        .arg(&big)
        .assert()
        .success()
        .stdout(predicate::str::contains("**Status**: Warnings/Errors"))
        .stdout(predicate::str::contains("**Excluded**"));

    cargo_bin_cmd!("numex")
        .arg("--config")
        .arg(&config)
        .arg("safety")
        .arg(&large)
        .assert()
        .success()
        .stdout(predicate::str::contains("**Excluded**").not());
}

#[test]
fn perf_flag_prints_metrics() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "values.json", "[1, 2]");

    cargo_bin_cmd!("numex")
        .args(["--perf", "extract"])
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("**Operation**: extract"))
        .stderr(predicate::str::contains("**Numbers Extracted**: 2"));
}

#[test]
fn invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    let config = fixture(&dir, "numex.toml", "[extraction]\nsort_mode = \"sideways\"\n");
    let path = fixture(&dir, "values.json", "[1]");

    cargo_bin_cmd!("numex")
        .arg("--config")
        .arg(&config)
        .arg("extract")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}
