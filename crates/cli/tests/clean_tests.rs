// Integration tests for `restitch clean`: artifacts on disk, exit codes,
// and the --json batch report.

use std::path::Path;
use std::process::Command;

use calamine::{open_workbook_auto, Reader};

fn restitch() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_restitch"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd
}

/// Assert stdout is a single, parseable JSON value with no extra lines.
fn assert_single_json(stdout: &str) -> serde_json::Value {
    let trimmed = stdout.trim();
    assert!(!trimmed.is_empty(), "stdout should not be empty");
    serde_json::from_str(trimmed).unwrap_or_else(|e| {
        panic!("stdout must be valid JSON.\nParse error: {}\nstdout:\n{}", e, trimmed)
    })
}

/// A small export in Windows-1252, shredded the way the source tool does it:
/// one header line, then a record continued across two physical lines, then a
/// second record.
const RAW_EXPORT: &[u8] = b"\xc1rea/Processo envolvido;meta\n\
Log\xedstica - Atendimento X;m\n\
continua\xe7\xe3o da solicita\xe7\xe3o;m\n\
Log\xedstica - Atendimento Y;m\n";

fn csv_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("read artifact")
        .split("\r\n")
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

// ===========================================================================
// Artifacts
// ===========================================================================

#[test]
fn clean_writes_all_three_artifacts() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let input = dir.path().join("export.csv");
    std::fs::write(&input, RAW_EXPORT).unwrap();
    let out = dir.path().join("out");

    let output = restitch()
        .args(["clean", input.to_str().unwrap(), "--out-dir", out.to_str().unwrap()])
        .output()
        .expect("restitch clean");

    assert!(
        output.status.success(),
        "exit code: {:?}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(out.join("export_final_onecol.csv").exists());
    assert!(out.join("export_final_wide.xlsx").exists());
    assert!(out.join("export_final_onecol.xlsx").exists());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("2 records from 4 lines"), "stderr: {}", stderr);

    let lines = csv_lines(&out.join("export_final_onecol.csv"));
    assert_eq!(lines.len(), 3, "canonical header plus two records");
    assert!(lines[0].contains("Área/Processo envolvido"));
    assert_eq!(lines[1], "Logística - Atendimento Xcontinuação da solicitação");
    assert_eq!(lines[2], "Logística - Atendimento Y");
}

#[test]
fn wide_artifact_carries_the_canonical_columns() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let input = dir.path().join("export.csv");
    std::fs::write(&input, RAW_EXPORT).unwrap();

    let output = restitch()
        .args(["clean", input.to_str().unwrap(), "--out-dir", dir.path().to_str().unwrap()])
        .output()
        .expect("restitch clean");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let mut workbook = open_workbook_auto(dir.path().join("export_final_wide.xlsx")).unwrap();
    let range = workbook.worksheet_range("Dados").expect("Dados sheet");
    assert_eq!(range.height(), 3);
    assert_eq!(range.width(), 48);
    assert_eq!(range.get_value((0, 0)).unwrap().to_string(), "Área/Processo envolvido");
    assert_eq!(range.get_value((0, 47)).unwrap().to_string(), "Tem restrição de acesso?");
    assert_eq!(
        range.get_value((1, 0)).unwrap().to_string(),
        "Logística - Atendimento Xcontinuação da solicitação"
    );
}

#[test]
fn onecol_spreadsheet_mirrors_the_csv() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let input = dir.path().join("export.csv");
    std::fs::write(&input, RAW_EXPORT).unwrap();

    let output = restitch()
        .args(["clean", input.to_str().unwrap(), "--out-dir", dir.path().to_str().unwrap()])
        .output()
        .expect("restitch clean");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let mut workbook = open_workbook_auto(dir.path().join("export_final_onecol.xlsx")).unwrap();
    let range = workbook.worksheet_range("Dados").expect("Dados sheet");
    assert_eq!(range.height(), 3);
    let header = range.get_value((0, 0)).unwrap().to_string();
    assert!(header.starts_with("Área/Processo envolvido,"));
    assert_eq!(
        range.get_value((2, 0)).unwrap().to_string(),
        "Logística - Atendimento Y"
    );
}

#[test]
fn skip_wide_omits_the_wide_artifact() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let input = dir.path().join("export.csv");
    std::fs::write(&input, RAW_EXPORT).unwrap();

    let output = restitch()
        .args([
            "clean",
            input.to_str().unwrap(),
            "--out-dir",
            dir.path().to_str().unwrap(),
            "--skip-wide",
        ])
        .output()
        .expect("restitch clean --skip-wide");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    assert!(dir.path().join("export_final_onecol.csv").exists());
    assert!(!dir.path().join("export_final_wide.xlsx").exists());
    assert!(dir.path().join("export_final_onecol.xlsx").exists());
}

#[test]
fn header_fix_fires_for_known_export_variants() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let input = dir.path().join("sql_SAC_LogDevolucao_CQT.csv");
    let raw: &[u8] = b"An\xe1lise Realizada - Log\xedstica.,resto;meta\nLog\xedstica corpo;x\n";
    std::fs::write(&input, raw).unwrap();

    let output = restitch()
        .args([
            "clean",
            input.to_str().unwrap(),
            "--out-dir",
            dir.path().to_str().unwrap(),
            "--json",
        ])
        .output()
        .expect("restitch clean");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("header fix"), "stderr: {}", stderr);

    let val = assert_single_json(&String::from_utf8_lossy(&output.stdout));
    let file = &val["files"][0];
    assert_eq!(file["header_fixes"].as_array().unwrap().len(), 1);
}

// ===========================================================================
// Overflow policy
// ===========================================================================

fn oversized_export() -> Vec<u8> {
    let mut text = String::from("header;m\nLogistica ");
    text.push_str(&"a".repeat(40_000));
    text.push_str(";m\n");
    text.into_bytes()
}

#[test]
fn split_policy_chunks_oversized_cells() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let input = dir.path().join("big.csv");
    std::fs::write(&input, oversized_export()).unwrap();

    // --skip-wide: the record is one giant field, which only the one-column
    // artifacts can represent.
    let output = restitch()
        .args([
            "clean",
            input.to_str().unwrap(),
            "--out-dir",
            dir.path().to_str().unwrap(),
            "--skip-wide",
        ])
        .output()
        .expect("restitch clean");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let mut workbook = open_workbook_auto(dir.path().join("big_final_onecol.xlsx")).unwrap();
    let range = workbook.worksheet_range("Dados").expect("Dados sheet");
    // Header row, then the one record as two marked chunks.
    assert_eq!(range.height(), 3);
    assert!(range.get_value((1, 0)).unwrap().to_string().ends_with("__PART_1__"));
    assert!(range.get_value((2, 0)).unwrap().to_string().ends_with("__PART_2__"));
}

#[test]
fn withhold_policy_skips_the_spreadsheet() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let input = dir.path().join("big.csv");
    std::fs::write(&input, oversized_export()).unwrap();

    let output = restitch()
        .args([
            "clean",
            input.to_str().unwrap(),
            "--out-dir",
            dir.path().to_str().unwrap(),
            "--overflow",
            "withhold",
            "--skip-wide",
            "--json",
        ])
        .output()
        .expect("restitch clean --overflow withhold");

    // Withholding is not an error; the CSV still carries everything.
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(dir.path().join("big_final_onecol.csv").exists());
    assert!(!dir.path().join("big_final_onecol.xlsx").exists());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("withheld"), "stderr: {}", stderr);

    let val = assert_single_json(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(val["files"][0]["withheld"], serde_json::json!(true));
}

// ===========================================================================
// Exit codes
// ===========================================================================

#[test]
fn empty_file_exits_empty() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let input = dir.path().join("blank.csv");
    std::fs::write(&input, "\r\n   \r\n").unwrap();

    let output = restitch()
        .args(["clean", input.to_str().unwrap(), "--out-dir", dir.path().to_str().unwrap()])
        .output()
        .expect("restitch clean");

    assert_eq!(output.status.code(), Some(5));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no content lines"), "stderr: {}", stderr);
}

#[test]
fn header_only_file_exits_empty() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let input = dir.path().join("header_only.csv");
    std::fs::write(&input, "cabecalho qualquer;meta\n").unwrap();

    let output = restitch()
        .args(["clean", input.to_str().unwrap(), "--out-dir", dir.path().to_str().unwrap()])
        .output()
        .expect("restitch clean");

    assert_eq!(output.status.code(), Some(5));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no records"), "stderr: {}", stderr);
}

#[test]
fn unreadable_file_fails_the_batch_but_not_its_neighbors() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let good = dir.path().join("good.csv");
    std::fs::write(&good, RAW_EXPORT).unwrap();
    let missing = dir.path().join("no_such_file.csv");

    let output = restitch()
        .args([
            "clean",
            missing.to_str().unwrap(),
            good.to_str().unwrap(),
            "--out-dir",
            dir.path().to_str().unwrap(),
        ])
        .output()
        .expect("restitch clean");

    // The good file still gets its artifacts; the batch still fails.
    assert_eq!(output.status.code(), Some(3));
    assert!(dir.path().join("good_final_onecol.csv").exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot read"), "stderr: {}", stderr);
}

#[test]
fn no_input_files_is_a_usage_error() {
    let output = restitch().args(["clean"]).output().expect("restitch clean");
    assert_eq!(output.status.code(), Some(2));
}

// ===========================================================================
// --json batch report
// ===========================================================================

#[test]
fn json_reports_one_entry_per_file() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let good = dir.path().join("good.csv");
    std::fs::write(&good, RAW_EXPORT).unwrap();
    let blank = dir.path().join("blank.csv");
    std::fs::write(&blank, "\n").unwrap();

    let output = restitch()
        .args([
            "clean",
            good.to_str().unwrap(),
            blank.to_str().unwrap(),
            "--out-dir",
            dir.path().to_str().unwrap(),
            "--json",
        ])
        .output()
        .expect("restitch clean --json");

    // Empty input outranks success for the batch exit.
    assert_eq!(output.status.code(), Some(5));

    let val = assert_single_json(&String::from_utf8_lossy(&output.stdout));
    let files = val["files"].as_array().expect("files array");
    assert_eq!(files.len(), 2);

    assert_eq!(files[0]["status"], serde_json::json!("ok"));
    assert_eq!(files[0]["records"], serde_json::json!(2));
    assert_eq!(files[0]["lines"], serde_json::json!(4));
    assert_eq!(files[0]["artifacts"].as_array().unwrap().len(), 3);
    assert_eq!(files[0]["withheld"], serde_json::json!(false));

    assert_eq!(files[1]["status"], serde_json::json!("empty_input"));
    assert!(files[1]["artifacts"].as_array().unwrap().is_empty());
}
