// Integration tests for `ogrid calc` and `ogrid replay`.
// Run with: cargo test -p opsgrid-cli --test cli_tests -- --nocapture

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn ogrid() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ogrid"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd.env_remove("OGRID_SETTINGS");
    cmd
}

fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = ogrid()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn ogrid");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("ogrid output")
}

fn write_script(dir: &tempfile::TempDir, text: &str) -> std::path::PathBuf {
    let path = dir.path().join("script.txt");
    std::fs::write(&path, text).expect("write script");
    path
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// ---------------------------------------------------------------------------
// calc
// ---------------------------------------------------------------------------

#[test]
fn calc_sum_over_csv_row() {
    let output = run_with_stdin(&["calc", "=SUM(A1:C1)", "-f", "csv"], "1,2,3\n");
    assert!(output.status.success(), "exit code was {:?}", output.status);
    assert_eq!(stdout(&output).trim(), "6");
}

#[test]
fn calc_average_skips_header_and_text() {
    let output = run_with_stdin(
        &["calc", "AVERAGE(B1:B3)", "-f", "csv", "--headers"],
        "name,amount\na,10\nb,n/a\nc,20\n",
    );
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "15");
}

#[test]
fn calc_tsv_input() {
    let output = run_with_stdin(&["calc", "=SUM(A1:A2)", "-f", "tsv"], "1.5\tx\n2\ty\n");
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "3.5");
}

#[test]
fn calc_arithmetic_without_data() {
    let output = run_with_stdin(&["calc", "=(1+2)*3", "-f", "csv"], "");
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "9");
}

#[test]
fn calc_error_prints_marker_and_fails() {
    let output = run_with_stdin(&["calc", "=1/0", "-f", "csv"], "1\n");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output).trim(), "#ERROR");
    assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
}

#[test]
fn calc_rejects_unsupported_format() {
    let output = run_with_stdin(&["calc", "=1", "-f", "xlsx"], "");
    assert_eq!(output.status.code(), Some(2));
}

// ---------------------------------------------------------------------------
// replay
// ---------------------------------------------------------------------------

#[test]
fn replay_sum_script_prints_tsv() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(
        &dir,
        "# fill a column and total it\n\
         click A1\ntype 10\nkey Enter\n\
         click A2\ntype 20\nkey Enter\n\
         click B1\ntype =SUM(A1:A2)\nkey Enter\n",
    );

    let output = ogrid()
        .args(["replay", script.to_str().unwrap(), "--rows", "3", "--cols", "2"])
        .output()
        .expect("ogrid replay");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout(&output), "10\t30\n20\t\n\t\n");
}

#[test]
fn replay_context_menu_and_clipboard() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(
        &dir,
        "click A1\ntype x\nkey Tab\n\
         rclick A1\nmenu insert-row-above\n\
         click A2\nkey Ctrl+C\nclick B1\npaste\n",
    );

    let output = ogrid()
        .args(["replay", script.to_str().unwrap(), "--rows", "2", "--cols", "2"])
        .output()
        .expect("ogrid replay");

    assert!(output.status.success());
    assert_eq!(stdout(&output), "\tx\nx\t\n\t\n");
}

#[test]
fn replay_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(&dir, "dblclick B2\ntype 4\nblur\n");

    let output = ogrid()
        .args(["replay", script.to_str().unwrap(), "--rows", "2", "--cols", "2", "--format", "json"])
        .output()
        .expect("ogrid replay --format json");

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(report["rows"], 2);
    assert_eq!(report["cols"], 2);
    assert_eq!(report["changes"], 1);
    assert_eq!(report["grid"]["cells"][1][1]["value"]["value"], 4.0);
    assert_eq!(report["grid"]["cells"][1][1]["kind"], "number");
}

#[test]
fn replay_uses_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("settings.json");
    std::fs::write(
        &settings,
        "{\n  // small sheet, verbose errors\n  \"grid.defaultRows\": 1,\n  \"grid.defaultColumns\": 1,\n  \"formula.errorDetail\": true\n}\n",
    )
    .unwrap();
    let script = write_script(&dir, "click A1\ntype =2/0\nkey Enter\n");

    let output = ogrid()
        .args(["replay", script.to_str().unwrap(), "--settings", settings.to_str().unwrap()])
        .output()
        .expect("ogrid replay --settings");

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim_end(), "#ERROR: =2/0");
}

#[test]
fn replay_bad_script_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(&dir, "click A1\nwiggle B2\n");

    let output = ogrid()
        .args(["replay", script.to_str().unwrap()])
        .output()
        .expect("ogrid replay");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 2"), "stderr: {}", stderr);
}

#[test]
fn replay_missing_script_is_usage_error() {
    let output = ogrid()
        .args(["replay", "does-not-exist.txt"])
        .output()
        .expect("ogrid replay");
    assert_eq!(output.status.code(), Some(2));
}
