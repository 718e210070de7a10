use assert_cmd::prelude::*;
use std::fs;
use std::process::Command;

const FLOWS: &str = "A,X,10\nB,X,5\nX,Y,15\n";

#[test]
fn cli_renders_svg_to_a_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("flows.csv");
    let out = tmp.path().join("out.svg");
    fs::write(&input, FLOWS).expect("write fixture");

    let exe = assert_cmd::cargo_bin!("alluvia-cli");
    Command::new(exe)
        .args([
            "--edge-color",
            "input",
            "--display-values",
            "total",
            "--output",
            out.to_string_lossy().as_ref(),
            input.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let svg = fs::read_to_string(&out).expect("read svg");
    assert!(svg.starts_with("<svg"), "output is not an SVG document");
    assert!(svg.contains("sankey-node"));
    assert!(svg.contains("X: 15"));
}

#[test]
fn cli_reports_validation_errors_on_stderr() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("bad.csv");
    fs::write(&input, "A,X\n").expect("write fixture");

    let exe = assert_cmd::cargo_bin!("alluvia-cli");
    Command::new(exe)
        .arg(input.to_string_lossy().as_ref())
        .assert()
        .failure()
        .stderr(predicates::str::contains("expected 3 fields"));
}
