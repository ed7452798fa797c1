// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use assert_cmd::prelude::*;

use std::fs;
use std::process::Command;

const BENCHMARK: &str = "\
500
1 50.0 1900.0 20.0 2000.0 2010.0 150000000
2 51.0 980.0 21.0 2020.0 1050.0 162000000
3 50.0 660.0 20.0 2040.0 730.0 174000000
4 52.0 520.0 22.0 2400.0 600.0 187000000
5 51.0 500.0 21.0 2700.0 580.0 199000000
6 50.0 490.0 20.0 3000.0 570.0 212000000
";

#[test]
fn default_input_in_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("benchmark.out"), BENCHMARK).unwrap();

    let output = Command::cargo_bin("benchplot")
        .unwrap()
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success(), "{:?}", output);

    for name in &["benchmark-rates.pdf", "benchmark-memusage.pdf"] {
        let bytes = fs::read(dir.path().join(name)).unwrap();
        assert!(bytes.starts_with(b"%PDF-"), "{} is not a PDF", name);
    }
}

#[test]
fn positional_input_path() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("run-1.out"), BENCHMARK).unwrap();

    Command::cargo_bin("benchplot")
        .unwrap()
        .current_dir(dir.path())
        .arg("run-1.out")
        .assert()
        .success();
    assert!(dir.path().join("benchmark-rates.pdf").exists());
}

#[test]
fn missing_input_fails_with_path() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::cargo_bin("benchplot")
        .unwrap()
        .current_dir(dir.path())
        .arg("nope.out")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nope.out"), "{}", stderr);
    assert!(!dir.path().join("benchmark-rates.pdf").exists());
}

#[test]
fn malformed_line_fails_with_line_number() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("benchmark.out"), "500\n1 1 2 3 4 5 6\n2 1 2 3 4\n").unwrap();

    let output = Command::cargo_bin("benchplot")
        .unwrap()
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("benchmark.out:3"), "{}", stderr);
    assert!(!dir.path().join("benchmark-rates.pdf").exists());
    assert!(!dir.path().join("benchmark-memusage.pdf").exists());
}

#[test]
fn second_positional_is_a_usage_error() {
    Command::cargo_bin("benchplot")
        .unwrap()
        .args(&["a.out", "b.out"])
        .assert()
        .failure();
}
