// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use benchplot::*;

use std::fs;
use std::path::Path;

const BENCHMARK: &str = "\
2000
1 120.0 3900.0 40.0 4050.0 4100.0 210000000
2 121.0 1990.0 41.0 4110.0 2150.0 232000000
3 119.0 1350.0 40.0 4170.0 1510.0 254000000
4 122.0 1040.0 42.0 4260.0 1200.0 276000000
5 120.0 960.0 41.0 4900.0 1110.0 301000000
6 121.0 900.0 40.0 5600.0 1050.0 327000000
7 123.0 870.0 43.0 6300.0 1020.0 352000000
8 122.0 850.0 42.0 7000.0 1000.0 380000000
9 124.0 860.0 44.0 7100.0 1015.0 405000000
10 125.0 870.0 45.0 7200.0 1030.0 431000000
";

fn write_config(dir: &Path, input: &Path, extra: &str) -> String {
    let config = dir.join("benchplot.toml");
    fs::write(
        &config,
        format!(
            "[general]\ninput = {:?}\n\n[rates]\nfile = {:?}\n\n[memory]\nfile = {:?}\n{}",
            input.display().to_string(),
            dir.join("rates.pdf").display().to_string(),
            dir.join("memory.pdf").display().to_string(),
            extra
        ),
    )
    .unwrap();
    config.display().to_string()
}

fn non_empty(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false)
}

#[test]
fn generates_both_charts() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("benchmark.out");
    fs::write(&input, BENCHMARK).unwrap();
    let config = write_config(dir.path(), &input, "fit = \"cores\"\n");

    let config = Config::from_args(vec!["benchplot", "--config", config.as_str()]).unwrap();
    let report = Report::generate(&config).unwrap();

    assert!(non_empty(&dir.path().join("rates.pdf")));
    assert!(non_empty(&dir.path().join("memory.pdf")));

    let markers = report.metrics().markers();
    assert_eq!(markers.cores(), 4);
    assert_eq!(report.dataset().records()[markers.cores_index()].threads(), 4);
    assert_eq!(report.dataset().records()[markers.threads_index()].threads(), 8);
    assert_eq!(report.metrics().memory().fit_points(), 7);
}

#[test]
fn command_line_input_overrides_config() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("other.out");
    fs::write(&input, BENCHMARK).unwrap();
    let config = write_config(dir.path(), &dir.path().join("missing.out"), "");

    let config = Config::from_args(vec![
        "benchplot",
        "--config",
        config.as_str(),
        input.to_str().unwrap(),
    ])
    .unwrap();
    assert!(Report::generate(&config).is_ok());
    assert!(non_empty(&dir.path().join("rates.pdf")));
}

#[test]
fn malformed_line_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("benchmark.out");
    fs::write(&input, "100\n1 1 2 3 4 5 6\n2 1 2 3 4\n").unwrap();
    let config = write_config(dir.path(), &input, "");

    let config = Config::from_args(vec!["benchplot", "--config", config.as_str()]).unwrap();
    let err = Report::generate(&config).err().unwrap();
    match err {
        ReportError::Parse { location, .. } => assert!(location.ends_with(":3")),
        other => panic!("unexpected error: {}", other),
    }

    assert!(!dir.path().join("rates.pdf").exists());
    assert!(!dir.path().join("memory.pdf").exists());
}

#[test]
fn zero_wall_time_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("benchmark.out");
    fs::write(&input, BENCHMARK.replace("1110.0", "0")).unwrap();
    let config = write_config(dir.path(), &input, "");

    let config = Config::from_args(vec!["benchplot", "--config", config.as_str()]).unwrap();
    let err = Report::generate(&config).err().unwrap();
    assert!(matches!(
        err,
        ReportError::InvalidMeasurement { field: "t_real", .. }
    ));
    assert!(!dir.path().join("rates.pdf").exists());
}

#[test]
fn negative_memory_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("benchmark.out");
    fs::write(&input, BENCHMARK.replace("301000000", "-301000000")).unwrap();
    let config = write_config(dir.path(), &input, "");

    let config = Config::from_args(vec!["benchplot", "--config", config.as_str()]).unwrap();
    match Report::generate(&config).err().unwrap() {
        ReportError::InvalidMeasurement {
            location,
            field,
            value,
        } => {
            assert!(location.ends_with("benchmark.out:6"), "{}", location);
            assert_eq!(field, "memory");
            assert_eq!(value, -301000000.0);
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(!dir.path().join("rates.pdf").exists());
    assert!(!dir.path().join("memory.pdf").exists());
}

#[test]
fn negative_cpu_time_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("benchmark.out");
    fs::write(&input, BENCHMARK.replace("4260.0", "-4260.0")).unwrap();
    let config = write_config(dir.path(), &input, "");

    let config = Config::from_args(vec!["benchplot", "--config", config.as_str()]).unwrap();
    let err = Report::generate(&config).err().unwrap();
    assert!(matches!(
        err,
        ReportError::InvalidMeasurement { field: "t_cpu", .. }
    ));
    assert!(!dir.path().join("rates.pdf").exists());
    assert!(!dir.path().join("memory.pdf").exists());
}

#[test]
fn failed_chart_removes_the_other() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("benchmark.out");
    fs::write(&input, BENCHMARK).unwrap();
    let config = dir.path().join("benchplot.toml");
    fs::write(
        &config,
        format!(
            "[rates]\nfile = {:?}\n\n[memory]\nfile = {:?}\n",
            dir.path().join("rates.pdf").display().to_string(),
            dir.path().join("memory.eps").display().to_string(),
        ),
    )
    .unwrap();

    let config = Config::from_args(vec![
        "benchplot",
        "--config",
        config.to_str().unwrap(),
        input.to_str().unwrap(),
    ])
    .unwrap();
    let err = Report::generate(&config).err().unwrap();
    assert!(matches!(err, ReportError::Output { .. }));
    assert!(!dir.path().join("rates.pdf").exists());
    assert!(!dir.path().join("memory.eps").exists());
}
