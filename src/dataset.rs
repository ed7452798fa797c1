// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Benchmark report input.
//!
//! The first line holds the number of events analyzed. Each following line
//! holds one measurement:
//!
//! ```text
//! threads t_init t_ana t_out t_cpu t_real memory
//! ```
//!
//! with times in milliseconds and memory (maximum resident set size) in
//! bytes. Note that the total CPU time precedes the wall-clock time.

use crate::error::ReportError;

use logger::*;

use std::path::Path;

pub const DEFAULT_INPUT: &str = "benchmark.out";

const FIELDS: [&str; 7] = ["threads", "t_init", "t_ana", "t_out", "t_cpu", "t_real", "memory"];

/// One line of the benchmark report.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BenchmarkRecord {
    threads: u32,
    init: f64,
    analysis: f64,
    output: f64,
    cpu: f64,
    real: f64,
    memory: f64,
}

impl BenchmarkRecord {
    /// Times are in milliseconds, memory in bytes.
    pub fn new(
        threads: u32,
        init: f64,
        analysis: f64,
        output: f64,
        cpu: f64,
        real: f64,
        memory: f64,
    ) -> Self {
        Self {
            threads,
            init,
            analysis,
            output,
            cpu,
            real,
            memory,
        }
    }

    fn parse(line: &str) -> Result<Self, String> {
        let items: Vec<&str> = line.split_whitespace().collect();
        if items.len() < FIELDS.len() {
            return Err(format!(
                "expected {} fields, found {}",
                FIELDS.len(),
                items.len()
            ));
        }
        if items.len() > FIELDS.len() {
            warn!(
                "ignoring {} trailing field(s) in: {}",
                items.len() - FIELDS.len(),
                line.trim()
            );
        }

        let threads = items[0]
            .parse::<u32>()
            .map_err(|_| format!("invalid {} value: '{}'", FIELDS[0], items[0]))?;
        let mut values = [0.0; 6];
        for (i, value) in values.iter_mut().enumerate() {
            let item = items[i + 1];
            *value = item
                .parse::<f64>()
                .map_err(|_| format!("invalid {} value: '{}'", FIELDS[i + 1], item))?;
        }

        Ok(Self::new(
            threads, values[0], values[1], values[2], values[3], values[4], values[5],
        ))
    }

    /// Returns the name and value of the first field that cannot be used to
    /// compute rates or memory figures.
    fn check(&self) -> Result<(), (&'static str, f64)> {
        if self.threads == 0 {
            return Err(("thread count", 0.0));
        }
        let timings = [
            ("t_init", self.init),
            ("t_ana", self.analysis),
            ("t_out", self.output),
        ];
        for &(field, value) in &timings {
            if !value.is_finite() || value < 0.0 {
                return Err((field, value));
            }
        }
        if !self.cpu.is_finite() || self.cpu <= 0.0 {
            return Err(("t_cpu", self.cpu));
        }
        if !self.real.is_finite() || self.real <= 0.0 {
            return Err(("t_real", self.real));
        }
        if !self.memory.is_finite() || self.memory < 0.0 {
            return Err(("memory", self.memory));
        }
        Ok(())
    }

    pub fn threads(&self) -> u32 {
        self.threads
    }

    pub fn init_ms(&self) -> f64 {
        self.init
    }

    pub fn analysis_ms(&self) -> f64 {
        self.analysis
    }

    pub fn output_ms(&self) -> f64 {
        self.output
    }

    /// total CPU time across all threads
    pub fn cpu_ms(&self) -> f64 {
        self.cpu
    }

    /// wall-clock time
    pub fn real_ms(&self) -> f64 {
        self.real
    }

    pub fn memory_bytes(&self) -> f64 {
        self.memory
    }
}

/// All measurements of one benchmark run, in file order.
///
/// A dataset always holds at least one record, the first record was taken
/// with a single thread, thread counts never decrease, and every time
/// used as a divisor is positive.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchmarkDataset {
    events: u64,
    records: Vec<BenchmarkRecord>,
}

impl BenchmarkDataset {
    pub fn new(events: u64, records: Vec<BenchmarkRecord>) -> Result<Self, ReportError> {
        validate(events, &records, "event count", |i| format!("record {}", i))?;
        Ok(Self { events, records })
    }

    /// Read and parse a benchmark report from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ReportError::Input {
            path: name.clone(),
            source,
        })?;
        Self::parse_str(&name, &content)
    }

    /// Parse a benchmark report. `name` is used in diagnostics.
    pub fn parse_str(name: &str, content: &str) -> Result<Self, ReportError> {
        let mut lines = content.lines().enumerate();

        let first = lines.next().map(|(_, line)| line.trim()).unwrap_or("");
        let events = first.parse::<u64>().map_err(|_| {
            ReportError::parse(
                format!("{}:1", name),
                format!("expected an integer event count, found '{}'", first),
            )
        })?;

        let mut records = Vec::new();
        let mut numbers = Vec::new();
        for (i, line) in lines {
            if line.trim().is_empty() {
                continue;
            }
            let record = BenchmarkRecord::parse(line)
                .map_err(|reason| ReportError::parse(format!("{}:{}", name, i + 1), reason))?;
            records.push(record);
            numbers.push(i + 1);
        }

        validate(events, &records, &format!("{}:1", name), |i| {
            format!("{}:{}", name, numbers[i])
        })?;

        debug!("parsed {} records for {} events from {}", records.len(), events, name);
        Ok(Self { events, records })
    }

    /// number of events analyzed in each run
    pub fn events(&self) -> u64 {
        self.events
    }

    pub fn records(&self) -> &[BenchmarkRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn threads(&self) -> impl Iterator<Item = u32> + '_ {
        self.records.iter().map(|r| r.threads)
    }

    /// Physical core count implied by the sampling convention: every thread
    /// count from 1 up to twice the core count, plus two extra runs.
    pub fn core_count(&self) -> Result<usize, ReportError> {
        if self.records.len() < 4 {
            return Err(ReportError::dataset(format!(
                "at least 4 measurements are needed to infer the core count, found {}",
                self.records.len()
            )));
        }
        Ok((self.records.len() - 2) / 2)
    }
}

fn validate(
    events: u64,
    records: &[BenchmarkRecord],
    events_location: &str,
    locate: impl Fn(usize) -> String,
) -> Result<(), ReportError> {
    if events == 0 {
        return Err(ReportError::InvalidMeasurement {
            location: events_location.to_owned(),
            field: "event count",
            value: 0.0,
        });
    }

    let first = records
        .first()
        .ok_or_else(|| ReportError::dataset("no measurements"))?;

    for (i, record) in records.iter().enumerate() {
        if let Err((field, value)) = record.check() {
            return Err(ReportError::InvalidMeasurement {
                location: locate(i),
                field,
                value,
            });
        }
    }

    if first.threads != 1 {
        return Err(ReportError::dataset(format!(
            "{}: first measurement must use 1 thread, found {}",
            locate(0),
            first.threads
        )));
    }

    for (i, pair) in records.windows(2).enumerate() {
        if pair[1].threads < pair[0].threads {
            return Err(ReportError::dataset(format!(
                "{}: thread count decreases from {} to {}",
                locate(i + 1),
                pair[0].threads,
                pair[1].threads
            )));
        }
    }

    Ok(())
}
