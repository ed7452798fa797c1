// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Rate and memory charts for one benchmark run.

use crate::config::{Chart, Config};
use crate::dataset::BenchmarkDataset;
use crate::display;
use crate::error::ReportError;
use crate::metrics::{DerivedMetrics, FitRange};

use benchgraph::{LineStyle, PlotConfig, COLOURS};
use logger::*;

use std::path::{Path, PathBuf};

const X_DESC: &str = "Number of analysis threads";

pub struct Report {
    dataset: BenchmarkDataset,
    metrics: DerivedMetrics,
}

impl Report {
    pub fn new(dataset: BenchmarkDataset, fit: FitRange) -> Result<Self, ReportError> {
        let metrics = DerivedMetrics::derive(&dataset, fit)?;
        Ok(Self { dataset, metrics })
    }

    /// Load the configured input and derive all metrics.
    pub fn load(config: &Config) -> Result<Self, ReportError> {
        let dataset = BenchmarkDataset::load(config.input())?;
        Self::new(dataset, config.fit_range())
    }

    /// Run the whole pipeline: parse, derive, render and optionally display.
    pub fn generate(config: &Config) -> Result<Self, ReportError> {
        let report = Self::load(config)?;
        report.summary();
        let written = report.render(config)?;
        if config.show() {
            for path in &written {
                display::show(path);
            }
        }
        Ok(report)
    }

    pub fn dataset(&self) -> &BenchmarkDataset {
        &self.dataset
    }

    pub fn metrics(&self) -> &DerivedMetrics {
        &self.metrics
    }

    fn threads(&self) -> Vec<f64> {
        self.dataset.threads().map(f64::from).collect()
    }

    pub fn rates_chart(&self, chart: &dyn Chart) -> PlotConfig {
        let threads = self.threads();
        let throughput = self.metrics.throughput();
        let markers = self.metrics.markers();
        let pairs = |values: &[f64]| -> Vec<(f64, f64)> {
            threads.iter().copied().zip(values.iter().copied()).collect()
        };

        let mut plot = PlotConfig::new();
        plot.caption(chart.title())
            .x_desc(X_DESC)
            .y_desc("Analysis Rate (Hz)")
            .size(chart.size())
            .points("Ideal rate", pairs(throughput.ideal()), COLOURS[0])
            .points("Actual rate", pairs(throughput.real()), COLOURS[1])
            .vline(markers.cores() as f64, LineStyle::Dotted)
            .vline(2.0 * markers.cores() as f64, LineStyle::Dashed);

        for &i in &[markers.cores_index(), markers.threads_index()] {
            plot.annotate(
                (threads[i], throughput.real()[i]),
                format!("{:.1}% eff", throughput.efficiency()[i]),
            );
        }
        plot
    }

    pub fn memory_chart(&self, chart: &dyn Chart) -> PlotConfig {
        let threads = self.threads();
        let memory = self.metrics.memory();
        let fit = memory.fit();
        let cores = self.metrics.markers().cores();
        let pairs = |values: &[f64]| -> Vec<(f64, f64)> {
            threads.iter().copied().zip(values.iter().copied()).collect()
        };

        // the fit is a straight line, its end points are enough
        let first = threads[0];
        let last = threads[threads.len() - 1];
        let fitted = vec![(first, fit.predict(first)), (last, fit.predict(last))];

        let top = memory.measured()[memory.measured().len() - 1] * 1.1;

        let mut plot = PlotConfig::new();
        plot.caption(chart.title())
            .x_desc(X_DESC)
            .y_desc("Memory usage (MB)")
            .size(chart.size())
            .y_range(0.0..top)
            .points(
                "Multiprocess memory usage (est.)",
                pairs(memory.naive()),
                COLOURS[0],
            )
            .points(
                "Multithreaded memory usage (meas.)",
                pairs(memory.measured()),
                COLOURS[1],
            )
            .line("Fit", fitted, COLOURS[2], LineStyle::Dashed)
            .annotate(
                (threads[cores - 1], fit.predict(cores as f64)),
                format!("{:.2} MB/thread", fit.slope()),
            );
        plot
    }

    /// Write both charts. If either fails, charts already written by this
    /// call are removed again.
    pub fn render(&self, config: &Config) -> Result<Vec<PathBuf>, ReportError> {
        let charts = [
            (self.rates_chart(config.rates()), config.rates().file()),
            (self.memory_chart(config.memory()), config.memory().file()),
        ];

        let mut written: Vec<PathBuf> = Vec::with_capacity(charts.len());
        for (plot, file) in charts.iter() {
            let path = Path::new(file);
            if let Err(e) = plot.save(path) {
                for done in written.iter().chain(std::iter::once(&path.to_path_buf())) {
                    let _ = std::fs::remove_file(done);
                }
                return Err(ReportError::Output {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
            info!("wrote {}", path.display());
            written.push(path.to_path_buf());
        }
        Ok(written)
    }

    /// Log the per-thread figures and the memory fit.
    pub fn summary(&self) {
        let throughput = self.metrics.throughput();
        let memory = self.metrics.memory();

        info!("-----");
        info!(
            "Events: {} Measurements: {} Cores: {}",
            self.dataset.events(),
            self.dataset.len(),
            self.metrics.markers().cores()
        );
        info!(
            "{:>7} {:>12} {:>12} {:>7} {:>10} {:>10}",
            "threads", "rate (Hz)", "ideal (Hz)", "eff %", "mem (MB)", "naive (MB)"
        );
        for (i, record) in self.dataset.records().iter().enumerate() {
            info!(
                "{:>7} {:>12.1} {:>12.1} {:>7.1} {:>10.1} {:>10.1}",
                record.threads(),
                throughput.real()[i],
                throughput.ideal()[i],
                throughput.efficiency()[i],
                memory.measured()[i],
                memory.naive()[i]
            );
            debug!(
                "threads: {} init: {} ms analysis: {} ms output: {} ms cpu: {} ms real: {} ms",
                record.threads(),
                record.init_ms(),
                record.analysis_ms(),
                record.output_ms(),
                record.cpu_ms(),
                record.real_ms()
            );
        }
        let fit = memory.fit();
        info!(
            "Memory fit over {} points: {:.2} MB/thread + {:.2} MB",
            memory.fit_points(),
            fit.slope(),
            fit.intercept()
        );
    }
}
