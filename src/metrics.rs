// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Quantities derived from a benchmark dataset.

use crate::dataset::BenchmarkDataset;
use crate::error::ReportError;

use serde_derive::*;

use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

/// Which leading measurements feed the memory fit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "FitRangeDef")]
pub enum FitRange {
    /// every measurement
    Full,
    /// the first `2 * cores - 1` measurements, i.e. before hyperthreading
    /// saturates
    Cores,
    /// an explicit number of leading measurements
    Points(usize),
}

impl Default for FitRange {
    fn default() -> Self {
        FitRange::Full
    }
}

impl FitRange {
    /// Resolve to a number of leading points for `dataset`.
    pub fn points(self, dataset: &BenchmarkDataset) -> Result<usize, ReportError> {
        let points = match self {
            FitRange::Full => dataset.len(),
            FitRange::Cores => 2 * dataset.core_count()? - 1,
            FitRange::Points(n) => n,
        };
        if points < 2 {
            return Err(ReportError::dataset(format!(
                "a linear fit needs at least 2 points, fit range '{}' gives {}",
                self, points
            )));
        }
        if points > dataset.len() {
            return Err(ReportError::dataset(format!(
                "fit range '{}' exceeds the {} available measurements",
                self,
                dataset.len()
            )));
        }
        Ok(points)
    }
}

impl FromStr for FitRange {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(FitRange::Full),
            "cores" => Ok(FitRange::Cores),
            other => other.parse::<usize>().map(FitRange::Points).map_err(|_| {
                ReportError::Config(format!(
                    "fit range must be 'full', 'cores' or a point count, found '{}'",
                    other
                ))
            }),
        }
    }
}

/// Config files may give the fit range as a name or as a bare point count.
#[derive(Deserialize)]
#[serde(untagged)]
enum FitRangeDef {
    Count(usize),
    Name(String),
}

impl TryFrom<FitRangeDef> for FitRange {
    type Error = ReportError;

    fn try_from(value: FitRangeDef) -> Result<Self, Self::Error> {
        match value {
            FitRangeDef::Count(n) => Ok(FitRange::Points(n)),
            FitRangeDef::Name(s) => s.parse(),
        }
    }
}

impl fmt::Display for FitRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FitRange::Full => write!(f, "full"),
            FitRange::Cores => write!(f, "cores"),
            FitRange::Points(n) => write!(f, "{}", n),
        }
    }
}

/// Ordinary least-squares line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearFit {
    slope: f64,
    intercept: f64,
}

impl LinearFit {
    /// Returns `None` with fewer than two points or when every x is equal.
    pub fn least_squares(points: &[(f64, f64)]) -> Option<LinearFit> {
        if points.len() < 2 {
            return None;
        }
        let n = points.len() as f64;
        let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
        let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;
        let sxx: f64 = points.iter().map(|p| (p.0 - mean_x).powi(2)).sum();
        let sxy: f64 = points
            .iter()
            .map(|p| (p.0 - mean_x) * (p.1 - mean_y))
            .sum();
        if sxx == 0.0 {
            return None;
        }
        let slope = sxy / sxx;
        Some(LinearFit {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Analysis rates in events per second.
#[derive(Clone, Debug, PartialEq)]
pub struct Throughput {
    real: Vec<f64>,
    ideal: Vec<f64>,
    efficiency: Vec<f64>,
}

impl Throughput {
    /// The ideal rate scales the single-thread CPU time linearly with the
    /// thread count.
    pub fn derive(dataset: &BenchmarkDataset) -> Self {
        let events = dataset.events() as f64;
        let baseline = dataset.records()[0].cpu_ms();

        let real: Vec<f64> = dataset
            .records()
            .iter()
            .map(|r| 1e3 * events / r.real_ms())
            .collect();
        let ideal: Vec<f64> = dataset
            .threads()
            .map(|threads| 1e3 * events * f64::from(threads) / baseline)
            .collect();
        let efficiency = real
            .iter()
            .zip(ideal.iter())
            .map(|(real, ideal)| 100.0 * real / ideal)
            .collect();

        Self {
            real,
            ideal,
            efficiency,
        }
    }

    pub fn real(&self) -> &[f64] {
        &self.real
    }

    pub fn ideal(&self) -> &[f64] {
        &self.ideal
    }

    /// parallelization efficiency in percent
    pub fn efficiency(&self) -> &[f64] {
        &self.efficiency
    }
}

/// Memory figures in megabytes.
#[derive(Clone, Debug, PartialEq)]
pub struct MemoryUsage {
    measured: Vec<f64>,
    naive: Vec<f64>,
    fit: LinearFit,
    fit_points: usize,
}

impl MemoryUsage {
    pub fn derive(dataset: &BenchmarkDataset, range: FitRange) -> Result<Self, ReportError> {
        let measured: Vec<f64> = dataset
            .records()
            .iter()
            .map(|r| r.memory_bytes() / 1e6)
            .collect();
        // as if each thread were an independent process sharing nothing
        let naive = dataset
            .threads()
            .map(|threads| measured[0] * f64::from(threads))
            .collect();

        let fit_points = range.points(dataset)?;
        let points: Vec<(f64, f64)> = dataset
            .threads()
            .map(f64::from)
            .zip(measured.iter().copied())
            .take(fit_points)
            .collect();
        let fit = LinearFit::least_squares(&points).ok_or_else(|| {
            ReportError::dataset(format!(
                "the first {} measurements all use the same thread count, cannot fit memory usage",
                fit_points
            ))
        })?;

        Ok(Self {
            measured,
            naive,
            fit,
            fit_points,
        })
    }

    pub fn measured(&self) -> &[f64] {
        &self.measured
    }

    pub fn naive(&self) -> &[f64] {
        &self.naive
    }

    pub fn fit(&self) -> LinearFit {
        self.fit
    }

    /// number of leading measurements used for the fit
    pub fn fit_points(&self) -> usize {
        self.fit_points
    }
}

/// Positions of the physical core and hyperthread markers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Markers {
    cores: usize,
}

impl Markers {
    pub fn locate(dataset: &BenchmarkDataset) -> Result<Self, ReportError> {
        Ok(Self {
            cores: dataset.core_count()?,
        })
    }

    pub fn cores(&self) -> usize {
        self.cores
    }

    /// index of the measurement at the physical core count
    pub fn cores_index(&self) -> usize {
        self.cores - 1
    }

    /// index of the measurement at the hyperthread count
    pub fn threads_index(&self) -> usize {
        2 * self.cores - 1
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DerivedMetrics {
    throughput: Throughput,
    memory: MemoryUsage,
    markers: Markers,
}

impl DerivedMetrics {
    pub fn derive(dataset: &BenchmarkDataset, range: FitRange) -> Result<Self, ReportError> {
        Ok(Self {
            throughput: Throughput::derive(dataset),
            memory: MemoryUsage::derive(dataset, range)?,
            markers: Markers::locate(dataset)?,
        })
    }

    pub fn throughput(&self) -> &Throughput {
        &self.throughput
    }

    pub fn memory(&self) -> &MemoryUsage {
        &self.memory
    }

    pub fn markers(&self) -> Markers {
        self.markers
    }
}
