// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Turns the output of a thread-scaling benchmark into two charts: analysis
//! rate against thread count, and memory usage against thread count.

mod config;
mod dataset;
mod display;
mod error;
mod metrics;
mod report;

pub use crate::config::{Chart, Config, Memory, Rates, NAME, VERSION};
pub use crate::dataset::{BenchmarkDataset, BenchmarkRecord, DEFAULT_INPUT};
pub use crate::error::ReportError;
pub use crate::metrics::{DerivedMetrics, FitRange, LinearFit, Markers, MemoryUsage, Throughput};
pub use crate::report::Report;
