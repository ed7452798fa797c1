// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to read {path}: {source}")]
    Input {
        path: String,
        source: std::io::Error,
    },
    #[error("{location}: {reason}")]
    Parse { location: String, reason: String },
    #[error("{location}: invalid {field}: {value}")]
    InvalidMeasurement {
        location: String,
        field: &'static str,
        value: f64,
    },
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),
    #[error("failed to write {path}: {reason}")]
    Output { path: String, reason: String },
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Usage(#[from] clap::Error),
}

impl ReportError {
    pub(crate) fn parse(location: impl Into<String>, reason: impl Into<String>) -> Self {
        ReportError::Parse {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn dataset(reason: impl Into<String>) -> Self {
        ReportError::InvalidDataset(reason.into())
    }
}
