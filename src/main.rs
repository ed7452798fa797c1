// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use benchplot::{Config, Report, ReportError, VERSION};
use logger::*;

fn main() {
    let config = match Config::new() {
        Ok(config) => config,
        Err(ReportError::Usage(e)) => e.exit(),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    Logger::new()
        .label("benchplot")
        .level(config.logging())
        .init()
        .expect("Failed to initialize logger");

    info!("benchplot {} initializing...", VERSION);
    config.print();

    if let Err(e) = Report::generate(&config) {
        fatal!("{}", e);
    }
}
