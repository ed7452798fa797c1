// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::dataset::DEFAULT_INPUT;
use crate::error::ReportError;
use crate::metrics::FitRange;

use clap::{App, Arg, ArgMatches};
use logger::*;
use serde_derive::*;

use std::ffi::OsString;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    general: General,
    #[serde(default)]
    rates: Rates,
    #[serde(default)]
    memory: Memory,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(remote = "Level")]
#[serde(rename_all = "lowercase")]
enum LevelDef {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn default_input() -> String {
    DEFAULT_INPUT.to_string()
}

fn default_logging_level() -> Level {
    Level::Info
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct General {
    #[serde(default = "default_input")]
    input: String,
    #[serde(with = "LevelDef")]
    #[serde(default = "default_logging_level")]
    logging: Level,
    #[serde(default)]
    show: bool,
}

impl Default for General {
    fn default() -> Self {
        Self {
            input: default_input(),
            logging: default_logging_level(),
            show: false,
        }
    }
}

/// Output settings shared by both charts.
pub trait Chart {
    fn file(&self) -> &str;
    fn title(&self) -> &str;
    fn size(&self) -> (u32, u32);
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct Rates {
    file: String,
    title: String,
    width: u32,
    height: u32,
}

impl Default for Rates {
    fn default() -> Self {
        Self {
            file: "benchmark-rates.pdf".to_string(),
            title: "Parallel Analysis Performance Scaling".to_string(),
            width: 1080,
            height: 720,
        }
    }
}

impl Chart for Rates {
    fn file(&self) -> &str {
        &self.file
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct Memory {
    file: String,
    title: String,
    width: u32,
    height: u32,
    fit: FitRange,
}

impl Default for Memory {
    fn default() -> Self {
        Self {
            file: "benchmark-memusage.pdf".to_string(),
            title: "Parallel Analysis Memory Usage".to_string(),
            width: 1080,
            height: 720,
            fit: FitRange::Full,
        }
    }
}

impl Chart for Memory {
    fn file(&self) -> &str {
        &self.file
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Memory {
    pub fn fit(&self) -> FitRange {
        self.fit
    }
}

fn app() -> App<'static, 'static> {
    App::new(NAME)
        .version(VERSION)
        .about("Plot analysis rate and memory usage against thread count")
        .arg(
            Arg::with_name("input")
                .value_name("INPUT")
                .help("Benchmark report to read [default: benchmark.out]")
                .index(1),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("FILE")
                .help("TOML config file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("fit-range")
                .long("fit-range")
                .value_name("full|cores|N")
                .help("Leading measurements used for the memory fit")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("show")
                .long("show")
                .help("Open the charts in the default viewer once written"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Increase verbosity by one level. Can be used more than once")
                .multiple(true),
        )
}

impl Config {
    /// parse command line options and return `Config`
    pub fn new() -> Result<Config, ReportError> {
        Self::from_args(std::env::args_os())
    }

    /// parse the given arguments, the first being the program name
    pub fn from_args<I, T>(args: I) -> Result<Config, ReportError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = app().get_matches_from_safe(args)?;
        Self::from_matches(&matches)
    }

    fn from_matches(matches: &ArgMatches) -> Result<Config, ReportError> {
        let mut config = if let Some(file) = matches.value_of("config") {
            Config::load_from_file(file)?
        } else {
            Default::default()
        };

        if let Some(input) = matches.value_of("input") {
            config.general.input = input.to_string();
        }

        if let Some(fit) = matches.value_of("fit-range") {
            config.memory.fit = fit.parse()?;
        }

        if matches.is_present("show") {
            config.general.show = true;
        }

        match matches.occurrences_of("verbose") {
            0 => {}
            1 => config.general.logging = Level::Debug,
            _ => config.general.logging = Level::Trace,
        }

        Ok(config)
    }

    pub fn load_from_file(filename: &str) -> Result<Config, ReportError> {
        let content = std::fs::read_to_string(filename).map_err(|source| ReportError::Input {
            path: filename.to_string(),
            source,
        })?;
        Self::load_from_str(filename, &content)
    }

    pub fn load_from_str(name: &str, content: &str) -> Result<Config, ReportError> {
        toml::from_str(content).map_err(|e| ReportError::Config(format!("{}: {}", name, e)))
    }

    /// path of the benchmark report
    pub fn input(&self) -> &str {
        &self.general.input
    }

    /// get logging level
    pub fn logging(&self) -> Level {
        self.general.logging
    }

    /// open the charts once written
    pub fn show(&self) -> bool {
        self.general.show
    }

    pub fn fit_range(&self) -> FitRange {
        self.memory.fit
    }

    pub fn rates(&self) -> &Rates {
        &self.rates
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn print(&self) {
        info!("-----");
        info!("Config: Input: {}", self.input());
        info!(
            "Config: Rates: {} ({}x{})",
            self.rates.file(),
            self.rates.width,
            self.rates.height
        );
        info!(
            "Config: Memory: {} ({}x{}) Fit: {}",
            self.memory.file(),
            self.memory.width,
            self.memory.height,
            self.memory.fit
        );
        info!("Config: Show: {}", self.show());
    }
}
