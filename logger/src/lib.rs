// Copyright 2019 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A small stderr logger on top of the `log` facade.
//!
//! Messages at info level and above are tagged with the logger label, while
//! debug and trace messages carry the module path of the call site.

pub use log::{debug, error, info, trace, warn, Level, LevelFilter, SetLoggerError};

use chrono::Local;
use log::{Log, Metadata, Record};

use std::io::Write;

/// Logs at error level and terminates the process with a non-zero status.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)*) => {{
        $crate::error!($($arg)*);
        std::process::exit(1);
    }};
}

pub struct Logger {
    label: String,
    level: Level,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    pub fn new() -> Self {
        Self {
            label: String::new(),
            level: Level::Info,
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Install as the global logger. Fails if a logger is already set.
    pub fn init(self) -> Result<(), SetLoggerError> {
        let filter = self.level.to_level_filter();
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(filter);
        Ok(())
    }

    fn format(&self, record: &Record) -> String {
        let target = if record.level() >= Level::Debug || self.label.is_empty() {
            record.target()
        } else {
            self.label.as_str()
        };
        format!(
            "{} {:<5} [{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            target,
            record.args()
        )
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let stderr = std::io::stderr();
            let mut stderr = stderr.lock();
            let _ = writeln!(stderr, "{}", self.format(record));
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(logger: &Logger, level: Level, target: &str, message: &str) -> String {
        logger.format(
            &Record::builder()
                .level(level)
                .target(target)
                .args(format_args!("{}", message))
                .build(),
        )
    }

    #[test]
    fn info_lines_use_label() {
        let logger = Logger::new().label("benchplot");
        let line = render(&logger, Level::Info, "benchplot::report", "hello");
        assert!(line.ends_with("INFO  [benchplot] hello"), "{}", line);
    }

    #[test]
    fn debug_lines_use_target() {
        let logger = Logger::new().label("benchplot");
        let line = render(&logger, Level::Debug, "benchplot::dataset", "parsed");
        assert!(line.ends_with("DEBUG [benchplot::dataset] parsed"), "{}", line);
    }

    #[test]
    fn level_filters_messages() {
        let logger = Logger::new().level(Level::Warn);
        let warn = Metadata::builder().level(Level::Warn).build();
        let info = Metadata::builder().level(Level::Info).build();
        assert!(logger.enabled(&warn));
        assert!(!logger.enabled(&info));
    }
}
