use std::io::{self, Write};

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

static LOGGER: SimpleLogger = SimpleLogger;

/// Writes every enabled record to standard error as `[target] [LEVEL] message`.
pub struct SimpleLogger;

impl SimpleLogger {
    pub fn init(max_level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_logger(&LOGGER)?;
        log::set_max_level(max_level);
        Ok(())
    }
}

/// The level filter selected by the number of `-v` flags on the command line.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

impl Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = writeln!(io::stderr(), "[{}] [{}] {}", record.target(), record.level(),
                             record.args());
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}
