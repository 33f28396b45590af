use std::fs::File;
use std::path::Path;

use anyhow::Context;
use log::{LevelFilter, SetLoggerError};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode, WriteLogger};

/// Map `-v` occurrences to a level, warnings are always shown.
pub fn level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Log to stderr so stdout only carries the requested data.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    TermLogger::init(
        level,
        ConfigBuilder::default().build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
}

/// Log to a file, for when the terminal belongs to the dashboard.
pub fn init_file(level: LevelFilter, path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("couldn't create log file {}", path.display()))?;
    WriteLogger::init(level, ConfigBuilder::default().build(), file)
        .context("initialize file logger")
}
