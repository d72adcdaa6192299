use crate::error::{CliError, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    fmt::{self},
    prelude::*,
};

/// Target of the reference backend's one-event-per-molecule trace output.
const PER_MOLECULE_TARGET: &str = "xscatter::engine::reference";
/// `-v` count at which per-molecule events also reach the console.
const PER_MOLECULE_VERBOSITY: u8 = 4;

/// Maps `-v` occurrences and `--quiet` onto a level filter.
pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Console filter. Per-molecule events of the reference backend are capped at DEBUG until
/// `-vvvv`.
pub fn console_filter(verbosity: u8, quiet: bool) -> Targets {
    let level = level_filter(verbosity, quiet);
    let per_molecule = if verbosity >= PER_MOLECULE_VERBOSITY {
        level
    } else {
        level.min(LevelFilter::DEBUG)
    };
    Targets::new()
        .with_default(level)
        .with_target(PER_MOLECULE_TARGET, per_molecule)
}

/// Installs the global subscriber.
///
/// The console layer is compact and filtered by [`console_filter`]. With `log_file`, a
/// second plain-text layer records every event at the requested level, per-molecule
/// traces included, tagged with the rayon worker that emitted it.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact()
        .with_filter(console_filter(verbosity, quiet));

    let subscriber = tracing_subscriber::registry().with(console_layer);

    match log_file {
        Some(path) => {
            let file = File::create(&path).map_err(CliError::Io)?;
            let file_layer = fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_target(true)
                .with_filter(level_filter(verbosity, quiet));

            subscriber.with(file_layer).init();
            info!(path = %path.display(), "Writing log file.");
        }
        None => subscriber.init(),
    }

    Ok(())
}
