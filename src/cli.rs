//! Command-line interface for Dicta
//!
//! Handles argument parsing and logging configuration.

use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

/// Dicta - Voice memo recorder and playback application
#[derive(Parser, Debug)]
#[command(name = "dicta")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Increase logging verbosity
    /// -v = info, -vv = debug, -vvv = trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Directory where recordings are stored
    #[arg(long)]
    pub recordings_dir: Option<PathBuf>,
}

impl Args {
    /// Get the log level filter based on verbosity flags
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else {
            match self.verbose {
                0 => LevelFilter::Warn,
                1 => LevelFilter::Info,
                2 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            }
        }
    }
}

/// Initialize the logging system based on CLI arguments
pub fn init_logging(args: &Args) {
    let mut builder = env_logger::Builder::new();

    // Base level for all modules - keep at warn to suppress noisy deps
    builder.filter_level(LevelFilter::Warn);

    // Set dicta modules to requested verbosity level
    builder.filter_module("dicta", args.log_level());

    builder.format_timestamp_millis().init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_wins_over_verbose() {
        let args = Args {
            verbose: 3,
            quiet: true,
            recordings_dir: None,
        };
        assert_eq!(args.log_level(), LevelFilter::Error);
    }

    #[test]
    fn test_verbosity_mapping() {
        for (count, expected) in [
            (0, LevelFilter::Warn),
            (1, LevelFilter::Info),
            (2, LevelFilter::Debug),
            (3, LevelFilter::Trace),
        ] {
            let args = Args {
                verbose: count,
                quiet: false,
                recordings_dir: None,
            };
            assert_eq!(args.log_level(), expected);
        }
    }
}
