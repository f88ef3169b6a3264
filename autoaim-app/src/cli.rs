use std::path::PathBuf;

use clap::Parser;

/// Auto-aim perception and target-selection process.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Config files, leftmost taking precedence over later ones.
    pub config_paths: Vec<PathBuf>,

    /// Suppress stdout logging (the session log file is still written).
    #[arg(short = 's', long)]
    pub silent: bool,

    /// Log verbosity. Bare `-v` means `DEBUG`.
    #[arg(
        short = 'v',
        long = "verbose",
        value_name = "LEVEL",
        num_args = 0..=1,
        default_missing_value = "DEBUG",
        default_value = "INFO"
    )]
    pub verbosity: String,
}
