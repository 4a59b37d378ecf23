use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "job-detector",
    about = "Detects job postings and drives the description panel headlessly"
)]
pub struct Cli {
    /// Page URLs in visit order; the first is loaded, the rest are in-page navigations
    #[arg(short, long = "url", required = true)]
    pub urls: Vec<String>,

    /// Local HTML file used as the first page instead of fetching it
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Time spent on each page before navigating to the next
    #[arg(long, default_value_t = 15_000)]
    pub dwell_ms: u64,

    /// RON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Press continue automatically once the description is fully revealed
    #[arg(long)]
    pub submit: bool,

    /// Read JSON panel commands from stdin, one per line
    #[arg(long)]
    pub commands: bool,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogDestination {
    /// ./detector.log in the current directory
    File,
    /// stderr, keeping stdout for panel output
    Terminal,
    Both,
}
