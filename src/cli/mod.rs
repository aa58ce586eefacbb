use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod scan;
mod selftest;

/// bmrbscan - BMRB labeling and assignment-strategy scanner
#[derive(Parser)]
#[command(name = "bmrbscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for per-entry diagnostics, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan selected entries and group them by assignment strategy
    Scan {
        /// Entry id ranges like `100-1000,12345`; empty selects the whole
        /// universe
        #[arg(value_name = "IDS")]
        ids: Vec<String>,

        /// File listing all known entry ids, one per line
        #[arg(short, long, value_name = "FILE", default_value = "all_entries.txt")]
        universe: PathBuf,

        /// Directory holding NMR-STAR records named `bmr<id>_3.str`
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        store: PathBuf,

        /// Directory receiving the per-strategy id files
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,
    },

    /// Parse three reference labeling descriptors and print each decision
    SelfTest,
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let verbose = cli.verbose > 0;
    match cli.command {
        Commands::Scan {
            ids,
            universe,
            store,
            out_dir,
        } => scan::run(&ids, &universe, &store, &out_dir, verbose),
        Commands::SelfTest => selftest::run(),
    }
}
