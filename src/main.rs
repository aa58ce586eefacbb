//! Command-line front end for the BMRB assignment-strategy scanner.
//!
//! ## Usage
//!
//! ```bash
//! # Classify a selection of entries against a local BMRB mirror
//! bmrbscan scan 15000-15100,16500 --universe all_entries.txt --store str/
//!
//! # Run the fixed labeling-parser self-test
//! bmrbscan self-test
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
