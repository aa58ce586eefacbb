use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use bmrbscan::scan::Scanner;
use bmrbscan::selection;
use bmrbscan::star::{load_universe, DirStore};

/// Scan selected entries and group them by assignment strategy
pub fn run(
    ids: &[String],
    universe: &Path,
    store_dir: &Path,
    out_dir: &Path,
    verbose: bool,
) -> Result<()> {
    let all_ids = load_universe(universe)
        .with_context(|| format!("Failed to load universe file {}", universe.display()))?;
    println!("{} entries are in BMRB", all_ids.len());

    let selected = if ids.is_empty() {
        all_ids
    } else {
        selection::select(&all_ids, ids)
    };
    println!("{} BMRB entries selected", selected.len());

    let store = DirStore::new(store_dir);
    let mut scanner = Scanner::new(&store);
    if verbose {
        scanner = scanner.with_diagnostics(io::stdout());
    }
    let registry = scanner.run(&selected).context("Scan failed")?;

    println!("BMRB scan finished");
    #[cfg(feature = "colorized_output")]
    print!("{}", registry.format_colored());

    #[cfg(not(feature = "colorized_output"))]
    print!("{registry}");

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;
    let written = registry
        .write_files(out_dir)
        .with_context(|| format!("Failed to write strategy files under {}", out_dir.display()))?;
    info!("{} strategy files written", written.len());

    Ok(())
}
