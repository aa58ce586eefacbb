//! # bmrbscan - BMRB labeling and assignment-strategy scanner
//!
//! `bmrbscan` partitions selected entries of the BMRB structural-biology
//! database by how they were isotopically labeled versus how their
//! chemical-shift assignments were obtained, and reports per-strategy
//! membership.
//!
//! ## Pipeline
//!
//! - **Selection** ([`selection`]): compact id-range tokens like
//!   `30-40,50-60`, expanded and intersected with the id universe.
//! - **Labeling** ([`labeling`]): free-text isotope-labeling descriptors
//!   like `[U-100% 13C; U-100% 15N; 80% 2H]`, parsed into nucleus sets.
//! - **Strategy** ([`strategy`]): the fixed-priority heuristic combining
//!   labeled nuclei with shift-reported nuclei into one categorical tag.
//! - **Scan** ([`scan`]): the batch driver accumulating per-strategy
//!   membership, the console report and the per-tag id files.
//! - **Records** ([`star`]): a lenient NMR-STAR subset reader and the
//!   entry store the scanner reads from.
//!
//! ## Quick start
//!
//! ```rust
//! use bmrbscan::labeling::{parse_labeling, NucleusSet};
//! use bmrbscan::strategy::classify;
//!
//! let labeled = parse_labeling("[U-100% 13C; U-100% 15N]");
//! let shifts: NucleusSet = ["1H", "15N", "13C"].map(String::from).into();
//! assert_eq!(classify(&labeled, &shifts), "Labeled_15N-13C_Natural_1H");
//! ```

pub mod labeling;
pub mod scan;
pub mod selection;
pub mod star;
pub mod strategy;
