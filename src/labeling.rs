//! Parsing of free-text isotope-labeling descriptors.
//!
//! Sample components carry descriptors like `[U-100% 13C; U-100% 15N;
//! 80% 2H]`. Each `,`/`;`-separated block names at most one labeled
//! nucleus; blocks like `unlabeled` or `natural abundance` name none, which
//! is a normal outcome rather than an error.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// A set of nucleus tokens such as `13C` or `15N`.
pub type NucleusSet = BTreeSet<String>;

/// Anchored prefix of one labeling block: optional uniformity marker,
/// optional enrichment percentage, then a recognized nucleus. Trailing
/// text is ignored.
static LABELED_NUCLEUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:U-)?(?:\d+%)?\s*(?P<nuc>13C|15N|2H|17O)").unwrap());

/// Block separator: `,` or `;`, each optionally followed by whitespace.
static BLOCK_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,;]\s*").unwrap());

/// Splits a descriptor into its blocks and the nucleus each one names, if
/// any, in block order.
///
/// At most one leading `[` and one trailing `]` are stripped first; the
/// brackets are optional and independent of each other.
pub fn labeling_blocks(descriptor: &str) -> Vec<(String, Option<String>)> {
    let inner = descriptor.strip_prefix('[').unwrap_or(descriptor);
    let inner = inner.strip_suffix(']').unwrap_or(inner);
    BLOCK_SEPARATOR
        .split(inner)
        .map(|block| {
            let block = block.trim();
            let nucleus = LABELED_NUCLEUS
                .captures(block)
                .map(|found| found["nuc"].to_string());
            (block.to_string(), nucleus)
        })
        .collect()
}

/// Extracts the set of labeled nuclei from one descriptor.
pub fn parse_labeling(descriptor: &str) -> NucleusSet {
    labeling_blocks(descriptor)
        .into_iter()
        .filter_map(|(_, nucleus)| nucleus)
        .collect()
}
