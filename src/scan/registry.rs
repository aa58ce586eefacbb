//! Per-strategy membership and the final report.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[cfg(feature = "colorized_output")]
use console::style;

/// Strategy tags with their member entries, accumulated over one scan.
///
/// Tags iterate alphabetically; each tag's id list keeps accumulation
/// order, which is the scan's iteration order over the selection.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StrategyRegistry {
    groups: BTreeMap<String, Vec<u32>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `id` to the tag's member list.
    pub fn record(&mut self, tag: impl Into<String>, id: u32) {
        self.groups.entry(tag.into()).or_default().push(id);
    }

    /// Number of distinct tags seen.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of recorded entries across all tags.
    pub fn total(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Member ids recorded under `tag`, in accumulation order.
    pub fn members(&self, tag: &str) -> Option<&[u32]> {
        self.groups.get(tag).map(Vec::as_slice)
    }

    /// Tags with their member lists, alphabetically by tag.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u32])> {
        self.groups
            .iter()
            .map(|(tag, ids)| (tag.as_str(), ids.as_slice()))
    }

    /// Writes one `<tag>.txt` per tag under `dir`, one id per line, in
    /// accumulation order. Returns the written paths.
    pub fn write_files(&self, dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.groups.len());
        for (tag, ids) in &self.groups {
            let path = dir.join(format!("{tag}.txt"));
            let mut out = BufWriter::new(File::create(&path)?);
            for id in ids {
                writeln!(out, "{id}")?;
            }
            out.flush()?;
            written.push(path);
        }
        Ok(written)
    }

    /// Colorized rendering of the per-tag count lines.
    #[cfg(feature = "colorized_output")]
    pub fn format_colored(&self) -> String {
        use fmt::Write as _;

        let mut out = String::new();
        for (tag, ids) in &self.groups {
            let _ = writeln!(
                out,
                "{} : {}",
                style(format!("{tag:>30}")).bold(),
                style(ids.len()).cyan()
            );
        }
        out
    }
}

impl fmt::Display for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (tag, ids) in &self.groups {
            writeln!(f, "{:>30} : {}", tag, ids.len())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StrategyRegistry {
        let mut registry = StrategyRegistry::new();
        registry.record("Natural_1H", 15020);
        registry.record("Labeled_15N", 15000);
        registry.record("Natural_1H", 15010);
        registry
    }

    #[test]
    fn counts_and_membership() {
        let registry = sample();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.total(), 3);
        assert_eq!(registry.members("Natural_1H"), Some(&[15020, 15010][..]));
        assert_eq!(registry.members("NoAssignment"), None);
    }

    #[test]
    fn iterates_alphabetically_keeping_accumulation_order() {
        let registry = sample();
        let seen: Vec<(&str, &[u32])> = registry.iter().collect();
        assert_eq!(
            seen,
            vec![
                ("Labeled_15N", &[15000][..]),
                ("Natural_1H", &[15020, 15010][..]),
            ]
        );
    }

    #[test]
    fn report_lines_are_sorted_by_tag() {
        let text = sample().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Labeled_15N : 1"));
        assert!(lines[1].ends_with("Natural_1H : 2"));
    }

    #[test]
    fn writes_one_file_per_tag_in_accumulation_order() {
        let dir = tempfile::tempdir().unwrap();
        let written = sample().write_files(dir.path()).unwrap();
        assert_eq!(written.len(), 2);

        let natural = std::fs::read_to_string(dir.path().join("Natural_1H.txt")).unwrap();
        assert_eq!(natural, "15020\n15010\n");
        let labeled = std::fs::read_to_string(dir.path().join("Labeled_15N.txt")).unwrap();
        assert_eq!(labeled, "15000\n");
    }
}
