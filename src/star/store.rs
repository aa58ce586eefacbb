//! Filesystem access to entry records and the id universe.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use super::{Entry, StarError};

/// Read-only source of entry records, one per id.
///
/// Failures here abort a scan; the scanner defines no recovery for them.
pub trait EntryStore {
    /// Fetches and parses the record of one entry.
    fn fetch(&self, id: u32) -> Result<Entry, StarError>;
}

/// Store over a directory of `bmr<id>_3.str` files, the layout of a local
/// BMRB mirror.
#[derive(Debug, Clone)]
pub struct DirStore {
    base: PathBuf,
}

impl DirStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Path of the record file for `id`.
    pub fn entry_path(&self, id: u32) -> PathBuf {
        self.base.join(format!("bmr{id}_3.str"))
    }
}

impl EntryStore for DirStore {
    fn fetch(&self, id: u32) -> Result<Entry, StarError> {
        let path = self.entry_path(id);
        let file = File::open(&path).map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                StarError::EntryNotFound {
                    id,
                    path: path.display().to_string(),
                }
            } else {
                StarError::Io(err)
            }
        })?;
        Entry::from_reader(BufReader::new(file))
    }
}

/// Loads the id universe: one positive integer per line, blank lines
/// ignored.
pub fn load_universe(path: impl AsRef<Path>) -> Result<Vec<u32>, StarError> {
    let reader = BufReader::new(File::open(path)?);
    let mut ids = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        let id = text.parse().map_err(|_| StarError::InvalidUniverseLine {
            line: index + 1,
            text: text.to_string(),
        })?;
        ids.push(id);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_ids_and_skips_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "15000\n\n  15010\n15020").unwrap();
        let ids = load_universe(file.path()).unwrap();
        assert_eq!(ids, vec![15000, 15010, 15020]);
    }

    #[test]
    fn non_numeric_line_is_reported_with_its_number() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "15000\nnot-an-id").unwrap();
        let err = load_universe(file.path()).unwrap_err();
        assert!(
            matches!(err, StarError::InvalidUniverseLine { line: 2, ref text } if text == "not-an-id")
        );
    }

    #[test]
    fn missing_record_is_entry_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::new(dir.path());
        let err = store.fetch(404).unwrap_err();
        assert!(matches!(err, StarError::EntryNotFound { id: 404, .. }));
    }

    #[test]
    fn fetch_parses_the_record_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::new(dir.path());
        std::fs::write(
            store.entry_path(15000),
            "data_15000\nsave_info\n_Entry.Sf_category entry_information\n_Entry.ID 15000\nsave_\n",
        )
        .unwrap();
        let entry = store.fetch(15000).unwrap();
        assert_eq!(entry.get_tag("_Entry.ID"), vec!["15000"]);
    }
}
