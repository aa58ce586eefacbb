//! Minimal in-memory model of an NMR-STAR entry.
//!
//! Covers only what classification needs: saveframes with free tags and
//! `loop_` tables, entry-wide tag lookup, and lookup of saveframes by
//! category. The reader in [`parse`](self) is deliberately lenient;
//! constructs outside this subset are skipped without error.

mod parse;
mod store;

pub use store::{load_universe, DirStore, EntryStore};

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

/// Errors raised by the record reader and the entry store.
#[derive(Debug, thiserror::Error)]
pub enum StarError {
    /// I/O error reading a record or the universe file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Structural error in a record file
    #[error("syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// No record file for the requested entry
    #[error("entry {id} not found at {path}")]
    EntryNotFound { id: u32, path: String },

    /// Non-numeric line in the id universe file
    #[error("universe file line {line} is not an entry id: '{text}'")]
    InvalidUniverseLine { line: usize, text: String },
}

/// One `loop_` table: column tags and rows of cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Loop {
    pub tags: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Loop {
    /// Values of the column `name` (full tag name, case-insensitive), top
    /// to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let index = self
            .tags
            .iter()
            .position(|tag| tag.eq_ignore_ascii_case(name))?;
        Some(
            self.rows
                .iter()
                .filter_map(|row| row.get(index).map(String::as_str))
                .collect(),
        )
    }
}

/// A named saveframe with its free tags and loops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Saveframe {
    pub name: String,
    pub tags: Vec<(String, String)>,
    pub loops: Vec<Loop>,
}

impl Saveframe {
    /// First free-tag value whose local name (the part after the `.`)
    /// matches `name` case-insensitively.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.iter().find_map(|(tag, value)| {
            let local = tag.rsplit('.').next().unwrap_or(tag);
            local.eq_ignore_ascii_case(name).then_some(value.as_str())
        })
    }

    /// The saveframe category, from its `Sf_category` tag.
    pub fn category(&self) -> Option<&str> {
        self.tag("Sf_category")
    }
}

/// One parsed entry: the `data_` block name and its saveframes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub saveframes: Vec<Saveframe>,
}

impl Entry {
    /// Parses an entry from NMR-STAR text.
    pub fn parse(text: &str) -> Result<Self, StarError> {
        parse::parse_entry(Cursor::new(text))
    }

    /// Reads and parses an entry from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StarError> {
        let file = File::open(path)?;
        parse::parse_entry(BufReader::new(file))
    }

    /// Reads and parses an entry from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, StarError> {
        parse::parse_entry(reader)
    }

    /// Every value of `tag` (full name, case-insensitive) across the
    /// whole entry in document order, free tags and loop columns alike.
    pub fn get_tag(&self, tag: &str) -> Vec<&str> {
        let mut values = Vec::new();
        for frame in &self.saveframes {
            for (name, value) in &frame.tags {
                if name.eq_ignore_ascii_case(tag) {
                    values.push(value.as_str());
                }
            }
            for table in &frame.loops {
                if let Some(column) = table.column(tag) {
                    values.extend(column);
                }
            }
        }
        values
    }

    /// Saveframes whose `Sf_category` tag equals `category`.
    pub fn saveframes_by_category(&self, category: &str) -> Vec<&Saveframe> {
        self.saveframes
            .iter()
            .filter(|frame| {
                frame
                    .category()
                    .is_some_and(|c| c.eq_ignore_ascii_case(category))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_ENTRY: &str = r#"data_15000

save_entry_information
   _Entry.Sf_category   entry_information
   _Entry.ID            15000
   _Entry.Title
;
Solution structure of a test protein
;
   loop_
      _Datum.Type
      _Datum.Count
      '1H chemical shifts'    166
      '15N chemical shifts'   40
   stop_
save_

save_entity_1
   _Entity.Sf_category   entity
   _Entity.ID            1
   _Entity.Type          polymer
   _Entity.Polymer_type  polypeptide(L)
   _Entity.Name          "ubiquitin, human"
save_

save_sample_1
   _Sample.Sf_category   sample
   loop_
      _Sample_component.Mol_common_name
      _Sample_component.Entity_ID
      _Sample_component.Isotopic_labeling
      ubiquitin   1   '[U-100% 15N]'
      DTT         .   'natural abundance'
   stop_
save_
"#;

    #[test]
    fn parses_frames_tags_and_loops() {
        let entry = Entry::parse(SAMPLE_ENTRY).unwrap();
        assert_eq!(entry.name, "15000");
        assert_eq!(entry.saveframes.len(), 3);
        assert_eq!(entry.saveframes[0].name, "entry_information");
        assert_eq!(entry.saveframes[0].loops.len(), 1);
        assert_eq!(entry.saveframes[0].loops[0].rows.len(), 2);
    }

    #[test]
    fn get_tag_collects_free_tags_and_loop_columns() {
        let entry = Entry::parse(SAMPLE_ENTRY).unwrap();
        assert_eq!(entry.get_tag("_Entry.ID"), vec!["15000"]);
        assert_eq!(
            entry.get_tag("_Datum.Type"),
            vec!["1H chemical shifts", "15N chemical shifts"]
        );
        assert_eq!(
            entry.get_tag("_Sample_component.Entity_ID"),
            vec!["1", "."]
        );
        // lookups are case-insensitive
        assert_eq!(entry.get_tag("_datum.count"), vec!["166", "40"]);
        assert!(entry.get_tag("_No.Such_tag").is_empty());
    }

    #[test]
    fn quoted_and_multiline_values_are_read_whole() {
        let entry = Entry::parse(SAMPLE_ENTRY).unwrap();
        let entity = &entry.saveframes[1];
        assert_eq!(entity.tag("Name"), Some("ubiquitin, human"));
        let info = &entry.saveframes[0];
        assert_eq!(
            info.tag("Title"),
            Some("Solution structure of a test protein")
        );
    }

    #[test]
    fn saveframes_are_found_by_category() {
        let entry = Entry::parse(SAMPLE_ENTRY).unwrap();
        let entities = entry.saveframes_by_category("entity");
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].tag("ID"), Some("1"));
        assert_eq!(entities[0].tag("Polymer_type"), Some("polypeptide(L)"));
        assert!(entry.saveframes_by_category("spectral_peak_list").is_empty());
    }

    #[test]
    fn saveframe_tag_lookup_uses_the_local_name() {
        let entry = Entry::parse(SAMPLE_ENTRY).unwrap();
        let entity = &entry.saveframes[1];
        assert_eq!(entity.tag("type"), Some("polymer"));
        assert_eq!(entity.tag("missing"), None);
    }

    #[test]
    fn ragged_loop_is_a_syntax_error() {
        let text = "data_x\nsave_a\n_A.Sf_category cat\nloop_\n_A.One\n_A.Two\nv1 v2 v3\nstop_\nsave_\n";
        let err = Entry::parse(text).unwrap_err();
        assert!(matches!(err, StarError::Syntax { .. }));
    }

    #[test]
    fn unterminated_multiline_value_is_a_syntax_error() {
        let text = "data_x\nsave_a\n_A.Text\n;\nnever closed\n";
        let err = Entry::parse(text).unwrap_err();
        assert!(matches!(err, StarError::Syntax { .. }));
    }
}
