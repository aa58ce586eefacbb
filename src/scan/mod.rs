//! The batch driver: per-entry record views and strategy aggregation.
//!
//! [`Scanner`] walks a selected id sequence, fetches each record from an
//! [`EntryStore`], unions the labeling of the entry's polypeptide sample
//! components, extracts the nuclei with reported chemical shifts and
//! records the resulting strategy tag in a [`StrategyRegistry`].
//!
//! Per-entry diagnostic lines go to an explicit sink owned by the
//! scanner, defaulting to [`std::io::sink`]; warnings and debug notes use
//! the `log` facade.

mod registry;

pub use registry::StrategyRegistry;

use std::io::{self, Write};
use std::sync::LazyLock;

use regex::Regex;

use crate::labeling::{self, NucleusSet};
use crate::star::{Entry, EntryStore, StarError};
use crate::strategy::{self, TAG_NOT_A_POLYPEPTIDE};

const COMPONENT_NAME: &str = "_Sample_component.Mol_common_name";
const COMPONENT_ENTITY_ID: &str = "_Sample_component.Entity_ID";
const COMPONENT_LABELING: &str = "_Sample_component.Isotopic_labeling";
const COMPONENT_CONCENTRATION: &str = "_Sample_component.Concentration_val";
const COMPONENT_UNITS: &str = "_Sample_component.Concentration_val_units";

const DATUM_TYPE: &str = "_Datum.Type";
const DATUM_COUNT: &str = "_Datum.Count";

/// Datum types like `15N chemical shifts`; the suffix is case-sensitive.
static SHIFTS_DATUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<nuc>\d+[A-Za-z]+)\s+chemical shifts").unwrap());

/// Entity polymer types counting as polypeptide.
static POLYPEPTIDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[Pp]olypeptide\(L\)").unwrap());

/// Errors raised while classifying entries.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Record access or parse failure
    #[error("record access error: {0}")]
    Star(#[from] StarError),

    /// Positionally paired tag lists of different lengths
    #[error("tag list length mismatch: {tag} has {actual} values, expected {expected}")]
    TagListMismatch {
        tag: String,
        expected: usize,
        actual: usize,
    },

    /// Diagnostic sink failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// One `_Sample_component` row, assembled from the per-tag value lists.
///
/// The five lists pair positionally; [`sample_components`] validates that
/// they are equally long instead of truncating to the shortest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleComponent {
    pub name: String,
    /// `None` when the record holds the `.` placeholder.
    pub entity_id: Option<String>,
    pub labeling: String,
    pub concentration: String,
    pub units: String,
}

/// One `_Datum` summary row: a data category and its count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datum {
    pub kind: String,
    pub count: String,
}

/// Assembles the entry's sample components from the `_Sample_component`
/// tag lists.
pub fn sample_components(entry: &Entry) -> Result<Vec<SampleComponent>, ScanError> {
    let names = entry.get_tag(COMPONENT_NAME);
    let entity_ids = aligned(entry, COMPONENT_ENTITY_ID, names.len())?;
    let labeling = aligned(entry, COMPONENT_LABELING, names.len())?;
    let concentrations = aligned(entry, COMPONENT_CONCENTRATION, names.len())?;
    let units = aligned(entry, COMPONENT_UNITS, names.len())?;

    let mut components = Vec::with_capacity(names.len());
    for i in 0..names.len() {
        components.push(SampleComponent {
            name: names[i].to_string(),
            entity_id: normalize_id(entity_ids[i]),
            labeling: labeling[i].to_string(),
            concentration: concentrations[i].to_string(),
            units: units[i].to_string(),
        });
    }
    Ok(components)
}

/// Assembles the entry's `_Datum` summary rows.
pub fn datum_summary(entry: &Entry) -> Result<Vec<Datum>, ScanError> {
    let kinds = entry.get_tag(DATUM_TYPE);
    let counts = aligned(entry, DATUM_COUNT, kinds.len())?;
    Ok(kinds
        .iter()
        .zip(&counts)
        .map(|(kind, count)| Datum {
            kind: kind.to_string(),
            count: count.to_string(),
        })
        .collect())
}

/// The nucleus named by a datum type like `15N chemical shifts`, if any.
pub fn shift_nucleus(datum_type: &str) -> Option<&str> {
    SHIFTS_DATUM
        .captures(datum_type)
        .and_then(|found| found.name("nuc"))
        .map(|m| m.as_str())
}

/// Whether the entry has an entity saveframe for `entity_id` describing a
/// polypeptide polymer.
///
/// A saveframe missing any of the `ID`, `Type` or `Polymer_type` tags
/// simply does not qualify; that is not an error.
pub fn is_polypeptide_entity(entry: &Entry, entity_id: &str) -> bool {
    entry.saveframes_by_category("entity").iter().any(|frame| {
        match (frame.tag("ID"), frame.tag("Type"), frame.tag("Polymer_type")) {
            (Some(id), Some(kind), Some(polymer_type)) => {
                id == entity_id && kind == "polymer" && POLYPEPTIDE.is_match(polymer_type)
            }
            _ => false,
        }
    })
}

fn aligned<'e>(entry: &'e Entry, tag: &str, expected: usize) -> Result<Vec<&'e str>, ScanError> {
    let values = entry.get_tag(tag);
    if values.len() != expected {
        return Err(ScanError::TagListMismatch {
            tag: tag.to_string(),
            expected,
            actual: values.len(),
        });
    }
    Ok(values)
}

fn normalize_id(raw: &str) -> Option<String> {
    let id = raw.trim();
    (!id.is_empty() && id != ".").then(|| id.to_string())
}

/// Drives the classification batch over a selected id sequence.
pub struct Scanner<'s, S: EntryStore> {
    store: &'s S,
    diag: Box<dyn Write + 's>,
}

impl<'s, S: EntryStore> Scanner<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            diag: Box::new(io::sink()),
        }
    }

    /// Routes per-entry diagnostic lines to `sink` instead of discarding
    /// them.
    pub fn with_diagnostics(mut self, sink: impl Write + 's) -> Self {
        self.diag = Box::new(sink);
        self
    }

    /// Classifies every id in order and returns the accumulated registry.
    pub fn run(&mut self, ids: &[u32]) -> Result<StrategyRegistry, ScanError> {
        let mut registry = StrategyRegistry::new();
        for &id in ids {
            let entry = self.store.fetch(id)?;
            let tag = self.classify_entry(id, &entry)?;
            registry.record(tag, id);
            writeln!(self.diag, "----")?;
        }
        Ok(registry)
    }

    /// Classifies one fetched entry, writing its diagnostic lines.
    pub fn classify_entry(&mut self, id: u32, entry: &Entry) -> Result<String, ScanError> {
        let mut labeled = NucleusSet::new();
        let mut polypeptide = false;
        for component in sample_components(entry)? {
            let Some(entity_id) = &component.entity_id else {
                continue;
            };
            if is_polypeptide_entity(entry, entity_id) {
                polypeptide = true;
                writeln!(
                    self.diag,
                    "bmr{id} LABEL: {} : {}, {} {}",
                    component.name, component.labeling, component.concentration, component.units
                )?;
                labeled.extend(labeling::parse_labeling(&component.labeling));
            }
        }
        if !polypeptide {
            writeln!(self.diag, "bmr{id}: SKIP, not a polypeptide")?;
            return Ok(TAG_NOT_A_POLYPEPTIDE.to_string());
        }

        let mut shifts = NucleusSet::new();
        for datum in datum_summary(entry)? {
            writeln!(self.diag, "bmr{id} DATA : {} : {}", datum.kind, datum.count)?;
            if let Some(nucleus) = shift_nucleus(&datum.kind) {
                shifts.insert(nucleus.to_string());
            }
        }

        let tag = strategy::classify(&labeled, &shifts);
        writeln!(self.diag, "bmr{id} TYPE : {tag}")?;
        Ok(tag)
    }
}
