//! The fixed-priority assignment-strategy heuristic.

use crate::labeling::NucleusSet;

/// Nuclei participating in classification, in fixed priority order.
pub const PRIORITY_NUCLEI: [&str; 3] = ["1H", "15N", "13C"];

/// Tag assigned when no sample component of an entry is a polypeptide.
/// Assigned by the caller; [`classify`] is never invoked for such entries.
pub const TAG_NOT_A_POLYPEPTIDE: &str = "NotAPolypeptide";

/// Tag assigned when no priority nucleus has reported shifts.
pub const TAG_NO_ASSIGNMENT: &str = "NoAssignment";

/// Classifies one polypeptide entry from the nuclei it was labeled with
/// and the nuclei its chemical shifts were reported for.
///
/// Walks [`PRIORITY_NUCLEI`] once: a nucleus with reported shifts counts
/// as "labeled" when it is in `labeled` and as "natural" otherwise.
/// Nuclei without reported shifts are ignored even when labeled. The
/// result is `Labeled_<…>`, `Natural_<…>`, both joined with `_`, or
/// [`TAG_NO_ASSIGNMENT`] when no priority nucleus has shifts at all.
pub fn classify(labeled: &NucleusSet, shifts: &NucleusSet) -> String {
    let mut labeled_part = Vec::new();
    let mut natural_part = Vec::new();
    for nucleus in PRIORITY_NUCLEI {
        if shifts.contains(nucleus) {
            if labeled.contains(nucleus) {
                labeled_part.push(nucleus);
            } else {
                natural_part.push(nucleus);
            }
        }
    }

    let mut tag = String::new();
    if !labeled_part.is_empty() {
        tag.push_str("Labeled_");
        tag.push_str(&labeled_part.join("-"));
    }
    if !natural_part.is_empty() {
        if !tag.is_empty() {
            tag.push('_');
        }
        tag.push_str("Natural_");
        tag.push_str(&natural_part.join("-"));
    }
    if tag.is_empty() {
        tag.push_str(TAG_NO_ASSIGNMENT);
    }
    tag
}
