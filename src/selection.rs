//! Expansion of compact entry-id range selections.
//!
//! A selection is a sequence of tokens like `30`, `30-40` or `30-40,50-60`,
//! with whitespace allowed around numbers, commas and dashes. Malformed
//! tokens are dropped with a warning and never abort a scan.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;

/// Full-match grammar for one selection token.
static RANGE_SPEC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\s*-\s*\d+)?(\s*,\s*\d+(\s*-\s*\d+)?)*$").unwrap());

/// Expands selection tokens into entry ids, in input order.
///
/// Duplicates are kept; [`select`] is the deduplicating step. A token that
/// fails the grammar is skipped whole, and a malformed dash piece inside an
/// accepted token is skipped on its own while the rest of the token is
/// still processed. A reversed range like `40-30` expands to nothing.
pub fn expand<S: AsRef<str>>(tokens: &[S]) -> Vec<u32> {
    let mut ids = Vec::new();
    for token in tokens {
        let token = token.as_ref().trim();
        if !RANGE_SPEC.is_match(token) {
            warn!("wrong entry range specification: '{token}'");
            continue;
        }
        for piece in token.split(',') {
            let parts: Vec<&str> = piece.split('-').map(str::trim).collect();
            match parts.as_slice() {
                [single] => match single.parse::<u32>() {
                    Ok(id) => ids.push(id),
                    Err(_) => warn!("wrong entry id '{single}' in '{token}'"),
                },
                [first, last] => match (first.parse::<u32>(), last.parse::<u32>()) {
                    (Ok(first), Ok(last)) => {
                        debug!("adding range {first} - {last}");
                        ids.extend(first..=last);
                    }
                    _ => warn!("wrong entry range '{piece}' in '{token}'"),
                },
                _ => warn!("wrong entry range piece '{piece}' in '{token}'"),
            }
        }
    }
    ids
}

/// Sorted, deduplicated intersection of the universe with an expanded
/// selection.
pub fn select<S: AsRef<str>>(universe: &[u32], tokens: &[S]) -> Vec<u32> {
    let universe: BTreeSet<u32> = universe.iter().copied().collect();
    let expanded: BTreeSet<u32> = expand(tokens).into_iter().collect();
    universe.intersection(&expanded).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn expands_singles_and_ranges() {
        assert_eq!(expand(&["30"]), vec![30]);
        let ids = expand(&["30-40,50-60"]);
        assert_eq!(ids.len(), 22);
        assert!(ids.contains(&30) && ids.contains(&40));
        assert!(ids.contains(&50) && ids.contains(&60));
    }

    #[test]
    fn keeps_input_order_and_duplicates() {
        assert_eq!(expand(&["5,3-4,3"]), vec![5, 3, 4, 3]);
    }

    #[test]
    fn allows_whitespace_around_numbers_commas_and_dashes() {
        assert_eq!(expand(&[" 30 - 32 , 40 "]), vec![30, 31, 32, 40]);
    }

    #[test]
    fn rejects_malformed_tokens_whole() {
        assert_eq!(expand(&["abc"]), Vec::<u32>::new());
        assert_eq!(expand(&["12abc"]), Vec::<u32>::new());
        assert_eq!(expand(&["30-40-50"]), Vec::<u32>::new());
        // a bad token does not poison its neighbors
        assert_eq!(expand(&["abc", "7"]), vec![7]);
    }

    #[test]
    fn reversed_range_is_empty() {
        assert_eq!(expand(&["40-30"]), Vec::<u32>::new());
        assert_eq!(expand(&["40-30,5"]), vec![5]);
    }

    #[test]
    fn select_intersects_sorted_unique() {
        assert_eq!(select(&[1, 2, 3], &["2-5"]), vec![2, 3]);
        assert_eq!(select(&[9, 7, 8, 7], &["1-100,8"]), vec![7, 8, 9]);
    }

    #[test]
    fn select_with_no_tokens_is_empty() {
        let no_tokens: &[&str] = &[];
        assert_eq!(select(&[1, 2, 3], no_tokens), Vec::<u32>::new());
    }

    proptest! {
        #[test]
        fn select_is_sorted_unique_and_within_universe(
            universe in proptest::collection::vec(0u32..2000, 0..100),
            lo in 0u32..2000,
            hi in 0u32..2000,
        ) {
            let picked = select(&universe, &[format!("{lo}-{hi}")]);
            prop_assert!(picked.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(picked.iter().all(|id| universe.contains(id)));
            prop_assert!(picked.iter().all(|id| (lo..=hi).contains(id)));
        }
    }
}
