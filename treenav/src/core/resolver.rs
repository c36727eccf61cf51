//! Resolution of user-typed names against the children of one group.
//!
//! Stored names may legally begin with whitespace, which users rarely type.
//! A token that is not an exact child name is retried with one to
//! [`MAX_EXTRA_SPACES`] leading spaces prepended, shortest prefix first.
//!
//! The ceiling is a heuristic, not a property of the container format: a name
//! stored with five or more leading spaces (or with tabs) can only be reached
//! by typing it exactly.

use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Maximum number of spaces prepended while probing.
pub const MAX_EXTRA_SPACES: usize = 4;

/// A set of sibling names that can be probed for membership.
pub trait NameSet {
    fn contains_name(&self, name: &str) -> bool;
}

impl<V> NameSet for BTreeMap<String, V> {
    fn contains_name(&self, name: &str) -> bool {
        self.contains_key(name)
    }
}

impl NameSet for BTreeSet<String> {
    fn contains_name(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl NameSet for HashSet<String> {
    fn contains_name(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl NameSet for [&str] {
    fn contains_name(&self, name: &str) -> bool {
        self.contains(&name)
    }
}

/// Map `token` to the exact stored name among `names`.
///
/// Returns `None` when neither the token nor any of its space-prefixed
/// variants is present.
pub fn resolve<S: NameSet + ?Sized>(token: &str, names: &S) -> Option<String> {
    let mut candidate = token.to_string();
    for _ in 0..=MAX_EXTRA_SPACES {
        if names.contains_name(&candidate) {
            return Some(candidate);
        }
        candidate.insert(0, ' ');
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn exact_match_is_returned_unchanged() {
        let set = names(&["Group1", " Group2"]);
        assert_eq!(resolve("Group1", &set).as_deref(), Some("Group1"));
        assert_eq!(resolve(" Group2", &set).as_deref(), Some(" Group2"));
    }

    #[test]
    fn finds_names_with_up_to_four_leading_spaces() {
        for spaces in 1..=MAX_EXTRA_SPACES {
            let stored = format!("{}field", " ".repeat(spaces));
            let set = names(&[stored.as_str()]);
            assert_eq!(resolve("field", &set), Some(stored));
        }
    }

    #[test]
    fn five_leading_spaces_is_out_of_reach() {
        let set = names(&["     field"]);
        assert_eq!(resolve("field", &set), None);
        assert_eq!(resolve(" field", &set).as_deref(), Some("     field"));
    }

    #[test]
    fn shortest_prefix_wins() {
        let set = names(&["  a", " a"]);
        assert_eq!(resolve("a", &set).as_deref(), Some(" a"));
    }

    #[test]
    fn unknown_name_is_not_found() {
        let set = names(&["Group1"]);
        assert_eq!(resolve("zzz", &set), None);
        assert_eq!(resolve("group1", &set), None);
    }

    #[test]
    fn works_over_slices() {
        let set: &[&str] = &["x", "  y"];
        assert_eq!(resolve("y", set).as_deref(), Some("  y"));
    }
}
