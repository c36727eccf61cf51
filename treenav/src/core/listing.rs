//! Read-only listings of group contents.
//!
//! Listings never consult or modify navigation state; they take the group
//! path explicitly.

use anyhow::Result;

use crate::tree::{Kind, Tree};

const INDENT: &str = "    ";

/// Display label for a child: groups get a trailing `/`.
pub fn label(name: &str, kind: Kind) -> String {
    match kind {
        Kind::Group => format!("{}/", name),
        Kind::Dataset => name.to_string(),
    }
}

/// Names of the direct children of `group` with the given kind, in stored order.
pub fn names_of_kind(tree: &dyn Tree, group: &str, kind: Kind) -> Result<Vec<String>> {
    Ok(tree
        .children_of(group)?
        .into_iter()
        .filter(|(_, k)| *k == kind)
        .map(|(name, _)| name)
        .collect())
}

/// One-line listing of `group`: labels sorted together, space separated.
pub fn list_group(tree: &dyn Tree, group: &str) -> Result<String> {
    let mut labels: Vec<String> = tree
        .children_of(group)?
        .into_iter()
        .map(|(name, kind)| label(&name, kind))
        .collect();
    labels.sort();
    Ok(labels.join(" "))
}

/// Listing of the child group `name` of `parent`: its label, then its
/// contents indented on the next line.
pub fn list_child_group(tree: &dyn Tree, parent: &str, name: &str) -> Result<Vec<String>> {
    let path = format!("{}{}/", parent, name);
    Ok(vec![
        label(name, Kind::Group),
        format!("{}{}", INDENT, list_group(tree, &path)?),
    ])
}

/// Listing for `ls *`: every child group expanded one level, then `./` with
/// the datasets of `group` itself.
pub fn list_all(tree: &dyn Tree, group: &str) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for name in names_of_kind(tree, group, Kind::Group)? {
        lines.extend(list_child_group(tree, group, &name)?);
    }
    lines.push("./".to_string());
    let datasets = names_of_kind(tree, group, Kind::Dataset)?;
    lines.push(format!("{}{}", INDENT, datasets.join(" ")));
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture_tree, group};

    #[test]
    fn root_listing_sorts_labels() {
        let tree = fixture_tree();
        assert_eq!(list_group(&tree, "/").expect("ls"), " Group2/ Group1/");
        assert_eq!(
            list_group(&tree, "/Group1/").expect("ls"),
            "Subgroup1/ field1"
        );
    }

    #[test]
    fn listing_is_idempotent() {
        let tree = fixture_tree();
        let first = list_group(&tree, "/Group1/Subgroup1/").expect("ls");
        let second = list_group(&tree, "/Group1/Subgroup1/").expect("ls");
        assert_eq!(first, second);
        assert_eq!(first, " field2 field1");
    }

    #[test]
    fn star_listing_expands_groups_one_level() {
        let tree = fixture_tree();
        let lines = list_all(&tree, "/").expect("ls *");
        assert_eq!(
            lines,
            vec![
                " Group2/",
                "    field1",
                "Group1/",
                "    Subgroup1/ field1",
                "./",
                "    ",
            ]
        );
    }

    #[test]
    fn star_listing_includes_local_datasets() {
        let tree = fixture_tree();
        let lines = list_all(&tree, "/Group1/").expect("ls *");
        assert_eq!(
            lines,
            vec!["Subgroup1/", "     field2 field1", "./", "    field1"]
        );
    }

    #[test]
    fn empty_group_lists_nothing() {
        let tree = group(vec![]);
        assert_eq!(list_group(&tree, "/").expect("ls"), "");
    }
}
