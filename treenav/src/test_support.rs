//! Test-only helpers for constructing container trees.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::io::container::Container;
use crate::tree::{Array, Node, Values};

/// Create a group node from `(name, node)` pairs.
pub fn group(children: Vec<(&str, Node)>) -> Node {
    Node::Group {
        children: children
            .into_iter()
            .map(|(name, node)| (name.to_string(), node))
            .collect::<BTreeMap<_, _>>(),
    }
}

/// Create a one-dimensional integer dataset.
pub fn ints(values: impl IntoIterator<Item = i64>) -> Node {
    Node::Dataset(Array::vector(Values::Int(values.into_iter().collect())))
}

/// Create a one-dimensional float dataset.
pub fn floats(values: impl IntoIterator<Item = f64>) -> Node {
    Node::Dataset(Array::vector(Values::Float(values.into_iter().collect())))
}

/// Create a scalar string dataset.
pub fn text(value: &str) -> Node {
    Node::Dataset(Array::scalar(Values::Str(vec![value.to_string()])))
}

/// Reference tree used across tests.
///
/// ```text
/// /
/// ├──  Group2/
/// │   └── field1         float64[10] zeros
/// └── Group1/
///     ├── Subgroup1/
///     │   ├──  field2    int64[100] 0,2,..,198
///     │   └── field1     int64[100] 0..99
///     └── field1         "information"
/// ```
pub fn fixture_tree() -> Node {
    group(vec![
        (
            "Group1",
            group(vec![
                (
                    "Subgroup1",
                    group(vec![
                        ("field1", ints(0..100)),
                        (" field2", ints((0..100).map(|x| 2 * x))),
                    ]),
                ),
                ("field1", text("information")),
            ]),
        ),
        (" Group2", group(vec![("field1", floats([0.0; 10]))])),
    ])
}

/// A fixture container written to a temporary directory.
pub struct FixtureFile {
    dir: TempDir,
    path: PathBuf,
}

impl FixtureFile {
    /// Write [`fixture_tree`] as `dummy.json` inside a fresh temp directory.
    pub fn new() -> Result<Self> {
        Self::with_tree(&fixture_tree())
    }

    pub fn with_tree(tree: &Node) -> Result<Self> {
        let dir = tempfile::tempdir().context("create tempdir")?;
        let path = dir.path().join("dummy.json");
        Container::create(&path, tree)?;
        Ok(Self { dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}
