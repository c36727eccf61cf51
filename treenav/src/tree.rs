//! In-memory model of a hierarchical container and the `Tree` access trait.
//!
//! A container is a rooted hierarchy of groups and datasets. Group children
//! are kept in a `BTreeMap`, so iteration order is the byte order of the
//! stored names (leading whitespace included).

use std::collections::BTreeMap;

use anyhow::{Result, anyhow, bail};
use serde::{Deserialize, Serialize};

/// Node kind as seen by navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Group,
    Dataset,
}

/// A container node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    Group {
        #[serde(default)]
        children: BTreeMap<String, Node>,
    },
    Dataset(Array),
}

/// Typed, flat, row-major array storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dtype", content = "data")]
pub enum Values {
    #[serde(rename = "int64")]
    Int(Vec<i64>),
    #[serde(rename = "float64")]
    Float(Vec<f64>),
    #[serde(rename = "bool")]
    Bool(Vec<bool>),
    #[serde(rename = "str")]
    Str(Vec<String>),
}

/// A dataset value: a shape plus its elements. Shape `[]` is a scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Array {
    pub shape: Vec<usize>,
    #[serde(flatten)]
    pub values: Values,
}

impl Values {
    pub fn len(&self) -> usize {
        match self {
            Values::Int(v) => v.len(),
            Values::Float(v) => v.len(),
            Values::Bool(v) => v.len(),
            Values::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numpy-style dtype name.
    pub fn dtype(&self) -> &'static str {
        match self {
            Values::Int(_) => "int64",
            Values::Float(_) => "float64",
            Values::Bool(_) => "bool",
            Values::Str(_) => "str",
        }
    }

    /// Numeric view of the elements, `None` for strings.
    pub fn as_f64(&self) -> Option<Vec<f64>> {
        match self {
            Values::Int(v) => Some(v.iter().map(|x| *x as f64).collect()),
            Values::Float(v) => Some(v.clone()),
            Values::Bool(v) => Some(v.iter().map(|x| f64::from(u8::from(*x))).collect()),
            Values::Str(_) => None,
        }
    }
}

impl Array {
    /// One-dimensional array with shape `[len]`.
    pub fn vector(values: Values) -> Self {
        Self {
            shape: vec![values.len()],
            values,
        }
    }

    /// Zero-dimensional array holding one element.
    pub fn scalar(values: Values) -> Self {
        Self {
            shape: Vec::new(),
            values,
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    pub fn dtype(&self) -> &'static str {
        self.values.dtype()
    }

    /// Check that the element count matches the shape.
    pub fn validate(&self) -> Result<()> {
        let expected: usize = self.shape.iter().product();
        if expected != self.values.len() {
            bail!(
                "shape {:?} expects {} elements, found {}",
                self.shape,
                expected,
                self.values.len()
            );
        }
        Ok(())
    }
}

impl Node {
    pub fn empty_group() -> Self {
        Node::Group {
            children: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Node::Group { .. } => Kind::Group,
            Node::Dataset(_) => Kind::Dataset,
        }
    }

    /// Walk `path` (absolute or relative, `/`-separated) from this node.
    pub fn lookup(&self, path: &str) -> Option<&Node> {
        let mut node = self;
        for seg in segments(path) {
            match node {
                Node::Group { children } => node = children.get(seg)?,
                Node::Dataset(_) => return None,
            }
        }
        Some(node)
    }

    fn lookup_mut(&mut self, path: &str) -> Option<&mut Node> {
        let mut node = self;
        for seg in segments(path) {
            match node {
                Node::Group { children } => node = children.get_mut(seg)?,
                Node::Dataset(_) => return None,
            }
        }
        Some(node)
    }

    /// Insert `node` under `name` in the group at `parent`, creating nothing.
    pub fn insert(&mut self, parent: &str, name: &str, node: Node) -> Result<()> {
        match self.lookup_mut(parent) {
            Some(Node::Group { children }) => {
                children.insert(name.to_string(), node);
                Ok(())
            }
            _ => Err(anyhow!("no group at {}", parent)),
        }
    }

    /// Remove the entry at `path`, returning it.
    pub fn remove(&mut self, path: &str) -> Result<Node> {
        let (parent, name) = split_parent(path).ok_or_else(|| anyhow!("cannot delete root"))?;
        match self.lookup_mut(&parent) {
            Some(Node::Group { children }) => children
                .remove(name)
                .ok_or_else(|| anyhow!("no entry at {}", path)),
            _ => Err(anyhow!("no group at {}", parent)),
        }
    }

    /// Check structural invariants for the whole subtree.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        validate_node(self, "/", &mut errors);
        errors
    }
}

fn validate_node(node: &Node, path: &str, errors: &mut Vec<String>) {
    match node {
        Node::Group { children } => {
            for (name, child) in children {
                if name.is_empty() {
                    errors.push(format!("{}: empty child name", path));
                    continue;
                }
                if name.contains('/') {
                    errors.push(format!("{}: child name '{}' contains '/'", path, name));
                    continue;
                }
                let child_path = format!("{}{}/", path, name);
                validate_node(child, &child_path, errors);
            }
        }
        Node::Dataset(array) => {
            if let Err(err) = array.validate() {
                errors.push(format!("{}: {}", path.trim_end_matches('/'), err));
            }
        }
    }
}

/// Non-empty `/`-separated segments of a path. Whitespace is significant.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|seg| !seg.is_empty())
}

fn split_parent(path: &str) -> Option<(String, &str)> {
    let segs: Vec<&str> = segments(path).collect();
    let (name, parents) = segs.split_last()?;
    Some((format!("/{}", parents.join("/")), name))
}

/// Access to an open container.
///
/// Paths are absolute and `/`-separated. Implementations own the underlying
/// resource; `close` must be safe to call more than once.
pub trait Tree {
    /// Direct children of the group at `group`, with their kinds.
    fn children_of(&self, group: &str) -> Result<BTreeMap<String, Kind>>;

    /// Read the dataset at `path`.
    fn read(&self, path: &str) -> Result<Array>;

    /// Permanently delete the group or dataset at `path`.
    fn delete(&mut self, path: &str) -> Result<()>;

    /// Release the container, flushing pending writes.
    fn close(&mut self) -> Result<()>;

    /// Human-readable location of the container (used in the prompt).
    fn location(&self) -> String;
}

/// A bare root node is a tree held purely in memory.
impl Tree for Node {
    fn children_of(&self, group: &str) -> Result<BTreeMap<String, Kind>> {
        match self.lookup(group) {
            Some(Node::Group { children }) => Ok(children
                .iter()
                .map(|(name, child)| (name.clone(), child.kind()))
                .collect()),
            Some(Node::Dataset(_)) => Err(anyhow!("{} is not a group", group)),
            None => Err(anyhow!("no group at {}", group)),
        }
    }

    fn read(&self, path: &str) -> Result<Array> {
        match self.lookup(path) {
            Some(Node::Dataset(array)) => Ok(array.clone()),
            Some(Node::Group { .. }) => Err(anyhow!("{} is not a dataset", path)),
            None => Err(anyhow!("no dataset at {}", path)),
        }
    }

    fn delete(&mut self, path: &str) -> Result<()> {
        self.remove(path).map(drop)
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    fn location(&self) -> String {
        "(memory)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        let mut root = Node::empty_group();
        root.insert("/", "g", Node::empty_group()).expect("insert g");
        root.insert(
            "/g/",
            " x",
            Node::Dataset(Array::vector(Values::Int(vec![1, 2, 3]))),
        )
        .expect("insert x");
        root
    }

    #[test]
    fn lookup_keeps_leading_whitespace() {
        let root = sample();
        assert_eq!(root.lookup("/g/ x").map(Node::kind), Some(Kind::Dataset));
        assert!(root.lookup("/g/x").is_none());
        assert_eq!(root.lookup("/").map(Node::kind), Some(Kind::Group));
    }

    #[test]
    fn remove_detaches_entry() {
        let mut root = sample();
        let removed = root.remove("/g/ x").expect("remove");
        assert_eq!(removed.kind(), Kind::Dataset);
        assert!(root.lookup("/g/ x").is_none());
        assert!(root.remove("/").is_err());
    }

    #[test]
    fn validate_flags_shape_mismatch() {
        let mut root = sample();
        root.insert(
            "/",
            "bad",
            Node::Dataset(Array {
                shape: vec![2, 2],
                values: Values::Float(vec![1.0]),
            }),
        )
        .expect("insert");
        let errors = root.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("/bad:"));
    }

    #[test]
    fn dataset_json_layout() {
        let node = Node::Dataset(Array::scalar(Values::Str(vec!["information".into()])));
        let json = serde_json::to_value(&node).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "dataset",
                "shape": [],
                "dtype": "str",
                "data": ["information"],
            })
        );
        let back: Node = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, node);
    }
}
