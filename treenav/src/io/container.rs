//! File-backed container: a JSON document holding the group/dataset tree.
//!
//! The whole tree is loaded on open. Deletions are written back immediately
//! with an atomic replace, so the file on disk always matches the session.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, info};

use crate::tree::{Array, Kind, Node, Tree};

/// An open container file.
#[derive(Debug)]
pub struct Container {
    path: PathBuf,
    root: Node,
    closed: bool,
}

impl Container {
    /// Load and validate the container at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let root: Node = serde_json::from_str(&contents)
            .with_context(|| format!("parse container {}", path.display()))?;
        if root.kind() != Kind::Group {
            bail!("{}: root must be a group", path.display());
        }
        let errors = root.validate();
        if !errors.is_empty() {
            bail!(
                "{}: invalid container:\n- {}",
                path.display(),
                errors.join("\n- ")
            );
        }
        info!(path = %path.display(), "opened container");
        Ok(Self {
            path: path.to_path_buf(),
            root,
            closed: false,
        })
    }

    /// Write `root` as a new container file at `path`.
    pub fn create(path: &Path, root: &Node) -> Result<()> {
        write_atomic(path, root)
    }

    fn live(&self) -> Result<&Node> {
        if self.closed {
            return Err(anyhow!("container {} is closed", self.path.display()));
        }
        Ok(&self.root)
    }
}

impl Tree for Container {
    fn children_of(&self, group: &str) -> Result<BTreeMap<String, Kind>> {
        self.live()?.children_of(group)
    }

    fn read(&self, path: &str) -> Result<Array> {
        self.live()?.read(path)
    }

    fn delete(&mut self, path: &str) -> Result<()> {
        self.live()?;
        let removed = self.root.remove(path)?;
        if let Err(err) = write_atomic(&self.path, &self.root) {
            // Keep memory and disk consistent when the write fails.
            self.root
                .insert(&parent_of(path), last_segment(path), removed)?;
            return Err(err);
        }
        info!(entry = path, path = %self.path.display(), "deleted entry");
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            debug!(path = %self.path.display(), "closed container");
        }
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

fn parent_of(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => trimmed[..=idx].to_string(),
        None => "/".to_string(),
    }
}

fn last_segment(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Serialize `root` to a temp file next to `path`, then rename over it.
fn write_atomic(path: &Path, root: &Node) -> Result<()> {
    let mut buf = serde_json::to_string_pretty(root).context("serialize container")?;
    buf.push('\n');
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, buf)
        .with_context(|| format!("write temp container {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("replace container {}", path.display()))?;
    Ok(())
}
