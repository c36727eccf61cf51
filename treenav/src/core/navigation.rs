//! Current-position tracking and the `cd` transition function.
//!
//! Positions are absolute paths that start and end with `/`. The state holds
//! the current position and one history slot used by `cd -`.

use tracing::debug;

use crate::core::resolver::resolve;
use crate::error::{NavError, Result};
use crate::tree::{Kind, Tree, segments};

pub const ROOT: &str = "/";

/// Parsed form of a `cd` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CdTarget<'a> {
    Root,
    Previous,
    Up(usize),
    Child(&'a str),
}

impl<'a> CdTarget<'a> {
    /// Classify a raw `cd` argument. More than one token is rejected.
    pub fn parse(arg: &'a str) -> Result<Self> {
        if arg.split_whitespace().count() > 1 {
            return Err(NavError::InvalidArgumentCount);
        }
        Ok(if arg.is_empty() {
            CdTarget::Root
        } else if arg == "-" {
            CdTarget::Previous
        } else if arg.starts_with("..") {
            CdTarget::Up(arg.matches("..").count())
        } else {
            CdTarget::Child(arg)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    position: String,
    last_position: String,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            position: ROOT.to_string(),
            last_position: ROOT.to_string(),
        }
    }
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> &str {
        &self.position
    }

    pub fn last_position(&self) -> &str {
        &self.last_position
    }

    /// Absolute path of `name` inside the current group.
    pub fn child_path(&self, name: &str) -> String {
        format!("{}{}", self.position, name)
    }

    /// Resolve `token` against the children of the current group.
    pub fn resolve_child(&self, tree: &dyn Tree, token: &str) -> Result<(String, Kind)> {
        let children = tree.children_of(&self.position)?;
        let name = resolve(token, &children).ok_or_else(|| NavError::UnknownLabel(token.into()))?;
        let kind = children[&name];
        Ok((name, kind))
    }

    /// Apply one `cd` verb. On error nothing changes.
    pub fn cd(&mut self, tree: &dyn Tree, arg: &str) -> Result<()> {
        match CdTarget::parse(arg)? {
            CdTarget::Root => self.jump(ROOT.to_string()),
            CdTarget::Previous => {
                if tree.children_of(&self.last_position).is_err() {
                    return Err(NavError::StaleHistory(self.last_position.clone()));
                }
                std::mem::swap(&mut self.position, &mut self.last_position);
            }
            CdTarget::Up(levels) => self.jump(ancestor(&self.position, levels)),
            CdTarget::Child(token) => {
                let (name, kind) = self.resolve_child(tree, token)?;
                if kind != Kind::Group {
                    return Err(NavError::NotAGroup(name));
                }
                // A plain descent overwrites the history slot with the new
                // position, so `cd -` right after it stays put.
                self.position = format!("{}{}/", self.position, name);
                self.last_position = self.position.clone();
            }
        }
        debug!(position = %self.position, last = %self.last_position, "cd");
        Ok(())
    }

    fn jump(&mut self, target: String) {
        self.last_position = std::mem::replace(&mut self.position, target);
    }
}

/// Position `levels` groups above `position`, clamped at the root.
pub fn ancestor(position: &str, levels: usize) -> String {
    let segs: Vec<&str> = segments(position).collect();
    if levels >= segs.len() {
        return ROOT.to_string();
    }
    format!("/{}/", segs[..segs.len() - levels].join("/"))
}
