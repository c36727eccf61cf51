//! A shell session: at most one open container plus the navigation state.
//!
//! Every verb validates its arguments and fails with a [`NavError`] before
//! touching anything, so a failed verb leaves both the container and the
//! position exactly as they were. Output goes to the supplied writer.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::core::listing::{list_all, list_child_group, list_group, names_of_kind};
use crate::core::navigation::NavigationState;
use crate::core::stats::{extremes, histogram, summarize};
use crate::error::{NavError, Result};
use crate::interrupt::Interrupt;
use crate::io::container::Container;
use crate::io::export::ExportFormat;
use crate::render::{PDF_HEADER, STATS_HEADER, array_text, pdf_line, stats_line};
use crate::tree::{Array, Kind, Tree};

/// Token that selects every dataset of the current group.
pub const WILDCARD: &str = "*";

const INDENT: &str = "    ";

pub struct Session {
    tree: Option<Box<dyn Tree>>,
    nav: NavigationState,
    output_dir: PathBuf,
    interrupt: Interrupt,
}

impl Session {
    /// Empty session; exports are written into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            tree: None,
            nav: NavigationState::new(),
            output_dir: output_dir.into(),
            interrupt: Interrupt::default(),
        }
    }

    /// Poll `interrupt` between datasets of wildcard verbs.
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn interrupt(&self) -> &Interrupt {
        &self.interrupt
    }

    /// Session bound to an already open tree, positioned at the root.
    pub fn with_tree(tree: Box<dyn Tree>, output_dir: impl Into<PathBuf>) -> Self {
        let mut session = Self::new(output_dir);
        session.tree = Some(tree);
        session
    }

    pub fn is_open(&self) -> bool {
        self.tree.is_some()
    }

    pub fn position(&self) -> &str {
        self.nav.position()
    }

    pub fn last_position(&self) -> &str {
        self.nav.last_position()
    }

    /// Location of the open container, if any.
    pub fn location(&self) -> Option<String> {
        self.tree.as_ref().map(|tree| tree.location())
    }

    /// Names of the current group's children, optionally of one kind.
    /// Empty when no container is open.
    pub fn child_names(&self, kind: Option<Kind>) -> Vec<String> {
        let Some(tree) = self.tree.as_deref() else {
            return Vec::new();
        };
        match tree.children_of(self.nav.position()) {
            Ok(children) => children
                .into_iter()
                .filter(|(_, k)| kind.is_none_or(|want| want == *k))
                .map(|(name, _)| name)
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    fn tree(&self) -> Result<&dyn Tree> {
        self.tree.as_deref().ok_or(NavError::NoFileOpen)
    }

    /// `open <file>`: replace the current container with the one at `arg`.
    pub fn open(&mut self, arg: &str) -> Result<()> {
        let path = single_arg(arg)?;
        let path = Path::new(path);
        if !path.is_file() {
            return Err(NavError::CannotAccess(path.to_path_buf()));
        }
        let container = Container::open(path)?;
        self.close();
        self.tree = Some(Box::new(container));
        Ok(())
    }

    /// Release the container and reset to the empty state. Never fails;
    /// close errors are logged.
    pub fn close(&mut self) {
        if let Some(mut tree) = self.tree.take() {
            let location = tree.location();
            match tree.close() {
                Ok(()) => info!(path = %location, "closed"),
                Err(err) => {
                    let err = format!("{:#}", err);
                    warn!(path = %location, error = %err, "close failed");
                }
            }
        }
        self.nav = NavigationState::new();
    }

    /// `ls`, `ls <group>`, `ls *`.
    pub fn ls(&self, arg: &str, out: &mut dyn Write) -> Result<()> {
        let tree = self.tree()?;
        if arg.split_whitespace().count() > 1 {
            return Err(NavError::InvalidArgumentCount);
        }
        let position = self.nav.position();
        let lines = if arg.contains(WILDCARD) {
            list_all(tree, position)?
        } else if arg.is_empty() {
            vec![list_group(tree, position)?]
        } else {
            let (name, kind) = self.nav.resolve_child(tree, arg)?;
            match kind {
                Kind::Group => list_child_group(tree, position, &name)?,
                Kind::Dataset => vec![name],
            }
        };
        for line in lines {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }

    /// `cd` in all its forms.
    pub fn cd(&mut self, arg: &str) -> Result<()> {
        let tree = self.tree.as_deref().ok_or(NavError::NoFileOpen)?;
        self.nav.cd(tree, arg)
    }

    /// `print <name|*>`: full contents.
    pub fn print(&self, arg: &str, out: &mut dyn Write) -> Result<()> {
        self.for_each_dataset(arg, out, None, |name, array, out, wildcard| {
            let text = array_text(array);
            if wildcard {
                writeln!(out, "{} :", name)?;
                writeln!(out, "{} {}", INDENT, text)?;
            } else {
                writeln!(out, "{}", text)?;
            }
            Ok(())
        })
    }

    /// `stats <name|*>`: shape, dtype, min, mean, max, std.
    pub fn stats(&self, arg: &str, out: &mut dyn Write) -> Result<()> {
        self.for_each_dataset(arg, out, Some(STATS_HEADER), |name, array, out, wildcard| {
            let line = stats_line(&summarize(array));
            if wildcard {
                writeln!(out, "{} :", name)?;
                writeln!(out, "{}{}", INDENT, line)?;
            } else {
                writeln!(out, "{}", line)?;
            }
            Ok(())
        })
    }

    /// `pdf <name|*>`: min, max and a 10-bucket histogram.
    pub fn pdf(&self, arg: &str, out: &mut dyn Write) -> Result<()> {
        self.for_each_dataset(arg, out, Some(PDF_HEADER), |name, array, out, wildcard| {
            let counts = histogram(&array.values);
            let line = pdf_line(extremes(&array.values), counts.as_ref().map(|c| &c[..]));
            if wildcard {
                writeln!(out, "{} :", name)?;
                writeln!(out, "{}{}", INDENT, line)?;
            } else {
                writeln!(out, "{}", line)?;
            }
            Ok(())
        })
    }

    /// `dump` / `txt_dump <name|*>`: one file per dataset in the output dir.
    pub fn dump(&self, arg: &str, format: ExportFormat, out: &mut dyn Write) -> Result<()> {
        let mut taken = HashSet::new();
        self.for_each_dataset(arg, out, None, |name, array, out, _| {
            let path = format.output_path(&self.output_dir, name, &mut taken);
            format.write(&path, array)?;
            writeln!(out, "--- file saved to {}", path.display())?;
            Ok(())
        })
    }

    /// `rm <name>`: delete a group or dataset of the current group.
    pub fn rm(&mut self, arg: &str, out: &mut dyn Write) -> Result<()> {
        let tree = self.tree.as_deref_mut().ok_or(NavError::NoFileOpen)?;
        let token = single_arg(arg)?;
        let (name, _) = self.nav.resolve_child(tree, token)?;
        let path = self.nav.child_path(&name);
        tree.delete(&path)?;
        writeln!(out, "--- deleted {}", path)?;
        Ok(())
    }

    /// Shared driver of the data verbs: validates the single argument, then
    /// runs `emit` on the named dataset or, for `*`, on every dataset of the
    /// current group. `header` is printed first, indented for `*`.
    fn for_each_dataset<F>(
        &self,
        arg: &str,
        out: &mut dyn Write,
        header: Option<&str>,
        mut emit: F,
    ) -> Result<()>
    where
        F: FnMut(&str, &Array, &mut dyn Write, bool) -> Result<()>,
    {
        let tree = self.tree()?;
        let token = single_arg(arg)?;
        let position = self.nav.position();
        if token == WILDCARD {
            if let Some(header) = header {
                writeln!(out, "{}{}", INDENT, header)?;
            }
            for name in names_of_kind(tree, position, Kind::Dataset)? {
                if self.interrupt.is_raised() {
                    return Err(NavError::Interrupted);
                }
                let array = tree.read(&self.nav.child_path(&name))?;
                emit(&name, &array, &mut *out, true)?;
            }
            return Ok(());
        }
        let (name, kind) = self.nav.resolve_child(tree, token)?;
        if kind != Kind::Dataset {
            return Err(NavError::NotADataset(name));
        }
        let array = tree.read(&self.nav.child_path(&name))?;
        if let Some(header) = header {
            writeln!(out, "{}", header)?;
        }
        emit(&name, &array, &mut *out, false)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

/// The argument must be exactly one whitespace-separated token.
fn single_arg(arg: &str) -> Result<&str> {
    let mut tokens = arg.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(_), None) => Ok(arg),
        _ => Err(NavError::InvalidArgumentCount),
    }
}
