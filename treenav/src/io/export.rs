//! Writers for external array formats: numpy `.npy` and plain text.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::render::{scientific_with, shape_text};
use crate::tree::{Array, Values};

const NPY_MAGIC: &[u8] = b"\x93NUMPY";
const NPY_ALIGN: usize = 64;

/// Target format of `dump` (`Npy`) and `txt_dump` (`Txt`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Npy,
    Txt,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Npy => "npy",
            ExportFormat::Txt => "txt",
        }
    }

    /// Output file for dataset `name` inside `dir`. Leading whitespace of the
    /// stored name is dropped. Names that collide with a path already in
    /// `taken` get a `_<n>` suffix; the result is added to `taken`.
    pub fn output_path(self, dir: &Path, name: &str, taken: &mut HashSet<PathBuf>) -> PathBuf {
        let stem = match name.trim_start() {
            "" => "dataset",
            trimmed => trimmed,
        };
        let ext = self.extension();
        let mut path = dir.join(format!("{}.{}", stem, ext));
        let mut suffix = 1;
        while taken.contains(&path) {
            path = dir.join(format!("{}_{}.{}", stem, suffix, ext));
            suffix += 1;
        }
        taken.insert(path.clone());
        path
    }

    /// Write `array` to `path`, replacing any existing file.
    pub fn write(self, path: &Path, array: &Array) -> Result<()> {
        let bytes = match self {
            ExportFormat::Npy => npy_bytes(array),
            ExportFormat::Txt => txt_bytes(array)?,
        };
        fs::write(path, bytes).with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), format = self.extension(), "exported dataset");
        Ok(())
    }
}

fn npy_descr(values: &Values) -> String {
    match values {
        Values::Int(_) => "<i8".to_string(),
        Values::Float(_) => "<f8".to_string(),
        Values::Bool(_) => "|b1".to_string(),
        Values::Str(v) => {
            let width = v.iter().map(|s| s.chars().count()).max().unwrap_or(0);
            format!("<U{}", width.max(1))
        }
    }
}

/// Encode `array` as an `.npy` version 1.0 file.
pub fn npy_bytes(array: &Array) -> Vec<u8> {
    let mut header = format!(
        "{{'descr': '{}', 'fortran_order': False, 'shape': {}, }}",
        npy_descr(&array.values),
        shape_text(&array.shape)
    );
    // magic + version + u16 length + header + '\n' must be a multiple of 64.
    let unpadded = NPY_MAGIC.len() + 2 + 2 + header.len() + 1;
    let padding = (NPY_ALIGN - unpadded % NPY_ALIGN) % NPY_ALIGN;
    header.push_str(&" ".repeat(padding));
    header.push('\n');

    let mut out = Vec::with_capacity(NPY_ALIGN + array.values.len() * 8);
    out.extend_from_slice(NPY_MAGIC);
    out.extend_from_slice(&[1, 0]);
    out.extend_from_slice(&(header.len() as u16).to_le_bytes());
    out.extend_from_slice(header.as_bytes());
    match &array.values {
        Values::Int(v) => v.iter().for_each(|x| out.extend_from_slice(&x.to_le_bytes())),
        Values::Float(v) => v.iter().for_each(|x| out.extend_from_slice(&x.to_le_bytes())),
        Values::Bool(v) => out.extend(v.iter().map(|x| u8::from(*x))),
        Values::Str(v) => {
            let width = v.iter().map(|s| s.chars().count()).max().unwrap_or(0).max(1);
            for s in v {
                let mut count = 0;
                for c in s.chars() {
                    out.extend_from_slice(&u32::from(c).to_le_bytes());
                    count += 1;
                }
                for _ in count..width {
                    out.extend_from_slice(&0u32.to_le_bytes());
                }
            }
        }
    }
    out
}

fn txt_items(values: &Values) -> Vec<String> {
    let number = |x: f64| scientific_with(x, 18);
    match values {
        Values::Int(v) => v.iter().map(|x| number(*x as f64)).collect(),
        Values::Float(v) => v.iter().map(|x| number(*x)).collect(),
        Values::Bool(v) => v.iter().map(|x| number(f64::from(u8::from(*x)))).collect(),
        Values::Str(v) => v.clone(),
    }
}

/// Encode `array` as whitespace-separated text, one row per line.
///
/// Scalars and vectors put one value per line; matrices put one row per line.
pub fn txt_bytes(array: &Array) -> Result<Vec<u8>> {
    let items = txt_items(&array.values);
    let columns = match array.shape.as_slice() {
        [] | [_] => 1,
        [_, cols] => (*cols).max(1),
        dims => bail!("text export supports at most 2 dimensions, got {}", dims.len()),
    };
    let mut out = String::new();
    for row in items.chunks(columns) {
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    Ok(out.into_bytes())
}
