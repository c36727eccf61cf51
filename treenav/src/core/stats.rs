//! Summary statistics and histograms over dataset values.
//!
//! String datasets have no statistics; every accessor returns `None` for them
//! and renderers substitute a sentinel.

use crate::tree::{Array, Values};

/// Number of histogram buckets used by `pdf`.
pub const BUCKETS: usize = 10;

/// An element-typed extreme value (min or max).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extreme {
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Extreme {
    pub fn as_f64(self) -> f64 {
        match self {
            Extreme::Int(v) => v as f64,
            Extreme::Float(v) => v,
            Extreme::Bool(v) => f64::from(u8::from(v)),
        }
    }
}

/// Statistics of one array. Fields are `None` when undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub shape: Vec<usize>,
    pub dtype: &'static str,
    pub min: Option<Extreme>,
    pub mean: Option<f64>,
    pub max: Option<Extreme>,
    pub std: Option<f64>,
}

/// Min and max over the elements, typed like the array.
pub fn extremes(values: &Values) -> Option<(Extreme, Extreme)> {
    match values {
        Values::Int(v) => Some((
            Extreme::Int(*v.iter().min()?),
            Extreme::Int(*v.iter().max()?),
        )),
        Values::Bool(v) => Some((
            Extreme::Bool(*v.iter().min()?),
            Extreme::Bool(*v.iter().max()?),
        )),
        Values::Float(v) => {
            let first = *v.first()?;
            // NaN propagates like numpy's min/max.
            let (lo, hi) = v.iter().skip(1).fold((first, first), |(lo, hi), &x| {
                if lo.is_nan() || x.is_nan() {
                    (f64::NAN, f64::NAN)
                } else {
                    (lo.min(x), hi.max(x))
                }
            });
            Some((Extreme::Float(lo), Extreme::Float(hi)))
        }
        Values::Str(_) => None,
    }
}

/// Mean and population standard deviation.
pub fn moments(values: &Values) -> Option<(f64, f64)> {
    let data = values.as_f64()?;
    if data.is_empty() {
        return None;
    }
    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let var = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    Some((mean, var.sqrt()))
}

pub fn summarize(array: &Array) -> Summary {
    let (min, max) = match extremes(&array.values) {
        Some((lo, hi)) => (Some(lo), Some(hi)),
        None => (None, None),
    };
    let (mean, std) = match moments(&array.values) {
        Some((mean, std)) => (Some(mean), Some(std)),
        None => (None, None),
    };
    Summary {
        shape: array.shape.clone(),
        dtype: array.dtype(),
        min,
        mean,
        max,
        std,
    }
}

/// Counts over [`BUCKETS`] equal-width bins spanning `[min, max]`.
///
/// The last bin is closed on the right. A degenerate range is widened to
/// `[min - 0.5, max + 0.5]`. Non-finite values are not counted.
pub fn histogram(values: &Values) -> Option<[u64; BUCKETS]> {
    let data = values.as_f64()?;
    let finite: Vec<f64> = data.into_iter().filter(|x| x.is_finite()).collect();
    let mut counts = [0u64; BUCKETS];
    if finite.is_empty() {
        return Some(counts);
    }
    let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / BUCKETS as f64;
    for x in finite {
        let idx = (((x - lo) / width) as usize).min(BUCKETS - 1);
        counts[idx] += 1;
    }
    Some(counts)
}
