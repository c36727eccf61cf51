//! Text rendering for dataset contents, statistics and histograms.
//!
//! Output follows the conventions users of numpy-based tools expect:
//! bracketed, column-aligned arrays wrapped at 75 characters (the closing
//! bracket may overhang), tuple shapes and `1.0000e+01` style scientific
//! notation.

use crate::core::stats::{Extreme, Summary};
use crate::tree::{Array, Values};

/// Placeholder for a statistic that does not exist for the dtype.
pub const UNDEFINED: &str = "Undef";

const LINE_WIDTH: usize = 75;

pub const STATS_HEADER: &str = "Shape type min mean max std";
pub const PDF_HEADER: &str = "Min        Max        | Pdf (10 buckets)";

/// Shortest round-tripping float text, always with a fractional part.
pub fn float_text(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let text = value.to_string();
    if text.contains(['.', 'e']) {
        text
    } else {
        format!("{}.0", text)
    }
}

/// Scientific notation with four decimals and a signed two-digit exponent.
pub fn scientific(value: f64) -> String {
    scientific_with(value, 4)
}

/// Scientific notation with `digits` decimals, printf `%.Ne` style.
pub fn scientific_with(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return float_text(value);
    }
    let text = format!("{:.*e}", digits, value);
    match text.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        None => text,
    }
}

/// Shape as a tuple: `()`, `(n,)`, `(a, b)`.
pub fn shape_text(shape: &[usize]) -> String {
    match shape {
        [] => "()".to_string(),
        [n] => format!("({},)", n),
        dims => format!(
            "({})",
            dims.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

fn extreme_text(value: Extreme) -> String {
    match value {
        Extreme::Int(v) => v.to_string(),
        Extreme::Float(v) => float_text(v),
        Extreme::Bool(v) => bool_text(v).to_string(),
    }
}

fn bool_text(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

fn or_undefined<T>(value: Option<T>, render: impl Fn(T) -> String) -> String {
    value.map(render).unwrap_or_else(|| UNDEFINED.to_string())
}

/// One `stats` line: shape, dtype, min, mean, max, std.
pub fn stats_line(summary: &Summary) -> String {
    format!(
        "{} {} {} {} {} {}",
        shape_text(&summary.shape),
        summary.dtype,
        or_undefined(summary.min, extreme_text),
        or_undefined(summary.mean, float_text),
        or_undefined(summary.max, extreme_text),
        or_undefined(summary.std, float_text),
    )
}

/// One `pdf` line: min, max and bucket counts.
pub fn pdf_line(bounds: Option<(Extreme, Extreme)>, counts: Option<&[u64]>) -> String {
    let (min, max) = match bounds {
        Some((lo, hi)) => (scientific(lo.as_f64()), scientific(hi.as_f64())),
        None => (UNDEFINED.to_string(), UNDEFINED.to_string()),
    };
    let counts = match counts {
        Some(counts) => format!(
            "[{}]",
            counts
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ),
        None => UNDEFINED.to_string(),
    };
    format!("{:<10} {:<10} | {}", min, max, counts)
}

fn element_texts(values: &Values, quote_strings: bool) -> Vec<String> {
    match values {
        Values::Int(v) => v.iter().map(ToString::to_string).collect(),
        Values::Float(v) => float_column(v),
        Values::Bool(v) => v.iter().map(|x| bool_text(*x).to_string()).collect(),
        Values::Str(v) if quote_strings => v.iter().map(|s| format!("'{}'", s)).collect(),
        Values::Str(v) => v.clone(),
    }
}

/// Float elements aligned on the decimal point: integer parts padded on the
/// left, fractions on the right. Integral values print as `3.`.
fn float_column(values: &[f64]) -> Vec<String> {
    let texts: Vec<String> = values
        .iter()
        .map(|x| {
            let text = float_text(*x);
            text.strip_suffix(".0").map(|t| format!("{}.", t)).unwrap_or(text)
        })
        .collect();
    let split = |text: &str| match text.split_once('.') {
        Some((int, frac)) => (int.len(), frac.len()),
        None => (text.len(), 0),
    };
    let int_width = texts.iter().map(|t| split(t).0).max().unwrap_or(0);
    let frac_width = texts.iter().map(|t| split(t).1).max().unwrap_or(0);
    let total = int_width + 1 + frac_width;
    texts
        .into_iter()
        .map(|text| match text.split_once('.') {
            Some((int, frac)) => format!("{:>int_width$}.{:<frac_width$}", int, frac),
            None => format!("{:>total$}", text),
        })
        .collect()
}

/// Full contents of an array. Scalars print bare.
pub fn array_text(array: &Array) -> String {
    if array.is_scalar() {
        if let Values::Float(v) = &array.values {
            return v.first().map(|x| float_text(*x)).unwrap_or_default();
        }
        return element_texts(&array.values, false)
            .into_iter()
            .next()
            .unwrap_or_default();
    }
    let mut items = element_texts(&array.values, true);
    let width = items.iter().map(String::len).max().unwrap_or(0);
    let right_align = !matches!(array.values, Values::Str(_));
    for item in &mut items {
        *item = if right_align {
            format!("{:>width$}", item)
        } else {
            format!("{:<width$}", item)
        };
    }
    nested(&items, &array.shape, 0)
}

fn nested(items: &[String], shape: &[usize], depth: usize) -> String {
    let Some((&len, inner)) = shape.split_first() else {
        return items.first().cloned().unwrap_or_default();
    };
    if len == 0 || items.is_empty() {
        return "[]".to_string();
    }
    if inner.is_empty() {
        return wrapped_row(items, depth);
    }
    let stride = items.len() / len;
    let separator = format!("{}{}", "\n".repeat(inner.len()), " ".repeat(depth + 1));
    let parts: Vec<String> = items
        .chunks(stride)
        .map(|chunk| nested(chunk, inner, depth + 1))
        .collect();
    format!("[{}]", parts.join(&separator))
}

fn wrapped_row(items: &[String], depth: usize) -> String {
    let indent = depth + 1;
    let mut out = String::from("[");
    let mut line_len = indent;
    for (i, item) in items.iter().enumerate() {
        if i > 0 && line_len + 1 + item.len() > LINE_WIDTH {
            out.push('\n');
            out.push_str(&" ".repeat(indent));
            line_len = indent;
        } else if i > 0 {
            out.push(' ');
            line_len += 1;
        }
        out.push_str(item);
        line_len += item.len();
    }
    out.push(']');
    out
}
