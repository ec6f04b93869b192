use std::borrow::Cow;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::config::MAX_PRECISION;
use crate::model::AxisKind;

use super::Result;

/// One exported box: `(start, end)` per axis in physical units.
#[derive(Debug, Clone, PartialEq)]
pub struct CropRow {
    pub label: String,
    pub ranges: Vec<(f64, f64)>,
}

pub fn row_label(tag: &str, index: usize) -> String {
    if tag.is_empty() {
        format!("roi_{index:02}")
    } else {
        format!("{tag}_roi_{index:02}")
    }
}

pub fn column_names(ndim: usize) -> Vec<String> {
    (0..ndim)
        .flat_map(|axis| {
            let prefix = AxisKind::for_index(axis, ndim).column_prefix();
            [format!("{prefix}_start"), format!("{prefix}_end")]
        })
        .collect()
}

/// Rounds to `precision` decimals, capped at [`MAX_PRECISION`].
pub(crate) fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10_f64.powi(precision.min(MAX_PRECISION) as i32);
    let rounded = (value * factor).round() / factor;
    // avoid printing `-0.0`
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Quotes a field holding a separator, quote or line break, doubling inner quotes.
fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

pub(crate) fn render_csv(ndim: usize, rows: &[CropRow], precision: u32) -> String {
    let mut out = String::new();
    for column in column_names(ndim) {
        out.push(',');
        out.push_str(&column);
    }
    out.push('\n');
    for row in rows {
        out.push_str(&csv_field(&row.label));
        for (start, end) in &row.ranges {
            let _ = write!(
                out,
                ",{:?},{:?}",
                round_to(*start, precision),
                round_to(*end, precision)
            );
        }
        out.push('\n');
    }
    out
}

/// Writes `rows` to `path`, creating parent directories and replacing any existing file.
pub(crate) fn write_csv(path: &Path, ndim: usize, rows: &[CropRow], precision: u32) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_csv(ndim, rows, precision))?;
    Ok(())
}
