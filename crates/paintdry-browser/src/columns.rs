//! Column descriptors and width allocation for collection grids

use crate::identity::Row;
use serde_json::Value;
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

/// Field that is pinned to a narrow fixed width and never grows
pub const MODULE_FIELD: &str = "module";

/// Width clamp for the `module` column, in terminal cells
pub const MODULE_MAX_WIDTH: u16 = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub field: String,
    pub label: String,
    /// Share of leftover width this column receives relative to the others
    pub weight: u16,
    pub max_width: Option<u16>,
}

impl Column {
    pub fn new(field: impl Into<String>) -> Self {
        let field = field.into();
        let (weight, max_width) = if field == MODULE_FIELD {
            (0, Some(MODULE_MAX_WIDTH))
        } else {
            (1, None)
        };
        Self {
            label: field.clone(),
            field,
            weight,
            max_width,
        }
    }

    /// Whether this column takes part in distributing leftover width
    pub fn grows(&self) -> bool {
        self.weight > 0 && self.field != MODULE_FIELD
    }

    fn clamp(&self, width: u16) -> u16 {
        match self.max_width {
            Some(max) => width.min(max),
            None => width,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColumnError {
    #[error("at least one column is required")]
    Empty,
    #[error("column `{0}` is listed more than once")]
    Duplicate(String),
}

/// Non-empty ordered list of columns with distinct fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet(Vec<Column>);

impl ColumnSet {
    pub fn new(columns: Vec<Column>) -> Result<Self, ColumnError> {
        if columns.is_empty() {
            return Err(ColumnError::Empty);
        }
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.field == column.field) {
                return Err(ColumnError::Duplicate(column.field.clone()));
            }
        }
        Ok(Self(columns))
    }

    pub fn from_fields(fields: &[&str]) -> Result<Self, ColumnError> {
        Self::new(fields.iter().map(|f| Column::new(*f)).collect())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.0.iter().map(|c| c.label.as_str()).collect()
    }

    /// Cell texts of `row`, one per column, in column order
    pub fn cells(&self, row: &Row) -> Vec<String> {
        self.0.iter().map(|c| cell_text(row.get(&c.field))).collect()
    }
}

impl<'a> IntoIterator for &'a ColumnSet {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Single-line display text of a cell value
pub fn cell_text(value: Option<&Value>) -> String {
    let text = match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| cell_text(Some(item)))
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => other.to_string(),
    };
    if text.contains(char::is_control) {
        text.replace(char::is_control, " ")
    } else {
        text
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AutosizeOptions {
    /// Header text counts towards a column's width
    pub include_headers: bool,
    /// Keep unusually wide cells when measuring content width
    pub include_outliers: bool,
    /// Cells wider than `Q3 + factor * IQR` are outliers
    pub outliers_factor: f64,
    /// Hand leftover width to the growing columns
    pub expand: bool,
}

impl Default for AutosizeOptions {
    fn default() -> Self {
        Self {
            include_headers: true,
            include_outliers: false,
            outliers_factor: 1.5,
            expand: true,
        }
    }
}

/// Compute a width for every column given `available` cells of horizontal space.
///
/// Each column first gets its natural width (content, optionally header, clamped
/// to `max_width`). With `expand`, space left over is split between growing
/// columns in proportion to their weight.
pub fn autosize(
    columns: &ColumnSet,
    rows: &[Row],
    available: u16,
    options: &AutosizeOptions,
) -> Vec<u16> {
    let mut widths: Vec<u16> = columns
        .iter()
        .map(|column| natural_width(column, rows, options))
        .collect();

    if options.expand {
        let used: u32 = widths.iter().map(|w| *w as u32).sum();
        let leftover = (available as u32).saturating_sub(used);
        distribute(columns, &mut widths, leftover);
    }

    widths
}

fn natural_width(column: &Column, rows: &[Row], options: &AutosizeOptions) -> u16 {
    // Empty cells are not width samples
    let mut samples: Vec<usize> = rows
        .iter()
        .map(|row| cell_text(row.get(&column.field)).width())
        .filter(|width| *width > 0)
        .collect();
    if !options.include_outliers {
        samples = without_outliers(samples, options.outliers_factor);
    }

    let content = samples.into_iter().max().unwrap_or(0);
    let header = if options.include_headers {
        column.label.width()
    } else {
        0
    };
    let width = content.max(header).max(1).min(u16::MAX as usize) as u16;
    column.clamp(width)
}

fn can_grow(i: usize, widths: &[u16], columns: &ColumnSet) -> bool {
    let column = &columns.0[i];
    column.grows() && column.max_width.is_none_or(|max| widths[i] < max)
}

fn distribute(columns: &ColumnSet, widths: &mut [u16], mut leftover: u32) {
    while leftover > 0 {
        let growing: Vec<usize> = (0..widths.len())
            .filter(|i| can_grow(*i, widths, columns))
            .collect();
        let total_weight: u32 = growing.iter().map(|i| columns.0[*i].weight as u32).sum();
        if total_weight == 0 {
            return;
        }

        let mut handed_out = 0;
        for &i in &growing {
            let share = leftover * columns.0[i].weight as u32 / total_weight;
            let share = share.min(u16::MAX as u32) as u16;
            let grown = columns.0[i].clamp(widths[i].saturating_add(share));
            handed_out += (grown - widths[i]) as u32;
            widths[i] = grown;
        }

        // Rounding remainder: one cell at a time, in column order
        if handed_out == 0 {
            for &i in &growing {
                if leftover == 0 {
                    break;
                }
                if can_grow(i, widths, columns) {
                    widths[i] += 1;
                    leftover -= 1;
                }
            }
        } else {
            leftover -= handed_out;
        }
    }
}

/// Drop samples outside `[Q1 - factor * IQR, Q3 + factor * IQR]`
fn without_outliers(mut samples: Vec<usize>, factor: f64) -> Vec<usize> {
    if samples.len() < 4 {
        return samples;
    }
    samples.sort_unstable();
    let q1 = quantile(&samples, 0.25);
    let q3 = quantile(&samples, 0.75);
    let spread = (q3 - q1) * factor;
    let (low, high) = (q1 - spread, q3 + spread);
    samples.retain(|s| {
        let s = *s as f64;
        s >= low && s <= high
    });
    samples
}

/// Linear-interpolated quantile of sorted samples
fn quantile(sorted: &[usize], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let frac = pos - lower as f64;
    sorted[lower] as f64 + frac * (sorted[upper] as f64 - sorted[lower] as f64)
}
