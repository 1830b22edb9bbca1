//! Prompt Preview Rendering
//!
//! Prints the leading rows of a dataset as a column-keyed literal,
//! `{'lp': {0: 'Alpha', 1: 'Beta'}, 'nav': {0: 100.0, 1: nan}}`, the shape
//! the completion models have been prompted with all along.

use std::fmt::{self, Write};

use crate::dataset::{Column, ColumnKind, parse_bool};

/// Leading rows of a dataset, ready to interpolate into a prompt
#[derive(Clone, Debug, PartialEq)]
pub struct TabularPreview {
    columns: Vec<Column>,
}

impl TabularPreview {
    pub(crate) const fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }
}

impl fmt::Display for TabularPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('{')?;
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {{", quote(&column.name))?;
            for (row, cell) in column.cells.iter().enumerate() {
                if row > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{row}: {}", render_cell(column.kind, cell.as_deref()))?;
            }
            f.write_char('}')?;
        }
        f.write_char('}')
    }
}

fn render_cell(kind: ColumnKind, cell: Option<&str>) -> String {
    let Some(raw) = cell else {
        return "nan".into();
    };
    let trimmed = raw.trim();

    match kind {
        ColumnKind::Integer => trimmed
            .parse::<i64>()
            .map_or_else(|_| quote(raw), |v| v.to_string()),
        ColumnKind::Float => trimmed
            .parse::<f64>()
            .map_or_else(|_| quote(raw), format_float),
        ColumnKind::Boolean => match parse_bool(trimmed) {
            Some(true) => "True".into(),
            Some(false) => "False".into(),
            None => quote(raw),
        },
        ColumnKind::Text => quote(raw),
    }
}

/// Shortest round-trip float text with a mandatory fractional part;
/// scientific notation outside `[1e-4, 1e16)`.
fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf".into() } else { "-inf".into() };
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let sci = format!("{value:e}");
        return match sci.split_once('e') {
            Some((mantissa, exp)) => {
                let (sign, digits) = exp
                    .strip_prefix('-')
                    .map_or(("+", exp), |d| ("-", d));
                format!("{mantissa}e{sign}{digits:0>2}")
            }
            None => sci,
        };
    }

    let plain = value.to_string();
    if plain.contains('.') {
        plain
    } else {
        format!("{plain}.0")
    }
}

/// Quoted string literal: single quotes unless the text holds a single
/// quote and no double quote.
fn quote(text: &str) -> String {
    let delim = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(text.len() + 2);
    out.push(delim);
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delim => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() && (c as u32) < 0x100 => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(delim);
    out
}
