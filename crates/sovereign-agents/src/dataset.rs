//! Uploaded Fund Data
//!
//! An in-memory CSV table owned by one desk session. Each column carries one
//! kind inferred over the whole file, which decides how its values print in
//! a prompt preview.

use std::collections::HashMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::{DeskError, Result};
use crate::preview::TabularPreview;

/// Rows included in a prompt preview
pub const PREVIEW_ROWS: usize = 3;

/// Cell spellings read as missing values
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Inferred type of a column
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ColumnKind {
    /// Narrowest kind that holds every present value. Missing values widen
    /// integers to floats.
    fn infer(cells: &[Option<String>]) -> Self {
        let present: Vec<&str> = cells.iter().flatten().map(|c| c.trim()).collect();
        let has_missing = present.len() < cells.len();

        if present.iter().all(|v| v.parse::<i64>().is_ok()) {
            if has_missing { Self::Float } else { Self::Integer }
        } else if present.iter().all(|v| v.parse::<f64>().is_ok()) {
            Self::Float
        } else if present.iter().all(|v| parse_bool(v).is_some()) {
            Self::Boolean
        } else {
            Self::Text
        }
    }
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "True" | "TRUE" | "true" => Some(true),
        "False" | "FALSE" | "false" => Some(false),
        _ => None,
    }
}

/// One named column; `None` marks a missing cell
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub cells: Vec<Option<String>>,
}

/// Tabular fund data uploaded for the current session
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TabularDataset {
    columns: Vec<Column>,
    rows: usize,
}

impl TabularDataset {
    /// Dataset used before anything is uploaded
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse CSV with a header row
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let names = unique_names(reader.headers()?.iter());
        if names.is_empty() {
            return Err(DeskError::Dataset("No columns to parse from file".into()));
        }

        let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
        for record in reader.records() {
            let record = record?;
            for (cells, value) in raw.iter_mut().zip(record.iter()) {
                let cell = (!NA_VALUES.contains(&value)).then(|| value.to_string());
                cells.push(cell);
            }
        }

        let rows = raw.first().map_or(0, Vec::len);
        let columns = names
            .into_iter()
            .zip(raw)
            .map(|(name, cells)| Column {
                kind: ColumnKind::infer(&cells),
                name,
                cells,
            })
            .collect();

        tracing::debug!(rows, "Parsed CSV dataset");
        Ok(Self { columns, rows })
    }

    pub fn from_csv_str(text: &str) -> Result<Self> {
        Self::from_csv_reader(text.as_bytes())
    }

    /// True when there are no rows or no columns
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns.is_empty()
    }

    pub const fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// First `n` rows (or all of them when there are fewer)
    pub fn head(&self, n: usize) -> TabularPreview {
        let take = n.min(self.rows);
        TabularPreview::new(
            self.columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    kind: c.kind,
                    cells: c.cells[..take].to_vec(),
                })
                .collect(),
        )
    }

    /// The rows embedded in data-driven prompts
    pub fn preview(&self) -> TabularPreview {
        self.head(PREVIEW_ROWS)
    }
}

/// Blank headers become `Unnamed: {index}`; repeats get a `.N` suffix.
fn unique_names<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .enumerate()
        .map(|(idx, header)| {
            let base = if header.is_empty() {
                format!("Unnamed: {idx}")
            } else {
                header.to_string()
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{base}.{count}")
            };
            *count += 1;
            name
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FUND_FLOWS: &str = "\
lp,commitment,called,distributed,active
Alpha Pension,1000000,400000,50000.5,true
Beta Endowment,500000,250000,,false
Gamma Family Office,250000,100000,12000,true
Delta Insurance,750000,300000,0,false
Epsilon Trust,100000,20000,1500,true
";

    #[test]
    fn test_parse_columns_and_rows() {
        let ds = TabularDataset::from_csv_str(FUND_FLOWS).unwrap();
        assert_eq!(ds.row_count(), 5);
        assert_eq!(
            ds.column_names(),
            vec!["lp", "commitment", "called", "distributed", "active"]
        );
        assert!(!ds.is_empty());
    }

    #[test]
    fn test_kind_inference() {
        let ds = TabularDataset::from_csv_str(FUND_FLOWS).unwrap();
        let kinds: Vec<_> = ds.columns().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnKind::Text,
                ColumnKind::Integer,
                ColumnKind::Integer,
                ColumnKind::Float,
                ColumnKind::Boolean,
            ]
        );
    }

    #[test]
    fn test_missing_cell_widens_integers() {
        let ds = TabularDataset::from_csv_str("units\n1\nNA\n3\n").unwrap();
        assert_eq!(ds.columns()[0].kind, ColumnKind::Float);
        assert_eq!(ds.columns()[0].cells[1], None);
    }

    #[test]
    fn test_head_caps_at_available_rows() {
        let ds = TabularDataset::from_csv_str("a\n1\n2\n").unwrap();
        assert_eq!(ds.head(3).row_count(), 2);
        assert_eq!(ds.preview().row_count(), 2);

        let ds = TabularDataset::from_csv_str(FUND_FLOWS).unwrap();
        assert_eq!(ds.preview().row_count(), 3);
    }

    #[test]
    fn test_header_only_is_empty() {
        let ds = TabularDataset::from_csv_str("lp,commitment\n").unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.column_names().len(), 2);
        assert!(TabularDataset::empty().is_empty());
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let err = TabularDataset::from_csv_str("").unwrap_err();
        assert!(matches!(err, DeskError::Dataset(ref m) if m.contains("No columns")));
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let err = TabularDataset::from_csv_str("a,b\n1,2\n3\n").unwrap_err();
        assert!(matches!(err, DeskError::Dataset(_)));
    }

    #[test]
    fn test_duplicate_and_blank_headers() {
        let ds = TabularDataset::from_csv_str("nav,,nav,nav\n1,2,3,4\n").unwrap();
        assert_eq!(ds.column_names(), vec!["nav", "Unnamed: 1", "nav.1", "nav.2"]);
    }
}
