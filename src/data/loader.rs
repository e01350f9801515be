// ============================================================
// Layer 4 — Survey Sheet Loader
// ============================================================
// Reads the survey export (.xlsx / .xls / .ods) with calamine
// into a `RawTable`: trimmed header strings plus one `Cell` per
// column for every non-empty row. Renaming and cleaning happen
// in `preprocessor.rs`, so the table stays format-agnostic.
//
// The first worksheet is used unless a sheet name is given.

use std::path::PathBuf;

use calamine::{open_workbook_auto, Data, Reader};

use crate::data::preprocessor::SurveyCleaner;
use crate::domain::traits::{LabeledRecord, SurveySource};
use crate::error::{PipelineError, Result};

/// One spreadsheet cell, reduced to what the cleaner needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Text form of the cell, `None` when empty or blank.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty     => None,
            Cell::Number(n) => Some(format!("{n}")),
            Cell::Text(s) if s.trim().is_empty() => None,
            Cell::Text(s)   => Some(s.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_text().is_none()
    }
}

impl From<&Data> for Cell {
    fn from(d: &Data) -> Self {
        match d {
            Data::Empty       => Cell::Empty,
            Data::Int(i)      => Cell::Number(*i as f64),
            Data::Float(f)    => Cell::Number(*f),
            Data::String(s)   => Cell::Text(s.clone()),
            Data::Bool(b)     => Cell::Text(b.to_string()),
            Data::Error(_)    => Cell::Empty,
            other             => Cell::Text(other.to_string()),
        }
    }
}

/// A header row and the data rows beneath it.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows:    Vec<Vec<Cell>>,
}

/// A survey export on disk.
pub struct SurveySheet {
    path:  PathBuf,
    sheet: Option<String>,
}

impl SurveySheet {
    pub fn new(path: impl Into<PathBuf>, sheet: Option<String>) -> Self {
        Self { path: path.into(), sheet }
    }

    /// Read the chosen worksheet into a `RawTable`.
    pub fn read_table(&self) -> Result<RawTable> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| {
            PipelineError::Spreadsheet(format!("cannot open '{}': {e}", self.path.display()))
        })?;

        let range = match &self.sheet {
            Some(name) => workbook.worksheet_range(name).map_err(|e| {
                PipelineError::Spreadsheet(format!("cannot read sheet '{name}': {e}"))
            })?,
            None => workbook
                .worksheet_range_at(0)
                .ok_or_else(|| {
                    PipelineError::Spreadsheet(format!(
                        "'{}' contains no worksheets",
                        self.path.display()
                    ))
                })?
                .map_err(|e| PipelineError::Spreadsheet(format!("cannot read first sheet: {e}")))?,
        };

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .map(|c| Cell::from(c).as_text().unwrap_or_default().trim().to_string())
                .collect(),
            None => return Ok(RawTable::default()),
        };

        let rows: Vec<Vec<Cell>> = rows
            .map(|r| r.iter().map(Cell::from).collect::<Vec<_>>())
            .filter(|r| r.iter().any(|c| !c.is_empty()))
            .collect();

        tracing::debug!(
            "Read {} rows x {} columns from '{}'",
            rows.len(),
            headers.len(),
            self.path.display()
        );
        Ok(RawTable { headers, rows })
    }
}

impl SurveySource for SurveySheet {
    fn load_all(&self) -> Result<Vec<LabeledRecord>> {
        let table = self.read_table()?;
        let records = SurveyCleaner::new().clean(&table)?;
        tracing::info!(
            "Loaded {} survey responses from '{}'",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}
