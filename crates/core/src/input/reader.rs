//! Delimited text reader shared by both layouts

use crate::error::{ClimateError, ClimateResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One non-blank line of a climate file
#[derive(Debug, Clone)]
pub(crate) struct Row {
    /// 1-based line number in the file
    pub line: usize,
    /// Cells with all blanks removed
    pub cells: Vec<String>,
}

impl Row {
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map_or("", String::as_str)
    }
}

/// Open a climate file and read its non-blank rows
pub(crate) fn read_rows_from_path(path: &Path) -> ClimateResult<Vec<Row>> {
    let file = File::open(path).map_err(|source| ClimateError::Io {
        file: path.display().to_string(),
        source,
    })?;
    read_rows(file, &path.display().to_string())
}

/// Read every non-blank row from a comma-separated stream
///
/// Blank cells are kept so column positions stay aligned; rows where every
/// cell is blank are dropped.
pub(crate) fn read_rows<R: Read>(source: R, file: &str) -> ClimateResult<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|source| ClimateError::Csv {
            file: file.to_string(),
            source,
        })?;
        let line = record
            .position()
            .map_or(index + 1, |p| p.line() as usize);

        let cells: Vec<String> = record
            .iter()
            .map(|cell| cell.chars().filter(|c| !c.is_whitespace()).collect())
            .collect();
        if cells.iter().all(String::is_empty) {
            continue;
        }
        rows.push(Row { line, cells });
    }

    if rows.is_empty() {
        return Err(ClimateError::EmptyInput {
            file: file.to_string(),
        });
    }
    Ok(rows)
}
