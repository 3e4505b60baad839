use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use log::{debug, warn};

use super::model::{record_id, SubmissionLines, ValueTable};
use crate::error::EvalError;

// ---------------------------------------------------------------------------
// Value tables (ground truth and scored submissions)
// ---------------------------------------------------------------------------

/// Read a delimited file with a header row into a [`ValueTable`].
///
/// Layout:
/// * column 0 holds the record's file name, turned into an id by [`record_id`]
/// * every name in `variables` must appear in the header; those columns are
///   parsed as `f64`, in the order given
/// * any other column is ignored
///
/// Rows are numbered from 1, header excluded.
pub fn read_value_table(path: &Path, variables: &[&str], delimiter: u8) -> Result<ValueTable, EvalError> {
    let file = File::open(path).map_err(|e| EvalError::io(path, e))?;
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(file);

    let headers = reader.headers()?.clone();
    let columns = resolve_columns(&headers, variables, path)?;

    let mut table = ValueTable::new(variables);

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let row = row_no + 1;

        let id = record_id(record.get(0).unwrap_or(""));
        let values = columns
            .iter()
            .map(|&(idx, name)| parse_cell(&record, idx, name, row, path))
            .collect::<Result<Vec<f64>, EvalError>>()?;

        if table.insert(id.clone(), values) {
            warn!("{}: identifier '{id}' repeated at row {row}, later values win", path.display());
        }
    }

    debug!("{}: loaded {} records", path.display(), table.len());
    Ok(table)
}

/// Map each requested variable to the first header cell equal to it.
fn resolve_columns<'a>(
    headers: &StringRecord,
    variables: &[&'a str],
    path: &Path,
) -> Result<Vec<(usize, &'a str)>, EvalError> {
    variables
        .iter()
        .map(|&name| {
            headers
                .iter()
                .position(|h| h == name)
                .map(|idx| (idx, name))
                .ok_or_else(|| EvalError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name.to_string(),
                })
        })
        .collect()
}

fn parse_cell(record: &StringRecord, idx: usize, column: &str, row: usize, path: &Path) -> Result<f64, EvalError> {
    let raw = record.get(idx).ok_or_else(|| EvalError::MissingField {
        path: path.to_path_buf(),
        row,
        column: column.to_string(),
    })?;

    // NaN and infinities parse but cannot be scored.
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(EvalError::InvalidNumber {
            path: path.to_path_buf(),
            row,
            column: column.to_string(),
            value: raw.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Raw `id,value` submissions
// ---------------------------------------------------------------------------

/// Read a comma-delimited, header-less `id,value` file.
///
/// The first occurrence of an id lands in `results`; repeats go to
/// `duplicates` and leave `results` untouched.
pub fn read_submission(path: &Path) -> Result<SubmissionLines, EvalError> {
    let file = File::open(path).map_err(|e| EvalError::io(path, e))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut submission = SubmissionLines::default();

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let id = record_id(record.get(0).unwrap_or(""));
        let value = record
            .get(1)
            .ok_or_else(|| EvalError::MissingField {
                path: path.to_path_buf(),
                row: row_no + 1,
                column: "1".to_string(),
            })?
            .trim()
            .to_string();

        let line = record.iter().map(str::to_string).collect();
        submission.push(line, id, value);
    }

    if submission.has_duplicates() {
        warn!(
            "{}: {} identifier(s) appear more than once",
            path.display(),
            submission.duplicates.len()
        );
    }
    Ok(submission)
}
