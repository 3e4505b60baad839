use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::EvalError;

// ---------------------------------------------------------------------------
// Record identifiers
// ---------------------------------------------------------------------------

/// Derive a record identifier from a file-name cell.
///
/// Trims the cell, drops the extension of its last path component and trims
/// again: `" video1.avi "` → `video1`, `"a.b.mp4"` → `a.b`. Leading dots of
/// the component do not start an extension, so `".hidden"` stays as is.
pub fn record_id(raw: &str) -> String {
    strip_extension(raw.trim()).trim().to_string()
}

/// Remove the final `.ext` of the last `/`-separated component.
pub fn strip_extension(name: &str) -> &str {
    let component_start = name.rfind('/').map_or(0, |i| i + 1);
    let component = &name[component_start..];
    let leading_dots = component.len() - component.trim_start_matches('.').len();

    match component[leading_dots..].rfind('.') {
        Some(dot) => &name[..component_start + leading_dots + dot],
        None => name,
    }
}

// ---------------------------------------------------------------------------
// Task – which challenge a submission answers
// ---------------------------------------------------------------------------

const MOTILITY_VARIABLES: [&str; 3] = ["progressive_%", "non_progressive_%", "immotile_%"];
const MORPHOLOGY_VARIABLES: [&str; 3] = ["head_defect_%", "midpiece_defect_%", "tail_defect_%"];

/// The two scored tasks, each with a fixed ordered variable set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    Motility,
    Morphology,
}

impl Task {
    /// Ground-truth columns scored for this task, in report order.
    pub fn variables(self) -> &'static [&'static str] {
        match self {
            Task::Motility => &MOTILITY_VARIABLES,
            Task::Morphology => &MORPHOLOGY_VARIABLES,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Task::Motility => "motility",
            Task::Morphology => "morphology",
        }
    }
}

impl FromStr for Task {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "motility" => Ok(Task::Motility),
            "morphology" => Ok(Task::Morphology),
            other => Err(EvalError::UnsupportedTask(other.to_string())),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SubmissionName – `<prefix>_<team>_<task>_<run...>.csv`
// ---------------------------------------------------------------------------

/// Team, task and run recovered from a submission file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionName {
    pub team: String,
    pub task: Task,
    /// Everything after the task token, re-joined with `_`, extension removed.
    pub run_id: String,
}

impl SubmissionName {
    /// Parse the file name of `path`.
    pub fn parse(path: &Path) -> Result<Self, EvalError> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                EvalError::malformed_filename(path.display().to_string(), "no UTF-8 file name")
            })?;

        let tokens: Vec<&str> = filename.split('_').collect();
        if tokens.len() < 4 {
            return Err(EvalError::malformed_filename(
                filename,
                format!("expected at least 4 '_'-separated parts, found {}", tokens.len()),
            ));
        }

        let team = tokens[1];
        if team.is_empty() {
            return Err(EvalError::malformed_filename(filename, "empty team name"));
        }

        let task: Task = tokens[2].parse()?;

        let joined = tokens[3..].join("_");
        let run_id = strip_extension(&joined);
        if run_id.is_empty() {
            return Err(EvalError::malformed_filename(filename, "empty run identifier"));
        }

        Ok(SubmissionName {
            team: team.to_string(),
            task,
            run_id: run_id.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// ValueTable – identifier → numeric vector, insertion ordered
// ---------------------------------------------------------------------------

/// Identifier-keyed rows of variable values.
///
/// Iteration follows first insertion. Re-inserting an identifier keeps its
/// position and replaces its values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueTable {
    variables: Vec<String>,
    rows: Vec<(String, Vec<f64>)>,
    index: HashMap<String, usize>,
}

impl ValueTable {
    pub fn new(variables: &[&str]) -> Self {
        ValueTable {
            variables: variables.iter().map(|v| v.to_string()).collect(),
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert a row. Returns `true` when `id` was already present.
    pub fn insert(&mut self, id: String, values: Vec<f64>) -> bool {
        debug_assert_eq!(values.len(), self.variables.len());
        match self.index.get(&id) {
            Some(&pos) => {
                self.rows[pos].1 = values;
                true
            }
            None => {
                self.index.insert(id.clone(), self.rows.len());
                self.rows.push((id, values));
                false
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&[f64]> {
        self.index.get(id).map(|&pos| self.rows[pos].1.as_slice())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.rows.iter().map(|(id, v)| (id.as_str(), v.as_slice()))
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// SampleMatrix – truth and prediction aligned row by row
// ---------------------------------------------------------------------------

/// Parallel row-major matrices, one row per ground-truth identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleMatrix {
    pub truth: Vec<Vec<f64>>,
    pub predicted: Vec<Vec<f64>>,
}

impl SampleMatrix {
    /// Walk `truth` in order and pull the matching row out of `predicted`.
    ///
    /// `source` names the prediction file in the error for a missing id.
    pub fn align(truth: &ValueTable, predicted: &ValueTable, source: &Path) -> Result<Self, EvalError> {
        let mut samples = SampleMatrix::default();

        for (id, truth_row) in truth.iter() {
            let predicted_row = predicted
                .get(id)
                .ok_or_else(|| EvalError::MissingIdentifier {
                    path: source.to_path_buf(),
                    id: id.to_string(),
                })?;
            samples.truth.push(truth_row.to_vec());
            samples.predicted.push(predicted_row.to_vec());
        }

        Ok(samples)
    }

    /// Fail unless both matrices have the same number of rows and columns.
    pub fn check_shape(&self) -> Result<(), EvalError> {
        let (truth_rows, truth_cols) = shape(&self.truth);
        let (predicted_rows, predicted_cols) = shape(&self.predicted);

        let ragged = self.truth.iter().any(|r| r.len() != truth_cols)
            || self.predicted.iter().any(|r| r.len() != predicted_cols);

        if truth_rows != predicted_rows || truth_cols != predicted_cols || ragged {
            return Err(EvalError::MisalignedSamples {
                truth_rows,
                truth_cols,
                predicted_rows,
                predicted_cols,
            });
        }
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.truth.len()
    }

    /// Column `idx` of both matrices as `(truth, predicted)`.
    pub fn column(&self, idx: usize) -> (Vec<f64>, Vec<f64>) {
        (column_of(&self.truth, idx), column_of(&self.predicted, idx))
    }
}

fn column_of(m: &[Vec<f64>], idx: usize) -> Vec<f64> {
    m.iter().map(|row| row[idx]).collect()
}

fn shape(m: &[Vec<f64>]) -> (usize, usize) {
    (m.len(), m.first().map_or(0, Vec::len))
}

// ---------------------------------------------------------------------------
// SubmissionLines – raw two-column submission with duplicate tracking
// ---------------------------------------------------------------------------

/// Result of reading a header-less `id,value` submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionLines {
    /// Identifier → value of the latest repeated occurrence.
    pub duplicates: BTreeMap<String, String>,
    /// Every record exactly as read.
    pub lines: Vec<Vec<String>>,
    /// Identifier → value of the first occurrence.
    pub results: BTreeMap<String, String>,
}

impl SubmissionLines {
    /// Record one row using first-seen semantics.
    pub fn push(&mut self, line: Vec<String>, id: String, value: String) {
        self.lines.push(line);
        if self.results.contains_key(&id) {
            self.duplicates.insert(id, value);
        } else {
            self.results.insert(id, value);
        }
    }

    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }
}
