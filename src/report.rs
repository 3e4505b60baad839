//! Plain-text metrics report and its location under the results directory.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use crate::data::model::SubmissionName;
use crate::error::EvalError;
use crate::metrics::{AverageMetrics, RegressionMetrics};

/// Prefix shared by every report file name.
pub const REPORT_PREFIX: &str = "official_biomedia_2020";

/// Scores of one submission, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub team: String,
    pub task: String,
    pub run_id: String,
    /// One entry per variable, in variable-set order.
    pub variables: Vec<(String, RegressionMetrics)>,
    pub average: AverageMetrics,
}

impl Report {
    pub fn new(name: &SubmissionName, variables: Vec<(String, RegressionMetrics)>, average: AverageMetrics) -> Self {
        Report {
            team: name.team.clone(),
            task: name.task.to_string(),
            run_id: name.run_id.clone(),
            variables,
            average,
        }
    }

    /// `<results>/<team>/<task>/<run>`
    pub fn directory(&self, results_directory: &Path) -> PathBuf {
        results_directory
            .join(&self.team)
            .join(&self.task)
            .join(&self.run_id)
    }

    pub fn file_name(&self) -> String {
        format!(
            "{REPORT_PREFIX}_{}_{}_{}_metrics.txt",
            self.team, self.task, self.run_id
        )
    }

    /// Create the run directory if needed and write the rendered report.
    pub fn write(&self, results_directory: &Path) -> Result<PathBuf, EvalError> {
        let dir = self.directory(results_directory);
        fs::create_dir_all(&dir).map_err(|e| EvalError::io(&dir, e))?;

        let path = dir.join(self.file_name());
        fs::write(&path, self.to_string()).map_err(|e| EvalError::io(&path, e))?;

        info!("Wrote {}", path.display());
        Ok(path)
    }
}

/// One block per variable followed by the averaged block.
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (variable, m) in &self.variables {
            writeln!(f, "Results for {variable}")?;
            writeln!(f, "max error: {}", Value(m.max_error))?;
            writeln!(f, "mean absolute error: {}", Value(m.mean_absolute_error))?;
            writeln!(f, "mean squared error: {}", Value(m.mean_squared_error))?;
            writeln!(f, "root mean squared error: {}", Value(m.root_mean_squared_error))?;
            writeln!(f, "mean squared log error: {}", Value(m.mean_squared_log_error))?;
            writeln!(f, "median absolute error: {}", Value(m.median_absolute_error))?;
            writeln!(f)?;
        }

        let a = &self.average;
        writeln!(f, "Average results")?;
        writeln!(f, "mean absolute error: {}", Value(a.mean_absolute_error))?;
        writeln!(f, "mean squared error: {}", Value(a.mean_squared_error))?;
        writeln!(f, "root mean squared error: {}", Value(a.root_mean_squared_error))?;
        writeln!(f, "mean squared log error: {}", Value(a.mean_squared_log_error))?;
        writeln!(f, "median absolute error: {}", Value(a.median_absolute_error))
    }
}

/// A metric value printed the way Python prints a float.
///
/// Shortest round-trip digits; positional with a trailing `.0` when the
/// decimal exponent is in `-4..16` (`0.0`, `12.5`, `0.0001`), otherwise
/// scientific with a signed, two-digit exponent (`2.5e-05`, `1e+16`).
pub struct Value(pub f64);

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v.is_nan() {
            return f.write_str("nan");
        }
        if v.is_infinite() {
            return f.write_str(if v > 0.0 { "inf" } else { "-inf" });
        }

        let sci = format!("{v:e}");
        let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
        let exponent: i32 = exponent.parse().unwrap_or(0);

        if (-4..16).contains(&exponent) {
            let plain = v.to_string();
            if plain.contains('.') {
                f.write_str(&plain)
            } else {
                write!(f, "{plain}.0")
            }
        } else {
            let sign = if exponent < 0 { '-' } else { '+' };
            write!(f, "{mantissa}e{sign}{:02}", exponent.abs())
        }
    }
}
