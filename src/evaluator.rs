//! Score a single submission file and write its report.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::EvalConfig;
use crate::data::loader::read_value_table;
use crate::data::model::{SampleMatrix, SubmissionName};
use crate::error::EvalError;
use crate::metrics::{AverageMetrics, RegressionMetrics};
use crate::report::Report;

/// Outcome of one successful evaluation.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub submission: PathBuf,
    pub report: Report,
    pub report_path: PathBuf,
}

/// Parse the file name, load truth and predictions, score and write.
///
/// All metrics are computed before the results directory is touched, so a
/// failing submission leaves no report behind.
pub fn evaluate_submission(config: &EvalConfig, submission_path: &Path) -> Result<Evaluation, EvalError> {
    let name = SubmissionName::parse(submission_path)?;
    let variables = name.task.variables();
    debug!(
        "team={} task={} run={} variables={variables:?}",
        name.team, name.task, name.run_id
    );

    let truth = read_value_table(
        &config.ground_truth_path,
        variables,
        config.ground_truth_delimiter()?,
    )?;
    if truth.is_empty() {
        return Err(EvalError::EmptyGroundTruth(config.ground_truth_path.clone()));
    }

    let predicted = read_value_table(submission_path, variables, config.submission_delimiter()?)?;

    let extra = predicted.iter().filter(|(id, _)| !truth.contains(id)).count();
    if extra > 0 {
        debug!("{}: ignoring {extra} record(s) absent from ground truth", submission_path.display());
    }

    let samples = SampleMatrix::align(&truth, &predicted, submission_path)?;
    samples.check_shape()?;

    let report = score(&name, variables, &samples)?;
    let report_path = report.write(&config.results_directory)?;

    info!(
        "{}: {} samples, average MAE {}",
        submission_path.display(),
        samples.rows(),
        report.average.mean_absolute_error
    );

    Ok(Evaluation {
        submission: submission_path.to_path_buf(),
        report,
        report_path,
    })
}

/// Compute per-variable metrics and their average.
pub fn score(name: &SubmissionName, variables: &[&str], samples: &SampleMatrix) -> Result<Report, EvalError> {
    let per_variable = variables
        .iter()
        .enumerate()
        .map(|(idx, &variable)| {
            let (truth, predicted) = samples.column(idx);
            RegressionMetrics::compute(&truth, &predicted)
                .map(|m| (variable.to_string(), m))
                .map_err(|source| EvalError::Metric {
                    variable: variable.to_string(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let columns: Vec<RegressionMetrics> = per_variable.iter().map(|(_, m)| *m).collect();
    let average = AverageMetrics::from_columns(&columns).map_err(|source| EvalError::Metric {
        variable: "average".to_string(),
        source,
    })?;

    Ok(Report::new(name, per_variable, average))
}
