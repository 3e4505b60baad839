//! Regression error metrics over one variable (column) at a time.

use serde::Serialize;

use crate::error::MetricError;

// ---------------------------------------------------------------------------
// Per-column metrics
// ---------------------------------------------------------------------------

/// Every metric reported for a single variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegressionMetrics {
    pub max_error: f64,
    pub mean_absolute_error: f64,
    pub mean_squared_error: f64,
    pub root_mean_squared_error: f64,
    pub mean_squared_log_error: f64,
    pub median_absolute_error: f64,
}

impl RegressionMetrics {
    /// Score one column of predictions against the matching truth column.
    pub fn compute(truth: &[f64], predicted: &[f64]) -> Result<Self, MetricError> {
        check_lengths(truth, predicted)?;

        let mean_squared_error = mean_squared_error(truth, predicted)?;
        Ok(RegressionMetrics {
            max_error: max_error(truth, predicted)?,
            mean_absolute_error: mean_absolute_error(truth, predicted)?,
            mean_squared_error,
            root_mean_squared_error: mean_squared_error.sqrt(),
            mean_squared_log_error: mean_squared_log_error(truth, predicted)?,
            median_absolute_error: median_absolute_error(truth, predicted)?,
        })
    }
}

/// Mean of each metric across variables. Max error is per-variable only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AverageMetrics {
    pub mean_absolute_error: f64,
    pub mean_squared_error: f64,
    pub root_mean_squared_error: f64,
    pub mean_squared_log_error: f64,
    pub median_absolute_error: f64,
}

impl AverageMetrics {
    pub fn from_columns(columns: &[RegressionMetrics]) -> Result<Self, MetricError> {
        if columns.is_empty() {
            return Err(MetricError::EmptyInput);
        }
        let avg = |f: fn(&RegressionMetrics) -> f64| mean(columns.iter().map(f));

        Ok(AverageMetrics {
            mean_absolute_error: avg(|m| m.mean_absolute_error),
            mean_squared_error: avg(|m| m.mean_squared_error),
            root_mean_squared_error: avg(|m| m.root_mean_squared_error),
            mean_squared_log_error: avg(|m| m.mean_squared_log_error),
            median_absolute_error: avg(|m| m.median_absolute_error),
        })
    }
}

// ---------------------------------------------------------------------------
// Individual metrics
// ---------------------------------------------------------------------------

/// Largest absolute residual.
pub fn max_error(truth: &[f64], predicted: &[f64]) -> Result<f64, MetricError> {
    check_lengths(truth, predicted)?;
    Ok(abs_errors(truth, predicted).fold(0.0, f64::max))
}

pub fn mean_absolute_error(truth: &[f64], predicted: &[f64]) -> Result<f64, MetricError> {
    check_lengths(truth, predicted)?;
    Ok(mean(abs_errors(truth, predicted)))
}

pub fn mean_squared_error(truth: &[f64], predicted: &[f64]) -> Result<f64, MetricError> {
    check_lengths(truth, predicted)?;
    Ok(mean(truth.iter().zip(predicted).map(|(t, p)| (t - p).powi(2))))
}

pub fn root_mean_squared_error(truth: &[f64], predicted: &[f64]) -> Result<f64, MetricError> {
    mean_squared_error(truth, predicted).map(f64::sqrt)
}

/// Mean of `(ln(1 + t) - ln(1 + p))^2`. Negative inputs are rejected.
pub fn mean_squared_log_error(truth: &[f64], predicted: &[f64]) -> Result<f64, MetricError> {
    check_lengths(truth, predicted)?;
    if let Some(&value) = truth.iter().chain(predicted).find(|v| **v < 0.0) {
        return Err(MetricError::NegativeLogInput { value });
    }
    Ok(mean(
        truth
            .iter()
            .zip(predicted)
            .map(|(t, p)| (t.ln_1p() - p.ln_1p()).powi(2)),
    ))
}

/// Median of the absolute residuals; even counts average the middle pair.
pub fn median_absolute_error(truth: &[f64], predicted: &[f64]) -> Result<f64, MetricError> {
    check_lengths(truth, predicted)?;
    let mut errors: Vec<f64> = abs_errors(truth, predicted).collect();
    errors.sort_by(f64::total_cmp);

    let n = errors.len();
    Ok(if n % 2 == 0 {
        (errors[n / 2 - 1] + errors[n / 2]) / 2.0
    } else {
        errors[n / 2]
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn check_lengths(truth: &[f64], predicted: &[f64]) -> Result<(), MetricError> {
    if truth.len() != predicted.len() {
        return Err(MetricError::LengthMismatch {
            truth: truth.len(),
            predicted: predicted.len(),
        });
    }
    if truth.is_empty() {
        return Err(MetricError::EmptyInput);
    }
    Ok(())
}

fn abs_errors<'a>(truth: &'a [f64], predicted: &'a [f64]) -> impl Iterator<Item = f64> + 'a {
    truth.iter().zip(predicted).map(|(t, p)| (t - p).abs())
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    sum / count as f64
}
