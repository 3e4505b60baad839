//! Scoring of sperm motility and morphology prediction submissions.
//!
//! Each submission is a CSV named `<prefix>_<team>_<task>_<run>.csv`. It is
//! aligned with the ground truth by record identifier, scored per variable
//! with regression error metrics, and written out as a text report under
//! `<results>/<team>/<task>/<run>/`.

pub mod config;
pub mod data;
pub mod driver;
pub mod error;
pub mod evaluator;
pub mod metrics;
pub mod report;

pub use config::EvalConfig;
pub use error::{EvalError, MetricError};
pub use evaluator::{evaluate_submission, Evaluation};
