use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// Where submissions, ground truth and reports live.
///
/// Loadable from JSON; every field except the three paths has a default:
///
/// ```json
/// {
///   "submissions_directory": "submissions",
///   "ground_truth_path": "ground_truth.csv",
///   "results_directory": "results",
///   "ground_truth_delimiter": ";",
///   "submission_delimiter": ";"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EvalConfig {
    pub submissions_directory: PathBuf,
    pub ground_truth_path: PathBuf,
    pub results_directory: PathBuf,
    #[serde(default = "default_delimiter")]
    pub ground_truth_delimiter: char,
    #[serde(default = "default_delimiter")]
    pub submission_delimiter: char,
}

/// Paths given on the command line. Each one set here wins over the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathOverrides {
    pub submissions_directory: Option<PathBuf>,
    pub ground_truth_path: Option<PathBuf>,
    pub results_directory: Option<PathBuf>,
}

fn default_delimiter() -> char {
    ';'
}

impl EvalConfig {
    pub fn new(
        submissions_directory: impl Into<PathBuf>,
        ground_truth_path: impl Into<PathBuf>,
        results_directory: impl Into<PathBuf>,
    ) -> Self {
        EvalConfig {
            submissions_directory: submissions_directory.into(),
            ground_truth_path: ground_truth_path.into(),
            results_directory: results_directory.into(),
            ground_truth_delimiter: default_delimiter(),
            submission_delimiter: default_delimiter(),
        }
    }

    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self, EvalError> {
        let text = fs::read_to_string(path).map_err(|e| EvalError::io(path, e))?;
        let config: EvalConfig = serde_json::from_str(&text)
            .map_err(|e| EvalError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Build the effective config from an optional JSON file plus overrides.
    ///
    /// Without a file, all three paths must come from `overrides`.
    pub fn resolve(config_file: Option<&Path>, overrides: PathOverrides) -> Result<Self, EvalError> {
        if let Some(path) = config_file {
            return Ok(EvalConfig::load(path)?.with_overrides(overrides));
        }

        match overrides {
            PathOverrides {
                submissions_directory: Some(submissions),
                ground_truth_path: Some(ground_truth),
                results_directory: Some(results),
            } => Ok(EvalConfig::new(submissions, ground_truth, results)),
            partial => {
                let missing: Vec<&str> = [
                    ("--submissions", partial.submissions_directory.is_none()),
                    ("--ground-truth", partial.ground_truth_path.is_none()),
                    ("--results", partial.results_directory.is_none()),
                ]
                .into_iter()
                .filter_map(|(flag, absent)| absent.then_some(flag))
                .collect();
                Err(EvalError::Config(format!(
                    "missing {} (required without a config file)",
                    missing.join(", ")
                )))
            }
        }
    }

    /// Replace any path that `overrides` sets.
    pub fn with_overrides(mut self, overrides: PathOverrides) -> Self {
        if let Some(dir) = overrides.submissions_directory {
            self.submissions_directory = dir;
        }
        if let Some(path) = overrides.ground_truth_path {
            self.ground_truth_path = path;
        }
        if let Some(dir) = overrides.results_directory {
            self.results_directory = dir;
        }
        self
    }

    /// Delimiters must be single-byte for the CSV reader.
    pub fn validate(&self) -> Result<(), EvalError> {
        delimiter_byte(self.ground_truth_delimiter)?;
        delimiter_byte(self.submission_delimiter)?;
        Ok(())
    }

    pub fn ground_truth_delimiter(&self) -> Result<u8, EvalError> {
        delimiter_byte(self.ground_truth_delimiter)
    }

    pub fn submission_delimiter(&self) -> Result<u8, EvalError> {
        delimiter_byte(self.submission_delimiter)
    }
}

fn delimiter_byte(c: char) -> Result<u8, EvalError> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(EvalError::Config(format!("delimiter '{c}' is not a single ASCII character")))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn loads_json_with_default_delimiters() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"submissions_directory": "subs", "ground_truth_path": "gt.csv", "results_directory": "out"}}"#
        )
        .unwrap();

        let config = EvalConfig::load(file.path()).unwrap();
        assert_eq!(config, EvalConfig::new("subs", "gt.csv", "out"));
        assert_eq!(config.ground_truth_delimiter().unwrap(), b';');
    }

    #[test]
    fn rejects_missing_paths_and_wide_delimiters() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"submissions_directory": "subs"}}"#).unwrap();
        assert!(matches!(EvalConfig::load(file.path()), Err(EvalError::Config(_))));

        let mut config = EvalConfig::new("a", "b", "c");
        config.submission_delimiter = '¦';
        assert!(config.validate().is_err());
    }

    #[test]
    fn flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"submissions_directory": "subs", "ground_truth_path": "gt.csv", "results_directory": "out", "submission_delimiter": ","}}"#
        )
        .unwrap();

        let overrides = PathOverrides {
            results_directory: Some(PathBuf::from("elsewhere")),
            ..Default::default()
        };
        let config = EvalConfig::resolve(Some(file.path()), overrides).unwrap();

        assert_eq!(config.submissions_directory, PathBuf::from("subs"));
        assert_eq!(config.ground_truth_path, PathBuf::from("gt.csv"));
        assert_eq!(config.results_directory, PathBuf::from("elsewhere"));
        assert_eq!(config.submission_delimiter, ',');
    }

    #[test]
    fn flags_alone_need_all_three_paths() {
        let overrides = PathOverrides {
            submissions_directory: Some("subs".into()),
            ground_truth_path: Some("gt.csv".into()),
            results_directory: Some("out".into()),
        };
        assert_eq!(
            EvalConfig::resolve(None, overrides).unwrap(),
            EvalConfig::new("subs", "gt.csv", "out")
        );

        let partial = PathOverrides {
            submissions_directory: Some("subs".into()),
            ..Default::default()
        };
        match EvalConfig::resolve(None, partial) {
            Err(EvalError::Config(msg)) => {
                assert!(msg.contains("--ground-truth"));
                assert!(msg.contains("--results"));
                assert!(!msg.contains("--submissions"));
            }
            other => panic!("expected a config error, got {other:?}"),
        }
    }
}
