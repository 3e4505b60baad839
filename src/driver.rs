//! Batch evaluation over a submissions directory.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::config::EvalConfig;
use crate::data::loader::read_submission;
use crate::evaluator::{evaluate_submission, Evaluation};
use crate::report::Report;

/// Regular files with a `.csv` extension, sorted by file name.
pub fn list_submissions(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for entry in fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))? {
        let entry = entry.with_context(|| format!("reading directory {}", dir.display()))?;
        let path = entry.path();

        let is_csv = path.extension().and_then(|e| e.to_str()) == Some("csv");
        if !is_csv || !path.is_file() {
            debug!("skipping {}", path.display());
            continue;
        }
        paths.push(path);
    }

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

/// Evaluate every submission in turn. The first failure stops the batch.
pub fn run(config: &EvalConfig) -> Result<Vec<Evaluation>> {
    config.validate()?;

    let submissions = list_submissions(&config.submissions_directory)?;
    info!(
        "{} submission(s) in {}",
        submissions.len(),
        config.submissions_directory.display()
    );

    let mut evaluations = Vec::with_capacity(submissions.len());
    for path in submissions {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("Evaluating {file_name}...");

        let evaluation = evaluate_submission(config, &path)
            .with_context(|| format!("evaluating {file_name}"))?;
        evaluations.push(evaluation);
    }

    Ok(evaluations)
}

/// Write every report of the batch as one JSON array.
pub fn write_summary(evaluations: &[Evaluation], path: &Path) -> Result<()> {
    let reports: Vec<&Report> = evaluations.iter().map(|e| &e.report).collect();
    let json = serde_json::to_string_pretty(&reports).context("serializing summary")?;
    fs::write(path, json).with_context(|| format!("writing summary {}", path.display()))?;
    info!("Wrote summary {}", path.display());
    Ok(())
}

/// Duplicate-identifier check of a raw `id,value` submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Inspection {
    pub path: PathBuf,
    pub records: usize,
    pub unique: usize,
    /// `(id, first value, latest repeated value)`
    pub duplicates: Vec<(String, String, String)>,
}

impl Inspection {
    /// `true` when every identifier appears once.
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty()
    }
}

impl fmt::Display for Inspection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.path.display())?;
        writeln!(f, "  records: {}", self.records)?;
        writeln!(f, "  unique identifiers: {}", self.unique)?;
        if self.is_clean() {
            return writeln!(f, "  duplicates: none");
        }
        writeln!(f, "  duplicates: {}", self.duplicates.len())?;
        for (id, first, repeat) in &self.duplicates {
            writeln!(f, "    {id}: first={first} repeat={repeat}")?;
        }
        Ok(())
    }
}

pub fn inspect(path: &Path) -> Result<Inspection> {
    let submission = read_submission(path).with_context(|| format!("reading {}", path.display()))?;

    let duplicates = submission
        .duplicates
        .iter()
        .map(|(id, repeat)| {
            let first = submission.results.get(id).cloned().unwrap_or_default();
            (id.clone(), first, repeat.clone())
        })
        .collect();

    Ok(Inspection {
        path: path.to_path_buf(),
        records: submission.lines.len(),
        unique: submission.results.len(),
        duplicates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_only_csv_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b_t_motility_1.csv", "a_t_motility_1.csv", "notes.txt", "c.CSV"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("d_t_motility_1.csv")).unwrap();

        let names: Vec<String> = list_submissions(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a_t_motility_1.csv", "b_t_motility_1.csv"]);
    }

    #[test]
    fn inspection_flags_repeated_identifiers() {
        let dir = tempfile::tempdir().unwrap();
        let dirty = dir.path().join("dirty.csv");
        fs::write(&dirty, "a.jpg,1\nb.jpg,2\na.png,5\n").unwrap();

        let inspection = inspect(&dirty).unwrap();
        assert!(!inspection.is_clean());
        assert_eq!(inspection.records, 3);
        assert_eq!(inspection.unique, 2);
        assert_eq!(
            inspection.duplicates,
            vec![("a".to_string(), "1".to_string(), "5".to_string())]
        );
        assert!(inspection.to_string().contains("a: first=1 repeat=5"));

        let clean = dir.path().join("clean.csv");
        fs::write(&clean, "a.jpg,1\nb.jpg,2\n").unwrap();
        let inspection = inspect(&clean).unwrap();
        assert!(inspection.is_clean());
        assert!(inspection.to_string().contains("duplicates: none"));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let config = EvalConfig::new("/nonexistent/subs", "gt.csv", "out");
        assert!(run(&config).is_err());
    }
}
