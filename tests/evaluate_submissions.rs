use std::fs;
use std::path::Path;

use approx::assert_relative_eq;
use biomedia_eval::data::loader::read_submission;
use biomedia_eval::{driver, evaluate_submission, EvalConfig, EvalError};
use tempfile::TempDir;

const MOTILITY_HEADER: &str = "id;progressive_%;non_progressive_%;immotile_%";

fn workspace(ground_truth: &str) -> (TempDir, EvalConfig) {
    let dir = tempfile::tempdir().unwrap();
    let submissions = dir.path().join("submissions");
    fs::create_dir(&submissions).unwrap();
    let gt = dir.path().join("gt.csv");
    fs::write(&gt, ground_truth).unwrap();
    let results = dir.path().join("results");
    (dir, EvalConfig::new(submissions, gt, results))
}

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn identical_submission_reports_zero_mae_everywhere() {
    let gt = format!("{MOTILITY_HEADER}\nvideo1;50;30;20\n");
    let (_dir, config) = workspace(&gt);
    write(&config.submissions_directory, "medico_teamA_motility_run1.csv", &gt);

    let evaluations = driver::run(&config).unwrap();
    assert_eq!(evaluations.len(), 1);

    let text = fs::read_to_string(&evaluations[0].report_path).unwrap();
    let blocks: Vec<&str> = text.trim_end().split("\n\n").collect();
    assert_eq!(blocks.len(), 4);

    for (block, variable) in blocks.iter().zip(["progressive_%", "non_progressive_%", "immotile_%"]) {
        assert!(block.starts_with(&format!("Results for {variable}\n")));
        assert!(block.contains("mean absolute error: 0.0\n"));
    }
    assert!(blocks[3].starts_with("Average results\n"));
    assert!(blocks[3].contains("mean absolute error: 0.0\n"));
}

#[test]
fn batch_scores_each_submission_independently() {
    let gt = format!(
        "{MOTILITY_HEADER};head_defect_%;midpiece_defect_%;tail_defect_%\n\
         1.avi;60;20;20;10;10;80\n\
         2.avi;40;40;20;30;30;40\n"
    );
    let (_dir, config) = workspace(&gt);
    write(
        &config.submissions_directory,
        "x_alpha_motility_run1.csv",
        &format!("{MOTILITY_HEADER}\n1;62;18;20\n2;40;40;24\n"),
    );
    write(
        &config.submissions_directory,
        "x_beta_morphology_try_2.csv",
        "id;head_defect_%;midpiece_defect_%;tail_defect_%\n1.mp4;10;10;80\n2.mp4;30;30;40\n",
    );
    write(&config.submissions_directory, "readme.md", "not a submission");

    let evaluations = driver::run(&config).unwrap();
    assert_eq!(evaluations.len(), 2);

    let alpha = &evaluations[0].report;
    assert_eq!((alpha.team.as_str(), alpha.task.as_str()), ("alpha", "motility"));
    let progressive = &alpha.variables[0].1;
    assert_relative_eq!(progressive.mean_absolute_error, 1.0);
    assert_relative_eq!(progressive.mean_squared_error, 2.0);
    assert_relative_eq!(progressive.root_mean_squared_error, 2.0_f64.sqrt());
    assert_relative_eq!(alpha.variables[2].1.max_error, 4.0);
    assert_relative_eq!(alpha.average.mean_absolute_error, (1.0 + 1.0 + 2.0) / 3.0);

    let beta = &evaluations[1];
    assert_eq!(beta.report.run_id, "try_2");
    assert!(beta
        .report_path
        .ends_with("beta/morphology/try_2/official_biomedia_2020_beta_morphology_try_2_metrics.txt"));
    assert_eq!(beta.report.average.mean_squared_error, 0.0);
}

#[test]
fn first_failure_stops_the_batch() {
    let gt = format!("{MOTILITY_HEADER}\nv1;50;30;20\nv2;20;20;60\n");
    let (_dir, config) = workspace(&gt);
    write(
        &config.submissions_directory,
        "a_bad_motility_run.csv",
        &format!("{MOTILITY_HEADER}\nv1;50;30;20\n"),
    );
    write(&config.submissions_directory, "b_good_motility_run.csv", &gt);

    let err = driver::run(&config).unwrap_err();
    assert!(format!("{err:#}").contains("a_bad_motility_run.csv"));
    assert!(matches!(
        err.downcast_ref::<EvalError>(),
        Some(EvalError::MissingIdentifier { id, .. }) if id == "v2"
    ));
    assert!(!config.results_directory.join("good").exists());
}

#[test]
fn unsupported_task_is_reported_by_kind() {
    let (_dir, config) = workspace(&format!("{MOTILITY_HEADER}\nv1;50;30;20\n"));
    let path = config.submissions_directory.join("a_team_velocity_run.csv");
    fs::write(&path, "").unwrap();

    assert!(matches!(
        evaluate_submission(&config, &path),
        Err(EvalError::UnsupportedTask(task)) if task == "velocity"
    ));
}

#[test]
fn summary_lists_every_report() {
    let gt = format!("{MOTILITY_HEADER}\nvideo1;50;30;20\n");
    let (dir, config) = workspace(&gt);
    write(&config.submissions_directory, "m_t_motility_r.csv", &gt);

    let evaluations = driver::run(&config).unwrap();
    let summary = dir.path().join("summary.json");
    driver::write_summary(&evaluations, &summary).unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(summary).unwrap()).unwrap();
    assert_eq!(json.as_array().map(Vec::len), Some(1));
    assert_eq!(json[0]["team"], "t");
    assert_eq!(json[0]["average"]["mean_absolute_error"], 0.0);
}

#[test]
fn inspection_keeps_first_seen_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.csv");
    fs::write(&path, "a.jpg,0.5\nb.jpg,0.7\na.jpg,0.9\n").unwrap();

    let submission = read_submission(&path).unwrap();
    assert_eq!(submission.results["a"], "0.5");
    assert_eq!(submission.duplicates["a"], "0.9");
    assert_eq!(submission.lines.len(), 3);
}
