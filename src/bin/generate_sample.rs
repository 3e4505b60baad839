use std::fs;
use std::path::Path;

use biomedia_eval::data::model::Task;
use csv::WriterBuilder;

/// Deterministic generator (64-bit LCG, top bits only).
struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Three percentages summing to 100, rounded to one decimal.
    fn split_100(&mut self) -> [f64; 3] {
        let a = self.next_f64() * 100.0;
        let b = self.next_f64() * (100.0 - a);
        let round = |v: f64| (v * 10.0).round() / 10.0;
        let (a, b) = (round(a), round(b));
        [a, b, round(100.0 - a - b)]
    }

    /// Perturb by up to ±`spread`, clamped at zero.
    fn jitter(&mut self, v: f64, spread: f64) -> f64 {
        let delta = (self.next_f64() * 2.0 - 1.0) * spread;
        ((v + delta).max(0.0) * 10.0).round() / 10.0
    }
}

const VIDEOS: usize = 20;

fn main() {
    let mut rng = Lcg(42);
    let out = Path::new("sample_data");
    let submissions = out.join("submissions");
    fs::create_dir_all(&submissions).expect("Failed to create sample_data/submissions");

    let ids: Vec<String> = (1..=VIDEOS).map(|i| format!("{i}.avi")).collect();
    let motility: Vec<[f64; 3]> = ids.iter().map(|_| rng.split_100()).collect();
    let morphology: Vec<[f64; 3]> = ids.iter().map(|_| rng.split_100()).collect();

    // Ground truth: every variable of both tasks in one file.
    let mut header = vec!["ID"];
    header.extend(Task::Motility.variables());
    header.extend(Task::Morphology.variables());

    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .from_path(out.join("ground_truth.csv"))
        .expect("Failed to create ground truth");
    writer.write_record(&header).expect("Failed to write header");
    for (i, id) in ids.iter().enumerate() {
        let mut row = vec![id.clone()];
        row.extend(motility[i].iter().chain(&morphology[i]).map(|v| v.to_string()));
        writer.write_record(&row).expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush ground truth");

    let runs: [(&str, Task, f64); 3] = [
        ("medico_simula_motility_run1.csv", Task::Motility, 5.0),
        ("medico_simula_motility_run2.csv", Task::Motility, 15.0),
        ("medico_simula_morphology_baseline.csv", Task::Morphology, 8.0),
    ];

    for (file_name, task, spread) in runs {
        let truth = match task {
            Task::Motility => &motility,
            Task::Morphology => &morphology,
        };

        let mut writer = WriterBuilder::new()
            .delimiter(b';')
            .from_path(submissions.join(file_name))
            .expect("Failed to create submission");

        let mut header = vec!["ID"];
        header.extend(task.variables());
        writer.write_record(&header).expect("Failed to write header");

        for (id, values) in ids.iter().zip(truth) {
            let mut row = vec![id.clone()];
            row.extend(values.iter().map(|&v| rng.jitter(v, spread).to_string()));
            writer.write_record(&row).expect("Failed to write row");
        }
        writer.flush().expect("Failed to flush submission");
    }

    println!(
        "Wrote ground truth for {VIDEOS} videos and {} submissions to {}",
        runs.len(),
        out.display()
    );
}
