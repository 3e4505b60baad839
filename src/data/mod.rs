/// Data layer: record types and CSV loading.
///
/// Architecture:
/// ```text
///  ground_truth.csv        <prefix>_<team>_<task>_<run>.csv
///        │                          │
///        ▼                          ▼
///   ┌──────────┐               ┌──────────┐
///   │  loader   │               │  loader   │  header → column index,
///   └──────────┘               └──────────┘  rows → id → Vec<f64>
///        │                          │
///        ▼                          ▼
///   ┌──────────────────────────────────────┐
///   │ SampleMatrix::align                   │  truth order, lookup by id
///   └──────────────────────────────────────┘
/// ```

pub mod loader;
pub mod model;
