// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
//
//   survey export (.xlsx)
//       │
//       ▼
//   SurveySheet      → reads the first worksheet into a RawTable
//       │
//       ▼
//   SurveyCleaner    → renames headers, cleans rows → LabeledRecord
//       │
//       ▼
//   splitter         → seeded train/test split, K-fold, subsamples
//       │
//       ▼
//   SurveyDataset    → aligned records + targets
//       │
//       ▼
//   RowDataset       → encoded rows for one fit (burn Dataset)
//       │
//       ▼
//   SurveyBatcher    → burn Batcher: rows → {x, y} tensors

/// Reads survey spreadsheets with calamine
pub mod loader;

/// Header renaming and row cleaning
pub mod preprocessor;

pub mod dataset;

/// Encoded rows → burn tensors
pub mod batcher;

/// Seeded train/test, K-fold and subsample splits
pub mod splitter;

#[cfg(test)]
pub mod synthetic;
