// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// Everything that learns from data or applies what was learned.
// Burn is only imported here and in data/batcher.rs.
//
//   scaler.rs, imputer.rs, encoder.rs
//                 — per-column transforms fitted on training rows
//   preprocess.rs — the column transformer: numeric columns are
//                   median-imputed then robust-scaled, categorical
//                   columns mode-imputed then one-hot encoded
//   model.rs      — MLP regressor and its hyperparameters
//   trainer.rs    — minibatch training with early stopping
//   pipeline.rs   — preprocessor + target scaler + network as one
//                   fitted unit
//   search.rs     — successive-halving grid search
//   evaluation.rs — MAE / MSE
//   inferencer.rs — a loaded pipeline for the predictor

pub mod scaler;
pub mod imputer;
pub mod encoder;
pub mod preprocess;

/// MLP regressor architecture
pub mod model;

/// Training loop for one hyperparameter point
pub mod trainer;

pub mod pipeline;

/// Hyperparameter selection
pub mod search;

pub mod evaluation;

/// Inference engine — loads the artifact and predicts hours
pub mod inferencer;
