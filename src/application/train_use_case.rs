// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training run in order:
//
//   Step 1: Load the survey sheet         (Layer 4 - data)
//   Step 2: Seeded train/test split       (Layer 4 - data)
//           and a check that every feature column has data
//   Step 3: Save config                   (Layer 6 - infra)
//   Step 4: Halving grid search           (Layer 5 - ml)
//   Step 5: Refit the best candidate      (Layer 5 - ml)
//   Step 6: Score it on the test split    (Layer 5 - ml)
//   Step 7: Save the artifact             (Layer 6 - infra)

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::{dataset::SurveyDataset, loader::SurveySheet, splitter::split_train_test};
use crate::domain::traits::SurveySource;
use crate::infra::{artifact::ArtifactStore, search_log::SearchLogger};
use crate::ml::{
    evaluation::Evaluation,
    model::HyperParams,
    pipeline::SleepPipeline,
    preprocess::FittedPreprocessor,
    search::{HalvingGridSearch, ParamGrid, SearchSettings},
    trainer::FitSettings,
};

// ─── Training Configuration ──────────────────────────────────────────────────
// Saved next to the artifact as train_config.json.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_path:     String,
    pub sheet:         Option<String>,
    pub artifact_dir:  String,
    pub test_fraction: f64,
    pub grid:          ParamGrid,
    pub search:        SearchSettings,
    pub fit:           FitSettings,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path:     "data/survey.xlsx".to_string(),
            sheet:         None,
            artifact_dir:  "artifacts".to_string(),
            test_fraction: 0.2,
            grid:          ParamGrid::default(),
            search:        SearchSettings::default(),
            fit:           FitSettings::default(),
        }
    }
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct TrainSummary {
    pub best_params:   HyperParams,
    /// Mean cross-validated −MAE of the winner in its last round.
    pub best_score:    f64,
    pub train_rows:    usize,
    pub test_rows:     usize,
    pub evaluation:    Option<Evaluation>,
    pub artifact_path: PathBuf,
}

pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Train on the spreadsheet named in the config.
    pub fn execute(&self) -> Result<TrainSummary> {
        let sheet = SurveySheet::new(&self.config.data_path, self.config.sheet.clone());
        self.execute_on(&sheet)
    }

    pub fn execute_on(&self, source: &dyn SurveySource) -> Result<TrainSummary> {
        let cfg = &self.config;
        if !(0.0..1.0).contains(&cfg.test_fraction) {
            anyhow::bail!("test fraction must be in [0, 1), got {}", cfg.test_fraction);
        }

        // ── Step 1: Load the survey ───────────────────────────────────────────
        tracing::info!("Loading survey from '{}'", cfg.data_path);
        let rows = source
            .load_all()
            .with_context(|| format!("Failed to load survey '{}'", cfg.data_path))?;

        // ── Step 2: Train/test split ──────────────────────────────────────────
        let (train, test) = split_train_test(rows, cfg.test_fraction, cfg.search.seed);
        let train = SurveyDataset::new(train);
        let test  = SurveyDataset::new(test);
        tracing::info!("Split: {} train / {} test", train.len(), test.len());
        FittedPreprocessor::check_observed(train.records())
            .context("Training split cannot be preprocessed")?;

        // ── Step 3: Save config ───────────────────────────────────────────────
        let store = ArtifactStore::new(&cfg.artifact_dir);
        store.save_config(cfg)?;

        // ── Step 4: Search ────────────────────────────────────────────────────
        let logger = SearchLogger::new(&cfg.artifact_dir)?;
        tracing::info!("Logging candidate scores to '{}'", logger.csv_path().display());
        let search = HalvingGridSearch::new(cfg.grid.clone(), cfg.search.clone(), cfg.fit.clone());
        let outcome = search
            .run(&train, |score| logger.log(score))
            .context("Hyperparameter search aborted")?;
        tracing::info!(
            "Best candidate: {} (cv score {:.4}) after {} fits over {} rounds",
            outcome.best_params,
            outcome.best_score,
            outcome.history.len(),
            outcome.schedule.budgets.len()
        );

        // ── Step 5: Refit on the full training split ──────────────────────────
        let (pipeline, report) =
            SleepPipeline::fit(&outcome.best_params, train.records(), train.targets(), &cfg.fit)
                .context("Refitting the best candidate failed")?;
        tracing::info!(
            "Refit finished after {} epochs (early stop: {}, best holdout loss {:.4})",
            report.epochs_run,
            report.stopped_early,
            report.best_loss
        );

        // ── Step 6: Held-out metrics ──────────────────────────────────────────
        let evaluation = if test.is_empty() {
            tracing::warn!("Test split is empty; no metrics will be stored");
            None
        } else {
            let eval = Evaluation::measure(&pipeline, &test)?;
            tracing::info!("Test MAE {:.3}, MSE {:.3} on {} rows", eval.mae, eval.mse, eval.rows);
            Some(eval)
        };

        // ── Step 7: Save ──────────────────────────────────────────────────────
        let artifact_path = store.save(&pipeline, evaluation)?;

        Ok(TrainSummary {
            best_params: outcome.best_params,
            best_score: outcome.best_score,
            train_rows: train.len(),
            test_rows: test.len(),
            evaluation,
            artifact_path,
        })
    }
}
