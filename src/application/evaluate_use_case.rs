// ============================================================
// Layer 2 — Evaluate Use Case
// ============================================================
// Re-measures the saved model on a labelled survey so the stored
// metrics can be checked against the model actually on disk.

use anyhow::{Context, Result};

use crate::data::{dataset::SurveyDataset, loader::SurveySheet};
use crate::domain::traits::SurveySource;
use crate::infra::artifact::ArtifactStore;
use crate::ml::evaluation::Evaluation;
use crate::ml::inferencer::Inferencer;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationReport {
    pub measured: Evaluation,
    /// Metrics recorded at training time.
    pub stored:   Option<Evaluation>,
}

pub struct EvaluateUseCase {
    inferencer: Inferencer,
}

impl EvaluateUseCase {
    pub fn new(artifact_dir: &str) -> Result<Self> {
        let store = ArtifactStore::new(artifact_dir);
        Ok(Self { inferencer: Inferencer::from_artifact(&store)? })
    }

    pub fn execute(&self, data_path: &str, sheet: Option<String>) -> Result<EvaluationReport> {
        let sheet = SurveySheet::new(data_path, sheet);
        self.execute_on(&sheet)
            .with_context(|| format!("Failed to evaluate on '{data_path}'"))
    }

    pub fn execute_on(&self, source: &dyn SurveySource) -> Result<EvaluationReport> {
        let data     = SurveyDataset::new(source.load_all()?);
        let measured = Evaluation::measure(&self.inferencer, &data)?;
        tracing::info!(
            "Measured MAE {:.3}, MSE {:.3} on {} rows",
            measured.mae,
            measured.mse,
            measured.rows
        );
        Ok(EvaluationReport { measured, stored: self.inferencer.evaluation() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synthetic;
    use crate::domain::traits::LabeledRecord;
    use crate::ml::model::{Activation, HyperParams, Solver};
    use crate::ml::pipeline::SleepPipeline;
    use crate::ml::trainer::FitSettings;

    struct InMemory(Vec<LabeledRecord>);

    impl SurveySource for InMemory {
        fn load_all(&self) -> crate::error::Result<Vec<LabeledRecord>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_report_carries_fresh_and_stored_metrics() {
        let params = HyperParams {
            hidden_layer_sizes: vec![8],
            activation:         Activation::Tanh,
            alpha:              1e-4,
            learning_rate_init: 1e-2,
            solver:             Solver::Sgd,
            max_epochs:         20,
        };
        let ds = SurveyDataset::new(synthetic::survey(40, 2, true));
        let (pipeline, _) = SleepPipeline::fit(&params, ds.records(), ds.targets(), &FitSettings::default()).unwrap();

        let stored = Evaluation { mae: 9.0, mse: 81.0, rows: 3 };
        let uc = EvaluateUseCase { inferencer: Inferencer::new(pipeline, Some(stored)) };
        let report = uc.execute_on(&InMemory(synthetic::survey(15, 4, true))).unwrap();

        assert_eq!(report.stored, Some(stored));
        assert_eq!(report.measured.rows, 15);
        assert!(report.measured.mae.is_finite());
    }

    #[test]
    fn test_empty_survey_cannot_be_evaluated() {
        let params = HyperParams {
            hidden_layer_sizes: vec![4],
            activation:         Activation::Relu,
            alpha:              1e-4,
            learning_rate_init: 1e-2,
            solver:             Solver::Adam,
            max_epochs:         5,
        };
        let ds = SurveyDataset::new(synthetic::survey(20, 2, true));
        let (pipeline, _) = SleepPipeline::fit(&params, ds.records(), ds.targets(), &FitSettings::default()).unwrap();
        let uc = EvaluateUseCase { inferencer: Inferencer::new(pipeline, None) };
        assert!(uc.execute_on(&InMemory(Vec::new())).is_err());
    }
}
