// ============================================================
// Layer 2 — Predict Use Case
// ============================================================
// FeatureRecord → hours → conclusion band, using the saved model.

use anyhow::Result;

use crate::domain::conclusion::Conclusion;
use crate::domain::record::FeatureRecord;
use crate::domain::traits::SleepPredictor;
use crate::infra::artifact::ArtifactStore;
use crate::ml::evaluation::Evaluation;
use crate::ml::inferencer::Inferencer;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted sleep duration; not clamped.
    pub hours:      f64,
    pub conclusion: Conclusion,
}

pub struct PredictUseCase {
    inferencer: Inferencer,
}

impl PredictUseCase {
    pub fn new(artifact_dir: &str) -> Result<Self> {
        let store = ArtifactStore::new(artifact_dir);
        Ok(Self::with_inferencer(Inferencer::from_artifact(&store)?))
    }

    pub fn with_inferencer(inferencer: Inferencer) -> Self {
        Self { inferencer }
    }

    pub fn predict(&self, record: &FeatureRecord) -> Result<Prediction> {
        let hours = self.inferencer.predict_one(record)?;
        tracing::debug!("Predicted {hours:.3} h for {record:?}");
        Ok(Prediction { hours, conclusion: Conclusion::classify(hours) })
    }

    /// Test-split metrics stored with the model, if any.
    pub fn metrics(&self) -> Option<Evaluation> {
        self.inferencer.evaluation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::SurveyDataset;
    use crate::data::synthetic;
    use crate::ml::model::{Activation, HyperParams, Solver};
    use crate::ml::pipeline::SleepPipeline;
    use crate::ml::trainer::FitSettings;

    fn use_case(evaluation: Option<Evaluation>) -> PredictUseCase {
        let params = HyperParams {
            hidden_layer_sizes: vec![8],
            activation:         Activation::Relu,
            alpha:              1e-4,
            learning_rate_init: 1e-2,
            solver:             Solver::Adam,
            max_epochs:         40,
        };
        let ds = SurveyDataset::new(synthetic::survey(50, 21, true));
        let (pipeline, _) = SleepPipeline::fit(&params, ds.records(), ds.targets(), &FitSettings::default()).unwrap();
        PredictUseCase::with_inferencer(Inferencer::new(pipeline, evaluation))
    }

    #[test]
    fn test_conclusion_follows_predicted_hours() {
        let uc = use_case(None);
        let record = FeatureRecord::from_answers(25, "Laki-laki", "Tidak", "2-4 jam", "Kadang", "Tidak").unwrap();
        let p = uc.predict(&record).unwrap();
        assert_eq!(p.conclusion, Conclusion::classify(p.hours));
        assert_eq!(uc.predict(&record).unwrap(), p);
    }

    #[test]
    fn test_metrics_come_from_the_artifact() {
        let eval = Evaluation { mae: 0.61, mse: 0.58, rows: 40 };
        assert_eq!(use_case(Some(eval)).metrics(), Some(eval));
        assert_eq!(use_case(None).metrics(), None);
    }

    #[test]
    fn test_missing_artifact_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PredictUseCase::new(&dir.path().display().to_string()).is_err());
    }
}
