// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Read-only view of a saved pipeline. Loading goes through the
// artifact store, which has already checked the schema id; after
// that every call is a pure function of its input records.

use anyhow::Result;

use crate::domain::record::FeatureRecord;
use crate::domain::traits::SleepPredictor;
use crate::error;
use crate::infra::artifact::ArtifactStore;
use crate::ml::evaluation::Evaluation;
use crate::ml::model::HyperParams;
use crate::ml::pipeline::SleepPipeline;

pub struct Inferencer {
    pipeline:   SleepPipeline,
    evaluation: Option<Evaluation>,
}

impl Inferencer {
    pub fn from_artifact(store: &ArtifactStore) -> Result<Self> {
        let stored     = store.load()?;
        let inferencer = Self::new(stored.pipeline, stored.evaluation);
        tracing::info!(
            "Model loaded from '{}' ({})",
            store.model_path().display(),
            inferencer.params()
        );
        Ok(inferencer)
    }

    pub fn new(pipeline: SleepPipeline, evaluation: Option<Evaluation>) -> Self {
        Self { pipeline, evaluation }
    }

    /// Held-out metrics recorded when this model was trained.
    pub fn evaluation(&self) -> Option<Evaluation> {
        self.evaluation
    }

    pub fn params(&self) -> &HyperParams {
        &self.pipeline.params
    }
}

impl SleepPredictor for Inferencer {
    fn predict(&self, records: &[FeatureRecord]) -> error::Result<Vec<f64>> {
        self.pipeline.predict(records)
    }
}
