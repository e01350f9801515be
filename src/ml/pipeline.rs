// ============================================================
// Layer 5 — Fitted Pipeline
// ============================================================
// The unit the trainer produces and the predictor consumes:
//
//   FeatureRecord ─► FittedPreprocessor ─► Mlp ─► target_scaler⁻¹ ─► hours
//
// Fitting scales the target with its own robust scaler before the
// network sees it; prediction maps the network output back to
// hours. Out-of-range outputs are returned as-is.

use crate::domain::record::FeatureRecord;
use crate::domain::traits::SleepPredictor;
use crate::error::{PipelineError, Result};
use crate::ml::model::HyperParams;
use crate::ml::model::Mlp;
use crate::ml::preprocess::FittedPreprocessor;
use crate::ml::scaler::RobustScaler;
use crate::ml::trainer::{fit_network, predict_scaled, FitReport, FitSettings, InferBackend, TrainingData};

pub struct SleepPipeline {
    pub params:        HyperParams,
    pub preprocessor:  FittedPreprocessor,
    pub target_scaler: RobustScaler,
    pub network:       Mlp<InferBackend>,
}

impl SleepPipeline {
    /// Fit preprocessing, target scaling and the network on one split.
    pub fn fit(
        params:   &HyperParams,
        records:  &[FeatureRecord],
        targets:  &[f64],
        settings: &FitSettings,
    ) -> Result<(Self, FitReport)> {
        if records.len() != targets.len() {
            return Err(PipelineError::InsufficientData(format!(
                "{} records but {} targets",
                records.len(),
                targets.len()
            )));
        }

        let preprocessor  = FittedPreprocessor::fit(records)?;
        let target_scaler = RobustScaler::fit("sleep_time", targets)?;

        let rows = preprocessor.transform(records);
        let scaled_targets: Vec<f32> = targets.iter().map(|&y| target_scaler.transform(y) as f32).collect();
        let data = TrainingData {
            rows:    &rows,
            width:   preprocessor.width(),
            targets: &scaled_targets,
        };

        let (network, report) = fit_network(params, &data, settings)?;
        Ok((
            Self {
                params: params.clone(),
                preprocessor,
                target_scaler,
                network,
            },
            report,
        ))
    }
}

impl SleepPredictor for SleepPipeline {
    fn predict(&self, records: &[FeatureRecord]) -> Result<Vec<f64>> {
        let rows   = self.preprocessor.transform(records);
        let scaled = predict_scaled(&self.network, self.params.activation, &rows, self.preprocessor.width())?;
        Ok(scaled
            .into_iter()
            .map(|v| self.target_scaler.inverse(f64::from(v)))
            .collect())
    }
}
