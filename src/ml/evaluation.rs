use serde::{Deserialize, Serialize};

use crate::data::dataset::SurveyDataset;
use crate::domain::traits::SleepPredictor;
use crate::error::{PipelineError, Result};

pub fn mean_absolute_error(preds: &[f64], targets: &[f64]) -> f64 {
    preds.iter().zip(targets).map(|(p, t)| (p - t).abs()).sum::<f64>() / targets.len().max(1) as f64
}

pub fn mean_squared_error(preds: &[f64], targets: &[f64]) -> f64 {
    preds.iter().zip(targets).map(|(p, t)| (p - t).powi(2)).sum::<f64>() / targets.len().max(1) as f64
}

/// Error metrics of a model on a labelled set, in hours / hours².
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub mae:  f64,
    pub mse:  f64,
    pub rows: usize,
}

impl Evaluation {
    pub fn measure<P: SleepPredictor + ?Sized>(model: &P, data: &SurveyDataset) -> Result<Self> {
        if data.is_empty() {
            return Err(PipelineError::InsufficientData("no labelled rows to evaluate on".to_string()));
        }
        let preds = model.predict(data.records())?;
        Ok(Self {
            mae:  mean_absolute_error(&preds, data.targets()),
            mse:  mean_squared_error(&preds, data.targets()),
            rows: data.len(),
        })
    }
}
