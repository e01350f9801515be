// ============================================================
// Layer 3 — Core Traits
// ============================================================

use crate::domain::record::FeatureRecord;
use crate::error::{PipelineError, Result};

/// One labelled survey response: the features and the reported
/// nightly sleep in hours.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledRecord {
    pub features:    FeatureRecord,
    pub sleep_hours: f64,
}

/// Anything that can produce labelled survey responses.
///
/// Implementations:
///   - SurveySheet → an .xlsx/.xls/.ods export of the survey form
pub trait SurveySource {
    fn load_all(&self) -> Result<Vec<LabeledRecord>>;
}

/// Anything that maps feature records to predicted sleep hours.
///
/// Implementations must be pure: the same records always give the
/// same predictions, and predicting never mutates the model.
pub trait SleepPredictor {
    fn predict(&self, records: &[FeatureRecord]) -> Result<Vec<f64>>;

    fn predict_one(&self, record: &FeatureRecord) -> Result<f64> {
        self.predict(std::slice::from_ref(record))?
            .into_iter()
            .next()
            .ok_or_else(|| PipelineError::Tensor("empty prediction batch".to_string()))
    }
}
