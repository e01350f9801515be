use burn::data::dataset::Dataset;

use crate::domain::record::FeatureRecord;
use crate::domain::traits::LabeledRecord;

/// Labelled survey responses in column form: one feature record and
/// one target per row, kept in step.
#[derive(Debug, Clone, Default)]
pub struct SurveyDataset {
    records: Vec<FeatureRecord>,
    targets: Vec<f64>,
}

impl SurveyDataset {
    pub fn new(rows: Vec<LabeledRecord>) -> Self {
        let (records, targets) = rows
            .into_iter()
            .map(|r| (r.features, r.sleep_hours))
            .unzip();
        Self { records, targets }
    }

    pub fn records(&self) -> &[FeatureRecord] {
        &self.records
    }

    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows at `indices`, in that order.
    pub fn subset(&self, indices: &[usize]) -> Self {
        Self {
            records: indices.iter().map(|&i| self.records[i].clone()).collect(),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
        }
    }
}

/// One encoded training row: the network's input and its scaled target.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyRow {
    pub features: Vec<f32>,
    pub target:   f32,
}

/// Encoded rows for a single network fit, served to Burn's DataLoader.
pub struct RowDataset {
    rows: Vec<SurveyRow>,
}

impl RowDataset {
    pub fn new(rows: Vec<SurveyRow>) -> Self { Self { rows } }
}

impl Dataset<SurveyRow> for RowDataset {
    fn get(&self, index: usize) -> Option<SurveyRow> {
        self.rows.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}
