// ============================================================
// Layer 5 — Column Preprocessor
// ============================================================
// Turns feature records into the numeric matrix the network
// expects. Output columns, in order:
//
//   numeric     age, screen_time_hours
//               median-imputed, then robust-scaled
//   categorical sex, has_physical_condition,
//               exercise_frequency, smokes_or_drinks
//               mode-imputed, then one-hot encoded
//
// Fitted once on the training split and stored verbatim in the
// artifact; `transform` is a pure function of the record.

use serde::{Deserialize, Serialize};

use crate::domain::record::FeatureRecord;
use crate::domain::schema::{CATEGORICAL_FEATURES, NUMERIC_FEATURES};
use crate::error::{PipelineError, Result};
use crate::ml::encoder::OneHotEncoder;
use crate::ml::imputer::{MedianImputer, MostFrequentImputer};
use crate::ml::scaler::RobustScaler;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericColumn {
    pub name:    String,
    pub imputer: MedianImputer,
    pub scaler:  RobustScaler,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalColumn {
    pub name:    String,
    pub imputer: MostFrequentImputer,
    pub encoder: OneHotEncoder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPreprocessor {
    pub numeric:     Vec<NumericColumn>,
    pub categorical: Vec<CategoricalColumn>,
}

impl FittedPreprocessor {
    /// Fit imputers, scalers and encoders on the training records.
    pub fn fit(records: &[FeatureRecord]) -> Result<Self> {
        if records.is_empty() {
            return Err(PipelineError::InsufficientData(
                "cannot fit the preprocessor on zero rows".to_string(),
            ));
        }

        let numeric_rows: Vec<[Option<f64>; 2]> = records.iter().map(FeatureRecord::numeric_values).collect();
        let numeric = NUMERIC_FEATURES
            .iter()
            .enumerate()
            .map(|(i, &name)| {
                let column: Vec<Option<f64>> = numeric_rows.iter().map(|r| r[i]).collect();
                let imputer = MedianImputer::fit(name, &column)?;
                let imputed: Vec<f64> = column.iter().map(|v| imputer.apply(*v)).collect();
                let scaler  = RobustScaler::fit(name, &imputed)?;
                Ok(NumericColumn { name: name.to_string(), imputer, scaler })
            })
            .collect::<Result<Vec<_>>>()?;

        let label_rows: Vec<[Option<&str>; 4]> = records.iter().map(FeatureRecord::categorical_labels).collect();
        let categorical = CATEGORICAL_FEATURES
            .iter()
            .enumerate()
            .map(|(i, &name)| {
                let column: Vec<Option<&str>> = label_rows.iter().map(|r| r[i]).collect();
                let imputer = MostFrequentImputer::fit(name, &column)?;
                let imputed: Vec<&str> = column.iter().map(|v| imputer.apply(*v)).collect();
                let encoder = OneHotEncoder::fit(&imputed);
                Ok(CategoricalColumn { name: name.to_string(), imputer, encoder })
            })
            .collect::<Result<Vec<_>>>()?;

        let fitted = Self { numeric, categorical };
        tracing::debug!("Preprocessor fitted: {} output columns {:?}", fitted.width(), fitted.output_names());
        Ok(fitted)
    }

    /// Fail on the first feature column with no observed value in `records`.
    pub fn check_observed(records: &[FeatureRecord]) -> Result<()> {
        for (i, &name) in NUMERIC_FEATURES.iter().enumerate() {
            if records.iter().all(|r| r.numeric_values()[i].is_none()) {
                return Err(PipelineError::EmptyColumn(name));
            }
        }
        for (i, &name) in CATEGORICAL_FEATURES.iter().enumerate() {
            if records.iter().all(|r| r.categorical_labels()[i].is_none()) {
                return Err(PipelineError::EmptyColumn(name));
            }
        }
        Ok(())
    }

    /// Check a deserialized preprocessor against this build's feature lists.
    pub fn validate(&self) -> Result<()> {
        let numeric: Vec<&str>     = self.numeric.iter().map(|c| c.name.as_str()).collect();
        let categorical: Vec<&str> = self.categorical.iter().map(|c| c.name.as_str()).collect();
        if numeric != NUMERIC_FEATURES || categorical != CATEGORICAL_FEATURES {
            return Err(PipelineError::SchemaMismatch {
                expected: format!("{NUMERIC_FEATURES:?} + {CATEGORICAL_FEATURES:?}"),
                found:    format!("{numeric:?} + {categorical:?}"),
            });
        }
        Ok(())
    }

    /// Number of output columns.
    pub fn width(&self) -> usize {
        self.numeric.len() + self.categorical.iter().map(|c| c.encoder.width()).sum::<usize>()
    }

    /// Output column names, e.g. `num__age`, `cat__sex_female`.
    pub fn output_names(&self) -> Vec<String> {
        let numeric = self.numeric.iter().map(|c| format!("num__{}", c.name));
        let categorical = self.categorical.iter().flat_map(|c| {
            c.encoder
                .categories
                .iter()
                .map(move |cat| format!("cat__{}_{}", c.name, cat))
        });
        numeric.chain(categorical).collect()
    }

    pub fn transform_one(&self, record: &FeatureRecord) -> Vec<f32> {
        let mut row = Vec::with_capacity(self.width());

        for (col, value) in self.numeric.iter().zip(record.numeric_values()) {
            let v = col.scaler.transform(col.imputer.apply(value));
            row.push(v as f32);
        }
        for (col, label) in self.categorical.iter().zip(record.categorical_labels()) {
            col.encoder.encode_into(col.imputer.apply(label), &mut row);
        }
        row
    }

    pub fn transform(&self, records: &[FeatureRecord]) -> Vec<Vec<f32>> {
        records.iter().map(|r| self.transform_one(r)).collect()
    }
}
