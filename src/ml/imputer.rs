// ============================================================
// Layer 5 — Imputers
// ============================================================
// Missing values are filled with statistics of the training
// split: the median for numeric columns, the most frequent
// label for categorical ones (ties go to the label that sorts
// first). The fill values are stored in the artifact, so
// inference never recomputes them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::ml::scaler::quantile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedianImputer {
    pub fill: f64,
}

impl MedianImputer {
    pub fn fit(name: &'static str, values: &[Option<f64>]) -> Result<Self> {
        let mut observed: Vec<f64> = values.iter().flatten().copied().filter(|v| v.is_finite()).collect();
        if observed.is_empty() {
            return Err(PipelineError::EmptyColumn(name));
        }
        observed.sort_by(f64::total_cmp);
        Ok(Self { fill: quantile(&observed, 0.5) })
    }

    pub fn apply(&self, value: Option<f64>) -> f64 {
        match value {
            Some(v) if v.is_finite() => v,
            _ => self.fill,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MostFrequentImputer {
    pub fill: String,
}

impl MostFrequentImputer {
    pub fn fit(name: &'static str, values: &[Option<&str>]) -> Result<Self> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for v in values.iter().flatten() {
            *counts.entry(*v).or_default() += 1;
        }

        // BTreeMap iterates in label order; keep the first maximum.
        let mut best: Option<(&str, usize)> = None;
        for (label, count) in counts {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((label, count));
            }
        }

        best.map(|(label, _)| Self { fill: label.to_string() })
            .ok_or(PipelineError::EmptyColumn(name))
    }

    pub fn apply<'a>(&'a self, value: Option<&'a str>) -> &'a str {
        value.unwrap_or(&self.fill)
    }
}
