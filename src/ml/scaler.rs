// ============================================================
// Layer 5 — Robust Scaler
// ============================================================
// Centers on the median and divides by the interquartile range
// (25th → 75th percentile), so a few extreme answers do not
// dominate the scale. Percentiles interpolate linearly between
// order statistics. A zero IQR scales by 1.
//
// Used twice: on each numeric feature, and on the target so the
// network regresses a unit-scale value that is mapped back to
// hours after prediction.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Linear-interpolated quantile of an ascending slice, `q` in [0, 1].
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let pos   = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac  = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobustScaler {
    pub center: f64,
    pub scale:  f64,
}

impl RobustScaler {
    /// Fit on the finite values of `values`; `name` labels the error
    /// when nothing finite is present.
    pub fn fit(name: &'static str, values: &[f64]) -> Result<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return Err(PipelineError::EmptyColumn(name));
        }
        sorted.sort_by(f64::total_cmp);

        let center = quantile(&sorted, 0.5);
        let iqr    = quantile(&sorted, 0.75) - quantile(&sorted, 0.25);
        let scale  = if iqr == 0.0 { 1.0 } else { iqr };
        Ok(Self { center, scale })
    }

    pub fn transform(&self, value: f64) -> f64 {
        (value - self.center) / self.scale
    }

    pub fn inverse(&self, value: f64) -> f64 {
        value * self.scale + self.center
    }
}
