// ============================================================
// Layer 3 — Screen-Time Normalizer
// ============================================================
// The survey asks for daily screen time as a free-text bucket.
// The model only ever sees the numeric surrogate below, and the
// trainer and the predictor both go through `ScreenTime::normalize`,
// so the mapping cannot drift between fit time and query time.
//
//   text contains "< 2"  → 1.5 hours
//   text contains "2-4"  → 3.0 hours
//   text contains "> 4"  → 5.0 hours
//   anything else        → missing (imputed later, never zero)
//
// Checks run in that order on the raw text.

use serde::{Deserialize, Serialize};

/// A recognised screen-time bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScreenTime {
    UnderTwoHours,
    TwoToFourHours,
    OverFourHours,
}

impl ScreenTime {
    /// The bucket labels offered by the prediction form.
    pub const FORM_OPTIONS: [&'static str; 3] = ["< 2 jam", "2-4 jam", "> 4 jam"];

    /// Map raw bucket text to a bucket. `None` is the missing-value sentinel.
    pub fn normalize(raw: &str) -> Option<Self> {
        if raw.contains("< 2") {
            Some(Self::UnderTwoHours)
        } else if raw.contains("2-4") {
            Some(Self::TwoToFourHours)
        } else if raw.contains("> 4") {
            Some(Self::OverFourHours)
        } else {
            None
        }
    }

    /// Numeric surrogate fed to the model.
    pub fn hours(self) -> f64 {
        match self {
            Self::UnderTwoHours  => 1.5,
            Self::TwoToFourHours => 3.0,
            Self::OverFourHours  => 5.0,
        }
    }
}

/// Normalize optional raw text straight to hours.
pub fn screen_time_hours(raw: Option<&str>) -> Option<f64> {
    raw.and_then(ScreenTime::normalize).map(ScreenTime::hours)
}
