// ============================================================
// Layer 3 — Conclusion
// ============================================================
// Bands a predicted sleep duration into one of three advisory
// messages. Both boundaries belong to the healthy band:
//
//   p <  6        → below the healthy recommendation
//   6 <= p <= 8   → within the healthy range
//   otherwise     → above the recommendation

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conclusion {
    BelowRecommendation,
    HealthyRange,
    AboveRecommendation,
}

impl Conclusion {
    pub fn classify(predicted_hours: f64) -> Self {
        if predicted_hours < 6.0 {
            Self::BelowRecommendation
        } else if (6.0..=8.0).contains(&predicted_hours) {
            Self::HealthyRange
        } else {
            Self::AboveRecommendation
        }
    }

    /// The advisory text shown to the user.
    pub fn message(self) -> &'static str {
        match self {
            Self::BelowRecommendation => {
                "Waktu tidur Anda lebih rendah dari rekomendasi sehat (7-9 jam). \
                 Sebaiknya tingkatkan durasi tidur untuk kesehatan yang lebih baik."
            }
            Self::HealthyRange => {
                "Waktu tidur Anda berada dalam rentang yang sehat. \
                 Pertahankan gaya hidup sehat ini."
            }
            Self::AboveRecommendation => {
                "Waktu tidur Anda lebih dari yang disarankan. \
                 Pertimbangkan untuk mengurangi waktu tidur yang berlebihan untuk menjaga kesehatan."
            }
        }
    }
}
